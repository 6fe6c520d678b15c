use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Failed to allocate {bytes} bytes for the surface backing buffer")]
    Allocation { bytes: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

impl From<SurfaceError> for String {
    fn from(e: SurfaceError) -> Self {
        e.to_string()
    }
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;
