//! Image file I/O
//!
//! The surface works in premultiplied ARGB; files on disk hold straight RGBA.
//! Conversion happens here and nowhere else.

use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::core::{SurfaceError, SurfaceResult};
use crate::surface::{premultiply, unpremultiply, Image};

/// Convert a display image to a straight-alpha `RgbaImage`
pub fn to_rgba_image(img: &Image) -> SurfaceResult<RgbaImage> {
    let mut data = Vec::with_capacity(img.pixels().len() * 4);
    for &pixel in img.pixels() {
        data.extend_from_slice(&unpremultiply(pixel));
    }
    RgbaImage::from_raw(img.width(), img.height(), data).ok_or(SurfaceError::InvalidDimensions {
        width: img.width(),
        height: img.height(),
    })
}

/// Convert a straight-alpha `RgbaImage` to a display image
pub fn from_rgba_image(rgba: &RgbaImage) -> Image {
    let pixels = rgba.pixels().map(|p| premultiply(p.0)).collect();
    // Length always matches: one word per source pixel
    Image::from_pixels(rgba.width(), rgba.height(), pixels)
        .unwrap_or_else(|_| Image::new(rgba.width(), rgba.height()))
}

/// Write `img` to `path` as PNG, whatever the extension says
pub fn save_png(img: &Image, path: impl AsRef<Path>) -> SurfaceResult<()> {
    let path = path.as_ref();
    let rgba = to_rgba_image(img)?;
    rgba.save_with_format(path, ImageFormat::Png)?;
    tracing::info!(
        "PNG saved: {:?} ({}x{})",
        path,
        img.width(),
        img.height()
    );
    Ok(())
}

/// Decode any format the `image` crate understands into a display image
pub fn load_image(path: impl AsRef<Path>) -> SurfaceResult<Image> {
    let path = path.as_ref();
    tracing::debug!("Loading image: {:?}", path);
    let rgba = image::open(path)?.to_rgba8();
    tracing::info!(
        "Image loaded: {:?} ({}x{})",
        path,
        rgba.width(),
        rgba.height()
    );
    Ok(from_rgba_image(&rgba))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::surface::argb;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sutu-canvas-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_to_rgba_unpremultiplies() {
        let img = Image::filled(1, 1, argb(128, 128, 0, 0));
        let rgba = to_rgba_image(&img).unwrap();
        assert_eq!(rgba.get_pixel(0, 0).0, [255, 0, 0, 128]);
    }

    #[test]
    fn test_from_rgba_premultiplies() {
        let rgba = RgbaImage::from_raw(2, 1, vec![255, 0, 0, 128, 9, 9, 9, 0]).unwrap();
        let img = from_rgba_image(&rgba);
        assert_eq!(img.pixel(0, 0), Some(argb(128, 128, 0, 0)));
        assert_eq!(img.pixel(1, 0), Some(0));
    }

    #[test]
    fn test_save_and_load_png() {
        let path = temp_path("save_load.png");
        let mut img = Image::new(3, 2);
        img.set_pixel(0, 0, 0xFFFF_0000);
        img.set_pixel(2, 1, 0xFF00_00FF);

        save_png(&img, &path).unwrap();
        let loaded = load_image(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, img);
    }

    #[test]
    fn test_save_ignores_extension() {
        let path = temp_path("not_really.bin");
        save_png(&Image::filled(1, 1, 0xFF00_FF00), &path).unwrap();
        let format = image::ImageReader::open(&path)
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .format();
        std::fs::remove_file(&path).ok();

        assert_eq!(format, Some(ImageFormat::Png));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_image(temp_path("does_not_exist.png"));
        assert!(matches!(
            result,
            Err(SurfaceError::Image(_)) | Err(SurfaceError::Io(_))
        ));
    }
}
