//! Scenario tests across tiles, surface, brush and controller

#![allow(clippy::unwrap_used)]

use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::brush::{BrushSettings, SoftRoundBrush};
use crate::controller::SurfaceController;
use crate::core::CanvasConfig;

const T: i32 = TILE_SIZE as i32;
const ONE: u16 = FIXED_ONE as u16;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("sutu-canvas-{}-{}", std::process::id(), name))
}

#[test]
fn test_write_commit_save_single_pixel() {
    let mut surface = Surface::new(128, 128).unwrap();
    assert_eq!((surface.tile_count_x(), surface.tile_count_y()), (2, 2));

    let buffer = surface.request_write_buffer(0, 0);
    buffer[..4].copy_from_slice(&[ONE, 0, 0, ONE]);
    surface.commit_write_buffer(0, 0);

    assert_eq!(surface.tile_indices(), vec![TileIndex::new(0, 0)]);
    let expected = argb(
        to_display_channel(ONE),
        to_display_channel(ONE),
        to_display_channel(0),
        to_display_channel(0),
    );
    assert_eq!(expected, 0xFFFF_0000);
    let tile = surface.tile(TileIndex::new(0, 0)).unwrap();
    assert_eq!(tile.display().pixel(0, 0), Some(expected));

    let path = temp_path("single_pixel.png");
    surface.save(&path).unwrap();
    let saved = image::open(&path).unwrap().to_rgba8();
    std::fs::remove_file(&path).ok();

    assert_eq!(saved.dimensions(), (128, 128));
    for (x, y, pixel) in saved.enumerate_pixels() {
        if (x, y) == (0, 0) {
            assert_eq!(pixel.0, [255, 0, 0, 255]);
        } else {
            assert_eq!(pixel.0[3], 0, "pixel ({}, {}) not transparent", x, y);
        }
    }
}

#[test]
fn test_index_round_trip_snaps_to_nearest_tile() {
    for p in -300..300 {
        let index = TileIndex::from_pixel_position(Point::new(p, -p));
        let snapped = index.to_pixel_position();

        assert_eq!(snapped.x % T, 0);
        assert_eq!(snapped.y % T, 0);
        assert!((snapped.x - p).abs() <= T / 2, "p = {}", p);
        assert!((snapped.y + p).abs() <= T / 2, "p = {}", p);
        // Snapping a snapped position is a no-op
        assert_eq!(TileIndex::from_pixel_position(snapped), index);
    }
}

#[test]
fn test_lazy_materialization() {
    let mut surface = Surface::new(512, 512).unwrap();
    assert_eq!(surface.tile_count(), 0);

    let index = TileIndex::new(3, 2);
    let tile = surface.get_tile(index);
    assert!(tile.buffer().iter().all(|&v| v == 0));
    assert!(tile.display().is_fully_transparent());
    tile.write_buffer(false)[100] = 1234;
    let first = tile as *const Tile;

    let again = surface.get_tile(index);
    assert_eq!(again as *const Tile, first);
    assert_eq!(again.buffer()[100], 1234);
    assert_eq!(surface.tile_count(), 1);
}

#[test]
fn test_transparent_composite_culls_populated_tile() {
    let mut surface = Surface::new(128, 128).unwrap();
    surface.request_write_buffer(1, 1);
    surface.commit_write_buffer(1, 1);
    assert!(surface.contains_tile(TileIndex::new(1, 1)));

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    surface.subscribe(move |e: &SurfaceEvent| sink.borrow_mut().push(*e));

    surface.composite_image_at(&Image::new(T as u32, T as u32), Point::new(T, T));

    assert_eq!(surface.tile_count(), 0);
    assert_eq!(
        *events.borrow(),
        vec![SurfaceEvent::TileCleared {
            rect: Rect::new(T, T, T, T)
        }]
    );
}

#[test]
fn test_lossy_round_trip_is_deterministic_and_settles() {
    let round_trip = |v: u16| to_linear_channel(to_display_channel(v));

    for v in 0..=ONE {
        let once = round_trip(v);
        assert_eq!(round_trip(v), once);
        // Each further pass can only lose precision, never gain it
        assert!(round_trip(once) <= once);
    }

    // Only black and full scale survive repeated trips unchanged
    let fixed: Vec<u16> = (0..=ONE).filter(|&v| round_trip(v) == v).collect();
    assert_eq!(fixed, vec![0, ONE]);

    // Every 8-bit level except the ends drifts down by exactly one
    for level in 1..=254u8 {
        assert_eq!(to_display_channel(to_linear_channel(level)), level - 1);
    }
}

#[test]
fn test_clear_then_fresh_tiles() {
    let mut surface = Surface::new(256, 256).unwrap();
    let populated = [TileIndex::new(0, 0), TileIndex::new(2, 3), TileIndex::new(-1, 1)];
    for index in populated {
        surface.get_tile(index).write_buffer(false).fill(ONE);
    }

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    surface.subscribe(move |e: &SurfaceEvent| sink.borrow_mut().push(*e));
    surface.clear();

    assert_eq!(surface.tile_count(), 0);
    assert_eq!(*events.borrow(), vec![SurfaceEvent::SurfaceCleared]);

    for index in populated {
        let tile = surface.get_tile(index);
        assert!(tile.buffer().iter().all(|&v| v == 0));
        assert!(tile.is_cache_valid());
    }
}

#[test]
fn test_brush_stroke_reaches_display_layer() {
    let config = CanvasConfig {
        width: 256,
        height: 256,
        brush: BrushSettings {
            radius: 4.0,
            hardness: 1.0,
            pressure_size: false,
            color: [1.0, 0.0, 0.0],
            ..Default::default()
        },
    };
    let mut controller = SurfaceController::from_config(&config).unwrap();
    let dirty = DirtyRegion::new();
    controller.subscribe(dirty.clone());

    controller.begin_stroke();
    controller.stroke_to(56.0, 20.0, 0.7, 0.0, 0.0, 0.0);
    controller.stroke_to(76.0, 20.0, 0.7, 0.0, 0.0, 0.008);
    let bounds = controller.end_stroke().unwrap();

    let snapshot = dirty.take();
    assert_eq!(
        snapshot.tiles.iter().copied().collect::<Vec<_>>(),
        vec![TileIndex::new(0, 0), TileIndex::new(1, 0)]
    );
    assert!(snapshot.bounds.contains_rect(&bounds));
    assert!(!snapshot.full_repaint);
    assert!(dirty.is_empty());

    // Hard, fully opaque red along the stroke; nothing away from it
    assert_eq!(controller.pick_color(Point::new(65, 20)), Some(0xFFFF_0000));
    assert_eq!(controller.pick_color(Point::new(65, 40)), Some(0));

    // Committed display matches what was picked from the buffer
    let tile = controller.surface().tile(TileIndex::new(1, 0)).unwrap();
    assert!(tile.is_cache_valid());
    assert_eq!(tile.display().pixel(1, 20), Some(0xFFFF_0000));
}

#[test]
fn test_stroke_then_clear_requests_full_repaint() {
    let mut controller =
        SurfaceController::with_size(128, 128, SoftRoundBrush::new()).unwrap();
    let dirty = DirtyRegion::new();
    controller.subscribe(dirty.clone());

    controller.stroke_to(10.0, 10.0, 1.0, 0.0, 0.0, 0.0);
    controller.end_stroke();
    controller.clear();

    let snapshot = dirty.take();
    assert!(snapshot.full_repaint);
    assert!(snapshot.tiles.is_empty());
    assert_eq!(controller.surface().tile_count(), 0);
}

#[test]
fn test_stroke_on_zero_area_surface_is_discarded() {
    let mut controller = SurfaceController::with_size(0, 0, SoftRoundBrush::new()).unwrap();
    controller.stroke_to(10.0, 10.0, 1.0, 0.0, 0.0, 0.0);
    controller.stroke_to(200.0, 10.0, 1.0, 0.0, 0.0, 0.0);
    controller.end_stroke();

    assert_eq!(controller.surface().tile_count(), 0);
}

#[test]
fn test_stroke_beyond_canvas_grows_tile_bound() {
    let mut controller =
        SurfaceController::with_size(64, 64, SoftRoundBrush::new()).unwrap();
    controller.stroke_to(300.0, 10.0, 1.0, 0.0, 0.0, 0.0);
    controller.end_stroke();

    assert!(controller.surface().tile_count_x() >= 5);
    assert!(controller.surface().contains_tile(TileIndex::new(4, 0)));
    // Off-canvas paint never reaches the flattened output
    assert!(controller.surface().flatten().is_fully_transparent());
}
