//! End-to-end mosaic assembly over synthetic panned captures.

use std::sync::Once;

use common::LogConfig;
use glam::DVec2;
use mosaic::{
    assemble, build_mosaic, ByteImage, ImageDimensions, MosaicConfig, PositionedImage, Transform,
    ValidityMask,
};

const PERIOD: usize = 180;
const FRAME_WIDTH: usize = 60;
const FRAME_HEIGHT: usize = 30;
const STEP: usize = 45;

static LOGGING: Once = Once::new();

fn init_logging() {
    LOGGING.call_once(|| common::setup_logging(&LogConfig::default().with_level("warn")));
}

/// Cylindrical scene value, periodic in x.
fn scene(x: usize, y: usize, c: usize) -> u8 {
    (1 + ((x % PERIOD) * 3 + y * 5 + c * 60) % 250) as u8
}

fn capture(x0: usize, gain: f64) -> ByteImage {
    ByteImage::from_fn(ImageDimensions::new(FRAME_WIDTH, FRAME_HEIGHT, 3), |x, y, c| {
        (scene(x0 + x, y, c) as f64 * gain).round().clamp(0.0, 255.0) as u8
    })
}

/// A full turn: frames every `STEP` columns, the last one repeating the first capture.
fn full_turn(gains: &[f64], drift_per_frame: f64) -> Vec<PositionedImage> {
    let frames = PERIOD / STEP;
    (0..=frames)
        .map(|i| {
            let x0 = i * STEP;
            let gain = gains.get(i).copied().unwrap_or(1.0);
            let name = if i == frames { "frame_0".to_string() } else { format!("frame_{i}") };
            PositionedImage::new(
                capture(x0, gain),
                Transform::translation(DVec2::new(x0 as f64, i as f64 * drift_per_frame)),
                name,
            )
        })
        .collect()
}

fn channel_distance(a: &[u8], b: [u8; 3]) -> i32 {
    a.iter()
        .zip(b)
        .map(|(&a, b)| (a as i32 - b as i32).abs())
        .max()
        .unwrap_or(0)
}

#[test]
fn full_turn_unwraps_to_one_period() {
    init_logging();
    let images = full_turn(&[], 0.0);
    let result = assemble(&images, &MosaicConfig::with_blend_width(10.0)).unwrap();

    assert!(result.is_panorama_360);
    assert_eq!(result.mosaic_dimensions.width, PERIOD + FRAME_WIDTH);
    assert_eq!(result.image.dimensions(), ImageDimensions::new(PERIOD, FRAME_HEIGHT, 3));

    for y in 0..FRAME_HEIGHT - 1 {
        for x in 1..PERIOD {
            let expected = [scene(x, y, 0), scene(x, y, 1), scene(x, y, 2)];
            let d = channel_distance(result.image.pixel(x, y), expected);
            assert!(d <= 1, "pixel ({}, {}) off by {}", x, y, d);
        }
    }
}

#[test]
fn exposure_mismatch_is_evened_out() {
    init_logging();
    let images = full_turn(&[1.0, 1.0, 0.9], 0.0);
    let result = assemble(&images, &MosaicConfig::with_blend_width(10.0)).unwrap();

    let dimmed = &result.images[2].stats;
    assert!(dimmed.exposure_samples > 0);
    assert!((dimmed.luma_scale - 1.0 / 0.9).abs() < 0.02, "scale {}", dimmed.luma_scale);

    // Interior of the dimmed frame, away from its seams.
    let y = FRAME_HEIGHT / 2;
    for x in 2 * STEP + 15..2 * STEP + 40 {
        let expected = [scene(x, y, 0), scene(x, y, 1), scene(x, y, 2)];
        let d = channel_distance(result.image.pixel(x, y), expected);
        assert!(d <= 4, "pixel ({}, {}) off by {}", x, y, d);
    }
}

#[test]
fn vertical_drift_is_measured_between_loop_ends() {
    init_logging();
    let images = full_turn(&[], 1.0);
    let result = assemble(&images, &MosaicConfig::with_blend_width(10.0)).unwrap();

    let frames = PERIOD / STEP;
    let mosaic_height = FRAME_HEIGHT + frames;
    assert_eq!(result.mosaic_dimensions.height, mosaic_height);
    assert!((result.drift.slope - (-(frames as f64) / PERIOD as f64)).abs() < 1e-9);
    let vertical_scale = FRAME_HEIGHT as f64 / mosaic_height as f64;
    assert!((result.drift.vertical_scale - vertical_scale).abs() < 1e-9);
    assert_eq!(result.image.dimensions(), ImageDimensions::new(PERIOD, mosaic_height, 3));

    // Output (90, 20) samples mosaic row 20 * 30 / 34 - 2, inside the drifted frames.
    let inside = result.image.pixel(PERIOD / 2, 20);
    assert!(inside.iter().any(|&v| v > 0));
}

#[test]
fn assembly_is_deterministic() {
    let images = full_turn(&[1.0, 1.1, 0.95, 1.0], 0.5);
    let a = build_mosaic(&images, 12.0).unwrap();
    let b = build_mosaic(&images, 12.0).unwrap();
    assert_eq!(a, b);
}

#[test]
fn validity_mask_keeps_real_black() {
    init_logging();
    let mut first = capture(0, 1.0);
    for y in 0..FRAME_HEIGHT {
        for x in 50..55 {
            first.pixel_mut(x, y).fill(0);
        }
    }
    let second = capture(STEP, 1.0);
    let placed = |image: ByteImage, x0: usize, name: &str| {
        PositionedImage::new(image, Transform::translation(DVec2::new(x0 as f64, 0.0)), name)
    };
    let mask = ValidityMask::new_filled(ImageDimensions::new(FRAME_WIDTH, FRAME_HEIGHT, 1), true);

    let sentinel = build_mosaic(
        &[placed(first.clone(), 0, "a"), placed(second.clone(), STEP, "b")],
        10.0,
    )
    .unwrap();
    let masked = build_mosaic(
        &[placed(first, 0, "a").with_mask(mask), placed(second, STEP, "b")],
        10.0,
    )
    .unwrap();

    let (x, y) = (52, 10);
    let expected = [scene(x, y, 0), scene(x, y, 1), scene(x, y, 2)];
    assert!(channel_distance(sentinel.pixel(x, y), expected) <= 1);

    let brightness = |p: &[u8]| p.iter().map(|&v| v as u32).sum::<u32>();
    assert!(brightness(masked.pixel(x, y)) < brightness(sentinel.pixel(x, y)));
}
