#![cfg(not(target_arch = "wasm32"))]

//! Pointer → impulse mapping: aspect-corrected deltas and one splat per
//! consumed move.

use hero_fx_wasm::color::Rgb;
use hero_fx_wasm::pointer::{ColorCadence, Pointer};

const W: f32 = 1000.0;
const H: f32 = 500.0;

/// Canvas px for a target texcoord on a W×H canvas (texcoord y is flipped).
fn px_for(u: f32, v: f32) -> (f32, f32) {
    (u * W, (1.0 - v) * H)
}

#[test]
fn move_delta_is_aspect_corrected() {
    let mut p = Pointer::default();
    let c = Rgb::new(0.1, 0.1, 0.1);

    let (x0, y0) = px_for(0.2, 0.2);
    p.motion(x0, y0, W, H, c);
    // seed the previous position, then the gesture under test
    let (x1, y1) = px_for(0.25, 0.22);
    p.motion(x1, y1, W, H, c);

    // aspect 2.0: x delta unscaled (ar >= 1), y delta divided by ar
    assert!((p.delta_x - 0.05).abs() < 1e-6, "delta_x = {}", p.delta_x);
    assert!((p.delta_y - 0.01).abs() < 1e-6, "delta_y = {}", p.delta_y);
    assert!(p.moved);
}

#[test]
fn moved_flag_is_consumed_once() {
    let mut p = Pointer::default();
    let c = Rgb::default();
    p.motion(100.0, 100.0, W, H, c);
    p.motion(120.0, 110.0, W, H, c);
    assert!(p.moved);

    // exactly one splat per gesture
    assert!(p.take_moved());
    assert!(!p.take_moved());
    assert!(!p.moved);

    // still false until the next move event
    assert!(!p.take_moved());
    p.motion(130.0, 115.0, W, H, c);
    assert!(p.take_moved());
}

#[test]
fn zero_delta_move_does_not_raise_moved() {
    let mut p = Pointer::default();
    let c = Rgb::default();
    p.motion(100.0, 100.0, W, H, c);
    p.take_moved();
    p.motion(100.0, 100.0, W, H, c);
    assert!(!p.moved);
}

#[test]
fn press_snaps_without_a_delta() {
    let mut p = Pointer::default();
    p.press(-1, 250.0, 375.0, W, H, Rgb::new(0.2, 0.0, 0.0));
    assert!(p.down);
    assert!(!p.moved);
    assert_eq!(p.delta_x, 0.0);
    assert_eq!(p.delta_y, 0.0);
    assert_eq!(p.texcoord_x, 0.25);
    assert_eq!(p.texcoord_y, 0.25);
    assert_eq!(p.prev_texcoord_x, p.texcoord_x);

    p.release();
    assert!(!p.down);
}

#[test]
fn texcoord_y_is_flipped() {
    let mut p = Pointer::default();
    p.motion(0.0, 0.0, W, H, Rgb::default());
    // top of the canvas is texcoord 1
    assert_eq!(p.texcoord_y, 1.0);
    p.motion(0.0, H, W, H, Rgb::default());
    assert_eq!(p.texcoord_y, 0.0);
}

#[test]
fn color_cadence_fires_on_schedule_not_per_splat() {
    let mut cadence = ColorCadence::default();
    let speed = 10.0; // resample 10×/sec

    // 60 fps for one second → exactly 10 resamples
    let mut fired = 0;
    for _ in 0..60 {
        if cadence.due(1.0 / 60.0, speed) {
            fired += 1;
        }
    }
    assert_eq!(fired, 10);
}
