#![cfg(not(target_arch = "wasm32"))]

//! Scroll transfer functions, progress computation and the parallax spring.

use hero_fx_wasm::config::{CONTOUR_OPACITY, PARALLAX_STIFFNESS};
use hero_fx_wasm::motion::{
    mix_rgb, normalize_pointer, parallax_offset, scroll_progress, Spring, Transfer,
};

#[test]
fn transfer_interpolates_and_clamps() {
    let t = Transfer::new((&[0.0, 0.1, 0.4, 0.65], &[0.85, 1.0, 1.0, 0.0]));
    assert_eq!(t.map(-1.0), 0.85);
    assert_eq!(t.map(0.0), 0.85);
    assert!((t.map(0.05) - 0.925).abs() < 1e-6);
    assert_eq!(t.map(0.1), 1.0);
    assert_eq!(t.map(0.25), 1.0);
    assert!((t.map(0.525) - 0.5).abs() < 1e-6);
    assert_eq!(t.map(0.65), 0.0);
    assert_eq!(t.map(2.0), 0.0);
}

#[test]
fn contour_opacity_table_matches_the_layer_fade() {
    let t = Transfer::new(CONTOUR_OPACITY);
    assert_eq!(t.map(0.0), 0.85);
    assert_eq!(t.map(0.2), 1.0);
    assert_eq!(t.map(1.0), 0.0);
}

#[test]
fn progress_is_normalized_and_clamped() {
    // 250vh section pinned over a 100vh viewport → 150vh of travel
    let (top, height, vh) = (0.0, 2500.0, 1000.0);
    assert_eq!(scroll_progress(-50.0, top, height, vh), 0.0);
    assert_eq!(scroll_progress(0.0, top, height, vh), 0.0);
    assert_eq!(scroll_progress(750.0, top, height, vh), 0.5);
    assert_eq!(scroll_progress(1500.0, top, height, vh), 1.0);
    assert_eq!(scroll_progress(9999.0, top, height, vh), 1.0);

    // degenerate section never divides by zero
    assert_eq!(scroll_progress(100.0, 0.0, 500.0, 1000.0), 0.0);
}

#[test]
fn spring_converges_without_sustained_oscillation() {
    let mut spring = Spring::new(PARALLAX_STIFFNESS);
    let dt = 1.0 / 60.0;
    let mut overshoot: f32 = 0.0;
    for _ in 0..600 {
        let v = spring.step(0.5, dt);
        overshoot = overshoot.max(v - 0.5);
    }
    assert!((spring.value() - 0.5).abs() < 1e-3, "did not settle");
    // critically damped: any discrete-step overshoot stays marginal
    assert!(overshoot < 0.02, "overshoot {overshoot}");
}

#[test]
fn spring_snap_resets_state() {
    let mut spring = Spring::new(PARALLAX_STIFFNESS);
    spring.step(1.0, 0.5);
    spring.snap(0.0);
    assert_eq!(spring.value(), 0.0);
    // no residual velocity after a snap
    let v = spring.step(0.0, 1.0 / 60.0);
    assert_eq!(v, 0.0);
}

#[test]
fn pointer_normalizes_to_half_open_box() {
    let (x, y) = normalize_pointer(500.0, 250.0, 0.0, 0.0, 1000.0, 500.0);
    assert_eq!((x, y), (0.0, 0.0));
    let (x, y) = normalize_pointer(1000.0, 0.0, 0.0, 0.0, 1000.0, 500.0);
    assert_eq!((x, y), (0.5, -0.5));
    // outside the rect clamps
    let (x, _) = normalize_pointer(5000.0, 0.0, 0.0, 0.0, 1000.0, 500.0);
    assert_eq!(x, 0.5);
    // zero-size rect is inert
    assert_eq!(normalize_pointer(10.0, 10.0, 0.0, 0.0, 0.0, 0.0), (0.0, 0.0));
}

#[test]
fn parallax_scales_per_layer() {
    assert_eq!(parallax_offset((0.5, -0.5), (18.0, 12.0)), (9.0, -6.0));
    // negative magnitudes move a layer against the pointer
    assert_eq!(parallax_offset((0.5, 0.5), (-6.0, -4.0)), (-3.0, -2.0));
}

#[test]
fn background_blend_endpoints() {
    assert_eq!(mix_rgb([244, 245, 239], [2, 6, 23], 0.0), [244, 245, 239]);
    assert_eq!(mix_rgb([244, 245, 239], [2, 6, 23], 1.0), [2, 6, 23]);
    let mid = mix_rgb([0, 0, 0], [100, 200, 50], 0.5);
    assert_eq!(mid, [50, 100, 25]);
}
