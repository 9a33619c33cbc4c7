#![cfg(not(target_arch = "wasm32"))]

//! Off-GPU checks of the fluid pipeline's shared arithmetic: the Gaussian
//! splat falloff, the click impulse and the double-buffer role exchange.

use hero_fx_wasm::buffers::RolePair;
use hero_fx_wasm::rng::XorShift32;
use hero_fx_wasm::splat::{click_impulse, correct_radius, splat_weight};

const RADIUS: f32 = 0.2 / 100.0;

#[test]
fn splat_peaks_at_its_center() {
    let w = splat_weight(0.5, 0.5, 0.5, 0.5, RADIUS, 1.0);
    assert_eq!(w, 1.0);
}

#[test]
fn splat_is_local() {
    // near the center: substantial contribution
    let near = splat_weight(0.51, 0.5, 0.5, 0.5, RADIUS, 1.0);
    assert!(near > 0.9);

    // far texels are numerically unchanged within one step
    let far = splat_weight(0.9, 0.9, 0.5, 0.5, RADIUS, 1.0);
    assert!(far < 1e-6, "far field contaminated: {far}");

    // monotone falloff with distance
    let mid = splat_weight(0.53, 0.5, 0.5, 0.5, RADIUS, 1.0);
    assert!(near > mid && mid > far);
}

#[test]
fn splat_accumulation_is_additive() {
    // the stage computes base + weight·color, so two splats at the same
    // point stack linearly
    let base = 0.25;
    let w = splat_weight(0.505, 0.5, 0.5, 0.5, RADIUS, 1.0);
    let once = base + w * 0.1;
    let twice = once + w * 0.1;
    assert!((twice - base - 2.0 * w * 0.1).abs() < 1e-6);
}

#[test]
fn aspect_squeezes_the_horizontal_falloff() {
    // with aspect > 1 the same u offset counts for more distance
    let round = splat_weight(0.6, 0.5, 0.5, 0.5, RADIUS, 1.0);
    let wide = splat_weight(0.6, 0.5, 0.5, 0.5, RADIUS, 2.0);
    assert!(wide < round);

    // and the radius correction compensates on wide canvases
    assert_eq!(correct_radius(RADIUS, 2.0), RADIUS * 2.0);
    assert_eq!(correct_radius(RADIUS, 0.5), RADIUS);
}

#[test]
fn click_impulse_is_bounded() {
    let mut rng = XorShift32::new(99);
    for _ in 0..1_000 {
        let (dx, dy) = click_impulse(&mut rng);
        assert!(dx.abs() <= 5.0);
        assert!(dy.abs() <= 15.0);
    }
}

#[test]
fn role_pair_swap_moves_no_data() {
    // simulate the write→swap cadence of every pipeline stage
    let mut pair = RolePair::new(vec![0.0f32; 4], vec![0.0f32; 4]);
    pair.write_mut().copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
    pair.swap();
    assert_eq!(pair.read().as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    // the stale frame is now the write target, ready to be overwritten
    assert_eq!(pair.write().as_slice(), &[0.0; 4]);

    pair.swap();
    pair.swap();
    assert_eq!(pair.read().as_slice(), &[1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn resize_replacement_carries_the_read_half() {
    // mirror of the framebuffer resize: the read half is copied forward
    // into the new size, the write half starts fresh
    let mut pair = RolePair::new(vec![7.0f32; 4], vec![0.0f32; 4]);
    let carried: Vec<f32> = pair.read().iter().copied().chain([7.0; 4]).collect();
    pair.replace(carried, vec![0.0f32; 8]);
    assert_eq!(pair.read().len(), 8);
    assert!(pair.read().iter().all(|&v| v == 7.0), "content lost on resize");
}
