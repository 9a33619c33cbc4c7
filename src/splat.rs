//! Pure mirror of the splat stage: the Gaussian falloff and impulse rules
//! the GPU pass applies, shared here so locality and additivity are
//! checkable without a GL context.

use crate::rng::XorShift32;

/// Weight of a splat centered at `(cx, cy)` sampled at `(u, v)`, with the
/// x distance pre-scaled by the canvas aspect ratio. Matches
/// `exp(-dot(p, p) / radius)` in the fragment stage.
#[inline]
pub fn splat_weight(u: f32, v: f32, cx: f32, cy: f32, radius: f32, aspect: f32) -> f32 {
    let px = (u - cx) * aspect;
    let py = v - cy;
    (-(px * px + py * py) / radius).exp()
}

/// Wide canvases stretch the splat radius so the disc stays visually round.
#[inline]
pub fn correct_radius(radius: f32, aspect: f32) -> f32 {
    if aspect > 1.0 {
        radius * aspect
    } else {
        radius
    }
}

/// Random outward impulse for a click splat; y gets a stronger kick.
pub fn click_impulse(rng: &mut XorShift32) -> (f32, f32) {
    (
        10.0 * (rng.next_f32() - 0.5),
        30.0 * (rng.next_f32() - 0.5),
    )
}
