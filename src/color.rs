use crate::rng::XorShift32;

/// Linear RGB triple in [0, 1] (values above 1 are allowed transiently for
/// boosted click splats; the dye field is half-float).
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub fn new(r: f32, g: f32, b: f32) -> Rgb {
        Rgb { r, g, b }
    }

    pub fn scaled(self, k: f32) -> Rgb {
        Rgb::new(self.r * k, self.g * k, self.b * k)
    }
}

/// HSV → RGB, h/s/v in [0, 1].
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb {
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match (i as i32).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb::new(r, g, b)
}

/// Dye color for a pointer: full-saturation random hue, dimmed so repeated
/// splats accumulate instead of clipping.
pub fn sample_dye_color(rng: &mut XorShift32) -> Rgb {
    hsv_to_rgb(rng.next_f32(), 1.0, 1.0).scaled(0.15)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Rgb::new(1.0, 0.0, 0.0));
        let g = hsv_to_rgb(1.0 / 3.0, 1.0, 1.0);
        assert!(g.g > 0.99 && g.r < 0.01 && g.b < 0.01);
    }

    #[test]
    fn dye_colors_are_dim() {
        let mut rng = XorShift32::new(7);
        for _ in 0..100 {
            let c = sample_dye_color(&mut rng);
            assert!(c.r <= 0.15 && c.g <= 0.15 && c.b <= 0.15);
        }
    }
}
