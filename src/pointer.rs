//! Pointer state feeding the fluid simulation.
//!
//! Coordinates live in texture space (origin bottom-left, Y flipped from
//! screen). Deltas are computed only between consecutive move events and
//! aspect-corrected so a diagonal gesture imparts an isotropic impulse; the
//! `moved` flag is consumed exactly once per simulation step.

use crate::color::Rgb;

#[derive(Clone, Copy, Debug)]
pub struct Pointer {
    pub id: i32,
    pub texcoord_x: f32,
    pub texcoord_y: f32,
    pub prev_texcoord_x: f32,
    pub prev_texcoord_y: f32,
    pub delta_x: f32,
    pub delta_y: f32,
    pub down: bool,
    pub moved: bool,
    pub color: Rgb,
}

impl Default for Pointer {
    fn default() -> Pointer {
        Pointer {
            id: -1,
            texcoord_x: 0.0,
            texcoord_y: 0.0,
            prev_texcoord_x: 0.0,
            prev_texcoord_y: 0.0,
            delta_x: 0.0,
            delta_y: 0.0,
            down: false,
            moved: false,
            color: Rgb::default(),
        }
    }
}

impl Pointer {
    /// Press: snaps both current and previous texcoords to the press point
    /// so the first subsequent move produces a clean delta.
    pub fn press(&mut self, id: i32, px: f32, py: f32, canvas_w: f32, canvas_h: f32, color: Rgb) {
        self.id = id;
        self.down = true;
        self.moved = false;
        self.texcoord_x = px / canvas_w;
        self.texcoord_y = 1.0 - py / canvas_h;
        self.prev_texcoord_x = self.texcoord_x;
        self.prev_texcoord_y = self.texcoord_y;
        self.delta_x = 0.0;
        self.delta_y = 0.0;
        self.color = color;
    }

    /// Move: rolls texcoords forward and derives the aspect-corrected
    /// delta. `moved` is raised iff the delta is nonzero.
    pub fn motion(&mut self, px: f32, py: f32, canvas_w: f32, canvas_h: f32, color: Rgb) {
        self.prev_texcoord_x = self.texcoord_x;
        self.prev_texcoord_y = self.texcoord_y;
        self.texcoord_x = px / canvas_w;
        self.texcoord_y = 1.0 - py / canvas_h;

        let aspect = canvas_w / canvas_h;
        self.delta_x = (self.texcoord_x - self.prev_texcoord_x) * if aspect < 1.0 { aspect } else { 1.0 };
        self.delta_y =
            (self.texcoord_y - self.prev_texcoord_y) * if aspect > 1.0 { 1.0 / aspect } else { 1.0 };
        self.moved = self.delta_x.abs() > 0.0 || self.delta_y.abs() > 0.0;
        self.color = color;
    }

    pub fn release(&mut self) {
        self.down = false;
    }

    /// Consumes the `moved` flag; the simulation splats once per `true`.
    pub fn take_moved(&mut self) -> bool {
        let m = self.moved;
        self.moved = false;
        m
    }
}

/// Cadence for pointer color resampling: colors change a fixed number of
/// times per simulated second, never per splat.
#[derive(Clone, Copy, Debug, Default)]
pub struct ColorCadence {
    timer: f32,
}

impl ColorCadence {
    /// Advances by `dt` seconds at `speed` changes/sec; true when a fresh
    /// color is due.
    pub fn due(&mut self, dt: f32, speed: f32) -> bool {
        self.timer += dt * speed;
        if self.timer >= 1.0 {
            self.timer %= 1.0;
            true
        } else {
            false
        }
    }
}
