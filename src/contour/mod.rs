//! Metaball scalar-field simulation behind the topographic contour layer.
//!
//! A fixed batch of circular influence sources drifts inside a margin-inset
//! rectangle; every rendered frame the field is resampled on a coarse grid
//! and handed to marching squares per contour level.

pub mod march;

use crate::config::ContourConfig;
use crate::rng::XorShift32;

use std::f32::consts::PI;

/// One moving, pulsing field contributor.
#[derive(Clone, Copy, Debug)]
pub struct InfluenceSource {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub phase: f32,
    pub pulse_speed: f32,
    pub pulse_amt: f32,
}

impl InfluenceSource {
    fn spawn(w: f32, h: f32, cfg: &ContourConfig, rng: &mut XorShift32) -> InfluenceSource {
        let radius = rng.range(cfg.min_radius, cfg.max_radius);
        let speed = rng.range(cfg.speed_min, cfg.speed_max);
        let heading = rng.next_f32() * PI * 2.0;
        InfluenceSource {
            x: radius + rng.next_f32() * (w - radius * 2.0).max(0.0),
            y: radius + rng.next_f32() * (h - radius * 2.0).max(0.0),
            vx: heading.cos() * speed,
            vy: heading.sin() * speed,
            radius,
            phase: rng.next_f32() * PI * 2.0,
            pulse_speed: rng.range(0.08, 0.2),
            pulse_amt: rng.range(0.05, 0.13),
        }
    }

    /// Time-modulated radius.
    #[inline]
    pub fn effective_radius(&self, time_sec: f32) -> f32 {
        self.radius * (1.0 + (time_sec * self.pulse_speed + self.phase).sin() * self.pulse_amt)
    }
}

/// Field grid plus the source batch that feeds it.
pub struct ContourSim {
    cfg: ContourConfig,
    width: f32,
    height: f32,
    cols: usize,
    rows: usize,
    field: Vec<f32>,
    sources: Vec<InfluenceSource>,
}

impl ContourSim {
    pub fn new(cfg: ContourConfig) -> ContourSim {
        ContourSim {
            cfg,
            width: 0.0,
            height: 0.0,
            cols: 0,
            rows: 0,
            field: Vec::new(),
            sources: Vec::new(),
        }
    }

    pub fn config(&self) -> &ContourConfig {
        &self.cfg
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn field(&self) -> &[f32] {
        &self.field
    }

    pub fn sources(&self) -> &[InfluenceSource] {
        &self.sources
    }

    /// Reallocate the grid for a new canvas size. Sources are created only
    /// once per session; on later resizes they are clamped into the new
    /// bounds instead of being respawned.
    pub fn resize(&mut self, w: f32, h: f32, rng: &mut XorShift32) {
        self.width = w;
        self.height = h;
        let cell = self.cfg.cell_size;
        self.cols = (w / cell).ceil() as usize + 1;
        self.rows = (h / cell).ceil() as usize + 1;
        self.field = vec![0.0; self.cols * self.rows];

        if self.sources.is_empty() {
            self.sources = (0..self.cfg.source_count)
                .map(|_| InfluenceSource::spawn(w, h, &self.cfg, rng))
                .collect();
        } else {
            let m = self.cfg.margin;
            for s in &mut self.sources {
                s.x = s.x.min(w - m).max(m);
                s.y = s.y.min(h - m).max(m);
            }
        }
    }

    /// Advance sources by `dt_ms` and resample the field at `time_sec`.
    pub fn tick(&mut self, dt_ms: f32, time_sec: f32, rng: &mut XorShift32) {
        let dt = dt_ms.min(self.cfg.max_dt_ms);
        self.update_sources(dt, rng);
        self.recompute_field(time_sec);
    }

    fn update_sources(&mut self, dt: f32, rng: &mut XorShift32) {
        let (w, h) = (self.width, self.height);
        let margin = self.cfg.margin;
        let max_speed = self.cfg.speed_max * 1.3;
        let min_speed = self.cfg.speed_min * 0.7;

        for s in &mut self.sources {
            s.x += s.vx * dt;
            s.y += s.vy * dt;

            if s.x < margin {
                s.x = margin;
                s.vx = s.vx.abs();
            }
            if s.x > w - margin {
                s.x = w - margin;
                s.vx = -s.vx.abs();
            }
            if s.y < margin {
                s.y = margin;
                s.vy = s.vy.abs();
            }
            if s.y > h - margin {
                s.y = h - margin;
                s.vy = -s.vy.abs();
            }

            // bounded random walk on the heading
            s.vx += (rng.next_f32() - 0.5) * 0.001 * dt;
            s.vy += (rng.next_f32() - 0.5) * 0.001 * dt;

            let speed = (s.vx * s.vx + s.vy * s.vy).sqrt();
            if speed > max_speed {
                s.vx = s.vx / speed * max_speed;
                s.vy = s.vy / speed * max_speed;
            } else if speed < min_speed && speed > 0.0 {
                s.vx = s.vx / speed * min_speed;
                s.vy = s.vy / speed * min_speed;
            }
        }
    }

    fn recompute_field(&mut self, time_sec: f32) {
        let cell = self.cfg.cell_size;
        for j in 0..self.rows {
            let py = j as f32 * cell;
            let row = j * self.cols;
            for i in 0..self.cols {
                let px = i as f32 * cell;
                let mut sum = 0.0;
                for s in &self.sources {
                    let r = s.effective_radius(time_sec);
                    let dx = px - s.x;
                    let dy = py - s.y;
                    sum += r * r / (dx * dx + dy * dy + 1.0);
                }
                self.field[row + i] = sum;
            }
        }
    }

    /// Per-level threshold, opacity and line width. Level 0 is the most
    /// prominent; both visual attributes decay linearly to a floor.
    pub fn level_style(&self, level: usize) -> (f32, f32, f32) {
        let threshold = self.cfg.threshold_base + level as f32 * self.cfg.threshold_step;
        let opacity = (self.cfg.base_opacity - level as f32 * self.cfg.opacity_decay)
            .max(self.cfg.opacity_floor);
        let width = (self.cfg.line_width_base - level as f32 * self.cfg.line_width_decay)
            .max(self.cfg.line_width_floor);
        (threshold, opacity, width)
    }
}
