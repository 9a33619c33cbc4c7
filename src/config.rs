//! Tunables for both hero engines and the scroll orchestration layer.
//!
//! Everything perf-sensitive is keyed by [`Tier`]: constrained devices get
//! fewer sources, coarser grids, lower simulation resolution and a lower
//! frame-rate target.

/// Device tier, chosen once at startup from the CSS viewport width.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tier {
    Desktop,
    Mobile,
}

/// Viewport width below which the mobile tier applies (CSS px).
pub const MOBILE_BREAKPOINT: f64 = 768.0;

impl Tier {
    pub fn for_viewport_width(css_px: f64) -> Tier {
        if css_px < MOBILE_BREAKPOINT {
            Tier::Mobile
        } else {
            Tier::Desktop
        }
    }
}

// ── Contour field renderer ──────────────────────────────────────

#[derive(Clone, Copy, Debug)]
pub struct ContourConfig {
    pub source_count: usize,
    /// Field sample spacing in CSS px.
    pub cell_size: f32,
    pub levels: usize,
    pub threshold_base: f32,
    pub threshold_step: f32,
    pub stroke_rgb: [u8; 3],
    pub base_opacity: f32,
    pub opacity_decay: f32,
    pub opacity_floor: f32,
    pub line_width_base: f32,
    pub line_width_decay: f32,
    pub line_width_floor: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Speed band in px/ms; the live band is soft: [min*0.7, max*1.3].
    pub speed_min: f32,
    pub speed_max: f32,
    /// Sources bounce off this inset from every canvas edge.
    pub margin: f32,
    pub dpr_cap: f64,
    pub target_fps: f64,
    /// Largest dt a single tick will integrate (ms).
    pub max_dt_ms: f32,
}

impl ContourConfig {
    pub fn for_tier(tier: Tier) -> ContourConfig {
        let mobile = tier == Tier::Mobile;
        ContourConfig {
            source_count: if mobile { 5 } else { 8 },
            cell_size: if mobile { 6.0 } else { 4.0 },
            levels: if mobile { 3 } else { 5 },
            threshold_base: 1.0,
            threshold_step: 0.35,
            stroke_rgb: [145, 140, 130],
            base_opacity: 0.45,
            opacity_decay: 0.18,
            opacity_floor: 0.05,
            line_width_base: 2.2,
            line_width_decay: 0.3,
            line_width_floor: 0.5,
            min_radius: 80.0,
            max_radius: 200.0,
            speed_min: 0.03,
            speed_max: 0.1,
            margin: 50.0,
            dpr_cap: 1.0,
            target_fps: 30.0,
            max_dt_ms: 50.0,
        }
    }
}

// ── Fluid reveal compositor ─────────────────────────────────────

#[derive(Clone, Copy, Debug)]
pub struct FluidConfig {
    pub sim_resolution: u32,
    pub dye_resolution: u32,
    pub density_dissipation: f32,
    pub velocity_dissipation: f32,
    /// Pressure carry-over factor applied each frame instead of a clear.
    pub pressure: f32,
    pub pressure_iterations: u32,
    /// Vorticity confinement strength.
    pub curl: f32,
    pub splat_radius: f32,
    pub splat_force: f32,
    pub shading: bool,
    /// Pointer colors are resampled this many times per simulated second.
    pub color_update_speed: f32,
    pub dpr_cap: f64,
    pub target_fps: f64,
    /// Minimum interval between processed pointer-move events (ms).
    pub pointer_throttle_ms: f64,
}

impl FluidConfig {
    pub fn for_tier(tier: Tier) -> FluidConfig {
        let mobile = tier == Tier::Mobile;
        FluidConfig {
            sim_resolution: if mobile { 64 } else { 128 },
            dye_resolution: if mobile { 512 } else { 1024 },
            density_dissipation: 3.5,
            velocity_dissipation: 2.0,
            pressure: 0.1,
            pressure_iterations: if mobile { 10 } else { 20 },
            curl: 3.0,
            splat_radius: 0.2,
            splat_force: 6000.0,
            shading: !mobile,
            color_update_speed: 10.0,
            dpr_cap: if mobile { 1.0 } else { 2.0 },
            target_fps: if mobile { 24.0 } else { 30.0 },
            pointer_throttle_ms: 16.0,
        }
    }

    /// Capability downgrade when linear filtering of float textures is
    /// unavailable: coarse dye, no per-pixel sheen.
    pub fn without_linear_filtering(mut self) -> FluidConfig {
        self.dye_resolution = 256;
        self.shading = false;
        self
    }
}

// ── Scroll orchestration ────────────────────────────────────────

/// One piecewise-linear transfer table: `domain[i] → range[i]`.
pub type Breakpoints = (&'static [f32], &'static [f32]);

/// Contour layer opacity over scroll progress.
pub const CONTOUR_OPACITY: Breakpoints = (&[0.0, 0.1, 0.4, 0.65], &[0.85, 1.0, 1.0, 0.0]);

/// Fluid layer opacity: full through most of the pin, gone at exit.
pub const FLUID_OPACITY: Breakpoints = (&[0.0, 0.55, 0.8], &[1.0, 1.0, 0.0]);

/// Hero image scale and opacity.
pub const HERO_IMAGE_SCALE: Breakpoints = (&[0.0, 0.5, 1.0], &[1.0, 1.05, 1.12]);
pub const HERO_IMAGE_OPACITY: Breakpoints = (&[0.0, 0.6, 0.85], &[1.0, 1.0, 0.0]);

/// Text reveal: opacity ramps in, then the block slides up and out.
pub const TEXT_OPACITY: Breakpoints = (&[0.0, 0.08, 0.5, 0.7], &[0.0, 1.0, 1.0, 0.0]);
pub const TEXT_OFFSET_PX: Breakpoints = (&[0.0, 0.08, 0.7], &[24.0, 0.0, -40.0]);
/// Text accepts pointer events only while readable.
pub const TEXT_INTERACTIVE: Breakpoints = (&[0.0, 0.08, 0.65, 0.7], &[0.0, 1.0, 1.0, 0.0]);

/// Background blend between entry and exit colors.
pub const BACKGROUND_BLEND: Breakpoints = (&[0.0, 0.75, 1.0], &[0.0, 0.0, 1.0]);
pub const BACKGROUND_FROM: [u8; 3] = [244, 245, 239];
pub const BACKGROUND_TO: [u8; 3] = [2, 6, 23];

/// Parallax translate magnitudes per layer (px at full pointer deflection).
pub const PARALLAX_CONTOUR: (f32, f32) = (18.0, 12.0);
pub const PARALLAX_IMAGE: (f32, f32) = (10.0, 7.0);
pub const PARALLAX_TEXT: (f32, f32) = (-6.0, -4.0);

/// Critically-damped spring stiffness for pointer smoothing.
pub const PARALLAX_STIFFNESS: f32 = 60.0;

/// IntersectionObserver thresholds per engine.
pub const CONTOUR_VISIBILITY_THRESHOLD: f64 = 0.05;
pub const FLUID_VISIBILITY_THRESHOLD: f64 = 0.1;
