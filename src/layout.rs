//! Layout math bridging DOM rectangles and shader UV space.
//!
//! The fluid canvas spans the viewport while the revealed image must sit
//! exactly over a separately scrolling DOM element, so its placement is
//! re-derived every frame from live bounding boxes and handed to the
//! display stage as a UV sub-rectangle. The cover-fit remap here is the
//! same arithmetic the fragment stage performs, kept in Rust so it can be
//! exercised off-GPU.

/// Screen-space rectangle in CSS px (origin top-left).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RectPx {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl RectPx {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Placement in the canvas's UV space: left/bottom origin, Y up.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct UvRect {
    pub left: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

/// Convert the photo container's screen rect into canvas UV space.
pub fn photo_rect_uv(canvas: &RectPx, photo: &RectPx) -> UvRect {
    UvRect {
        left: ((photo.left - canvas.left) / canvas.width) as f32,
        bottom: ((canvas.bottom() - photo.bottom()) / canvas.height) as f32,
        width: (photo.width / canvas.width) as f32,
        height: (photo.height / canvas.height) as f32,
    }
}

/// Map a canvas UV (Y already flipped to screen orientation) into the photo
/// rect's local [0,1]² space. Values outside [0,1] mean the fragment is
/// outside the photo region.
#[inline]
pub fn to_photo_space(flipped_u: f32, flipped_v: f32, rect: &UvRect) -> (f32, f32) {
    (
        (flipped_u - rect.left) / rect.width,
        (flipped_v - rect.bottom) / rect.height,
    )
}

/// "Cover, anchor bottom" fit of the image inside the photo rect:
/// a relatively wider image is height-fit and re-centered horizontally; a
/// relatively taller one is width-fit and pinned to the bottom edge.
#[inline]
pub fn cover_anchor_bottom(
    u: f32,
    v: f32,
    image_aspect: f32,
    rect_aspect: f32,
) -> (f32, f32) {
    if image_aspect > rect_aspect {
        let scale = image_aspect / rect_aspect;
        ((u - 0.5) / scale + 0.5, v)
    } else {
        let scale = rect_aspect / image_aspect;
        (u, v / scale - (1.0 / scale - 1.0))
    }
}

#[inline]
pub fn in_unit_square(u: f32, v: f32) -> bool {
    (0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v)
}

/// Soft reveal mask from the brightest dye channel.
#[inline]
pub fn reveal_mask(dye_max: f32) -> f32 {
    smoothstep(0.0, 0.08, dye_max)
}

#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// What the display stage emits for one fragment — the Rust mirror of the
/// shader's branch structure.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FragmentPlan {
    /// Image not loaded: raw dye, alpha = brightest channel.
    RawDye,
    /// Outside the photo rect or the cover-fit bounds: dimmed dye.
    DimmedDye,
    /// Inside: sample the image at (u, v), masked by dye.
    Image { u: f32, v: f32 },
}

pub fn plan_fragment(
    uv: (f32, f32),
    rect: &UvRect,
    image_aspect: f32,
    rect_aspect: f32,
    image_ready: bool,
) -> FragmentPlan {
    if !image_ready {
        return FragmentPlan::RawDye;
    }
    let flipped = (uv.0, 1.0 - uv.1);
    let (pu, pv) = to_photo_space(flipped.0, flipped.1, rect);
    if !in_unit_square(pu, pv) {
        return FragmentPlan::DimmedDye;
    }
    let (iu, iv) = cover_anchor_bottom(pu, pv, image_aspect, rect_aspect);
    if !in_unit_square(iu, iv) {
        return FragmentPlan::DimmedDye;
    }
    FragmentPlan::Image { u: iu, v: iv }
}

// ── Resolution derivation ───────────────────────────────────────

/// Simulation grid size for a nominal resolution: the short canvas axis
/// gets `base` texels, the long axis scales by aspect.
pub fn sim_resolution(base: u32, drawing_w: u32, drawing_h: u32) -> (u32, u32) {
    let ar = drawing_w as f64 / drawing_h.max(1) as f64;
    let aspect = if ar < 1.0 { 1.0 / ar } else { ar };
    let min = base;
    let max = (base as f64 * aspect).round() as u32;
    if drawing_w > drawing_h {
        (max, min)
    } else {
        (min, max)
    }
}

/// CSS px → device px under a capped pixel ratio.
pub fn scale_by_pixel_ratio(css: f64, device_pixel_ratio: f64, cap: f64) -> u32 {
    let dpr = if device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(cap)
    } else {
        1.0
    };
    (css * dpr).floor() as u32
}
