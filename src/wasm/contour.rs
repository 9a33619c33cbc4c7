//! Canvas-2D contour engine: drives the metaball field + marching squares
//! core and strokes the result, with a radial erase so the hero's center
//! stays clear.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};

use crate::config::{ContourConfig, Tier, CONTOUR_VISIBILITY_THRESHOLD};
use crate::contour::march::{marching_squares, Segment};
use crate::contour::ContourSim;
use crate::rng::XorShift32;
use crate::timing::{DeltaClock, FrameBudget};

use super::support::{self, SharedF32};

struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    cfg: ContourConfig,
    sim: ContourSim,
    rng: XorShift32,
    budget: FrameBudget,
    clock: DeltaClock,
    segments: Vec<Segment>,
    running: bool,
    opacity: SharedF32,
}

/// Mount the contour layer. A missing 2D context aborts silently — the
/// layer is decorative and must never take the page down with it.
pub fn start(
    canvas: HtmlCanvasElement,
    observed: &HtmlElement,
    opacity: SharedF32,
    tier: Tier,
) -> Result<(), JsValue> {
    let ctx = match canvas.get_context("2d")? {
        Some(obj) => obj.dyn_into::<CanvasRenderingContext2d>()?,
        None => {
            log::warn!("contour: no 2d context, layer disabled");
            return Ok(());
        }
    };

    let cfg = ContourConfig::for_tier(tier);
    let now = support::now_ms();
    let engine = Rc::new(RefCell::new(Engine {
        canvas,
        ctx,
        cfg,
        sim: ContourSim::new(cfg),
        rng: XorShift32::new(support::clock_seed()),
        budget: FrameBudget::new(cfg.target_fps),
        clock: DeltaClock::new(now, cfg.max_dt_ms as f64),
        segments: Vec::new(),
        running: true,
        opacity,
    }));

    engine.borrow_mut().resize();

    // window resize keeps the backing store and field grid in step
    {
        let engine = engine.clone();
        support::listen::<web_sys::Event>("resize", move |_| {
            engine.borrow_mut().resize();
        })?;
    }

    // animation loop, teacher-style recursive closure
    let frame = support::frame_closure();
    let raf_id = Rc::new(Cell::new(0));
    {
        let engine = engine.clone();
        let frame_handle = frame.clone();
        let raf = raf_id.clone();
        *frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            let mut e = engine.borrow_mut();
            if !e.running {
                return;
            }
            let now = support::now_ms();
            if e.budget.steps(now) > 0 {
                e.tick(now);
            }
            drop(e);
            support::schedule_frame(&frame_handle, &raf);
        }) as Box<dyn FnMut()>));
    }
    support::schedule_frame(&frame, &raf_id);

    // pause off-screen, resume with fresh clocks
    {
        let engine = engine.clone();
        let frame = frame.clone();
        let raf = raf_id.clone();
        support::observe_visibility(observed, CONTOUR_VISIBILITY_THRESHOLD, move |visible| {
            let mut e = engine.borrow_mut();
            let was = e.running;
            e.running = visible;
            if visible && !was {
                let now = support::now_ms();
                e.budget.reset(now);
                e.clock.reset(now);
                drop(e);
                support::schedule_frame(&frame, &raf);
            } else if !visible {
                drop(e);
                support::cancel_frame(&raf);
            }
        })?;
    }

    Ok(())
}

impl Engine {
    fn resize(&mut self) {
        let dpr = support::window().device_pixel_ratio();
        let dpr = if dpr > 0.0 { dpr.min(self.cfg.dpr_cap) } else { 1.0 };
        let w = self.canvas.client_width() as f64;
        let h = self.canvas.client_height() as f64;
        self.canvas.set_width((w * dpr).floor() as u32);
        self.canvas.set_height((h * dpr).floor() as u32);
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0).ok();
        self.sim.resize(w as f32, h as f32, &mut self.rng);
    }

    fn tick(&mut self, now: f64) {
        let dt = self.clock.tick(now) as f32;
        let time_sec = (now / 1000.0) as f32;
        self.sim.tick(dt, time_sec, &mut self.rng);
        self.draw();

        let opacity = self.opacity.get();
        self.canvas
            .style()
            .set_property("opacity", &format!("{opacity:.3}"))
            .ok();
    }

    fn draw(&mut self) {
        let w = self.canvas.client_width() as f64;
        let h = self.canvas.client_height() as f64;
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, w, h);

        let [sr, sg, sb] = self.cfg.stroke_rgb;
        for level in 0..self.cfg.levels {
            let (threshold, opacity, line_width) = self.sim.level_style(level);
            marching_squares(
                self.sim.field(),
                self.sim.cols(),
                self.sim.rows(),
                self.cfg.cell_size,
                threshold,
                &mut self.segments,
            );
            if self.segments.is_empty() {
                continue;
            }

            ctx.set_stroke_style_str(&format!("rgba({sr}, {sg}, {sb}, {opacity:.3})"));
            ctx.set_line_width(line_width as f64);
            ctx.set_line_cap("round");
            ctx.set_line_join("round");

            ctx.begin_path();
            for seg in &self.segments {
                ctx.move_to(seg[0] as f64, seg[1] as f64);
                ctx.line_to(seg[2] as f64, seg[3] as f64);
            }
            ctx.stroke();
        }

        self.erase_center(w, h);
    }

    /// Radial destination-out erase so contour lines never sit over the
    /// hero's central content.
    fn erase_center(&self, w: f64, h: f64) {
        let ctx = &self.ctx;
        ctx.save();
        if ctx.set_global_composite_operation("destination-out").is_err() {
            ctx.restore();
            return;
        }
        let cx = w / 2.0;
        let cy = h * 0.5;
        let mask_w = w * 0.38;
        let mask_h = h * 0.85;
        if let Ok(gradient) =
            ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, mask_w.max(mask_h))
        {
            gradient.add_color_stop(0.0, "rgba(0,0,0,1)").ok();
            gradient.add_color_stop(0.5, "rgba(0,0,0,0.8)").ok();
            gradient.add_color_stop(0.75, "rgba(0,0,0,0.3)").ok();
            gradient.add_color_stop(1.0, "rgba(0,0,0,0)").ok();
            ctx.set_fill_style_canvas_gradient(&gradient);
            ctx.begin_path();
            ctx.ellipse(cx, cy, mask_w, mask_h, 0.0, 0.0, std::f64::consts::PI * 2.0)
                .ok();
            ctx.fill();
        }
        ctx.restore();
    }
}
