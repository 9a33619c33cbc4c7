//! Fluid-to-image reveal compositor: a stable-fluids simulation on GPU
//! framebuffers whose dye density masks a hidden image aligned to a
//! tracked DOM rectangle.

mod gl;
mod passes;
mod program;
mod shaders;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Element, HtmlCanvasElement, HtmlElement, HtmlImageElement, WebGlTexture};

use crate::color::sample_dye_color;
use crate::config::{FluidConfig, Tier, FLUID_VISIBILITY_THRESHOLD};
use crate::layout::{photo_rect_uv, scale_by_pixel_ratio, RectPx};
use crate::pointer::{ColorCadence, Pointer};
use crate::rng::XorShift32;
use crate::splat::{click_impulse, correct_radius};
use crate::timing::{DeltaClock, FrameBudget};

use self::gl::Gl;
use self::passes::{Pipeline, SimBuffers};

use super::support::{self, SharedF32};

/// Largest dt one simulation step will integrate (one 60 Hz frame, ms).
const MAX_STEP_MS: f64 = 1000.0 / 60.0;

struct Engine {
    canvas: HtmlCanvasElement,
    photo: Element,
    gl: Gl,
    cfg: FluidConfig,
    pipe: Pipeline,
    bufs: Option<SimBuffers>,
    pointer: Pointer,
    cadence: ColorCadence,
    rng: XorShift32,
    budget: FrameBudget,
    clock: DeltaClock,
    last_move_ms: f64,
    armed: bool,
    visible: bool,
    image_texture: Option<WebGlTexture>,
    image_aspect: f32,
    opacity: SharedF32,
}

/// Mount the compositor. Any capability failure logs and leaves an inert
/// transparent canvas; nothing propagates to the host page.
pub fn start(
    canvas: HtmlCanvasElement,
    observed: &HtmlElement,
    photo: Element,
    opacity: SharedF32,
    tier: Tier,
) -> Result<(), JsValue> {
    let Some(gl) = Gl::acquire(&canvas) else {
        log::error!("fluid: no usable GL context, compositor disabled");
        return Ok(());
    };

    let mut cfg = FluidConfig::for_tier(tier);
    if !gl.linear_filtering {
        cfg = cfg.without_linear_filtering();
    }

    if let Err(e) = gl.init_quad() {
        log::error!("fluid: quad setup failed: {e:?}");
        return Ok(());
    }
    let pipe = match Pipeline::new(&gl, &cfg) {
        Ok(p) => p,
        Err(e) => {
            log::error!("fluid: shader setup failed: {e:?}");
            return Ok(());
        }
    };

    let image_src = photo.get_attribute("data-reveal-src");

    let now = support::now_ms();
    let engine = Rc::new(RefCell::new(Engine {
        canvas,
        photo,
        gl,
        cfg,
        pipe,
        bufs: None,
        pointer: Pointer::default(),
        cadence: ColorCadence::default(),
        rng: XorShift32::new(support::clock_seed()),
        budget: FrameBudget::new(cfg.target_fps),
        clock: DeltaClock::new(now, MAX_STEP_MS),
        last_move_ms: 0.0,
        armed: false,
        visible: true,
        image_texture: None,
        image_aspect: 1.0,
        opacity,
    }));

    {
        let mut e = engine.borrow_mut();
        e.resize_canvas();
        match passes::init_buffers(&e.gl, &e.pipe.copy, &e.cfg, None, e.canvas.width(), e.canvas.height()) {
            Ok(bufs) => e.bufs = Some(bufs),
            Err(err) => {
                log::error!("fluid: framebuffer allocation failed: {err:?}");
                return Ok(());
            }
        }
    }

    if let Some(src) = image_src {
        load_image(&engine, &src)?;
    } else {
        log::warn!("fluid: photo container has no data-reveal-src, dye-only mode");
    }

    // frame loop
    let frame = support::frame_closure();
    let raf_id = Rc::new(Cell::new(0));
    {
        let engine = engine.clone();
        let frame_handle = frame.clone();
        let raf = raf_id.clone();
        *frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            let mut e = engine.borrow_mut();
            if !e.visible {
                return;
            }
            let now = support::now_ms();
            if e.budget.steps(now) > 0 {
                e.frame(now);
            }
            drop(e);
            support::schedule_frame(&frame_handle, &raf);
        }) as Box<dyn FnMut()>));
    }

    wire_pointer_events(&engine, &frame, &raf_id)?;

    // pause off-screen; resume (if armed) with a fresh dt baseline
    {
        let engine = engine.clone();
        let frame = frame.clone();
        let raf = raf_id.clone();
        support::observe_visibility(observed, FLUID_VISIBILITY_THRESHOLD, move |visible| {
            let mut e = engine.borrow_mut();
            let was = e.visible;
            e.visible = visible;
            if visible && !was && e.armed {
                let now = support::now_ms();
                e.clock.reset(now);
                e.budget.reset(now);
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

fn load_image(engine: &Rc<RefCell<Engine>>, src: &str) -> Result<(), JsValue> {
    let image = HtmlImageElement::new()?;
    image.set_cross_origin(Some("anonymous"));

    let onload = {
        let engine = engine.clone();
        let image = image.clone();
        Closure::wrap(Box::new(move || {
            let mut e = engine.borrow_mut();
            let ctx = e.gl.ctx().clone();
            use web_sys::WebGl2RenderingContext as GL;
            let Some(texture) = ctx.create_texture() else {
                return;
            };
            ctx.bind_texture(GL::TEXTURE_2D, Some(&texture));
            ctx.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
            ctx.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
            ctx.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
            ctx.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
            if ctx
                .tex_image_2d_with_u32_and_u32_and_html_image_element(
                    GL::TEXTURE_2D,
                    0,
                    GL::RGBA as i32,
                    GL::RGBA,
                    GL::UNSIGNED_BYTE,
                    &image,
                )
                .is_err()
            {
                log::warn!("fluid: image upload failed, staying in dye-only mode");
                return;
            }
            e.image_aspect =
                image.natural_width().max(1) as f32 / image.natural_height().max(1) as f32;
            e.image_texture = Some(texture);
        }) as Box<dyn FnMut()>)
    };
    image.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget();
    image.set_src(src);
    Ok(())
}

fn wire_pointer_events(
    engine: &Rc<RefCell<Engine>>,
    frame: &support::FrameClosure,
    raf_id: &Rc<Cell<i32>>,
) -> Result<(), JsValue> {
    // mouse move: the very first qualifying move arms the loop
    {
        let engine = engine.clone();
        let frame = frame.clone();
        let raf = raf_id.clone();
        support::listen::<web_sys::MouseEvent>("mousemove", move |ev| {
            let mut e = engine.borrow_mut();
            let (cx, cy) = (ev.client_x() as f64, ev.client_y() as f64);
            if !e.inside_canvas(cx, cy) {
                return;
            }
            let now = support::now_ms();
            if e.armed && now - e.last_move_ms < e.cfg.pointer_throttle_ms {
                return;
            }
            e.last_move_ms = now;
            let (px, py) = e.to_canvas_px(cx, cy);
            let (w, h) = (e.canvas.width() as f32, e.canvas.height() as f32);
            let color = if e.armed {
                e.pointer.color
            } else {
                sample_dye_color(&mut e.rng)
            };
            e.pointer.motion(px, py, w, h, color);
            if !e.armed {
                e.armed = true;
                e.clock.reset(now);
                e.budget.reset(now);
                drop(e);
                support::schedule_frame(&frame, &raf);
            }
        })?;
    }

    // mouse down: boosted outward splat
    {
        let engine = engine.clone();
        support::listen::<web_sys::MouseEvent>("mousedown", move |ev| {
            let mut e = engine.borrow_mut();
            let (cx, cy) = (ev.client_x() as f64, ev.client_y() as f64);
            if !e.inside_canvas(cx, cy) {
                return;
            }
            let (px, py) = e.to_canvas_px(cx, cy);
            let (w, h) = (e.canvas.width() as f32, e.canvas.height() as f32);
            let color = sample_dye_color(&mut e.rng);
            e.pointer.press(-1, px, py, w, h, color);
            e.click_splat();
        })?;
    }

    // touch: start arms, move splats, end releases
    {
        let engine = engine.clone();
        let frame = frame.clone();
        let raf = raf_id.clone();
        support::listen::<web_sys::TouchEvent>("touchstart", move |ev| {
            let mut e = engine.borrow_mut();
            let touches = ev.target_touches();
            for i in 0..touches.length() {
                let Some(touch) = touches.item(i) else { continue };
                let (cx, cy) = (touch.client_x() as f64, touch.client_y() as f64);
                if !e.inside_canvas(cx, cy) {
                    continue;
                }
                let (px, py) = e.to_canvas_px(cx, cy);
                let (w, h) = (e.canvas.width() as f32, e.canvas.height() as f32);
                let color = sample_dye_color(&mut e.rng);
                e.pointer.press(touch.identifier(), px, py, w, h, color);
            }
            if !e.armed {
                e.armed = true;
                let now = support::now_ms();
                e.clock.reset(now);
                e.budget.reset(now);
                drop(e);
                support::schedule_frame(&frame, &raf);
            }
        })?;
    }
    {
        let engine = engine.clone();
        support::listen::<web_sys::TouchEvent>("touchmove", move |ev| {
            let mut e = engine.borrow_mut();
            let now = support::now_ms();
            if now - e.last_move_ms < e.cfg.pointer_throttle_ms {
                return;
            }
            let touches = ev.target_touches();
            for i in 0..touches.length() {
                let Some(touch) = touches.item(i) else { continue };
                let (cx, cy) = (touch.client_x() as f64, touch.client_y() as f64);
                if !e.inside_canvas(cx, cy) {
                    continue;
                }
                e.last_move_ms = now;
                let (px, py) = e.to_canvas_px(cx, cy);
                let (w, h) = (e.canvas.width() as f32, e.canvas.height() as f32);
                let color = e.pointer.color;
                e.pointer.motion(px, py, w, h, color);
            }
        })?;
    }
    {
        let engine = engine.clone();
        support::listen::<web_sys::TouchEvent>("touchend", move |_| {
            engine.borrow_mut().pointer.release();
        })?;
    }

    Ok(())
}

impl Engine {
    /// True when the client-space point lies over the canvas rect.
    fn inside_canvas(&self, client_x: f64, client_y: f64) -> bool {
        let r = self.canvas.get_bounding_client_rect();
        client_x >= r.left()
            && client_x <= r.left() + r.width()
            && client_y >= r.top()
            && client_y <= r.top() + r.height()
    }

    fn to_canvas_px(&self, client_x: f64, client_y: f64) -> (f32, f32) {
        let r = self.canvas.get_bounding_client_rect();
        let dpr = support::window().device_pixel_ratio();
        (
            scale_by_pixel_ratio(client_x - r.left(), dpr, self.cfg.dpr_cap) as f32,
            scale_by_pixel_ratio(client_y - r.top(), dpr, self.cfg.dpr_cap) as f32,
        )
    }

    fn resize_canvas(&mut self) -> bool {
        let dpr = support::window().device_pixel_ratio();
        let w = scale_by_pixel_ratio(self.canvas.client_width() as f64, dpr, self.cfg.dpr_cap);
        let h = scale_by_pixel_ratio(self.canvas.client_height() as f64, dpr, self.cfg.dpr_cap);
        if self.canvas.width() != w || self.canvas.height() != h {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
            return true;
        }
        false
    }

    fn frame(&mut self, now: f64) {
        let dt = (self.clock.tick(now) / 1000.0) as f32;

        if self.resize_canvas() {
            let existing = self.bufs.take();
            match passes::init_buffers(
                &self.gl,
                &self.pipe.copy,
                &self.cfg,
                existing,
                self.canvas.width(),
                self.canvas.height(),
            ) {
                Ok(bufs) => self.bufs = Some(bufs),
                Err(e) => {
                    log::error!("fluid: framebuffer resize failed: {e:?}");
                    return;
                }
            }
        }

        if self.cadence.due(dt, self.cfg.color_update_speed) {
            self.pointer.color = sample_dye_color(&mut self.rng);
        }

        if self.pointer.take_moved() {
            let (x, y) = (self.pointer.texcoord_x, self.pointer.texcoord_y);
            let (dx, dy) = (
                self.pointer.delta_x * self.cfg.splat_force,
                self.pointer.delta_y * self.cfg.splat_force,
            );
            let color = self.pointer.color;
            self.splat(x, y, dx, dy, color);
        }

        let Some(bufs) = self.bufs.as_mut() else {
            return;
        };
        passes::step(&self.gl, &self.pipe, bufs, &self.cfg, dt);

        // measure external layout fresh, then composite
        let canvas_rect = dom_rect(&self.canvas.get_bounding_client_rect());
        let photo_rect = dom_rect(&self.photo.get_bounding_client_rect());
        let uv = photo_rect_uv(&canvas_rect, &photo_rect);
        let rect_aspect = if photo_rect.height > 0.0 {
            (photo_rect.width / photo_rect.height) as f32
        } else {
            1.0
        };
        let image = self
            .image_texture
            .as_ref()
            .map(|t| (t, self.image_aspect));
        passes::render(&self.gl, &self.pipe, bufs, image, uv, rect_aspect, self.cfg.shading);

        let opacity = self.opacity.get();
        self.canvas
            .style()
            .set_property("opacity", &format!("{opacity:.3}"))
            .ok();
    }

    fn aspect(&self) -> f32 {
        self.canvas.width() as f32 / self.canvas.height().max(1) as f32
    }

    fn splat(&mut self, x: f32, y: f32, dx: f32, dy: f32, color: crate::color::Rgb) {
        let aspect = self.aspect();
        let radius = correct_radius(self.cfg.splat_radius / 100.0, aspect);
        if let Some(bufs) = self.bufs.as_mut() {
            passes::splat(&self.gl, &self.pipe, bufs, aspect, x, y, dx, dy, color, radius);
        }
    }

    fn click_splat(&mut self) {
        let color = sample_dye_color(&mut self.rng).scaled(10.0);
        let (dx, dy) = click_impulse(&mut self.rng);
        let (x, y) = (self.pointer.texcoord_x, self.pointer.texcoord_y);
        self.splat(x, y, dx, dy, color);
    }
}

fn dom_rect(rect: &web_sys::DomRect) -> RectPx {
    RectPx {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    }
}
