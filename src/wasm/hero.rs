//! Scroll-progress orchestration over the pinned hero section.
//!
//! One normalized progress value drives every layer through its own
//! piecewise-linear transfer; a spring-smoothed pointer position adds
//! per-layer parallax. The engines only ever read the signal cells handed
//! out from here.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, HtmlElement};

use crate::config::{
    self, BACKGROUND_BLEND, BACKGROUND_FROM, BACKGROUND_TO, CONTOUR_OPACITY, FLUID_OPACITY,
    HERO_IMAGE_OPACITY, HERO_IMAGE_SCALE, TEXT_INTERACTIVE, TEXT_OFFSET_PX, TEXT_OPACITY,
};
use crate::motion::{mix_rgb, normalize_pointer, parallax_offset, scroll_progress, Spring, Transfer};
use crate::timing::DeltaClock;

use super::support::{self, SharedF32};

/// Read-only signals consumed by the engines each frame.
pub struct Signals {
    pub contour_opacity: SharedF32,
    pub fluid_opacity: SharedF32,
}

struct Host {
    section: HtmlElement,
    body: Option<HtmlElement>,
    contour_layer: Option<HtmlElement>,
    image_layer: Option<HtmlElement>,
    text_layer: Option<HtmlElement>,
    progress: f32,
    pointer_target: (f32, f32),
    spring_x: Spring,
    spring_y: Spring,
    clock: DeltaClock,
    running: bool,
    contour_opacity: SharedF32,
    fluid_opacity: SharedF32,
}

pub fn start(document: &Document, section: &HtmlElement) -> Result<Signals, JsValue> {
    let layer = |id: &str| {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    };

    let signals = Signals {
        contour_opacity: SharedF32::new(CONTOUR_OPACITY.1[0]),
        fluid_opacity: SharedF32::new(FLUID_OPACITY.1[0]),
    };

    let now = support::now_ms();
    let host = Rc::new(RefCell::new(Host {
        section: section.clone(),
        body: document.body(),
        contour_layer: layer("contour-canvas"),
        image_layer: layer("hero-image"),
        text_layer: layer("hero-text"),
        progress: 0.0,
        pointer_target: (0.0, 0.0),
        spring_x: Spring::new(config::PARALLAX_STIFFNESS),
        spring_y: Spring::new(config::PARALLAX_STIFFNESS),
        clock: DeltaClock::new(now, 100.0),
        running: true,
        contour_opacity: signals.contour_opacity.clone(),
        fluid_opacity: signals.fluid_opacity.clone(),
    }));

    // scroll → progress
    {
        let host = host.clone();
        support::listen::<web_sys::Event>("scroll", move |_| {
            host.borrow_mut().read_progress();
        })?;
    }
    host.borrow_mut().read_progress();

    // pointer → parallax target
    {
        let host = host.clone();
        support::listen::<web_sys::MouseEvent>("mousemove", move |ev| {
            let mut h = host.borrow_mut();
            let rect = h.section.get_bounding_client_rect();
            h.pointer_target = normalize_pointer(
                ev.client_x() as f64,
                ev.client_y() as f64,
                rect.left(),
                rect.top(),
                rect.width(),
                rect.height(),
            );
        })?;
    }

    // style application loop, paused with the section like the engines
    let frame = support::frame_closure();
    let raf_id = Rc::new(Cell::new(0));
    {
        let host = host.clone();
        let frame_handle = frame.clone();
        let raf = raf_id.clone();
        *frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            let mut h = host.borrow_mut();
            if !h.running {
                return;
            }
            let now = support::now_ms();
            h.apply(now);
            drop(h);
            support::schedule_frame(&frame_handle, &raf);
        }) as Box<dyn FnMut()>));
    }
    support::schedule_frame(&frame, &raf_id);

    {
        let host = host.clone();
        let frame = frame.clone();
        let raf = raf_id.clone();
        support::observe_visibility(section, config::CONTOUR_VISIBILITY_THRESHOLD, move |visible| {
            let mut h = host.borrow_mut();
            let was = h.running;
            h.running = visible;
            if visible && !was {
                h.clock.reset(support::now_ms());
                drop(h);
                support::schedule_frame(&frame, &raf);
            } else if !visible {
                drop(h);
                support::cancel_frame(&raf);
            }
        })?;
    }

    Ok(signals)
}

impl Host {
    fn read_progress(&mut self) {
        let window = support::window();
        let scroll_y = window.scroll_y().unwrap_or(0.0);
        let viewport_h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        self.progress = scroll_progress(
            scroll_y,
            self.section.offset_top() as f64,
            self.section.offset_height() as f64,
            viewport_h,
        );
    }

    /// Push the derived values out: signal cells for the engines, inline
    /// styles for the DOM layers.
    fn apply(&mut self, now: f64) {
        let p = self.progress;
        let dt = (self.clock.tick(now) / 1000.0) as f32;
        let px = self.spring_x.step(self.pointer_target.0, dt);
        let py = self.spring_y.step(self.pointer_target.1, dt);

        self.contour_opacity.set(Transfer::new(CONTOUR_OPACITY).map(p));
        self.fluid_opacity.set(Transfer::new(FLUID_OPACITY).map(p));

        if let Some(body) = &self.body {
            let t = Transfer::new(BACKGROUND_BLEND).map(p);
            let [r, g, b] = mix_rgb(BACKGROUND_FROM, BACKGROUND_TO, t);
            body.style()
                .set_property("background-color", &format!("rgb({r}, {g}, {b})"))
                .ok();
        }

        if let Some(contour) = &self.contour_layer {
            let (ox, oy) = parallax_offset((px, py), config::PARALLAX_CONTOUR);
            contour
                .style()
                .set_property("transform", &format!("translate3d({ox:.2}px, {oy:.2}px, 0)"))
                .ok();
        }

        if let Some(image) = &self.image_layer {
            let scale = Transfer::new(HERO_IMAGE_SCALE).map(p);
            let opacity = Transfer::new(HERO_IMAGE_OPACITY).map(p);
            let (ox, oy) = parallax_offset((px, py), config::PARALLAX_IMAGE);
            let style = image.style();
            style
                .set_property(
                    "transform",
                    &format!("translate3d({ox:.2}px, {oy:.2}px, 0) scale({scale:.4})"),
                )
                .ok();
            style.set_property("opacity", &format!("{opacity:.3}")).ok();
        }

        if let Some(text) = &self.text_layer {
            let opacity = Transfer::new(TEXT_OPACITY).map(p);
            let offset = Transfer::new(TEXT_OFFSET_PX).map(p);
            let interactive = Transfer::new(TEXT_INTERACTIVE).map(p);
            let (ox, oy) = parallax_offset((px, py), config::PARALLAX_TEXT);
            let style = text.style();
            style
                .set_property(
                    "transform",
                    &format!("translate3d({ox:.2}px, {:.2}px, 0)", oy + offset),
                )
                .ok();
            style.set_property("opacity", &format!("{opacity:.3}")).ok();
            style
                .set_property(
                    "pointer-events",
                    if interactive > 0.5 { "auto" } else { "none" },
                )
                .ok();
        }
    }
}
