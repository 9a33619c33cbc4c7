//! Shared DOM glue: element lookup, clocks, the recursive
//! requestAnimationFrame closure, visibility observation and the read-only
//! signal cells the host hands to the engines.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, IntersectionObserver, IntersectionObserverEntry, Window};

/// Used when `window.innerWidth` is unreadable at startup.
pub const VIEWPORT_FALLBACK_WIDTH: f64 = 1280.0;

pub fn window() -> Window {
    web_sys::window().expect("no window")
}

pub fn element_by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("element #{id} not found")))
}

/// Monotonic milliseconds; falls back to Date when Performance is absent.
pub fn now_ms() -> f64 {
    match window().performance() {
        Some(p) => p.now(),
        None => js_sys::Date::now(),
    }
}

/// PRNG seed from the wall clock.
pub fn clock_seed() -> u32 {
    let bits = js_sys::Date::now().to_bits();
    (bits ^ (bits >> 32)) as u32
}

/// One-directional f32 signal: the host writes, an engine reads each frame.
#[derive(Clone)]
pub struct SharedF32(Rc<Cell<f32>>);

impl SharedF32 {
    pub fn new(value: f32) -> SharedF32 {
        SharedF32(Rc::new(Cell::new(value)))
    }

    pub fn set(&self, value: f32) {
        self.0.set(value);
    }

    pub fn get(&self) -> f32 {
        self.0.get()
    }
}

/// Recursive animation-frame closure. Storing the closure inside an
/// `Option` lets it be created first and referenced from within itself.
pub type FrameClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

pub fn frame_closure() -> FrameClosure {
    Rc::new(RefCell::new(None))
}

/// Request the next frame, recording the handle so a pause can cancel it.
pub fn schedule_frame(closure: &FrameClosure, raf_id: &Rc<Cell<i32>>) {
    if let Some(cb) = closure.borrow().as_ref() {
        if let Ok(id) = window().request_animation_frame(cb.as_ref().unchecked_ref()) {
            raf_id.set(id);
        }
    }
}

pub fn cancel_frame(raf_id: &Rc<Cell<i32>>) {
    let id = raf_id.get();
    if id != 0 {
        window().cancel_animation_frame(id).ok();
        raf_id.set(0);
    }
}

/// Observe `target` and report intersection transitions. The observer and
/// its callback are leaked for the page lifetime, matching the engines'
/// unmount-is-page-teardown resource model.
pub fn observe_visibility(
    target: &Element,
    threshold: f64,
    mut on_change: impl FnMut(bool) + 'static,
) -> Result<IntersectionObserver, JsValue> {
    let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _: IntersectionObserver| {
        if let Ok(entry) = entries.get(0).dyn_into::<IntersectionObserverEntry>() {
            on_change(entry.is_intersecting());
        }
    })
        as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let options = web_sys::IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    observer.observe(target);
    callback.forget();
    Ok(observer)
}

/// Window-level event listener that lives for the page lifetime.
pub fn listen<E: JsCast + 'static>(
    event: &str,
    mut handler: impl FnMut(E) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |e: web_sys::Event| {
        if let Ok(e) = e.dyn_into::<E>() {
            handler(e);
        }
    }) as Box<dyn FnMut(web_sys::Event)>);
    window().add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
