#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

// Pure simulation/math core — target-independent so the algorithmic heart
// of both engines is testable with plain `cargo test` on the host.

pub mod buffers;
pub mod color;
pub mod config;
pub mod contour;
pub mod layout;
pub mod motion;
pub mod pointer;
pub mod rng;
pub mod splat;
pub mod timing;

// Browser glue — only compiled when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    mod contour;
    mod fluid;
    mod hero;
    mod support;

    use crate::config::Tier;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let tier = Tier::for_viewport_width(
            window
                .inner_width()?
                .as_f64()
                .unwrap_or(support::VIEWPORT_FALLBACK_WIDTH),
        );
        log::info!("hero effects starting, tier {:?}", tier);

        let section = support::element_by_id(&document, "hero")?
            .dyn_into::<web_sys::HtmlElement>()?;
        let contour_canvas = support::element_by_id(&document, "contour-canvas")?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;
        let fluid_canvas = support::element_by_id(&document, "fluid-canvas")?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;
        let photo = support::element_by_id(&document, "hero-photo")?;

        let signals = hero::start(&document, &section)?;

        contour::start(
            contour_canvas,
            &section,
            signals.contour_opacity.clone(),
            tier,
        )?;
        fluid::start(
            fluid_canvas,
            &section,
            photo,
            signals.fluid_opacity.clone(),
            tier,
        )?;

        Ok(())
    }
}

// When compiling for non-wasm targets (e.g. `cargo test` on host), provide
// an empty stub so the crate still builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
