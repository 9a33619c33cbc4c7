#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn make_canvas(document: &web_sys::Document) -> web_sys::HtmlCanvasElement {
    let canvas = document
        .create_element("canvas")
        .expect("create canvas")
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .unwrap();
    canvas.set_width(64);
    canvas.set_height(64);
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

#[wasm_bindgen_test]
fn canvas_provides_a_2d_context() {
    let window = web_sys::window().unwrap();
    let document = window.document().unwrap();
    let canvas = make_canvas(&document);

    let ctx = canvas
        .get_context("2d")
        .expect("get_context threw")
        .expect("no 2d context")
        .dyn_into::<web_sys::CanvasRenderingContext2d>()
        .unwrap();

    // the contour renderer's erase pass must be expressible
    assert!(ctx.set_global_composite_operation("destination-out").is_ok());
    assert!(ctx
        .create_radial_gradient(32.0, 32.0, 0.0, 32.0, 32.0, 48.0)
        .is_ok());
}

#[wasm_bindgen_test]
fn mounted_canvas_has_a_layout_rect() {
    let window = web_sys::window().unwrap();
    let document = window.document().unwrap();
    let canvas = make_canvas(&document);

    let rect = canvas
        .dyn_ref::<web_sys::Element>()
        .unwrap()
        .get_bounding_client_rect();
    assert!(rect.width() > 0.0 && rect.height() > 0.0);
}
