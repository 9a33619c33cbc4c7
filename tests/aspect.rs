#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use hero_fx_wasm::layout::{cover_anchor_bottom, photo_rect_uv, to_photo_space, RectPx};

wasm_bindgen_test_configure!(run_in_browser);

fn approx_eq2(a: (f32, f32), b: (f32, f32), eps: f32) -> bool {
    (a.0 - b.0).abs() < eps && (a.1 - b.1).abs() < eps
}

#[wasm_bindgen_test]
fn photo_mapping_is_resolution_invariant() {
    // The same layout at two canvas resolutions must address the same
    // image texels: the rect → UV → cover-fit chain only depends on the
    // relative geometry.
    let layouts = [
        (1920.0, 1080.0), // wide
        (960.0, 540.0),   // same shape, half size
    ];

    let image_aspect = 0.75;
    let samples = [(0.5, 0.5), (0.6, 0.5), (0.5, 0.6), (0.2, 0.8), (0.8, 0.2)];

    let mut mapped: Vec<Vec<(f32, f32)>> = Vec::new();
    for &(w, h) in &layouts {
        let canvas = RectPx {
            left: 0.0,
            top: 0.0,
            width: w,
            height: h,
        };
        // photo occupies the same relative region in both layouts
        let photo = RectPx {
            left: w * 0.55,
            top: h * 0.3,
            width: w * 0.3,
            height: h * 0.7,
        };
        let rect = photo_rect_uv(&canvas, &photo);
        let rect_aspect = (photo.width / photo.height) as f32;

        let mut out = Vec::new();
        for &(fx, fy) in &samples {
            let (pu, pv) = to_photo_space(fx, fy, &rect);
            out.push(cover_anchor_bottom(pu, pv, image_aspect, rect_aspect));
        }
        mapped.push(out);
    }

    for (a, b) in mapped[0].iter().zip(mapped[1].iter()) {
        assert!(approx_eq2(*a, *b, 1e-5), "a={a:?} b={b:?}");
    }
}

#[wasm_bindgen_test]
fn bottom_anchor_pins_the_rect_floor_to_the_image_floor() {
    // For any taller-than-rect image, photo-space v = 1 (the rect's top
    // edge in UV space) must always land on image v = 1.
    for &image_aspect in &[0.3f32, 0.5, 0.9] {
        let (_, v) = cover_anchor_bottom(0.5, 1.0, image_aspect, 1.0);
        assert!((v - 1.0).abs() < 1e-6, "aspect {image_aspect}: v = {v}");
    }
}
