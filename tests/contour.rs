#![cfg(not(target_arch = "wasm32"))]

//! Host-side tests for the metaball field and marching squares.

use hero_fx_wasm::config::{ContourConfig, Tier};
use hero_fx_wasm::contour::march::{marching_squares, Segment};
use hero_fx_wasm::contour::ContourSim;
use hero_fx_wasm::rng::XorShift32;

fn desktop_sim(w: f32, h: f32, seed: u32) -> (ContourSim, XorShift32) {
    let mut rng = XorShift32::new(seed);
    let mut sim = ContourSim::new(ContourConfig::for_tier(Tier::Desktop));
    sim.resize(w, h, &mut rng);
    (sim, rng)
}

#[test]
fn sources_stay_inside_margin_bounds() {
    // small canvas keeps the per-tick field resample cheap
    let (mut sim, mut rng) = desktop_sim(300.0, 240.0, 42);
    let margin = sim.config().margin;
    for frame in 0..2_000 {
        sim.tick(33.0, frame as f32 * 0.033, &mut rng);
        for s in sim.sources() {
            assert!(
                s.x >= margin && s.x <= 300.0 - margin,
                "x escaped: {}",
                s.x
            );
            assert!(
                s.y >= margin && s.y <= 240.0 - margin,
                "y escaped: {}",
                s.y
            );
        }
    }
}

#[test]
fn sources_survive_resize_clamped_not_respawned() {
    let (mut sim, mut rng) = desktop_sim(800.0, 600.0, 9);
    let before: Vec<f32> = sim.sources().iter().map(|s| s.radius).collect();
    sim.resize(400.0, 300.0, &mut rng);
    let after: Vec<f32> = sim.sources().iter().map(|s| s.radius).collect();
    // same batch (radii unchanged), positions clamped into the new bounds
    assert_eq!(before, after);
    let margin = sim.config().margin;
    for s in sim.sources() {
        assert!(s.x >= margin && s.x <= 400.0 - margin);
        assert!(s.y >= margin && s.y <= 300.0 - margin);
    }
}

#[test]
fn field_grid_dimensions_scenario() {
    // 800×600 canvas at cell size 4 → 201×151 vertices
    let (sim, _) = desktop_sim(800.0, 600.0, 1);
    assert_eq!(sim.config().cell_size, 4.0);
    assert_eq!(sim.cols(), 201);
    assert_eq!(sim.rows(), 151);
    assert_eq!(sim.field().len(), 201 * 151);
}

#[test]
fn zero_dt_tick_is_idempotent() {
    let (mut sim, mut rng) = desktop_sim(800.0, 600.0, 7);
    let t = 12.5;
    sim.tick(0.0, t, &mut rng);
    let first: Vec<f32> = sim.field().to_vec();
    sim.tick(0.0, t, &mut rng);
    assert_eq!(first, sim.field(), "field drifted with dt = 0");
}

#[test]
fn mobile_tier_is_coarser() {
    let desktop = ContourConfig::for_tier(Tier::Desktop);
    let mobile = ContourConfig::for_tier(Tier::Mobile);
    assert!(mobile.source_count < desktop.source_count);
    assert!(mobile.cell_size > desktop.cell_size);
    assert!(mobile.levels < desktop.levels);
}

// ── Marching squares ────────────────────────────────────────────

/// 2×2 grid with the given corner pattern: bit 8 = top-left, 4 = top-right,
/// 2 = bottom-right, 1 = bottom-left.
fn cell_field(config: u8) -> [f32; 4] {
    let v = |bit: u8| if config & bit != 0 { 2.0 } else { 0.0 };
    // row 0: tl, tr — row 1: bl, br
    [v(8), v(4), v(1), v(2)]
}

fn on_cell_edge(x: f32, y: f32, cell: f32) -> bool {
    let eps = 1e-5;
    let inside = (-eps..=cell + eps).contains(&x) && (-eps..=cell + eps).contains(&y);
    let on_edge = x.abs() < eps
        || (x - cell).abs() < eps
        || y.abs() < eps
        || (y - cell).abs() < eps;
    inside && on_edge
}

#[test]
fn empty_and_full_cells_emit_nothing() {
    let mut segments: Vec<Segment> = Vec::new();
    for config in [0u8, 15] {
        let field = cell_field(config);
        marching_squares(&field, 2, 2, 1.0, 1.0, &mut segments);
        assert!(segments.is_empty(), "config {config} emitted segments");
    }
}

#[test]
fn all_mixed_cells_emit_edge_anchored_segments() {
    let mut segments: Vec<Segment> = Vec::new();
    for config in 1u8..=14 {
        let field = cell_field(config);
        marching_squares(&field, 2, 2, 1.0, 1.0, &mut segments);

        let expected = if config == 5 || config == 10 { 2 } else { 1 };
        assert_eq!(
            segments.len(),
            expected,
            "config {config}: wrong segment count"
        );
        for seg in &segments {
            assert!(
                on_cell_edge(seg[0], seg[1], 1.0),
                "config {config}: endpoint ({}, {}) off-edge",
                seg[0],
                seg[1]
            );
            assert!(
                on_cell_edge(seg[2], seg[3], 1.0),
                "config {config}: endpoint ({}, {}) off-edge",
                seg[2],
                seg[3]
            );
        }
    }
}

#[test]
fn near_equal_corners_interpolate_to_midpoint() {
    // The threshold falls between two corners that differ by less than the
    // flatness epsilon: the crossing snaps to the edge midpoint instead of
    // dividing by a vanishing delta.
    let threshold = 1.0;
    let field = [1.000_01f32, 0.999_98, 0.0, 0.0]; // config 8, top edge crossed
    let mut segments: Vec<Segment> = Vec::new();
    marching_squares(&field, 2, 2, 1.0, threshold, &mut segments);
    assert_eq!(segments.len(), 1);
    let seg = segments[0];
    assert!((seg[0] - 0.5).abs() < 1e-6, "top crossing not at midpoint");
    for &coord in &seg {
        assert!(coord.is_finite());
        assert!((-0.001..=1.001).contains(&coord));
    }
}

#[test]
fn interpolation_positions_crossing_correctly() {
    // tl = 2, tr = 0, threshold 1 → crossing at the middle of the top edge
    let field = [2.0f32, 0.0, 0.0, 0.0];
    let mut segments: Vec<Segment> = Vec::new();
    marching_squares(&field, 2, 2, 1.0, 1.0, &mut segments);
    assert_eq!(segments.len(), 1);
    let seg = segments[0];
    // config 8: [top, y, x, left] — top crossing at x = 0.5, left at y = 0.5
    assert!((seg[0] - 0.5).abs() < 1e-6);
    assert!((seg[1] - 0.0).abs() < 1e-6);
    assert!((seg[2] - 0.0).abs() < 1e-6);
    assert!((seg[3] - 0.5).abs() < 1e-6);
}

#[test]
fn contour_levels_decay_to_floors() {
    let (sim, _) = desktop_sim(200.0, 200.0, 3);
    let (t0, o0, w0) = sim.level_style(0);
    assert_eq!(t0, 1.0);
    assert_eq!(o0, 0.45);
    assert_eq!(w0, 2.2);
    // far level clamps at the floors
    let (_, o9, w9) = sim.level_style(9);
    assert_eq!(o9, 0.05);
    assert_eq!(w9, 0.5);
}
