#![cfg(not(target_arch = "wasm32"))]

//! Frame-budget throttle: step accounting must not depend on how finely
//! the clock is sampled, and a resume must reset the baseline.

use hero_fx_wasm::timing::{DeltaClock, FrameBudget};

#[test]
fn step_count_is_slicing_independent() {
    // 25 fps → 40 ms budget, divisible numbers to keep the arithmetic exact
    let total = 1000.0;

    // fine slicing: poll every 10 ms
    let mut fine = FrameBudget::new(25.0);
    let mut fine_steps = 0;
    let mut t = 0.0;
    while t < total {
        t += 10.0;
        fine_steps += fine.steps(t);
    }

    // coarse slicing: two polls
    let mut coarse = FrameBudget::new(25.0);
    let coarse_steps = coarse.steps(520.0) + coarse.steps(total);

    // one poll
    let mut single = FrameBudget::new(25.0);
    let single_steps = single.steps(total);

    assert_eq!(fine_steps, 25);
    assert_eq!(coarse_steps, 25);
    assert_eq!(single_steps, 25);
}

#[test]
fn under_budget_polls_do_no_work() {
    let mut budget = FrameBudget::new(25.0);
    assert_eq!(budget.steps(10.0), 0);
    assert_eq!(budget.steps(20.0), 0);
    assert_eq!(budget.steps(39.9), 0);
    assert_eq!(budget.steps(40.0), 1);
}

#[test]
fn remainder_carries_over_without_drift() {
    let mut budget = FrameBudget::new(25.0);
    // 50 ms = one budget + 10 ms remainder
    assert_eq!(budget.steps(50.0), 1);
    // 30 more ms: carried 10 + 30 = one more budget
    assert_eq!(budget.steps(80.0), 1);
}

#[test]
fn resume_resets_the_baseline() {
    let mut budget = FrameBudget::new(25.0);
    assert_eq!(budget.steps(40.0), 1);

    // long invisible gap, then resume resets instead of bursting
    budget.reset(100_000.0);
    assert_eq!(budget.steps(100_010.0), 0, "resumed frame saw stale elapsed");
    assert_eq!(budget.steps(100_040.0), 1);
}

#[test]
fn delta_clock_caps_and_resets() {
    let mut clock = DeltaClock::new(0.0, 50.0);
    assert_eq!(clock.tick(20.0), 20.0);
    // cap bounds a long stall
    assert_eq!(clock.tick(500.0), 50.0);
    // reset gives the first resumed frame a bounded dt
    clock.reset(1_000.0);
    assert_eq!(clock.tick(1_016.0), 16.0);
}
