// ABOUTME: Property and scenario tests for the clamp-and-shift weight rule.
// ABOUTME: Verifies convergence bounds and the 100-sum invariant for all step sizes.

use metavasi::cutover::{clamp, next_weights};
use proptest::prelude::*;

/// Iterate the pure step rule until it reaches (0, 100), collecting the
/// intermediate pairs.
fn bleed_sequence(mut blue: i64, mut green: i64, step: i64) -> Vec<(i64, i64)> {
    let mut pairs = Vec::new();
    while !(blue == 0 && green == 100) {
        let (b, g) = next_weights(blue, green, step);
        blue = b;
        green = g;
        pairs.push((blue, green));
        assert!(pairs.len() <= 200, "step rule failed to terminate");
    }
    pairs
}

proptest! {
    /// For every step size and starting split summing to 100, the rule
    /// converges to (0, 100) in at most ceil(blue / step) steps and the
    /// weights sum to 100 after every step.
    #[test]
    fn converges_within_bound_and_keeps_sum(step in 1i64..=100, blue0 in 0i64..=100) {
        let green0 = 100 - blue0;
        let pairs = bleed_sequence(blue0, green0, step);

        for (blue, green) in &pairs {
            prop_assert_eq!(blue + green, 100);
            prop_assert!((0..=100).contains(blue));
            prop_assert!((0..=100).contains(green));
        }

        let bound = (blue0 + step - 1) / step;
        prop_assert!(pairs.len() as i64 <= bound);

        if let Some(last) = pairs.last() {
            prop_assert_eq!(*last, (0, 100));
        }
    }

    #[test]
    fn clamp_always_lands_inside_range(value in -500i64..=500) {
        let clamped = clamp(value, 0, 100);
        prop_assert!((0..=100).contains(&clamped));
        if (0..=100).contains(&value) {
            prop_assert_eq!(clamped, value);
        }
    }
}

#[test]
fn step_twenty_takes_five_steps() {
    assert_eq!(
        bleed_sequence(100, 0, 20),
        vec![(80, 20), (60, 40), (40, 60), (20, 80), (0, 100)]
    );
}

#[test]
fn step_thirty_clamps_the_final_step() {
    // The naive last step would be (-20, 120); clamping lands it exactly
    // on (0, 100) in four steps, not four and a third.
    assert_eq!(
        bleed_sequence(100, 0, 30),
        vec![(70, 30), (40, 60), (10, 90), (0, 100)]
    );
}

#[test]
fn already_complete_split_takes_no_steps() {
    assert_eq!(bleed_sequence(0, 100, 20), vec![]);
}
