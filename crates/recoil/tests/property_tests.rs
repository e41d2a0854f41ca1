#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use recoil::{
    MAX_DELTA_TIME, Spring, SpringConfig, SpringListener, friction_from_legacy,
    legacy_friction_from_friction, legacy_tension_from_tension, tension_from_legacy,
};
use proptest::prelude::*;

#[derive(Default)]
struct Counter {
    updates: AtomicUsize,
    rests: AtomicUsize,
}

impl SpringListener for Counter {
    fn on_update(&self, _spring: &Spring) {
        self.updates.fetch_add(1, Ordering::SeqCst);
    }

    fn on_at_rest(&self, _spring: &Spring) {
        self.rests.fetch_add(1, Ordering::SeqCst);
    }
}

// =============================================================================
// Convergence
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn spring_converges_and_rests_once(
        tension in 20.0f64..400.0,
        friction in 5.0f64..60.0,
        start in -50.0f64..50.0,
        target in -50.0f64..50.0,
    ) {
        prop_assume!((start - target).abs() > 0.01);
        let mut spring = Spring::new(SpringConfig::new(tension, friction));
        let counter = Arc::new(Counter::default());
        spring.set_current_value(start);
        spring.add_listener(counter.clone());
        spring.set_end_value(target);

        let mut frames = 0;
        while !(spring.is_at_rest() && spring.was_at_rest()) {
            spring.advance(1.0 / 60.0);
            frames += 1;
            prop_assert!(frames < 20_000, "no rest: tension={}, friction={}", tension, friction);
        }

        prop_assert_eq!(spring.current_value(), target);
        prop_assert_eq!(counter.rests.load(Ordering::SeqCst), 1);

        let updates = counter.updates.load(Ordering::SeqCst);
        for _ in 0..20 {
            spring.advance(1.0 / 60.0);
        }
        prop_assert_eq!(counter.updates.load(Ordering::SeqCst), updates);
    }

    #[test]
    fn clamped_spring_never_passes_target(
        tension in 50.0f64..600.0,
        friction in 0.0f64..5.0,
        target in 1.0f64..100.0,
    ) {
        let mut spring = Spring::new(SpringConfig::new(tension, friction));
        spring.set_overshoot_clamping(true);
        spring.set_end_value(target);

        for _ in 0..600 {
            spring.advance(1.0 / 60.0);
            prop_assert!(spring.current_value() <= target);
        }
        prop_assert_eq!(spring.current_value(), target);
    }
}

// =============================================================================
// Stability
// =============================================================================

proptest! {
    #[test]
    fn advance_never_produces_nan(
        tension in 0.0f64..2000.0,
        friction in 0.0f64..200.0,
        target in -1e6f64..1e6,
        velocity in -1e4f64..1e4,
        delta in 0.0f64..10.0,
    ) {
        let mut spring = Spring::new(SpringConfig::new(tension, friction));
        spring.set_end_value(target);
        spring.set_velocity(velocity);
        for _ in 0..30 {
            spring.advance(delta);
            prop_assert!(spring.current_value().is_finite());
            prop_assert!(spring.velocity().is_finite());
        }
    }

    #[test]
    fn stall_simulates_at_most_the_clamp(
        tension in 1.0f64..500.0,
        friction in 0.0f64..50.0,
        stall in MAX_DELTA_TIME..100.0,
    ) {
        let config = SpringConfig::new(tension, friction);
        let mut stalled = Spring::new(config);
        let mut reference = Spring::new(config);
        stalled.set_end_value(1.0);
        reference.set_end_value(1.0);

        stalled.advance(stall);
        reference.advance(MAX_DELTA_TIME);

        prop_assert_eq!(stalled.state(), reference.state());
    }
}

// =============================================================================
// Legacy units
// =============================================================================

proptest! {
    #[test]
    fn legacy_conversion_round_trips(x in 0.01f64..50.0) {
        prop_assert!((legacy_tension_from_tension(tension_from_legacy(x)) - x).abs() < 1e-9);
        prop_assert!((legacy_friction_from_friction(friction_from_legacy(x)) - x).abs() < 1e-9);
    }

    #[test]
    fn legacy_conversion_is_monotonic(a in 0.01f64..50.0, b in 0.01f64..50.0) {
        prop_assume!(a < b);
        prop_assert!(tension_from_legacy(a) < tension_from_legacy(b));
        prop_assert!(friction_from_legacy(a) < friction_from_legacy(b));
    }
}

// =============================================================================
// Idempotence
// =============================================================================

proptest! {
    #[test]
    fn resting_spring_ignores_advance(
        value in -1e3f64..1e3,
        deltas in proptest::collection::vec(0.0f64..1.0, 1..50),
    ) {
        let mut spring = Spring::new(SpringConfig::new(50.0, 10.0));
        spring.set_current_value(value);
        let counter = Arc::new(Counter::default());
        spring.add_listener(counter.clone());

        let state = spring.state();
        for delta in deltas {
            spring.advance(delta);
        }
        prop_assert_eq!(spring.state(), state);
        prop_assert_eq!(counter.updates.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn set_end_value_same_target_at_rest_is_idempotent(value in -1e3f64..1e3) {
        let mut spring = Spring::new(SpringConfig::new(50.0, 10.0));
        spring.set_current_value(value);
        spring.set_end_value(value);
        prop_assert!(spring.is_at_rest());
        prop_assert_eq!(spring.start_value(), value);
        prop_assert_eq!(spring.end_value(), value);
    }
}
