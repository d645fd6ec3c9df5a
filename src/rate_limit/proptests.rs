//! Property-Based Tests for the Limiter
//!
//! Random sequences of takes, clock moves and reconfigurations, checked
//! against the bucket invariants after every step.
//!
//! ```bash
//! cargo test --lib rate_limit::proptests
//! ```

use proptest::prelude::*;
use std::sync::Arc;

use crate::rate_limit::clock::{Clock, ManualClock};
use crate::rate_limit::limiter::Limiter;

#[derive(Debug, Clone)]
enum Op {
    Take(i64),
    Advance(i64),
    ResetInterval(i64),
    ResetQuantum(i64),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (-5i64..200).prop_map(Op::Take),
        3 => (0i64..20_000).prop_map(Op::Advance),
        1 => (1i64..600).prop_map(Op::ResetInterval),
        1 => (0i64..100_000).prop_map(Op::ResetQuantum),
    ]
}

fn arb_limiter_params() -> impl Strategy<Value = (i64, i64, i64)> {
    (1i64..600, 0i64..100_000).prop_flat_map(|(interval, quantum)| {
        (Just(interval), Just(quantum), 0..=quantum)
    })
}

proptest! {
    #[test]
    fn prop_bucket_invariants_hold(
        (interval, quantum, initial) in arb_limiter_params(),
        ops in prop::collection::vec(arb_op(), 1..64),
    ) {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let limiter = Limiter::with_clock(interval, quantum, initial, Arc::clone(&clock));

        for op in ops {
            let before = limiter.stats();
            match op {
                Op::Take(n) => {
                    let granted = limiter.take(n);
                    let after = limiter.stats();

                    prop_assert!(granted >= 0);
                    prop_assert!(granted <= n.max(0));
                    prop_assert!(after.capacity >= 0);

                    if n <= 0 {
                        prop_assert_eq!(granted, 0);
                        prop_assert_eq!(&after, &before);
                    } else {
                        prop_assert!(after.capacity <= after.quantum);
                        prop_assert_eq!(after.last_reconciled, clock.now_secs().max(before.last_reconciled));
                        if granted < n {
                            prop_assert_eq!(after.capacity, 0);
                        }
                    }
                }
                Op::Advance(secs) => clock.advance(secs),
                Op::ResetInterval(interval) => {
                    limiter.reset_interval(interval);
                    prop_assert_eq!(limiter.available(), before.capacity);
                    prop_assert_eq!(limiter.last_reconciled(), before.last_reconciled);
                }
                Op::ResetQuantum(quantum) => {
                    limiter.reset_quantum(quantum);
                    prop_assert_eq!(limiter.available(), before.capacity);
                    prop_assert_eq!(limiter.last_reconciled(), before.last_reconciled);
                }
            }
        }
    }

    #[test]
    fn prop_take_without_elapsed_time_is_exact(
        (interval, quantum, initial) in arb_limiter_params(),
        n in 1i64..200_000,
    ) {
        let limiter = Limiter::with_clock(interval, quantum, initial, ManualClock::new(0));

        let granted = limiter.take(n);
        prop_assert_eq!(granted, n.min(initial));
        prop_assert_eq!(limiter.available(), initial - granted);
    }

    #[test]
    fn prop_refill_matches_tick_formula(
        (interval, quantum) in (1i64..600, 0i64..100_000),
        elapsed in 0i64..1_000_000,
    ) {
        let clock = Arc::new(ManualClock::new(0));
        let limiter = Limiter::with_clock(interval, quantum, 0, Arc::clone(&clock));
        clock.advance(elapsed);

        let expected = ((elapsed / interval) * (quantum / 3600)).min(quantum);
        prop_assert_eq!(limiter.take(i64::MAX), expected);
    }
}
