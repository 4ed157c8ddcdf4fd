//! Property tests for the conviction engine.
//!
//! The closed form is checked against a literal per-block simulation, and the
//! threshold and timing functions against their defining equations.

use conviction_engine::{
    calculate_threshold, current_conviction, current_conviction_by_entity, max_conviction,
    min_needed_stake, remaining_time_to_pass, ConvictionHistory, PassOutlook, StakeEvent,
};
use proptest::prelude::*;

const ENTITIES: [&str; 3] = ["0xa11ce", "0xb0b", "0xca401"];

/// (blocks since previous event, staker, new stake or increment)
type Step = (u64, usize, i128);

fn steps() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec((0u64..20, 0usize..ENTITIES.len(), 0i128..10_000), 1..12)
}

/// Events with consistent totals; each step sets the staker's new amount.
fn build_events(steps: &[Step]) -> Vec<StakeEvent> {
    build(steps, |_, stake| stake)
}

/// Events where stakers only ever add to their stake.
fn build_growing_events(steps: &[Step]) -> Vec<StakeEvent> {
    build(steps, |current, increment| current + increment)
}

fn build(steps: &[Step], next: impl Fn(i128, i128) -> i128) -> Vec<StakeEvent> {
    let mut block = 100;
    let mut latest = [0i128; 3];
    steps
        .iter()
        .map(|&(gap, who, amount)| {
            block += gap;
            latest[who] = next(latest[who], amount);
            let total: i128 = latest.iter().sum();
            StakeEvent::new(1, ENTITIES[who], block, latest[who], total as u128)
        })
        .collect()
}

/// Literal per-block recurrence `C(t+1) = alpha * C(t) + staked(t)`.
fn simulate(events: &[StakeEvent], entity: Option<&str>, at_block: u64, alpha: f64) -> f64 {
    let relevant: Vec<&StakeEvent> = events
        .iter()
        .filter(|e| entity.map_or(true, |who| e.is_from(who)))
        .collect();
    let Some(first) = relevant.first() else {
        return 0.0;
    };

    let mut conviction = 0.0;
    let mut staked = 0.0;
    let mut next = 0;
    for block in first.block_number..=at_block {
        while next < relevant.len() && relevant[next].block_number == block {
            staked = match entity {
                Some(_) => relevant[next].tokens_staked as f64,
                None => relevant[next].total_tokens_staked as f64,
            };
            next += 1;
        }
        if block == at_block {
            break;
        }
        conviction = alpha * conviction + staked;
    }
    conviction
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn closed_form_matches_simulation(
        steps in steps(),
        alpha in 0.5f64..0.999,
        offset in 0u64..300,
    ) {
        let events = build_events(&steps);
        let at_block = 90 + offset;
        let closed = current_conviction(&events, at_block, alpha);
        let simulated = simulate(&events, None, at_block, alpha);
        prop_assert!(close(closed, simulated), "closed {} vs simulated {}", closed, simulated);
    }

    #[test]
    fn entity_closed_form_matches_simulation(
        steps in steps(),
        alpha in 0.5f64..0.999,
        offset in 0u64..300,
        who in 0usize..ENTITIES.len(),
    ) {
        let events = build_events(&steps);
        let at_block = 90 + offset;
        let closed = current_conviction_by_entity(&events, ENTITIES[who], at_block, alpha);
        let simulated = simulate(&events, Some(ENTITIES[who]), at_block, alpha);
        prop_assert!(close(closed, simulated), "closed {} vs simulated {}", closed, simulated);
    }

    #[test]
    fn entities_sum_to_total(
        steps in steps(),
        alpha in 0.5f64..0.999,
        offset in 0u64..300,
    ) {
        let events = build_events(&steps);
        let at_block = 100 + offset;
        let total = current_conviction(&events, at_block, alpha);
        let summed: f64 = ENTITIES
            .iter()
            .map(|who| current_conviction_by_entity(&events, who, at_block, alpha))
            .sum();
        prop_assert!(close(total, summed), "total {} vs summed {}", total, summed);
    }

    #[test]
    fn growing_stake_never_loses_conviction(
        steps in steps(),
        alpha in 0.5f64..0.999,
    ) {
        let events = build_growing_events(&steps);
        let last_block = events.last().map_or(100, |e| e.block_number) + 50;
        let mut previous = 0.0;
        for block in 90..=last_block {
            let c = current_conviction(&events, block, alpha);
            prop_assert!(c >= previous * (1.0 - 1e-12), "dropped at block {}: {} < {}", block, c, previous);
            previous = c;
        }
    }

    #[test]
    fn between_events_moves_towards_steady_state(
        steps in steps(),
        alpha in 0.5f64..0.999,
        gap in 1u64..100,
    ) {
        let events = build_events(&steps);
        let last = events.last().expect("at least one step");
        let ceiling = max_conviction(last.total_tokens_staked as f64, alpha);

        let before = current_conviction(&events, last.block_number, alpha);
        let after = current_conviction(&events, last.block_number + gap, alpha);
        prop_assert!(
            (ceiling - after).abs() <= (ceiling - before).abs() + 1e-9 * ceiling.max(1.0)
        );
        if before <= ceiling {
            prop_assert!(after >= before - 1e-9 * ceiling.max(1.0));
        }
    }

    #[test]
    fn continuous_across_event_boundaries(
        steps in steps(),
        alpha in 0.5f64..0.999,
    ) {
        let events = build_events(&steps);
        for (k, event) in events.iter().enumerate() {
            // An event only changes the slope from its block onwards
            let without = current_conviction(&events[..k], event.block_number, alpha);
            let with = current_conviction(&events[..=k], event.block_number, alpha);
            prop_assert!(close(without, with), "jump at event {}: {} vs {}", k, without, with);
        }
    }

    #[test]
    fn history_tail_is_current(
        steps in steps(),
        alpha in 0.5f64..0.999,
        upto in 100u64..400,
        window in 1usize..80,
    ) {
        let events = build_events(&steps);
        let history = ConvictionHistory::new(&events, upto, alpha, window);
        prop_assert_eq!(history.len(), window);

        let samples: Vec<f64> = history.clone().collect();
        prop_assert_eq!(samples.len(), window);
        prop_assert_eq!(samples[window - 1], current_conviction(&events, upto, alpha));
        prop_assert_eq!(samples, history.collect::<Vec<_>>());
    }

    #[test]
    fn max_conviction_strictly_increasing(
        a in 0.0f64..1e9,
        delta in 1e-3f64..1e6,
        alpha in 0.01f64..0.999,
    ) {
        prop_assert!(max_conviction(a + delta, alpha) > max_conviction(a, alpha));
        prop_assert_eq!(max_conviction(0.0, alpha), 0.0);
    }

    #[test]
    fn threshold_infinite_at_cap_and_increasing_below(
        funds in 1.0f64..1e9,
        supply in 1.0f64..1e9,
        max_ratio in 0.01f64..1.0,
        weight in 1e-4f64..1.0,
        lower in 0.0f64..1.0,
        upper in 0.0f64..1.0,
    ) {
        let (lo, hi) = if lower < upper { (lower, upper) } else { (upper, lower) };
        let cap = funds * max_ratio;

        prop_assert_eq!(calculate_threshold(cap * (1.0 + 1e-9), funds, supply, max_ratio, weight), f64::INFINITY);
        prop_assert_eq!(calculate_threshold(cap * 1.5, funds, supply, max_ratio, weight), f64::INFINITY);

        let t_lo = calculate_threshold(cap * lo * 0.999, funds, supply, max_ratio, weight);
        let t_hi = calculate_threshold(cap * hi * 0.999, funds, supply, max_ratio, weight);
        prop_assert!(t_lo.is_finite() && t_hi.is_finite());
        prop_assert!(t_lo <= t_hi);
    }

    #[test]
    fn min_needed_stake_is_definitional(
        requested in 0.0f64..1e6,
        funds in 1e6f64..1e9,
        supply in 1.0f64..1e9,
        alpha in 0.01f64..0.999,
    ) {
        let t = calculate_threshold(requested, funds, supply, 0.2, 0.025);
        prop_assert_eq!(min_needed_stake(t, alpha), t * (1.0 - alpha));
        prop_assert!(min_needed_stake(t, alpha) >= 0.0);
    }

    #[test]
    fn pending_estimate_reaches_threshold(
        staked in 1.0f64..1e6,
        start in 0.0f64..0.9,
        target in 0.0f64..1.0,
        alpha in 0.5f64..0.999,
    ) {
        let ceiling = max_conviction(staked, alpha);
        let current = ceiling * start;
        let threshold = current + (ceiling - current) * (0.01 + 0.98 * target);

        match remaining_time_to_pass(threshold, current, staked, alpha) {
            PassOutlook::WillPassIn { blocks } => {
                prop_assert!(blocks > 0.0);
                let reached = ceiling - (ceiling - current) * alpha.powf(blocks);
                prop_assert!((reached - threshold).abs() <= 1e-6 * ceiling);
            }
            other => prop_assert!(false, "expected a pending estimate, got {:?}", other),
        }
    }

    #[test]
    fn met_threshold_is_already_passed(
        current in 0.0f64..1e9,
        below in 0.0f64..1.0,
        staked in 0.0f64..1e6,
        alpha in 0.01f64..0.999,
    ) {
        let threshold = current * below;
        prop_assert_eq!(
            remaining_time_to_pass(threshold, current, staked, alpha),
            PassOutlook::AlreadyPassed
        );
    }
}

#[test]
fn two_stakers_on_a_shared_axis() {
    let events = vec![
        StakeEvent::new(7, "0xa", 0, 100, 100),
        StakeEvent::new(7, "0xb", 5, 50, 150),
    ];

    let a = current_conviction_by_entity(&events, "0xa", 10, 0.9);
    let b = current_conviction_by_entity(&events, "0xb", 10, 0.9);
    let expected_a = 100.0 * (1.0 - 0.9f64.powi(10)) / (1.0 - 0.9);
    let expected_b = 50.0 * (1.0 - 0.9f64.powi(5)) / (1.0 - 0.9);

    assert!(close(a, expected_a));
    assert!(close(b, expected_b));
}
