//! Closed-form conviction accumulation.
//!
//! Between two stake changes the staked amount `x` is constant and conviction
//! follows the per-block recurrence `C(t+1) = alpha * C(t) + x`. Its closed form
//! over `dt` blocks is
//!
//! ```text
//! C(t0 + dt) = alpha^dt * C(t0) + x * (1 - alpha^dt) / (1 - alpha)
//! ```
//!
//! so a whole history costs one step per stake event instead of one per block.
//! Conviction starts at 0 on the first event and tends to `x / (1 - alpha)`.

use crate::event::StakeEvent;

/// Conviction after `time_passed` blocks, starting from `initial` with
/// `amount` staked throughout.
///
/// ```
/// use conviction_engine::calculate_conviction;
///
/// let c = calculate_conviction(10, 0.0, 100.0, 0.9);
/// assert!((c - 651.3215599).abs() < 1e-6);
/// ```
#[inline]
pub fn calculate_conviction(time_passed: u64, initial: f64, amount: f64, alpha: f64) -> f64 {
    let decay = alpha.powf(time_passed as f64);
    initial * decay + amount * (1.0 - decay) / (1.0 - alpha)
}

/// Steady-state conviction if `total_staked` stayed put forever.
#[inline]
pub fn max_conviction(total_staked: f64, alpha: f64) -> f64 {
    total_staked / (1.0 - alpha)
}

/// Running accumulator over a chronological series of stake levels.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Accumulator {
    block: u64,
    conviction: f64,
    staked: f64,
}

impl Accumulator {
    /// Decay forward to `block` and switch to a new staked amount.
    fn step(self, block: u64, staked: f64, alpha: f64) -> Self {
        Self {
            block,
            conviction: self.conviction_at(block, alpha),
            staked,
        }
    }

    fn conviction_at(&self, block: u64, alpha: f64) -> f64 {
        // Out-of-order input collapses to a zero-length step instead of underflowing
        calculate_conviction(block.saturating_sub(self.block), self.conviction, self.staked, alpha)
    }
}

/// Fold `(block, staked)` points up to and including `at_block`.
fn accumulate<I>(points: I, at_block: u64, alpha: f64) -> f64
where
    I: IntoIterator<Item = (u64, f64)>,
{
    let state = points
        .into_iter()
        .take_while(|&(block, _)| block <= at_block)
        .fold(None, |state: Option<Accumulator>, (block, staked)| {
            Some(match state {
                None => Accumulator {
                    block,
                    conviction: 0.0,
                    staked,
                },
                Some(acc) => acc.step(block, staked, alpha),
            })
        });

    state.map_or(0.0, |acc| acc.conviction_at(at_block, alpha))
}

/// Conviction of a proposal's total stake as of `at_block`.
///
/// Events after `at_block` are ignored; before the first event the result is 0.
pub fn current_conviction(stake_events: &[StakeEvent], at_block: u64, alpha: f64) -> f64 {
    accumulate(
        stake_events
            .iter()
            .map(|e| (e.block_number, e.total_tokens_staked as f64)),
        at_block,
        alpha,
    )
}

/// Conviction contributed by a single `entity` as of `at_block`.
///
/// Only the entity's own events drive the recurrence, on the shared block axis.
pub fn current_conviction_by_entity(
    stake_events: &[StakeEvent],
    entity: &str,
    at_block: u64,
    alpha: f64,
) -> f64 {
    accumulate(
        stake_events
            .iter()
            .filter(|e| e.is_from(entity))
            .map(|e| (e.block_number, e.tokens_staked as f64)),
        at_block,
        alpha,
    )
}

/// Conviction `blocks_back` blocks before `at_block`.
///
/// Points before block 0 have no history and yield 0.
pub(crate) fn conviction_before(
    stake_events: &[StakeEvent],
    entity: Option<&str>,
    at_block: u64,
    blocks_back: u64,
    alpha: f64,
) -> f64 {
    let Some(block) = at_block.checked_sub(blocks_back) else {
        return 0.0;
    };
    match entity {
        Some(entity) => current_conviction_by_entity(stake_events, entity, block, alpha),
        None => current_conviction(stake_events, block, alpha),
    }
}
