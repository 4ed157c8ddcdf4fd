//! Time-to-pass estimates.
//!
//! With `x` staked, conviction approaches the ceiling `m = x / (1 - alpha)` as
//! `y(t) = m - (m - y0) * alpha^t`. Solving `y(t) = threshold` for `t` gives
//!
//! ```text
//! t = ln((m - threshold) / (m - y0)) / ln(alpha)
//! ```
//!
//! which only has a finite positive solution while `y0 < threshold < m`.

use std::time::Duration;

use crate::conviction::max_conviction;

/// Block time the countdown assumes when none is configured.
pub const DEFAULT_BLOCK_TIME: Duration = Duration::from_secs(15);

/// Whether and when a proposal's conviction crosses its threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PassOutlook {
    /// Conviction already meets the threshold
    AlreadyPassed,
    /// The current stake can never reach the threshold
    NeverPasses,
    /// Conviction reaches the threshold after this many blocks
    WillPassIn { blocks: f64 },
    /// An input was NaN
    Undetermined,
}

impl PassOutlook {
    /// Remaining blocks, when passing is pending.
    pub fn blocks(&self) -> Option<f64> {
        match self {
            Self::WillPassIn { blocks } => Some(*blocks),
            _ => None,
        }
    }

    /// Wall-clock estimate for a pending pass.
    pub fn estimated_duration(&self, block_time: Duration) -> Option<Duration> {
        let blocks = self.blocks()?;
        Duration::try_from_secs_f64(blocks * block_time.as_secs_f64()).ok()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::WillPassIn { .. })
    }
}

/// Blocks until `current_conviction` reaches `threshold`, as the bare
/// logarithmic formula.
///
/// The result is only meaningful inside `current < threshold < ceiling`;
/// outside it is 0, negative, infinite or NaN. Prefer
/// [`remaining_time_to_pass`], which classifies those cases.
pub fn remaining_blocks_raw(
    threshold: f64,
    current_conviction: f64,
    total_staked: f64,
    alpha: f64,
) -> f64 {
    let ceiling = max_conviction(total_staked, alpha);
    ((ceiling - threshold) / (ceiling - current_conviction)).ln() / alpha.ln()
}

/// Classify how a proposal's conviction relates to its threshold.
///
/// ```
/// use conviction_engine::{remaining_time_to_pass, PassOutlook};
///
/// assert_eq!(remaining_time_to_pass(500.0, 600.0, 100.0, 0.9), PassOutlook::AlreadyPassed);
/// assert_eq!(remaining_time_to_pass(2000.0, 600.0, 100.0, 0.9), PassOutlook::NeverPasses);
/// assert!(remaining_time_to_pass(900.0, 600.0, 100.0, 0.9).is_pending());
/// ```
pub fn remaining_time_to_pass(
    threshold: f64,
    current_conviction: f64,
    total_staked: f64,
    alpha: f64,
) -> PassOutlook {
    if threshold.is_nan() || current_conviction.is_nan() || total_staked.is_nan() || alpha.is_nan()
    {
        return PassOutlook::Undetermined;
    }
    if current_conviction >= threshold {
        return PassOutlook::AlreadyPassed;
    }

    // Reaching the ceiling exactly takes infinite time
    let ceiling = max_conviction(total_staked, alpha);
    if ceiling <= threshold {
        return PassOutlook::NeverPasses;
    }

    let blocks = remaining_blocks_raw(threshold, current_conviction, total_staked, alpha);
    if blocks.is_finite() && blocks > 0.0 {
        PassOutlook::WillPassIn { blocks }
    } else {
        PassOutlook::Undetermined
    }
}
