//! Short-horizon conviction trend.

use crate::conviction::{conviction_before, current_conviction};
use crate::event::StakeEvent;

/// How far back the trend looks, in blocks.
pub const TREND_SPAN_BLOCKS: u64 = 20;

/// Signed change in conviction over the last [`TREND_SPAN_BLOCKS`] blocks,
/// as a fraction of `max`.
pub fn conviction_trend(stake_events: &[StakeEvent], max: f64, at_block: u64, alpha: f64) -> f64 {
    conviction_trend_over(stake_events, max, at_block, alpha, TREND_SPAN_BLOCKS)
}

/// [`conviction_trend`] over an explicit `span`.
pub fn conviction_trend_over(
    stake_events: &[StakeEvent],
    max: f64,
    at_block: u64,
    alpha: f64,
    span: u64,
) -> f64 {
    let earlier = conviction_before(stake_events, None, at_block, span, alpha);
    let current = current_conviction(stake_events, at_block, alpha);
    (current - earlier) / max
}

/// Arrow direction of a trend indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrendDirection {
    Up,
    Down,
}

impl TrendDirection {
    pub fn arrow(self) -> char {
        match self {
            Self::Up => '↑',
            Self::Down => '↓',
        }
    }
}

/// Display form of a trend: an arrow plus a rounded percentage.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrendIndicator {
    pub direction: TrendDirection,
    /// Whole percent above 10%, one decimal below
    pub percentage: f64,
}

impl TrendIndicator {
    pub fn from_trend(trend: f64) -> Self {
        let direction = if trend > 0.0 {
            TrendDirection::Up
        } else {
            TrendDirection::Down
        };
        let percentage = if trend > 0.1 {
            (trend * 100.0).round()
        } else {
            (trend * 1000.0).round() / 10.0
        };
        Self {
            direction,
            percentage,
        }
    }
}

impl std::fmt::Display for TrendIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.percentage > 0.0 { "+" } else { "" };
        write!(f, "{} {}{}%", self.direction.arrow(), sign, self.percentage)
    }
}
