//! Proposal evaluation: engine outputs combined into a decision snapshot.
//!
//! [`evaluate_proposal`] is what a display layer calls on every new block or
//! stake event. It keeps no state between calls.

use tracing::{debug, trace};

use crate::conviction::{current_conviction, current_conviction_by_entity, max_conviction};
use crate::event::{latest_stake_of, total_staked, StakeEvent};
use crate::params::GlobalParams;
use crate::threshold::{calculate_threshold, stake_shortfall};
use crate::timing::{remaining_time_to_pass, PassOutlook};
use crate::trend::{conviction_trend, TrendIndicator};

/// A funding proposal as read from the backend.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Proposal {
    pub id: u64,
    pub requested_amount: u128,
    #[cfg_attr(feature = "serde", serde(default))]
    pub executed: bool,
}

impl Proposal {
    pub fn new(id: u64, requested_amount: u128) -> Self {
        Self {
            id,
            requested_amount,
            executed: false,
        }
    }
}

/// Organization balances a threshold is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FundingContext {
    /// Request-token balance of the organization
    pub available_funds: u128,
    /// Stake-token supply
    pub total_supply: u128,
}

/// Why a proposal cannot pass with its current support.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockedReason {
    /// More stake is needed; `shortfall` is in raw stake-token units
    InsufficientStake { shortfall: f64 },
    /// The request is at or above `max_ratio` of the funds
    RequestTooLarge { max_ratio: f64 },
}

/// Lifecycle stage derived from conviction and threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProposalStage {
    Executed,
    /// Conviction meets the threshold
    Available,
    /// Current stake reaches the threshold in `blocks`
    MayPass { blocks: f64 },
    UnableToPass(BlockedReason),
}

impl std::fmt::Display for ProposalStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Executed => write!(f, "executed"),
            Self::Available => write!(f, "available for execution"),
            Self::MayPass { .. } => write!(f, "may pass"),
            Self::UnableToPass(_) => write!(f, "won't pass"),
        }
    }
}

/// The action a viewer can currently take on a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SupportAction {
    Execute,
    Withdraw,
    Support,
}

/// Support-bar segments, each a fraction of the maximum conviction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupportBar {
    /// Viewer's own conviction
    pub own: f64,
    /// Everyone else's conviction
    pub others: f64,
    /// Growth still to come at the current stake
    pub projected: f64,
    /// Conviction needed to pass
    pub required: f64,
}

/// How much of the bar a proposal needs to pass.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Requirement {
    /// Whole percent of the maximum conviction
    Percent(f64),
    /// The threshold is infinite
    Unreachable,
    /// The threshold or the maximum is NaN
    Undefined,
}

impl SupportBar {
    /// Current conviction as a whole percentage, `None` when not finite.
    pub fn staked_percent(&self) -> Option<f64> {
        let percent = ((self.own + self.others) * 100.0).round();
        percent.is_finite().then_some(percent)
    }

    pub fn requirement(&self) -> Requirement {
        if self.required.is_nan() {
            Requirement::Undefined
        } else if self.required.is_infinite() {
            Requirement::Unreachable
        } else {
            Requirement::Percent((self.required * 100.0).round())
        }
    }

    /// Needed conviction as a whole percentage, `None` when it is not finite.
    pub fn needed_percent(&self) -> Option<f64> {
        match self.requirement() {
            Requirement::Percent(percent) => Some(percent),
            Requirement::Unreachable | Requirement::Undefined => None,
        }
    }
}

/// Everything a display needs to know about one proposal at one block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProposalStatus {
    pub proposal_id: u64,
    pub at_block: u64,
    pub executed: bool,
    pub conviction: f64,
    pub viewer_conviction: f64,
    /// Viewer's latest stake on this proposal
    pub viewer_stake: Option<i128>,
    pub total_staked: u128,
    pub threshold: f64,
    /// Maximum conviction of the whole token supply
    pub max: f64,
    /// Steady state of the current total stake
    pub future_conviction: f64,
    pub shortfall: f64,
    pub outlook: PassOutlook,
    pub trend: f64,
    pub stage: ProposalStage,
}

impl ProposalStatus {
    /// Whether conviction currently meets the threshold.
    pub fn can_execute(&self) -> bool {
        !self.executed && self.conviction >= self.threshold
    }

    /// The action valid for the viewer right now.
    pub fn action(&self) -> SupportAction {
        if self.can_execute() {
            SupportAction::Execute
        } else if self.viewer_stake.is_some_and(|stake| stake > 0) {
            SupportAction::Withdraw
        } else {
            SupportAction::Support
        }
    }

    pub fn support_bar(&self) -> SupportBar {
        SupportBar {
            own: self.viewer_conviction / self.max,
            others: (self.conviction - self.viewer_conviction) / self.max,
            projected: (self.future_conviction - self.conviction) / self.max,
            required: self.threshold / self.max,
        }
    }

    /// Display form of the trend, `None` when the trend is not finite.
    pub fn trend_indicator(&self) -> Option<TrendIndicator> {
        self.trend
            .is_finite()
            .then(|| TrendIndicator::from_trend(self.trend))
    }
}

/// Evaluate `proposal` at `at_block`.
///
/// `events` may span several proposals; only those for `proposal.id` are used,
/// in their given order.
pub fn evaluate_proposal(
    proposal: &Proposal,
    events: &[StakeEvent],
    funding: &FundingContext,
    params: &GlobalParams,
    at_block: u64,
    viewer: Option<&str>,
) -> ProposalStatus {
    let stakes: Vec<StakeEvent> = events
        .iter()
        .filter(|e| e.proposal_id == proposal.id)
        .cloned()
        .collect();
    trace!(proposal = proposal.id, events = stakes.len(), "evaluating proposal");

    let alpha = params.alpha;
    let total = total_staked(&stakes);

    let conviction = current_conviction(&stakes, at_block, alpha);
    let viewer_conviction = viewer
        .map(|entity| current_conviction_by_entity(&stakes, entity, at_block, alpha))
        .unwrap_or(0.0);
    let viewer_stake = viewer.and_then(|entity| latest_stake_of(&stakes, entity));

    let threshold = calculate_threshold(
        proposal.requested_amount as f64,
        funding.available_funds as f64,
        funding.total_supply as f64,
        params.max_ratio,
        params.weight,
    );
    let max = max_conviction(funding.total_supply as f64, alpha);
    let future_conviction = max_conviction(total as f64, alpha);
    let shortfall = stake_shortfall(threshold, total as f64, alpha);
    let outlook = remaining_time_to_pass(threshold, conviction, total as f64, alpha);
    let trend = conviction_trend(&stakes, max, at_block, alpha);

    let stage = if proposal.executed {
        ProposalStage::Executed
    } else if conviction >= threshold {
        ProposalStage::Available
    } else if let PassOutlook::WillPassIn { blocks } = outlook {
        ProposalStage::MayPass { blocks }
    } else if threshold.is_finite() {
        ProposalStage::UnableToPass(BlockedReason::InsufficientStake { shortfall })
    } else {
        ProposalStage::UnableToPass(BlockedReason::RequestTooLarge {
            max_ratio: params.max_ratio,
        })
    };

    debug!(
        proposal = proposal.id,
        block = at_block,
        conviction,
        threshold,
        stage = %stage,
        "proposal evaluated"
    );

    ProposalStatus {
        proposal_id: proposal.id,
        at_block,
        executed: proposal.executed,
        conviction,
        viewer_conviction,
        viewer_stake,
        total_staked: total,
        threshold,
        max,
        future_conviction,
        shortfall,
        outlook,
        trend,
        stage,
    }
}

/// Scale chart series so the largest value (or a finite threshold) maps to 1.
///
/// Returns the scaled series and the scaled threshold; an infinite or NaN
/// threshold is pinned to 1.
pub fn normalize_lines(lines: &[Vec<f64>], threshold: f64) -> (Vec<Vec<f64>>, f64) {
    let finite_threshold = threshold.is_finite().then_some(threshold);
    let peak = lines
        .iter()
        .flatten()
        .copied()
        .chain(finite_threshold)
        .fold(f64::NEG_INFINITY, f64::max);

    if !(peak > 0.0) {
        return (lines.to_vec(), finite_threshold.map_or(1.0, |_| 0.0));
    }

    let scaled = lines
        .iter()
        .map(|line| line.iter().map(|v| v / peak).collect())
        .collect();
    (scaled, finite_threshold.map_or(1.0, |t| t / peak))
}
