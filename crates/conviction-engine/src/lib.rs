//! Conviction Voting Engine
//!
//! Time-decayed support scoring for continuous funding proposals.
//!
//! # Model
//!
//! Stakers lock tokens behind a proposal. Each block, the proposal's conviction
//! decays by `alpha` and grows by the amount currently staked:
//!
//! ```text
//! C(t+1) = alpha * C(t) + staked(t)
//! ```
//!
//! Conviction therefore converges to `staked / (1 - alpha)`, and sustained
//! support beats short bursts. A proposal becomes executable once its conviction
//! reaches a threshold that grows steeply as the requested share of the
//! organization's funds approaches `max_ratio`.
//!
//! # Purity
//!
//! Every function here is a pure function of its arguments. Parameters are
//! passed in explicitly, inputs are borrowed immutably, and nothing is cached
//! between calls. Callers re-run the engine whenever the block height or the
//! event list changes.
//!
//! # Error signalling
//!
//! Numeric entry points never fail. An unreachable threshold is
//! `f64::INFINITY`, undefined arithmetic propagates NaN, and
//! [`remaining_time_to_pass`] returns a tagged [`PassOutlook`]. Only input
//! validation ([`GlobalParams::validate`], [`validate_events`]) returns
//! [`Error`].

mod conviction;
mod error;
mod event;
mod history;
mod params;
mod proposal;
mod threshold;
mod timing;
mod trend;

pub use conviction::{calculate_conviction, current_conviction, current_conviction_by_entity, max_conviction};
pub use error::{Error, Result};
pub use event::{events_for_proposal, latest_stake_of, total_staked, validate_events, StakeEvent};
pub use history::{conviction_history, conviction_history_by_entity, ConvictionHistory, DEFAULT_HISTORY_WINDOW};
pub use params::{format_token_amount, GlobalParams, TokenMeta};
pub use proposal::{
    evaluate_proposal, normalize_lines, BlockedReason, FundingContext, Proposal, ProposalStage,
    ProposalStatus, Requirement, SupportAction, SupportBar,
};
pub use threshold::{calculate_threshold, min_needed_stake, stake_shortfall};
pub use timing::{remaining_blocks_raw, remaining_time_to_pass, PassOutlook, DEFAULT_BLOCK_TIME};
pub use trend::{conviction_trend, conviction_trend_over, TrendDirection, TrendIndicator, TREND_SPAN_BLOCKS};
