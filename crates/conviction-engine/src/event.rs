//! Stake events: the time axis conviction is integrated over.
//!
//! One event per on-chain stake or withdraw action. `tokens_staked` is the
//! entity's stake *after* the action, not a delta, and `total_tokens_staked`
//! is the proposal-wide total after the action.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// An immutable stake change on a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StakeEvent {
    /// Target proposal
    pub proposal_id: u64,
    /// Opaque staker identity (address-like)
    pub entity: String,
    /// Block at which the stake changed
    pub block_number: u64,
    /// Entity's staked amount after this event
    pub tokens_staked: i128,
    /// Proposal-wide staked total after this event
    pub total_tokens_staked: u128,
}

impl StakeEvent {
    pub fn new(
        proposal_id: u64,
        entity: impl Into<String>,
        block_number: u64,
        tokens_staked: i128,
        total_tokens_staked: u128,
    ) -> Self {
        Self {
            proposal_id,
            entity: entity.into(),
            block_number,
            tokens_staked,
            total_tokens_staked,
        }
    }

    /// Whether this event was emitted by `entity`.
    #[inline]
    pub fn is_from(&self, entity: &str) -> bool {
        self.entity == entity
    }
}

/// Events for one proposal, in feed order.
pub fn events_for_proposal(
    events: &[StakeEvent],
    proposal_id: u64,
) -> impl Iterator<Item = &StakeEvent> + Clone {
    events.iter().filter(move |e| e.proposal_id == proposal_id)
}

/// Proposal total after the last event, or 0 when nothing was staked.
pub fn total_staked<'a, I>(events: I) -> u128
where
    I: IntoIterator<Item = &'a StakeEvent>,
{
    events
        .into_iter()
        .last()
        .map_or(0, |e| e.total_tokens_staked)
}

/// Latest `tokens_staked` of `entity`, or `None` if it never staked.
pub fn latest_stake_of<'a, I>(events: I, entity: &str) -> Option<i128>
where
    I: IntoIterator<Item = &'a StakeEvent>,
{
    events
        .into_iter()
        .filter(|e| e.is_from(entity))
        .last()
        .map(|e| e.tokens_staked)
}

/// Running sum of per-entity stakes.
///
/// Kept as a settled credit/debit pair so any total that fits the `u128`
/// field of an event is representable, including sums past `i128::MAX`.
#[derive(Debug, Default)]
struct StakeSum {
    credit: u128,
    debit: u128,
}

impl StakeSum {
    fn shift(&mut self, amount: u128, up: bool) -> Option<()> {
        let side = if up { &mut self.credit } else { &mut self.debit };
        *side = side.checked_add(amount)?;
        let settled = self.credit.min(self.debit);
        self.credit -= settled;
        self.debit -= settled;
        Some(())
    }

    /// Swap one entity's stake from `old` to `new`.
    fn replace(&mut self, old: i128, new: i128) -> Option<()> {
        self.shift(old.unsigned_abs(), old < 0)?;
        self.shift(new.unsigned_abs(), new >= 0)
    }

    /// The sum, or the amount it falls below zero.
    fn net(&self) -> std::result::Result<u128, u128> {
        if self.debit == 0 {
            Ok(self.credit)
        } else {
            Err(self.debit)
        }
    }
}

/// Check the invariants of a single proposal's event sequence.
///
/// - all events target the same proposal
/// - block numbers never decrease
/// - each total equals the sum of the latest per-entity stakes
///
/// The engine computes on unvalidated input as well; this is for feeds that
/// want to reject bad data before display.
pub fn validate_events(events: &[StakeEvent]) -> Result<()> {
    let Some(first) = events.first() else {
        return Ok(());
    };

    let mut latest: HashMap<&str, i128> = HashMap::new();
    let mut sum = StakeSum::default();
    let mut previous_block = first.block_number;

    for (index, event) in events.iter().enumerate() {
        if event.proposal_id != first.proposal_id {
            return Err(Error::MixedProposals {
                index,
                expected: first.proposal_id,
                actual: event.proposal_id,
            });
        }

        if event.block_number < previous_block {
            return Err(Error::UnorderedEvents {
                index,
                previous: previous_block,
                current: event.block_number,
            });
        }
        previous_block = event.block_number;

        let previous = latest
            .insert(event.entity.as_str(), event.tokens_staked)
            .unwrap_or(0);
        sum.replace(previous, event.tokens_staked)
            .ok_or(Error::TotalOverflow { index })?;

        match sum.net() {
            Ok(expected) if expected == event.total_tokens_staked => {}
            Ok(expected) => {
                return Err(Error::InconsistentTotal {
                    index,
                    expected,
                    actual: event.total_tokens_staked,
                })
            }
            Err(deficit) => {
                return Err(Error::NegativeTotal {
                    index,
                    deficit,
                    actual: event.total_tokens_staked,
                })
            }
        }
    }

    Ok(())
}
