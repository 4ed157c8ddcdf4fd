//! Error types for conviction-engine.
//!
//! Only input validation can fail. The numeric core signals impossible or
//! undefined results by value (`f64::INFINITY`, NaN, [`crate::PassOutlook`]).

use thiserror::Error;

/// Result type for conviction-engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while validating engine inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A global parameter is outside its domain.
    #[error("invalid parameter {field} = {value}: {reason}")]
    InvalidParams {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Block numbers went backwards within a proposal's event sequence.
    #[error("event {index} at block {current} precedes previous block {previous}")]
    UnorderedEvents {
        index: usize,
        previous: u64,
        current: u64,
    },

    /// The recorded proposal total does not match the per-entity stakes.
    #[error("event {index} reports total {actual}, per-entity stakes sum to {expected}")]
    InconsistentTotal {
        index: usize,
        expected: u128,
        actual: u128,
    },

    /// Per-entity stakes sum to less than zero.
    #[error("event {index} reports total {actual}, per-entity stakes sum to -{deficit}")]
    NegativeTotal {
        index: usize,
        deficit: u128,
        actual: u128,
    },

    /// Per-entity stakes sum past `u128::MAX`.
    #[error("event {index} pushes the per-entity stake sum past u128::MAX")]
    TotalOverflow { index: usize },

    /// An event belongs to a different proposal than the rest of the sequence.
    #[error("event {index} belongs to proposal {actual}, expected {expected}")]
    MixedProposals {
        index: usize,
        expected: u64,
        actual: u64,
    },
}
