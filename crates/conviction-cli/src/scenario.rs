//! Scenario files: a snapshot of everything the backend would feed the engine.

use std::path::Path;

use conviction_engine::{
    events_for_proposal, validate_events, FundingContext, GlobalParams, Proposal, StakeEvent,
    TokenMeta,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// A block height plus the proposals and stake events visible at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Current block height
    pub block: u64,
    pub proposals: Vec<Proposal>,
    #[serde(default)]
    pub events: Vec<StakeEvent>,
    pub funding: FundingContext,
    #[serde(default)]
    pub token: Option<TokenMeta>,
    #[serde(default)]
    pub params: Option<GlobalParams>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let scenario = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            block = scenario.block,
            proposals = scenario.proposals.len(),
            events = scenario.events.len(),
            "Loaded scenario"
        );
        Ok(scenario)
    }

    /// Stake events for one proposal, in feed order.
    pub fn stakes_for(&self, proposal_id: u64) -> Vec<StakeEvent> {
        events_for_proposal(&self.events, proposal_id).cloned().collect()
    }

    /// Check every proposal's event sequence, logging problems.
    ///
    /// Returns the number of proposals whose events failed validation. The
    /// engine still evaluates them.
    pub fn check_events(&self) -> usize {
        self.proposals
            .iter()
            .filter(|proposal| match validate_events(&self.stakes_for(proposal.id)) {
                Ok(()) => false,
                Err(e) => {
                    warn!(proposal = proposal.id, error = %e, "Inconsistent stake events");
                    true
                }
            })
            .count()
    }

    pub fn token(&self) -> TokenMeta {
        self.token.clone().unwrap_or_default()
    }
}
