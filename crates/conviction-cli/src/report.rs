//! Text and JSON rendering of proposal snapshots.

use std::fmt::Write;
use std::time::Duration;

use conviction_engine::{
    evaluate_proposal, BlockedReason, GlobalParams, ProposalStage, ProposalStatus, Requirement,
    SupportAction, SupportBar, TokenMeta, TrendIndicator,
};
use serde::Serialize;

use crate::config::CliConfig;
use crate::error::Result;
use crate::scenario::Scenario;

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Evaluate every proposal in the scenario.
pub fn evaluate_all(scenario: &Scenario, params: &GlobalParams, viewer: Option<&str>) -> Vec<ProposalStatus> {
    scenario
        .proposals
        .iter()
        .map(|proposal| {
            evaluate_proposal(
                proposal,
                &scenario.events,
                &scenario.funding,
                params,
                scenario.block,
                viewer,
            )
        })
        .collect()
}

#[derive(Serialize)]
struct JsonReport<'a> {
    block: u64,
    params: &'a GlobalParams,
    proposals: Vec<JsonProposal<'a>>,
}

#[derive(Serialize)]
struct JsonProposal<'a> {
    #[serde(flatten)]
    status: &'a ProposalStatus,
    support_bar: SupportBar,
    trend_indicator: Option<TrendIndicator>,
}

impl<'a> From<&'a ProposalStatus> for JsonProposal<'a> {
    fn from(status: &'a ProposalStatus) -> Self {
        Self {
            status,
            support_bar: status.support_bar(),
            trend_indicator: status.trend_indicator(),
        }
    }
}

/// Render the report in the requested format.
pub fn render(
    scenario: &Scenario,
    params: &GlobalParams,
    config: &CliConfig,
    format: OutputFormat,
) -> Result<String> {
    let statuses = evaluate_all(scenario, params, config.viewer.as_deref());
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&JsonReport {
            block: scenario.block,
            params,
            proposals: statuses.iter().map(JsonProposal::from).collect(),
        })?),
        OutputFormat::Text => {
            let token = scenario.token();
            let mut out = String::new();
            for (proposal, status) in scenario.proposals.iter().zip(&statuses) {
                render_status(&mut out, proposal.requested_amount, status, &token, config.block_time)?;
            }
            Ok(out)
        }
    }
}

/// Placeholder for values that cannot be shown as a number.
const UNDEFINED: &str = "n/a";

fn render_status(
    out: &mut impl Write,
    requested: u128,
    status: &ProposalStatus,
    token: &TokenMeta,
    block_time: Duration,
) -> std::fmt::Result {
    let bar = status.support_bar();
    let staked = bar
        .staked_percent()
        .map_or_else(|| UNDEFINED.to_string(), |p| format!("{}%", p));
    let needed = match bar.requirement() {
        Requirement::Percent(p) => format!("{}%", p),
        Requirement::Unreachable => "∞".to_string(),
        Requirement::Undefined => UNDEFINED.to_string(),
    };
    let trend = status
        .trend_indicator()
        .map_or_else(|| UNDEFINED.to_string(), |t| t.to_string());

    writeln!(
        out,
        "Proposal #{} (requesting {})",
        status.proposal_id,
        token.format(i128::try_from(requested).unwrap_or(i128::MAX))
    )?;
    writeln!(out, "  conviction  {} ({} needed)", staked, needed)?;
    writeln!(out, "  status      {}", describe_stage(status, token, block_time))?;
    writeln!(out, "  action      {}", describe_action(status.action()))?;
    writeln!(out, "  trend       {}", trend)
}

fn describe_stage(status: &ProposalStatus, token: &TokenMeta, block_time: Duration) -> String {
    match status.stage {
        ProposalStage::Executed => "✓ Executed".to_string(),
        ProposalStage::Available => "✓ Available for execution".to_string(),
        ProposalStage::MayPass { blocks } => {
            let eta = status
                .outlook
                .estimated_duration(block_time)
                .map(|d| format!(" ({})", format_duration(d)))
                .unwrap_or_default();
            format!("✓ May pass, estimate until pass {:.0} blocks{}", blocks.ceil(), eta)
        }
        ProposalStage::UnableToPass(BlockedReason::InsufficientStake { shortfall }) => {
            if shortfall.is_finite() {
                // A ceiling that only touches the threshold still needs one more unit
                format!(
                    "✘ Won't pass: insufficient staked tokens (at least {} more needed)",
                    token.format(shortfall.ceil().max(1.0) as i128)
                )
            } else {
                "✘ Won't pass: insufficient staked tokens".to_string()
            }
        }
        ProposalStage::UnableToPass(BlockedReason::RequestTooLarge { max_ratio }) => format!(
            "✘ Won't pass: not enough funds in the organization (funding requests must be below {}% of total funds)",
            max_ratio * 100.0
        ),
    }
}

fn describe_action(action: SupportAction) -> &'static str {
    match action {
        SupportAction::Execute => "Execute proposal",
        SupportAction::Withdraw => "Withdraw support",
        SupportAction::Support => "Support this proposal",
    }
}

/// Compact `1d 2h 3m 4s` rendering, dropping leading zero units.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let units = [
        (total / 86_400, "d"),
        ((total % 86_400) / 3_600, "h"),
        ((total % 3_600) / 60, "m"),
        (total % 60, "s"),
    ];

    let parts: Vec<String> = units
        .iter()
        .skip_while(|(value, _)| *value == 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect();

    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}
