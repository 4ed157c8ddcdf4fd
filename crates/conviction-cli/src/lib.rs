//! Conviction CLI
//!
//! Loads a JSON scenario (block height, proposals, stake events, funding),
//! resolves voting parameters from the environment, and reports each
//! proposal's conviction, stage and currently valid action.
//!
//! # Example
//!
//! ```no_run
//! use conviction_cli::{run, CliConfig, OutputFormat};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CliConfig::from_env()?;
//!     let report = run(Path::new("scenario.json"), &config, OutputFormat::Text)?;
//!     print!("{}", report);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod report;
pub mod scenario;

use std::path::Path;

pub use config::CliConfig;
pub use error::{Error, Result};
pub use report::{evaluate_all, render, OutputFormat};
pub use scenario::Scenario;

/// Load, validate and render a scenario file.
pub fn run(path: &Path, config: &CliConfig, format: OutputFormat) -> Result<String> {
    let scenario = Scenario::load(path)?;
    let params = config.resolve_params(scenario.params)?;
    tracing::info!(
        alpha = params.alpha,
        max_ratio = params.max_ratio,
        weight = params.weight,
        "Resolved voting parameters"
    );

    let invalid = scenario.check_events();
    if invalid > 0 {
        tracing::warn!(proposals = invalid, "Evaluating proposals with inconsistent stake events");
    }

    render(&scenario, &params, config, format)
}
