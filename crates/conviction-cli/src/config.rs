//! CLI configuration from the environment.
//!
//! Parameter precedence: environment, then the scenario file, then
//! [`GlobalParams::default`].

use std::str::FromStr;
use std::time::Duration;

use conviction_engine::{GlobalParams, DEFAULT_BLOCK_TIME};

use crate::error::{Error, Result};

pub const ENV_ALPHA: &str = "CONVICTION_ALPHA";
pub const ENV_MAX_RATIO: &str = "CONVICTION_MAX_RATIO";
pub const ENV_WEIGHT: &str = "CONVICTION_WEIGHT";
pub const ENV_BLOCK_TIME: &str = "CONVICTION_BLOCK_TIME_SECS";
pub const ENV_VIEWER: &str = "CONVICTION_VIEWER";

/// Configuration for a report run.
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// Overrides for individual voting parameters
    pub alpha: Option<f64>,
    pub max_ratio: Option<f64>,
    pub weight: Option<f64>,

    /// Block time used for the countdown estimate
    pub block_time: Duration,

    /// Connected account whose own stake is highlighted
    pub viewer: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            alpha: None,
            max_ratio: None,
            weight: None,
            block_time: DEFAULT_BLOCK_TIME,
            viewer: None,
        }
    }
}

impl CliConfig {
    /// Create config from environment variables with defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Create config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let block_time = parse_var::<f64, _>(&lookup, ENV_BLOCK_TIME)?
            .map(|secs| {
                Duration::try_from_secs_f64(secs).map_err(|_| Error::InvalidEnv {
                    var: ENV_BLOCK_TIME,
                    value: secs.to_string(),
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_BLOCK_TIME);

        let viewer = lookup(ENV_VIEWER)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Ok(Self {
            alpha: parse_var(&lookup, ENV_ALPHA)?,
            max_ratio: parse_var(&lookup, ENV_MAX_RATIO)?,
            weight: parse_var(&lookup, ENV_WEIGHT)?,
            block_time,
            viewer,
        })
    }

    /// Merge overrides onto the scenario's parameters and validate the result.
    pub fn resolve_params(&self, from_file: Option<GlobalParams>) -> Result<GlobalParams> {
        let base = from_file.unwrap_or_default();
        let params = GlobalParams {
            alpha: self.alpha.unwrap_or(base.alpha),
            max_ratio: self.max_ratio.unwrap_or(base.max_ratio),
            weight: self.weight.unwrap_or(base.weight),
        };
        params.validate()?;
        Ok(params)
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidEnv { var, value: raw }),
    }
}
