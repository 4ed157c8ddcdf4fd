//! Global voting parameters and token display metadata.
//!
//! Parameters are plain values passed into every entry point. Nothing in the
//! engine looks them up from ambient state.

use crate::error::{Error, Result};

/// Process-wide conviction voting parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalParams {
    /// Per-block decay factor in (0, 1). Closer to 1 means longer memory.
    pub alpha: f64,
    /// Maximum fraction of organization funds a single proposal may request.
    pub max_ratio: f64,
    /// Steepness of the threshold curve.
    pub weight: f64,
}

impl GlobalParams {
    pub const DEFAULT_ALPHA: f64 = 0.9;
    pub const DEFAULT_MAX_RATIO: f64 = 0.2;
    pub const DEFAULT_WEIGHT: f64 = 0.025;

    /// Create parameters without validating them.
    pub const fn new(alpha: f64, max_ratio: f64, weight: f64) -> Self {
        Self {
            alpha,
            max_ratio,
            weight,
        }
    }

    /// Check every parameter against its domain.
    ///
    /// ```
    /// use conviction_engine::GlobalParams;
    ///
    /// assert!(GlobalParams::default().validate().is_ok());
    /// assert!(GlobalParams::new(1.0, 0.2, 0.025).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(Error::InvalidParams {
                field: "alpha",
                value: self.alpha,
                reason: "must lie strictly between 0 and 1",
            });
        }
        if !(self.max_ratio > 0.0 && self.max_ratio <= 1.0) {
            return Err(Error::InvalidParams {
                field: "max_ratio",
                value: self.max_ratio,
                reason: "must lie in (0, 1]",
            });
        }
        if !(self.weight.is_finite() && self.weight >= 0.0) {
            return Err(Error::InvalidParams {
                field: "weight",
                value: self.weight,
                reason: "must be finite and non-negative",
            });
        }
        Ok(())
    }
}

impl Default for GlobalParams {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_ALPHA,
            Self::DEFAULT_MAX_RATIO,
            Self::DEFAULT_WEIGHT,
        )
    }
}

/// Stake token metadata, used only for display.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenMeta {
    pub symbol: String,
    pub decimals: u8,
}

impl TokenMeta {
    pub fn new(symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Format a raw amount followed by the token symbol.
    pub fn format(&self, amount: i128) -> String {
        format!("{} {}", format_token_amount(amount, self.decimals), self.symbol)
    }
}

impl Default for TokenMeta {
    fn default() -> Self {
        Self::new("TKN", 18)
    }
}

/// Render a raw integer token amount as a decimal string.
///
/// Trailing fractional zeros are trimmed.
///
/// ```
/// use conviction_engine::format_token_amount;
///
/// assert_eq!(format_token_amount(1_500_000_000_000_000_000, 18), "1.5");
/// assert_eq!(format_token_amount(-250, 2), "-2.5");
/// assert_eq!(format_token_amount(42, 0), "42");
/// ```
pub fn format_token_amount(amount: i128, decimals: u8) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let magnitude = amount.unsigned_abs();

    // 10^39 overflows u128; anything that wide has no integer part anyway
    let Some(base) = 10u128.checked_pow(u32::from(decimals)) else {
        return format!("{}0.{:0>width$}", sign, magnitude, width = decimals as usize)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string();
    };

    let whole = magnitude / base;
    let fraction = magnitude % base;
    if fraction == 0 {
        return format!("{}{}", sign, whole);
    }

    let fraction = format!("{:0>width$}", fraction, width = decimals as usize);
    format!("{}{}.{}", sign, whole, fraction.trim_end_matches('0'))
}
