//! Execution threshold and the stake needed to reach it.
//!
//! A proposal requesting share `r = requested / funds` needs conviction
//!
//! ```text
//! threshold = weight * supply / (max_ratio - r)^2      for r < max_ratio
//! threshold = +inf                                     otherwise
//! ```
//!
//! Infinity means "can never pass", not overflow. NaN inputs stay NaN.

/// Minimum conviction required to execute a funding request.
///
/// ```
/// use conviction_engine::calculate_threshold;
///
/// assert!(calculate_threshold(10.0, 100.0, 1000.0, 0.2, 0.025).is_finite());
/// assert_eq!(calculate_threshold(25.0, 100.0, 1000.0, 0.2, 0.025), f64::INFINITY);
/// ```
pub fn calculate_threshold(
    requested_amount: f64,
    available_funds: f64,
    total_supply: f64,
    max_ratio: f64,
    weight: f64,
) -> f64 {
    let share = requested_amount / available_funds;
    if share >= max_ratio {
        return f64::INFINITY;
    }
    (total_supply * weight) / (max_ratio - share).powi(2)
}

/// Constant stake that would eventually reach `threshold`.
#[inline]
pub fn min_needed_stake(threshold: f64, alpha: f64) -> f64 {
    threshold * (1.0 - alpha)
}

/// Extra stake still required beyond `total_staked`; negative when the
/// current stake is already sufficient.
#[inline]
pub fn stake_shortfall(threshold: f64, total_staked: f64, alpha: f64) -> f64 {
    min_needed_stake(threshold, alpha) - total_staked
}
