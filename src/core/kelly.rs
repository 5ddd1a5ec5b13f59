//! Kelly Criterion Bet Sizing
//!
//! Optimal bet sizing based on edge and odds using Kelly criterion.
//!
//! The Kelly criterion formula:
//!     f* = (b*p - q) / b = (p*odds - 1) / (odds - 1)
//!
//! Where:
//!     f* = fraction of bankroll to bet
//!     b = odds - 1 (net odds)
//!     p = probability of winning
//!     q = 1 - p (probability of losing)
//!     odds = decimal odds (e.g., 2.5 means 2.5x return)
//!
//! Negative f* is clamped to zero: a bet without edge gets no stake, never a lay.

use crate::error::{
    validate_bankroll, validate_probability_pct, validate_risk_fraction, BetError, Result,
};
use crate::models::{EvaluationResult, KellyRecommendation};

/// Default conservatism multiplier (half Kelly)
pub const DEFAULT_RISK_FRACTION: f64 = 0.5;

/// Calculate the full Kelly fraction for a single bet
///
/// # Arguments
/// * `probability` - Estimated probability of winning (0-1)
/// * `odds` - Decimal odds
///
/// # Returns
/// Unclamped Kelly fraction (negative when EV < 0)
///
/// # Examples
/// ```
/// use betvalue::core::kelly::calculate_kelly_fraction;
/// let kelly = calculate_kelly_fraction(0.45, 2.5).unwrap();
/// assert!((kelly - 0.083333).abs() < 0.0001);
/// ```
pub fn calculate_kelly_fraction(probability: f64, odds: f64) -> Result<f64> {
    let b = odds - 1.0;
    if !b.is_finite() || b <= 0.0 {
        return Err(BetError::DegenerateOdds(odds));
    }

    // f* = (b*p - q) / b, same as (p * odds - 1) / b
    let q = 1.0 - probability;
    Ok((b * probability - q) / b)
}

/// Calculate a Kelly stake recommendation
///
/// # Arguments
/// * `decimal_odds` - Canonical decimal odds
/// * `win_probability_pct` - Estimated win probability (0-100)
/// * `bankroll` - Current bankroll amount
/// * `risk_fraction` - Kelly multiplier in (0, 1] (0.5 = half Kelly)
///
/// # Examples
/// ```
/// use betvalue::core::kelly::kelly_stake;
/// let rec = kelly_stake(2.5, 45.0, 1000.0, 0.5).unwrap();
/// assert!((rec.recommended_stake - 41.6667).abs() < 0.001);
/// ```
pub fn kelly_stake(
    decimal_odds: f64,
    win_probability_pct: f64,
    bankroll: f64,
    risk_fraction: f64,
) -> Result<KellyRecommendation> {
    validate_probability_pct(win_probability_pct)?;
    let raw = calculate_kelly_fraction(win_probability_pct / 100.0, decimal_odds)?;
    validate_bankroll(bankroll)?;
    validate_risk_fraction(risk_fraction)?;

    let kelly_fraction_raw = raw.max(0.0);
    let adjusted_fraction = kelly_fraction_raw * risk_fraction;
    let recommended_stake = adjusted_fraction * bankroll;

    Ok(KellyRecommendation {
        kelly_fraction_raw,
        adjusted_fraction,
        recommended_stake,
        potential_profit: recommended_stake * (decimal_odds - 1.0),
    })
}

/// Kelly criterion calculator bound to a bankroll and risk fraction
///
/// Supports:
/// - Full Kelly (risk fraction 1.0, aggressive)
/// - Fractional Kelly (conservative, default 1/2)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KellyCalculator {
    bankroll: f64,
    risk_fraction: f64,
}

impl KellyCalculator {
    /// Create a new Kelly calculator
    ///
    /// # Arguments
    /// * `bankroll` - Bankroll amount (>= 0)
    /// * `risk_fraction` - Fraction of Kelly to use, in (0, 1]
    pub fn new(bankroll: f64, risk_fraction: f64) -> Result<Self> {
        validate_bankroll(bankroll)?;
        validate_risk_fraction(risk_fraction)?;
        Ok(Self {
            bankroll,
            risk_fraction,
        })
    }

    /// Create with half Kelly
    pub fn with_defaults(bankroll: f64) -> Result<Self> {
        Self::new(bankroll, DEFAULT_RISK_FRACTION)
    }

    pub fn bankroll(&self) -> f64 {
        self.bankroll
    }

    pub fn risk_fraction(&self) -> f64 {
        self.risk_fraction
    }

    /// Calculate bet sizing for a single bet
    pub fn calculate_single(
        &self,
        decimal_odds: f64,
        win_probability_pct: f64,
    ) -> Result<KellyRecommendation> {
        kelly_stake(
            decimal_odds,
            win_probability_pct,
            self.bankroll,
            self.risk_fraction,
        )
    }

    /// Size a bet that has already been evaluated
    pub fn recommend(&self, eval: &EvaluationResult) -> Result<KellyRecommendation> {
        self.calculate_single(eval.decimal_odds, eval.win_probability_pct)
    }
}
