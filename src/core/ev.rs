//! Expected Value
//!
//! ```text
//! EV = decimal_odds * p - 1
//! implied = 1 / decimal_odds
//! edge = p - implied
//! ```
//!
//! All percentages are on a 0-100 scale.

use crate::error::{validate_decimal_odds, validate_probability_pct, Result};
use crate::models::EvaluationResult;

/// Evaluate a single bet
///
/// # Arguments
/// * `decimal_odds` - Canonical decimal odds (> 1.0)
/// * `win_probability_pct` - User-estimated win probability (0-100, exclusive)
///
/// # Examples
/// ```
/// use betvalue::core::ev::evaluate;
///
/// let eval = evaluate(2.5, 45.0).unwrap();
/// assert!((eval.expected_value_pct - 12.5).abs() < 1e-9);
/// assert!((eval.implied_probability_pct - 40.0).abs() < 1e-9);
/// assert!((eval.edge_pct - 5.0).abs() < 1e-9);
/// ```
pub fn evaluate(decimal_odds: f64, win_probability_pct: f64) -> Result<EvaluationResult> {
    validate_decimal_odds(decimal_odds)?;
    validate_probability_pct(win_probability_pct)?;

    let implied_probability_pct = 100.0 / decimal_odds;
    let expected_value = decimal_odds * (win_probability_pct / 100.0) - 1.0;

    Ok(EvaluationResult {
        decimal_odds,
        implied_probability_pct,
        win_probability_pct,
        edge_pct: win_probability_pct - implied_probability_pct,
        expected_value_pct: expected_value * 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BetError;

    #[test]
    fn test_evaluate_positive_ev() {
        let eval = evaluate(2.5, 45.0).unwrap();
        assert!((eval.expected_value_pct - 12.5).abs() < 1e-9);
        assert!((eval.implied_probability_pct - 40.0).abs() < 1e-9);
        assert!((eval.edge_pct - 5.0).abs() < 1e-9);
        assert!(eval.is_positive_ev());
        assert!((eval.expected_value() - 0.125).abs() < 1e-9);
    }

    #[test]
    fn test_evaluate_negative_ev() {
        let eval = evaluate(1.5, 50.0).unwrap();
        assert!((eval.expected_value_pct + 25.0).abs() < 1e-9);
        assert!(eval.edge_pct < 0.0);
        assert!(!eval.is_positive_ev());
    }

    #[test]
    fn test_evaluate_fair_odds() {
        let eval = evaluate(2.0, 50.0).unwrap();
        assert!(eval.expected_value_pct.abs() < 1e-9);
        assert!(!eval.is_positive_ev());
    }

    #[test]
    fn test_evaluate_invalid_inputs() {
        assert!(matches!(evaluate(1.0, 50.0), Err(BetError::InvalidOdds(_))));
        assert!(matches!(
            evaluate(2.0, 0.0),
            Err(BetError::InvalidProbability(_))
        ));
        assert!(matches!(
            evaluate(2.0, 100.0),
            Err(BetError::InvalidProbability(_))
        ));
    }

    #[test]
    fn test_evaluate_is_pure() {
        assert_eq!(evaluate(3.1, 37.0).unwrap(), evaluate(3.1, 37.0).unwrap());
    }
}
