//! Odds Normalization
//!
//! Converts a bookmaker quotation into canonical decimal odds:
//!     American a > 0  -> a/100 + 1
//!     American a < 0  -> 100/|a| + 1
//!     Decimal d       -> d
//!     Fractional n/d  -> n/d + 1
//!
//! No rounding is applied; callers round for display only.

use crate::error::{validate_decimal_odds, BetError, Result};
use crate::models::{OddsFormat, OddsQuote};

/// Convert a quotation to decimal odds
///
/// # Examples
/// ```
/// use betvalue::core::odds::normalize;
/// use betvalue::OddsQuote;
///
/// let decimal = normalize(&OddsQuote::American(150)).unwrap();
/// assert!((decimal - 2.5).abs() < 1e-12);
/// ```
pub fn normalize(quote: &OddsQuote) -> Result<f64> {
    match *quote {
        OddsQuote::American(0) => Err(BetError::InvalidOdds(
            "American odds must be non-zero".to_string(),
        )),
        OddsQuote::American(a) if a > 0 => Ok(a as f64 / 100.0 + 1.0),
        OddsQuote::American(a) => Ok(100.0 / (a as f64).abs() + 1.0),
        OddsQuote::Decimal(d) => {
            validate_decimal_odds(d)?;
            Ok(d)
        }
        OddsQuote::Fractional { denominator: 0, .. } => Err(BetError::InvalidOdds(
            "Fractional denominator must be positive".to_string(),
        )),
        OddsQuote::Fractional { numerator: 0, .. } => Err(BetError::InvalidOdds(
            "Fractional numerator must be positive".to_string(),
        )),
        OddsQuote::Fractional {
            numerator,
            denominator,
        } => Ok(numerator as f64 / denominator as f64 + 1.0),
    }
}

impl OddsQuote {
    /// Parse user-entered odds text in the given notation
    ///
    /// American accepts an optional leading `+`, fractional accepts `n/d` or `n-d`.
    pub fn parse(format: OddsFormat, text: &str) -> Result<Self> {
        let text = text.trim();
        let invalid = || BetError::InvalidOdds(format!("Cannot parse '{}' as {} odds", text, format));

        match format {
            OddsFormat::American => {
                // i32 parsing takes one optional sign, so "++150" stays invalid
                let value: i32 = text.parse().map_err(|_| invalid())?;
                Ok(OddsQuote::American(value))
            }
            OddsFormat::Decimal => {
                let value: f64 = text.parse().map_err(|_| invalid())?;
                Ok(OddsQuote::Decimal(value))
            }
            OddsFormat::Fractional => {
                let (num, den) = text
                    .split_once('/')
                    .or_else(|| text.split_once('-'))
                    .ok_or_else(invalid)?;
                let numerator: u32 = num.trim().parse().map_err(|_| invalid())?;
                let denominator: u32 = den.trim().parse().map_err(|_| invalid())?;
                Ok(OddsQuote::Fractional {
                    numerator,
                    denominator,
                })
            }
        }
    }
}

/// Implied win probability (%) of decimal odds, ignoring bookmaker margin
pub fn implied_probability_pct(decimal_odds: f64) -> Result<f64> {
    validate_decimal_odds(decimal_odds)?;
    Ok(100.0 / decimal_odds)
}

/// Decimal odds expressed as American odds (unrounded)
///
/// Evens and longer map to positive American odds, favourites to negative.
pub fn decimal_to_american(decimal_odds: f64) -> Result<f64> {
    validate_decimal_odds(decimal_odds)?;
    let net = decimal_odds - 1.0;
    if decimal_odds >= 2.0 {
        Ok(net * 100.0)
    } else {
        Ok(-100.0 / net)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_american_positive() {
        let d = normalize(&OddsQuote::American(150)).unwrap();
        assert!((d - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_american_negative() {
        let d = normalize(&OddsQuote::American(-110)).unwrap();
        assert!((d - 1.909090909).abs() < 1e-6);

        let d = normalize(&OddsQuote::American(-100)).unwrap();
        assert!((d - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_american_zero_invalid() {
        assert!(matches!(
            normalize(&OddsQuote::American(0)),
            Err(BetError::InvalidOdds(_))
        ));
    }

    #[test]
    fn test_decimal_identity() {
        assert_eq!(normalize(&OddsQuote::Decimal(2.5)).unwrap(), 2.5);
        assert_eq!(normalize(&OddsQuote::Decimal(1.01)).unwrap(), 1.01);
    }

    #[test]
    fn test_decimal_invalid() {
        assert!(normalize(&OddsQuote::Decimal(1.0)).is_err());
        assert!(normalize(&OddsQuote::Decimal(0.8)).is_err());
        assert!(normalize(&OddsQuote::Decimal(f64::NAN)).is_err());
    }

    #[test]
    fn test_fractional() {
        let d = normalize(&OddsQuote::Fractional {
            numerator: 3,
            denominator: 1,
        })
        .unwrap();
        assert!((d - 4.0).abs() < 1e-12);

        let d = normalize(&OddsQuote::Fractional {
            numerator: 5,
            denominator: 2,
        })
        .unwrap();
        assert!((d - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_fractional_invalid() {
        assert!(normalize(&OddsQuote::Fractional {
            numerator: 3,
            denominator: 0,
        })
        .is_err());
        assert!(normalize(&OddsQuote::Fractional {
            numerator: 0,
            denominator: 1,
        })
        .is_err());
    }

    #[test]
    fn test_parse_american() {
        assert_eq!(
            OddsQuote::parse(OddsFormat::American, "+150").unwrap(),
            OddsQuote::American(150)
        );
        assert_eq!(
            OddsQuote::parse(OddsFormat::American, "-110").unwrap(),
            OddsQuote::American(-110)
        );
        assert!(OddsQuote::parse(OddsFormat::American, "1.5").is_err());
        assert!(OddsQuote::parse(OddsFormat::American, "++150").is_err());
        assert!(OddsQuote::parse(OddsFormat::American, "+-150").is_err());
    }

    #[test]
    fn test_parse_fractional() {
        assert_eq!(
            OddsQuote::parse(OddsFormat::Fractional, "5/2").unwrap(),
            OddsQuote::Fractional {
                numerator: 5,
                denominator: 2
            }
        );
        assert_eq!(
            OddsQuote::parse(OddsFormat::Fractional, "11-10").unwrap(),
            OddsQuote::Fractional {
                numerator: 11,
                denominator: 10
            }
        );
        assert!(OddsQuote::parse(OddsFormat::Fractional, "3").is_err());
        assert!(OddsQuote::parse(OddsFormat::Fractional, "-3/1").is_err());
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(
            OddsQuote::parse(OddsFormat::Decimal, " 2.50 ").unwrap(),
            OddsQuote::Decimal(2.5)
        );
        assert!(OddsQuote::parse(OddsFormat::Decimal, "two").is_err());
    }

    #[test]
    fn test_implied_probability() {
        assert!((implied_probability_pct(2.5).unwrap() - 40.0).abs() < 1e-12);
        assert!(implied_probability_pct(1.0).is_err());
    }

    #[test]
    fn test_decimal_to_american() {
        assert!((decimal_to_american(2.5).unwrap() - 150.0).abs() < 1e-9);
        assert!((decimal_to_american(1.5).unwrap() + 200.0).abs() < 1e-9);
        assert!((decimal_to_american(2.0).unwrap() - 100.0).abs() < 1e-9);
    }
}
