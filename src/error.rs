use thiserror::Error;
use uuid::Uuid;

/// Kernel error types
#[derive(Debug, Error)]
pub enum BetError {
    /// Malformed or degenerate odds quotation
    #[error("Invalid odds: {0}")]
    InvalidOdds(String),

    /// Decimal odds <= 1 fed into Kelly sizing (no net payout)
    #[error("Degenerate odds: decimal odds {0} leave no net payout")]
    DegenerateOdds(f64),

    /// Win probability missing or outside (0, 100)
    #[error("Invalid win probability: {0}")]
    InvalidProbability(String),

    /// Bad bankroll, risk fraction or stake
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Positional ledger access past the end
    #[error("Ledger position {index} out of range (ledger has {len} bets)")]
    OutOfRange { index: usize, len: usize },

    /// No ledger record carries this id
    #[error("No bet with id {0}")]
    BetNotFound(Uuid),

    /// Ledger file unreadable or unwritable
    #[error("Ledger I/O failed: {0}")]
    LedgerIo(#[from] std::io::Error),

    /// Ledger file present but not decodable
    #[error("Ledger format error: {0}")]
    LedgerFormat(String),
}

impl From<csv::Error> for BetError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(io) => BetError::LedgerIo(io),
                other => BetError::LedgerFormat(format!("{:?}", other)),
            }
        } else {
            BetError::LedgerFormat(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, BetError>;

/// Validation functions
pub fn validate_decimal_odds(odds: f64) -> Result<()> {
    if !odds.is_finite() || odds <= 1.0 {
        return Err(BetError::InvalidOdds(format!(
            "Decimal odds must be greater than 1.0, got {}",
            odds
        )));
    }
    Ok(())
}

pub fn validate_probability_pct(pct: f64) -> Result<()> {
    if !pct.is_finite() || pct <= 0.0 || pct >= 100.0 {
        return Err(BetError::InvalidProbability(format!(
            "Win probability must be between 0 and 100 (exclusive), got {}",
            pct
        )));
    }
    Ok(())
}

pub fn validate_bankroll(bankroll: f64) -> Result<()> {
    if !bankroll.is_finite() || bankroll < 0.0 {
        return Err(BetError::InvalidConfiguration(format!(
            "Bankroll must be non-negative, got {}",
            bankroll
        )));
    }
    Ok(())
}

pub fn validate_risk_fraction(fraction: f64) -> Result<()> {
    if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
        return Err(BetError::InvalidConfiguration(format!(
            "Risk fraction must be in (0, 1], got {}",
            fraction
        )));
    }
    Ok(())
}

pub fn validate_stake(stake: f64) -> Result<()> {
    if !stake.is_finite() || stake < 0.0 {
        return Err(BetError::InvalidConfiguration(format!(
            "Stake must be non-negative, got {}",
            stake
        )));
    }
    Ok(())
}
