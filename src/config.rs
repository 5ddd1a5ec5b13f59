//! User settings shared by the presentation layer and the kernel

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::kelly::{KellyCalculator, DEFAULT_RISK_FRACTION};
use crate::error::{validate_bankroll, validate_risk_fraction, Result};
use crate::ledger::LedgerStore;

/// Default ledger file name (relative to the working directory)
pub const DEFAULT_LEDGER_PATH: &str = "bet_history.csv";

/// Default bankroll
pub const DEFAULT_BANKROLL: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub bankroll: f64,
    /// Kelly multiplier in (0, 1]
    pub risk_fraction: f64,
    /// Produce a Kelly recommendation alongside the EV analysis
    pub use_kelly: bool,
    /// Allow committing bets to the ledger
    pub track_bets: bool,
    pub ledger_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bankroll: DEFAULT_BANKROLL,
            risk_fraction: DEFAULT_RISK_FRACTION,
            use_kelly: true,
            track_bets: true,
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        validate_bankroll(self.bankroll)?;
        validate_risk_fraction(self.risk_fraction)?;
        Ok(())
    }

    /// Kelly calculator for the configured bankroll, or `None` when Kelly sizing is off
    pub fn kelly_calculator(&self) -> Result<Option<KellyCalculator>> {
        if !self.use_kelly {
            return Ok(None);
        }
        KellyCalculator::new(self.bankroll, self.risk_fraction).map(Some)
    }

    pub fn ledger_store(&self) -> LedgerStore {
        LedgerStore::new(&self.ledger_path)
    }
}
