//! Betvalue - Expected value and Kelly bet sizing
//!
//! This library provides:
//! - Odds normalization (American, decimal, fractional -> decimal)
//! - Expected value, implied probability and edge of a single bet
//! - Kelly criterion stake recommendations
//! - A persistent CSV bet ledger with outcome tracking and performance statistics
//!
//! # Example
//!
//! ```no_run
//! use betvalue::core::{evaluate, normalize};
//! use betvalue::ledger::{compute_statistics, LedgerStore};
//! use betvalue::{KellyCalculator, NewBet, OddsQuote};
//!
//! let decimal = normalize(&OddsQuote::American(150)).unwrap();
//! let eval = evaluate(decimal, 45.0).unwrap();
//!
//! let calc = KellyCalculator::with_defaults(1_000.0).unwrap();
//! let sizing = calc.recommend(&eval).unwrap();
//! println!("Recommended stake: {:.2}", sizing.recommended_stake);
//!
//! let store = LedgerStore::new("bet_history.csv");
//! store
//!     .append_bet(NewBet::from_evaluation(&eval).event("Lakers vs Warriors").stake(40.0))
//!     .unwrap();
//! let stats = compute_statistics(&store.load().unwrap());
//! println!("ROI: {:.1}%", stats.roi_pct);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod ledger;
pub mod models;

// Re-export commonly used types
pub use config::Settings;
pub use crate::core::KellyCalculator;
pub use error::{BetError, Result};
pub use ledger::{Ledger, LedgerStats, LedgerStore};
pub use models::{
    BetRecord, BetType, EvaluationResult, KellyRecommendation, NewBet, OddsFormat, OddsQuote,
    Outcome,
};
