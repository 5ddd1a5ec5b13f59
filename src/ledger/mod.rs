//! Bet ledger: records, persistence and performance statistics

pub mod book;
pub mod stats;
pub mod store;

// Re-export commonly used types
pub use book::{ledger_timestamp, Ledger};
pub use stats::{
    analyze_by_bet_type, compute_statistics, profit_per_bet, BetTypeBreakdown, LedgerStats,
};
pub use store::{LedgerStore, DATE_FORMAT, LEDGER_SCHEMA_VERSION};
