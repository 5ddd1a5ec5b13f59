//! Core betting math: odds normalization, EV and Kelly sizing

pub mod ev;
pub mod kelly;
pub mod odds;

// Re-export commonly used types
pub use ev::evaluate;
pub use kelly::{calculate_kelly_fraction, kelly_stake, KellyCalculator};
pub use odds::{decimal_to_american, implied_probability_pct, normalize};
