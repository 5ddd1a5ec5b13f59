use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::BetError;

/// Event label stored when the caller leaves it blank
pub const UNNAMED_EVENT: &str = "Unnamed Event";

/// Bookmaker odds notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OddsFormat {
    American,
    Decimal,
    Fractional,
}

impl fmt::Display for OddsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OddsFormat::American => "American",
            OddsFormat::Decimal => "Decimal",
            OddsFormat::Fractional => "Fractional",
        };
        f.write_str(name)
    }
}

impl FromStr for OddsFormat {
    type Err = BetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "american" | "us" | "moneyline" => Ok(OddsFormat::American),
            "decimal" | "eu" => Ok(OddsFormat::Decimal),
            "fractional" | "uk" => Ok(OddsFormat::Fractional),
            other => Err(BetError::InvalidOdds(format!(
                "Unknown odds format '{}'",
                other
            ))),
        }
    }
}

/// Raw bookmaker quotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OddsQuote {
    /// Moneyline, e.g. +150 or -110
    American(i32),
    /// European, e.g. 2.50
    Decimal(f64),
    /// UK, e.g. 3/1
    Fractional { numerator: u32, denominator: u32 },
}

impl OddsQuote {
    pub fn format(&self) -> OddsFormat {
        match self {
            OddsQuote::American(_) => OddsFormat::American,
            OddsQuote::Decimal(_) => OddsFormat::Decimal,
            OddsQuote::Fractional { .. } => OddsFormat::Fractional,
        }
    }
}

impl fmt::Display for OddsQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OddsQuote::American(a) if *a > 0 => write!(f, "+{}", a),
            OddsQuote::American(a) => write!(f, "{}", a),
            OddsQuote::Decimal(d) => write!(f, "{:.2}", d),
            OddsQuote::Fractional {
                numerator,
                denominator,
            } => write!(f, "{}/{}", numerator, denominator),
        }
    }
}

/// Single-bet EV analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub decimal_odds: f64,
    pub implied_probability_pct: f64,
    pub win_probability_pct: f64,
    pub edge_pct: f64, // win prob - implied prob
    pub expected_value_pct: f64,
}

impl EvaluationResult {
    /// Expected value as a fraction of the stake
    pub fn expected_value(&self) -> f64 {
        self.expected_value_pct / 100.0
    }

    pub fn is_positive_ev(&self) -> bool {
        self.expected_value_pct > 0.0
    }
}

/// Kelly criterion stake recommendation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KellyRecommendation {
    pub kelly_fraction_raw: f64, // Full Kelly, clamped at 0
    pub adjusted_fraction: f64,  // After applying risk fraction
    pub recommended_stake: f64,
    pub potential_profit: f64,
}

impl KellyRecommendation {
    pub fn kelly_pct(&self) -> f64 {
        self.kelly_fraction_raw * 100.0
    }

    pub fn adjusted_pct(&self) -> f64 {
        self.adjusted_fraction * 100.0
    }
}

/// Market the bet was placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BetType {
    Moneyline,
    Spread,
    #[serde(rename = "Over/Under")]
    OverUnder,
    Prop,
    Parlay,
}

impl BetType {
    pub const ALL: [BetType; 5] = [
        BetType::Moneyline,
        BetType::Spread,
        BetType::OverUnder,
        BetType::Prop,
        BetType::Parlay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BetType::Moneyline => "Moneyline",
            BetType::Spread => "Spread",
            BetType::OverUnder => "Over/Under",
            BetType::Prop => "Prop",
            BetType::Parlay => "Parlay",
        }
    }
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BetType {
    type Err = BetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "moneyline" => Ok(BetType::Moneyline),
            "spread" => Ok(BetType::Spread),
            "overunder" | "total" | "totals" => Ok(BetType::OverUnder),
            "prop" => Ok(BetType::Prop),
            "parlay" => Ok(BetType::Parlay),
            _ => Err(BetError::InvalidConfiguration(format!(
                "Unknown bet type '{}'",
                s
            ))),
        }
    }
}

/// Settlement state of a ledger record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Pending,
    Won,
    Lost,
    Pushed,
    Canceled,
}

impl Outcome {
    pub const ALL: [Outcome; 5] = [
        Outcome::Pending,
        Outcome::Won,
        Outcome::Lost,
        Outcome::Pushed,
        Outcome::Canceled,
    ];

    /// Only won and lost bets count towards profit and rate statistics
    pub fn is_settled(&self) -> bool {
        matches!(self, Outcome::Won | Outcome::Lost)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Pending => "Pending",
            Outcome::Won => "Won",
            Outcome::Lost => "Lost",
            Outcome::Pushed => "Pushed",
            Outcome::Canceled => "Canceled",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = BetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Outcome::Pending),
            "won" | "win" => Ok(Outcome::Won),
            "lost" | "loss" => Ok(Outcome::Lost),
            "pushed" | "push" => Ok(Outcome::Pushed),
            "canceled" | "cancelled" => Ok(Outcome::Canceled),
            _ => Err(BetError::InvalidConfiguration(format!(
                "Unknown outcome '{}'",
                s
            ))),
        }
    }
}

/// Persisted ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetRecord {
    pub id: Uuid,
    pub timestamp: NaiveDateTime,
    pub event: String,
    pub bet_type: Option<BetType>,
    pub decimal_odds: f64,
    pub win_probability_pct: f64,
    pub expected_value_pct: f64,
    pub stake: f64,
    pub recommended_stake: Option<f64>,
    pub outcome: Outcome,
}

impl BetRecord {
    /// First 8 hex digits of the id, enough to address a bet from the CLI
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}

/// Caller-supplied fields of a bet about to be committed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBet {
    pub event: String,
    pub bet_type: Option<BetType>,
    pub decimal_odds: f64,
    pub win_probability_pct: f64,
    pub expected_value_pct: f64,
    pub stake: f64,
    pub recommended_stake: Option<f64>,
    pub outcome: Option<Outcome>,
}

impl NewBet {
    /// Pre-fill odds, probability and EV from an evaluation
    pub fn from_evaluation(eval: &EvaluationResult) -> Self {
        Self {
            event: String::new(),
            bet_type: None,
            decimal_odds: eval.decimal_odds,
            win_probability_pct: eval.win_probability_pct,
            expected_value_pct: eval.expected_value_pct,
            stake: 0.0,
            recommended_stake: None,
            outcome: None,
        }
    }

    pub fn event(mut self, event: impl Into<String>) -> Self {
        self.event = event.into();
        self
    }

    pub fn bet_type(mut self, bet_type: BetType) -> Self {
        self.bet_type = Some(bet_type);
        self
    }

    pub fn stake(mut self, stake: f64) -> Self {
        self.stake = stake;
        self
    }

    pub fn recommended_stake(mut self, stake: f64) -> Self {
        self.recommended_stake = Some(stake);
        self
    }

    pub fn outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Event label with the placeholder applied
    pub fn event_label(&self) -> String {
        let trimmed = self.event.trim();
        if trimmed.is_empty() {
            UNNAMED_EVENT.to_string()
        } else {
            trimmed.to_string()
        }
    }
}
