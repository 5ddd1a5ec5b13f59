//! In-memory bet ledger
//!
//! Insertion order is chronological order is display order. Records are never
//! removed; only their outcome changes after creation.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{
    validate_decimal_odds, validate_probability_pct, validate_stake, BetError, Result,
};
use crate::models::{BetRecord, NewBet, Outcome};

/// Truncate a timestamp to the minute, the resolution of the ledger file
pub fn ledger_timestamp(now: NaiveDateTime) -> NaiveDateTime {
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    records: Vec<BetRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<BetRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[BetRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &BetRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&BetRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// Records whose id (hex, no dashes) starts with `prefix`
    pub fn find_by_prefix(&self, prefix: &str) -> Vec<&BetRecord> {
        let prefix: String = prefix
            .chars()
            .filter(|c| *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        self.records
            .iter()
            .filter(|r| r.id.simple().to_string().starts_with(&prefix))
            .collect()
    }

    /// Commit a new bet, assigning a fresh id and the given creation time
    pub fn append(&mut self, bet: NewBet, timestamp: NaiveDateTime) -> Result<&BetRecord> {
        validate_decimal_odds(bet.decimal_odds)?;
        validate_probability_pct(bet.win_probability_pct)?;
        validate_stake(bet.stake)?;
        if let Some(recommended) = bet.recommended_stake {
            validate_stake(recommended)?;
        }
        if !bet.expected_value_pct.is_finite() {
            return Err(BetError::InvalidConfiguration(format!(
                "Expected value must be finite, got {}",
                bet.expected_value_pct
            )));
        }

        let record = BetRecord {
            id: Uuid::new_v4(),
            timestamp: ledger_timestamp(timestamp),
            event: bet.event_label(),
            bet_type: bet.bet_type,
            decimal_odds: bet.decimal_odds,
            win_probability_pct: bet.win_probability_pct,
            expected_value_pct: bet.expected_value_pct,
            stake: bet.stake,
            recommended_stake: bet.recommended_stake,
            outcome: bet.outcome.unwrap_or_default(),
        };

        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Set the outcome of the bet with the given id
    pub fn update_outcome(&mut self, id: Uuid, outcome: Outcome) -> Result<&BetRecord> {
        let index = self.position(id).ok_or(BetError::BetNotFound(id))?;
        self.update_outcome_at(index, outcome)
    }

    /// Set the outcome of the bet at a ledger position
    pub fn update_outcome_at(&mut self, index: usize, outcome: Outcome) -> Result<&BetRecord> {
        let len = self.records.len();
        let record = self
            .records
            .get_mut(index)
            .ok_or(BetError::OutOfRange { index, len })?;
        record.outcome = outcome;
        Ok(record)
    }
}
