//! CSV persistence for the bet ledger
//!
//! File layout (schema v2):
//!
//! ```text
//! #schema=2
//! Id,Date,Event,Bet Type,Odds,Probability,EV%,Stake,Recommended Stake,Outcome
//! 6f1c...,2024-03-09 19:30,Lakers vs Warriors,Moneyline,2.5,45.0,12.5,50.0,41.67,Pending
//! ```
//!
//! Files without the marker line are schema v1 ledgers written by the older
//! dashboard, where `Id`, `Bet Type`, `Recommended Stake` and `Outcome` may be
//! missing. They are read by column name and rewritten as v2 by the first
//! mutation; loading alone never touches the file.
//!
//! Every mutation is a whole-file read-modify-write. The new content goes to a
//! temporary file next to the ledger which is then renamed over it, so a failed
//! write leaves the previous file untouched.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use uuid::Uuid;

use super::book::Ledger;
use crate::error::{BetError, Result};
use crate::models::{BetRecord, BetType, NewBet, Outcome, UNNAMED_EVENT};

/// Schema version written by this crate
pub const LEDGER_SCHEMA_VERSION: u32 = 2;

/// Timestamp format of the `Date` column
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

const SCHEMA_MARKER: &str = "#schema=";

const COLUMNS: [&str; 10] = [
    "Id",
    "Date",
    "Event",
    "Bet Type",
    "Odds",
    "Probability",
    "EV%",
    "Stake",
    "Recommended Stake",
    "Outcome",
];

/// One CSV row, fields in `COLUMNS` order
#[derive(Debug, Serialize, Deserialize)]
struct LedgerRow {
    #[serde(rename = "Id", default)]
    id: Option<Uuid>,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Event", default)]
    event: String,
    #[serde(rename = "Bet Type", default)]
    bet_type: Option<String>,
    #[serde(rename = "Odds")]
    odds: f64,
    #[serde(rename = "Probability")]
    probability: f64,
    #[serde(rename = "EV%")]
    ev_pct: f64,
    #[serde(rename = "Stake", default)]
    stake: f64,
    #[serde(rename = "Recommended Stake", default)]
    recommended_stake: Option<f64>,
    #[serde(rename = "Outcome", default)]
    outcome: Option<String>,
}

impl From<&BetRecord> for LedgerRow {
    fn from(record: &BetRecord) -> Self {
        Self {
            id: Some(record.id),
            date: record.timestamp.format(DATE_FORMAT).to_string(),
            event: record.event.clone(),
            bet_type: record.bet_type.map(|t| t.to_string()),
            odds: record.decimal_odds,
            probability: record.win_probability_pct,
            ev_pct: record.expected_value_pct,
            stake: record.stake,
            recommended_stake: record.recommended_stake,
            outcome: Some(record.outcome.to_string()),
        }
    }
}

impl LedgerRow {
    /// Convert to a record, reporting whether an id had to be assigned
    fn into_record(self, line: usize) -> Result<(BetRecord, bool)> {
        let timestamp = parse_date(&self.date).ok_or_else(|| {
            BetError::LedgerFormat(format!("Row {}: invalid date '{}'", line, self.date))
        })?;

        let bet_type = match self.bet_type.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(text.parse::<BetType>().map_err(|_| {
                BetError::LedgerFormat(format!("Row {}: unknown bet type '{}'", line, text))
            })?),
        };

        let outcome = match self.outcome.as_deref().map(str::trim) {
            None | Some("") => Outcome::Pending,
            Some(text) => text.parse::<Outcome>().map_err(|_| {
                BetError::LedgerFormat(format!("Row {}: unknown outcome '{}'", line, text))
            })?,
        };

        let event = if self.event.trim().is_empty() {
            UNNAMED_EVENT.to_string()
        } else {
            self.event
        };

        let assigned = self.id.is_none();
        let id = match self.id {
            Some(id) => id,
            None => legacy_id(line, &self.date, &event, self.odds, self.stake),
        };
        let record = BetRecord {
            id,
            timestamp,
            event,
            bet_type,
            decimal_odds: self.odds,
            win_probability_pct: self.probability,
            expected_value_pct: self.ev_pct,
            stake: self.stake,
            recommended_stake: self.recommended_stake,
            outcome,
        };

        Ok((record, assigned))
    }
}

/// Id for a row written without one
///
/// Derived from the row's position and content so repeated loads of an
/// unmodified legacy file agree on it until the first write stores it.
fn legacy_id(line: usize, date: &str, event: &str, odds: f64, stake: f64) -> Uuid {
    let key = format!("{}|{}|{}|{}|{}", line, date.trim(), event, odds, stake);
    Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
}

/// Parse a `Date` cell; older files may carry seconds
fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .map(super::book::ledger_timestamp)
}

/// Split an optional `#schema=N` marker line off the file content
fn split_schema(content: &str) -> Result<(u32, &str)> {
    let first_line = content.lines().next().unwrap_or("").trim();
    let Some(version) = first_line.strip_prefix(SCHEMA_MARKER) else {
        return Ok((1, content));
    };

    let version: u32 = version.trim().parse().map_err(|_| {
        BetError::LedgerFormat(format!("Invalid schema marker '{}'", first_line))
    })?;
    if version == 0 || version > LEDGER_SCHEMA_VERSION {
        return Err(BetError::LedgerFormat(format!(
            "Unsupported ledger schema version {} (this build reads up to {})",
            version, LEDGER_SCHEMA_VERSION
        )));
    }

    let body = content.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
    Ok((version, body))
}

/// Write the marker line, header and one row per record
fn write_ledger<W: Write>(mut out: W, ledger: &Ledger) -> Result<()> {
    writeln!(out, "{}{}", SCHEMA_MARKER, LEDGER_SCHEMA_VERSION)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    writer.write_record(COLUMNS)?;
    for record in ledger.iter() {
        writer.serialize(LedgerRow::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

/// Ledger file handle
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full ledger; a missing file is an empty ledger
    ///
    /// Never writes. Legacy (v1) ledgers get ids assigned in memory and are
    /// rewritten as v2 by the next mutating call.
    pub fn load(&self) -> Result<Ledger> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Ledger {:?} not found, starting empty", self.path);
                return Ok(Ledger::new());
            }
            Err(e) => return Err(e.into()),
        };

        let (version, body) = split_schema(&content)?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(body.as_bytes());

        let mut records = Vec::new();
        let mut assigned_ids = false;
        for (i, row) in reader.deserialize::<LedgerRow>().enumerate() {
            // +2: header line and 1-based numbering
            let (record, assigned) = row?.into_record(i + 2)?;
            assigned_ids |= assigned;
            records.push(record);
        }

        debug!(
            "Loaded {} bets from {:?} (schema v{})",
            records.len(),
            self.path,
            version
        );
        if !records.is_empty() && (version < LEDGER_SCHEMA_VERSION || assigned_ids) {
            info!(
                "Ledger {:?} is schema v{}, it will be upgraded to v{} on the next write",
                self.path, version, LEDGER_SCHEMA_VERSION
            );
        }

        Ok(Ledger::from_records(records))
    }

    /// Write the whole ledger atomically
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        self.replace_with(|out| write_ledger(out, ledger))?;
        debug!("Wrote {} bets to {:?}", ledger.len(), self.path);
        Ok(())
    }

    /// Fill a temporary file next to the ledger and rename it over the target
    ///
    /// If `fill` or the rename fails the temporary file is removed and the
    /// existing ledger is left as it was.
    fn replace_with<F>(&self, fill: F) -> Result<()>
    where
        F: FnOnce(&mut NamedTempFile) -> Result<()>,
    {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        fill(&mut tmp)?;
        tmp.as_file().sync_all()?;

        // NamedTempFile is created 0600; keep the mode of the file it replaces
        match fs::metadata(&self.path) {
            Ok(meta) => tmp.as_file().set_permissions(meta.permissions())?,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Commit a bet stamped with the current local time
    pub fn append_bet(&self, bet: NewBet) -> Result<BetRecord> {
        self.append_bet_at(bet, Local::now().naive_local())
    }

    /// Commit a bet with an explicit creation time
    pub fn append_bet_at(&self, bet: NewBet, timestamp: NaiveDateTime) -> Result<BetRecord> {
        let mut ledger = self.load()?;
        let record = ledger.append(bet, timestamp)?.clone();
        self.save(&ledger)?;

        info!(
            "Saved bet {} '{}' @ {:.3} (EV {:+.2}%)",
            record.short_id(),
            record.event,
            record.decimal_odds,
            record.expected_value_pct
        );
        Ok(record)
    }

    /// Settle (or re-open) the bet with the given id
    pub fn update_outcome(&self, id: Uuid, outcome: Outcome) -> Result<BetRecord> {
        let mut ledger = self.load()?;
        let record = ledger.update_outcome(id, outcome)?.clone();
        self.save(&ledger)?;

        info!("Bet {} marked {}", record.short_id(), outcome);
        Ok(record)
    }

    /// Settle the bet at a 0-based ledger position
    pub fn update_outcome_at(&self, index: usize, outcome: Outcome) -> Result<BetRecord> {
        let mut ledger = self.load()?;
        let record = ledger.update_outcome_at(index, outcome)?.clone();
        self.save(&ledger)?;

        info!("Bet #{} ({}) marked {}", index + 1, record.short_id(), outcome);
        Ok(record)
    }
}
