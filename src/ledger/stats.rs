//! Ledger Statistics
//!
//! Calculate win rate, realized profit, ROI, drawdown and EV drift.
//! Only won and lost bets are counted; pending, pushed and canceled bets stay
//! visible in the ledger but contribute nothing here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::book::Ledger;
use crate::models::{BetRecord, Outcome};

/// Group key for bets recorded without a bet type
pub const UNSPECIFIED_BET_TYPE: &str = "Unspecified";

/// Aggregate performance over settled bets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerStats {
    // Basic metrics
    pub total_settled_bets: usize,
    pub win_count: usize,
    pub win_rate_pct: f64,
    pub pending_bets: usize,

    // Money
    pub total_profit: f64,
    pub total_wagered: f64,
    pub roi_pct: f64,

    // Expected vs realized
    pub average_expected_value_pct: f64,
    pub ev_drift_pct: f64, // ROI - average EV

    // Risk
    pub max_drawdown: f64,

    /// Running profit over settled bets, chronological
    pub cumulative_profit_series: Vec<f64>,
}

impl Default for LedgerStats {
    fn default() -> Self {
        Self {
            total_settled_bets: 0,
            win_count: 0,
            win_rate_pct: 0.0,
            pending_bets: 0,
            total_profit: 0.0,
            total_wagered: 0.0,
            roi_pct: 0.0,
            average_expected_value_pct: 0.0,
            ev_drift_pct: 0.0,
            max_drawdown: 0.0,
            cumulative_profit_series: Vec::new(),
        }
    }
}

/// Realized profit of a single bet
///
/// Won: stake * (odds - 1), Lost: -stake, anything else: 0.
pub fn profit_per_bet(record: &BetRecord) -> f64 {
    match record.outcome {
        Outcome::Won => record.stake * (record.decimal_odds - 1.0),
        Outcome::Lost => -record.stake,
        Outcome::Pending | Outcome::Pushed | Outcome::Canceled => 0.0,
    }
}

/// Calculate statistics over the settled bets of a ledger
pub fn compute_statistics(ledger: &Ledger) -> LedgerStats {
    let pending_bets = ledger
        .iter()
        .filter(|r| r.outcome == Outcome::Pending)
        .count();

    let settled: Vec<&BetRecord> = ledger.iter().filter(|r| r.outcome.is_settled()).collect();
    if settled.is_empty() {
        return LedgerStats {
            pending_bets,
            ..LedgerStats::default()
        };
    }

    let total_settled_bets = settled.len();
    let win_count = settled.iter().filter(|r| r.outcome == Outcome::Won).count();
    let win_rate_pct = win_count as f64 / total_settled_bets as f64 * 100.0;

    let total_wagered: f64 = settled.iter().map(|r| r.stake).sum();

    // Cumulative profit and drawdown
    let mut cumulative_profit_series = Vec::with_capacity(total_settled_bets);
    let mut sum = 0.0;
    let mut peak = 0.0_f64;
    let mut max_drawdown = 0.0_f64;
    for record in &settled {
        sum += profit_per_bet(record);
        cumulative_profit_series.push(sum);

        peak = peak.max(sum);
        max_drawdown = max_drawdown.max(peak - sum);
    }
    let total_profit = sum;

    let roi_pct = if total_wagered > 0.0 {
        total_profit / total_wagered * 100.0
    } else {
        0.0
    };

    let average_expected_value_pct =
        settled.iter().map(|r| r.expected_value_pct).sum::<f64>() / total_settled_bets as f64;

    LedgerStats {
        total_settled_bets,
        win_count,
        win_rate_pct,
        pending_bets,
        total_profit,
        total_wagered,
        roi_pct,
        average_expected_value_pct,
        ev_drift_pct: roi_pct - average_expected_value_pct,
        max_drawdown,
        cumulative_profit_series,
    }
}

/// Settled results for one bet type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetTypeBreakdown {
    pub key: String,
    pub bets: usize,
    pub wins: usize,
    pub win_rate_pct: f64,
    pub wagered: f64,
    pub profit: f64,
    pub roi_pct: f64,
}

/// Analyze settled bets by bet type
pub fn analyze_by_bet_type(ledger: &Ledger) -> Vec<BetTypeBreakdown> {
    let mut grouped: BTreeMap<String, Vec<&BetRecord>> = BTreeMap::new();
    for record in ledger.iter().filter(|r| r.outcome.is_settled()) {
        let key = record
            .bet_type
            .map(|t| t.to_string())
            .unwrap_or_else(|| UNSPECIFIED_BET_TYPE.to_string());
        grouped.entry(key).or_default().push(record);
    }

    grouped
        .into_iter()
        .map(|(key, group)| {
            let bets = group.len();
            let wins = group.iter().filter(|r| r.outcome == Outcome::Won).count();
            let wagered: f64 = group.iter().map(|r| r.stake).sum();
            let profit: f64 = group.iter().map(|r| profit_per_bet(r)).sum();

            BetTypeBreakdown {
                key,
                bets,
                wins,
                win_rate_pct: wins as f64 / bets as f64 * 100.0,
                wagered,
                profit,
                roi_pct: if wagered > 0.0 {
                    profit / wagered * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BetType;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn bet(odds: f64, ev_pct: f64, stake: f64, outcome: Outcome) -> BetRecord {
        BetRecord {
            id: Uuid::new_v4(),
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 9)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            event: "Game".to_string(),
            bet_type: Some(BetType::Moneyline),
            decimal_odds: odds,
            win_probability_pct: 50.0,
            expected_value_pct: ev_pct,
            stake,
            recommended_stake: None,
            outcome,
        }
    }

    fn create_test_ledger() -> Ledger {
        Ledger::from_records(vec![
            bet(2.5, 12.5, 100.0, Outcome::Won),  // +150
            bet(2.0, 10.0, 50.0, Outcome::Lost),  // -50
            bet(3.0, 20.0, 40.0, Outcome::Pending),
            bet(1.8, 5.0, 100.0, Outcome::Lost),  // -100
            bet(2.2, 8.0, 30.0, Outcome::Pushed),
            bet(2.0, 2.5, 25.0, Outcome::Canceled),
        ])
    }

    #[test]
    fn test_profit_per_bet() {
        assert!((profit_per_bet(&bet(2.5, 0.0, 100.0, Outcome::Won)) - 150.0).abs() < 1e-9);
        assert_eq!(profit_per_bet(&bet(2.5, 0.0, 100.0, Outcome::Lost)), -100.0);
        assert_eq!(profit_per_bet(&bet(2.5, 0.0, 100.0, Outcome::Pushed)), 0.0);
        assert_eq!(profit_per_bet(&bet(2.5, 0.0, 100.0, Outcome::Pending)), 0.0);
    }

    #[test]
    fn test_compute_statistics() {
        let stats = compute_statistics(&create_test_ledger());

        assert_eq!(stats.total_settled_bets, 3);
        assert_eq!(stats.win_count, 1);
        assert_eq!(stats.pending_bets, 1);
        assert!((stats.win_rate_pct - 33.333).abs() < 0.01);
        assert!((stats.total_profit - 0.0).abs() < 1e-9); // 150 - 50 - 100
        assert!((stats.total_wagered - 250.0).abs() < 1e-9);
        assert!(stats.roi_pct.abs() < 1e-9);
        assert!((stats.average_expected_value_pct - 9.1667).abs() < 0.001);
        assert!((stats.ev_drift_pct + 9.1667).abs() < 0.001);
    }

    #[test]
    fn test_cumulative_series_and_drawdown() {
        let stats = compute_statistics(&create_test_ledger());

        // Cumulative: 150, 100, 0
        assert_eq!(stats.cumulative_profit_series.len(), 3);
        assert!((stats.cumulative_profit_series[0] - 150.0).abs() < 1e-9);
        assert!((stats.cumulative_profit_series[1] - 100.0).abs() < 1e-9);
        assert!(stats.cumulative_profit_series[2].abs() < 1e-9);
        // Peak 150, trough 0
        assert!((stats.max_drawdown - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_statistics_no_settled_bets() {
        let ledger = Ledger::from_records(vec![
            bet(2.5, 12.5, 100.0, Outcome::Pending),
            bet(2.0, 10.0, 50.0, Outcome::Canceled),
        ]);
        let stats = compute_statistics(&ledger);

        assert_eq!(stats.total_settled_bets, 0);
        assert_eq!(stats.roi_pct, 0.0);
        assert_eq!(stats.win_rate_pct, 0.0);
        assert_eq!(stats.pending_bets, 1);
        assert!(stats.cumulative_profit_series.is_empty());
    }

    #[test]
    fn test_compute_statistics_zero_wagered() {
        let ledger = Ledger::from_records(vec![bet(2.5, 12.5, 0.0, Outcome::Won)]);
        let stats = compute_statistics(&ledger);

        assert_eq!(stats.total_settled_bets, 1);
        assert_eq!(stats.total_wagered, 0.0);
        assert_eq!(stats.roi_pct, 0.0);
        assert!(stats.roi_pct.is_finite());
    }

    #[test]
    fn test_analyze_by_bet_type() {
        let mut records = create_test_ledger().records().to_vec();
        let mut parlay = bet(6.0, 30.0, 10.0, Outcome::Won);
        parlay.bet_type = Some(BetType::Parlay);
        let mut untyped = bet(2.0, 0.0, 10.0, Outcome::Lost);
        untyped.bet_type = None;
        records.push(parlay);
        records.push(untyped);

        let analysis = analyze_by_bet_type(&Ledger::from_records(records));
        let keys: Vec<&str> = analysis.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["Moneyline", "Parlay", UNSPECIFIED_BET_TYPE]);

        let moneyline = &analysis[0];
        assert_eq!(moneyline.bets, 3);
        assert_eq!(moneyline.wins, 1);

        let parlay = &analysis[1];
        assert!((parlay.profit - 50.0).abs() < 1e-9);
        assert!((parlay.roi_pct - 500.0).abs() < 1e-9);
    }
}
