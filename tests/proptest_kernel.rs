//! Property-based tests for the betting math
//!
//! These tests use proptest to verify invariants across many random inputs.

use betvalue::core::{evaluate, kelly_stake, normalize};
use betvalue::ledger::{compute_statistics, Ledger};
use betvalue::{BetRecord, OddsQuote, Outcome};
use chrono::NaiveDate;
use proptest::prelude::*;
use uuid::Uuid;

fn outcome_strategy() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        Just(Outcome::Pending),
        Just(Outcome::Won),
        Just(Outcome::Lost),
        Just(Outcome::Pushed),
        Just(Outcome::Canceled),
    ]
}

fn record(odds: f64, ev_pct: f64, stake: f64, outcome: Outcome) -> BetRecord {
    BetRecord {
        id: Uuid::new_v4(),
        timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
        event: "Game".to_string(),
        bet_type: None,
        decimal_odds: odds,
        win_probability_pct: 50.0,
        expected_value_pct: ev_pct,
        stake,
        recommended_stake: None,
        outcome,
    }
}

proptest! {
    // Only a small fraction of the input space is negative-EV, so the
    // assumption below rejects most cases; raise the global reject limit.
    #![proptest_config(ProptestConfig {
        max_global_rejects: 100_000,
        ..ProptestConfig::default()
    })]

    /// Negative-EV bets never get a stake
    #[test]
    fn negative_ev_gets_zero_stake(odds in 1.01f64..100.0, pct in 1.0f64..99.0) {
        let eval = evaluate(odds, pct).unwrap();
        prop_assume!(eval.expected_value_pct < 0.0);
        let rec = kelly_stake(odds, pct, 1000.0, 1.0).unwrap();
        prop_assert_eq!(rec.recommended_stake, 0.0);
    }
}

proptest! {
    /// Positive American odds map to 1 + a/100
    #[test]
    fn american_positive_normalizes(a in 1i32..100_000) {
        let d = normalize(&OddsQuote::American(a)).unwrap();
        prop_assert!((d - (1.0 + a as f64 / 100.0)).abs() < 1e-9);
        prop_assert!(d > 1.0);
    }

    /// Negative American odds map to 1 + 100/|a|
    #[test]
    fn american_negative_normalizes(a in -100_000i32..-1) {
        let d = normalize(&OddsQuote::American(a)).unwrap();
        prop_assert!((d - (1.0 + 100.0 / (a as f64).abs())).abs() < 1e-9);
        prop_assert!(d > 1.0);
    }

    /// Fractional odds always normalize above 1
    #[test]
    fn fractional_normalizes_above_one(n in 1u32..1000, den in 1u32..1000) {
        let d = normalize(&OddsQuote::Fractional { numerator: n, denominator: den }).unwrap();
        prop_assert!(d > 1.0);
        prop_assert!((d - (n as f64 / den as f64 + 1.0)).abs() < 1e-12);
    }

    /// Edge is exactly win probability minus implied probability
    #[test]
    fn edge_is_difference(odds in 1.01f64..100.0, pct in 1.0f64..99.0) {
        let eval = evaluate(odds, pct).unwrap();
        prop_assert!((eval.edge_pct - (pct - 100.0 / odds)).abs() < 1e-9);
        prop_assert_eq!(eval.is_positive_ev(), eval.expected_value_pct > 0.0);
        prop_assert!(eval.implied_probability_pct > 0.0 && eval.implied_probability_pct < 100.0);
    }

    /// Kelly stake is never negative and never exceeds the bankroll
    #[test]
    fn kelly_stake_bounded(
        odds in 1.01f64..100.0,
        pct in 1.0f64..99.0,
        bankroll in 0.0f64..1_000_000.0,
        risk in 0.01f64..=1.0,
    ) {
        let rec = kelly_stake(odds, pct, bankroll, risk).unwrap();
        prop_assert!(rec.kelly_fraction_raw >= 0.0);
        prop_assert!(rec.recommended_stake >= 0.0);
        prop_assert!(rec.recommended_stake <= bankroll + 1e-6);
        prop_assert!(rec.adjusted_fraction <= rec.kelly_fraction_raw + 1e-12);
    }

    /// Evaluation and sizing are pure
    #[test]
    fn evaluation_is_idempotent(odds in 1.01f64..100.0, pct in 1.0f64..99.0) {
        prop_assert_eq!(evaluate(odds, pct).unwrap(), evaluate(odds, pct).unwrap());
        prop_assert_eq!(
            kelly_stake(odds, pct, 500.0, 0.5).unwrap(),
            kelly_stake(odds, pct, 500.0, 0.5).unwrap()
        );
    }

    /// Statistics only count won and lost bets
    #[test]
    fn statistics_count_settled_only(
        bets in prop::collection::vec(
            (1.01f64..20.0, -50.0f64..50.0, 0.0f64..500.0, outcome_strategy()),
            0..40,
        )
    ) {
        let records: Vec<BetRecord> = bets
            .iter()
            .map(|(odds, ev, stake, outcome)| record(*odds, *ev, *stake, *outcome))
            .collect();
        let settled = records.iter().filter(|r| r.outcome.is_settled()).count();
        let stats = compute_statistics(&Ledger::from_records(records));

        prop_assert_eq!(stats.total_settled_bets, settled);
        prop_assert_eq!(stats.cumulative_profit_series.len(), settled);
        prop_assert!(stats.win_count <= settled);
        prop_assert!(stats.roi_pct.is_finite());
        prop_assert!(stats.win_rate_pct >= 0.0 && stats.win_rate_pct <= 100.0);
        prop_assert!(stats.max_drawdown >= 0.0);
        if let Some(last) = stats.cumulative_profit_series.last() {
            prop_assert!((last - stats.total_profit).abs() < 1e-6);
        }
    }
}
