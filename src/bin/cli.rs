//! Betvalue CLI - EV analysis, Kelly sizing and bet tracking

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use serde::Serialize;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use betvalue::config::{DEFAULT_BANKROLL, DEFAULT_LEDGER_PATH};
use betvalue::core::kelly::DEFAULT_RISK_FRACTION;
use betvalue::core::{decimal_to_american, evaluate, normalize};
use betvalue::ledger::{analyze_by_bet_type, compute_statistics, profit_per_bet, DATE_FORMAT};
use betvalue::{
    BetError, BetRecord, BetType, EvaluationResult, KellyRecommendation, NewBet, OddsFormat,
    OddsQuote, Outcome, Settings,
};

#[derive(Parser)]
#[command(name = "betvalue")]
#[command(author, version, about = "Sports betting EV and Kelly calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Path to the bet ledger CSV
    #[arg(long, global = true, default_value = DEFAULT_LEDGER_PATH)]
    ledger: PathBuf,

    /// Bankroll for Kelly sizing
    #[arg(long, global = true, default_value_t = DEFAULT_BANKROLL)]
    bankroll: f64,

    /// Kelly fraction (0.5 = half Kelly)
    #[arg(long, global = true, default_value_t = DEFAULT_RISK_FRACTION)]
    kelly_fraction: f64,

    /// Disable Kelly bet sizing
    #[arg(long, global = true)]
    no_kelly: bool,

    /// Disable saving bets to the ledger
    #[arg(long, global = true)]
    no_track: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a bet: EV, implied probability, edge and Kelly stake
    Evaluate {
        /// Odds format: american, decimal or fractional
        #[arg(short, long, default_value = "american")]
        format: OddsFormat,

        /// Bookmaker odds (e.g. +150, -110, 2.50, 3/1)
        #[arg(short, long, allow_hyphen_values = true)]
        odds: String,

        /// Estimated win probability in percent (1-99)
        #[arg(short, long)]
        probability: f64,

        /// Save the bet to the ledger
        #[arg(long)]
        save: bool,

        /// Event name (saved bets only)
        #[arg(long)]
        event: Option<String>,

        /// Bet type: moneyline, spread, over/under, prop, parlay
        #[arg(long)]
        bet_type: Option<BetType>,

        /// Amount actually staked
        #[arg(long, default_value = "0")]
        stake: f64,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all recorded bets
    History {
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update the outcome of a recorded bet
    Settle {
        /// Bet id prefix, or 1-based position as #N
        bet: String,

        /// Outcome: pending, won, lost, pushed, canceled
        outcome: Outcome,
    },

    /// Show performance statistics over settled bets
    Stats {
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Single-bet analysis as shown to the user
#[derive(Debug, Clone, Serialize)]
struct Analysis {
    quote: OddsQuote,
    evaluation: EvaluationResult,
    kelly: Option<KellyRecommendation>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        report_error(&err);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to set tracing subscriber");
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings {
        bankroll: cli.bankroll,
        risk_fraction: cli.kelly_fraction,
        use_kelly: !cli.no_kelly,
        track_bets: !cli.no_track,
        ledger_path: cli.ledger,
    };
    settings.validate()?;

    if cli.interactive {
        println!("{}", "Betvalue CLI".cyan().bold());
        println!();
        return run_interactive(&settings);
    }

    match cli.command {
        Some(Commands::Evaluate {
            format,
            odds,
            probability,
            save,
            event,
            bet_type,
            stake,
            json,
        }) => {
            let quote = OddsQuote::parse(format, &odds)?;
            let analysis = analyze(&settings, quote, probability)?;

            let saved = if save {
                Some(save_bet(&settings, &analysis, event, bet_type, stake)?)
            } else {
                None
            };

            if json {
                #[derive(Serialize)]
                struct EvaluateOutput<'a> {
                    #[serde(flatten)]
                    analysis: &'a Analysis,
                    saved: Option<&'a BetRecord>,
                }
                let output = EvaluateOutput {
                    analysis: &analysis,
                    saved: saved.as_ref(),
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_analysis(&analysis);
                if let Some(record) = &saved {
                    println!();
                    println!(
                        "{} {} ({})",
                        "Bet saved:".green().bold(),
                        record.event,
                        record.short_id()
                    );
                }
            }
        }
        Some(Commands::History { json }) => show_history(&settings, json)?,
        Some(Commands::Settle { bet, outcome }) => settle(&settings, &bet, outcome)?,
        Some(Commands::Stats { json }) => show_stats(&settings, json)?,
        None => {
            println!("Use --help for usage information or --interactive for interactive mode.");
        }
    }

    Ok(())
}

/// Render kernel errors with a hint for the user
fn report_error(err: &anyhow::Error) {
    eprintln!("{} {:#}", "Error:".red().bold(), err);

    let hint = match err.downcast_ref::<BetError>() {
        Some(BetError::InvalidOdds(_)) | Some(BetError::DegenerateOdds(_)) => {
            "Check the odds and their format (e.g. +150, -110, 2.50, 3/1)."
        }
        Some(BetError::InvalidProbability(_)) => "Enter a win probability between 1 and 99.",
        Some(BetError::InvalidConfiguration(_)) => {
            "Bankroll and stake must be non-negative, Kelly fraction in (0, 1]; bet types and outcomes must be one of the listed names."
        }
        Some(BetError::OutOfRange { .. }) | Some(BetError::BetNotFound(_)) => {
            "Run `betvalue history` to see the recorded bets."
        }
        Some(BetError::LedgerIo(_)) | Some(BetError::LedgerFormat(_)) => {
            "Check the ledger path (--ledger) and its contents."
        }
        None => return,
    };
    eprintln!("{}", hint.dimmed());
}

fn analyze(settings: &Settings, quote: OddsQuote, probability: f64) -> Result<Analysis> {
    let decimal_odds = normalize(&quote)?;
    let evaluation = evaluate(decimal_odds, probability)?;
    let kelly = match settings.kelly_calculator()? {
        Some(calc) => Some(calc.recommend(&evaluation)?),
        None => None,
    };

    Ok(Analysis {
        quote,
        evaluation,
        kelly,
    })
}

fn print_analysis(analysis: &Analysis) {
    let eval = &analysis.evaluation;

    println!(
        "{}: {} {} (decimal {:.3})",
        "Odds".green(),
        analysis.quote.format(),
        analysis.quote,
        eval.decimal_odds
    );
    if let Ok(american) = decimal_to_american(eval.decimal_odds) {
        println!("{:>28} {:+.0}", "American equivalent:", american);
    }
    println!();

    let verdict = format!(
        "This is a {} bet with an estimated return of {:.2}%",
        if eval.is_positive_ev() { "+EV" } else { "-EV" },
        eval.expected_value_pct
    );
    if eval.is_positive_ev() {
        println!("{}", verdict.green().bold());
    } else {
        println!("{}", verdict.red().bold());
    }
    println!();

    println!("{}", "EV Analysis:".yellow().bold());
    println!("{}", "-".repeat(40));
    println!("{:<28} {:>10.1}%", "Your estimated probability", eval.win_probability_pct);
    println!("{:<28} {:>10.1}%", "Implied probability", eval.implied_probability_pct);
    println!("{:<28} {:>+10.1}%", "Edge", eval.edge_pct);
    println!("{:<28} {:>+10.2}%", "Expected value", eval.expected_value_pct);

    if let Some(kelly) = &analysis.kelly {
        println!();
        println!("{}", "Recommended Bet Size:".yellow().bold());
        println!("{}", "-".repeat(40));
        println!("{:<28} {:>10.2}%", "Kelly percentage", kelly.kelly_pct());
        println!("{:<28} {:>10.2}%", "Adjusted Kelly", kelly.adjusted_pct());
        println!("{:<28} {:>11.2}", "Recommended bet", kelly.recommended_stake);
        println!("{:<28} {:>11.2}", "Potential profit", kelly.potential_profit);
    }
}

fn save_bet(
    settings: &Settings,
    analysis: &Analysis,
    event: Option<String>,
    bet_type: Option<BetType>,
    stake: f64,
) -> Result<BetRecord> {
    if !settings.track_bets {
        bail!("Bet tracking is disabled (--no-track)");
    }

    let recommended = analysis.kelly.map(|k| k.recommended_stake).unwrap_or(0.0);
    let mut bet = NewBet::from_evaluation(&analysis.evaluation)
        .event(event.unwrap_or_default())
        .stake(stake)
        .recommended_stake(recommended);
    if let Some(bet_type) = bet_type {
        bet = bet.bet_type(bet_type);
    }

    let store = settings.ledger_store();
    let record = store
        .append_bet(bet)
        .with_context(|| format!("Failed to save bet to {:?}", store.path()))?;
    Ok(record)
}

fn show_history(settings: &Settings, json: bool) -> Result<()> {
    let store = settings.ledger_store();
    let ledger = store
        .load()
        .with_context(|| format!("Failed to load ledger from {:?}", store.path()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(ledger.records())?);
        return Ok(());
    }

    if ledger.is_empty() {
        println!(
            "{}",
            "No bets recorded yet. Add some bets to see your history.".yellow()
        );
        return Ok(());
    }

    println!("{}", "Bet History:".yellow().bold());
    println!(
        "{:>3} {:<8} {:<16} {:<24} {:<10} {:>7} {:>6} {:>8} {:>9} {:<9}",
        "#", "Id", "Date", "Event", "Type", "Odds", "Prob", "EV%", "Stake", "Outcome"
    );
    println!("{}", "-".repeat(108));

    for (i, record) in ledger.iter().enumerate() {
        let outcome = match record.outcome {
            Outcome::Won => record.outcome.to_string().green(),
            Outcome::Lost => record.outcome.to_string().red(),
            Outcome::Pending => record.outcome.to_string().normal(),
            Outcome::Pushed | Outcome::Canceled => record.outcome.to_string().dimmed(),
        };
        println!(
            "{:>3} {:<8} {:<16} {:<24} {:<10} {:>7.3} {:>5.1}% {:>+7.2}% {:>9.2} {:<9}",
            i + 1,
            record.short_id(),
            record.timestamp.format(DATE_FORMAT),
            truncate_name(&record.event, 24),
            record.bet_type.map(|t| t.to_string()).unwrap_or_default(),
            record.decimal_odds,
            record.win_probability_pct,
            record.expected_value_pct,
            record.stake,
            outcome
        );
    }

    println!();
    println!("Total: {} bets", ledger.len());
    Ok(())
}

fn settle(settings: &Settings, bet: &str, outcome: Outcome) -> Result<()> {
    let store = settings.ledger_store();

    let record = if let Some(position) = bet.strip_prefix('#') {
        let position: usize = position
            .parse()
            .with_context(|| format!("Invalid bet position '{}'", bet))?;
        if position == 0 {
            bail!("Bet positions start at #1");
        }
        store.update_outcome_at(position - 1, outcome)?
    } else {
        let ledger = store
            .load()
            .with_context(|| format!("Failed to load ledger from {:?}", store.path()))?;
        let matches = ledger.find_by_prefix(bet);
        let id = match matches.as_slice() {
            [] => bail!("No bet id starts with '{}'", bet),
            [record] => record.id,
            _ => bail!("Bet id prefix '{}' matches {} bets", bet, matches.len()),
        };
        store.update_outcome(id, outcome)?
    };

    println!(
        "{} {} - {} ({})",
        "Outcome updated:".green().bold(),
        record.timestamp.format(DATE_FORMAT),
        record.event,
        record.outcome
    );
    Ok(())
}

fn show_stats(settings: &Settings, json: bool) -> Result<()> {
    let store = settings.ledger_store();
    let ledger = store
        .load()
        .with_context(|| format!("Failed to load ledger from {:?}", store.path()))?;
    let stats = compute_statistics(&ledger);
    let breakdown = analyze_by_bet_type(&ledger);

    if json {
        #[derive(Serialize)]
        struct StatsOutput<'a> {
            #[serde(flatten)]
            stats: &'a betvalue::LedgerStats,
            by_bet_type: &'a [betvalue::ledger::BetTypeBreakdown],
        }
        let output = StatsOutput {
            stats: &stats,
            by_bet_type: &breakdown,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if stats.total_settled_bets == 0 {
        println!(
            "{}",
            format!(
                "No settled bets yet ({} pending). Mark bets won or lost to see statistics.",
                stats.pending_bets
            )
            .yellow()
        );
        return Ok(());
    }

    println!("{}", "Betting Stats:".yellow().bold());
    println!("{}", "-".repeat(40));
    println!("{:<28} {:>11}", "Settled bets", stats.total_settled_bets);
    println!("{:<28} {:>11}", "Pending bets", stats.pending_bets);
    println!("{:<28} {:>10.1}%", "Win rate", stats.win_rate_pct);
    println!("{:<28} {:>11.2}", "Total wagered", stats.total_wagered);
    let profit = format!("{:>11.2}", stats.total_profit);
    println!(
        "{:<28} {}",
        "Total profit",
        if stats.total_profit >= 0.0 {
            profit.green()
        } else {
            profit.red()
        }
    );
    println!("{:<28} {:>10.1}%", "ROI", stats.roi_pct);
    println!("{:<28} {:>11.2}", "Max drawdown", stats.max_drawdown);
    println!();

    println!("{}", "Expected vs Actual:".yellow().bold());
    println!("{}", "-".repeat(40));
    println!("{:<28} {:>10.1}%", "Average expected value", stats.average_expected_value_pct);
    println!("{:<28} {:>10.1}%", "Actual ROI", stats.roi_pct);
    println!("{:<28} {:>+10.1}%", "Drift", stats.ev_drift_pct);
    println!();

    println!("{}", "Profit Over Time:".yellow().bold());
    let settled = ledger.iter().filter(|r| r.outcome.is_settled());
    for (n, (record, cumulative)) in settled
        .zip(stats.cumulative_profit_series.iter())
        .enumerate()
    {
        println!(
            "{:>4} {:<24} {:>+10.2} {:>+11.2}",
            n + 1,
            truncate_name(&record.event, 24),
            profit_per_bet(record),
            cumulative
        );
    }
    println!();

    println!("{}", "By Bet Type:".yellow().bold());
    println!(
        "{:<12} {:>5} {:>5} {:>8} {:>10} {:>10} {:>8}",
        "Type", "Bets", "Wins", "Win%", "Wagered", "Profit", "ROI%"
    );
    println!("{}", "-".repeat(64));
    for row in &breakdown {
        println!(
            "{:<12} {:>5} {:>5} {:>7.1}% {:>10.2} {:>+10.2} {:>+7.1}%",
            row.key, row.bets, row.wins, row.win_rate_pct, row.wagered, row.profit, row.roi_pct
        );
    }

    Ok(())
}

fn run_interactive(settings: &Settings) -> Result<()> {
    println!("{}", "Interactive mode".green().bold());
    println!();

    let theme = ColorfulTheme::default();

    loop {
        let options = vec![
            "Evaluate a bet",
            "Bet history",
            "Update bet outcome",
            "Statistics",
            "Quit",
        ];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        let result = match selection {
            0 => interactive_evaluate(settings, &theme),
            1 => show_history(settings, false),
            2 => interactive_settle(settings, &theme),
            3 => show_stats(settings, false),
            _ => {
                println!("Goodbye!");
                break;
            }
        };

        // Bad input is reported and the menu shown again
        if let Err(err) = result {
            report_error(&err);
        }
        println!();
    }

    Ok(())
}

fn interactive_evaluate(settings: &Settings, theme: &ColorfulTheme) -> Result<()> {
    let formats = [OddsFormat::American, OddsFormat::Decimal, OddsFormat::Fractional];
    let format_idx = Select::with_theme(theme)
        .with_prompt("Odds format")
        .items(&formats)
        .default(0)
        .interact()?;
    let format = formats[format_idx];

    let example = match format {
        OddsFormat::American => "+150",
        OddsFormat::Decimal => "2.50",
        OddsFormat::Fractional => "3/1",
    };
    let odds: String = Input::with_theme(theme)
        .with_prompt(format!("Bookmaker odds (e.g. {})", example))
        .interact_text()?;

    let probability: f64 = Input::with_theme(theme)
        .with_prompt("Estimated win probability (%)")
        .default(50.0)
        .interact_text()?;

    let quote = OddsQuote::parse(format, &odds)?;
    let analysis = analyze(settings, quote, probability)?;
    println!();
    print_analysis(&analysis);
    println!();

    if !settings.track_bets {
        return Ok(());
    }

    let save = Confirm::with_theme(theme)
        .with_prompt("Save this bet?")
        .default(false)
        .interact()?;
    if !save {
        return Ok(());
    }

    let event: String = Input::with_theme(theme)
        .with_prompt("Event name")
        .allow_empty(true)
        .interact_text()?;

    let type_idx = Select::with_theme(theme)
        .with_prompt("Bet type")
        .items(&BetType::ALL)
        .default(0)
        .interact()?;

    let stake: f64 = Input::with_theme(theme)
        .with_prompt("Stake amount")
        .default(0.0)
        .interact_text()?;

    let record = save_bet(
        settings,
        &analysis,
        Some(event),
        Some(BetType::ALL[type_idx]),
        stake,
    )?;
    println!("{} {} ({})", "Bet saved:".green().bold(), record.event, record.short_id());
    Ok(())
}

fn interactive_settle(settings: &Settings, theme: &ColorfulTheme) -> Result<()> {
    let store = settings.ledger_store();
    let ledger = store
        .load()
        .with_context(|| format!("Failed to load ledger from {:?}", store.path()))?;

    if ledger.is_empty() {
        println!("{}", "No bets recorded yet.".yellow());
        return Ok(());
    }

    let labels: Vec<String> = ledger
        .iter()
        .map(|r| {
            format!(
                "{} - {} ({})",
                r.timestamp.format(DATE_FORMAT),
                r.event,
                r.outcome
            )
        })
        .collect();
    let bet_idx = Select::with_theme(theme)
        .with_prompt("Select bet to update")
        .items(&labels)
        .default(labels.len() - 1)
        .interact()?;

    let outcome_idx = Select::with_theme(theme)
        .with_prompt("Outcome")
        .items(&Outcome::ALL)
        .default(0)
        .interact()?;

    let id = ledger.records()[bet_idx].id;
    let record = store.update_outcome(id, Outcome::ALL[outcome_idx])?;
    println!(
        "{} {} ({})",
        "Outcome updated:".green().bold(),
        record.event,
        record.outcome
    );
    Ok(())
}

/// Truncate name to fit display width
fn truncate_name(name: &str, max_len: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_len {
        name.to_string()
    } else {
        chars[..max_len - 1].iter().collect::<String>() + "…"
    }
}
