//! Football AI CLI - Kelly sizing, value bets, prediction and bankroll tracking

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use uuid::Uuid;

use football_ai::config::AnalyticsConfig;
use football_ai::core::kelly::{
    compute_kelly, KellyCalculator, KellyFraction, KellyResult, StakeAdvice,
};
use football_ai::core::value::{filter_value_bets, MatchOdds, Severity, SeverityFilter, ValueBet};
use football_ai::models::{NewPrediction, TransactionKind};
use football_ai::storage::JsonFileStore;
use football_ai::tracking::{BankrollLedger, PredictionLedger};

#[cfg(feature = "api-client")]
use football_ai::provider::{collect_match_odds, ApiFootballClient};
#[cfg(feature = "api-client")]
use indicatif::{ProgressBar, ProgressStyle};

/// Single bet cap as a share of bankroll
const MAX_STAKE_PCT: f64 = 0.10;
/// Total exposure cap across simultaneous bets
const MAX_TOTAL_EXPOSURE: f64 = 0.30;

#[derive(Parser)]
#[command(name = "football-ai")]
#[command(author, version, about = "Football prediction analytics CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Directory for persisted predictions and bankroll
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Kelly criterion stake for a single bet
    Kelly {
        /// Decimal odds (e.g., 2.50)
        #[arg(short, long)]
        odds: f64,

        /// Estimated win probability in percent (e.g., 45)
        #[arg(short, long)]
        probability: f64,

        /// Bankroll amount for the recommended stake
        #[arg(short, long)]
        bankroll: Option<f64>,

        /// Kelly fraction: full, half, quarter, tenth (or 1, 0.5, 0.25, 0.1)
        #[arg(short, long)]
        fraction: Option<KellyFraction>,
    },

    /// Rank value bets from predictions and odds
    Value {
        /// JSON file with an array of fixtures (odds and predicted percentages)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Fetch upcoming fixtures for a date (YYYY-MM-DD) from the data API
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Show only bets of a severity: all, high, medium
        #[arg(long, default_value = "all")]
        severity: SeverityFilter,

        /// Maximum number of bets to show
        #[arg(long, default_value = "20")]
        top: usize,
    },

    /// Record, verify and summarize predictions
    Predictions {
        #[command(subcommand)]
        action: PredictionAction,
    },

    /// Manage the bankroll ledger
    Bankroll {
        #[command(subcommand)]
        action: BankrollAction,
    },
}

#[derive(Subcommand)]
enum PredictionAction {
    /// Record a new prediction
    Record {
        /// Match (fixture) id
        #[arg(short, long)]
        match_id: String,

        /// Home team name
        #[arg(long)]
        home: String,

        /// Away team name
        #[arg(long)]
        away: String,

        /// Predicted winner (team name or "Draw")
        #[arg(short, long)]
        winner: String,

        /// Confidence in percent (0-100)
        #[arg(short, long)]
        confidence: u8,

        /// League name
        #[arg(short, long)]
        league: Option<String>,
    },

    /// Resolve pending predictions against final results
    #[cfg(feature = "api-client")]
    Verify,

    /// List recorded predictions
    List {
        /// Only pending predictions
        #[arg(long)]
        pending: bool,

        /// Number of predictions to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Accuracy, streaks and breakdowns
    Stats,

    /// Delete the prediction history
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum BankrollAction {
    /// Set the starting bankroll
    Init {
        /// Starting amount
        amount: f64,
    },

    /// Record a transaction
    Add {
        /// Transaction type: deposit, withdraw, win, loss
        kind: TransactionKind,

        /// Amount (positive)
        amount: f64,

        /// Optional note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Remove a transaction by id
    Remove {
        /// Transaction id
        id: Uuid,
    },

    /// Balance, metrics and recent transactions
    Show {
        /// Number of transactions to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Discard the bankroll and all transactions
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    let mut config = AnalyticsConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    println!("{}", "Football AI CLI v0.1.0".cyan().bold());
    println!();

    if cli.interactive {
        run_interactive(&config)?;
    } else if let Some(command) = cli.command {
        match command {
            Commands::Kelly {
                odds,
                probability,
                bankroll,
                fraction,
            } => {
                let fraction = fraction.unwrap_or(config.kelly_fraction);
                run_kelly(odds, probability, bankroll, fraction)?;
            }
            Commands::Value {
                input,
                date,
                severity,
                top,
            } => {
                let candidates = match input {
                    Some(path) => load_candidates(&path)?,
                    None => {
                        let date = date.unwrap_or_else(|| chrono::Utc::now().date_naive());
                        fetch_candidates(&config, date)?
                    }
                };
                run_value(candidates, severity, top, config.kelly_fraction);
            }
            Commands::Predictions { action } => run_predictions(&config, action)?,
            Commands::Bankroll { action } => run_bankroll(&config, action)?,
        }
    } else {
        println!("Use --help for usage information or --interactive for interactive mode.");
    }

    Ok(())
}

fn open_store(config: &AnalyticsConfig) -> Result<JsonFileStore> {
    JsonFileStore::open(&config.data_dir)
        .with_context(|| format!("Failed to open data directory {:?}", config.data_dir))
}

fn run_kelly(odds: f64, probability: f64, bankroll: Option<f64>, fraction: KellyFraction) -> Result<()> {
    let result = compute_kelly(odds, probability, bankroll, fraction)
        .context("Invalid Kelly input")?;
    print_kelly(&result);

    if let Some(bankroll) = bankroll.filter(|b| *b > 0.0) {
        let sizing = KellyCalculator::new(bankroll, fraction, MAX_STAKE_PCT, MAX_TOTAL_EXPOSURE)
            .calculate_single(odds, probability)?;
        println!(
            "{}",
            format!(
                "Stake capped at {:.0}% of bankroll: {:.2}",
                MAX_STAKE_PCT * 100.0,
                sizing.stake
            )
            .dimmed()
        );
    }
    Ok(())
}

fn print_kelly(result: &KellyResult) {
    println!("{}", "Kelly Criterion:".yellow().bold());
    println!("{:<22} {:>10.2}", "Decimal odds", result.odds);
    println!("{:<22} {:>9.2}%", "Win probability", result.win_probability);
    println!("{:<22} {:>9.2}%", "Implied probability", result.implied_probability);
    println!("{:<22} {:>+9.2}%", "Edge", result.edge_percent);
    println!("{}", "-".repeat(34));
    println!("{:<22} {:>9.2}%", "Full Kelly", result.full_kelly_fraction);
    println!(
        "{:<22} {:>9.2}%",
        format!("{} Kelly", result.fraction),
        result.adjusted_fraction
    );
    if let Some(stake) = result.recommended_stake_amount {
        println!("{:<22} {:>10.2}", "Recommended stake", stake);
    }
    println!("{:<22} {:>+10.2}", "Expected value", result.expected_value);
    println!();

    let advice = match result.advice() {
        StakeAdvice::NoBet => "No bet: the odds do not beat your estimate".red(),
        StakeAdvice::Conservative => "Conservative stake".green(),
        StakeAdvice::Moderate => "Moderate stake".yellow(),
        StakeAdvice::Aggressive => "Aggressive stake: consider a smaller fraction".magenta(),
    };
    println!("{}", advice);
}

fn load_candidates(path: &Path) -> Result<Vec<MatchOdds>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    let candidates: Vec<MatchOdds> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse fixtures from {:?}", path))?;
    Ok(candidates)
}

#[cfg(feature = "api-client")]
fn fetch_candidates(config: &AnalyticsConfig, date: NaiveDate) -> Result<Vec<MatchOdds>> {
    if config.api.api_key.is_none() {
        bail!("FOOTBALL_API_KEY is not set");
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;
    let client = ApiFootballClient::new(config.api.clone()).context("Failed to create API client")?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Fetching fixtures and odds for {}...", date));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let candidates = rt.block_on(collect_match_odds(&client, date, &config.priority_leagues));
    pb.finish_and_clear();

    println!(
        "{}: {} fixtures with odds on {}",
        "Fetched".green(),
        candidates.len(),
        date
    );
    Ok(candidates)
}

#[cfg(not(feature = "api-client"))]
fn fetch_candidates(_config: &AnalyticsConfig, _date: NaiveDate) -> Result<Vec<MatchOdds>> {
    bail!("--input is required (build with the api-client feature to fetch odds)")
}

fn run_value(candidates: Vec<MatchOdds>, filter: SeverityFilter, top: usize, fraction: KellyFraction) {
    let total = candidates.len();
    let bets: Vec<ValueBet> = filter_value_bets(candidates, filter).take(top).collect();

    println!(
        "{} ({} of {} fixtures):",
        "Value Bets".yellow().bold(),
        bets.len(),
        total
    );

    if bets.is_empty() {
        println!("{}", "No value bets found.".yellow());
        return;
    }

    println!(
        "{:<36} {:<6} {:>7} {:>7} {:>7} {:>7} {:>8}",
        "Match", "Pick", "Odds", "Model", "Implied", "Edge", "Kelly"
    );
    println!("{}", "-".repeat(84));

    for bet in &bets {
        let best = &bet.best;
        let kelly = compute_kelly(best.odds, best.predicted_probability, None, fraction)
            .map(|k| format!("{:.2}%", k.adjusted_fraction))
            .unwrap_or_else(|_| "-".to_string());

        let edge = format!("{:+.1}", bet.value_edge());
        let edge = match bet.severity() {
            Severity::High => edge.green().bold(),
            Severity::Medium => edge.yellow(),
            Severity::Low => edge.normal(),
        };

        let marker = if bet.is_priority_league { "*" } else { " " };
        println!(
            "{}{:<35} {:<6} {:>7.2} {:>6.0}% {:>6.1}% {:>7} {:>8}",
            marker,
            truncate_name(&format!("{} vs {}", bet.home_team, bet.away_team), 35),
            best.outcome.to_string(),
            best.odds,
            best.predicted_probability,
            best.implied_probability,
            edge,
            kelly
        );
    }

    println!();
    println!("{}", format!("* priority league, Kelly column at {} Kelly", fraction).dimmed());
}

fn run_predictions(config: &AnalyticsConfig, action: PredictionAction) -> Result<()> {
    let mut ledger = PredictionLedger::open(open_store(config)?);

    match action {
        PredictionAction::Record {
            match_id,
            home,
            away,
            winner,
            confidence,
            league,
        } => {
            let record = ledger
                .record(NewPrediction {
                    match_id,
                    home_team: home,
                    away_team: away,
                    league,
                    winner_name: winner,
                    confidence,
                })
                .context("Failed to record prediction")?;
            println!(
                "{}: {} vs {} -> {} ({}%)",
                "Recorded".green(),
                record.home_team,
                record.away_team,
                record.prediction.winner_name,
                record.prediction.confidence
            );
            println!("{}", format!("id {}", record.id).dimmed());
        }
        #[cfg(feature = "api-client")]
        PredictionAction::Verify => {
            let pending = ledger.pending().count();
            if pending == 0 {
                println!("{}", "No pending predictions.".yellow());
                return Ok(());
            }

            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to create tokio runtime")?;
            let client =
                ApiFootballClient::new(config.api.clone()).context("Failed to create API client")?;

            let pb = ProgressBar::new_spinner();
            pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
            pb.set_message(format!("Checking {} pending predictions...", pending));
            pb.enable_steady_tick(std::time::Duration::from_millis(100));

            let verified = rt.block_on(ledger.verify_pending(&client));
            pb.finish_and_clear();

            println!(
                "{}: {} of {} pending predictions",
                "Verified".green(),
                verified,
                pending
            );
        }
        PredictionAction::List { pending, limit } => {
            print_prediction_list(&ledger, pending, limit);
        }
        PredictionAction::Stats => print_prediction_stats(&ledger, config.top_leagues),
        PredictionAction::Reset { yes } => {
            if yes || confirm("Delete the whole prediction history?")? {
                ledger.reset().context("Failed to reset predictions")?;
                println!("{}", "Prediction history cleared.".green());
            }
        }
    }

    Ok(())
}

fn print_prediction_list(ledger: &PredictionLedger<JsonFileStore>, pending_only: bool, limit: usize) {
    let records: Vec<_> = ledger
        .records()
        .iter()
        .filter(|r| !pending_only || r.is_pending())
        .take(limit)
        .collect();

    if records.is_empty() {
        println!("{}", "No predictions recorded.".yellow());
        return;
    }

    println!(
        "{:<17} {:<34} {:<16} {:>5} {:>8}",
        "Date", "Match", "Pick", "Conf", "Result"
    );
    println!("{}", "-".repeat(84));

    for record in records {
        let result = match record.result {
            None => "pending".dimmed(),
            Some(r) if r.is_correct => format!("{}-{} ✓", r.home_goals, r.away_goals).green(),
            Some(r) => format!("{}-{} ✗", r.home_goals, r.away_goals).red(),
        };
        println!(
            "{:<17} {:<34} {:<16} {:>4}% {:>8}",
            record.created_at.format("%Y-%m-%d %H:%M"),
            truncate_name(&format!("{} vs {}", record.home_team, record.away_team), 34),
            truncate_name(&record.prediction.winner_name, 16),
            record.prediction.confidence,
            result
        );
    }
}

fn print_prediction_stats(ledger: &PredictionLedger<JsonFileStore>, top_leagues: usize) {
    let stats = ledger.compute_stats();

    println!("{}", "Prediction Stats:".yellow().bold());
    println!("{:<20} {:>8}", "Total", stats.total);
    println!("{:<20} {:>8}", "Verified", stats.verified);
    println!("{:<20} {:>8}", "Correct", stats.correct);
    println!("{:<20} {:>8}", "Wrong", stats.wrong);
    println!("{:<20} {:>8}", "Pending", stats.pending);
    println!("{:<20} {:>7.1}%", "Accuracy", stats.accuracy);
    println!("{:<20} {:>7.1}%", "Raw accuracy", stats.raw_accuracy);

    let streak = match stats.streak_type {
        Some(true) => format!("{} wins", stats.current_streak).green(),
        Some(false) => format!("{} losses", stats.current_streak).red(),
        None => "-".normal(),
    };
    println!("{:<20} {:>8}", "Current streak", streak);
    println!("{:<20} {:>8}", "Longest win streak", stats.longest_streak);
    println!();

    println!("{}", "By confidence:".yellow().bold());
    for bucket in ledger.confidence_breakdown() {
        println!(
            "{:<20} {:>4}/{:<4} {:>6.1}%",
            bucket.bucket.label(),
            bucket.correct,
            bucket.total,
            bucket.accuracy
        );
    }
    println!();

    let leagues = ledger.league_breakdown(top_leagues);
    if !leagues.is_empty() {
        println!("{}", "By league:".yellow().bold());
        println!(
            "{:<24} {:>6} {:>8} {:>6} {:>8} {:>9}",
            "League", "Total", "Correct", "Wrong", "Pending", "Accuracy"
        );
        println!("{}", "-".repeat(66));
        for league in leagues {
            println!(
                "{:<24} {:>6} {:>8} {:>6} {:>8} {:>8.1}%",
                truncate_name(&league.league, 24),
                league.total,
                league.correct,
                league.wrong,
                league.pending,
                league.accuracy
            );
        }
    }
}

fn run_bankroll(config: &AnalyticsConfig, action: BankrollAction) -> Result<()> {
    let mut ledger = BankrollLedger::open(open_store(config)?);

    match action {
        BankrollAction::Init { amount } => {
            ledger
                .initialize(amount)
                .context("Failed to initialize bankroll")?;
            println!("{}: {:.2}", "Bankroll initialized".green(), amount);
        }
        BankrollAction::Add { kind, amount, note } => {
            let tx = ledger
                .add_transaction(kind, amount, note.as_deref())
                .context("Failed to add transaction")?;
            println!(
                "{}: {} {:.2}, balance {:.2}",
                "Recorded".green(),
                tx.kind,
                tx.amount,
                ledger.current_bankroll()
            );
            println!("{}", format!("id {}", tx.id).dimmed());
        }
        BankrollAction::Remove { id } => {
            let tx = ledger
                .remove_transaction(id)
                .context("Failed to remove transaction")?;
            println!(
                "{}: {} {:.2}, balance {:.2}",
                "Removed".green(),
                tx.kind,
                tx.amount,
                ledger.current_bankroll()
            );
        }
        BankrollAction::Show { limit } => print_bankroll(&ledger, limit),
        BankrollAction::Reset { yes } => {
            if yes || confirm("Discard the bankroll and all transactions?")? {
                ledger.reset().context("Failed to reset bankroll")?;
                println!("{}", "Bankroll reset.".green());
            }
        }
    }

    Ok(())
}

fn print_bankroll(ledger: &BankrollLedger<JsonFileStore>, limit: usize) {
    if !ledger.is_initialized() {
        println!(
            "{}",
            "Bankroll not initialized. Run `bankroll init <amount>` first.".yellow()
        );
        return;
    }

    let state = ledger.state();
    let m = ledger.metrics();
    let (drawdown, drawdown_pct) = ledger.max_drawdown();

    let profit = format!("{:+.2}", m.profit_loss);
    let profit = if m.profit_loss >= 0.0 { profit.green() } else { profit.red() };

    println!("{}", "Bankroll:".yellow().bold());
    println!("{:<20} {:>12.2}", "Starting", state.starting_bankroll);
    println!("{:<20} {:>12.2}", "Current", state.current_bankroll);
    println!("{:<20} {:>12}", "Profit/Loss", profit);
    println!("{:<20} {:>11.2}%", "ROI", m.roi);
    println!(
        "{:<20} {:>11.1}% ({}W / {}L)",
        "Win rate", m.win_rate, m.bets_won, m.bets_lost
    );
    println!("{:<20} {:>12.2}", "Deposits", m.total_deposits);
    println!("{:<20} {:>12.2}", "Withdrawals", m.total_withdrawals);
    println!("{:<20} {:>12.2}", "Winnings", m.total_wins);
    println!("{:<20} {:>12.2}", "Losses", m.total_losses);
    println!(
        "{:<20} {:>12.2} ({:.1}%)",
        "Max drawdown", drawdown, drawdown_pct
    );
    println!();

    println!("{}", "Recent transactions:".yellow().bold());
    println!(
        "{:<17} {:<10} {:>10}  {:<36} {}",
        "Date", "Type", "Amount", "Id", "Note"
    );
    println!("{}", "-".repeat(90));
    for tx in state.transactions.iter().take(limit) {
        let amount = format!("{:+.2}", tx.signed_amount());
        let amount = if tx.signed_amount() >= 0.0 { amount.green() } else { amount.red() };
        println!(
            "{:<17} {:<10} {:>10}  {:<36} {}",
            tx.date.format("%Y-%m-%d %H:%M"),
            tx.kind.to_string(),
            amount,
            tx.id,
            tx.note
        );
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    Ok(confirmed)
}

/// Interactive mode
fn run_interactive(config: &AnalyticsConfig) -> Result<()> {
    println!("{}", "Interactive mode".green().bold());
    println!("Choose Quit to exit.\n");

    let theme = ColorfulTheme::default();

    loop {
        let options = vec![
            "Kelly calculator",
            "Find value bets (JSON file)",
            "Record a prediction",
            "Prediction stats",
            "Show bankroll",
            "Add bankroll transaction",
            "Quit",
        ];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        let outcome = match selection {
            0 => {
                let odds: f64 = Input::with_theme(&theme)
                    .with_prompt("Decimal odds")
                    .interact_text()?;
                let probability: f64 = Input::with_theme(&theme)
                    .with_prompt("Win probability (%)")
                    .interact_text()?;
                let bankroll: f64 = Input::with_theme(&theme)
                    .with_prompt("Bankroll (0 to skip)")
                    .default(0.0)
                    .interact_text()?;

                let fractions: Vec<String> =
                    KellyFraction::ALL.iter().map(|f| f.to_string()).collect();
                let default_fraction = KellyFraction::ALL
                    .iter()
                    .position(|&f| f == config.kelly_fraction)
                    .unwrap_or(0);
                let fraction = Select::with_theme(&theme)
                    .with_prompt("Kelly fraction")
                    .items(&fractions)
                    .default(default_fraction)
                    .interact()?;

                run_kelly(odds, probability, Some(bankroll), KellyFraction::ALL[fraction])
            }
            1 => {
                let path: String = Input::with_theme(&theme)
                    .with_prompt("Fixtures JSON file")
                    .interact_text()?;
                load_candidates(Path::new(path.trim())).map(|candidates| {
                    run_value(candidates, SeverityFilter::All, 20, config.kelly_fraction)
                })
            }
            2 => {
                let match_id: String = Input::with_theme(&theme)
                    .with_prompt("Match id")
                    .interact_text()?;
                let home: String = Input::with_theme(&theme)
                    .with_prompt("Home team")
                    .interact_text()?;
                let away: String = Input::with_theme(&theme)
                    .with_prompt("Away team")
                    .interact_text()?;

                let picks = vec![home.clone(), "Draw".to_string(), away.clone()];
                let pick = Select::with_theme(&theme)
                    .with_prompt("Predicted winner")
                    .items(&picks)
                    .default(0)
                    .interact()?;
                let confidence: u8 = Input::with_theme(&theme)
                    .with_prompt("Confidence (%)")
                    .interact_text()?;
                let league: String = Input::with_theme(&theme)
                    .with_prompt("League (optional)")
                    .allow_empty(true)
                    .interact_text()?;

                run_predictions(
                    config,
                    PredictionAction::Record {
                        match_id,
                        home,
                        away,
                        winner: picks[pick].clone(),
                        confidence,
                        league: Some(league).filter(|l| !l.trim().is_empty()),
                    },
                )
            }
            3 => run_predictions(config, PredictionAction::Stats),
            4 => run_bankroll(config, BankrollAction::Show { limit: 10 }),
            5 => {
                let kinds = [
                    TransactionKind::Deposit,
                    TransactionKind::Withdraw,
                    TransactionKind::BetWin,
                    TransactionKind::BetLoss,
                ];
                let labels: Vec<String> = kinds.iter().map(|k| k.to_string()).collect();
                let kind = Select::with_theme(&theme)
                    .with_prompt("Transaction type")
                    .items(&labels)
                    .default(0)
                    .interact()?;
                let amount: f64 = Input::with_theme(&theme)
                    .with_prompt("Amount")
                    .interact_text()?;
                let note: String = Input::with_theme(&theme)
                    .with_prompt("Note (optional)")
                    .allow_empty(true)
                    .interact_text()?;

                run_bankroll(
                    config,
                    BankrollAction::Add {
                        kind: kinds[kind],
                        amount,
                        note: Some(note).filter(|n| !n.trim().is_empty()),
                    },
                )
            }
            _ => {
                println!("Goodbye!");
                break;
            }
        };

        // Bad input should not end the session
        if let Err(e) = outcome {
            println!("{}: {:#}", "Error".red(), e);
        }
        println!();
    }

    Ok(())
}

fn truncate_name(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        name.to_string()
    } else {
        let truncated: String = name.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
