//! `slots` CLI — manage barber availability rules and query bookable slots.
//!
//! All commands operate on a JSON data file holding `barbers`, `services`,
//! `rules` and an optional `config` object. Commands that change rules write
//! the file back in place.
//!
//! ## Usage
//!
//! ```sh
//! # Bookable slots for barber 1 on a Monday, for a 60-minute service
//! slots --data shop.json availability --barber 1 --date 2026-03-16 --service 10
//!
//! # Same, one window per rule instead of merged windows
//! slots --data shop.json availability --barber 1 --date 2026-03-16 --no-merge
//!
//! # List every rule of barber 1 on Mondays, latest start first
//! slots --data shop.json rules list --barber 1 --day 0 --all --order-by start_time --order desc
//!
//! # Add, edit and soft-delete rules
//! slots --data shop.json rules add --barber 1 --day 0 --start 09:00 --end 12:00 --slot 30
//! slots --data shop.json rules update --rule 3 --end 13:00
//! slots --data shop.json rules delete --rule 3
//! ```
//!
//! Set `RUST_LOG` (or pass `--verbose`) for diagnostic output on stderr.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveTime;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use slot_engine::rules::{
    create_rule, delete_rule, list_rules, update_rule, RuleInput, RulePatch, RuleQuery,
};
use slot_engine::timefmt::parse_time;
use slot_engine::{compute_availability, EngineConfig, MemoryStore, Status};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Barber availability rules and bookable slots"
)]
struct Cli {
    /// JSON data file with barbers, services, rules and optional config
    #[arg(short, long)]
    data: PathBuf,

    /// Log debug diagnostics to stderr (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute bookable slots for a barber on a date
    Availability {
        #[arg(long)]
        barber: u64,
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Only offer starts where this service fits entirely
        #[arg(long)]
        service: Option<u64>,
        /// Use one window per rule instead of merging touching windows
        #[arg(long)]
        no_merge: bool,
    },
    /// Manage weekly availability rules
    Rules {
        #[command(subcommand)]
        command: RuleCommands,
    },
}

#[derive(Subcommand)]
enum RuleCommands {
    /// List a barber's rules
    List {
        #[arg(long)]
        barber: u64,
        /// Only rules for this weekday (0 = Monday .. 6 = Sunday)
        #[arg(long)]
        day: Option<u8>,
        /// Include inactive rules
        #[arg(long)]
        all: bool,
        /// One of: id, day_of_week, start_time, end_time, created_at
        #[arg(long, default_value = "id")]
        order_by: String,
        /// asc or desc
        #[arg(long, default_value = "asc")]
        order: String,
    },
    /// Add a rule (reactivates an identical inactive rule)
    Add {
        #[arg(long)]
        barber: u64,
        /// Weekday, 0 = Monday .. 6 = Sunday
        #[arg(long)]
        day: u8,
        #[arg(long, value_parser = parse_time_arg)]
        start: NaiveTime,
        #[arg(long, value_parser = parse_time_arg)]
        end: NaiveTime,
        /// Slot size in minutes (defaults to the configured default)
        #[arg(long)]
        slot: Option<i64>,
    },
    /// Change fields of an existing rule
    Update {
        #[arg(long)]
        rule: u64,
        #[arg(long)]
        day: Option<u8>,
        #[arg(long, value_parser = parse_time_arg)]
        start: Option<NaiveTime>,
        #[arg(long, value_parser = parse_time_arg)]
        end: Option<NaiveTime>,
        #[arg(long)]
        slot: Option<i64>,
        /// Set the rule active (true) or inactive (false)
        #[arg(long)]
        active: Option<bool>,
    },
    /// Soft-delete a rule
    Delete {
        #[arg(long)]
        rule: u64,
    },
}

/// On-disk layout: the store's collections plus engine config.
#[derive(Default, Serialize, Deserialize)]
struct DataFile {
    #[serde(flatten)]
    store: MemoryStore,
    #[serde(default)]
    config: EngineConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut data = load_data(&cli.data)?;

    match cli.command {
        Commands::Availability {
            barber,
            date,
            service,
            no_merge,
        } => {
            let merge = data.config.merge_windows && !no_merge;
            let result = compute_availability(&data.store, barber, &date, service, merge)
                .context("Failed to compute availability")?;
            print_json(&result)?;
        }
        Commands::Rules { command } => run_rule_command(command, &mut data, &cli.data)?,
    }

    Ok(())
}

fn run_rule_command(command: RuleCommands, data: &mut DataFile, path: &Path) -> Result<()> {
    match command {
        RuleCommands::List {
            barber,
            day,
            all,
            order_by,
            order,
        } => {
            let query = RuleQuery {
                active_only: !all,
                day_of_week: day,
                order_by: order_by.parse()?,
                order: order.parse()?,
            };
            let rules = list_rules(&data.store, barber, &query).context("Failed to list rules")?;
            print_json(&rules)?;
        }
        RuleCommands::Add {
            barber,
            day,
            start,
            end,
            slot,
        } => {
            let input = RuleInput {
                day_of_week: day,
                start_time: start,
                end_time: end,
                slot_minutes: slot,
            };
            let write = create_rule(&mut data.store, &data.config, barber, &input)
                .context("Failed to add rule")?;
            save_data(path, data)?;
            print_json(&serde_json::json!({
                "outcome": write.outcome,
                "rule": write.rule,
            }))?;
        }
        RuleCommands::Update {
            rule,
            day,
            start,
            end,
            slot,
            active,
        } => {
            let patch = RulePatch {
                day_of_week: day,
                start_time: start,
                end_time: end,
                slot_minutes: slot,
                status: active.map(Status::from),
            };
            let updated = update_rule(&mut data.store, &data.config, rule, &patch)
                .context("Failed to update rule")?;
            save_data(path, data)?;
            print_json(&updated)?;
        }
        RuleCommands::Delete { rule } => {
            let deleted = delete_rule(&mut data.store, rule).context("Failed to delete rule")?;
            save_data(path, data)?;
            print_json(&deleted)?;
        }
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        format!("slot_engine=debug,{}=debug", env!("CARGO_CRATE_NAME"))
    } else {
        "warn".to_string()
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn parse_time_arg(s: &str) -> std::result::Result<NaiveTime, String> {
    parse_time(s).ok_or_else(|| format!("invalid time '{}', expected HH:MM", s))
}

fn load_data(path: &Path) -> Result<DataFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file: {}", path.display()))?;
    let data: DataFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse data file: {}", path.display()))?;
    debug!(
        barbers = data.store.barbers().len(),
        services = data.store.services().len(),
        rules = data.store.rules().len(),
        "data file loaded"
    );
    Ok(data)
}

fn save_data(path: &Path, data: &DataFile) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write data file: {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
