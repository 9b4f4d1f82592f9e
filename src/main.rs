use chrono::{Local, NaiveDate};
use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail, eyre};
use log::info;
use std::fs;
use std::path::PathBuf;

use grocer::domain::{FoodItem, GroceryDays};
use grocer::id::ItemId;
use grocer::storage::{ItemStore, JsonStateStore, JsonlItemStore, StateStore};
use grocer::{Planner, compute_quotient};

mod cli;
mod config;

use cli::Cli;
use cli::commands::{Commands, ItemCommands, ItemDetails};
use config::Config;

fn setup_logging(level: Option<&str>) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("grocer")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("grocer.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.unwrap_or("info")))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Stores opened on the configured data directory.
struct Workspace {
    items: JsonlItemStore,
    planner: Planner<JsonStateStore>,
    days: GroceryDays,
}

impl Workspace {
    fn open(config: &Config) -> Result<Self> {
        let data_dir = &config.storage.data_dir;
        let items = JsonlItemStore::new(data_dir)
            .with_context(|| format!("Failed to open item store in {}", data_dir.display()))?;
        let state = JsonStateStore::open_in(data_dir)
            .with_context(|| format!("Failed to open scheduler state in {}", data_dir.display()))?;
        Ok(Self {
            items,
            planner: Planner::new(state),
            days: config.grocery_days.clone(),
        })
    }

    fn require_days(&self) -> Result<()> {
        if self.days.is_empty() {
            bail!("No grocery days configured, add `grocery_days: [Mon, Thu]` to grocer.yml");
        }
        Ok(())
    }

    fn find_item(&self, id: &str) -> Result<FoodItem> {
        self.items
            .get(&ItemId::new(id))?
            .ok_or_else(|| eyre!("Item not found: {}", id))
    }
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Days => handle_days_command(config),
        Commands::Quotient {
            frequency,
            time_frame,
            days,
        } => handle_quotient_command(*frequency, *time_frame, *days, config),
        Commands::Item { command } => handle_item_command(command, config),
        Commands::List { date, force } => handle_list_command(*date, *force, config),
        Commands::Preview { id, occasions } => handle_preview_command(id, *occasions, config),
    }
}

fn handle_days_command(config: &Config) -> Result<()> {
    let days = &config.grocery_days;
    if days.is_empty() {
        println!("{}", "No grocery days configured".yellow());
    } else {
        println!("{} {} ({} per week)", "Grocery days:".green(), days, days.per_week());
    }
    Ok(())
}

fn handle_quotient_command(frequency: u32, time_frame: u32, days: Option<u32>, config: &Config) -> Result<()> {
    let days = days.unwrap_or_else(|| config.grocery_days.per_week());
    info!("Computing quotient for {} per {} week(s), {} day(s)", frequency, time_frame, days);
    let quotient = compute_quotient(frequency, time_frame, days)?;
    println!("{} {}", "Quotient:".green(), quotient);
    Ok(())
}

fn apply_details(mut item: FoodItem, details: &ItemDetails) -> FoodItem {
    if let Some(brand) = &details.brand {
        item.brand = Some(brand.clone());
    }
    if let Some(amount) = details.amount {
        item.amount = amount;
    }
    if let Some(unit) = &details.unit {
        item.unit = Some(unit.clone());
    }
    if let Some(info) = &details.info {
        item.info = Some(info.clone());
    }
    item
}

fn handle_item_command(command: &ItemCommands, config: &Config) -> Result<()> {
    info!("Handling item command: {:?}", command);
    let ws = Workspace::open(config)?;

    match command {
        ItemCommands::Add {
            label,
            frequency,
            time_frame,
            details,
        } => {
            ws.require_days()?;
            let item = apply_details(FoodItem::new(label, *frequency, *time_frame), details);
            let state = ws.planner.add_item(&ws.items, &item, &ws.days)?;
            println!(
                "{} {} ({}, {}) quotient {}",
                "Added:".green(),
                item.label,
                item.id,
                item.describe_frequency(),
                state.quotient
            );
        }
        ItemCommands::Edit {
            id,
            label,
            frequency,
            time_frame,
            details,
        } => {
            ws.require_days()?;
            let before = ws.find_item(id)?;
            let mut after = apply_details(before.clone(), details);
            if let Some(label) = label {
                after.label = label.clone();
            }
            if let Some(frequency) = frequency {
                after.frequency = *frequency;
            }
            if let Some(time_frame) = time_frame {
                after.time_frame = *time_frame;
            }
            after.touch();

            let state = ws.planner.item_edited(&before, &after, &ws.days)?;
            ws.items.update(&after)?;
            println!(
                "{} {} ({}) quotient {} accumulator {:.2}",
                "Updated:".green(),
                after.label,
                after.describe_frequency(),
                state.quotient,
                state.accumulator
            );
        }
        ItemCommands::Remove { id } => {
            let item = ws.planner.remove_item(&ws.items, &ItemId::new(id))?;
            println!("{} {}", "Removed:".red(), item.label);
        }
        ItemCommands::Clear { yes } => {
            if !*yes {
                bail!("Refusing to delete every item and its history without --yes");
            }
            let removed = ws.planner.clear(&ws.items)?;
            println!("{} {} item(s)", "Cleared:".red(), removed);
        }
        ItemCommands::List => {
            let items = ws.items.list()?;
            if items.is_empty() {
                println!("{}", "No food items configured".yellow());
            }
            let states = ws.planner.store().entries()?;
            for item in &items {
                let quotient = item
                    .quotient(ws.days.per_week())
                    .map(|q| q.to_string())
                    .unwrap_or_else(|_| "-".to_string());
                let accumulator = states
                    .get(&item.id)
                    .map(|s| format!("{:.2}", s.accumulator))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{}  {} [{}] {}  quotient {}  credit {}",
                    item.id.to_string().dimmed(),
                    item.label.bold(),
                    item.describe_amount(),
                    item.describe_frequency(),
                    quotient,
                    accumulator
                );
            }
        }
    }
    Ok(())
}

fn handle_list_command(date: Option<NaiveDate>, force: bool, config: &Config) -> Result<()> {
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    info!("Generating grocery list for {} (force: {})", date, force);

    let ws = Workspace::open(config)?;
    ws.require_days()?;
    let items = ws.items.list()?;
    ws.planner.prune(&items)?;
    let list = ws.planner.generate_list(date, &items, &ws.days, force)?;

    let heading = format!("Grocery list for {}", list.date);
    if list.replayed {
        println!("{} {}", heading.cyan(), "(already generated)".dimmed());
    } else {
        println!("{}", heading.cyan());
    }

    if list.is_empty() {
        println!("  nothing to buy");
    }
    for entry in &list.entries {
        let brand = entry.item.brand.as_deref().map(|b| format!(" ({})", b)).unwrap_or_default();
        let times = if entry.owed > 1 {
            format!(" x{}", entry.owed)
        } else {
            String::new()
        };
        println!("  - {}{} {}{}", entry.item.label, brand, entry.item.describe_amount(), times);
    }
    Ok(())
}

fn handle_preview_command(id: &str, occasions: Option<usize>, config: &Config) -> Result<()> {
    let occasions = occasions.unwrap_or(config.preview.occasions);
    info!("Previewing item {} over {} occasion(s)", id, occasions);

    let ws = Workspace::open(config)?;
    ws.require_days()?;
    let item = ws.find_item(id)?;

    let today = Local::now().date_naive();
    let start = match ws.planner.store().last_occasion()? {
        Some(last) if last.date >= today => last.date.succ_opt().unwrap_or(last.date),
        _ => today,
    };
    let dates = ws.days.upcoming(start, occasions);
    let decisions = ws.planner.preview(&item, &ws.days, dates.len())?;

    println!("{} {} ({})", "Preview:".green(), item.label, item.describe_frequency());
    for (date, decision) in dates.iter().zip(&decisions) {
        let mark = if decision.include { "buy".green() } else { "-".dimmed() };
        println!("  {} {}  {}", date, date.format("%a"), mark);
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(config.log_level.as_deref()).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
