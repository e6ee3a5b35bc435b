use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style, Table, Tabled};
use tracing::debug;

use condo::compare::{self, Metric, UnitMetrics};
use condo::config::{
    config_dir, data_dir, load_config, load_units, select_units, CONFIG_TEMPLATE, UNITS_TEMPLATE,
};
use condo::error::{CondoError, Result};
use condo::ledger::{self, Holder, Installment, Share};
use condo::schedule::{generate, DayOverflow, InstallmentStatus, ScheduleConfig, ScheduleSummary};
use condo::store::{EntityStore, TomlStore};
use condo::telemetry;

#[derive(Parser)]
#[command(name = "condo")]
#[command(version, about = "Condominium ledger: consortium installments and unit comparison", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.condo or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Show configuration and outstanding installments
    Status,

    /// List units from units.toml
    Units,

    /// Compare 2 to 4 units side by side
    Compare {
        /// Unit identifiers from units.toml
        #[arg(required = true, num_args = 1..)]
        units: Vec<String>,

        /// Also write the comparison to a CSV file
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,

        /// Print the comparison as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Register a consortium share
    ShareAdd {
        /// Consortium group code
        #[arg(short, long)]
        group: String,

        /// Share number within the group
        #[arg(short, long)]
        number: String,

        /// Client holding the share (default: held by the company)
        #[arg(long)]
        client: Option<String>,

        /// Credit value of the share
        #[arg(long)]
        credit: Option<Decimal>,
    },

    /// List registered shares
    Shares,

    /// Generate and save the installment schedule of a share
    Schedule {
        /// Share id (e.g., SHARE-0001)
        #[arg(short, long)]
        share: String,

        /// Date of the first period (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,

        /// Number of installments
        #[arg(long, default_value_t = 0)]
        count: u32,

        /// Day of month installments fall due (default from config.toml)
        #[arg(long)]
        due_day: Option<u32>,

        /// Base amount of each installment
        #[arg(long, default_value_t = Decimal::ZERO)]
        amount: Decimal,

        /// Reserve fund percentage (default from config.toml)
        #[arg(long)]
        reserve: Option<Decimal>,

        /// Common fund percentage (default from config.toml)
        #[arg(long)]
        common: Option<Decimal>,

        /// Administration fee percentage (default from config.toml)
        #[arg(long)]
        admin: Option<Decimal>,

        /// Pin due days past month end to the last day of the month
        #[arg(long)]
        clamp: bool,

        /// Print the schedule without saving it
        #[arg(long)]
        dry_run: bool,
    },

    /// List saved installments
    Installments {
        /// Only installments of this share
        #[arg(short, long)]
        share: Option<String>,

        /// Filter by status
        #[arg(long, value_enum)]
        status: Option<StatusFilter>,

        /// Number of installments to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Record payment of an installment
    Pay {
        /// Installment id (e.g., INST-0001)
        installment: String,

        /// Payment date (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusFilter {
    Pending,
    Paid,
    Overdue,
}

impl StatusFilter {
    fn matches(self, status: InstallmentStatus) -> bool {
        matches!(
            (self, status),
            (StatusFilter::Pending, InstallmentStatus::Pending)
                | (StatusFilter::Paid, InstallmentStatus::Paid)
                | (StatusFilter::Overdue, InstallmentStatus::Overdue)
        )
    }
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| CondoError::InvalidDate(value.to_string()).to_string())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    let configured = load_config(&cfg_dir).ok().map(|c| c.logging.level);
    telemetry::init(&telemetry::level_for(cli.verbose, configured.as_deref()))?;
    debug!(config_dir = %cfg_dir.display(), "starting");

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::Units => cmd_units(&cfg_dir),
        Commands::Compare { units, csv, json } => cmd_compare(&cfg_dir, &units, csv, json),
        Commands::ShareAdd {
            group,
            number,
            client,
            credit,
        } => cmd_share_add(&cfg_dir, group, number, client, credit),
        Commands::Shares => cmd_shares(&cfg_dir),
        Commands::Schedule {
            share,
            start,
            count,
            due_day,
            amount,
            reserve,
            common,
            admin,
            clamp,
            dry_run,
        } => {
            let config = load_config(&cfg_dir)?;
            let defaults = &config.schedule;
            let schedule = ScheduleConfig {
                start_date: start,
                installment_count: count,
                due_day_of_month: due_day.unwrap_or(defaults.due_day),
                gross_amount: amount,
                reserve_fund_pct: reserve.unwrap_or(defaults.reserve_fund_pct),
                common_fund_pct: common.unwrap_or(defaults.common_fund_pct),
                admin_fee_pct: admin.unwrap_or(defaults.admin_fee_pct),
                day_overflow: if clamp {
                    DayOverflow::Clamp
                } else {
                    defaults.day_overflow
                },
            };
            cmd_schedule(&cfg_dir, &config.currency.symbol, &share, schedule, dry_run)
        }
        Commands::Installments {
            share,
            status,
            limit,
        } => cmd_installments(&cfg_dir, share, status, limit),
        Commands::Pay { installment, date } => cmd_pay(&cfg_dir, &installment, date),
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn require_config_dir(cfg_dir: &Path) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(CondoError::ConfigNotFound(cfg_dir.to_path_buf()));
    }
    Ok(())
}

fn open_store(cfg_dir: &Path) -> Result<TomlStore> {
    require_config_dir(cfg_dir)?;
    TomlStore::open(data_dir(cfg_dir))
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(CondoError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(data_dir(cfg_dir))?;

    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(cfg_dir.join("units.toml"), UNITS_TEMPLATE)?;

    println!("Initialized condo config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Set company and default rates:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Describe your units:            $EDITOR {}/units.toml",
        cfg_dir.display()
    );
    println!();
    println!("Then register a share and generate its installments:");
    println!("  condo share-add --group <group> --number <number>");
    println!("  condo schedule --share SHARE-0001 --start <date> --count <n> --amount <value>");

    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct UnitRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "KIND")]
    kind: String,
    #[tabled(rename = "AREA")]
    area: String,
    #[tabled(rename = "BEDROOMS")]
    bedrooms: u32,
    #[tabled(rename = "SUITES")]
    suites: u32,
    #[tabled(rename = "BATHS")]
    bathrooms: f64,
    #[tabled(rename = "PRICE")]
    price: String,
}

#[derive(Tabled)]
struct ShareRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "GROUP")]
    group: String,
    #[tabled(rename = "NUMBER")]
    number: String,
    #[tabled(rename = "HOLDER")]
    holder: String,
    #[tabled(rename = "CREDIT")]
    credit: String,
}

#[derive(Tabled)]
struct InstallmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "SHARE")]
    share: String,
    #[tabled(rename = "#")]
    sequence: u32,
    #[tabled(rename = "DUE")]
    due: String,
    #[tabled(rename = "GROSS")]
    gross: String,
    #[tabled(rename = "RESERVE")]
    reserve: String,
    #[tabled(rename = "COMMON")]
    common: String,
    #[tabled(rename = "ADMIN")]
    admin: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

/// Insert thousands separators into a string of ASCII digits
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}

/// Format a money amount with two decimal places and thousands separators
fn format_money(value: Decimal, currency_symbol: &str) -> String {
    let rounded = format!("{:.2}", value.round_dp(2));
    let (whole, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let negative = whole.starts_with('-');
    let grouped = group_digits(whole.trim_start_matches('-'));

    if negative {
        format!("-{currency_symbol} {grouped}.{frac}")
    } else {
        format!("{currency_symbol} {grouped}.{frac}")
    }
}

fn format_optional(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.2}{unit}"),
        None => "-".to_string(),
    }
}

fn format_price(value: Option<f64>, currency_symbol: &str) -> String {
    value
        .and_then(Decimal::from_f64_retain)
        .map(|v| format_money(v, currency_symbol))
        .unwrap_or_else(|| "-".to_string())
}

/// List units from units.toml
fn cmd_units(cfg_dir: &Path) -> Result<()> {
    require_config_dir(cfg_dir)?;

    let config = load_config(cfg_dir)?;
    let units = load_units(cfg_dir)?;

    if units.is_empty() {
        println!("No units configured.");
        println!("Add units to: {}/units.toml", cfg_dir.display());
        return Ok(());
    }

    let rows: Vec<UnitRow> = units
        .values()
        .map(|unit| {
            let metrics = UnitMetrics::of(unit);
            UnitRow {
                id: unit.id.clone(),
                name: unit.name.clone(),
                kind: unit.kind.to_string(),
                area: format_optional(metrics.total_area, " m²"),
                bedrooms: metrics.bedrooms,
                suites: metrics.suites,
                bathrooms: metrics.bathrooms,
                price: format_price(metrics.sale_price, &config.currency.symbol),
            }
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Compare units side by side
fn cmd_compare(
    cfg_dir: &Path,
    ids: &[String],
    csv_path: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    require_config_dir(cfg_dir)?;

    let config = load_config(cfg_dir)?;
    let catalog = load_units(cfg_dir)?;
    let units = select_units(&catalog, ids)?;
    let result = compare::compare(&units)?;

    if let Some(path) = &csv_path {
        let file = std::fs::File::create(path)?;
        compare::write_csv(file, &result)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let symbol = &config.currency.symbol;
    let mut builder = Builder::default();

    let mut header = vec![String::new()];
    header.extend(result.units.iter().map(|u| u.name.clone()));
    builder.push_record(header);

    for metric in Metric::ALL {
        let mut record = vec![metric.label().to_string()];
        record.extend(result.units.iter().map(|u| {
            let value = match metric {
                Metric::TotalArea => format_optional(u.metrics.total_area, " m²"),
                Metric::BuiltArea => format_optional(u.metrics.built_area, " m²"),
                Metric::PricePerArea => format_price(u.metrics.price_per_area, symbol),
                Metric::Bedrooms => u.metrics.bedrooms.to_string(),
                Metric::Suites => u.metrics.suites.to_string(),
                Metric::ParkingSpaces => u.metrics.parking_spaces.to_string(),
            };
            if u.is_best(metric) {
                format!("{value} *")
            } else {
                value
            }
        }));
        builder.push_record(record);
    }

    let mut bathrooms = vec!["bathrooms".to_string()];
    bathrooms.extend(result.units.iter().map(|u| u.metrics.bathrooms.to_string()));
    builder.push_record(bathrooms);

    let mut features = vec!["features".to_string()];
    features.extend(result.units.iter().map(|u| feature_list(&u.metrics)));
    builder.push_record(features);

    let mut scores = vec!["score".to_string()];
    scores.extend(result.units.iter().map(|u| {
        if u.best_overall {
            format!("{}/100 (best)", u.score)
        } else {
            format!("{}/100", u.score)
        }
    }));
    builder.push_record(scores);

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");
    println!("* best in group");

    if let Some(path) = csv_path {
        println!("Exported: {}", path.display());
    }

    Ok(())
}

fn feature_list(metrics: &UnitMetrics) -> String {
    let f = &metrics.features;
    let names: Vec<&str> = [
        (f.upper_floor, "upper floor"),
        (f.basement, "basement"),
        (f.gourmet, "gourmet"),
        (f.barbecue, "barbecue"),
        (f.pool, "pool"),
        (f.wine_cellar && f.climate_controlled_cellar, "climate-controlled cellar"),
        (f.wine_cellar && !f.climate_controlled_cellar, "wine cellar"),
        (f.office, "office"),
        (f.library, "library"),
        (f.garden, "garden"),
        (f.deck, "deck"),
    ]
    .into_iter()
    .filter_map(|(present, name)| present.then_some(name))
    .collect();

    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

/// Register a consortium share
fn cmd_share_add(
    cfg_dir: &Path,
    group: String,
    number: String,
    client: Option<String>,
    credit: Option<Decimal>,
) -> Result<()> {
    let mut store = open_store(cfg_dir)?;

    let holder = match client {
        Some(name) => Holder::Client { name },
        None => Holder::Company,
    };

    let share = store.create(Share {
        id: String::new(),
        group,
        number,
        holder,
        credit_value: credit,
        created_on: today(),
    })?;

    println!("Registered {}", share.id);
    println!("  Group:  {} / {}", share.group, share.number);
    println!("  Holder: {}", share.holder);

    Ok(())
}

/// List registered shares
fn cmd_shares(cfg_dir: &Path) -> Result<()> {
    let store = open_store(cfg_dir)?;
    let config = load_config(cfg_dir)?;
    let shares: Vec<Share> = store.list()?;

    if shares.is_empty() {
        println!("No shares registered.");
        return Ok(());
    }

    let rows: Vec<ShareRow> = shares
        .into_iter()
        .map(|share| ShareRow {
            credit: share
                .credit_value
                .map(|v| format_money(v, &config.currency.symbol))
                .unwrap_or_else(|| "-".to_string()),
            holder: share.holder.to_string(),
            id: share.id,
            group: share.group,
            number: share.number,
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Generate (and unless dry-run, save) a share's installments
fn cmd_schedule(
    cfg_dir: &Path,
    currency_symbol: &str,
    share_id: &str,
    config: ScheduleConfig,
    dry_run: bool,
) -> Result<()> {
    let mut store = open_store(cfg_dir)?;

    let installments = if dry_run {
        let _: Share = store.get(share_id)?;
        generate(&config)?
            .into_iter()
            .map(|record| Installment::from_record(record, "-", share_id))
            .collect()
    } else {
        let (schedule, installments) =
            ledger::create_schedule(&mut store, share_id, config, today())?;
        println!("Saved {} for {}", schedule.id, share_id);
        installments
    };

    print_installments(&installments, currency_symbol, today());

    let records: Vec<_> = installments.iter().map(Installment::to_record).collect();
    let summary = ScheduleSummary::from_records(&records);
    println!();
    println!("  Installments: {}", summary.installments);
    println!("  Gross total:  {}", format_money(summary.gross_total, currency_symbol));
    println!("  Charges:      {}", format_money(summary.charges_total(), currency_symbol));
    if let (Some(first), Some(last)) = (summary.first_due, summary.last_due) {
        println!("  Due:          {first} to {last}");
    }
    if dry_run {
        println!("Dry run: nothing was saved.");
    }

    Ok(())
}

fn print_installments(installments: &[Installment], currency_symbol: &str, today: NaiveDate) {
    let rows: Vec<InstallmentRow> = installments
        .iter()
        .map(|i| InstallmentRow {
            id: i.id.clone(),
            share: i.share_id.clone(),
            sequence: i.sequence_number,
            due: i.due_date.to_string(),
            gross: format_money(i.gross_amount, currency_symbol),
            reserve: format_money(i.reserve_fund_amount, currency_symbol),
            common: format_money(i.common_fund_amount, currency_symbol),
            admin: format_money(i.admin_fee_amount, currency_symbol),
            status: i.effective_status(today).to_string(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
}

/// List saved installments
fn cmd_installments(
    cfg_dir: &Path,
    share: Option<String>,
    status: Option<StatusFilter>,
    limit: Option<usize>,
) -> Result<()> {
    let store = open_store(cfg_dir)?;
    let config = load_config(cfg_dir)?;
    let today = today();

    let by_due = |a: &Installment, b: &Installment| {
        a.due_date
            .cmp(&b.due_date)
            .then(a.share_id.cmp(&b.share_id))
            .then(a.sequence_number.cmp(&b.sequence_number))
    };
    let installments = store.filter::<Installment, _>(
        |i: &Installment| {
            share.as_ref().map_or(true, |s| &i.share_id == s)
                && status.map_or(true, |f| f.matches(i.effective_status(today)))
        },
        Some(&by_due),
        limit,
    )?;

    if installments.is_empty() {
        println!("No installments found.");
        return Ok(());
    }

    print_installments(&installments, &config.currency.symbol, today);

    let outstanding: Decimal = installments
        .iter()
        .filter(|i| i.status != InstallmentStatus::Paid)
        .map(|i| i.gross_amount)
        .sum();
    println!();
    println!(
        "Shown: {} installments, {} outstanding",
        installments.len(),
        format_money(outstanding, &config.currency.symbol)
    );

    Ok(())
}

/// Record payment of an installment
fn cmd_pay(cfg_dir: &Path, installment_id: &str, date: Option<NaiveDate>) -> Result<()> {
    let mut store = open_store(cfg_dir)?;
    let config = load_config(cfg_dir)?;

    let paid = ledger::mark_paid(&mut store, installment_id, date.unwrap_or_else(today))?;

    println!(
        "Recorded payment of {} for {} (installment {} of {})",
        format_money(paid.gross_amount, &config.currency.symbol),
        paid.id,
        paid.sequence_number,
        paid.share_id
    );

    Ok(())
}

/// Show configuration and outstanding installments
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    require_config_dir(cfg_dir)?;

    let config = load_config(cfg_dir)?;
    let units = load_units(cfg_dir)?;
    let store = open_store(cfg_dir)?;
    let shares: Vec<Share> = store.list()?;
    let installments: Vec<Installment> = store.list()?;
    let today = today();
    let symbol = &config.currency.symbol;

    let total_of = |status: InstallmentStatus| -> (usize, Decimal) {
        installments
            .iter()
            .filter(|i| i.effective_status(today) == status)
            .fold((0, Decimal::ZERO), |(n, sum), i| (n + 1, sum + i.gross_amount))
    };
    let (pending, pending_total) = total_of(InstallmentStatus::Pending);
    let (overdue, overdue_total) = total_of(InstallmentStatus::Overdue);

    println!("Condo Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Data directory:   {}", store.dir().display());
    println!("Company:          {}", config.company.name);
    println!("Units:            {}", units.len());
    println!("Shares:           {}", shares.len());
    println!(
        "Pending:          {} ({})",
        pending,
        format_money(pending_total, symbol)
    );
    println!(
        "Overdue:          {} ({})",
        overdue,
        format_money(overdue_total, symbol)
    );

    let next_due = installments
        .iter()
        .filter(|i| i.effective_status(today) == InstallmentStatus::Pending)
        .min_by_key(|i| i.due_date);
    if let Some(next) = next_due {
        println!(
            "Next due:         {} - {} - {}",
            next.due_date,
            next.id,
            format_money(next.gross_amount, symbol)
        );
    }

    Ok(())
}
