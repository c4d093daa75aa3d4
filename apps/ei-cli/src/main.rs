use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use ei_app::{
    AppError, AppResult, AuthService, EnergyService, ReportDetails, ReportTab, ReportsService,
    SavingsService, TimeRange, consumption_series, energy_loader, export_file_name,
    export_report, filter_reports, render_markdown,
};
use ei_client::{ApiClient, ClientConfig, EiaClient, SessionStore};
use ei_core::{LoginRequest, RegisterRequest, SAVINGS_YEARS, US_STATES};
use ei_state::{ColumnSet, MergeOutcome, PageResponse, PageSource, Pager, RowState, drive_range};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ei-cli")]
#[command(about = "EnergyInsight CLI - energy consumption analytics", long_about = None)]
struct Cli {
    /// Client configuration YAML (optional; environment overrides apply)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List energy records
    Energy {
        /// Only records for this location (e.g. Texas)
        #[arg(long)]
        location: Option<String>,
        /// First row to show (0-based)
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Number of rows to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// Hide a column by header label (repeatable)
        #[arg(long)]
        hide: Vec<String>,
    },
    /// Consumption trend over loaded records
    Trend {
        /// 7d, 30d, 90d or 1y
        #[arg(long, default_value = "30d")]
        range: String,
        #[arg(long)]
        location: Option<String>,
        /// Records to load before bucketing
        #[arg(long, default_value_t = 100)]
        records: usize,
    },
    /// Show one page of the reports table
    Reports {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Recent reports filtered by status tab
    Recent {
        /// approved, draft or pending
        #[arg(long, default_value = "approved")]
        tab: String,
    },
    /// Show a report in full
    Report {
        id: String,
    },
    /// Export a report as Markdown
    ExportReport {
        id: String,
        /// Output file (defaults to a name derived from the title)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Energy-efficiency savings metrics from the EIA
    Savings {
        /// Two-letter state code
        #[arg(long, default_value = "NY")]
        state: String,
        #[arg(long, default_value_t = 2023)]
        year: i32,
        /// Print metrics as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::load(cli.config.as_deref())?;
    let session = SessionStore::open(&config.session_file())?;
    let api = ApiClient::new(&config, session)?;

    match cli.command {
        Commands::Login { email, password } => cmd_login(api, email, password),
        Commands::Register {
            name,
            email,
            password,
        } => cmd_register(api, name, email, password),
        Commands::Logout => cmd_logout(api),
        Commands::Whoami => cmd_whoami(api),
        Commands::Energy {
            location,
            offset,
            limit,
            hide,
        } => cmd_energy(api, location, offset, limit, &hide),
        Commands::Trend {
            range,
            location,
            records,
        } => cmd_trend(api, &range, location, records),
        Commands::Reports { page } => cmd_reports(api, page),
        Commands::Recent { tab } => cmd_recent(api, &tab),
        Commands::Report { id } => cmd_report(api, &id),
        Commands::ExportReport { id, output } => cmd_export_report(api, &id, output.as_deref()),
        Commands::Savings { state, year, json } => cmd_savings(&config, &state, year, json),
    }
}

fn print_validation(err: AppError) -> AppResult<()> {
    match err {
        AppError::Validation(errors) => {
            for (field, message) in errors.iter() {
                eprintln!("  {:?}: {}", field, message);
            }
            Err(AppError::Validation(errors))
        }
        other => Err(other),
    }
}

fn cmd_login(api: ApiClient, email: String, password: String) -> AppResult<()> {
    let auth = AuthService::new(api);
    match auth.login(&LoginRequest { email, password }) {
        Ok(user) => {
            println!("✓ Signed in as {} ({})", user.name, user.email);
            Ok(())
        }
        Err(e) => print_validation(e),
    }
}

fn cmd_register(api: ApiClient, name: String, email: String, password: String) -> AppResult<()> {
    let auth = AuthService::new(api);
    match auth.register(&RegisterRequest {
        name,
        email,
        password,
    }) {
        Ok(user) => {
            println!("✓ Registered and signed in as {}", user.name);
            Ok(())
        }
        Err(e) => print_validation(e),
    }
}

fn cmd_logout(api: ApiClient) -> AppResult<()> {
    AuthService::new(api).logout()?;
    println!("✓ Signed out");
    Ok(())
}

fn cmd_whoami(api: ApiClient) -> AppResult<()> {
    let user = AuthService::new(api).require_user()?;
    println!("{} <{}>", user.name, user.email);
    println!("  Role: {:?}", user.role);
    Ok(())
}

/// Reset `loader` to `location` and load page 1, so the total is known.
fn load_first_page(
    loader: &mut ei_state::WindowedLoader<ei_core::EnergyRecord>,
    source: &EnergyService,
    location: Option<String>,
) -> AppResult<()> {
    if let Some(request) = loader.set_location(location) {
        let result = source.fetch_page(&request).map_err(|e| e.to_string());
        loader.complete(PageResponse { request, result });
    }
    match loader.error() {
        Some(message) => Err(AppError::Backend {
            message: message.to_string(),
        }),
        None => Ok(()),
    }
}

fn cmd_energy(
    api: ApiClient,
    location: Option<String>,
    offset: usize,
    limit: usize,
    hide: &[String],
) -> AppResult<()> {
    let mut columns = ColumnSet::default();
    for label in hide {
        match columns.kind_for_label(label) {
            Some(kind) => columns.toggle(kind),
            None => eprintln!("Unknown column: {}", label),
        }
    }

    let source = EnergyService::new(api);
    let mut loader = energy_loader();
    load_first_page(&mut loader, &source, location)?;

    let end = (offset + limit).min(loader.visible_count());
    for outcome in drive_range(&mut loader, &source, offset..end) {
        if let MergeOutcome::Failed { page } = outcome {
            eprintln!("Page {} failed: {}", page, loader.error().unwrap_or("unknown error"));
        }
    }

    if loader.visible_count() == 0 {
        println!("No energy records found");
        return Ok(());
    }

    let header: Vec<&str> = columns.visible().map(|c| c.label).collect();
    println!("{}", header.join(" | "));
    for index in offset..end {
        match loader.row(index) {
            RowState::Loaded(record) => {
                let cells: Vec<String> = columns.visible().map(|c| c.kind.value(record)).collect();
                println!("{}", cells.join(" | "));
            }
            RowState::Loading => println!("(not loaded)"),
            RowState::Beyond => break,
        }
    }

    let total = loader.total().unwrap_or(0);
    match loader.progress_percent() {
        Some(pct) => println!(
            "\nLoaded {} of {} records ({}%)",
            loader.loaded_count(),
            total,
            pct
        ),
        None => println!("\nLoaded {} records", loader.loaded_count()),
    }
    Ok(())
}

fn cmd_trend(api: ApiClient, range: &str, location: Option<String>, records: usize) -> AppResult<()> {
    let range = TimeRange::parse(range).ok_or_else(|| AppError::Data(format!("unknown range: {}", range)))?;
    let source = EnergyService::new(api);
    let mut loader = energy_loader();
    load_first_page(&mut loader, &source, location)?;
    let end = records.min(loader.visible_count());
    drive_range(&mut loader, &source, 0..end);

    let today = chrono::Local::now().date_naive();
    let series = consumption_series(
        loader.window().iter_loaded().map(|(_, r)| r),
        range,
        today,
    );
    println!("Energy consumption trend ({})", range.label());
    for ((label, kwh), cost) in series
        .labels
        .iter()
        .zip(&series.consumption)
        .zip(&series.cost)
    {
        println!(
            "  {:>7}  {:>16}  {:>12}",
            label,
            ei_core::format::format_energy(*kwh),
            ei_core::format::format_cost(*cost)
        );
    }
    Ok(())
}

fn cmd_reports(api: ApiClient, page: u32) -> AppResult<()> {
    let mut service = ReportsService::new(api);
    let reports = service.page(page)?;

    if reports.reports.is_empty() {
        println!("No reports found");
        return Ok(());
    }
    for report in &reports.reports {
        println!(
            "  {}  {:<40} {:<10} {:<14} {}",
            report.id,
            report.title,
            report.status,
            ei_core::format::format_date(&report.date),
            report.location
        );
    }
    let pager = Pager {
        current: reports.pagination.page,
        total_pages: reports.pagination.pages,
        total_items: reports.pagination.total,
    };
    println!("\n{}", pager.summary("reports"));
    Ok(())
}

fn cmd_recent(api: ApiClient, tab: &str) -> AppResult<()> {
    let tab = ReportTab::ALL
        .into_iter()
        .find(|t| format!("{:?}", t).eq_ignore_ascii_case(tab))
        .ok_or_else(|| AppError::Data(format!("unknown tab: {}", tab)))?;

    let mut service = ReportsService::new(api);
    let first = service.page(ei_core::FIRST_PAGE)?;
    let reports = filter_reports(&first.reports, tab);
    if reports.is_empty() {
        println!("{}", tab.empty_message());
    }
    for report in reports {
        println!(
            "  {}  {}  ({})",
            report.id,
            report.title,
            ei_core::format::format_date(&report.date)
        );
    }
    Ok(())
}

fn cmd_report(api: ApiClient, id: &str) -> AppResult<()> {
    let report = ReportDetails::new().open_with(&api, id)?;
    println!("{}", render_markdown(&report));
    Ok(())
}

fn cmd_export_report(api: ApiClient, id: &str, output: Option<&Path>) -> AppResult<()> {
    let report = ReportDetails::new().open_with(&api, id)?;
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(export_file_name(&report)),
    };
    export_report(&report, &path)?;
    println!("✓ Exported '{}' to {}", report.title, path.display());
    Ok(())
}

fn cmd_savings(config: &ClientConfig, state: &str, year: i32, json: bool) -> AppResult<()> {
    let state = state.to_ascii_uppercase();
    if !US_STATES.iter().any(|(code, _)| *code == state) {
        eprintln!("Note: {} is not one of the dashboard states", state);
    }
    if !SAVINGS_YEARS.contains(&year) {
        eprintln!("Note: {} is outside the dashboard's year range", year);
    }

    let mut service = SavingsService::new(EiaClient::new(config)?);
    let metrics = service.metrics(&state, year)?;

    if json {
        let text = serde_json::to_string_pretty(&metrics)
            .map_err(|e| AppError::Data(e.to_string()))?;
        println!("{}", text);
        return Ok(());
    }
    if metrics.is_empty() {
        println!("No savings data for {} in {} and {}", state, year - 1, year);
    }
    for metric in metrics {
        let arrow = if metric.change.is_positive { "▲" } else { "▼" };
        println!("{}", metric.name);
        println!("  {}  {} {}", metric.value, arrow, metric.change.value);
    }
    Ok(())
}
