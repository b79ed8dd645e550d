mod csv;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;

use planboard_analytics::{analyze, AnalyticsFilterForm, AnalyticsReport};
use planboard_client::{
    report_details, CancelToken, ClientError, HttpSource, RecordSource, ReportDetails,
};
use planboard_model::datetime::{format_date, format_datetime, parse_date};
use planboard_model::{Plan, QuarterlyReport, User};
use planboard_view::{
    filter_records, sort_records, FilterSpec, PlanCategory, PlanFilterForm, ReportFilterForm,
    SortDirection, UserFilterForm,
};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Stat-card category to highlight in the analytics datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HighlightCategory {
    Active,
    Completed,
    Overdue,
}

impl From<HighlightCategory> for PlanCategory {
    fn from(category: HighlightCategory) -> Self {
        match category {
            HighlightCategory::Active => PlanCategory::Active,
            HighlightCategory::Completed => PlanCategory::Completed,
            HighlightCategory::Overdue => PlanCategory::Overdue,
        }
    }
}

/// Collection to pull from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FetchKind {
    Plans,
    Reports,
    Users,
}

/// Planboard work plan and reporting toolkit.
#[derive(Parser)]
#[command(name = "planboard", version, about = "Planboard work plan and reporting toolkit")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List, filter and sort plans from a JSON export
    Plans {
        /// Path to the plans JSON file
        #[arg(long)]
        file: PathBuf,
        /// Substring to look for in name or description
        #[arg(long)]
        search: Option<String>,
        /// Keep plans starting on or after this day (YYYY-MM-DD)
        #[arg(long)]
        starts_from: Option<String>,
        /// Keep plans ending on or before this day (YYYY-MM-DD)
        #[arg(long)]
        ends_until: Option<String>,
        /// Saved filter file (must target plans); combines with the flags
        #[arg(long)]
        filter: Option<PathBuf>,
        /// Wire field name to sort by (e.g. name, endDate)
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending instead of ascending
        #[arg(long)]
        desc: bool,
    },

    /// List, filter and sort quarterly reports from a JSON export
    Reports {
        /// Path to the reports JSON file
        #[arg(long)]
        file: PathBuf,
        /// Keep reports for this plan id
        #[arg(long)]
        plan_id: Option<String>,
        /// Keep reports submitted by this user id
        #[arg(long)]
        reporting_user: Option<String>,
        /// Keep reports for this year
        #[arg(long)]
        year: Option<String>,
        /// Keep reports for this quarter (1-4)
        #[arg(long)]
        quarter: Option<String>,
        /// yes/no: keep only assessed or only unassessed reports
        #[arg(long)]
        assessed: Option<String>,
        /// Keep reports created on or after this day (YYYY-MM-DD)
        #[arg(long)]
        created_from: Option<String>,
        /// Keep reports created on or before this day (YYYY-MM-DD)
        #[arg(long)]
        created_to: Option<String>,
        /// Saved filter file (must target reports); combines with the flags
        #[arg(long)]
        filter: Option<PathBuf>,
        /// Wire field name to sort by (e.g. createdAt, year)
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending instead of ascending
        #[arg(long)]
        desc: bool,
    },

    /// List, filter and sort users from a JSON export
    Users {
        /// Path to the users JSON file
        #[arg(long)]
        file: PathBuf,
        /// Substring to look for in email or full name
        #[arg(long)]
        search: Option<String>,
        /// Keep users with this role; legacy MANAGER/USER spellings work
        #[arg(long)]
        role: Option<String>,
        /// Saved filter file (must target users); combines with the flags
        #[arg(long)]
        filter: Option<PathBuf>,
        /// Wire field name to sort by (e.g. email, userRole)
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending instead of ascending
        #[arg(long)]
        desc: bool,
    },

    /// Compute the analytics datasets over plan and report exports
    Analytics {
        /// Path to the plans JSON file
        #[arg(long)]
        plans: PathBuf,
        /// Path to the reports JSON file
        #[arg(long)]
        reports: PathBuf,
        /// Path to the users JSON file
        #[arg(long)]
        users: PathBuf,
        /// Keep reports for this year
        #[arg(long)]
        year: Option<String>,
        /// Keep reports for this quarter (1-4)
        #[arg(long)]
        quarter: Option<String>,
        /// Restrict both collections to this plan id
        #[arg(long)]
        plan_id: Option<String>,
        /// Restrict both collections to this executor user id
        #[arg(long)]
        executor: Option<String>,
        /// Window start (YYYY-MM-DD)
        #[arg(long)]
        date_from: Option<String>,
        /// Window end (YYYY-MM-DD)
        #[arg(long)]
        date_to: Option<String>,
        /// Restrict the chart datasets to one stat-card category
        #[arg(long, value_enum)]
        highlight: Option<HighlightCategory>,
        /// Reference day for plan classification (default: today, UTC)
        #[arg(long)]
        today: Option<String>,
    },

    /// Export a collection as spreadsheet-friendly CSV
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },

    /// Validate a reports CSV and optionally send it to the backend
    Import {
        /// Path to the reports CSV file
        #[arg(long)]
        file: PathBuf,
        /// Path to the plans JSON file, for plan id validation
        #[arg(long)]
        plans: PathBuf,
        /// Reporting user id for rows without a reportingUserId column
        #[arg(long)]
        reporting_user: Option<i64>,
        /// Actually send the parsed rows (default is a dry run)
        #[arg(long)]
        apply: bool,
        /// Backend API root, e.g. http://localhost:8080/api
        #[arg(long)]
        url: Option<String>,
        /// Bearer token for the backend
        #[arg(long)]
        token: Option<String>,
    },

    /// Pull a collection from the backend
    Fetch {
        /// Which collection to fetch
        #[arg(value_enum)]
        what: FetchKind,
        /// Backend API root, e.g. http://localhost:8080/api
        #[arg(long)]
        url: String,
        /// Bearer token for the backend
        #[arg(long)]
        token: Option<String>,
    },

    /// Fetch one report with its plan, reporter and assessor resolved
    Show {
        /// Report id
        report_id: i64,
        /// Backend API root, e.g. http://localhost:8080/api
        #[arg(long)]
        url: String,
        /// Bearer token for the backend
        #[arg(long)]
        token: Option<String>,
    },
}

#[derive(Subcommand)]
enum ExportCommands {
    /// Plans with executor and creator names resolved
    Plans {
        /// Path to the plans JSON file
        #[arg(long)]
        plans: PathBuf,
        /// Path to the users JSON file, for name lookups
        #[arg(long)]
        users: Option<PathBuf>,
        /// Write the CSV here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Reports with plan and user names resolved
    Reports {
        /// Path to the reports JSON file
        #[arg(long)]
        reports: PathBuf,
        /// Path to the plans JSON file, for name lookups
        #[arg(long)]
        plans: Option<PathBuf>,
        /// Path to the users JSON file, for name lookups
        #[arg(long)]
        users: Option<PathBuf>,
        /// Write the CSV here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Plans {
            file,
            search,
            starts_from,
            ends_until,
            filter,
            sort,
            desc,
        } => {
            let form = PlanFilterForm {
                search_term: search.unwrap_or_default(),
                start_date: starts_from.unwrap_or_default(),
                end_date: ends_until.unwrap_or_default(),
            };
            cmd_plans(
                &file,
                filter.as_deref(),
                &form,
                sort.as_deref(),
                desc,
                cli.output,
                cli.quiet,
            );
        }
        Commands::Reports {
            file,
            plan_id,
            reporting_user,
            year,
            quarter,
            assessed,
            created_from,
            created_to,
            filter,
            sort,
            desc,
        } => {
            let form = ReportFilterForm {
                plan_id: plan_id.unwrap_or_default(),
                reporting_user_id: reporting_user.unwrap_or_default(),
                year: year.unwrap_or_default(),
                quarter: quarter.unwrap_or_default(),
                assessed: assessed.unwrap_or_default(),
                created_from: created_from.unwrap_or_default(),
                created_to: created_to.unwrap_or_default(),
            };
            cmd_reports(
                &file,
                filter.as_deref(),
                &form,
                sort.as_deref(),
                desc,
                cli.output,
                cli.quiet,
            );
        }
        Commands::Users {
            file,
            search,
            role,
            filter,
            sort,
            desc,
        } => {
            let form = UserFilterForm {
                search_term: search.unwrap_or_default(),
                role: role.unwrap_or_default(),
            };
            cmd_users(
                &file,
                filter.as_deref(),
                &form,
                sort.as_deref(),
                desc,
                cli.output,
                cli.quiet,
            );
        }
        Commands::Analytics {
            plans,
            reports,
            users,
            year,
            quarter,
            plan_id,
            executor,
            date_from,
            date_to,
            highlight,
            today,
        } => {
            let form = AnalyticsFilterForm {
                year: year.unwrap_or_default(),
                quarter: quarter.unwrap_or_default(),
                plan_id: plan_id.unwrap_or_default(),
                executor_id: executor.unwrap_or_default(),
                date_from: date_from.unwrap_or_default(),
                date_to: date_to.unwrap_or_default(),
            };
            cmd_analytics(
                &plans,
                &reports,
                &users,
                &form,
                highlight.map(PlanCategory::from),
                today.as_deref(),
                cli.output,
                cli.quiet,
            );
        }
        Commands::Export { command } => {
            cmd_export(command, cli.output, cli.quiet);
        }
        Commands::Import {
            file,
            plans,
            reporting_user,
            apply,
            url,
            token,
        } => {
            cmd_import(
                &file,
                &plans,
                reporting_user,
                apply,
                url.as_deref(),
                token.as_deref(),
                cli.output,
                cli.quiet,
            );
        }
        Commands::Fetch { what, url, token } => {
            cmd_fetch(what, &url, token.as_deref(), cli.output, cli.quiet);
        }
        Commands::Show {
            report_id,
            url,
            token,
        } => {
            cmd_show(report_id, &url, token.as_deref(), cli.output, cli.quiet);
        }
    }
}

// ──────────────────────────────────────────────
// Local listing commands
// ──────────────────────────────────────────────

fn cmd_plans(
    file: &Path,
    filter_file: Option<&Path>,
    form: &PlanFilterForm,
    sort: Option<&str>,
    desc: bool,
    output: OutputFormat,
    quiet: bool,
) {
    let mut shown: Vec<Plan> = load_json(file, output, quiet);
    if let Some(path) = filter_file {
        let spec: FilterSpec = load_json(path, output, quiet);
        let Some(saved) = spec.as_plans() else {
            filter_entity_mismatch(&spec, "plans", output, quiet);
        };
        shown = filter_records(&shown, saved);
    }
    shown = filter_records(&shown, &form.to_filter());
    let shown = sort_records(&shown, sort, direction(desc));
    if !quiet {
        match output {
            OutputFormat::Json => print_json(&shown),
            OutputFormat::Text => print_plans(&shown),
        }
    }
}

fn cmd_reports(
    file: &Path,
    filter_file: Option<&Path>,
    form: &ReportFilterForm,
    sort: Option<&str>,
    desc: bool,
    output: OutputFormat,
    quiet: bool,
) {
    let mut shown: Vec<QuarterlyReport> = load_json(file, output, quiet);
    if let Some(path) = filter_file {
        let spec: FilterSpec = load_json(path, output, quiet);
        let Some(saved) = spec.as_reports() else {
            filter_entity_mismatch(&spec, "reports", output, quiet);
        };
        shown = filter_records(&shown, saved);
    }
    shown = filter_records(&shown, &form.to_filter());
    let shown = sort_records(&shown, sort, direction(desc));
    if !quiet {
        match output {
            OutputFormat::Json => print_json(&shown),
            OutputFormat::Text => print_reports(&shown),
        }
    }
}

fn cmd_users(
    file: &Path,
    filter_file: Option<&Path>,
    form: &UserFilterForm,
    sort: Option<&str>,
    desc: bool,
    output: OutputFormat,
    quiet: bool,
) {
    let mut shown: Vec<User> = load_json(file, output, quiet);
    if let Some(path) = filter_file {
        let spec: FilterSpec = load_json(path, output, quiet);
        let Some(saved) = spec.as_users() else {
            filter_entity_mismatch(&spec, "users", output, quiet);
        };
        shown = filter_records(&shown, saved);
    }
    shown = filter_records(&shown, &form.to_filter());
    let shown = sort_records(&shown, sort, direction(desc));
    if !quiet {
        match output {
            OutputFormat::Json => print_json(&shown),
            OutputFormat::Text => print_users(&shown),
        }
    }
}

fn direction(desc: bool) -> SortDirection {
    if desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    }
}

fn filter_entity_mismatch(
    spec: &FilterSpec,
    expected: &str,
    output: OutputFormat,
    quiet: bool,
) -> ! {
    report_error(
        &format!(
            "filter file targets {}, this command filters {}",
            spec.entity(),
            expected
        ),
        output,
        quiet,
    );
    process::exit(1);
}

// ──────────────────────────────────────────────
// Analytics
// ──────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn cmd_analytics(
    plans_path: &Path,
    reports_path: &Path,
    users_path: &Path,
    form: &AnalyticsFilterForm,
    highlight: Option<PlanCategory>,
    today: Option<&str>,
    output: OutputFormat,
    quiet: bool,
) {
    let plans: Vec<Plan> = load_json(plans_path, output, quiet);
    let reports: Vec<QuarterlyReport> = load_json(reports_path, output, quiet);
    let users: Vec<User> = load_json(users_path, output, quiet);

    let today = match today {
        Some(raw) => match parse_date(raw.trim()) {
            Some(day) => day,
            None => {
                report_error(
                    &format!("invalid --today '{}': expected YYYY-MM-DD", raw),
                    output,
                    quiet,
                );
                process::exit(1);
            }
        },
        None => time::OffsetDateTime::now_utc().date(),
    };

    let report = analyze(&plans, &reports, &users, &form.to_filter(), highlight, today);
    if !quiet {
        match output {
            OutputFormat::Json => print_json(&report),
            OutputFormat::Text => print_analytics(&report),
        }
    }
}

// ──────────────────────────────────────────────
// CSV exchange
// ──────────────────────────────────────────────

fn cmd_export(command: ExportCommands, output: OutputFormat, quiet: bool) {
    match command {
        ExportCommands::Plans { plans, users, out } => {
            let plans: Vec<Plan> = load_json(&plans, output, quiet);
            let users: Vec<User> = users
                .map(|path| load_json(&path, output, quiet))
                .unwrap_or_default();
            deliver_csv(
                &csv::plans_to_csv(&plans, &users),
                out.as_deref(),
                output,
                quiet,
            );
        }
        ExportCommands::Reports {
            reports,
            plans,
            users,
            out,
        } => {
            let reports: Vec<QuarterlyReport> = load_json(&reports, output, quiet);
            let plans: Vec<Plan> = plans
                .map(|path| load_json(&path, output, quiet))
                .unwrap_or_default();
            let users: Vec<User> = users
                .map(|path| load_json(&path, output, quiet))
                .unwrap_or_default();
            deliver_csv(
                &csv::reports_to_csv(&reports, &plans, &users),
                out.as_deref(),
                output,
                quiet,
            );
        }
    }
}

fn deliver_csv(content: &str, out: Option<&Path>, output: OutputFormat, quiet: bool) {
    match out {
        Some(path) => {
            if let Err(e) = std::fs::write(path, content) {
                report_error(
                    &format!("error writing '{}': {}", path.display(), e),
                    output,
                    quiet,
                );
                process::exit(1);
            }
            if !quiet {
                println!("wrote {}", path.display());
            }
        }
        None => print!("{content}"),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_import(
    file: &Path,
    plans_path: &Path,
    reporting_user: Option<i64>,
    apply: bool,
    url: Option<&str>,
    token: Option<&str>,
    output: OutputFormat,
    quiet: bool,
) {
    let apply_url = match (apply, url) {
        (true, Some(url)) => Some(url),
        (true, None) => {
            eprintln!("error: --apply requires --url");
            process::exit(1);
        }
        (false, _) => None,
    };

    let text = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            report_error(
                &format!("error reading '{}': {}", file.display(), e),
                output,
                quiet,
            );
            process::exit(1);
        }
    };
    let plans: Vec<Plan> = load_json(plans_path, output, quiet);
    let known: BTreeSet<i64> = plans.iter().map(|p| p.id).collect();
    let outcome = csv::parse_reports_csv(&text, &known, reporting_user);

    if !outcome.errors.is_empty() {
        if !quiet {
            match output {
                OutputFormat::Json => {
                    let json = serde_json::json!({
                        "rows": outcome.rows.len(),
                        "errors": outcome.errors,
                        "applied": 0,
                    });
                    eprintln!(
                        "{}",
                        serde_json::to_string_pretty(&json).unwrap_or_default()
                    );
                }
                OutputFormat::Text => {
                    for err in &outcome.errors {
                        eprintln!("{err}");
                    }
                    eprintln!(
                        "{} row(s) parsed, {} error(s); nothing sent",
                        outcome.rows.len(),
                        outcome.errors.len()
                    );
                }
            }
        }
        process::exit(1);
    }

    let Some(url) = apply_url else {
        if !quiet {
            match output {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "rows": outcome.rows.len(),
                    "errors": [],
                    "applied": 0,
                    "dryRun": true,
                })),
                OutputFormat::Text => println!(
                    "{} row(s) parsed; dry run, nothing sent",
                    outcome.rows.len()
                ),
            }
        }
        return;
    };

    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
    let mut source = HttpSource::new(url);
    if let Some(token) = token {
        source = source.with_bearer(token);
    }
    let cancel = CancelToken::new();
    let sent = rt.block_on(async {
        for parsed in &outcome.rows {
            if let Err(e) = source.create_report(&parsed.report, &cancel).await {
                return Err(format!("row {}: backend rejected: {}", parsed.row, e));
            }
        }
        Ok(outcome.rows.len())
    });
    match sent {
        Ok(count) => {
            if !quiet {
                match output {
                    OutputFormat::Json => print_json(&serde_json::json!({
                        "rows": count,
                        "errors": [],
                        "applied": count,
                    })),
                    OutputFormat::Text => println!("sent {} report(s) to {}", count, url),
                }
            }
        }
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

// ──────────────────────────────────────────────
// Backend commands
// ──────────────────────────────────────────────

fn backend_source(url: &str, token: Option<&str>) -> HttpSource {
    let source = HttpSource::new(url);
    match token {
        Some(token) => source.with_bearer(token),
        None => source,
    }
}

fn cmd_fetch(what: FetchKind, url: &str, token: Option<&str>, output: OutputFormat, quiet: bool) {
    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
    let source = backend_source(url, token);
    let cancel = CancelToken::new();
    match what {
        FetchKind::Plans => match rt.block_on(source.list_plans(&cancel)) {
            Ok(records) => {
                if !quiet {
                    match output {
                        OutputFormat::Json => print_json(&records),
                        OutputFormat::Text => print_plans(&records),
                    }
                }
            }
            Err(e) => fetch_failed(&e, output, quiet),
        },
        FetchKind::Reports => match rt.block_on(source.list_reports(&cancel)) {
            Ok(records) => {
                if !quiet {
                    match output {
                        OutputFormat::Json => print_json(&records),
                        OutputFormat::Text => print_reports(&records),
                    }
                }
            }
            Err(e) => fetch_failed(&e, output, quiet),
        },
        FetchKind::Users => match rt.block_on(source.list_users(&cancel)) {
            Ok(records) => {
                if !quiet {
                    match output {
                        OutputFormat::Json => print_json(&records),
                        OutputFormat::Text => print_users(&records),
                    }
                }
            }
            Err(e) => fetch_failed(&e, output, quiet),
        },
    }
}

fn fetch_failed(err: &ClientError, output: OutputFormat, quiet: bool) -> ! {
    report_error(&format!("fetch error: {}", err), output, quiet);
    process::exit(1);
}

fn cmd_show(report_id: i64, url: &str, token: Option<&str>, output: OutputFormat, quiet: bool) {
    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
    let source = backend_source(url, token);
    let cancel = CancelToken::new();
    match rt.block_on(report_details(&source, report_id, &cancel)) {
        Ok(details) => {
            if !quiet {
                match output {
                    OutputFormat::Json => print_json(&details),
                    OutputFormat::Text => print_details(&details),
                }
            }
        }
        Err(e) if e.is_not_found() => {
            report_error(&format!("report {} not found", report_id), output, quiet);
            process::exit(1);
        }
        Err(e) => fetch_failed(&e, output, quiet),
    }
}

// ──────────────────────────────────────────────
// Output helpers
// ──────────────────────────────────────────────

fn load_json<T: DeserializeOwned>(path: &Path, output: OutputFormat, quiet: bool) -> T {
    let raw = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            report_error(
                &format!("error reading '{}': {}", path.display(), e),
                output,
                quiet,
            );
            process::exit(1);
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            report_error(
                &format!("error parsing JSON in '{}': {}", path.display(), e),
                output,
                quiet,
            );
            process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value)
            .unwrap_or_else(|e| format!("serialization error: {}", e))
    );
}

fn print_plans(plans: &[Plan]) {
    println!("{} plan(s):", plans.len());
    for plan in plans {
        let range = match (plan.start_date, plan.end_date) {
            (Some(s), Some(e)) => format!("{} .. {}", format_date(s), format_date(e)),
            (Some(s), None) => format!("{} .. open", format_date(s)),
            (None, Some(e)) => format!("open .. {}", format_date(e)),
            (None, None) => "undated".to_string(),
        };
        match plan.target_value {
            Some(target) => {
                println!("  [{}] {}  {}  target {}", plan.id, plan.name, range, target)
            }
            None => println!("  [{}] {}  {}", plan.id, plan.name, range),
        }
    }
}

fn print_reports(reports: &[QuarterlyReport]) {
    println!("{} report(s):", reports.len());
    for report in reports {
        let actual = report
            .actual_value
            .map(|v| format!("  actual {v}"))
            .unwrap_or_default();
        let score = match report.analyst_assessment_score {
            Some(s) => format!("  score {s}"),
            None => "  unassessed".to_string(),
        };
        println!(
            "  [{}] plan {}  {} Q{}{}{}",
            report.id, report.plan_id, report.year, report.quarter, actual, score
        );
    }
}

fn print_users(users: &[User]) {
    println!("{} user(s):", users.len());
    for user in users {
        let name = user.full_name.as_deref().unwrap_or("-");
        println!("  [{}] {}  {}  {}", user.id, name, user.email, user.user_role);
    }
}

fn print_analytics(report: &AnalyticsReport) {
    println!("Analytics for {}", report.reference_date);
    let stats = &report.plan_stats;
    println!(
        "Plans: {} total, {} active, {} completed, {} overdue",
        stats.total, stats.active.count, stats.completed.count, stats.overdue.count
    );
    if let Some(category) = report.highlighted {
        println!("Highlighted: {}", category_name(category));
    }
    let status = &report.status;
    println!(
        "Status: {} in progress, {} success, {} satisfactory, {} problematic",
        status.in_progress, status.success, status.satisfactory, status.problematic
    );
    let counts = report.scores.counts;
    println!(
        "Scores: 1:{} 2:{} 3:{} 4:{} 5:{}",
        counts[0], counts[1], counts[2], counts[3], counts[4]
    );
    if report.executor_activity.is_empty() {
        println!("Executor activity: none");
    } else {
        println!("Executor activity:");
        for row in &report.executor_activity {
            let avg = row
                .avg_score
                .map(|a| format!(", avg score {a}"))
                .unwrap_or_default();
            println!(
                "  [{}] {}: {} submitted, {} assessed{}",
                row.user_id, row.label, row.submitted, row.assessed, avg
            );
        }
    }
}

fn category_name(category: PlanCategory) -> &'static str {
    match category {
        PlanCategory::Active => "active",
        PlanCategory::Completed => "completed",
        PlanCategory::Overdue => "overdue",
    }
}

fn print_details(details: &ReportDetails) {
    let report = &details.report;
    println!(
        "Report {}: {} Q{} (plan {})",
        report.id, report.year, report.quarter, report.plan_id
    );
    if let Some(plan) = &details.plan {
        println!("  Plan: {}", plan.name);
    }
    if let Some(user) = &details.reporting_user {
        println!("  Reported by: {}", user.label());
    }
    if let Some(actual) = report.actual_value {
        println!("  Actual: {}", actual);
    }
    match report.analyst_assessment_score {
        Some(score) => match &details.assessed_by {
            Some(assessor) => println!("  Score: {} (assessed by {})", score, assessor.label()),
            None => println!("  Score: {}", score),
        },
        None => println!("  Not assessed yet"),
    }
    if let Some(created) = report.created_at {
        println!("  Created: {}", format_datetime(created));
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{{\"error\": \"{}\"}}", msg.replace('"', "\\\""));
        }
    }
}
