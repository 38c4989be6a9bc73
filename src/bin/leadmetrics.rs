use std::path::PathBuf;

use clap::{Parser, Subcommand};

use leadmetrics::{Config, DashboardSummary, ExportFormat, ExportRequest, ReportType, TaskRecord};

#[derive(Parser)]
#[command(name = "leadmetrics", about = "Sales dashboard metrics CLI")]
struct Cli {
    /// Config path (default: ~/.leadmetrics/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dashboard summary from a fetched payload
    Summary {
        /// Dashboard payload JSON file
        #[arg(long)]
        payload: PathBuf,
        /// Follow-up list JSON file
        #[arg(long)]
        tasks: Option<PathBuf>,
        /// Evaluation instant (RFC 3339, default: now)
        #[arg(long)]
        now: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Split follow-ups into overdue, upcoming and completed
    Reminders {
        /// Follow-up list JSON file
        #[arg(long)]
        tasks: PathBuf,
        /// Evaluation instant (RFC 3339, default: now)
        #[arg(long)]
        now: Option<String>,
        /// Upcoming follow-ups to list (default: config upcoming_limit)
        #[arg(long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve a date range token to its label and bounds
    Range {
        /// Token (e.g. today, last_7_days, this_month, lifetime)
        token: Option<String>,
        /// Reference date (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Prepare a report export request
    Export {
        /// leads or performance
        #[arg(long)]
        report: String,
        /// pdf, excel or csv
        #[arg(long, default_value = "pdf")]
        format: String,
        /// Date range token (default: config default_range)
        #[arg(long)]
        range: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a config value
    Get { key: String },
    /// Set a config value
    Set { key: String, value: String },
    /// List all config values
    List,
    /// Print the config file location
    Path,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let load_config = || Config::load(&config_path);

    match cli.command {
        Commands::Summary {
            payload,
            tasks,
            now,
            json,
        } => {
            let payload =
                leadmetrics::payload::parse_dashboard(&std::fs::read_to_string(&payload)?)?;
            let follow_ups = match tasks {
                Some(path) => load_tasks(&path)?,
                None => Vec::new(),
            };
            let now = parse_now(now.as_deref())?;
            let config = load_config()?;
            let summary = leadmetrics::SummaryBuilder::from_config(&config)
                .build(&payload, &follow_ups, now)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }
        Commands::Reminders {
            tasks,
            now,
            limit,
            json,
        } => {
            let follow_ups = load_tasks(&tasks)?;
            let now = parse_now(now.as_deref())?;
            let partition = leadmetrics::tasks::classify(&follow_ups, now);
            let limit = match limit {
                Some(n) => n,
                None => load_config()?.upcoming_limit,
            };
            if json {
                let out = serde_json::json!({
                    "evaluated_at": now,
                    "overdue": &partition.overdue,
                    "upcoming": partition.upcoming_preview(limit),
                    "upcoming_count": partition.upcoming.len(),
                    "completed_count": partition.completed.len(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("Follow-ups as of {}", now.to_rfc3339());
                println!("  Overdue ({}):", partition.overdue.len());
                for t in &partition.overdue {
                    print_task(t);
                }
                println!(
                    "  Upcoming ({} of {}):",
                    partition.upcoming_preview(limit).len(),
                    partition.upcoming.len()
                );
                for t in partition.upcoming_preview(limit) {
                    print_task(t);
                }
                println!("  Completed: {}", partition.completed.len());
            }
        }
        Commands::Range { token, today, json } => {
            let token = match token {
                Some(t) => t,
                None => load_config()?.default_range.to_string(),
            };
            let resolved = match today {
                Some(d) => {
                    let today = leadmetrics::date_util::parse_date(&d)?;
                    leadmetrics::range::resolve(&token, today)
                }
                None => leadmetrics::range::resolve_now(&token),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&resolved)?);
            } else {
                println!("{}", resolved.label);
                match resolved.bounds {
                    Some(b) => println!("  {} to {} ({} days)", b.start, b.end, b.days()),
                    None => println!("  (resolved by the server)"),
                }
            }
        }
        Commands::Export {
            report,
            format,
            range,
            json,
        } => {
            let report: ReportType = report.parse()?;
            let format: ExportFormat = format.parse()?;
            let token = match range {
                Some(t) => t,
                None => load_config()?.default_range.to_string(),
            };
            let today = chrono::Local::now().date_naive();
            let request = ExportRequest::new(report, format, &token, today);
            if json {
                println!("{}", serde_json::to_string_pretty(&request)?);
            } else {
                println!(
                    "Export: {} report as {} ({})",
                    request.report, request.format, request.range.label
                );
                println!("  File: {}", request.file_name());
                let query: Vec<String> = request
                    .query_params()
                    .into_iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect();
                println!("  Query: {}", query.join("&"));
            }
        }
        Commands::Config { action } => {
            handle_config(&config_path, action)?;
        }
    }

    Ok(())
}

/// Config actions load the file themselves so that `set` and `path` still
/// work when the file on disk is unreadable.
fn handle_config(path: &std::path::Path, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            println!("{key} = {}", Config::load(path)?.get(&key)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_or_default(path);
            config.set(&key, &value)?;
            config.save(path)?;
            println!("Config updated.");
        }
        ConfigAction::List => {
            for (k, v) in Config::load(path)?.list() {
                println!("{k} = {v}");
            }
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn load_tasks(path: &std::path::Path) -> anyhow::Result<Vec<TaskRecord>> {
    Ok(leadmetrics::payload::parse_tasks(&std::fs::read_to_string(path)?)?)
}

fn parse_now(now: Option<&str>) -> anyhow::Result<chrono::DateTime<chrono::Utc>> {
    match now {
        Some(s) => Ok(leadmetrics::date_util::parse_instant(s)?),
        None => Ok(chrono::Utc::now()),
    }
}

fn print_task(t: &TaskRecord) {
    let lead = t.lead_name.as_deref().or(t.lead_id.as_deref()).unwrap_or("-");
    println!("    {} {} ({})", t.scheduled_at.format("%Y-%m-%d %H:%M"), lead, t.id);
}

fn print_summary(s: &DashboardSummary) {
    println!("Dashboard Summary");
    println!("  Total leads:     {}", s.totals.total_leads);
    println!("  New leads:       {}", s.totals.new_leads);
    println!("  Converted:       {}", s.totals.converted_leads);
    println!("  Pending follow-ups: {}", s.totals.pending_follow_ups);

    println!("  Conversion Breakdown:");
    if s.conversion_breakdown.is_empty() {
        println!("    No data");
    }
    for slice in &s.conversion_breakdown {
        println!(
            "    {:<10} {:>6} ({}%)",
            slice.category.label(),
            slice.value,
            slice.percentage
        );
    }

    match &s.performance {
        Some(perf) => {
            println!("  Team Performance ({} members):", perf.team.member_count);
            println!("    Avg conversion:    {:.2}%", perf.team.avg_conversion_rate);
            println!("    Avg response time: {:.2}h", perf.team.avg_response_time);
            println!(
                "    Leads: {}  Conversions: {}  Follow-ups: {}",
                perf.team.total_leads, perf.team.total_conversions, perf.team.total_follow_ups
            );
            for row in &perf.performers {
                let r = &row.ranked;
                println!(
                    "    #{} {:<20} {:>6.2}% [{}] conversion {} response {}",
                    r.rank,
                    r.record.name,
                    r.record.conversion_rate,
                    r.tier,
                    row.conversion_trend,
                    row.response_time_trend
                );
            }
        }
        None => println!("  Team Performance: no performance data"),
    }

    let f = &s.follow_ups;
    println!(
        "  Follow-ups: {} overdue, {} upcoming, {} completed",
        f.overdue_count, f.upcoming_count, f.completed_count
    );
    for t in &f.upcoming {
        print_task(t);
    }

    for w in &s.warnings {
        println!("  Warning: {w}");
    }
}
