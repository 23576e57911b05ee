mod config;
mod fields;
mod netbox;
mod provision;

use clap::{Parser, Subcommand};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use fields::{RecordType, OPTICAL_FIELDS};
use netbox::NetBoxClient;
use provision::{DryRun, LogLevel, Report, RunError, SchemaApi};

#[derive(Parser)]
#[command(author, version, about = "Provision optical networking custom fields in NetBox")]
struct Cli {
    /// NetBox base URL (overrides NETBOX_URL)
    #[arg(long, global = true)]
    url: Option<String>,
    /// NetBox API token (overrides NETBOX_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,
    /// Print results as JSON on stdout
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the optical custom fields, skipping any that already exist
    Create {
        #[arg(long)]
        dry_run: bool,
    },
    /// Overwrite the optical custom fields from the table
    Update {
        #[arg(long)]
        commit: bool,
    },
    /// Delete every custom field in the optical groups
    Remove {
        #[arg(long)]
        commit: bool,
    },
    /// Show the live optical custom fields
    List,
    /// Check the compiled field table without contacting NetBox
    Validate,
    /// Check NetBox connectivity and content types
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "optical_fields=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = Config::load().with_overrides(cli.url.clone(), cli.token.clone());

    match cli.command {
        Command::Validate => validate(cli.json),
        command => {
            let nb = make_client(&cfg)?;
            tracing::info!("NetBox: {}", cfg.netbox_url);
            run(command, &nb, &cfg, cli.json).await
        }
    }
}

async fn run(command: Command, nb: &NetBoxClient, cfg: &Config, json: bool) -> anyhow::Result<()> {
    let dry = DryRun::new(nb);

    match command {
        Command::Create { dry_run } => {
            let api: &dyn SchemaApi = if dry_run { &dry } else { nb };
            finish(provision::create(OPTICAL_FIELDS, api).await, json)
        }
        Command::Update { commit } => {
            let api: &dyn SchemaApi = if commit { nb } else { &dry };
            finish(provision::update(OPTICAL_FIELDS, api).await, json)
        }
        Command::Remove { commit } => {
            let api: &dyn SchemaApi = if commit { nb } else { &dry };
            finish(provision::remove(OPTICAL_FIELDS, &cfg.legacy_groups, api).await, json)
        }
        Command::List => list(nb, cfg, json).await,
        Command::Status => status(nb, cfg).await,
        Command::Validate => validate(json),
    }
}

/// Create a NetBoxClient from config
fn make_client(cfg: &Config) -> anyhow::Result<NetBoxClient> {
    if !cfg.is_configured() {
        anyhow::bail!("NetBox not configured: set NETBOX_URL and NETBOX_TOKEN or pass --url and --token");
    }
    NetBoxClient::new(
        cfg.netbox_url.clone(),
        cfg.netbox_token.clone(),
        Duration::from_secs(cfg.timeout_secs),
        cfg.page_limit,
    )
}

/// Print the report and turn a failed run into a non-zero exit
fn finish(result: Result<Report, RunError>, json: bool) -> anyhow::Result<()> {
    match result {
        Ok(report) => print_report(&report, json),
        Err(err) => {
            print_report(&err.report, json)?;
            Err(err.into())
        }
    }
}

fn print_report(report: &Report, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    for failure in report.messages(LogLevel::Failure) {
        println!("! {}", failure);
    }
    if let Some(summary) = report.summary() {
        println!("{}", summary.message);
    }
    Ok(())
}

fn validate(json: bool) -> anyhow::Result<()> {
    fields::validate_table(OPTICAL_FIELDS)?;

    if json {
        println!("{}", serde_json::to_string_pretty(OPTICAL_FIELDS)?);
        return Ok(());
    }
    for spec in OPTICAL_FIELDS {
        let targets: Vec<&str> = spec.targets.iter().map(|t| t.tag()).collect();
        println!(
            "{:<20} {:<14} {:<8} {}",
            spec.name,
            spec.group,
            spec.value_kind.as_str(),
            targets.join(",")
        );
    }
    println!("{} fields OK", OPTICAL_FIELDS.len());
    Ok(())
}

async fn list(nb: &NetBoxClient, cfg: &Config, json: bool) -> anyhow::Result<()> {
    let groups = provision::sweep_groups(OPTICAL_FIELDS, &cfg.legacy_groups);
    let records = provision::live_fields(&groups, nb).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    for record in &records {
        println!(
            "{:<6} {:<20} {:<18} {:<8} {}",
            record.id,
            record.name,
            record.group,
            record.value_kind,
            record.object_types.join(",")
        );
    }
    tracing::info!("{} optical fields in {}", records.len(), groups.join(", "));
    Ok(())
}

async fn status(nb: &NetBoxClient, cfg: &Config) -> anyhow::Result<()> {
    let status = nb.status().await?;
    println!(
        "NetBox {} reachable at {}",
        status.netbox_version.as_deref().unwrap_or("(unknown version)"),
        cfg.netbox_url
    );

    for record_type in RecordType::ALL {
        let content_type = nb.resolve_record_type(*record_type).await?;
        println!("{:<12} {}", record_type.tag(), content_type);
    }
    Ok(())
}
