//! # Campaign Pass Inspector
//!
//! Command-line tool for dry-running the scheduling engine against a JSON
//! snapshot of raw records: classifies and evaluates every row for a given
//! as-of date and prints the would-be call plan. Read-only: no contacts
//! are placed and nothing is written back.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use outreach_core::config::ConfigManager;
use outreach_core::eligibility::{
    EligibilityDecision, EligibilityEvaluator, SafetyNetEvaluator,
};
use outreach_core::models::{PolicyRecord, RawRecord};
use outreach_core::orchestration::PartitionKey;
use outreach_core::schedule;

#[derive(Parser)]
#[command(name = "campaign-pass")]
#[command(about = "Dry-run the outreach scheduling engine against a record snapshot")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// JSON file holding an array of raw records
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Evaluate as of this date (YYYY-MM-DD); defaults to today in the
    /// configured operating timezone
    #[arg(short, long)]
    as_of: Option<NaiveDate>,

    /// Configuration directory (default: config/outreach)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Environment to load configuration for
    #[arg(short, long)]
    environment: Option<String>,

    /// Output format (table, json)
    #[arg(long, default_value = "table")]
    format: String,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct PlanEntry {
    record_id: String,
    company: String,
    classification: String,
    stage: u32,
    path: String,
    script_variant: String,
}

#[derive(Serialize)]
struct SkipEntry {
    record_id: String,
    classification: String,
    reason: String,
}

#[derive(Serialize)]
struct PlanReport {
    as_of: NaiveDate,
    total_records: usize,
    eligible: Vec<PlanEntry>,
    skipped: Vec<SkipEntry>,
    ingestion_failures: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let environment = cli
        .environment
        .clone()
        .unwrap_or_else(ConfigManager::detect_environment);
    let manager = ConfigManager::load_from_directory_with_env(cli.config_dir.clone(), &environment)
        .map_err(|e| anyhow::anyhow!("configuration error: {e}"))?;
    let config = manager.config();
    let tz = config
        .operating_tz()
        .map_err(|e| anyhow::anyhow!("configuration error: {e}"))?;

    let as_of = cli
        .as_of
        .unwrap_or_else(|| chrono::Utc::now().with_timezone(&tz).date_naive());

    let raw: Vec<RawRecord> = {
        let contents = std::fs::read_to_string(&cli.snapshot)
            .map_err(|e| anyhow::anyhow!("cannot read snapshot {}: {e}", cli.snapshot.display()))?;
        serde_json::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("snapshot is not a raw-record array: {e}"))?
    };

    let evaluator =
        EligibilityEvaluator::new(config.engine.catch_up_window_business_days, tz);
    let safety_net = SafetyNetEvaluator::new(config.engine.safety_net_lookback_days, tz);

    let mut report = PlanReport {
        as_of,
        total_records: raw.len(),
        eligible: Vec::new(),
        skipped: Vec::new(),
        ingestion_failures: Vec::new(),
    };

    for raw_record in raw {
        let record = match PolicyRecord::from_raw(raw_record) {
            Ok(record) => record,
            Err(e) => {
                report.ingestion_failures.push(e.to_string());
                continue;
            }
        };

        let mut decision = evaluator.evaluate(&record, as_of);
        if !decision.is_eligible() && record.classification.is_status_triggered() {
            let rescue = safety_net.evaluate(&record, as_of);
            if rescue.is_eligible() {
                decision = rescue;
            }
        }

        match decision {
            EligibilityDecision::Eligible { stage, path } => {
                let script_variant = schedule::template_for(record.classification)
                    .and_then(|t| t.stage(stage))
                    .map_or("", |s| s.script_variant);
                report.eligible.push(PlanEntry {
                    record_id: record.record_id,
                    company: record.company,
                    classification: record.classification.to_string(),
                    stage,
                    path: format!("{path:?}"),
                    script_variant: script_variant.to_string(),
                });
            }
            EligibilityDecision::Ineligible { reason } => {
                report.skipped.push(SkipEntry {
                    record_id: record.record_id,
                    classification: record.classification.to_string(),
                    reason: reason.to_string(),
                });
            }
        }
    }

    match cli.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "table" => print_table(&report),
        other => {
            eprintln!("Unknown format '{other}' (expected table or json)");
            process::exit(2);
        }
    }

    Ok(())
}

fn print_table(report: &PlanReport) {
    println!("Campaign pass plan for {}", report.as_of);
    println!(
        "  {} records, {} eligible, {} skipped, {} ingestion failures",
        report.total_records,
        report.eligible.len(),
        report.skipped.len(),
        report.ingestion_failures.len()
    );

    if !report.eligible.is_empty() {
        // Group the call plan the way the orchestrator would dispatch it
        let mut partitions: BTreeMap<PartitionKey, Vec<&PlanEntry>> = BTreeMap::new();
        for entry in &report.eligible {
            let class = entry
                .classification
                .parse()
                .unwrap_or(outreach_core::CampaignClass::Unclassified);
            partitions
                .entry(PartitionKey {
                    class,
                    stage: entry.stage,
                })
                .or_default()
                .push(entry);
        }

        println!("\nEligible, by partition:");
        for (key, entries) in partitions {
            println!("  {} / stage {} ({} records)", key.class, key.stage, entries.len());
            for entry in entries {
                println!(
                    "    {} {} [{}] -> {}",
                    entry.record_id, entry.company, entry.path, entry.script_variant
                );
            }
        }
    }

    if !report.skipped.is_empty() {
        println!("\nSkipped:");
        for entry in &report.skipped {
            println!("  {} ({}): {}", entry.record_id, entry.classification, entry.reason);
        }
    }

    if !report.ingestion_failures.is_empty() {
        println!("\nIngestion failures:");
        for failure in &report.ingestion_failures {
            println!("  {failure}");
        }
    }
}
