//! DropoutShield - Main CLI Entry Point

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use dropoutshield::{
    cli::{Args, Commands, Verbosity},
    config::Config,
    pipeline::Pipeline,
    schema::{export_students_csv, ingest_file, normalize_row},
    scoring::{RiskSummary, RiskTier},
    telemetry::{filter_directive, init_logging},
    types::{Identity, PredictionResult, RawRow, Snapshot},
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(base_url) = &args.base_url {
        config.remote.base_url = base_url.clone();
    }
    config.validate()?;

    init_logging(
        &filter_directive(&config.logging.level, args.verbose, args.quiet),
        args.json_logs || config.logging.json,
    );

    let pipeline = Pipeline::from_config(&config)?;

    match &args.command {
        Commands::Status { force } => {
            let available = pipeline.monitor().check(*force).await;
            let state = if available {
                "available".green().bold()
            } else {
                "unavailable".red().bold()
            };
            println!("Remote predictor {} is {}", pipeline.client().base_url(), state);
        }
        Commands::Predict { file, save_as } => {
            let ingested = ingest_file(file)
                .await
                .with_context(|| format!("Failed to ingest {}", file.display()))?;
            if !ingested.warning.is_empty() && !args.quiet {
                eprintln!("{} {}", "Warning:".yellow().bold(), ingested.warning);
            }

            let predictions = pipeline.predict(&ingested.records).await;
            print_predictions(&args, &predictions)?;

            if let Some(owner) = save_as {
                let outcome = pipeline.save(owner, &ingested.records).await;
                if !outcome.is_saved() {
                    bail!("Could not save students for {}", owner);
                }
                eprintln!("{} {}", "Saved:".green().bold(), outcome);
            }
        }
        Commands::Load { identity } => {
            let snapshot = pipeline.load(&Identity::owner(identity.as_str())).await;
            print_snapshot(&args, &snapshot)?;
        }
        Commands::Aggregate => {
            let snapshot = pipeline.load(&Identity::Aggregate).await;
            print_snapshot(&args, &snapshot)?;
            if !args.json {
                print_summary(&RiskSummary::from_predictions(&snapshot.predictions));
            }
        }
        Commands::Export { identity, output } => {
            let snapshot = pipeline.load(&Identity::owner(identity.as_str())).await;
            let csv = export_students_csv(&snapshot.students);
            match output {
                Some(path) => {
                    tokio::fs::write(path, csv)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    eprintln!(
                        "Exported {} students from {} to {}",
                        snapshot.students.len(),
                        snapshot.origin,
                        path.display()
                    );
                }
                None => println!("{}", csv),
            }
        }
        Commands::Add {
            identity,
            name,
            id,
            class_name,
            fields,
        } => {
            let mut row: RawRow = fields.iter().cloned().collect();
            for (column, value) in [("name", name), ("id", id), ("class", class_name)] {
                if let Some(value) = value {
                    row.insert(column.to_string(), value.clone());
                }
            }
            let entry = normalize_row(&row).record;

            let (snapshot, outcome) = pipeline
                .add_student(identity, entry)
                .await
                .with_context(|| format!("Could not add student for {}", identity))?;
            print_snapshot(&args, &snapshot)?;
            if !outcome.is_saved() {
                bail!("Could not save students for {}", identity);
            }
            eprintln!("{} {}", "Saved:".green().bold(), outcome);
        }
        Commands::Delete {
            identity,
            student_id,
        } => {
            let removed = pipeline.delete_student(identity, student_id).await?;
            println!(
                "Deleted student {} for {} ({} cached rows removed)",
                student_id, identity, removed
            );
        }
        Commands::Config => show_config(&config)?,
    }

    Ok(())
}

fn show_config(config: &Config) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("Failed to render config")?;
    println!("{}", rendered);
    Ok(())
}

fn tier_label(tier: RiskTier) -> colored::ColoredString {
    match tier {
        RiskTier::High => tier.as_str().red().bold(),
        RiskTier::Medium => tier.as_str().yellow(),
        RiskTier::Low => tier.as_str().green(),
    }
}

fn print_predictions(args: &Args, predictions: &[PredictionResult]) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(predictions)?);
        return Ok(());
    }

    let show_suggestions = args.verbosity().show_suggestions();
    for p in predictions {
        println!(
            "{:<8} {:<24} {:<8} {:>6.1}%  {}",
            p.id,
            p.name,
            p.class_name,
            p.probability * 100.0,
            tier_label(p.risk_tier)
        );
        if show_suggestions {
            for suggestion in &p.suggestions {
                println!("         - {}", suggestion.dimmed());
            }
        }
    }
    Ok(())
}

fn print_snapshot(args: &Args, snapshot: &Snapshot) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }
    if snapshot.is_empty() {
        println!("{}", "No student data found in any source".yellow());
        return Ok(());
    }
    if args.verbosity() != Verbosity::Quiet {
        println!(
            "{} {} students from {}",
            "Loaded".bold(),
            snapshot.students.len(),
            snapshot.origin
        );
    }
    print_predictions(args, &snapshot.predictions)
}

fn print_summary(summary: &RiskSummary) {
    if summary.total() == 0 {
        return;
    }
    println!();
    println!(
        "{} {} high, {} medium, {} low",
        "Totals:".bold(),
        summary.totals.high,
        summary.totals.medium,
        summary.totals.low
    );
    for class in &summary.by_class {
        println!(
            "  {:<10} {:>4} high {:>4} medium {:>4} low",
            class.class_name, class.counts.high, class.counts.medium, class.counts.low
        );
    }
}
