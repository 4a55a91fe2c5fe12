//! Command implementations for the HDS converter CLI
//!
//! This module wires the CLI to the batch orchestrator: logging setup,
//! layered configuration, the progress host and the final report.

use crate::app::services::batch_orchestrator::{
    BatchOrchestrator, BatchSummary, ConsoleReporter, ConversionReporter, TracingReporter,
};
use crate::cli::args::{ConvertArgs, OutputFormat};
use crate::config::{Config, VariableDatabaseConfig};
use crate::{Error, Result};
use colored::*;
use indicatif::HumanDuration;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Run the convert command
///
/// This function drives the whole conversion:
/// 1. Set up logging and configuration
/// 2. Convert every archive with progress reporting
/// 3. Print the final summary
///
/// Cancelling `cancellation` stops admitting new files; the summary is
/// still produced for the files that ran.
pub async fn run(args: ConvertArgs, cancellation: CancellationToken) -> Result<BatchSummary> {
    setup_logging(&args);

    info!("Starting HDS converter");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config);

    let console = args.show_progress().then(|| Arc::new(ConsoleReporter::new()));
    let reporter: Arc<dyn ConversionReporter> = match &console {
        Some(console) => console.clone(),
        None => Arc::new(TracingReporter),
    };

    let orchestrator = BatchOrchestrator::new(config, reporter).with_cancellation(cancellation);
    let summary = orchestrator.run().await;

    if let Some(console) = &console {
        let message = if summary.is_ok() {
            "Conversion completed"
        } else {
            "Conversion failed"
        };
        console.finish(message);
    }

    let summary = summary?;
    generate_final_report(&args, &summary)?;
    Ok(summary)
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &ConvertArgs) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hds_converter={}", log_level)));

    let initialized = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();

    if initialized.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
}

/// Load configuration using the layered approach (file -> args -> validation)
fn load_configuration(args: &ConvertArgs) -> Result<Config> {
    match &args.config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => debug!("No config file given, trying the default location"),
    }

    let mut config = Config::load_layered(args.config_file.as_deref())?;
    apply_cli_overrides(&mut config, args);

    if args.variable_db_encoding.is_some() && config.variable_database.is_none() {
        return Err(Error::configuration(
            "--variable-db-encoding needs a variable database from --variable-db or the config file"
                .to_string(),
        ));
    }
    config.validate()?;

    Ok(config)
}

/// Apply CLI argument overrides to configuration
fn apply_cli_overrides(config: &mut Config, args: &ConvertArgs) {
    if let Some(source) = &args.source {
        config.source_dir = source.clone();
    }
    if let Some(target) = &args.target {
        config.target_dir = target.clone();
    }

    if let Some(path) = &args.variable_db {
        config.variable_database = Some(VariableDatabaseConfig::new(path));
    }
    if let Some(encoding) = &args.variable_db_encoding {
        if let Some(database) = config.variable_database.as_mut() {
            database.encoding = encoding.clone();
        }
    }
    if args.require_variable_db {
        config.require_variable_database = true;
    }

    if let Some(columns) = args.trend_extra_columns {
        config.trend_extra_columns = columns;
    }
    if let Some(columns) = args.log_extra_columns {
        config.log_extra_columns = columns;
    }
    if let Some(jobs) = args.jobs {
        config.max_concurrent_files = jobs;
    }
    if args.force {
        config.overwrite = true;
    }
}

fn generate_final_report(args: &ConvertArgs, summary: &BatchSummary) -> Result<()> {
    match args.output_format {
        OutputFormat::Human if !args.quiet => {
            generate_human_report(summary);
            Ok(())
        }
        OutputFormat::Human => Ok(()),
        OutputFormat::Json => generate_json_report(summary),
    }
}

/// Generate human-readable report
fn generate_human_report(summary: &BatchSummary) {
    let duration = HumanDuration(summary.duration);

    println!();
    if summary.was_cancelled() {
        println!("{}", "Conversion cancelled".bright_yellow().bold());
    } else {
        println!("{}", "Conversion complete".bright_green().bold());
    }
    println!("  {} {}", "Files found:".bright_cyan(), summary.files_found);
    println!(
        "  {} {}",
        "Files converted:".bright_cyan(),
        summary.files_converted.to_string().bright_white().bold()
    );
    if summary.files_aborted > 0 {
        println!(
            "  {} {}",
            "Files aborted:".bright_cyan(),
            summary.files_aborted.to_string().bright_red()
        );
    }
    if summary.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_cyan(),
            summary.files_failed.to_string().bright_red()
        );
    }
    if summary.files_cancelled > 0 {
        println!(
            "  {} {}",
            "Files cancelled:".bright_cyan(),
            summary.files_cancelled.to_string().bright_yellow()
        );
    }
    println!(
        "  {} {} ({} duplicates suppressed)",
        "Trend rows:".bright_cyan(),
        summary.totals.trends_written,
        summary.totals.duplicates_suppressed
    );
    println!(
        "  {} {}",
        "Log rows:".bright_cyan(),
        summary.totals.logs_written
    );
    println!(
        "  {} {}",
        "Variables loaded:".bright_cyan(),
        summary.variables_loaded
    );
    println!("  {} {}", "Duration:".bright_cyan(), duration);

    let failures: Vec<_> = summary.failures().collect();
    if !failures.is_empty() {
        println!("\n{}", "Errors:".bright_red().bold());
        for (file_name, error) in failures {
            println!("  {} {}", format!("{}:", file_name).bright_white(), error);
        }
    }
    println!();
}

/// Generate JSON report for machine consumption
fn generate_json_report(summary: &BatchSummary) -> Result<()> {
    let json_summary = serde_json::json!({
        "files_found": summary.files_found,
        "files_converted": summary.files_converted,
        "files_aborted": summary.files_aborted,
        "files_failed": summary.files_failed,
        "files_cancelled": summary.files_cancelled,
        "variables_loaded": summary.variables_loaded,
        "duration_seconds": summary.duration.as_secs_f64(),
        "totals": summary.totals,
        "files": summary.outcomes.iter().map(|(name, outcome)| {
            serde_json::json!({
                "file": name,
                "status": outcome.label(),
                "stats": outcome.stats(),
                "error": outcome.error().map(|error| error.to_string()),
            })
        }).collect::<Vec<_>>()
    });

    let text = serde_json::to_string_pretty(&json_summary)
        .map_err(|e| Error::io("Failed to render JSON summary", e.into()))?;
    println!("{}", text);
    Ok(())
}

/// Whether an error should be reported as a configuration problem
pub fn is_configuration_error(error: &Error) -> bool {
    matches!(
        error,
        Error::Configuration { .. } | Error::FileNotFound { .. }
    )
}
