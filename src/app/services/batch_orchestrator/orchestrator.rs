//! Main BatchOrchestrator implementation
//!
//! One worker per archive runs on tokio's blocking pool behind a semaphore
//! of `max_concurrent_files` permits. The variable database is loaded before
//! the first file is admitted and shared read-only through an `Arc`.

use super::progress::ConversionReporter;
use super::summary::BatchSummary;
use crate::Config;
use crate::app::models::ConversionTask;
use crate::app::services::conversion_engine::{ConversionEngine, FileOutcome};
use crate::app::services::variable_database::{LoadStatus, VariableDatabase, resolve_encoding};
use crate::constants::ARCHIVE_FILE_PATTERN;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// List the archives of a directory, sorted by path
///
/// Only regular files directly inside `source_dir` matching `*.dat` are
/// returned; subdirectories are not searched.
///
/// # Errors
/// * Returns `Error::FileNotFound` if the directory does not exist
pub fn discover_archives(source_dir: &Path) -> Result<Vec<PathBuf>> {
    if !source_dir.is_dir() {
        return Err(Error::file_not_found(source_dir.display().to_string()));
    }

    let escaped_dir = glob::Pattern::escape(&source_dir.to_string_lossy());
    let pattern = Path::new(&escaped_dir).join(ARCHIVE_FILE_PATTERN);
    let entries = glob::glob(&pattern.to_string_lossy()).map_err(|e| {
        Error::configuration(format!("Invalid archive pattern {}: {}", pattern.display(), e))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(path) => debug!("Skipping non-file entry {}", path.display()),
            Err(e) => warn!("Cannot inspect {}: {}", e.path().display(), e.error()),
        }
    }

    files.sort();
    Ok(files)
}

/// Drives the conversion of every archive in the source directory
pub struct BatchOrchestrator {
    config: Config,
    reporter: Arc<dyn ConversionReporter>,
    cancellation: CancellationToken,
}

impl BatchOrchestrator {
    /// Create an orchestrator reporting to the given host
    pub fn new(config: Config, reporter: Arc<dyn ConversionReporter>) -> Self {
        Self {
            config,
            reporter,
            cancellation: CancellationToken::new(),
        }
    }

    /// Use an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Token observed when admitting files
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Request cooperative cancellation
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the shared variable database
    ///
    /// Without a configured database, conversion proceeds with an empty one.
    /// A failed load is traced and tolerated unless the configuration
    /// requires the database.
    ///
    /// # Errors
    /// * Returns `Error::Configuration` for an unknown encoding, or when a
    ///   required database fails to load
    pub async fn load_variables(&self) -> Result<VariableDatabase> {
        let Some(settings) = &self.config.variable_database else {
            debug!("No variable database configured");
            return Ok(VariableDatabase::new());
        };

        let encoding = resolve_encoding(&settings.encoding)?;
        let (database, status) = VariableDatabase::load(&settings.path, encoding).await;

        match status {
            LoadStatus::Loaded(stats) => {
                self.reporter.trace(&format!(
                    "{} variables loaded from {}.",
                    stats.variables_loaded,
                    settings.path.display()
                ));
                Ok(database)
            }
            LoadStatus::Failed(error) if self.config.require_variable_database => {
                self.reporter
                    .trace(&format!("Variable database could not be loaded: {}", error));
                Err(error)
            }
            LoadStatus::Failed(error) => {
                self.reporter.trace(&format!(
                    "Variable database could not be loaded: {}. Alarm levels will be empty.",
                    error
                ));
                Ok(database)
            }
        }
    }

    /// Convert every archive of the source directory
    ///
    /// Returns once every admitted file has finished. Per-file failures are
    /// traced and recorded in the summary; they never fail the batch.
    ///
    /// # Errors
    /// * Returns `Error::Configuration` if a required variable database
    ///   cannot be loaded
    /// * Returns `Error::FileNotFound` if the source directory is missing
    pub async fn run(&self) -> Result<BatchSummary> {
        let start_time = Instant::now();
        self.reporter.trace("Starting conversion.");
        info!(
            "Converting {} into {}",
            self.config.source_dir.display(),
            self.config.target_dir.display()
        );

        let variables = Arc::new(self.load_variables().await?);
        let variables_loaded = variables.len();

        let files = discover_archives(&self.config.source_dir)?;
        self.reporter
            .trace(&format!("{} files found for conversion.", files.len()));

        let tasks: Arc<Vec<ConversionTask>> =
            Arc::new(files.into_iter().map(ConversionTask::new).collect());
        let engine = Arc::new(ConversionEngine::new(
            variables,
            self.config.engine_options(),
        ));

        let outcomes = self.convert_all(&tasks, engine).await;

        if tasks.is_empty() {
            self.reporter.progress(100);
        }
        self.reporter.trace("Conversion completed");

        let named_outcomes = tasks
            .iter()
            .map(ConversionTask::file_name)
            .zip(outcomes)
            .collect();
        let summary =
            BatchSummary::from_outcomes(named_outcomes, variables_loaded, start_time.elapsed());

        info!(
            "Batch finished in {:.2?}: {} converted, {} aborted, {} failed, {} cancelled",
            summary.duration,
            summary.files_converted,
            summary.files_aborted,
            summary.files_failed,
            summary.files_cancelled
        );
        Ok(summary)
    }

    /// Fan the tasks out to workers and wait for all of them
    ///
    /// Returns one outcome per task, in task order.
    async fn convert_all(
        &self,
        tasks: &Arc<Vec<ConversionTask>>,
        engine: Arc<ConversionEngine>,
    ) -> Vec<FileOutcome> {
        let total = tasks.len();
        let max_concurrent = self.config.max_concurrent_files.max(1);
        let semaphore = Arc::new(Semaphore::new(max_concurrent));
        // Completion count; the lock keeps progress reports in increasing order
        let completed = Arc::new(Mutex::new(0usize));

        let mut outcomes: Vec<Option<FileOutcome>> = (0..total).map(|_| None).collect();
        let mut join_set = JoinSet::new();

        for index in 0..total {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    error!("Worker pool closed unexpectedly: {}", e);
                    break;
                }
            };

            if self.cancellation.is_cancelled() {
                let remaining = total - index;
                self.reporter.trace(&format!(
                    "Cancellation requested - skipping {} remaining files.",
                    remaining
                ));
                for outcome in outcomes.iter_mut().skip(index) {
                    *outcome = Some(FileOutcome::Cancelled);
                }
                break;
            }

            let tasks = Arc::clone(tasks);
            let engine = Arc::clone(&engine);
            let completed = Arc::clone(&completed);
            let reporter = Arc::clone(&self.reporter);

            join_set.spawn_blocking(move || {
                let _permit = permit;
                let task = &tasks[index];
                let file_name = task.file_name();

                reporter.trace(&format!("Processing file {}.", file_name));
                let outcome = engine.convert_file(task.file());
                if let Some(error) = outcome.error() {
                    reporter.trace(&format!("Error converting {}: {}", file_name, error));
                }

                task.mark_completed();
                let mut done = completed
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                *done += 1;
                reporter.progress(progress_percent(*done, total));
                drop(done);

                (index, outcome)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = Some(outcome),
                Err(e) => error!("Conversion worker failed: {}", e),
            }
        }

        outcomes
            .into_iter()
            .zip(tasks.iter())
            .map(|(outcome, task)| {
                outcome.unwrap_or_else(|| {
                    let error = Error::processing_interrupted(format!(
                        "worker for {} ended without a result",
                        task.file_name()
                    ));
                    self.reporter
                        .trace(&format!("Error converting {}: {}", task.file_name(), error));

                    // A panicked worker still finishes its file for progress purposes
                    let mut done = completed
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                    *done += 1;
                    self.reporter.progress(progress_percent(*done, total));
                    drop(done);

                    FileOutcome::Aborted {
                        stats: Default::default(),
                        error,
                    }
                })
            })
            .collect()
    }
}

/// Completed share of the batch as a whole percentage
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (completed.min(total) * 100 / total) as u8
}
