//! ETL job drivers.
//!
//! Each job runs extract, transform, novelty filter (dimension jobs only) and
//! load in order. A failed stage ends that job; the jobs after it in an
//! `all` run still start. Transport failures and malformed records never end
//! a job: they are logged, counted in the [`JobReport`] and skipped.

mod categories;
mod channels;
mod facts;
mod handoff;
mod videos;

#[cfg(test)]
mod test_support;

use std::collections::HashSet;
use std::hash::Hash;
use std::path::PathBuf;

use clap::ValueEnum;
use serde_json::Value;
use ytwh_api::{DurationMode, MapError, YoutubeClient};
use ytwh_db::{DbError, SinkRow, Warehouse};

/// The jobs `ytwh-cli etl` can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Job {
    /// Load new video categories
    Categories,
    /// Load new chart videos, their first snapshot and the channel handoff
    Videos,
    /// Load channels named in the handoff file
    Channels,
    /// Snapshot statistics for every known video
    VideoFacts,
    /// Snapshot statistics for every known channel
    ChannelFacts,
    /// Every job above, in that order
    All,
}

impl Job {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Job::Categories => "categories",
            Job::Videos => "videos",
            Job::Channels => "channels",
            Job::VideoFacts => "video-facts",
            Job::ChannelFacts => "channel-facts",
            Job::All => "all",
        }
    }

    /// The concrete jobs this selection runs, in run order. The channel job
    /// follows the video job so it picks up the handoff just written.
    pub(crate) fn sequence(self) -> Vec<Job> {
        match self {
            Job::All => vec![
                Job::Categories,
                Job::Videos,
                Job::Channels,
                Job::VideoFacts,
                Job::ChannelFacts,
            ],
            single => vec![single],
        }
    }
}

/// The slice of [`ytwh_core::AppConfig`] the jobs read.
#[derive(Debug, Clone)]
pub(crate) struct JobSettings {
    pub region_code: String,
    pub language: String,
    pub batch_size: usize,
    pub handoff_path: PathBuf,
    pub duration_mode: DurationMode,
    pub dry_run: bool,
}

impl JobSettings {
    pub(crate) fn from_app_config(config: &ytwh_core::AppConfig, dry_run: bool) -> Self {
        Self {
            region_code: config.region_code.clone(),
            language: config.language.clone(),
            batch_size: config.batch_size,
            handoff_path: config.handoff_path.clone(),
            duration_mode: DurationMode::from_truncate_flag(config.truncate_duration_days),
            dry_run,
        }
    }
}

/// Counters for one job run, printed as its summary line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct JobReport {
    pub job: Job,
    /// Raw records returned by the API.
    pub extracted: usize,
    pub malformed: usize,
    /// Keys that passed the novelty filter; `None` for fact jobs.
    pub novel: Option<usize>,
    pub failed_requests: usize,
    /// Rows written per table, in load order. Empty batches are not listed.
    pub loaded: Vec<(&'static str, u64)>,
    /// Tables whose load failed without ending the job.
    pub failed_loads: Vec<&'static str>,
    /// Channel IDs written to the handoff file.
    pub handoff: Option<usize>,
}

impl JobReport {
    pub(crate) fn new(job: Job) -> Self {
        Self {
            job,
            extracted: 0,
            malformed: 0,
            novel: None,
            failed_requests: 0,
            loaded: Vec::new(),
            failed_loads: Vec::new(),
            handoff: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn rows_loaded(&self, table: &str) -> u64 {
        self.loaded
            .iter()
            .filter(|(t, _)| *t == table)
            .map(|(_, n)| n)
            .sum()
    }

    pub(crate) fn summary(&self) -> String {
        let mut line = format!(
            "{}: extracted {}, malformed {}",
            self.job.name(),
            self.extracted,
            self.malformed
        );
        if let Some(novel) = self.novel {
            line.push_str(&format!(", novel {novel}"));
        }
        if self.failed_requests > 0 {
            line.push_str(&format!(", failed requests {}", self.failed_requests));
        }
        if self.loaded.is_empty() {
            line.push_str(", nothing loaded");
        } else {
            for (table, rows) in &self.loaded {
                line.push_str(&format!(", {table} +{rows}"));
            }
        }
        if !self.failed_loads.is_empty() {
            line.push_str(&format!(", failed loads {}", self.failed_loads.join(" ")));
        }
        if let Some(ids) = self.handoff {
            line.push_str(&format!(", handoff {ids} channel ids"));
        }
        line
    }
}

/// The result of one job in a run.
#[derive(Debug)]
pub(crate) struct JobOutcome {
    pub job: Job,
    pub result: anyhow::Result<JobReport>,
}

/// Runs every job in `job.sequence()`, logging each result. A failed job
/// does not stop the ones after it.
pub(crate) async fn run_jobs<W: Warehouse>(
    job: Job,
    client: &YoutubeClient,
    warehouse: &W,
    settings: &JobSettings,
) -> Vec<JobOutcome> {
    let mut outcomes = Vec::new();

    for job in job.sequence() {
        tracing::info!(job = job.name(), dry_run = settings.dry_run, "job started");
        let result = run_job(job, client, warehouse, settings).await;

        match &result {
            Ok(report) => {
                tracing::info!(
                    job = job.name(),
                    extracted = report.extracted,
                    malformed = report.malformed,
                    novel = report.novel,
                    failed_requests = report.failed_requests,
                    "job finished"
                );
                println!("{}", report.summary());
            }
            Err(e) => {
                tracing::error!(job = job.name(), error = %format!("{e:#}"), "job terminated");
                println!("{}: failed: {e:#}", job.name());
            }
        }

        outcomes.push(JobOutcome { job, result });
    }

    outcomes
}

async fn run_job<W: Warehouse>(
    job: Job,
    client: &YoutubeClient,
    warehouse: &W,
    settings: &JobSettings,
) -> anyhow::Result<JobReport> {
    match job {
        Job::Categories => categories::run(client, warehouse, settings).await,
        Job::Videos => videos::run(client, warehouse, settings).await,
        Job::Channels => channels::run(client, warehouse, settings).await,
        Job::VideoFacts => facts::run_video_facts(client, warehouse, settings).await,
        Job::ChannelFacts => facts::run_channel_facts(client, warehouse, settings).await,
        Job::All => anyhow::bail!("`all` is expanded by run_jobs"),
    }
}

/// Maps each raw item, logging and counting the ones that are malformed.
fn map_records<T>(
    report: &mut JobReport,
    items: &[Value],
    mut map: impl FnMut(&Value) -> Result<T, MapError>,
) -> Vec<T> {
    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        match map(item) {
            Ok(row) => rows.push(row),
            Err(e) => {
                report.malformed += 1;
                tracing::warn!(
                    job = report.job.name(),
                    error = %e,
                    raw = %item,
                    "skipping malformed record"
                );
            }
        }
    }
    rows
}

/// Drops rows whose key was already seen; the first occurrence wins.
fn dedupe_by<T, K: Eq + Hash>(rows: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.into_iter().filter(|row| seen.insert(key(row))).collect()
}

/// Keeps only rows whose key is in `keep`.
fn restrict_to<T, K: Eq + Hash>(rows: Vec<T>, keep: &[K], key: impl Fn(&T) -> K) -> Vec<T> {
    let keep: HashSet<&K> = keep.iter().collect();
    rows.into_iter()
        .filter(|row| keep.contains(&key(row)))
        .collect()
}

/// Writes `rows` through the warehouse and records the count, or only logs
/// what would be written on a dry run. An empty batch is a no-op and is not
/// recorded. A failed load is recorded in `report.failed_loads`.
async fn load_rows<W: Warehouse, R: SinkRow>(
    warehouse: &W,
    settings: &JobSettings,
    report: &mut JobReport,
    rows: &[R],
) -> Result<u64, DbError> {
    if rows.is_empty() {
        tracing::debug!(job = report.job.name(), table = R::TABLE, "nothing to load");
        return Ok(0);
    }

    if settings.dry_run {
        tracing::info!(
            job = report.job.name(),
            table = R::TABLE,
            columns = %R::COLUMNS.join(", "),
            rows = rows.len(),
            "dry run: skipping insert"
        );
        return Ok(0);
    }

    match warehouse.insert_rows(rows).await {
        Ok(written) => {
            tracing::info!(
                job = report.job.name(),
                table = R::TABLE,
                rows = written,
                "rows inserted"
            );
            report.loaded.push((R::TABLE, written));
            Ok(written)
        }
        Err(e) => {
            tracing::error!(
                job = report.job.name(),
                table = R::TABLE,
                rows = rows.len(),
                error = %e,
                "load failed; batch rolled back"
            );
            report.failed_loads.push(R::TABLE);
            Err(e)
        }
    }
}

#[cfg(test)]
#[path = "etl_test.rs"]
mod tests;
