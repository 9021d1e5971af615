//! Channel job: handoff file into `channel_dim`.

use anyhow::Context;
use ytwh_api::{map_channel_dim, Resource, YoutubeClient};
use ytwh_core::ChannelDimRow;
use ytwh_db::{Dimension, Warehouse};

use super::{dedupe_by, handoff, load_rows, map_records, restrict_to, Job, JobReport, JobSettings};

/// Loads the channels named in the handoff file that `channel_dim` lacks.
///
/// The novelty filter runs before extraction so known channels cost no API
/// quota. A missing handoff file means the video job has not run yet; the
/// job logs a warning and loads nothing.
pub(super) async fn run<W: Warehouse>(
    client: &YoutubeClient,
    warehouse: &W,
    settings: &JobSettings,
) -> anyhow::Result<JobReport> {
    let mut report = JobReport::new(Job::Channels);

    let path = &settings.handoff_path;
    let Some(candidates) = handoff::read_channel_ids(path)
        .await
        .with_context(|| format!("reading handoff file {}", path.display()))?
    else {
        tracing::warn!(
            job = "channels",
            path = %path.display(),
            "handoff file not found; run the videos job first"
        );
        return Ok(report);
    };

    let novel = warehouse
        .not_in_table(Dimension::Channel, &candidates)
        .await
        .context("novelty filter on channel_dim")?;
    report.novel = Some(novel.len());
    tracing::info!(
        job = "channels",
        candidates = candidates.len(),
        novel = novel.len(),
        "novelty filter applied"
    );

    if novel.is_empty() {
        return Ok(report);
    }

    let fetched = client
        .fetch_batch(
            Resource::Channels,
            &novel,
            settings.batch_size,
            &[("part", "snippet"), ("hl", settings.language.as_str())],
        )
        .await;
    report.extracted = fetched.items.len();
    report.failed_requests = fetched.failed_requests;

    let rows = map_records(&mut report, &fetched.items, map_channel_dim);
    let rows = dedupe_by(rows, |r: &ChannelDimRow| r.channel_id.clone());
    let rows = restrict_to(rows, &novel, |r: &ChannelDimRow| r.channel_id.clone());

    load_rows(warehouse, settings, &mut report, &rows)
        .await
        .context("loading channel_dim")?;

    Ok(report)
}

#[cfg(test)]
#[path = "channels_test.rs"]
mod tests;
