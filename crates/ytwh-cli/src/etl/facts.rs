//! Fact jobs: statistics snapshots for every entity already in a dimension.
//!
//! No novelty filter; each run appends one row per entity, all stamped with
//! the same `collected_at`.

use anyhow::Context;
use chrono::Utc;
use ytwh_api::{map_channel_fact, map_video_fact, Resource, YoutubeClient};
use ytwh_core::{ChannelFactRow, VideoFactRow};
use ytwh_db::{Dimension, Warehouse};

use super::{dedupe_by, load_rows, map_records, Job, JobReport, JobSettings};

pub(super) async fn run_video_facts<W: Warehouse>(
    client: &YoutubeClient,
    warehouse: &W,
    settings: &JobSettings,
) -> anyhow::Result<JobReport> {
    let mut report = JobReport::new(Job::VideoFacts);
    let collected_at = Utc::now();

    let video_ids: Vec<String> = warehouse
        .all_keys(Dimension::Video)
        .await
        .context("listing video_dim keys")?;
    tracing::info!(job = "video-facts", videos = video_ids.len(), "snapshot started");

    let fetched = client
        .fetch_batch(
            Resource::Videos,
            &video_ids,
            settings.batch_size,
            &[("part", "statistics")],
        )
        .await;
    report.extracted = fetched.items.len();
    report.failed_requests = fetched.failed_requests;

    let rows = map_records(&mut report, &fetched.items, |raw| {
        map_video_fact(raw, collected_at)
    });
    let rows = dedupe_by(rows, |r: &VideoFactRow| r.video_id.clone());

    load_rows(warehouse, settings, &mut report, &rows)
        .await
        .context("loading video_fact")?;

    Ok(report)
}

pub(super) async fn run_channel_facts<W: Warehouse>(
    client: &YoutubeClient,
    warehouse: &W,
    settings: &JobSettings,
) -> anyhow::Result<JobReport> {
    let mut report = JobReport::new(Job::ChannelFacts);
    let collected_at = Utc::now();

    let channel_ids: Vec<String> = warehouse
        .all_keys(Dimension::Channel)
        .await
        .context("listing channel_dim keys")?;
    tracing::info!(
        job = "channel-facts",
        channels = channel_ids.len(),
        "snapshot started"
    );

    let fetched = client
        .fetch_batch(
            Resource::Channels,
            &channel_ids,
            settings.batch_size,
            &[("part", "statistics")],
        )
        .await;
    report.extracted = fetched.items.len();
    report.failed_requests = fetched.failed_requests;

    let rows = map_records(&mut report, &fetched.items, |raw| {
        map_channel_fact(raw, collected_at)
    });
    let rows = dedupe_by(rows, |r: &ChannelFactRow| r.channel_id.clone());

    load_rows(warehouse, settings, &mut report, &rows)
        .await
        .context("loading channel_fact")?;

    Ok(report)
}

#[cfg(test)]
#[path = "facts_test.rs"]
mod tests;
