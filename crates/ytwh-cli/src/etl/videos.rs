//! Video job: chart listing into `video_dim` and `video_fact`, then the
//! channel handoff.

use anyhow::Context;
use chrono::Utc;
use ytwh_api::{map_video, Resource, VideoRecord, YoutubeClient};
use ytwh_db::{Dimension, Warehouse};

use super::{dedupe_by, handoff, load_rows, map_records, restrict_to, Job, JobReport, JobSettings};

const VIDEO_PARTS: &str = "snippet,contentDetails,status,statistics";
const CHART: &str = "mostPopular";
const PAGE_SIZE: &str = "50";

/// Loads videos on the most-popular chart that the warehouse has not seen.
///
/// One listing feeds both projections: new videos get a `video_dim` row and
/// a first `video_fact` snapshot. The distinct channels of the new videos
/// then replace the handoff file.
///
/// A failed novelty query or `video_dim` load ends the job before the
/// handoff is written. A failed `video_fact` load is logged and the job
/// carries on.
pub(super) async fn run<W: Warehouse>(
    client: &YoutubeClient,
    warehouse: &W,
    settings: &JobSettings,
) -> anyhow::Result<JobReport> {
    let mut report = JobReport::new(Job::Videos);
    let collected_at = Utc::now();

    let params = [
        ("part", VIDEO_PARTS),
        ("chart", CHART),
        ("regionCode", settings.region_code.as_str()),
        ("hl", settings.language.as_str()),
        ("maxResults", PAGE_SIZE),
    ];
    let fetched = client.fetch_paginated(Resource::Videos, &params).await;
    report.extracted = fetched.items.len();
    report.failed_requests = fetched.failed_requests;
    tracing::info!(
        job = "videos",
        records = report.extracted,
        pages = fetched.requests,
        "chart extracted"
    );

    let records = map_records(&mut report, &fetched.items, |raw| {
        map_video(raw, collected_at, settings.duration_mode)
    });
    let records = dedupe_by(records, |r: &VideoRecord| r.dim.video_id.clone());

    let candidates: Vec<String> = records.iter().map(|r| r.dim.video_id.clone()).collect();
    let novel = warehouse
        .not_in_table(Dimension::Video, &candidates)
        .await
        .context("novelty filter on video_dim")?;
    report.novel = Some(novel.len());
    tracing::info!(
        job = "videos",
        candidates = candidates.len(),
        novel = novel.len(),
        "novelty filter applied"
    );

    let records = restrict_to(records, &novel, |r: &VideoRecord| r.dim.video_id.clone());
    let (dims, facts): (Vec<_>, Vec<_>) = records.into_iter().map(|r| (r.dim, r.fact)).unzip();

    load_rows(warehouse, settings, &mut report, &dims)
        .await
        .context("loading video_dim")?;

    // A failed snapshot load does not block the handoff; load_rows has
    // already logged it and listed the table in report.failed_loads.
    if load_rows(warehouse, settings, &mut report, &facts).await.is_err() {
        tracing::warn!(job = "videos", "continuing without video_fact snapshot");
    }

    let channel_ids = dedupe_by(
        dims.iter().map(|d| d.channel_id.clone()).collect(),
        String::clone,
    );
    if settings.dry_run {
        tracing::info!(
            job = "videos",
            channels = channel_ids.len(),
            path = %settings.handoff_path.display(),
            "dry run: skipping handoff write"
        );
    } else {
        handoff::write_channel_ids(&settings.handoff_path, &channel_ids)
            .await
            .with_context(|| {
                format!(
                    "writing handoff file {}",
                    settings.handoff_path.display()
                )
            })?;
        tracing::info!(
            job = "videos",
            channels = channel_ids.len(),
            path = %settings.handoff_path.display(),
            "handoff written"
        );
        report.handoff = Some(channel_ids.len());
    }

    Ok(report)
}

#[cfg(test)]
#[path = "videos_test.rs"]
mod tests;
