//! Category job: the region's category listing into `categories_dim`.

use anyhow::Context;
use ytwh_api::{map_category, Resource, YoutubeClient};
use ytwh_core::CategoryDimRow;
use ytwh_db::{Dimension, Warehouse};

use super::{dedupe_by, load_rows, map_records, restrict_to, Job, JobReport, JobSettings};

pub(super) async fn run<W: Warehouse>(
    client: &YoutubeClient,
    warehouse: &W,
    settings: &JobSettings,
) -> anyhow::Result<JobReport> {
    let mut report = JobReport::new(Job::Categories);

    let params = [
        ("part", "snippet"),
        ("regionCode", settings.region_code.as_str()),
        ("hl", settings.language.as_str()),
    ];
    let fetched = client
        .fetch_paginated(Resource::VideoCategories, &params)
        .await;
    report.extracted = fetched.items.len();
    report.failed_requests = fetched.failed_requests;

    let rows = map_records(&mut report, &fetched.items, map_category);
    let rows = dedupe_by(rows, |r: &CategoryDimRow| r.category_id);

    let candidates: Vec<i32> = rows.iter().map(|r| r.category_id).collect();
    let novel = warehouse
        .not_in_table(Dimension::Category, &candidates)
        .await
        .context("novelty filter on categories_dim")?;
    report.novel = Some(novel.len());
    tracing::info!(
        job = "categories",
        candidates = candidates.len(),
        novel = novel.len(),
        "novelty filter applied"
    );

    let rows = restrict_to(rows, &novel, |r: &CategoryDimRow| r.category_id);
    load_rows(warehouse, settings, &mut report, &rows)
        .await
        .context("loading categories_dim")?;

    Ok(report)
}

#[cfg(test)]
#[path = "categories_test.rs"]
mod tests;
