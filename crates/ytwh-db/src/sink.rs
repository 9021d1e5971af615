//! Row sink: all-or-nothing bulk inserts of typed rows.
//!
//! Every row type is written with a single `INSERT … SELECT * FROM
//! UNNEST(…)` statement, one array parameter per column, so the whole batch
//! is one round-trip and one transaction regardless of its size.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{PgPool, Postgres};
use ytwh_core::{CategoryDimRow, ChannelDimRow, ChannelFactRow, VideoDimRow, VideoFactRow};

use crate::novelty::NaturalKey;
use crate::schema::{Dimension, CHANNEL_FACT_TABLE, VIDEO_FACT_TABLE};
use crate::DbError;

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// A row type the sink knows how to write.
pub trait SinkRow: Sized {
    type Key: NaturalKey;

    const TABLE: &'static str;
    /// Column names in insert order.
    const COLUMNS: &'static [&'static str];
    /// The dimension this row populates; `None` for fact rows.
    const DIMENSION: Option<Dimension>;
    const INSERT_SQL: &'static str;

    /// The entity key: the dimension's natural key, or for fact rows the key
    /// of the entity measured.
    fn natural_key(&self) -> Self::Key;

    /// Binds one array per column, in [`SinkRow::COLUMNS`] order.
    fn bind_columns<'q>(query: PgQuery<'q>, rows: &[Self]) -> PgQuery<'q>;
}

/// Inserts `rows` into `R::TABLE` in one statement inside one transaction.
///
/// Returns the number of rows written. On any failure the transaction is
/// rolled back and nothing from the batch is persisted. An empty batch is a
/// no-op.
///
/// # Errors
///
/// Returns [`DbError::Insert`] carrying the table and attempted row count.
pub async fn insert_rows<R: SinkRow>(pool: &PgPool, rows: &[R]) -> Result<u64, DbError> {
    if rows.is_empty() {
        return Ok(0);
    }

    let insert_error = |source: sqlx::Error| DbError::Insert {
        table: R::TABLE,
        rows: rows.len(),
        source,
    };

    let mut tx = pool.begin().await.map_err(insert_error)?;
    let query = R::bind_columns(sqlx::query(R::INSERT_SQL), rows);

    match query.execute(&mut *tx).await {
        Ok(result) => {
            tx.commit().await.map_err(insert_error)?;
            tracing::debug!(table = R::TABLE, rows = result.rows_affected(), "rows inserted");
            Ok(result.rows_affected())
        }
        Err(source) => {
            if let Err(e) = tx.rollback().await {
                tracing::warn!(table = R::TABLE, error = %e, "rollback failed");
            }
            Err(insert_error(source))
        }
    }
}

impl SinkRow for ChannelDimRow {
    type Key = String;

    const TABLE: &'static str = "channel_dim";
    const COLUMNS: &'static [&'static str] = &["channel_id", "created_datetime", "channel_name"];
    const DIMENSION: Option<Dimension> = Some(Dimension::Channel);
    const INSERT_SQL: &'static str = "INSERT INTO channel_dim \
             (channel_id, created_datetime, channel_name) \
         SELECT * FROM UNNEST($1::text[], $2::timestamptz[], $3::text[])";

    fn natural_key(&self) -> String {
        self.channel_id.clone()
    }

    fn bind_columns<'q>(query: PgQuery<'q>, rows: &[Self]) -> PgQuery<'q> {
        let mut channel_ids: Vec<String> = Vec::with_capacity(rows.len());
        let mut created: Vec<DateTime<Utc>> = Vec::with_capacity(rows.len());
        let mut names: Vec<String> = Vec::with_capacity(rows.len());

        for row in rows {
            channel_ids.push(row.channel_id.clone());
            created.push(row.created_datetime);
            names.push(row.channel_name.clone());
        }

        query.bind(channel_ids).bind(created).bind(names)
    }
}

impl SinkRow for ChannelFactRow {
    type Key = String;

    const TABLE: &'static str = CHANNEL_FACT_TABLE;
    const COLUMNS: &'static [&'static str] = &[
        "channel_id",
        "collected_at",
        "total_views",
        "num_subscribers",
        "num_videos",
    ];
    const DIMENSION: Option<Dimension> = None;
    const INSERT_SQL: &'static str = "INSERT INTO channel_fact \
             (channel_id, collected_at, total_views, num_subscribers, num_videos) \
         SELECT * FROM UNNEST($1::text[], $2::timestamptz[], $3::int8[], $4::int8[], $5::int8[])";

    fn natural_key(&self) -> String {
        self.channel_id.clone()
    }

    fn bind_columns<'q>(query: PgQuery<'q>, rows: &[Self]) -> PgQuery<'q> {
        let mut channel_ids: Vec<String> = Vec::with_capacity(rows.len());
        let mut collected: Vec<DateTime<Utc>> = Vec::with_capacity(rows.len());
        let mut views: Vec<i64> = Vec::with_capacity(rows.len());
        let mut subscribers: Vec<i64> = Vec::with_capacity(rows.len());
        let mut videos: Vec<i64> = Vec::with_capacity(rows.len());

        for row in rows {
            channel_ids.push(row.channel_id.clone());
            collected.push(row.collected_at);
            views.push(row.total_views);
            subscribers.push(row.num_subscribers);
            videos.push(row.num_videos);
        }

        query
            .bind(channel_ids)
            .bind(collected)
            .bind(views)
            .bind(subscribers)
            .bind(videos)
    }
}

impl SinkRow for VideoDimRow {
    type Key = String;

    const TABLE: &'static str = "video_dim";
    const COLUMNS: &'static [&'static str] = &[
        "video_id",
        "channel_id",
        "title",
        "description",
        "num_tags",
        "duration_seconds",
        "licensed_content",
        "made_for_kids",
        "published_at",
        "category_id",
    ];
    const DIMENSION: Option<Dimension> = Some(Dimension::Video);
    const INSERT_SQL: &'static str = "INSERT INTO video_dim \
             (video_id, channel_id, title, description, num_tags, duration_seconds, \
              licensed_content, made_for_kids, published_at, category_id) \
         SELECT * FROM UNNEST(\
              $1::text[], $2::text[], $3::text[], $4::text[], $5::int4[], $6::int8[], \
              $7::bool[], $8::bool[], $9::timestamptz[], $10::int4[])";

    fn natural_key(&self) -> String {
        self.video_id.clone()
    }

    fn bind_columns<'q>(query: PgQuery<'q>, rows: &[Self]) -> PgQuery<'q> {
        let mut video_ids: Vec<String> = Vec::with_capacity(rows.len());
        let mut channel_ids: Vec<String> = Vec::with_capacity(rows.len());
        let mut titles: Vec<String> = Vec::with_capacity(rows.len());
        let mut descriptions: Vec<String> = Vec::with_capacity(rows.len());
        let mut tag_counts: Vec<i32> = Vec::with_capacity(rows.len());
        let mut durations: Vec<i64> = Vec::with_capacity(rows.len());
        let mut licensed: Vec<bool> = Vec::with_capacity(rows.len());
        let mut for_kids: Vec<bool> = Vec::with_capacity(rows.len());
        let mut published: Vec<DateTime<Utc>> = Vec::with_capacity(rows.len());
        let mut category_ids: Vec<i32> = Vec::with_capacity(rows.len());

        for row in rows {
            video_ids.push(row.video_id.clone());
            channel_ids.push(row.channel_id.clone());
            titles.push(row.title.clone());
            descriptions.push(row.description.clone());
            tag_counts.push(row.num_tags);
            durations.push(row.duration_seconds);
            licensed.push(row.licensed_content);
            for_kids.push(row.made_for_kids);
            published.push(row.published_at);
            category_ids.push(row.category_id);
        }

        query
            .bind(video_ids)
            .bind(channel_ids)
            .bind(titles)
            .bind(descriptions)
            .bind(tag_counts)
            .bind(durations)
            .bind(licensed)
            .bind(for_kids)
            .bind(published)
            .bind(category_ids)
    }
}

impl SinkRow for VideoFactRow {
    type Key = String;

    const TABLE: &'static str = VIDEO_FACT_TABLE;
    const COLUMNS: &'static [&'static str] = &[
        "video_id",
        "collected_at",
        "num_views",
        "num_likes",
        "num_comments",
    ];
    const DIMENSION: Option<Dimension> = None;
    const INSERT_SQL: &'static str = "INSERT INTO video_fact \
             (video_id, collected_at, num_views, num_likes, num_comments) \
         SELECT * FROM UNNEST($1::text[], $2::timestamptz[], $3::int8[], $4::int8[], $5::int8[])";

    fn natural_key(&self) -> String {
        self.video_id.clone()
    }

    fn bind_columns<'q>(query: PgQuery<'q>, rows: &[Self]) -> PgQuery<'q> {
        let mut video_ids: Vec<String> = Vec::with_capacity(rows.len());
        let mut collected: Vec<DateTime<Utc>> = Vec::with_capacity(rows.len());
        let mut views: Vec<i64> = Vec::with_capacity(rows.len());
        let mut likes: Vec<i64> = Vec::with_capacity(rows.len());
        let mut comments: Vec<i64> = Vec::with_capacity(rows.len());

        for row in rows {
            video_ids.push(row.video_id.clone());
            collected.push(row.collected_at);
            views.push(row.num_views);
            likes.push(row.num_likes);
            comments.push(row.num_comments);
        }

        query
            .bind(video_ids)
            .bind(collected)
            .bind(views)
            .bind(likes)
            .bind(comments)
    }
}

impl SinkRow for CategoryDimRow {
    type Key = i32;

    const TABLE: &'static str = "categories_dim";
    const COLUMNS: &'static [&'static str] = &["category_id", "category_name"];
    const DIMENSION: Option<Dimension> = Some(Dimension::Category);
    const INSERT_SQL: &'static str = "INSERT INTO categories_dim (category_id, category_name) \
         SELECT * FROM UNNEST($1::int4[], $2::text[])";

    fn natural_key(&self) -> i32 {
        self.category_id
    }

    fn bind_columns<'q>(query: PgQuery<'q>, rows: &[Self]) -> PgQuery<'q> {
        let mut ids: Vec<i32> = Vec::with_capacity(rows.len());
        let mut names: Vec<String> = Vec::with_capacity(rows.len());

        for row in rows {
            ids.push(row.category_id);
            names.push(row.category_name.clone());
        }

        query.bind(ids).bind(names)
    }
}

#[cfg(test)]
#[path = "sink_test.rs"]
mod tests;
