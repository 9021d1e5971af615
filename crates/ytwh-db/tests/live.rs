//! Live integration tests for ytwh-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/ytwh-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use chrono::{DateTime, TimeZone, Utc};
use ytwh_core::{CategoryDimRow, ChannelDimRow, ChannelFactRow, VideoDimRow, VideoFactRow};
use ytwh_db::{all_keys, insert_rows, not_in_table, ping, DbError, Dimension, Warehouse};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ts(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
}

fn video(video_id: &str, channel_id: &str) -> VideoDimRow {
    VideoDimRow {
        video_id: video_id.to_string(),
        channel_id: channel_id.to_string(),
        title: format!("Video {video_id}"),
        description: String::new(),
        num_tags: 2,
        duration_seconds: 213,
        licensed_content: true,
        made_for_kids: false,
        published_at: ts(1),
        category_id: 10,
    }
}

fn channel(channel_id: &str) -> ChannelDimRow {
    ChannelDimRow {
        channel_id: channel_id.to_string(),
        created_datetime: ts(1),
        channel_name: format!("Channel {channel_id}"),
    }
}

async fn count(pool: &sqlx::PgPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap_or_else(|e| panic!("count({table}) failed: {e}"))
}

// ---------------------------------------------------------------------------
// Section 1: Pool
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn ping_succeeds(pool: sqlx::PgPool) {
    ping(&pool).await.expect("ping failed");
}

// ---------------------------------------------------------------------------
// Section 2: Novelty filter
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn not_in_table_returns_candidates_minus_existing(pool: sqlx::PgPool) {
    insert_rows(&pool, &[video("a", "UC1"), video("c", "UC1")])
        .await
        .expect("seed insert failed");

    let candidates: Vec<String> = ["a", "b", "c", "d", "b"]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    let novel = not_in_table(&pool, Dimension::Video, &candidates)
        .await
        .expect("not_in_table failed");

    assert_eq!(novel, vec!["b".to_string(), "d".to_string()]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn not_in_table_empty_input(pool: sqlx::PgPool) {
    let novel = not_in_table::<String>(&pool, Dimension::Channel, &[])
        .await
        .expect("not_in_table failed");
    assert!(novel.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn category_keys_compare_as_integers(pool: sqlx::PgPool) {
    let rows = vec![
        CategoryDimRow {
            category_id: 1,
            category_name: "Film & Animation".to_string(),
        },
        CategoryDimRow {
            category_id: 10,
            category_name: "Music".to_string(),
        },
    ];
    insert_rows(&pool, &rows).await.expect("insert failed");

    let novel = not_in_table(&pool, Dimension::Category, &[1, 2, 10, 24])
        .await
        .expect("not_in_table failed");
    assert_eq!(novel, vec![2, 24]);

    let keys: Vec<i32> = all_keys(&pool, Dimension::Category)
        .await
        .expect("all_keys failed");
    assert_eq!(keys, vec![1, 10]);
}

// ---------------------------------------------------------------------------
// Section 3: Row sink
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn insert_rows_writes_every_column(pool: sqlx::PgPool) {
    let written = insert_rows(&pool, &[video("v1", "UC1")])
        .await
        .expect("insert failed");
    assert_eq!(written, 1);

    let (title, duration, category): (String, i64, i32) = sqlx::query_as(
        "SELECT title, duration_seconds, category_id FROM video_dim WHERE video_id = $1",
    )
    .bind("v1")
    .fetch_one(&pool)
    .await
    .expect("select failed");

    assert_eq!(title, "Video v1");
    assert_eq!(duration, 213);
    assert_eq!(category, 10);
}

#[sqlx::test(migrations = "../../migrations")]
async fn insert_rows_is_all_or_nothing(pool: sqlx::PgPool) {
    insert_rows(&pool, &[channel("UC1")])
        .await
        .expect("seed insert failed");

    // UC1 collides with the seeded row; UC2 must not be written either.
    let err = insert_rows(&pool, &[channel("UC2"), channel("UC1")])
        .await
        .expect_err("duplicate key should fail");

    assert!(
        matches!(
            err,
            DbError::Insert {
                table: "channel_dim",
                rows: 2,
                ..
            }
        ),
        "got: {err:?}"
    );
    assert_eq!(count(&pool, "channel_dim").await, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn fact_rows_append_per_collection(pool: sqlx::PgPool) {
    insert_rows(&pool, &[channel("UC1")])
        .await
        .expect("seed insert failed");

    for day in [2, 3] {
        let fact = ChannelFactRow {
            channel_id: "UC1".to_string(),
            collected_at: ts(day),
            total_views: 100 * i64::from(day),
            num_subscribers: 5,
            num_videos: 1,
        };
        insert_rows(&pool, &[fact])
            .await
            .expect("fact insert failed");
    }

    assert_eq!(count(&pool, "channel_fact").await, 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn empty_batch_is_a_no_op(pool: sqlx::PgPool) {
    let written = insert_rows::<VideoFactRow>(&pool, &[])
        .await
        .expect("empty insert failed");
    assert_eq!(written, 0);
}

// ---------------------------------------------------------------------------
// Section 4: Warehouse trait over PgPool
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn warehouse_impl_delegates_to_pool(pool: sqlx::PgPool) {
    let store: &sqlx::PgPool = &pool;

    store
        .insert_rows(&[video("v1", "UC1")])
        .await
        .expect("insert failed");
    let facts = vec![VideoFactRow {
        video_id: "v1".to_string(),
        collected_at: ts(2),
        num_views: 10,
        num_likes: 1,
        num_comments: 0,
    }];
    store.insert_rows(&facts).await.expect("fact insert failed");

    let keys: Vec<String> = store
        .all_keys(Dimension::Video)
        .await
        .expect("all_keys failed");
    assert_eq!(keys, vec!["v1".to_string()]);

    let novel = store
        .not_in_table(Dimension::Video, &keys)
        .await
        .expect("not_in_table failed");
    assert!(novel.is_empty());
}
