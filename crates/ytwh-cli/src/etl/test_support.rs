//! Shared fixtures for the job tests: an in-memory warehouse, a client
//! pointed at wiremock, and raw API records.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use serde_json::{json, Value};
use wiremock::MockServer;
use ytwh_api::{DurationMode, YoutubeClient};
use ytwh_db::novelty::subtract;
use ytwh_db::{DbError, Dimension, NaturalKey, SinkRow, Warehouse};

use super::JobSettings;

/// Keeps keys as strings per dimension and records every inserted row's key
/// per table.
#[derive(Default)]
pub(crate) struct MemoryWarehouse {
    keys: Mutex<HashMap<Dimension, Vec<String>>>,
    inserted: Mutex<HashMap<&'static str, Vec<String>>>,
    failing_tables: HashSet<&'static str>,
}

impl MemoryWarehouse {
    pub(crate) fn with_keys(self, dimension: Dimension, keys: &[&str]) -> Self {
        self.keys
            .lock()
            .unwrap()
            .entry(dimension)
            .or_default()
            .extend(keys.iter().map(|k| (*k).to_owned()));
        self
    }

    /// Every insert into `table` fails as a rolled-back batch.
    pub(crate) fn failing_on(mut self, table: &'static str) -> Self {
        self.failing_tables.insert(table);
        self
    }

    /// Keys of rows inserted into `table`, in insert order.
    pub(crate) fn inserted(&self, table: &str) -> Vec<String> {
        self.inserted
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    fn existing<K: NaturalKey>(&self, dimension: Dimension) -> Vec<K> {
        self.keys
            .lock()
            .unwrap()
            .get(&dimension)
            .map(|keys| keys.iter().filter_map(|k| k.parse().ok()).collect())
            .unwrap_or_default()
    }
}

impl Warehouse for MemoryWarehouse {
    async fn not_in_table<K: NaturalKey>(
        &self,
        dimension: Dimension,
        candidates: &[K],
    ) -> Result<Vec<K>, DbError> {
        let existing: HashSet<K> = self.existing(dimension).into_iter().collect();
        Ok(subtract(candidates, &existing))
    }

    async fn all_keys<K: NaturalKey>(&self, dimension: Dimension) -> Result<Vec<K>, DbError> {
        Ok(self.existing(dimension))
    }

    async fn insert_rows<R: SinkRow>(&self, rows: &[R]) -> Result<u64, DbError> {
        if rows.is_empty() {
            return Ok(0);
        }
        if self.failing_tables.contains(R::TABLE) {
            return Err(DbError::Insert {
                table: R::TABLE,
                rows: rows.len(),
                source: sqlx::Error::Protocol("simulated constraint violation".to_owned()),
            });
        }

        let keys: Vec<String> = rows.iter().map(|r| r.natural_key().to_string()).collect();
        if let Some(dimension) = R::DIMENSION {
            self.keys
                .lock()
                .unwrap()
                .entry(dimension)
                .or_default()
                .extend(keys.iter().cloned());
        }
        self.inserted
            .lock()
            .unwrap()
            .entry(R::TABLE)
            .or_default()
            .extend(keys);

        Ok(rows.len() as u64)
    }
}

pub(crate) fn test_client(server: &MockServer) -> YoutubeClient {
    YoutubeClient::with_base_url("test-key", 5, "ytwh-test/0.1", &server.uri())
        .expect("client construction should not fail")
}

pub(crate) fn test_settings(dir: &Path) -> JobSettings {
    JobSettings {
        region_code: "US".to_owned(),
        language: "en".to_owned(),
        batch_size: 50,
        handoff_path: dir.join("unique_channel_ids.txt"),
        duration_mode: DurationMode::Total,
        dry_run: false,
    }
}

pub(crate) fn list_body(items: Vec<Value>) -> Value {
    json!({ "kind": "youtube#listResponse", "items": items })
}

/// A chart video with every part the video job requests.
pub(crate) fn video_item(video_id: &str, channel_id: &str) -> Value {
    json!({
        "id": video_id,
        "snippet": {
            "publishedAt": "2024-03-01T17:00:08Z",
            "channelId": channel_id,
            "title": format!("Video {video_id}"),
            "description": "",
            "tags": ["a", "b"],
            "categoryId": "10"
        },
        "contentDetails": { "duration": "PT4M13S", "licensedContent": true },
        "status": { "madeForKids": false },
        "statistics": { "viewCount": "1000", "likeCount": "50", "commentCount": "5" }
    })
}

pub(crate) fn channel_item(channel_id: &str) -> Value {
    json!({
        "id": channel_id,
        "snippet": {
            "title": format!("Channel {channel_id}"),
            "publishedAt": "2012-06-10T04:35:26Z"
        }
    })
}

pub(crate) fn statistics_item(id: &str) -> Value {
    json!({
        "id": id,
        "statistics": {
            "viewCount": "900",
            "likeCount": "12",
            "subscriberCount": "40",
            "videoCount": "7"
        }
    })
}

pub(crate) fn category_item(id: &str, title: &str) -> Value {
    json!({ "id": id, "snippet": { "title": title, "assignable": true } })
}
