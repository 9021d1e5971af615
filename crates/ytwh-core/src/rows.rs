//! Typed rows for the five warehouse tables.
//!
//! Dimension rows are written once per natural key; fact rows are appended
//! once per collection cycle and share the cycle's `collected_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of `channel_dim`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDimRow {
    pub channel_id: String,
    /// The channel's `publishedAt` timestamp, normalized to UTC.
    pub created_datetime: DateTime<Utc>,
    pub channel_name: String,
}

/// One row of `channel_fact`, keyed by `(channel_id, collected_at)`.
///
/// Counts the API did not report are stored as `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelFactRow {
    pub channel_id: String,
    pub collected_at: DateTime<Utc>,
    pub total_views: i64,
    pub num_subscribers: i64,
    pub num_videos: i64,
}

/// One row of `video_dim`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDimRow {
    pub video_id: String,
    pub channel_id: String,
    pub title: String,
    pub description: String,
    /// Count of the snippet's tag list; `0` when the API omits the list.
    pub num_tags: i32,
    pub duration_seconds: i64,
    pub licensed_content: bool,
    pub made_for_kids: bool,
    pub published_at: DateTime<Utc>,
    pub category_id: i32,
}

/// One row of `video_fact`, keyed by `(video_id, collected_at)`.
///
/// Counts the API did not report are stored as `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoFactRow {
    pub video_id: String,
    pub collected_at: DateTime<Utc>,
    pub num_views: i64,
    pub num_likes: i64,
    pub num_comments: i64,
}

/// One row of `categories_dim`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDimRow {
    pub category_id: i32,
    pub category_name: String,
}
