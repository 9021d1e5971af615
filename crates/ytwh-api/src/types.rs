//! Data API response schemas.
//!
//! Every list endpoint wraps its results in the same envelope: an `items`
//! array and, for paginated listings, a `nextPageToken`. [`ListResponse`]
//! keeps the items as raw JSON so each one can be mapped (or rejected) on its
//! own. The resource structs below describe one item; every `part` is
//! optional because each job asks for a different subset of parts.

use serde::{Deserialize, Deserializer};

/// Envelope shared by the `videos`, `channels` and `videoCategories` endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
    /// Present only when another page follows.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

// ---------------------------------------------------------------------------
// videos
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResource {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<VideoSnippet>,
    #[serde(default)]
    pub content_details: Option<VideoContentDetails>,
    #[serde(default)]
    pub status: Option<VideoStatus>,
    #[serde(default)]
    pub statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    /// RFC 3339 timestamp with offset, e.g. `"2024-03-01T17:00:08Z"`.
    pub published_at: String,
    pub channel_id: String,
    pub title: String,
    pub description: String,
    /// Omitted entirely by the API when the uploader set no tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Numeric category ID carried as a string, e.g. `"10"`.
    pub category_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContentDetails {
    /// ISO-8601 duration, e.g. `"PT4M13S"`.
    pub duration: String,
    pub licensed_content: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatus {
    pub made_for_kids: bool,
}

/// Engagement counters. Any of them may be absent (hidden likes, disabled
/// comments); absent means "not reported".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default, deserialize_with = "count")]
    pub view_count: Option<i64>,
    #[serde(default, deserialize_with = "count")]
    pub like_count: Option<i64>,
    #[serde(default, deserialize_with = "count")]
    pub comment_count: Option<i64>,
}

// ---------------------------------------------------------------------------
// channels
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResource {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<ChannelSnippet>,
    #[serde(default)]
    pub statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnippet {
    pub title: String,
    pub published_at: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    #[serde(default, deserialize_with = "count")]
    pub view_count: Option<i64>,
    /// Absent when the channel hides its subscriber count.
    #[serde(default, deserialize_with = "count")]
    pub subscriber_count: Option<i64>,
    #[serde(default, deserialize_with = "count")]
    pub video_count: Option<i64>,
}

// ---------------------------------------------------------------------------
// videoCategories
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CategoryResource {
    /// Numeric ID carried as a string, e.g. `"10"`.
    pub id: String,
    #[serde(default)]
    pub snippet: Option<CategorySnippet>,
}

#[derive(Debug, Deserialize)]
pub struct CategorySnippet {
    pub title: String,
}

/// Counters arrive as decimal strings (`"12345"`); numbers are accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Text(String),
    Number(i64),
}

fn count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawCount>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawCount::Number(n)) => Ok(Some(n)),
        Some(RawCount::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid count \"{s}\": {e}"))),
    }
}
