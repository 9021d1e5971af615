//! Mapping of raw API records onto warehouse rows.
//!
//! Each mapper takes one raw item as returned by the client and either
//! produces a typed row or a [`MapError`] describing why the record is
//! malformed. Required fields are enforced by the serde schemas in
//! [`crate::types`]; the checks here cover the parts a job requested and
//! values that must parse (timestamps, durations, category IDs).
//!
//! Statistics counters the API leaves out are stored as `0`. A missing tag
//! list counts as zero tags.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use ytwh_core::{CategoryDimRow, ChannelDimRow, ChannelFactRow, VideoDimRow, VideoFactRow};

use crate::duration::{parse_duration_seconds, DurationMode};
use crate::error::MapError;
use crate::types::{CategoryResource, ChannelResource, VideoResource};

/// Both projections of one chart-listing video: the descriptive row and the
/// statistics snapshot taken in the same request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    pub dim: VideoDimRow,
    pub fact: VideoFactRow,
}

/// Parses an API timestamp (RFC 3339 with offset) into UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Maps a video requested with `snippet`, `contentDetails`, `status` and
/// `statistics` parts into both of its rows.
///
/// # Errors
///
/// Returns [`MapError`] if any required part or field is missing or invalid.
pub fn map_video(
    raw: &Value,
    collected_at: DateTime<Utc>,
    mode: DurationMode,
) -> Result<VideoRecord, MapError> {
    let video = decode_video(raw)?;
    Ok(VideoRecord {
        dim: video_dim(&video, mode)?,
        fact: video_fact(&video, collected_at)?,
    })
}

/// Maps a video requested with `snippet`, `contentDetails` and `status`.
#[cfg(test)]
pub(crate) fn map_video_dim(raw: &Value, mode: DurationMode) -> Result<VideoDimRow, MapError> {
    video_dim(&decode_video(raw)?, mode)
}

/// Maps a video requested with `statistics` into a snapshot row.
///
/// # Errors
///
/// Returns [`MapError`] if the record has no `id` or no `statistics` part.
pub fn map_video_fact(raw: &Value, collected_at: DateTime<Utc>) -> Result<VideoFactRow, MapError> {
    video_fact(&decode_video(raw)?, collected_at)
}

/// Maps a channel requested with `snippet`.
///
/// # Errors
///
/// Returns [`MapError`] if the snippet is missing or `publishedAt` does not parse.
pub fn map_channel_dim(raw: &Value) -> Result<ChannelDimRow, MapError> {
    let channel = ChannelResource::deserialize(raw).map_err(|source| MapError::Deserialize {
        resource: "channel",
        source,
    })?;
    let snippet = channel
        .snippet
        .as_ref()
        .ok_or_else(|| missing_part("channel", &channel.id, "snippet"))?;
    let created_datetime = parse_timestamp(&snippet.published_at).ok_or_else(|| {
        invalid_value("channel", &channel.id, "publishedAt", &snippet.published_at)
    })?;

    Ok(ChannelDimRow {
        channel_id: channel.id.clone(),
        created_datetime,
        channel_name: snippet.title.clone(),
    })
}

/// Maps a channel requested with `statistics` into a snapshot row.
///
/// # Errors
///
/// Returns [`MapError`] if the record has no `id` or no `statistics` part.
pub fn map_channel_fact(
    raw: &Value,
    collected_at: DateTime<Utc>,
) -> Result<ChannelFactRow, MapError> {
    let channel = ChannelResource::deserialize(raw).map_err(|source| MapError::Deserialize {
        resource: "channel",
        source,
    })?;
    let stats = channel
        .statistics
        .as_ref()
        .ok_or_else(|| missing_part("channel", &channel.id, "statistics"))?;

    Ok(ChannelFactRow {
        channel_id: channel.id.clone(),
        collected_at,
        total_views: stats.view_count.unwrap_or(0),
        num_subscribers: stats.subscriber_count.unwrap_or(0),
        num_videos: stats.video_count.unwrap_or(0),
    })
}

/// Maps a video category. The string ID becomes the integer key used by
/// `categories_dim` and `video_dim.category_id`.
///
/// # Errors
///
/// Returns [`MapError`] if the snippet is missing or the ID is not an integer.
pub fn map_category(raw: &Value) -> Result<CategoryDimRow, MapError> {
    let category = CategoryResource::deserialize(raw).map_err(|source| MapError::Deserialize {
        resource: "category",
        source,
    })?;
    let category_id = parse_category_id("category", &category.id, &category.id)?;
    let snippet = category
        .snippet
        .as_ref()
        .ok_or_else(|| missing_part("category", &category.id, "snippet"))?;

    Ok(CategoryDimRow {
        category_id,
        category_name: snippet.title.clone(),
    })
}

fn decode_video(raw: &Value) -> Result<VideoResource, MapError> {
    VideoResource::deserialize(raw).map_err(|source| MapError::Deserialize {
        resource: "video",
        source,
    })
}

fn video_dim(video: &VideoResource, mode: DurationMode) -> Result<VideoDimRow, MapError> {
    let id = video.id.as_str();
    let snippet = video
        .snippet
        .as_ref()
        .ok_or_else(|| missing_part("video", id, "snippet"))?;
    let details = video
        .content_details
        .as_ref()
        .ok_or_else(|| missing_part("video", id, "contentDetails"))?;
    let status = video
        .status
        .as_ref()
        .ok_or_else(|| missing_part("video", id, "status"))?;

    let published_at = parse_timestamp(&snippet.published_at)
        .ok_or_else(|| invalid_value("video", id, "publishedAt", &snippet.published_at))?;
    let duration_seconds = parse_duration_seconds(&details.duration, mode)
        .ok_or_else(|| invalid_value("video", id, "duration", &details.duration))?;
    let category_id = parse_category_id("video", id, &snippet.category_id)?;
    let num_tags = snippet
        .tags
        .as_ref()
        .map_or(0, |tags| i32::try_from(tags.len()).unwrap_or(i32::MAX));

    Ok(VideoDimRow {
        video_id: video.id.clone(),
        channel_id: snippet.channel_id.clone(),
        title: snippet.title.clone(),
        description: snippet.description.clone(),
        num_tags,
        duration_seconds,
        licensed_content: details.licensed_content,
        made_for_kids: status.made_for_kids,
        published_at,
        category_id,
    })
}

fn video_fact(video: &VideoResource, collected_at: DateTime<Utc>) -> Result<VideoFactRow, MapError> {
    let stats = video
        .statistics
        .as_ref()
        .ok_or_else(|| missing_part("video", &video.id, "statistics"))?;

    Ok(VideoFactRow {
        video_id: video.id.clone(),
        collected_at,
        num_views: stats.view_count.unwrap_or(0),
        num_likes: stats.like_count.unwrap_or(0),
        num_comments: stats.comment_count.unwrap_or(0),
    })
}

fn parse_category_id(resource: &'static str, id: &str, raw: &str) -> Result<i32, MapError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| invalid_value(resource, id, "categoryId", raw))
}

fn missing_part(resource: &'static str, id: &str, part: &'static str) -> MapError {
    MapError::MissingPart {
        resource,
        id: id.to_owned(),
        part,
    }
}

fn invalid_value(resource: &'static str, id: &str, field: &'static str, value: &str) -> MapError {
    MapError::InvalidValue {
        resource,
        id: id.to_owned(),
        field,
        value: value.to_owned(),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
