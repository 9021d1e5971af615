//! Client for the video platform's public Data API.
//!
//! Fetches raw records page by page or in ID batches, and maps each raw
//! record onto a typed warehouse row. Transport failures are confined to the
//! batch or page they hit; a malformed record is confined to itself.

pub mod batching;
pub mod client;
pub mod duration;
pub mod error;
pub mod normalize;
pub mod types;

pub use batching::batches;
pub use client::{FetchOutcome, Resource, YoutubeClient};
pub use duration::{parse_duration_seconds, DurationMode};
pub use error::{ApiError, MapError};
pub use normalize::{
    map_category, map_channel_dim, map_channel_fact, map_video, map_video_fact,
    parse_timestamp, VideoRecord,
};
