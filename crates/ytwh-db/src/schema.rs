//! Table and column names. SQL identifiers are only ever taken from here,
//! never from input.

pub const CHANNEL_FACT_TABLE: &str = "channel_fact";
pub const VIDEO_FACT_TABLE: &str = "video_fact";

/// A dimension table, keyed by a unique natural key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// `channel_dim`, keyed by `channel_id` (text).
    Channel,
    /// `video_dim`, keyed by `video_id` (text).
    Video,
    /// `categories_dim`, keyed by `category_id` (integer).
    Category,
}

impl Dimension {
    #[must_use]
    pub fn table(self) -> &'static str {
        match self {
            Dimension::Channel => "channel_dim",
            Dimension::Video => "video_dim",
            Dimension::Category => "categories_dim",
        }
    }

    #[must_use]
    pub fn key_column(self) -> &'static str {
        match self {
            Dimension::Channel => "channel_id",
            Dimension::Video => "video_id",
            Dimension::Category => "category_id",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_names() {
        assert_eq!(Dimension::Channel.table(), "channel_dim");
        assert_eq!(Dimension::Video.key_column(), "video_id");
        assert_eq!(Dimension::Category.table(), "categories_dim");
        assert_eq!(Dimension::Category.key_column(), "category_id");
        assert_eq!(Dimension::Video.to_string(), "video_dim");
    }
}
