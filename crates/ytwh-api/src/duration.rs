//! ISO-8601 duration strings (`contentDetails.duration`) to whole seconds.

use std::sync::LazyLock;

use regex::Regex;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;

static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)(?:\.\d+)?S)?)?$")
        .expect("valid ISO-8601 duration regex")
});

/// How day and week components are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationMode {
    /// Full length in seconds, days and weeks included.
    #[default]
    Total,
    /// Only the sub-day remainder (`total % 86_400`). Matches rows written by
    /// the legacy loader, which dropped the day component of anything 24h or
    /// longer.
    SubDay,
}

impl DurationMode {
    #[must_use]
    pub fn from_truncate_flag(truncate_days: bool) -> Self {
        if truncate_days {
            Self::SubDay
        } else {
            Self::Total
        }
    }
}

/// Parses `P[nW][nD][T[nH][nM][n[.f]S]]` into whole seconds.
///
/// Fractional seconds are dropped. Year and month designators are rejected
/// because they have no fixed length. Returns `None` for anything that does
/// not parse or carries no component at all (`"P"`, `"PT"`).
#[must_use]
pub fn parse_duration_seconds(raw: &str, mode: DurationMode) -> Option<i64> {
    let caps = ISO_DURATION.captures(raw.trim())?;
    if (1..=5).all(|i| caps.get(i).is_none()) {
        return None;
    }

    let component = |i: usize| -> Option<i64> {
        caps.get(i)
            .map_or(Some(0), |m| m.as_str().parse::<i64>().ok())
    };

    let total = component(1)?
        .checked_mul(SECONDS_PER_WEEK)?
        .checked_add(component(2)?.checked_mul(SECONDS_PER_DAY)?)?
        .checked_add(component(3)?.checked_mul(SECONDS_PER_HOUR)?)?
        .checked_add(component(4)?.checked_mul(SECONDS_PER_MINUTE)?)?
        .checked_add(component(5)?)?;

    Some(match mode {
        DurationMode::Total => total,
        DurationMode::SubDay => total % SECONDS_PER_DAY,
    })
}
