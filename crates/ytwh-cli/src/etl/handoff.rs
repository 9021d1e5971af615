//! The channel-ID handoff file the video job writes and the channel job reads.
//!
//! Plain text, one channel ID per line, no header. Each video run replaces
//! the whole file.

use std::io;
use std::path::{Path, PathBuf};

/// Replaces the handoff file with `ids`, one per line.
///
/// Writes to a sibling temporary file first and renames it over the target,
/// so a reader never sees a half-written list. Creates the parent directory
/// if needed.
pub(crate) async fn write_channel_ids(path: &Path, ids: &[String]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut contents = String::with_capacity(ids.iter().map(|id| id.len() + 1).sum());
    for id in ids {
        contents.push_str(id);
        contents.push('\n');
    }

    let tmp = temp_path(path);
    tokio::fs::write(&tmp, contents).await?;
    tokio::fs::rename(&tmp, path).await
}

/// Reads the handoff file. Returns `Ok(None)` if it does not exist.
///
/// Trailing whitespace is stripped from each line and blank lines are
/// skipped.
pub(crate) async fn read_channel_ids(path: &Path) -> io::Result<Option<Vec<String>>> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let ids = contents
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect();
    Ok(Some(ids))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
