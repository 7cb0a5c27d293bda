//! Input discovery and window planning.

use crate::config::OUTPUT_SUFFIX;
use std::ffi::OsString;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// The files found directly inside an input directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Files to convert, sorted by file name
    pub eligible: Vec<PathBuf>,
    /// Regular files without the recognised extension
    pub skipped: Vec<PathBuf>,
}

/// List the direct children of `dir` in file-name order and split them
/// into eligible inputs and skipped files.
///
/// Subdirectories are ignored. Entries that cannot be read are reported
/// and left out; they never fail the listing.
pub fn discover(dir: &Path, extension: &str) -> Discovery {
    let mut found = Discovery::default();
    let suffix = format!(".{extension}");

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "could not read directory entry");
                continue;
            }
        };
        let path = entry.into_path();

        if !path.is_file() {
            debug!(path = %path.display(), "not a regular file, ignoring");
            continue;
        }
        if has_suffix(&path, &suffix) {
            found.eligible.push(path);
        } else {
            info!(file = %path.display(), "will skip file");
            found.skipped.push(path);
        }
    }

    found
}

/// Name-suffix match, so a bare `.log` counts as a log file.
fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .map_or(false, |name| name.to_string_lossy().ends_with(suffix))
}

/// Split `files` into consecutive, non-overlapping windows of `limit`.
/// The last window may be shorter.
pub fn plan_windows(files: &[PathBuf], limit: NonZeroUsize) -> std::slice::Chunks<'_, PathBuf> {
    files.chunks(limit.get())
}

/// `<input>.csv`, next to the input.
pub fn output_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".");
    name.push(OUTPUT_SUFFIX);
    PathBuf::from(name)
}
