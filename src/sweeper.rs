//! Pattern-driven artifact removal.
//!
//! A sweep runs one depth-first walk per pattern, in pattern order. Each walk
//! collects the entries whose base name matches, without descending into a
//! matched directory, and then removes them. Every filesystem failure along
//! the way is suppressed: it is counted in the [`SweepReport`] and logged at
//! debug level, and the sweep carries on with the next match and the next
//! pattern. A sweep never fails.

use crate::error::{Result, SweepError};
use crate::patterns::SweepPattern;
use crate::vcs::is_vcs_internal;

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, debug_span};
use walkdir::{DirEntry, FilterEntry, WalkDir};

/// Outcome of one sweep across all patterns
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Entries (files, directories, symlinks) removed
    pub removed: usize,
    /// Bytes held by removed entries, measured before removal
    pub reclaimed_bytes: u64,
    /// Failures swallowed while locating or removing matches
    pub suppressed_errors: usize,
}

impl SweepReport {
    fn suppress(&mut self, err: SweepError) {
        debug!(error = %err, "suppressed");
        self.suppressed_errors += 1;
    }
}

/// A filesystem entry slated for removal
#[derive(Debug)]
struct Match {
    path: PathBuf,
    is_dir: bool,
}

type EntryFilter = fn(&DirEntry) -> bool;

// Never traverse VCS internals
fn outside_vcs(entry: &DirEntry) -> bool {
    entry.depth() == 0 || !is_vcs_internal(entry.path())
}

/// Depth-first walk that yields a directory matching the pattern but never
/// enters it.
struct PrunedWalk<'a> {
    it: FilterEntry<walkdir::IntoIter, EntryFilter>,
    pattern: &'a SweepPattern,
}

impl<'a> PrunedWalk<'a> {
    fn new(root: &Path, pattern: &'a SweepPattern) -> Self {
        let it = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(outside_vcs as EntryFilter);

        PrunedWalk { it, pattern }
    }
}

impl Iterator for PrunedWalk<'_> {
    type Item = walkdir::Result<DirEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.it.next()?;

        if let Ok(entry) = &next {
            if entry.depth() > 0
                && entry.file_type().is_dir()
                && self.pattern.matches_path(entry.path())
            {
                self.it.skip_current_dir();
            }
        }

        Some(next)
    }
}

/// Remove every entry under `root` whose base name matches one of `patterns`.
pub fn sweep(root: &Path, patterns: &[SweepPattern]) -> SweepReport {
    let mut report = SweepReport::default();

    for pattern in patterns {
        let _span = debug_span!("pattern", pattern = %pattern).entered();
        let matches = collect_matches(root, pattern, &mut report);
        debug!(count = matches.len(), "matched");
        remove_matches(matches, &mut report);
    }

    report
}

/// Collect the entries under `root` matching `pattern`. Nothing beneath a
/// matched directory is visited.
fn collect_matches(root: &Path, pattern: &SweepPattern, report: &mut SweepReport) -> Vec<Match> {
    let mut matches = Vec::new();

    for result in PrunedWalk::new(root, pattern) {
        let entry = match result {
            Ok(entry) => entry,
            Err(source) => {
                report.suppress(walk_error(root, source));
                continue;
            }
        };

        // Never treat the sweep root itself as an artifact
        if entry.depth() == 0 || !pattern.matches_path(entry.path()) {
            continue;
        }

        // Not followed, so a symlink to a directory is not a directory here
        let is_dir = entry.file_type().is_dir();
        if pattern.dir_only && !is_dir {
            continue;
        }

        matches.push(Match {
            path: entry.into_path(),
            is_dir,
        });
    }

    matches
}

/// Remove collected matches. A failed removal never stops the rest.
fn remove_matches(matches: Vec<Match>, report: &mut SweepReport) {
    for found in matches {
        let size = entry_size(&found);
        match remove_match(&found) {
            Ok(()) => {
                debug!(path = %found.path.display(), bytes = size, "removed");
                report.removed += 1;
                report.reclaimed_bytes += size;
            }
            Err(err) => report.suppress(err),
        }
    }
}

fn walk_error(root: &Path, source: walkdir::Error) -> SweepError {
    let path = source.path().unwrap_or(root).to_path_buf();
    SweepError::Walk { path, source }
}

fn remove_match(found: &Match) -> Result<()> {
    let removal = if found.is_dir {
        fs::remove_dir_all(&found.path)
    } else {
        // Files and symlinks alike; a symlink's target is left alone
        fs::remove_file(&found.path)
    };

    removal.map_err(|source| SweepError::Remove {
        path: found.path.clone(),
        source,
    })
}

/// Best-effort size of a match. Symlinks are not followed.
fn entry_size(found: &Match) -> u64 {
    if !found.is_dir {
        return fs::symlink_metadata(&found.path)
            .map(|m| m.len())
            .unwrap_or(0);
    }

    WalkDir::new(&found.path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}
