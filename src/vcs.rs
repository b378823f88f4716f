//! Version control internals that a sweep must never enter.

use std::path::Path;

/// VCS metadata directories. A `build` or `dist` inside one of these belongs
/// to the VCS, not to the project.
pub const VCS_INTERNALS: &[&str] = &[
    ".git", ".jj", ".svn", ".hg", ".bzr", "_darcs", ".pijul", "CVS", ".fossil",
];

/// Whether the final component of `path` names a VCS metadata directory
pub fn is_vcs_internal(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| VCS_INTERNALS.contains(&name))
}
