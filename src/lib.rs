//! cachesweep - disposable artifact cleaner
//!
//! Removes build, test and cache artifacts (`__pycache__`, `.pytest_cache`,
//! `dist/`, `*.egg-info/`, ...) from a working tree. Patterns are matched on
//! base name only and come from the `patterns.toml` table compiled into the
//! binary. Removal is best-effort: failures are counted and logged at debug
//! level, never reported as errors.
//!
//! The companion help listing is rendered from `##` markers in a Makefile.

pub mod error;
pub mod help;
pub mod patterns;
pub mod sweeper;
pub mod vcs;

// Re-export commonly used items
pub use error::SweepError;
pub use help::{load_sources, render_help, BuildSource};
pub use patterns::{default_patterns, find_match, parse_patterns, ArtifactKind, SweepPattern};
pub use sweeper::{sweep, SweepReport};
