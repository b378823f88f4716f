//! Sweep pattern loading and base-name matching from patterns.toml.

use anyhow::{bail, Context, Result};
use glob::{Pattern, PatternError};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Classification of a swept artifact. Only used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Cache,    // Test runner and notebook caches (__pycache__, .pytest_cache)
    Temp,     // OS metadata files (.DS_Store)
    Bytecode, // Compiled bytecode (*.pyc, *.pyo, *.pyd)
    Tooling,  // Type checker, linter and preprocessor caches
    Build,    // Build output (dist, build)
    Metadata, // Packaging metadata (*.egg-info)
}

impl ArtifactKind {
    fn from_key(key: &str) -> Self {
        match key {
            "cache" => ArtifactKind::Cache,
            "temp" => ArtifactKind::Temp,
            "bytecode" => ArtifactKind::Bytecode,
            "tooling" => ArtifactKind::Tooling,
            "build" => ArtifactKind::Build,
            "metadata" => ArtifactKind::Metadata,
            _ => {
                tracing::warn!(group = key, "unknown artifact group, defaulting to cache");
                ArtifactKind::Cache
            }
        }
    }
}

/// A single sweep pattern as written in patterns.toml, plus its parsed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepPattern {
    /// The pattern exactly as authored, e.g. `*.egg-info/`
    pub raw: String,
    /// The base-name glob with any trailing `/` removed
    pub glob: Pattern,
    /// Trailing `/` in the authored pattern: only real directories match
    pub dir_only: bool,
    pub kind: ArtifactKind,
}

impl SweepPattern {
    pub fn new(raw: &str, kind: ArtifactKind) -> std::result::Result<Self, PatternError> {
        let (glob, dir_only) = match raw.strip_suffix('/') {
            Some(stripped) => (stripped, true),
            None => (raw, false),
        };

        Ok(SweepPattern {
            raw: raw.to_string(),
            glob: Pattern::new(glob)?,
            dir_only,
            kind,
        })
    }

    /// Match a base name against this pattern's glob.
    /// Does not look at the filesystem, so `dir_only` is the caller's concern.
    pub fn matches_name(&self, name: &str) -> bool {
        self.glob.matches(name)
    }

    /// Match the final component of `path`. Paths without a file name
    /// (`/`, `..`) never match.
    pub fn matches_path(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|f| self.matches_name(&f.to_string_lossy()))
    }
}

impl fmt::Display for SweepPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Structure to deserialize sweep patterns from TOML
#[derive(Debug, Deserialize)]
struct PatternTable {
    order: Vec<String>,
    #[serde(flatten)]
    groups: HashMap<String, PatternGroup>,
}

#[derive(Debug, Deserialize)]
struct PatternGroup {
    patterns: Vec<String>,
}

// Embed the TOML file directly in the binary at compile time
const PATTERNS_TOML: &str = include_str!("../patterns.toml");

/// Parse sweep patterns from TOML content, in sweep order.
pub fn parse_patterns(content: &str) -> Result<Vec<SweepPattern>> {
    let mut table: PatternTable =
        toml::from_str(content).context("Failed to parse sweep patterns TOML")?;

    let mut patterns = Vec::new();

    for key in &table.order {
        let group = match table.groups.remove(key) {
            Some(group) => group,
            None => bail!("Pattern group '{}' is listed in order but not defined", key),
        };

        let kind = ArtifactKind::from_key(key);
        for raw in &group.patterns {
            let pattern = SweepPattern::new(raw, kind)
                .with_context(|| format!("Invalid pattern '{}' in group '{}'", raw, key))?;
            patterns.push(pattern);
        }
    }

    // Every defined group must be reachable through `order`
    if let Some(orphan) = table.groups.keys().next() {
        bail!("Pattern group '{}' is defined but missing from order", orphan);
    }

    Ok(patterns)
}

/// Load the default sweep patterns embedded in the binary
pub fn default_patterns() -> Result<Vec<SweepPattern>> {
    parse_patterns(PATTERNS_TOML)
}

/// Check whether a path's base name matches any of the patterns.
/// Returns the first matching pattern in sweep order.
pub fn find_match<'a>(path: &Path, patterns: &'a [SweepPattern]) -> Option<&'a SweepPattern> {
    patterns.iter().find(|p| p.matches_path(path))
}
