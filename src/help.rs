//! Usage listing built from `##` markers in a build definition.

use std::fs;
use std::path::{Path, PathBuf};

/// Token that flags a line for the usage listing
pub const DOC_MARKER: &str = "##";

/// Build definition consulted when none is named
pub const DEFAULT_BUILD_FILE: &str = "Makefile";

const HEADER: &str = "Usage: make [target]\n\nTargets:\n";

// The build definition shipped with the tool, used when no Makefile is present
const BUNDLED_MAKEFILE: &str = include_str!("../Makefile");

/// A build definition's text together with where it came from
#[derive(Debug, Clone)]
pub struct BuildSource {
    pub origin: PathBuf,
    pub text: String,
}

impl BuildSource {
    pub fn bundled() -> Self {
        BuildSource {
            origin: PathBuf::from(DEFAULT_BUILD_FILE),
            text: BUNDLED_MAKEFILE.to_string(),
        }
    }
}

/// Read the named build definitions. Unreadable files are skipped with a
/// warning. With no names, `Makefile` in `cwd` is used, falling back to the
/// bundled definition.
pub fn load_sources(cwd: &Path, files: &[PathBuf]) -> Vec<BuildSource> {
    if files.is_empty() {
        let default = cwd.join(DEFAULT_BUILD_FILE);
        return match fs::read_to_string(&default) {
            Ok(text) => vec![BuildSource {
                origin: default,
                text,
            }],
            Err(_) => vec![BuildSource::bundled()],
        };
    }

    files
        .iter()
        .filter_map(|file| {
            let path = cwd.join(file);
            match fs::read_to_string(&path) {
                Ok(text) => Some(BuildSource { origin: path, text }),
                Err(err) => {
                    tracing::warn!(file = %path.display(), error = %err, "skipping build definition");
                    None
                }
            }
        })
        .collect()
}

// A quoted marker is a search for the marker (`fgrep -h "##" ...`), not documentation
const MARKER_SEARCHES: &[&str] = &["\"##\"", "'##'"];

/// Turn one source line into a listing entry, if it carries the marker.
fn doc_line(line: &str) -> Option<String> {
    if !line.contains(DOC_MARKER) || MARKER_SEARCHES.iter().any(|s| line.contains(s)) {
        return None;
    }

    let stripped = line.replacen(DOC_MARKER, "", 1);
    Some(stripped.trim_end_matches('\\').to_string())
}

/// Render the usage listing for the given build definitions, in order.
pub fn render_help(sources: &[BuildSource]) -> String {
    let mut out = String::from(HEADER);

    for source in sources {
        for entry in source.text.lines().filter_map(doc_line) {
            out.push_str(&entry);
            out.push('\n');
        }
    }

    out
}
