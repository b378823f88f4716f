use std::path::PathBuf;
use thiserror::Error;

/// Filesystem failures met while sweeping. The sweeper never propagates
/// these; each one is counted and logged at debug level, then discarded.
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SweepError>;
