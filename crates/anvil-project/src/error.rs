use std::path::PathBuf;

/// Failures while reading one build descriptor.
///
/// These are fatal for the affected path only: the manager logs the failure,
/// keeps the path pending for retry on the next file event, and carries on
/// with the rest of the cache update.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse XML in {path}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },
}
