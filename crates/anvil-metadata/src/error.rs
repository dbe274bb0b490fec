use crate::MetadataId;

/// Fatal conditions in the metadata core.
///
/// Everything here indicates a programming error or misrouting, not a data
/// problem: unresolvable entities and missing declarations are represented as
/// absent items, never as errors.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("malformed metadata identifier `{0}`")]
    MalformedId(String),

    #[error("no provider registered for the metadata class of `{0}`")]
    NoProvider(MetadataId),

    #[error("dependency edge `{upstream}` -> `{downstream}` would create a cycle")]
    CircularDependency {
        upstream: MetadataId,
        downstream: MetadataId,
    },

    #[error("metadata protocol violation for `{id}`: {message}")]
    ProtocolViolation { id: MetadataId, message: String },
}
