use anvil_metadata::MetadataId;

use crate::{JavaType, TypeDetails};

/// Resolution of type names and annotated-type queries.
///
/// Backed by source scanning/parsing in a real session; test harnesses
/// substitute an in-memory index. Missing types are `None`, never errors.
pub trait TypeLocationService: Send + Sync {
    fn type_details(&self, ty: &JavaType) -> Option<TypeDetails>;

    fn type_details_by_id(&self, id: &MetadataId) -> Option<TypeDetails>;

    /// Every known declaration carrying the given annotation type.
    fn types_with_annotation(&self, annotation: &JavaType) -> Vec<TypeDetails>;
}

/// Translation of server-side types into their client-visible counterparts.
pub trait TypeTranslationService: Send + Sync {
    /// Returns the translated type, or `None` when the type has no
    /// client-side representation — the caller drops the member.
    fn translate(&self, ty: &JavaType, context_entity: &JavaType) -> Option<JavaType>;
}

/// Persistence of generated declarations.
pub trait ArtifactWriter: Send + Sync {
    /// Writes the declaration, embedding `warning_header` verbatim in the
    /// file header so generated files are greppable, and returns the
    /// identifier of the persisted artifact.
    fn write(&self, declaration: &TypeDetails, warning_header: &str) -> String;
}
