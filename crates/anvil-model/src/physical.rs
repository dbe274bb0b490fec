//! Identifiers for physical Java types.
//!
//! A "physical type" node represents one source declaration on disk. Its
//! qualifier is `<module>?<fully-qualified name>`, which is enough to locate
//! the declaration again: the owning build module plus the type name. Other
//! metadata classes keyed by a declaration (generated mirrors of a type)
//! reuse the same qualifier shape through [`qualified_identifier`] /
//! [`decode_qualified`].

use anvil_core::ModuleName;
use anvil_metadata::{MetadataError, MetadataId};

use crate::JavaType;

pub const TYPE_METADATA_CLASS: &str = "type";

/// Builds an instance identifier of `class` qualified by module + type name.
pub fn qualified_identifier(
    class: &str,
    module: &ModuleName,
    ty: &JavaType,
) -> Result<MetadataId, MetadataError> {
    MetadataId::instance(class, &format!("{}?{}", module, ty.fully_qualified_name()))
}

/// Decodes a module + type name qualifier, checking the metadata class.
pub fn decode_qualified(
    id: &MetadataId,
    expected_class: &str,
) -> Result<(ModuleName, JavaType), MetadataError> {
    if id.metadata_class() != expected_class || !id.is_instance_level() {
        return Err(MetadataError::ProtocolViolation {
            id: id.clone(),
            message: format!("expected an instance-level `{expected_class}` identifier"),
        });
    }
    let qualifier = id.qualifier().unwrap_or("");
    qualifier
        .split_once('?')
        .filter(|(_, fqn)| !fqn.is_empty())
        .map(|(module, fqn)| (ModuleName::new(module), JavaType::new(fqn)))
        .ok_or_else(|| MetadataError::MalformedId(id.as_str().to_string()))
}

/// The class-level identifier covering every physical type.
pub fn class_level_id() -> MetadataId {
    MetadataId::class_level(TYPE_METADATA_CLASS).expect("constant class tag is valid")
}

/// The instance identifier of one source declaration.
pub fn create_identifier(module: &ModuleName, ty: &JavaType) -> MetadataId {
    qualified_identifier(TYPE_METADATA_CLASS, module, ty).expect("constant class tag is valid")
}

pub fn is_physical_type_id(id: &MetadataId) -> bool {
    id.metadata_class() == TYPE_METADATA_CLASS && id.is_instance_level()
}

/// Decodes the type name from a physical-type identifier.
pub fn type_of(id: &MetadataId) -> Result<JavaType, MetadataError> {
    decode_qualified(id, TYPE_METADATA_CLASS).map(|(_, ty)| ty)
}

/// Decodes the owning module from a physical-type identifier.
pub fn module_of(id: &MetadataId) -> Result<ModuleName, MetadataError> {
    decode_qualified(id, TYPE_METADATA_CLASS).map(|(module, _)| module)
}
