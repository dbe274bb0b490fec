use std::any::Any;
use std::hash::{Hash, Hasher};

use anvil_core::ModuleName;
use anvil_metadata::{MetadataError, MetadataId, MetadataItem};
use anvil_model::physical::{decode_qualified, qualified_identifier};
use anvil_model::JavaType;

pub const REQUEST_METADATA_CLASS: &str = "request";

/// The class-level identifier covering every request metadata node.
pub fn request_class_id() -> MetadataId {
    MetadataId::class_level(REQUEST_METADATA_CLASS).expect("constant class tag is valid")
}

/// The request metadata identifier of one request interface declaration.
pub fn request_id(module: &ModuleName, ty: &JavaType) -> MetadataId {
    qualified_identifier(REQUEST_METADATA_CLASS, module, ty).expect("constant class tag is valid")
}

pub fn is_request_id(id: &MetadataId) -> bool {
    id.metadata_class() == REQUEST_METADATA_CLASS && id.is_instance_level()
}

pub fn request_type_of(id: &MetadataId) -> Result<JavaType, MetadataError> {
    decode_qualified(id, REQUEST_METADATA_CLASS).map(|(_, ty)| ty)
}

pub fn request_module_of(id: &MetadataId) -> Result<ModuleName, MetadataError> {
    decode_qualified(id, REQUEST_METADATA_CLASS).map(|(module, _)| module)
}

/// The computed state of one generated request interface: the identifier of
/// the artifact the writer persisted for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMetadata {
    id: MetadataId,
    artifact: String,
}

impl RequestMetadata {
    pub fn new(id: MetadataId, artifact: String) -> Self {
        Self { id, artifact }
    }

    /// Identifier of the persisted artifact, as returned by the writer.
    pub fn artifact(&self) -> &str {
        &self.artifact
    }
}

impl MetadataItem for RequestMetadata {
    fn id(&self) -> &MetadataId {
        &self.id
    }

    fn content_hash(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.artifact.hash(&mut hasher);
        hasher.finish()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
