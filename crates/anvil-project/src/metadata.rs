use std::any::Any;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use anvil_core::ModuleName;
use anvil_metadata::{MetadataEngine, MetadataError, MetadataId, MetadataItem, MetadataProvider};

use crate::{Pom, PomManager};

pub const PROJECT_METADATA_CLASS: &str = "project";

/// The class-level identifier covering every module's project metadata.
pub fn project_class_id() -> MetadataId {
    MetadataId::class_level(PROJECT_METADATA_CLASS).expect("constant class tag is valid")
}

/// The project metadata identifier of one module.
pub fn project_id(module: &ModuleName) -> MetadataId {
    MetadataId::instance(PROJECT_METADATA_CLASS, module.as_str())
        .expect("constant class tag is valid")
}

pub fn is_project_id(id: &MetadataId) -> bool {
    id.metadata_class() == PROJECT_METADATA_CLASS && id.is_instance_level()
}

/// Decodes the module name from a project metadata identifier.
pub fn module_name_of(id: &MetadataId) -> Result<ModuleName, MetadataError> {
    if !is_project_id(id) {
        return Err(MetadataError::ProtocolViolation {
            id: id.clone(),
            message: "expected a project metadata identifier".to_string(),
        });
    }
    Ok(ModuleName::new(id.qualifier().unwrap_or("")))
}

/// Per-module project configuration, wrapping the module's parsed [`Pom`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMetadata {
    id: MetadataId,
    pom: Pom,
}

impl ProjectMetadata {
    pub fn new(pom: Pom) -> Self {
        Self {
            id: project_id(&pom.module_name),
            pom,
        }
    }

    pub fn pom(&self) -> &Pom {
        &self.pom
    }

    pub fn module_name(&self) -> &ModuleName {
        &self.pom.module_name
    }

    /// The module's top-level Java package, by convention its group id.
    pub fn top_level_package(&self) -> Option<String> {
        self.pom.resolved_group_id()
    }
}

impl MetadataItem for ProjectMetadata {
    fn id(&self) -> &MetadataId {
        &self.id
    }

    fn content_hash(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.pom.hash(&mut hasher);
        hasher.finish()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Computes [`ProjectMetadata`] on demand from the pom map.
///
/// Rebuilds unconditionally on every call; the metadata engine caches on this
/// provider's behalf.
pub struct ProjectMetadataProvider {
    manager: Arc<PomManager>,
}

impl ProjectMetadataProvider {
    pub fn new(manager: Arc<PomManager>) -> Self {
        Self { manager }
    }
}

impl MetadataProvider for ProjectMetadataProvider {
    fn provides_class(&self) -> &str {
        PROJECT_METADATA_CLASS
    }

    fn get(
        &self,
        _engine: &MetadataEngine,
        id: &MetadataId,
    ) -> Result<Option<Arc<dyn MetadataItem>>, MetadataError> {
        let module = module_name_of(id)?;
        match self.manager.pom_from_module_name(&module)? {
            Some(pom) if pom.path.is_file() => {
                Ok(Some(Arc::new(ProjectMetadata::new(pom)) as Arc<dyn MetadataItem>))
            }
            _ => Ok(None),
        }
    }
}
