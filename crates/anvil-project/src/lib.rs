//! Maven module graph for Anvil.
//!
//! This crate turns `pom.xml` files into a live module model:
//! - [`Pom`]: one parsed build module descriptor
//! - [`PomManager`]: the self-refreshing, ancestor-first-sorted map of every
//!   known module, driven by dirty-file pulls
//! - [`ProjectMetadata`] and its provider: the metadata node other providers
//!   depend on for per-module configuration
//! - [`FileChangeRouter`]: the bridge from classified file events to targeted
//!   cache refreshes
//!
//! Only parent/module topology, coordinates, dependencies and properties are
//! modeled; Maven's dependency *resolution* is explicitly out of scope.

mod error;
mod manager;
mod metadata;
mod paths;
mod pom;
mod router;

pub use error::ProjectError;
pub use manager::PomManager;
pub use metadata::{
    is_project_id, module_name_of, project_class_id, project_id, ProjectMetadata,
    ProjectMetadataProvider, PROJECT_METADATA_CLASS,
};
pub use pom::{Dependency, Pom};
pub use router::FileChangeRouter;

pub(crate) const POM_FILE_NAME: &str = "pom.xml";
pub(crate) const DEFAULT_RELATIVE_PATH: &str = "../pom.xml";
