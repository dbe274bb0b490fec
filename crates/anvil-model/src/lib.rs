//! Java declaration model for Anvil.
//!
//! A deliberately small slice of the Java type system: just enough structure
//! (types, annotations, member declarations) for metadata providers to reason
//! about annotated source types and to assemble the derived declarations they
//! generate. Parsing real source into this model is an external concern; see
//! [`TypeLocationService`] and friends in [`services`].

mod annotations;
mod details;
mod members;
pub mod physical;
mod services;
mod types;

pub use annotations::{AnnotationMetadata, AnnotationValue};
pub use details::{TypeDetails, TypeDetailsBuilder};
pub use members::MethodMetadata;
pub use services::{ArtifactWriter, TypeLocationService, TypeTranslationService};
pub use types::{JavaSymbol, JavaType};
