use serde::{Deserialize, Serialize};

use anvil_metadata::MetadataId;

use crate::{JavaSymbol, JavaType};

/// A method declaration.
///
/// Bodies are never modeled: generated declarations are abstract, and source
/// bodies are irrelevant to metadata computation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodMetadata {
    /// The physical-type identifier of the declaring type.
    pub declared_by: MetadataId,
    pub name: JavaSymbol,
    pub is_public: bool,
    pub is_static: bool,
    pub is_abstract: bool,
    pub return_type: JavaType,
    pub parameter_types: Vec<JavaType>,
    pub parameter_names: Vec<JavaSymbol>,
}

impl MethodMetadata {
    /// A public abstract declaration, the shape every generated member takes.
    pub fn abstract_declaration(
        declared_by: MetadataId,
        name: JavaSymbol,
        return_type: JavaType,
        parameter_types: Vec<JavaType>,
        parameter_names: Vec<JavaSymbol>,
    ) -> Self {
        Self {
            declared_by,
            name,
            is_public: true,
            is_static: false,
            is_abstract: true,
            return_type,
            parameter_types,
            parameter_names,
        }
    }
}
