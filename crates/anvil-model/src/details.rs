use serde::{Deserialize, Serialize};

use anvil_metadata::MetadataId;

use crate::{AnnotationMetadata, JavaType, MethodMetadata};

/// A class-or-interface declaration as seen by metadata providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDetails {
    /// The physical-type identifier this declaration was parsed under.
    pub declared_by: MetadataId,
    pub name: JavaType,
    pub is_abstract: bool,
    pub annotations: Vec<AnnotationMetadata>,
    pub declared_methods: Vec<MethodMetadata>,
    pub extends_types: Vec<JavaType>,
    /// Domain types this declaration acts as a service layer for, when it
    /// participates in a layering architecture.
    pub layer_entities: Vec<JavaType>,
}

impl TypeDetails {
    pub fn new(declared_by: MetadataId, name: JavaType) -> Self {
        Self {
            declared_by,
            name,
            is_abstract: false,
            annotations: Vec::new(),
            declared_methods: Vec::new(),
            extends_types: Vec::new(),
            layer_entities: Vec::new(),
        }
    }

    pub fn annotation_of_type(&self, annotation_type: &JavaType) -> Option<&AnnotationMetadata> {
        self.annotations
            .iter()
            .find(|annotation| annotation.annotation_type() == annotation_type)
    }

    /// The first annotation present on this declaration out of `candidates`,
    /// in candidate order.
    pub fn first_annotation(&self, candidates: &[JavaType]) -> Option<&AnnotationMetadata> {
        candidates
            .iter()
            .find_map(|candidate| self.annotation_of_type(candidate))
    }

    pub fn to_builder(&self) -> TypeDetailsBuilder {
        TypeDetailsBuilder {
            inner: self.clone(),
        }
    }
}

/// Mutating wrapper used while assembling a derived declaration.
#[derive(Debug, Clone)]
pub struct TypeDetailsBuilder {
    inner: TypeDetails,
}

impl TypeDetailsBuilder {
    pub fn extends_types(&self) -> &[JavaType] {
        &self.inner.extends_types
    }

    /// Adds a supertype unless it is already present.
    pub fn add_extends(&mut self, supertype: JavaType) {
        if !self.inner.extends_types.contains(&supertype) {
            self.inner.extends_types.push(supertype);
        }
    }

    pub fn remove_annotation(&mut self, annotation_type: &JavaType) {
        self.inner
            .annotations
            .retain(|annotation| annotation.annotation_type() != annotation_type);
    }

    /// Replaces any annotation of the same type with `annotation`.
    pub fn replace_annotation(&mut self, annotation: AnnotationMetadata) {
        let annotation_type = annotation.annotation_type().clone();
        self.remove_annotation(&annotation_type);
        self.inner.annotations.push(annotation);
    }

    pub fn set_declared_methods(&mut self, methods: Vec<MethodMetadata>) {
        self.inner.declared_methods = methods;
    }

    pub fn build(self) -> TypeDetails {
        self.inner
    }
}
