use serde::{Deserialize, Serialize};

use crate::{JavaSymbol, JavaType};

/// An annotation attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationValue {
    Str(String),
    Bool(bool),
    Class(JavaType),
    List(Vec<AnnotationValue>),
}

impl AnnotationValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&JavaType> {
        match self {
            Self::Class(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AnnotationValue]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }
}

/// An annotation instance on a declaration: type plus attribute map.
///
/// Attributes keep declaration order, which is also rendering order for the
/// artifact writer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationMetadata {
    annotation_type: JavaType,
    attributes: Vec<(JavaSymbol, AnnotationValue)>,
}

impl AnnotationMetadata {
    pub fn new(annotation_type: JavaType) -> Self {
        Self {
            annotation_type,
            attributes: Vec::new(),
        }
    }

    pub fn annotation_type(&self) -> &JavaType {
        &self.annotation_type
    }

    pub fn with_attribute(
        mut self,
        name: impl Into<JavaSymbol>,
        value: AnnotationValue,
    ) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Sets an attribute, replacing an existing one of the same name in
    /// place.
    pub fn set_attribute(&mut self, name: impl Into<JavaSymbol>, value: AnnotationValue) {
        let name = name.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.retain(|(n, _)| n.as_str() != name);
    }

    pub fn attribute(&self, name: &str) -> Option<&AnnotationValue> {
        self.attributes
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, value)| value)
    }

    pub fn string_attribute(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(AnnotationValue::as_str)
    }

    /// Boolean attribute with a default for when the attribute is missing or
    /// not a boolean.
    pub fn bool_attribute(&self, name: &str, default: bool) -> bool {
        self.attribute(name)
            .and_then(AnnotationValue::as_bool)
            .unwrap_or(default)
    }

    /// Flattens a list attribute of strings; a single string value is treated
    /// as a one-element list, anything else as empty.
    pub fn string_list_attribute(&self, name: &str) -> Vec<String> {
        match self.attribute(name) {
            Some(AnnotationValue::List(values)) => values
                .iter()
                .filter_map(|value| value.as_str().map(str::to_string))
                .collect(),
            Some(AnnotationValue::Str(value)) => vec![value.clone()],
            _ => Vec::new(),
        }
    }

    /// Flattens a list attribute of class literals; a single class value is
    /// treated as a one-element list.
    pub fn class_list_attribute(&self, name: &str) -> Vec<JavaType> {
        match self.attribute(name) {
            Some(AnnotationValue::List(values)) => values
                .iter()
                .filter_map(|value| value.as_class().cloned())
                .collect(),
            Some(AnnotationValue::Class(value)) => vec![value.clone()],
            _ => Vec::new(),
        }
    }
}
