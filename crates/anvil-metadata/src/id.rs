use std::fmt;

use serde::{Deserialize, Serialize};

use crate::MetadataError;

const PREFIX: &str = "md:";

/// Opaque identifier of a metadata node.
///
/// Token grammar:
///
/// - class-level: `md:<class>` — a wildcard over every instance of a metadata
///   class, used for bulk invalidation and standing dependency edges
/// - instance-level: `md:<class>#<qualifier>` — one concrete node
///
/// `<class>` is a non-empty tag that must not contain `#`. The qualifier may
/// be empty (the root module's project node is `md:project#`); the presence
/// of `#` is what distinguishes the two flavors. Two identifiers are equal
/// iff their tokens are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MetadataId(String);

impl MetadataId {
    /// Creates a class-level identifier.
    pub fn class_level(class: &str) -> Result<Self, MetadataError> {
        validate_class(class)?;
        Ok(Self(format!("{PREFIX}{class}")))
    }

    /// Creates an instance-level identifier.
    pub fn instance(class: &str, qualifier: &str) -> Result<Self, MetadataError> {
        validate_class(class)?;
        Ok(Self(format!("{PREFIX}{class}#{qualifier}")))
    }

    /// Decodes a raw token.
    pub fn parse(token: &str) -> Result<Self, MetadataError> {
        let rest = token
            .strip_prefix(PREFIX)
            .ok_or_else(|| MetadataError::MalformedId(token.to_string()))?;
        let (class, qualifier) = match rest.split_once('#') {
            Some((class, qualifier)) => (class, Some(qualifier)),
            None => (rest, None),
        };
        if validate_class(class).is_err() || qualifier.is_some_and(|q| q.contains('#')) {
            return Err(MetadataError::MalformedId(token.to_string()));
        }
        Ok(Self(token.to_string()))
    }

    /// The metadata class tag.
    pub fn metadata_class(&self) -> &str {
        let rest = &self.0[PREFIX.len()..];
        rest.split('#').next().unwrap_or(rest)
    }

    /// The qualifier, or `None` for class-level identifiers.
    pub fn qualifier(&self) -> Option<&str> {
        let rest = &self.0[PREFIX.len()..];
        rest.split_once('#').map(|(_, qualifier)| qualifier)
    }

    pub fn is_class_level(&self) -> bool {
        !self.0[PREFIX.len()..].contains('#')
    }

    pub fn is_instance_level(&self) -> bool {
        !self.is_class_level()
    }

    /// The class-level identifier for this identifier's metadata class.
    pub fn class_of(&self) -> MetadataId {
        Self(format!("{PREFIX}{}", self.metadata_class()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetadataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn validate_class(class: &str) -> Result<(), MetadataError> {
    if class.is_empty() || class.contains('#') || class.contains(':') {
        return Err(MetadataError::MalformedId(class.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_and_instance_flavors() {
        let class = MetadataId::class_level("project").unwrap();
        assert!(class.is_class_level());
        assert_eq!(class.metadata_class(), "project");
        assert_eq!(class.qualifier(), None);
        assert_eq!(class.as_str(), "md:project");

        let instance = MetadataId::instance("project", "web").unwrap();
        assert!(instance.is_instance_level());
        assert_eq!(instance.metadata_class(), "project");
        assert_eq!(instance.qualifier(), Some("web"));
        assert_eq!(instance.class_of(), class);
    }

    #[test]
    fn empty_qualifier_is_instance_level() {
        let root = MetadataId::instance("project", "").unwrap();
        assert!(root.is_instance_level());
        assert_eq!(root.qualifier(), Some(""));
        assert_ne!(root, MetadataId::class_level("project").unwrap());
    }

    #[test]
    fn parse_round_trips_and_rejects_garbage() {
        for token in ["md:type", "md:type#?com.example.Foo", "md:project#"] {
            assert_eq!(MetadataId::parse(token).unwrap().as_str(), token);
        }
        for token in ["", "md:", "type#x", "mid:type#x", "md:#x"] {
            assert!(
                matches!(MetadataId::parse(token), Err(MetadataError::MalformedId(_))),
                "{token:?} should be rejected"
            );
        }
    }

    #[test]
    fn invalid_class_tags_are_rejected() {
        assert!(MetadataId::class_level("").is_err());
        assert!(MetadataId::class_level("a#b").is_err());
        assert!(MetadataId::instance("a:b", "q").is_err());
    }
}
