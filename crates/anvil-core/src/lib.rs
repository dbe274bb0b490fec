//! Core shared types for Anvil.
//!
//! This crate is intentionally small and dependency-light: the module-name
//! value type used throughout metadata identifiers, and a couple of path
//! helpers shared by the project-graph and request crates.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The name of a build module, relative to the project root.
///
/// The root module is the empty name. Nested modules use `/`-separated
/// root-relative directory paths (e.g. `"web"`, `"services/email"`), which is
/// how multi-module build files refer to them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleName(String);

impl ModuleName {
    pub const ROOT: &'static str = "";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ModuleName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Joins `relative` onto `base_dir`, collapsing leading `..` segments against
/// the base rather than leaving them embedded in the result.
///
/// Interior `.` segments are dropped. The input uses `/` separators, which is
/// what build descriptors use regardless of platform.
pub fn collapse_relative(base_dir: &Path, relative: &str) -> PathBuf {
    let mut out = base_dir.to_path_buf();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Whether directory `ancestor` is an ancestor of (or equal to) directory
/// `descendant`, compared component-wise — `/a/b` is not an ancestor of
/// `/a/bc`.
pub fn is_ancestor_dir(ancestor: &Path, descendant: &Path) -> bool {
    descendant.starts_with(ancestor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_module_name_is_empty() {
        assert!(ModuleName::root().is_root());
        assert_eq!(ModuleName::root().as_str(), "");
        assert!(!ModuleName::new("web").is_root());
    }

    #[test]
    fn collapse_relative_handles_parent_segments() {
        let base = Path::new("/workspace/project/child");
        assert_eq!(
            collapse_relative(base, "../pom.xml"),
            PathBuf::from("/workspace/project/pom.xml")
        );
        assert_eq!(
            collapse_relative(base, "../../other/pom.xml"),
            PathBuf::from("/workspace/other/pom.xml")
        );
        assert_eq!(
            collapse_relative(base, "web"),
            PathBuf::from("/workspace/project/child/web")
        );
    }

    #[test]
    fn ancestor_check_is_component_wise() {
        assert!(is_ancestor_dir(Path::new("/a/b"), Path::new("/a/b/c")));
        assert!(is_ancestor_dir(Path::new("/a/b"), Path::new("/a/b")));
        assert!(!is_ancestor_dir(Path::new("/a/b"), Path::new("/a/bc")));
        assert!(!is_ancestor_dir(Path::new("/a/b/c"), Path::new("/a/b")));
    }
}
