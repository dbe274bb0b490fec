use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use anvil_core::ModuleName;

use crate::paths::resolve_relative_path;
use crate::{ProjectError, DEFAULT_RELATIVE_PATH};

/// One declared dependency of a module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub classifier: Option<String>,
    pub type_: Option<String>,
}

/// A parsed build module descriptor.
///
/// Replaced wholesale whenever its file is re-parsed; never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pom {
    /// Canonical path of the `pom.xml` this was parsed from.
    pub path: PathBuf,
    /// Root-relative module name (`""` for the project root).
    pub module_name: ModuleName,
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,
    /// Resolved path of the parent `pom.xml`, when a `<parent>` is declared.
    pub parent: Option<PathBuf>,
    /// `<module>` child names as declared.
    pub modules: Vec<String>,
    pub dependencies: Vec<Dependency>,
    pub properties: BTreeMap<String, String>,
}

impl Pom {
    /// The directory this module lives in.
    pub fn root(&self) -> &Path {
        self.path.parent().unwrap_or(&self.path)
    }

    /// Group id with `${...}` placeholders resolved against the properties.
    pub fn resolved_group_id(&self) -> Option<String> {
        self.group_id
            .as_deref()
            .map(|raw| resolve_placeholders(raw, &self.properties))
    }

    /// Parses the descriptor at `path`.
    ///
    /// `<parent>` references are resolved to a concrete path here (default
    /// relative path `../pom.xml`); recursing into them is the manager's job.
    pub fn parse(path: &Path, module_name: ModuleName) -> Result<Pom, ProjectError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ProjectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = roxmltree::Document::parse(&contents).map_err(|source| ProjectError::Xml {
            path: path.to_path_buf(),
            source,
        })?;
        let project = doc.root_element();

        let mut properties = BTreeMap::new();
        if let Some(props_node) = child_element(&project, "properties") {
            for child in props_node.children().filter(|n| n.is_element()) {
                let key = child.tag_name().name().to_string();
                if let Some(value) = child.text().map(str::trim).filter(|t| !t.is_empty()) {
                    properties.insert(key, value.to_string());
                }
            }
        }

        let parent = child_element(&project, "parent").map(|parent_node| {
            let relative = child_text(&parent_node, "relativePath")
                .unwrap_or_else(|| DEFAULT_RELATIVE_PATH.to_string());
            resolve_relative_path(path, &relative)
        });

        let modules = child_element(&project, "modules")
            .map(|modules_node| {
                modules_node
                    .children()
                    .filter(|n| n.is_element() && n.has_tag_name("module"))
                    .filter_map(|n| n.text())
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let dependencies = child_element(&project, "dependencies")
            .map(|deps_node| parse_dependencies(&deps_node, &properties))
            .unwrap_or_default();

        Ok(Pom {
            path: path.to_path_buf(),
            module_name,
            group_id: child_text(&project, "groupId")
                .or_else(|| parent_child_text(&project, "groupId")),
            artifact_id: child_text(&project, "artifactId"),
            version: child_text(&project, "version")
                .or_else(|| parent_child_text(&project, "version")),
            packaging: child_text(&project, "packaging"),
            parent,
            modules,
            dependencies,
            properties,
        })
    }
}

fn parse_dependencies(
    deps_node: &roxmltree::Node<'_, '_>,
    properties: &BTreeMap<String, String>,
) -> Vec<Dependency> {
    deps_node
        .children()
        .filter(|n| n.is_element() && n.has_tag_name("dependency"))
        .filter_map(|dep_node| {
            let group_id = child_text(&dep_node, "groupId")?;
            let artifact_id = child_text(&dep_node, "artifactId")?;
            let version = child_text(&dep_node, "version")
                .map(|raw| resolve_placeholders(&raw, properties));

            Some(Dependency {
                group_id,
                artifact_id,
                version,
                scope: child_text(&dep_node, "scope"),
                classifier: child_text(&dep_node, "classifier"),
                type_: child_text(&dep_node, "type"),
            })
        })
        .collect()
}

/// Text of a direct child of `<parent>`, used for inherited coordinates.
fn parent_child_text(project: &roxmltree::Node<'_, '_>, name: &str) -> Option<String> {
    child_element(project, "parent").and_then(|parent| child_text(&parent, name))
}

fn child_element<'a>(
    node: &'a roxmltree::Node<'a, 'a>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'a>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn child_text(node: &roxmltree::Node<'_, '_>, name: &str) -> Option<String> {
    child_element(node, name)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn resolve_placeholders(text: &str, props: &BTreeMap<String, String>) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

    re.replace_all(text, |caps: &regex::Captures<'_>| {
        let key = &caps[1];
        props
            .get(key)
            .cloned()
            .unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_pom(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn parses_coordinates_modules_and_dependencies() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write_pom(
            tmp.path(),
            "pom.xml",
            r#"<project>
                <groupId>com.example</groupId>
                <artifactId>shop</artifactId>
                <version>1.2.0</version>
                <packaging>pom</packaging>
                <properties>
                    <spring.version>6.1.0</spring.version>
                </properties>
                <modules>
                    <module>web</module>
                    <module>core</module>
                </modules>
                <dependencies>
                    <dependency>
                        <groupId>org.springframework</groupId>
                        <artifactId>spring-context</artifactId>
                        <version>${spring.version}</version>
                        <scope>compile</scope>
                    </dependency>
                </dependencies>
            </project>"#,
        );

        let pom = Pom::parse(&path, ModuleName::root()).unwrap();
        assert_eq!(pom.group_id.as_deref(), Some("com.example"));
        assert_eq!(pom.artifact_id.as_deref(), Some("shop"));
        assert_eq!(pom.version.as_deref(), Some("1.2.0"));
        assert_eq!(pom.packaging.as_deref(), Some("pom"));
        assert_eq!(pom.modules, vec!["web", "core"]);
        assert_eq!(pom.dependencies.len(), 1);
        assert_eq!(
            pom.dependencies[0].version.as_deref(),
            Some("6.1.0"),
            "placeholder must resolve against properties"
        );
        assert_eq!(pom.root(), tmp.path());
    }

    #[test]
    fn inherits_coordinates_from_parent_declaration() {
        let tmp = tempfile::TempDir::new().unwrap();
        let child_dir = tmp.path().join("child");
        fs::create_dir_all(&child_dir).unwrap();
        write_pom(tmp.path(), "pom.xml", "<project/>");
        let child = write_pom(
            &child_dir,
            "pom.xml",
            r#"<project>
                <artifactId>child</artifactId>
                <parent>
                    <groupId>com.example</groupId>
                    <artifactId>shop</artifactId>
                    <version>1.2.0</version>
                </parent>
            </project>"#,
        );

        let pom = Pom::parse(&child, ModuleName::new("child")).unwrap();
        assert_eq!(pom.group_id.as_deref(), Some("com.example"));
        assert_eq!(pom.version.as_deref(), Some("1.2.0"));
        assert_eq!(pom.parent, Some(tmp.path().join("pom.xml")));
    }

    #[test]
    fn explicit_relative_path_overrides_the_default() {
        let tmp = tempfile::TempDir::new().unwrap();
        let deep = tmp.path().join("nested/child");
        fs::create_dir_all(&deep).unwrap();
        write_pom(tmp.path(), "pom.xml", "<project/>");
        let child = write_pom(
            &deep,
            "pom.xml",
            r#"<project>
                <parent>
                    <groupId>g</groupId>
                    <artifactId>a</artifactId>
                    <version>1</version>
                    <relativePath>../../pom.xml</relativePath>
                </parent>
            </project>"#,
        );

        let pom = Pom::parse(&child, ModuleName::new("nested/child")).unwrap();
        assert_eq!(pom.parent, Some(tmp.path().join("pom.xml")));
    }

    #[test]
    fn descriptor_round_trips_through_serde() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write_pom(
            tmp.path(),
            "pom.xml",
            r#"<project>
                <groupId>com.example</groupId>
                <artifactId>shop</artifactId>
                <version>1.0.0</version>
            </project>"#,
        );

        let pom = Pom::parse(&path, ModuleName::root()).unwrap();
        let json = serde_json::to_string(&pom).unwrap();
        let back: Pom = serde_json::from_str(&json).unwrap();
        assert_eq!(pom, back);
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write_pom(tmp.path(), "pom.xml", "<project><unclosed>");
        assert!(matches!(
            Pom::parse(&path, ModuleName::root()),
            Err(ProjectError::Xml { .. })
        ));
    }
}
