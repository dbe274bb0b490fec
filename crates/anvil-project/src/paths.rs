use std::path::{Path, PathBuf};

use crate::POM_FILE_NAME;

/// Resolves a `<relativePath>` or `<module>` reference against the file it
/// appears in.
///
/// `relative_to` may be the referencing `pom.xml` itself or its directory;
/// file components are stripped before resolution. Leading `..` segments in
/// `relative` collapse against the base, and a reference that resolves to a
/// directory means that directory's `pom.xml`. Trailing separators on either
/// input do not change the result.
pub(crate) fn resolve_relative_path(relative_to: &Path, relative: &str) -> PathBuf {
    let mut base = relative_to.to_path_buf();
    while base.is_file() {
        base.pop();
    }
    let mut resolved = anvil_core::collapse_relative(&base, relative.trim_end_matches('/'));
    if resolved.is_dir() {
        resolved.push(POM_FILE_NAME);
    }
    resolved
}

/// Walks upward from `start` (a file or directory) to the nearest directory
/// containing a `pom.xml`, returning that `pom.xml` path.
pub(crate) fn nearest_pom(start: &Path) -> Option<PathBuf> {
    let mut dir = if start.is_dir() {
        start.to_path_buf()
    } else {
        start.parent()?.to_path_buf()
    };
    loop {
        let candidate = dir.join(POM_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parent_reference_resolves_one_directory_up() {
        let tmp = tempfile::TempDir::new().unwrap();
        let child = tmp.path().join("child");
        fs::create_dir_all(&child).unwrap();
        fs::write(tmp.path().join(POM_FILE_NAME), "<project/>").unwrap();
        let child_pom = child.join(POM_FILE_NAME);
        fs::write(&child_pom, "<project/>").unwrap();

        let resolved = resolve_relative_path(&child_pom, "../pom.xml");
        assert_eq!(resolved, tmp.path().join(POM_FILE_NAME));

        // Same outcome when resolving from the directory, with or without a
        // trailing separator on the reference.
        assert_eq!(resolve_relative_path(&child, "../pom.xml"), resolved);
        assert_eq!(resolve_relative_path(&child_pom, "../"), resolved);
    }

    #[test]
    fn module_reference_to_directory_gets_pom_suffix() {
        let tmp = tempfile::TempDir::new().unwrap();
        let web = tmp.path().join("web");
        fs::create_dir_all(&web).unwrap();
        fs::write(web.join(POM_FILE_NAME), "<project/>").unwrap();
        let root_pom = tmp.path().join(POM_FILE_NAME);
        fs::write(&root_pom, "<project/>").unwrap();

        assert_eq!(
            resolve_relative_path(&root_pom, "web"),
            web.join(POM_FILE_NAME)
        );
    }

    #[test]
    fn nearest_pom_walks_upward() {
        let tmp = tempfile::TempDir::new().unwrap();
        let nested = tmp.path().join("src/main/java");
        fs::create_dir_all(&nested).unwrap();
        let root_pom = tmp.path().join(POM_FILE_NAME);
        fs::write(&root_pom, "<project/>").unwrap();

        let file = nested.join("App.java");
        fs::write(&file, "class App {}").unwrap();

        assert_eq!(nearest_pom(&file), Some(root_pom.clone()));
        assert_eq!(nearest_pom(&nested), Some(root_pom));
        assert_eq!(nearest_pom(Path::new("/definitely/not/here.java")), None);
    }
}
