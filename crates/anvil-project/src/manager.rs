use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use anvil_core::{is_ancestor_dir, ModuleName};
use anvil_file_monitor::FileMonitor;
use anvil_metadata::{MetadataEngine, MetadataError};

use crate::metadata::project_id;
use crate::paths::{nearest_pom, resolve_relative_path};
use crate::{Pom, ProjectError, POM_FILE_NAME};

const CONSUMER_KEY: &str = "anvil-project::PomManager";

#[derive(Debug, Default)]
struct ManagerState {
    /// Pom paths, ancestors before descendants.
    order: Vec<PathBuf>,
    poms: HashMap<PathBuf, Pom>,
    /// Paths reported dirty but not yet successfully parsed.
    pending: BTreeSet<PathBuf>,
    focused: Option<PathBuf>,
}

/// The live map of every build module in the project.
///
/// Every read operation self-refreshes by pulling dirty `pom.xml` paths from
/// the file monitor first, so callers never observe a separate "stale" state.
/// Newly parsed modules trigger a forced project-metadata recompute and a
/// downstream notification fan-out before the triggering call returns.
pub struct PomManager {
    engine: Arc<MetadataEngine>,
    monitor: Arc<dyn FileMonitor>,
    root_path: PathBuf,
    state: Mutex<ManagerState>,
}

impl PomManager {
    /// `root_path` is the project root directory, i.e. the directory holding
    /// the root `pom.xml`.
    pub fn new(
        engine: Arc<MetadataEngine>,
        monitor: Arc<dyn FileMonitor>,
        root_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            engine,
            monitor,
            root_path: root_path.into(),
            state: Mutex::new(ManagerState::default()),
        }
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Pulls dirty descriptor paths, re-parses what changed (plus everything
    /// reachable through parent/module references), re-sorts the map and fans
    /// out change notifications for every re-parsed module.
    ///
    /// A path that fails to read or parse is logged and stays pending; the
    /// rest of the update proceeds.
    pub fn update_cache(&self) -> Result<(), MetadataError> {
        let pending: Vec<PathBuf> = {
            let mut state = self.state.lock();
            for path in self.monitor.get_dirty_files(CONSUMER_KEY) {
                if path.file_name().is_some_and(|name| name == POM_FILE_NAME) {
                    state.pending.insert(path);
                }
            }
            state.pending.iter().cloned().collect()
        };
        if pending.is_empty() {
            return Ok(());
        }

        // Parse without holding the state lock: the fan-out below re-enters
        // this manager through the project metadata provider.
        let mut visited = HashSet::new();
        let mut parsed = Vec::new();
        let mut completed = Vec::new();
        for path in pending {
            if !path.is_file() {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(contents) if contents.trim().is_empty() => continue,
                Ok(_) => {}
                Err(source) => {
                    let err = ProjectError::Io {
                        path: path.clone(),
                        source,
                    };
                    tracing::warn!(path = %path.display(), error = %err, "unreadable build descriptor; will retry");
                    continue;
                }
            }
            match self.resolve_poms(&path, &mut visited, &mut parsed) {
                Ok(()) => completed.push(path),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to parse build descriptor; will retry");
                }
            }
        }
        if parsed.is_empty() && completed.is_empty() {
            return Ok(());
        }

        let new_modules: Vec<ModuleName> = {
            let mut state = self.state.lock();
            for path in &completed {
                state.pending.remove(path);
            }
            let mut new_modules = Vec::new();
            for pom in parsed {
                let path = pom.path.clone();
                tracing::debug!(path = %path.display(), module = %pom.module_name, "parsed build descriptor");
                new_modules.push(pom.module_name.clone());
                if state.poms.insert(path.clone(), pom).is_none() {
                    state.order.push(path);
                }
            }
            sort_ancestors_first(&mut state);
            new_modules
        };

        for module in new_modules {
            let id = project_id(&module);
            self.engine.get_with(&id, true)?;
            self.engine.notify_downstream(&id)?;
        }
        Ok(())
    }

    /// Parses `path` and recurses into its parent reference and `<module>`
    /// children. `visited` is the cycle guard: a path already discovered in
    /// this update is not re-descended.
    ///
    /// Failures on *discovered* paths are logged and skipped (they get their
    /// own retry when they become dirty); a failure on the entry path itself
    /// propagates so the caller keeps it pending.
    fn resolve_poms(
        &self,
        path: &Path,
        visited: &mut HashSet<PathBuf>,
        out: &mut Vec<Pom>,
    ) -> Result<(), ProjectError> {
        if !visited.insert(path.to_path_buf()) {
            return Ok(());
        }
        let pom = Pom::parse(path, self.module_name_for(path))?;

        if let Some(parent) = pom.parent.clone() {
            if parent.is_file() {
                if let Err(err) = self.resolve_poms(&parent, visited, out) {
                    tracing::warn!(path = %parent.display(), error = %err, "failed to parse parent descriptor");
                }
            }
        }
        for module in &pom.modules {
            let module_path = resolve_relative_path(path, module);
            if module_path.is_file() {
                if let Err(err) = self.resolve_poms(&module_path, visited, out) {
                    tracing::warn!(path = %module_path.display(), error = %err, "failed to parse module descriptor");
                }
            }
        }

        out.push(pom);
        Ok(())
    }

    fn module_name_for(&self, pom_path: &Path) -> ModuleName {
        let dir = pom_path.parent().unwrap_or(pom_path);
        match dir.strip_prefix(&self.root_path) {
            Ok(relative) if relative.as_os_str().is_empty() => ModuleName::root(),
            Ok(relative) => ModuleName::new(relative.to_string_lossy().replace('\\', "/")),
            Err(_) => ModuleName::new(dir.to_string_lossy().replace('\\', "/")),
        }
    }

    // Lookups. Each self-refreshes before reading and returns an owned
    // snapshot; the map itself is never exposed for external mutation.

    pub fn pom_from_path(&self, path: &Path) -> Result<Option<Pom>, MetadataError> {
        self.update_cache()?;
        Ok(self.state.lock().poms.get(path).cloned())
    }

    pub fn pom_from_module_name(&self, module: &ModuleName) -> Result<Option<Pom>, MetadataError> {
        self.update_cache()?;
        Ok(self
            .state
            .lock()
            .poms
            .values()
            .find(|pom| &pom.module_name == module)
            .cloned())
    }

    pub fn module_names(&self) -> Result<BTreeSet<ModuleName>, MetadataError> {
        self.update_cache()?;
        Ok(self
            .state
            .lock()
            .poms
            .values()
            .map(|pom| pom.module_name.clone())
            .collect())
    }

    /// Every known Pom, ancestors before descendants.
    pub fn pom_map(&self) -> Result<Vec<Pom>, MetadataError> {
        self.update_cache()?;
        let state = self.state.lock();
        Ok(state
            .order
            .iter()
            .filter_map(|path| state.poms.get(path).cloned())
            .collect())
    }

    pub fn root_pom(&self) -> Result<Option<Pom>, MetadataError> {
        self.pom_from_path(&self.root_path.join(POM_FILE_NAME))
    }

    /// The module owning `file`: walks up from the file's directory to the
    /// nearest `pom.xml`, then resolves through the map.
    pub fn module_for_file(&self, file: &Path) -> Result<Option<Pom>, MetadataError> {
        self.update_cache()?;
        let Some(pom_path) = nearest_pom(file) else {
            return Ok(None);
        };
        Ok(self.state.lock().poms.get(&pom_path).cloned())
    }

    /// The module shell commands operate on, defaulting to the root module.
    pub fn focused_module(&self) -> Result<Option<Pom>, MetadataError> {
        self.update_cache()?;
        let mut state = self.state.lock();
        if state.focused.is_none() {
            let root = self.root_path.join(POM_FILE_NAME);
            if state.poms.contains_key(&root) {
                state.focused = Some(root);
            }
        }
        Ok(state
            .focused
            .as_ref()
            .and_then(|path| state.poms.get(path))
            .cloned())
    }

    pub fn focused_module_name(&self) -> Result<ModuleName, MetadataError> {
        Ok(self
            .focused_module()?
            .map(|pom| pom.module_name)
            .unwrap_or_else(ModuleName::root))
    }

    pub fn set_focused_module(&self, pom_path: &Path) -> Result<(), MetadataError> {
        self.update_cache()?;
        let mut state = self.state.lock();
        if state.poms.contains_key(pom_path) {
            state.focused = Some(pom_path.to_path_buf());
        } else {
            tracing::warn!(path = %pom_path.display(), "cannot focus an unknown module");
        }
        Ok(())
    }
}

impl std::fmt::Debug for PomManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("PomManager")
            .field("root_path", &self.root_path)
            .field("modules", &state.order.len())
            .field("pending", &state.pending.len())
            .finish()
    }
}

/// Stable re-sort of the pom order: every path is placed before the first
/// already-placed descendant of its directory, which keeps ancestors ahead of
/// descendants and leaves unrelated paths in their existing relative order.
fn sort_ancestors_first(state: &mut ManagerState) {
    let order = std::mem::take(&mut state.order);
    let mut sorted: Vec<PathBuf> = Vec::with_capacity(order.len());
    for path in order {
        let Some(root) = state.poms.get(&path).map(|pom| pom.root().to_path_buf()) else {
            continue;
        };
        let pos = sorted
            .iter()
            .position(|placed| {
                state
                    .poms
                    .get(placed)
                    .is_some_and(|pom| is_ancestor_dir(&root, pom.root()))
            })
            .unwrap_or(sorted.len());
        sorted.insert(pos, path);
    }
    state.order = sorted;
}
