use std::sync::Arc;

use anvil_file_monitor::{DirtyFileLog, FileEvent, FileOperation};
use anvil_metadata::MetadataError;

use crate::{PomManager, POM_FILE_NAME};

/// Bridges classified file events into targeted cache refreshes.
///
/// Every event is recorded into the dirty-file log for pull-side consumers;
/// a change to any `pom.xml` additionally triggers an immediate module-graph
/// refresh, which fans out recomputation to whatever metadata depends on the
/// affected modules. Monitoring-shutdown events are dropped entirely.
pub struct FileChangeRouter {
    log: Arc<DirtyFileLog>,
    manager: Arc<PomManager>,
}

impl FileChangeRouter {
    pub fn new(log: Arc<DirtyFileLog>, manager: Arc<PomManager>) -> Self {
        Self { log, manager }
    }

    pub fn on_file_event(&self, event: &FileEvent) -> Result<(), MetadataError> {
        if event.operation == FileOperation::MonitoringFinish {
            return Ok(());
        }
        self.log.record(event.clone());

        if event.path.file_name().is_some_and(|name| name == POM_FILE_NAME) {
            tracing::debug!(path = %event.path.display(), "build descriptor changed");
            self.manager.update_cache()?;
        }
        Ok(())
    }
}
