use std::sync::Arc;
use tokio::sync::watch;

use crate::content::types::{Module, Section};

/// Immutable snapshot of every loaded module
pub type ModuleSnapshot = Arc<Vec<Module>>;

/// Holds the current set of learning modules.
///
/// Content is never mutated in place: each [`ContentStore::publish`] replaces
/// the whole snapshot and wakes every subscriber.
#[derive(Debug, Clone)]
pub struct ContentStore {
    modules: Arc<watch::Sender<ModuleSnapshot>>,
}

impl ContentStore {
    /// Create an empty content store
    pub fn new() -> Self {
        Self::with_modules(Vec::new())
    }

    /// Create a content store seeded with modules
    pub fn with_modules(modules: Vec<Module>) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(modules));
        Self {
            modules: Arc::new(tx),
        }
    }

    /// Replace the current snapshot
    pub fn publish(&self, modules: Vec<Module>) {
        tracing::info!("Publishing content snapshot with {} modules", modules.len());
        self.modules.send_replace(Arc::new(modules));
    }

    /// Get the current snapshot
    pub fn snapshot(&self) -> ModuleSnapshot {
        self.modules.borrow().clone()
    }

    /// Subscribe to snapshot changes
    pub fn subscribe(&self) -> watch::Receiver<ModuleSnapshot> {
        self.modules.subscribe()
    }

    /// Get a specific module by ID
    pub fn module(&self, module_id: &str) -> Option<Module> {
        self.modules
            .borrow()
            .iter()
            .find(|module| module.id == module_id)
            .cloned()
    }

    /// Get a specific section by module and section ID
    pub fn section(&self, module_id: &str, section_id: &str) -> Option<Section> {
        self.modules
            .borrow()
            .iter()
            .filter(|module| module.id == module_id)
            .flat_map(|module| module.sections.iter())
            .find(|section| section.id == section_id)
            .cloned()
    }
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::new()
    }
}
