//! Service container for dependency injection
//!
//! Wires up the dictionary service with its I/O dependencies.

use std::sync::Arc;

use crate::application::services::DictionaryService;
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem, Selector, SkimSelector};

/// Container holding settings and I/O boundary implementations.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Interactive selector abstraction
    pub selector: Arc<dyn Selector>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(SkimSelector))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        selector: Arc<dyn Selector>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            selector,
        }
    }

    /// Open the dictionary configured in `settings`.
    pub fn dictionary(&self) -> ApplicationResult<DictionaryService> {
        DictionaryService::open(self.fs.clone(), self.settings.dictionary_options())
    }
}
