use std::sync::Arc;

use course_core::model::{CourseCatalog, LevelId, ModuleId};
use storage::repository::Storage;

use crate::error::{AppServicesError, ModuleFlowError};
use crate::module_flow::ModuleSession;
use crate::progress_service::ProgressService;

/// Assembles the progress core for an embedding application.
///
/// Validates the catalog once at startup, then hands out the progress
/// service and per-visit module sessions built on top of it.
#[derive(Debug)]
pub struct AppServices {
    progress: ProgressService,
}

impl AppServices {
    /// Builds services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns [`AppServicesError::Catalog`] when the catalog is malformed
    /// and [`AppServicesError::Sqlite`] when storage cannot be opened.
    pub async fn new_sqlite(
        db_url: &str,
        catalog: CourseCatalog,
    ) -> Result<Self, AppServicesError> {
        catalog.validate()?;
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::assemble(catalog, &storage).await)
    }

    /// Builds services on the in-memory backend, for tests and previews.
    ///
    /// # Errors
    ///
    /// Returns [`AppServicesError::Catalog`] when the catalog is malformed.
    pub async fn new_in_memory(catalog: CourseCatalog) -> Result<Self, AppServicesError> {
        catalog.validate()?;
        let storage = Storage::in_memory();
        Ok(Self::assemble(catalog, &storage).await)
    }

    async fn assemble(catalog: CourseCatalog, storage: &Storage) -> Self {
        let progress =
            ProgressService::load_or_default(Arc::new(catalog), Arc::clone(&storage.progress))
                .await;
        Self { progress }
    }

    /// Course content the services were built over
    #[must_use]
    pub fn catalog(&self) -> &CourseCatalog {
        self.progress.catalog()
    }

    /// Read access to the progress service
    #[must_use]
    pub fn progress(&self) -> &ProgressService {
        &self.progress
    }

    /// Mutable access, for recording progress
    pub fn progress_mut(&mut self) -> &mut ProgressService {
        &mut self.progress
    }

    /// Opens a per-visit session on one module's content.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleFlowError::ModuleNotFound`] when the pair does not
    /// name a module of the catalog.
    pub fn open_module(
        &self,
        level_id: &LevelId,
        module_id: &ModuleId,
    ) -> Result<ModuleSession, ModuleFlowError> {
        ModuleSession::open(&self.progress, level_id, module_id)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
