use std::sync::Arc;

use learnify_core::Catalog;
use learnify_core::model::User;
use storage::repository::{InMemoryUserDirectory, Storage};

use crate::Clock;
use crate::config::SessionConfig;
use crate::course_service::CourseService;
use crate::dashboard::DashboardStats;
use crate::error::AppServicesError;
use crate::lesson_service::LessonService;
use crate::seed::{SeedData, bundled_seed};
use crate::session_store::SessionStore;

/// Assembles app-facing services over one catalog and one storage backend.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<Catalog>,
    storage: Storage,
    config: SessionConfig,
    course_service: Arc<CourseService>,
    lesson_service: Arc<LessonService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the bundled catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the seed is invalid or storage
    /// initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        config: SessionConfig,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let SeedData { catalog, users } = bundled_seed()?;
        let storage = Storage::sqlite(db_url, Arc::new(InMemoryUserDirectory::new(users))).await?;
        Ok(Self::assemble(catalog, storage, config, clock))
    }

    /// Build services over process-local storage and the bundled catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the bundled seed is invalid.
    pub fn in_memory(config: SessionConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let SeedData { catalog, users } = bundled_seed()?;
        Ok(Self::assemble(catalog, Storage::in_memory(users), config, clock))
    }

    #[must_use]
    pub fn assemble(
        catalog: Catalog,
        storage: Storage,
        config: SessionConfig,
        clock: Clock,
    ) -> Self {
        let catalog = Arc::new(catalog);
        Self {
            course_service: Arc::new(CourseService::new(Arc::clone(&catalog))),
            lesson_service: Arc::new(LessonService::new(Arc::clone(&catalog), clock)),
            catalog,
            storage,
            config,
        }
    }

    /// A new, logged-out session over the shared storage. Call
    /// [`SessionStore::load_session`] to restore a saved one.
    #[must_use]
    pub fn session_store(&self) -> SessionStore {
        SessionStore::from_storage(&self.storage, self.config.clone())
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn course_service(&self) -> Arc<CourseService> {
        Arc::clone(&self.course_service)
    }

    #[must_use]
    pub fn lesson_service(&self) -> Arc<LessonService> {
        Arc::clone(&self.lesson_service)
    }

    #[must_use]
    pub fn dashboard(&self, user: &User) -> DashboardStats {
        DashboardStats::for_user(user, &self.catalog)
    }
}
