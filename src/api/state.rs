//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database};
use crate::services::{
    AssignmentService, AuthService, CourseService, EnrollmentService, NoteService,
    ServiceContainer, Services, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub course_service: Arc<dyn CourseService>,
    pub enrollment_service: Arc<dyn EnrollmentService>,
    pub assignment_service: Arc<dyn AssignmentService>,
    pub note_service: Arc<dyn NoteService>,
    /// Redis cache; rate limiting is skipped without it
    pub cache: Option<Arc<Cache>>,
    /// Database handle for health checks; absent when services are injected
    pub database: Option<Arc<Database>>,
    /// Allowed CORS origins
    pub cors_origins: Vec<String>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, cache: Option<Arc<Cache>>, config: Config) -> Self {
        let cors_origins = config.cors_origins.clone();
        let container = Services::from_connection(database.get_connection(), config);

        let mut state = Self::from_container(&container);
        state.cache = cache;
        state.database = Some(database);
        state.cors_origins = cors_origins;
        state
    }

    /// Create application state from any service container.
    ///
    /// No database or cache is attached, so health reports only the process
    /// and rate limiting is off.
    pub fn from_container(container: &dyn ServiceContainer) -> Self {
        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            course_service: container.courses(),
            enrollment_service: container.enrollments(),
            assignment_service: container.assignments(),
            note_service: container.notes(),
            cache: None,
            database: None,
            cors_origins: Vec::new(),
        }
    }
}
