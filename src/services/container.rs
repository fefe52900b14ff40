//! Service Container - Centralized service access.
//!
//! Builds every service over one shared Unit of Work and clock and hands
//! them out as trait objects.

use std::sync::Arc;

use super::{
    AssignmentManager, AssignmentService, AuthService, Authenticator, CourseManager,
    CourseService, EnrollmentManager, EnrollmentService, NoteManager, NoteService, UserManager,
    UserService,
};
use crate::config::Config;
use crate::domain::{Clock, SystemClock};
use crate::infra::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn courses(&self) -> Arc<dyn CourseService>;

    fn enrollments(&self) -> Arc<dyn EnrollmentService>;

    fn assignments(&self) -> Arc<dyn AssignmentService>;

    fn notes(&self) -> Arc<dyn NoteService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    course_service: Arc<dyn CourseService>,
    enrollment_service: Arc<dyn EnrollmentService>,
    assignment_service: Arc<dyn AssignmentService>,
    note_service: Arc<dyn NoteService>,
}

impl Services {
    /// Wire every service over the given Unit of Work and clock
    pub fn new<U: UnitOfWork + 'static>(uow: Arc<U>, config: Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            course_service: Arc::new(CourseManager::new(uow.clone(), clock.clone())),
            enrollment_service: Arc::new(EnrollmentManager::new(uow.clone(), clock.clone())),
            assignment_service: Arc::new(AssignmentManager::new(uow.clone(), clock)),
            note_service: Arc::new(NoteManager::new(uow)),
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));
        Self::new(uow, config, Arc::new(SystemClock))
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn courses(&self) -> Arc<dyn CourseService> {
        self.course_service.clone()
    }

    fn enrollments(&self) -> Arc<dyn EnrollmentService> {
        self.enrollment_service.clone()
    }

    fn assignments(&self) -> Arc<dyn AssignmentService> {
        self.assignment_service.clone()
    }

    fn notes(&self) -> Arc<dyn NoteService> {
        self.note_service.clone()
    }
}
