//! Unit of Work pattern implementation.
//!
//! Centralizes access to every repository so services depend on one
//! abstraction. Operations that touch several records (enrollment,
//! course and account deletion) issue their writes in sequence; a
//! failure part-way leaves the earlier writes in place.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    AssignmentRepository, AssignmentStore, CourseRepository, CourseStore, NoteRepository,
    NoteStore, UserRepository, UserStore,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Unit of Work trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn courses(&self) -> Arc<dyn CourseRepository>;

    fn assignments(&self) -> Arc<dyn AssignmentRepository>;

    fn notes(&self) -> Arc<dyn NoteRepository>;
}

/// Concrete implementation of UnitOfWork backed by SeaORM stores
pub struct Persistence {
    user_repo: Arc<UserStore>,
    course_repo: Arc<CourseStore>,
    assignment_repo: Arc<AssignmentStore>,
    note_repo: Arc<NoteStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            course_repo: Arc::new(CourseStore::new(db.clone())),
            assignment_repo: Arc::new(AssignmentStore::new(db.clone())),
            note_repo: Arc::new(NoteStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn courses(&self) -> Arc<dyn CourseRepository> {
        self.course_repo.clone()
    }

    fn assignments(&self) -> Arc<dyn AssignmentRepository> {
        self.assignment_repo.clone()
    }

    fn notes(&self) -> Arc<dyn NoteRepository> {
        self.note_repo.clone()
    }
}
