//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod assignment_repository;
mod course_repository;
pub(crate) mod entities;
mod note_repository;
mod user_repository;

pub use assignment_repository::{AssignmentRepository, AssignmentStore};
pub use course_repository::{CourseRepository, CourseStore};
pub use note_repository::{NoteRepository, NoteStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use assignment_repository::MockAssignmentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use course_repository::MockCourseRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use note_repository::MockNoteRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
