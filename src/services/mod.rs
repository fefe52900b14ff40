//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion and reach repositories through the Unit of Work.
//! The acting user is always passed in explicitly.

mod assignment_service;
mod auth_service;
pub mod container;
mod course_service;
mod enrollment_service;
mod note_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use assignment_service::{AssignmentManager, AssignmentService};
pub use auth_service::{AuthService, AuthSession, Authenticator, Claims, Registration};
pub use course_service::{CourseManager, CourseService};
pub use enrollment_service::{EnrollmentManager, EnrollmentService};
pub use note_service::{NoteManager, NoteService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
