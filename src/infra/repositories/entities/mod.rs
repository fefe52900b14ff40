//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Embedded collections are stored as JSONB columns through small
//! newtype wrappers.

pub mod assignment;
pub mod course;
pub mod note;
pub mod user;

// Re-exports for public API convenience
#[allow(unused_imports)]
pub use assignment::{
    ActiveModel as AssignmentActiveModel, Entity as AssignmentEntity, Model as AssignmentModel,
};
#[allow(unused_imports)]
pub use course::{ActiveModel as CourseActiveModel, Entity as CourseEntity, Model as CourseModel};
#[allow(unused_imports)]
pub use note::{ActiveModel as NoteActiveModel, Entity as NoteEntity, Model as NoteModel};
#[allow(unused_imports)]
pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel};
