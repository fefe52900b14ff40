//! HTTP request handlers.

pub mod assignment_handler;
pub mod auth_handler;
pub mod course_handler;
pub mod note_handler;

pub use assignment_handler::assignment_routes;
pub use auth_handler::{account_routes, auth_routes};
pub use course_handler::course_routes;
pub use note_handler::note_routes;
