//! HTTP surface of the LMS.
//!
//! Routes live under `/api`. Everything except register and login sits
//! behind the bearer-token middleware, which hands the resolved
//! `CurrentUser` to handlers as a request extension.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
