//! LMS API - REST backend for a learning management system
//!
//! Teachers own courses and the assignments inside them; students enroll,
//! submit work before the deadline and receive grades. Every mutation runs
//! through role and ownership guards before it touches storage.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Entities, guards and the clock
//! - **services**: Application use cases and business logic
//! - **infra**: Database, repositories, migrations and Redis
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Response envelope
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::{create_router, AppState};
pub use config::Config;
pub use domain::{CurrentUser, User, UserRole};
pub use errors::{AppError, AppResult};
