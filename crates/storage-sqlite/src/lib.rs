//! SQLite storage implementation for Emlak.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `emlak-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The listing repository
//! - Database-specific model types (with Diesel derives)
//!
//! This crate is the only place in the application where Diesel dependencies exist.

pub mod db;
pub mod errors;
pub mod properties;
pub mod schema;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use properties::PropertyRepository;

// Re-export from emlak-core for convenience
pub use emlak_core::errors::{DatabaseError, Error, Result};
