//! Persistence layer — libSQL-backed storage for settings and step history.

pub mod libsql_backend;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use traits::{Database, ResolutionRecord};
