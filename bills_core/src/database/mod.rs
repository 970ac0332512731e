//! Database connection pooling and schema migrations

pub mod connection;
pub mod migrations;

pub use connection::{get_database_pool, DatabaseManager};
pub use migrations::{run_migrations, MigrationManager, MigrationRecord};
