//! Database module
//!
//! PostgreSQL integration using sqlx with:
//! - One pool for the primary "shows" database and one for the
//!   "music_selections" bind
//! - Row types with FromRow
//! - Repository pattern for data access

pub mod models;
pub mod pool;
pub mod repository;

// Re-export commonly used items
pub use models::{MusicSelectionRow, ShowRow};
pub use pool::{create_pool, health_check, run_migrations, Databases};
