//! Database repositories
//!
//! Repository pattern for database access, separating data access logic
//! from business logic.

pub mod music_selections;
pub mod shows;
