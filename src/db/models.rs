//! Database row types for PostgreSQL
//!
//! These types map directly to database rows and can be converted
//! to the API response types in models/

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::validation::parse_difficulty;
use crate::models::{MusicSelection, Show};

// ============================================================================
// Database Row Types
// ============================================================================

/// Show row from the primary database
#[derive(Debug, Clone, FromRow)]
pub struct ShowRow {
    pub id: i32,
    pub title: String,
    pub year: Option<i32>,
    pub difficulty: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub composer: Option<String>,
    pub song_title: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ShowRow> for Show {
    fn from(row: ShowRow) -> Self {
        Show {
            id: row.id,
            title: row.title,
            year: row.year,
            difficulty: parse_difficulty(row.difficulty.as_deref()),
            duration: row.duration,
            description: row.description,
            thumbnail_url: row.thumbnail_url,
            composer: row.composer,
            song_title: row.song_title,
            created_at: row.created_at,
        }
    }
}

/// Music selection row from the music_selections bind
#[derive(Debug, Clone, FromRow)]
pub struct MusicSelectionRow {
    pub id: Uuid,
    pub show_id: Option<i32>,
    pub title: String,
    pub composer: Option<String>,
    pub arranger: Option<String>,
    pub lyricist: Option<String>,
    pub song_title: Option<String>,
    pub difficulty: Option<String>,
    pub duration: Option<String>,
    pub bpm: Option<i32>,
    pub instrumentation: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<MusicSelectionRow> for MusicSelection {
    fn from(row: MusicSelectionRow) -> Self {
        MusicSelection {
            id: row.id,
            show_id: row.show_id,
            title: row.title,
            composer: row.composer,
            arranger: row.arranger,
            lyricist: row.lyricist,
            song_title: row.song_title,
            difficulty: parse_difficulty(row.difficulty.as_deref()),
            duration: row.duration,
            bpm: row.bpm,
            instrumentation: row.instrumentation,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

// ============================================================================
// Insert Types
// ============================================================================

/// New show to insert
#[derive(Debug, Clone)]
pub struct NewShow {
    pub title: String,
    pub year: Option<i32>,
    pub difficulty: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub composer: Option<String>,
    pub song_title: Option<String>,
}

/// New music selection to insert (already validated)
#[derive(Debug, Clone)]
pub struct NewMusicSelection {
    pub id: Uuid,
    pub show_id: Option<i32>,
    pub title: String,
    pub composer: Option<String>,
    pub arranger: Option<String>,
    pub lyricist: Option<String>,
    pub song_title: Option<String>,
    pub difficulty: Option<String>,
    pub duration: Option<String>,
    pub bpm: Option<i32>,
    pub instrumentation: Option<String>,
    pub notes: Option<String>,
}
