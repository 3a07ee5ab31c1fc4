use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{Difficulty, Validator, MAX_SHORT_TEXT};
use crate::db::models::NewMusicSelection;
use crate::error::ApiError;

/// Highest tempo accepted for a selection
pub const MAX_BPM: i64 = 400;

/// Body of POST /add_music_selection
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMusicSelectionRequest {
    pub title: Option<String>,
    pub show_id: Option<i64>,
    pub composer: Option<String>,
    pub arranger: Option<String>,
    pub lyricist: Option<String>,
    pub song_title: Option<String>,
    pub difficulty: Option<String>,
    pub duration: Option<String>,
    pub bpm: Option<i64>,
    pub instrumentation: Option<String>,
    pub notes: Option<String>,
}

impl AddMusicSelectionRequest {
    /// Validate and normalize into an insertable row.
    /// All field errors are reported together.
    pub fn validate(self) -> Result<NewMusicSelection, ApiError> {
        let mut v = Validator::new();

        let title = v.required_text("title", self.title, MAX_SHORT_TEXT);
        let show_id = v.int_in_range("showId", self.show_id, 1, i32::MAX as i64);
        let composer = v.optional_text("composer", self.composer, MAX_SHORT_TEXT);
        let arranger = v.optional_text("arranger", self.arranger, MAX_SHORT_TEXT);
        let lyricist = v.optional_text("lyricist", self.lyricist, MAX_SHORT_TEXT);
        let song_title = v.optional_text("songTitle", self.song_title, MAX_SHORT_TEXT);
        let difficulty = v.difficulty(self.difficulty);
        let duration = v.duration(self.duration);
        let bpm = v.int_in_range("bpm", self.bpm, 1, MAX_BPM);
        let instrumentation =
            v.optional_text("instrumentation", self.instrumentation, MAX_SHORT_TEXT);
        let notes = v.optional_long_text("notes", self.notes);

        v.finish().map_err(ApiError::Validation)?;

        Ok(NewMusicSelection {
            id: Uuid::new_v4(),
            show_id,
            title,
            composer,
            arranger,
            lyricist,
            song_title,
            difficulty: difficulty.map(|d| d.as_str().to_string()),
            duration,
            bpm,
            instrumentation,
            notes,
        })
    }
}

/// Music selection as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicSelection {
    pub id: Uuid,
    pub show_id: Option<i32>,
    pub title: String,
    pub composer: Option<String>,
    pub arranger: Option<String>,
    pub lyricist: Option<String>,
    pub song_title: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub duration: Option<String>,
    pub bpm: Option<i32>,
    pub instrumentation: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(err: ApiError) -> Vec<&'static str> {
        match err {
            ApiError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_minimal_selection() {
        let request = AddMusicSelectionRequest {
            title: Some("  Bolero ".into()),
            ..Default::default()
        };
        let row = request.validate().unwrap();
        assert_eq!(row.title, "Bolero");
        assert_eq!(row.show_id, None);
        assert_eq!(row.difficulty, None);
    }

    #[test]
    fn test_full_selection_is_normalized() {
        let request = AddMusicSelectionRequest {
            title: Some("Firebird Finale".into()),
            show_id: Some(7),
            composer: Some("Igor  Stravinsky".into()),
            arranger: Some("".into()),
            difficulty: Some("advanced".into()),
            duration: Some("3:10".into()),
            bpm: Some(132),
            ..Default::default()
        };
        let row = request.validate().unwrap();
        assert_eq!(row.show_id, Some(7));
        assert_eq!(row.composer.as_deref(), Some("Igor Stravinsky"));
        assert_eq!(row.arranger, None);
        assert_eq!(row.difficulty.as_deref(), Some("Advanced"));
        assert_eq!(row.bpm, Some(132));
    }

    #[test]
    fn test_blank_title_rejected() {
        let request = AddMusicSelectionRequest {
            title: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(details(request.validate().unwrap_err()), vec!["title"]);
    }

    #[test]
    fn test_all_errors_reported_together() {
        let request = AddMusicSelectionRequest {
            title: None,
            show_id: Some(0),
            difficulty: Some("Expert".into()),
            duration: Some("forever".into()),
            bpm: Some(1000),
            composer: Some("x".repeat(MAX_SHORT_TEXT + 1)),
            ..Default::default()
        };
        let fields = details(request.validate().unwrap_err());
        assert_eq!(
            fields,
            vec!["title", "showId", "composer", "difficulty", "duration", "bpm"]
        );
    }
}
