use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::music_selection::MusicSelection;
use super::validation::{Difficulty, Validator, MAX_SHORT_TEXT};
use crate::db::models::NewShow;
use crate::error::ApiError;

/// Body of POST /shows
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShowRequest {
    pub title: Option<String>,
    pub year: Option<i64>,
    pub difficulty: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub composer: Option<String>,
    pub song_title: Option<String>,
}

impl CreateShowRequest {
    pub fn validate(self) -> Result<NewShow, ApiError> {
        let mut v = Validator::new();

        let title = v.required_text("title", self.title, MAX_SHORT_TEXT);
        let year = v.int_in_range("year", self.year, 1, 9999);
        let difficulty = v.difficulty(self.difficulty);
        let duration = v.duration(self.duration);
        let description = v.optional_long_text("description", self.description);
        let thumbnail_url = v.url("thumbnailUrl", self.thumbnail_url);
        let composer = v.optional_text("composer", self.composer, MAX_SHORT_TEXT);
        let song_title = v.optional_text("songTitle", self.song_title, MAX_SHORT_TEXT);

        v.finish().map_err(ApiError::Validation)?;

        Ok(NewShow {
            title,
            year,
            difficulty: difficulty.map(|d| d.as_str().to_string()),
            duration,
            description,
            thumbnail_url,
            composer,
            song_title,
        })
    }
}

/// Show as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub id: i32,
    pub title: String,
    pub year: Option<i32>,
    pub difficulty: Option<Difficulty>,
    pub duration: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub composer: Option<String>,
    pub song_title: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// GET /shows/:id response: the show and the selections linked to it
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowDetail {
    #[serde(flatten)]
    pub show: Show,
    pub music_selections: Vec<MusicSelection>,
}
