//! Query parameters for GET /search and GET /shows

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::music_selection::MusicSelection;
use super::pagination::{PageInfo, Pagination};
use super::validation::{
    has_control_chars, normalize_text, Difficulty, CONTROL_CHARS_MESSAGE, MAX_SHORT_TEXT,
};
use crate::config::PageLimits;
use crate::error::{ApiError, FieldError};

/// Raw query string of GET /search
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: Option<String>,
    pub difficulty: Option<String>,
    pub show_id: Option<i32>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Ordering of search results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    TitleAsc,
    TitleDesc,
}

impl SortOrder {
    /// ORDER BY clause; `id` breaks ties so pages stay stable
    pub fn order_by(&self) -> &'static str {
        match self {
            SortOrder::Newest => "created_at DESC, id DESC",
            SortOrder::Oldest => "created_at ASC, id ASC",
            SortOrder::TitleAsc => "lower(title) ASC, id ASC",
            SortOrder::TitleDesc => "lower(title) DESC, id DESC",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::TitleAsc => "title",
            SortOrder::TitleDesc => "-title",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "title" => Ok(SortOrder::TitleAsc),
            "-title" => Ok(SortOrder::TitleDesc),
            other => Err(format!(
                "must be one of newest, oldest, title, -title (got '{}')",
                other
            )),
        }
    }
}

/// Normalized music selection search
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchFilter {
    /// Whitespace-collapsed search term, `None` when blank
    pub term: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub show_id: Option<i32>,
    pub sort: SortOrder,
    pub pagination: Pagination,
}

impl SearchFilter {
    pub fn from_params(params: SearchParams, limits: PageLimits) -> Result<Self, ApiError> {
        let mut errors = Vec::new();

        let term = normalize_term(params.q.as_deref(), &mut errors);
        let difficulty = parse_difficulty_param(params.difficulty.as_deref(), &mut errors);
        let sort = match params.sort.as_deref().map(str::parse::<SortOrder>) {
            None => SortOrder::default(),
            Some(Ok(sort)) => sort,
            Some(Err(message)) => {
                errors.push(FieldError::new("sort", message));
                SortOrder::default()
            }
        };

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        Ok(Self {
            term,
            difficulty,
            show_id: params.show_id,
            sort,
            pagination: Pagination::new(params.page, params.limit, limits),
        })
    }

    /// ILIKE pattern for the term, with LIKE wildcards escaped
    pub fn like_pattern(&self) -> Option<String> {
        self.term.as_deref().map(like_pattern)
    }

    /// Canonical text form, used to derive cache keys
    pub fn fingerprint(&self) -> String {
        format!(
            "q={}|difficulty={}|show={}|sort={}|page={}|limit={}",
            self.term.as_deref().unwrap_or(""),
            self.difficulty.map(|d| d.as_str()).unwrap_or(""),
            self.show_id.map(|id| id.to_string()).unwrap_or_default(),
            self.sort.as_str(),
            self.pagination.page,
            self.pagination.limit,
        )
    }
}

/// Body of a GET /search response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub items: Vec<MusicSelection>,
    pub pagination: PageInfo,
    /// Normalized term actually searched for
    pub query: Option<String>,
}

/// Raw query string of GET /shows
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowListParams {
    pub q: Option<String>,
    pub difficulty: Option<String>,
    pub year: Option<i32>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Normalized show listing filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowFilter {
    pub term: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub year: Option<i32>,
    pub pagination: Pagination,
}

impl ShowFilter {
    pub fn from_params(params: ShowListParams, limits: PageLimits) -> Result<Self, ApiError> {
        let mut errors = Vec::new();

        let term = normalize_term(params.q.as_deref(), &mut errors);
        let difficulty = parse_difficulty_param(params.difficulty.as_deref(), &mut errors);

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        Ok(Self {
            term,
            difficulty,
            year: params.year,
            pagination: Pagination::new(params.page, params.limit, limits),
        })
    }

    pub fn like_pattern(&self) -> Option<String> {
        self.term.as_deref().map(like_pattern)
    }
}

fn normalize_term(raw: Option<&str>, errors: &mut Vec<FieldError>) -> Option<String> {
    let term = normalize_text(raw?);
    if term.is_empty() {
        return None;
    }
    if has_control_chars(&term, false) {
        errors.push(FieldError::new("q", CONTROL_CHARS_MESSAGE));
    } else if term.chars().count() > MAX_SHORT_TEXT {
        errors.push(FieldError::new(
            "q",
            format!("must be at most {} characters", MAX_SHORT_TEXT),
        ));
    }
    Some(term)
}

fn parse_difficulty_param(
    raw: Option<&str>,
    errors: &mut Vec<FieldError>,
) -> Option<Difficulty> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(difficulty) => Some(difficulty),
        Err(message) => {
            errors.push(FieldError::new("difficulty", message));
            None
        }
    }
}

/// Substring pattern matching `term` literally
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
