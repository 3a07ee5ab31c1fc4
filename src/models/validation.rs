//! Field validation shared by shows and music selections

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FieldError;

/// Maximum length of short text fields (title, composer, ...)
pub const MAX_SHORT_TEXT: usize = 200;

/// Maximum length of free-form text (notes, description)
pub const MAX_LONG_TEXT: usize = 2000;

lazy_static! {
    // m:ss or mm:ss, ASCII digits only
    static ref DURATION_REGEX: Regex = Regex::new(r"^[0-9]{1,2}:[0-5][0-9]$").unwrap();
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
}

pub const CONTROL_CHARS_MESSAGE: &str = "must not contain control characters";

/// Performance difficulty of a show or selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(format!(
                "must be one of Beginner, Intermediate, Advanced (got '{}')",
                s.trim()
            )),
        }
    }
}

/// Parse a difficulty column value; unknown values read as `None`
pub fn parse_difficulty(value: Option<&str>) -> Option<Difficulty> {
    value.and_then(|v| v.parse().ok())
}

/// Trim and collapse runs of whitespace into a single space
pub fn normalize_text(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text.trim(), " ").into_owned()
}

/// Whether `text` holds a control character (NUL included).
/// Line breaks and tabs are allowed when `multiline` is set.
pub fn has_control_chars(text: &str, multiline: bool) -> bool {
    text.chars()
        .any(|c| c.is_control() && !(multiline && matches!(c, '\n' | '\r' | '\t')))
}

/// Collects field errors while a request is being validated
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Required text: trimmed, non-empty, bounded length
    pub fn required_text(
        &mut self,
        field: &'static str,
        value: Option<String>,
        max: usize,
    ) -> String {
        match self.optional_text(field, value, max) {
            Some(text) => text,
            None => {
                self.push(field, "is required");
                String::new()
            }
        }
    }

    /// Optional text: trimmed, blank becomes `None`, bounded length
    pub fn optional_text(
        &mut self,
        field: &'static str,
        value: Option<String>,
        max: usize,
    ) -> Option<String> {
        let text = normalize_text(&value?);
        if text.is_empty() {
            return None;
        }
        if has_control_chars(&text, false) {
            self.push(field, CONTROL_CHARS_MESSAGE);
        } else if text.chars().count() > max {
            self.push(field, format!("must be at most {} characters", max));
        }
        Some(text)
    }

    /// Free-form text: trimmed only, so line breaks survive
    pub fn optional_long_text(
        &mut self,
        field: &'static str,
        value: Option<String>,
    ) -> Option<String> {
        let text = value?.trim().to_string();
        if text.is_empty() {
            return None;
        }
        if has_control_chars(&text, true) {
            self.push(field, CONTROL_CHARS_MESSAGE);
        } else if text.chars().count() > MAX_LONG_TEXT {
            self.push(field, format!("must be at most {} characters", MAX_LONG_TEXT));
        }
        Some(text)
    }

    pub fn difficulty(&mut self, value: Option<String>) -> Option<Difficulty> {
        let raw = value?;
        if raw.trim().is_empty() {
            return None;
        }
        match raw.parse() {
            Ok(difficulty) => Some(difficulty),
            Err(message) => {
                self.push("difficulty", message);
                None
            }
        }
    }

    pub fn duration(&mut self, value: Option<String>) -> Option<String> {
        let text = value?.trim().to_string();
        if text.is_empty() {
            return None;
        }
        if !DURATION_REGEX.is_match(&text) {
            self.push("duration", "must look like m:ss or mm:ss");
        }
        Some(text)
    }

    pub fn int_in_range(
        &mut self,
        field: &'static str,
        value: Option<i64>,
        min: i64,
        max: i64,
    ) -> Option<i32> {
        let v = value?;
        if v < min || v > max {
            self.push(field, format!("must be between {} and {}", min, max));
            return None;
        }
        Some(v as i32)
    }

    pub fn url(&mut self, field: &'static str, value: Option<String>) -> Option<String> {
        let text = value?.trim().to_string();
        if text.is_empty() {
            return None;
        }
        if !(text.starts_with("http://") || text.starts_with("https://")) {
            self.push(field, "must be an http(s) URL");
        } else if has_control_chars(&text, false) {
            self.push(field, CONTROL_CHARS_MESSAGE);
        } else if text.len() > MAX_LONG_TEXT {
            self.push(field, format!("must be at most {} characters", MAX_LONG_TEXT));
        }
        Some(text)
    }

    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
