//! Core data models used by the library.

use chrono::{DateTime, Utc};
use directory::ScopeInfo;
use serde::{Deserialize, Serialize};

use crate::filters::ScopeFilter;

/// Primary key of a stored document (Postgres `SERIAL`).
pub type DocumentId = i32;

/// A document ready to be written: content, its scope and its embedding.
///
/// The embedding is computed from `content` exactly once, before the write.
#[derive(Clone, Debug)]
pub struct NewDocument {
    pub content: String,
    pub scope: ScopeInfo,
    pub embedding: Vec<f32>,
}

/// A persisted document as seen by readers. The embedding stays in the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub content: String,
    #[serde(flatten)]
    pub scope: ScopeInfo,
    pub created_at: DateTime<Utc>,
}

/// One nearest-neighbour hit. Lower `distance` means more similar.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredDocument {
    pub id: DocumentId,
    pub content: String,
    pub scope: ScopeInfo,
    pub distance: f64,
}

/// Query parameters for retrieval.
///
/// `filter` is an explicit opt-in: `None` searches the entire corpus.
#[derive(Clone, Debug, Default)]
pub struct RagQuery<'a> {
    pub text: &'a str,
    pub top_k: Option<usize>,
    pub filter: Option<ScopeFilter>,
}

/// One page of documents, newest first, with the total match count.
#[derive(Clone, Debug, Serialize)]
pub struct DocumentPage {
    pub documents: Vec<StoredDocument>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Substring-search suggestion.
#[derive(Clone, Debug, PartialEq)]
pub struct Suggestion {
    pub content_preview: String,
    pub scope: ScopeInfo,
}

/// Returns the first `max_chars` characters of `text`, appending `...` when
/// something was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Returns at most `max_chars` characters of `text` without any marker.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_marks_truncation_only_when_needed() {
        assert_eq!(preview("short", 200), "short");
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("abc", 3), "abc");
    }

    #[test]
    fn truncation_respects_multibyte_chars() {
        let s = "ไม่ไหล";
        assert_eq!(truncate_chars(s, 2), "ไม");
        assert_eq!(truncate_chars(s, 100), s);
    }
}
