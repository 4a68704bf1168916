use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// An entry fetched from the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub path: String,
    pub title: String,
    pub content: Vec<u8>,
}

impl Article {
    pub fn new(path: impl Into<String>, title: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            content: content.into(),
        }
    }

    /// Raw content decoded as UTF-8, replacing invalid sequences.
    pub fn content_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub path: String,
    /// `None` when the entry behind the hit could not be resolved.
    pub title: Option<String>,
}

impl SearchHit {
    pub fn new(path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: Some(title.into()),
        }
    }

    pub fn invalid(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: None,
        }
    }
}

impl fmt::Display for SearchHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => write!(f, "{}", title),
            None => write!(f, "[Invalid entry: {}]", self.path),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    FullText,
    Title,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::FullText => write!(f, "full-text index"),
            SearchMode::Title => write!(f, "title suggestions"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub mode: SearchMode,
    pub estimated_total: usize,
    pub hits: Vec<SearchHit>,
}

impl SearchResults {
    pub fn empty(mode: SearchMode) -> Self {
        Self {
            mode,
            estimated_total: 0,
            hits: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
