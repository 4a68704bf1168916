use async_trait::async_trait;
use crate::types::{Article, SearchResults};
use crate::Result;

#[async_trait]
pub trait ArchiveGateway: Send + Sync {
    /// Human readable name of the backing store
    fn name(&self) -> &str;

    /// Whether `search` is backed by a full-text index
    fn has_fulltext_index(&self) -> bool;

    /// Path of the archive's landing article, if it has one
    fn main_entry(&self) -> Option<String>;

    /// Full-text search over article bodies
    async fn search(&self, query: &str, limit: usize) -> Result<SearchResults>;

    /// Title suggestions, used when no full-text index is available
    async fn suggest(&self, query: &str, limit: usize) -> Result<SearchResults>;

    /// Fetch one entry with its raw content
    async fn fetch(&self, path: &str) -> Result<Article>;
}
