use tracing::info;
use zs_core::{ArchiveGateway, Result, SearchResults};

pub mod backends;
pub mod extract;
pub mod index;

pub use backends::{ArchiveConfig, DirectoryArchive, InMemoryArchive};
pub use extract::{article_text, extract_text, extract_title};

/// Upper bound on the number of hits offered for selection.
pub const MAX_RESULTS: usize = 10;

/// Search the archive, preferring its full-text index and falling back to
/// title suggestions when it has none.
pub async fn find_articles(archive: &dyn ArchiveGateway, query: &str, limit: usize) -> Result<SearchResults> {
    let limit = limit.clamp(1, MAX_RESULTS);
    if archive.has_fulltext_index() {
        info!("📖 Searching for '{}' using full-text index", query);
        archive.search(query, limit).await
    } else {
        info!("📖 Full-text index not found. Searching titles for '{}'", query);
        archive.suggest(query, limit).await
    }
}

pub mod prelude {
    pub use super::{find_articles, ArchiveConfig, DirectoryArchive, InMemoryArchive, MAX_RESULTS};
    pub use zs_core::{ArchiveGateway, Article, Error, Result, SearchHit, SearchMode, SearchResults};
}
