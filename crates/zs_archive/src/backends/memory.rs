use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use zs_core::{ArchiveGateway, Article, Error, Result, SearchResults};
use crate::extract::extract_text;
use crate::index::{suggest_titles, FullTextIndex};

pub struct MemoryStore {
    articles: Vec<Article>,
    index: Option<FullTextIndex>,
}

impl MemoryStore {
    pub fn new(fulltext: bool) -> Self {
        Self {
            articles: Vec::new(),
            index: fulltext.then(FullTextIndex::new),
        }
    }

    pub fn insert(&mut self, article: Article) {
        if let Some(existing) = self.articles.iter_mut().find(|a| a.path == article.path) {
            *existing = article;
            self.reindex();
            return;
        }
        if let Some(index) = self.index.as_mut() {
            index.add(&article.path, &article.title, &extract_text(&article.content));
        }
        self.articles.push(article);
    }

    fn reindex(&mut self) {
        let Some(index) = self.index.as_mut() else {
            return;
        };
        *index = FullTextIndex::new();
        for article in &self.articles {
            index.add(&article.path, &article.title, &extract_text(&article.content));
        }
    }

    pub fn get(&self, path: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.path == path)
    }
}

/// Archive held entirely in memory.
#[derive(Clone)]
pub struct InMemoryArchive {
    store: Arc<RwLock<MemoryStore>>,
    fulltext: bool,
}

impl InMemoryArchive {
    pub fn new(fulltext: bool) -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore::new(fulltext))),
            fulltext,
        }
    }

    pub async fn with_articles(fulltext: bool, articles: impl IntoIterator<Item = Article>) -> Self {
        let archive = Self::new(fulltext);
        for article in articles {
            archive.insert(article).await;
        }
        archive
    }

    pub async fn insert(&self, article: Article) {
        let mut store = self.store.write().await;
        store.insert(article);
    }
}

#[async_trait]
impl ArchiveGateway for InMemoryArchive {
    fn name(&self) -> &str {
        "memory"
    }

    fn has_fulltext_index(&self) -> bool {
        self.fulltext
    }

    fn main_entry(&self) -> Option<String> {
        None
    }

    async fn search(&self, query: &str, limit: usize) -> Result<SearchResults> {
        let store = self.store.read().await;
        match &store.index {
            Some(index) => Ok(index.search(query, limit)),
            None => Err(Error::Archive("memory archive was created without a full-text index".to_string())),
        }
    }

    async fn suggest(&self, query: &str, limit: usize) -> Result<SearchResults> {
        let store = self.store.read().await;
        Ok(suggest_titles(
            store.articles.iter().map(|a| (a.path.as_str(), a.title.as_str())),
            query,
            limit,
        ))
    }

    async fn fetch(&self, path: &str) -> Result<Article> {
        let store = self.store.read().await;
        store
            .get(path)
            .cloned()
            .ok_or_else(|| Error::EntryNotFound(path.to_string()))
    }
}
