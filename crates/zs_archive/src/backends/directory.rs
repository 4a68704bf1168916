use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zs_core::{ArchiveGateway, Article, Error, Result, SearchResults};
use crate::extract::{extract_text, extract_title};
use crate::index::{suggest_titles, FullTextIndex};

const MAIN_ENTRY_CANDIDATES: [&str; 4] = ["index.html", "index.htm", "Main_Page", "A/Main_Page"];

#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    pub root: PathBuf,
    pub fulltext: bool,
}

impl ArchiveConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fulltext: false,
        }
    }

    pub fn with_fulltext(mut self, fulltext: bool) -> Self {
        self.fulltext = fulltext;
        self
    }
}

/// An archive dumped to a directory tree, one HTML file per entry.
#[derive(Debug)]
pub struct DirectoryArchive {
    root: PathBuf,
    /// Archive path to title, derived from the file name.
    entries: BTreeMap<String, String>,
    index: Option<FullTextIndex>,
}

fn is_article_file(path: &Path) -> bool {
    match path.extension().and_then(|ext| ext.to_str()) {
        None => true,
        Some(ext) => ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"),
    }
}

fn archive_path(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = relative.components().map(|c| c.as_os_str().to_str()).collect();
    Some(parts?.join("/"))
}

/// `A/Ada_Lovelace.html` becomes `Ada Lovelace`.
pub fn title_from_path(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    let stem = match name.rsplit_once('.') {
        Some((stem, ext)) if ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm") => stem,
        _ => name,
    };
    stem.replace('_', " ")
}

impl DirectoryArchive {
    pub async fn open(config: ArchiveConfig) -> Result<Self> {
        tokio::task::spawn_blocking(move || Self::open_blocking(config))
            .await
            .map_err(|e| Error::Archive(format!("Archive loading task failed: {}", e)))?
    }

    fn open_blocking(config: ArchiveConfig) -> Result<Self> {
        if !config.root.is_dir() {
            return Err(Error::Archive(format!(
                "Archive directory not found: {}",
                config.root.display()
            )));
        }

        let mut entries = BTreeMap::new();
        for entry in WalkDir::new(&config.root).follow_links(false) {
            let entry = entry.map_err(|e| Error::Archive(format!("Failed to walk archive: {}", e)))?;
            if !entry.file_type().is_file() || !is_article_file(entry.path()) {
                continue;
            }
            match archive_path(&config.root, entry.path()) {
                Some(path) => {
                    let title = title_from_path(&path);
                    entries.insert(path, title);
                }
                None => warn!("Skipping non UTF-8 archive path: {}", entry.path().display()),
            }
        }
        info!("📚 Loaded {} entries from {}", entries.len(), config.root.display());

        let index = if config.fulltext {
            let mut index = FullTextIndex::new();
            for (path, title) in &entries {
                let bytes = std::fs::read(config.root.join(path))?;
                index.add(path, title, &extract_text(&bytes));
            }
            info!("🔎 Built full-text index over {} entries", index.len());
            Some(index)
        } else {
            None
        };

        Ok(Self {
            root: config.root,
            entries,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ArchiveGateway for DirectoryArchive {
    fn name(&self) -> &str {
        "directory"
    }

    fn has_fulltext_index(&self) -> bool {
        self.index.is_some()
    }

    fn main_entry(&self) -> Option<String> {
        MAIN_ENTRY_CANDIDATES
            .iter()
            .find(|candidate| self.entries.contains_key(**candidate))
            .map(|candidate| candidate.to_string())
    }

    async fn search(&self, query: &str, limit: usize) -> Result<SearchResults> {
        let index = self
            .index
            .as_ref()
            .ok_or_else(|| Error::Archive("Archive was opened without a full-text index".to_string()))?;
        Ok(index.search(query, limit))
    }

    async fn suggest(&self, query: &str, limit: usize) -> Result<SearchResults> {
        Ok(suggest_titles(
            self.entries.iter().map(|(path, title)| (path.as_str(), title.as_str())),
            query,
            limit,
        ))
    }

    async fn fetch(&self, path: &str) -> Result<Article> {
        // Only paths discovered at open time are readable.
        let fallback_title = self
            .entries
            .get(path)
            .ok_or_else(|| Error::EntryNotFound(path.to_string()))?;

        debug!("Reading archive entry {}", path);
        let content = tokio::fs::read(self.root.join(path)).await?;
        let title = extract_title(&content).unwrap_or_else(|| fallback_title.clone());
        Ok(Article::new(path, title, content))
    }
}
