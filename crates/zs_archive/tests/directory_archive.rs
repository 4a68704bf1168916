use std::fs;
use std::path::Path;
use tempfile::TempDir;
use zs_archive::prelude::*;
use zs_archive::article_text;

fn write_entry(root: &Path, path: &str, html: &str) {
    let file = root.join(path);
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(file, html).unwrap();
}

fn sample_dump() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_entry(
        root,
        "A/Ada_Lovelace",
        "<html><head><title>Ada Lovelace</title></head><body><p>Ada Lovelace was an English mathematician.</p></body></html>",
    );
    write_entry(
        root,
        "A/Analytical_Engine.html",
        "<html><body><p>The Analytical Engine was a proposed mechanical computer designed by Charles Babbage.</p></body></html>",
    );
    write_entry(
        root,
        "A/Charles_Babbage.html",
        "<html><head><title>Charles Babbage</title></head><body><p>Babbage was a mathematician and engineer.</p><script>track()</script></body></html>",
    );
    write_entry(root, "index.html", "<html><body><p>Welcome</p></body></html>");
    write_entry(root, "-/style.css", "p { color: red; }");
    dir
}

#[tokio::test]
async fn test_title_suggestions_without_index() {
    let dump = sample_dump();
    let archive = DirectoryArchive::open(ArchiveConfig::new(dump.path())).await.unwrap();

    assert_eq!(archive.len(), 4);
    assert!(!archive.has_fulltext_index());
    assert_eq!(archive.main_entry().as_deref(), Some("index.html"));

    let results = find_articles(&archive, "ada", 10).await.unwrap();
    assert_eq!(results.mode, SearchMode::Title);
    assert_eq!(results.hits.len(), 1);
    assert_eq!(results.hits[0].path, "A/Ada_Lovelace");
    assert_eq!(results.hits[0].title.as_deref(), Some("Ada Lovelace"));
}

#[tokio::test]
async fn test_fulltext_search() {
    let dump = sample_dump();
    let config = ArchiveConfig::new(dump.path()).with_fulltext(true);
    let archive = DirectoryArchive::open(config).await.unwrap();

    assert!(archive.has_fulltext_index());
    let results = find_articles(&archive, "mathematician", 10).await.unwrap();
    assert_eq!(results.mode, SearchMode::FullText);
    assert_eq!(results.estimated_total, 2);

    let paths: Vec<_> = results.hits.iter().map(|h| h.path.as_str()).collect();
    assert!(paths.contains(&"A/Ada_Lovelace"));
    assert!(paths.contains(&"A/Charles_Babbage.html"));

    // Script bodies are not indexed.
    assert!(find_articles(&archive, "track", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_find_articles_caps_limit() {
    let dir = TempDir::new().unwrap();
    for i in 0..15 {
        write_entry(dir.path(), &format!("A/Planet_{}", i), "<p>planet</p>");
    }
    let archive = DirectoryArchive::open(ArchiveConfig::new(dir.path())).await.unwrap();

    let results = find_articles(&archive, "planet", 50).await.unwrap();
    assert_eq!(results.hits.len(), MAX_RESULTS);
    assert_eq!(results.estimated_total, 15);
}

#[tokio::test]
async fn test_fetch_and_extract() {
    let dump = sample_dump();
    let archive = DirectoryArchive::open(ArchiveConfig::new(dump.path())).await.unwrap();

    let article = archive.fetch("A/Charles_Babbage.html").await.unwrap();
    assert_eq!(article.title, "Charles Babbage");
    assert_eq!(
        article_text(&article),
        "Charles Babbage\nBabbage was a mathematician and engineer."
    );

    // Falls back to the file name when the page has no <title>.
    let article = archive.fetch("A/Analytical_Engine.html").await.unwrap();
    assert_eq!(article.title, "Analytical Engine");
}

#[tokio::test]
async fn test_fetch_rejects_unknown_paths() {
    let dump = sample_dump();
    let archive = DirectoryArchive::open(ArchiveConfig::new(dump.path())).await.unwrap();

    assert!(matches!(archive.fetch("A/Nobody").await, Err(Error::EntryNotFound(_))));
    assert!(matches!(archive.fetch("../etc/passwd").await, Err(Error::EntryNotFound(_))));
    assert!(matches!(archive.fetch("-/style.css").await, Err(Error::EntryNotFound(_))));
}
