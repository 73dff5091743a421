use newsscope_core::cache::DatasetCache;
use newsscope_core::dataset::{dataset_version, load_articles};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

const CSV: &str = "headlines,content,category,url\n\
Kohli hits century,\"Virat Kohli scored a century, his 50th in ODIs.\",sports,https://ie.example/1\n\
Sensex slips,Markets closed lower on Friday.,business,https://ie.example/2\n";

fn write_dataset(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("news.csv");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn loads_rows_in_order() {
    let dir = tempdir().unwrap();
    let path = write_dataset(dir.path(), CSV);
    let c = load_articles(&path).unwrap();
    assert_eq!(c.len(), 2);
    assert_eq!(c.articles()[0].headline, "Kohli hits century");
    assert_eq!(c.articles()[0].content, "Virat Kohli scored a century, his 50th in ODIs.");
    assert_eq!(c.articles()[1].id, 1);
    assert_eq!(c.categories(), vec!["business".to_string(), "sports".to_string()]);
    assert_eq!(c.version, dataset_version(&path).unwrap());
}

#[test]
fn missing_file_is_fatal() {
    let dir = tempdir().unwrap();
    let err = load_articles(&dir.path().join("absent.csv")).unwrap_err();
    assert!(err.to_string().contains("dataset not found"));
}

#[test]
fn missing_column_is_fatal() {
    let dir = tempdir().unwrap();
    let path = write_dataset(dir.path(), "headlines,category,url\nA,b,c\n");
    let err = load_articles(&path).unwrap_err();
    assert!(err.to_string().contains("`content`"));
}

#[test]
fn ragged_row_is_fatal() {
    let dir = tempdir().unwrap();
    let path = write_dataset(dir.path(), "headlines,content,category,url\nA,b,c\n");
    let err = load_articles(&path).unwrap_err();
    assert!(err.to_string().contains("malformed row 1"));
}

#[test]
fn cache_reuses_and_invalidates() {
    let dir = tempdir().unwrap();
    let path = write_dataset(dir.path(), CSV);
    let cache = DatasetCache::new();

    let first = cache.load(&path).unwrap();
    let second = cache.load(&path).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);

    assert!(cache.invalidate(&path));
    assert!(cache.is_empty());
    let third = cache.load(&path).unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(third.len(), 2);
}

#[test]
fn cache_surfaces_load_failures() {
    let dir = tempdir().unwrap();
    let cache = DatasetCache::new();
    assert!(cache.load(&dir.path().join("absent.csv")).is_err());
    assert!(cache.is_empty());
}
