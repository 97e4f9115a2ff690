//! Async catalog loading
//!
//! Walks a directory tree for `*.json` card files and parses them in
//! parallel. Directory discovery runs on a blocking thread (jwalk uses rayon
//! internally) and streams paths to async readers as they are found.

use crate::core::Card;
use crate::loader::database::CardDatabase;
use crate::{EngineError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;

/// Load a single JSON card file
async fn load_card_file(path: PathBuf) -> Result<Vec<Card>> {
    let contents = tokio::fs::read_to_string(&path).await?;
    CardDatabase::parse_json(&contents).map_err(|e| {
        EngineError::InvalidCardFormat(format!("Failed to parse card file '{}': {e}", path.display()))
    })
}

/// Load every `*.json` file under `dir` into `db`
///
/// Fails fast on the first unreadable or malformed file. Files are merged
/// in path order, so when two files define the same card the result does
/// not depend on which read finished first. Returns (cards loaded, duration).
pub async fn load_catalog_dir(db: &mut CardDatabase, dir: &Path) -> Result<(usize, Duration)> {
    let start = Instant::now();
    if !dir.is_dir() {
        return Err(EngineError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Card catalog directory not found: {}", dir.display()),
        )));
    }

    let (path_tx, mut path_rx) = tokio::sync::mpsc::unbounded_channel();
    let root = dir.to_path_buf();
    let walker = tokio::task::spawn_blocking(move || -> Result<()> {
        for entry in jwalk::WalkDir::new(&root).skip_hidden(true) {
            let entry = entry.map_err(|e| EngineError::IoError(std::io::Error::other(e.to_string())))?;
            if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "json") {
                // Receiver gone means the loader already failed
                if path_tx.send(entry.path()).is_err() {
                    return Ok(());
                }
            }
        }
        Ok(())
    });

    // Start reading each file as soon as its path arrives
    let mut tasks = Vec::new();
    while let Some(path) = path_rx.recv().await {
        let task_path = path.clone();
        tasks.push((path, tokio::spawn(load_card_file(task_path))));
    }
    walker.await??;

    let mut loaded: Vec<(PathBuf, Vec<Card>)> = Vec::with_capacity(tasks.len());
    for (path, task) in tasks {
        loaded.push((path, task.await??));
    }
    loaded.sort_by(|a, b| a.0.cmp(&b.0));

    let mut count = 0;
    for (_, cards) in loaded {
        count += cards.len();
        for card in cards {
            db.add_card(card);
        }
    }
    Ok((count, start.elapsed()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hearth-catalog-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("nested")).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_load_nested_catalog() {
        let dir = scratch_dir("nested");
        std::fs::write(
            dir.join("a.json"),
            r#"[{"name": "Goldshire Footman", "cost": 1, "kind": {"type": "Minion", "attack": 1, "health": 2}}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("nested").join("b.json"),
            r#"[{"name": "Stonetusk Boar", "cost": 1, "kind": {"type": "Minion", "attack": 1, "health": 1, "keywords": ["Charge"]}}]"#,
        )
        .unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let mut db = CardDatabase::new();
        let (count, _) = load_catalog_dir(&mut db, &dir).await.unwrap();
        assert_eq!(count, 2);
        assert!(db.contains("stonetusk boar"));
        assert!(db.contains("Goldshire Footman"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_malformed_file_fails() {
        let dir = scratch_dir("bad");
        std::fs::write(dir.join("bad.json"), "[{").unwrap();
        let mut db = CardDatabase::new();
        let err = load_catalog_dir(&mut db, &dir).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidCardFormat(_)));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_missing_dir() {
        let mut db = CardDatabase::new();
        let result = load_catalog_dir(&mut db, Path::new("definitely/not/here")).await;
        assert!(matches!(result, Err(EngineError::IoError(_))));
    }
}
