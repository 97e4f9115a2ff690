//! Async deck loading utilities

use crate::loader::deck::{DeckList, DeckLoader};
use crate::{EngineError, Result};
use std::path::{Path, PathBuf};

/// Read and parse one deck file
pub async fn load_deck(path: &Path) -> Result<DeckList> {
    let content = tokio::fs::read_to_string(path).await?;
    DeckLoader::parse(&content).map_err(|e| match e {
        EngineError::InvalidDeckFormat(msg) => {
            EngineError::InvalidDeckFormat(format!("{}: {msg}", path.display()))
        }
        other => other,
    })
}

/// Load several deck files in parallel, preserving input order
pub async fn load_decks(paths: &[PathBuf]) -> Result<Vec<DeckList>> {
    let tasks: Vec<_> = paths
        .iter()
        .cloned()
        .map(|path| tokio::spawn(async move { load_deck(&path).await }))
        .collect();

    let mut decks = Vec::with_capacity(tasks.len());
    for task in tasks {
        decks.push(task.await??);
    }
    Ok(decks)
}

/// Every `*.dck` file directly inside `dir`, sorted by path
pub async fn deck_paths_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "dck") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_bundled_decks() {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("decks");
        let paths = deck_paths_in(&dir).await.unwrap();
        assert!(!paths.is_empty());
        let decks = load_decks(&paths).await.unwrap();
        assert_eq!(decks.len(), paths.len());
        for deck in &decks {
            assert!(deck.hero.is_some());
            assert_eq!(deck.total_cards(), 30);
        }
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = load_deck(Path::new("decks/nope.dck")).await;
        assert!(matches!(result, Err(EngineError::IoError(_))));
    }
}
