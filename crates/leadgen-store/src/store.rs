//! File-backed lead collection.
//!
//! The whole durable state is one pretty-printed JSON array. Every write
//! replaces the file via a sibling temp file and `rename`, so readers see
//! either the old array or the new one. `merge` and `clear` are serialized
//! through a process-wide lock; separate processes writing the same file
//! are not coordinated.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use leadgen_core::Lead;
use tokio::sync::Mutex;

use crate::error::StoreError;

pub struct LeadStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl LeadStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted collection.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the file does not exist.
    /// - [`StoreError::Io`] on any other read failure.
    /// - [`StoreError::Parse`] if the content is not a lead array.
    pub async fn load(&self) -> Result<Vec<Lead>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    path: self.path.clone(),
                })
            }
            Err(e) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        serde_json::from_slice(&bytes).map_err(|e| StoreError::Parse {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Like [`LeadStore::load`], but a missing file is an empty collection.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] or [`StoreError::Parse`] as for [`LeadStore::load`].
    pub async fn load_or_empty(&self) -> Result<Vec<Lead>, StoreError> {
        match self.load().await {
            Err(StoreError::NotFound { .. }) => Ok(Vec::new()),
            other => other,
        }
    }

    /// Prepends `new_leads` ahead of the persisted leads and writes the
    /// result back. Returns the full collection as written.
    ///
    /// A missing or unreadable existing file counts as an empty collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] only if the new file cannot be written.
    pub async fn merge(&self, new_leads: Vec<Lead>) -> Result<Vec<Lead>, StoreError> {
        let _guard = self.write_lock.lock().await;

        let existing = match self.load().await {
            Ok(existing) => existing,
            Err(StoreError::NotFound { .. }) => {
                tracing::info!(path = %self.path.display(), "no existing leads, starting fresh");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "existing leads unreadable, starting fresh");
                Vec::new()
            }
        };

        let added = new_leads.len();
        let mut merged = new_leads;
        merged.extend(existing);
        self.write_all(&merged).await?;

        tracing::info!(added, total = merged.len(), "merged leads into store");
        Ok(merged)
    }

    /// Replaces the persisted collection with an empty array.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be written.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.write_all(&[]).await?;
        tracing::info!(path = %self.path.display(), "cleared lead store");
        Ok(())
    }

    async fn write_all(&self, leads: &[Lead]) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let body = serde_json::to_vec_pretty(leads).map_err(StoreError::Serialize)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let tmp = temp_path(&self.path);
        tokio::fs::write(&tmp, &body).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("leads"), OsString::from);
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use leadgen_core::Rating;

    use super::*;

    fn lead(name: &str) -> Lead {
        Lead {
            name: name.to_string(),
            ..Lead::default()
        }
    }

    fn names(leads: &[Lead]) -> Vec<&str> {
        leads.iter().map(|l| l.name.as_str()).collect()
    }

    fn store_in(dir: &tempfile::TempDir) -> LeadStore {
        LeadStore::new(dir.path().join("leadsData.json"))
    }

    #[tokio::test]
    async fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(matches!(
            store.load().await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(store.load_or_empty().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn merge_prepends_new_batch() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.merge(vec![lead("e1"), lead("e2")]).await.unwrap();
        let merged = store.merge(vec![lead("n1"), lead("n2")]).await.unwrap();

        assert_eq!(names(&merged), ["n1", "n2", "e1", "e2"]);
        assert_eq!(names(&store.load().await.unwrap()), ["n1", "n2", "e1", "e2"]);
    }

    #[tokio::test]
    async fn merge_keeps_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.merge(vec![lead("same")]).await.unwrap();
        store.merge(vec![lead("same")]).await.unwrap();

        assert_eq!(store.load().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn merge_of_empty_batch_keeps_existing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.merge(vec![lead("e1")]).await.unwrap();
        let merged = store.merge(Vec::new()).await.unwrap();
        assert_eq!(names(&merged), ["e1"]);
    }

    #[tokio::test]
    async fn merge_without_file_yields_new_batch_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let merged = store.merge(vec![lead("n1")]).await.unwrap();
        assert_eq!(names(&merged), ["n1"]);
    }

    #[tokio::test]
    async fn merge_over_garbage_yields_new_batch_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        tokio::fs::write(store.path(), b"{ not json").await.unwrap();

        let merged = store.merge(vec![lead("n1")]).await.unwrap();
        assert_eq!(names(&merged), ["n1"]);
        assert_eq!(names(&store.load().await.unwrap()), ["n1"]);
    }

    #[tokio::test]
    async fn merge_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeadStore::new(dir.path().join("data").join("leads.json"));

        store.merge(vec![lead("n1")]).await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn clear_writes_empty_array_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.merge(vec![lead("e1")]).await.unwrap();

        store.clear().await.unwrap();
        let raw = tokio::fs::read_to_string(store.path()).await.unwrap();
        assert_eq!(raw, "[]");

        store.clear().await.unwrap();
        assert_eq!(tokio::fs::read_to_string(store.path()).await.unwrap(), raw);
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clear_creates_file_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_is_pretty_printed_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store
            .merge(vec![Lead {
                rating: Rating::Text("4.1".to_string()),
                ..lead("A")
            }])
            .await
            .unwrap();

        let raw = tokio::fs::read_to_string(store.path()).await.unwrap();
        assert!(raw.starts_with("[\n  {\n    \"name\": \"A\""), "got: {raw}");
        assert!(raw.contains("\"photosCount\": 0"));
        assert!(raw.contains("\"locationLink\": \"#\""));
    }

    #[tokio::test]
    async fn no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.merge(vec![lead("a")]).await.unwrap();

        assert!(!temp_path(store.path()).exists());
    }

    #[tokio::test]
    async fn concurrent_merges_lose_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(store_in(&dir));

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.merge(vec![lead(&format!("n{i}"))]).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.load().await.unwrap().len(), 8);
    }

    #[test]
    fn temp_path_is_a_sibling() {
        let tmp = temp_path(Path::new("/var/data/leadsData.json"));
        assert_eq!(tmp, Path::new("/var/data/leadsData.json.tmp"));
    }
}
