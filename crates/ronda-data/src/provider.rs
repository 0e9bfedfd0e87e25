//! Snapshot providers.

use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use ronda_store::TableKey;

use crate::{DataError, Result, TablePayload};

/// A source of table payloads for one snapshot.
///
/// Providers are constructed explicitly and handed to
/// [`load_snapshot`](crate::load_snapshot); nothing in the screener keeps a
/// global session.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetch the payload for one table.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::NotFound`] if the provider has nothing for `key`,
    /// or another [`DataError`] if fetching or decoding fails.
    async fn fetch(&self, key: TableKey) -> Result<TablePayload>;
}

/// Reads payloads from a directory laid out as `<root>/<dataset>/<field>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirProvider {
    root: PathBuf,
}

impl JsonDirProvider {
    /// Create a provider rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Snapshot directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding the payload for `key`.
    #[must_use]
    pub fn path_for(&self, key: TableKey) -> PathBuf {
        self.root
            .join(key.dataset().as_str())
            .join(format!("{}.json", key.field()))
    }

    /// Write a payload where [`fetch`](SnapshotProvider::fetch) will find it.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Io`] if the directory or file cannot be written.
    pub async fn save(&self, key: TableKey, payload: &TablePayload) -> Result<PathBuf> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, serde_json::to_vec_pretty(payload)?).await?;
        Ok(path)
    }
}

#[async_trait]
impl SnapshotProvider for JsonDirProvider {
    fn name(&self) -> &str {
        "json-dir"
    }

    async fn fetch(&self, key: TableKey) -> Result<TablePayload> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(DataError::NotFound(key)),
            Err(err) => return Err(err.into()),
        };
        tracing::debug!(table = %key, path = %path.display(), bytes = bytes.len(), "read payload");
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Serves payloads held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    payloads: BTreeMap<TableKey, TablePayload>,
}

impl MemoryProvider {
    /// Create an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the payload for `key`.
    #[must_use]
    pub fn with(mut self, key: TableKey, payload: TablePayload) -> Self {
        self.payloads.insert(key, payload);
        self
    }
}

#[async_trait]
impl SnapshotProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch(&self, key: TableKey) -> Result<TablePayload> {
        self.payloads
            .get(&key)
            .cloned()
            .ok_or(DataError::NotFound(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ronda_traits::{Date, Frequency};

    fn close_payload() -> TablePayload {
        TablePayload::Matrix {
            frequency: Frequency::Daily,
            unit: "TWD".to_string(),
            time_index: vec![Date::from_ymd_opt(2024, 1, 2).unwrap()],
            symbols: vec!["2330".to_string()],
            values: vec![vec![Some(593.0)]],
        }
    }

    #[test]
    fn test_path_layout() {
        let provider = JsonDirProvider::new("/data/snapshot");
        assert_eq!(
            provider.path_for(TableKey::Revenue),
            PathBuf::from("/data/snapshot/monthly_revenue/revenue.json")
        );
        assert_eq!(
            provider.path_for(TableKey::CashDividend),
            PathBuf::from("/data/snapshot/dividend_announcement/cash_dividend.json")
        );
    }

    #[tokio::test]
    async fn test_save_then_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let provider = JsonDirProvider::new(dir.path());

        let path = provider.save(TableKey::Close, &close_payload()).await.unwrap();
        assert!(path.ends_with("price/close.json"));

        let payload = provider.fetch(TableKey::Close).await.unwrap();
        assert_eq!(payload, close_payload());
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let provider = JsonDirProvider::new(dir.path());

        let err = provider.fetch(TableKey::Eps).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_malformed_file_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let provider = JsonDirProvider::new(dir.path());
        let path = provider.path_for(TableKey::Close);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"{\"kind\": \"matrix\"").unwrap();

        let err = provider.fetch(TableKey::Close).await.unwrap_err();
        assert!(matches!(err, DataError::Json(_)));
    }

    #[tokio::test]
    async fn test_memory_provider() {
        let provider = MemoryProvider::new().with(TableKey::Close, close_payload());
        assert_eq!(provider.fetch(TableKey::Close).await.unwrap(), close_payload());
        assert!(provider.fetch(TableKey::Open).await.unwrap_err().is_not_found());
    }
}
