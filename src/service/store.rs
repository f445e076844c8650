//! JSON document persistence.

use std::path::Path;
use std::path::PathBuf;

use log::debug;
use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A single JSON document on disk, cached in memory.
///
/// Updates are applied to a copy and only committed once the file write
/// succeeds, so the cache never holds data that is not on disk.
pub struct JsonStore<T> {
    path: PathBuf,
    data: Mutex<T>,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned + Default + Clone + Send,
{
    /// Loads the document at `path`. A missing or malformed file is replaced
    /// with `T::default()`.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<T>(&bytes) {
                Ok(data) => Some(data),
                Err(e) => {
                    warn!(
                        "Malformed document {}, resetting to default: {}",
                        path.display(),
                        e
                    );
                    None
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Document {} not found, creating it", path.display());
                None
            }
            Err(e) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source: e,
                });
            }
        };

        let store = Self {
            path,
            data: Mutex::new(T::default()),
        };
        match data {
            Some(data) => *store.data.lock().await = data,
            None => store.write(&T::default()).await?,
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `f` against the current document.
    pub async fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let data = self.data.lock().await;
        f(&data)
    }

    /// Applies `f` to a copy of the document and persists it. Nothing is
    /// written when `f` fails.
    pub async fn update<R, E>(&self, f: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let mut data = self.data.lock().await;
        let mut draft = data.clone();
        let result = f(&mut draft)?;
        self.write(&draft).await?;
        *data = draft;
        Ok(result)
    }

    async fn write(&self, data: &T) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(data)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("guildkeeper_store_{}", uuid::Uuid::new_v4()))
            .join("doc.json")
    }

    #[tokio::test]
    async fn test_open_missing_creates_default_file() {
        let path = temp_path();
        let store = JsonStore::<BTreeMap<String, u32>>::open(&path).await.unwrap();

        assert!(store.read(|d| d.is_empty()).await);
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(written.trim(), "{}");
    }

    #[tokio::test]
    async fn test_open_malformed_resets() {
        let path = temp_path();
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let store = JsonStore::<BTreeMap<String, u32>>::open(&path).await.unwrap();
        assert!(store.read(|d| d.is_empty()).await);
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(written.trim(), "{}");
    }

    #[tokio::test]
    async fn test_update_persists_and_failed_update_does_not() {
        let path = temp_path();
        let store = JsonStore::<BTreeMap<String, u32>>::open(&path).await.unwrap();

        store
            .update(|d| {
                d.insert("a".to_string(), 1);
                Ok::<_, StoreError>(())
            })
            .await
            .unwrap();

        let failed: Result<(), StoreError> = store
            .update(|d| {
                d.insert("b".to_string(), 2);
                Err(StoreError::Serialize(
                    serde_json::from_str::<u32>("x").unwrap_err(),
                ))
            })
            .await;
        assert!(failed.is_err());
        assert!(!store.read(|d| d.contains_key("b")).await);

        let reopened = JsonStore::<BTreeMap<String, u32>>::open(&path).await.unwrap();
        assert_eq!(reopened.read(|d| d.get("a").copied()).await, Some(1));
        assert_eq!(reopened.read(|d| d.len()).await, 1);
    }
}
