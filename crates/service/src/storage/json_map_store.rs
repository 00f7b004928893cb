use std::{collections::HashMap, hash::Hash, io, path::{Path, PathBuf}};
use thiserror::Error;
use tokio::{fs, sync::RwLock};

#[derive(Debug, Error)]
pub enum JsonStoreError {
    #[error("io error on {path}: {source}")]
    Io { path: String, #[source] source: io::Error },
    #[error("malformed json in {path}: {source}")]
    Json { path: String, #[source] source: serde_json::Error },
    #[error("{0}")]
    Dir(String),
}

/// Generic JSON file-backed map.
///
/// The whole map lives in memory and is rewritten on every mutation; the
/// write lock is held until the file is replaced, so writers never interleave.
pub struct JsonMapStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned,
    V: serde::Serialize + serde::de::DeserializeOwned,
{
    /// Load the map at `path`, creating the file with an empty map if missing.
    /// An unreadable or malformed file is an error, never an empty map.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, JsonStoreError> {
        let file_path = path.into();
        common::env::ensure_parent_dir(&file_path)
            .await
            .map_err(|e| JsonStoreError::Dir(e.to_string()))?;

        let map = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| JsonStoreError::Json { path: display(&file_path), source })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let empty: HashMap<K, V> = HashMap::new();
                write_atomic(&file_path, &empty).await?;
                empty
            }
            Err(source) => return Err(JsonStoreError::Io { path: display(&file_path), source }),
        };

        Ok(Self { inner: RwLock::new(map), file_path })
    }

    pub fn path(&self) -> &Path { &self.file_path }

    /// Run `f` against a shared view of the map.
    pub async fn read<R>(&self, f: impl FnOnce(&HashMap<K, V>) -> R) -> R {
        let map = self.inner.read().await;
        f(&map)
    }

    /// Apply a mutation and persist it before releasing the lock.
    ///
    /// If persisting fails the in-memory map is reloaded from disk, so memory
    /// never runs ahead of the file.
    pub async fn update_map<R>(&self, f: impl FnOnce(&mut HashMap<K, V>) -> R) -> Result<R, JsonStoreError> {
        let mut map = self.inner.write().await;
        let out = f(&mut map);
        if let Err(e) = write_atomic(&self.file_path, &*map).await {
            if let Ok(bytes) = fs::read(&self.file_path).await {
                if let Ok(on_disk) = serde_json::from_slice(&bytes) {
                    *map = on_disk;
                }
            }
            return Err(e);
        }
        Ok(out)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

fn display(p: &Path) -> String { p.display().to_string() }

async fn write_atomic<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), JsonStoreError> {
    let data = serde_json::to_vec_pretty(value).map_err(|source| JsonStoreError::Json { path: display(path), source })?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, data).await.map_err(|source| JsonStoreError::Io { path: display(&tmp), source })?;
    fs::rename(&tmp, path).await.map_err(|source| JsonStoreError::Io { path: display(path), source })?;
    Ok(())
}
