use crate::domain::ports::Storage;
use crate::utils::error::{ListingError, Result};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// One `<key>.json` file per slot under `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == ErrorKind::InvalidData => Err(ListingError::CorruptData {
                reason: format!("{} is not valid UTF-8", path.display()),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;

        // write-then-rename, so readers never see a half-written slot
        let target = self.slot_path(key);
        let tmp = self.base_path.join(format!("{}.json.tmp", key));
        fs::write(&tmp, value)?;
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        tracing::debug!("Wrote {} bytes to {}", value.len(), target.display());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    slots: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

/// In-process storage. Clones share the same slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes whose value exceeds `quota_bytes` fail, like a full browser store.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryInner {
                slots: HashMap::new(),
                quota_bytes: Some(quota_bytes),
            })),
        }
    }

    pub fn set_quota(&self, quota_bytes: Option<usize>) -> Result<()> {
        self.lock()?.quota_bytes = quota_bytes;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryInner>> {
        self.inner.lock().map_err(|_| ListingError::PersistenceWrite {
            reason: "memory storage lock poisoned".to_string(),
        })
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.lock()?;
        if let Some(quota) = inner.quota_bytes {
            if value.len() > quota {
                return Err(ListingError::PersistenceWrite {
                    reason: format!(
                        "storage quota exceeded ({} bytes > {} bytes)",
                        value.len(),
                        quota
                    ),
                });
            }
        }
        inner.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
