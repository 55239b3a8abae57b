//! Remote object store abstraction.

use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

pub type StoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Bucket/key object storage, as offered by S3-like services.
pub trait RemoteObjectStore {
    /// Lists keys in `bucket` starting with `prefix`, in lexicographic order.
    fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StoreError>;
    fn download(&self, bucket: &str, key: &str, local_path: &Path) -> Result<(), StoreError>;
    fn upload(&self, local_path: &Path, bucket: &str, key: &str) -> Result<(), StoreError>;
}

/// Object store backed by a local directory; bucket `B` key `K` is the file `<root>/B/K`.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_path(&self, bucket: &str) -> Result<PathBuf, StoreError> {
        let mut components = Path::new(bucket).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(bucket)),
            _ => Err(format!("invalid bucket name {bucket:?}").into()),
        }
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && Path::new(key)
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !valid {
            return Err(format!("invalid object key {key:?}").into());
        }
        Ok(self.bucket_path(bucket)?.join(key))
    }
}

impl RemoteObjectStore for LocalObjectStore {
    fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StoreError> {
        let bucket_path = self.bucket_path(bucket)?;
        if !bucket_path.is_dir() {
            return Err(format!("bucket {bucket:?} does not exist").into());
        }

        let mut keys = Vec::new();
        for entry in WalkDir::new(&bucket_path).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(&bucket_path)?;
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn download(&self, bucket: &str, key: &str, local_path: &Path) -> Result<(), StoreError> {
        let path = self.object_path(bucket, key)?;
        std::fs::copy(path, local_path)?;
        Ok(())
    }

    fn upload(&self, local_path: &Path, bucket: &str, key: &str) -> Result<(), StoreError> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(local_path, path)?;
        Ok(())
    }
}
