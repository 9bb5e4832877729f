//! Blob storage for filevault.
//!
//! Uploaded content is written under a sharded directory tree:
//! ```text
//! {root}/
//! ├── ab/
//! │   ├── ab12cd34-5678-90ab-cdef-123456789012
//! │   └── ab12cd34-5678-90ab-cdef-123456789012_250
//! └── ...
//! ```
//! Thumbnails sit next to their source blob with a `_<size>` suffix.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::{Result, VaultError};

/// Thumbnail widths that may be requested as a content variant.
pub const THUMBNAIL_SIZES: [u32; 3] = [500, 250, 100];

/// Parse a requested thumbnail size.
///
/// Returns `None` for anything that is not one of [`THUMBNAIL_SIZES`].
pub fn parse_variant(size: &str) -> Option<u32> {
    size.trim()
        .parse::<u32>()
        .ok()
        .filter(|s| THUMBNAIL_SIZES.contains(s))
}

/// Location of stored blobs.
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Create a new BlobStore rooted at `root`.
    ///
    /// The directory will be created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `content` to a fresh blob and return its path.
    ///
    /// The blob is created exclusively, so an existing file is never
    /// overwritten.
    pub async fn store(&self, content: &[u8]) -> Result<String> {
        let name = Uuid::new_v4().to_string();
        let path = self.blob_path(&name);

        if let Some(shard) = path.parent() {
            fs::create_dir_all(shard).await?;
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(content).await?;
        file.flush().await?;

        Ok(path.to_string_lossy().into_owned())
    }

    /// Read a blob, or one of its thumbnails when `variant` is set.
    ///
    /// A missing file is `NotFound`, as is a size outside
    /// [`THUMBNAIL_SIZES`].
    pub async fn read(&self, local_path: &str, variant: Option<u32>) -> Result<Vec<u8>> {
        if let Some(size) = variant {
            if !THUMBNAIL_SIZES.contains(&size) {
                return Err(VaultError::NotFound(format!("thumbnail size {size}")));
            }
        }

        let path = variant_path(local_path, variant);
        match fs::read(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(VaultError::NotFound("content".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check whether a blob (or thumbnail) exists.
    pub async fn exists(&self, local_path: &str, variant: Option<u32>) -> bool {
        fs::metadata(variant_path(local_path, variant)).await.is_ok()
    }

    fn blob_path(&self, name: &str) -> PathBuf {
        let shard = name.get(..2).unwrap_or(name);
        self.root.join(shard).join(name)
    }
}

/// Path of a blob or of one of its thumbnails.
pub fn variant_path(local_path: &str, variant: Option<u32>) -> PathBuf {
    match variant {
        Some(size) => PathBuf::from(format!("{local_path}_{size}")),
        None => PathBuf::from(local_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, BlobStore) {
        let dir = TempDir::new().unwrap();
        let store = BlobStore::new(dir.path().join("files")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_new_creates_root() {
        let (dir, store) = setup();
        assert!(dir.path().join("files").is_dir());
        assert_eq!(store.root(), dir.path().join("files"));
    }

    #[tokio::test]
    async fn test_store_and_read() {
        let (_dir, store) = setup();
        let path = store.store(b"Hello Webstack!\n").await.unwrap();

        assert!(path.starts_with(store.root().to_str().unwrap()));
        assert_eq!(store.read(&path, None).await.unwrap(), b"Hello Webstack!\n");
    }

    #[tokio::test]
    async fn test_store_uses_shard_directory() {
        let (_dir, store) = setup();
        let path = PathBuf::from(store.store(b"x").await.unwrap());

        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        let shard = path.parent().unwrap().file_name().unwrap().to_str().unwrap();
        assert_eq!(shard, &name[..2]);
        assert_eq!(path.parent().unwrap().parent().unwrap(), store.root());
    }

    #[tokio::test]
    async fn test_store_never_reuses_a_path() {
        let (_dir, store) = setup();
        let a = store.store(b"a").await.unwrap();
        let b = store.store(b"b").await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.read(&a, None).await.unwrap(), b"a");
        assert_eq!(store.read(&b, None).await.unwrap(), b"b");
    }

    #[tokio::test]
    async fn test_store_empty_content() {
        let (_dir, store) = setup();
        let path = store.store(b"").await.unwrap();
        assert!(store.read(&path, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_thumbnail_variant() {
        let (_dir, store) = setup();
        let path = store.store(b"full image").await.unwrap();

        assert!(matches!(
            store.read(&path, Some(250)).await,
            Err(VaultError::NotFound(_))
        ));

        std::fs::write(format!("{path}_250"), b"small").unwrap();
        assert!(store.exists(&path, Some(250)).await);
        assert_eq!(store.read(&path, Some(250)).await.unwrap(), b"small");
    }

    #[tokio::test]
    async fn test_read_rejects_unknown_size() {
        let (_dir, store) = setup();
        let path = store.store(b"full image").await.unwrap();
        std::fs::write(format!("{path}_42"), b"sneaky").unwrap();

        assert!(matches!(
            store.read(&path, Some(42)).await,
            Err(VaultError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_read_missing_blob() {
        let (_dir, store) = setup();
        let missing = store.root().join("zz").join("zz-missing");
        let result = store.read(missing.to_str().unwrap(), None).await;
        assert!(matches!(result, Err(VaultError::NotFound(_))));
    }

    #[test]
    fn test_parse_variant() {
        assert_eq!(parse_variant("500"), Some(500));
        assert_eq!(parse_variant("250"), Some(250));
        assert_eq!(parse_variant("100"), Some(100));
        assert_eq!(parse_variant("42"), None);
        assert_eq!(parse_variant("big"), None);
        assert_eq!(parse_variant(""), None);
    }

    #[test]
    fn test_variant_path() {
        assert_eq!(variant_path("/a/b", None), PathBuf::from("/a/b"));
        assert_eq!(variant_path("/a/b", Some(100)), PathBuf::from("/a/b_100"));
    }
}
