//! Storage bridge
//!
//! The façade the install/publish flows call: owns the local cache
//! directory, resolves the provider for the deploy remote's scheme once,
//! and exposes scheme-agnostic pull/push parameterized only by file name
//! and content hash.

use indexmap::IndexMap;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use packlift_core::PackageConfig;

use crate::cache::{ready_cache_dir, ready_dir};
use crate::error::{Result, StoreError};
use crate::provider::{ProviderRegistry, StorageOptions, StorageProvider};

/// Pull/push request: everything else is injected by the bridge
#[derive(Debug, Clone)]
pub struct StorageRequest {
    pub file_name: String,
    pub file_hash: Option<String>,
}

impl StorageRequest {
    #[must_use]
    pub fn new(file_name: impl Into<String>, file_hash: Option<String>) -> Self {
        Self {
            file_name: file_name.into(),
            file_hash,
        }
    }
}

/// Scheme-agnostic pull/push against a resolved provider and local cache
#[derive(Debug)]
pub struct StorageBridge {
    cache_dir: PathBuf,
    remote_uri: String,
    conn_rest: String,
    credential: IndexMap<String, String>,
    provider: Arc<dyn StorageProvider>,
}

impl StorageBridge {
    /// Bridge over the built-in providers and the shared cache directory
    pub fn new(config: &PackageConfig) -> Result<Self> {
        Self::with_registry(config, &ProviderRegistry::default())
    }

    /// Bridge over a caller-supplied registry (third-party providers)
    pub fn with_registry(config: &PackageConfig, registry: &ProviderRegistry) -> Result<Self> {
        let cache_dir = ready_cache_dir()?;
        Self::build(config, registry, cache_dir)
    }

    /// Bridge staging through a specific cache directory
    pub fn with_cache_dir(
        config: &PackageConfig,
        registry: &ProviderRegistry,
        cache_dir: PathBuf,
    ) -> Result<Self> {
        ready_dir(&cache_dir)?;
        Self::build(config, registry, cache_dir)
    }

    fn build(
        config: &PackageConfig,
        registry: &ProviderRegistry,
        cache_dir: PathBuf,
    ) -> Result<Self> {
        let remote_uri = config.deploy.remote.clone();
        let (scheme, conn_rest) =
            remote_uri
                .split_once("://")
                .ok_or_else(|| StoreError::InvalidRemote {
                    uri: remote_uri.clone(),
                    reason: "expected scheme://rest".to_string(),
                })?;

        let provider = registry.resolve(scheme)?;

        Ok(Self {
            cache_dir,
            conn_rest: conn_rest.to_string(),
            credential: config.deploy.secret.clone(),
            remote_uri,
            provider,
        })
    }

    /// The cache directory this bridge stages through
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path of a file inside the cache directory; pure join, no I/O
    #[must_use]
    pub fn local_file_path(&self, file_name: &str) -> PathBuf {
        self.cache_dir.join(file_name)
    }

    /// Pull an object from the remote store into the local cache
    ///
    /// When the request carries a content hash, the pulled file's SHA-256
    /// is verified before the path is returned.
    pub async fn pull_object(&self, request: &StorageRequest) -> Result<PathBuf> {
        ready_dir(&self.cache_dir)?;
        let options = self.storage_options(request);
        let local_file_path = self.provider.pull_object(&options).await?;

        if let Some(expected) = &request.file_hash {
            verify_file_hash(&local_file_path, expected)?;
        }

        tracing::info!(file = %request.file_name, "pulled object");
        Ok(local_file_path)
    }

    /// Push the staged file from the local cache to the remote store
    pub async fn push_object(&self, request: &StorageRequest) -> Result<()> {
        ready_dir(&self.cache_dir)?;
        let options = self.storage_options(request);
        self.provider.push_object(&options).await?;

        tracing::info!(file = %request.file_name, "pushed object");
        Ok(())
    }

    fn storage_options(&self, request: &StorageRequest) -> StorageOptions {
        StorageOptions {
            file_name: request.file_name.clone(),
            file_hash: request.file_hash.clone(),
            remote_uri: self.remote_uri.clone(),
            conn_rest: self.conn_rest.clone(),
            cache_dir: self.cache_dir.clone(),
            credential: self.credential.clone(),
        }
    }
}

fn verify_file_hash(path: &Path, expected: &str) -> Result<()> {
    let content = std::fs::read(path)?;
    let actual = hex::encode(Sha256::digest(&content));

    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(StoreError::IntegrityCheckFailed {
            file: path.display().to_string(),
            expected: expected.to_string(),
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexSet;
    use packlift_core::{BundlePolicy, DeployConfig};
    use tempfile::TempDir;

    fn config(remote: &str, root: &Path) -> PackageConfig {
        PackageConfig {
            name: "pkg".to_string(),
            version: "1.0.0".to_string(),
            root: root.to_path_buf(),
            hash: None,
            deploy: DeployConfig {
                remote: remote.to_string(),
                secret: IndexMap::new(),
                ignore: IndexSet::new(),
                bundle: BundlePolicy::Default,
            },
        }
    }

    #[test]
    fn test_local_file_path_is_pure_join() {
        let temp = TempDir::new().unwrap();
        let cache = temp.path().join("cache");
        let bridge = StorageBridge::with_cache_dir(
            &config("file:///tmp/store", temp.path()),
            &ProviderRegistry::default(),
            cache.clone(),
        )
        .unwrap();

        assert_eq!(
            bridge.local_file_path("pkg@1.0.0.tar.gz"),
            cache.join("pkg@1.0.0.tar.gz")
        );
    }

    #[test]
    fn test_remote_without_scheme_rejected() {
        let temp = TempDir::new().unwrap();
        let err = StorageBridge::with_cache_dir(
            &config("/tmp/store", temp.path()),
            &ProviderRegistry::default(),
            temp.path().join("cache"),
        )
        .unwrap_err();

        assert!(matches!(err, StoreError::InvalidRemote { .. }));
    }

    #[test]
    fn test_unknown_scheme_names_scheme() {
        let temp = TempDir::new().unwrap();
        let err = StorageBridge::with_cache_dir(
            &config("bogus://somewhere", temp.path()),
            &ProviderRegistry::default(),
            temp.path().join("cache"),
        )
        .unwrap_err();

        match err {
            StoreError::UnsupportedProvider { scheme } => assert_eq!(scheme, "bogus"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_pull_verifies_content_hash() {
        let temp = TempDir::new().unwrap();
        let store = temp.path().join("store");
        std::fs::create_dir_all(&store).unwrap();
        std::fs::write(store.join("pkg@1.0.0.tar.gz"), b"artifact").unwrap();

        let remote = format!("file://{}", store.display());
        let bridge = StorageBridge::with_cache_dir(
            &config(&remote, temp.path()),
            &ProviderRegistry::default(),
            temp.path().join("cache"),
        )
        .unwrap();

        let good = hex::encode(Sha256::digest(b"artifact"));
        let request = StorageRequest::new("pkg@1.0.0.tar.gz", Some(good));
        bridge.pull_object(&request).await.unwrap();

        let bad = StorageRequest::new("pkg@1.0.0.tar.gz", Some("deadbeef".to_string()));
        assert!(matches!(
            bridge.pull_object(&bad).await.unwrap_err(),
            StoreError::IntegrityCheckFailed { .. }
        ));
    }
}
