//! Storage provider contract and registry
//!
//! A provider implements pull/push for one storage technology. Providers
//! are selected by the scheme of the deploy remote URI through a static
//! registry; third parties plug in with [`ProviderRegistry::register`].

use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Result, StoreError};
use crate::providers::file::SimpleFileProvider;
use crate::providers::oss::AlibabaCloudOssProvider;
use crate::providers::s3::AwsS3Provider;

/// The contract value handed to a provider, built fresh per call
#[derive(Debug, Clone)]
pub struct StorageOptions {
    /// Object name, also the file name inside the cache directory
    pub file_name: String,
    /// Optional content hash for integrity-checked transfer
    pub file_hash: Option<String>,
    /// Full remote URI (`scheme://rest`)
    pub remote_uri: String,
    /// Scheme-stripped remainder of the URI; opaque to the bridge, parsed
    /// only by the provider
    pub conn_rest: String,
    /// Local cache directory holding the staged file
    pub cache_dir: PathBuf,
    /// Resolved credential map
    pub credential: IndexMap<String, String>,
}

impl StorageOptions {
    /// Path of the staged file inside the cache directory
    #[must_use]
    pub fn local_file_path(&self) -> PathBuf {
        self.cache_dir.join(&self.file_name)
    }
}

/// Uniform interface every storage backend satisfies
///
/// Both operations must fail loudly on transport errors or missing remote
/// objects, never silently return a missing or partial file.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug {
    /// Download the named object into the cache directory and return the
    /// path it wrote
    async fn pull_object(&self, options: &StorageOptions) -> Result<PathBuf>;

    /// Upload the file already present at `cache_dir/file_name`
    async fn push_object(&self, options: &StorageOptions) -> Result<()>;
}

/// Canonical provider identifier for a URI scheme
///
/// Convenience aliases map to canonical identifiers; unaliased schemes pass
/// through unchanged as their own identifier.
#[must_use]
pub fn canonical_provider_id(scheme: &str) -> &str {
    match scheme {
        "file" => "simple-file",
        "aws" | "s3" => "aws-s3",
        "aliyun" | "alibabacloud" | "oss" => "alibabacloud-oss",
        other => other,
    }
}

/// Static registry mapping canonical provider identifiers to backends
///
/// All built-in backends type-check at build time; the registry stays
/// pluggable for third parties through [`Self::register`].
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn StorageProvider>>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        let mut registry = Self {
            providers: HashMap::new(),
        };
        registry.register("simple-file", Arc::new(SimpleFileProvider));
        registry.register("aws-s3", Arc::new(AwsS3Provider::new()));
        registry.register("alibabacloud-oss", Arc::new(AlibabaCloudOssProvider::new()));
        registry
    }
}

impl ProviderRegistry {
    /// Registry with no built-in providers
    #[must_use]
    pub fn empty() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Register a provider under a canonical identifier
    ///
    /// Registering an existing identifier replaces the previous provider.
    pub fn register(&mut self, id: impl Into<String>, provider: Arc<dyn StorageProvider>) {
        self.providers.insert(id.into(), provider);
    }

    /// Resolve the provider for a URI scheme
    pub fn resolve(&self, scheme: &str) -> Result<Arc<dyn StorageProvider>> {
        let id = canonical_provider_id(scheme);
        self.providers
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::UnsupportedProvider {
                scheme: scheme.to_string(),
            })
    }
}
