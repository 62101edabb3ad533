//! Packlift storage bridge
//!
//! This crate moves package archives between the local deploy cache and a
//! pluggable remote object store:
//!
//! - **Provider registry**: URI scheme to backend, statically registered
//! - **Built-in backends**: plain file, S3-compatible, Alibaba Cloud OSS
//! - **Storage bridge**: scheme-agnostic pull/push against the local cache
//! - **Workflows**: the end-to-end install and publish flows
//!
//! ## Example
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Publish the package in the current directory to its configured remote
//! packlift_store::publish(std::path::Path::new(".")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! The bridge performs no retries and imposes no timeouts; transport
//! failures propagate unchanged to the caller. Concurrent invocations share
//! the cache directory; concurrent publishes of the same artifact name are
//! last-writer-wins.

pub mod bridge;
pub mod cache;
pub mod error;
pub mod provider;
pub mod providers;
pub mod workflow;

// Re-exports for convenience
pub use bridge::{StorageBridge, StorageRequest};
pub use cache::{deploy_cache_dir, ready_cache_dir};
pub use error::{Result, StoreError};
pub use provider::{ProviderRegistry, StorageOptions, StorageProvider, canonical_provider_id};
pub use providers::{AlibabaCloudOssProvider, AwsS3Provider, SimpleFileProvider};
pub use workflow::{install, install_with, publish, publish_with};
