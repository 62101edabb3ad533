//! Simple file backend
//!
//! Treats the remote as a plain directory on the local filesystem. The
//! connection remainder is an absolute path; a leading `~` expands to the
//! user's home directory.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::{Result, StoreError};
use crate::provider::{StorageOptions, StorageProvider};

/// Plain-file storage backend for `file://` remotes
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleFileProvider;

impl SimpleFileProvider {
    fn remote_dir(&self, options: &StorageOptions) -> Result<PathBuf> {
        let rest = options.conn_rest.as_str();
        if rest.contains("./") {
            return Err(StoreError::InvalidRemote {
                uri: options.remote_uri.clone(),
                reason: "relative path not supported".to_string(),
            });
        }

        if let Some(suffix) = rest.strip_prefix('~') {
            let home = dirs::home_dir().ok_or_else(|| StoreError::InvalidRemote {
                uri: options.remote_uri.clone(),
                reason: "could not expand ~, home directory unknown".to_string(),
            })?;
            Ok(home.join(suffix.trim_start_matches('/')))
        } else {
            Ok(PathBuf::from(rest))
        }
    }
}

#[async_trait]
impl StorageProvider for SimpleFileProvider {
    async fn pull_object(&self, options: &StorageOptions) -> Result<PathBuf> {
        let remote_file_path = self.remote_dir(options)?.join(&options.file_name);
        let local_file_path = options.local_file_path();

        std::fs::copy(&remote_file_path, &local_file_path).map_err(|error| {
            StoreError::transfer(
                remote_file_path.display().to_string(),
                format!("copy to cache failed: {error}"),
            )
        })?;

        Ok(local_file_path)
    }

    async fn push_object(&self, options: &StorageOptions) -> Result<()> {
        let remote_dir = self.remote_dir(options)?;
        let remote_file_path = remote_dir.join(&options.file_name);
        let local_file_path = options.local_file_path();

        std::fs::create_dir_all(&remote_dir).map_err(|error| {
            StoreError::transfer(
                remote_dir.display().to_string(),
                format!("create remote directory failed: {error}"),
            )
        })?;
        std::fs::copy(&local_file_path, &remote_file_path).map_err(|error| {
            StoreError::transfer(
                remote_file_path.display().to_string(),
                format!("copy from cache failed: {error}"),
            )
        })?;

        Ok(())
    }
}
