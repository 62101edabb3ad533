//! Local deploy cache directory
//!
//! A single machine-wide staging directory under the user's home, created
//! on demand and shared by every invocation. Nothing here prunes it.

use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

const CACHE_DIR_NAME: &str = ".packlift-deploy-cache";

/// Path of the shared deploy cache directory
pub fn deploy_cache_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| StoreError::CacheDir {
        message: "Could not determine home directory".to_string(),
    })?;
    Ok(home.join(CACHE_DIR_NAME))
}

/// Ensure the shared cache directory exists and return its path
pub fn ready_cache_dir() -> Result<PathBuf> {
    let path = deploy_cache_dir()?;
    ready_dir(&path)?;
    Ok(path)
}

/// Idempotent recursive create, tolerant of create races
///
/// Concurrent invocations share the cache directory; if creation fails but
/// the directory exists, another creator won the race and that is not a
/// failure.
pub fn ready_dir(path: &Path) -> Result<()> {
    if let Err(error) = std::fs::create_dir_all(path) {
        if path.is_dir() {
            tracing::warn!(dir = %path.display(), "cache dir create raced: {error}");
        } else {
            return Err(StoreError::CacheDir {
                message: format!("failed to create {}: {error}", path.display()),
            });
        }
    }
    Ok(())
}
