//! Publish command - archive the root and push it to the remote store

use std::path::Path;

use crate::error::{CliError, Result};

/// Publish the package at `root` to its configured remote store
pub async fn run(root: &Path) -> Result<()> {
    let root = std::path::absolute(root).map_err(|error| CliError::Io {
        message: format!("failed to resolve {}: {error}", root.display()),
    })?;

    println!("Publishing {}...", root.display());
    packlift_store::publish(&root).await?;
    println!("Successfully published");

    Ok(())
}
