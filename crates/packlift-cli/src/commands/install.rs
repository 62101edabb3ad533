//! Install command - pull the package archive and extract it into the root

use std::path::Path;

use crate::error::{CliError, Result};

/// Install the package at `root` from its configured remote store
pub async fn run(root: &Path) -> Result<()> {
    let root = std::path::absolute(root).map_err(|error| CliError::Io {
        message: format!("failed to resolve {}: {error}", root.display()),
    })?;

    println!("Installing {}...", root.display());
    packlift_store::install(&root).await?;
    println!("Successfully installed into {}", root.display());

    Ok(())
}
