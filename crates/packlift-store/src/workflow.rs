//! Install and publish workflows
//!
//! The two end-to-end flows composing config resolution, the archive codec
//! and the storage bridge. Steps run strictly in sequence; a failure at any
//! step aborts the whole operation and partial state is not rolled back.

use std::path::Path;

use packlift_core::{
    ArchiveOptions, Archiver, BundlePolicy, ExtractOptions, PackageConfig, TarGzArchiver,
    import_config,
};

use crate::bridge::{StorageBridge, StorageRequest};
use crate::error::Result;

/// Publish the package at `root` to its configured remote store
pub async fn publish(root: &Path) -> Result<()> {
    let config = import_config(root)?;
    let bridge = StorageBridge::new(&config)?;
    publish_with(&config, &bridge, &TarGzArchiver).await
}

/// Publish through a prebuilt bridge and archiver
pub async fn publish_with(
    config: &PackageConfig,
    bridge: &StorageBridge,
    archiver: &dyn Archiver,
) -> Result<()> {
    let file_name = config.archive_file_name();

    match config.deploy.bundle {
        BundlePolicy::Default => {
            archiver.archive(&ArchiveOptions {
                output_file: bridge.local_file_path(&file_name),
                source_dir: config.root.clone(),
                ignore: config.deploy.ignore.iter().cloned().collect(),
            })?;
        }
        BundlePolicy::Never => {
            // Push whatever is already staged in the cache
            tracing::debug!(file = %file_name, "bundle=never, skipping archive step");
        }
    }

    bridge
        .push_object(&StorageRequest::new(file_name, config.hash.clone()))
        .await
}

/// Install the package at `root` from its configured remote store
pub async fn install(root: &Path) -> Result<()> {
    let config = import_config(root)?;
    let bridge = StorageBridge::new(&config)?;
    install_with(&config, &bridge, &TarGzArchiver).await
}

/// Install through a prebuilt bridge and archiver
pub async fn install_with(
    config: &PackageConfig,
    bridge: &StorageBridge,
    archiver: &dyn Archiver,
) -> Result<()> {
    let file_name = config.archive_file_name();
    let cache_file_path = bridge
        .pull_object(&StorageRequest::new(file_name, config.hash.clone()))
        .await?;

    archiver.extract(&ExtractOptions {
        archive_file: cache_file_path,
        dest_dir: config.root.clone(),
    })?;

    // TODO: merge the pulled manifest into an existing package.json instead
    // of relying on the ignore list to keep it out of the archive
    Ok(())
}
