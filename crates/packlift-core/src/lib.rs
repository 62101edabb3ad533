//! Packlift Core - configuration and packaging primitives
//!
//! This crate provides the foundational pieces of the Packlift deploy tool:
//! - `config`: package manifest and deploy descriptor resolution
//! - `secret`: credential maps with environment variable indirection
//! - `archive`: the tar.gz codec with glob ignore support

pub mod archive;
pub mod config;
pub mod error;
pub mod secret;

pub use archive::{ArchiveOptions, Archiver, ExtractOptions, TarGzArchiver};
pub use config::{
    BundlePolicy, DEFAULT_DEPLOY_FILE_NAME, DeployConfig, MANIFEST_FILE_NAME, PackageConfig,
    build_archive_file_name, import_config,
};
pub use error::{CoreError, Result};
pub use secret::{SecretValue, resolve_secrets};
