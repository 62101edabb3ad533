//! Package config resolution
//!
//! Reads `package.json` and the deploy descriptor it names, validates the
//! required fields, resolves secret indirections and normalizes the ignore
//! list into a fully-resolved, immutable `PackageConfig`.

use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};
use crate::secret::{SecretValue, resolve_secrets};

/// Primary descriptor file, npm-style
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// Deploy descriptor used when the manifest does not name one
pub const DEFAULT_DEPLOY_FILE_NAME: &str = "package.deploy.json";

/// Fully-resolved package configuration
///
/// Built once per invocation and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct PackageConfig {
    /// Package name, non-empty
    pub name: String,
    /// Package version, non-empty
    pub version: String,
    /// Absolute path of the package directory, set by the resolver
    pub root: PathBuf,
    /// Optional content hash for integrity-checked transfer
    pub hash: Option<String>,
    /// Resolved deploy configuration
    pub deploy: DeployConfig,
}

/// Resolved deploy descriptor
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// Remote URI of the form `scheme://rest`
    pub remote: String,
    /// Credential map with environment indirections already resolved
    pub secret: IndexMap<String, String>,
    /// Glob exclusion patterns for archiving; always contains the manifest
    /// and descriptor file names
    pub ignore: IndexSet<String>,
    /// Packaging policy
    pub bundle: BundlePolicy,
}

/// Whether packaging is required at all
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundlePolicy {
    /// Standard tar.gz archive
    #[default]
    Default,
    /// Skip archiving; push the file already staged in the cache
    Never,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    name: Option<String>,
    version: Option<String>,
    deploy: Option<String>,
    hash: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDeployDescriptor {
    remote: Option<String>,
    #[serde(default)]
    secret: IndexMap<String, SecretValue>,
    #[serde(default)]
    ignore: Vec<String>,
    #[serde(default)]
    bundle: BundlePolicy,
}

/// Required-or-default rule for a single config field
///
/// Applied uniformly to the manifest and the deploy descriptor so the two
/// files share one validation path.
struct FieldRule {
    name: &'static str,
    default: Option<&'static str>,
}

impl FieldRule {
    const fn required(name: &'static str) -> Self {
        Self {
            name,
            default: None,
        }
    }

    const fn with_default(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            default: Some(default),
        }
    }

    fn apply(&self, value: Option<String>) -> Result<String> {
        match value.filter(|v| !v.is_empty()) {
            Some(value) => Ok(value),
            None => self
                .default
                .map(str::to_string)
                .ok_or_else(|| CoreError::ConfigValidation {
                    field: self.name.to_string(),
                }),
        }
    }
}

impl PackageConfig {
    /// Archive file name for this package
    #[must_use]
    pub fn archive_file_name(&self) -> String {
        build_archive_file_name(&self.name, &self.version)
    }
}

/// Build the deterministic archive file name for a package
///
/// Scoped names keep a single flat file name: `a/b` becomes `a-b`.
#[must_use]
pub fn build_archive_file_name(name: &str, version: &str) -> String {
    format!("{}@{}.tar.gz", name.replace('/', "-"), version)
}

/// Import and resolve the package configuration under `root`
pub fn import_config(root: &Path) -> Result<PackageConfig> {
    let manifest_path = root.join(MANIFEST_FILE_NAME);
    let manifest: RawManifest = read_json_file(&manifest_path)?;

    let name = FieldRule::required("name").apply(manifest.name)?;
    let version = FieldRule::required("version").apply(manifest.version)?;
    let deploy_file_name =
        FieldRule::with_default("deploy", DEFAULT_DEPLOY_FILE_NAME).apply(manifest.deploy)?;

    let descriptor_path = root.join(&deploy_file_name);
    let descriptor: RawDeployDescriptor = read_json_file(&descriptor_path)?;

    let remote = FieldRule::required("remote").apply(descriptor.remote)?;
    let secret = resolve_secrets(&descriptor.secret)?;

    // The manifest and the descriptor itself never end up inside the archive
    let mut ignore: IndexSet<String> = descriptor.ignore.into_iter().collect();
    ignore.insert(MANIFEST_FILE_NAME.to_string());
    ignore.insert(deploy_file_name);

    tracing::info!(name = %name, version = %version, "resolved package config");

    Ok(PackageConfig {
        name,
        version,
        root: root.to_path_buf(),
        hash: manifest.hash,
        deploy: DeployConfig {
            remote,
            secret,
            ignore,
            bundle: descriptor.bundle,
        },
    })
}

fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|error| {
        tracing::debug!("config read failed: {error}");
        CoreError::ConfigRead {
            path: path.display().to_string(),
        }
    })?;

    serde_json::from_str(&content).map_err(|error| {
        tracing::debug!("config parse failed: {error}");
        CoreError::ConfigFormat {
            path: path.display().to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &Path, manifest: &str, descriptor: &str) {
        std::fs::write(dir.join(MANIFEST_FILE_NAME), manifest).unwrap();
        std::fs::write(dir.join(DEFAULT_DEPLOY_FILE_NAME), descriptor).unwrap();
    }

    #[test]
    fn test_import_valid_config() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            r#"{"name": "pkg", "version": "2.0.0"}"#,
            r#"{"remote": "file:///tmp/store"}"#,
        );

        let config = import_config(temp.path()).unwrap();
        assert_eq!(config.name, "pkg");
        assert_eq!(config.version, "2.0.0");
        assert_eq!(config.root, temp.path());
        assert_eq!(config.deploy.remote, "file:///tmp/store");
        assert_eq!(config.deploy.bundle, BundlePolicy::Default);
        assert!(config.hash.is_none());
    }

    #[test]
    fn test_archive_file_name() {
        assert_eq!(build_archive_file_name("a", "1.0.0"), "a@1.0.0.tar.gz");
        assert_eq!(build_archive_file_name("a/b", "1.0.0"), "a-b@1.0.0.tar.gz");
    }

    #[test]
    fn test_archive_file_name_stable_across_resolutions() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            r#"{"name": "pkg", "version": "2.0.0"}"#,
            r#"{"remote": "file:///tmp/store"}"#,
        );

        let first = import_config(temp.path()).unwrap().archive_file_name();
        let second = import_config(temp.path()).unwrap().archive_file_name();
        assert_eq!(first, "pkg@2.0.0.tar.gz");
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_manifest_is_read_error() {
        let temp = TempDir::new().unwrap();
        match import_config(temp.path()).unwrap_err() {
            CoreError::ConfigRead { path } => assert!(path.ends_with(MANIFEST_FILE_NAME)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_json_is_format_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(MANIFEST_FILE_NAME), "not json").unwrap();
        assert!(matches!(
            import_config(temp.path()).unwrap_err(),
            CoreError::ConfigFormat { .. }
        ));
    }

    #[test]
    fn test_missing_name_names_field() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            r#"{"version": "1.0.0"}"#,
            r#"{"remote": "file:///tmp/store"}"#,
        );

        match import_config(temp.path()).unwrap_err() {
            CoreError::ConfigValidation { field } => assert_eq!(field, "name"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_version_is_invalid() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            r#"{"name": "pkg", "version": ""}"#,
            r#"{"remote": "file:///tmp/store"}"#,
        );

        match import_config(temp.path()).unwrap_err() {
            CoreError::ConfigValidation { field } => assert_eq!(field, "version"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_remote_names_field() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            r#"{"name": "pkg", "version": "1.0.0"}"#,
            r#"{"ignore": ["dist"]}"#,
        );

        match import_config(temp.path()).unwrap_err() {
            CoreError::ConfigValidation { field } => assert_eq!(field, "remote"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ignore_always_contains_config_files() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            r#"{"name": "pkg", "version": "1.0.0"}"#,
            r#"{"remote": "file:///tmp/store", "ignore": ["node_modules", "package.json"]}"#,
        );

        let config = import_config(temp.path()).unwrap();
        let ignore: Vec<_> = config.deploy.ignore.iter().cloned().collect();
        assert_eq!(
            ignore,
            vec!["node_modules", "package.json", "package.deploy.json"]
        );
    }

    #[test]
    fn test_custom_deploy_descriptor_name() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(MANIFEST_FILE_NAME),
            r#"{"name": "pkg", "version": "1.0.0", "deploy": "deploy.custom.json"}"#,
        )
        .unwrap();
        std::fs::write(
            temp.path().join("deploy.custom.json"),
            r#"{"remote": "file:///tmp/store"}"#,
        )
        .unwrap();

        let config = import_config(temp.path()).unwrap();
        assert!(config.deploy.ignore.contains("deploy.custom.json"));
        assert!(config.deploy.ignore.contains(MANIFEST_FILE_NAME));
    }

    #[test]
    fn test_secret_indirection_resolved() {
        // SAFETY: test-local variable name
        unsafe { std::env::set_var("PACKLIFT_TEST_CONFIG_TOKEN", "s3cr3t") };

        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            r#"{"name": "pkg", "version": "1.0.0"}"#,
            r#"{"remote": "s3://host/bucket", "secret": {"accessKeyId": "literal-id", "accessKeySecret": "$PACKLIFT_TEST_CONFIG_TOKEN"}}"#,
        );

        let config = import_config(temp.path()).unwrap();
        assert_eq!(config.deploy.secret["accessKeyId"], "literal-id");
        assert_eq!(config.deploy.secret["accessKeySecret"], "s3cr3t");
    }

    #[test]
    fn test_unset_secret_variable_fails() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            r#"{"name": "pkg", "version": "1.0.0"}"#,
            r#"{"remote": "s3://host/bucket", "secret": {"token": "$PACKLIFT_TEST_CONFIG_UNSET"}}"#,
        );

        match import_config(temp.path()).unwrap_err() {
            CoreError::MissingEnvVar { name } => assert_eq!(name, "PACKLIFT_TEST_CONFIG_UNSET"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bundle_policy_never() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            r#"{"name": "pkg", "version": "1.0.0", "hash": "abc123"}"#,
            r#"{"remote": "file:///tmp/store", "bundle": "never"}"#,
        );

        let config = import_config(temp.path()).unwrap();
        assert_eq!(config.deploy.bundle, BundlePolicy::Never);
        assert_eq!(config.hash.as_deref(), Some("abc123"));
    }
}
