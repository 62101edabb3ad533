//! S3-compatible object-storage backend
//!
//! The connection remainder is `endpoint/bucket[/prefix...]`. Objects are
//! addressed path-style so S3-compatible gateways work unchanged; requests
//! carry a legacy `AWS` header signature.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::{Result, StoreError};
use crate::provider::{StorageOptions, StorageProvider};
use crate::providers::object::{
    ObjectLocation, authorization_header, http_date, require_access_keys,
};

/// Storage backend for `s3://` and `aws://` remotes
#[derive(Debug)]
pub struct AwsS3Provider {
    client: reqwest::Client,
    endpoint_scheme: String,
}

impl Default for AwsS3Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl AwsS3Provider {
    #[must_use]
    pub fn new() -> Self {
        Self::with_endpoint_scheme("https")
    }

    /// Override the endpoint scheme, e.g. `http` for local gateways
    #[must_use]
    pub fn with_endpoint_scheme(scheme: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint_scheme: scheme.to_string(),
        }
    }

    fn object_url(&self, location: &ObjectLocation, key: &str) -> String {
        format!(
            "{}://{}/{}/{}",
            self.endpoint_scheme, location.endpoint, location.bucket, key
        )
    }
}

#[async_trait]
impl StorageProvider for AwsS3Provider {
    async fn pull_object(&self, options: &StorageOptions) -> Result<PathBuf> {
        let location = ObjectLocation::parse(&options.conn_rest, &options.remote_uri)?;
        let keys = require_access_keys(&options.credential)?;

        let key = location.object_key(&options.file_name);
        let url = self.object_url(&location, &key);
        let date = http_date();
        let resource = format!("/{}/{}", location.bucket, key);

        let mut request = self
            .client
            .get(&url)
            .header("Date", &date)
            .header(
                "Authorization",
                authorization_header("AWS", &keys, "GET", "", &date, &resource),
            );
        if let Some(token) = keys.security_token {
            request = request.header("x-amz-security-token", token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(StoreError::transfer(
                &key,
                format!("GET {url} returned {}", response.status()),
            ));
        }

        let bytes = response.bytes().await?;
        let local_file_path = options.local_file_path();
        std::fs::write(&local_file_path, &bytes)?;

        tracing::debug!(bucket = %location.bucket, key = %key, "pulled object");
        Ok(local_file_path)
    }

    async fn push_object(&self, options: &StorageOptions) -> Result<()> {
        let location = ObjectLocation::parse(&options.conn_rest, &options.remote_uri)?;
        let keys = require_access_keys(&options.credential)?;

        let local_file_path = options.local_file_path();
        let body = std::fs::read(&local_file_path).map_err(|error| {
            StoreError::transfer(
                local_file_path.display().to_string(),
                format!("read staged file failed: {error}"),
            )
        })?;

        let key = location.object_key(&options.file_name);
        let url = self.object_url(&location, &key);
        let date = http_date();
        let resource = format!("/{}/{}", location.bucket, key);
        let content_type = "application/gzip";

        let mut request = self
            .client
            .put(&url)
            .header("Date", &date)
            .header("Content-Type", content_type)
            .header(
                "Authorization",
                authorization_header("AWS", &keys, "PUT", content_type, &date, &resource),
            )
            .body(body);
        if let Some(token) = keys.security_token {
            request = request.header("x-amz-security-token", token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(StoreError::transfer(
                &key,
                format!("PUT {url} returned {}", response.status()),
            ));
        }

        tracing::debug!(bucket = %location.bucket, key = %key, "pushed object");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use tempfile::TempDir;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn options(server: &MockServer, cache_dir: &std::path::Path) -> StorageOptions {
        let host = server.uri().trim_start_matches("http://").to_string();
        let mut credential = IndexMap::new();
        credential.insert("accessKeyId".to_string(), "AKID".to_string());
        credential.insert("accessKeySecret".to_string(), "SECRET".to_string());

        StorageOptions {
            file_name: "pkg@1.0.0.tar.gz".to_string(),
            file_hash: None,
            remote_uri: format!("s3://{host}/bucket/releases"),
            conn_rest: format!("{host}/bucket/releases"),
            cache_dir: cache_dir.to_path_buf(),
            credential,
        }
    }

    #[tokio::test]
    async fn test_pull_downloads_object_to_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bucket/releases/pkg@1.0.0.tar.gz"))
            .and(header_exists("Authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"archive-bytes".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let cache = TempDir::new().unwrap();
        let provider = AwsS3Provider::with_endpoint_scheme("http");
        let local = provider
            .pull_object(&options(&server, cache.path()))
            .await
            .unwrap();

        assert_eq!(std::fs::read(&local).unwrap(), b"archive-bytes");
    }

    #[tokio::test]
    async fn test_pull_missing_object_is_transfer_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let cache = TempDir::new().unwrap();
        let provider = AwsS3Provider::with_endpoint_scheme("http");
        let err = provider
            .pull_object(&options(&server, cache.path()))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Transfer { .. }));
    }

    #[tokio::test]
    async fn test_push_uploads_staged_file() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/bucket/releases/pkg@1.0.0.tar.gz"))
            .and(header_exists("Authorization"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let cache = TempDir::new().unwrap();
        std::fs::write(cache.path().join("pkg@1.0.0.tar.gz"), b"archive-bytes").unwrap();

        let provider = AwsS3Provider::with_endpoint_scheme("http");
        provider
            .push_object(&options(&server, cache.path()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_missing_credentials_rejected() {
        let server = MockServer::start().await;
        let cache = TempDir::new().unwrap();
        let mut opts = options(&server, cache.path());
        opts.credential.clear();

        let provider = AwsS3Provider::with_endpoint_scheme("http");
        assert!(matches!(
            provider.pull_object(&opts).await.unwrap_err(),
            StoreError::MissingCredential { .. }
        ));
    }
}
