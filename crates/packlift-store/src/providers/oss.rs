//! Alibaba Cloud OSS backend
//!
//! Same URI shape as the S3 backend (`endpoint/bucket[/prefix...]`, region
//! taken from the first endpoint label) with OSS header signing and STS
//! token support.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::{Result, StoreError};
use crate::provider::{StorageOptions, StorageProvider};
use crate::providers::object::{
    ObjectLocation, authorization_header, http_date, require_access_keys,
};

/// Storage backend for `oss://`, `aliyun://` and `alibabacloud://` remotes
#[derive(Debug)]
pub struct AlibabaCloudOssProvider {
    client: reqwest::Client,
    endpoint_scheme: String,
}

impl Default for AlibabaCloudOssProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AlibabaCloudOssProvider {
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
impl StorageProvider for AlibabaCloudOssProvider {
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
                authorization_header("OSS", &keys, "GET", "", &date, &resource),
            );
        if let Some(token) = keys.security_token {
            request = request.header("x-oss-security-token", token);
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

        tracing::debug!(region = %location.region, bucket = %location.bucket, key = %key, "pulled object");
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
                authorization_header("OSS", &keys, "PUT", content_type, &date, &resource),
            )
            .body(body);
        if let Some(token) = keys.security_token {
            request = request.header("x-oss-security-token", token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(StoreError::transfer(
                &key,
                format!("PUT {url} returned {}", response.status()),
            ));
        }

        tracing::debug!(region = %location.region, bucket = %location.bucket, key = %key, "pushed object");
        Ok(())
    }
}
