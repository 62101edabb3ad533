//! Shared plumbing for object-storage backends
//!
//! S3-compatible and OSS remotes share the same URI shape
//! (`scheme://endpoint/bucket[/prefix...]`) and the same legacy
//! header-signing scheme (base64 HMAC-SHA1 over verb, date and resource).

use base64::Engine;
use hmac::{Hmac, Mac};
use indexmap::IndexMap;
use sha1::Sha1;

use crate::error::{Result, StoreError};

type HmacSha1 = Hmac<Sha1>;

/// Parsed object-storage location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    /// Endpoint host, e.g. `oss-cn-hangzhou.aliyuncs.com`
    pub endpoint: String,
    /// First label of the endpoint, conventionally the region
    pub region: String,
    /// Bucket name
    pub bucket: String,
    /// Optional object path prefix inside the bucket
    pub prefix: String,
}

impl ObjectLocation {
    /// Parse the scheme-stripped remainder of an object-storage URI
    pub fn parse(conn_rest: &str, remote_uri: &str) -> Result<Self> {
        let mut parts = conn_rest.split('/').filter(|part| !part.is_empty());

        let endpoint = parts.next().ok_or_else(|| StoreError::InvalidRemote {
            uri: remote_uri.to_string(),
            reason: "endpoint required".to_string(),
        })?;
        let bucket = parts.next().ok_or_else(|| StoreError::InvalidRemote {
            uri: remote_uri.to_string(),
            reason: "bucket required".to_string(),
        })?;
        let prefix = parts.collect::<Vec<_>>().join("/");
        let region = endpoint.split('.').next().unwrap_or(endpoint);

        Ok(Self {
            endpoint: endpoint.to_string(),
            region: region.to_string(),
            bucket: bucket.to_string(),
            prefix,
        })
    }

    /// Object key for a file name, prefix included
    #[must_use]
    pub fn object_key(&self, file_name: &str) -> String {
        if self.prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", self.prefix, file_name)
        }
    }
}

/// Access key pair required by object-storage backends
#[derive(Debug)]
pub struct AccessKeys<'a> {
    pub key_id: &'a str,
    pub key_secret: &'a str,
    pub security_token: Option<&'a str>,
}

/// Pull the access key pair out of a resolved credential map
pub fn require_access_keys(credential: &IndexMap<String, String>) -> Result<AccessKeys<'_>> {
    let key_id = credential
        .get("accessKeyId")
        .ok_or_else(|| StoreError::MissingCredential {
            key: "accessKeyId".to_string(),
        })?;
    let key_secret = credential
        .get("accessKeySecret")
        .ok_or_else(|| StoreError::MissingCredential {
            key: "accessKeySecret".to_string(),
        })?;

    Ok(AccessKeys {
        key_id,
        key_secret,
        security_token: credential.get("securityToken").map(String::as_str),
    })
}

/// RFC 1123 date for the `Date` request header
#[must_use]
pub fn http_date() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Legacy header signature: `{prefix} {keyId}:{base64(hmac-sha1(...))}`
#[must_use]
pub fn authorization_header(
    auth_prefix: &str,
    keys: &AccessKeys<'_>,
    verb: &str,
    content_type: &str,
    date: &str,
    canonical_resource: &str,
) -> String {
    let string_to_sign = format!("{verb}\n\n{content_type}\n{date}\n{canonical_resource}");

    // HMAC accepts keys of any length
    let mut mac = HmacSha1::new_from_slice(keys.key_secret.as_bytes())
        .expect("hmac accepts keys of any length");
    mac.update(string_to_sign.as_bytes());
    let signature =
        base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes());

    format!("{auth_prefix} {}:{signature}", keys.key_id)
}
