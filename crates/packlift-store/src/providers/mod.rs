//! Built-in storage backends
//!
//! Each backend interprets the scheme-stripped remainder of the remote URI
//! however its transport requires; the bridge never parses it.

pub mod file;
pub mod object;
pub mod oss;
pub mod s3;

pub use file::SimpleFileProvider;
pub use oss::AlibabaCloudOssProvider;
pub use s3::AwsS3Provider;
