//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

#![allow(dead_code)]

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Config error - manifest or deploy descriptor invalid
pub const CONFIG_ERROR: i32 = 2;

/// Transfer error - pull/push against the remote store failed
pub const TRANSFER_ERROR: i32 = 3;

/// Archive error - packaging or extraction failed
pub const ARCHIVE_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Usage error - invalid arguments or options (following sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;
