//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Not found - unknown repository, chart, or version
pub const NOT_FOUND: i32 = 3;

/// Network error - a repository index or chart archive could not be fetched
pub const NETWORK_ERROR: i32 = 4;

/// Decode error - a fetched document or archive is malformed
pub const DECODE_ERROR: i32 = 5;

/// Usage error - invalid arguments, options or configuration (sysexits.h EX_USAGE)
pub const USAGE_ERROR: i32 = 64;

/// IO error - cache or configuration file could not be read or written (sysexits.h EX_IOERR)
pub const IO_ERROR: i32 = 74;
