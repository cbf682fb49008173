//! Cache Module
//!
//! File-backed variable values with TTL refresh, strict validation and
//! fallback to a configured default.

mod buffer;
mod entry;
mod stats;
mod validator;


// Re-export public types
pub use buffer::ValueBuf;
pub use entry::{read_first_line, CacheEntry, ValueSource, VariableValue};
pub use stats::ResolveStats;
pub use validator::{is_allowed, validate};

// == Public Constants ==
/// Maximum number of content bytes a value can hold
pub const MAX_SIZE: usize = 20;

/// Maximum number of bytes read from the first line of a source file
pub const READ_LIMIT: usize = MAX_SIZE - 1;

/// Refresh interval used when none (or an unusable one) is configured
pub const DEFAULT_TTL_SECS: u32 = 10;

/// Byte marking the end of a value inside a buffer
pub const TERMINATOR: u8 = 0;
