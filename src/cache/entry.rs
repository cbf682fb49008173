//! Cache Entry Module
//!
//! One entry per registered variable: the backing file, the fallback value,
//! and the last accepted value with the time it was accepted.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cache::{validate, ValueBuf, DEFAULT_TTL_SECS, READ_LIMIT};

// == Value Source ==
/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    /// Served from the cached copy without touching the file
    Cache,
    /// Freshly read and accepted from the source file
    File,
    /// Refresh failed or was rejected; the default was used
    Default,
}

// == Variable Value ==
/// Result of resolving a variable, in the shape request hosts expect.
///
/// Resolution always succeeds, so `valid` is always set and `not_found`
/// never is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableValue {
    /// Length of the value written to the output buffer
    pub len: usize,
    /// The value is usable
    pub valid: bool,
    /// The host must not cache the value itself
    pub no_cacheable: bool,
    /// The variable has no value
    pub not_found: bool,
    /// Where the value came from
    pub source: ValueSource,
}

impl VariableValue {
    fn found(len: usize, source: ValueSource) -> Self {
        Self {
            len,
            valid: true,
            no_cacheable: false,
            not_found: false,
            source,
        }
    }
}

// == Cache Entry ==
/// A file-backed value with TTL refresh and fallback.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// File holding the value on its first line
    source_path: PathBuf,
    /// Used whenever a refresh fails or is rejected
    default_value: ValueBuf,
    /// Last accepted value
    cached_value: ValueBuf,
    /// Unix seconds of the last refresh, 0 = never refreshed
    cached_at: i64,
    /// Refresh interval in seconds, always > 0
    ttl_seconds: u32,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a never-refreshed entry.
    ///
    /// # Arguments
    /// * `source_path` - File to read the value from
    /// * `default_value` - Fallback value, truncated to `MAX_SIZE` bytes
    /// * `ttl_seconds` - Refresh interval; 0 becomes `DEFAULT_TTL_SECS`
    pub fn new(source_path: impl Into<PathBuf>, default_value: &[u8], ttl_seconds: u32) -> Self {
        let ttl_seconds = if ttl_seconds == 0 {
            DEFAULT_TTL_SECS
        } else {
            ttl_seconds
        };

        Self {
            source_path: source_path.into(),
            default_value: ValueBuf::from_bytes(default_value),
            cached_value: ValueBuf::new(),
            cached_at: 0,
            ttl_seconds,
        }
    }

    // == Accessors ==
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn default_value(&self) -> &ValueBuf {
        &self.default_value
    }

    pub fn cached_value(&self) -> &ValueBuf {
        &self.cached_value
    }

    pub fn cached_at(&self) -> i64 {
        self.cached_at
    }

    pub fn ttl_seconds(&self) -> u32 {
        self.ttl_seconds
    }

    // == Is Stale ==
    /// Checks whether the next resolution at `now` must refresh.
    ///
    /// Boundary condition: the entry stays fresh while exactly `ttl_seconds`
    /// have elapsed; it goes stale only once the elapsed time is greater.
    pub fn is_stale(&self, now: i64) -> bool {
        self.cached_at == 0 || now.saturating_sub(self.cached_at) > i64::from(self.ttl_seconds)
    }

    // == Resolve ==
    /// Writes the current value into `out` and reports its length.
    ///
    /// A fresh entry is copied from the cache with no I/O. A stale entry is
    /// refreshed from its source file; a missing file, a read error or
    /// rejected content all fall back to the default. Either way the result
    /// is cached and stamped with `now`. This never fails.
    pub fn resolve(&mut self, now: i64, out: &mut ValueBuf) -> VariableValue {
        if !self.is_stale(now) {
            out.copy_from(&self.cached_value);
            return VariableValue::found(out.len(), ValueSource::Cache);
        }

        let source = if self.refresh_into(out) {
            ValueSource::File
        } else {
            out.copy_from(&self.default_value);
            ValueSource::Default
        };

        self.cached_value.copy_from(out);
        self.cached_at = now;

        VariableValue::found(out.len(), source)
    }

    /// Reads and validates the source file into `out`.
    ///
    /// Returns false when the file cannot be opened or read, is empty, or
    /// fails validation. `out` holds unusable bytes in that case.
    fn refresh_into(&self, out: &mut ValueBuf) -> bool {
        let file = match File::open(&self.source_path) {
            Ok(file) => file,
            Err(_) => return false,
        };

        match read_first_line(file, out) {
            Ok(0) | Err(_) => false,
            Ok(_) => match validate(out.as_bytes()) {
                Some(len) => {
                    out.terminate_at(len);
                    true
                }
                None => false,
            },
        }
    }
}

// == Utility Functions ==
/// Reads at most `READ_LIMIT` bytes of the first line of `reader` into `out`.
///
/// Reading stops after the first newline, which is kept. `out` is cleared
/// first, so the result is always terminated. Returns the number of bytes
/// read; 0 means the input was empty.
pub fn read_first_line<R: Read>(reader: R, out: &mut ValueBuf) -> io::Result<usize> {
    out.clear();

    let mut reader = BufReader::new(reader.take(READ_LIMIT as u64));
    let dst = out.content_mut();
    let mut len = 0;

    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            break;
        }

        let (take, line_done) = match chunk.iter().position(|&b| b == b'\n') {
            Some(pos) => (pos + 1, true),
            None => (chunk.len(), false),
        };

        // take() caps the total at READ_LIMIT, which is below the content size
        dst[len..len + take].copy_from_slice(&chunk[..take]);
        len += take;
        reader.consume(take);

        if line_done {
            break;
        }
    }

    Ok(len)
}
