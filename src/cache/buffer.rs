//! Value Buffer Module
//!
//! Fixed-capacity, terminator-delimited storage shared by cache entries and
//! request-scoped output.

use std::borrow::Cow;
use std::fmt;

use crate::cache::{MAX_SIZE, TERMINATOR};

/// Total buffer size: `MAX_SIZE` content bytes plus the terminator slot.
pub const BUF_CAPACITY: usize = MAX_SIZE + 1;

// == Value Buffer ==
/// A bounded byte buffer of `MAX_SIZE + 1` bytes.
///
/// The value ends at the first terminator byte. The last byte is never
/// written with content, so a value can never exceed `MAX_SIZE` bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ValueBuf {
    bytes: [u8; BUF_CAPACITY],
}

impl ValueBuf {
    // == Constructor ==
    /// Creates an empty, fully terminated buffer.
    pub const fn new() -> Self {
        Self {
            bytes: [TERMINATOR; BUF_CAPACITY],
        }
    }

    /// Creates a buffer holding `src`, truncated to `MAX_SIZE` bytes.
    pub fn from_bytes(src: &[u8]) -> Self {
        let mut buf = Self::new();
        buf.set(src);
        buf
    }

    // == Writes ==
    /// Replaces the contents with `src`, truncated to `MAX_SIZE` bytes.
    pub fn set(&mut self, src: &[u8]) {
        let n = src.len().min(MAX_SIZE);
        self.clear();
        self.bytes[..n].copy_from_slice(&src[..n]);
    }

    /// Copies all `MAX_SIZE + 1` bytes of `other`, terminator included.
    pub fn copy_from(&mut self, other: &ValueBuf) {
        self.bytes = other.bytes;
    }

    /// Zeroes every byte.
    pub fn clear(&mut self) {
        self.bytes = [TERMINATOR; BUF_CAPACITY];
    }

    /// Writes a terminator at `pos`, cutting the value there.
    ///
    /// Positions at or past `MAX_SIZE` are already terminated and are ignored.
    pub fn terminate_at(&mut self, pos: usize) {
        if pos < MAX_SIZE {
            self.bytes[pos] = TERMINATOR;
        }
    }

    /// Writable content region; the trailing terminator slot is excluded.
    pub(crate) fn content_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[..MAX_SIZE]
    }

    // == Reads ==
    /// Number of bytes before the first terminator.
    pub fn len(&self) -> usize {
        self.bytes
            .iter()
            .position(|&b| b == TERMINATOR)
            .unwrap_or(MAX_SIZE)
    }

    /// Returns true if the first byte is the terminator.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The value bytes, without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    /// All `MAX_SIZE + 1` bytes, including anything after the terminator.
    pub fn raw(&self) -> &[u8; BUF_CAPACITY] {
        &self.bytes
    }

    /// The value as text. Defaults are operator supplied and may hold
    /// non-UTF-8 bytes after truncation, so this is lossy.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }
}

impl Default for ValueBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValueBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValueBuf").field(&self.to_string_lossy()).finish()
    }
}
