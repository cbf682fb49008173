//! Variable Registry
//!
//! Registers file-backed variables at configuration load and binds each one
//! to a named slot that request handlers resolve through.

use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::{CacheEntry, ResolveStats, ValueBuf, VariableValue, DEFAULT_TTL_SECS};
use crate::error::{ConfigError, ConfigResult};

/// Marker that must start every variable name in configuration.
pub const VARIABLE_SIGIL: char = '$';

// == Variable Index ==
/// Stable handle to a registered variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariableIndex(usize);

impl VariableIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

// == Slot ==
/// Mutable per-variable state. Held under the variable's lock for a whole
/// resolution so refreshes of one entry never interleave.
#[derive(Debug)]
pub struct Slot {
    pub entry: CacheEntry,
    pub stats: ResolveStats,
}

impl Slot {
    fn new(entry: CacheEntry) -> Self {
        Self {
            entry,
            stats: ResolveStats::new(),
        }
    }
}

// == Resolved ==
/// A resolved value copied out of its request buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    pub meta: VariableValue,
}

// == Variable ==
/// A named variable slot bound to its cache entry.
#[derive(Debug)]
pub struct Variable {
    name: String,
    slot: Mutex<Slot>,
}

impl Variable {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get handler: resolves the variable for one request at `now`.
    ///
    /// The output buffer lives only for this call.
    pub async fn resolve(&self, now: i64) -> Resolved {
        let mut out = ValueBuf::new();
        let mut slot = self.slot.lock().await;

        let meta = slot.entry.resolve(now, &mut out);
        slot.stats.record(meta.source);

        Resolved {
            value: out.to_string_lossy().into_owned(),
            meta,
        }
    }

    /// Copies the current counters and settings without resolving.
    pub async fn snapshot(&self) -> VariableSnapshot {
        let slot = self.slot.lock().await;
        VariableSnapshot {
            name: self.name.clone(),
            ttl_seconds: slot.entry.ttl_seconds(),
            cached_at: slot.entry.cached_at(),
            stats: slot.stats,
        }
    }
}

/// Point-in-time view of one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSnapshot {
    pub name: String,
    pub ttl_seconds: u32,
    pub cached_at: i64,
    pub stats: ResolveStats,
}

// == Registry ==
/// All variables declared by the loaded configuration, in declaration order.
#[derive(Debug, Default)]
pub struct Registry {
    variables: Vec<Variable>,
}

impl Registry {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Register ==
    /// Declares a file-backed variable.
    ///
    /// # Arguments
    /// * `variable_name` - Name including the leading `$`
    /// * `source_path` - File whose first line supplies the value
    /// * `default_value` - Value used when the file is missing or invalid
    /// * `ttl_override` - Optional refresh interval; 0, negative or
    ///   non-numeric values silently fall back to `DEFAULT_TTL_SECS`
    ///
    /// Declaring a name twice rebinds the existing slot to the new entry.
    pub fn register(
        &mut self,
        variable_name: &str,
        source_path: &str,
        default_value: &str,
        ttl_override: Option<&str>,
    ) -> ConfigResult<VariableIndex> {
        let name = match variable_name.strip_prefix(VARIABLE_SIGIL) {
            Some(name) if !name.is_empty() => name,
            _ => return Err(ConfigError::InvalidVariableName(variable_name.to_string())),
        };

        let ttl_seconds = parse_ttl(ttl_override);
        let entry = CacheEntry::new(source_path, default_value.as_bytes(), ttl_seconds);

        debug!(
            variable = name,
            path = source_path,
            ttl_seconds,
            "registered file-backed variable"
        );

        if let Some(index) = self.index_of(name) {
            *self.variables[index.0].slot.get_mut() = Slot::new(entry);
            return Ok(index);
        }

        self.variables.try_reserve(1)?;
        self.variables.push(Variable {
            name: name.to_string(),
            slot: Mutex::new(Slot::new(entry)),
        });

        Ok(VariableIndex(self.variables.len() - 1))
    }

    // == Lookup ==
    /// Finds a variable's index by name (without the sigil).
    pub fn index_of(&self, name: &str) -> Option<VariableIndex> {
        self.variables
            .iter()
            .position(|v| v.name == name)
            .map(VariableIndex)
    }

    pub fn get(&self, index: VariableIndex) -> Option<&Variable> {
        self.variables.get(index.0)
    }

    /// Finds a variable by name (without the sigil).
    pub fn lookup(&self, name: &str) -> Option<&Variable> {
        self.index_of(name).and_then(|index| self.get(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

// == TTL Parsing ==
/// Parses a TTL override the way C's `atoi` reads numbers.
///
/// Leading ASCII whitespace and a sign are allowed and parsing stops at the first
/// non-digit, so `"15s"` is 15. Anything that does not produce a positive
/// value that fits in an `i32` yields `DEFAULT_TTL_SECS`.
pub fn parse_ttl(ttl_override: Option<&str>) -> u32 {
    ttl_override
        .and_then(leading_integer)
        .filter(|&ttl| ttl > 0 && ttl <= i64::from(i32::MAX))
        .and_then(|ttl| u32::try_from(ttl).ok())
        .unwrap_or(DEFAULT_TTL_SECS)
}

fn leading_integer(token: &str) -> Option<i64> {
    // atoi skips only ASCII isspace, vertical tab included
    let token = token.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b');
    let (negative, digits) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;

    Some(if negative { -value } else { value })
}
