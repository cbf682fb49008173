//! Resolution Statistics Module
//!
//! Counts how variable lookups were satisfied: from cache, by refresh, or by
//! falling back to the default.

use serde::Serialize;

use crate::cache::ValueSource;

// == Resolve Stats ==
/// Tracks resolution counters for one variable (or an aggregate of several).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolveStats {
    /// Lookups served from the cached copy
    pub hits: u64,
    /// Lookups that found the entry stale and refreshed it
    pub refreshes: u64,
    /// Refreshes that ended with the default value
    pub fallbacks: u64,
}

impl ResolveStats {
    // == Constructor ==
    /// Creates a new ResolveStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record ==
    /// Counts one resolution by where its value came from.
    pub fn record(&mut self, source: ValueSource) {
        match source {
            ValueSource::Cache => self.hits += 1,
            ValueSource::File => self.refreshes += 1,
            ValueSource::Default => {
                self.refreshes += 1;
                self.fallbacks += 1;
            }
        }
    }

    // == Totals ==
    /// Total number of resolutions.
    pub fn lookups(&self) -> u64 {
        self.hits + self.refreshes
    }

    /// Calculates the cache hit rate.
    ///
    /// Returns hits / lookups, or 0.0 if nothing has been resolved yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Adds another set of counters into this one.
    pub fn merge(&mut self, other: &ResolveStats) {
        self.hits += other.hits;
        self.refreshes += other.refreshes;
        self.fallbacks += other.fallbacks;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = ResolveStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.refreshes, 0);
        assert_eq!(stats.fallbacks, 0);
        assert_eq!(stats.lookups(), 0);
    }

    #[test]
    fn test_hit_rate_no_lookups() {
        assert_eq!(ResolveStats::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_record_by_source() {
        let mut stats = ResolveStats::new();
        stats.record(ValueSource::File);
        stats.record(ValueSource::Cache);
        stats.record(ValueSource::Cache);
        stats.record(ValueSource::Default);

        assert_eq!(stats.hits, 2);
        assert_eq!(stats.refreshes, 2);
        assert_eq!(stats.fallbacks, 1);
        assert_eq!(stats.lookups(), 4);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_merge() {
        let mut total = ResolveStats {
            hits: 3,
            refreshes: 1,
            fallbacks: 0,
        };
        total.merge(&ResolveStats {
            hits: 1,
            refreshes: 2,
            fallbacks: 2,
        });

        assert_eq!(
            total,
            ResolveStats {
                hits: 4,
                refreshes: 3,
                fallbacks: 2,
            }
        );
    }
}
