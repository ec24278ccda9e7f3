//! Cache Info Module
//!
//! Point-in-time size and capacity report for a cache.

use serde::Serialize;

// == Cache Info ==
/// Size and capacity of a cache at one instant.
///
/// Serializable so hosts can expose it as-is, e.g. on a health endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheInfo {
    /// Maximum number of entries
    pub capacity: usize,
    /// Live entries after the expiry sweep
    pub len: usize,
}

impl CacheInfo {
    // == Utilization ==
    /// Fraction of capacity in use, between 0.0 and 1.0.
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.len as f64 / self.capacity as f64
        }
    }

    // == Is Full ==
    /// True when the next new key will evict the least recently used entry.
    pub fn is_full(&self) -> bool {
        self.len >= self.capacity
    }
}
