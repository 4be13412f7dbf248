use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use time::error::ComponentRange;
use time::UtcOffset;

/// A fixed UTC offset as reported by the logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedZone {
    offset: UtcOffset,
}

impl FixedZone {
    pub fn new(seconds: i32) -> Result<Self, ComponentRange> {
        Ok(Self {
            offset: UtcOffset::from_whole_seconds(seconds)?,
        })
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// Offset from UTC in seconds.
    pub fn seconds(&self) -> i32 {
        self.offset.whole_seconds()
    }
}

impl fmt::Display for FixedZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hours, minutes, _) = self.offset.as_hms();
        let sign = if self.offset.is_negative() { '-' } else { '+' };
        write!(f, "GMT{sign}{:02}:{:02}", hours.unsigned_abs(), minutes.unsigned_abs())
    }
}

/// Shared cache of fixed zones, one per distinct offset.
///
/// Safe to share between decoder workers; entries are created on first use
/// and never replaced.
#[derive(Debug, Default)]
pub struct ZoneCache {
    zones: RwLock<HashMap<i32, Arc<FixedZone>>>,
}

impl ZoneCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zone for an offset in seconds, creating it on first lookup.
    pub fn lookup(&self, seconds: i32) -> Result<Arc<FixedZone>, ComponentRange> {
        if let Some(zone) = self
            .zones
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&seconds)
        {
            return Ok(Arc::clone(zone));
        }

        let zone = Arc::new(FixedZone::new(seconds)?);
        let mut zones = self.zones.write().unwrap_or_else(PoisonError::into_inner);
        // another worker may have inserted while we waited for the lock
        Ok(Arc::clone(zones.entry(seconds).or_insert(zone)))
    }

    /// Number of distinct offsets seen.
    pub fn len(&self) -> usize {
        self.zones.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
