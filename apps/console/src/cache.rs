use std::collections::HashMap;

use time::{Duration, OffsetDateTime};

use crate::filters::Fingerprint;
use crate::models::Activity;

pub const CACHE_TTL: Duration = Duration::minutes(5);

pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CachedPage {
    pub rows: Vec<Activity>,
    pub total_count: u64,
    pub stored_at: OffsetDateTime,
}

/// Pages already fetched for a fingerprint.
///
/// Expiry is lazy: a stale entry is dropped when it is next looked up.
/// Nothing else evicts single entries; filter changes call [`clear`].
///
/// [`clear`]: ResultCache::clear
#[derive(Debug)]
pub struct ResultCache<C = SystemClock> {
    entries: HashMap<Fingerprint, CachedPage>,
    ttl: Duration,
    clock: C,
}

impl<C: Clock> ResultCache<C> {
    pub fn new(clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            ttl: CACHE_TTL,
            clock,
        }
    }

    pub fn get(&mut self, key: &Fingerprint) -> Option<CachedPage> {
        let entry = self.entries.get(key)?;
        if self.clock.now() - entry.stored_at > self.ttl {
            self.entries.remove(key);
            return None;
        }
        Some(entry.clone())
    }

    pub fn set(&mut self, key: Fingerprint, rows: Vec<Activity>, total_count: u64) {
        let stored_at = self.clock.now();
        self.entries.insert(
            key,
            CachedPage {
                rows,
                total_count,
                stored_at,
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[derive(Clone, Debug)]
pub struct ManualClock(std::rc::Rc<std::cell::Cell<OffsetDateTime>>);

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self(std::rc::Rc::new(std::cell::Cell::new(
            OffsetDateTime::UNIX_EPOCH,
        )))
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        self.0.get()
    }
}
