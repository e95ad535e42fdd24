//! In-process, currency-scoped catalog cache.
//!
//! One snapshot of the supplier catalog per currency, each with a 30-day TTL
//! measured from its last `set`. Writes replace a currency's snapshot
//! wholesale, so concurrent readers always see a complete old or new
//! snapshot. The clock is injected so tests can step time across the TTL
//! boundary deterministically.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::Currency;

/// Cache entries are considered stale this long after their last refresh.
pub const CACHE_TTL_DAYS: i64 = 30;

/// A supplier catalog item as cached for the storefront listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedProduct {
    pub id: String,
    pub title: String,
    pub price: Decimal,
    pub currency: Currency,
    pub location: Option<String>,
    pub duration_text: Option<String>,
    pub photo_urls: Vec<String>,
}

/// Refresh bookkeeping for one currency's snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheMetadata {
    pub last_refresh_at: DateTime<Utc>,
    pub total_products: usize,
}

/// Injectable time source.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock [`Clock`] used outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct Slot {
    items: Vec<CachedProduct>,
    last_refresh_at: DateTime<Utc>,
}

/// Currency-scoped catalog cache with TTL.
///
/// An expired currency and a never-populated currency both read as empty.
/// Distinguishing the two would help cache warming, but the storefront has
/// always treated both as a plain miss, so that behavior is preserved.
pub struct CatalogCache {
    slots: RwLock<HashMap<Currency, Slot>>,
    clock: Box<dyn Clock>,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new(Box::new(SystemClock))
    }
}

impl CatalogCache {
    #[must_use]
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Returns the cached snapshot for `currency`, or an empty list when the
    /// currency was never populated or its snapshot has expired. Callers
    /// interpret empty as "cache miss", never as "zero products exist".
    #[must_use]
    pub fn get(&self, currency: Currency) -> Vec<CachedProduct> {
        let slots = self.slots.read().expect("cache lock poisoned");
        match slots.get(&currency) {
            Some(slot) if !self.slot_expired(slot) => slot.items.clone(),
            _ => Vec::new(),
        }
    }

    /// Replaces the whole snapshot for `currency` and restarts its TTL.
    ///
    /// Items are de-duplicated by id first (last occurrence wins, original
    /// order kept) because overlapping pages from concurrent refreshes can
    /// repeat products.
    pub fn set(&self, items: Vec<CachedProduct>, currency: Currency) {
        let items = dedupe_by_id(items);
        let mut slots = self.slots.write().expect("cache lock poisoned");
        slots.insert(
            currency,
            Slot {
                items,
                last_refresh_at: self.clock.now(),
            },
        );
    }

    /// Refresh metadata for `currency`, regardless of expiry. `None` when the
    /// currency has never been populated.
    #[must_use]
    pub fn metadata(&self, currency: Currency) -> Option<CacheMetadata> {
        let slots = self.slots.read().expect("cache lock poisoned");
        slots.get(&currency).map(|slot| CacheMetadata {
            last_refresh_at: slot.last_refresh_at,
            total_products: slot.items.len(),
        })
    }

    /// True when `currency` has no snapshot or its snapshot is past the TTL.
    #[must_use]
    pub fn is_expired(&self, currency: Currency) -> bool {
        let slots = self.slots.read().expect("cache lock poisoned");
        slots.get(&currency).is_none_or(|slot| self.slot_expired(slot))
    }

    fn slot_expired(&self, slot: &Slot) -> bool {
        self.clock.now() - slot.last_refresh_at > Duration::days(CACHE_TTL_DAYS)
    }
}

fn dedupe_by_id(items: Vec<CachedProduct>) -> Vec<CachedProduct> {
    let mut by_id: HashMap<String, usize> = HashMap::new();
    let mut deduped: Vec<CachedProduct> = Vec::with_capacity(items.len());
    for item in items {
        if let Some(&idx) = by_id.get(&item.id) {
            deduped[idx] = item;
        } else {
            by_id.insert(item.id.clone(), deduped.len());
            deduped.push(item);
        }
    }
    deduped
}
