//! Bounded palette store keyed by application identity.
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::{IndicatorResult, config::BacklightConfig, palette::Palette};

/// Palette cache shared between every indicator of a process.
pub type SharedPaletteCache = Arc<Mutex<PaletteCache>>;

static SHARED: Lazy<SharedPaletteCache> =
    Lazy::new(|| Arc::new(Mutex::new(PaletteCache::default())));

/// Insertion-ordered palette cache with batch eviction.
///
/// When an insertion of a new key finds the cache at capacity, the oldest
/// `batch_size` entries are dropped first. Entries are never refreshed or
/// invalidated; they live until evicted or the cache is cleared.
#[derive(Debug)]
pub struct PaletteCache {
    entries: HashMap<String, Palette>,
    order: VecDeque<String>,
    capacity: usize,
    batch_size: usize,
}

impl PaletteCache {
    pub fn new(capacity: usize, batch_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            batch_size: batch_size.max(1),
        }
    }

    pub fn with_config(config: &BacklightConfig) -> Self {
        Self::new(config.max_cached_items, config.batch_size_to_delete)
    }

    /// The process-wide cache, created with default limits on first use.
    pub fn shared() -> SharedPaletteCache {
        SHARED.clone()
    }

    /// The process-wide cache with its limits set from `config`.
    ///
    /// Limits apply to the whole process: the last call wins, and shrinking
    /// the capacity evicts the oldest entries right away.
    pub fn shared_with(config: &BacklightConfig) -> IndicatorResult<SharedPaletteCache> {
        SHARED.lock()?.set_limits(config);
        Ok(SHARED.clone())
    }

    /// Empty the process-wide cache and restore its default limits.
    pub fn reset_shared() -> IndicatorResult<()> {
        let mut shared = SHARED.lock()?;
        shared.clear();
        shared.set_limits(&BacklightConfig::default());
        Ok(())
    }

    pub fn into_shared(self) -> SharedPaletteCache {
        Arc::new(Mutex::new(self))
    }

    pub fn get(&self, app_id: &str) -> Option<Palette> {
        self.entries.get(app_id).copied()
    }

    pub fn contains(&self, app_id: &str) -> bool {
        self.entries.contains_key(app_id)
    }

    /// Store `palette` for `app_id`, evicting a batch of the oldest entries
    /// first if a new key would not fit.
    ///
    /// Replacing the palette of a known key keeps its original position.
    pub fn put(&mut self, app_id: &str, palette: Palette) {
        if let Some(existing) = self.entries.get_mut(app_id) {
            *existing = palette;
            return;
        }

        if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }

        self.order.push_back(app_id.to_string());
        self.entries.insert(app_id.to_string(), palette);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Change capacity and eviction batch, dropping the oldest entries that
    /// no longer fit.
    pub fn set_limits(&mut self, config: &BacklightConfig) {
        self.capacity = config.max_cached_items.max(1);
        self.batch_size = config.batch_size_to_delete.max(1);

        let excess = self.order.len().saturating_sub(self.capacity);
        if excess > 0 {
            for key in self.order.drain(..excess) {
                self.entries.remove(&key);
            }
            debug!(
                evicted = excess,
                capacity = self.capacity,
                "Shrunk palette cache"
            );
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Keys from oldest to newest.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    fn evict_oldest(&mut self) {
        let count = self.batch_size.min(self.order.len());
        for key in self.order.drain(..count) {
            self.entries.remove(&key);
        }
        debug!(
            evicted = count,
            remaining = self.entries.len(),
            "Evicted oldest cached palettes"
        );
    }
}

impl Default for PaletteCache {
    fn default() -> Self {
        Self::with_config(&BacklightConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn palette(seed: u8) -> Palette {
        Palette::from_base(Rgb::new(seed, seed, seed))
    }

    #[test]
    fn test_get_returns_stored_palette() {
        let mut cache = PaletteCache::new(4, 2);
        cache.put("firefox.desktop", palette(1));
        assert_eq!(cache.get("firefox.desktop"), Some(palette(1)));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_overflow_evicts_oldest_batch() {
        let mut cache = PaletteCache::new(1000, 50);
        for i in 0..1000 {
            cache.put(&format!("app-{i}"), palette((i % 256) as u8));
        }
        assert_eq!(cache.len(), 1000);

        cache.put("app-new", palette(7));

        assert_eq!(cache.len(), 951);
        for i in 0..50 {
            assert!(!cache.contains(&format!("app-{i}")));
        }
        for i in 50..1000 {
            assert!(cache.contains(&format!("app-{i}")));
        }
        assert!(cache.contains("app-new"));
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut cache = PaletteCache::new(10, 3);
        for i in 0..100 {
            cache.put(&format!("app-{i}"), palette(0));
            assert!(cache.len() <= 10);
        }
    }

    #[test]
    fn test_replacing_existing_key_does_not_evict() {
        let mut cache = PaletteCache::new(2, 1);
        cache.put("a", palette(1));
        cache.put("b", palette(2));
        cache.put("a", palette(3));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(palette(3)));
        assert_eq!(cache.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_batch_larger_than_cache_empties_it() {
        let mut cache = PaletteCache::new(3, 50);
        for key in ["a", "b", "c", "d"] {
            cache.put(key, palette(0));
        }
        assert_eq!(cache.keys().collect::<Vec<_>>(), vec!["d"]);
    }

    #[test]
    fn test_shrinking_limits_drops_oldest() {
        let mut cache = PaletteCache::new(10, 2);
        for key in ["a", "b", "c", "d"] {
            cache.put(key, palette(0));
        }

        cache.set_limits(&BacklightConfig::new().with_cache_limits(2, 1));

        assert_eq!(cache.capacity(), 2);
        assert_eq!(cache.batch_size(), 1);
        assert_eq!(cache.keys().collect::<Vec<_>>(), vec!["c", "d"]);
    }

    #[test]
    fn test_clear() {
        let mut cache = PaletteCache::new(3, 1);
        cache.put("a", palette(0));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.keys().count(), 0);
    }
}
