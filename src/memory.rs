//! Bounded in-memory hot set of decoded art.
//!
//! Holds the most recently used decodes so scrolling back through the
//! queue doesn't touch disk again. Entries are grouped by [`Partition`]
//! (the visual context they were decoded for) and evicted LRU per
//! partition once the capacity is reached.
//!
//! The table is the one structure shared between the request path and the
//! background worker, so each access takes the mutex.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use image::RgbaImage;
use lru::LruCache;
use parking_lot::Mutex;

/// Decoded, display-ready art, shared cheaply between cache and surfaces.
pub type Art = Arc<RgbaImage>;

/// Rendering context an entry was decoded for (e.g. an overlay style).
///
/// Entries never migrate between partitions: the same album shown in two
/// contexts is cached twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Partition(pub u32);

/// Default number of entries retained per partition.
pub const DEFAULT_CAPACITY: usize = 50;

/// Per-partition LRU map from album digest to decoded art.
pub struct MemoryCache {
    capacity: NonZeroUsize,
    partitions: Mutex<HashMap<Partition, LruCache<String, Art>>>,
}

impl MemoryCache {
    /// Create a cache retaining up to `capacity` entries per partition.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: NonZeroUsize::new(capacity.max(1)).unwrap(),
            partitions: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a digest, marking it most recently used on a hit.
    pub fn get(&self, partition: Partition, digest: &str) -> Option<Art> {
        let mut partitions = self.partitions.lock();
        partitions.get_mut(&partition)?.get(digest).cloned()
    }

    /// Insert a decode, evicting the least recently used entry at capacity.
    ///
    /// A later decode of the same digest replaces the earlier entry.
    pub fn put(&self, partition: Partition, digest: &str, art: Art) {
        let mut partitions = self.partitions.lock();
        partitions
            .entry(partition)
            .or_insert_with(|| LruCache::new(self.capacity))
            .put(digest.to_string(), art);
    }

    /// Number of entries currently held for a partition.
    pub fn len(&self, partition: Partition) -> usize {
        let partitions = self.partitions.lock();
        partitions.get(&partition).map_or(0, |cache| cache.len())
    }

    pub fn is_empty(&self, partition: Partition) -> bool {
        self.len(partition) == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
