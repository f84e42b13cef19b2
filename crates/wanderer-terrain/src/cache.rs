//! Bounded FIFO cache of rendered chunks.
//!
//! Keys live in a ring buffer in insertion order next to a hash map of
//! key to buffer. When full, the oldest-inserted key is evicted before a new
//! one is added. Reads never reorder entries, so a chunk that is viewed every
//! frame ages out exactly like one that was viewed once.

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::Arc;

use hashbrown::HashMap;
use tracing::{debug, warn};

use crate::SamplerConfigError;
use crate::chunk::{ChunkCoord, ChunkImage};

pub struct ChunkCache {
    capacity: usize,
    order: VecDeque<ChunkCoord>,
    entries: HashMap<ChunkCoord, Arc<ChunkImage>>,
}

impl ChunkCache {
    /// Create an empty cache holding at most `capacity` chunks.
    ///
    /// # Errors
    ///
    /// Returns [`SamplerConfigError::ZeroCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, SamplerConfigError> {
        NonZeroUsize::new(capacity)
            .map(Self::with_capacity)
            .ok_or(SamplerConfigError::ZeroCapacity)
    }

    /// Create an empty cache from an already validated capacity.
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        let capacity = capacity.get();
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// The cached chunk for `coord`, rendering it with `render` on a miss.
    ///
    /// A hit returns the same shared buffer every time. A rendered image
    /// whose own coordinate is not `coord` is returned but not cached.
    pub fn get_or_insert_with(
        &mut self,
        coord: ChunkCoord,
        render: impl FnOnce() -> ChunkImage,
    ) -> Arc<ChunkImage> {
        if let Some(hit) = self.entries.get(&coord) {
            return Arc::clone(hit);
        }
        let image = Arc::new(render());
        if image.coord() != coord {
            warn!(
                requested = %coord,
                rendered = %image.coord(),
                "chunk rendered under another key; not cached"
            );
            return image;
        }
        self.push_new(coord, Arc::clone(&image));
        image
    }

    /// Insert a chunk rendered elsewhere, keyed by its own coordinate.
    ///
    /// A chunk that is already cached keeps its buffer and its age; the
    /// incoming copy is dropped. Returns the coordinate evicted to make
    /// room, if any.
    pub fn insert(&mut self, image: Arc<ChunkImage>) -> Option<ChunkCoord> {
        let coord = image.coord();
        if self.entries.contains_key(&coord) {
            return None;
        }
        self.push_new(coord, image)
    }

    fn push_new(&mut self, coord: ChunkCoord, image: Arc<ChunkImage>) -> Option<ChunkCoord> {
        let evicted = if self.entries.len() >= self.capacity {
            self.evict_oldest()
        } else {
            None
        };
        self.order.push_back(coord);
        self.entries.insert(coord, image);
        evicted
    }

    fn evict_oldest(&mut self) -> Option<ChunkCoord> {
        let oldest = self.order.pop_front()?;
        self.entries.remove(&oldest);
        debug!(chunk = %oldest, "evicted chunk");
        Some(oldest)
    }

    /// The cached chunk for `coord`, if present.
    pub fn get(&self, coord: ChunkCoord) -> Option<Arc<ChunkImage>> {
        self.entries.get(&coord).cloned()
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.entries.contains_key(&coord)
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

    /// Drop every cached chunk.
    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }

    /// Cached coordinates, next-to-be-evicted first.
    pub fn keys_oldest_first(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.order.iter().copied()
    }
}

impl std::fmt::Debug for ChunkCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkCache")
            .field("capacity", &self.capacity)
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(x: i32, y: i32) -> ChunkImage {
        ChunkImage::blank(ChunkCoord::new(x, y), 2)
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(ChunkCache::new(0).unwrap_err(), SamplerConfigError::ZeroCapacity);
    }

    #[test]
    fn test_fifo_eviction_order() {
        let mut cache = ChunkCache::new(3).unwrap();
        for (x, y) in [(0, 0), (1, 0), (2, 0), (3, 0)] {
            cache.get_or_insert_with(ChunkCoord::new(x, y), || blank(x, y));
        }
        assert!(!cache.contains(ChunkCoord::new(0, 0)));
        assert!(cache.contains(ChunkCoord::new(1, 0)));
        assert!(cache.contains(ChunkCoord::new(2, 0)));
        assert!(cache.contains(ChunkCoord::new(3, 0)));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_reads_do_not_refresh_age() {
        let mut cache = ChunkCache::new(2).unwrap();
        let a = ChunkCoord::new(0, 0);
        cache.get_or_insert_with(a, || blank(0, 0));
        cache.get_or_insert_with(ChunkCoord::new(1, 1), || blank(1, 1));
        // Touch A again; FIFO ignores it.
        cache.get_or_insert_with(a, || blank(0, 0));
        assert!(cache.get(a).is_some());
        cache.get_or_insert_with(ChunkCoord::new(2, 2), || blank(2, 2));
        assert!(!cache.contains(a));
    }

    #[test]
    fn test_hit_returns_same_buffer_without_rendering() {
        let mut cache = ChunkCache::new(4).unwrap();
        let coord = ChunkCoord::new(5, -5);
        let first = cache.get_or_insert_with(coord, || blank(5, -5));
        let second = cache.get_or_insert_with(coord, || panic!("cache hit must not re-render"));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_insert_keeps_cached_buffer_and_age() {
        let mut cache = ChunkCache::new(2).unwrap();
        let first = Arc::new(blank(0, 0));
        assert_eq!(cache.insert(Arc::clone(&first)), None);
        assert_eq!(cache.insert(Arc::new(blank(1, 0))), None);
        assert_eq!(cache.insert(Arc::new(blank(0, 0))), None);
        assert!(Arc::ptr_eq(&cache.get(ChunkCoord::new(0, 0)).unwrap(), &first));
        let order: Vec<_> = cache.keys_oldest_first().collect();
        assert_eq!(order, vec![ChunkCoord::new(0, 0), ChunkCoord::new(1, 0)]);
        assert_eq!(cache.insert(Arc::new(blank(2, 0))), Some(ChunkCoord::new(0, 0)));
    }

    #[test]
    fn test_mismatched_render_is_not_cached() {
        let mut cache = ChunkCache::new(3).unwrap();
        cache.get_or_insert_with(ChunkCoord::new(1, 1), || blank(1, 1));
        let stray = cache.get_or_insert_with(ChunkCoord::new(0, 0), || blank(1, 1));
        assert_eq!(stray.coord(), ChunkCoord::new(1, 1));
        assert!(!cache.contains(ChunkCoord::new(0, 0)));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.keys_oldest_first().count(), 1);
    }

    #[test]
    fn test_keys_match_stored_chunks() {
        let mut cache = ChunkCache::new(5).unwrap();
        for i in 0..12 {
            cache.get_or_insert_with(ChunkCoord::new(i, -i), || blank(i, -i));
        }
        for key in cache.keys_oldest_first() {
            assert_eq!(cache.get(key).unwrap().coord(), key);
        }
    }

    #[test]
    fn test_clear() {
        let mut cache = ChunkCache::new(2).unwrap();
        cache.get_or_insert_with(ChunkCoord::new(0, 0), || blank(0, 0));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.keys_oldest_first().count(), 0);
    }
}
