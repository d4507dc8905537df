//! Single-entry boundary cache.

use ordered_float::OrderedFloat;
use tracing::debug;

use super::build::Boundary;
use crate::model::Granularity;

/// What a cached boundary list was computed for.
///
/// `revision` stands for everything else the list depends on (tree and
/// filter state); owners bump it whenever either changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub level: Granularity,
    pub zoom: OrderedFloat<f64>,
    pub revision: u64,
}

impl CacheKey {
    pub fn new(level: Granularity, zoom: f64, revision: u64) -> Self {
        Self {
            level,
            zoom: OrderedFloat(zoom),
            revision,
        }
    }
}

#[derive(Debug, Clone, Default)]
enum CacheState {
    #[default]
    Stale,
    Valid {
        key: CacheKey,
        boundaries: Vec<Boundary>,
    },
}

/// Holds the boundary list of the most recent `(level, zoom, revision)`.
#[derive(Debug, Clone, Default)]
pub struct BoundaryCache {
    state: CacheState,
}

impl BoundaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.state, CacheState::Valid { .. })
    }

    /// Key of the cached list, if any.
    pub fn key(&self) -> Option<CacheKey> {
        match &self.state {
            CacheState::Valid { key, .. } => Some(*key),
            CacheState::Stale => None,
        }
    }

    /// The cached list, only if it was computed for `key`.
    pub fn get(&self, key: &CacheKey) -> Option<&[Boundary]> {
        match &self.state {
            CacheState::Valid {
                key: cached,
                boundaries,
            } if cached == key => Some(boundaries),
            _ => None,
        }
    }

    /// Returns the list for `key`, running `compute` on a miss.
    pub fn get_or_compute<F>(&mut self, key: CacheKey, compute: F) -> &[Boundary]
    where
        F: FnOnce() -> Vec<Boundary>,
    {
        let hit = matches!(&self.state, CacheState::Valid { key: cached, .. } if *cached == key);
        if hit {
            debug!(level = %key.level, zoom = key.zoom.0, "boundary cache hit");
        } else {
            self.state = CacheState::Stale;
            let boundaries = compute();
            debug!(
                level = %key.level,
                zoom = key.zoom.0,
                revision = key.revision,
                count = boundaries.len(),
                "boundaries recomputed"
            );
            self.state = CacheState::Valid { key, boundaries };
        }

        match &self.state {
            CacheState::Valid { boundaries, .. } => boundaries,
            CacheState::Stale => &[],
        }
    }

    /// Drops the cached list; the next lookup recomputes.
    pub fn invalidate(&mut self) {
        if self.is_valid() {
            debug!("boundary cache invalidated");
        }
        self.state = CacheState::Stale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary(text: &str) -> Boundary {
        Boundary {
            points: vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)],
            tooltip: String::new(),
            text: text.to_string(),
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }

    #[test]
    fn test_same_key_computes_once() {
        let mut cache = BoundaryCache::new();
        let key = CacheKey::new(Granularity::Words, 1.0, 0);
        let mut calls = 0;

        cache.get_or_compute(key, || {
            calls += 1;
            vec![boundary("a")]
        });
        let second = cache.get_or_compute(key, || {
            calls += 1;
            vec![boundary("b")]
        });

        assert_eq!(second[0].text, "a");
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_zoom_change_recomputes() {
        let mut cache = BoundaryCache::new();
        cache.get_or_compute(CacheKey::new(Granularity::Words, 1.0, 0), || vec![boundary("a")]);
        let out = cache.get_or_compute(CacheKey::new(Granularity::Words, 1.1, 0), || {
            vec![boundary("b")]
        });
        assert_eq!(out[0].text, "b");
        assert!(cache.get(&CacheKey::new(Granularity::Words, 1.0, 0)).is_none());
    }

    #[test]
    fn test_invalidate_forces_stale() {
        let mut cache = BoundaryCache::new();
        let key = CacheKey::new(Granularity::Blocks, 1.0, 3);
        cache.get_or_compute(key, Vec::new);
        assert!(cache.is_valid());

        cache.invalidate();
        assert!(!cache.is_valid());
        assert_eq!(cache.key(), None);
    }
}
