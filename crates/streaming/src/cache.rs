use std::collections::BTreeMap;

use scene::{ContourKey, LocalizationContour};
use tracing::debug;

use crate::request::Request;
use crate::residency::{Residency, ResidencyState};

/// Outcome of delivering a fetched contour to the cache.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Latest request for the current key; now drawn.
    Activated,
    /// Latest request for a key that is no longer current; kept for later but not drawn.
    Retained,
    /// Superseded by a later request for the same key, dropped as abandoned, or never issued.
    Stale,
    /// The contour's own key does not match the key it was requested under.
    Rejected,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    residency: Residency,
    contour: Option<LocalizationContour>,
    last_used_tick: u64,
}

/// Localization contours keyed by `(dateobs, localization_name)`.
///
/// The contour drawn is the resident contour of the current key. While the
/// current key is still pending, the last contour that was drawn stays up, so
/// a slow fetch never blanks the map and never replaces the contour the user
/// asked for last.
///
/// Notes on determinism:
/// - Entries are keyed in a `BTreeMap` for stable traversal order.
/// - Eviction is LRU by `last_used_tick`, with a tie-break by key ordering,
///   and never touches the current or the shown key.
/// - At most `capacity` abandoned (pending, not current) keys keep their
///   request handles; older ones are forgotten.
#[derive(Debug)]
pub struct ContourCache {
    capacity: usize,
    tick: u64,
    next_request: u64,
    current: Option<ContourKey>,
    /// Key of the contour last drawn; survives until the current key resolves.
    shown: Option<ContourKey>,
    entries: BTreeMap<ContourKey, CacheEntry>,
    latest: BTreeMap<ContourKey, Request>,
    requests: BTreeMap<Request, ContourKey>,
}

impl ContourCache {
    /// Retains at most `capacity` resolved contours (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            tick: 0,
            next_request: 1,
            current: None,
            shown: None,
            entries: BTreeMap::new(),
            latest: BTreeMap::new(),
            requests: BTreeMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn current_key(&self) -> Option<&ContourKey> {
        self.current.as_ref()
    }

    /// `None` for keys never requested, evicted, or forgotten.
    pub fn state(&self, key: &ContourKey) -> Option<ResidencyState> {
        self.entries.get(key).map(|e| e.residency.state)
    }

    /// Number of contours currently held in memory.
    pub fn resident_len(&self) -> usize {
        self.entries.values().filter(|e| e.residency.is_resident()).count()
    }

    /// Outstanding request handles.
    pub fn pending_len(&self) -> usize {
        self.requests.len()
    }

    /// Makes `key` current and issues a new request handle for it.
    ///
    /// A contour already resident for `key` is drawn at once and stays until
    /// the new request resolves; otherwise the previously drawn contour stays.
    pub fn request(&mut self, key: ContourKey) -> Request {
        self.tick += 1;
        let tick = self.tick;
        let entry = self.entries.entry(key.clone()).or_insert_with(|| CacheEntry {
            residency: Residency::new(),
            contour: None,
            last_used_tick: tick,
        });
        entry.last_used_tick = tick;
        if entry.residency.is_resident() {
            self.shown = Some(key.clone());
        }

        let req = Request(self.next_request);
        self.next_request += 1;
        if let Some(previous) = self.latest.insert(key.clone(), req) {
            self.requests.remove(&previous);
        }
        self.requests.insert(req, key.clone());
        self.current = Some(key);
        self.forget_abandoned();
        req
    }

    /// Stops drawing any localization. Cached contours are kept.
    pub fn clear_current(&mut self) {
        self.current = None;
        self.shown = None;
    }

    /// Delivers the contour fetched for `req`.
    pub fn resolve(&mut self, req: Request, contour: LocalizationContour) -> Resolution {
        let Some(key) = self.requests.get(&req).cloned() else {
            debug!(request = req.0, contour_id = contour.id, "discarding stale contour");
            return Resolution::Stale;
        };
        if contour.key != key {
            debug!(request = req.0, requested = %key, got = %contour.key, "discarding contour for another key");
            return Resolution::Rejected;
        }

        self.requests.remove(&req);
        self.latest.remove(&key);
        self.tick += 1;
        let tick = self.tick;
        let entry = self.entries.entry(key.clone()).or_insert_with(|| CacheEntry {
            residency: Residency::new(),
            contour: None,
            last_used_tick: tick,
        });
        entry.residency.state = ResidencyState::Resident;
        entry.contour = Some(contour);
        entry.last_used_tick = tick;

        let resolution = if self.current.as_ref() == Some(&key) {
            self.shown = Some(key);
            Resolution::Activated
        } else {
            Resolution::Retained
        };
        self.evict_as_needed();
        resolution
    }

    /// Contour to draw: the resident contour of the current key, else the
    /// contour shown before the current request was issued.
    pub fn active(&self) -> Option<&LocalizationContour> {
        let current = self.current.as_ref()?;
        self.resident(current)
            .or_else(|| self.shown.as_ref().and_then(|k| self.resident(k)))
    }

    pub fn active_id(&self) -> Option<u64> {
        self.active().map(|c| c.id)
    }

    fn resident(&self, key: &ContourKey) -> Option<&LocalizationContour> {
        self.entries
            .get(key)
            .filter(|e| e.residency.is_resident())
            .and_then(|e| e.contour.as_ref())
    }

    fn is_pinned(&self, key: &ContourKey) -> bool {
        self.current.as_ref() == Some(key) || self.shown.as_ref() == Some(key)
    }

    fn evict_as_needed(&mut self) {
        while self.resident_len() > self.capacity {
            let candidate = self
                .entries
                .iter()
                .filter(|(k, e)| e.residency.is_resident() && !self.is_pinned(k))
                .min_by(|(ka, ea), (kb, eb)| {
                    ea.last_used_tick
                        .cmp(&eb.last_used_tick)
                        .then_with(|| ka.cmp(kb))
                })
                .map(|(k, _)| k.clone());
            let Some(key) = candidate else {
                return;
            };
            self.forget(&key);
            debug!(key = %key, "evicted cached contour");
        }
    }

    /// Drops the oldest keys that are still pending but no longer current,
    /// keeping at most `capacity` of them.
    fn forget_abandoned(&mut self) {
        let mut abandoned: Vec<(u64, ContourKey)> = self
            .entries
            .iter()
            .filter(|(k, e)| !e.residency.is_resident() && !self.is_pinned(k))
            .map(|(k, e)| (e.last_used_tick, k.clone()))
            .collect();
        if abandoned.len() <= self.capacity {
            return;
        }
        abandoned.sort();
        let excess = abandoned.len() - self.capacity;
        for (_, key) in abandoned.into_iter().take(excess) {
            self.forget(&key);
            debug!(key = %key, "forgot abandoned contour request");
        }
    }

    fn forget(&mut self, key: &ContourKey) {
        self.entries.remove(key);
        if let Some(req) = self.latest.remove(key) {
            self.requests.remove(&req);
        }
    }
}

impl Default for ContourCache {
    fn default() -> Self {
        Self::with_capacity(4)
    }
}
