//! Cache line storage.
//!
//! The [`CacheStore`] owns the `sets × ways` line array (flattened, set-major) and
//! the logical clock that orders lines for replacement. The clock belongs to one
//! store, so two caches in a hierarchy never share recency ordering.

use tracing::trace;

use super::geometry::CacheGeometry;
use super::line::CacheLine;
use super::policies::ReplacementPolicy;
use crate::common::BusError;

/// A way chosen for eviction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Allocation {
    /// Way index within the set.
    pub way: usize,
    /// Snapshot of the line being replaced.
    pub victim: CacheLine,
    /// `victim.valid && victim.dirty`.
    pub needs_writeback: bool,
    /// Base address of the victim line (meaningful only when it is valid).
    pub writeback_addr: u64,
}

/// A valid, dirty line awaiting a clean or flush sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirtyLine {
    /// Set index.
    pub set: usize,
    /// Way index.
    pub way: usize,
    /// Reconstructed line base address.
    pub addr: u64,
    /// Line data to write back.
    pub data: u64,
}

/// Sets of ways plus a monotonic logical clock.
#[derive(Clone, Debug)]
pub struct CacheStore {
    geometry: CacheGeometry,
    lines: Vec<CacheLine>,
    clock: u64,
}

impl CacheStore {
    /// Creates a store with every line invalid, clean, and zero.
    pub fn new(geometry: CacheGeometry) -> Self {
        Self {
            lines: vec![CacheLine::default(); geometry.num_sets() * geometry.ways()],
            geometry,
            clock: 0,
        }
    }

    /// Returns the geometry the store was built with.
    pub const fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    /// Returns the current logical clock value.
    pub const fn clock(&self) -> u64 {
        self.clock
    }

    #[inline(always)]
    const fn index(&self, set: usize, way: usize) -> usize {
        set * self.geometry.ways() + way
    }

    /// Returns the ways of `set`.
    pub fn set(&self, set: usize) -> &[CacheLine] {
        let base = self.index(set, 0);
        &self.lines[base..base + self.geometry.ways()]
    }

    /// Returns the line at (`set`, `way`), or `None` when out of range.
    pub fn line(&self, set: usize, way: usize) -> Option<&CacheLine> {
        if set < self.geometry.num_sets() && way < self.geometry.ways() {
            self.lines.get(self.index(set, way))
        } else {
            None
        }
    }

    fn line_mut(&mut self, set: usize, way: usize) -> &mut CacheLine {
        let idx = self.index(set, way);
        &mut self.lines[idx]
    }

    /// Iterates every line as `(set, way, line)` in set-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &CacheLine)> + '_ {
        let ways = self.geometry.ways();
        self.lines
            .iter()
            .enumerate()
            .map(move |(idx, line)| (idx / ways, idx % ways, line))
    }

    /// Finds the way in `set` holding `tag`.
    ///
    /// Returns the first valid way whose tag matches. The controller keeps at
    /// most one such way per set.
    pub fn lookup(&self, set: usize, tag: u64) -> Option<usize> {
        self.set(set).iter().position(|line| line.matches(tag))
    }

    /// Asks `policy` for a victim way in `set`.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::VictimOutOfRange`] if the policy picks a way that
    /// does not exist.
    pub fn allocate(
        &self,
        set: usize,
        policy: &mut dyn ReplacementPolicy,
    ) -> Result<Allocation, BusError> {
        let ways = self.set(set);
        let way = policy.select_victim(ways);
        let victim = *ways.get(way).ok_or(BusError::VictimOutOfRange {
            way,
            ways: ways.len(),
        })?;
        Ok(Allocation {
            way,
            victim,
            needs_writeback: victim.needs_writeback(),
            writeback_addr: self.geometry.encode_base(victim.tag, set),
        })
    }

    /// Stamps the line with the next clock value (an install or a hit).
    pub fn touch(&mut self, set: usize, way: usize) {
        self.clock += 1;
        let stamp = self.clock;
        self.line_mut(set, way).replace_state = stamp;
        trace!(set, way, stamp, "touch");
    }

    /// Installs fetched data: valid, clean, touched.
    ///
    /// The caller has already written back the previous occupant if needed.
    pub fn install(&mut self, set: usize, way: usize, tag: u64, data: u64) {
        self.line_mut(set, way).install(tag, data);
        self.touch(set, way);
    }

    /// Allocates the line as zeroed and dirty, touched, without any fetch.
    pub fn zero(&mut self, set: usize, way: usize, tag: u64) {
        self.line_mut(set, way).zero(tag);
        self.touch(set, way);
    }

    /// Replaces the data of a resident line and marks it dirty.
    pub fn update(&mut self, set: usize, way: usize, data: u64) {
        let line = self.line_mut(set, way);
        line.data = data;
        line.dirty = true;
    }

    /// Clears the dirty bit after a writeback.
    pub fn mark_clean(&mut self, set: usize, way: usize) {
        self.line_mut(set, way).mark_clean();
    }

    /// Discards one line without writeback.
    pub fn invalidate(&mut self, set: usize, way: usize) {
        self.line_mut(set, way).invalidate();
    }

    /// Invalidates every line.
    ///
    /// # Returns
    ///
    /// The `(set, way)` coordinates of the lines that were valid before the sweep.
    pub fn invalidate_all(&mut self) -> Vec<(usize, usize)> {
        let ways = self.geometry.ways();
        let mut touched = Vec::new();
        for (idx, line) in self.lines.iter_mut().enumerate() {
            if line.valid {
                touched.push((idx / ways, idx % ways));
            }
            line.invalidate();
        }
        touched
    }

    /// Returns every valid, dirty line with its reconstructed base address.
    pub fn dirty_lines(&self) -> Vec<DirtyLine> {
        self.iter()
            .filter(|(_, _, line)| line.needs_writeback())
            .map(|(set, way, line)| DirtyLine {
                set,
                way,
                addr: self.geometry.encode_base(line.tag, set),
                data: line.data,
            })
            .collect()
    }
}
