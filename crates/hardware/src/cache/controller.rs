//! Set-associative cache controller.
//!
//! The [`CacheController`] owns one [`CacheStore`], one replacement policy, and the
//! downstream [`Bus`] it masters on misses. It implements every request kind as a
//! plain method; [`router`](super::router) maps packets onto these methods.
//!
//! Miss handling always follows the same order:
//! 1. **Allocate:** The policy picks a victim way in the target set.
//! 2. **Writeback:** A valid, dirty victim is written downstream and marked clean.
//! 3. **Fill:** The new line is fetched downstream and installed, or zeroed in place.
//!
//! All per-transaction context (address, victim, line) lives on the stack of the
//! call; the controller holds no "current transaction" state.

use tracing::{debug, trace};

use super::geometry::CacheGeometry;
use super::line::{CacheLine, apply_write_mask, check_line_size, read_bytes, write_bytes};
use super::observer::{LineEvent, LineEventKind, LineObserver};
use super::policies::{LruPolicy, MruPolicy, RandomPolicy, ReplacementPolicy};
use super::store::{CacheStore, DirtyLine};
use crate::common::constants::BYTE_BITS;
use crate::common::{AccessSize, BusError, ConfigError};
use crate::config::{CacheConfig, ReplacementPolicy as PolicyType};
use crate::protocol::{PacketKind, Payload, RequestPacket, ResponsePacket, Scope};
use crate::soc::interconnect::Bus;
use crate::stats::CacheStats;

/// How a missing line is brought in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Fill {
    /// Read the line from the downstream bus.
    Fetch,
    /// Allocate it as zeroed and dirty without any downstream read.
    Zero,
}

/// A line made resident for one access.
#[derive(Clone, Copy, Debug)]
struct Resident {
    set: usize,
    way: usize,
    offset: usize,
}

/// One level of a cache hierarchy.
pub struct CacheController {
    name: String,
    store: CacheStore,
    policy: Box<dyn ReplacementPolicy + Send + Sync>,
    downstream: Bus,
    stats: CacheStats,
    /// Optional line mutation observer (boxed for dynamic dispatch).
    observer: Option<Box<dyn LineObserver + Send + Sync>>,
    next_txn: u64,
}

impl CacheController {
    /// Creates a controller with every line invalid.
    ///
    /// # Arguments
    ///
    /// * `name` - Label used in logs, response labels, and errors (e.g. `"L1"`).
    /// * `geometry` - Validated cache shape.
    /// * `policy` - Victim selection strategy.
    /// * `downstream` - Bus used for fetches and writebacks.
    pub fn new(
        name: impl Into<String>,
        geometry: CacheGeometry,
        policy: Box<dyn ReplacementPolicy + Send + Sync>,
        downstream: Bus,
    ) -> Self {
        Self {
            name: name.into(),
            store: CacheStore::new(geometry),
            policy,
            downstream,
            stats: CacheStats::default(),
            observer: None,
            next_txn: 0,
        }
    }

    /// Builds a controller from its configuration entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the geometry is illegal for `address_width`.
    pub fn from_config(
        config: &CacheConfig,
        address_width: u32,
        downstream: Bus,
    ) -> Result<Self, ConfigError> {
        let geometry = config.geometry(address_width)?;
        let policy: Box<dyn ReplacementPolicy + Send + Sync> = match config.policy {
            PolicyType::Lru => Box::new(LruPolicy::new()),
            PolicyType::Random => Box::new(RandomPolicy::new(config.seed)),
            PolicyType::Mru => Box::new(MruPolicy::new()),
        };
        Ok(Self::new(config.name.clone(), geometry, policy, downstream))
    }

    /// Returns the controller's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the cache geometry.
    pub const fn geometry(&self) -> &CacheGeometry {
        self.store.geometry()
    }

    /// Returns the line storage for inspection.
    pub const fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Returns the name of the active replacement policy.
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Returns the hit/miss counters.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Returns the downstream bus.
    pub const fn downstream(&self) -> &Bus {
        &self.downstream
    }

    /// Returns the downstream bus mutably (e.g. to register a slave).
    pub const fn downstream_mut(&mut self) -> &mut Bus {
        &mut self.downstream
    }

    /// Installs an observer that receives every completed line mutation.
    pub fn set_observer(&mut self, observer: Box<dyn LineObserver + Send + Sync>) {
        self.observer = Some(observer);
    }

    /// Removes the observer, if any.
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Returns the `(set, way)` holding `addr`, without touching it.
    pub fn lookup(&self, addr: u64) -> Option<(usize, usize)> {
        let parts = self.geometry().decode(addr);
        self.store
            .lookup(parts.set, parts.tag)
            .map(|way| (parts.set, way))
    }

    /// Returns a snapshot of the line holding `addr`, if resident.
    pub fn resident_line(&self, addr: u64) -> Option<CacheLine> {
        self.lookup(addr)
            .and_then(|(set, way)| self.store.line(set, way).copied())
    }

    fn line_data(&self, set: usize, way: usize) -> u64 {
        self.store.set(set)[way].data
    }

    fn notify(&mut self, set: usize, way: usize, kind: LineEventKind) {
        if let Some(observer) = self.observer.as_mut() {
            let event = LineEvent {
                cache: self.name.clone(),
                set,
                way,
                kind,
                line: self.store.set(set)[way],
            };
            observer.on_line_event(&event);
        }
    }

    /// Sends one request downstream and returns the bare response packet.
    fn issue(
        &mut self,
        what: &str,
        packet: RequestPacket,
    ) -> Result<ResponsePacket, BusError> {
        let id = self.next_txn;
        self.next_txn += 1;
        let label = format!("{}: {what} {packet}", self.name);
        self.downstream
            .perform_transaction(Payload::new(id, label, packet))
            .map(Payload::into_packet)
    }

    fn fetch(&mut self, base: u64) -> Result<u64, BusError> {
        let size = self.geometry().line_size();
        match self.issue("fetch", RequestPacket::Read { addr: base, size })? {
            ResponsePacket::Read { value } => {
                self.stats.fetches += 1;
                Ok(value & size.value_mask())
            }
            other => Err(BusError::ProtocolMismatch {
                expected: PacketKind::Read,
                got: other.kind(),
            }),
        }
    }

    fn writeback(&mut self, addr: u64, data: u64) -> Result<(), BusError> {
        let size = self.geometry().line_size();
        debug!(cache = %self.name, addr = format_args!("{addr:#x}"), data, "writeback");
        let request = RequestPacket::Write {
            addr,
            size,
            value: data,
        };
        match self.issue("writeback", request)? {
            ResponsePacket::Write { success: true } => {
                self.stats.writebacks += 1;
                Ok(())
            }
            ResponsePacket::Write { success: false } => Err(BusError::WritebackRejected { addr }),
            other => Err(BusError::ProtocolMismatch {
                expected: PacketKind::Write,
                got: other.kind(),
            }),
        }
    }

    /// Writes a dirty line back and marks it clean.
    fn commit(&mut self, line: DirtyLine) -> Result<(), BusError> {
        self.writeback(line.addr, line.data)?;
        self.store.mark_clean(line.set, line.way);
        self.notify(line.set, line.way, LineEventKind::Clean);
        Ok(())
    }

    /// Brings the line for (`set`, `tag`) into the cache after a miss.
    ///
    /// # Returns
    ///
    /// The way the line now occupies.
    fn fill(&mut self, set: usize, tag: u64, fill: Fill) -> Result<usize, BusError> {
        self.stats.misses += 1;
        let alloc = self.store.allocate(set, &mut *self.policy)?;
        let way = alloc.way;
        let base = self.geometry().encode_base(tag, set);
        debug!(
            cache = %self.name,
            set,
            way,
            base = format_args!("{base:#x}"),
            victim_valid = alloc.victim.valid,
            victim_dirty = alloc.victim.dirty,
            "miss"
        );

        if alloc.victim.valid {
            self.stats.evictions += 1;
        }
        if alloc.needs_writeback {
            self.commit(DirtyLine {
                set,
                way,
                addr: alloc.writeback_addr,
                data: alloc.victim.data,
            })?;
        }

        match fill {
            Fill::Fetch => {
                let data = self.fetch(base)?;
                self.store.install(set, way, tag, data);
                self.notify(set, way, LineEventKind::Install);
            }
            Fill::Zero => {
                self.store.zero(set, way, tag);
                self.notify(set, way, LineEventKind::Zero);
            }
        }
        Ok(way)
    }

    /// Makes the line holding `addr` resident, touching it on a hit.
    fn ensure_resident(&mut self, addr: u64) -> Result<Resident, BusError> {
        let parts = self.geometry().decode(addr);
        let way = if let Some(way) = self.store.lookup(parts.set, parts.tag) {
            self.stats.hits += 1;
            self.store.touch(parts.set, way);
            trace!(cache = %self.name, set = parts.set, way, "hit");
            self.notify(parts.set, way, LineEventKind::Touch);
            way
        } else {
            self.fill(parts.set, parts.tag, Fill::Fetch)?
        };
        Ok(Resident {
            set: parts.set,
            way,
            offset: parts.offset,
        })
    }

    fn check_line_request(&self, line_size: usize) -> Result<(), BusError> {
        check_line_size(line_size)?;
        let expected = self.geometry().line_bytes();
        if line_size == expected {
            Ok(())
        } else {
            Err(BusError::LineSizeMismatch {
                slave: self.name.clone(),
                expected,
                requested: line_size,
            })
        }
    }

    /// Reads `size` bytes at `addr`, little-endian.
    ///
    /// An access that crosses a line boundary is served line by line; each line
    /// segment is a separate hit or miss.
    ///
    /// # Errors
    ///
    /// Propagates any downstream failure raised while handling a miss.
    pub fn read(&mut self, addr: u64, size: AccessSize) -> Result<u64, BusError> {
        let mut value = 0;
        for seg in self.geometry().segments(addr, size.bytes()) {
            let slot = self.ensure_resident(seg.addr)?;
            let bytes = read_bytes(self.line_data(slot.set, slot.way), slot.offset, seg.count);
            value |= bytes << (seg.shift as u32 * BYTE_BITS);
        }
        Ok(value)
    }

    /// Writes the low `size` bytes of `value` at `addr`, little-endian.
    ///
    /// Every line touched by the write becomes dirty.
    ///
    /// # Errors
    ///
    /// Propagates any downstream failure raised while handling a miss.
    pub fn write(&mut self, addr: u64, size: AccessSize, value: u64) -> Result<(), BusError> {
        let value = value & size.value_mask();
        for seg in self.geometry().segments(addr, size.bytes()) {
            let slot = self.ensure_resident(seg.addr)?;
            let old = self.line_data(slot.set, slot.way);
            let data = write_bytes(
                old,
                slot.offset,
                value >> (seg.shift as u32 * BYTE_BITS),
                seg.count,
            );
            self.store.update(slot.set, slot.way, data);
            self.notify(slot.set, slot.way, LineEventKind::Update);
        }
        Ok(())
    }

    /// Discards the line holding `addr`, or every line, without writeback.
    ///
    /// # Returns
    ///
    /// `false` when an addressed line was not resident; always `true` for
    /// [`Scope::Global`].
    pub fn invalidate(&mut self, scope: Scope) -> bool {
        match scope {
            Scope::Global => {
                let _ = self.invalidate_all();
                true
            }
            Scope::Address(addr) => match self.lookup(addr) {
                Some((set, way)) => {
                    self.store.invalidate(set, way);
                    self.stats.invalidations += 1;
                    self.notify(set, way, LineEventKind::Invalidate);
                    true
                }
                None => false,
            },
        }
    }

    /// Writes back dirty data for the line holding `addr`, or every line.
    ///
    /// Lines stay valid. A clean line produces no downstream traffic.
    ///
    /// # Returns
    ///
    /// `false` when an addressed line was not resident; always `true` for
    /// [`Scope::Global`].
    ///
    /// # Errors
    ///
    /// Propagates a failed or rejected writeback.
    pub fn clean(&mut self, scope: Scope) -> Result<bool, BusError> {
        match scope {
            Scope::Global => {
                let dirty = self.dirty_lines();
                debug!(cache = %self.name, lines = dirty.len(), "clean all");
                for line in dirty {
                    self.commit(line)?;
                }
                Ok(true)
            }
            Scope::Address(addr) => {
                let Some((set, way)) = self.lookup(addr) else {
                    return Ok(false);
                };
                let line = self.store.set(set)[way];
                if line.needs_writeback() {
                    self.commit(DirtyLine {
                        set,
                        way,
                        addr: self.geometry().encode_base(line.tag, set),
                        data: line.data,
                    })?;
                }
                Ok(true)
            }
        }
    }

    /// Writes back dirty data, then invalidates the line holding `addr`, or every line.
    ///
    /// # Returns
    ///
    /// `false` when an addressed line was not resident; always `true` for
    /// [`Scope::Global`].
    ///
    /// # Errors
    ///
    /// Propagates a failed or rejected writeback. Lines already written back stay
    /// valid and clean; nothing is invalidated.
    pub fn flush(&mut self, scope: Scope) -> Result<bool, BusError> {
        if !self.clean(scope)? {
            return Ok(false);
        }
        Ok(self.invalidate(scope))
    }

    /// Makes the line holding `addr` zeroed, dirty, and resident without fetching.
    ///
    /// # Errors
    ///
    /// Propagates a failed victim writeback.
    pub fn zero(&mut self, addr: u64) -> Result<(), BusError> {
        let parts = self.geometry().decode(addr);
        if let Some(way) = self.store.lookup(parts.set, parts.tag) {
            self.stats.hits += 1;
            self.store.zero(parts.set, way, parts.tag);
            self.notify(parts.set, way, LineEventKind::Zero);
        } else {
            let _ = self.fill(parts.set, parts.tag, Fill::Zero)?;
        }
        Ok(())
    }

    /// Makes the line holding `addr` resident; a hit only refreshes recency.
    ///
    /// # Returns
    ///
    /// `true` once the line is resident.
    ///
    /// # Errors
    ///
    /// Propagates any downstream failure raised while handling a miss.
    pub fn prefetch(&mut self, addr: u64) -> Result<bool, BusError> {
        let _ = self.ensure_resident(addr)?;
        Ok(true)
    }

    /// Returns the whole line holding `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::InvalidLineSize`] or [`BusError::LineSizeMismatch`] when
    /// `line_size` is not this cache's line size, and propagates miss failures.
    pub fn line_read(&mut self, addr: u64, line_size: usize) -> Result<u64, BusError> {
        self.check_line_request(line_size)?;
        let slot = self.ensure_resident(addr)?;
        Ok(self.line_data(slot.set, slot.way))
    }

    /// Merges `data` into the line holding `addr`, one byte per set bit of `write_mask`.
    ///
    /// The line becomes dirty only if at least one of its bytes is selected.
    ///
    /// # Errors
    ///
    /// Same as [`line_read`](Self::line_read).
    pub fn line_write(
        &mut self,
        addr: u64,
        line_size: usize,
        data: u64,
        write_mask: u64,
    ) -> Result<(), BusError> {
        self.check_line_request(line_size)?;
        let slot = self.ensure_resident(addr)?;
        let lanes = write_mask & ((1u64 << line_size) - 1);
        if lanes != 0 {
            let old = self.line_data(slot.set, slot.way);
            let merged = apply_write_mask(old, data, lanes, line_size);
            self.store.update(slot.set, slot.way, merged);
            self.notify(slot.set, slot.way, LineEventKind::Update);
        }
        Ok(())
    }

    /// Invalidates every line without writeback.
    ///
    /// # Returns
    ///
    /// The `(set, way)` coordinates of the lines that were valid.
    pub fn invalidate_all(&mut self) -> Vec<(usize, usize)> {
        let touched = self.store.invalidate_all();
        debug!(cache = %self.name, lines = touched.len(), "invalidate all");
        self.stats.invalidations += touched.len() as u64;
        for &(set, way) in &touched {
            self.notify(set, way, LineEventKind::Invalidate);
        }
        touched
    }

    /// Returns every valid, dirty line with its base address.
    pub fn dirty_lines(&self) -> Vec<DirtyLine> {
        self.store.dirty_lines()
    }
}

impl std::fmt::Debug for CacheController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheController")
            .field("name", &self.name)
            .field("geometry", self.store.geometry())
            .field("policy", &self.policy.name())
            .field("downstream", &self.downstream)
            .field("stats", &self.stats)
            .field("observed", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}
