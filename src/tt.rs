//! Transposition table for caching search results.
//!
//! Uses Zobrist hashes to store and retrieve scores, bounds and best moves of
//! already searched positions.
//!
//! The table is lockless so every Lazy SMP worker can share it. Each slot is
//! a pair of atomic u64s, the key stored XOR-ed with the data, so a torn read
//! fails verification and is treated as a miss instead of returning a mixed
//! entry.

use std::mem;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

use crate::board::MoveKey;

/// Default table size in megabytes.
pub const DEFAULT_TT_MB: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundType {
    Exact,      // Score is the exact value
    LowerBound, // Score is at least this value (failed high - score >= beta)
    UpperBound, // Score is at most this value (failed low - score <= alpha)
}

impl BoundType {
    fn to_u8(self) -> u8 {
        match self {
            BoundType::Exact => 0,
            BoundType::LowerBound => 1,
            BoundType::UpperBound => 2,
        }
    }

    fn from_u8(v: u8) -> Self {
        match v & 0x3 {
            0 => BoundType::Exact,
            1 => BoundType::LowerBound,
            _ => BoundType::UpperBound,
        }
    }
}

/// Unpacked TT entry for reading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtEntry {
    pub depth: u8,
    pub score: i16,
    pub bound_type: BoundType,
    pub best_move: Option<MoveKey>,
    pub generation: u8,
}

impl TtEntry {
    #[must_use]
    pub fn depth(&self) -> u32 {
        u32::from(self.depth)
    }

    #[must_use]
    pub fn score(&self) -> i32 {
        i32::from(self.score)
    }
}

/// Packed entry format (fits in 64 bits):
/// - bits 0-15:  move key (u16, 0 = no move)
/// - bits 16-31: score (i16 as u16)
/// - bits 32-39: depth (u8)
/// - bits 40-47: bound (2 bits) + generation (6 bits)
/// - bit 48:     occupied marker, so an all-zero entry is never valid
const OCCUPIED: u64 = 1 << 48;

fn pack_entry(
    depth: u8,
    score: i16,
    bound_type: BoundType,
    best_move: Option<MoveKey>,
    generation: u8,
) -> u64 {
    let mv: u16 = best_move.map_or(0, MoveKey::as_u16);
    let sc: u16 = score as u16;
    let bound_gen: u8 = (bound_type.to_u8() & 0x3) | ((generation & 0x3F) << 2);

    u64::from(mv)
        | (u64::from(sc) << 16)
        | (u64::from(depth) << 32)
        | (u64::from(bound_gen) << 40)
        | OCCUPIED
}

fn unpack_entry(data: u64) -> TtEntry {
    let mv_bits = (data & 0xFFFF) as u16;
    let score = ((data >> 16) & 0xFFFF) as i16;
    let depth = ((data >> 32) & 0xFF) as u8;
    let bound_gen = ((data >> 40) & 0xFF) as u8;

    TtEntry {
        depth,
        score,
        bound_type: BoundType::from_u8(bound_gen & 0x3),
        best_move: MoveKey::from_u16(mv_bits),
        generation: (bound_gen >> 2) & 0x3F,
    }
}

/// A single TT slot using lockless hashing.
#[repr(C)]
struct TtSlot {
    /// hash ^ packed data
    key_xor: AtomicU64,
    data: AtomicU64,
}

impl TtSlot {
    fn new() -> Self {
        TtSlot {
            key_xor: AtomicU64::new(0),
            data: AtomicU64::new(0),
        }
    }

    fn write(&self, hash: u64, packed: u64) {
        self.data.store(packed, Ordering::Relaxed);
        self.key_xor.store(hash ^ packed, Ordering::Relaxed);
    }

    /// Read the slot; `None` when empty, torn, or holding another position.
    fn read(&self, hash: u64) -> Option<TtEntry> {
        let key_xor = self.key_xor.load(Ordering::Relaxed);
        let data = self.data.load(Ordering::Relaxed);
        if data & OCCUPIED != 0 && key_xor ^ data == hash {
            Some(unpack_entry(data))
        } else {
            None
        }
    }

    /// Raw entry regardless of owner; used only to pick a victim.
    fn peek(&self) -> Option<TtEntry> {
        let data = self.data.load(Ordering::Relaxed);
        (data & OCCUPIED != 0).then(|| unpack_entry(data))
    }

    fn reset(&self) {
        self.key_xor.store(0, Ordering::Relaxed);
        self.data.store(0, Ordering::Relaxed);
    }
}

/// Number of slots per bucket for collision resolution
const BUCKET_SIZE: usize = 4;

#[repr(C)]
struct TtBucket {
    slots: [TtSlot; BUCKET_SIZE],
}

impl TtBucket {
    fn new() -> Self {
        TtBucket {
            slots: [TtSlot::new(), TtSlot::new(), TtSlot::new(), TtSlot::new()],
        }
    }
}

/// Thread-safe transposition table with depth-preferred replacement.
///
/// A store never overwrites an entry of the current search generation that
/// was searched deeper than the incoming one. Entries left over from earlier
/// searches are always replaceable, so the table does not fill up with stale
/// deep results over a game.
pub struct TranspositionTable {
    buckets: Vec<TtBucket>,
    mask: usize,
    generation: AtomicU8,
}

impl TranspositionTable {
    /// Create a new transposition table with the given size in megabytes.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let bucket_size = mem::size_of::<TtBucket>();
        let wanted = size_mb.saturating_mul(1024 * 1024) / bucket_size;

        // Largest power of two that fits the budget
        let num_buckets = if wanted < 1024 {
            1024
        } else if wanted.is_power_of_two() {
            wanted
        } else {
            wanted.next_power_of_two() / 2
        };

        let mut buckets = Vec::with_capacity(num_buckets);
        buckets.resize_with(num_buckets, TtBucket::new);

        TranspositionTable {
            buckets,
            mask: num_buckets - 1,
            generation: AtomicU8::new(0),
        }
    }

    fn bucket(&self, hash: u64) -> &TtBucket {
        &self.buckets[(hash as usize) & self.mask]
    }

    /// Number of entry slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len() * BUCKET_SIZE
    }

    /// Start a new search generation.
    pub fn new_search(&self) {
        let next = self.generation.load(Ordering::Relaxed).wrapping_add(1) & 0x3F;
        self.generation.store(next, Ordering::Relaxed);
    }

    #[must_use]
    pub fn generation(&self) -> u8 {
        self.generation.load(Ordering::Relaxed)
    }

    /// Probe the table for an entry matching the given hash.
    #[must_use]
    pub fn probe(&self, hash: u64) -> Option<TtEntry> {
        self.bucket(hash).slots.iter().find_map(|slot| slot.read(hash))
    }

    /// Store an entry in the table.
    ///
    /// Slot choice, in order: the slot already holding this position, an
    /// empty slot, then the slot with the lowest priority (stale generation
    /// first, then shallowest depth). The chosen slot is only overwritten
    /// when its current entry is stale or no deeper than `depth`.
    pub fn store(
        &self,
        hash: u64,
        depth: u32,
        score: i32,
        bound_type: BoundType,
        best_move: Option<MoveKey>,
    ) {
        let depth_u8 = depth.min(255) as u8;
        let score_i16 = score.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
        let generation = self.generation();
        let bucket = self.bucket(hash);

        let (slot, existing) = match bucket
            .slots
            .iter()
            .find_map(|slot| slot.read(hash).map(|entry| (slot, Some(entry))))
        {
            Some(found) => found,
            None => Self::victim(bucket, generation),
        };

        if let Some(old) = existing {
            if old.generation == generation && old.depth > depth_u8 {
                return;
            }
        }

        // Keep the old best move when a shallower re-search found none.
        let best_move = best_move.or_else(|| {
            slot.read(hash).and_then(|old| old.best_move)
        });
        slot.write(
            hash,
            pack_entry(depth_u8, score_i16, bound_type, best_move, generation),
        );
    }

    fn victim(bucket: &TtBucket, generation: u8) -> (&TtSlot, Option<TtEntry>) {
        let mut chosen = (&bucket.slots[0], bucket.slots[0].peek());
        let mut worst = i32::MAX;
        for slot in &bucket.slots {
            let Some(entry) = slot.peek() else {
                return (slot, None);
            };
            let age = i32::from(generation.wrapping_sub(entry.generation) & 0x3F);
            let priority = i32::from(entry.depth) - age * 8;
            if priority < worst {
                worst = priority;
                chosen = (slot, Some(entry));
            }
        }
        chosen
    }

    /// Returns hash table fullness in per mille (0-1000), sampling the first
    /// thousand buckets.
    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        let sample_size = self.buckets.len().min(1000);
        let occupied = self
            .buckets
            .iter()
            .take(sample_size)
            .flat_map(|bucket| bucket.slots.iter())
            .filter(|slot| slot.peek().is_some())
            .count();

        let total_slots = sample_size * BUCKET_SIZE;
        ((occupied as u64 * 1000) / total_slots as u64) as u32
    }

    /// Clear all entries from the table.
    pub fn clear(&self) {
        for bucket in &self.buckets {
            for slot in &bucket.slots {
                slot.reset();
            }
        }
        self.generation.store(0, Ordering::Relaxed);
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(DEFAULT_TT_MB)
    }
}
