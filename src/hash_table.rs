//! The Robin Hood byte-record table.
//!
//! Every record is `header | key bytes | value bytes`, packed with no padding.
//! The header is the full 64-bit key hash followed by a 32-bit displacement
//! (distance from the ideal slot plus one, with zero meaning "empty"). The
//! buffer holds `capacity + 2` records; the two trailing records are scratch
//! space for the record in hand during insertion and for swaps.

use alloc::alloc::alloc_zeroed;
use alloc::alloc::dealloc;
use alloc::alloc::handle_alloc_error;
use core::alloc::Layout;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::mem::size_of;
use core::ptr::NonNull;

use crate::config::Config;
use crate::error::Error;
use crate::hash::EqualFn;
use crate::hash::HashFn;

/// The smallest number of slots a live table has.
pub const MIN_CAPACITY: usize = 16;

/// The largest number of slots a table may have.
///
/// A displacement never exceeds the capacity, so this keeps every
/// displacement representable in the header.
pub const MAX_CAPACITY: usize = 1 << 31;

const HASH_SIZE: usize = size_of::<u64>();
const HEADER_SIZE: usize = HASH_SIZE + size_of::<u32>();

/// Load factor 3/4 is reached: grow before inserting.
#[inline(always)]
fn should_grow(count: usize, capacity: usize) -> bool {
    count.saturating_mul(4) >= capacity.saturating_mul(3)
}

/// Load factor fell to 1/10 or below.
#[inline(always)]
fn should_shrink(count: usize, capacity: usize) -> bool {
    capacity > MIN_CAPACITY && count * 10 <= capacity
}

/// Rounds a slot count hint up to a power of two, at least `MIN_CAPACITY`.
#[inline]
fn capacity_for(hint: usize) -> Result<usize, Error> {
    hint.max(MIN_CAPACITY)
        .checked_next_power_of_two()
        .filter(|&capacity| capacity <= MAX_CAPACITY)
        .ok_or(Error::CapacityOverflow)
}

/// Smallest capacity that holds `len` records without triggering growth.
#[inline]
fn capacity_for_len(len: usize) -> Result<usize, Error> {
    let slots = len
        .checked_mul(4)
        .ok_or(Error::CapacityOverflow)?
        .div_ceil(3);
    capacity_for(slots)
}

#[derive(Clone, Copy, PartialEq, Eq)]
struct Header {
    hash: u64,
    dist: u32,
}

impl Header {
    const EMPTY: Header = Header { hash: 0, dist: 0 };

    #[inline(always)]
    fn new(hash: u64, dist: u32) -> Self {
        Header { hash, dist }
    }

    #[inline(always)]
    fn is_empty(self) -> bool {
        self.dist == 0
    }
}

impl Debug for Header {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_empty() {
            f.write_str("..")
        } else {
            write!(f, "{:04x}:{}", self.hash & 0xffff, self.dist)
        }
    }
}

/// Where a probe for a key ended.
enum Probe {
    /// The key lives in this slot.
    Found(usize),
    /// The key is absent. A new record for it belongs in `index`, `dist`
    /// slots (plus one) past its ideal slot.
    Vacant { index: usize, dist: u32 },
}

fn allocate(capacity: usize, stride: usize) -> Result<(NonNull<u8>, Layout), Error> {
    if capacity > MAX_CAPACITY {
        return Err(Error::CapacityOverflow);
    }
    let size = capacity
        .checked_add(2)
        .and_then(|records| records.checked_mul(stride))
        .ok_or(Error::CapacityOverflow)?;
    let layout =
        Layout::from_size_align(size, align_of::<u64>()).map_err(|_| Error::CapacityOverflow)?;

    #[cfg(test)]
    if tests::alloc_fault::should_fail() {
        return Err(Error::OutOfMemory { layout });
    }

    // SAFETY: `capacity >= MIN_CAPACITY` and `stride > HEADER_SIZE`, so the
    // layout size is non-zero.
    let raw = unsafe { alloc_zeroed(layout) };
    NonNull::new(raw)
        .map(|alloc| (alloc, layout))
        .ok_or(Error::OutOfMemory { layout })
}

/// Debug statistics for hash table analysis.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct TableStats {
    /// Number of records currently in the table
    pub populated: usize,
    /// Number of addressable slots
    pub capacity: usize,
    /// Largest displacement of any record (0 for an empty table)
    pub max_displacement: usize,
    /// Mean displacement over all records
    pub mean_displacement: f64,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Total memory in bytes used by the table
    pub total_bytes: usize,
    /// Bytes held by empty slots and the scratch records
    pub wasted_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl TableStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Displacement: max {}, mean {:.2}",
            self.max_displacement, self.mean_displacement
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
        println!(
            "Memory: {} bytes wasted ({:.02}%)",
            self.wasted_bytes,
            if self.total_bytes == 0 {
                0.0
            } else {
                (self.wasted_bytes as f64 / self.total_bytes as f64) * 100.0
            }
        );
    }
}

/// An open-addressing hash table of fixed-size byte records using Robin
/// Hood hashing with backward-shift deletion.
///
/// Keys and values are byte slices whose sizes are fixed when the table is
/// created. Hashing and key comparison are delegated to the functions in the
/// table's [`Config`]. A table with no value bytes acts as a set.
///
/// ## Performance Characteristics
///
/// - **Memory**: 12 bytes of header per slot plus the key and value bytes, and
///   two scratch records per table. The table grows at 3/4 load and shrinks
///   when load falls to 1/10.
/// - **Lookups** stop at the first empty slot or at the first record closer
///   to its ideal slot than the probe, so misses are as cheap as hits.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hasher;
/// #
/// # use robin_table::Config;
/// # use robin_table::hash::equal_bytes;
/// # use siphasher::sip::SipHasher;
/// #
/// # fn sip(key: &[u8], seed: u64) -> u64 {
/// #     let mut hasher = SipHasher::new_with_keys(seed, 0);
/// #     hasher.write(key);
/// #     hasher.finish()
/// # }
/// #
/// let mut table = Config::map(4, 8)
///     .hash_fn(sip)
///     .equal_fn(equal_bytes)
///     .seed(0x1234)
///     .build()
///     .unwrap();
///
/// assert_eq!(table.set(&7u32.to_ne_bytes(), &49u64.to_ne_bytes()), Ok(true));
/// assert_eq!(table.get(&7u32.to_ne_bytes()), Some(&49u64.to_ne_bytes()[..]));
/// assert!(table.remove(&7u32.to_ne_bytes()));
/// assert!(table.is_empty());
/// ```
pub struct HashTable {
    alloc: NonNull<u8>,
    layout: Layout,

    capacity: usize,
    count: usize,

    stride: usize,
    key_size: usize,
    value_size: usize,

    hash: HashFn,
    equal: EqualFn,
    seed: u64,

    /// Set when shrinking after a removal failed; cleared by any capacity
    /// change.
    shrink_failed: bool,
}

// SAFETY: the table exclusively owns its allocation and holds only plain
// function pointers besides it.
unsafe impl Send for HashTable {}

impl Debug for HashTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;
        use alloc::vec::Vec;

        if !self.is_live() {
            return f
                .debug_struct("HashTable")
                .field("state", &"destroyed")
                .finish();
        }

        let slots: Vec<String> = (0..self.capacity)
            .map(|index| self.header(index))
            .collect::<Vec<_>>()
            .chunks(16)
            .map(|row| {
                row.iter()
                    .map(|header| format!("{header:?}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .collect();

        f.debug_struct("HashTable")
            .field("slots", &slots)
            .field("count", &self.count)
            .field("capacity", &self.capacity)
            .field("key_size", &self.key_size)
            .field("value_size", &self.value_size)
            .finish()
    }
}

impl Clone for HashTable {
    fn clone(&self) -> Self {
        let alloc = if self.layout.size() == 0 {
            NonNull::dangling()
        } else {
            // SAFETY: the layout is the non-zero layout of a live buffer; on
            // success both buffers hold `layout.size()` bytes and do not
            // overlap.
            unsafe {
                let raw = alloc::alloc::alloc(self.layout);
                if raw.is_null() {
                    handle_alloc_error(self.layout);
                }
                core::ptr::copy_nonoverlapping(self.alloc.as_ptr(), raw, self.layout.size());
                NonNull::new_unchecked(raw)
            }
        };

        Self {
            alloc,
            layout: self.layout,
            capacity: self.capacity,
            count: self.count,
            stride: self.stride,
            key_size: self.key_size,
            value_size: self.value_size,
            hash: self.hash,
            equal: self.equal,
            seed: self.seed,
            shrink_failed: self.shrink_failed,
        }
    }
}

impl Drop for HashTable {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl HashTable {
    /// Validates `config` and allocates a live table.
    ///
    /// The capacity hint is rounded up to a power of two of at least
    /// [`MIN_CAPACITY`]; the whole buffer starts zeroed, which marks every
    /// slot empty.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfig`] for a zero key size, a zero map value size,
    ///   or a missing hash or equality function.
    /// - [`Error::CapacityOverflow`] if the buffer size does not fit in
    ///   memory.
    /// - [`Error::OutOfMemory`] if the allocation fails.
    pub fn init(config: &Config) -> Result<Self, Error> {
        let (key_size, value_size, hash, equal) = config.validate()?;
        let stride = HEADER_SIZE
            .checked_add(key_size)
            .and_then(|size| size.checked_add(value_size))
            .ok_or(Error::CapacityOverflow)?;
        let capacity = capacity_for(config.capacity)?;

        Self::with_parts(capacity, stride, key_size, value_size, hash, equal, config.seed)
    }

    fn with_parts(
        capacity: usize,
        stride: usize,
        key_size: usize,
        value_size: usize,
        hash: HashFn,
        equal: EqualFn,
        seed: u64,
    ) -> Result<Self, Error> {
        debug_assert!(capacity.is_power_of_two() && capacity >= MIN_CAPACITY);
        let (alloc, layout) = allocate(capacity, stride)?;

        Ok(Self {
            alloc,
            layout,
            capacity,
            count: 0,
            stride,
            key_size,
            value_size,
            hash,
            equal,
            seed,
            shrink_failed: false,
        })
    }

    /// Releases the buffer. Capacity and length become zero and the table
    /// behaves as if it had never been initialized until [`reinit`] is
    /// called. Destroying twice is harmless.
    ///
    /// On a destroyed table lookups and removals report the key as absent,
    /// and [`set`] and the capacity operations return
    /// [`Error::Destroyed`].
    ///
    /// [`reinit`]: HashTable::reinit
    /// [`set`]: HashTable::set
    pub fn destroy(&mut self) {
        if self.layout.size() != 0 {
            // SAFETY: a non-zero layout means `alloc` came from `allocate` (or
            // `clone`) with exactly this layout and has not been freed.
            unsafe {
                dealloc(self.alloc.as_ptr(), self.layout);
            }
        }
        self.alloc = NonNull::dangling();
        self.layout = Layout::new::<()>();
        self.capacity = 0;
        self.count = 0;
    }

    /// Replaces this table with a freshly initialized one.
    ///
    /// The current buffer is released first; if initialization fails the
    /// table is left destroyed.
    pub fn reinit(&mut self, config: &Config) -> Result<(), Error> {
        self.destroy();
        let table = Self::init(config)?;
        *self = table;
        Ok(())
    }

    /// Returns `true` unless the table has been destroyed.
    pub fn is_live(&self) -> bool {
        self.capacity != 0
    }

    /// Returns the number of records in the table.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of slots. Always a power of two of at least
    /// [`MIN_CAPACITY`] for a live table, zero for a destroyed one.
    ///
    /// The table grows before its length would exceed three quarters of
    /// this.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of key bytes per record.
    pub fn key_size(&self) -> usize {
        self.key_size
    }

    /// Returns the number of value bytes per record (zero for sets).
    pub fn value_size(&self) -> usize {
        self.value_size
    }

    /// Returns the seed passed to the hash function.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline(always)]
    fn mask(&self) -> usize {
        self.capacity - 1
    }

    #[inline(always)]
    fn check_live(&self) -> Result<(), Error> {
        if self.is_live() {
            Ok(())
        } else {
            Err(Error::Destroyed)
        }
    }

    #[inline(always)]
    fn hash_key(&self, key: &[u8]) -> u64 {
        assert_eq!(
            key.len(),
            self.key_size,
            "key length does not match the table key size"
        );
        (self.hash)(key, self.seed)
    }

    /// Pointer to the first byte of record `index`.
    ///
    /// This is the only place record addresses are computed. Indices
    /// `0..capacity` are slots; `capacity` and `capacity + 1` are the scratch
    /// records. Callers only pass masked slot indices or the scratch indices.
    #[inline(always)]
    fn record_ptr(&self, index: usize) -> *mut u8 {
        debug_assert!(self.is_live());
        debug_assert!(index < self.capacity + 2);
        // SAFETY: the buffer holds `capacity + 2` records of `stride` bytes and
        // `index < capacity + 2`.
        unsafe { self.alloc.as_ptr().add(index * self.stride) }
    }

    #[inline(always)]
    fn record(&self, index: usize) -> &[u8] {
        // SAFETY: `record_ptr` yields `stride` initialized (zeroed at
        // allocation) bytes inside the buffer, borrowed through `&self`.
        unsafe { core::slice::from_raw_parts(self.record_ptr(index), self.stride) }
    }

    #[inline(always)]
    fn record_mut(&mut self, index: usize) -> &mut [u8] {
        // SAFETY: as in `record`; `&mut self` makes the borrow exclusive.
        unsafe { core::slice::from_raw_parts_mut(self.record_ptr(index), self.stride) }
    }

    #[inline(always)]
    fn header(&self, index: usize) -> Header {
        let ptr = self.record_ptr(index);
        // SAFETY: every record starts with a `HEADER_SIZE`-byte header: the
        // hash, then the displacement. Records are byte-packed, so the reads
        // are unaligned.
        unsafe {
            Header {
                hash: core::ptr::read_unaligned(ptr.cast::<u64>()),
                dist: core::ptr::read_unaligned(ptr.add(HASH_SIZE).cast::<u32>()),
            }
        }
    }

    #[inline(always)]
    fn set_header(&mut self, index: usize, header: Header) {
        let ptr = self.record_ptr(index);
        // SAFETY: as in `header`.
        unsafe {
            core::ptr::write_unaligned(ptr.cast::<u64>(), header.hash);
            core::ptr::write_unaligned(ptr.add(HASH_SIZE).cast::<u32>(), header.dist);
        }
    }

    #[inline(always)]
    fn set_dist(&mut self, index: usize, dist: u32) {
        // SAFETY: as in `header`.
        unsafe {
            core::ptr::write_unaligned(self.record_ptr(index).add(HASH_SIZE).cast::<u32>(), dist);
        }
    }

    #[inline(always)]
    fn key(&self, index: usize) -> &[u8] {
        &self.record(index)[HEADER_SIZE..HEADER_SIZE + self.key_size]
    }

    #[inline(always)]
    fn value(&self, index: usize) -> &[u8] {
        &self.record(index)[HEADER_SIZE + self.key_size..]
    }

    #[inline(always)]
    fn value_mut(&mut self, index: usize) -> &mut [u8] {
        let offset = HEADER_SIZE + self.key_size;
        &mut self.record_mut(index)[offset..]
    }

    #[inline(always)]
    fn copy_record(&mut self, from: usize, to: usize) {
        debug_assert_ne!(from, to);
        // SAFETY: distinct record indices address disjoint `stride`-byte
        // ranges of the buffer.
        unsafe {
            core::ptr::copy_nonoverlapping(self.record_ptr(from), self.record_ptr(to), self.stride);
        }
    }

    /// Index of the in-hand scratch record.
    #[inline(always)]
    fn stage_index(&self) -> usize {
        self.capacity
    }

    /// Index of the swap scratch record.
    #[inline(always)]
    fn swap_index(&self) -> usize {
        self.capacity + 1
    }

    /// Probes for `key` starting at its ideal slot.
    ///
    /// Stops at an empty slot or at a record that sits closer to its ideal
    /// slot than the probe does: the key would have displaced that record,
    /// so it cannot be further along.
    fn probe(&self, hash: u64, key: &[u8]) -> Probe {
        let mask = self.mask();
        let mut index = hash as usize & mask;
        let mut dist = 1;

        loop {
            let slot = self.header(index);
            if slot.is_empty() || slot.dist < dist {
                return Probe::Vacant { index, dist };
            }
            if slot.hash == hash && (self.equal)(self.key(index), key) {
                return Probe::Found(index);
            }

            index = (index + 1) & mask;
            dist += 1;
        }
    }

    /// Inserts the in-hand record, whose displacement is correct for slot
    /// `index`, walking forward and swapping it with every record that is
    /// closer to its ideal slot.
    ///
    /// The walk always ends at an empty slot because the table is never full,
    /// and no displacement it writes exceeds the capacity.
    fn place_staged(&mut self, mut index: usize) {
        let mask = self.mask();
        let stage = self.stage_index();
        let swap = self.swap_index();

        loop {
            let slot = self.header(index);
            if slot.is_empty() {
                self.copy_record(stage, index);
                self.count += 1;
                return;
            }

            let held = self.header(stage);
            let held = if slot.dist < held.dist {
                self.copy_record(index, swap);
                self.copy_record(stage, index);
                self.copy_record(swap, stage);
                slot
            } else {
                held
            };

            debug_assert!((held.dist as usize) < self.capacity);
            self.set_dist(stage, held.dist + 1);
            index = (index + 1) & mask;
        }
    }

    /// Moves every record into a new buffer of `capacity` slots.
    ///
    /// The only fallible step is the allocation, which happens before any
    /// record moves, so on error nothing here has changed.
    fn resize(&mut self, capacity: usize) -> Result<(), Error> {
        let mut table = Self::with_parts(
            capacity,
            self.stride,
            self.key_size,
            self.value_size,
            self.hash,
            self.equal,
            self.seed,
        )?;
        let stage = table.stage_index();
        let mask = table.mask();

        for index in 0..self.capacity {
            let header = self.header(index);
            if header.is_empty() {
                continue;
            }

            table.record_mut(stage).copy_from_slice(self.record(index));
            table.set_dist(stage, 1);
            table.place_staged(header.hash as usize & mask);
        }

        debug_assert_eq!(table.count, self.count);
        *self = table;
        Ok(())
    }

    /// Inserts or updates the record for `key`.
    ///
    /// Returns `Ok(true)` if the key was not present and a record was
    /// inserted, `Ok(false)` if an existing record was overwritten. The key
    /// bytes are overwritten along with the value, so keys that are equal
    /// but not byte-identical take the latest bytes.
    ///
    /// If the table is at 3/4 load it first doubles its capacity.
    ///
    /// # Errors
    ///
    /// On error the table's contents are unchanged.
    ///
    /// - [`Error::OutOfMemory`] or [`Error::CapacityOverflow`] if the growth
    ///   that had to happen first failed.
    /// - [`Error::Destroyed`] if the table has been destroyed.
    ///
    /// # Panics
    ///
    /// Panics if `key` or `value` is not exactly [`key_size`] or
    /// [`value_size`] bytes long.
    ///
    /// [`key_size`]: HashTable::key_size
    /// [`value_size`]: HashTable::value_size
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hasher;
    /// #
    /// # use robin_table::Config;
    /// # use robin_table::hash::equal_bytes;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn sip(key: &[u8], seed: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new_with_keys(seed, 0);
    /// #     hasher.write(key);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = Config::map(1, 1).hash_fn(sip).equal_fn(equal_bytes).build()?;
    ///
    /// assert_eq!(table.set(b"k", b"1"), Ok(true));
    /// assert_eq!(table.set(b"k", b"2"), Ok(false));
    /// assert_eq!(table.len(), 1);
    /// assert_eq!(table.get(b"k"), Some(&b"2"[..]));
    /// # Ok::<(), robin_table::Error>(())
    /// ```
    pub fn set(&mut self, key: &[u8], value: &[u8]) -> Result<bool, Error> {
        self.check_live()?;
        assert_eq!(
            value.len(),
            self.value_size,
            "value length does not match the table value size"
        );
        let hash = self.hash_key(key);

        if should_grow(self.count, self.capacity) {
            let capacity = self.capacity.checked_mul(2).ok_or(Error::CapacityOverflow)?;
            self.resize(capacity)?;
        }

        match self.probe(hash, key) {
            Probe::Found(index) => {
                let key_end = HEADER_SIZE + self.key_size;
                let record = self.record_mut(index);
                record[HEADER_SIZE..key_end].copy_from_slice(key);
                record[key_end..].copy_from_slice(value);
                Ok(false)
            }
            Probe::Vacant { index, dist } => {
                let stage = self.stage_index();
                let key_end = HEADER_SIZE + self.key_size;
                let record = self.record_mut(stage);
                record[HEADER_SIZE..key_end].copy_from_slice(key);
                record[key_end..].copy_from_slice(value);
                self.set_header(stage, Header::new(hash, dist));

                self.place_staged(index);
                Ok(true)
            }
        }
    }

    /// Reserves room for at least `additional` more records without
    /// growing.
    ///
    /// # Errors
    ///
    /// On error the table is unchanged.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.check_live()?;
        let required = self.count.checked_add(additional).ok_or(Error::CapacityOverflow)?;
        let capacity = capacity_for_len(required)?;
        if capacity > self.capacity {
            self.resize(capacity)?;
        }
        Ok(())
    }

    /// Shrinks the table to the smallest capacity that holds its records
    /// below the growth threshold.
    ///
    /// # Errors
    ///
    /// On error the table is unchanged.
    pub fn shrink_to_fit(&mut self) -> Result<(), Error> {
        self.check_live()?;
        let capacity = capacity_for_len(self.count)?;
        if capacity < self.capacity {
            self.resize(capacity)?;
        }
        Ok(())
    }

    fn find(&self, key: &[u8]) -> Option<usize> {
        let hash = self.hash_key(key);
        if self.count == 0 {
            return None;
        }

        match self.probe(hash, key) {
            Probe::Found(index) => Some(index),
            Probe::Vacant { .. } => None,
        }
    }

    /// Returns the value bytes stored for `key`.
    ///
    /// For a set the returned slice is empty.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not exactly [`key_size`](HashTable::key_size)
    /// bytes long.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.find(key).map(|index| self.value(index))
    }

    /// Returns the value bytes stored for `key` for in-place modification.
    pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut [u8]> {
        self.find(key).map(|index| self.value_mut(index))
    }

    /// Returns the stored key bytes and value bytes for `key`.
    pub fn get_key_value(&self, key: &[u8]) -> Option<(&[u8], &[u8])> {
        self.find(key).map(|index| (self.key(index), self.value(index)))
    }

    /// Returns `true` if the table holds a record for `key`.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.find(key).is_some()
    }

    /// Removes the record for `key`, returning whether it was present.
    ///
    /// The records after it in the same run shift back one slot, so no
    /// tombstone is left behind. If the load factor drops to 1/10 the table
    /// halves its capacity; if that allocation fails the table simply stays
    /// larger.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hasher;
    /// #
    /// # use robin_table::Config;
    /// # use robin_table::hash::equal_bytes;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn sip(key: &[u8], seed: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new_with_keys(seed, 0);
    /// #     hasher.write(key);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = Config::set(2).hash_fn(sip).equal_fn(equal_bytes).build()?;
    /// table.set(b"ab", b"")?;
    ///
    /// assert!(table.remove(b"ab"));
    /// assert!(!table.remove(b"ab"));
    /// assert!(!table.contains(b"ab"));
    /// # Ok::<(), robin_table::Error>(())
    /// ```
    pub fn remove(&mut self, key: &[u8]) -> bool {
        self.remove_with(key, |_, _| ()).is_some()
    }

    /// Removes the record for `key`, copying its value bytes into `out`
    /// first. Returns whether the key was present.
    ///
    /// # Panics
    ///
    /// Panics if `out` is not exactly [`value_size`](HashTable::value_size)
    /// bytes long.
    pub fn take(&mut self, key: &[u8], out: &mut [u8]) -> bool {
        assert_eq!(
            out.len(),
            self.value_size,
            "output length does not match the table value size"
        );
        self.remove_with(key, |_, value| out.copy_from_slice(value)).is_some()
    }

    /// Removes the record for `key`, handing its key and value bytes to `f`
    /// before they are overwritten.
    pub fn remove_with<R>(&mut self, key: &[u8], f: impl FnOnce(&[u8], &[u8]) -> R) -> Option<R> {
        let index = self.find(key)?;
        let result = f(self.key(index), self.value(index));
        self.remove_at(index);
        Some(result)
    }

    fn remove_at(&mut self, mut index: usize) {
        let mask = self.mask();

        loop {
            let next = (index + 1) & mask;
            let header = self.header(next);
            if header.dist <= 1 {
                self.set_header(index, Header::EMPTY);
                break;
            }

            self.copy_record(next, index);
            self.set_dist(index, header.dist - 1);
            index = next;
        }

        self.count -= 1;
        if !self.shrink_failed && should_shrink(self.count, self.capacity) {
            // The key is already gone; a table that failed to shrink is still
            // correct, only oversized.
            if self.resize(self.capacity / 2).is_err() {
                self.shrink_failed = true;
            }
        }
    }

    /// Removes every record, keeping the allocation.
    pub fn clear(&mut self) {
        if self.layout.size() != 0 {
            // SAFETY: the buffer is `layout.size()` bytes long.
            unsafe {
                core::ptr::write_bytes(self.alloc.as_ptr(), 0, self.layout.size());
            }
        }
        self.count = 0;
    }

    /// Returns an iterator over `(key, value)` byte views of every record.
    ///
    /// The order is unspecified and changes as the table is modified.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            table: self,
            index: 0,
            remaining: self.count,
        }
    }

    /// Counts records per displacement: entry `d` of the result is the number
    /// of records sitting `d` slots past their ideal slot.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> alloc::vec::Vec<usize> {
        let mut hist = alloc::vec::Vec::new();

        for index in 0..self.capacity {
            let header = self.header(index);
            if header.is_empty() {
                continue;
            }
            let distance = header.dist as usize - 1;
            if hist.len() <= distance {
                hist.resize(distance + 1, 0);
            }
            hist[distance] += 1;
        }

        hist
    }

    /// Returns occupancy and displacement statistics.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> TableStats {
        let hist = self.probe_histogram();
        let total_displacement: usize = hist
            .iter()
            .enumerate()
            .map(|(distance, &count)| (distance + 1) * count)
            .sum();

        TableStats {
            populated: self.count,
            capacity: self.capacity,
            max_displacement: hist.len(),
            mean_displacement: if self.count == 0 {
                0.0
            } else {
                total_displacement as f64 / self.count as f64
            },
            load_factor: if self.capacity == 0 {
                0.0
            } else {
                self.count as f64 / self.capacity as f64
            },
            total_bytes: self.layout.size(),
            wasted_bytes: self.layout.size() - self.count * self.stride,
        }
    }
}

/// An iterator over the records of a [`HashTable`] as `(key, value)` byte
/// slices.
///
/// This struct is created by [`HashTable::iter`].
pub struct Iter<'a> {
    table: &'a HashTable,
    index: usize,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a [u8], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        while self.index < self.table.capacity {
            let index = self.index;
            self.index += 1;
            if !self.table.header(index).is_empty() {
                self.remaining -= 1;
                return Some((self.table.key(index), self.table.value(index)));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a HashTable {
    type Item = (&'a [u8], &'a [u8]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
