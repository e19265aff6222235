use core::fmt::Debug;
#[cfg(any(feature = "foldhash", feature = "std"))]
use core::hash::Hash;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem::size_of;

use crate::config::Config;
use crate::error::Error;
use crate::hash::HashFn;
use crate::hash::equal_as;
use crate::hash_table;
use crate::hash_table::HashTable;
use crate::plain::Plain;
use crate::plain::bytes_of;
use crate::plain::read;

/// A typed hash map backed by a byte-record [`HashTable`].
///
/// Keys and values are copied into the table as raw bytes, so both must be
/// [`Plain`]. Lookups return values by copy; records are byte-packed and a
/// reference into them would be unaligned.
///
/// # Performance Characteristics
///
/// - **Memory**: 12 bytes of header per slot plus `size_of::<K>() +
///   size_of::<V>()`, with no padding between records.
pub struct HashMap<K, V> {
    table: HashTable,
    _marker: PhantomData<(K, V)>,
}

impl<K, V> Clone for HashMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            _marker: PhantomData,
        }
    }
}

impl<K, V> Debug for HashMap<K, V>
where
    K: Plain + Debug,
    V: Plain + Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> PartialEq for HashMap<K, V>
where
    K: Plain + Eq,
    V: Plain + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter()
            .all(|(key, value)| other.get(&key).is_some_and(|v| v == value))
    }
}

impl<K, V> HashMap<K, V>
where
    K: Plain + Eq,
    V: Plain,
{
    /// Creates a map that hashes keys with `hash`.
    ///
    /// `hash` receives the bytes of a `K` and `seed`. Keys are compared as
    /// `K` values, so `hash` must give equal keys equal hashes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `K` or `V` is zero-sized, such as
    /// `[u8; 0]`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_table::HashMap;
    ///
    /// fn hash_u32(key: &[u8], seed: u64) -> u64 {
    ///     let k = u32::from_ne_bytes(key.try_into().unwrap()) as u64;
    ///     (k ^ seed).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    /// }
    ///
    /// let mut map = HashMap::<u32, u64>::with_hash_fn(hash_u32, 0, 11)?;
    /// map.try_insert(3, 9)?;
    /// assert_eq!(map.get(&3), Some(9));
    /// # Ok::<(), robin_table::Error>(())
    /// ```
    pub fn with_hash_fn(hash: HashFn, capacity: usize, seed: u64) -> Result<Self, Error> {
        let table = Config::map(size_of::<K>(), size_of::<V>())
            .hash_fn(hash)
            .equal_fn(equal_as::<K>)
            .capacity(capacity)
            .seed(seed)
            .build()?;

        Ok(Self {
            table,
            _marker: PhantomData,
        })
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    ///
    /// The map holds up to three quarters of this many entries before it
    /// grows.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes every entry, keeping the allocation.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Reserves room for `additional` more entries.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.table.try_reserve(additional)
    }

    /// Shrinks the map as much as its length allows.
    pub fn shrink_to_fit(&mut self) -> Result<(), Error> {
        self.table.shrink_to_fit()
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    ///
    /// # Errors
    ///
    /// Fails if the table had to grow and could not. On error the map is
    /// unchanged.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        if let Some(slot) = self.table.get_mut(bytes_of(&key)) {
            let previous = read::<V>(slot);
            slot.copy_from_slice(bytes_of(&value));
            return Ok(Some(previous));
        }

        self.table.set(bytes_of(&key), bytes_of(&value))?;
        Ok(None)
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    ///
    /// # Panics
    ///
    /// Allocation failure is reported through
    /// [`handle_alloc_error`](alloc::alloc::handle_alloc_error). Any other
    /// failure of [`try_insert`](HashMap::try_insert) panics.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_table::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.insert(1u16, 'a'), None);
    /// assert_eq!(map.insert(1u16, 'b'), Some('a'));
    /// assert_eq!(map.len(), 1);
    /// # }
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.try_insert(key, value).unwrap_or_else(|err| err.handle())
    }

    /// Returns a copy of the value for `key`.
    pub fn get(&self, key: &K) -> Option<V> {
        self.table.get(bytes_of(key)).map(read::<V>)
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.table.contains(bytes_of(key))
    }

    /// Removes `key` from the map, returning its value if it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_table::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(7i64, 1.5f64);
    /// assert_eq!(map.remove(&7), Some(1.5));
    /// assert_eq!(map.remove(&7), None);
    /// # }
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.table.remove_with(bytes_of(key), |_, value| read::<V>(value))
    }
}

impl<K, V> HashMap<K, V>
where
    K: Plain,
    V: Plain,
{
    /// Returns an iterator over copies of every key-value pair.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
            _marker: PhantomData,
        }
    }

    /// Returns an iterator over copies of every key.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over copies of every value.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns occupancy and displacement statistics of the underlying
    /// table.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> hash_table::TableStats {
        self.table.debug_stats()
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<K, V> HashMap<K, V>
where
    K: Plain + Hash + Eq,
    V: Plain,
{
    /// Creates an empty map with a random seed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_table::HashMap;
    ///
    /// let map: HashMap<u32, u32> = HashMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 16);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `K` or `V` is zero-sized.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty map with room for at least `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `K` or `V` is zero-sized.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::try_with_capacity(capacity).unwrap_or_else(|err| err.handle())
    }

    /// Creates an empty map with a random seed, reporting allocation
    /// failure.
    pub fn try_new() -> Result<Self, Error> {
        Self::try_with_capacity(0)
    }

    /// Creates an empty map with room for at least `capacity` slots,
    /// reporting allocation failure.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        Self::with_seed(capacity, crate::hash::random_seed())
    }

    /// Creates an empty map with a fixed seed. Two maps built with the same
    /// seed lay out the same keys identically.
    pub fn with_seed(capacity: usize, seed: u64) -> Result<Self, Error> {
        Self::with_hash_fn(crate::hash::hash_as::<K>, capacity, seed)
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<K, V> Default for HashMap<K, V>
where
    K: Plain + Hash + Eq,
    V: Plain,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Extend<(K, V)> for HashMap<K, V>
where
    K: Plain + Eq,
    V: Plain,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<K, V> FromIterator<(K, V)> for HashMap<K, V>
where
    K: Plain + Hash + Eq,
    V: Plain,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::new();
        map.try_reserve(iter.size_hint().0).unwrap_or_else(|err| err.handle());
        map.extend(iter);
        map
    }
}

impl<'a, K, V> IntoIterator for &'a HashMap<K, V>
where
    K: Plain,
    V: Plain,
{
    type Item = (K, V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: hash_table::Iter<'a>,
    _marker: PhantomData<(K, V)>,
}

impl<K: Plain, V: Plain> Iterator for Iter<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (read::<K>(k), read::<V>(v)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K: Plain, V: Plain> ExactSizeIterator for Iter<'_, K, V> {}

impl<K: Plain, V: Plain> FusedIterator for Iter<'_, K, V> {}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K: Plain, V: Plain> Iterator for Keys<'_, K, V> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K: Plain, V: Plain> Iterator for Values<'_, K, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
