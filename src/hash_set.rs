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

/// A typed hash set backed by a key-only [`HashTable`].
///
/// # Performance Characteristics
///
/// - **Memory**: 12 bytes of header per slot plus `size_of::<T>()`.
pub struct HashSet<T> {
    table: HashTable,
    _marker: PhantomData<T>,
}

impl<T> Clone for HashSet<T> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for HashSet<T>
where
    T: Plain + Eq,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(&v))
    }
}

impl<T> Eq for HashSet<T> where T: Plain + Eq {}

impl<T> Debug for HashSet<T>
where
    T: Plain + Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> HashSet<T>
where
    T: Plain + Eq,
{
    /// Creates a set that hashes values with `hash`.
    ///
    /// `hash` receives the bytes of a `T` and `seed`, and must give equal
    /// values equal hashes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `T` is zero-sized.
    pub fn with_hash_fn(hash: HashFn, capacity: usize, seed: u64) -> Result<Self, Error> {
        let table = Config::set(size_of::<T>())
            .hash_fn(hash)
            .equal_fn(equal_as::<T>)
            .capacity(capacity)
            .seed(seed)
            .build()?;

        Ok(Self {
            table,
            _marker: PhantomData,
        })
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes every element, keeping the allocation.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Reserves room for `additional` more elements.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.table.try_reserve(additional)
    }

    /// Adds a value to the set. Returns whether the value was newly
    /// inserted.
    ///
    /// # Errors
    ///
    /// Fails if the table had to grow and could not. On error the set is
    /// unchanged.
    pub fn try_insert(&mut self, value: T) -> Result<bool, Error> {
        self.table.set(bytes_of(&value), &[])
    }

    /// Adds a value to the set. Returns whether the value was newly
    /// inserted.
    ///
    /// # Panics
    ///
    /// Allocation failure is reported through
    /// [`handle_alloc_error`](alloc::alloc::handle_alloc_error). Any other
    /// failure of [`try_insert`](HashSet::try_insert) panics.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_table::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// assert!(set.insert([1u8, 2, 3]));
    /// assert!(!set.insert([1u8, 2, 3]));
    /// assert!(set.contains(&[1, 2, 3]));
    /// # }
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        self.try_insert(value).unwrap_or_else(|err| err.handle())
    }

    /// Returns `true` if the set contains `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.table.contains(bytes_of(value))
    }

    /// Removes `value` from the set. Returns whether it was present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.table.remove(bytes_of(value))
    }
}

impl<T: Plain> HashSet<T> {
    /// Returns an iterator over copies of every element.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
            _marker: PhantomData,
        }
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<T> HashSet<T>
where
    T: Plain + Hash + Eq,
{
    /// Creates an empty set with a random seed.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty set with room for at least `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_seed(capacity, crate::hash::random_seed()).unwrap_or_else(|err| err.handle())
    }

    /// Creates an empty set with a fixed seed.
    pub fn with_seed(capacity: usize, seed: u64) -> Result<Self, Error> {
        Self::with_hash_fn(crate::hash::hash_as::<T>, capacity, seed)
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<T> Default for HashSet<T>
where
    T: Plain + Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for HashSet<T>
where
    T: Plain + Eq,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<T> FromIterator<T> for HashSet<T>
where
    T: Plain + Hash + Eq,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut set = Self::new();
        set.try_reserve(iter.size_hint().0).unwrap_or_else(|err| err.handle());
        set.extend(iter);
        set
    }
}

impl<'a, T> IntoIterator for &'a HashSet<T>
where
    T: Plain,
{
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the elements of a `HashSet`.
pub struct Iter<'a, T> {
    inner: hash_table::Iter<'a>,
    _marker: PhantomData<T>,
}

impl<T: Plain> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| read::<T>(k))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T: Plain> ExactSizeIterator for Iter<'_, T> {}

impl<T: Plain> FusedIterator for Iter<'_, T> {}
