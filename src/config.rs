use crate::error::Error;
use crate::hash::EqualFn;
use crate::hash::HashFn;
use crate::hash_table::HashTable;

/// Construction parameters for a [`HashTable`].
///
/// A `Config` describes the record layout (key size and, for maps, value
/// size), the hash and equality functions, the initial capacity hint and the
/// hash seed. Nothing is validated until [`Config::build`] or
/// [`HashTable::init`] is called.
///
/// # Examples
///
/// ```rust
/// use robin_table::Config;
///
/// fn hash_u32(key: &[u8], seed: u64) -> u64 {
///     let k = u32::from_ne_bytes(key.try_into().unwrap()) as u64;
///     (k ^ seed).wrapping_mul(0x9E37_79B9_7F4A_7C15)
/// }
///
/// fn equal(a: &[u8], b: &[u8]) -> bool {
///     a == b
/// }
///
/// let table = Config::map(4, 4)
///     .hash_fn(hash_u32)
///     .equal_fn(equal)
///     .capacity(100)
///     .seed(7)
///     .build()
///     .unwrap();
/// assert_eq!(table.capacity(), 128);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub(crate) key_size: usize,
    pub(crate) value_size: Option<usize>,
    pub(crate) hash: Option<HashFn>,
    pub(crate) equal: Option<EqualFn>,
    pub(crate) capacity: usize,
    pub(crate) seed: u64,
}

impl Config {
    /// Starts a configuration for a key-value map with fixed-size keys and
    /// values.
    pub fn map(key_size: usize, value_size: usize) -> Self {
        Self {
            key_size,
            value_size: Some(value_size),
            hash: None,
            equal: None,
            capacity: 0,
            seed: 0,
        }
    }

    /// Starts a configuration for a set: records carry a key and no value.
    pub fn set(key_size: usize) -> Self {
        Self {
            key_size,
            value_size: None,
            hash: None,
            equal: None,
            capacity: 0,
            seed: 0,
        }
    }

    /// Sets the function used to hash key bytes.
    pub fn hash_fn(mut self, hash: HashFn) -> Self {
        self.hash = Some(hash);
        self
    }

    /// Sets the function used to compare key bytes.
    pub fn equal_fn(mut self, equal: EqualFn) -> Self {
        self.equal = Some(equal);
        self
    }

    /// Sets the initial slot count hint. It is rounded up to a power of two
    /// of at least 16.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the seed passed to the hash function on every call.
    ///
    /// The seed is fixed for the lifetime of the table. Choosing it (for
    /// example from [`random_seed`](crate::hash::random_seed)) is up to the
    /// caller.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validates the configuration and allocates a table.
    pub fn build(&self) -> Result<HashTable, Error> {
        HashTable::init(self)
    }

    /// Checks everything that can be checked without allocating and returns
    /// the resolved `(key_size, value_size, hash, equal)`.
    pub(crate) fn validate(&self) -> Result<(usize, usize, HashFn, EqualFn), Error> {
        if self.key_size == 0 {
            return Err(Error::InvalidConfig("key size must be non-zero"));
        }
        if self.value_size == Some(0) {
            return Err(Error::InvalidConfig("map value size must be non-zero"));
        }
        let hash = self
            .hash
            .ok_or(Error::InvalidConfig("hash function is required"))?;
        let equal = self
            .equal
            .ok_or(Error::InvalidConfig("equality function is required"))?;

        Ok((self.key_size, self.value_size.unwrap_or(0), hash, equal))
    }
}
