//! Hash and equality functions for table keys.
//!
//! A table never hashes keys itself; it calls the [`HashFn`] and [`EqualFn`]
//! it was configured with. The functions in this module are ready-made
//! implementations over raw key bytes.

#[cfg(any(feature = "foldhash", feature = "std"))]
use core::hash::BuildHasher;
#[cfg(any(feature = "foldhash", feature = "std"))]
use core::hash::Hash;

use crate::plain::Plain;
use crate::plain::read;

/// Hashes the bytes of a key with the table seed.
///
/// The function must be pure: the same bytes and seed always give the same
/// hash.
pub type HashFn = fn(key: &[u8], seed: u64) -> u64;

/// Reports whether two keys, given as bytes, are equal.
///
/// Keys that compare equal must hash equally.
pub type EqualFn = fn(a: &[u8], b: &[u8]) -> bool;

/// Byte-wise key equality.
///
/// # Examples
///
/// ```rust
/// use robin_table::hash::equal_bytes;
///
/// assert!(equal_bytes(b"abc", b"abc"));
/// assert!(!equal_bytes(b"abc", b"abd"));
/// ```
pub fn equal_bytes(a: &[u8], b: &[u8]) -> bool {
    a == b
}

/// Equality of two keys decoded as `K`.
pub(crate) fn equal_as<K: Plain + Eq>(a: &[u8], b: &[u8]) -> bool {
    read::<K>(a) == read::<K>(b)
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        #[inline]
        fn hash_value<T: Hash + ?Sized>(value: &T, seed: u64) -> u64 {
            foldhash::fast::FixedState::with_seed(seed).hash_one(value)
        }

        /// Returns a seed drawn from foldhash's per-process randomness.
        ///
        /// # Examples
        ///
        /// ```rust
        /// let a = robin_table::hash::random_seed();
        /// let b = robin_table::hash::random_seed();
        /// // Seeds are independent draws; they are not required to differ.
        /// let _ = (a, b);
        /// ```
        pub fn random_seed() -> u64 {
            foldhash::fast::RandomState::default().hash_one(SEED_DOMAIN)
        }
    } else if #[cfg(feature = "std")] {
        #[inline]
        fn hash_value<T: Hash + ?Sized>(value: &T, seed: u64) -> u64 {
            use core::hash::Hasher;

            let mut hasher = std::hash::DefaultHasher::new();
            hasher.write_u64(seed);
            value.hash(&mut hasher);
            hasher.finish()
        }

        /// Returns a seed drawn from the standard library's per-process
        /// randomness.
        pub fn random_seed() -> u64 {
            std::hash::RandomState::new().hash_one(SEED_DOMAIN)
        }
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
const SEED_DOMAIN: u64 = 0x5EED_0F_7AB1E;

/// Seeded hash of raw key bytes.
///
/// # Examples
///
/// ```rust
/// use robin_table::hash::hash_bytes;
///
/// assert_eq!(hash_bytes(b"key", 1), hash_bytes(b"key", 1));
/// ```
#[cfg(any(feature = "foldhash", feature = "std"))]
pub fn hash_bytes(key: &[u8], seed: u64) -> u64 {
    hash_value(key, seed)
}

/// Seeded hash of a key decoded as `K`, consistent with `K`'s `Hash`.
#[cfg(any(feature = "foldhash", feature = "std"))]
pub(crate) fn hash_as<K: Plain + Hash>(key: &[u8], seed: u64) -> u64 {
    hash_value(&read::<K>(key), seed)
}
