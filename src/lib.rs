#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

mod config;
mod error;
mod plain;

pub mod hash;

/// A typed map over [`HashTable`] for plain-data keys and values.
///
/// This module provides a `HashMap` that copies keys and values into the
/// table's byte records and copies them back out on lookup.
pub mod hash_map;

/// A typed set over [`HashTable`] for plain-data values.
pub mod hash_set;

pub mod hash_table;

pub use config::Config;
pub use error::Error;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use plain::Plain;
