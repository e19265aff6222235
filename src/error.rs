use core::alloc::Layout;
use core::fmt;

/// Errors reported by [`HashTable`](crate::HashTable) and the typed wrappers.
///
/// Lookups and removals never fail; a missing key is a normal result. Only
/// construction and operations that may allocate return an `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The table configuration was rejected. The payload names the offending
    /// setting.
    InvalidConfig(&'static str),
    /// The allocator could not satisfy a request for `layout`.
    OutOfMemory {
        /// The layout that failed to allocate.
        layout: Layout,
    },
    /// The requested capacity exceeds
    /// [`MAX_CAPACITY`](crate::hash_table::MAX_CAPACITY) or its byte size
    /// does not fit in the address space.
    CapacityOverflow,
    /// The table was destroyed and has not been re-initialized.
    Destroyed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(reason) => write!(f, "invalid table configuration: {reason}"),
            Error::OutOfMemory { layout } => write!(
                f,
                "memory allocation of {} bytes failed",
                layout.size()
            ),
            Error::CapacityOverflow => f.write_str("capacity overflow"),
            Error::Destroyed => f.write_str("table has been destroyed"),
        }
    }
}

impl core::error::Error for Error {}

impl Error {
    /// Diverges the way infallible standard collections do: allocation
    /// failures go to the global allocation error handler, anything else
    /// panics with the error message.
    #[cold]
    #[inline(never)]
    pub(crate) fn handle(self) -> ! {
        match self {
            Error::OutOfMemory { layout } => alloc::alloc::handle_alloc_error(layout),
            other => panic!("{other}"),
        }
    }
}
