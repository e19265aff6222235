use core::mem::size_of;

/// Types that can be stored in a table as raw bytes.
///
/// The typed [`HashMap`](crate::HashMap) and [`HashSet`](crate::HashSet)
/// copy keys and values into byte-packed records and read them back with
/// unaligned loads, so the types they hold must be plain data.
///
/// # Safety
///
/// Implementors must be `Copy`, have no padding bytes and no interior
/// pointers or references, so that every byte of a value is initialized and
/// copying the bytes produces an equal value.
pub unsafe trait Plain: Copy + 'static {}

macro_rules! impl_plain {
    ($($t:ty),* $(,)?) => {
        $(
            // SAFETY: primitive scalars have no padding.
            unsafe impl Plain for $t {}
        )*
    };
}

impl_plain!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, bool, char, f32, f64,
);

// SAFETY: an array of padding-free elements has no padding.
unsafe impl<T: Plain, const N: usize> Plain for [T; N] {}

/// Views a plain value as its bytes.
#[inline(always)]
pub(crate) fn bytes_of<T: Plain>(value: &T) -> &[u8] {
    // SAFETY: `T: Plain` guarantees every byte of `value` is initialized, and
    // the slice borrows `value` for its whole lifetime.
    unsafe { core::slice::from_raw_parts((value as *const T).cast::<u8>(), size_of::<T>()) }
}

/// Reads a plain value back out of bytes written by [`bytes_of`].
///
/// Callers only pass bytes that were produced from a valid `T`; the typed
/// wrappers never expose their tables, so no other bytes reach this.
#[inline(always)]
pub(crate) fn read<T: Plain>(bytes: &[u8]) -> T {
    assert_eq!(bytes.len(), size_of::<T>());
    // SAFETY: the length matches `T` and the bytes came from a valid `T`.
    // Records are byte-packed, hence the unaligned read.
    unsafe { core::ptr::read_unaligned(bytes.as_ptr().cast::<T>()) }
}
