/*!

Construct, destruct, copy and move over ranges of raw element storage.

Every function here works on memory the caller owns and has sized correctly.
Moves are plain byte copies: every Rust type is trivially relocatable. What
differs between types is whether destruction is needed at all, which is what
`needs_destruct` reports and what lets the containers skip destructor loops.

*/

use std::ptr;

/// Types for which the all-zero byte pattern is a valid value.
///
/// # Safety
/// Implementors must accept a zero-filled memory block as an initialized value.
pub unsafe trait Zeroable {}

macro_rules! impl_zeroable {
    ($($t:ty),*) => {
        $(unsafe impl Zeroable for $t {})*
    };
}

impl_zeroable!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char);

unsafe impl<T: Zeroable, const N: usize> Zeroable for [T; N] {}
unsafe impl<T> Zeroable for Option<Box<T>> {}

/// Whether dropping a `T` runs any code.
#[inline(always)]
pub const fn needs_destruct<T>() -> bool {
    std::mem::needs_drop::<T>()
}

/// Writes `T::default()` into `count` uninitialized slots.
#[inline]
pub unsafe fn construct_default<T: Default>(dst: *mut T, count: usize) {
    for i in 0..count {
        ptr::write(dst.add(i), T::default());
    }
}

/// Zero-fills `count` uninitialized slots.
#[inline(always)]
pub unsafe fn construct_zeroed<T: Zeroable>(dst: *mut T, count: usize) {
    ptr::write_bytes(dst, 0, count);
}

/// Writes clones of `value` into `count` uninitialized slots.
#[inline]
pub unsafe fn construct_fill<T: Clone>(dst: *mut T, count: usize, value: &T) {
    for i in 0..count {
        ptr::write(dst.add(i), value.clone());
    }
}

/// Drops `count` initialized values in place, leaving the slots uninitialized.
#[inline(always)]
pub unsafe fn destruct<T>(dst: *mut T, count: usize) {
    if needs_destruct::<T>() && count > 0 {
        ptr::drop_in_place(ptr::slice_from_raw_parts_mut(dst, count));
    }
}

/// Clone-constructs `count` values from `src` into uninitialized `dst`.
#[inline]
pub unsafe fn copy<T: Clone>(dst: *mut T, src: *const T, count: usize) {
    for i in 0..count {
        ptr::write(dst.add(i), (*src.add(i)).clone());
    }
}

/// Moves `count` values from `src` into `dst`. Ranges may overlap; `src`
/// is left logically uninitialized.
#[inline(always)]
pub unsafe fn relocate<T>(dst: *mut T, src: *const T, count: usize) {
    if count > 0 && dst as *const T != src {
        ptr::copy(src, dst, count);
    }
}

/// `relocate` for ranges known not to overlap.
#[inline(always)]
pub unsafe fn relocate_nonoverlapping<T>(dst: *mut T, src: *const T, count: usize) {
    if count > 0 {
        ptr::copy_nonoverlapping(src, dst, count);
    }
}

/// Element-wise equality of two ranges of the same length.
#[inline]
pub unsafe fn compare<T: PartialEq<U>, U>(a: *const T, b: *const U, count: usize) -> bool {
    (0..count).all(|i| *a.add(i) == *b.add(i))
}
