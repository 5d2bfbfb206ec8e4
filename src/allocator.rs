use std::alloc::{self, Layout};
use std::ptr::NonNull;

/// Smallest non-zero capacity handed out by the default growth policy.
///
/// Tiny elements get a bigger first block, huge ones start at one.
pub const fn min_capacity<T>() -> usize {
    let size = std::mem::size_of::<T>();
    if size == 1 {
        8
    } else if size <= 1024 {
        4
    } else {
        1
    }
}

/// Default growth policy: geometric 1.5x growth, never below `requested`
/// and never below `min_capacity`.
pub fn grow_capacity<T>(requested: usize, current: usize) -> usize {
    debug_assert!(requested > current, "grow_capacity: requested > current");
    let geometric = current.saturating_add(current / 2);
    requested.max(geometric).max(min_capacity::<T>())
}

/// Default shrink policy: drop all slack above `min_capacity`, never grow.
pub fn shrink_capacity<T>(used: usize, current: usize) -> usize {
    debug_assert!(used <= current, "shrink_capacity: used <= current");
    if used == 0 {
        0
    } else {
        used.max(min_capacity::<T>()).min(current)
    }
}

#[cold]
#[inline(never)]
pub(crate) fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}

#[inline(always)]
pub(crate) fn array_layout<T>(count: usize) -> Layout {
    Layout::array::<T>(count).unwrap_or_else(|_| capacity_overflow())
}

/// Memory source for every container in this crate.
///
/// A container owns exactly one allocator instance, built from `Param` when the
/// container is built. Allocation failure is not reported back: implementations
/// must abort (the heap allocator uses `handle_alloc_error`).
pub trait Allocator {
    /// Construction parameter passed to every `*_in` container constructor.
    type Param: Default;

    /// Whether `realloc` may be used to resize a block in place.
    const SUPPORT_REALLOC: bool;

    fn new(param: Self::Param) -> Self;

    /// Allocates uninitialized storage for `count` values of `T`.
    fn alloc<T>(&mut self, count: usize) -> NonNull<T>;

    /// Resizes a block returned by `alloc`, keeping the first `min(old, new)` values.
    ///
    /// # Safety
    /// `ptr` must come from this allocator with `old_count` elements.
    unsafe fn realloc<T>(&mut self, ptr: NonNull<T>, old_count: usize, new_count: usize) -> NonNull<T> {
        let new_ptr = self.alloc::<T>(new_count);
        std::ptr::copy_nonoverlapping(ptr.as_ptr(), new_ptr.as_ptr(), old_count.min(new_count));
        self.free(ptr, old_count);
        new_ptr
    }

    /// # Safety
    /// `ptr` must come from this allocator with `count` elements and must not be used afterwards.
    unsafe fn free<T>(&mut self, ptr: NonNull<T>, count: usize);

    /// Capacity to allocate when `requested` elements do not fit into `current`.
    #[inline(always)]
    fn get_grow<T>(&self, requested: usize, current: usize) -> usize {
        grow_capacity::<T>(requested, current)
    }

    /// Capacity to shrink to when `used` elements live in a block of `current`.
    #[inline(always)]
    fn get_shrink<T>(&self, used: usize, current: usize) -> usize {
        shrink_capacity::<T>(used, current)
    }
}

/// Allocator backed by the global Rust heap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeapAllocator;

impl Allocator for HeapAllocator {
    type Param = ();

    const SUPPORT_REALLOC: bool = true;

    #[inline(always)]
    fn new(_param: ()) -> HeapAllocator {
        HeapAllocator
    }

    fn alloc<T>(&mut self, count: usize) -> NonNull<T> {
        let layout = array_layout::<T>(count);
        if layout.size() == 0 {
            return NonNull::dangling();
        }
        let ptr = unsafe { alloc::alloc(layout) } as *mut T;
        NonNull::new(ptr).unwrap_or_else(|| alloc::handle_alloc_error(layout))
    }

    unsafe fn realloc<T>(&mut self, ptr: NonNull<T>, old_count: usize, new_count: usize) -> NonNull<T> {
        let old_layout = array_layout::<T>(old_count);
        let new_layout = array_layout::<T>(new_count);
        if old_layout.size() == 0 {
            return self.alloc(new_count);
        }
        if new_layout.size() == 0 {
            self.free(ptr, old_count);
            return NonNull::dangling();
        }
        let new_ptr = alloc::realloc(ptr.as_ptr() as *mut u8, old_layout, new_layout.size()) as *mut T;
        NonNull::new(new_ptr).unwrap_or_else(|| alloc::handle_alloc_error(new_layout))
    }

    unsafe fn free<T>(&mut self, ptr: NonNull<T>, count: usize) {
        let layout = array_layout::<T>(count);
        if layout.size() != 0 {
            alloc::dealloc(ptr.as_ptr() as *mut u8, layout);
        }
    }
}

#[cfg(test)]
mod allocator_tests {
    use super::*;

    #[test]
    fn grow_is_geometric_and_covers_request() {
        assert_eq!(4, grow_capacity::<u32>(1, 0));
        assert_eq!(8, grow_capacity::<u8>(3, 0));
        assert_eq!(6, grow_capacity::<u32>(5, 4));
        assert_eq!(100, grow_capacity::<u32>(100, 4));
        assert_eq!(1, grow_capacity::<[u8; 4096]>(1, 0));
    }

    #[test]
    fn shrink_never_increases_capacity() {
        assert_eq!(0, shrink_capacity::<u32>(0, 10));
        assert_eq!(4, shrink_capacity::<u32>(1, 10));
        assert_eq!(3, shrink_capacity::<u32>(1, 3));
        assert_eq!(7, shrink_capacity::<u32>(7, 12));
    }

    #[test]
    fn heap_allocator_realloc_keeps_prefix() {
        let mut allocator = HeapAllocator::new(());
        let ptr = allocator.alloc::<u64>(4);
        unsafe {
            for i in 0..4 {
                ptr.as_ptr().add(i).write(i as u64 * 10);
            }
            let ptr = allocator.realloc(ptr, 4, 16);
            for i in 0..4 {
                assert_eq!(i as u64 * 10, *ptr.as_ptr().add(i));
            }
            allocator.free(ptr, 16);
        }
    }

    #[test]
    fn zero_sized_requests_do_not_allocate() {
        let mut allocator = HeapAllocator;
        let ptr = allocator.alloc::<()>(1000);
        assert_eq!(NonNull::dangling(), ptr);
        unsafe { allocator.free(ptr, 1000) };
    }
}
