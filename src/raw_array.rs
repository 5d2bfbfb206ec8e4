use crate::allocator::{capacity_overflow, Allocator};
use crate::memops;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// Growable contiguous storage: `{data, size, capacity}` plus the owning allocator.
///
/// Elements in `[0, size)` are initialized, `[size, capacity)` are not.
/// Starts empty without allocating, grows geometrically, shrinks only when asked.
pub(crate) struct RawArray<T, A: Allocator> {
    data: NonNull<T>,
    size: usize,
    capacity: usize,
    allocator: A,
    _marker: PhantomData<T>,
}

unsafe impl<T: Send, A: Allocator + Send> Send for RawArray<T, A> {}
unsafe impl<T: Sync, A: Allocator + Sync> Sync for RawArray<T, A> {}

impl<T, A: Allocator> RawArray<T, A> {
    pub fn new(allocator: A) -> RawArray<T, A> {
        RawArray {
            data: NonNull::dangling(),
            size: 0,
            capacity: 0,
            allocator,
            _marker: PhantomData,
        }
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    #[inline(always)]
    pub fn data(&self) -> *const T {
        self.data.as_ptr()
    }

    #[inline(always)]
    pub fn data_mut(&mut self) -> *mut T {
        self.data.as_ptr()
    }

    /// # Safety
    /// `[0, size)` must be initialized and `size <= capacity`.
    #[inline(always)]
    pub unsafe fn set_size(&mut self, size: usize) {
        debug_assert!(size <= self.capacity, "set_size: size <= capacity");
        self.size = size;
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.data.as_ptr(), self.size) }
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.data.as_ptr(), self.size) }
    }

    /// Moves the live elements into a block of exactly `new_capacity`.
    fn realloc(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity >= self.size, "realloc: new_capacity >= size");
        if new_capacity == self.capacity {
            return;
        }
        if new_capacity == 0 {
            self.free();
            return;
        }

        trace!("realloc array storage {} -> {}", self.capacity, new_capacity);

        if self.capacity == 0 {
            self.data = self.allocator.alloc::<T>(new_capacity);
        } else if A::SUPPORT_REALLOC {
            self.data = unsafe { self.allocator.realloc(self.data, self.capacity, new_capacity) };
        } else {
            let new_data = self.allocator.alloc::<T>(new_capacity);
            unsafe {
                memops::relocate_nonoverlapping(new_data.as_ptr(), self.data.as_ptr(), self.size);
                self.allocator.free(self.data, self.capacity);
            }
            self.data = new_data;
        }
        self.capacity = new_capacity;
    }

    /// Returns the block to the allocator. Live elements must already be gone.
    fn free(&mut self) {
        debug_assert_eq!(0, self.size, "free: no live elements");
        if self.capacity != 0 {
            trace!("free array storage {}", self.capacity);
            unsafe { self.allocator.free(self.data, self.capacity) };
            self.data = NonNull::dangling();
            self.capacity = 0;
        }
    }

    /// Ensures `capacity >= capacity`, reallocating to exactly that amount.
    pub fn reserve(&mut self, capacity: usize) {
        if capacity > self.capacity {
            self.realloc(capacity);
        }
    }

    /// Makes room for `additional` more elements with policy slack.
    pub fn reserve_grow(&mut self, additional: usize) {
        let requested = self.size.checked_add(additional).unwrap_or_else(|| capacity_overflow());
        if requested > self.capacity {
            let new_capacity = self.allocator.get_grow::<T>(requested, self.capacity);
            self.realloc(new_capacity);
        }
    }

    /// Bumps the size by `additional`, returning the old size.
    ///
    /// # Safety
    /// The new `[old_size, old_size + additional)` slots are uninitialized; the caller
    /// must write them before the array is read or dropped.
    pub unsafe fn grow(&mut self, additional: usize) -> usize {
        self.reserve_grow(additional);
        let old_size = self.size;
        self.size += additional;
        old_size
    }

    /// Reallocates down to the allocator's shrink target, freeing when empty.
    pub fn shrink(&mut self) {
        let new_capacity = self.allocator.get_shrink::<T>(self.size, self.capacity);
        if new_capacity < self.capacity {
            debug!("shrink array storage {} -> {}", self.capacity, new_capacity);
            self.realloc(new_capacity);
        }
    }

    /// Destructs all elements, then frees or reallocates to `capacity`.
    pub fn release(&mut self, capacity: usize) {
        self.clear();
        if capacity == 0 {
            self.free();
        } else {
            self.realloc(capacity);
        }
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }

    pub fn truncate(&mut self, len: usize) {
        if len >= self.size {
            return;
        }
        let tail = self.size - len;
        self.size = len;
        unsafe { memops::destruct(self.data.as_ptr().add(len), tail) };
    }
}

impl<T, A: Allocator> Drop for RawArray<T, A> {
    fn drop(&mut self) {
        self.clear();
        self.free();
    }
}
