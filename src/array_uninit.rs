use crate::allocator::Allocator;
use crate::data_ref::DataRef;
use crate::memops;
use crate::raw_array::RawArray;
use std::mem::{ManuallyDrop, MaybeUninit};
use std::ptr;

/// A reserved, not yet written position inside an `Array`.
///
/// The elements behind the slot are hidden from the array until `write` is
/// called, so nothing can observe the hole. Dropping the slot unwritten closes
/// the gap again. Leaking it leaks the hidden tail instead of exposing it.
pub struct VacantSlot<'a, T, A: Allocator> {
    raw: &'a mut RawArray<T, A>,
    index: usize,
    size: usize,
}

impl<'a, T, A: Allocator> VacantSlot<'a, T, A> {
    pub(crate) fn new(raw: &'a mut RawArray<T, A>, index: usize) -> VacantSlot<'a, T, A> {
        let old_size = raw.size();
        assert!(index <= old_size, "vacant slot index {} out of range {}", index, old_size);
        unsafe {
            raw.grow(1);
            let data = raw.data_mut();
            memops::relocate(data.add(index + 1), data.add(index), old_size - index);
            raw.set_size(index);
        }
        VacantSlot { raw, index, size: old_size + 1 }
    }

    #[inline(always)]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Writes the value into the slot and makes the tail visible again.
    pub fn write(self, value: T) -> DataRef<'a, T> {
        let this = ManuallyDrop::new(self);
        let index = this.index;
        let size = this.size;
        unsafe {
            let raw: &'a mut RawArray<T, A> = ptr::read(&this.raw);
            let slot = raw.data_mut().add(index);
            ptr::write(slot, value);
            raw.set_size(size);
            DataRef::new(&mut *slot, index)
        }
    }
}

impl<'a, T, A: Allocator> Drop for VacantSlot<'a, T, A> {
    fn drop(&mut self) {
        unsafe {
            let data = self.raw.data_mut();
            memops::relocate(data.add(self.index), data.add(self.index + 1), self.size - 1 - self.index);
            self.raw.set_size(self.size - 1);
        }
    }
}

/// Helper returned by `Array::resize_unsafe` to initialize the new tail in place.
///
/// The array only grows by what has been written, so partially initialized
/// tails are never visible. Whatever was written stays when the helper is dropped.
pub struct ArrayInitializer<'a, T, A: Allocator> {
    raw: &'a mut RawArray<T, A>,
    target: usize,
}

impl<'a, T, A: Allocator> ArrayInitializer<'a, T, A> {
    pub(crate) fn new(raw: &'a mut RawArray<T, A>, target: usize) -> ArrayInitializer<'a, T, A> {
        if target > raw.size() {
            raw.reserve_grow(target - raw.size());
        } else {
            raw.truncate(target);
        }
        ArrayInitializer { raw, target }
    }

    /// Number of initialized items.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.raw.size()
    }

    #[inline(always)]
    pub fn target(&self) -> usize {
        self.target
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.target - self.raw.size()
    }

    #[inline(always)]
    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    pub fn push(&mut self, value: T) {
        assert!(!self.is_complete(), "initializer is already complete");
        unsafe {
            let size = self.raw.size();
            ptr::write(self.raw.data_mut().add(size), value);
            self.raw.set_size(size + 1);
        }
    }

    /// The not yet initialized part of the tail.
    pub fn uninit(&mut self) -> &mut [MaybeUninit<T>] {
        let size = self.raw.size();
        let remaining = self.target - size;
        unsafe { std::slice::from_raw_parts_mut(self.raw.data_mut().add(size) as *mut MaybeUninit<T>, remaining) }
    }

    /// Marks the first `count` items of `uninit()` as initialized.
    ///
    /// # Safety
    /// Those items must have been written.
    pub unsafe fn assume_init(&mut self, count: usize) {
        assert!(count <= self.remaining(), "assume_init past the target size");
        let size = self.raw.size();
        self.raw.set_size(size + count);
    }

    /// Initializes the rest of the tail from `f(index)` and returns the final size.
    pub fn fill_with<F: FnMut(usize) -> T>(mut self, mut f: F) -> usize {
        while !self.is_complete() {
            let index = self.raw.size();
            self.push(f(index));
        }
        self.target
    }

    pub fn finish(self) -> usize {
        self.raw.size()
    }
}

#[cfg(test)]
mod array_uninit_tests {
    use crate::dropflag::{counter, Counted};
    use crate::Array;

    #[test]
    fn vacant_slot_write_shifts_tail() {
        let mut array: Array<i32> = Array::from([1, 2, 4]);
        {
            let slot = array.add_at_unsafe(2);
            assert_eq!(2, slot.index());
            let data_ref = slot.write(3);
            assert_eq!(Some(&3), data_ref.get());
        }
        assert_eq!(array, [1, 2, 3, 4]);
    }

    #[test]
    fn dropped_vacant_slot_restores_array() {
        let drops = counter();
        let mut array: Array<Counted> = Array::new();
        for i in 0..4 {
            array.add(Counted::new(i, &drops));
        }
        drop(array.add_at_unsafe(1));
        assert_eq!(4, array.len());
        assert_eq!(vec![0, 1, 2, 3], array.iter().map(|c| c.key).collect::<Vec<_>>());
        assert_eq!(0, *drops.borrow());
    }

    #[test]
    fn leaked_vacant_slot_hides_tail() {
        let mut array: Array<u8> = Array::from([1, 2, 3]);
        std::mem::forget(array.add_at_unsafe(1));
        assert_eq!(array, [1]);
    }

    #[test]
    fn initializer_grows_only_by_written_items() {
        let mut array: Array<String> = Array::new();
        array.add("a".to_string());
        {
            let mut init = array.resize_unsafe(4);
            assert_eq!(3, init.remaining());
            init.push("b".to_string());
            assert_eq!(2, init.len());
        }
        assert_eq!(2, array.len());

        let size = array.resize_unsafe(4).fill_with(|i| i.to_string());
        assert_eq!(4, size);
        assert_eq!(array, ["a", "b", "2", "3"]);
    }

    #[test]
    fn initializer_uninit_then_assume() {
        let mut array: Array<u32> = Array::new();
        let mut init = array.resize_unsafe(3);
        for (i, item) in init.uninit().iter_mut().enumerate() {
            item.write(i as u32 * 2);
        }
        unsafe { init.assume_init(3) };
        assert!(init.is_complete());
        assert_eq!(3, init.finish());
        assert_eq!(array, [0, 2, 4]);
    }

    #[test]
    fn initializer_shrinks_when_target_smaller() {
        let mut array: Array<u32> = Array::from([1, 2, 3, 4]);
        assert_eq!(2, array.resize_unsafe(2).finish());
        assert_eq!(array, [1, 2]);
    }
}
