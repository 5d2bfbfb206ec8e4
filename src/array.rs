use crate::algo::{heap, remove, sort};
use crate::allocator::{Allocator, HeapAllocator};
use crate::array_uninit::{ArrayInitializer, VacantSlot};
use crate::cursor::{ArrayCursor, ArrayCursorMut};
use crate::data_ref::{CDataRef, DataRef};
use crate::memops::{self, Zeroable};
use crate::raw_array::RawArray;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr;

/// Growable contiguous array that owns its allocator.
///
/// Dereferences to a slice, so all read-only slice methods are available.
/// Indices handed out by add/find are invalidated by any shifting insert or
/// removal and by every capacity change.
pub struct Array<T, A: Allocator = HeapAllocator> {
    raw: RawArray<T, A>,
}

/// Sequence-container name for `Array`.
pub type Vector<T, A = HeapAllocator> = Array<T, A>;

#[inline(always)]
fn less<T: PartialOrd>(a: &T, b: &T) -> bool {
    a < b
}

impl<T> Array<T, HeapAllocator> {
    pub fn new() -> Array<T, HeapAllocator> {
        Array::new_in(())
    }

    pub fn with_capacity(capacity: usize) -> Array<T, HeapAllocator> {
        Array::with_capacity_in(capacity, ())
    }
}

impl<T, A: Allocator> Array<T, A> {
    pub fn new_in(param: A::Param) -> Array<T, A> {
        Array { raw: RawArray::new(A::new(param)) }
    }

    pub fn with_capacity_in(capacity: usize, param: A::Param) -> Array<T, A> {
        let mut array = Array::new_in(param);
        array.reserve(capacity);
        array
    }

    /// `size` default-constructed items.
    pub fn with_size_in(size: usize, param: A::Param) -> Array<T, A> where T: Default {
        let mut array = Array::with_capacity_in(size, param);
        array.resize_default(size);
        array
    }

    /// `size` clones of `value`.
    pub fn filled_in(size: usize, value: &T, param: A::Param) -> Array<T, A> where T: Clone {
        let mut array = Array::with_capacity_in(size, param);
        array.add_filled(value, size);
        array
    }

    pub fn from_slice_in(values: &[T], param: A::Param) -> Array<T, A> where T: Clone {
        let mut array = Array::with_capacity_in(values.len(), param);
        array.append_slice(values);
        array
    }

    pub fn from_iter_in<I: IntoIterator<Item = T>>(iter: I, param: A::Param) -> Array<T, A> {
        let mut array = Array::new_in(param);
        array.extend(iter);
        array
    }

    /// Literal-list construction.
    pub fn from_array_in<const N: usize>(values: [T; N], param: A::Param) -> Array<T, A> {
        let mut array = Array::with_capacity_in(N, param);
        let values = std::mem::ManuallyDrop::new(values);
        unsafe {
            memops::relocate_nonoverlapping(array.raw.data_mut(), values.as_ptr(), N);
            array.raw.set_size(N);
        }
        array
    }

    // --- size and storage ---

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.raw.size()
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Items that fit without reallocating.
    #[inline(always)]
    pub fn slack(&self) -> usize {
        self.raw.capacity() - self.raw.size()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.raw.size() == 0
    }

    #[inline(always)]
    pub fn allocator(&self) -> &A {
        self.raw.allocator()
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        self.raw.as_slice()
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.raw.as_mut_slice()
    }

    /// Grows capacity to exactly `capacity` if it is smaller.
    pub fn reserve(&mut self, capacity: usize) {
        self.raw.reserve(capacity);
    }

    /// Shrinks capacity to the allocator's target for the current size.
    pub fn shrink(&mut self) {
        self.raw.shrink();
    }

    /// Drops every item, then frees the block or reallocates it to `capacity`.
    pub fn release(&mut self, capacity: usize) {
        self.raw.release(capacity);
    }

    /// Drops every item and keeps the capacity.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    pub fn truncate(&mut self, len: usize) {
        self.raw.truncate(len);
    }

    // --- resize ---

    /// Resizes to `size`, filling new items with clones of `value`.
    pub fn resize(&mut self, size: usize, value: T) where T: Clone {
        let len = self.len();
        if size > len {
            self.add_filled(&value, size - len);
        } else {
            self.truncate(size);
        }
    }

    pub fn resize_default(&mut self, size: usize) where T: Default {
        let len = self.len();
        if size > len {
            unsafe {
                self.raw.reserve_grow(size - len);
                memops::construct_default(self.raw.data_mut().add(len), size - len);
                self.raw.set_size(size);
            }
        } else {
            self.truncate(size);
        }
    }

    pub fn resize_zeroed(&mut self, size: usize) where T: Zeroable {
        let len = self.len();
        if size > len {
            unsafe {
                self.raw.reserve_grow(size - len);
                memops::construct_zeroed(self.raw.data_mut().add(len), size - len);
                self.raw.set_size(size);
            }
        } else {
            self.truncate(size);
        }
    }

    /// Resizes without initializing: the returned helper writes the new tail
    /// and the array grows only by what gets written.
    pub fn resize_unsafe(&mut self, size: usize) -> ArrayInitializer<'_, T, A> {
        ArrayInitializer::new(&mut self.raw, size)
    }

    // --- add ---

    #[inline(always)]
    fn data_ref(&mut self, index: usize) -> DataRef<'_, T> {
        DataRef::new(unsafe { &mut *self.raw.data_mut().add(index) }, index)
    }

    pub fn add(&mut self, value: T) -> DataRef<'_, T> {
        let index = unsafe {
            let index = self.raw.grow(1);
            ptr::write(self.raw.data_mut().add(index), value);
            index
        };
        self.data_ref(index)
    }

    pub fn add_default(&mut self) -> DataRef<'_, T> where T: Default {
        self.add(T::default())
    }

    pub fn add_zeroed(&mut self) -> DataRef<'_, T> where T: Zeroable {
        let index = unsafe {
            let index = self.raw.grow(1);
            memops::construct_zeroed(self.raw.data_mut().add(index), 1);
            index
        };
        self.data_ref(index)
    }

    /// Adds `value` unless an equal item exists; returns the item either way.
    pub fn add_unique(&mut self, value: T) -> DataRef<'_, T> where T: PartialEq {
        match self.iter().position(|item| *item == value) {
            Some(index) => self.data_ref(index),
            None => self.add(value),
        }
    }

    /// Appends `count` clones of `value`, returning the first one.
    pub fn add_filled(&mut self, value: &T, count: usize) -> DataRef<'_, T> where T: Clone {
        if count == 0 {
            return DataRef::npos();
        }
        let len = self.len();
        unsafe {
            self.raw.reserve_grow(count);
            memops::construct_fill(self.raw.data_mut().add(len), count, value);
            self.raw.set_size(len + count);
        }
        self.data_ref(len)
    }

    /// Reserves the next position without writing it.
    pub fn add_unsafe(&mut self) -> VacantSlot<'_, T, A> {
        let len = self.len();
        VacantSlot::new(&mut self.raw, len)
    }

    /// Constructs the new item in place from `f`.
    pub fn emplace<F: FnOnce() -> T>(&mut self, f: F) -> DataRef<'_, T> {
        self.add_unsafe().write(f())
    }

    pub fn add_at(&mut self, index: usize, value: T) -> DataRef<'_, T> {
        self.add_at_unsafe(index).write(value)
    }

    pub fn add_at_default(&mut self, index: usize) -> DataRef<'_, T> where T: Default {
        self.add_at(index, T::default())
    }

    /// Opens a gap at `index`, shifting the tail up.
    pub fn add_at_unsafe(&mut self, index: usize) -> VacantSlot<'_, T, A> {
        VacantSlot::new(&mut self.raw, index)
    }

    pub fn emplace_at<F: FnOnce() -> T>(&mut self, index: usize, f: F) -> DataRef<'_, T> {
        self.add_at_unsafe(index).write(f())
    }

    pub fn append_slice(&mut self, values: &[T]) where T: Clone {
        let len = self.len();
        unsafe {
            self.raw.reserve_grow(values.len());
            memops::copy(self.raw.data_mut().add(len), values.as_ptr(), values.len());
            self.raw.set_size(len + values.len());
        }
    }

    /// Moves every item of `other` to the end of this array, leaving `other` empty.
    pub fn append<B: Allocator>(&mut self, other: &mut Array<T, B>) {
        let len = self.len();
        let count = other.len();
        unsafe {
            self.raw.reserve_grow(count);
            memops::relocate_nonoverlapping(self.raw.data_mut().add(len), other.raw.data(), count);
            other.raw.set_size(0);
            self.raw.set_size(len + count);
        }
    }

    pub fn add_at_slice(&mut self, index: usize, values: &[T]) where T: Clone {
        let len = self.len();
        assert!(index <= len, "add_at_slice index {} out of range {}", index, len);
        let count = values.len();
        unsafe {
            self.raw.reserve_grow(count);
            let data = self.raw.data_mut();
            memops::relocate(data.add(index + count), data.add(index), len - index);
            self.raw.set_size(index);
            memops::copy(data.add(index), values.as_ptr(), count);
            self.raw.set_size(len + count);
        }
    }

    // --- remove ---

    /// Removes `count` items starting at `index`, keeping the order of the rest.
    pub fn remove_at(&mut self, index: usize, count: usize) {
        let len = self.len();
        assert!(index <= len && count <= len - index, "remove_at range {}+{} out of range {}", index, count, len);
        unsafe {
            let data = self.raw.data_mut();
            self.raw.set_size(index);
            memops::destruct(data.add(index), count);
            memops::relocate(data.add(index), data.add(index + count), len - index - count);
            self.raw.set_size(len - count);
        }
    }

    /// Removes `count` items starting at `index`, filling the gap from the end.
    pub fn remove_at_swap(&mut self, index: usize, count: usize) {
        let len = self.len();
        assert!(index <= len && count <= len - index, "remove_at_swap range {}+{} out of range {}", index, count, len);
        let moved = count.min(len - index - count);
        unsafe {
            let data = self.raw.data_mut();
            self.raw.set_size(index);
            memops::destruct(data.add(index), count);
            memops::relocate_nonoverlapping(data.add(index), data.add(len - moved), moved);
            self.raw.set_size(len - count);
        }
    }

    /// Removes and returns the item at `index`, keeping order.
    pub fn take_at(&mut self, index: usize) -> T {
        let len = self.len();
        assert!(index < len, "take_at index {} out of range {}", index, len);
        unsafe {
            let data = self.raw.data_mut();
            let value = ptr::read(data.add(index));
            memops::relocate(data.add(index), data.add(index + 1), len - index - 1);
            self.raw.set_size(len - 1);
            value
        }
    }

    /// Removes and returns the item at `index`, moving the last item into its place.
    pub fn take_at_swap(&mut self, index: usize) -> T {
        let len = self.len();
        assert!(index < len, "take_at_swap index {} out of range {}", index, len);
        unsafe {
            let data = self.raw.data_mut();
            let value = ptr::read(data.add(index));
            if index != len - 1 {
                memops::relocate_nonoverlapping(data.add(index), data.add(len - 1), 1);
            }
            self.raw.set_size(len - 1);
            value
        }
    }

    pub fn remove(&mut self, value: &T) -> bool where T: PartialEq {
        self.remove_if(|item| item == value)
    }

    pub fn remove_swap(&mut self, value: &T) -> bool where T: PartialEq {
        self.remove_if_swap(|item| item == value)
    }

    pub fn remove_last(&mut self, value: &T) -> bool where T: PartialEq {
        self.remove_last_if(|item| item == value)
    }

    pub fn remove_last_swap(&mut self, value: &T) -> bool where T: PartialEq {
        self.remove_last_if_swap(|item| item == value)
    }

    /// Removes every item equal to `value`, keeping order. Returns the removed count.
    pub fn remove_all(&mut self, value: &T) -> usize where T: PartialEq {
        self.remove_all_if(|item| item == value)
    }

    pub fn remove_all_swap(&mut self, value: &T) -> usize where T: PartialEq {
        self.remove_all_if_swap(|item| item == value)
    }

    pub fn remove_if<P: FnMut(&T) -> bool>(&mut self, pred: P) -> bool {
        match self.iter().position(pred) {
            Some(index) => {
                self.remove_at(index, 1);
                true
            },
            None => false,
        }
    }

    pub fn remove_if_swap<P: FnMut(&T) -> bool>(&mut self, pred: P) -> bool {
        match self.iter().position(pred) {
            Some(index) => {
                self.remove_at_swap(index, 1);
                true
            },
            None => false,
        }
    }

    pub fn remove_last_if<P: FnMut(&T) -> bool>(&mut self, pred: P) -> bool {
        match self.iter().rposition(pred) {
            Some(index) => {
                self.remove_at(index, 1);
                true
            },
            None => false,
        }
    }

    pub fn remove_last_if_swap<P: FnMut(&T) -> bool>(&mut self, pred: P) -> bool {
        match self.iter().rposition(pred) {
            Some(index) => {
                self.remove_at_swap(index, 1);
                true
            },
            None => false,
        }
    }

    pub fn remove_all_if<P: FnMut(&T) -> bool>(&mut self, pred: P) -> usize {
        let len = self.len();
        let kept = remove::remove_all(self.as_mut_slice(), pred);
        self.truncate(kept);
        len - kept
    }

    /// Like `remove_all_if` but fills gaps from the end; the order of kept items is lost.
    pub fn remove_all_if_swap<P: FnMut(&T) -> bool>(&mut self, pred: P) -> usize {
        let len = self.len();
        let kept = remove::remove_all_swap(self.as_mut_slice(), pred);
        self.truncate(kept);
        len - kept
    }

    // --- find ---

    pub fn find(&self, value: &T) -> CDataRef<'_, T> where T: PartialEq {
        self.find_if(|item| item == value)
    }

    pub fn find_mut(&mut self, value: &T) -> DataRef<'_, T> where T: PartialEq {
        self.find_if_mut(|item| item == value)
    }

    pub fn find_last(&self, value: &T) -> CDataRef<'_, T> where T: PartialEq {
        self.find_last_if(|item| item == value)
    }

    pub fn find_last_mut(&mut self, value: &T) -> DataRef<'_, T> where T: PartialEq {
        self.find_last_if_mut(|item| item == value)
    }

    pub fn find_if<P: FnMut(&T) -> bool>(&self, pred: P) -> CDataRef<'_, T> {
        match self.iter().position(pred) {
            Some(index) => CDataRef::new(&self[index], index),
            None => CDataRef::npos(),
        }
    }

    pub fn find_if_mut<P: FnMut(&T) -> bool>(&mut self, pred: P) -> DataRef<'_, T> {
        match self.iter().position(pred) {
            Some(index) => self.data_ref(index),
            None => DataRef::npos(),
        }
    }

    pub fn find_last_if<P: FnMut(&T) -> bool>(&self, pred: P) -> CDataRef<'_, T> {
        match self.iter().rposition(pred) {
            Some(index) => CDataRef::new(&self[index], index),
            None => CDataRef::npos(),
        }
    }

    pub fn find_last_if_mut<P: FnMut(&T) -> bool>(&mut self, pred: P) -> DataRef<'_, T> {
        match self.iter().rposition(pred) {
            Some(index) => self.data_ref(index),
            None => DataRef::npos(),
        }
    }

    pub fn contains_if<P: FnMut(&T) -> bool>(&self, pred: P) -> bool {
        self.iter().any(pred)
    }

    pub fn count_if<P: FnMut(&T) -> bool>(&self, mut pred: P) -> usize {
        self.iter().filter(|item| pred(item)).count()
    }

    // --- sort ---

    /// Unstable sort (intro sort).
    pub fn sort(&mut self) where T: PartialOrd {
        sort::intro_sort_by(self.as_mut_slice(), less);
    }

    pub fn sort_by<F: FnMut(&T, &T) -> bool>(&mut self, less: F) {
        sort::intro_sort_by(self.as_mut_slice(), less);
    }

    /// Stable, allocation-free sort (in-place merge sort).
    pub fn sort_stable(&mut self) where T: PartialOrd {
        sort::merge_sort_by(self.as_mut_slice(), less);
    }

    pub fn sort_stable_by<F: FnMut(&T, &T) -> bool>(&mut self, less: F) {
        sort::merge_sort_by(self.as_mut_slice(), less);
    }

    // --- heap ---

    /// Rearranges the items into a min-heap.
    pub fn heapify(&mut self) where T: PartialOrd {
        heap::heapify_by(self.as_mut_slice(), less);
    }

    pub fn heapify_by<F: FnMut(&T, &T) -> bool>(&mut self, less: F) {
        heap::heapify_by(self.as_mut_slice(), less);
    }

    pub fn is_heap(&self) -> bool where T: PartialOrd {
        heap::is_heap_by(self.as_slice(), less)
    }

    pub fn is_heap_by<F: FnMut(&T, &T) -> bool>(&self, less: F) -> bool {
        heap::is_heap_by(self.as_slice(), less)
    }

    pub fn heap_top(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Adds `value` and sifts it up. Returns its final index.
    pub fn heap_push(&mut self, value: T) -> usize where T: PartialOrd {
        self.heap_push_by(value, less)
    }

    pub fn heap_push_by<F: FnMut(&T, &T) -> bool>(&mut self, value: T, less: F) -> usize {
        let index = self.add(value).index();
        heap::sift_up_by(self.as_mut_slice(), index, less)
    }

    /// Removes the top item.
    pub fn heap_pop(&mut self) where T: PartialOrd {
        self.heap_pop_get_by(less);
    }

    pub fn heap_pop_by<F: FnMut(&T, &T) -> bool>(&mut self, less: F) {
        self.heap_pop_get_by(less);
    }

    /// Removes and returns the top (smallest) item.
    pub fn heap_pop_get(&mut self) -> Option<T> where T: PartialOrd {
        self.heap_pop_get_by(less)
    }

    pub fn heap_pop_get_by<F: FnMut(&T, &T) -> bool>(&mut self, less: F) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        heap::heap_pop_by(self.as_mut_slice(), less);
        self.pop_get()
    }

    /// Removes the item at `index` and restores the heap.
    pub fn heap_remove_at(&mut self, index: usize) where T: PartialOrd {
        self.heap_remove_at_by(index, less);
    }

    pub fn heap_remove_at_by<F: FnMut(&T, &T) -> bool>(&mut self, index: usize, less: F) {
        let len = self.len();
        assert!(index < len, "heap_remove_at index {} out of range {}", index, len);
        heap::heap_remove_at_by(self.as_mut_slice(), index, less);
        self.pop();
    }

    /// Sorts ascending with heap sort.
    pub fn heap_sort(&mut self) where T: PartialOrd {
        heap::heap_sort_by(self.as_mut_slice(), less);
    }

    pub fn heap_sort_by<F: FnMut(&T, &T) -> bool>(&mut self, less: F) {
        heap::heap_sort_by(self.as_mut_slice(), less);
    }

    // --- stack ---

    pub fn push(&mut self, value: T) {
        self.add(value);
    }

    /// Drops the last item, if any.
    pub fn pop(&mut self) {
        let len = self.len();
        if len > 0 {
            self.truncate(len - 1);
        }
    }

    pub fn pop_get(&mut self) -> Option<T> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        unsafe {
            self.raw.set_size(len - 1);
            Some(ptr::read(self.raw.data().add(len - 1)))
        }
    }

    pub fn top(&self) -> Option<&T> {
        self.as_slice().last()
    }

    pub fn top_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    // --- cursors ---

    /// Cursor positioned on the first item.
    pub fn cursor(&self) -> ArrayCursor<'_, T> {
        ArrayCursor::new(self.as_slice())
    }

    /// Mutable cursor positioned on the first item; can erase while iterating.
    pub fn cursor_mut(&mut self) -> ArrayCursorMut<'_, T, A> {
        ArrayCursorMut::new(self)
    }
}

impl<T, A: Allocator> Default for Array<T, A> {
    fn default() -> Self {
        Array::new_in(A::Param::default())
    }
}

impl<T, A: Allocator> Deref for Array<T, A> {
    type Target = [T];

    #[inline(always)]
    fn deref(&self) -> &[T] {
        self.raw.as_slice()
    }
}

impl<T, A: Allocator> DerefMut for Array<T, A> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut [T] {
        self.raw.as_mut_slice()
    }
}

impl<T: Clone, A: Allocator + Clone> Clone for Array<T, A> {
    fn clone(&self) -> Self {
        let mut array = Array { raw: RawArray::new(self.raw.allocator().clone()) };
        array.reserve(self.len());
        array.append_slice(self.as_slice());
        array
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.reserve(source.len());
        self.append_slice(source.as_slice());
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for Array<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq<U>, U, A: Allocator, B: Allocator> PartialEq<Array<U, B>> for Array<T, A> {
    fn eq(&self, other: &Array<U, B>) -> bool {
        self.len() == other.len() && unsafe { memops::compare(self.raw.data(), other.raw.data(), self.len()) }
    }
}

impl<T: Eq, A: Allocator> Eq for Array<T, A> {}

impl<T: PartialEq<U>, U, A: Allocator> PartialEq<[U]> for Array<T, A> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U, A: Allocator, const N: usize> PartialEq<[U; N]> for Array<T, A> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == &other[..]
    }
}

impl<T, A: Allocator> Extend<T> for Array<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.raw.reserve_grow(lower);
        for item in iter {
            self.add(item);
        }
    }
}

impl<'a, T: Copy + 'a, A: Allocator> Extend<&'a T> for Array<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, A: Allocator> std::iter::FromIterator<T> for Array<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Array::from_iter_in(iter, A::Param::default())
    }
}

impl<T, A: Allocator, const N: usize> From<[T; N]> for Array<T, A> {
    fn from(values: [T; N]) -> Self {
        Array::from_array_in(values, A::Param::default())
    }
}

impl<T: Clone, A: Allocator> From<&[T]> for Array<T, A> {
    fn from(values: &[T]) -> Self {
        Array::from_slice_in(values, A::Param::default())
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a Array<T, A> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut Array<T, A> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T, A: Allocator> IntoIterator for Array<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        let Array { mut raw } = self;
        let back = raw.size();
        unsafe { raw.set_size(0) };
        IntoIter { raw, front: 0, back }
    }
}

/// Owning iterator of an `Array`.
pub struct IntoIter<T, A: Allocator> {
    raw: RawArray<T, A>,
    front: usize,
    back: usize,
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        let index = self.front;
        self.front += 1;
        Some(unsafe { ptr::read(self.raw.data().add(index)) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(unsafe { ptr::read(self.raw.data().add(self.back)) })
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        let front = self.front;
        let remaining = self.back - front;
        self.front = self.back;
        unsafe { memops::destruct(self.raw.data_mut().add(front), remaining) };
    }
}
