use crate::algo::sort;
use crate::allocator::{Allocator, HeapAllocator};
use crate::bitmap;
use crate::cursor::{SparseCursor, SparseCursorMut};
use crate::data_ref::{CDataRef, DataRef};
use crate::iter::{IntoIter, Iter, IterMut};
use crate::memops::{self, Zeroable};
use crate::raw_sparse::RawSparseArray;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Array whose live values keep their index when other values are added or removed.
///
/// Removing leaves a hole; holes are recycled by later adds, most recent first,
/// before the storage grows. Nothing is compacted unless asked. Indices stay
/// stable until a compaction or sort; references do not survive reallocation.
pub struct SparseArray<T, A: Allocator = HeapAllocator> {
    raw: RawSparseArray<T, A>,
}

/// Sequence-container name for `SparseArray`.
pub type SparseVector<T, A = HeapAllocator> = SparseArray<T, A>;

#[inline(always)]
fn less<T: PartialOrd>(a: &T, b: &T) -> bool {
    a < b
}

impl<T> SparseArray<T, HeapAllocator> {
    pub fn new() -> SparseArray<T, HeapAllocator> {
        SparseArray::new_in(())
    }

    pub fn with_capacity(capacity: usize) -> SparseArray<T, HeapAllocator> {
        SparseArray::with_capacity_in(capacity, ())
    }
}

impl<T, A: Allocator> SparseArray<T, A> {
    pub fn new_in(param: A::Param) -> SparseArray<T, A> {
        SparseArray { raw: RawSparseArray::new(A::new(param)) }
    }

    pub fn with_capacity_in(capacity: usize, param: A::Param) -> SparseArray<T, A> {
        let mut array = SparseArray::new_in(param);
        array.reserve(capacity);
        array
    }

    pub fn from_iter_in<I: IntoIterator<Item = T>>(iter: I, param: A::Param) -> SparseArray<T, A> {
        let mut array = SparseArray::new_in(param);
        array.extend(iter);
        array
    }

    // --- size and storage ---

    /// Number of live values.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// One past the highest slot ever handed out since the last compaction, holes included.
    #[inline(always)]
    pub fn sparse_size(&self) -> usize {
        self.raw.sparse_size()
    }

    #[inline(always)]
    pub fn hole_size(&self) -> usize {
        self.raw.hole_count()
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Values that can be added without reallocating.
    #[inline(always)]
    pub fn slack(&self) -> usize {
        self.raw.capacity() - self.raw.sparse_size() + self.raw.hole_count()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    #[inline(always)]
    pub fn allocator(&self) -> &A {
        self.raw.allocator()
    }

    pub fn has_data(&self, index: usize) -> bool {
        self.raw.is_occupied(index)
    }

    /// True for a free slot below `sparse_size`.
    pub fn is_hole(&self, index: usize) -> bool {
        index < self.raw.sparse_size() && !self.raw.is_occupied(index)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.raw.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.raw.get_mut(index)
    }

    /// Index of the first live value.
    pub fn first_index(&self) -> Option<usize> {
        self.raw.occupied().next()
    }

    /// Index of the last live value.
    pub fn last_index(&self) -> Option<usize> {
        self.raw.occupied().next_back()
    }

    pub fn reserve(&mut self, capacity: usize) {
        self.raw.reserve(capacity);
    }

    /// Trims trailing holes and gives memory back down to the allocator's shrink target.
    pub fn shrink(&mut self) {
        self.raw.shrink();
    }

    /// Drops all values, then keeps exactly `capacity` slots (freeing on 0).
    pub fn release(&mut self, capacity: usize) {
        self.raw.release(capacity);
    }

    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Moves the last values into the holes. Fast, but reorders.
    pub fn compact(&mut self) {
        self.raw.compact();
    }

    /// Closes the holes by shifting values down, keeping their order.
    pub fn compact_stable(&mut self) {
        self.raw.compact_stable();
    }

    /// Drops only the holes above the last live value.
    pub fn compact_top(&mut self) {
        self.raw.compact_top();
    }

    // --- add ---

    #[inline(always)]
    fn data_ref(&mut self, index: usize) -> DataRef<'_, T> {
        DataRef::new(unsafe { self.raw.get_unchecked_mut(index) }, index)
    }

    /// Adds into the most recently freed slot, or at the top when there is none.
    pub fn add(&mut self, value: T) -> DataRef<'_, T> {
        let index = self.raw.emplace(value);
        self.data_ref(index)
    }

    pub fn add_default(&mut self) -> DataRef<'_, T> where T: Default {
        self.add(T::default())
    }

    pub fn add_zeroed(&mut self) -> DataRef<'_, T> where T: Zeroable {
        let index = self.raw.acquire();
        unsafe {
            memops::construct_zeroed(self.raw.value_ptr(index), 1);
            self.raw.occupy(index);
        }
        self.data_ref(index)
    }

    /// Reserves room for one value without writing it.
    pub fn add_unsafe(&mut self) -> SparseVacantSlot<'_, T, A> {
        let index = self.raw.next_slot();
        SparseVacantSlot { raw: &mut self.raw, index }
    }

    pub fn emplace<F: FnOnce() -> T>(&mut self, f: F) -> DataRef<'_, T> {
        self.add_unsafe().write(f())
    }

    /// Adds at a specific free index, growing with holes when it lies past the end.
    ///
    /// Panics if the slot is occupied.
    pub fn add_at(&mut self, index: usize, value: T) -> DataRef<'_, T> {
        self.raw.emplace_at(index, value);
        self.data_ref(index)
    }

    pub fn add_unique(&mut self, value: T) -> DataRef<'_, T> where T: PartialEq {
        match self.iter().indexed().find(|(_, item)| **item == value) {
            Some((index, _)) => self.data_ref(index),
            None => self.add(value),
        }
    }

    /// Moves every value of `other` into this array, leaving `other` empty.
    pub fn append<B: Allocator>(&mut self, other: &mut SparseArray<T, B>) {
        let count = other.len();
        self.raw.reserve_grow(count.saturating_sub(self.raw.hole_count()));
        let source = &mut other.raw;
        let mut index = 0;
        while let Some(found) = bitmap::next_true(source.bitmap(), index, source.sparse_size()) {
            let value = unsafe { source.take_unlinked(found) };
            self.raw.emplace(value);
            index = found + 1;
        }
        source.clear();
    }

    // --- remove ---

    /// Drops `count` consecutive live values starting at `index`, leaving holes.
    ///
    /// Panics if any of them is already a hole.
    pub fn remove_at(&mut self, index: usize, count: usize) {
        self.raw.remove_at(index, count);
    }

    pub fn take_at(&mut self, index: usize) -> T {
        self.raw.take(index)
    }

    pub fn remove(&mut self, value: &T) -> bool where T: PartialEq {
        self.remove_if(|item| item == value)
    }

    pub fn remove_last(&mut self, value: &T) -> bool where T: PartialEq {
        self.remove_last_if(|item| item == value)
    }

    pub fn remove_all(&mut self, value: &T) -> usize where T: PartialEq {
        self.remove_all_if(|item| item == value)
    }

    pub fn remove_if<P: FnMut(&T) -> bool>(&mut self, mut pred: P) -> bool {
        match self.iter().indexed().find(|(_, item)| pred(item)) {
            Some((index, _)) => {
                self.raw.remove_at(index, 1);
                true
            },
            None => false,
        }
    }

    pub fn remove_last_if<P: FnMut(&T) -> bool>(&mut self, mut pred: P) -> bool {
        match self.iter().indexed().rev().find(|(_, item)| pred(item)) {
            Some((index, _)) => {
                self.raw.remove_at(index, 1);
                true
            },
            None => false,
        }
    }

    /// Removes every matching value, leaving holes. Returns the removed count.
    pub fn remove_all_if<P: FnMut(&T) -> bool>(&mut self, mut pred: P) -> usize {
        let mut removed = 0;
        let mut index = 0;
        while let Some(found) = bitmap::next_true(self.raw.bitmap(), index, self.raw.sparse_size()) {
            if pred(unsafe { self.raw.get_unchecked(found) }) {
                self.raw.remove_at(found, 1);
                removed += 1;
            }
            index = found + 1;
        }
        removed
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

    pub fn find_if<P: FnMut(&T) -> bool>(&self, mut pred: P) -> CDataRef<'_, T> {
        match self.iter().indexed().find(|(_, item)| pred(item)) {
            Some((index, item)) => CDataRef::new(item, index),
            None => CDataRef::npos(),
        }
    }

    pub fn find_if_mut<P: FnMut(&T) -> bool>(&mut self, mut pred: P) -> DataRef<'_, T> {
        match self.iter().indexed().find(|(_, item)| pred(item)) {
            Some((index, _)) => self.data_ref(index),
            None => DataRef::npos(),
        }
    }

    pub fn find_last_if<P: FnMut(&T) -> bool>(&self, mut pred: P) -> CDataRef<'_, T> {
        match self.iter().indexed().rev().find(|(_, item)| pred(item)) {
            Some((index, item)) => CDataRef::new(item, index),
            None => CDataRef::npos(),
        }
    }

    pub fn find_last_if_mut<P: FnMut(&T) -> bool>(&mut self, mut pred: P) -> DataRef<'_, T> {
        match self.iter().indexed().rev().find(|(_, item)| pred(item)) {
            Some((index, _)) => self.data_ref(index),
            None => DataRef::npos(),
        }
    }

    pub fn contains(&self, value: &T) -> bool where T: PartialEq {
        self.iter().any(|item| item == value)
    }

    pub fn contains_if<P: FnMut(&T) -> bool>(&self, pred: P) -> bool {
        self.iter().any(pred)
    }

    pub fn count_if<P: FnMut(&T) -> bool>(&self, mut pred: P) -> usize {
        self.iter().filter(|item| pred(item)).count()
    }

    // --- sort ---

    /// Compacts, then sorts the dense values (intro sort). Indices are reassigned.
    pub fn sort(&mut self) where T: PartialOrd {
        self.sort_by(less);
    }

    pub fn sort_by<F: FnMut(&T, &T) -> bool>(&mut self, mut less: F) {
        self.raw.compact();
        let slots = self.raw.dense_slots_mut();
        sort::intro_sort_by(slots, |a, b| unsafe { less(a.value(true), b.value(true)) });
    }

    /// Compacts keeping order, then merge sorts, so equal values keep their relative order.
    pub fn sort_stable(&mut self) where T: PartialOrd {
        self.sort_stable_by(less);
    }

    pub fn sort_stable_by<F: FnMut(&T, &T) -> bool>(&mut self, mut less: F) {
        self.raw.compact_stable();
        let slots = self.raw.dense_slots_mut();
        sort::merge_sort_by(slots, |a, b| unsafe { less(a.value(true), b.value(true)) });
    }

    // --- iteration ---

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.raw)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(&mut self.raw)
    }

    /// Cursor positioned on the first live value.
    pub fn cursor(&self) -> SparseCursor<'_, T, A> {
        SparseCursor::new(self)
    }

    /// Mutable cursor positioned on the first live value; can erase while iterating.
    pub fn cursor_mut(&mut self) -> SparseCursorMut<'_, T, A> {
        SparseCursorMut::new(self)
    }

    pub(crate) fn raw(&self) -> &RawSparseArray<T, A> {
        &self.raw
    }
}

/// The slot the next add into a `SparseArray` will use, not yet written.
///
/// The storage is untouched until `write`, so dropping or forgetting the
/// handle leaves the array exactly as it was.
pub struct SparseVacantSlot<'a, T, A: Allocator> {
    raw: &'a mut RawSparseArray<T, A>,
    index: usize,
}

impl<'a, T, A: Allocator> SparseVacantSlot<'a, T, A> {
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn write(self, value: T) -> DataRef<'a, T> {
        let SparseVacantSlot { raw, index } = self;
        let acquired = raw.acquire();
        debug_assert_eq!(index, acquired, "vacant slot moved before write");
        unsafe {
            raw.value_ptr(index).write(value);
            raw.occupy(index);
            DataRef::new(raw.get_unchecked_mut(index), index)
        }
    }
}

impl<T, A: Allocator> Default for SparseArray<T, A> {
    fn default() -> Self {
        SparseArray::new_in(A::Param::default())
    }
}

impl<T, A: Allocator> Index<usize> for SparseArray<T, A> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.raw.get(index) {
            Some(value) => value,
            None => panic!("sparse index {} is not live (sparse size {})", index, self.raw.sparse_size()),
        }
    }
}

impl<T, A: Allocator> IndexMut<usize> for SparseArray<T, A> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let sparse_size = self.raw.sparse_size();
        match self.raw.get_mut(index) {
            Some(value) => value,
            None => panic!("sparse index {} is not live (sparse size {})", index, sparse_size),
        }
    }
}

impl<T: Clone, A: Allocator + Clone> Clone for SparseArray<T, A> {
    fn clone(&self) -> Self {
        SparseArray { raw: self.raw.clone_with(self.raw.allocator().clone()) }
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for SparseArray<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter().indexed()).finish()
    }
}

/// Equal when the same indices are live and hold equal values; holes are not compared.
impl<T: PartialEq<U>, U, A: Allocator, B: Allocator> PartialEq<SparseArray<U, B>> for SparseArray<T, A> {
    fn eq(&self, other: &SparseArray<U, B>) -> bool {
        self.len() == other.len()
            && self.iter().indexed().zip(other.iter().indexed()).all(|((i, a), (j, b))| i == j && a == b)
    }
}

impl<T: Eq, A: Allocator> Eq for SparseArray<T, A> {}

impl<T, A: Allocator> Extend<T> for SparseArray<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.raw.reserve_grow(lower.saturating_sub(self.raw.hole_count()));
        for item in iter {
            self.raw.emplace(item);
        }
    }
}

impl<T, A: Allocator> std::iter::FromIterator<T> for SparseArray<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        SparseArray::from_iter_in(iter, A::Param::default())
    }
}

impl<T, A: Allocator, const N: usize> From<[T; N]> for SparseArray<T, A> {
    fn from(values: [T; N]) -> Self {
        SparseArray::from_iter_in(values, A::Param::default())
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a SparseArray<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut SparseArray<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T, A: Allocator> IntoIterator for SparseArray<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        let SparseArray { raw } = self;
        IntoIter::new(raw)
    }
}
