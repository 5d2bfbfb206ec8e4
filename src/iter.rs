//! Iterators over the live values of a `SparseArray`, skipping holes.

use crate::allocator::Allocator;
use crate::bitmap::{self, TrueBitIter};
use crate::raw_sparse::RawSparseArray;
use crate::slot::Slot;
use std::marker::PhantomData;

/// Shared iterator over live values in index order.
pub struct Iter<'a, T> {
    slots: *const Slot<T>,
    bits: TrueBitIter<'a>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new<A: Allocator>(raw: &'a RawSparseArray<T, A>) -> Iter<'a, T> {
        Iter { slots: raw.slots_ptr(), bits: raw.occupied(), remaining: raw.len(), _marker: PhantomData }
    }

    /// Pairs every value with its slot index.
    pub fn indexed(self) -> Indexed<'a, T> {
        Indexed { inner: self }
    }

    #[inline(always)]
    fn value(&self, index: usize) -> &'a T {
        unsafe { (*self.slots.add(index)).value(true) }
    }
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter { slots: self.slots, bits: self.bits.clone(), remaining: self.remaining, _marker: PhantomData }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let index = self.bits.next()?;
        self.remaining -= 1;
        Some(self.value(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        let index = self.bits.next_back()?;
        self.remaining -= 1;
        Some(self.value(index))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

/// `(index, &value)` pairs of the live slots.
#[derive(Clone)]
pub struct Indexed<'a, T> {
    inner: Iter<'a, T>,
}

impl<'a, T> Iterator for Indexed<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<(usize, &'a T)> {
        let index = self.inner.bits.next()?;
        self.inner.remaining -= 1;
        Some((index, self.inner.value(index)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for Indexed<'a, T> {
    fn next_back(&mut self) -> Option<(usize, &'a T)> {
        let index = self.inner.bits.next_back()?;
        self.inner.remaining -= 1;
        Some((index, self.inner.value(index)))
    }
}

impl<'a, T> ExactSizeIterator for Indexed<'a, T> {}

/// Mutable iterator over live values in index order.
pub struct IterMut<'a, T> {
    slots: *mut Slot<T>,
    bits: TrueBitIter<'a>,
    remaining: usize,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new<A: Allocator>(raw: &'a mut RawSparseArray<T, A>) -> IterMut<'a, T> {
        let raw: &'a RawSparseArray<T, A> = raw;
        IterMut { slots: raw.slots_ptr(), bits: raw.occupied(), remaining: raw.len(), _marker: PhantomData }
    }

    #[inline(always)]
    fn value(&mut self, index: usize) -> &'a mut T {
        // every index comes out of the bit iterator once, so the references never alias
        unsafe { (*self.slots.add(index)).value_mut(true) }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        let index = self.bits.next()?;
        self.remaining -= 1;
        Some(self.value(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        let index = self.bits.next_back()?;
        self.remaining -= 1;
        Some(self.value(index))
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

/// Owning iterator; values not yet yielded are dropped with it.
pub struct IntoIter<T, A: Allocator> {
    raw: RawSparseArray<T, A>,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<T, A: Allocator> IntoIter<T, A> {
    pub(crate) fn new(raw: RawSparseArray<T, A>) -> IntoIter<T, A> {
        let back = raw.sparse_size();
        let remaining = raw.len();
        IntoIter { raw, front: 0, back, remaining }
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let index = bitmap::next_true(self.raw.bitmap(), self.front, self.back)?;
        self.front = index + 1;
        self.remaining -= 1;
        Some(unsafe { self.raw.take_unlinked(index) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        let index = bitmap::prev_true(self.raw.bitmap(), self.front, self.back)?;
        self.back = index;
        self.remaining -= 1;
        Some(unsafe { self.raw.take_unlinked(index) })
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}
