/*!

Bidirectional cursors over arrays and sparse arrays.

A cursor sits on one element, or on one of two boundary positions: before the
first element (`reach_begin`, index `NPOS`) or past the last one (`reach_end`).
On a boundary `get` returns `None`. Moving from a boundary back into the range
makes the cursor valid again.

`Forward` and `Inverse` wrap any cursor to fix a traversal direction, so the same
loop walks either way. Wrapped shared cursors are also iterators.

*/

use crate::allocator::Allocator;
use crate::array::Array;
use crate::bitmap;
use crate::data_ref::NPOS;
use crate::sparse_array::SparseArray;
use std::ptr;

pub trait Cursor {
    type Item;

    fn get(&self) -> Option<&Self::Item>;

    /// Index of the current element; `NPOS` before the beginning.
    fn index(&self) -> usize;

    fn move_next(&mut self);

    fn move_prev(&mut self);

    /// Moves to the first element, or past the end when there is none.
    fn reset_to_begin(&mut self);

    /// Moves to the last element, or before the beginning when there is none.
    fn reset_to_end(&mut self);

    fn reach_end(&self) -> bool;

    fn reach_begin(&self) -> bool;

    /// Raw pointer to the current element, null on a boundary.
    fn ptr(&self) -> *const Self::Item {
        self.get().map_or(ptr::null(), |item| item as *const Self::Item)
    }

    fn is_valid(&self) -> bool {
        !self.reach_end() && !self.reach_begin()
    }

    fn forward(mut self) -> Forward<Self> where Self: Sized {
        self.reset_to_begin();
        Forward { cursor: self }
    }

    fn inverse(mut self) -> Inverse<Self> where Self: Sized {
        self.reset_to_end();
        Inverse { cursor: self }
    }
}

pub trait CursorMut: Cursor {
    fn get_mut(&mut self) -> Option<&mut Self::Item>;

    /// Removes the current element and moves to the one after it.
    fn erase_and_move_next(&mut self);

    /// Removes the current element and moves to the one before it.
    fn erase_and_move_prev(&mut self);
}

/// Cursor whose element references outlive the cursor borrow.
pub trait SharedCursor: Cursor {
    type Ref;

    fn current(&self) -> Option<Self::Ref>;
}

// --- dense ---

/// Cursor over an `Array` (or any slice).
pub struct ArrayCursor<'a, T> {
    items: &'a [T],
    index: usize,
}

impl<'a, T> Clone for ArrayCursor<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for ArrayCursor<'a, T> {}

impl<'a, T> ArrayCursor<'a, T> {
    pub fn new(items: &'a [T]) -> ArrayCursor<'a, T> {
        ArrayCursor { items, index: 0 }
    }
}

impl<'a, T> Cursor for ArrayCursor<'a, T> {
    type Item = T;

    #[inline(always)]
    fn get(&self) -> Option<&T> {
        self.items.get(self.index)
    }

    #[inline(always)]
    fn index(&self) -> usize {
        self.index
    }

    fn move_next(&mut self) {
        debug_assert!(!self.reach_end(), "move_next past the end");
        self.index = self.index.wrapping_add(1);
    }

    fn move_prev(&mut self) {
        debug_assert!(!self.reach_begin(), "move_prev before the beginning");
        self.index = self.index.wrapping_sub(1);
    }

    fn reset_to_begin(&mut self) {
        self.index = 0;
    }

    fn reset_to_end(&mut self) {
        self.index = self.items.len().wrapping_sub(1);
    }

    fn reach_end(&self) -> bool {
        self.index != NPOS && self.index >= self.items.len()
    }

    fn reach_begin(&self) -> bool {
        self.index == NPOS
    }
}

impl<'a, T> SharedCursor for ArrayCursor<'a, T> {
    type Ref = &'a T;

    #[inline(always)]
    fn current(&self) -> Option<&'a T> {
        self.items.get(self.index)
    }
}

/// Cursor that can also modify and erase the elements of an `Array`.
pub struct ArrayCursorMut<'a, T, A: Allocator> {
    array: &'a mut Array<T, A>,
    index: usize,
}

impl<'a, T, A: Allocator> ArrayCursorMut<'a, T, A> {
    pub fn new(array: &'a mut Array<T, A>) -> ArrayCursorMut<'a, T, A> {
        ArrayCursorMut { array, index: 0 }
    }
}

impl<'a, T, A: Allocator> Cursor for ArrayCursorMut<'a, T, A> {
    type Item = T;

    #[inline(always)]
    fn get(&self) -> Option<&T> {
        self.array.as_slice().get(self.index)
    }

    #[inline(always)]
    fn index(&self) -> usize {
        self.index
    }

    fn move_next(&mut self) {
        debug_assert!(!self.reach_end(), "move_next past the end");
        self.index = self.index.wrapping_add(1);
    }

    fn move_prev(&mut self) {
        debug_assert!(!self.reach_begin(), "move_prev before the beginning");
        self.index = self.index.wrapping_sub(1);
    }

    fn reset_to_begin(&mut self) {
        self.index = 0;
    }

    fn reset_to_end(&mut self) {
        self.index = self.array.len().wrapping_sub(1);
    }

    fn reach_end(&self) -> bool {
        self.index != NPOS && self.index >= self.array.len()
    }

    fn reach_begin(&self) -> bool {
        self.index == NPOS
    }
}

impl<'a, T, A: Allocator> CursorMut for ArrayCursorMut<'a, T, A> {
    #[inline(always)]
    fn get_mut(&mut self) -> Option<&mut T> {
        self.array.as_mut_slice().get_mut(self.index)
    }

    /// The tail shifts down, so the next element takes over the current index.
    fn erase_and_move_next(&mut self) {
        assert!(self.is_valid(), "erase on an invalid cursor");
        self.array.remove_at(self.index, 1);
    }

    fn erase_and_move_prev(&mut self) {
        assert!(self.is_valid(), "erase on an invalid cursor");
        self.array.remove_at(self.index, 1);
        self.index = self.index.wrapping_sub(1);
    }
}

// --- sparse ---

#[inline(always)]
fn first_live<T, A: Allocator>(array: &SparseArray<T, A>, from: usize) -> usize {
    let end = array.sparse_size();
    bitmap::next_true(array.raw().bitmap(), from, end).unwrap_or(end)
}

#[inline(always)]
fn last_live<T, A: Allocator>(array: &SparseArray<T, A>, end: usize) -> usize {
    bitmap::prev_true(array.raw().bitmap(), 0, end).unwrap_or(NPOS)
}

/// Cursor over the live values of a `SparseArray`, jumping over holes.
pub struct SparseCursor<'a, T, A: Allocator> {
    array: &'a SparseArray<T, A>,
    index: usize,
}

impl<'a, T, A: Allocator> Clone for SparseCursor<'a, T, A> {
    fn clone(&self) -> Self {
        SparseCursor { array: self.array, index: self.index }
    }
}

impl<'a, T, A: Allocator> SparseCursor<'a, T, A> {
    pub fn new(array: &'a SparseArray<T, A>) -> SparseCursor<'a, T, A> {
        SparseCursor { array, index: first_live(array, 0) }
    }
}

impl<'a, T, A: Allocator> Cursor for SparseCursor<'a, T, A> {
    type Item = T;

    #[inline(always)]
    fn get(&self) -> Option<&T> {
        self.array.get(self.index)
    }

    #[inline(always)]
    fn index(&self) -> usize {
        self.index
    }

    fn move_next(&mut self) {
        debug_assert!(!self.reach_end(), "move_next past the end");
        self.index = first_live(self.array, self.index.wrapping_add(1));
    }

    fn move_prev(&mut self) {
        debug_assert!(!self.reach_begin(), "move_prev before the beginning");
        self.index = last_live(self.array, self.index);
    }

    fn reset_to_begin(&mut self) {
        self.index = first_live(self.array, 0);
    }

    fn reset_to_end(&mut self) {
        self.index = last_live(self.array, self.array.sparse_size());
    }

    fn reach_end(&self) -> bool {
        self.index != NPOS && self.index >= self.array.sparse_size()
    }

    fn reach_begin(&self) -> bool {
        self.index == NPOS
    }
}

impl<'a, T, A: Allocator> SharedCursor for SparseCursor<'a, T, A> {
    type Ref = &'a T;

    #[inline(always)]
    fn current(&self) -> Option<&'a T> {
        self.array.get(self.index)
    }
}

/// Sparse cursor that can also modify and erase. Erasing leaves a hole; other indices stay put.
pub struct SparseCursorMut<'a, T, A: Allocator> {
    array: &'a mut SparseArray<T, A>,
    index: usize,
}

impl<'a, T, A: Allocator> SparseCursorMut<'a, T, A> {
    pub fn new(array: &'a mut SparseArray<T, A>) -> SparseCursorMut<'a, T, A> {
        let index = first_live(array, 0);
        SparseCursorMut { array, index }
    }
}

impl<'a, T, A: Allocator> Cursor for SparseCursorMut<'a, T, A> {
    type Item = T;

    #[inline(always)]
    fn get(&self) -> Option<&T> {
        self.array.get(self.index)
    }

    #[inline(always)]
    fn index(&self) -> usize {
        self.index
    }

    fn move_next(&mut self) {
        debug_assert!(!self.reach_end(), "move_next past the end");
        self.index = first_live(self.array, self.index.wrapping_add(1));
    }

    fn move_prev(&mut self) {
        debug_assert!(!self.reach_begin(), "move_prev before the beginning");
        self.index = last_live(self.array, self.index);
    }

    fn reset_to_begin(&mut self) {
        self.index = first_live(self.array, 0);
    }

    fn reset_to_end(&mut self) {
        self.index = last_live(self.array, self.array.sparse_size());
    }

    fn reach_end(&self) -> bool {
        self.index != NPOS && self.index >= self.array.sparse_size()
    }

    fn reach_begin(&self) -> bool {
        self.index == NPOS
    }
}

impl<'a, T, A: Allocator> CursorMut for SparseCursorMut<'a, T, A> {
    #[inline(always)]
    fn get_mut(&mut self) -> Option<&mut T> {
        self.array.get_mut(self.index)
    }

    fn erase_and_move_next(&mut self) {
        assert!(self.is_valid(), "erase on an invalid cursor");
        self.array.remove_at(self.index, 1);
        self.move_next();
    }

    fn erase_and_move_prev(&mut self) {
        assert!(self.is_valid(), "erase on an invalid cursor");
        self.array.remove_at(self.index, 1);
        self.move_prev();
    }
}

// --- direction adapters ---

/// Walks the wrapped cursor front to back.
pub struct Forward<C> {
    cursor: C,
}

/// Walks the wrapped cursor back to front: `move_next` goes to lower indices.
pub struct Inverse<C> {
    cursor: C,
}

impl<C> Forward<C> {
    pub fn into_inner(self) -> C {
        self.cursor
    }
}

impl<C> Inverse<C> {
    pub fn into_inner(self) -> C {
        self.cursor
    }
}

impl<C: Cursor> Cursor for Forward<C> {
    type Item = C::Item;

    fn get(&self) -> Option<&C::Item> {
        self.cursor.get()
    }

    fn index(&self) -> usize {
        self.cursor.index()
    }

    fn move_next(&mut self) {
        self.cursor.move_next();
    }

    fn move_prev(&mut self) {
        self.cursor.move_prev();
    }

    fn reset_to_begin(&mut self) {
        self.cursor.reset_to_begin();
    }

    fn reset_to_end(&mut self) {
        self.cursor.reset_to_end();
    }

    fn reach_end(&self) -> bool {
        self.cursor.reach_end()
    }

    fn reach_begin(&self) -> bool {
        self.cursor.reach_begin()
    }
}

impl<C: Cursor> Cursor for Inverse<C> {
    type Item = C::Item;

    fn get(&self) -> Option<&C::Item> {
        self.cursor.get()
    }

    fn index(&self) -> usize {
        self.cursor.index()
    }

    fn move_next(&mut self) {
        self.cursor.move_prev();
    }

    fn move_prev(&mut self) {
        self.cursor.move_next();
    }

    fn reset_to_begin(&mut self) {
        self.cursor.reset_to_end();
    }

    fn reset_to_end(&mut self) {
        self.cursor.reset_to_begin();
    }

    fn reach_end(&self) -> bool {
        self.cursor.reach_begin()
    }

    fn reach_begin(&self) -> bool {
        self.cursor.reach_end()
    }
}

impl<C: CursorMut> CursorMut for Forward<C> {
    fn get_mut(&mut self) -> Option<&mut C::Item> {
        self.cursor.get_mut()
    }

    fn erase_and_move_next(&mut self) {
        self.cursor.erase_and_move_next();
    }

    fn erase_and_move_prev(&mut self) {
        self.cursor.erase_and_move_prev();
    }
}

impl<C: CursorMut> CursorMut for Inverse<C> {
    fn get_mut(&mut self) -> Option<&mut C::Item> {
        self.cursor.get_mut()
    }

    fn erase_and_move_next(&mut self) {
        self.cursor.erase_and_move_prev();
    }

    fn erase_and_move_prev(&mut self) {
        self.cursor.erase_and_move_next();
    }
}

impl<C: SharedCursor> Iterator for Forward<C> {
    type Item = C::Ref;

    fn next(&mut self) -> Option<C::Ref> {
        let item = self.cursor.current()?;
        self.cursor.move_next();
        Some(item)
    }
}

impl<C: SharedCursor> Iterator for Inverse<C> {
    type Item = C::Ref;

    fn next(&mut self) -> Option<C::Ref> {
        let item = self.cursor.current()?;
        self.cursor.move_prev();
        Some(item)
    }
}
