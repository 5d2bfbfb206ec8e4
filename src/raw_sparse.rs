use crate::allocator::{capacity_overflow, Allocator};
use crate::bitmap::{self, TrueBitIter, Word};
use crate::data_ref::NPOS;
use crate::memops;
use crate::slot::{FreeLink, Slot};
use std::marker::PhantomData;
use std::ptr::{self, NonNull};

/// Sparse storage: slots, an occupancy bitmap and a free list threaded through the holes.
///
/// Invariants:
///
/// - `sparse_size <= capacity` and the bitmap has `words_for(capacity)` words;
/// - bits at and above `sparse_size` are clear;
/// - `hole_count` is the number of clear bits below `sparse_size`;
/// - the free list starting at `freelist_head` links exactly those holes, ends are `NPOS`.
pub(crate) struct RawSparseArray<T, A: Allocator> {
    slots: NonNull<Slot<T>>,
    bitmap: NonNull<Word>,
    bitmap_size: usize,
    sparse_size: usize,
    hole_count: usize,
    freelist_head: usize,
    capacity: usize,
    allocator: A,
    _marker: PhantomData<T>,
}

unsafe impl<T: Send, A: Allocator + Send> Send for RawSparseArray<T, A> {}
unsafe impl<T: Sync, A: Allocator + Sync> Sync for RawSparseArray<T, A> {}

impl<T, A: Allocator> RawSparseArray<T, A> {
    pub fn new(allocator: A) -> RawSparseArray<T, A> {
        RawSparseArray {
            slots: NonNull::dangling(),
            bitmap: NonNull::dangling(),
            bitmap_size: 0,
            sparse_size: 0,
            hole_count: 0,
            freelist_head: NPOS,
            capacity: 0,
            allocator,
            _marker: PhantomData,
        }
    }

    #[inline(always)]
    pub fn sparse_size(&self) -> usize {
        self.sparse_size
    }

    #[inline(always)]
    pub fn hole_count(&self) -> usize {
        self.hole_count
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.sparse_size - self.hole_count
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(test)]
    pub fn freelist_head(&self) -> usize {
        self.freelist_head
    }

    #[inline(always)]
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    #[inline(always)]
    pub fn bitmap(&self) -> &[Word] {
        unsafe { std::slice::from_raw_parts(self.bitmap.as_ptr(), self.bitmap_size) }
    }

    #[inline(always)]
    fn bitmap_mut(&mut self) -> &mut [Word] {
        unsafe { std::slice::from_raw_parts_mut(self.bitmap.as_ptr(), self.bitmap_size) }
    }

    /// Set bits of the live slots, in index order.
    #[inline(always)]
    pub fn occupied(&self) -> TrueBitIter<'_> {
        TrueBitIter::new(self.bitmap(), self.sparse_size)
    }

    #[inline(always)]
    pub fn is_occupied(&self, index: usize) -> bool {
        index < self.sparse_size && bitmap::get(self.bitmap(), index)
    }

    #[inline(always)]
    fn slot(&self, index: usize) -> &Slot<T> {
        debug_assert!(index < self.capacity, "slot index out of capacity");
        unsafe { &*self.slots.as_ptr().add(index) }
    }

    #[inline(always)]
    fn slot_mut(&mut self, index: usize) -> &mut Slot<T> {
        debug_assert!(index < self.capacity, "slot index out of capacity");
        unsafe { &mut *self.slots.as_ptr().add(index) }
    }

    /// Base pointer of the slot array; the value of slot `i` lives at `slots_ptr().add(i)`.
    #[inline(always)]
    pub fn slots_ptr(&self) -> *mut Slot<T> {
        self.slots.as_ptr()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        if self.is_occupied(index) {
            Some(unsafe { self.slot(index).value(true) })
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if self.is_occupied(index) {
            Some(unsafe { self.slot_mut(index).value_mut(true) })
        } else {
            None
        }
    }

    /// Pointer to where slot `index` stores its value, live or not.
    #[inline(always)]
    pub fn value_ptr(&mut self, index: usize) -> *mut T {
        self.slot_mut(index).value_ptr()
    }

    // --- storage ---

    /// Moves slots and bitmap into blocks sized for exactly `new_capacity` slots.
    fn realloc(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity >= self.sparse_size, "realloc: new_capacity >= sparse_size");
        if new_capacity == self.capacity {
            return;
        }
        if new_capacity == 0 {
            self.free();
            return;
        }

        trace!("realloc sparse storage {} -> {}", self.capacity, new_capacity);

        self.slots = unsafe { resize_block(&mut self.allocator, self.slots, self.capacity, self.sparse_size, new_capacity) };

        let new_bitmap_size = bitmap::words_for(new_capacity);
        if new_bitmap_size != self.bitmap_size {
            let kept_words = bitmap::words_for(self.sparse_size);
            self.bitmap = unsafe { resize_block(&mut self.allocator, self.bitmap, self.bitmap_size, kept_words, new_bitmap_size) };
            unsafe { ptr::write_bytes(self.bitmap.as_ptr().add(kept_words), 0, new_bitmap_size - kept_words) };
            self.bitmap_size = new_bitmap_size;
        }
        self.capacity = new_capacity;
    }

    /// Returns both blocks to the allocator. Live values must already be gone.
    fn free(&mut self) {
        debug_assert_eq!(0, self.sparse_size, "free: no slots in use");
        if self.capacity != 0 {
            trace!("free sparse storage {}", self.capacity);
            unsafe {
                self.allocator.free(self.slots, self.capacity);
                self.allocator.free(self.bitmap, self.bitmap_size);
            }
            self.slots = NonNull::dangling();
            self.bitmap = NonNull::dangling();
            self.bitmap_size = 0;
            self.capacity = 0;
        }
    }

    pub fn reserve(&mut self, capacity: usize) {
        if capacity > self.capacity {
            self.realloc(capacity);
        }
    }

    /// Makes room for `additional` slots above `sparse_size`, with policy slack.
    pub fn reserve_grow(&mut self, additional: usize) {
        let requested = self.sparse_size.checked_add(additional).unwrap_or_else(|| capacity_overflow());
        if requested > self.capacity {
            let new_capacity = self.allocator.get_grow::<Slot<T>>(requested, self.capacity);
            self.realloc(new_capacity);
        }
    }

    /// Drops trailing holes, then reallocates down to the allocator's shrink target.
    pub fn shrink(&mut self) {
        self.compact_top();
        let new_capacity = self.allocator.get_shrink::<Slot<T>>(self.sparse_size, self.capacity);
        if new_capacity < self.capacity {
            debug!("shrink sparse storage {} -> {}", self.capacity, new_capacity);
            self.realloc(new_capacity);
        }
    }

    pub fn release(&mut self, capacity: usize) {
        self.clear();
        if capacity == 0 {
            self.free();
        } else {
            self.realloc(capacity);
        }
    }

    /// Drops every live value and forgets all holes. Capacity is kept.
    pub fn clear(&mut self) {
        let sparse_size = self.sparse_size;
        let words = bitmap::words_for(sparse_size);
        self.sparse_size = 0;
        self.hole_count = 0;
        self.freelist_head = NPOS;
        if memops::needs_destruct::<T>() {
            let slots = self.slots.as_ptr();
            for index in TrueBitIter::new(self.bitmap(), sparse_size) {
                unsafe { ptr::drop_in_place((*slots.add(index)).value_ptr()) };
            }
        }
        self.bitmap_mut()[..words].iter_mut().for_each(|word| *word = 0);
    }

    // --- free list ---

    /// Pushes a (clear-bit) slot onto the free list head.
    fn push_hole(&mut self, index: usize) {
        debug_assert!(!bitmap::get(self.bitmap(), index), "push_hole: slot is occupied");
        let head = self.freelist_head;
        self.slot_mut(index).set_link(FreeLink { prev: NPOS, next: head });
        if head != NPOS {
            unsafe { self.slot_mut(head).link_mut(false).prev = index };
        }
        self.freelist_head = index;
        self.hole_count += 1;
    }

    /// Removes a hole from anywhere in the free list.
    fn unlink_hole(&mut self, index: usize) {
        debug_assert!(!bitmap::get(self.bitmap(), index), "unlink_hole: slot is occupied");
        let FreeLink { prev, next } = unsafe { self.slot(index).link(false) };
        if prev != NPOS {
            unsafe { self.slot_mut(prev).link_mut(false).next = next };
        } else {
            self.freelist_head = next;
        }
        if next != NPOS {
            unsafe { self.slot_mut(next).link_mut(false).prev = prev };
        }
        self.hole_count -= 1;
    }

    // --- slots ---

    /// Takes a slot for a new value: the most recent hole, else a fresh slot at the top.
    ///
    /// The returned slot is neither linked nor occupied. It must be written and
    /// `occupy`-ed before any other call on the storage.
    pub fn acquire(&mut self) -> usize {
        if self.freelist_head != NPOS {
            let index = self.freelist_head;
            self.unlink_hole(index);
            index
        } else {
            self.reserve_grow(1);
            let index = self.sparse_size;
            self.sparse_size += 1;
            index
        }
    }

    /// Takes the specific slot `index`, growing with intermediate holes when it lies
    /// above `sparse_size`. Same contract as `acquire`.
    pub fn acquire_at(&mut self, index: usize) -> usize {
        assert!(!self.is_occupied(index), "add_at: slot {} is occupied", index);
        if index < self.sparse_size {
            self.unlink_hole(index);
            return index;
        }
        let additional = index.checked_add(1).unwrap_or_else(|| capacity_overflow()) - self.sparse_size;
        self.reserve_grow(additional);
        let first_new = self.sparse_size;
        self.sparse_size = index + 1;
        for hole in first_new..index {
            self.push_hole(hole);
        }
        index
    }

    /// Marks an acquired slot live.
    ///
    /// # Safety
    /// The value at `value_ptr(index)` must have been written.
    pub unsafe fn occupy(&mut self, index: usize) {
        debug_assert!(index < self.sparse_size, "occupy: index < sparse_size");
        bitmap::set(self.bitmap_mut(), index, true);
    }

    /// Index the next `acquire` will hand out, with capacity already reserved for it.
    ///
    /// Nothing else changes, so the storage stays consistent if the slot is never taken.
    pub fn next_slot(&mut self) -> usize {
        if self.freelist_head != NPOS {
            self.freelist_head
        } else {
            self.reserve_grow(1);
            self.sparse_size
        }
    }

    pub fn emplace(&mut self, value: T) -> usize {
        let index = self.acquire();
        unsafe {
            self.value_ptr(index).write(value);
            self.occupy(index);
        }
        index
    }

    pub fn emplace_at(&mut self, index: usize, value: T) -> usize {
        self.acquire_at(index);
        unsafe {
            self.value_ptr(index).write(value);
            self.occupy(index);
        }
        index
    }

    /// Moves the value out and turns the slot into the free-list head.
    pub fn take(&mut self, index: usize) -> T {
        assert!(self.is_occupied(index), "remove: slot {} is a hole", index);
        let value = unsafe { self.slot_mut(index).take(true) };
        bitmap::set(self.bitmap_mut(), index, false);
        self.push_hole(index);
        value
    }

    /// Moves a value out without linking its slot into the free list.
    ///
    /// # Safety
    /// The slot must be live. Afterwards only `clear` or drop may touch the storage.
    pub unsafe fn take_unlinked(&mut self, index: usize) -> T {
        debug_assert!(self.is_occupied(index), "take_unlinked: slot is a hole");
        bitmap::set(self.bitmap_mut(), index, false);
        self.slot_mut(index).take(true)
    }

    /// # Safety
    /// The slot must be live.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(self.is_occupied(index), "get_unchecked: slot is a hole");
        self.slot(index).value(true)
    }

    /// # Safety
    /// The slot must be live.
    #[inline(always)]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(self.is_occupied(index), "get_unchecked_mut: slot is a hole");
        self.slot_mut(index).value_mut(true)
    }

    /// The slots `[0, len)` as one dense run. Values are reached through `Slot::value`.
    ///
    /// Panics if there are holes.
    pub fn dense_slots_mut(&mut self) -> &mut [Slot<T>] {
        assert_eq!(0, self.hole_count, "dense_slots_mut: storage has holes");
        unsafe { std::slice::from_raw_parts_mut(self.slots.as_ptr(), self.sparse_size) }
    }

    /// Drops `count` consecutive live values starting at `index`.
    pub fn remove_at(&mut self, index: usize, count: usize) {
        for index in index..index + count {
            drop(self.take(index));
        }
    }

    // --- compaction ---

    /// Fills every hole below the final size with the last live value above it.
    ///
    /// Unstable. Work is proportional to the number of holes below the boundary.
    pub fn compact(&mut self) {
        if self.hole_count == 0 {
            return;
        }
        let boundary = self.sparse_size - self.hole_count;
        debug!("compact sparse storage {} -> {}", self.sparse_size, boundary);

        let slots = self.slots.as_ptr();
        let mut hole = self.freelist_head;
        let mut top = self.sparse_size;
        while hole != NPOS {
            let next = unsafe { self.slot(hole).link(false) }.next;
            if hole < boundary {
                let source = bitmap::prev_true(self.bitmap(), boundary, top)
                    .unwrap_or_else(|| unreachable!("compact: live value above boundary"));
                unsafe { ptr::copy_nonoverlapping((*slots.add(source)).value_ptr_const(), (*slots.add(hole)).value_ptr(), 1) };
                let bits = self.bitmap_mut();
                bitmap::set(bits, source, false);
                bitmap::set(bits, hole, true);
                top = source;
            }
            hole = next;
        }

        self.sparse_size = boundary;
        self.hole_count = 0;
        self.freelist_head = NPOS;
    }

    /// Shifts runs of live values down over the holes, keeping their order. O(sparse_size).
    pub fn compact_stable(&mut self) {
        if self.hole_count == 0 {
            return;
        }
        debug!("compact_stable sparse storage {} -> {}", self.sparse_size, self.len());

        let slots = self.slots.as_ptr();
        let sparse_size = self.sparse_size;
        let mut write = 0;
        let mut read = 0;
        while let Some(start) = bitmap::next_true(self.bitmap(), read, sparse_size) {
            let end = bitmap::next_false(self.bitmap(), start, sparse_size).unwrap_or(sparse_size);
            let run = end - start;
            if start != write {
                unsafe { ptr::copy(slots.add(start), slots.add(write), run) };
                let bits = self.bitmap_mut();
                bitmap::set_range(bits, start, end, false);
                bitmap::set_range(bits, write, write + run, true);
            }
            write += run;
            read = end;
        }

        self.sparse_size = write;
        self.hole_count = 0;
        self.freelist_head = NPOS;
    }

    /// Trims the holes at the top of the storage so that the last slot is live.
    pub fn compact_top(&mut self) {
        let new_size = bitmap::prev_true(self.bitmap(), 0, self.sparse_size).map_or(0, |last| last + 1);
        if new_size == self.sparse_size {
            return;
        }
        debug!("compact_top sparse storage {} -> {}", self.sparse_size, new_size);
        for hole in new_size..self.sparse_size {
            self.unlink_hole(hole);
        }
        self.sparse_size = new_size;
    }

    /// Clones every live value and every hole, keeping indices and the free-list order.
    pub fn clone_with(&self, allocator: A) -> RawSparseArray<T, A> where T: Clone {
        let mut copy: RawSparseArray<T, A> = RawSparseArray::new(allocator);
        copy.reserve(self.sparse_size);
        copy.sparse_size = self.sparse_size;
        for index in 0..self.sparse_size {
            if bitmap::get(self.bitmap(), index) {
                let value = unsafe { self.slot(index).value(true) }.clone();
                unsafe {
                    copy.value_ptr(index).write(value);
                    copy.occupy(index);
                }
            } else {
                let link = unsafe { self.slot(index).link(false) };
                copy.slot_mut(index).set_link(link);
            }
        }
        copy.hole_count = self.hole_count;
        copy.freelist_head = self.freelist_head;
        copy
    }
}

/// Reallocates a block of `T`, keeping the first `kept` elements.
///
/// # Safety
/// `block` must come from `allocator` with `old_count` elements, `kept <= min(old_count, new_count)`.
unsafe fn resize_block<A: Allocator, T>(allocator: &mut A, block: NonNull<T>, old_count: usize, kept: usize, new_count: usize) -> NonNull<T> {
    if old_count == 0 {
        allocator.alloc::<T>(new_count)
    } else if A::SUPPORT_REALLOC {
        allocator.realloc(block, old_count, new_count)
    } else {
        let new_block = allocator.alloc::<T>(new_count);
        memops::relocate_nonoverlapping(new_block.as_ptr(), block.as_ptr(), kept);
        allocator.free(block, old_count);
        new_block
    }
}

impl<T, A: Allocator> Drop for RawSparseArray<T, A> {
    fn drop(&mut self) {
        self.clear();
        self.free();
    }
}

#[cfg(test)]
mod raw_sparse_tests {
    use super::*;
    use crate::dropflag::{counter, Counted};
    use crate::memory::{AllocStats, CountingAllocator};
    use crate::HeapAllocator;

    fn raw<T>() -> RawSparseArray<T, HeapAllocator> {
        RawSparseArray::new(HeapAllocator)
    }

    fn values<T: Clone, A: Allocator>(raw: &RawSparseArray<T, A>) -> Vec<(usize, T)> {
        raw.occupied().map(|index| (index, raw.get(index).cloned().unwrap())).collect()
    }

    fn free_list<T, A: Allocator>(raw: &RawSparseArray<T, A>) -> Vec<usize> {
        let mut out = Vec::new();
        let mut prev = NPOS;
        let mut index = raw.freelist_head();
        while index != NPOS {
            let link = unsafe { raw.slot(index).link(false) };
            assert_eq!(prev, link.prev);
            out.push(index);
            prev = index;
            index = link.next;
        }
        out
    }

    fn check_invariants<T, A: Allocator>(raw: &RawSparseArray<T, A>) {
        assert!(raw.sparse_size() <= raw.capacity());
        assert_eq!(raw.len(), raw.occupied().count());
        assert_eq!(raw.len(), bitmap::count_true(raw.bitmap(), raw.bitmap().len() * bitmap::WORD_BITS));
        let mut holes = free_list(raw);
        holes.sort();
        let expected: Vec<usize> = (0..raw.sparse_size()).filter(|i| !raw.is_occupied(*i)).collect();
        assert_eq!(expected, holes);
        assert_eq!(raw.hole_count(), holes.len());
    }

    #[test]
    fn removed_slots_are_reused_lifo() {
        let mut raw = raw();
        for c in ['a', 'b', 'c', 'd', 'e'] {
            raw.emplace(c);
        }
        raw.remove_at(1, 1);
        raw.remove_at(3, 1);
        assert_eq!(vec![3, 1], free_list(&raw));
        check_invariants(&raw);

        assert_eq!(3, raw.emplace('x'));
        assert_eq!(1, raw.emplace('y'));
        assert_eq!(5, raw.emplace('z'));
        check_invariants(&raw);
        assert_eq!(vec![(0, 'a'), (1, 'y'), (2, 'c'), (3, 'x'), (4, 'e'), (5, 'z')], values(&raw));
    }

    #[test]
    fn acquire_at_above_top_leaves_holes() {
        let mut raw = raw();
        raw.emplace(10);
        raw.emplace_at(4, 40);
        assert_eq!(5, raw.sparse_size());
        assert_eq!(3, raw.hole_count());
        check_invariants(&raw);

        raw.emplace_at(2, 20);
        check_invariants(&raw);
        assert_eq!(vec![(0, 10), (2, 20), (4, 40)], values(&raw));
    }

    #[test]
    #[should_panic]
    fn add_at_occupied_slot_panics() {
        let mut raw = raw();
        raw.emplace(1);
        raw.emplace_at(0, 2);
    }

    #[test]
    #[should_panic]
    fn removing_hole_panics() {
        let mut raw = raw();
        raw.emplace(1);
        raw.emplace(2);
        raw.remove_at(0, 1);
        raw.remove_at(0, 1);
    }

    #[test]
    fn next_slot_predicts_acquire_without_taking_it() {
        let mut raw = raw();
        raw.emplace(1);
        let top = raw.next_slot();
        assert_eq!(1, top);
        assert_eq!(1, raw.sparse_size());
        assert!(raw.capacity() > top);
        check_invariants(&raw);
        assert_eq!(top, raw.acquire());
        unsafe {
            raw.value_ptr(top).write(2);
            raw.occupy(top);
        }
        raw.emplace(3);
        raw.remove_at(1, 1);
        let hole = raw.next_slot();
        assert_eq!(1, hole);
        check_invariants(&raw);
        assert_eq!(1, raw.hole_count());
        assert_eq!(hole, raw.acquire());
    }

    #[test]
    fn compact_fills_holes_from_top() {
        let mut raw = raw();
        for i in 0..8 {
            raw.emplace(i);
        }
        raw.remove_at(1, 2);
        raw.remove_at(6, 1);
        raw.compact();
        check_invariants(&raw);
        assert_eq!(5, raw.sparse_size());
        assert_eq!(0, raw.hole_count());
        let mut live: Vec<i32> = values(&raw).into_iter().map(|(_, v)| v).collect();
        live.sort();
        assert_eq!(vec![0, 3, 4, 5, 7], live);
    }

    #[test]
    fn compact_stable_keeps_order() {
        let mut raw = raw();
        for i in 0..200 {
            raw.emplace(i);
        }
        for i in (0..200).filter(|i| i % 3 != 0) {
            raw.remove_at(i, 1);
        }
        raw.compact_stable();
        check_invariants(&raw);
        let expected: Vec<(usize, i32)> = (0..200).filter(|i| i % 3 == 0).enumerate().collect();
        assert_eq!(expected, values(&raw));
    }

    #[test]
    fn compact_top_trims_trailing_holes() {
        let mut raw = raw();
        for i in 0..6 {
            raw.emplace(i);
        }
        raw.remove_at(1, 1);
        raw.remove_at(3, 3);
        raw.compact_top();
        assert_eq!(3, raw.sparse_size());
        assert_eq!(1, raw.hole_count());
        check_invariants(&raw);
    }

    #[test]
    fn shrink_releases_trailing_holes() {
        let stats = AllocStats::new();
        let mut raw = RawSparseArray::new(CountingAllocator::<false>::new(stats.clone()));
        for i in 0..100u64 {
            raw.emplace(i);
        }
        raw.remove_at(10, 90);
        raw.shrink();
        assert!(raw.capacity() < 100);
        assert_eq!(10, raw.sparse_size());
        check_invariants(&raw);
        assert_eq!(0, stats.reallocs());
        drop(raw);
        assert_eq!(0, stats.live_blocks());
    }

    #[test]
    fn values_dropped_exactly_once() {
        let drops = counter();
        let mut raw = RawSparseArray::new(CountingAllocator::<true>::new(AllocStats::new()));
        for i in 0..10 {
            raw.emplace(Counted::new(i, &drops));
        }
        raw.remove_at(2, 3);
        assert_eq!(3, *drops.borrow());
        raw.compact();
        raw.compact_stable();
        assert_eq!(3, *drops.borrow());
        let taken = raw.take(0);
        assert_eq!(0, taken.key);
        drop(taken);
        raw.clear();
        assert_eq!(10, *drops.borrow());
        assert_eq!(0, raw.sparse_size());
        raw.emplace(Counted::new(1, &drops));
        drop(raw);
        assert_eq!(11, *drops.borrow());
    }

    #[test]
    fn clone_keeps_holes_and_free_list() {
        let mut raw = raw();
        for i in 0..6 {
            raw.emplace(i.to_string());
        }
        raw.remove_at(4, 1);
        raw.remove_at(0, 1);
        let mut copy = raw.clone_with(HeapAllocator);
        check_invariants(&copy);
        assert_eq!(values(&raw), values(&copy));
        assert_eq!(free_list(&raw), free_list(&copy));
        assert_eq!(0, copy.emplace("new".to_string()));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Add(u16),
            AddAt(usize, u16),
            Remove(usize),
            Compact,
            CompactStable,
            Shrink,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                4 => any::<u16>().prop_map(Op::Add),
                1 => (0..80usize, any::<u16>()).prop_map(|(i, v)| Op::AddAt(i, v)),
                3 => (0..80usize).prop_map(Op::Remove),
                1 => Just(Op::Compact),
                1 => Just(Op::CompactStable),
                1 => Just(Op::Shrink),
            ]
        }

        proptest! {
            #[test]
            fn counts_and_links_stay_consistent(ops in proptest::collection::vec(op(), 0..120)) {
                let mut raw = RawSparseArray::new(CountingAllocator::<false>::new(AllocStats::new()));
                let mut model: Vec<u16> = Vec::new();
                for op in ops {
                    match op {
                        Op::Add(v) => {
                            raw.emplace(v);
                            model.push(v);
                        }
                        Op::AddAt(i, v) => {
                            if !raw.is_occupied(i) {
                                raw.emplace_at(i, v);
                                model.push(v);
                            }
                        }
                        Op::Remove(i) => {
                            if raw.is_occupied(i) {
                                let v = raw.take(i);
                                let pos = model.iter().position(|m| *m == v).unwrap();
                                model.swap_remove(pos);
                            }
                        }
                        Op::Compact => {
                            raw.compact();
                            prop_assert_eq!(0, raw.hole_count());
                        }
                        Op::CompactStable => {
                            let before: Vec<u16> = values(&raw).into_iter().map(|(_, v)| v).collect();
                            raw.compact_stable();
                            let after: Vec<u16> = values(&raw).into_iter().map(|(_, v)| v).collect();
                            prop_assert_eq!(before, after);
                        }
                        Op::Shrink => raw.shrink(),
                    }
                    check_invariants(&raw);
                    prop_assert_eq!(model.len(), raw.sparse_size() - raw.hole_count());
                }
                let mut live: Vec<u16> = values(&raw).into_iter().map(|(_, v)| v).collect();
                live.sort();
                model.sort();
                prop_assert_eq!(model, live);
            }
        }
    }
}
