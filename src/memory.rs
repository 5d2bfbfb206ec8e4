use crate::allocator::{array_layout, Allocator, HeapAllocator};
use std::cell::RefCell;
use std::ptr::NonNull;
use std::rc::Rc;

#[derive(Debug, Default)]
struct StatsInstance {
    live_blocks: usize,
    live_bytes: usize,
    allocs: usize,
    reallocs: usize,
    frees: usize,
}

impl StatsInstance {
    fn on_alloc(&mut self, bytes: usize) {
        if bytes == 0 {
            return;
        }
        self.live_blocks += 1;
        self.live_bytes += bytes;
        self.allocs += 1;
        trace!("alloc   block of size {}", bytes);
    }

    fn on_free(&mut self, bytes: usize) {
        if bytes == 0 {
            return;
        }
        assert!(self.live_blocks > 0, "freeing a block that was never allocated");
        self.live_blocks -= 1;
        self.live_bytes -= bytes;
        self.frees += 1;
        trace!("free    block of size {}", bytes);
    }

    fn on_realloc(&mut self, old_bytes: usize, new_bytes: usize) {
        match (old_bytes, new_bytes) {
            (0, new) => self.on_alloc(new),
            (old, 0) => self.on_free(old),
            (old, new) => {
                self.live_bytes = self.live_bytes - old + new;
                self.reallocs += 1;
                trace!("realloc block of size {} -> {}", old, new);
            },
        }
    }
}

/// Shared allocation counters.
///
/// Clones observe the same counters, so a test can keep one handle and pass
/// another into a container as its allocator parameter.
#[derive(Clone, Debug, Default)]
pub struct AllocStats {
    shared: Rc<RefCell<StatsInstance>>,
}

impl AllocStats {
    pub fn new() -> AllocStats {
        AllocStats::default()
    }

    /// Blocks allocated and not yet freed.
    pub fn live_blocks(&self) -> usize {
        self.shared.borrow().live_blocks
    }

    /// Bytes held by live blocks.
    pub fn live_bytes(&self) -> usize {
        self.shared.borrow().live_bytes
    }

    pub fn allocs(&self) -> usize {
        self.shared.borrow().allocs
    }

    /// In-place resizes of existing blocks.
    pub fn reallocs(&self) -> usize {
        self.shared.borrow().reallocs
    }

    pub fn frees(&self) -> usize {
        self.shared.borrow().frees
    }
}

/// Heap allocator that records every block it hands out into `AllocStats`.
///
/// With `REALLOC = false` it reports no realloc support, forcing containers
/// onto the allocate-move-free path.
#[derive(Clone, Debug, Default)]
pub struct CountingAllocator<const REALLOC: bool = true> {
    stats: AllocStats,
    heap: HeapAllocator,
}

impl<const REALLOC: bool> CountingAllocator<REALLOC> {
    pub fn stats(&self) -> &AllocStats {
        &self.stats
    }
}

impl<const REALLOC: bool> Allocator for CountingAllocator<REALLOC> {
    type Param = AllocStats;

    const SUPPORT_REALLOC: bool = REALLOC;

    fn new(stats: AllocStats) -> Self {
        CountingAllocator { stats, heap: HeapAllocator }
    }

    fn alloc<T>(&mut self, count: usize) -> NonNull<T> {
        let ptr = self.heap.alloc::<T>(count);
        self.stats.shared.borrow_mut().on_alloc(array_layout::<T>(count).size());
        ptr
    }

    unsafe fn realloc<T>(&mut self, ptr: NonNull<T>, old_count: usize, new_count: usize) -> NonNull<T> {
        assert!(REALLOC, "realloc called on an allocator without realloc support");
        let new_ptr = self.heap.realloc(ptr, old_count, new_count);
        self.stats.shared.borrow_mut().on_realloc(
            array_layout::<T>(old_count).size(),
            array_layout::<T>(new_count).size(),
        );
        new_ptr
    }

    unsafe fn free<T>(&mut self, ptr: NonNull<T>, count: usize) {
        self.stats.shared.borrow_mut().on_free(array_layout::<T>(count).size());
        self.heap.free(ptr, count);
    }
}

#[cfg(test)]
mod memory_tests {
    use super::*;

    #[test]
    fn counters_follow_blocks() {
        let stats = AllocStats::new();
        let mut allocator = CountingAllocator::<true>::new(stats.clone());
        let ptr = allocator.alloc::<u32>(8);
        assert_eq!(1, stats.live_blocks());
        assert_eq!(32, stats.live_bytes());

        let ptr = unsafe { allocator.realloc(ptr, 8, 16) };
        assert_eq!(1, stats.live_blocks());
        assert_eq!(64, stats.live_bytes());
        assert_eq!(1, stats.reallocs());

        unsafe { allocator.free(ptr, 16) };
        assert_eq!(0, stats.live_blocks());
        assert_eq!(0, stats.live_bytes());
        assert_eq!(1, stats.frees());
    }

    #[test]
    fn empty_blocks_are_not_counted() {
        let stats = AllocStats::new();
        let mut allocator = CountingAllocator::<false>::new(stats.clone());
        let ptr = allocator.alloc::<u32>(0);
        unsafe { allocator.free(ptr, 0) };
        assert_eq!(0, stats.allocs());
        assert_eq!(0, stats.frees());
    }
}
