use crate::allocator::Allocator;
use crate::array::Array;
use crate::sparse_array::SparseArray;

/// Collects iterators into containers built with an explicit allocator parameter.
pub trait CollectIn: Iterator {
    fn collect_array<A: Allocator>(self, param: A::Param) -> Array<Self::Item, A>;

    fn collect_sparse_array<A: Allocator>(self, param: A::Param) -> SparseArray<Self::Item, A>;
}

impl<Q: Iterator> CollectIn for Q {
    fn collect_array<A: Allocator>(self, param: A::Param) -> Array<Self::Item, A> {
        Array::from_iter_in(self, param)
    }

    fn collect_sparse_array<A: Allocator>(self, param: A::Param) -> SparseArray<Self::Item, A> {
        SparseArray::from_iter_in(self, param)
    }
}

#[cfg(test)]
mod traits_tests {
    use super::CollectIn;
    use crate::memory::{AllocStats, CountingAllocator};
    use crate::HeapAllocator;

    #[test]
    fn collects_with_allocator() {
        let stats = AllocStats::new();
        let array = (0..5).map(|i| i * 2).collect_array::<CountingAllocator>(stats.clone());
        assert_eq!(array, [0, 2, 4, 6, 8]);
        assert_eq!(1, stats.live_blocks());

        let sparse = "abc".chars().collect_sparse_array::<CountingAllocator>(stats.clone());
        assert_eq!(Some(&'c'), sparse.get(2));
        assert_eq!(3, stats.live_blocks());

        let heap = vec![1, 2].into_iter().collect_array::<HeapAllocator>(());
        assert_eq!(2, heap.len());
    }
}
