/*!

Sorting, heap and removal algorithms shared by every container.

All of them work on plain slices with a caller-supplied "less" predicate and
only ever swap or rotate elements, so a panicking predicate leaves the slice a
permutation of its input: nothing is duplicated or lost.

*/

pub mod heap;
pub mod remove;
pub mod sort;

pub use heap::{heap_pop_by, heap_remove_at_by, heap_sort_by, heapify_by, is_heap_by, sift_down_by, sift_up_by};
pub use remove::{remove_all, remove_all_swap};
pub use sort::{intro_sort_by, is_sorted_by, lower_bound_by, merge_sort_by, rotate, selection_sort_by, upper_bound_by};
