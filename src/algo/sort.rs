//! Unstable intro sort, stable buffer-free merge sort and their helpers.

use super::heap::heap_sort_by;

/// Partitions this small are finished with selection sort.
const SELECTION_SORT_THRESHOLD: usize = 8;

/// Pending partitions never exceed log2(len), and len fits into a usize.
const WORK_STACK_CAPACITY: usize = usize::BITS as usize;

/// Size of the runs sorted in place before merging starts.
const MERGE_GROUP_SIZE: usize = 2;

pub fn is_sorted_by<T, F>(v: &[T], mut less: F) -> bool
where
    F: FnMut(&T, &T) -> bool,
{
    v.windows(2).all(|pair| !less(&pair[1], &pair[0]))
}

/// First index whose element is not less than `value`.
pub fn lower_bound_by<T, F>(v: &[T], value: &T, mut less: F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let mut lo = 0;
    let mut hi = v.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if less(&v[mid], value) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// First index whose element is greater than `value`.
pub fn upper_bound_by<T, F>(v: &[T], value: &T, mut less: F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let mut lo = 0;
    let mut hi = v.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if less(value, &v[mid]) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}

/// Rotates `v` so that `v[mid]` becomes the first element.
pub fn rotate<T>(v: &mut [T], mid: usize) {
    debug_assert!(mid <= v.len(), "rotate: mid <= len");
    if mid == 0 || mid == v.len() {
        return;
    }
    v[..mid].reverse();
    v[mid..].reverse();
    v.reverse();
}

pub fn selection_sort_by<T, F>(v: &mut [T], mut less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    for i in 0..len.saturating_sub(1) {
        let mut min = i;
        for j in i + 1..len {
            if less(&v[j], &v[min]) {
                min = j;
            }
        }
        if min != i {
            v.swap(i, min);
        }
    }
}

/// Orders `v[a] <= v[b] <= v[c]`.
fn sort3<T, F>(v: &mut [T], a: usize, b: usize, c: usize, less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    if less(&v[b], &v[a]) {
        v.swap(a, b);
    }
    if less(&v[c], &v[b]) {
        v.swap(b, c);
        if less(&v[b], &v[a]) {
            v.swap(a, b);
        }
    }
}

/// Median-of-three partition. Returns the final pivot index `p`:
/// `v[..p]` are not greater than the pivot, `v[p + 1..]` are not less.
fn partition<T, F>(v: &mut [T], less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    debug_assert!(len >= 3, "partition: len >= 3");
    let mid = len / 2;
    sort3(v, 0, mid, len - 1, less);
    v.swap(0, mid);

    let mut i = 1;
    let mut j = len - 1;
    loop {
        while i <= j && less(&v[i], &v[0]) {
            i += 1;
        }
        while i <= j && less(&v[0], &v[j]) {
            j -= 1;
        }
        if i >= j {
            break;
        }
        v.swap(i, j);
        i += 1;
        j -= 1;
    }
    v.swap(0, j);
    j
}

#[derive(Clone, Copy, Default)]
struct Partition {
    lo: usize,
    hi: usize,
    depth: u32,
}

/// Unstable O(n log n) sort.
///
/// Quick sort driven by an explicit work stack instead of recursion. The larger
/// side is deferred and the smaller processed first, which bounds the stack to
/// log2(len) entries. A partition that exhausts its depth budget of 2*log2(len)
/// is finished with heap sort.
pub fn intro_sort_by<T, F>(v: &mut [T], mut less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if len < 2 {
        return;
    }
    intro_sort_with_depth(v, &mut less, 2 * (usize::BITS - len.leading_zeros()));
}

/// Intro sort with an explicit depth budget. Returns how many partitions were
/// finished with heap sort.
fn intro_sort_with_depth<T, F>(v: &mut [T], less: &mut F, depth: u32) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    let mut fallbacks = 0;
    let mut stack = [Partition::default(); WORK_STACK_CAPACITY];
    let mut pending = 0;
    let mut job = Partition { lo: 0, hi: len, depth };

    loop {
        loop {
            let Partition { lo, hi, depth } = job;
            if hi - lo <= SELECTION_SORT_THRESHOLD {
                selection_sort_by(&mut v[lo..hi], &mut *less);
                break;
            }
            if depth == 0 {
                heap_sort_by(&mut v[lo..hi], &mut *less);
                fallbacks += 1;
                break;
            }
            let pivot = lo + partition(&mut v[lo..hi], less);
            let left = Partition { lo, hi: pivot, depth: depth - 1 };
            let right = Partition { lo: pivot + 1, hi, depth: depth - 1 };
            debug_assert!(pending < WORK_STACK_CAPACITY, "intro_sort work stack overflow");
            if pivot - lo < hi - (pivot + 1) {
                stack[pending] = right;
                job = left;
            } else {
                stack[pending] = left;
                job = right;
            }
            pending += 1;
        }
        if pending == 0 {
            break;
        }
        pending -= 1;
        job = stack[pending];
    }
    fallbacks
}

/// Merges the sorted runs `v[..mid]` and `v[mid..]` in place.
///
/// Left elements not greater than the right head are already placed; the right
/// prefix strictly less than the next left element is rotated in front of it.
/// Equal elements never cross, which keeps the merge stable.
fn merge_in_place<T, F>(v: &mut [T], mut mid: usize, less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    let mut lo = 0;
    while lo < mid && mid < len {
        lo += upper_bound_by(&v[lo..mid], &v[mid], &mut *less);
        if lo == mid {
            break;
        }
        let moved = lower_bound_by(&v[mid..], &v[lo], &mut *less);
        rotate(&mut v[lo..mid + moved], mid - lo);
        lo += moved + 1;
        mid += moved;
    }
}

/// Stable O(n log n)-comparison sort without auxiliary allocation.
///
/// Bottom-up: groups of `MERGE_GROUP_SIZE` are insertion sorted, then adjacent
/// runs of doubling width are merged in place.
pub fn merge_sort_by<T, F>(v: &mut [T], mut less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if len < 2 {
        return;
    }

    for group in v.chunks_mut(MERGE_GROUP_SIZE) {
        for i in 1..group.len() {
            let mut j = i;
            while j > 0 && less(&group[j], &group[j - 1]) {
                group.swap(j, j - 1);
                j -= 1;
            }
        }
    }

    let mut width = MERGE_GROUP_SIZE;
    while width < len {
        let mut lo = 0;
        while lo + width < len {
            let hi = (lo + 2 * width).min(len);
            merge_in_place(&mut v[lo..hi], width, &mut less);
            lo = hi;
        }
        width *= 2;
    }
}

#[cfg(test)]
mod sort_tests {
    use super::*;

    fn less(a: &i32, b: &i32) -> bool {
        a < b
    }

    #[test]
    fn bounds() {
        let v = [1, 2, 2, 2, 5];
        assert_eq!(1, lower_bound_by(&v, &2, less));
        assert_eq!(4, upper_bound_by(&v, &2, less));
        assert_eq!(0, lower_bound_by(&v, &0, less));
        assert_eq!(5, upper_bound_by(&v, &9, less));
    }

    #[test]
    fn rotate_moves_block() {
        let mut v = [1, 2, 3, 4, 5];
        rotate(&mut v, 2);
        assert_eq!([3, 4, 5, 1, 2], v);
        rotate(&mut v, 0);
        rotate(&mut v, 5);
        assert_eq!([3, 4, 5, 1, 2], v);
    }

    #[test]
    fn selection_sort_small() {
        let mut v = [4, 2, 7, 1, 1];
        selection_sort_by(&mut v, less);
        assert_eq!([1, 1, 2, 4, 7], v);
    }

    #[test]
    fn intro_sort_handles_adversarial_inputs() {
        let mut sorted: Vec<i32> = (0..1000).collect();
        intro_sort_by(&mut sorted, less);
        assert!(is_sorted_by(&sorted, less));

        let mut reversed: Vec<i32> = (0..1000).rev().collect();
        intro_sort_by(&mut reversed, less);
        assert_eq!((0..1000).collect::<Vec<_>>(), reversed);

        let mut equal = vec![7; 513];
        intro_sort_by(&mut equal, less);
        assert!(equal.iter().all(|v| *v == 7));

        let mut organ: Vec<i32> = (0..500).chain((0..500).rev()).collect();
        intro_sort_by(&mut organ, less);
        assert!(is_sorted_by(&organ, less));
    }

    #[test]
    fn exhausted_depth_budget_finishes_with_heap_sort() {
        let mut v: Vec<i32> = (0..100).rev().collect();
        assert_eq!(1, intro_sort_with_depth(&mut v, &mut less, 0));
        assert_eq!((0..100).collect::<Vec<_>>(), v);

        // one partition, then both sides are still above the selection sort threshold
        let mut v: Vec<i32> = (0..100).rev().collect();
        assert_eq!(2, intro_sort_with_depth(&mut v, &mut less, 1));
        assert_eq!((0..100).collect::<Vec<_>>(), v);

        let mut small: Vec<i32> = (0..8).rev().collect();
        assert_eq!(0, intro_sort_with_depth(&mut small, &mut less, 0));
        assert_eq!((0..8).collect::<Vec<_>>(), small);
    }

    #[test]
    fn inconsistent_predicate_keeps_every_element() {
        let mut v: Vec<i32> = (0..300).collect();
        let mut calls = 0usize;
        intro_sort_by(&mut v, |a, b| {
            calls += 1;
            (a ^ b) & 1 == 1 && a < b
        });
        let mut sorted = v.clone();
        sorted.sort();
        assert_eq!((0..300).collect::<Vec<_>>(), sorted);
        assert!(calls > 0);
    }

    #[test]
    fn merge_sort_is_stable() {
        let mut v: Vec<(i32, usize)> = [5, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5].iter().copied().zip(0..).collect();
        merge_sort_by(&mut v, |a, b| a.0 < b.0);
        assert!(is_sorted_by(&v, |a, b| a.0 < b.0));
        let fives: Vec<usize> = v.iter().filter(|p| p.0 == 5).map(|p| p.1).collect();
        assert_eq!(vec![0, 4, 8, 10], fives);
    }

    #[test]
    fn merge_in_place_interleaves() {
        let mut v = [1, 3, 5, 7, 2, 4, 6, 8];
        merge_in_place(&mut v, 4, &mut less);
        assert_eq!([1, 2, 3, 4, 5, 6, 7, 8], v);
    }

    mod proptests {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn intro_sort_sorts(mut values in proptest::collection::vec(any::<i32>(), 0..300)) {
                let mut expected = values.clone();
                expected.sort();
                intro_sort_by(&mut values, |a, b| a < b);
                prop_assert_eq!(&expected, &values);
                intro_sort_by(&mut values, |a, b| a < b);
                prop_assert_eq!(&expected, &values);
            }

            #[test]
            fn merge_sort_matches_std_stable_sort(keys in proptest::collection::vec(0u8..8, 0..300)) {
                let mut values: Vec<(u8, usize)> = keys.iter().copied().zip(0..).collect();
                let mut expected = values.clone();
                expected.sort_by_key(|p| p.0);
                merge_sort_by(&mut values, |a, b| a.0 < b.0);
                prop_assert_eq!(expected, values);
            }

            #[test]
            fn descending_predicate(mut values in proptest::collection::vec(any::<i16>(), 0..100)) {
                merge_sort_by(&mut values, |a, b| a > b);
                prop_assert!(is_sorted_by(&values, |a, b| a > b));
                intro_sort_by(&mut values, |a, b| a < b);
                prop_assert!(is_sorted_by(&values, |a, b| a < b));
            }
        }
    }
}
