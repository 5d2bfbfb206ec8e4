//! Binary min-heap over a slice: no element is `less` than its parent.

/// Moves the element at `index` towards the leaves within `v[..len]`.
pub fn sift_down_by<T, F>(v: &mut [T], mut index: usize, len: usize, less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    debug_assert!(len <= v.len(), "sift_down: len <= v.len()");
    loop {
        let left = 2 * index + 1;
        if left >= len {
            break;
        }
        let right = left + 1;
        let child = if right < len && less(&v[right], &v[left]) { right } else { left };
        if !less(&v[child], &v[index]) {
            break;
        }
        v.swap(index, child);
        index = child;
    }
}

/// Moves the element at `index` towards the root. Returns its final index.
pub fn sift_up_by<T, F>(v: &mut [T], mut index: usize, mut less: F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    while index > 0 {
        let parent = (index - 1) / 2;
        if !less(&v[index], &v[parent]) {
            break;
        }
        v.swap(index, parent);
        index = parent;
    }
    index
}

pub fn heapify_by<T, F>(v: &mut [T], mut less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    for index in (0..len / 2).rev() {
        sift_down_by(v, index, len, &mut less);
    }
}

pub fn is_heap_by<T, F>(v: &[T], mut less: F) -> bool
where
    F: FnMut(&T, &T) -> bool,
{
    (1..v.len()).all(|index| !less(&v[index], &v[(index - 1) / 2]))
}

/// Moves the top to the last position and restores the heap on the rest.
pub fn heap_pop_by<T, F>(v: &mut [T], mut less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    if v.is_empty() {
        return;
    }
    let last = v.len() - 1;
    v.swap(0, last);
    sift_down_by(v, 0, last, &mut less);
}

/// Moves the element at `index` to the last position and restores the heap on the rest.
pub fn heap_remove_at_by<T, F>(v: &mut [T], index: usize, mut less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    let last = v.len() - 1;
    if index == last {
        return;
    }
    v.swap(index, last);
    sift_down_by(v, index, last, &mut less);
    sift_up_by(&mut v[..last], index, &mut less);
}

/// Sorts ascending under `less`.
pub fn heap_sort_by<T, F>(v: &mut [T], mut less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    let mut greater = |a: &T, b: &T| less(b, a);
    let len = v.len();
    for index in (0..len / 2).rev() {
        sift_down_by(v, index, len, &mut greater);
    }
    for end in (1..len).rev() {
        v.swap(0, end);
        sift_down_by(v, 0, end, &mut greater);
    }
}
