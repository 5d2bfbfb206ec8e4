//! Bulk removal by predicate.
//!
//! Both functions partition the slice in place and return the number of kept
//! items. Kept items end up in `v[..kept]`, discarded ones in `v[kept..]`; the
//! caller truncates to drop them.

/// Order-preserving: kept items stay in their relative order.
///
/// One forward pass; `pred` is called exactly once per item. Each kept item
/// after the first discarded one is swapped down once.
pub fn remove_all<T, P>(v: &mut [T], mut pred: P) -> usize
where
    P: FnMut(&T) -> bool,
{
    let len = v.len();
    let mut kept = match v.iter().position(|item| pred(item)) {
        Some(first) => first,
        None => return len,
    };
    for index in kept + 1..len {
        if !pred(&v[index]) {
            v.swap(kept, index);
            kept += 1;
        }
    }
    kept
}

/// Fills each discarded slot from the end of the slice; relative order of kept items is lost.
pub fn remove_all_swap<T, P>(v: &mut [T], mut pred: P) -> usize
where
    P: FnMut(&T) -> bool,
{
    let mut index = 0;
    let mut end = v.len();
    while index < end {
        if pred(&v[index]) {
            end -= 1;
            v.swap(index, end);
        } else {
            index += 1;
        }
    }
    end
}
