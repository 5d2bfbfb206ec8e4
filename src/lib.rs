#[macro_use]
mod logging;

mod allocator;
mod memory;
pub mod memops;
mod data_ref;
mod raw_array;
mod array;
mod array_uninit;
mod bitmap;
mod slot;
mod raw_sparse;
mod sparse_array;
mod iter;
mod cursor;
mod traits;
pub mod algo;

pub use allocator::{grow_capacity, min_capacity, shrink_capacity, Allocator, HeapAllocator};
pub use memory::{AllocStats, CountingAllocator};
pub use memops::Zeroable;
pub use data_ref::{CDataRef, DataRef, NPOS};
pub use array::{Array, IntoIter, Vector};
pub use array_uninit::{ArrayInitializer, VacantSlot};
pub use sparse_array::{SparseArray, SparseVacantSlot, SparseVector};
pub use iter::{Indexed, Iter as SparseIter, IterMut as SparseIterMut, IntoIter as SparseIntoIter};
pub use cursor::{ArrayCursor, ArrayCursorMut, Cursor, CursorMut, Forward, Inverse, SharedCursor, SparseCursor, SparseCursorMut};
pub use traits::CollectIn;

#[cfg(test)]
pub mod dropflag;
