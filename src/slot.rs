//! One sparse storage cell: either a live value or a free-list node.
//!
//! The cell itself does not know which one it holds. The owning storage's
//! occupancy bitmap decides, and every accessor takes that bit and asserts it.

use std::mem::{ManuallyDrop, MaybeUninit};

/// Doubly linked free-list node stored inside a hole. Ends are `NPOS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FreeLink {
    pub prev: usize,
    pub next: usize,
}

#[repr(C)]
union Cell<T> {
    value: ManuallyDrop<T>,
    link: FreeLink,
}

/// Storage big enough and aligned for either a `T` or a `FreeLink`.
#[repr(transparent)]
pub(crate) struct Slot<T> {
    cell: MaybeUninit<Cell<T>>,
}

impl<T> Slot<T> {
    /// # Safety
    /// `occupied` must be the slot's bitmap bit and must be set.
    #[inline(always)]
    pub unsafe fn value(&self, occupied: bool) -> &T {
        debug_assert!(occupied, "slot holds a free-list node, not a value");
        &(*self.cell.as_ptr()).value
    }

    /// # Safety
    /// Same as `value`.
    #[inline(always)]
    pub unsafe fn value_mut(&mut self, occupied: bool) -> &mut T {
        debug_assert!(occupied, "slot holds a free-list node, not a value");
        &mut (*self.cell.as_mut_ptr()).value
    }

    /// Pointer to the value position, valid to write when the slot is a hole.
    #[inline(always)]
    pub fn value_ptr(&mut self) -> *mut T {
        self.cell.as_mut_ptr() as *mut T
    }

    #[inline(always)]
    pub fn value_ptr_const(&self) -> *const T {
        self.cell.as_ptr() as *const T
    }

    /// # Safety
    /// `occupied` must be the slot's bitmap bit and must be clear.
    #[inline(always)]
    pub unsafe fn link(&self, occupied: bool) -> FreeLink {
        debug_assert!(!occupied, "slot holds a value, not a free-list node");
        (*self.cell.as_ptr()).link
    }

    /// Overwrites the slot with a free-list node. Any value must already be moved out or dropped.
    #[inline(always)]
    pub fn set_link(&mut self, link: FreeLink) {
        self.cell = MaybeUninit::new(Cell { link });
    }

    /// # Safety
    /// `occupied` must be the slot's bitmap bit and must be clear.
    #[inline(always)]
    pub unsafe fn link_mut(&mut self, occupied: bool) -> &mut FreeLink {
        debug_assert!(!occupied, "slot holds a value, not a free-list node");
        &mut (*self.cell.as_mut_ptr()).link
    }

    /// Moves the value out, leaving the slot logically uninitialized.
    ///
    /// # Safety
    /// `occupied` must be the slot's bitmap bit and must be set; the caller clears it.
    #[inline(always)]
    pub unsafe fn take(&mut self, occupied: bool) -> T {
        debug_assert!(occupied, "slot holds a free-list node, not a value");
        std::ptr::read(self.value_ptr())
    }
}
