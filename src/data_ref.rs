use std::fmt;
use std::ptr;

/// Absent index sentinel.
pub const NPOS: usize = usize::MAX;

/// Mutable result of an add or lookup: a reference to the element and its index.
///
/// A `DataRef` is valid iff its index is not `NPOS`; the reference is present
/// exactly when the index is valid.
pub struct DataRef<'a, T> {
    value: Option<&'a mut T>,
    index: usize,
}

impl<'a, T> DataRef<'a, T> {
    #[inline(always)]
    pub(crate) fn new(value: &'a mut T, index: usize) -> DataRef<'a, T> {
        debug_assert_ne!(NPOS, index, "valid DataRef with NPOS index");
        DataRef { value: Some(value), index }
    }

    #[inline(always)]
    pub fn npos() -> DataRef<'a, T> {
        DataRef { value: None, index: NPOS }
    }

    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        debug_assert_eq!(self.index != NPOS, self.value.is_some(), "DataRef pointer and index disagree");
        self.index != NPOS
    }

    #[inline(always)]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline(always)]
    pub fn get(&self) -> Option<&T> {
        self.value.as_deref()
    }

    #[inline(always)]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.value.as_deref_mut()
    }

    /// Raw element pointer, null when invalid.
    pub fn ptr(&self) -> *const T {
        self.value.as_deref().map_or(ptr::null(), |v| v as *const T)
    }

    pub fn into_mut(self) -> Option<&'a mut T> {
        self.value
    }

    pub fn into_option(self) -> Option<(usize, &'a mut T)> {
        let index = self.index;
        self.value.map(|v| (index, v))
    }
}

impl<'a, T: fmt::Debug> fmt::Debug for DataRef<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataRef").field("index", &self.index).field("value", &self.value).finish()
    }
}

/// Shared counterpart of `DataRef`, returned by lookups on `&self`.
pub struct CDataRef<'a, T> {
    value: Option<&'a T>,
    index: usize,
}

impl<'a, T> Clone for CDataRef<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for CDataRef<'a, T> {}

impl<'a, T> CDataRef<'a, T> {
    #[inline(always)]
    pub(crate) fn new(value: &'a T, index: usize) -> CDataRef<'a, T> {
        debug_assert_ne!(NPOS, index, "valid CDataRef with NPOS index");
        CDataRef { value: Some(value), index }
    }

    #[inline(always)]
    pub fn npos() -> CDataRef<'a, T> {
        CDataRef { value: None, index: NPOS }
    }

    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        debug_assert_eq!(self.index != NPOS, self.value.is_some(), "CDataRef pointer and index disagree");
        self.index != NPOS
    }

    #[inline(always)]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline(always)]
    pub fn get(&self) -> Option<&'a T> {
        self.value
    }

    pub fn ptr(&self) -> *const T {
        self.value.map_or(ptr::null(), |v| v as *const T)
    }

    pub fn into_option(self) -> Option<(usize, &'a T)> {
        let index = self.index;
        self.value.map(|v| (index, v))
    }
}

impl<'a, T: fmt::Debug> fmt::Debug for CDataRef<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CDataRef").field("index", &self.index).field("value", &self.value).finish()
    }
}

impl<'a, T> From<DataRef<'a, T>> for CDataRef<'a, T> {
    fn from(data_ref: DataRef<'a, T>) -> Self {
        let index = data_ref.index;
        match data_ref.value {
            Some(value) => CDataRef::new(value, index),
            None => CDataRef::npos(),
        }
    }
}
