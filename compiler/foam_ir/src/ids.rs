//! Handle newtypes for FOAM nodes and their side tables.

use std::fmt;

/// Index of a node in a [`FoamArena`](crate::FoamArena).
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct FoamId(u32);

impl FoamId {
    /// The null child. Freeing it is a no-op.
    pub const NONE: FoamId = FoamId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for FoamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "FoamId({})", self.0)
        } else {
            write!(f, "FoamId::NONE")
        }
    }
}

impl Default for FoamId {
    fn default() -> Self {
        Self::NONE
    }
}

/// Non-owning handle to a symbol-table entry held outside the IR.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct SymeId(u32);

impl SymeId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Handle to optimizer data attached to a node. Opaque to the IR.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct OptInfoId(u32);

impl OptInfoId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Convert a length to `u32`, panicking on overflow.
#[inline]
pub(crate) fn to_u32(len: usize, what: &str) -> u32 {
    match u32::try_from(len) {
        Ok(v) => v,
        Err(_) => panic!("too many {what}: {len} exceeds u32::MAX"),
    }
}
