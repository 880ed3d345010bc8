//! Lock-free change notification from the control context to the render context.
//!
//! [`DirtyFlags`] is a bit set with one bit per registry index. The control
//! context marks a bit after storing a new parameter value; the render
//! context takes the whole set at the start of a block and recomputes
//! whatever the set bits feed.
//!
//! Marking uses release ordering and taking uses acquire-release ordering,
//! so a value stored before `mark` is visible to whoever takes that bit. A
//! mark that races with `take` is either included in this block or left
//! for the next one; it is never lost.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::types::MAX_PARAMETERS;

/// Atomic dirty bit set, one bit per parameter index.
#[derive(Debug, Default)]
pub struct DirtyFlags {
    bits: AtomicU32,
}

impl DirtyFlags {
    /// Create a clean flag set.
    pub const fn new() -> Self {
        Self {
            bits: AtomicU32::new(0),
        }
    }

    /// Flag the parameter at `index` as changed.
    #[inline]
    pub fn mark(&self, index: usize) {
        debug_assert!(index < MAX_PARAMETERS, "dirty index {} out of range", index);
        self.bits.fetch_or(Self::bit(index), Ordering::Release);
    }

    /// Flag every parameter as changed.
    #[inline]
    pub fn mark_all(&self) {
        self.bits.store(u32::MAX, Ordering::Release);
    }

    /// Take and clear the current set.
    #[inline]
    pub fn take(&self) -> DirtySet {
        DirtySet(self.bits.swap(0, Ordering::AcqRel))
    }

    /// Whether any bit is set, without clearing.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.bits.load(Ordering::Acquire) != 0
    }

    #[inline]
    const fn bit(index: usize) -> u32 {
        1u32 << (index % MAX_PARAMETERS)
    }
}

/// Snapshot of dirty bits returned by [`DirtyFlags::take`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtySet(u32);

impl DirtySet {
    /// Whether the parameter at `index` changed.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.0 & DirtyFlags::bit(index) != 0
    }

    /// Whether nothing changed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}
