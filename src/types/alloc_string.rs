// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! Allocator-owned string duplication. The string containers and the shared
//! library handle store their text through this instead of the global heap
//! so that a single allocator governs a container's whole footprint.

use core::ptr;

use crate::allocator::Allocator;
use crate::error::{UtilError, UtilResult};
use crate::set_error_msg;

/// A string duplicated into allocator-owned memory.
///
/// Ownership is manual, like the allocation it wraps: whoever holds the
/// value must eventually pass it back to [`AllocString::free`] with the same
/// allocator. The type is deliberately not `Clone`.
pub(crate) struct AllocString {
    ptr: *mut u8,
    len: usize,
}

unsafe impl Send for AllocString {}

impl AllocString {
    /// Copies `s` into memory owned by `allocator`.
    pub(crate) fn duplicate(s: &str, allocator: &Allocator) -> UtilResult<Self> {
        // Always at least one byte so empty strings still own a block.
        let ptr = allocator.allocate(s.len().max(1));
        if ptr.is_null() {
            set_error_msg!("failed to allocate memory for string copy");
            return Err(UtilError::BadAlloc);
        }
        if !s.is_empty() {
            unsafe { ptr::copy_nonoverlapping(s.as_ptr(), ptr, s.len()) };
        }
        Ok(Self { ptr, len: s.len() })
    }

    /// The owned text.
    pub(crate) fn as_str(&self) -> &str {
        if self.len == 0 {
            return "";
        }
        let bytes = unsafe { core::slice::from_raw_parts(self.ptr, self.len) };
        core::str::from_utf8(bytes).unwrap_or("")
    }

    /// Releases the owned memory.
    ///
    /// # Safety
    ///
    /// `allocator` must be the allocator (or a copy of it) the string was
    /// duplicated with.
    pub(crate) unsafe fn free(self, allocator: &Allocator) {
        allocator.deallocate(self.ptr);
    }
}

impl core::fmt::Debug for AllocString {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "AllocString({:?})", self.as_str())
    }
}
