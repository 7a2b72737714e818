// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! Growable raw byte buffer; the binary sibling of `CharArray` without the
//! C-string length accounting.

use core::fmt;
use core::ptr;

use crate::allocator::Allocator;
use crate::error::{UtilError, UtilResult};
use crate::set_error_msg;

/// Growable byte buffer used as the generic payload carrier.
pub struct ByteArray {
    buffer: *mut u8,
    buffer_length: usize,
    buffer_capacity: usize,
    owns_buffer: bool,
    allocator: Allocator,
}

unsafe impl Send for ByteArray {}

impl Default for ByteArray {
    fn default() -> Self {
        Self::zero_initialized()
    }
}

impl ByteArray {
    /// A member-wise zero value; safe to `fini` and ready for `init`.
    pub fn zero_initialized() -> Self {
        Self {
            buffer: ptr::null_mut(),
            buffer_length: 0,
            buffer_capacity: 0,
            owns_buffer: true,
            allocator: Allocator::zero_initialized(),
        }
    }

    /// Initialises the array with the given capacity; zero leaves the
    /// buffer unallocated.
    pub fn init(&mut self, buffer_capacity: usize, allocator: &Allocator) -> UtilResult<()> {
        if !allocator.is_valid() {
            set_error_msg!("byte array has no valid allocator");
            return Err(UtilError::InvalidArgument);
        }
        self.owns_buffer = true;
        self.buffer_length = 0;
        self.buffer_capacity = buffer_capacity;
        self.allocator = *allocator;
        self.buffer = ptr::null_mut();
        if buffer_capacity > 0 {
            self.buffer = allocator.allocate(buffer_capacity);
            if self.buffer.is_null() {
                self.buffer_capacity = 0;
                set_error_msg!("failed to allocate memory for byte array");
                return Err(UtilError::BadAlloc);
            }
        }
        Ok(())
    }

    /// Releases owned storage; idempotent, no-op on zero-initialised values.
    pub fn fini(&mut self) -> UtilResult<()> {
        if !self.buffer.is_null() && self.owns_buffer {
            if !self.allocator.is_valid() {
                set_error_msg!("byte array has no valid allocator");
                return Err(UtilError::Error);
            }
            unsafe { self.allocator.deallocate(self.buffer) };
        }
        self.buffer = ptr::null_mut();
        self.buffer_length = 0;
        self.buffer_capacity = 0;
        Ok(())
    }

    /// Logical length in bytes.
    pub fn buffer_length(&self) -> usize {
        self.buffer_length
    }

    /// Current capacity in bytes.
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    /// The logical contents.
    pub fn as_slice(&self) -> &[u8] {
        if self.buffer.is_null() {
            return &[];
        }
        unsafe { core::slice::from_raw_parts(self.buffer, self.buffer_length) }
    }

    /// Sets the buffer to exactly `new_size` bytes; on reallocation failure
    /// the existing buffer is left intact. A non-owned buffer is promoted
    /// to an owned copy of min(old, new) bytes. Zero is `InvalidArgument`.
    pub fn resize(&mut self, new_size: usize) -> UtilResult<()> {
        if new_size == 0 {
            set_error_msg!("new size of byte array has to be greater than zero");
            return Err(UtilError::InvalidArgument);
        }
        if !self.allocator.is_valid() {
            set_error_msg!("byte array has no valid allocator");
            return Err(UtilError::Error);
        }
        if new_size == self.buffer_capacity {
            return Ok(());
        }

        let old_buf = self.buffer;
        let old_capacity = self.buffer_capacity;
        let old_length = self.buffer_length;

        if self.owns_buffer {
            let new_buf = unsafe { self.allocator.reallocate(self.buffer, new_size) };
            if new_buf.is_null() {
                set_error_msg!("failed to reallocate memory for byte array");
                return Err(UtilError::BadAlloc);
            }
            self.buffer = new_buf;
        } else {
            let allocator = self.allocator;
            self.init(new_size, &allocator)?;
            let n = new_size.min(old_capacity);
            if n > 0 {
                unsafe { ptr::copy_nonoverlapping(old_buf, self.buffer, n) };
            }
        }

        self.buffer_capacity = new_size;
        self.buffer_length = old_length.min(new_size);
        Ok(())
    }

    /// Grows to hold at least `new_size` bytes; never shrinks.
    pub fn expand_as_needed(&mut self, new_size: usize) -> UtilResult<()> {
        if new_size <= self.buffer_capacity {
            return Ok(());
        }
        let minimum_size = self.buffer_capacity + (self.buffer_capacity >> 1);
        self.resize(new_size.max(minimum_size))
    }

    /// Replaces the contents with a copy of `src`.
    pub fn copy_from(&mut self, src: &[u8]) -> UtilResult<()> {
        self.expand_as_needed(src.len()).map_err(|e| {
            set_error_msg!("byte array failed to expand");
            e
        })?;
        if !src.is_empty() {
            unsafe { ptr::copy_nonoverlapping(src.as_ptr(), self.buffer, src.len()) };
        }
        self.buffer_length = src.len();
        Ok(())
    }

    /// Appends a copy of `src`.
    pub fn append(&mut self, src: &[u8]) -> UtilResult<()> {
        let new_length = self.buffer_length + src.len();
        self.expand_as_needed(new_length).map_err(|e| {
            set_error_msg!("byte array failed to expand");
            e
        })?;
        if !src.is_empty() {
            unsafe {
                ptr::copy_nonoverlapping(src.as_ptr(), self.buffer.add(self.buffer_length), src.len())
            };
        }
        self.buffer_length = new_length;
        Ok(())
    }
}

impl Drop for ByteArray {
    fn drop(&mut self) {
        let _ = self.fini();
    }
}

impl fmt::Debug for ByteArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteArray")
            .field("buffer_length", &self.buffer_length)
            .field("buffer_capacity", &self.buffer_capacity)
            .field("owns_buffer", &self.owns_buffer)
            .finish()
    }
}
