// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Growable NUL-terminated character buffer
//! OWNERS: @runtime
//! INVARIANTS:
//! - `buffer_length` counts logical bytes and includes the terminating NUL
//!   whenever a string is present
//! - A non-owned buffer is never freed; growth promotes it to an owned copy
//! - All storage flows through the array's `Allocator`

use core::fmt;
use core::ptr;

use crate::allocator::Allocator;
use crate::error::{UtilError, UtilResult};
use crate::set_error_msg;

/// Growable character buffer with C-string length accounting, used as the
/// format target of the logging pipeline.
pub struct CharArray {
    buffer: *mut u8,
    buffer_length: usize,
    buffer_capacity: usize,
    owns_buffer: bool,
    allocator: Allocator,
}

unsafe impl Send for CharArray {}

impl Default for CharArray {
    fn default() -> Self {
        Self::zero_initialized()
    }
}

impl CharArray {
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

    /// Initialises the array with the given capacity. A zero capacity
    /// leaves the buffer unallocated; otherwise the first byte is NUL.
    pub fn init(&mut self, buffer_capacity: usize, allocator: &Allocator) -> UtilResult<()> {
        if !allocator.is_valid() {
            set_error_msg!("char array has no valid allocator");
            return Err(UtilError::Error);
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
                set_error_msg!("failed to allocate memory for char array");
                return Err(UtilError::BadAlloc);
            }
            unsafe { self.buffer.write(0) };
        }
        Ok(())
    }

    /// Wraps a caller-provided buffer without taking ownership. Resizing
    /// promotes the contents into an allocator-owned copy.
    ///
    /// # Safety
    ///
    /// `buffer` must stay valid until this array is resized, finalised or
    /// dropped, whichever comes first.
    pub unsafe fn with_borrowed_buffer(buffer: &mut [u8], allocator: &Allocator) -> Self {
        Self {
            buffer: buffer.as_mut_ptr(),
            buffer_length: 0,
            buffer_capacity: buffer.len(),
            owns_buffer: false,
            allocator: *allocator,
        }
    }

    /// Releases owned storage and returns the value to its zero state. A
    /// second call, or a call on a zero-initialised value, is a no-op
    /// success.
    pub fn fini(&mut self) -> UtilResult<()> {
        if !self.buffer.is_null() && self.owns_buffer {
            if !self.allocator.is_valid() {
                set_error_msg!("char array has no valid allocator");
                return Err(UtilError::Error);
            }
            unsafe { self.allocator.deallocate(self.buffer) };
        }
        self.buffer = ptr::null_mut();
        self.buffer_length = 0;
        self.buffer_capacity = 0;
        Ok(())
    }

    /// Logical length in bytes, terminator included when a string is held.
    pub fn buffer_length(&self) -> usize {
        self.buffer_length
    }

    /// Current capacity in bytes.
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    /// The held string, without its terminator. Empty when nothing has been
    /// written yet.
    pub fn as_str(&self) -> &str {
        if self.buffer.is_null() || self.buffer_length == 0 {
            return "";
        }
        let bytes =
            unsafe { core::slice::from_raw_parts(self.buffer, self.buffer_length - 1) };
        core::str::from_utf8(bytes).unwrap_or("")
    }

    /// The raw logical bytes, terminator included.
    pub fn as_bytes(&self) -> &[u8] {
        if self.buffer.is_null() {
            return &[];
        }
        unsafe { core::slice::from_raw_parts(self.buffer, self.buffer_length) }
    }

    /// Sets the buffer to exactly `new_size` bytes.
    ///
    /// A zero size is `InvalidArgument`. For an owned buffer the block is
    /// reallocated in place; on failure the existing buffer stays intact
    /// and `BadAlloc` is returned. A borrowed buffer is replaced by a fresh
    /// owned allocation holding min(old, new) bytes with the copied prefix
    /// forcibly terminated. The logical length becomes
    /// min(old length, new size).
    pub fn resize(&mut self, new_size: usize) -> UtilResult<()> {
        if new_size == 0 {
            set_error_msg!("new size of char_array has to be greater than zero");
            return Err(UtilError::InvalidArgument);
        }
        if !self.allocator.is_valid() {
            set_error_msg!("char array has no valid allocator");
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
                set_error_msg!("failed to reallocate memory for char array");
                return Err(UtilError::BadAlloc);
            }
            self.buffer = new_buf;
        } else {
            let allocator = self.allocator;
            self.init(new_size, &allocator)?;
            let n = new_size.min(old_capacity);
            if n > 0 {
                unsafe {
                    ptr::copy_nonoverlapping(old_buf, self.buffer, n);
                    self.buffer.add(n - 1).write(0);
                }
            }
        }

        self.buffer_capacity = new_size;
        self.buffer_length = old_length.min(new_size);
        Ok(())
    }

    /// Grows the buffer to hold at least `new_size` bytes; never shrinks.
    /// Growth jumps to at least 1.5x the current capacity to amortise
    /// repeated appends.
    pub fn expand_as_needed(&mut self, new_size: usize) -> UtilResult<()> {
        if new_size <= self.buffer_capacity {
            return Ok(());
        }
        let minimum_size = self.buffer_capacity + (self.buffer_capacity >> 1);
        self.resize(new_size.max(minimum_size))
    }

    /// Formats into the array from the beginning, growing as needed. The
    /// length becomes the formatted length plus one for the terminator.
    ///
    /// Mirrors the two-pass sizing of a `vsnprintf` loop: the arguments are
    /// measured first, the buffer expanded, then written.
    pub fn format(&mut self, args: fmt::Arguments<'_>) -> UtilResult<()> {
        struct CountingWriter(usize);
        impl fmt::Write for CountingWriter {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                self.0 += s.len();
                Ok(())
            }
        }

        let mut counter = CountingWriter(0);
        if fmt::write(&mut counter, args).is_err() {
            set_error_msg!("formatting into char array failed");
            return Err(UtilError::Error);
        }
        let new_size = counter.0 + 1;
        if new_size > self.buffer_capacity {
            self.expand_as_needed(new_size).map_err(|e| {
                set_error_msg!("char array failed to expand");
                e
            })?;
        }

        struct RawWriter {
            at: *mut u8,
        }
        impl fmt::Write for RawWriter {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                unsafe {
                    ptr::copy_nonoverlapping(s.as_ptr(), self.at, s.len());
                    self.at = self.at.add(s.len());
                }
                Ok(())
            }
        }

        let mut writer = RawWriter { at: self.buffer };
        if fmt::write(&mut writer, args).is_err() {
            set_error_msg!("formatting into resized char array failed");
            return Err(UtilError::Error);
        }
        unsafe { self.buffer.add(new_size - 1).write(0) };
        self.buffer_length = new_size;
        Ok(())
    }

    /// Copies `src` into the buffer from the beginning (no terminator
    /// handling); the length becomes `src.len()`.
    pub fn memcpy(&mut self, src: &[u8]) -> UtilResult<()> {
        self.expand_as_needed(src.len()).map_err(|e| {
            set_error_msg!("char array failed to expand");
            e
        })?;
        if !src.is_empty() {
            unsafe { ptr::copy_nonoverlapping(src.as_ptr(), self.buffer, src.len()) };
        }
        self.buffer_length = src.len();
        Ok(())
    }

    /// Replaces the contents with `src` plus a terminator.
    pub fn strcpy(&mut self, src: &str) -> UtilResult<()> {
        self.expand_as_needed(src.len() + 1).map_err(|e| {
            set_error_msg!("char array failed to expand");
            e
        })?;
        unsafe {
            ptr::copy_nonoverlapping(src.as_ptr(), self.buffer, src.len());
            self.buffer.add(src.len()).write(0);
        }
        self.buffer_length = src.len() + 1;
        Ok(())
    }

    /// Appends the first `n` bytes of `src`, maintaining a single
    /// terminating NUL. A `buffer_length` of zero means "no current
    /// string"; otherwise the current string length is `buffer_length - 1`.
    pub fn strncat(&mut self, src: &str, n: usize) -> UtilResult<()> {
        let n = n.min(src.len());
        let current_strlen = if self.buffer_length == 0 { 0 } else { self.buffer_length - 1 };
        let new_length = current_strlen + n + 1;
        self.expand_as_needed(new_length).map_err(|e| {
            set_error_msg!("char array failed to expand");
            e
        })?;
        unsafe {
            ptr::copy_nonoverlapping(src.as_ptr(), self.buffer.add(current_strlen), n);
            self.buffer.add(new_length - 1).write(0);
        }
        self.buffer_length = new_length;
        Ok(())
    }

    /// Appends all of `src`.
    pub fn strcat(&mut self, src: &str) -> UtilResult<()> {
        self.strncat(src, src.len())
    }
}

impl fmt::Write for CharArray {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.strcat(s).map_err(|_| fmt::Error)
    }
}

impl Drop for CharArray {
    fn drop(&mut self) {
        let _ = self.fini();
    }
}

impl fmt::Debug for CharArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharArray")
            .field("contents", &self.as_str())
            .field("buffer_length", &self.buffer_length)
            .field("buffer_capacity", &self.buffer_capacity)
            .field("owns_buffer", &self.owns_buffer)
            .finish()
    }
}
