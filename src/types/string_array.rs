// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! Fixed-slot array of owned, individually optional strings with
//! lexicographic compare and sort.

use core::cmp::Ordering;
use core::fmt;
use core::mem;
use core::ptr;

use crate::allocator::Allocator;
use crate::error::{UtilError, UtilResult};
use crate::set_error_msg;
use crate::types::alloc_string::AllocString;

type Slot = Option<AllocString>;

/// Array of owned nullable strings backed by a caller allocator.
pub struct StringArray {
    data: *mut Slot,
    size: usize,
    allocator: Allocator,
}

unsafe impl Send for StringArray {}

impl Default for StringArray {
    fn default() -> Self {
        Self::zero_initialized()
    }
}

impl StringArray {
    /// A member-wise zero value; safe to `fini` and ready for `init`.
    pub fn zero_initialized() -> Self {
        Self { data: ptr::null_mut(), size: 0, allocator: Allocator::zero_initialized() }
    }

    /// Allocates `size` slots, all holding no string.
    pub fn init(&mut self, size: usize, allocator: &Allocator) -> UtilResult<()> {
        if !self.data.is_null() {
            set_error_msg!("string array is already initialized");
            return Err(UtilError::InvalidArgument);
        }
        if !allocator.is_valid() {
            set_error_msg!("string array has no valid allocator");
            return Err(UtilError::InvalidArgument);
        }
        self.allocator = *allocator;
        self.size = size;
        self.data = ptr::null_mut();
        if size > 0 {
            self.data = Self::allocate_slots(size, allocator)?;
            for i in 0..size {
                unsafe { self.data.add(i).write(None) };
            }
        }
        Ok(())
    }

    fn allocate_slots(size: usize, allocator: &Allocator) -> UtilResult<*mut Slot> {
        let bytes = size.checked_mul(mem::size_of::<Slot>()).ok_or_else(|| {
            set_error_msg!("string array size overflows");
            UtilError::BadAlloc
        })?;
        let data = allocator.allocate(bytes) as *mut Slot;
        if data.is_null() {
            set_error_msg!("failed to allocate memory for string array");
            return Err(UtilError::BadAlloc);
        }
        Ok(data)
    }

    /// Frees every held string and the slot array itself. Idempotent;
    /// tolerates a zero-initialised value.
    pub fn fini(&mut self) -> UtilResult<()> {
        if !self.data.is_null() {
            for i in 0..self.size {
                if let Some(s) = unsafe { ptr::read(self.data.add(i)) } {
                    unsafe { s.free(&self.allocator) };
                }
            }
            unsafe { self.allocator.deallocate(self.data as *mut u8) };
        }
        self.data = ptr::null_mut();
        self.size = 0;
        Ok(())
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.size
    }

    /// True when the array holds no slots.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The string at `index`, or `None` for an empty slot or an index out
    /// of range.
    pub fn get(&self, index: usize) -> Option<&str> {
        if index >= self.size {
            return None;
        }
        let slot = unsafe { &*self.data.add(index) };
        slot.as_ref().map(|s| s.as_str())
    }

    /// Stores an owned copy of `value` at `index`, releasing any previous
    /// string there.
    pub fn assign(&mut self, index: usize, value: &str) -> UtilResult<()> {
        if index >= self.size {
            set_error_msg!("index {} is out of bounds (size {})", index, self.size);
            return Err(UtilError::InvalidArgument);
        }
        let copy = AllocString::duplicate(value, &self.allocator)?;
        let slot = unsafe { self.data.add(index) };
        if let Some(old) = unsafe { ptr::read(slot) } {
            unsafe { old.free(&self.allocator) };
        }
        unsafe { ptr::write(slot, Some(copy)) };
        Ok(())
    }

    /// Clears the slot at `index`, releasing its string.
    pub fn unassign(&mut self, index: usize) -> UtilResult<()> {
        if index >= self.size {
            set_error_msg!("index {} is out of bounds (size {})", index, self.size);
            return Err(UtilError::InvalidArgument);
        }
        let slot = unsafe { self.data.add(index) };
        if let Some(old) = unsafe { ptr::read(slot) } {
            unsafe { old.free(&self.allocator) };
        }
        unsafe { ptr::write(slot, None) };
        Ok(())
    }

    /// Resizes to `new_size` slots. Shrinking reclaims the removed strings;
    /// growing zero-initialises the new slots. A failed allocation leaves
    /// the array unchanged.
    pub fn resize(&mut self, new_size: usize) -> UtilResult<()> {
        if !self.allocator.is_valid() {
            set_error_msg!("string array has no valid allocator");
            return Err(UtilError::InvalidArgument);
        }
        if new_size == self.size {
            return Ok(());
        }

        // Strings past the new size go away regardless of how the
        // reallocation fares, so drop them up front.
        for i in new_size..self.size {
            if let Some(s) = unsafe { ptr::read(self.data.add(i)) } {
                unsafe { s.free(&self.allocator) };
            }
            unsafe { ptr::write(self.data.add(i), None) };
        }

        if new_size == 0 {
            unsafe { self.allocator.deallocate(self.data as *mut u8) };
            self.data = ptr::null_mut();
            self.size = 0;
            return Ok(());
        }

        let bytes = new_size.checked_mul(mem::size_of::<Slot>()).ok_or_else(|| {
            set_error_msg!("string array size overflows");
            UtilError::BadAlloc
        })?;
        let new_data = unsafe { self.allocator.reallocate(self.data as *mut u8, bytes) } as *mut Slot;
        if new_data.is_null() {
            if new_size < self.size {
                self.size = new_size;
            }
            set_error_msg!("failed to resize string array");
            return Err(UtilError::BadAlloc);
        }
        for i in self.size..new_size {
            unsafe { new_data.add(i).write(None) };
        }
        self.data = new_data;
        self.size = new_size;
        Ok(())
    }

    /// Lexicographic comparison: element-wise over the shared prefix, then
    /// by size. An empty slot on either side is an error.
    pub fn cmp(&self, other: &StringArray) -> UtilResult<Ordering> {
        let shared = self.size.min(other.size);
        for i in 0..shared {
            let (lhs, rhs) = (self.get(i), other.get(i));
            let (Some(lhs), Some(rhs)) = (lhs, rhs) else {
                set_error_msg!("string array contains null element at index {}", i);
                return Err(UtilError::Error);
            };
            match lhs.cmp(rhs) {
                Ordering::Equal => continue,
                unequal => return Ok(unequal),
            }
        }
        Ok(self.size.cmp(&other.size))
    }

    /// Sorts the slots ascending; empty slots sort to the end.
    pub fn sort(&mut self) -> UtilResult<()> {
        if self.data.is_null() {
            return Ok(());
        }
        let slots = unsafe { core::slice::from_raw_parts_mut(self.data, self.size) };
        slots.sort_unstable_by(|a, b| match (a, b) {
            (Some(a), Some(b)) => a.as_str().cmp(b.as_str()),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        Ok(())
    }
}

impl Drop for StringArray {
    fn drop(&mut self) {
        let _ = self.fini();
    }
}

impl fmt::Debug for StringArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for i in 0..self.size {
            list.entry(&self.get(i));
        }
        list.finish()
    }
}
