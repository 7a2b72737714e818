// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Contiguous vector of fixed-size elements over a caller allocator
//! OWNERS: @runtime
//! INVARIANTS:
//! - Capacity doubles when full and never shrinks on remove
//! - Elements are stored by shallow copy; `T: Copy` keeps that honest
//! - Remove compacts by shifting the tail left one slot

use core::fmt;
use core::mem;
use core::ptr;

use crate::allocator::Allocator;
use crate::error::{UtilError, UtilResult};
use crate::set_error_msg;

struct ArrayListImpl<T> {
    list: *mut T,
    size: usize,
    capacity: usize,
    allocator: Allocator,
}

/// Growable array of `Copy` elements backed by a caller-supplied allocator.
///
/// Two-phase lifecycle: a zero-initialised value, `init`, use, `fini`.
pub struct ArrayList<T: Copy> {
    impl_: Option<ArrayListImpl<T>>,
}

unsafe impl<T: Copy + Send> Send for ArrayList<T> {}

impl<T: Copy> Default for ArrayList<T> {
    fn default() -> Self {
        Self::zero_initialized()
    }
}

impl<T: Copy> ArrayList<T> {
    /// An uninitialised list; `fini` on it is a no-op success.
    pub const fn zero_initialized() -> Self {
        Self { impl_: None }
    }

    /// Allocates backing storage for `initial_capacity` elements.
    ///
    /// The capacity must be at least 1 and `T` must not be zero-sized.
    /// Calling `init` on an initialised list is `InvalidArgument`.
    pub fn init(&mut self, initial_capacity: usize, allocator: &Allocator) -> UtilResult<()> {
        if self.impl_.is_some() {
            set_error_msg!("array list is already initialized");
            return Err(UtilError::InvalidArgument);
        }
        if initial_capacity == 0 {
            set_error_msg!("initial_capacity cannot be 0");
            return Err(UtilError::InvalidArgument);
        }
        if mem::size_of::<T>() == 0 {
            set_error_msg!("data_size cannot be 0");
            return Err(UtilError::InvalidArgument);
        }
        if !allocator.is_valid() {
            set_error_msg!("array list has no valid allocator");
            return Err(UtilError::InvalidArgument);
        }
        let bytes = initial_capacity
            .checked_mul(mem::size_of::<T>())
            .ok_or_else(|| {
                set_error_msg!("array list capacity overflows");
                UtilError::InvalidArgument
            })?;
        let list = allocator.allocate(bytes) as *mut T;
        if list.is_null() {
            set_error_msg!("failed to allocate memory for array list");
            return Err(UtilError::BadAlloc);
        }
        self.impl_ = Some(ArrayListImpl {
            list,
            size: 0,
            capacity: initial_capacity,
            allocator: *allocator,
        });
        Ok(())
    }

    /// Releases the backing storage. Idempotent; no-op success on a
    /// zero-initialised value.
    pub fn fini(&mut self) -> UtilResult<()> {
        if let Some(inner) = self.impl_.take() {
            unsafe { inner.allocator.deallocate(inner.list as *mut u8) };
        }
        Ok(())
    }

    /// True once `init` has succeeded and `fini` has not yet run.
    pub fn is_initialized(&self) -> bool {
        self.impl_.is_some()
    }

    fn inner(&self) -> UtilResult<&ArrayListImpl<T>> {
        self.impl_.as_ref().ok_or_else(|| {
            set_error_msg!("array list is not initialized");
            UtilError::InvalidArgument
        })
    }

    fn inner_mut(&mut self) -> UtilResult<&mut ArrayListImpl<T>> {
        self.impl_.as_mut().ok_or_else(|| {
            set_error_msg!("array list is not initialized");
            UtilError::InvalidArgument
        })
    }

    /// Appends a copy of `data`, doubling the capacity when full.
    pub fn add(&mut self, data: T) -> UtilResult<()> {
        let inner = self.inner_mut()?;
        if inner.size == inner.capacity {
            let new_capacity = inner.capacity * 2;
            let bytes = new_capacity
                .checked_mul(mem::size_of::<T>())
                .ok_or_else(|| {
                    set_error_msg!("array list capacity overflows");
                    UtilError::BadAlloc
                })?;
            let new_list =
                unsafe { inner.allocator.reallocate(inner.list as *mut u8, bytes) } as *mut T;
            if new_list.is_null() {
                set_error_msg!("failed to grow array list");
                return Err(UtilError::BadAlloc);
            }
            inner.list = new_list;
            inner.capacity = new_capacity;
        }
        unsafe { inner.list.add(inner.size).write(data) };
        inner.size += 1;
        Ok(())
    }

    /// Overwrites the element at `index`, which must be within the current
    /// size.
    pub fn set(&mut self, index: usize, data: T) -> UtilResult<()> {
        let inner = self.inner_mut()?;
        if index >= inner.size {
            set_error_msg!("index {} is out of bounds (size {})", index, inner.size);
            return Err(UtilError::InvalidArgument);
        }
        unsafe { inner.list.add(index).write(data) };
        Ok(())
    }

    /// Removes the element at `index`, shifting subsequent elements left.
    /// The capacity is unchanged.
    pub fn remove(&mut self, index: usize) -> UtilResult<()> {
        let inner = self.inner_mut()?;
        if index >= inner.size {
            set_error_msg!("index {} is out of bounds (size {})", index, inner.size);
            return Err(UtilError::InvalidArgument);
        }
        let tail = inner.size - index - 1;
        if tail > 0 {
            unsafe { ptr::copy(inner.list.add(index + 1), inner.list.add(index), tail) };
        }
        inner.size -= 1;
        Ok(())
    }

    /// A copy of the element at `index`.
    pub fn get(&self, index: usize) -> UtilResult<T> {
        let inner = self.inner()?;
        if index >= inner.size {
            set_error_msg!("index {} is out of bounds (size {})", index, inner.size);
            return Err(UtilError::InvalidArgument);
        }
        Ok(unsafe { inner.list.add(index).read() })
    }

    /// Number of stored elements.
    pub fn size(&self) -> UtilResult<usize> {
        Ok(self.inner()?.size)
    }

    /// Current element capacity.
    pub fn capacity(&self) -> UtilResult<usize> {
        Ok(self.inner()?.capacity)
    }
}

impl<T: Copy> Drop for ArrayList<T> {
    fn drop(&mut self) {
        let _ = self.fini();
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for ArrayList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        if let Some(inner) = &self.impl_ {
            for i in 0..inner.size {
                list.entry(&unsafe { inner.list.add(i).read() });
            }
        }
        list.finish()
    }
}
