// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Flat string-to-string map with caller-controlled capacity
//! OWNERS: @runtime
//! INVARIANTS:
//! - Backing store is a flat slot array; an empty slot holds no pair
//! - Keys and values are owned copies living in the map's allocator
//! - Lookup is a linear scan over the capacity; insertion order of the
//!   surviving slots is what iteration yields

use core::fmt;
use core::mem;
use core::ptr;

use crate::allocator::Allocator;
use crate::error::{UtilError, UtilResult};
use crate::set_error_msg;
use crate::types::alloc_string::AllocString;

type Pair = Option<(AllocString, AllocString)>;

struct StringMapImpl {
    key_value_pairs: *mut Pair,
    capacity: usize,
    size: usize,
    allocator: Allocator,
}

/// String-keyed, string-valued map over a flat slot array.
///
/// Unlike the hash map, capacity is caller-controlled: `set_no_resize`
/// reports `NotEnoughSpace` when full, and the convenience `set` doubles
/// the capacity once and retries.
pub struct StringMap {
    impl_: Option<StringMapImpl>,
}

unsafe impl Send for StringMap {}

impl Default for StringMap {
    fn default() -> Self {
        Self::zero_initialized()
    }
}

impl StringMap {
    /// An uninitialised map; `fini` on it is a no-op success.
    pub const fn zero_initialized() -> Self {
        Self { impl_: None }
    }

    /// Initialises the map with room for `initial_capacity` pairs (zero is
    /// fine; the first `set` will grow it).
    pub fn init(&mut self, initial_capacity: usize, allocator: &Allocator) -> UtilResult<()> {
        if self.impl_.is_some() {
            set_error_msg!("string map is already initialized");
            return Err(UtilError::StringMapAlreadyInit);
        }
        if !allocator.is_valid() {
            set_error_msg!("string map has no valid allocator");
            return Err(UtilError::InvalidArgument);
        }
        self.impl_ = Some(StringMapImpl {
            key_value_pairs: ptr::null_mut(),
            capacity: 0,
            size: 0,
            allocator: *allocator,
        });
        if let Err(e) = self.reserve(initial_capacity) {
            self.impl_ = None;
            return Err(e);
        }
        Ok(())
    }

    /// Clears the map and releases all storage. Idempotent; no-op success
    /// on a zero-initialised value.
    pub fn fini(&mut self) -> UtilResult<()> {
        if self.impl_.is_some() {
            self.clear()?;
            self.reserve(0)?;
            self.impl_ = None;
        }
        Ok(())
    }

    fn inner(&self) -> UtilResult<&StringMapImpl> {
        self.impl_.as_ref().ok_or_else(|| {
            set_error_msg!("invalid string map");
            UtilError::StringMapInvalid
        })
    }

    fn inner_mut(&mut self) -> UtilResult<&mut StringMapImpl> {
        self.impl_.as_mut().ok_or_else(|| {
            set_error_msg!("invalid string map");
            UtilError::StringMapInvalid
        })
    }

    /// Number of stored pairs.
    pub fn get_size(&self) -> UtilResult<usize> {
        Ok(self.inner()?.size)
    }

    /// Current slot capacity.
    pub fn get_capacity(&self) -> UtilResult<usize> {
        Ok(self.inner()?.capacity)
    }

    /// Sets the slot capacity. Requests below the current size are clamped
    /// to it; shrinking compacts surviving pairs to the front first.
    pub fn reserve(&mut self, capacity: usize) -> UtilResult<()> {
        let inner = self.inner_mut()?;
        let capacity = capacity.max(inner.size);
        if capacity == inner.capacity {
            return Ok(());
        }
        let allocator = inner.allocator;

        if capacity < inner.capacity {
            // Compact occupied slots into the prefix that survives.
            let mut write = 0;
            for read in 0..inner.capacity {
                let slot = unsafe { inner.key_value_pairs.add(read) };
                if unsafe { (*slot).is_some() } {
                    if read != write {
                        unsafe {
                            let pair = ptr::read(slot);
                            ptr::write(slot, None);
                            ptr::write(inner.key_value_pairs.add(write), pair);
                        }
                    }
                    write += 1;
                }
            }
        }

        if capacity == 0 {
            unsafe { allocator.deallocate(inner.key_value_pairs as *mut u8) };
            inner.key_value_pairs = ptr::null_mut();
            inner.capacity = 0;
            return Ok(());
        }

        let bytes = capacity.checked_mul(mem::size_of::<Pair>()).ok_or_else(|| {
            set_error_msg!("requested capacity for string map too large");
            UtilError::BadAlloc
        })?;
        let new_pairs =
            unsafe { allocator.reallocate(inner.key_value_pairs as *mut u8, bytes) } as *mut Pair;
        if new_pairs.is_null() {
            set_error_msg!("failed to allocate memory for string map slots");
            return Err(UtilError::BadAlloc);
        }
        for i in inner.capacity..capacity {
            unsafe { new_pairs.add(i).write(None) };
        }
        inner.key_value_pairs = new_pairs;
        inner.capacity = capacity;
        Ok(())
    }

    /// Removes every pair, keeping the capacity.
    pub fn clear(&mut self) -> UtilResult<()> {
        let inner = self.inner_mut()?;
        for i in 0..inner.capacity {
            let slot = unsafe { inner.key_value_pairs.add(i) };
            if let Some((key, value)) = unsafe { ptr::read(slot) } {
                unsafe {
                    ptr::write(slot, None);
                    key.free(&inner.allocator);
                    value.free(&inner.allocator);
                }
            } else {
                unsafe { ptr::write(slot, None) };
            }
        }
        inner.size = 0;
        Ok(())
    }

    fn find_index(inner: &StringMapImpl, key: &str) -> Option<usize> {
        for i in 0..inner.capacity {
            let slot = unsafe { &*inner.key_value_pairs.add(i) };
            if let Some((slot_key, _)) = slot {
                if slot_key.as_str() == key {
                    return Some(i);
                }
            }
        }
        None
    }

    /// Stores `value` under `key` without growing; a full map yields
    /// `NotEnoughSpace`.
    pub fn set_no_resize(&mut self, key: &str, value: &str) -> UtilResult<()> {
        let inner = self.inner_mut()?;
        let allocator = inner.allocator;

        if let Some(index) = Self::find_index(inner, key) {
            let new_value = AllocString::duplicate(value, &allocator)?;
            let slot = unsafe { inner.key_value_pairs.add(index) };
            if let Some((slot_key, old_value)) = unsafe { ptr::read(slot) } {
                unsafe {
                    ptr::write(slot, Some((slot_key, new_value)));
                    old_value.free(&allocator);
                }
            }
            return Ok(());
        }

        let empty = (0..inner.capacity)
            .find(|&i| unsafe { (*inner.key_value_pairs.add(i)).is_none() });
        let Some(index) = empty else {
            set_error_msg!("string map is full");
            return Err(UtilError::NotEnoughSpace);
        };

        let new_key = AllocString::duplicate(key, &allocator)?;
        let new_value = match AllocString::duplicate(value, &allocator) {
            Ok(v) => v,
            Err(e) => {
                unsafe { new_key.free(&allocator) };
                return Err(e);
            }
        };
        unsafe { inner.key_value_pairs.add(index).write(Some((new_key, new_value))) };
        inner.size += 1;
        Ok(())
    }

    /// Stores `value` under `key`, doubling the capacity (or setting it to
    /// one from zero) and retrying once when the map is full.
    pub fn set(&mut self, key: &str, value: &str) -> UtilResult<()> {
        match self.set_no_resize(key, value) {
            Err(UtilError::NotEnoughSpace) => {
                crate::error::reset_error();
                let capacity = self.inner()?.capacity;
                let new_capacity = if capacity == 0 { 1 } else { 2 * capacity };
                self.reserve(new_capacity)?;
                self.set_no_resize(key, value)
            }
            other => other,
        }
    }

    /// Removes the pair for `key`; an absent key is `StringKeyNotFound`.
    pub fn unset(&mut self, key: &str) -> UtilResult<()> {
        let inner = self.inner_mut()?;
        let Some(index) = Self::find_index(inner, key) else {
            set_error_msg!("key '{}' not found", key);
            return Err(UtilError::StringKeyNotFound);
        };
        let slot = unsafe { inner.key_value_pairs.add(index) };
        if let Some((slot_key, value)) = unsafe { ptr::read(slot) } {
            unsafe {
                ptr::write(slot, None);
                slot_key.free(&inner.allocator);
                value.free(&inner.allocator);
            }
            inner.size -= 1;
        }
        Ok(())
    }

    /// True when `key` is present; never sets an error.
    pub fn key_exists(&self, key: &str) -> bool {
        match &self.impl_ {
            Some(inner) => Self::find_index(inner, key).is_some(),
            None => false,
        }
    }

    /// The value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        let inner = self.impl_.as_ref()?;
        let index = Self::find_index(inner, key)?;
        let slot = unsafe { &*inner.key_value_pairs.add(index) };
        slot.as_ref().map(|(_, value)| value.as_str())
    }

    /// Iterates the stored keys in slot order. `None` yields the first key;
    /// passing a key previously returned by this function yields its
    /// successor. The previous key is located by pointer identity, so the
    /// argument must be the exact `&str` handed out earlier.
    pub fn get_next_key(&self, key: Option<&str>) -> Option<&str> {
        let inner = self.impl_.as_ref()?;
        if inner.size == 0 {
            return None;
        }
        let mut start_index = 0;
        if let Some(previous) = key {
            let mut found = false;
            for i in 0..inner.capacity {
                let slot = unsafe { &*inner.key_value_pairs.add(i) };
                if let Some((slot_key, _)) = slot {
                    if core::ptr::eq(slot_key.as_str().as_ptr(), previous.as_ptr()) {
                        found = true;
                        start_index = i + 1;
                    }
                }
            }
            if !found {
                return None;
            }
        }
        for i in start_index..inner.capacity {
            let slot = unsafe { &*inner.key_value_pairs.add(i) };
            if let Some((slot_key, _)) = slot {
                return Some(slot_key.as_str());
            }
        }
        None
    }

    /// Copies every pair into `destination`. On a mid-copy failure the
    /// pairs copied so far are left in place.
    pub fn copy(&self, destination: &mut StringMap) -> UtilResult<()> {
        let mut key = self.get_next_key(None);
        while let Some(k) = key {
            let Some(value) = self.get(k) else {
                set_error_msg!("unable to get value for known key, should not happen");
                return Err(UtilError::Error);
            };
            destination.set(k, value)?;
            key = self.get_next_key(Some(k));
        }
        Ok(())
    }
}

impl Drop for StringMap {
    fn drop(&mut self) {
        let _ = self.fini();
    }
}

impl fmt::Debug for StringMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.impl_ {
            Some(inner) => f
                .debug_struct("StringMap")
                .field("size", &inner.size)
                .field("capacity", &inner.capacity)
                .finish(),
            None => f.write_str("StringMap(zero-initialized)"),
        }
    }
}
