// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Bucketed hash map with caller-supplied hash and equality
//! OWNERS: @runtime
//! INVARIANTS:
//! - Capacity is always a power of two; lookup index is `hash & (cap - 1)`
//! - Buckets are lazily initialised array lists of entry pointers
//! - Entries own clones of key and value, allocated through the map's
//!   allocator and released on unset/fini
//! - Load factor above 0.75 triggers a doubling rehash that moves entries
//!   without reallocating them; a failed rehash degrades, never corrupts

use core::fmt;
use core::mem;

use crate::allocator::Allocator;
use crate::error::{UtilError, UtilResult};
use crate::set_error_msg;
use crate::types::array_list::ArrayList;

/// Hashing capability for map keys.
pub type KeyHasher<K> = fn(&K) -> u64;
/// Equality capability for map keys.
pub type KeyEq<K> = fn(&K, &K) -> bool;

const BUCKET_INITIAL_CAPACITY: usize = 2;

// size / capacity > 3/4 expressed in integers.
fn past_load_factor(size: usize, capacity: usize) -> bool {
    size * 4 >= capacity * 3
}

struct Entry<K, V> {
    hashed_key: u64,
    key: K,
    value: V,
}

struct HashMapImpl<K, V> {
    buckets: *mut ArrayList<*mut Entry<K, V>>,
    capacity: usize,
    size: usize,
    key_hasher: KeyHasher<K>,
    key_eq: KeyEq<K>,
    allocator: Allocator,
}

/// Hash map storing owned copies of keys and values.
///
/// Two-phase lifecycle like every container here: zero-initialised value,
/// `init`, use, `fini`. Iteration is only stable while the map is not
/// mutated; after a mutation, restart with `get_next_key_and_data(None)`.
pub struct HashMap<K: Clone, V: Clone> {
    impl_: Option<HashMapImpl<K, V>>,
}

unsafe impl<K: Clone + Send, V: Clone + Send> Send for HashMap<K, V> {}

impl<K: Clone, V: Clone> Default for HashMap<K, V> {
    fn default() -> Self {
        Self::zero_initialized()
    }
}

fn allocate_buckets<K, V>(
    capacity: usize,
    allocator: &Allocator,
) -> UtilResult<*mut ArrayList<*mut Entry<K, V>>> {
    let bytes = capacity
        .checked_mul(mem::size_of::<ArrayList<*mut Entry<K, V>>>())
        .ok_or_else(|| {
            set_error_msg!("hash map capacity overflows");
            UtilError::BadAlloc
        })?;
    let buckets = allocator.allocate(bytes) as *mut ArrayList<*mut Entry<K, V>>;
    if buckets.is_null() {
        set_error_msg!("failed to allocate memory for hash map buckets");
        return Err(UtilError::BadAlloc);
    }
    for i in 0..capacity {
        unsafe { buckets.add(i).write(ArrayList::zero_initialized()) };
    }
    Ok(buckets)
}

// Tears down a bucket array. Entries are only destroyed when
// `dealloc_entries` is set; a rehash hands its entries to the new array and
// must keep them alive.
fn deallocate_buckets<K, V>(
    buckets: *mut ArrayList<*mut Entry<K, V>>,
    capacity: usize,
    allocator: &Allocator,
    dealloc_entries: bool,
) {
    for i in 0..capacity {
        let bucket = unsafe { &mut *buckets.add(i) };
        if bucket.is_initialized() {
            if dealloc_entries {
                let bucket_size = bucket.size().unwrap_or(0);
                for b in 0..bucket_size {
                    if let Ok(entry) = bucket.get(b) {
                        unsafe {
                            entry.drop_in_place();
                            allocator.deallocate(entry as *mut u8);
                        }
                    }
                }
            }
            let _ = bucket.fini();
        }
    }
    unsafe { allocator.deallocate(buckets as *mut u8) };
}

fn insert_into_bucket<K, V>(
    buckets: *mut ArrayList<*mut Entry<K, V>>,
    bucket_index: usize,
    entry: *mut Entry<K, V>,
    allocator: &Allocator,
) -> UtilResult<()> {
    let bucket = unsafe { &mut *buckets.add(bucket_index) };
    if !bucket.is_initialized() {
        bucket.init(BUCKET_INITIAL_CAPACITY, allocator)?;
    }
    bucket.add(entry)
}

impl<K: Clone, V: Clone> HashMap<K, V> {
    /// An uninitialised map; `fini` on it is a no-op success.
    pub const fn zero_initialized() -> Self {
        Self { impl_: None }
    }

    /// Initialises the map. The capacity is rounded up to the next power of
    /// two; buckets start unallocated.
    pub fn init(
        &mut self,
        initial_capacity: usize,
        key_hasher: KeyHasher<K>,
        key_eq: KeyEq<K>,
        allocator: &Allocator,
    ) -> UtilResult<()> {
        if self.impl_.is_some() {
            set_error_msg!("hash map is already initialized");
            return Err(UtilError::InvalidArgument);
        }
        if initial_capacity == 0 {
            set_error_msg!("initial_capacity cannot be 0");
            return Err(UtilError::InvalidArgument);
        }
        if mem::size_of::<K>() == 0 || mem::size_of::<V>() == 0 {
            set_error_msg!("key and value types cannot be zero-sized");
            return Err(UtilError::InvalidArgument);
        }
        if !allocator.is_valid() {
            set_error_msg!("hash map has no valid allocator");
            return Err(UtilError::InvalidArgument);
        }
        let capacity = initial_capacity.next_power_of_two();
        let buckets = allocate_buckets::<K, V>(capacity, allocator)?;
        self.impl_ = Some(HashMapImpl {
            buckets,
            capacity,
            size: 0,
            key_hasher,
            key_eq,
            allocator: *allocator,
        });
        Ok(())
    }

    /// Destroys every entry and releases all storage. Idempotent; no-op
    /// success on a zero-initialised value.
    pub fn fini(&mut self) -> UtilResult<()> {
        if let Some(inner) = self.impl_.take() {
            deallocate_buckets(inner.buckets, inner.capacity, &inner.allocator, true);
        }
        Ok(())
    }

    fn inner(&self) -> UtilResult<&HashMapImpl<K, V>> {
        self.impl_.as_ref().ok_or_else(|| {
            set_error_msg!("hash map is not initialized");
            UtilError::InvalidArgument
        })
    }

    fn inner_mut(&mut self) -> UtilResult<&mut HashMapImpl<K, V>> {
        self.impl_.as_mut().ok_or_else(|| {
            set_error_msg!("hash map is not initialized");
            UtilError::InvalidArgument
        })
    }

    /// Current bucket-array capacity.
    pub fn get_capacity(&self) -> UtilResult<usize> {
        Ok(self.inner()?.capacity)
    }

    /// Number of stored entries.
    pub fn get_size(&self) -> UtilResult<usize> {
        Ok(self.inner()?.size)
    }

    /// Stores `value` under `key`, overwriting any existing value for an
    /// equal key. A rehash failure after the store is non-fatal: the map
    /// keeps working at degraded lookup performance.
    pub fn set(&mut self, key: &K, value: &V) -> UtilResult<()> {
        let inner = self.inner_mut()?;
        match find_entry(inner, key) {
            Some((_, _, entry)) => {
                unsafe { (*entry).value = value.clone() };
            }
            None => {
                let allocator = inner.allocator;
                let raw = allocator.allocate(mem::size_of::<Entry<K, V>>()) as *mut Entry<K, V>;
                if raw.is_null() {
                    set_error_msg!("failed to allocate memory for hash map entry");
                    return Err(UtilError::BadAlloc);
                }
                let hashed_key = (inner.key_hasher)(key);
                unsafe {
                    raw.write(Entry { hashed_key, key: key.clone(), value: value.clone() })
                };
                let bucket_index = (hashed_key as usize) & (inner.capacity - 1);
                if let Err(e) = insert_into_bucket(inner.buckets, bucket_index, raw, &allocator) {
                    unsafe {
                        raw.drop_in_place();
                        allocator.deallocate(raw as *mut u8);
                    }
                    return Err(e);
                }
                inner.size += 1;
            }
        }
        if let Err(e) = check_and_grow(inner) {
            eprintln!("[axon_util|hash_map.rs:{}] failed to grow hash map: {}", line!(), e);
        }
        Ok(())
    }

    /// A copy of the value stored under `key`, or `NotFound`.
    pub fn get(&self, key: &K) -> UtilResult<V> {
        let inner = self.inner()?;
        if inner.size == 0 {
            return Err(UtilError::NotFound);
        }
        match find_entry(inner, key) {
            Some((_, _, entry)) => Ok(unsafe { (*entry).value.clone() }),
            None => Err(UtilError::NotFound),
        }
    }

    /// Removes the entry for `key` and releases its storage. A missing key
    /// is a success; the capacity never shrinks.
    pub fn unset(&mut self, key: &K) -> UtilResult<()> {
        let inner = self.inner_mut()?;
        if inner.size == 0 {
            return Ok(());
        }
        if let Some((map_index, bucket_index, entry)) = find_entry(inner, key) {
            let bucket = unsafe { &mut *inner.buckets.add(map_index) };
            if bucket.remove(bucket_index).is_ok() {
                inner.size -= 1;
                unsafe {
                    entry.drop_in_place();
                    inner.allocator.deallocate(entry as *mut u8);
                }
            }
        }
        Ok(())
    }

    /// True when an entry for `key` exists; never sets an error.
    pub fn key_exists(&self, key: &K) -> bool {
        match &self.impl_ {
            Some(inner) if inner.size > 0 => find_entry(inner, key).is_some(),
            _ => false,
        }
    }

    /// Iterates the map: `None` yields the first entry, a previously
    /// returned key yields its successor. Returns `HashMapNoMoreEntries`
    /// when exhausted and `NotFound` when `previous_key` is no longer
    /// present (restart with `None` after any mutation).
    pub fn get_next_key_and_data(&self, previous_key: Option<&K>) -> UtilResult<(K, V)> {
        let inner = self.inner()?;
        if inner.size == 0 {
            return match previous_key {
                Some(_) => Err(UtilError::NotFound),
                None => Err(UtilError::HashMapNoMoreEntries),
            };
        }

        let mut map_index = 0;
        let mut bucket_index = 0;
        if let Some(previous) = previous_key {
            match find_entry(inner, previous) {
                Some((m, b, _)) => {
                    map_index = m;
                    bucket_index = b + 1;
                }
                None => return Err(UtilError::NotFound),
            }
        }

        while map_index < inner.capacity {
            let bucket = unsafe { &*inner.buckets.add(map_index) };
            if bucket.is_initialized() {
                let bucket_size = bucket.size()?;
                if bucket_index < bucket_size {
                    let entry = bucket.get(bucket_index)?;
                    let (key, value) =
                        unsafe { ((*entry).key.clone(), (*entry).value.clone()) };
                    return Ok((key, value));
                }
            }
            bucket_index = 0;
            map_index += 1;
        }

        Err(UtilError::HashMapNoMoreEntries)
    }
}

fn find_entry<K: Clone, V: Clone>(
    inner: &HashMapImpl<K, V>,
    key: &K,
) -> Option<(usize, usize, *mut Entry<K, V>)> {
    let key_hash = (inner.key_hasher)(key);
    let map_index = (key_hash as usize) & (inner.capacity - 1);
    let bucket = unsafe { &*inner.buckets.add(map_index) };
    if !bucket.is_initialized() {
        return None;
    }
    let bucket_size = bucket.size().ok()?;
    for i in 0..bucket_size {
        let entry = bucket.get(i).ok()?;
        // Hashes first; the full comparison only runs on a hash match.
        let hit = unsafe { (*entry).hashed_key == key_hash && (inner.key_eq)(&(*entry).key, key) };
        if hit {
            return Some((map_index, i, entry));
        }
    }
    None
}

fn check_and_grow<K: Clone, V: Clone>(inner: &mut HashMapImpl<K, V>) -> UtilResult<()> {
    if !past_load_factor(inner.size, inner.capacity) {
        return Ok(());
    }
    let new_capacity = inner.capacity * 2;
    let new_buckets = allocate_buckets::<K, V>(new_capacity, &inner.allocator)?;

    let mut ret = Ok(());
    'outer: for map_index in 0..inner.capacity {
        let bucket = unsafe { &*inner.buckets.add(map_index) };
        if !bucket.is_initialized() {
            continue;
        }
        let bucket_size = bucket.size()?;
        for i in 0..bucket_size {
            let entry = bucket.get(i)?;
            let new_index = unsafe { ((*entry).hashed_key as usize) % new_capacity };
            if let Err(e) = insert_into_bucket(new_buckets, new_index, entry, &inner.allocator) {
                ret = Err(e);
                break 'outer;
            }
        }
    }

    if ret.is_err() {
        deallocate_buckets(new_buckets, new_capacity, &inner.allocator, false);
        return ret;
    }

    deallocate_buckets(inner.buckets, inner.capacity, &inner.allocator, false);
    inner.buckets = new_buckets;
    inner.capacity = new_capacity;
    Ok(())
}

impl<K: Clone, V: Clone> Drop for HashMap<K, V> {
    fn drop(&mut self) {
        let _ = self.fini();
    }
}

impl<K: Clone, V: Clone> fmt::Debug for HashMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.impl_ {
            Some(inner) => f
                .debug_struct("HashMap")
                .field("size", &inner.size)
                .field("capacity", &inner.capacity)
                .finish(),
            None => f.write_str("HashMap(zero-initialized)"),
        }
    }
}

/// djb2 over the key's bytes; the stock hasher for string-keyed maps.
#[allow(clippy::ptr_arg)]
pub fn string_hash(key: &String) -> u64 {
    let mut hash: u64 = 5381;
    for b in key.bytes() {
        hash = hash.wrapping_mul(33).wrapping_add(u64::from(b));
    }
    hash
}

/// Byte equality; the stock comparator for string-keyed maps.
#[allow(clippy::ptr_arg)]
pub fn string_eq(lhs: &String, rhs: &String) -> bool {
    lhs == rhs
}
