// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Host tests for the array list
//! OWNERS: @runtime
//! TEST_COVERAGE: lifecycle and misuse, growth doubling, remove compaction

use axon_util::allocator::Allocator;
use axon_util::error::UtilError;
use axon_util::types::ArrayList;

#[test]
fn init_validates_arguments() {
    let allocator = Allocator::default_allocator();
    let invalid = Allocator::zero_initialized();
    let mut list: ArrayList<u32> = ArrayList::zero_initialized();
    assert_eq!(Err(UtilError::InvalidArgument), list.init(0, &allocator));
    assert_eq!(Err(UtilError::InvalidArgument), list.init(2, &invalid));
    list.init(2, &allocator).unwrap();
    // Double init is detected.
    assert_eq!(Err(UtilError::InvalidArgument), list.init(2, &allocator));
    list.fini().unwrap();
}

#[test]
fn fini_is_idempotent_and_tolerates_zero_initialized() {
    let mut list: ArrayList<u8> = ArrayList::zero_initialized();
    list.fini().unwrap();
    let allocator = Allocator::default_allocator();
    list.init(1, &allocator).unwrap();
    list.fini().unwrap();
    list.fini().unwrap();
    assert!(!list.is_initialized());
}

#[test]
fn add_doubles_capacity_when_full() {
    let allocator = Allocator::default_allocator();
    let mut list: ArrayList<u32> = ArrayList::zero_initialized();
    list.init(2, &allocator).unwrap();
    for i in 0..10 {
        list.add(i).unwrap();
    }
    assert_eq!(10, list.size().unwrap());
    assert_eq!(16, list.capacity().unwrap());
    for i in 0..10 {
        assert_eq!(i as u32, list.get(i).unwrap());
    }
    list.fini().unwrap();
}

#[test]
fn set_requires_index_in_bounds() {
    let allocator = Allocator::default_allocator();
    let mut list: ArrayList<u32> = ArrayList::zero_initialized();
    list.init(2, &allocator).unwrap();
    list.add(1).unwrap();
    list.set(0, 7).unwrap();
    assert_eq!(7, list.get(0).unwrap());
    assert_eq!(Err(UtilError::InvalidArgument), list.set(1, 9));
    list.fini().unwrap();
}

#[test]
fn remove_compacts_and_keeps_capacity() {
    let allocator = Allocator::default_allocator();
    let mut list: ArrayList<u32> = ArrayList::zero_initialized();
    list.init(4, &allocator).unwrap();
    for i in 0..4 {
        list.add(i).unwrap();
    }
    list.remove(1).unwrap();
    assert_eq!(3, list.size().unwrap());
    assert_eq!(4, list.capacity().unwrap());
    assert_eq!(0, list.get(0).unwrap());
    assert_eq!(2, list.get(1).unwrap());
    assert_eq!(3, list.get(2).unwrap());
    assert_eq!(Err(UtilError::InvalidArgument), list.remove(3));
    list.fini().unwrap();
}

#[test]
fn operations_on_uninitialized_list_are_rejected() {
    let mut list: ArrayList<u32> = ArrayList::zero_initialized();
    assert_eq!(Err(UtilError::InvalidArgument), list.add(1));
    assert_eq!(Err(UtilError::InvalidArgument), list.get(0));
    assert_eq!(Err(UtilError::InvalidArgument), list.size());
}
