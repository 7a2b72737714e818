// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Host tests for the string array
//! OWNERS: @runtime
//! TEST_COVERAGE: lifecycle, resize both directions, compare, sort

use core::cmp::Ordering;

use axon_util::allocator::Allocator;
use axon_util::error::UtilError;
use axon_util::types::StringArray;

fn array_of(values: &[&str]) -> StringArray {
    let allocator = Allocator::default_allocator();
    let mut array = StringArray::zero_initialized();
    array.init(values.len(), &allocator).unwrap();
    for (i, value) in values.iter().enumerate() {
        array.assign(i, value).unwrap();
    }
    array
}

#[test]
fn init_fills_slots_with_nulls() {
    let allocator = Allocator::default_allocator();
    let mut array = StringArray::zero_initialized();
    array.init(3, &allocator).unwrap();
    assert_eq!(3, array.len());
    for i in 0..3 {
        assert_eq!(None, array.get(i));
    }
    array.fini().unwrap();
    array.fini().unwrap();
}

#[test]
fn fini_tolerates_zero_initialized() {
    let mut array = StringArray::zero_initialized();
    array.fini().unwrap();
}

#[test]
fn assign_replaces_and_bounds_checks() {
    let mut array = array_of(&["a"]);
    array.assign(0, "b").unwrap();
    assert_eq!(Some("b"), array.get(0));
    assert_eq!(Err(UtilError::InvalidArgument), array.assign(1, "x"));
    array.fini().unwrap();
}

#[test]
fn unassign_clears_a_slot() {
    let mut array = array_of(&["a", "b"]);
    array.unassign(0).unwrap();
    assert_eq!(None, array.get(0));
    assert_eq!(Some("b"), array.get(1));
    assert_eq!(Err(UtilError::InvalidArgument), array.unassign(2));
    array.fini().unwrap();
}

#[test]
fn resize_grows_with_null_slots() {
    let mut array = array_of(&["a", "b"]);
    array.resize(4).unwrap();
    assert_eq!(4, array.len());
    assert_eq!(Some("a"), array.get(0));
    assert_eq!(Some("b"), array.get(1));
    assert_eq!(None, array.get(2));
    assert_eq!(None, array.get(3));
    array.fini().unwrap();
}

#[test]
fn resize_shrinks_and_reclaims() {
    let mut array = array_of(&["a", "b", "c"]);
    array.resize(1).unwrap();
    assert_eq!(1, array.len());
    assert_eq!(Some("a"), array.get(0));
    array.resize(0).unwrap();
    assert!(array.is_empty());
    array.fini().unwrap();
}

#[test]
fn cmp_is_elementwise_then_by_size() {
    let a = array_of(&["x", "y"]);
    let b = array_of(&["x", "y"]);
    let c = array_of(&["x", "z"]);
    let longer = array_of(&["x", "y", "z"]);
    assert_eq!(Ordering::Equal, a.cmp(&b).unwrap());
    assert_eq!(Ordering::Less, a.cmp(&c).unwrap());
    assert_eq!(Ordering::Greater, c.cmp(&a).unwrap());
    assert_eq!(Ordering::Less, a.cmp(&longer).unwrap());
}

#[test]
fn cmp_rejects_null_elements() {
    let allocator = Allocator::default_allocator();
    let mut holey = StringArray::zero_initialized();
    holey.init(1, &allocator).unwrap();
    let full = array_of(&["x"]);
    assert_eq!(Err(UtilError::Error), holey.cmp(&full));
    holey.fini().unwrap();
}

#[test]
fn sort_is_ascending_with_nulls_last() {
    let allocator = Allocator::default_allocator();
    let mut array = StringArray::zero_initialized();
    array.init(5, &allocator).unwrap();
    array.assign(0, "pear").unwrap();
    array.assign(2, "apple").unwrap();
    array.assign(4, "mango").unwrap();
    array.sort().unwrap();
    assert_eq!(Some("apple"), array.get(0));
    assert_eq!(Some("mango"), array.get(1));
    assert_eq!(Some("pear"), array.get(2));
    assert_eq!(None, array.get(3));
    assert_eq!(None, array.get(4));
    array.fini().unwrap();
}
