// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Host tests for the hash map
//! OWNERS: @runtime
//! TEST_COVERAGE: power-of-two capacity, set/get/unset, load-factor
//!   rehashing, full iteration, reference-model property tests

use axon_util::allocator::Allocator;
use axon_util::error::UtilError;
use axon_util::types::hash_map::{string_eq, string_hash, HashMap};

use proptest::prelude::*;

fn new_string_map(initial_capacity: usize) -> HashMap<String, i32> {
    let allocator = Allocator::default_allocator();
    let mut map = HashMap::zero_initialized();
    map.init(initial_capacity, string_hash, string_eq, &allocator).unwrap();
    map
}

#[test]
fn init_rounds_capacity_to_power_of_two() {
    let map = new_string_map(3);
    assert_eq!(4, map.get_capacity().unwrap());
    let map = new_string_map(8);
    assert_eq!(8, map.get_capacity().unwrap());
}

#[test]
fn double_init_is_rejected() {
    let allocator = Allocator::default_allocator();
    let mut map = new_string_map(2);
    assert_eq!(
        Err(UtilError::InvalidArgument),
        map.init(2, string_hash, string_eq, &allocator)
    );
    map.fini().unwrap();
    map.fini().unwrap();
}

#[test]
fn set_then_get_returns_the_stored_value() {
    let mut map = new_string_map(4);
    map.set(&"alpha".to_string(), &17).unwrap();
    assert_eq!(17, map.get(&"alpha".to_string()).unwrap());
    // Overwrite keeps the size at one.
    map.set(&"alpha".to_string(), &18).unwrap();
    assert_eq!(18, map.get(&"alpha".to_string()).unwrap());
    assert_eq!(1, map.get_size().unwrap());
    assert_eq!(Err(UtilError::NotFound), map.get(&"beta".to_string()));
    map.fini().unwrap();
}

#[test]
fn unset_removes_and_tolerates_missing_keys() {
    let mut map = new_string_map(4);
    map.set(&"k".to_string(), &1).unwrap();
    assert!(map.key_exists(&"k".to_string()));
    map.unset(&"k".to_string()).unwrap();
    assert!(!map.key_exists(&"k".to_string()));
    assert_eq!(0, map.get_size().unwrap());
    // Unsetting an absent key is a success, not an error.
    map.unset(&"k".to_string()).unwrap();
    map.fini().unwrap();
}

#[test]
fn key_exists_never_errors() {
    let map: HashMap<String, i32> = HashMap::zero_initialized();
    assert!(!map.key_exists(&"anything".to_string()));
}

// Spec scenario: capacity 4, six inserts force a rehash, a delete and a
// further insert leave every surviving key retrievable.
#[test]
fn rehash_preserves_entries() {
    let mut map = new_string_map(4);
    for i in 0..6 {
        map.set(&format!("k{i}"), &i).unwrap();
    }
    for i in 0..6 {
        assert_eq!(i, map.get(&format!("k{i}")).unwrap());
    }
    let capacity = map.get_capacity().unwrap();
    assert!(capacity >= 8);
    assert!(capacity.is_power_of_two());

    map.unset(&"k3".to_string()).unwrap();
    map.set(&"k6".to_string(), &6).unwrap();
    assert_eq!(6, map.get_size().unwrap());
    for i in [0, 1, 2, 4, 5, 6] {
        assert_eq!(i, map.get(&format!("k{i}")).unwrap());
    }
    assert_eq!(Err(UtilError::NotFound), map.get(&"k3".to_string()));
    map.fini().unwrap();
}

#[test]
fn load_factor_is_maintained() {
    let mut map = new_string_map(2);
    for i in 0..64 {
        map.set(&format!("key-{i}"), &i).unwrap();
        let size = map.get_size().unwrap();
        let capacity = map.get_capacity().unwrap();
        assert!(size * 4 <= capacity * 3 || capacity >= 64, "size {size} capacity {capacity}");
    }
    map.fini().unwrap();
}

#[test]
fn iteration_visits_every_key_exactly_once() {
    let mut map = new_string_map(4);
    for i in 0..13 {
        map.set(&format!("k{i}"), &i).unwrap();
    }
    let mut seen = std::collections::HashSet::new();
    let mut previous: Option<(String, i32)> = None;
    loop {
        let key_ref = previous.as_ref().map(|(k, _)| k);
        match map.get_next_key_and_data(key_ref) {
            Ok((key, value)) => {
                assert!(seen.insert(key.clone()), "key {key} visited twice");
                assert_eq!(value, map.get(&key).unwrap());
                previous = Some((key, value));
            }
            Err(UtilError::HashMapNoMoreEntries) => break,
            Err(e) => panic!("unexpected error {e:?}"),
        }
    }
    assert_eq!(13, seen.len());
    map.fini().unwrap();
}

#[test]
fn iteration_on_empty_map_reports_no_more_entries() {
    let map = new_string_map(2);
    assert_eq!(Err(UtilError::HashMapNoMoreEntries), map.get_next_key_and_data(None));
}

#[test]
fn iteration_with_vanished_previous_key_reports_not_found() {
    let mut map = new_string_map(4);
    map.set(&"a".to_string(), &1).unwrap();
    map.set(&"b".to_string(), &2).unwrap();
    let (first, _) = map.get_next_key_and_data(None).unwrap();
    map.unset(&first).unwrap();
    // The previous key is gone; the caller must restart from None.
    assert_eq!(Err(UtilError::NotFound), map.get_next_key_and_data(Some(&first)));
    assert!(map.get_next_key_and_data(None).is_ok());
    map.fini().unwrap();
}

proptest! {
    // Drive the map with arbitrary insert/remove sequences and compare
    // against the standard library map at every step.
    #[test]
    fn matches_reference_model(ops in proptest::collection::vec(
        (proptest::bool::ANY, "[a-f]{1,3}", 0i32..100), 1..80)
    ) {
        let mut map = new_string_map(2);
        let mut model: std::collections::HashMap<String, i32> = std::collections::HashMap::new();
        for (insert, key, value) in ops {
            if insert {
                map.set(&key, &value).unwrap();
                model.insert(key.clone(), value);
            } else {
                map.unset(&key).unwrap();
                model.remove(&key);
            }
            prop_assert_eq!(model.len(), map.get_size().unwrap());
            match model.get(&key) {
                Some(expected) => prop_assert_eq!(*expected, map.get(&key).unwrap()),
                None => prop_assert_eq!(Err(UtilError::NotFound), map.get(&key)),
            }
        }
        map.fini().unwrap();
    }
}
