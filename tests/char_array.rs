// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Host tests for the growable char array
//! OWNERS: @runtime
//! TEST_COVERAGE: lifecycle, resize semantics (owned and borrowed),
//!   growth policy, strcat/strncat length accounting, formatting

use axon_util::allocator::Allocator;
use axon_util::error::UtilError;
use axon_util::types::CharArray;

use proptest::prelude::*;

#[test]
fn init_and_fini_round_trip() {
    let allocator = Allocator::default_allocator();
    let mut array = CharArray::zero_initialized();
    array.init(8, &allocator).unwrap();
    assert_eq!(8, array.buffer_capacity());
    assert_eq!(0, array.buffer_length());
    array.fini().unwrap();
    assert_eq!(0, array.buffer_capacity());
    // A second fini on the same value is a no-op success.
    array.fini().unwrap();
}

#[test]
fn fini_on_zero_initialized_is_a_noop() {
    let mut array = CharArray::zero_initialized();
    array.fini().unwrap();
}

#[test]
fn init_with_zero_capacity_allocates_nothing() {
    let allocator = Allocator::default_allocator();
    let mut array = CharArray::zero_initialized();
    array.init(0, &allocator).unwrap();
    assert_eq!("", array.as_str());
    array.fini().unwrap();
}

#[test]
fn resize_rejects_zero() {
    let allocator = Allocator::default_allocator();
    let mut array = CharArray::zero_initialized();
    array.init(4, &allocator).unwrap();
    assert_eq!(Err(UtilError::InvalidArgument), array.resize(0));
    array.fini().unwrap();
}

#[test]
fn resize_truncates_length_but_not_below_contents() {
    let allocator = Allocator::default_allocator();
    let mut array = CharArray::zero_initialized();
    array.init(16, &allocator).unwrap();
    array.strcpy("hello world").unwrap();
    assert_eq!(12, array.buffer_length());
    array.resize(6).unwrap();
    assert_eq!(6, array.buffer_capacity());
    assert_eq!(6, array.buffer_length());
    array.fini().unwrap();
}

#[test]
fn borrowed_buffer_promotes_to_owned_on_resize() {
    let allocator = Allocator::default_allocator();
    let mut stack = [0u8; 8];
    let mut array = unsafe { CharArray::with_borrowed_buffer(&mut stack, &allocator) };
    array.strcpy("abc").unwrap();
    // Growing past the stack capacity must copy into owned storage and
    // keep the contents.
    array.strcat("defghijklmnop").unwrap();
    assert_eq!("abcdefghijklmnop", array.as_str());
    array.fini().unwrap();
}

#[test]
fn expand_as_needed_never_shrinks_and_grows_by_half() {
    let allocator = Allocator::default_allocator();
    let mut array = CharArray::zero_initialized();
    array.init(10, &allocator).unwrap();
    array.expand_as_needed(4).unwrap();
    assert_eq!(10, array.buffer_capacity());
    // 11 > 10, but the 1.5x floor takes it to 15.
    array.expand_as_needed(11).unwrap();
    assert_eq!(15, array.buffer_capacity());
    array.expand_as_needed(1000).unwrap();
    assert_eq!(1000, array.buffer_capacity());
    array.fini().unwrap();
}

#[test]
fn strcat_concatenates_with_single_terminator() {
    let allocator = Allocator::default_allocator();
    let mut array = CharArray::zero_initialized();
    array.init(1, &allocator).unwrap();
    array.strcat("foo").unwrap();
    array.strcat("bar").unwrap();
    assert_eq!("foobar", array.as_str());
    assert_eq!(7, array.buffer_length());
    assert_eq!(b"foobar\0", array.as_bytes());
    array.fini().unwrap();
}

#[test]
fn strncat_respects_count_and_empty_start() {
    let allocator = Allocator::default_allocator();
    let mut array = CharArray::zero_initialized();
    array.init(4, &allocator).unwrap();
    // buffer_length of 0 means "no current string".
    array.strncat("abcdef", 3).unwrap();
    assert_eq!("abc", array.as_str());
    array.strncat("xyz", 2).unwrap();
    assert_eq!("abcxy", array.as_str());
    assert_eq!(6, array.buffer_length());
    array.fini().unwrap();
}

#[test]
fn memcpy_sets_raw_length() {
    let allocator = Allocator::default_allocator();
    let mut array = CharArray::zero_initialized();
    array.init(2, &allocator).unwrap();
    array.memcpy(b"ab\0").unwrap();
    assert_eq!(3, array.buffer_length());
    assert_eq!("ab", array.as_str());
    array.fini().unwrap();
}

#[test]
fn format_overwrites_and_accounts_for_terminator() {
    let allocator = Allocator::default_allocator();
    let mut array = CharArray::zero_initialized();
    array.init(4, &allocator).unwrap();
    array.format(format_args!("{} {}", "hello", 42)).unwrap();
    assert_eq!("hello 42", array.as_str());
    assert_eq!(9, array.buffer_length());
    // A second format replaces, not appends.
    array.format(format_args!("x")).unwrap();
    assert_eq!("x", array.as_str());
    assert_eq!(2, array.buffer_length());
    array.fini().unwrap();
}

#[test]
fn fmt_write_appends_like_strcat() {
    use core::fmt::Write;
    let allocator = Allocator::default_allocator();
    let mut array = CharArray::zero_initialized();
    array.init(4, &allocator).unwrap();
    write!(array, "pose {}", 3).unwrap();
    write!(array, "/{}", 4).unwrap();
    assert_eq!("pose 3/4", array.as_str());
    array.fini().unwrap();
}

proptest! {
    // Any sequence of appends must equal the same appends on a String.
    #[test]
    fn strcat_matches_string_append(pieces in proptest::collection::vec("[a-zA-Z0-9 ]{0,16}", 0..12)) {
        let allocator = Allocator::default_allocator();
        let mut array = CharArray::zero_initialized();
        array.init(1, &allocator).unwrap();
        let mut model = String::new();
        for piece in &pieces {
            array.strcat(piece).unwrap();
            model.push_str(piece);
        }
        prop_assert_eq!(model.as_str(), array.as_str());
        array.fini().unwrap();
    }
}
