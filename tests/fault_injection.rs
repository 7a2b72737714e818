// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Host tests for the fault-injection counter
//! OWNERS: @runtime
//! TEST_COVERAGE: countdown semantics, sweep driver, allocator integration
//!
//! The counter is process-global and the default allocator consults it, so
//! every test here serialises on one lock and disarms the counter before
//! releasing it.

use std::sync::Mutex;

use axon_util::allocator::Allocator;
use axon_util::error::{UtilError, UtilResult};
use axon_util::fault_injection_maybe_return;
use axon_util::testing::fault_injection::{
    self, fault_injection_test, no_fault_injection, FAIL_NOW, NEVER_FAIL,
};

static COUNTER_LOCK: Mutex<()> = Mutex::new(());

fn lock() -> std::sync::MutexGuard<'static, ()> {
    COUNTER_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[test]
fn countdown_decrements_to_disabled() {
    let _g = lock();
    fault_injection::set_count(2);
    assert_eq!(2, fault_injection::maybe_fail());
    assert_eq!(1, fault_injection::maybe_fail());
    assert_eq!(FAIL_NOW, fault_injection::maybe_fail());
    // The failing check drops the counter below zero.
    assert_eq!(NEVER_FAIL, fault_injection::get_count());
    assert_eq!(NEVER_FAIL, fault_injection::maybe_fail());
    fault_injection::set_count(NEVER_FAIL);
}

#[test]
fn no_fault_injection_suspends_and_restores() {
    let _g = lock();
    fault_injection::set_count(5);
    no_fault_injection(|| {
        assert_eq!(NEVER_FAIL, fault_injection::get_count());
        assert_eq!(NEVER_FAIL, fault_injection::maybe_fail());
    });
    assert_eq!(5, fault_injection::get_count());
    fault_injection::set_count(NEVER_FAIL);
}

// A subject with three allocation sites, each of which can be made to fail
// through the default allocator's own fault-injection checks.
fn three_allocation_subject(allocator: &Allocator) -> UtilResult<()> {
    let a = allocator.allocate(16);
    if a.is_null() {
        return Err(UtilError::BadAlloc);
    }
    let b = allocator.allocate(32);
    if b.is_null() {
        unsafe { allocator.deallocate(a) };
        return Err(UtilError::BadAlloc);
    }
    let c = allocator.zero_allocate(4, 8);
    if c.is_null() {
        unsafe {
            allocator.deallocate(a);
            allocator.deallocate(b);
        }
        return Err(UtilError::BadAlloc);
    }
    unsafe {
        allocator.deallocate(a);
        allocator.deallocate(b);
        allocator.deallocate(c);
    }
    Ok(())
}

// Spec scenario: the sweep makes each of the three sites fail exactly once
// and completes on the first full pass.
#[test]
fn sweep_fails_every_site_exactly_once() {
    let _g = lock();
    let allocator = Allocator::default_allocator();
    let mut failures = 0;
    let mut successes = 0;
    fault_injection_test(|| match three_allocation_subject(&allocator) {
        Ok(()) => successes += 1,
        Err(UtilError::BadAlloc) => failures += 1,
        Err(other) => panic!("unexpected error {other:?}"),
    });
    assert_eq!(3, failures);
    assert_eq!(1, successes);
    assert_eq!(NEVER_FAIL, fault_injection::get_count());
}

fn guarded_operation() -> UtilResult<u32> {
    fault_injection_maybe_return!(UtilError::Error);
    Ok(7)
}

#[test]
fn maybe_return_macro_fires_on_zero() {
    let _g = lock();
    fault_injection::set_count(0);
    assert_eq!(Err(UtilError::Error), guarded_operation());
    fault_injection::set_count(NEVER_FAIL);
    assert_eq!(Ok(7), guarded_operation());
}
