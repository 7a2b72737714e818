// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Process-wide fault-injection countdown for error-path testing
//!
//! A single atomic counter drives "fail the N-th fallible site" sweeps. A
//! value of `NEVER_FAIL` (-1) disables injection; any non-negative value is
//! decremented by each [`maybe_fail`] check and the check that observes 0
//! reports "fail now".

use core::sync::atomic::{AtomicI64, Ordering};

/// Counter value meaning fault injection is disabled.
pub const NEVER_FAIL: i64 = -1;
/// Return value of [`maybe_fail`] meaning the caller should fail now.
pub const FAIL_NOW: i64 = 0;

static FAULT_INJECTION_COUNT: AtomicI64 = AtomicI64::new(NEVER_FAIL);

/// Stores a new countdown value.
pub fn set_count(count: i64) {
    FAULT_INJECTION_COUNT.store(count, Ordering::SeqCst);
}

/// Loads the current countdown value.
pub fn get_count() -> i64 {
    FAULT_INJECTION_COUNT.load(Ordering::SeqCst)
}

/// Atomically decrements the countdown and reports the value it had.
///
/// Returns the pre-decrement value: `FAIL_NOW` tells the caller to take its
/// failure path, a positive value means "not this time", and a negative
/// value means injection is disabled (the counter is left untouched).
pub fn maybe_fail() -> i64 {
    let mut current = FAULT_INJECTION_COUNT.load(Ordering::SeqCst);
    loop {
        if current <= NEVER_FAIL {
            return current;
        }
        match FAULT_INJECTION_COUNT.compare_exchange(
            current,
            current - 1,
            Ordering::SeqCst,
            Ordering::SeqCst,
        ) {
            Ok(_) => return current,
            Err(observed) => current = observed,
        }
    }
}

/// True when the last run left the countdown unexhausted, i.e. the counter
/// outlasted every injection site and the sweep has covered them all.
pub fn is_test_complete() -> bool {
    get_count() > NEVER_FAIL
}

/// Runs `f` once per countdown value 0, 1, 2, … until a run completes
/// without exhausting the counter, guaranteeing every injection site has
/// been made to fail exactly once across the sweep. The counter is restored
/// to `NEVER_FAIL` afterwards.
pub fn fault_injection_test(mut f: impl FnMut()) {
    let mut count = 0;
    loop {
        set_count(count);
        count += 1;
        f();
        if is_test_complete() {
            break;
        }
    }
    set_count(NEVER_FAIL);
}

/// Suspends fault injection for the duration of `f`, restoring the previous
/// countdown afterwards. Used around cleanup code whose allocations must not
/// be made to fail.
pub fn no_fault_injection(f: impl FnOnce()) {
    let saved = get_count();
    set_count(NEVER_FAIL);
    f();
    set_count(saved);
}

/// Returns the given error from the enclosing function when the
/// fault-injection countdown elects this site.
#[macro_export]
macro_rules! fault_injection_maybe_return {
    ($err:expr) => {
        if $crate::testing::fault_injection::FAIL_NOW
            == $crate::testing::fault_injection::maybe_fail()
        {
            ::std::println!(
                "{}:{} injecting fault and returning {:?}",
                ::core::file!(),
                ::core::line!(),
                $err
            );
            return Err($err);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    // The countdown sweeps live in tests/fault_injection.rs; arming the
    // process-wide counter here would race the other unit tests, whose
    // allocations consult it.
    #[test]
    fn disabled_counter_never_fails() {
        set_count(NEVER_FAIL);
        assert_eq!(NEVER_FAIL, maybe_fail());
        assert_eq!(NEVER_FAIL, get_count());
        assert!(!is_test_complete());
    }
}
