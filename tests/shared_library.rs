// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Host tests for the shared-library loader
//! OWNERS: @runtime
//! TEST_COVERAGE: load/symbol/unload round trip against the system math
//!   library, misuse rejection, platform file naming

use axon_util::allocator::Allocator;
use axon_util::error::{self, UtilError};
use axon_util::shared_library::{platform_library_name, SharedLibrary};

#[cfg(target_os = "linux")]
const TEST_LIBRARY: &str = "libm.so.6";
#[cfg(target_os = "linux")]
const TEST_SYMBOL: &str = "cos";

#[test]
fn zero_initialized_handle_is_unloaded() {
    let lib = SharedLibrary::zero_initialized();
    assert!(!lib.is_loaded());
    assert_eq!(None, lib.library_path());
    assert!(!lib.has_symbol("anything"));
}

#[test]
fn load_rejects_invalid_allocator() {
    let mut lib = SharedLibrary::zero_initialized();
    assert_eq!(
        Err(UtilError::InvalidArgument),
        lib.load("whatever.so", Allocator::zero_initialized())
    );
    error::reset_error();
}

#[test]
fn load_of_missing_library_reports_error() {
    let mut lib = SharedLibrary::zero_initialized();
    let result = lib.load("definitely-not-a-real-library.so", Allocator::default_allocator());
    assert_eq!(Err(UtilError::Error), result);
    assert!(!lib.is_loaded());
    assert!(error::error_is_set());
    error::reset_error();
}

// Spec scenario: load, query symbols, unload, observe the cleared handle.
#[test]
#[cfg(target_os = "linux")]
fn load_symbol_unload_round_trip() {
    let mut lib = SharedLibrary::zero_initialized();
    lib.load(TEST_LIBRARY, Allocator::default_allocator()).unwrap();
    assert!(lib.is_loaded());

    // The stored path is the one the linker resolved, not necessarily the
    // string that was passed in.
    let path = lib.library_path().expect("resolved path");
    assert!(path.contains("libm"), "unexpected resolved path {path}");

    assert!(lib.has_symbol(TEST_SYMBOL));
    assert!(!lib.has_symbol("definitely_not_a_symbol"));
    assert!(!error::error_is_set(), "has_symbol must not set an error");

    let symbol = lib.get_symbol(TEST_SYMBOL);
    assert!(!symbol.is_null());

    let missing = lib.get_symbol("definitely_not_a_symbol");
    assert!(missing.is_null());
    // The diagnostic names the resolved library path.
    assert!(error::get_error_string().as_str().contains("definitely_not_a_symbol"));
    error::reset_error();

    lib.unload().unwrap();
    assert!(!lib.is_loaded());
    assert_eq!(None, lib.library_path());
}

#[test]
#[cfg(target_os = "linux")]
fn loading_twice_into_one_handle_is_rejected() {
    let mut lib = SharedLibrary::zero_initialized();
    lib.load(TEST_LIBRARY, Allocator::default_allocator()).unwrap();
    assert_eq!(
        Err(UtilError::InvalidArgument),
        lib.load(TEST_LIBRARY, Allocator::default_allocator())
    );
    error::reset_error();
    lib.unload().unwrap();
}

#[test]
fn unload_without_load_is_invalid() {
    let mut lib = SharedLibrary::zero_initialized();
    assert_eq!(Err(UtilError::InvalidArgument), lib.unload());
    error::reset_error();
}

#[test]
fn platform_library_name_matches_target() {
    #[cfg(target_os = "linux")]
    {
        assert_eq!("libvision.so", platform_library_name("vision", false));
        assert_eq!("libvisiond.so", platform_library_name("vision", true));
    }
    #[cfg(target_os = "macos")]
    {
        assert_eq!("libvision.dylib", platform_library_name("vision", false));
        assert_eq!("libvisiond.dylib", platform_library_name("vision", true));
    }
    #[cfg(windows)]
    {
        assert_eq!("vision.dll", platform_library_name("vision", false));
        assert_eq!("visiond.dll", platform_library_name("vision", true));
    }
}
