// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Host test for the `log` facade bridge
//! OWNERS: @runtime
//!
//! `log::set_logger` works once per process, so everything lives in one
//! test function.

use axon_util::logging::{self, bridge, LogSeverity};

#[test]
fn bridge_routes_records_through_the_pipeline() {
    logging::initialize().unwrap();
    bridge::install().unwrap();
    // Everything below FATAL is gated off so the records exercise the full
    // path without writing to the test output.
    logging::set_default_logger_level(LogSeverity::Fatal);

    assert!(!log::log_enabled!(target: "bridge.test", log::Level::Info));
    log::info!(target: "bridge.test", "dropped {}", 1);
    log::warn!(target: "bridge.test", "dropped {}", 2);

    // Opening the logger up makes the facade report enabled again.
    logging::set_logger_level("bridge.test", LogSeverity::Debug).unwrap();
    assert!(log::log_enabled!(target: "bridge.test", log::Level::Debug));

    logging::set_default_logger_level(LogSeverity::Unset);
    logging::shutdown().unwrap();
}
