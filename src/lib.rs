// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Foundation utilities for the Axon middleware stack
//! OWNERS: @runtime
//! STATUS: Stable core, experimental digest/bridge surfaces
//! API_STABILITY: Unstable
//!
//! The primitives everything above builds on: the allocator value type that
//! parameterises every container, thread-local error state with bounded
//! formatted strings, the container family (char/byte arrays, array list,
//! hash map, string map, string array), the logging pipeline with its
//! env-driven configuration and pluggable sink, the shared-library loader,
//! and the fault-injection counter that drives error-path testing.
//!
//! INVARIANTS:
//! - Every fallible operation returns a [`error::UtilError`] code and sets
//!   the thread-local error message before returning
//! - Every `init`/`load` has a matching `fini`/`unload`; mid-operation
//!   failures release what they acquired (the one documented exception is
//!   `reallocf` with an invalid allocator)
//! - Containers are single-threaded; the error state is per-thread; the
//!   fault-injection counter and logging handler slot are atomic

pub mod allocator;
pub mod digest;
pub mod env;
pub mod error;
pub mod logging;
pub mod shared_library;
pub mod testing;
pub mod time;
pub mod types;

pub use allocator::Allocator;
pub use error::{UtilError, UtilResult};
pub use logging::{LogLocation, LogSeverity};
pub use shared_library::SharedLibrary;
pub use types::{ArrayList, ByteArray, CharArray, HashMap, StringArray, StringMap};
