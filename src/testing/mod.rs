// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! Test-support utilities shipped with the library proper so that dependent
//! crates can drive the same fault-injection sweeps.

pub mod fault_injection;
