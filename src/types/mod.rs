// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! Container family. Every container takes an [`crate::allocator::Allocator`]
//! at `init` time and reports failures through the shared error subsystem.

pub(crate) mod alloc_string;
pub mod array_list;
pub mod byte_array;
pub mod char_array;
pub mod hash_map;
pub mod string_array;
pub mod string_map;

pub use array_list::ArrayList;
pub use byte_array::ByteArray;
pub use char_array::CharArray;
pub use hash_map::HashMap;
pub use string_array::StringArray;
pub use string_map::StringMap;
