// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! Environment accessors. An unset variable reads as the empty string so
//! call sites only deal with one "not configured" shape.

use std::env;

use crate::error::{UtilError, UtilResult};
use crate::set_error_msg;

/// Reads `name` from the process environment. Unset variables yield an
/// empty string; values that are not valid unicode are an error.
pub fn get_env(name: &str) -> UtilResult<String> {
    match env::var(name) {
        Ok(value) => Ok(value),
        Err(env::VarError::NotPresent) => Ok(String::new()),
        Err(env::VarError::NotUnicode(_)) => {
            set_error_msg!("environment variable {} is not valid unicode", name);
            Err(UtilError::Error)
        }
    }
}

/// Tri-state reading of a `0`/`1` environment variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EnvFlag {
    Zero,
    One,
    Empty,
}

/// Parses `name` as a strict `0`/`1` flag. Anything else is rejected with
/// an error message naming both accepted values and their meanings.
pub(crate) fn get_env_flag(
    name: &str,
    zero_semantic: &str,
    one_semantic: &str,
) -> UtilResult<EnvFlag> {
    let value = get_env(name).map_err(|e| {
        crate::chain_error_msg!("error getting environment variable {}", name);
        e
    })?;
    match value.as_str() {
        "" => Ok(EnvFlag::Empty),
        "0" => Ok(EnvFlag::Zero),
        "1" => Ok(EnvFlag::One),
        other => {
            set_error_msg!(
                "unexpected value [{}] specified for {}. Valid values are 0 ({}) or 1 ({}).",
                other,
                name,
                zero_semantic,
                one_semantic
            );
            Err(UtilError::InvalidArgument)
        }
    }
}
