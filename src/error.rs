// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Shared result-code taxonomy and per-thread error state
//! OWNERS: @runtime
//! INVARIANTS:
//! - Error state is strictly thread-local; a producer's error is observable
//!   by the immediate consumer on the same thread and no other
//! - The formatted error string is `"<message>, at <file>:<line>"`, bounded
//!   at 1024 bytes, formatted lazily and cached
//! - When no error is set, `get_error_string()` yields `"error not set"`

use core::fmt;
use std::cell::RefCell;

use thiserror::Error;

use crate::allocator::Allocator;

/// Maximum length of the formatted error string, including reserve for the
/// terminator byte of the C wire format this mirrors.
pub const ERROR_MESSAGE_MAX_LENGTH: usize = 1024;
/// Maximum length of the user-supplied message portion.
pub const ERROR_STATE_MESSAGE_MAX_LENGTH: usize = 768;
/// Maximum length a formatted line number may occupy ("18446744073709551615").
pub const ERROR_STATE_LINE_NUMBER_STR_MAX_LENGTH: usize = 20;
/// Formatting characters between the components (`, at ` and `:`).
pub const ERROR_FORMATTING_CHARACTERS: usize = 6;
/// Derived maximum length of the file component.
pub const ERROR_STATE_FILE_MAX_LENGTH: usize = ERROR_MESSAGE_MAX_LENGTH
    - ERROR_STATE_MESSAGE_MAX_LENGTH
    - ERROR_STATE_LINE_NUMBER_STR_MAX_LENGTH
    - ERROR_FORMATTING_CHARACTERS
    - 1;

/// The crate-wide failure taxonomy. Every fallible operation returns one of
/// these and sets the thread-local error message before doing so.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UtilError {
    /// Unspecified failure.
    #[error("operation failed")]
    Error,
    /// Memory allocation failed.
    #[error("memory allocation failed")]
    BadAlloc,
    /// A caller broke the API contract.
    #[error("invalid argument")]
    InvalidArgument,
    /// Lookup found no matching entry.
    #[error("entry not found")]
    NotFound,
    /// String map `init` called on an initialised map.
    #[error("string map already initialized")]
    StringMapAlreadyInit,
    /// String map operation on an uninitialised map.
    #[error("string map is invalid")]
    StringMapInvalid,
    /// String map `unset` for an absent key.
    #[error("string key not found")]
    StringKeyNotFound,
    /// Hash map iteration is exhausted.
    #[error("hash map has no more entries")]
    HashMapNoMoreEntries,
    /// Fixed-capacity container has no room left.
    #[error("not enough space")]
    NotEnoughSpace,
    /// Subsystem used before initialisation.
    #[error("not initialized")]
    NotInitialized,
    /// The logger severity map is unusable.
    #[error("logging severity map is invalid")]
    LoggingSeverityMapInvalid,
    /// A severity name failed to parse.
    #[error("logging severity string is invalid")]
    LoggingSeverityStringInvalid,
}

/// Result alias used throughout the crate.
pub type UtilResult<T> = Result<T, UtilError>;

/// Raw error state captured by [`set_error_state`]: message, file and line
/// of the failing call site, held in fixed-size buffers.
#[derive(Clone, Copy)]
pub struct ErrorState {
    message: [u8; ERROR_STATE_MESSAGE_MAX_LENGTH],
    message_len: usize,
    file: [u8; ERROR_STATE_FILE_MAX_LENGTH],
    file_len: usize,
    line: u64,
}

impl ErrorState {
    fn empty() -> Self {
        Self {
            message: [0; ERROR_STATE_MESSAGE_MAX_LENGTH],
            message_len: 0,
            file: [0; ERROR_STATE_FILE_MAX_LENGTH],
            file_len: 0,
            line: 0,
        }
    }

    /// The (possibly truncated) message text.
    pub fn message(&self) -> &str {
        str_from_prefix(&self.message, self.message_len)
    }

    /// The (possibly truncated) file name of the setting call site.
    pub fn file(&self) -> &str {
        str_from_prefix(&self.file, self.file_len)
    }

    /// The line number of the setting call site.
    pub fn line(&self) -> u64 {
        self.line
    }
}

impl fmt::Debug for ErrorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorState")
            .field("message", &self.message())
            .field("file", &self.file())
            .field("line", &self.line)
            .finish()
    }
}

/// By-value formatted error string, bounded at
/// [`ERROR_MESSAGE_MAX_LENGTH`] bytes.
#[derive(Clone, Copy)]
pub struct ErrorString {
    bytes: [u8; ERROR_MESSAGE_MAX_LENGTH],
    len: usize,
}

impl ErrorString {
    fn new() -> Self {
        Self { bytes: [0; ERROR_MESSAGE_MAX_LENGTH], len: 0 }
    }

    fn from_str(s: &str) -> Self {
        let mut out = Self::new();
        out.len = copy_str_truncated(&mut out.bytes, ERROR_MESSAGE_MAX_LENGTH - 1, s);
        out
    }

    /// The formatted text.
    pub fn as_str(&self) -> &str {
        str_from_prefix(&self.bytes, self.len)
    }
}

impl fmt::Display for ErrorString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for ErrorString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErrorString({:?})", self.as_str())
    }
}

fn str_from_prefix(bytes: &[u8], len: usize) -> &str {
    // Writers only ever store whole UTF-8 sequences, see copy_str_truncated.
    core::str::from_utf8(&bytes[..len]).unwrap_or("")
}

/// Copies at most `max` bytes of `src` into `dst`, backing off to the
/// previous character boundary when the cut would split a UTF-8 sequence.
/// Returns the number of bytes stored.
fn copy_str_truncated(dst: &mut [u8], max: usize, src: &str) -> usize {
    let mut take = src.len().min(max).min(dst.len());
    if take < src.len() {
        while take > 0 && !src.is_char_boundary(take) {
            take -= 1;
        }
        eprintln!(
            "[axon_util|error.rs:{}] an error string (message, file name, or formatted message) \
             will be truncated",
            line!()
        );
    }
    dst[..take].copy_from_slice(&src.as_bytes()[..take]);
    take
}

struct ThreadErrorState {
    initialized: bool,
    is_set: bool,
    state: ErrorState,
    formatted: ErrorString,
    is_formatted: bool,
}

impl ThreadErrorState {
    fn new() -> Self {
        Self {
            initialized: false,
            is_set: false,
            state: ErrorState::empty(),
            formatted: ErrorString::new(),
            is_formatted: false,
        }
    }
}

thread_local! {
    static THREAD_ERROR: RefCell<ThreadErrorState> = RefCell::new(ThreadErrorState::new());
}

fn format_error_string(state: &ErrorState) -> ErrorString {
    let mut out = ErrorString::new();
    let cap = ERROR_MESSAGE_MAX_LENGTH - 1;
    let mut len = 0;
    for piece in [state.message(), ", at ", state.file(), ":"] {
        len += copy_str_truncated(&mut out.bytes[len..], cap - len, piece);
    }
    let mut digits = [0u8; ERROR_STATE_LINE_NUMBER_STR_MAX_LENGTH];
    let digits_len = format_u64(state.line, &mut digits);
    let take = digits_len.min(cap - len);
    out.bytes[len..len + take].copy_from_slice(&digits[..take]);
    len += take;
    out.len = len;
    out
}

/// Renders `value` as decimal digits into `buf`, returning the length used.
fn format_u64(mut value: u64, buf: &mut [u8; ERROR_STATE_LINE_NUMBER_STR_MAX_LENGTH]) -> usize {
    if value == 0 {
        buf[0] = b'0';
        return 1;
    }
    let mut len = 0;
    while value != 0 {
        buf[len] = b'0' + (value % 10) as u8;
        value /= 10;
        len += 1;
    }
    buf[..len].reverse();
    len
}

/// Prepares the calling thread's error storage.
///
/// Idempotent per thread: a second call is a no-op success even with a
/// different allocator. The allocator is currently unused beyond validation
/// but kept so future storage strategies can allocate through it.
pub fn initialize_thread_local_storage(allocator: Allocator) -> UtilResult<()> {
    let already = THREAD_ERROR.with(|cell| cell.borrow().initialized);
    if already {
        return Ok(());
    }
    if !allocator.is_valid() {
        eprintln!(
            "[axon_util|error.rs:{}] initialize_thread_local_storage() given invalid allocator",
            line!()
        );
        return Err(UtilError::InvalidArgument);
    }
    THREAD_ERROR.with(|cell| cell.borrow_mut().initialized = true);
    // Exercise the full set/format/reset cycle once so any lazily created
    // storage is paid for here rather than on the first real error.
    reset_error();
    set_error_state("no error - initializing thread-local storage", file!(), line!() as u64);
    let _ = get_error_string();
    reset_error();
    Ok(())
}

/// Stores a new error state for the calling thread, truncating the message
/// and file into their fixed buffers and invalidating the cached formatted
/// string. The first error-setting call on a thread initialises its storage
/// implicitly.
pub fn set_error_state(message: &str, file: &str, line: u64) {
    let mut new_state = ErrorState::empty();
    new_state.message_len = copy_str_truncated(
        &mut new_state.message,
        ERROR_STATE_MESSAGE_MAX_LENGTH - 1,
        message,
    );
    new_state.file_len =
        copy_str_truncated(&mut new_state.file, ERROR_STATE_FILE_MAX_LENGTH - 1, file);
    new_state.line = line;

    THREAD_ERROR.with(|cell| {
        let mut tls = cell.borrow_mut();
        #[cfg(feature = "overwrite-warnings")]
        if tls.is_set
            && !same_string(message, tls.state.message())
            && !same_string(message, formatted_for(&tls))
        {
            let previous = if tls.is_formatted {
                tls.formatted
            } else {
                format_error_string(&tls.state)
            };
            eprintln!(
                ">>> [axon_util|error.rs:{}] set_error_state()\n\
                 This error state is being overwritten:\n\n  '{}'\n\n\
                 with this new error message:\n\n  '{}'\n\n\
                 reset_error() should be called after error handling to avoid this.\n<<<",
                line!(),
                previous.as_str(),
                format_error_string(&new_state).as_str(),
            );
        }
        tls.initialized = true;
        tls.state = new_state;
        tls.is_formatted = false;
        tls.formatted = ErrorString::new();
        tls.is_set = true;
    });
}

#[cfg(feature = "overwrite-warnings")]
fn formatted_for(tls: &ThreadErrorState) -> &str {
    if tls.is_formatted {
        tls.formatted.as_str()
    } else {
        ""
    }
}

// Prefix equality over the new message's length, mirroring the bounded
// comparison the warning check has always used.
#[cfg(feature = "overwrite-warnings")]
fn same_string(new_message: &str, old: &str) -> bool {
    old.as_bytes().starts_with(new_message.as_bytes())
}

/// True when an error is set on the calling thread.
pub fn error_is_set() -> bool {
    THREAD_ERROR.with(|cell| cell.borrow().is_set)
}

/// Copy of the current raw error state, or `None` when no error is set.
pub fn get_error_state() -> Option<ErrorState> {
    THREAD_ERROR.with(|cell| {
        let tls = cell.borrow();
        tls.is_set.then_some(tls.state)
    })
}

/// The formatted error string for the calling thread. Formatting is lazy
/// and cached; with no error set this is the literal `"error not set"`.
pub fn get_error_string() -> ErrorString {
    THREAD_ERROR.with(|cell| {
        let mut tls = cell.borrow_mut();
        if !tls.is_set {
            return ErrorString::from_str("error not set");
        }
        if !tls.is_formatted {
            tls.formatted = format_error_string(&tls.state);
            tls.is_formatted = true;
        }
        tls.formatted
    })
}

/// Clears the calling thread's error state.
pub fn reset_error() {
    THREAD_ERROR.with(|cell| {
        let mut tls = cell.borrow_mut();
        tls.state = ErrorState::empty();
        tls.is_formatted = false;
        tls.formatted = ErrorString::new();
        tls.is_set = false;
    });
}

/// Sets the thread-local error message, recording the calling file and line.
#[macro_export]
macro_rules! set_error_msg {
    ($($arg:tt)*) => {
        $crate::error::set_error_state(
            &::std::format!($($arg)*),
            ::core::file!(),
            ::core::line!() as u64,
        )
    };
}

/// Chains onto the current error: captures the formatted string, resets the
/// state, then sets `"<new message>: <previous string>"`. Truncation past
/// the 1024-byte bound is silent.
#[macro_export]
macro_rules! chain_error_msg {
    ($($arg:tt)*) => {{
        let previous = $crate::error::get_error_string();
        $crate::error::reset_error();
        $crate::error::set_error_state(
            &::std::format!("{}: {}", ::std::format!($($arg)*), previous.as_str()),
            ::core::file!(),
            ::core::line!() as u64,
        )
    }};
}
