// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Logging pipeline – env-driven init, logger hierarchy, console sink
//! OWNERS: @runtime
//! STATUS: Stable within the crate; the output handler contract is the
//! extension point
//! INVARIANTS:
//! - Initialisation happens once; the format template is compiled exactly
//!   once and never re-parsed
//! - Severity values have a zero low bit; the severity map overloads bit 0
//!   as the "set by user" marker and readers mask it in one place
//! - Every public entry point auto-initialises with the default allocator
//! - A log record is one line, written with a single write call

mod template;

pub mod bridge;

use core::fmt;
use core::str::FromStr;
use core::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::io::{IsTerminal, Write};

use parking_lot::Mutex;

use crate::allocator::Allocator;
use crate::env::{self, EnvFlag};
use crate::error::{self, UtilError, UtilResult};
use crate::set_error_msg;
use crate::time::{self, TimePointValue};
use crate::types::hash_map::{string_eq, string_hash};
use crate::types::{ArrayList, CharArray, HashMap};

use template::{LogContext, MsgPart};

/// Severity levels. The values are spaced by ten with the low bit zero; the
/// severity map relies on that to tag entries (see `add_severity`).
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Defer to the logger's ancestry (or the process default).
    Unset = 0,
    Debug = 10,
    Info = 20,
    Warn = 30,
    Error = 40,
    Fatal = 50,
}

impl LogSeverity {
    /// Upper-case severity name.
    pub fn label(self) -> &'static str {
        match self {
            LogSeverity::Unset => "UNSET",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO",
            LogSeverity::Warn => "WARN",
            LogSeverity::Error => "ERROR",
            LogSeverity::Fatal => "FATAL",
        }
    }

    /// The severity with the given numeric value, if it is in the set.
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(LogSeverity::Unset),
            10 => Some(LogSeverity::Debug),
            20 => Some(LogSeverity::Info),
            30 => Some(LogSeverity::Warn),
            40 => Some(LogSeverity::Error),
            50 => Some(LogSeverity::Fatal),
            _ => None,
        }
    }
}

impl FromStr for LogSeverity {
    type Err = UtilError;

    /// Case-insensitive match against the severity names, `UNSET` included.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        for candidate in [
            LogSeverity::Unset,
            LogSeverity::Debug,
            LogSeverity::Info,
            LogSeverity::Warn,
            LogSeverity::Error,
            LogSeverity::Fatal,
        ] {
            if candidate.label() == upper {
                return Ok(candidate);
            }
        }
        set_error_msg!("unknown severity string '{}'", s);
        Err(UtilError::LoggingSeverityStringInvalid)
    }
}

/// Source location attached to a log call.
#[derive(Clone, Copy, Debug)]
pub struct LogLocation {
    pub function_name: &'static str,
    pub file_name: &'static str,
    pub line_number: u64,
}

/// Output handler: receives every record that passed the severity gate.
pub type LoggingOutputHandler =
    fn(Option<&LogLocation>, LogSeverity, &str, TimePointValue, fmt::Arguments<'_>);

/// Default level a fresh logging system starts with.
pub const DEFAULT_LOGGER_DEFAULT_LEVEL: LogSeverity = LogSeverity::Info;

const MAX_OUTPUT_FORMAT_LEN: usize = 2048;
const DEFAULT_OUTPUT_FORMAT: &str = "[{severity}] [{time}] [{name}]: {message}";
const SEPARATOR: char = '.';

const COLOR_NORMAL: &str = "\x1b[0m";
const COLOR_RED: &str = "\x1b[31m";
const COLOR_GREEN: &str = "\x1b[32m";
const COLOR_YELLOW: &str = "\x1b[33m";

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputStream {
    Stdout,
    Stderr,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum BufferingMode {
    StreamDefault,
    Unbuffered,
    LineBuffered,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ColorizedOutput {
    ForceDisable,
    ForceEnable,
    Auto,
}

struct LoggingState {
    allocator: Allocator,
    stream: OutputStream,
    buffering: BufferingMode,
    colorized: ColorizedOutput,
    output_format: String,
    parts: ArrayList<MsgPart>,
    severities: HashMap<String, i32>,
    severities_valid: bool,
}

static INITIALIZED: AtomicBool = AtomicBool::new(false);
static DEFAULT_LEVEL: AtomicI32 = AtomicI32::new(DEFAULT_LOGGER_DEFAULT_LEVEL as i32);
// Stores a LoggingOutputHandler as a raw address; zero means unset. Reads
// and writes are single atomic operations so handler replacement is
// lock-free, as the contract requires.
static OUTPUT_HANDLER: AtomicUsize = AtomicUsize::new(0);
static STATE: Mutex<Option<LoggingState>> = Mutex::new(None);

fn store_output_handler(function: Option<LoggingOutputHandler>) {
    let raw = function.map_or(0, |f| f as usize);
    OUTPUT_HANDLER.store(raw, Ordering::SeqCst);
}

fn load_output_handler() -> Option<LoggingOutputHandler> {
    let raw = OUTPUT_HANDLER.load(Ordering::SeqCst);
    if raw == 0 {
        return None;
    }
    // A non-zero slot only ever holds a LoggingOutputHandler address.
    Some(unsafe { core::mem::transmute::<usize, LoggingOutputHandler>(raw) })
}

/// Initialises the logging system with the default allocator.
pub fn initialize() -> UtilResult<()> {
    initialize_with_allocator(Allocator::default_allocator())
}

/// Initialises the logging system: stores the allocator, installs the
/// console handler, reads the `RCUTILS_*` environment variables, builds the
/// severity map and compiles the format template. Idempotent; a second call
/// returns success immediately.
///
/// An invalid value in one of the `0`/`1` environment variables is recorded
/// as `InvalidArgument` but initialisation still completes with that
/// variable's documented default, so the process keeps a working logger.
pub fn initialize_with_allocator(allocator: Allocator) -> UtilResult<()> {
    let mut guard = STATE.lock();
    if INITIALIZED.load(Ordering::Acquire) {
        return Ok(());
    }
    if !allocator.is_valid() {
        set_error_msg!("provided allocator is invalid");
        return Err(UtilError::InvalidArgument);
    }

    let mut deferred: UtilResult<()> = Ok(());

    store_output_handler(Some(console_output_handler));
    DEFAULT_LEVEL.store(DEFAULT_LOGGER_DEFAULT_LEVEL as i32, Ordering::SeqCst);

    match env::get_env("RCUTILS_CONSOLE_STDOUT_LINE_BUFFERED") {
        Ok(value) => {
            if !value.is_empty() {
                eprintln!(
                    "RCUTILS_CONSOLE_STDOUT_LINE_BUFFERED is now ignored. \
                     Please set RCUTILS_LOGGING_USE_STDOUT and RCUTILS_LOGGING_BUFFERED_STREAM \
                     to control the stream and the buffering of log messages."
                );
            }
        }
        Err(e) => deferred = deferred.and(Err(e)),
    }

    // Errors propagate immediately; the default stream is stderr so errors
    // are seen right away, stdout is opt-in.
    let stream = match env::get_env_flag("RCUTILS_LOGGING_USE_STDOUT", "use stderr", "use stdout")
    {
        Ok(EnvFlag::Empty) | Ok(EnvFlag::Zero) => OutputStream::Stderr,
        Ok(EnvFlag::One) => OutputStream::Stdout,
        Err(e) => {
            deferred = deferred.and(Err(e));
            OutputStream::Stderr
        }
    };

    let buffering =
        match env::get_env_flag("RCUTILS_LOGGING_BUFFERED_STREAM", "not buffered", "buffered") {
            Ok(EnvFlag::Empty) => BufferingMode::StreamDefault,
            Ok(EnvFlag::Zero) => BufferingMode::Unbuffered,
            Ok(EnvFlag::One) => BufferingMode::LineBuffered,
            Err(e) => {
                deferred = deferred.and(Err(e));
                BufferingMode::StreamDefault
            }
        };

    let colorized =
        match env::get_env_flag("RCUTILS_COLORIZED_OUTPUT", "force color", "force no color") {
            Ok(EnvFlag::Empty) => ColorizedOutput::Auto,
            Ok(EnvFlag::Zero) => ColorizedOutput::ForceDisable,
            Ok(EnvFlag::One) => ColorizedOutput::ForceEnable,
            Err(e) => {
                deferred = deferred.and(Err(e));
                ColorizedOutput::Auto
            }
        };

    let mut output_format = match env::get_env("RCUTILS_CONSOLE_OUTPUT_FORMAT") {
        Ok(value) if !value.is_empty() => value,
        Ok(_) => DEFAULT_OUTPUT_FORMAT.to_string(),
        Err(e) => {
            deferred = deferred.and(Err(e));
            DEFAULT_OUTPUT_FORMAT.to_string()
        }
    };
    if output_format.len() > MAX_OUTPUT_FORMAT_LEN - 1 {
        let mut cut = MAX_OUTPUT_FORMAT_LEN - 1;
        while cut > 0 && !output_format.is_char_boundary(cut) {
            cut -= 1;
        }
        output_format.truncate(cut);
    }

    let mut severities: HashMap<String, i32> = HashMap::zero_initialized();
    if let Err(e) = severities.init(2, string_hash, string_eq, &allocator) {
        crate::chain_error_msg!(
            "failed to initialize map for logger severities, severities will not be configurable"
        );
        return Err(e);
    }

    let mut parts: ArrayList<MsgPart> = ArrayList::zero_initialized();
    if let Err(e) = parts.init(16, &allocator) {
        crate::chain_error_msg!("failed to allocate the format handler list");
        let _ = severities.fini();
        return Err(e);
    }
    // A too-long template sets an error and keeps the parts compiled so
    // far; that is not fatal to initialisation.
    template::parse_and_create_handlers(&output_format, &mut parts);

    *guard = Some(LoggingState {
        allocator,
        stream,
        buffering,
        colorized,
        output_format,
        parts,
        severities,
        severities_valid: true,
    });
    INITIALIZED.store(true, Ordering::Release);
    deferred
}

/// Shuts the logging system down: drains and destroys the severity map,
/// clears the compiled template and marks the system uninitialised. Errors
/// along the way are reported but do not abort the shutdown.
pub fn shutdown() -> UtilResult<()> {
    let mut guard = STATE.lock();
    if !INITIALIZED.load(Ordering::Acquire) {
        return Ok(());
    }
    let mut ret = Ok(());
    if let Some(state) = guard.as_mut() {
        if state.severities_valid {
            // Remove entries one at a time, restarting from the front after
            // every mutation; iteration state does not survive an unset.
            loop {
                match state.severities.get_next_key_and_data(None) {
                    Ok((key, _)) => {
                        if let Err(e) = state.severities.unset(&key) {
                            crate::chain_error_msg!(
                                "failed to clear out logger severities during shutdown; \
                                 memory will be leaked"
                            );
                            ret = Err(e);
                            break;
                        }
                    }
                    Err(UtilError::HashMapNoMoreEntries) => break,
                    Err(e) => {
                        crate::chain_error_msg!("failed to walk logger severities during shutdown");
                        ret = Err(e);
                        break;
                    }
                }
            }
            if state.severities.fini().is_err() {
                crate::chain_error_msg!("failed to finalize map for logger severities");
                ret = Err(UtilError::LoggingSeverityMapInvalid);
            }
            state.severities_valid = false;
        }
        let _ = state.parts.fini();
    }
    *guard = None;
    store_output_handler(None);
    INITIALIZED.store(false, Ordering::Release);
    ret
}

// Every public entry point funnels through here; failures are reported to
// stderr and processing continues with whatever state exists.
fn ensure_initialized() {
    if !INITIALIZED.load(Ordering::Acquire) {
        if let Err(e) = initialize() {
            eprintln!(
                "[axon_util|logging] error initializing logging: {} ({})",
                error::get_error_string(),
                e
            );
            error::reset_error();
        }
    }
}

/// The current output handler.
pub fn get_output_handler() -> Option<LoggingOutputHandler> {
    ensure_initialized();
    load_output_handler()
}

/// Replaces the output handler. The caller coordinates replacement against
/// concurrent log calls; this function itself is a single atomic store.
pub fn set_output_handler(function: LoggingOutputHandler) {
    ensure_initialized();
    store_output_handler(Some(function));
}

// Lock-free default-level read for call sites that already hold the state
// lock (re-entering initialisation from there would deadlock).
fn default_level_raw() -> LogSeverity {
    LogSeverity::from_value(DEFAULT_LEVEL.load(Ordering::SeqCst))
        .unwrap_or(DEFAULT_LOGGER_DEFAULT_LEVEL)
}

/// The process-default severity level.
pub fn get_default_logger_level() -> LogSeverity {
    ensure_initialized();
    default_level_raw()
}

/// Sets the process-default severity level; `Unset` restores the built-in
/// default.
pub fn set_default_logger_level(level: LogSeverity) {
    ensure_initialized();
    let level = if level == LogSeverity::Unset { DEFAULT_LOGGER_DEFAULT_LEVEL } else { level };
    DEFAULT_LEVEL.store(level as i32, Ordering::SeqCst);
}

// Bit 0 of a stored severity value marks "explicitly set by a user" as
// opposed to "cached by the implementation while resolving". The severity
// values all have a zero low bit, which makes the overload safe. This is
// the single place readers mask the marker off.
fn severity_map_value_level(value: i32) -> LogSeverity {
    LogSeverity::from_value(value & !0x1).unwrap_or(LogSeverity::Unset)
}

fn add_severity(
    state: &mut LoggingState,
    name: &str,
    level: LogSeverity,
    set_by_user: bool,
) -> UtilResult<()> {
    let mut value = level as i32;
    if set_by_user {
        value |= 0x1;
    }
    let key = name.to_string();
    state.severities.set(&key, &value)
}

fn lookup_severity(state: &LoggingState, name: &String) -> UtilResult<LogSeverity> {
    let value = state.severities.get(name)?;
    Ok(severity_map_value_level(value))
}

/// The severity stored for exactly `name`, without walking the hierarchy.
/// An unknown logger reads as `Unset`.
pub fn get_logger_level(name: &str) -> LogSeverity {
    ensure_initialized();
    if name.is_empty() {
        return get_default_logger_level();
    }
    let guard = STATE.lock();
    let Some(state) = guard.as_ref() else {
        return LogSeverity::Unset;
    };
    if !state.severities_valid {
        return LogSeverity::Unset;
    }
    lookup_severity(state, &name.to_string()).unwrap_or(LogSeverity::Unset)
}

/// The level that effectively applies to `name`: its own level if set,
/// otherwise the nearest ancestor's (splitting at `.`), otherwise the
/// process default. Resolved ancestor levels are cached for the queried
/// name with the user-set marker clear.
pub fn get_logger_effective_level(name: &str) -> LogSeverity {
    ensure_initialized();
    let mut guard = STATE.lock();
    let Some(state) = guard.as_mut() else {
        return default_level_raw();
    };
    get_logger_effective_level_impl(state, name)
}

fn get_logger_effective_level_impl(state: &mut LoggingState, name: &str) -> LogSeverity {
    let default_level = default_level_raw();
    if name.is_empty() || !state.severities_valid {
        return default_level;
    }
    if state.severities.get_size().unwrap_or(0) == 0 {
        return default_level;
    }

    // Fast path: the exact name has a non-UNSET level.
    let mut key = name.to_string();
    match lookup_severity(state, &key) {
        Ok(level) if level != LogSeverity::Unset => return level,
        _ => {}
    }

    // Slow path: trim at the rightmost separator until an ancestor with a
    // set level appears.
    let mut severity = LogSeverity::Unset;
    while let Some(index) = key.rfind(SEPARATOR) {
        key.truncate(index);
        match lookup_severity(state, &key) {
            Ok(level) if level != LogSeverity::Unset => {
                severity = level;
                break;
            }
            _ => {}
        }
    }

    if severity == LogSeverity::Unset {
        // Neither the logger nor its ancestors have a level; the process
        // default applies. Not cacheable: the default can change later.
        return default_level;
    }

    // Cache the ancestor resolution for the full name so the next query
    // takes the fast path. A failure to cache only costs performance.
    if add_severity(state, name, severity, false).is_err() {
        error::reset_error();
    }
    severity
}

/// Sets the severity level for `name`, replacing any cached resolutions of
/// its descendants while leaving user-set descendants untouched. An empty
/// name also updates the process default.
pub fn set_logger_level(name: &str, level: LogSeverity) -> UtilResult<()> {
    ensure_initialized();
    let mut guard = STATE.lock();
    let Some(state) = guard.as_mut() else {
        set_error_msg!("logging system is not initialized");
        return Err(UtilError::NotInitialized);
    };
    if !state.severities_valid {
        set_error_msg!("logger severity level map is invalid");
        return Err(UtilError::LoggingSeverityMapInvalid);
    }

    if state.severities.key_exists(&name.to_string()) {
        // Sweep for the name itself (removed unconditionally) and cached
        // descendants (removed only when the user did not set them). Keys
        // are collected first; mutating the map invalidates iteration.
        let mut doomed: Vec<String> = Vec::new();
        let mut cursor: Option<(String, i32)> = None;
        loop {
            let previous = cursor.as_ref().map(|(k, _)| k);
            match state.severities.get_next_key_and_data(previous) {
                Ok((key, value)) => {
                    if key == name {
                        doomed.push(key.clone());
                    } else if key.len() > name.len()
                        && key.starts_with(name)
                        && key.as_bytes()[name.len()] == b'.'
                        && (value & 0x1) == 0
                    {
                        doomed.push(key.clone());
                    }
                    cursor = Some((key, value));
                }
                Err(UtilError::HashMapNoMoreEntries) | Err(UtilError::NotFound) => break,
                Err(e) => {
                    crate::chain_error_msg!(
                        "error accessing hash map when setting logger level for '{}'",
                        name
                    );
                    return Err(e);
                }
            }
        }
        for key in doomed {
            if let Err(e) = state.severities.unset(&key) {
                crate::chain_error_msg!(
                    "error clearing old severity level for logger named '{}'",
                    name
                );
                return Err(e);
            }
        }
    }

    if let Err(e) = add_severity(state, name, level, true) {
        crate::chain_error_msg!("error setting severity level for logger named '{}'", name);
        return Err(e);
    }

    if name.is_empty() {
        DEFAULT_LEVEL.store(level as i32, Ordering::SeqCst);
    }
    Ok(())
}

/// True when a record of `severity` for logger `name` would be emitted. A
/// `None` name gates against the process default.
pub fn logger_is_enabled_for(name: Option<&str>, severity: LogSeverity) -> bool {
    ensure_initialized();
    let threshold = match name {
        Some(name) => {
            let mut guard = STATE.lock();
            match guard.as_mut() {
                Some(state) => get_logger_effective_level_impl(state, name),
                None => default_level_raw(),
            }
        }
        None => default_level_raw(),
    };
    severity >= threshold
}

/// Logs one record: severity gate, timestamp capture, then dispatch to the
/// current output handler.
pub fn log(
    location: Option<&LogLocation>,
    severity: LogSeverity,
    name: Option<&str>,
    args: fmt::Arguments<'_>,
) {
    if !logger_is_enabled_for(name, severity) {
        return;
    }
    let now = match time::system_time_now() {
        Ok(now) => now,
        Err(_) => {
            eprintln!("failed to get timestamp while doing a console logging");
            error::reset_error();
            return;
        }
    };
    if let Some(handler) = load_output_handler() {
        handler(location, severity, name.unwrap_or(""), now, args);
    }
}

/// Runs the compiled template over one record, appending into `out`. This
/// is the formatting step of the console handler, exposed for custom
/// handlers.
pub fn format_message(
    location: Option<&LogLocation>,
    severity: LogSeverity,
    name: &str,
    timestamp: TimePointValue,
    msg: &str,
    out: &mut CharArray,
) -> UtilResult<()> {
    ensure_initialized();
    let guard = STATE.lock();
    let Some(state) = guard.as_ref() else {
        set_error_msg!("logging system is not initialized");
        return Err(UtilError::NotInitialized);
    };
    let ctx = LogContext {
        name,
        location,
        severity,
        timestamp,
        msg,
        template: &state.output_format,
    };
    template::run_parts(&state.parts, &ctx, out)
}

fn severity_color(severity: LogSeverity) -> &'static str {
    match severity {
        LogSeverity::Debug => COLOR_GREEN,
        LogSeverity::Warn => COLOR_YELLOW,
        LogSeverity::Error | LogSeverity::Fatal => COLOR_RED,
        _ => COLOR_NORMAL,
    }
}

/// The built-in sink: formats the message, runs the compiled template and
/// writes one colourised line to the configured stream.
pub fn console_output_handler(
    location: Option<&LogLocation>,
    severity: LogSeverity,
    name: &str,
    timestamp: TimePointValue,
    args: fmt::Arguments<'_>,
) {
    if !INITIALIZED.load(Ordering::Acquire) {
        eprintln!(
            "logging system isn't initialized: call to console_output_handler failed"
        );
        return;
    }
    match severity {
        LogSeverity::Debug
        | LogSeverity::Info
        | LogSeverity::Warn
        | LogSeverity::Error
        | LogSeverity::Fatal => {}
        other => {
            eprintln!("unknown severity level: {}", other as i32);
            return;
        }
    }

    let guard = STATE.lock();
    let Some(state) = guard.as_ref() else {
        return;
    };

    let is_colorized = match state.colorized {
        ColorizedOutput::ForceEnable => true,
        ColorizedOutput::ForceDisable => false,
        ColorizedOutput::Auto => match state.stream {
            OutputStream::Stdout => std::io::stdout().is_terminal(),
            OutputStream::Stderr => std::io::stderr().is_terminal(),
        },
    };

    // Stack-backed buffers sized for the common case; the arrays promote
    // themselves to the logging allocator if a record outgrows them.
    let mut msg_stack = [0u8; 1024];
    let mut msg_array =
        unsafe { CharArray::with_borrowed_buffer(&mut msg_stack, &state.allocator) };
    let mut output_stack = [0u8; 1024];
    let mut output_array =
        unsafe { CharArray::with_borrowed_buffer(&mut output_stack, &state.allocator) };

    let mut status: UtilResult<()> = Ok(());

    if is_colorized {
        status = output_array.strcat(severity_color(severity));
    }

    if status.is_ok() {
        status = msg_array.format(args);
        if let Err(e) = status {
            eprintln!("error: formatting the log message failed with: {}", e);
        }
    }

    if status.is_ok() {
        let ctx = LogContext {
            name,
            location,
            severity,
            timestamp,
            msg: msg_array.as_str(),
            template: &state.output_format,
        };
        status = template::run_parts(&state.parts, &ctx, &mut output_array);
        if let Err(e) = status {
            eprintln!("error: formatting the log record failed with: {}", e);
        }
    }

    if is_colorized && status.is_ok() {
        status = output_array.strcat(COLOR_NORMAL);
    }

    if status.is_ok() {
        if let Err(e) = output_array.strcat("\n") {
            status = Err(e);
        }
    }

    if status.is_ok() {
        let record = output_array.as_str().as_bytes();
        let flush = state.buffering != BufferingMode::StreamDefault;
        let write_failed = match state.stream {
            OutputStream::Stdout => {
                let mut stream = std::io::stdout().lock();
                stream.write_all(record).is_err() || (flush && stream.flush().is_err())
            }
            OutputStream::Stderr => {
                let mut stream = std::io::stderr().lock();
                stream.write_all(record).is_err() || (flush && stream.flush().is_err())
            }
        };
        if write_failed {
            // Nothing sensible left to do; the stream itself is gone.
            return;
        }
    } else {
        error::reset_error();
    }

    if msg_array.fini().is_err() {
        eprintln!("failed to fini array");
    }
    if output_array.fini().is_err() {
        eprintln!("failed to fini array");
    }
}

/// Captures the enclosing function's path as a `&'static str`.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        let name = type_name_of(f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}

/// Builds a [`crate::logging::LogLocation`] for the current source position.
#[macro_export]
macro_rules! log_location {
    () => {
        $crate::logging::LogLocation {
            function_name: $crate::function_name!(),
            file_name: ::core::file!(),
            line_number: ::core::line!() as u64,
        }
    };
}

/// Logs at DEBUG for the named logger, capturing the call site.
#[macro_export]
macro_rules! log_debug {
    ($name:expr, $($arg:tt)*) => {
        $crate::logging::log(
            Some(&$crate::log_location!()),
            $crate::logging::LogSeverity::Debug,
            Some($name),
            ::core::format_args!($($arg)*),
        )
    };
}

/// Logs at INFO for the named logger, capturing the call site.
#[macro_export]
macro_rules! log_info {
    ($name:expr, $($arg:tt)*) => {
        $crate::logging::log(
            Some(&$crate::log_location!()),
            $crate::logging::LogSeverity::Info,
            Some($name),
            ::core::format_args!($($arg)*),
        )
    };
}

/// Logs at WARN for the named logger, capturing the call site.
#[macro_export]
macro_rules! log_warn {
    ($name:expr, $($arg:tt)*) => {
        $crate::logging::log(
            Some(&$crate::log_location!()),
            $crate::logging::LogSeverity::Warn,
            Some($name),
            ::core::format_args!($($arg)*),
        )
    };
}

/// Logs at ERROR for the named logger, capturing the call site.
#[macro_export]
macro_rules! log_error {
    ($name:expr, $($arg:tt)*) => {
        $crate::logging::log(
            Some(&$crate::log_location!()),
            $crate::logging::LogSeverity::Error,
            Some($name),
            ::core::format_args!($($arg)*),
        )
    };
}

/// Logs at FATAL for the named logger, capturing the call site.
#[macro_export]
macro_rules! log_fatal {
    ($name:expr, $($arg:tt)*) => {
        $crate::logging::log(
            Some(&$crate::log_location!()),
            $crate::logging::LogSeverity::Fatal,
            Some($name),
            ::core::format_args!($($arg)*),
        )
    };
}
