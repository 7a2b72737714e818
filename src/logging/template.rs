// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: One-time compilation of the console output format template
//!
//! The template is scanned once at initialisation into a flat list of
//! parts: literal copy-ranges (byte offsets into the owned template) and
//! token expanders. Log calls replay the list; the template itself is never
//! re-parsed.

use crate::error::{self, UtilResult};
use crate::set_error_msg;
use crate::time;
use crate::types::{ArrayList, CharArray};

use super::{LogLocation, LogSeverity};

/// Upper bound on compiled parts; parsing stops (with an error set) when a
/// template would produce more, keeping the parts compiled so far.
pub(crate) const MAX_MSG_PARTS: usize = 1024;

/// Everything a token expansion may draw from.
pub(crate) struct LogContext<'a> {
    pub name: &'a str,
    pub location: Option<&'a LogLocation>,
    pub severity: LogSeverity,
    pub timestamp: time::TimePointValue,
    pub msg: &'a str,
    pub template: &'a str,
}

/// A compiled template part: either a copy-range over the template (the
/// offsets) or a token expander (offsets zero).
pub(crate) type TokenHandlerFn =
    fn(&LogContext<'_>, &mut CharArray, usize, usize) -> UtilResult<()>;

#[derive(Clone, Copy)]
pub(crate) struct MsgPart {
    pub handler: TokenHandlerFn,
    pub start_offset: usize,
    pub end_offset: usize,
}

// Append helper shared by the expanders: a failed append is reported to
// stderr and the error state cleared, the way the sink must never leave an
// error behind for the caller's own error handling.
fn append(out: &mut CharArray, text: &str) -> UtilResult<()> {
    out.strcat(text).map_err(|e| {
        eprintln!("{}", error::get_error_string());
        error::reset_error();
        e
    })
}

fn copy_from_template(
    ctx: &LogContext<'_>,
    out: &mut CharArray,
    start_offset: usize,
    end_offset: usize,
) -> UtilResult<()> {
    let range = &ctx.template[start_offset..end_offset];
    out.strncat(range, range.len()).map_err(|e| {
        eprintln!("{}", error::get_error_string());
        error::reset_error();
        e
    })
}

fn expand_severity(
    ctx: &LogContext<'_>,
    out: &mut CharArray,
    _start: usize,
    _end: usize,
) -> UtilResult<()> {
    append(out, ctx.severity.label())
}

fn expand_name(
    ctx: &LogContext<'_>,
    out: &mut CharArray,
    _start: usize,
    _end: usize,
) -> UtilResult<()> {
    append(out, ctx.name)
}

fn expand_message(
    ctx: &LogContext<'_>,
    out: &mut CharArray,
    _start: usize,
    _end: usize,
) -> UtilResult<()> {
    append(out, ctx.msg)
}

fn expand_function_name(
    ctx: &LogContext<'_>,
    out: &mut CharArray,
    _start: usize,
    _end: usize,
) -> UtilResult<()> {
    match ctx.location {
        Some(location) => append(out, location.function_name),
        None => Ok(()),
    }
}

fn expand_file_name(
    ctx: &LogContext<'_>,
    out: &mut CharArray,
    _start: usize,
    _end: usize,
) -> UtilResult<()> {
    match ctx.location {
        Some(location) => append(out, location.file_name),
        None => Ok(()),
    }
}

fn expand_line_number(
    ctx: &LogContext<'_>,
    out: &mut CharArray,
    _start: usize,
    _end: usize,
) -> UtilResult<()> {
    if let Some(location) = ctx.location {
        // Nine digits at most; larger line numbers are truncated.
        let digits = location.line_number.to_string();
        let clipped = &digits[..digits.len().min(9)];
        append(out, clipped)?;
    }
    Ok(())
}

fn expand_time_as_seconds(
    ctx: &LogContext<'_>,
    out: &mut CharArray,
    _start: usize,
    _end: usize,
) -> UtilResult<()> {
    let mut storage = [0u8; 32];
    let rendered = time::time_point_value_as_seconds_string(&ctx.timestamp, &mut storage)
        .map_err(|e| {
            eprintln!("{}", error::get_error_string());
            error::reset_error();
            e
        })?;
    append(out, rendered)
}

fn expand_time_as_nanoseconds(
    ctx: &LogContext<'_>,
    out: &mut CharArray,
    _start: usize,
    _end: usize,
) -> UtilResult<()> {
    let mut storage = [0u8; 32];
    let rendered = time::time_point_value_as_nanoseconds_string(&ctx.timestamp, &mut storage)
        .map_err(|e| {
            eprintln!("{}", error::get_error_string());
            error::reset_error();
            e
        })?;
    append(out, rendered)
}

const TOKENS: &[(&str, TokenHandlerFn)] = &[
    ("severity", expand_severity),
    ("name", expand_name),
    ("message", expand_message),
    ("function_name", expand_function_name),
    ("file_name", expand_file_name),
    ("line_number", expand_line_number),
    ("time", expand_time_as_seconds),
    ("time_as_nanoseconds", expand_time_as_nanoseconds),
];

fn find_token_handler(token: &str) -> Option<TokenHandlerFn> {
    TOKENS.iter().find(|(name, _)| *name == token).map(|(_, handler)| *handler)
}

fn add_part(
    parts: &mut ArrayList<MsgPart>,
    handler: TokenHandlerFn,
    start_offset: usize,
    end_offset: usize,
) -> bool {
    let size = parts.size().unwrap_or(MAX_MSG_PARTS);
    if size >= MAX_MSG_PARTS {
        set_error_msg!("too many substitutions in the logging output format string; truncating");
        return false;
    }
    parts.add(MsgPart { handler, start_offset, end_offset }).is_ok()
}

/// Scans `template` and fills `parts`. Contiguous non-token runs become
/// copy-ranges; recognised `{token}` sequences become expanders. A `{` with
/// no closing `}` is copied literally, as is the `{` of an unrecognised
/// token (scanning then resumes one byte later).
pub(crate) fn parse_and_create_handlers(template: &str, parts: &mut ArrayList<MsgPart>) {
    let size = template.len();
    let mut i = 0;
    while i < size {
        let rest = &template[i..];
        match rest.find('{') {
            Some(0) => {}
            Some(d) => {
                if !add_part(parts, copy_from_template, i, i + d) {
                    return;
                }
                i += d;
                continue;
            }
            None => {
                let _ = add_part(parts, copy_from_template, i, size);
                return;
            }
        }

        let Some(end_delim) = rest.find('}') else {
            // No end delimiter in the remainder; there cannot be any more
            // tokens, so copy everything left.
            let _ = add_part(parts, copy_from_template, i, size);
            return;
        };

        let token = &rest[1..end_delim];
        match find_token_handler(token) {
            Some(handler) => {
                if !add_part(parts, handler, 0, 0) {
                    return;
                }
                i += end_delim + 1;
            }
            None => {
                // Not a token: emit the delimiter and keep searching, the
                // substring may hold more start delimiters.
                if !add_part(parts, copy_from_template, i, i + 1) {
                    return;
                }
                i += 1;
            }
        }
    }
}

/// Replays the compiled parts into `out`.
pub(crate) fn run_parts(
    parts: &ArrayList<MsgPart>,
    ctx: &LogContext<'_>,
    out: &mut CharArray,
) -> UtilResult<()> {
    let count = parts.size()?;
    for i in 0..count {
        let part = parts.get(i)?;
        (part.handler)(ctx, out, part.start_offset, part.end_offset)?;
    }
    Ok(())
}
