// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Clock reads and fixed-width time renderings for the log pipeline
//!
//! Time points are nanoseconds since the unix epoch (system clock) or since
//! an arbitrary fixed origin (steady clock), carried as `i64`.

use crate::error::{UtilError, UtilResult};
use crate::set_error_msg;

/// A point in time in nanoseconds.
pub type TimePointValue = i64;
/// A duration in nanoseconds.
pub type DurationValue = i64;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Current system (wall-clock) time. Pre-epoch times come back negative.
pub fn system_time_now() -> UtilResult<TimePointValue> {
    use std::time::{SystemTime, UNIX_EPOCH};
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_nanos()).map_err(|_| {
            set_error_msg!("system time overflows a 64-bit nanosecond value");
            UtilError::Error
        }),
        Err(e) => {
            let before = e.duration();
            i64::try_from(before.as_nanos()).map(|n| -n).map_err(|_| {
                set_error_msg!("system time overflows a 64-bit nanosecond value");
                UtilError::Error
            })
        }
    }
}

/// Current steady (monotonic) time; never decreases between calls on the
/// same host.
#[cfg(unix)]
pub fn steady_time_now() -> UtilResult<TimePointValue> {
    let mut ts = libc::timespec { tv_sec: 0, tv_nsec: 0 };
    let rc = unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts) };
    if rc != 0 {
        set_error_msg!("clock_gettime(CLOCK_MONOTONIC) failed");
        return Err(UtilError::Error);
    }
    Ok(ts.tv_sec as i64 * NANOS_PER_SEC as i64 + ts.tv_nsec as i64)
}

#[cfg(not(unix))]
pub fn steady_time_now() -> UtilResult<TimePointValue> {
    use std::sync::OnceLock;
    use std::time::Instant;
    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    let origin = *ORIGIN.get_or_init(Instant::now);
    i64::try_from(origin.elapsed().as_nanos()).map_err(|_| {
        set_error_msg!("steady time overflows a 64-bit nanosecond value");
        UtilError::Error
    })
}

// Formatting cursor over a caller-provided byte buffer; drops bytes that do
// not fit (the renderings below are bounded, truncation only happens with
// deliberately small buffers).
struct SliceWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl SliceWriter<'_> {
    fn push(&mut self, byte: u8) {
        if self.len < self.buf.len() {
            self.buf[self.len] = byte;
            self.len += 1;
        }
    }

    fn push_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.push(b);
        }
    }

    // Zero-padded decimal rendering, `width` digits.
    fn push_padded(&mut self, mut value: u64, width: usize) {
        let mut digits = [0u8; 20];
        let mut n = 0;
        while value != 0 {
            digits[n] = b'0' + (value % 10) as u8;
            value /= 10;
            n += 1;
        }
        for _ in n..width {
            self.push(b'0');
        }
        while n > 0 {
            n -= 1;
            self.push(digits[n]);
        }
    }
}

/// Renders a time point as seconds with a nanosecond fraction:
/// sign, ten zero-padded integral digits, `.`, nine fractional digits.
/// A zero-length buffer is accepted and left untouched.
pub fn time_point_value_as_seconds_string<'a>(
    time_point: &TimePointValue,
    buffer: &'a mut [u8],
) -> UtilResult<&'a str> {
    if buffer.is_empty() {
        return Ok("");
    }
    let abs = time_point.unsigned_abs();
    let mut w = SliceWriter { buf: &mut *buffer, len: 0 };
    if *time_point < 0 {
        w.push_str("-");
    }
    w.push_padded(abs / NANOS_PER_SEC, 10);
    w.push_str(".");
    w.push_padded(abs % NANOS_PER_SEC, 9);
    let len = w.len;
    Ok(core::str::from_utf8(&buffer[..len]).unwrap_or(""))
}

/// Renders a time point as a 19-digit zero-padded nanosecond count with a
/// leading `-` for negative values.
pub fn time_point_value_as_nanoseconds_string<'a>(
    time_point: &TimePointValue,
    buffer: &'a mut [u8],
) -> UtilResult<&'a str> {
    if buffer.is_empty() {
        return Ok("");
    }
    let mut w = SliceWriter { buf: &mut *buffer, len: 0 };
    if *time_point < 0 {
        w.push_str("-");
    }
    w.push_padded(time_point.unsigned_abs(), 19);
    let len = w.len;
    Ok(core::str::from_utf8(&buffer[..len]).unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_rendering_is_fixed_width() {
        let mut buf = [0u8; 32];
        let s = time_point_value_as_seconds_string(&1_000_000_000, &mut buf).unwrap();
        assert_eq!("0000000001.000000000", s);
        let s = time_point_value_as_seconds_string(&1_234_567_890_123_456_789, &mut buf).unwrap();
        assert_eq!("1234567890.123456789", s);
        let s = time_point_value_as_seconds_string(&-1_500_000_000, &mut buf).unwrap();
        assert_eq!("-0000000001.500000000", s);
    }

    #[test]
    fn nanoseconds_rendering_is_fixed_width() {
        let mut buf = [0u8; 32];
        let s = time_point_value_as_nanoseconds_string(&42, &mut buf).unwrap();
        assert_eq!("0000000000000000042", s);
        let s = time_point_value_as_nanoseconds_string(&-42, &mut buf).unwrap();
        assert_eq!("-0000000000000000042", s);
    }

    #[test]
    fn empty_buffer_is_accepted() {
        let mut buf = [0u8; 0];
        assert_eq!("", time_point_value_as_seconds_string(&7, &mut buf).unwrap());
    }

    #[test]
    fn clocks_tick() {
        let a = steady_time_now().unwrap();
        let b = steady_time_now().unwrap();
        assert!(b >= a);
        assert!(system_time_now().unwrap() > 0);
    }
}
