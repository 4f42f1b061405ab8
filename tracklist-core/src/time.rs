//! Packed date/time decoding and live-set offsets
//!
//! Traktor stores when a history entry started playing as two integers in
//! EXTENDEDDATA:
//! - STARTDATE: year in the high 16 bits, then month and day one byte each
//! - STARTTIME: seconds since midnight
//!
//! Offsets are the elapsed time from the first track of a playlist and are
//! rendered as MM:SS, or HH:MM:SS when the set runs past the hour.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::archive::PlaylistTrack;

const SECONDS_PER_HOUR: i64 = 3600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Calendar date decoded from a packed STARTDATE value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayedDate {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

impl PlayedDate {
    /// Decode `year << 16 | month << 8 | day`
    pub fn from_packed(value: u32) -> Self {
        Self {
            year: value >> 16,
            month: (value >> 8) % 256,
            day: value % 256,
        }
    }

    /// Inverse of [`PlayedDate::from_packed`]
    pub fn to_packed(&self) -> u32 {
        (self.year << 16) | ((self.month & 0xFF) << 8) | (self.day & 0xFF)
    }
}

/// Wall-clock time decoded from a STARTTIME value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayedTime {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl PlayedTime {
    pub fn from_seconds(value: u32) -> Self {
        Self {
            hours: value / 3600,
            minutes: (value % 3600) / 60,
            seconds: value % 60,
        }
    }

    pub fn total_seconds(&self) -> u32 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }
}

/// Combine a decoded date and time into one instant.
///
/// Returns `None` when the date is not a real calendar day (a missing
/// STARTDATE decodes to year 0, month 0).
pub fn start_instant(date: PlayedDate, time: PlayedTime) -> Option<NaiveDateTime> {
    let year = i32::try_from(date.year).ok()?;
    let day = NaiveDate::from_ymd_opt(year, date.month, date.day)?;
    day.and_time(NaiveTime::from_hms_opt(0, 0, 0)?)
        .checked_add_signed(Duration::seconds(i64::from(time.total_seconds())))
}

/// Render elapsed seconds as `HH:MM:SS` or `MM:SS`
pub fn format_offset(seconds: i64, with_hours: bool) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let seconds = seconds.abs();
    let hh = seconds / SECONDS_PER_HOUR;
    let mm = (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let ss = seconds % SECONDS_PER_MINUTE;

    if with_hours {
        format!("{}{:02}:{:02}:{:02}", sign, hh, mm, ss)
    } else {
        format!("{}{:02}:{:02}", sign, mm, ss)
    }
}

/// Recompute every track's offset relative to the first track.
///
/// Unless both the first and the last track carry a start instant, every
/// offset is cleared. Whether hours are rendered is decided once, from the
/// last track, so every offset in the playlist shares the same shape.
pub fn compute_offsets(tracks: &mut [PlaylistTrack]) {
    let bounds = tracks
        .first()
        .and_then(|first| first.start_instant)
        .zip(tracks.last().and_then(|last| last.start_instant));
    let Some((start, end)) = bounds else {
        for track in tracks.iter_mut() {
            track.time_offset_seconds = None;
            track.time_offset_string = None;
        }
        return;
    };

    let span = (end - start).num_seconds();
    let with_hours = span / SECONDS_PER_HOUR > 0;

    for track in tracks.iter_mut() {
        match track.start_instant {
            Some(instant) => {
                let offset = (instant - start).num_seconds();
                track.time_offset_seconds = Some(offset);
                track.time_offset_string = Some(format_offset(offset, with_hours));
            }
            None => {
                track.time_offset_seconds = None;
                track.time_offset_string = None;
            }
        }
    }
}
