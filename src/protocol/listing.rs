//! Raw `LIST` line parsing.
//!
//! Listing text is free-form: summary lines such as `total 12` and anything
//! else that does not fit the active [`Dialect`] are skipped, never reported
//! as errors.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};

use super::Dialect;
use crate::file::{EntryKind, FileEntry};

const WINDOWS_DIR_MARKER: &str = "<DIR>";

/// Parses one raw listing line. Returns `None` for lines that are not entries.
///
/// Unix listings omit the year for recent files, the current year is assumed.
#[must_use]
pub fn parse(line: &str, dialect: Dialect) -> Option<FileEntry> {
    parse_in_year(line, dialect, Utc::now().year())
}

pub(crate) fn parse_in_year(line: &str, dialect: Dialect, year: i32) -> Option<FileEntry> {
    let line = line.trim_start().trim_end_matches(['\r', '\n']);
    let entry = match dialect {
        Dialect::Windows => parse_windows(line),
        Dialect::Unix => parse_unix(line, year),
    };

    if entry.is_none() {
        trace!("skipping listing line {:?}", line);
    }

    entry
}

/// Splits `count` whitespace-separated fields off the front of `line` and
/// returns them with the remainder, which is never split further.
fn split_fields(line: &str, count: usize) -> Option<(Vec<&str>, &str)> {
    let mut fields = Vec::with_capacity(count);
    let mut rest = line;

    for _ in 0..count {
        let end = rest.find(char::is_whitespace)?;
        fields.push(&rest[..end]);
        rest = rest[end..].trim_start();
    }

    if rest.is_empty() {
        return None;
    }

    Some((fields, rest))
}

fn two_digits(value: &str) -> Option<u32> {
    if value.len() == 2 && value.bytes().all(|b| b.is_ascii_digit()) {
        value.parse().ok()
    } else {
        None
    }
}

fn parse_windows(line: &str) -> Option<FileEntry> {
    let (fields, name) = split_fields(line, 3)?;

    let mut date = fields[0].split('-');
    let month = two_digits(date.next()?)?;
    let day = two_digits(date.next()?)?;
    let year = two_digits(date.next()?)?;
    if date.next().is_some() {
        return None;
    }
    let year = if year < 70 { 2000 + year } else { 1900 + year };

    let (clock, pm) = if let Some(clock) = fields[1].strip_suffix("PM") {
        (clock, true)
    } else {
        (fields[1].strip_suffix("AM")?, false)
    };
    let (hour, minute) = clock.split_once(':')?;
    let mut hour = two_digits(hour)?;
    let minute = two_digits(minute)?;
    // 12AM stays hour 12
    if pm && hour != 12 {
        hour += 12;
    }

    let (kind, size) = match fields[2] {
        WINDOWS_DIR_MARKER => (EntryKind::Directory, 0),
        digits if digits.bytes().all(|b| b.is_ascii_digit()) => {
            (EntryKind::File, digits.parse::<u64>().ok()?)
        }
        _ => return None,
    };

    let modified = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)?
        .and_hms_opt(hour, minute, 0)?;

    Some(FileEntry::new(
        name,
        kind,
        size,
        Utc.from_utc_datetime(&modified),
    ))
}

fn parse_unix(line: &str, year: i32) -> Option<FileEntry> {
    let (fields, name) = split_fields(line, 8)?;

    let kind = match fields[0].chars().next() {
        Some('d') => EntryKind::Directory,
        Some('l') => EntryKind::SymbolicLink,
        _ => EntryKind::File,
    };
    let size = fields[4].parse::<u64>().unwrap_or_default();
    let modified = parse_unix_time(fields[5], fields[6], fields[7], year)
        .unwrap_or_else(FileEntry::unknown_time);

    Some(FileEntry::new(name, kind, size, modified))
}

/// `Feb 16 13:54` in `year`, or `Feb 16 2021` at midnight.
fn parse_unix_time(month: &str, day: &str, time_or_year: &str, year: i32) -> Option<DateTime<Utc>> {
    let (year, time) = if time_or_year.contains(':') {
        (year, time_or_year)
    } else if time_or_year.len() == 4 {
        (time_or_year.parse().ok()?, "00:00")
    } else {
        return None;
    };

    let modified =
        NaiveDateTime::parse_from_str(&format!("{year} {month} {day} {time}"), "%Y %b %d %H:%M")
            .ok()?;

    Some(Utc.from_utc_datetime(&modified))
}
