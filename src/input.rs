// ⌨️ Input Formats - the desk's textual wire formats
//
// Identifiers: 11 digits, optionally punctuated as ###.###.###-##
// Dates:       DD/MM/YYYY
// Clock times: HHMM

use chrono::{NaiveDate, NaiveTime};

use crate::error::DeskError;

pub const DATE_FORMAT: &str = "%d/%m/%Y";
pub const CLOCK_FORMAT: &str = "%H:%M";

// ============================================================================
// IDENTIFIERS
// ============================================================================

/// Normalize a patient identifier into `###.###.###-##`.
///
/// Accepts the bare 11 digits, the fully punctuated form, or any mix where
/// each separator is present or absent. Anything else is rejected.
pub fn normalize_identifier(raw: &str) -> Result<String, DeskError> {
    let raw = raw.trim();
    let bytes = raw.as_bytes();
    let mut digits = String::with_capacity(11);
    let mut pos = 0;

    // (group length, separator that may follow it)
    let groups: [(usize, Option<u8>); 4] = [(3, Some(b'.')), (3, Some(b'.')), (3, Some(b'-')), (2, None)];

    for (len, separator) in groups {
        let group = bytes
            .get(pos..pos + len)
            .ok_or(DeskError::InvalidIdentifierFormat)?;
        if !group.iter().all(u8::is_ascii_digit) {
            return Err(DeskError::InvalidIdentifierFormat);
        }
        digits.push_str(&raw[pos..pos + len]);
        pos += len;

        if let Some(sep) = separator {
            if bytes.get(pos) == Some(&sep) {
                pos += 1;
            }
        }
    }

    if pos != bytes.len() {
        return Err(DeskError::InvalidIdentifierFormat);
    }

    Ok(format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    ))
}

// ============================================================================
// DATES
// ============================================================================

/// Parse a strict `DD/MM/YYYY` calendar date
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let shape_ok = raw.len() == 10
        && raw.bytes().enumerate().all(|(i, b)| match i {
            2 | 5 => b == b'/',
            _ => b.is_ascii_digit(),
        });

    if !shape_ok {
        return None;
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// ============================================================================
// CLOCK TIMES
// ============================================================================

/// True when the text is exactly four ASCII digits
pub fn is_clock_shaped(raw: &str) -> bool {
    raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit())
}

/// Parse an `HHMM` clock time into a time of day
pub fn parse_clock(raw: &str) -> Option<NaiveTime> {
    if !is_clock_shaped(raw) {
        return None;
    }

    let hours: u32 = raw[0..2].parse().ok()?;
    let minutes: u32 = raw[2..4].parse().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

pub fn format_clock(time: NaiveTime) -> String {
    time.format(CLOCK_FORMAT).to_string()
}

// ============================================================================
// TESTS
// ============================================================================
