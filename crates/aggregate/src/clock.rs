//! 12-hour clock token parsing.
//!
//! Single source of truth for the 12-to-24 hour conversion; used both when
//! constructing search criteria and when parsing each record's delivery
//! window.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::FormatError;

static HOUR12_LAYOUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(1[0-2]|0?[1-9])(AM|PM)$").expect("static hour layout"));

/// Parse a 12-hour token (`"1PM"`, `"12AM"`) into an hour-of-day on the 0-23
/// scale.
///
/// Hour 12 maps to 0 before the PM offset is applied, so `"12AM"` is 0 and
/// `"12PM"` is 12. Anything outside the `1-12` + `AM`/`PM` layout fails,
/// never coerces.
pub fn parse_hour12(token: &str) -> Result<u8, FormatError> {
    let caps = HOUR12_LAYOUT
        .captures(token)
        .ok_or_else(|| FormatError::BadClockToken {
            token: token.to_string(),
        })?;

    to_hour24(&caps[1], &caps[2])
}

/// Convert already-captured digits and meridiem into a 0-23 hour.
pub(crate) fn to_hour24(digits: &str, meridiem: &str) -> Result<u8, FormatError> {
    let mut hour: u8 = digits.parse().map_err(|_| FormatError::BadClockToken {
        token: format!("{digits}{meridiem}"),
    })?;

    if hour == 12 {
        hour = 0;
    }

    if meridiem == "PM" {
        hour += 12;
    }

    Ok(hour)
}
