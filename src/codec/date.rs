//! Date literal codec.
//!
//! The service encodes timestamps as `/Date(<epoch-ms>[±HHMM])/`, for
//! example `/Date(1681689600000+0000)/`.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::{Error, Result};

/// Decode a date literal into a timestamp carrying its UTC offset.
///
/// The first run of digit and sign characters is taken as the payload. A
/// sign after the first character starts a four digit `HHMM` offset; without
/// one the timestamp is UTC.
///
/// # Example
///
/// ```
/// use dsws_client::codec::decode_date_literal;
///
/// let date = decode_date_literal("/Date(1681689600000+0000)/").unwrap();
/// assert_eq!(date.to_rfc3339(), "2023-04-17T00:00:00+00:00");
/// ```
///
/// # Errors
///
/// Returns [`Error::Decode`] naming the literal when no timestamp can be
/// found or the offset is malformed.
pub fn decode_date_literal(literal: &str) -> Result<DateTime<FixedOffset>> {
    let payload = timestamp_run(literal)
        .ok_or_else(|| Error::decode("date", literal, "no timestamp found"))?;

    if payload.starts_with('+') {
        return Err(Error::decode(
            "date",
            literal,
            "timestamp must start with a digit or '-'",
        ));
    }

    // a leading '-' belongs to the epoch, any later sign starts the offset
    let split_at = payload
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '+' || *c == '-')
        .map(|(idx, _)| idx);

    let (millis, offset) = match split_at {
        Some(idx) => payload.split_at(idx),
        None => (payload, ""),
    };

    let millis: i64 = millis
        .parse()
        .map_err(|e| Error::decode("date", literal, e))?;

    let offset = if offset.is_empty() {
        Utc.fix()
    } else {
        parse_offset(offset).ok_or_else(|| Error::decode("date", literal, "invalid UTC offset"))?
    };

    let utc = DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| Error::decode("date", literal, "timestamp out of range"))?;

    Ok(utc.with_timezone(&offset))
}

/// Encode a timestamp as a date literal, keeping its offset.
///
/// This is the inverse of [`decode_date_literal`].
pub fn encode_date_literal(date: &DateTime<FixedOffset>) -> String {
    let offset_secs = date.offset().local_minus_utc();
    let sign = if offset_secs < 0 { '-' } else { '+' };
    let offset_mins = offset_secs.abs() / 60;
    format!(
        "/Date({}{}{:02}{:02})/",
        date.timestamp_millis(),
        sign,
        offset_mins / 60,
        offset_mins % 60
    )
}

fn timestamp_run(literal: &str) -> Option<&str> {
    let is_payload = |c: char| c.is_ascii_digit() || c == '+' || c == '-';
    let start = literal.find(is_payload)?;
    let rest = &literal[start..];
    let end = rest.find(|c: char| !is_payload(c)).unwrap_or(rest.len());
    let run = &rest[..end];
    run.chars().any(|c| c.is_ascii_digit()).then_some(run)
}

fn parse_offset(offset: &str) -> Option<FixedOffset> {
    let (sign, digits) = offset.split_at(1);
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    let secs = hours * 3600 + minutes * 60;
    match sign {
        "+" => FixedOffset::east_opt(secs),
        "-" => FixedOffset::west_opt(secs),
        _ => None,
    }
}
