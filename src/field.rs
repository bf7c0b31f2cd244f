//! Conversions between record cell values and Rust types.
//!
//! Airtable reports date-time cells as UTC timestamps with millisecond precision, e.g.
//! `2024-05-01T13:45:00.000Z`.

// crates.io
use time::{
	PrimitiveDateTime, UtcOffset, format_description::BorrowedFormatItem,
	macros::format_description,
};
// self
use crate::_prelude::*;

const DATE_TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
	"[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
);

/// Reads a date-time cell.
///
/// Fails with [`Error::NotDateTime`] when the cell is not a string and with
/// [`Error::InvalidDateTime`] when the string does not follow the cell format.
pub fn to_date_time(value: &Value) -> Result<OffsetDateTime> {
	let Value::String(text) = value else {
		return Err(Error::NotDateTime);
	};

	Ok(PrimitiveDateTime::parse(text, DATE_TIME_FORMAT)?.assume_utc())
}

/// Renders a date-time cell, normalizing to UTC and truncating to milliseconds.
///
/// Returns `null` when the UTC conversion falls outside the supported date range.
pub fn from_date_time(value: OffsetDateTime) -> Value {
	value
		.checked_to_offset(UtcOffset::UTC)
		.and_then(|utc| utc.format(DATE_TIME_FORMAT).ok())
		.map_or(Value::Null, Value::String)
}
