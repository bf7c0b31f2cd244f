//! Server-assigned identifiers for Airtable resources.
//!
//! Airtable ids are a three-letter kind prefix (`app`, `tbl`, `fld`, `viw`, `rec`) followed by
//! ASCII alphanumerics, e.g. `recA1b2C3d4E5f6G7`. Ids are never minted locally; the checks only
//! catch a value of the wrong kind (a table id passed where a record id belongs) and anything
//! that could not travel as a single URL path segment.

// std
use std::borrow::Borrow;
// self
use crate::_prelude::*;

/// Error returned when a string is not an identifier of the expected kind.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum IdentifierError {
	/// The value does not start with the kind's prefix.
	#[error("{kind} id `{value}` must start with `{prefix}`.")]
	WrongPrefix {
		/// Resource kind (base, table, field, view, record).
		kind: &'static str,
		/// Expected prefix.
		prefix: &'static str,
		/// Offending value.
		value: String,
	},
	/// Nothing but ASCII letters and digits may follow the prefix, and at least one must.
	#[error("{kind} id `{value}` must continue with ASCII letters or digits after the prefix.")]
	MalformedBody {
		/// Resource kind (base, table, field, view, record).
		kind: &'static str,
		/// Offending value.
		value: String,
	},
}

fn check_airtable_id(
	kind: &'static str,
	prefix: &'static str,
	value: &str,
) -> Result<(), IdentifierError> {
	let Some(body) = value.strip_prefix(prefix) else {
		return Err(IdentifierError::WrongPrefix { kind, prefix, value: value.to_owned() });
	};

	if body.is_empty() || !body.bytes().all(|b| b.is_ascii_alphanumeric()) {
		return Err(IdentifierError::MalformedBody { kind, value: value.to_owned() });
	}

	Ok(())
}

macro_rules! airtable_id {
	($(#[$meta:meta])* $name:ident, kind = $kind:literal, prefix = $prefix:literal) => {
		$(#[$meta])*
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Prefix every id of this kind starts with.
			pub const PREFIX: &'static str = $prefix;

			/// Checks `value` and wraps it.
			pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
				Self::try_from(value.into())
			}

			/// Returns the id as sent on the wire.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				check_airtable_id($kind, $prefix, &value)?;

				Ok(Self(value))
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
		impl From<$name> for String {
			fn from(id: $name) -> Self {
				id.0
			}
		}
		impl std::ops::Deref for $name {
			type Target = str;

			fn deref(&self) -> &str {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_tuple(stringify!($name)).field(&self.0).finish()
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
	};
}

airtable_id! {
	/// Base id (`app…`).
	BaseId, kind = "base", prefix = "app"
}
airtable_id! {
	/// Table id (`tbl…`).
	TableId, kind = "table", prefix = "tbl"
}
airtable_id! {
	/// Field id (`fld…`).
	FieldId, kind = "field", prefix = "fld"
}
airtable_id! {
	/// View id (`viw…`).
	ViewId, kind = "view", prefix = "viw"
}
airtable_id! {
	/// Record id (`rec…`).
	RecordId, kind = "record", prefix = "rec"
}
