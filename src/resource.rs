//! Airtable resources (bases, tables, fields, views, records) and the calls made on them.

pub mod base;
pub mod id;
pub mod record;
pub mod table;

pub use base::*;
pub use id::*;
pub use record::*;
pub use table::*;

// self
use crate::_prelude::*;

/// Returns the first item whose name matches `name` exactly.
pub(crate) fn find_by_name<'a, T, I>(
	items: I,
	kind: &'static str,
	name: &str,
	name_of: impl Fn(&T) -> &str,
) -> Result<&'a T>
where
	T: 'a,
	I: IntoIterator<Item = &'a T>,
{
	items
		.into_iter()
		.find(|item| name_of(item) == name)
		.ok_or_else(|| Error::NotFound { kind, name: name.to_owned() })
}

/// Owned variant of [`find_by_name`] for freshly listed collections.
pub(crate) fn take_by_name<T>(
	items: Vec<T>,
	kind: &'static str,
	name: &str,
	name_of: impl Fn(&T) -> &str,
) -> Result<T> {
	items
		.into_iter()
		.find(|item| name_of(item) == name)
		.ok_or_else(|| Error::NotFound { kind, name: name.to_owned() })
}
