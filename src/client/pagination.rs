//! Offset-driven listing shared by every paginated endpoint.

// self
use crate::{_prelude::*, client::Client};

const OFFSET_PARAM: &str = "offset";

impl Client {
	/// Fetches every page of `path` and returns the accumulated items in server order.
	///
	/// Each page is a JSON object; the array stored under `key` is decoded into `T` and every
	/// item is passed through `attach` (which typically wires parent references) before it is
	/// appended. Listing continues while the page carries an `offset` cursor and stops at the
	/// first page without one. The whole result is buffered in memory.
	pub(crate) async fn list_all<T, U, F>(
		&self,
		path: &[&str],
		query: &[(String, String)],
		key: &str,
		mut attach: F,
	) -> Result<Vec<U>>
	where
		T: DeserializeOwned,
		F: FnMut(T) -> Result<U>,
	{
		let mut items = Vec::new();
		let mut query = query.to_vec();

		loop {
			let mut page = self.get::<Map<String, Value>>(path, &query).await?;
			let batch = match page.remove(key) {
				None | Some(Value::Null) => Vec::new(),
				Some(value) => self.decode_page_value::<Vec<T>>(path, &query, value)?,
			};

			for item in batch {
				items.push(attach(item)?);
			}

			let offset = match page.remove(OFFSET_PARAM) {
				None | Some(Value::Null) => return Ok(items),
				Some(value) => self.decode_page_value::<String>(path, &query, value)?,
			};

			query.retain(|(name, _)| name != OFFSET_PARAM);
			query.push((OFFSET_PARAM.to_owned(), offset));
		}
	}

	fn decode_page_value<T>(
		&self,
		path: &[&str],
		query: &[(String, String)],
		value: Value,
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		serde_path_to_error::deserialize(value).map_err(|source| {
			let url = self
				.build_url(path, query)
				.map(String::from)
				.unwrap_or_else(|_| path.join("/"));

			Error::Decode { url, source }
		})
	}
}
