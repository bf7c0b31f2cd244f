//! Records and the listing, lookup, and bulk-write calls issued through a [`Table`].
//!
//! Every bulk write is split into requests of at most [`MAX_RECORDS_PER_REQUEST`] records, sent
//! sequentially in input order. Returned records are reassembled in the same order and bound to
//! the table they came from. The first failing chunk aborts the call; earlier chunks are not
//! rolled back.

// self
use crate::{
	_prelude::*,
	client::Query,
	obs::{self, Operation},
	resource::{RecordId, Table, TableRef},
};

/// Upper bound Airtable accepts for a single create/update/delete request.
pub const MAX_RECORDS_PER_REQUEST: usize = 10;

/// One row of field-name-to-value data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
	/// Record identifier; `None` for records not yet created.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<RecordId>,
	/// Creation timestamp assigned by the server.
	#[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
	pub created_time: Option<OffsetDateTime>,
	/// Set on records returned by a delete call.
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub deleted: bool,
	/// Cell values keyed by field name.
	#[serde(default)]
	pub fields: Map<String, Value>,
	#[serde(skip)]
	table: Option<Arc<TableRef>>,
}
impl Record {
	/// Creates an unsaved record from cell values.
	pub fn new(fields: Map<String, Value>) -> Self {
		Self { fields, ..Default::default() }
	}

	/// Creates a record addressing an existing row, for updates and replacements.
	pub fn with_id(id: RecordId, fields: Map<String, Value>) -> Self {
		Self { id: Some(id), fields, ..Default::default() }
	}

	/// Sets a cell value, returning the record for chaining.
	pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
		self.fields.insert(field.into(), value.into());

		self
	}

	/// Returns the value stored under `field`.
	pub fn get(&self, field: &str) -> Option<&Value> {
		self.fields.get(field)
	}

	/// Table this record was fetched from or written to, if any.
	pub fn table(&self) -> Option<&TableRef> {
		self.table.as_deref()
	}

	fn attached(mut self, table: &Arc<TableRef>) -> Self {
		self.table = Some(Arc::clone(table));

		self
	}

	fn primary_value(&self) -> String {
		let value = self
			.table
			.as_ref()
			.and_then(|table| table.primary_field.as_deref())
			.and_then(|name| self.fields.get(name));

		match value {
			Some(Value::String(text)) => text.clone(),
			Some(other) => other.to_string(),
			None => String::new(),
		}
	}
}
impl Display for Record {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match &self.id {
			Some(id) => write!(f, "({} [{id}])", self.primary_value()),
			None => write!(f, "({} [nil])", self.primary_value()),
		}
	}
}

/// Sort direction for [`ListRecordsOptions::sort`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
	/// Ascending (server default).
	#[default]
	Asc,
	/// Descending.
	Desc,
}
impl SortDirection {
	/// Returns the wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			SortDirection::Asc => "asc",
			SortDirection::Desc => "desc",
		}
	}
}

/// Cell rendering requested from the list endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellFormat {
	/// Native JSON values (server default).
	#[default]
	Json,
	/// Values rendered as user-facing strings; requires time zone and locale.
	String,
}
impl CellFormat {
	/// Returns the wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			CellFormat::Json => "json",
			CellFormat::String => "string",
		}
	}
}

/// Query options for [`Table::list_records`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListRecordsOptions {
	/// Only return records visible in this view, in its order.
	pub view: Option<String>,
	/// Only return these fields.
	pub fields: Vec<String>,
	/// Formula a record must satisfy.
	pub filter_by_formula: Option<String>,
	/// Cap on the total number of records returned.
	pub max_records: Option<u32>,
	/// Records per page (the server caps this at 100).
	pub page_size: Option<u32>,
	/// Sort keys applied in order.
	pub sort: Vec<(String, SortDirection)>,
	/// Cell rendering mode.
	pub cell_format: Option<CellFormat>,
	/// Time zone used when `cell_format` is `string`.
	pub time_zone: Option<String>,
	/// Locale used when `cell_format` is `string`.
	pub user_locale: Option<String>,
}
impl ListRecordsOptions {
	/// Restricts the listing to a view.
	pub fn view(mut self, view: impl Into<String>) -> Self {
		self.view = Some(view.into());

		self
	}

	/// Adds a field to the projection.
	pub fn field(mut self, field: impl Into<String>) -> Self {
		self.fields.push(field.into());

		self
	}

	/// Filters records with an Airtable formula.
	pub fn filter_by_formula(mut self, formula: impl Into<String>) -> Self {
		self.filter_by_formula = Some(formula.into());

		self
	}

	/// Caps the total number of records.
	pub fn max_records(mut self, max: u32) -> Self {
		self.max_records = Some(max);

		self
	}

	/// Overrides the page size.
	pub fn page_size(mut self, size: u32) -> Self {
		self.page_size = Some(size);

		self
	}

	/// Appends a sort key.
	pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
		self.sort.push((field.into(), direction));

		self
	}

	/// Requests string-rendered cells in the given time zone and locale.
	pub fn string_cells(mut self, time_zone: impl Into<String>, locale: impl Into<String>) -> Self {
		self.cell_format = Some(CellFormat::String);
		self.time_zone = Some(time_zone.into());
		self.user_locale = Some(locale.into());

		self
	}

	/// Encodes the options as query parameters.
	pub fn to_query(&self) -> Query {
		let mut query = Query::new();

		if let Some(view) = &self.view {
			query.push(("view".into(), view.clone()));
		}
		for field in &self.fields {
			query.push(("fields[]".into(), field.clone()));
		}
		if let Some(formula) = &self.filter_by_formula {
			query.push(("filterByFormula".into(), formula.clone()));
		}
		if let Some(max) = self.max_records {
			query.push(("maxRecords".into(), max.to_string()));
		}
		if let Some(size) = self.page_size {
			query.push(("pageSize".into(), size.to_string()));
		}
		for (idx, (field, direction)) in self.sort.iter().enumerate() {
			query.push((format!("sort[{idx}][field]"), field.clone()));
			query.push((format!("sort[{idx}][direction]"), direction.as_str().into()));
		}
		if let Some(format) = self.cell_format {
			query.push(("cellFormat".into(), format.as_str().into()));
		}
		if let Some(zone) = &self.time_zone {
			query.push(("timeZone".into(), zone.clone()));
		}
		if let Some(locale) = &self.user_locale {
			query.push(("userLocale".into(), locale.clone()));
		}

		query
	}
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WriteRequest<'a> {
	#[serde(skip_serializing_if = "Option::is_none")]
	perform_upsert: Option<PerformUpsert<'a>>,
	records: Vec<RecordWrite<'a>>,
}

#[derive(Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct PerformUpsert<'a> {
	fields_to_merge_on: &'a [&'a str],
}

#[derive(Serialize)]
struct RecordWrite<'a> {
	#[serde(skip_serializing_if = "Option::is_none")]
	id: Option<&'a RecordId>,
	fields: &'a Map<String, Value>,
}

#[derive(Deserialize)]
struct RecordsResponse {
	#[serde(default)]
	records: Vec<Record>,
}

#[derive(Clone, Copy)]
enum WriteMode<'a> {
	Create,
	Update,
	Replace { merge_on: &'a [&'a str] },
}

impl Table {
	/// Lists every record of the table matching `options`, following pagination.
	pub async fn list_records(&self, options: &ListRecordsOptions) -> Result<Vec<Record>> {
		obs::observe(Operation::ListRecords, "list_records", async {
			let reference = self.shared_reference();

			self.client()
				.list_all(&self.records_path(), &options.to_query(), "records", |record: Record| {
					Ok(record.attached(&reference))
				})
				.await
		})
		.await
	}

	/// Fetches a single record by id.
	pub async fn get_record(&self, id: &RecordId) -> Result<Record> {
		obs::observe(Operation::GetRecord, "get_record", async {
			let [base, table] = self.records_path();
			let record: Record = self.client().get(&[base, table, id.as_str()], &[]).await?;

			Ok(record.attached(&self.shared_reference()))
		})
		.await
	}

	/// Creates records; ids on the inputs are ignored.
	pub async fn create_records(&self, records: &[Record]) -> Result<Vec<Record>> {
		obs::observe(Operation::CreateRecords, "create_records", async {
			self.write_records(WriteMode::Create, records).await
		})
		.await
	}

	/// Partially updates existing records; fields absent from an input stay untouched.
	pub async fn update_records(&self, records: &[Record]) -> Result<Vec<Record>> {
		obs::observe(Operation::UpdateRecords, "update_records", async {
			self.write_records(WriteMode::Update, records).await
		})
		.await
	}

	/// Replaces records wholesale, clearing fields absent from an input.
	///
	/// With a non-empty `match_fields`, the server upserts: inputs without an id are matched
	/// against existing rows on those fields, updating matches and creating the rest.
	pub async fn replace_records(
		&self,
		records: &[Record],
		match_fields: &[&str],
	) -> Result<Vec<Record>> {
		obs::observe(Operation::ReplaceRecords, "replace_records", async {
			self.write_records(WriteMode::Replace { merge_on: match_fields }, records).await
		})
		.await
	}

	/// Deletes records by id, returning their ids flagged as deleted.
	pub async fn delete_records(&self, ids: &[RecordId]) -> Result<Vec<Record>> {
		obs::observe(Operation::DeleteRecords, "delete_records", async {
			let reference = self.shared_reference();
			let mut deleted = Vec::with_capacity(ids.len());

			for chunk in ids.chunks(MAX_RECORDS_PER_REQUEST) {
				let response: RecordsResponse =
					self.client().delete(&self.records_path(), chunk).await?;

				deleted.extend(response.records.into_iter().map(|r| r.attached(&reference)));
			}

			Ok(deleted)
		})
		.await
	}

	async fn write_records(&self, mode: WriteMode<'_>, records: &[Record]) -> Result<Vec<Record>> {
		let reference = self.shared_reference();
		let perform_upsert = match mode {
			WriteMode::Replace { merge_on } if !merge_on.is_empty() =>
				Some(PerformUpsert { fields_to_merge_on: merge_on }),
			_ => None,
		};
		let mut written = Vec::with_capacity(records.len());

		for chunk in records.chunks(MAX_RECORDS_PER_REQUEST) {
			let request = WriteRequest {
				perform_upsert,
				records: chunk
					.iter()
					.map(|record| RecordWrite {
						id: match mode {
							WriteMode::Create => None,
							_ => record.id.as_ref(),
						},
						fields: &record.fields,
					})
					.collect(),
			};
			let path = self.records_path();
			let response: RecordsResponse = match mode {
				WriteMode::Create => self.client().post(&path, &request).await?,
				WriteMode::Update => self.client().patch(&path, &request).await?,
				WriteMode::Replace { .. } => self.client().put(&path, &request).await?,
			};

			written.extend(response.records.into_iter().map(|r| r.attached(&reference)));
		}

		Ok(written)
	}
}
