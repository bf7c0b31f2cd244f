//! Table schemas (fields and views) and the handles used to reach their records.

// self
use crate::{
	_prelude::*,
	client::Client,
	resource::{self, Base, BaseId, FieldId, TableId, ViewId},
};

/// Column definition of a table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
	/// Field identifier.
	pub id: FieldId,
	/// Field type tag (e.g. `singleLineText`, `multipleRecordLinks`).
	#[serde(rename = "type")]
	pub kind: String,
	/// Display name; record cells are keyed by it.
	pub name: String,
	/// Optional description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Type-specific options as returned by the API.
	#[serde(default, skip_serializing_if = "Map::is_empty")]
	pub options: Map<String, Value>,
}

/// Saved view of a table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
	/// View identifier.
	pub id: ViewId,
	/// View type tag (e.g. `grid`, `kanban`).
	#[serde(rename = "type")]
	pub kind: String,
	/// Display name.
	pub name: String,
}

/// Location of a table plus the bits a record needs to describe itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TableRef {
	/// Parent base identifier.
	pub base_id: BaseId,
	/// Table identifier.
	pub table_id: TableId,
	/// Table display name.
	pub table_name: String,
	/// Name of the primary field, when the schema declares one.
	pub primary_field: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TablePayload {
	id: TableId,
	name: String,
	#[serde(default)]
	description: Option<String>,
	#[serde(default)]
	primary_field_id: Option<FieldId>,
	#[serde(default)]
	fields: Vec<Field>,
	#[serde(default)]
	views: Vec<View>,
}

/// Table listed through the metadata API, bound to its parent base.
#[derive(Clone, Debug)]
pub struct Table {
	/// Table identifier.
	pub id: TableId,
	/// Display name.
	pub name: String,
	/// Optional description.
	pub description: Option<String>,
	/// Identifier of the primary field.
	pub primary_field_id: Option<FieldId>,
	/// Fields in schema order.
	pub fields: Vec<Field>,
	/// Views in schema order.
	pub views: Vec<View>,
	base: Arc<Base>,
	reference: Arc<TableRef>,
}
impl Table {
	pub(crate) fn attach(base: &Arc<Base>, payload: TablePayload) -> Self {
		let primary_field = find_primary(&payload.fields, payload.primary_field_id.as_ref())
			.map(|field| field.name.clone());
		let reference = Arc::new(TableRef {
			base_id: base.id.clone(),
			table_id: payload.id.clone(),
			table_name: payload.name.clone(),
			primary_field,
		});

		Self {
			id: payload.id,
			name: payload.name,
			description: payload.description,
			primary_field_id: payload.primary_field_id,
			fields: payload.fields,
			views: payload.views,
			base: Arc::clone(base),
			reference,
		}
	}

	/// Parent base.
	pub fn base(&self) -> &Base {
		&self.base
	}

	/// Location shared with every record fetched through this table.
	pub fn reference(&self) -> &TableRef {
		&self.reference
	}

	pub(crate) fn shared_reference(&self) -> Arc<TableRef> {
		Arc::clone(&self.reference)
	}

	pub(crate) fn client(&self) -> &Client {
		self.base.client()
	}

	pub(crate) fn records_path(&self) -> [&str; 2] {
		[self.base.id.as_str(), self.id.as_str()]
	}

	/// Primary field, falling back to the first field when no primary id is declared.
	pub fn primary_field(&self) -> Option<&Field> {
		find_primary(&self.fields, self.primary_field_id.as_ref())
	}

	/// Returns the first field named exactly `name`.
	pub fn field_by_name(&self, name: &str) -> Result<&Field> {
		resource::find_by_name(&self.fields, "field", name, |field: &Field| field.name.as_str())
	}

	/// Returns the first view named exactly `name`.
	pub fn view_by_name(&self, name: &str) -> Result<&View> {
		resource::find_by_name(&self.views, "view", name, |view: &View| view.name.as_str())
	}
}
impl Display for Table {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}.{}", self.base, self.name)
	}
}

fn find_primary<'a>(fields: &'a [Field], primary_id: Option<&FieldId>) -> Option<&'a Field> {
	match primary_id {
		Some(id) => fields.iter().find(|field| &field.id == id),
		None => fields.first(),
	}
}
