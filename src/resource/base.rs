//! Bases (workspaces) and the metadata calls that enumerate them.

// self
use crate::{
	_prelude::*,
	client::Client,
	obs::{self, Operation},
	resource::{self, BaseId, Table},
};

/// Access level the API key holds on a base.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PermissionLevel {
	/// No access.
	None,
	/// Read-only access.
	Read,
	/// Read and comment.
	Comment,
	/// Edit records.
	Edit,
	/// Full creator access.
	Create,
	/// Level not known to this crate, preserved verbatim.
	Other(String),
}
impl PermissionLevel {
	/// Returns the wire label.
	pub fn as_str(&self) -> &str {
		match self {
			PermissionLevel::None => "none",
			PermissionLevel::Read => "read",
			PermissionLevel::Comment => "comment",
			PermissionLevel::Edit => "edit",
			PermissionLevel::Create => "create",
			PermissionLevel::Other(value) => value,
		}
	}
}
impl From<String> for PermissionLevel {
	fn from(value: String) -> Self {
		match value.as_str() {
			"none" => PermissionLevel::None,
			"read" => PermissionLevel::Read,
			"comment" => PermissionLevel::Comment,
			"edit" => PermissionLevel::Edit,
			"create" => PermissionLevel::Create,
			_ => PermissionLevel::Other(value),
		}
	}
}
impl From<PermissionLevel> for String {
	fn from(value: PermissionLevel) -> Self {
		match value {
			PermissionLevel::Other(value) => value,
			known => known.as_str().to_owned(),
		}
	}
}
impl Display for PermissionLevel {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BasePayload {
	id: BaseId,
	name: String,
	permission_level: Option<PermissionLevel>,
}

/// Base listed through the metadata API, bound to the client that fetched it.
#[derive(Clone, Debug)]
pub struct Base {
	/// Base identifier.
	pub id: BaseId,
	/// Display name.
	pub name: String,
	/// Access level of the API key, when reported.
	pub permission_level: Option<PermissionLevel>,
	client: Client,
}
impl Base {
	fn attach(client: &Client, payload: BasePayload) -> Self {
		Self {
			id: payload.id,
			name: payload.name,
			permission_level: payload.permission_level,
			client: client.clone(),
		}
	}

	/// Client used for calls issued through this base.
	pub fn client(&self) -> &Client {
		&self.client
	}

	/// Lists every table of the base with its fields and views.
	pub async fn list_tables(&self) -> Result<Vec<Table>> {
		obs::observe(Operation::ListTables, "list_tables", async {
			let parent = Arc::new(self.clone());
			let path = ["meta", "bases", self.id.as_str(), "tables"];

			self.client
				.list_all(&path, &[], "tables", |payload| Ok(Table::attach(&parent, payload)))
				.await
		})
		.await
	}

	/// Returns the first table named exactly `name`.
	pub async fn table_by_name(&self, name: &str) -> Result<Table> {
		let tables = self.list_tables().await?;

		resource::take_by_name(tables, "table", name, |table| table.name.as_str())
	}
}
impl Display for Base {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.name)
	}
}

impl Client {
	/// Lists every base the API key can access.
	pub async fn list_bases(&self) -> Result<Vec<Base>> {
		obs::observe(Operation::ListBases, "list_bases", async {
			self.list_all(&["meta", "bases"], &[], "bases", |payload| {
				Ok(Base::attach(self, payload))
			})
			.await
		})
		.await
	}

	/// Returns the first base named exactly `name`.
	pub async fn base_by_name(&self, name: &str) -> Result<Base> {
		let bases = self.list_bases().await?;

		resource::take_by_name(bases, "base", name, |base| base.name.as_str())
	}
}
