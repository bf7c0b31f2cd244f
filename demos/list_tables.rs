//! Lists the tables of a base by name and prints each table's fields and views, against a
//! local mock of the metadata API.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use airtable_client::{Client, ClientConfig, http::ReqwestHttpClient};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let bases_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v0/meta/bases");
			then.status(200).json_body(json!({
				"bases": [{ "id": "appDemo", "name": "Demo", "permissionLevel": "create" }]
			}));
		})
		.await;
	let tables_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v0/meta/bases/appDemo/tables");
			then.status(200).json_body(json!({
				"tables": [{
					"id": "tblBooks",
					"name": "Books",
					"primaryFieldId": "fldTitle",
					"fields": [
						{ "id": "fldTitle", "type": "singleLineText", "name": "Title" },
						{ "id": "fldRead", "type": "checkbox", "name": "Read" }
					],
					"views": [{ "id": "viwShelf", "type": "grid", "name": "Shelf" }]
				}]
			}));
		})
		.await;
	let config = ClientConfig::builder("demo-token")
		.base_url(Url::parse(&server.url("/v0"))?)
		.build()?;
	let client = Client::with_http_client(config, ReqwestHttpClient::new()?);
	let base = client.base_by_name("Demo").await?;

	for table in base.list_tables().await? {
		println!("{table} ({})", table.id);

		for field in &table.fields {
			println!("  field {} [{}]", field.name, field.kind);
		}
		for view in &table.views {
			println!("  view {} [{}]", view.name, view.kind);
		}
	}

	bases_mock.assert_async().await;
	tables_mock.assert_async().await;

	Ok(())
}
