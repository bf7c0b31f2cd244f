//! Upserts records keyed on a merge field, then reads a date-time cell back, against a local
//! mock of the records API.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use airtable_client::{
	Client, ClientConfig,
	field::{from_date_time, to_date_time},
	http::ReqwestHttpClient,
	resource::Record,
	serde_json::Map,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v0/meta/bases");
			then.status(200).json_body(json!({
				"bases": [{ "id": "appDemo", "name": "Demo" }]
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v0/meta/bases/appDemo/tables");
			then.status(200).json_body(json!({
				"tables": [{
					"id": "tblPeople",
					"name": "People",
					"fields": [
						{ "id": "fldEmail", "type": "email", "name": "Email" },
						{ "id": "fldSeen", "type": "dateTime", "name": "Last seen" }
					]
				}]
			}));
		})
		.await;

	let upsert_mock = server
		.mock_async(|when, then| {
			when.method(PUT).path("/v0/appDemo/tblPeople");
			then.status(200).json_body(json!({
				"records": [{
					"id": "recAda",
					"createdTime": "2024-03-01T09:30:00.000Z",
					"fields": {
						"Email": "ada@example.com",
						"Last seen": "2024-03-01T09:30:00.000Z"
					}
				}]
			}));
		})
		.await;
	let config = ClientConfig::builder("demo-token")
		.base_url(Url::parse(&server.url("/v0"))?)
		.rate_limit(5)
		.build()?;
	let client = Client::with_http_client(config, ReqwestHttpClient::new()?);
	let table = client.base_by_name("Demo").await?.table_by_name("People").await?;
	let seen = to_date_time(&json!("2024-03-01T09:30:00.000Z"))?;
	let record = Record::new(Map::new())
		.set("Email", "ada@example.com")
		.set("Last seen", from_date_time(seen));

	for written in table.replace_records(&[record], &["Email"]).await? {
		let last_seen = written.get("Last seen").map(to_date_time).transpose()?;

		println!("Upserted {written}, last seen {last_seen:?}.");
	}

	upsert_mock.assert_async().await;

	Ok(())
}
