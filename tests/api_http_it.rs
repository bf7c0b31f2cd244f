// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use airtable_client::{
	_preludet::*,
	resource::{ListRecordsOptions, PermissionLevel, Record, RecordId, SortDirection, Table},
};

async fn mock_bases(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v0/meta/bases")
				.header("authorization", format!("Bearer {TEST_API_KEY}"));
			then.status(200).json_body(json!({
				"bases": [
					{ "id": "appCrm", "name": "CRM", "permissionLevel": "edit" },
					{ "id": "appOps", "name": "Ops", "permissionLevel": "read" }
				]
			}));
		})
		.await
}

async fn mock_tables(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v0/meta/bases/appCrm/tables");
			then.status(200).json_body(json!({
				"tables": [{
					"id": "tblContacts",
					"name": "Contacts",
					"description": "People we talk to",
					"primaryFieldId": "fldEmail",
					"fields": [
						{ "id": "fldName", "type": "singleLineText", "name": "Name" },
						{
							"id": "fldEmail",
							"type": "email",
							"name": "Email",
							"description": "Work address"
						},
						{
							"id": "fldStage",
							"type": "singleSelect",
							"name": "Stage",
							"options": { "choices": [{ "id": "selLead", "name": "Lead" }] }
						}
					],
					"views": [
						{ "id": "viwAll", "type": "grid", "name": "All contacts" },
						{ "id": "viwPipe", "type": "kanban", "name": "Pipeline" }
					]
				}]
			}));
		})
		.await
}

async fn contacts_table(server: &MockServer) -> Table {
	mock_bases(server).await;
	mock_tables(server).await;

	let client = build_reqwest_test_client(&server.url("/v0"));
	let base = client.base_by_name("CRM").await.expect("CRM base should be listed.");

	base.table_by_name("Contacts").await.expect("Contacts table should be listed.")
}

#[tokio::test]
async fn list_bases_sends_bearer_token() {
	let server = MockServer::start_async().await;
	let mock = mock_bases(&server).await;
	let client = build_reqwest_test_client(&server.url("/v0"));
	let bases = client.list_bases().await.expect("Base listing should succeed.");

	assert_eq!(bases.len(), 2);
	assert_eq!(bases[0].id.as_str(), "appCrm");
	assert_eq!(bases[0].to_string(), "CRM");
	assert_eq!(bases[1].permission_level, Some(PermissionLevel::Read));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn base_by_name_reports_missing_bases() {
	let server = MockServer::start_async().await;

	mock_bases(&server).await;

	let client = build_reqwest_test_client(&server.url("/v0"));
	let err = client.base_by_name("crm").await.expect_err("Lookup is case-sensitive.");

	assert!(matches!(&err, Error::NotFound { kind: "base", name } if name == "crm"));
	assert_eq!(err.to_string(), "base 'crm' not found.");
}

#[tokio::test]
async fn list_tables_decodes_schema() {
	let server = MockServer::start_async().await;
	let table = contacts_table(&server).await;

	assert_eq!(table.to_string(), "CRM.Contacts");
	assert_eq!(table.description.as_deref(), Some("People we talk to"));
	assert_eq!(table.fields.len(), 3);
	assert_eq!(table.primary_field().map(|field| field.name.as_str()), Some("Email"));

	let stage = table.field_by_name("Stage").expect("Stage field should exist.");

	assert_eq!(stage.kind, "singleSelect");
	assert_eq!(stage.options["choices"][0]["name"], "Lead");
	assert_eq!(
		table.field_by_name("Email").expect("Email field should exist.").description.as_deref(),
		Some("Work address")
	);
	assert_eq!(
		table.view_by_name("Pipeline").expect("Pipeline view should exist.").id.as_str(),
		"viwPipe"
	);
}

#[tokio::test]
async fn list_records_forwards_options_as_query() {
	let server = MockServer::start_async().await;
	let table = contacts_table(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v0/appCrm/tblContacts")
				.query_param("view", "Pipeline")
				.query_param("fields[]", "Name")
				.query_param("fields[]", "Email")
				.query_param("filterByFormula", "{Stage} = 'Lead'")
				.query_param("maxRecords", "5")
				.query_param("sort[0][field]", "Name")
				.query_param("sort[0][direction]", "desc");
			then.status(200).json_body(json!({
				"records": [{
					"id": "recAda",
					"createdTime": "2024-03-01T09:30:00.000Z",
					"fields": { "Name": "Ada", "Email": "ada@example.com" }
				}]
			}));
		})
		.await;
	let options = ListRecordsOptions::default()
		.view("Pipeline")
		.field("Name")
		.field("Email")
		.filter_by_formula("{Stage} = 'Lead'")
		.max_records(5)
		.sort("Name", SortDirection::Desc);
	let records = table.list_records(&options).await.expect("Record listing should succeed.");

	assert_eq!(records.len(), 1);
	assert_eq!(records[0].to_string(), "(ada@example.com [recAda])");

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn get_record_fetches_by_id() {
	let server = MockServer::start_async().await;
	let table = contacts_table(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v0/appCrm/tblContacts/recAda");
			then.status(200).json_body(json!({
				"id": "recAda",
				"createdTime": "2024-03-01T09:30:00.000Z",
				"fields": { "Name": "Ada" }
			}));
		})
		.await;
	let id = RecordId::new("recAda").expect("Record id fixture should be valid.");
	let record = table.get_record(&id).await.expect("Record fetch should succeed.");

	assert_eq!(record.get("Name"), Some(&json!("Ada")));
	assert_eq!(record.table().map(|table| table.table_name.as_str()), Some("Contacts"));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn replace_records_upserts_on_merge_fields() {
	let server = MockServer::start_async().await;
	let table = contacts_table(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(PUT).path("/v0/appCrm/tblContacts").json_body(json!({
				"performUpsert": { "fieldsToMergeOn": ["Email"] },
				"records": [{ "fields": { "Email": "grace@example.com", "Name": "Grace" } }]
			}));
			then.status(200).json_body(json!({
				"createdRecords": ["recGrace"],
				"updatedRecords": [],
				"records": [{
					"id": "recGrace",
					"createdTime": "2024-03-02T10:00:00.000Z",
					"fields": { "Email": "grace@example.com", "Name": "Grace" }
				}]
			}));
		})
		.await;
	let input = Record::default().set("Email", "grace@example.com").set("Name", "Grace");
	let written = table
		.replace_records(&[input], &["Email"])
		.await
		.expect("Upsert should succeed.");

	assert_eq!(written[0].id.as_deref(), Some("recGrace"));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn delete_records_passes_ids_in_query() {
	let server = MockServer::start_async().await;
	let table = contacts_table(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(DELETE)
				.path("/v0/appCrm/tblContacts")
				.query_param("records[]", "recAda")
				.query_param("records[]", "recGrace");
			then.status(200).json_body(json!({
				"records": [
					{ "id": "recAda", "deleted": true },
					{ "id": "recGrace", "deleted": true }
				]
			}));
		})
		.await;
	let ids = ["recAda", "recGrace"]
		.map(|id| RecordId::new(id).expect("Record id fixture should be valid."));
	let deleted = table.delete_records(&ids).await.expect("Delete should succeed.");

	assert!(deleted.iter().all(|record| record.deleted));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn error_statuses_surface_api_details() {
	let server = MockServer::start_async().await;
	let table = contacts_table(&server).await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/v0/appCrm/tblContacts");
			then.status(429)
				.header("retry-after", "30")
				.json_body(json!({ "error": "RATE_LIMIT_REACHED" }));
		})
		.await;

	let err = table
		.create_records(&[Record::default().set("Name", "Lin")])
		.await
		.expect_err("429 should surface as an error.");

	match err {
		Error::Api(api) => {
			assert!(api.is_rate_limited());
			assert_eq!(api.status, 429);
			assert_eq!(api.kind.as_deref(), Some("RATE_LIMIT_REACHED"));
			assert_eq!(api.retry_after, Some(Duration::seconds(30)));
			assert_eq!(api.url, server.url("/v0/appCrm/tblContacts"));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}
