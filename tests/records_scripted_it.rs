// crates.io
use serde_json::json;
// self
use airtable_client::{
	_preludet::*,
	http::{HttpMethod, HttpRequest, HttpResponse},
	resource::{ListRecordsOptions, MAX_RECORDS_PER_REQUEST, Record, RecordId, Table},
};

async fn build_table(transport: &Arc<ScriptedHttpClient>) -> Table {
	transport
		.push_json(200, json!({
			"bases": [{ "id": "appProjects", "name": "Projects", "permissionLevel": "create" }]
		}))
		.push_json(200, json!({
			"tables": [{
				"id": "tblTasks",
				"name": "Tasks",
				"primaryFieldId": "fldName",
				"fields": [
					{ "id": "fldName", "type": "singleLineText", "name": "Name" },
					{ "id": "fldDone", "type": "checkbox", "name": "Done" }
				],
				"views": [{ "id": "viwGrid", "type": "grid", "name": "Grid view" }]
			}]
		}));

	let client = build_scripted_test_client(transport.clone());
	let base = client.base_by_name("Projects").await.expect("Fixture base should be listed.");

	base.table_by_name("Tasks").await.expect("Fixture table should be listed.")
}

// Echoes write bodies back, assigning sequential ids to records that lack one.
fn echo_writes(request: &HttpRequest) -> HttpResponse {
	let body = request.json_body().expect("Write requests should carry a JSON body.");
	let records = body["records"]
		.as_array()
		.expect("Write body should carry a records array.")
		.iter()
		.map(|record| {
			let mut record = record.clone();

			if record.get("id").is_none() {
				let name = record["fields"]["Name"].as_str().unwrap_or("New").to_owned();

				record["id"] = json!(format!("rec{name}"));
			}

			record
		})
		.collect::<Vec<_>>();

	HttpResponse::json(200, &json!({ "records": records }))
}

fn numbered_records(count: usize) -> Vec<Record> {
	(0..count).map(|idx| Record::default().set("Name", format!("{idx:02}"))).collect()
}

#[tokio::test]
async fn create_records_chunks_and_preserves_order() {
	let transport = Arc::new(ScriptedHttpClient::default());
	let table = build_table(&transport).await;

	transport.respond_with(echo_writes);

	let created = table
		.create_records(&numbered_records(23))
		.await
		.expect("Chunked create should succeed.");
	let names = created.iter().map(|record| record.fields["Name"].clone()).collect::<Vec<_>>();

	assert_eq!(names, (0..23).map(|idx| json!(format!("{idx:02}"))).collect::<Vec<_>>());
	assert_eq!(created[22].id.as_deref(), Some("rec22"));
	assert_eq!(created[22].to_string(), "(22 [rec22])");
	assert_eq!(created[0].table().map(|table| table.table_id.as_str()), Some("tblTasks"));

	let writes = transport.requests().into_iter().skip(2).collect::<Vec<_>>();
	let sizes = writes
		.iter()
		.map(|request| {
			assert_eq!(request.method, HttpMethod::Post);
			assert_eq!(request.url.as_str(), "https://api.test/v0/appProjects/tblTasks");

			request.json_body().expect("Create body should be JSON.")["records"]
				.as_array()
				.map(Vec::len)
				.unwrap_or_default()
		})
		.collect::<Vec<_>>();

	assert_eq!(sizes, [MAX_RECORDS_PER_REQUEST, MAX_RECORDS_PER_REQUEST, 3]);
}

#[tokio::test]
async fn create_records_drops_ids_and_update_keeps_them() {
	let transport = Arc::new(ScriptedHttpClient::default());
	let table = build_table(&transport).await;
	let id = RecordId::new("recExisting").expect("Record id fixture should be valid.");
	let record = Record::with_id(id, Map::new()).set("Done", true);

	transport.respond_with(echo_writes);

	table.create_records(&[record.clone()]).await.expect("Create should succeed.");

	let updated = table.update_records(&[record]).await.expect("Update should succeed.");

	assert_eq!(updated[0].id.as_deref(), Some("recExisting"));

	let requests = transport.requests();

	assert_eq!(requests[2].json_body(), Some(json!({ "records": [{ "fields": { "Done": true } }] })));
	assert_eq!(requests[3].method, HttpMethod::Patch);
	assert_eq!(
		requests[3].json_body(),
		Some(json!({ "records": [{ "id": "recExisting", "fields": { "Done": true } }] }))
	);
}

#[tokio::test]
async fn replace_records_sends_upsert_with_every_chunk() {
	let transport = Arc::new(ScriptedHttpClient::default());
	let table = build_table(&transport).await;

	transport.respond_with(echo_writes);

	let replaced = table
		.replace_records(&numbered_records(12), &["Name"])
		.await
		.expect("Upsert should succeed.");

	assert_eq!(replaced.len(), 12);

	for request in transport.requests().into_iter().skip(2) {
		let body = request.json_body().expect("Upsert body should be JSON.");

		assert_eq!(request.method, HttpMethod::Put);
		assert_eq!(body["performUpsert"], json!({ "fieldsToMergeOn": ["Name"] }));
	}

	table.replace_records(&numbered_records(1), &[]).await.expect("Replace should succeed.");

	let last = transport.requests().pop().expect("Replace should have been sent.");

	assert!(last.json_body().expect("Replace body should be JSON.").get("performUpsert").is_none());
}

#[tokio::test]
async fn empty_writes_issue_no_requests() {
	let transport = Arc::new(ScriptedHttpClient::default());
	let table = build_table(&transport).await;

	assert!(table.create_records(&[]).await.expect("Empty create should succeed.").is_empty());
	assert!(table.update_records(&[]).await.expect("Empty update should succeed.").is_empty());
	assert!(
		table.replace_records(&[], &["Name"]).await.expect("Empty replace should succeed.").is_empty()
	);
	assert!(table.delete_records(&[]).await.expect("Empty delete should succeed.").is_empty());
	assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn failing_chunk_aborts_the_write() {
	let transport = Arc::new(ScriptedHttpClient::default());
	let table = build_table(&transport).await;

	transport
		.push_json(200, json!({ "records": [] }))
		.push_json(422, json!({ "error": { "type": "INVALID_VALUE_FOR_COLUMN", "message": "Bad" } }));

	let err = table
		.create_records(&numbered_records(25))
		.await
		.expect_err("Second chunk failure should abort the write.");

	match err {
		Error::Api(api) => {
			assert_eq!(api.status, 422);
			assert_eq!(api.kind.as_deref(), Some("INVALID_VALUE_FOR_COLUMN"));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
	assert_eq!(transport.requests().len(), 4);
}

#[tokio::test]
async fn list_records_walks_every_page_in_order() {
	let transport = Arc::new(ScriptedHttpClient::default());
	let table = build_table(&transport).await;

	transport
		.push_json(200, json!({
			"records": [
				{ "id": "rec1", "createdTime": "2024-01-01T00:00:00.000Z", "fields": { "Name": "a" } },
				{ "id": "rec2", "createdTime": "2024-01-01T00:00:00.000Z", "fields": { "Name": "b" } }
			],
			"offset": "itrNext/rec2"
		}))
		.push_json(200, json!({
			"records": [{ "id": "rec3", "createdTime": "2024-01-01T00:00:00.000Z", "fields": {} }]
		}));

	let records = table
		.list_records(&ListRecordsOptions::default().view("Grid view").page_size(2))
		.await
		.expect("Listing should succeed.");
	let ids = records.iter().filter_map(|record| record.id.as_deref()).collect::<Vec<_>>();

	assert_eq!(ids, ["rec1", "rec2", "rec3"]);
	assert_eq!(records[2].to_string(), "( [rec3])");

	let urls = transport
		.requests()
		.into_iter()
		.skip(2)
		.map(|request| request.url.to_string())
		.collect::<Vec<_>>();

	assert_eq!(urls, [
		"https://api.test/v0/appProjects/tblTasks?view=Grid+view&pageSize=2",
		"https://api.test/v0/appProjects/tblTasks?view=Grid+view&pageSize=2&offset=itrNext%2Frec2",
	]);
}

#[tokio::test]
async fn delete_records_chunks_ids_into_query() {
	let transport = Arc::new(ScriptedHttpClient::default());
	let table = build_table(&transport).await;
	let ids = (0..12)
		.map(|idx| RecordId::new(format!("rec{idx}")).expect("Record id fixture should be valid."))
		.collect::<Vec<_>>();

	transport.respond_with(|request| {
		let records = request
			.url
			.query_pairs()
			.filter(|(key, _)| key == "records[]")
			.map(|(_, id)| json!({ "id": id, "deleted": true }))
			.collect::<Vec<_>>();

		HttpResponse::json(200, &json!({ "records": records }))
	});

	let deleted = table.delete_records(&ids).await.expect("Delete should succeed.");

	assert_eq!(deleted.len(), 12);
	assert!(deleted.iter().all(|record| record.deleted));
	assert_eq!(deleted[11].id.as_deref(), Some("rec11"));

	let requests = transport.requests();

	assert_eq!(requests.len(), 4);
	assert_eq!(requests[2].method, HttpMethod::Delete);
	assert_eq!(requests[2].url.query_pairs().count(), MAX_RECORDS_PER_REQUEST);
	assert_eq!(requests[3].url.query_pairs().count(), 2);
}

#[tokio::test]
async fn table_lookups_resolve_schema_names() {
	let transport = Arc::new(ScriptedHttpClient::default());
	let table = build_table(&transport).await;

	assert_eq!(table.to_string(), "Projects.Tasks");
	assert_eq!(table.primary_field().map(|field| field.name.as_str()), Some("Name"));
	assert_eq!(table.field_by_name("Done").expect("Done field should exist.").kind, "checkbox");
	assert_eq!(table.view_by_name("Grid view").expect("Grid view should exist.").kind, "grid");
	assert!(matches!(
		table.field_by_name("done"),
		Err(Error::NotFound { kind: "field", .. })
	));
	assert!(matches!(table.view_by_name("Kanban"), Err(Error::NotFound { kind: "view", .. })));
	assert_eq!(table.reference().primary_field.as_deref(), Some("Name"));
	assert_eq!(table.base().id.as_str(), "appProjects");
}
