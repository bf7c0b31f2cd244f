//! Optional observability helpers for client operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `airtable.request` with the `operation`
//!   and `stage` (call site) fields.
//! - Enable `metrics` to increment the `airtable_request_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

// self
use crate::_prelude::*;

/// Public client operations observed by the instrumentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// `GET meta/bases`.
	ListBases,
	/// `GET meta/bases/{base}/tables`.
	ListTables,
	/// `GET {base}/{table}` (paginated).
	ListRecords,
	/// `GET {base}/{table}/{record}`.
	GetRecord,
	/// `POST {base}/{table}`.
	CreateRecords,
	/// `PATCH {base}/{table}`.
	UpdateRecords,
	/// `PUT {base}/{table}`.
	ReplaceRecords,
	/// `DELETE {base}/{table}`.
	DeleteRecords,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::ListBases => "list_bases",
			Operation::ListTables => "list_tables",
			Operation::ListRecords => "list_records",
			Operation::GetRecord => "get_record",
			Operation::CreateRecords => "create_records",
			Operation::UpdateRecords => "update_records",
			Operation::ReplaceRecords => "replace_records",
			Operation::DeleteRecords => "delete_records",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl Outcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Success => "success",
			Outcome::Failure => "failure",
		}
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside an operation span and records attempt + final outcome.
pub(crate) async fn observe<T, Fut>(
	operation: Operation,
	stage: &'static str,
	fut: Fut,
) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = RequestSpan::new(operation, stage);

	record_request_outcome(operation, Outcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_request_outcome(operation, Outcome::Success),
		Err(_) => record_request_outcome(operation, Outcome::Failure),
	}

	result
}
