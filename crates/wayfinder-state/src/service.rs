//! Mapping of failed service responses to user-visible errors.
//!
//! Pages hand the outcome of their data requests to
//! [`AppStateCoordinator::show_message_if_service_error`](crate::AppStateCoordinator::show_message_if_service_error),
//! which uses [`find_service_error`] to word the most telling failure.

use crate::event::PageError;
use serde::{Deserialize, Serialize};

/// Message used when a failure carries nothing more specific.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

const UNAUTHENTICATED_MESSAGE: &str =
	"You need to authenticate to view this page or perform this action";
const FORBIDDEN_MESSAGE: &str = "You are not authorized to view this page or perform this action";

/// State of a single service request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestState {
	/// In flight.
	#[default]
	Loading,
	/// Completed successfully.
	Loaded,
	/// Failed.
	Error,
}

/// Transport-level details of a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpFailure {
	/// HTTP status code.
	pub status: u16,
	/// Requested URL.
	#[serde(default)]
	pub url: String,
}

/// Error body returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
	/// Human-readable message.
	#[serde(default)]
	pub error_message: Option<String>,
	/// Human-readable heading.
	#[serde(default)]
	pub error_heading: Option<String>,
	/// Server-side correlation id.
	#[serde(default)]
	pub server_log_id: Option<String>,
}

impl ErrorPayload {
	/// Whether the payload carries a message or heading worth showing.
	pub fn is_meaningful(&self) -> bool {
		non_empty(&self.error_message).is_some() || non_empty(&self.error_heading).is_some()
	}
}

/// Why a request failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceFailure {
	/// HTTP response details, when the server answered.
	#[serde(default)]
	pub response: Option<HttpFailure>,
	/// Decoded error body.
	#[serde(default)]
	pub payload: Option<ErrorPayload>,
}

/// Result of one service request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResponse {
	/// Request state.
	pub state: RequestState,
	/// Failure details, present when `state` is [`RequestState::Error`].
	#[serde(default)]
	pub error: Option<ServiceFailure>,
}

impl ServiceResponse {
	/// A successful response.
	pub fn loaded() -> Self {
		Self {
			state: RequestState::Loaded,
			error: None,
		}
	}

	/// A failure with an HTTP status.
	pub fn status(status: u16, url: impl Into<String>) -> Self {
		Self::failed(ServiceFailure {
			response: Some(HttpFailure {
				status,
				url: url.into(),
			}),
			payload: None,
		})
	}

	/// A failure with a server error body.
	pub fn payload(payload: ErrorPayload) -> Self {
		Self::failed(ServiceFailure {
			response: None,
			payload: Some(payload),
		})
	}

	/// A failure with arbitrary details.
	pub fn failed(failure: ServiceFailure) -> Self {
		Self {
			state: RequestState::Error,
			error: Some(failure),
		}
	}

	/// Whether the request failed.
	pub fn is_error(&self) -> bool {
		self.state == RequestState::Error
	}
}

/// One element handed to the error check: a response or a batch of them.
///
/// Batches are flattened one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceOutcome {
	/// A single response.
	Single(ServiceResponse),
	/// Responses of a batched request.
	Batch(Vec<ServiceResponse>),
}

impl From<ServiceResponse> for ServiceOutcome {
	fn from(response: ServiceResponse) -> Self {
		Self::Single(response)
	}
}

impl From<Vec<ServiceResponse>> for ServiceOutcome {
	fn from(responses: Vec<ServiceResponse>) -> Self {
		Self::Batch(responses)
	}
}

/// Caller-provided wording that takes priority over server wording.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorOverrides {
	/// Replacement message.
	#[serde(default)]
	pub message: Option<String>,
	/// Replacement heading.
	#[serde(default)]
	pub heading: Option<String>,
}

impl ErrorOverrides {
	/// Overrides the message.
	pub fn message(message: impl Into<String>) -> Self {
		Self {
			message: Some(message.into()),
			heading: None,
		}
	}

	/// Sets the heading.
	pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
		self.heading = Some(heading.into());
		self
	}
}

/// Collects every failed response and describes the most telling one.
///
/// Failures are searched as a whole: the first one carrying a meaningful
/// server payload wins, then a 404, a 401 and a 403, then
/// [`GENERIC_ERROR_MESSAGE`]. A caller override replaces the message and
/// heading at every step. The server log id of a meaningful payload is
/// always kept.
///
/// Returns `None` when nothing failed.
pub fn find_service_error<I, O>(outcomes: I, overrides: &ErrorOverrides) -> Option<PageError>
where
	I: IntoIterator<Item = O>,
	O: Into<ServiceOutcome>,
{
	let failures: Vec<ServiceFailure> = outcomes
		.into_iter()
		.flat_map(|outcome| match outcome.into() {
			ServiceOutcome::Single(response) => vec![response],
			ServiceOutcome::Batch(responses) => responses,
		})
		.filter(ServiceResponse::is_error)
		.map(|response| response.error.unwrap_or_default())
		.collect();
	if failures.is_empty() {
		return None;
	}
	Some(describe_failures(&failures, overrides))
}

fn describe_failures(failures: &[ServiceFailure], overrides: &ErrorOverrides) -> PageError {
	let custom_message = non_empty(&overrides.message);
	let custom_heading = non_empty(&overrides.heading);

	if let Some(payload) = failures
		.iter()
		.filter_map(|failure| failure.payload.as_ref())
		.find(|payload| payload.is_meaningful())
	{
		return PageError {
			error_message: custom_message.or_else(|| non_empty(&payload.error_message)),
			error_heading: custom_heading.or_else(|| non_empty(&payload.error_heading)),
			server_log_id: non_empty(&payload.server_log_id),
		};
	}

	let with_status = |status: u16| {
		failures
			.iter()
			.filter_map(|failure| failure.response.as_ref())
			.find(|response| response.status == status)
	};
	let message = custom_message.unwrap_or_else(|| {
		if let Some(not_found) = with_status(404) {
			format!("Service endpoint not found: {}", not_found.url)
		} else if with_status(401).is_some() {
			UNAUTHENTICATED_MESSAGE.to_string()
		} else if with_status(403).is_some() {
			FORBIDDEN_MESSAGE.to_string()
		} else {
			GENERIC_ERROR_MESSAGE.to_string()
		}
	});

	PageError {
		error_message: Some(message),
		error_heading: custom_heading,
		server_log_id: None,
	}
}

fn non_empty(value: &Option<String>) -> Option<String> {
	value.as_deref().filter(|s| !s.is_empty()).map(str::to_string)
}
