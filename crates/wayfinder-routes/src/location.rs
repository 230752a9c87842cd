//! Browsable locations.
//!
//! A [`Location`] is the part of a URL that navigation cares about: the
//! decoded path segments, the fragment (without `#`) and the query pairs.

use super::error::{RouteError, RouteResult};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use url::{Url, form_urlencoded};

/// Fragment keys written by identity providers after a login redirect.
pub const IDENTITY_PROVIDER_HASH_KEYS: [&str; 3] = ["state", "session_state", "code"];

const PARSE_BASE: &str = "http://localhost/";

/// A navigable location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
	/// Decoded, non-empty path segments.
	pub path: Vec<String>,
	/// Fragment without the leading `#`.
	#[serde(default)]
	pub hash: String,
	/// Decoded query pairs in order of appearance.
	#[serde(default)]
	pub query: Vec<(String, String)>,
}

impl Location {
	/// Creates a location from path segments. Empty segments are dropped.
	pub fn new<I, S>(segments: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			path: segments
				.into_iter()
				.map(Into::into)
				.filter(|s: &String| !s.is_empty())
				.collect(),
			hash: String::new(),
			query: Vec::new(),
		}
	}

	/// Parses an absolute URL or a path such as `/foo/bar?x=1#section`.
	///
	/// # Errors
	///
	/// Returns [`RouteError::InvalidLocation`] when the input is not a valid
	/// URL or path.
	pub fn parse(input: &str) -> RouteResult<Self> {
		let invalid = |reason: String| RouteError::InvalidLocation {
			input: input.to_string(),
			reason,
		};
		let base = Url::parse(PARSE_BASE).map_err(|e| invalid(e.to_string()))?;
		let url = base.join(input).map_err(|e| invalid(e.to_string()))?;

		let path = url
			.path_segments()
			.map(|segments| {
				segments
					.filter(|s| !s.is_empty())
					.map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
					.collect()
			})
			.unwrap_or_default();
		let query = url
			.query_pairs()
			.map(|(k, v)| (k.into_owned(), v.into_owned()))
			.collect();
		let hash = url.fragment().unwrap_or_default().to_string();

		Ok(Self { path, hash, query })
	}

	/// Sets the fragment. A leading `#` is removed.
	pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
		let hash = hash.into();
		self.hash = hash.strip_prefix('#').map(str::to_string).unwrap_or(hash);
		self
	}

	/// Appends a query pair.
	pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));
		self
	}

	/// Absolute path such as `/foo/bar`.
	pub fn pathname(&self) -> String {
		format!("/{}", self.path.join("/"))
	}

	/// Returns the path segment at `index`.
	pub fn segment(&self, index: usize) -> Option<&str> {
		self.path.get(index).map(String::as_str)
	}

	/// Returns the first query value for `key`.
	pub fn query_value(&self, key: &str) -> Option<&str> {
		self.query
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}

	/// Returns whether the fragment carries `key` as a form-encoded pair.
	pub fn hash_contains(&self, key: &str) -> bool {
		form_urlencoded::parse(self.hash.as_bytes()).any(|(k, _)| k == key)
	}

	/// Removes form-encoded pairs named in `keys` from the fragment.
	///
	/// Returns whether anything was removed. Remaining pairs keep their order;
	/// pairs without a value are written back as a bare key.
	pub fn strip_hash_keys(&mut self, keys: &[&str]) -> bool {
		if self.hash.is_empty() {
			return false;
		}
		let pairs: Vec<(String, String)> = form_urlencoded::parse(self.hash.as_bytes())
			.map(|(k, v)| (k.into_owned(), v.into_owned()))
			.collect();
		let kept: Vec<&(String, String)> = pairs
			.iter()
			.filter(|(k, _)| !keys.contains(&k.as_str()))
			.collect();
		if kept.len() == pairs.len() {
			return false;
		}

		self.hash = kept
			.into_iter()
			.map(|(k, v)| {
				if v.is_empty() {
					encode_component(k)
				} else {
					format!("{}={}", encode_component(k), encode_component(v))
				}
			})
			.collect::<Vec<_>>()
			.join("&");
		true
	}

	/// Removes identity-provider artifacts (`state`, `session_state`, `code`)
	/// from the fragment.
	pub fn strip_identity_provider_state(&mut self) -> bool {
		self.strip_hash_keys(&IDENTITY_PROVIDER_HASH_KEYS)
	}
}

fn encode_component(value: &str) -> String {
	form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
