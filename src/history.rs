use serde::{Deserialize, Serialize};
use tracing::debug;

/// The payload of every history entry this crate pushes.
///
/// Serialises as `{ searchParams: string }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryState {
	pub search_params: String,
}

/// The address bar URL for a filter state: `path`, plus `?query` iff `query` is non-empty.
#[must_use]
pub fn history_url(path: &str, query: &str) -> String {
	if query.is_empty() {
		path.to_owned()
	} else {
		format!("{}?{}", path, query)
	}
}

/// Tracks which canonical query string is currently rendered, to tell real history navigation apart from echoes.
#[derive(Debug, Clone)]
pub struct HistorySync {
	initial: String,
	applied: String,
}

impl HistorySync {
	/// `initial` is the page's query string at load, without the leading `?`.
	#[must_use]
	pub fn new(initial: String) -> Self {
		Self { applied: initial.clone(), initial }
	}

	#[must_use]
	pub fn initial(&self) -> &str {
		&self.initial
	}

	/// The query string of the most recently started render.
	#[must_use]
	pub fn applied(&self) -> &str {
		&self.applied
	}

	pub fn record_applied(&mut self, query: String) {
		self.applied = query;
	}

	/// Determines which query a history navigation should replay.
	///
	/// Entries without state (the entry the page was loaded with) fall back to the initial query.
	/// Returns [`None`] iff that query is already applied, which filters out duplicate `popstate` events.
	#[must_use]
	pub fn resolve_navigation(&self, state: Option<&HistoryState>) -> Option<String> {
		let query = state.map_or(self.initial.as_str(), |state| state.search_params.as_str());
		if query == self.applied {
			debug!("Ignoring history navigation to the already applied filter state.");
			None
		} else {
			Some(query.to_owned())
		}
	}
}
