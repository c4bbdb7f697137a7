use hashbrown::HashMap;
use std::rc::Rc;
use tracing::trace;

/// Fetched fragment markup by exact request URL.
///
/// Unbounded and never invalidated: entries live as long as the page does.
/// This is only sound while the server renders each fragment as a pure function of its URL.
#[derive(Debug, Default)]
pub struct ResponseCache {
	entries: HashMap<String, Rc<str>>,
}

impl ResponseCache {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn get(&self, url: &str) -> Option<Rc<str>> {
		self.entries.get(url).cloned()
	}

	#[must_use]
	pub fn contains(&self, url: &str) -> bool {
		self.entries.contains_key(url)
	}

	/// Stores `html` for `url` unless an entry already exists, and returns the stored fragment.
	///
	/// The first response for a URL wins, so a fragment that was already rendered is never swapped out underneath the page.
	pub fn insert(&mut self, url: String, html: impl Into<Rc<str>>) -> Rc<str> {
		let html = self.entries.entry(url).or_insert_with(|| html.into()).clone();
		trace!("Response cache holds {} fragment(s).", self.entries.len());
		html
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
