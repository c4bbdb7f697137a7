//! The render state machine, independent of any live document.
//!
//! [`RenderCoordinator`] owns all state that outlives a single event: the response cache,
//! the applied filter state, the pending debounced submission and the render currently awaiting responses.
//! Everything that touches the page goes through the [`Page`] trait,
//! and everything the page reports back arrives as an [`Event`] through [`RenderCoordinator::dispatch`].

use crate::{
	cache::ResponseCache,
	debounce::{DebounceTicket, SubmitDebouncer},
	history::{history_url, HistoryState, HistorySync},
	loggable, Error, FilterQuery,
};
use core::time::Duration;
use hashbrown::HashSet;
use tracing::{debug, error, instrument, trace, trace_span, warn};
use url::Url;

/// The stable index attribute of a filter group (panel), as found in the markup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupIndex(pub String);

/// One independently fetchable page region.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionDescriptor {
	pub section_id: String,
}

/// The live document and browser, as seen by the [`RenderCoordinator`].
///
/// All methods except [`fetch`](`Page::fetch`) and [`arm_debounce`](`Page::arm_debounce`) act synchronously.
/// Those two must report back later through [`Event::FetchSettled`] and [`Event::DebounceElapsed`] respectively,
/// and must not call back into the coordinator before returning.
pub trait Page {
	/// Shows the spinners and marks the result counts as loading.
	fn show_loading(&mut self);
	fn clear_loading(&mut self);

	/// Starts a `GET` request for `url`.
	fn fetch(&mut self, url: &str);

	/// Applies a fetched fragment to the live document.
	///
	/// The content of the filter group `trigger` (if any) must be left alone, apart from its selected-count badge.
	fn patch(&mut self, html: &str, trigger: Option<&GroupIndex>);

	fn push_history(&mut self, state: &HistoryState, url: &str);

	fn set_active_filters_disabled(&mut self, disabled: bool);

	/// (Re)starts the debounce timer. Any previously armed timer may be cancelled.
	fn arm_debounce(&mut self, ticket: DebounceTicket, delay: Duration);
}

/// Everything that can happen to a [`RenderCoordinator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
	/// Any `input` inside the filter form. Debounced.
	Input { trigger: Option<GroupIndex> },
	/// A debounce timer armed through [`Page::arm_debounce`] ran out.
	///
	/// `query` is the form's serialisation at the time the timer fired.
	DebounceElapsed { ticket: DebounceTicket, query: FilterQuery },
	/// The sort control changed or the form was submitted explicitly. Not debounced.
	Submit { query: FilterQuery, trigger: Option<GroupIndex> },
	/// An active-filter chip was clicked or activated with Space.
	ActiveFilterActivated { href: String },
	/// `popstate`. `state` is [`None`] for entries this crate didn't push.
	HistoryNavigated { state: Option<HistoryState> },
	/// A request started through [`Page::fetch`] completed.
	FetchSettled { url: String, result: Result<String, Error> },
}

impl Event {
	#[must_use]
	pub fn name(&self) -> &'static str {
		match self {
			Event::Input { .. } => "input",
			Event::DebounceElapsed { .. } => "debounce_elapsed",
			Event::Submit { .. } => "submit",
			Event::ActiveFilterActivated { .. } => "active_filter_activated",
			Event::HistoryNavigated { .. } => "history_navigated",
			Event::FetchSettled { .. } => "fetch_settled",
		}
	}
}

/// The newest render that still waits on responses. Older ones are forgotten as soon as a newer one starts.
#[derive(Debug)]
struct PendingRender {
	id: u64,
	trigger: Option<GroupIndex>,
	awaiting: HashSet<String>,
}

/// The per-section request URL: `<path>?section_id=<id>&<search_params>`.
///
/// The section id is inserted verbatim. It doubles as the cache key.
#[must_use]
pub fn request_url(path: &str, section: &SectionDescriptor, search_params: &str) -> String {
	format!("{}?section_id={}&{}", path, section.section_id, search_params)
}

#[derive(Debug)]
pub struct RenderCoordinator<P> {
	page: P,
	base: Url,
	path: String,
	sections: Vec<SectionDescriptor>,
	debounce: Duration,
	cache: ResponseCache,
	history: HistorySync,
	debouncer: SubmitDebouncer<Option<GroupIndex>>,
	in_flight: HashSet<String>,
	pending: Option<PendingRender>,
	render_count: u64,
}

impl<P: Page> RenderCoordinator<P> {
	/// `page_url` is the document's URL at load. Its path scopes all requests and history entries,
	/// and its query is what history entries without state replay.
	#[must_use]
	pub fn new(page: P, page_url: Url, sections: Vec<SectionDescriptor>, debounce: Duration) -> Self {
		let path = page_url.path().to_owned();
		let initial = page_url.query().unwrap_or_default().to_owned();
		Self {
			page,
			base: page_url,
			path,
			sections,
			debounce,
			cache: ResponseCache::new(),
			history: HistorySync::new(initial),
			debouncer: SubmitDebouncer::new(),
			in_flight: HashSet::new(),
			pending: None,
			render_count: 0,
		}
	}

	#[instrument(skip_all, fields(event = event.name()))]
	pub fn dispatch(&mut self, event: Event) {
		match event {
			Event::Input { trigger } => {
				let ticket = self.debouncer.arm(trigger);
				self.page.arm_debounce(ticket, self.debounce);
			}

			Event::DebounceElapsed { ticket, query } => match self.debouncer.take(ticket) {
				Some(trigger) => self.render_page(&query.to_string(), trigger, true),
				None => trace!("Ignoring superseded debounce timer {:?}.", ticket),
			},

			Event::Submit { query, trigger } => {
				if self.debouncer.cancel() {
					debug!("Immediate submission overtook a pending debounced one.");
				}
				self.render_page(&query.to_string(), trigger, true)
			}

			Event::ActiveFilterActivated { href } => self.remove_active_filter(&href),

			Event::HistoryNavigated { state } => {
				if let Some(search_params) = self.history.resolve_navigation(state.as_ref()) {
					self.debouncer.cancel();
					self.render_page(&search_params, None, false)
				}
			}

			Event::FetchSettled { url, result } => self.settle(url, result),
		}
	}

	/// Renders the filter state `search_params` (a canonical query string) into the page.
	///
	/// Serves each tracked section from the cache where possible and fetches the rest.
	/// Iff `update_history`, pushes a history entry unless `search_params` is the entry currently applied.
	pub fn render_page(&mut self, search_params: &str, trigger: Option<GroupIndex>, update_history: bool) {
		let already_applied = self.history.applied() == search_params;
		self.history.record_applied(search_params.to_owned());

		self.render_count += 1;
		let id = self.render_count;
		let span = trace_span!("render_page", id, update_history, search_params = loggable(search_params));
		let _enter = span.enter();

		self.page.show_loading();

		let mut awaiting = HashSet::new();
		for section in &self.sections {
			let url = request_url(&self.path, section, search_params);
			if let Some(html) = self.cache.get(&url) {
				trace!("Rendering section {:?} from cache.", section.section_id);
				self.page.patch(&html, trigger.as_ref());
			} else {
				if self.in_flight.insert(url.clone()) {
					trace!("Fetching section {:?}.", section.section_id);
					self.page.fetch(&url);
				} else {
					debug!("Section {:?} is already in flight for this filter state. Awaiting it.", section.section_id);
				}
				awaiting.insert(url);
			}
		}

		let superseded = if awaiting.is_empty() {
			let superseded = self.pending.take();
			self.finish_render();
			superseded
		} else {
			self.pending.replace(PendingRender { id, trigger, awaiting })
		};
		if let Some(superseded) = superseded {
			debug!("Render {} supersedes render {}, whose responses won't be rendered.", id, superseded.id);
		}

		if update_history {
			if already_applied {
				debug!("Filter state unchanged. Not pushing a history entry.");
			} else {
				let state = HistoryState { search_params: search_params.to_owned() };
				self.page.push_history(&state, &history_url(&self.path, search_params));
			}
		}
	}

	fn remove_active_filter(&mut self, href: &str) {
		let query = match FilterQuery::from_href(href, &self.base) {
			Ok(query) => query,
			Err(error) => return warn!("Ignoring active filter activation: {}", error),
		};
		if self.debouncer.cancel() {
			debug!("Active filter removal overtook a pending debounced submission.");
		}
		self.page.set_active_filters_disabled(true);
		self.render_page(&query.to_string(), None, true)
	}

	fn settle(&mut self, url: String, result: Result<String, Error>) {
		self.in_flight.remove(&url);

		let html = match result {
			Ok(html) => Some(self.cache.insert(url.clone(), html)),
			Err(error) => {
				error!("Error fetching facets from {}: {}", loggable(&url), error);
				None
			}
		};

		let pending = match &mut self.pending {
			Some(pending) if pending.awaiting.contains(&url) => pending,
			_ => return debug!("Response for {} arrived after a newer render started. Not rendering it.", loggable(&url)),
		};
		pending.awaiting.remove(&url);

		if let Some(html) = html {
			trace!("Rendering fetched fragment ({} bytes) for render {}.", html.len(), pending.id);
			self.page.patch(&html, pending.trigger.as_ref());
		}

		if pending.awaiting.is_empty() {
			self.pending = None;
			self.finish_render();
		}
	}

	fn finish_render(&mut self) {
		self.page.clear_loading();
		self.page.set_active_filters_disabled(false);
	}

	/// Whether a render is still waiting on responses.
	#[must_use]
	pub fn is_loading(&self) -> bool {
		self.pending.is_some()
	}

	#[must_use]
	pub fn cache(&self) -> &ResponseCache {
		&self.cache
	}

	#[must_use]
	pub fn history(&self) -> &HistorySync {
		&self.history
	}

	#[must_use]
	pub fn page(&self) -> &P {
		&self.page
	}

	pub fn page_mut(&mut self) -> &mut P {
		&mut self.page
	}
}
