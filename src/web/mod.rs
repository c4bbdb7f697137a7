//! The browser side: a [`Page`] backed by [`web_sys`], and the [`FacetFilters`] handle exported to JavaScript.

use crate::{
	coordinator::{GroupIndex, Page, RenderCoordinator, SectionDescriptor},
	debounce::DebounceTicket,
	history::HistoryState,
	loggable,
	options::{Options, Selectors},
	Error, Event, FilterQuery,
};
use core::{convert::TryFrom, fmt, time::Duration};
use gloo_timers::callback::Timeout;
use std::{
	cell::RefCell,
	rc::{Rc, Weak},
};
use tracing::{debug, error, instrument, trace, warn};
use url::Url;
use wasm_bindgen::{prelude::wasm_bindgen, JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Element, FormData, HtmlFormElement, NodeList, Response, UrlSearchParams, Window};

mod binding;
pub mod patch;

type Shared = Rc<RefCell<RenderCoordinator<WebPage>>>;

/// Routes events back into a coordinator without keeping it alive.
#[derive(Debug, Clone)]
pub(crate) struct Dispatcher(Weak<RefCell<RenderCoordinator<WebPage>>>);

impl Dispatcher {
	pub(crate) fn dispatch(&self, event: Event) {
		let coordinator = match self.0.upgrade() {
			Some(coordinator) => coordinator,
			None => return debug!("Dropping {} event after detach.", event.name()),
		};
		let mut coordinator = match coordinator.try_borrow_mut() {
			Ok(coordinator) => coordinator,
			Err(_) => return error!("Dropping re-entrant {} event.", event.name()),
		};
		coordinator.dispatch(event)
	}
}

/// [`Page`] implementation for the live document.
pub struct WebPage {
	window: Window,
	document: Document,
	form: HtmlFormElement,
	selectors: Selectors,
	dispatcher: Dispatcher,
	debounce_timer: Option<Timeout>,
}

impl Page for WebPage {
	fn show_loading(&mut self) {
		for spinner in select_all(&self.document, &self.selectors.spinner) {
			set_class(&spinner, &self.selectors.hidden_class, false);
		}
		for count in self.result_counts() {
			set_class(&count, &self.selectors.loading_class, true);
		}
	}

	fn clear_loading(&mut self) {
		for spinner in select_all(&self.document, &self.selectors.spinner) {
			set_class(&spinner, &self.selectors.hidden_class, true);
		}
		for count in self.result_counts() {
			set_class(&count, &self.selectors.loading_class, false);
		}
	}

	fn fetch(&mut self, url: &str) {
		let window = self.window.clone();
		let dispatcher = self.dispatcher.clone();
		let url = url.to_owned();
		spawn_local(async move {
			let result = fetch_text(&window, &url).await;
			dispatcher.dispatch(Event::FetchSettled { url, result })
		})
	}

	fn patch(&mut self, html: &str, trigger: Option<&GroupIndex>) {
		patch::apply(&self.document, &self.selectors, html, trigger)
	}

	fn push_history(&mut self, state: &HistoryState, url: &str) {
		if let Err(error) = push_history(&self.window, state, url) {
			error!("Failed to push history entry for {}: {}", loggable(url), error)
		}
	}

	fn set_active_filters_disabled(&mut self, disabled: bool) {
		for control in select_all(&self.document, &self.selectors.active_filter_control) {
			set_class(&control, &self.selectors.disabled_class, disabled);
		}
	}

	fn arm_debounce(&mut self, ticket: DebounceTicket, delay: Duration) {
		let form = self.form.clone();
		let dispatcher = self.dispatcher.clone();
		let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
		// Replacing the previous timer cancels it.
		self.debounce_timer = Some(Timeout::new(millis, move || match serialize_form(&form) {
			Ok(query) => dispatcher.dispatch(Event::DebounceElapsed { ticket, query }),
			Err(error) => error!("Failed to serialise the filter form: {}", error),
		}));
	}
}

impl fmt::Debug for WebPage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WebPage")
			.field("form", &self.form)
			.field("selectors", &self.selectors)
			.field("debounce_armed", &self.debounce_timer.is_some())
			.finish_non_exhaustive()
	}
}

impl WebPage {
	fn result_counts(&self) -> impl '_ + Iterator<Item = Element> {
		self.selectors.result_count_ids.iter().filter_map(move |id| self.document.get_element_by_id(id))
	}
}

/// A coordinator attached to one filter form.
///
/// Construct it once the page is loaded. Dropping it (or calling [`detach`](`FacetFilters::detach`)) removes
/// every event listener and cancels the pending debounce timer. Responses still in flight are discarded.
#[wasm_bindgen]
#[derive(Debug)]
pub struct FacetFilters {
	coordinator: Shared,
	_listeners: Vec<binding::Listener>,
}

#[wasm_bindgen]
impl FacetFilters {
	/// Attaches to `root`, the element containing the filter `<form>`.
	///
	/// `options` may be `undefined`, in which case the stock theme's DOM contract is assumed.
	///
	/// # Errors
	///
	/// Iff `options` is malformed or a required element is missing. See [`FacetFilters::attach_with`].
	#[wasm_bindgen(constructor)]
	pub fn new(root: Element, options: JsValue) -> Result<FacetFilters, JsValue> {
		let options = if options.is_undefined() || options.is_null() {
			Options::default()
		} else {
			serde_wasm_bindgen::from_value(options).map_err(Error::from)?
		};
		Ok(Self::attach_with(&root, options)?)
	}

	pub fn detach(self) {
		debug!("Detaching facet filters.");
	}

	/// The number of fragments cached so far.
	#[wasm_bindgen(js_name = cachedFragments)]
	pub fn cached_fragments(&self) -> usize {
		self.coordinator.borrow().cache().len()
	}
}

impl FacetFilters {
	/// # Errors
	///
	/// Iff there is no `window`, `root` contains no `<form>`, or the product grid (carrying the section id) is missing.
	#[instrument(skip(root))]
	pub fn attach_with(root: &Element, options: Options) -> Result<Self, Error> {
		let window = web_sys::window().ok_or(Error::NoWindow)?;
		let document = window.document().ok_or(Error::NoWindow)?;
		let form: HtmlFormElement = root
			.query_selector("form")?
			.ok_or_else(|| Error::MissingElement("form".to_owned()))?
			.dyn_into()
			.map_err(|_| Error::MissingElement("form".to_owned()))?;

		let href = window.location().href()?;
		let page_url = Url::parse(&href).map_err(|source| Error::Href { href, source })?;
		let sections = sections(&document, &options.selectors)?;
		trace!("Tracking {} section(s).", sections.len());

		for container in select_all(&document, &options.selectors.facets_container) {
			set_class(&container, &options.selectors.no_js_class, false);
		}
		patch::mark_active_filter_links(&document, &options.selectors);

		let debounce = options.debounce();
		let coordinator: Shared = Rc::new_cyclic(|weak| {
			let page = WebPage {
				window: window.clone(),
				document: document.clone(),
				form: form.clone(),
				selectors: options.selectors.clone(),
				dispatcher: Dispatcher(weak.clone()),
				debounce_timer: None,
			};
			RefCell::new(RenderCoordinator::new(page, page_url, sections, debounce))
		});

		let listeners = binding::bind(&window, &document, root, &form, &options, &Dispatcher(Rc::downgrade(&coordinator)))?;
		Ok(Self { coordinator, _listeners: listeners })
	}

	/// Dispatches `event` as if it came from the page.
	///
	/// Events raised while another one is being handled are dropped (and logged).
	pub fn dispatch(&self, event: Event) {
		Dispatcher(Rc::downgrade(&self.coordinator)).dispatch(event)
	}
}

/// Reads the tracked sections from the product grid.
fn sections(document: &Document, selectors: &Selectors) -> Result<Vec<SectionDescriptor>, Error> {
	let grid = document
		.get_element_by_id(&selectors.product_grid_id)
		.ok_or_else(|| Error::MissingElement(format!("#{}", selectors.product_grid_id)))?;
	let section_id = grid
		.get_attribute(&selectors.section_id_attribute)
		.ok_or_else(|| Error::MissingElement(format!("#{}[{}]", selectors.product_grid_id, selectors.section_id_attribute)))?;
	Ok(vec![SectionDescriptor { section_id }])
}

/// Serialises `form` the way the browser does for a `GET` submission: field order and repeated names are preserved.
///
/// # Errors
///
/// Iff the browser rejects the form (which it shouldn't).
pub fn serialize_form(form: &HtmlFormElement) -> Result<FilterQuery, Error> {
	let form_data = FormData::new_with_form(form)?;
	let params = UrlSearchParams::new_with_str_sequence_sequence(&form_data)?;
	Ok(FilterQuery::parse(&String::from(params.to_string())))
}

async fn fetch_text(window: &Window, url: &str) -> Result<String, Error> {
	let response: Response = JsFuture::from(window.fetch_with_str(url)).await?.dyn_into()?;
	if !response.ok() {
		return Err(Error::Status(response.status()));
	}
	JsFuture::from(response.text()?).await?.as_string().ok_or(Error::NotText)
}

fn push_history(window: &Window, state: &HistoryState, url: &str) -> Result<(), Error> {
	let state = serde_wasm_bindgen::to_value(state).map_err(|error| Error::Js(error.to_string()))?;
	window.history()?.push_state_with_url(&state, "", Some(url))?;
	Ok(())
}

/// Reads a `popstate` payload. Anything that isn't a [`HistoryState`] counts as no state.
pub(crate) fn history_state(state: JsValue) -> Option<HistoryState> {
	if state.is_null() || state.is_undefined() {
		return None;
	}
	match serde_wasm_bindgen::from_value(state) {
		Ok(state) => Some(state),
		Err(error) => {
			warn!("Foreign history state ({}). Falling back to the initial filter state.", error);
			None
		}
	}
}

pub(crate) fn elements(nodes: &NodeList) -> impl '_ + Iterator<Item = Element> {
	(0..nodes.length()).filter_map(move |i| nodes.item(i)).filter_map(|node| node.dyn_into::<Element>().ok())
}

pub(crate) fn select_all(document: &Document, selectors: &str) -> Vec<Element> {
	match document.query_selector_all(selectors) {
		Ok(nodes) => elements(&nodes).collect(),
		Err(error) => {
			error!("Invalid selector {:?}: {:?}", selectors, error);
			Vec::new()
		}
	}
}

pub(crate) fn set_class(element: &Element, class: &str, present: bool) {
	if let Err(error) = element.class_list().toggle_with_force(class, present) {
		error!("Could not toggle class {:?}: {:?}", class, error)
	}
}
