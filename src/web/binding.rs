//! Event listeners translating DOM events into [`Event`]s.
//!
//! Everything is delegated from long-lived ancestors, since patching replaces the elements that are actually interacted with.

use super::{history_state, serialize_form, Dispatcher};
use crate::{options::Options, Error, Event, GroupIndex};
use core::fmt;
use tracing::{error, trace, warn};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Document, Element, EventTarget, HtmlFormElement, KeyboardEvent, PopStateEvent, Window};

/// An event listener that is removed again on drop.
pub(crate) struct Listener {
	target: EventTarget,
	name: &'static str,
	closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl Listener {
	fn add(target: &EventTarget, name: &'static str, handler: impl 'static + FnMut(web_sys::Event)) -> Result<Self, Error> {
		let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
		target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
		trace!("Added {:?} listener.", name);
		Ok(Self { target: target.clone(), name, closure })
	}
}

impl Drop for Listener {
	fn drop(&mut self) {
		match self.target.remove_event_listener_with_callback(self.name, self.closure.as_ref().unchecked_ref()) {
			Ok(()) => trace!("Removed {:?} listener.", self.name),
			Err(error) => error!("Failed to remove event listener {:?}: {:?}", self.name, error),
		}
	}
}

impl fmt::Debug for Listener {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Listener").field("name", &self.name).finish_non_exhaustive()
	}
}

pub(crate) fn bind(window: &Window, document: &Document, root: &Element, form: &HtmlFormElement, options: &Options, dispatcher: &Dispatcher) -> Result<Vec<Listener>, Error> {
	let selectors = &options.selectors;
	let mut listeners = Vec::with_capacity(5);

	// Text, range, checkbox and radio input is debounced.
	listeners.push(Listener::add(form, "input", {
		let dispatcher = dispatcher.clone();
		let sort_name = options.sort_name.clone();
		let group = group_resolver(options);
		move |event| {
			if named(event.target(), &sort_name) {
				return trace!("Sort input is submitted on `change`.");
			}
			dispatcher.dispatch(Event::Input { trigger: group(event.target()) })
		}
	})?);

	// Sorting is a discrete action and skips debouncing.
	listeners.push(Listener::add(root, "change", {
		let dispatcher = dispatcher.clone();
		let sort_name = options.sort_name.clone();
		let group = group_resolver(options);
		let form = form.clone();
		move |event| {
			if !named(event.target(), &sort_name) {
				return;
			}
			event.prevent_default();
			submit(&dispatcher, &form, group(event.target()))
		}
	})?);

	listeners.push(Listener::add(form, "submit", {
		let dispatcher = dispatcher.clone();
		let form = form.clone();
		move |event| {
			event.prevent_default();
			submit(&dispatcher, &form, None)
		}
	})?);

	// Active-filter chips behave like buttons: click, or Space while focused.
	listeners.push(Listener::add(document, "click", {
		let dispatcher = dispatcher.clone();
		let link_selector = selectors.active_filter_link.clone();
		move |event| {
			if let Some(link) = closest(event.target(), &link_selector) {
				event.prevent_default();
				activate_filter_link(&dispatcher, &link)
			}
		}
	})?);
	listeners.push(Listener::add(document, "keyup", {
		let dispatcher = dispatcher.clone();
		let link_selector = selectors.active_filter_link.clone();
		move |event| {
			if let Some(link) = closest(event.target(), &link_selector) {
				event.prevent_default();
				let is_space = event.dyn_ref::<KeyboardEvent>().map_or(false, |event| event.code().eq_ignore_ascii_case("space"));
				if is_space {
					activate_filter_link(&dispatcher, &link)
				}
			}
		}
	})?);

	listeners.push(Listener::add(window, "popstate", {
		let dispatcher = dispatcher.clone();
		move |event| {
			let state = event.dyn_ref::<PopStateEvent>().and_then(|event| history_state(event.state()));
			dispatcher.dispatch(Event::HistoryNavigated { state })
		}
	})?);

	Ok(listeners)
}

fn submit(dispatcher: &Dispatcher, form: &HtmlFormElement, trigger: Option<GroupIndex>) {
	match serialize_form(form) {
		Ok(query) => dispatcher.dispatch(Event::Submit { query, trigger }),
		Err(error) => error!("Failed to serialise the filter form: {}", error),
	}
}

fn activate_filter_link(dispatcher: &Dispatcher, link: &Element) {
	match link.get_attribute("href") {
		Some(href) => dispatcher.dispatch(Event::ActiveFilterActivated { href }),
		None => warn!("Active filter link without `href`. Ignoring."),
	}
}

/// Resolves an event target to the index of its nearest filter group.
fn group_resolver(options: &Options) -> impl Fn(Option<EventTarget>) -> Option<GroupIndex> {
	let group_selector = options.selectors.filter_group.clone();
	let index_attribute = options.selectors.filter_group_index_attribute.clone();
	move |target| closest(target, &group_selector)?.get_attribute(&index_attribute).map(GroupIndex)
}

fn closest(target: Option<EventTarget>, selectors: &str) -> Option<Element> {
	let element = target?.dyn_into::<Element>().ok()?;
	match element.closest(selectors) {
		Ok(found) => found,
		Err(error) => {
			error!("Invalid selector {:?}: {:?}", selectors, error);
			None
		}
	}
}

fn named(target: Option<EventTarget>, name: &str) -> bool {
	target.and_then(|target| target.dyn_into::<Element>().ok()).and_then(|element| element.get_attribute("name")).map_or(false, |n| n == name)
}
