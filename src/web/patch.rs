//! Applies a fetched section fragment to the live document.
//!
//! Only these subtrees are ever touched:
//!
//! - the filter groups, except the content of the one that triggered the render (its selected-count badge is still updated),
//! - the active-filter chip lists,
//! - mirrored controls (mobile toggle and count, sort),
//! - the product grid container,
//! - the result-count readouts.
//!
//! Elements missing on either side are skipped.

use super::{select_all, set_class};
use crate::{loggable, options::Selectors, GroupIndex};
use hashbrown::HashMap;
use tracing::{error, instrument, trace, warn};
use web_sys::{Document, DomParser, Element, SupportedType};

/// Parses `html` into a detached document and patches `document` from it.
#[instrument(skip(document, selectors, html), fields(html.len = html.len()))]
pub fn apply(document: &Document, selectors: &Selectors, html: &str, trigger: Option<&GroupIndex>) {
	let parsed = match parse(html) {
		Ok(parsed) => parsed,
		Err(error) => return error!("Failed to parse fetched fragment {}: {:?}", loggable(html), error),
	};

	render_filter_groups(document, &parsed, selectors, trigger);
	for selector in &selectors.active_facets {
		replace_content(document, &parsed, selector);
	}
	for selector in &selectors.mirrors {
		replace_content(document, &parsed, selector);
	}
	for element in select_all(document, &format!(".{}", selectors.not_enhanced_class)) {
		set_class(&element, &selectors.not_enhanced_class, false);
	}
	render_grid(document, &parsed, selectors);
	render_result_counts(document, &parsed, selectors);
	mark_active_filter_links(document, selectors);
}

fn parse(html: &str) -> Result<Document, wasm_bindgen::JsValue> {
	DomParser::new()?.parse_from_string(html, SupportedType::TextHtml)
}

/// Replaces each filter group's content with its counterpart from `parsed`.
///
/// Groups are matched by index attribute, and by order among groups sharing an index (desktop and mobile variants).
fn render_filter_groups(document: &Document, parsed: &Document, selectors: &Selectors, trigger: Option<&GroupIndex>) {
	let mut occurrences = HashMap::<String, u32>::new();
	for source in select_all(parsed, &selectors.fragment_filter_groups) {
		let index = match source.get_attribute(&selectors.filter_group_index_attribute) {
			Some(index) => index,
			None => {
				warn!("Fetched filter group without {:?}. Skipping.", selectors.filter_group_index_attribute);
				continue;
			}
		};

		let occurrence = occurrences.entry(index.clone()).or_insert(0);
		let target = select_all(document, &attribute_selector(&selectors.filter_group, &selectors.filter_group_index_attribute, &index)).into_iter().nth(*occurrence as usize);
		*occurrence += 1;

		let target = match target {
			Some(target) => target,
			None => {
				trace!("No live filter group {:?}. Skipping.", index);
				continue;
			}
		};

		if trigger.map_or(false, |trigger| trigger.0 == index) {
			// Keeps the open state, focus and scroll position of the control being used.
			render_selected_count(&source, &target, selectors);
		} else {
			target.set_inner_html(&source.inner_html());
		}
	}
}

/// Copies only the selected-count badge of a filter group.
fn render_selected_count(source: &Element, target: &Element, selectors: &Selectors) {
	let find = |group: &Element| selectors.selected_count.iter().find_map(|selector| group.query_selector(selector).ok().flatten());
	match (find(source), find(target)) {
		(Some(source), Some(target)) => target.set_outer_html(&source.outer_html()),
		_ => trace!("No selected-count badge to update."),
	}
}

fn replace_content(document: &Document, parsed: &Document, selector: &str) {
	let source = match parsed.query_selector(selector) {
		Ok(Some(source)) => source,
		Ok(None) => return,
		Err(error) => return error!("Invalid selector {:?}: {:?}", selector, error),
	};
	match document.query_selector(selector) {
		Ok(Some(target)) => target.set_inner_html(&source.inner_html()),
		Ok(None) => trace!("{:?} is not on this page.", selector),
		Err(error) => error!("Invalid selector {:?}: {:?}", selector, error),
	}
}

fn render_grid(document: &Document, parsed: &Document, selectors: &Selectors) {
	let id = &selectors.grid_container_id;
	match (parsed.get_element_by_id(id), document.get_element_by_id(id)) {
		(Some(source), Some(target)) => target.set_inner_html(&source.inner_html()),
		(None, _) => warn!("Fetched fragment has no #{}.", id),
		(_, None) => warn!("Page has no #{}.", id),
	}
}

/// Every readout receives the count of the first one in the fragment.
fn render_result_counts(document: &Document, parsed: &Document, selectors: &Selectors) {
	let source = match selectors.result_count_ids.first().and_then(|id| parsed.get_element_by_id(id)) {
		Some(source) => source.inner_html(),
		None => return trace!("Fetched fragment has no result count."),
	};
	for id in &selectors.result_count_ids {
		if let Some(target) = document.get_element_by_id(id) {
			target.set_inner_html(&source);
			set_class(&target, &selectors.loading_class, false);
		}
	}
}

/// Active-filter links act as buttons.
pub(crate) fn mark_active_filter_links(document: &Document, selectors: &Selectors) {
	for link in select_all(document, &selectors.active_filter_link) {
		if let Err(error) = link.set_attribute("role", "button") {
			error!("Could not set `role` on active filter link: {:?}", error)
		}
	}
}

fn attribute_selector(base: &str, attribute: &str, value: &str) -> String {
	format!("{}[{}=\"{}\"]", base, attribute, value.replace('\\', "\\\\").replace('"', "\\\""))
}
