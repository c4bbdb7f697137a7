//! Runtime configuration, passed in from JavaScript when attaching.
//!
//! Every field has a default matching the stock theme markup, so `undefined` is a valid configuration.

use core::time::Duration;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
	/// Quiet period for text, range, checkbox and radio input, in milliseconds.
	pub debounce_ms: u32,
	/// Form field name of the sort control, which submits without debouncing.
	pub sort_name: String,
	pub selectors: Selectors,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			debounce_ms: 500,
			sort_name: "sort_by".to_owned(),
			selectors: Selectors::default(),
		}
	}
}

impl Options {
	#[must_use]
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms.into())
	}
}

/// The DOM contract: ids, selectors and classes the coordinator reads and patches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Selectors {
	/// Id of the element carrying the section id.
	pub product_grid_id: String,
	pub section_id_attribute: String,
	pub grid_container_id: String,
	/// Result-count readouts. The first one is the source of the fetched count.
	pub result_count_ids: Vec<String>,
	pub filter_group: String,
	pub filter_group_index_attribute: String,
	/// Filter groups inside a fetched fragment.
	pub fragment_filter_groups: String,
	/// Selected-count badge inside a filter group, tried in order.
	pub selected_count: Vec<String>,
	pub active_facets: Vec<String>,
	/// Mirrored controls that are replaced wholesale when present.
	pub mirrors: Vec<String>,
	pub not_enhanced_class: String,
	pub spinner: String,
	pub facets_container: String,
	pub no_js_class: String,
	pub active_filter_control: String,
	pub active_filter_link: String,
	pub loading_class: String,
	pub hidden_class: String,
	pub disabled_class: String,
}

impl Default for Selectors {
	fn default() -> Self {
		fn owned(values: &[&str]) -> Vec<String> {
			values.iter().map(|&value| value.to_owned()).collect()
		}

		Self {
			product_grid_id: "product-grid".to_owned(),
			section_id_attribute: "data-id".to_owned(),
			grid_container_id: "ProductGridContainer".to_owned(),
			result_count_ids: owned(&["ProductCount", "ProductCountDesktop"]),
			filter_group: ".js-filter".to_owned(),
			filter_group_index_attribute: "data-index".to_owned(),
			fragment_filter_groups: "#FacetsWrapperDesktop .js-filter, #FacetsWrapperMobile .js-filter".to_owned(),
			selected_count: owned(&[".facets__selected", ".mobile-facets__count"]),
			active_facets: owned(&[".active-facets-mobile", ".active-facets-desktop"]),
			mirrors: owned(&[".mobile-facets__open", ".mobile-facets__count", ".sorting"]),
			not_enhanced_class: "no-js-hidden".to_owned(),
			spinner: ".facets-container .loading-overlay__spinner".to_owned(),
			facets_container: ".facets-container".to_owned(),
			no_js_class: "no-js".to_owned(),
			active_filter_control: ".js-facet-remove".to_owned(),
			active_filter_link: "facet-remove a".to_owned(),
			loading_class: "loading".to_owned(),
			hidden_class: "hidden".to_owned(),
			disabled_class: "disabled".to_owned(),
		}
	}
}
