#![doc(html_root_url = "https://docs.rs/facets-dom/0.0.1")]
#![warn(clippy::pedantic)]

//! Client-side faceted filtering for server-rendered product listings.
//!
//! Filter form changes are turned into per-section fragment requests, served from an in-memory cache where possible,
//! and patched into the live document without touching the filter group the shopper is using.
//! Each user-driven change becomes a history entry, and back/forward navigation replays them.
//!
//! The state machine ([`RenderCoordinator`]) is independent of the browser and is driven through [`Event`]s.
//! [`FacetFilters`] attaches it to a live page.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod cache;
pub mod coordinator;
pub mod debounce;
mod error;
pub mod history;
pub mod options;
pub mod query;
pub mod web;

pub use coordinator::{Event, GroupIndex, Page, RenderCoordinator, SectionDescriptor};
pub use error::Error;
pub use options::Options;
pub use query::FilterQuery;
pub use web::FacetFilters;

/// Query strings and markup reveal what a shopper filtered for, so they are only logged with `dangerous-logging`.
pub(crate) fn loggable(value: &str) -> &str {
	if cfg!(feature = "dangerous-logging") {
		value
	} else {
		"<redacted>"
	}
}

/// Installs a [`tracing`] subscriber that logs to the browser console. Does nothing if one is already installed.
#[cfg(feature = "console-logging")]
#[wasm_bindgen::prelude::wasm_bindgen(js_name = initConsoleLogging)]
pub fn init_console_logging() {
	if tracing_wasm::try_set_as_global_default().is_err() {
		tracing::debug!("A global `tracing` subscriber is already installed.");
	}
}
