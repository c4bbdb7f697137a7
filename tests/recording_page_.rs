#![allow(dead_code)]

use core::time::Duration;
use facets_dom::{debounce::DebounceTicket, history::HistoryState, GroupIndex, Page, RenderCoordinator, SectionDescriptor};
use url::Url;

pub const PAGE_URL: &str = "https://shop.example/collections/all?sort_by=price-ascending";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
	ShowLoading,
	ClearLoading,
	Fetch(String),
	Patch(String, Option<GroupIndex>),
	PushHistory(HistoryState, String),
	ActiveFiltersDisabled(bool),
	ArmDebounce(DebounceTicket),
}

/// A [`Page`] that only records what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingPage {
	pub calls: Vec<Call>,
}

impl Page for RecordingPage {
	fn show_loading(&mut self) {
		self.calls.push(Call::ShowLoading)
	}

	fn clear_loading(&mut self) {
		self.calls.push(Call::ClearLoading)
	}

	fn fetch(&mut self, url: &str) {
		self.calls.push(Call::Fetch(url.to_owned()))
	}

	fn patch(&mut self, html: &str, trigger: Option<&GroupIndex>) {
		self.calls.push(Call::Patch(html.to_owned(), trigger.cloned()))
	}

	fn push_history(&mut self, state: &HistoryState, url: &str) {
		self.calls.push(Call::PushHistory(state.clone(), url.to_owned()))
	}

	fn set_active_filters_disabled(&mut self, disabled: bool) {
		self.calls.push(Call::ActiveFiltersDisabled(disabled))
	}

	fn arm_debounce(&mut self, ticket: DebounceTicket, _delay: Duration) {
		self.calls.push(Call::ArmDebounce(ticket))
	}
}

impl RecordingPage {
	pub fn fetches(&self) -> Vec<&str> {
		self.calls
			.iter()
			.filter_map(|call| match call {
				Call::Fetch(url) => Some(url.as_str()),
				_ => None,
			})
			.collect()
	}

	pub fn patches(&self) -> Vec<(&str, Option<&GroupIndex>)> {
		self.calls
			.iter()
			.filter_map(|call| match call {
				Call::Patch(html, trigger) => Some((html.as_str(), trigger.as_ref())),
				_ => None,
			})
			.collect()
	}

	pub fn pushes(&self) -> Vec<(&str, &str)> {
		self.calls
			.iter()
			.filter_map(|call| match call {
				Call::PushHistory(state, url) => Some((state.search_params.as_str(), url.as_str())),
				_ => None,
			})
			.collect()
	}

	pub fn tickets(&self) -> Vec<DebounceTicket> {
		self.calls
			.iter()
			.filter_map(|call| match call {
				Call::ArmDebounce(ticket) => Some(*ticket),
				_ => None,
			})
			.collect()
	}

	pub fn count(&self, call: &Call) -> usize {
		self.calls.iter().filter(|c| *c == call).count()
	}
}

pub fn coordinator() -> RenderCoordinator<RecordingPage> {
	RenderCoordinator::new(
		RecordingPage::default(),
		Url::parse(PAGE_URL).unwrap(),
		vec![SectionDescriptor { section_id: "main".to_owned() }],
		Duration::from_millis(500),
	)
}

pub fn request(search_params: &str) -> String {
	format!("/collections/all?section_id=main&{}", search_params)
}
