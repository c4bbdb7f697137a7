use facets_dom::history::{history_url, HistoryState, HistorySync};

fn state(search_params: &str) -> HistoryState {
	HistoryState { search_params: search_params.to_owned() }
}

#[test]
fn urls() {
	assert_eq!(history_url("/collections/all", ""), "/collections/all");
	assert_eq!(history_url("/collections/all", "filter.color=red"), "/collections/all?filter.color=red");
}

#[test]
fn navigation_replays_state_or_initial_query() {
	let mut history = HistorySync::new("sort_by=price-ascending".to_owned());
	assert_eq!(history.applied(), "sort_by=price-ascending");

	assert_eq!(history.resolve_navigation(Some(&state("filter.color=red"))).as_deref(), Some("filter.color=red"));

	history.record_applied("filter.color=red".to_owned());
	assert_eq!(history.resolve_navigation(None).as_deref(), Some("sort_by=price-ascending"));
	assert_eq!(history.initial(), "sort_by=price-ascending");
}

#[test]
fn echoes_are_ignored() {
	let mut history = HistorySync::new(String::new());
	assert_eq!(history.resolve_navigation(None), None);

	history.record_applied("filter.color=red".to_owned());
	assert_eq!(history.resolve_navigation(Some(&state("filter.color=red"))), None);
	assert_eq!(history.resolve_navigation(Some(&state(""))).as_deref(), Some(""));
}
