use facets_dom::debounce::SubmitDebouncer;

#[test]
fn only_the_newest_ticket_fires() {
	let mut debouncer = SubmitDebouncer::new();

	let first = debouncer.arm("first");
	let second = debouncer.arm("second");
	assert_ne!(first, second);

	assert_eq!(debouncer.take(first), None);
	assert!(debouncer.is_pending());
	assert_eq!(debouncer.take(second), Some("second"));
	assert_eq!(debouncer.take(second), None);
	assert!(!debouncer.is_pending());
}

#[test]
fn cancel_makes_tickets_stale() {
	let mut debouncer = SubmitDebouncer::new();

	let ticket = debouncer.arm(());
	assert!(debouncer.cancel());
	assert!(!debouncer.cancel());
	assert_eq!(debouncer.take(ticket), None);

	let ticket = debouncer.arm(());
	assert_eq!(debouncer.take(ticket), Some(()));
}
