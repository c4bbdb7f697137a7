use facets_dom::cache::ResponseCache;
use std::rc::Rc;

#[test]
fn first_response_wins() {
	let mut cache = ResponseCache::new();
	assert!(cache.is_empty());

	let first = cache.insert("/collections/all?section_id=main&".to_owned(), "<p>first</p>");
	let second = cache.insert("/collections/all?section_id=main&".to_owned(), "<p>second</p>");

	assert!(Rc::ptr_eq(&first, &second));
	assert_eq!(&*second, "<p>first</p>");
	assert_eq!(cache.len(), 1);
}

#[test]
fn keys_are_exact_urls() {
	let mut cache = ResponseCache::new();
	cache.insert("/collections/all?section_id=main&filter.color=red".to_owned(), String::from("<p>red</p>"));

	assert!(cache.contains("/collections/all?section_id=main&filter.color=red"));
	assert!(!cache.contains("/collections/all?section_id=main&filter.color=red&"));
	assert_eq!(cache.get("/collections/all?section_id=main&filter.color=red").as_deref(), Some("<p>red</p>"));
	assert_eq!(cache.get("/collections/all?section_id=other&filter.color=red"), None);
}
