//! Filter state as an ordered sequence of form fields.
//!
//! The page's form is the source of truth. Its serialisation doubles as cache key and history payload.

use crate::Error;
use core::{fmt, iter::FromIterator};
use url::{form_urlencoded, Url};

/// An ordered, possibly duplicate-keyed list of `(name, value)` pairs.
///
/// Field order is significant and preserved exactly, as are repeated names (multi-select controls).
/// [`Display`](`fmt::Display`) produces the canonical `application/x-www-form-urlencoded` encoding,
/// byte-for-byte what [***URLSearchParams***](https://developer.mozilla.org/en-US/docs/Web/API/URLSearchParams) emits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterQuery {
	pairs: Vec<(String, String)>,
}

impl FilterQuery {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a query string. A leading `?` is ignored.
	#[must_use]
	pub fn parse(query: &str) -> Self {
		let query = query.strip_prefix('?').unwrap_or(query);
		form_urlencoded::parse(query.as_bytes()).into_owned().collect()
	}

	pub fn from_pairs<N: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (N, V)>) -> Self {
		pairs.into_iter().map(|(name, value)| (name.into(), value.into())).collect()
	}

	/// Extracts the query of a link target, resolving relative links against `base` first.
	///
	/// # Errors
	///
	/// Iff `href` can't be resolved to a URL.
	pub fn from_href(href: &str, base: &Url) -> Result<Self, Error> {
		let url = base.join(href).map_err(|source| Error::Href { href: href.to_owned(), source })?;
		Ok(url.query_pairs().into_owned().collect())
	}

	#[must_use]
	pub fn pairs(&self) -> &[(String, String)] {
		&self.pairs
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.pairs.is_empty()
	}

	pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.pairs.push((name.into(), value.into()))
	}

	/// All values for `name`, in field order.
	pub fn values<'a>(&'a self, name: &'a str) -> impl 'a + Iterator<Item = &'a str> {
		self.pairs.iter().filter(move |(n, _)| n == name).map(|(_, v)| v.as_str())
	}
}

impl FromIterator<(String, String)> for FilterQuery {
	fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
		Self { pairs: iter.into_iter().collect() }
	}
}

impl fmt::Display for FilterQuery {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&form_urlencoded::Serializer::new(String::new()).extend_pairs(&self.pairs).finish())
	}
}
