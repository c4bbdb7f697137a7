use thiserror::Error;
use wasm_bindgen::JsValue;

/// Everything that can go wrong while attaching to a page or fetching a fragment.
///
/// None of these are surfaced to the shopper. Fetch failures leave the page as it was,
/// and everything else is reported through [`tracing`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
	/// A JavaScript exception, captured as its debug representation.
	#[error("JavaScript exception: {0}")]
	Js(String),

	#[error("server responded with HTTP status {0}")]
	Status(u16),

	#[error("response body was not text")]
	NotText,

	#[error("could not resolve link {href:?}: {source}")]
	Href {
		href: String,
		#[source]
		source: url::ParseError,
	},

	#[error("required element {0:?} not found")]
	MissingElement(String),

	#[error("invalid options: {0}")]
	Options(String),

	#[error("no `window` available")]
	NoWindow,
}

impl From<JsValue> for Error {
	fn from(value: JsValue) -> Self {
		Self::Js(format!("{:?}", value))
	}
}

impl From<serde_wasm_bindgen::Error> for Error {
	fn from(error: serde_wasm_bindgen::Error) -> Self {
		Self::Options(error.to_string())
	}
}

impl From<Error> for JsValue {
	fn from(error: Error) -> Self {
		js_sys::Error::new(&error.to_string()).into()
	}
}
