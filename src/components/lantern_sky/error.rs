//! Error types for mounting and driving the sky.

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Errors surfaced while setting up or scheduling the effect.
///
/// None of these occur per tick: a sky that started successfully keeps
/// running until stopped.
#[derive(Debug, Error)]
pub enum SkyError {
	/// No `window`/`document` (not running in a browser main thread).
	#[error("no browser window available")]
	NoWindow,

	/// The canvas refused to hand out a 2D rendering context.
	#[error("canvas 2d context unavailable")]
	NoContext,

	/// A host (JavaScript) call failed.
	#[error("{op} failed: {message}")]
	Host {
		/// The JS API that was called.
		op: &'static str,
		/// Whatever the host reported.
		message: String,
	},

	/// A tuning parameter is out of range.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	/// The configuration document is not valid JSON for [`SkyConfig`](super::SkyConfig).
	#[error("malformed configuration: {0}")]
	MalformedConfig(#[from] serde_json::Error),
}

impl SkyError {
	/// Adapter for `map_err` on `Result<_, JsValue>`.
	pub(crate) fn host(op: &'static str) -> impl FnOnce(JsValue) -> Self {
		move |value| SkyError::Host {
			op,
			message: describe_js(&value),
		}
	}
}

fn describe_js(value: &JsValue) -> String {
	if let Some(err) = value.dyn_ref::<js_sys::Error>() {
		return String::from(err.message());
	}
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
