//! lantern-sky: ambient lantern particles and fireworks behind a page.
//!
//! This crate provides a WASM canvas effect with two switchable themes: warm
//! drifting lanterns, and a faster neon "cyber" look.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

// Selects the browser entropy source for `rand` on wasm.
use getrandom as _;

pub mod components;

pub use components::lantern_sky::{LanternSky, Mode, SkyConfig, ThemeToggle};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("lantern-sky: logging initialized");
}

/// Load tuning overrides from a script element with id="sky-config".
/// Expected format: JSON object with any subset of the [`SkyConfig`] fields.
fn load_sky_config() -> Option<SkyConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("sky-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match SkyConfig::from_json(&json_text) {
		Ok(config) => {
			info!("lantern-sky: loaded config {:?}", config);
			Some(config)
		}
		Err(e) => {
			warn!("lantern-sky: ignoring config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Renders the sky behind a title overlay with the theme toggle.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_sky_config().unwrap_or_default();
	let mode = RwSignal::new(Mode::Ambient);

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Lantern Sky" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<LanternSky mode=mode config=config />
		<div id="app" class="sky-overlay">
			<ThemeToggle mode=mode />
		</div>
	}
}
