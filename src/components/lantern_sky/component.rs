//! Leptos components wrapping the sky canvas and the theme toggle.
//!
//! The canvas component sizes itself to the window, keeps that size current
//! through the window `resize` event, and drives [`SkyState`] from a
//! `requestAnimationFrame` loop. Everything is torn down when the component is
//! unmounted.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::config::SkyConfig;
use super::error::SkyError;
use super::scheduler::{FrameHost, FrameScheduler};
use super::state::SkyState;
use super::theme::{CYBER_BODY_CLASS, Mode};
use super::viewport::Viewport;

/// `requestAnimationFrame` on the browser window.
pub struct WindowFrameHost {
	window: Window,
}

impl WindowFrameHost {
	pub fn new(window: Window) -> Self {
		Self { window }
	}
}

impl FrameHost for WindowFrameHost {
	type Handle = i32;

	fn request_tick(&self, callback: Box<dyn FnOnce()>) -> Result<i32, SkyError> {
		// A cancelled frame leaks its callback, which only holds a weak reference.
		let function = Closure::once_into_js(move || callback());
		self.window
			.request_animation_frame(function.unchecked_ref())
			.map_err(SkyError::host("requestAnimationFrame"))
	}

	fn cancel_tick(&self, handle: i32) {
		let _ = self.window.cancel_animation_frame(handle);
	}
}

/// Window `resize` subscription, removed on drop.
struct ResizeListener {
	window: Window,
	callback: Closure<dyn FnMut()>,
}

impl ResizeListener {
	fn attach(window: &Window, handler: impl FnMut() + 'static) -> Result<Self, SkyError> {
		let callback = Closure::<dyn FnMut()>::new(handler);
		window
			.add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())
			.map_err(SkyError::host("addEventListener"))?;
		Ok(Self {
			window: window.clone(),
			callback,
		})
	}
}

impl Drop for ResizeListener {
	fn drop(&mut self) {
		let _ = self
			.window
			.remove_event_listener_with_callback("resize", self.callback.as_ref().unchecked_ref());
	}
}

/// Simulation state plus the randomness it draws from.
struct SkyContext {
	state: SkyState,
	rng: SmallRng,
}

/// A running sky. Dropping it stops the frame loop and detaches the resize listener.
struct MountedSky {
	context: Rc<RefCell<SkyContext>>,
	scheduler: FrameScheduler<WindowFrameHost>,
	_resize: ResizeListener,
}

impl MountedSky {
	fn set_mode(&self, mode: Mode) {
		let mut c = self.context.borrow_mut();
		let SkyContext { state, rng } = &mut *c;
		state.set_mode(rng, mode);
	}
}

impl Drop for MountedSky {
	fn drop(&mut self) {
		self.scheduler.stop();
		info!("lantern-sky: unmounted");
	}
}

fn window_size(window: &Window) -> Result<(f64, f64), SkyError> {
	let width = window
		.inner_width()
		.map_err(SkyError::host("innerWidth"))?
		.as_f64()
		.unwrap_or(0.0);
	let height = window
		.inner_height()
		.map_err(SkyError::host("innerHeight"))?
		.as_f64()
		.unwrap_or(0.0);
	Ok((width, height))
}

fn mount(canvas: HtmlCanvasElement, config: SkyConfig, mode: Mode) -> Result<MountedSky, SkyError> {
	let window = web_sys::window().ok_or(SkyError::NoWindow)?;
	let (w, h) = window_size(&window)?;
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);

	let surface: CanvasRenderingContext2d = canvas
		.get_context("2d")
		.map_err(SkyError::host("getContext"))?
		.ok_or(SkyError::NoContext)?
		.dyn_into()
		.map_err(|_| SkyError::NoContext)?;

	let mut rng = SmallRng::from_entropy();
	let mut state = SkyState::new(&mut rng, Viewport::new(w, h), config);
	state.set_mode(&mut rng, mode);
	let context = Rc::new(RefCell::new(SkyContext { state, rng }));

	let (context_resize, window_resize) = (context.clone(), window.clone());
	let resize = ResizeListener::attach(&window, move || match window_size(&window_resize) {
		Ok((nw, nh)) => {
			canvas.set_width(nw as u32);
			canvas.set_height(nh as u32);
			context_resize.borrow_mut().state.resize(nw, nh);
		}
		Err(e) => warn!("lantern-sky: cannot read window size: {e}"),
	})?;

	let context_frame = context.clone();
	let mut surface = surface;
	let scheduler = FrameScheduler::new(WindowFrameHost::new(window), move || {
		let mut c = context_frame.borrow_mut();
		let SkyContext { state, rng } = &mut *c;
		state.tick(rng, &mut surface);
	});
	scheduler.start()?;

	info!("lantern-sky: mounted on a {w}x{h} canvas");
	Ok(MountedSky {
		context,
		scheduler,
		_resize: resize,
	})
}

/// Full-window canvas rendering drifting lanterns and fireworks.
///
/// Place it first inside the page; it sits fixed behind other content and
/// ignores pointer events. The `mode` signal selects the theme: every change
/// respawns the lanterns in the new style at once.
#[component]
pub fn LanternSky(
	#[prop(into)] mode: Signal<Mode>,
	#[prop(optional)] config: SkyConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let mounted = StoredValue::new_local(None::<MountedSky>);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if mounted.with_value(Option::is_some) {
			return;
		}
		match mount(canvas.into(), config.clone(), mode.get_untracked()) {
			Ok(sky) => mounted.set_value(Some(sky)),
			Err(e) => error!("lantern-sky: cannot start: {e}"),
		}
	});

	Effect::new(move |_| {
		let mode = mode.get();
		mounted.with_value(|sky| {
			if let Some(sky) = sky {
				sky.set_mode(mode);
			}
		});
	});

	on_cleanup(move || {
		let _ = mounted.try_update_value(Option::take);
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="lantern-sky-canvas"
			style="position: fixed; inset: 0; display: block; pointer-events: none; z-index: -1;"
		/>
	}
}

fn sync_body_class(mode: Mode) -> Result<(), SkyError> {
	let body = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.body())
		.ok_or(SkyError::NoWindow)?;
	body.class_list()
		.toggle_with_force(CYBER_BODY_CLASS, mode == Mode::Cyber)
		.map_err(SkyError::host("classList.toggle"))?;
	Ok(())
}

/// Button flipping the theme, showing the glyph of the active mode.
///
/// Also mirrors the mode onto `<body>` as a CSS class so page styles can follow.
#[component]
pub fn ThemeToggle(mode: RwSignal<Mode>) -> impl IntoView {
	Effect::new(move |_| {
		if let Err(e) = sync_body_class(mode.get()) {
			warn!("lantern-sky: cannot update body class: {e}");
		}
	});

	view! {
		<button
			type="button"
			class="cyber-trigger"
			title="Toggle theme"
			on:click=move |_| mode.update(|m| *m = m.toggled())
		>
			<span class="lantern-icon">{move || mode.get().icon()}</span>
		</button>
	}
}
