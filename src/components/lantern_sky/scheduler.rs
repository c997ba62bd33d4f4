//! Frame loop with an explicit start/stop lifecycle.
//!
//! The scheduler asks a [`FrameHost`] for one callback per display refresh,
//! runs the frame closure, then asks again. Stopping cancels the outstanding
//! request so no further frame runs; dropping the scheduler stops it too.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use log::{error, info};

use super::error::SkyError;

/// Something that can call us back on the next display refresh.
pub trait FrameHost {
	/// Identifies an outstanding request so it can be cancelled.
	type Handle: Copy + fmt::Debug;

	/// Run `callback` once, on the next frame.
	fn request_tick(&self, callback: Box<dyn FnOnce()>) -> Result<Self::Handle, SkyError>;

	/// Forget an outstanding request; its callback must not run.
	fn cancel_tick(&self, handle: Self::Handle);
}

struct Inner<H: FrameHost> {
	host: H,
	frame: RefCell<Box<dyn FnMut()>>,
	running: Cell<bool>,
	pending: Cell<Option<H::Handle>>,
	ticks: Cell<u64>,
}

/// Drives a frame closure once per display refresh until stopped.
pub struct FrameScheduler<H: FrameHost + 'static> {
	inner: Rc<Inner<H>>,
}

impl<H: FrameHost + 'static> FrameScheduler<H> {
	pub fn new(host: H, frame: impl FnMut() + 'static) -> Self {
		Self {
			inner: Rc::new(Inner {
				host,
				frame: RefCell::new(Box::new(frame)),
				running: Cell::new(false),
				pending: Cell::new(None),
				ticks: Cell::new(0),
			}),
		}
	}

	/// Begin requesting frames. Calling this while running does nothing.
	pub fn start(&self) -> Result<(), SkyError> {
		if self.inner.running.get() {
			return Ok(());
		}
		self.inner.running.set(true);
		if let Err(e) = request(&self.inner) {
			self.inner.running.set(false);
			return Err(e);
		}
		info!("lantern-sky: frame loop started");
		Ok(())
	}

	/// Stop the loop and cancel the pending frame, if any.
	pub fn stop(&self) {
		let was_running = self.inner.running.replace(false);
		if let Some(handle) = self.inner.pending.take() {
			self.inner.host.cancel_tick(handle);
		}
		if was_running {
			info!(
				"lantern-sky: frame loop stopped after {} ticks",
				self.inner.ticks.get()
			);
		}
	}

	pub fn is_running(&self) -> bool {
		self.inner.running.get()
	}

	/// Frames run since creation.
	pub fn ticks(&self) -> u64 {
		self.inner.ticks.get()
	}

	pub fn host(&self) -> &H {
		&self.inner.host
	}
}

impl<H: FrameHost + 'static> Drop for FrameScheduler<H> {
	fn drop(&mut self) {
		self.stop();
	}
}

fn request<H: FrameHost + 'static>(inner: &Rc<Inner<H>>) -> Result<(), SkyError> {
	let weak: Weak<Inner<H>> = Rc::downgrade(inner);
	let handle = inner.host.request_tick(Box::new(move || {
		if let Some(inner) = weak.upgrade() {
			run_frame(&inner);
		}
	}))?;
	inner.pending.set(Some(handle));
	Ok(())
}

fn run_frame<H: FrameHost + 'static>(inner: &Rc<Inner<H>>) {
	inner.pending.set(None);
	if !inner.running.get() {
		return;
	}

	{
		let mut frame = inner.frame.borrow_mut();
		(frame.as_mut())();
	}
	inner.ticks.set(inner.ticks.get() + 1);

	if inner.running.get() {
		if let Err(e) = request(inner) {
			error!("lantern-sky: cannot schedule next frame: {e}");
			inner.running.set(false);
		}
	}
}
