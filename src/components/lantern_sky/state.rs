//! Simulation state for the whole sky.
//!
//! Owns the particle pool, the firework registry, the current theme mode and
//! the cached viewport. Created once when the canvas mounts, then mutated each
//! frame by [`SkyState::tick`] and between frames by the theme toggle.

use log::{debug, trace};
use rand::Rng;

use super::config::SkyConfig;
use super::fireworks::FireworkRegistry;
use super::particles::ParticlePool;
use super::render::Renderer;
use super::theme::Mode;
use super::viewport::Viewport;

/// What a single tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
	/// The viewport had no area; nothing was updated or drawn.
	Skipped,
	/// A full update and draw pass ran.
	Drawn {
		/// Particles recycled this tick.
		recycled: usize,
		/// Whether a firework was launched.
		launched: bool,
		/// Finished fireworks removed.
		removed: usize,
	},
}

/// Everything the effect mutates from frame to frame.
pub struct SkyState {
	viewport: Viewport,
	mode: Mode,
	config: SkyConfig,
	pool: ParticlePool,
	fireworks: FireworkRegistry,
	ticks: u64,
}

impl SkyState {
	/// Start in ambient mode with a full particle pool and no fireworks.
	pub fn new<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport, config: SkyConfig) -> Self {
		Self {
			pool: ParticlePool::new(rng, &viewport),
			fireworks: FireworkRegistry::new(),
			mode: Mode::Ambient,
			viewport,
			config,
			ticks: 0,
		}
	}

	pub fn mode(&self) -> Mode {
		self.mode
	}

	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	pub fn config(&self) -> &SkyConfig {
		&self.config
	}

	pub fn pool(&self) -> &ParticlePool {
		&self.pool
	}

	pub fn fireworks(&self) -> &FireworkRegistry {
		&self.fireworks
	}

	/// Number of ticks that were actually drawn.
	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	/// Run one frame: clear, particles, maybe launch, fireworks.
	pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, renderer: &mut impl Renderer) -> TickOutcome {
		if !self.viewport.is_drawable() {
			trace!(
				"lantern-sky: skipping tick, viewport is {}x{}",
				self.viewport.width, self.viewport.height
			);
			return TickOutcome::Skipped;
		}

		renderer.clear(self.viewport.width, self.viewport.height);

		let recycled = self
			.pool
			.update(rng, self.mode, &self.viewport, &self.config);
		self.pool.draw(renderer);

		let launched = self.fireworks.maybe_spawn(
			rng,
			self.mode,
			&self.viewport,
			self.config.firework_chance,
		);
		let removed = self.fireworks.update_and_draw(rng, &self.config, renderer);

		self.ticks += 1;
		TickOutcome::Drawn {
			recycled,
			launched,
			removed,
		}
	}

	/// Flip between ambient and cyber mode. Returns the new mode.
	pub fn toggle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Mode {
		let next = self.mode.toggled();
		self.set_mode(rng, next);
		next
	}

	/// Switch to `mode`, respawning the whole particle pool so the change is
	/// visible at once. Fireworks already in flight keep their colors.
	/// Returns `false` when already in `mode`.
	pub fn set_mode<R: Rng + ?Sized>(&mut self, rng: &mut R, mode: Mode) -> bool {
		if self.mode == mode {
			return false;
		}
		debug!("lantern-sky: switching {:?} -> {:?}", self.mode, mode);
		self.mode = mode;
		self.pool.reset_all(rng, mode, &self.viewport);
		true
	}

	/// Update the cached surface size used by spawning.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport = Viewport::new(width, height);
	}
}
