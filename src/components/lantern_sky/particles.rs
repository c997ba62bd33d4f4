//! Ambient lantern particles.
//!
//! Particles are never destroyed: once one burns out or drifts off the top of
//! the screen it is respawned in place below the bottom edge, so the pool size
//! never changes.

use std::ops::Range;

use rand::Rng;

use super::config::{PARTICLE_COUNT, SkyConfig};
use super::render::{Renderer, Shape};
use super::theme::{Color, Mode};
use super::viewport::Viewport;

/// Range `life` is drawn from on every (re)spawn.
pub const LIFE_SPAN: Range<i32> = 50..150;
/// Life at which a particle is fully opaque.
const FULL_LIFE: f64 = 100.0;
/// Particles above this line are recycled.
const TOP_EXIT: f64 = -10.0;
/// Respawned particles start this far below the bottom edge.
const BOTTOM_ENTRY: f64 = 10.0;

/// A single floating lantern.
#[derive(Clone, Debug)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub size: f64,
	pub color: Color,
	pub alpha: f64,
	/// Ticks left before the particle is recycled.
	pub life: i32,
	/// Mode captured at the last (re)spawn.
	pub mode: Mode,
}

impl Particle {
	/// Create a particle for `mode`.
	///
	/// With `initial_placement` the particle appears anywhere in the viewport,
	/// otherwise just below the bottom edge so it drifts in from off-screen.
	pub fn spawn<R: Rng + ?Sized>(
		rng: &mut R,
		mode: Mode,
		viewport: &Viewport,
		initial_placement: bool,
	) -> Self {
		let style = mode.style();
		let y = if initial_placement {
			viewport.random_y(rng)
		} else {
			viewport.height + BOTTOM_ENTRY
		};

		Self {
			x: viewport.random_x(rng),
			y,
			vx: rng.gen_range(-1.0..1.0),
			vy: -rng.gen_range(style.particle_rise.clone()),
			size: rng.gen_range(style.particle_size.clone()),
			color: style.particle_palette.sample(rng),
			alpha: 1.0,
			life: rng.gen_range(LIFE_SPAN),
			mode,
		}
	}

	/// Whether the particle is due to be recycled on its next update.
	pub fn is_spent(&self) -> bool {
		self.life <= 0 || self.y < TOP_EXIT
	}

	/// Advance one tick. Returns `true` when the particle was recycled instead.
	///
	/// `mode` is the current theme and only matters for recycling; drift and
	/// glitching follow the mode the particle was spawned with.
	pub fn update<R: Rng + ?Sized>(
		&mut self,
		rng: &mut R,
		mode: Mode,
		viewport: &Viewport,
		config: &SkyConfig,
	) -> bool {
		if self.is_spent() {
			*self = Self::spawn(rng, mode, viewport, false);
			return true;
		}

		self.x += self.vx;
		self.y += self.vy;
		self.life -= 1;
		self.alpha = (self.life as f64 / FULL_LIFE).clamp(0.0, 1.0);

		if self.mode == Mode::Cyber && rng.gen_bool(config.glitch_chance) {
			self.x += rng.gen_range(-1.0..1.0) * config.glitch_amplitude;
		}

		false
	}

	pub fn draw(&self, renderer: &mut impl Renderer) {
		let style = self.mode.style();
		renderer.set_glow(self.color, style.particle_glow);
		renderer.fill_shape(
			Shape::sprite(style.particle_sprite, self.size),
			self.x,
			self.y,
			self.color,
			self.alpha,
		);
	}
}

/// Fixed-size pool of lantern particles.
pub struct ParticlePool {
	particles: Vec<Particle>,
}

impl ParticlePool {
	/// Fill the pool with ambient particles scattered over the viewport.
	pub fn new<R: Rng + ?Sized>(rng: &mut R, viewport: &Viewport) -> Self {
		let particles = (0..PARTICLE_COUNT)
			.map(|_| Particle::spawn(rng, Mode::Ambient, viewport, true))
			.collect();
		Self { particles }
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	/// Update every particle. Returns how many were recycled.
	pub fn update<R: Rng + ?Sized>(
		&mut self,
		rng: &mut R,
		mode: Mode,
		viewport: &Viewport,
		config: &SkyConfig,
	) -> usize {
		self.particles
			.iter_mut()
			.map(|p| p.update(rng, mode, viewport, config))
			.filter(|&recycled| recycled)
			.count()
	}

	pub fn draw(&self, renderer: &mut impl Renderer) {
		for p in &self.particles {
			p.draw(renderer);
		}
	}

	/// Respawn every particle in `mode`, scattered over the viewport, so a
	/// theme switch shows up immediately.
	pub fn reset_all<R: Rng + ?Sized>(&mut self, rng: &mut R, mode: Mode, viewport: &Viewport) {
		for p in &mut self.particles {
			*p = Particle::spawn(rng, mode, viewport, true);
		}
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::super::render::recording::{DrawCall, RecordingRenderer};
	use super::*;

	fn viewport() -> Viewport {
		Viewport::new(800.0, 600.0)
	}

	fn assert_in_mode_bounds(p: &Particle, mode: Mode) {
		let style = mode.style();
		assert_eq!(p.mode, mode);
		assert!(style.particle_size.contains(&p.size), "size {}", p.size);
		assert!(style.particle_rise.contains(&-p.vy), "vy {}", p.vy);
		assert!((-1.0..1.0).contains(&p.vx));
		assert!(style.particle_palette.contains(p.color), "{:?}", p.color);
		assert!(LIFE_SPAN.contains(&p.life));
	}

	#[test]
	fn spawn_respects_mode_tables() {
		let mut rng = StdRng::seed_from_u64(3);
		let vp = viewport();
		for mode in [Mode::Ambient, Mode::Cyber] {
			for _ in 0..200 {
				let p = Particle::spawn(&mut rng, mode, &vp, true);
				assert_in_mode_bounds(&p, mode);
				assert!((0.0..800.0).contains(&p.x));
				assert!((0.0..600.0).contains(&p.y));
				assert_eq!(p.alpha, 1.0);
			}
		}
	}

	#[test]
	fn respawn_enters_from_below() {
		let mut rng = StdRng::seed_from_u64(4);
		let p = Particle::spawn(&mut rng, Mode::Ambient, &viewport(), false);
		assert_eq!(p.y, 610.0);
	}

	#[test]
	fn update_moves_and_fades() {
		let mut rng = StdRng::seed_from_u64(5);
		let config = SkyConfig::default();
		let mut p = Particle::spawn(&mut rng, Mode::Ambient, &viewport(), true);
		p.x = 100.0;
		p.y = 300.0;
		p.vx = 0.5;
		p.vy = -3.0;
		p.life = 80;

		assert!(!p.update(&mut rng, Mode::Ambient, &viewport(), &config));
		assert_eq!(p.x, 100.5);
		assert_eq!(p.y, 297.0);
		assert_eq!(p.life, 79);
		assert!((p.alpha - 0.79).abs() < 1e-12);
	}

	#[test]
	fn burns_out_after_its_life_then_recycles() {
		let mut rng = StdRng::seed_from_u64(6);
		let config = SkyConfig::default();
		let vp = viewport();
		let mut p = Particle::spawn(&mut rng, Mode::Ambient, &vp, true);
		p.y = 300.0;
		p.vy = 0.0;
		p.life = 50;

		for _ in 0..50 {
			assert!(!p.update(&mut rng, Mode::Ambient, &vp, &config));
		}
		assert_eq!(p.life, 0);
		assert_eq!(p.alpha, 0.0);

		assert!(p.update(&mut rng, Mode::Ambient, &vp, &config));
		assert!(p.life >= 50);
		assert_eq!(p.y, vp.height + BOTTOM_ENTRY);
		assert_eq!(p.alpha, 1.0);
	}

	#[test]
	fn leaving_the_top_recycles_in_current_mode() {
		let mut rng = StdRng::seed_from_u64(8);
		let config = SkyConfig::default();
		let vp = viewport();
		let mut p = Particle::spawn(&mut rng, Mode::Ambient, &vp, true);
		p.y = -11.0;

		assert!(p.update(&mut rng, Mode::Cyber, &vp, &config));
		assert_in_mode_bounds(&p, Mode::Cyber);
	}

	#[test]
	fn glitch_only_applies_to_cyber_particles() {
		let mut rng = StdRng::seed_from_u64(9);
		let config = SkyConfig {
			glitch_chance: 1.0,
			..SkyConfig::default()
		};
		let vp = viewport();

		let mut calm = Particle::spawn(&mut rng, Mode::Ambient, &vp, true);
		calm.vx = 0.0;
		let x = calm.x;
		calm.update(&mut rng, Mode::Cyber, &vp, &config);
		assert_eq!(calm.x, x);

		let mut jumpy = Particle::spawn(&mut rng, Mode::Cyber, &vp, true);
		jumpy.vx = 0.0;
		let x = jumpy.x;
		jumpy.update(&mut rng, Mode::Cyber, &vp, &config);
		assert_ne!(jumpy.x, x);
		assert!((jumpy.x - x).abs() <= config.glitch_amplitude);
	}

	#[test]
	fn ambient_particles_glow_and_cyber_do_not() {
		let mut rng = StdRng::seed_from_u64(10);
		let vp = viewport();
		let mut renderer = RecordingRenderer::default();

		Particle::spawn(&mut rng, Mode::Ambient, &vp, true).draw(&mut renderer);
		Particle::spawn(&mut rng, Mode::Cyber, &vp, true).draw(&mut renderer);

		assert!(matches!(renderer.calls[0], DrawCall::Glow(_, r) if r == 10.0));
		assert!(matches!(
			renderer.calls[1],
			DrawCall::Fill {
				shape: Shape::Circle { .. },
				..
			}
		));
		assert!(matches!(renderer.calls[2], DrawCall::Glow(_, r) if r == 0.0));
		assert!(matches!(
			renderer.calls[3],
			DrawCall::Fill {
				shape: Shape::Rect { .. },
				..
			}
		));
	}

	#[test]
	fn pool_starts_ambient_and_switches_wholesale() {
		let mut rng = StdRng::seed_from_u64(11);
		let vp = viewport();
		let mut pool = ParticlePool::new(&mut rng, &vp);
		assert_eq!(pool.len(), PARTICLE_COUNT);
		assert!(pool.particles().iter().all(|p| p.mode == Mode::Ambient));

		pool.reset_all(&mut rng, Mode::Cyber, &vp);
		assert_eq!(pool.len(), PARTICLE_COUNT);
		for p in pool.particles() {
			assert_in_mode_bounds(p, Mode::Cyber);
			assert!(p.y < vp.height);
		}
	}

	#[test]
	fn pool_draws_every_particle() {
		let mut rng = StdRng::seed_from_u64(12);
		let pool = ParticlePool::new(&mut rng, &viewport());
		let mut renderer = RecordingRenderer::default();
		pool.draw(&mut renderer);
		assert_eq!(renderer.fills().count(), PARTICLE_COUNT);
	}

	proptest! {
		#[test]
		fn pool_invariants_hold(seed in any::<u64>(), ops in prop::collection::vec(0u8..3, 1..200)) {
			let mut rng = StdRng::seed_from_u64(seed);
			let vp = viewport();
			let config = SkyConfig::default();
			let mut pool = ParticlePool::new(&mut rng, &vp);
			let mut mode = Mode::Ambient;

			for op in ops {
				match op {
					0 => {
						mode = mode.toggled();
						pool.reset_all(&mut rng, mode, &vp);
						prop_assert!(pool.particles().iter().all(|p| p.mode == mode));
					}
					_ => {
						let before: Vec<(i32, bool)> =
							pool.particles().iter().map(|p| (p.life, p.is_spent())).collect();
						pool.update(&mut rng, mode, &vp, &config);
						for (p, (life, spent)) in pool.particles().iter().zip(before) {
							prop_assert!((0.0..=1.0).contains(&p.alpha));
							if spent {
								prop_assert!(LIFE_SPAN.contains(&p.life));
							} else {
								prop_assert_eq!(p.life, life - 1);
							}
						}
					}
				}
				prop_assert_eq!(pool.len(), PARTICLE_COUNT);
			}
		}
	}
}
