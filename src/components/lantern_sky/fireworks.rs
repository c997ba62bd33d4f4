//! Fireworks: a rising shell that bursts into fading, falling fragments.

use std::f64::consts::TAU;
use std::ops::Range;

use rand::Rng;

use super::config::{FRAGMENT_COUNT, SkyConfig};
use super::render::{Renderer, Shape};
use super::theme::{Color, Mode};
use super::viewport::Viewport;

/// Ascent speed of a new shell, pixels per tick.
pub const ASCENT_SPEED: Range<f64> = 5.0..8.0;
/// Initial speed of a fragment, pixels per tick.
pub const FRAGMENT_SPEED: Range<f64> = 0.0..5.0;

const SHELL: Shape = Shape::Rect {
	width: 3.0,
	height: 10.0,
};
// Repeated float subtraction never lands exactly on zero.
const ALPHA_EPSILON: f64 = 1e-9;

/// One piece of an exploded firework.
#[derive(Clone, Debug)]
pub struct Fragment {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub color: Color,
	pub alpha: f64,
}

impl Fragment {
	fn update(&mut self, config: &SkyConfig) {
		self.x += self.vx;
		self.y += self.vy;
		self.alpha -= config.fragment_fade;
		self.vy += config.gravity;
	}

	pub fn is_faded(&self) -> bool {
		self.alpha <= ALPHA_EPSILON
	}
}

/// Lifecycle of a firework. Removal from the registry is the implicit final state.
#[derive(Clone, Debug)]
pub enum FireworkState {
	Rising,
	Exploded { fragments: Vec<Fragment> },
}

/// A single firework.
#[derive(Clone, Debug)]
pub struct Firework {
	pub x: f64,
	pub y: f64,
	/// Altitude at which the shell bursts.
	pub target_y: f64,
	pub speed: f64,
	pub color: Color,
	/// Mode at launch; an in-flight firework keeps it across theme switches.
	pub mode: Mode,
	pub state: FireworkState,
}

impl Firework {
	pub fn new(x: f64, y: f64, target_y: f64, speed: f64, color: Color, mode: Mode) -> Self {
		Self {
			x,
			y,
			target_y,
			speed,
			color,
			mode,
			state: FireworkState::Rising,
		}
	}

	/// Launch a shell from a random point on the bottom edge.
	pub fn spawn<R: Rng + ?Sized>(rng: &mut R, mode: Mode, viewport: &Viewport) -> Self {
		Self::new(
			viewport.random_x(rng),
			viewport.height,
			viewport.random_upper_y(rng),
			rng.gen_range(ASCENT_SPEED),
			mode.style().firework_palette.sample(rng),
			mode,
		)
	}

	pub fn is_exploded(&self) -> bool {
		matches!(self.state, FireworkState::Exploded { .. })
	}

	/// Exploded with nothing left to draw.
	pub fn is_finished(&self) -> bool {
		matches!(&self.state, FireworkState::Exploded { fragments } if fragments.is_empty())
	}

	pub fn fragments(&self) -> &[Fragment] {
		match &self.state {
			FireworkState::Rising => &[],
			FireworkState::Exploded { fragments } => fragments.as_slice(),
		}
	}

	/// Advance one tick. Returns `true` on the tick the shell bursts.
	pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &SkyConfig) -> bool {
		if let FireworkState::Exploded { fragments } = &mut self.state {
			for f in fragments.iter_mut() {
				f.update(config);
			}
			fragments.retain(|f| !f.is_faded());
			return false;
		}

		self.y -= self.speed;
		if self.y <= self.target_y {
			self.explode(rng);
			return true;
		}
		false
	}

	fn explode<R: Rng + ?Sized>(&mut self, rng: &mut R) {
		let fragments = (0..FRAGMENT_COUNT)
			.map(|_| {
				let angle = rng.gen_range(0.0..TAU);
				let speed = rng.gen_range(FRAGMENT_SPEED);
				Fragment {
					x: self.x,
					y: self.y,
					vx: angle.cos() * speed,
					vy: angle.sin() * speed,
					color: self.color,
					alpha: 1.0,
				}
			})
			.collect();
		self.state = FireworkState::Exploded { fragments };
	}

	pub fn draw(&self, renderer: &mut impl Renderer) {
		match &self.state {
			FireworkState::Rising => renderer.fill_shape(SHELL, self.x, self.y, self.color, 1.0),
			FireworkState::Exploded { fragments } => {
				let style = self.mode.style();
				let shape = Shape::sprite(style.fragment_sprite, style.fragment_size);
				for f in fragments {
					renderer.fill_shape(shape, f.x, f.y, f.color, f.alpha);
				}
			}
		}
	}
}

/// The set of fireworks currently on screen.
#[derive(Default)]
pub struct FireworkRegistry {
	fireworks: Vec<Firework>,
}

impl FireworkRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.fireworks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fireworks.is_empty()
	}

	pub fn fireworks(&self) -> &[Firework] {
		&self.fireworks
	}

	pub fn push(&mut self, firework: Firework) {
		self.fireworks.push(firework);
	}

	/// Launch a firework in `mode` with probability `chance`.
	pub fn maybe_spawn<R: Rng + ?Sized>(
		&mut self,
		rng: &mut R,
		mode: Mode,
		viewport: &Viewport,
		chance: f64,
	) -> bool {
		if !rng.gen_bool(chance) {
			return false;
		}
		self.fireworks.push(Firework::spawn(rng, mode, viewport));
		true
	}

	/// Update and draw every firework, then drop the finished ones.
	/// Returns how many were removed.
	pub fn update_and_draw<R: Rng + ?Sized>(
		&mut self,
		rng: &mut R,
		config: &SkyConfig,
		renderer: &mut impl Renderer,
	) -> usize {
		renderer.set_glow(Color::TRANSPARENT, 0.0);
		for fw in &mut self.fireworks {
			fw.update(rng, config);
			fw.draw(renderer);
		}
		self.prune()
	}

	/// Remove fireworks that have exploded and fully faded.
	pub fn prune(&mut self) -> usize {
		let before = self.fireworks.len();
		self.fireworks.retain(|fw| !fw.is_finished());
		before - self.fireworks.len()
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::super::render::recording::{DrawCall, RecordingRenderer};
	use super::super::theme::{NEON_CYAN, NEON_MAGENTA};
	use super::*;

	fn rng() -> StdRng {
		StdRng::seed_from_u64(42)
	}

	#[test]
	fn spawn_starts_at_bottom_and_aims_high() {
		let mut rng = rng();
		let vp = Viewport::new(800.0, 600.0);
		for mode in [Mode::Ambient, Mode::Cyber] {
			for _ in 0..200 {
				let fw = Firework::spawn(&mut rng, mode, &vp);
				assert_eq!(fw.y, 600.0);
				assert!((0.0..800.0).contains(&fw.x));
				assert!((0.0..300.0).contains(&fw.target_y));
				assert!(ASCENT_SPEED.contains(&fw.speed));
				assert!(!fw.is_exploded());
				assert!(fw.fragments().is_empty());
				if mode == Mode::Cyber {
					assert!(fw.color == NEON_CYAN || fw.color == NEON_MAGENTA);
				}
			}
		}
	}

	#[test]
	fn explodes_exactly_when_reaching_target() {
		let mut rng = rng();
		let config = SkyConfig::default();
		let mut fw = Firework::new(400.0, 600.0, 100.0, 5.0, NEON_CYAN, Mode::Cyber);

		for tick in 1..100 {
			assert!(!fw.update(&mut rng, &config), "burst early on tick {tick}");
			assert!(fw.fragments().is_empty());
		}
		assert_eq!(fw.y, 105.0);

		assert!(fw.update(&mut rng, &config));
		assert!(fw.is_exploded());
		assert_eq!(fw.fragments().len(), FRAGMENT_COUNT);
		for f in fw.fragments() {
			assert_eq!(f.alpha, 1.0);
			assert_eq!(f.color, NEON_CYAN);
			assert_eq!((f.x, f.y), (400.0, 100.0));
			assert!(f.vx.hypot(f.vy) < 5.0);
		}

		// Exploding is one-shot: later ticks only decay the same fragments.
		assert!(!fw.update(&mut rng, &config));
		assert_eq!(fw.fragments().len(), FRAGMENT_COUNT);
	}

	#[test]
	fn fragments_fade_fall_and_disappear_after_fifty_ticks() {
		let config = SkyConfig::default();
		let mut rng = rng();
		let mut fw = Firework::new(0.0, 0.0, 0.0, 1.0, NEON_CYAN, Mode::Cyber);
		fw.state = FireworkState::Exploded {
			fragments: vec![Fragment {
				x: 10.0,
				y: 10.0,
				vx: 1.0,
				vy: 0.0,
				color: NEON_CYAN,
				alpha: 1.0,
			}],
		};

		fw.update(&mut rng, &config);
		let f = &fw.fragments()[0];
		assert_eq!((f.x, f.y), (11.0, 10.0));
		assert!((f.alpha - 0.98).abs() < 1e-12);
		assert!((f.vy - 0.05).abs() < 1e-12);

		for tick in 2..50 {
			fw.update(&mut rng, &config);
			assert_eq!(fw.fragments().len(), 1, "vanished early on tick {tick}");
			let expected = 1.0 - 0.02 * tick as f64;
			assert!((fw.fragments()[0].alpha - expected).abs() < 1e-9);
		}
		assert!(!fw.is_finished());

		fw.update(&mut rng, &config);
		assert!(fw.fragments().is_empty());
		assert!(fw.is_finished());
	}

	#[test]
	fn draw_depends_on_phase_and_mode() {
		let mut rng = rng();
		let config = SkyConfig::default();
		let mut renderer = RecordingRenderer::default();

		let rising = Firework::new(5.0, 50.0, 0.0, 5.0, NEON_MAGENTA, Mode::Cyber);
		rising.draw(&mut renderer);
		assert_eq!(
			renderer.calls,
			vec![DrawCall::Fill {
				shape: SHELL,
				x: 5.0,
				y: 50.0,
				color: NEON_MAGENTA,
				alpha: 1.0
			}]
		);

		let red = Color::rgb(255, 0, 0);
		let mut ambient = Firework::new(5.0, 10.0, 20.0, 5.0, red, Mode::Ambient);
		ambient.update(&mut rng, &config);
		let mut renderer = RecordingRenderer::default();
		ambient.draw(&mut renderer);
		assert_eq!(renderer.fills().count(), FRAGMENT_COUNT);
		assert!(renderer.fills().all(|c| matches!(
			c,
			DrawCall::Fill {
				shape: Shape::Circle { radius },
				..
			} if *radius == 2.0
		)));
	}

	#[test]
	fn registry_removes_only_finished_fireworks() {
		let mut rng = rng();
		let config = SkyConfig::default();
		let mut registry = FireworkRegistry::new();

		let mut done = Firework::new(0.0, 0.0, 0.0, 1.0, NEON_CYAN, Mode::Cyber);
		done.state = FireworkState::Exploded { fragments: vec![] };
		let mut fading = done.clone();
		fading.state = FireworkState::Exploded {
			fragments: vec![Fragment {
				x: 0.0,
				y: 0.0,
				vx: 0.0,
				vy: 0.0,
				color: NEON_CYAN,
				alpha: 0.5,
			}],
		};
		let rising = Firework::new(0.0, 500.0, 10.0, 5.0, NEON_CYAN, Mode::Cyber);

		// Adjacent finished entries must both go.
		registry.push(done.clone());
		registry.push(done);
		registry.push(rising);
		registry.push(fading);

		let mut renderer = RecordingRenderer::default();
		assert_eq!(registry.update_and_draw(&mut rng, &config, &mut renderer), 2);
		assert_eq!(registry.len(), 2);
		assert!(registry.fireworks().iter().all(|fw| !fw.is_finished()));

		for _ in 0..30 {
			registry.update_and_draw(&mut rng, &config, &mut renderer);
		}
		assert_eq!(registry.len(), 1);
		assert!(!registry.fireworks()[0].is_exploded());
	}

	#[test]
	fn spawn_probability_extremes() {
		let mut rng = rng();
		let vp = Viewport::new(640.0, 480.0);
		let mut registry = FireworkRegistry::new();

		for _ in 0..100 {
			assert!(!registry.maybe_spawn(&mut rng, Mode::Ambient, &vp, 0.0));
		}
		assert!(registry.is_empty());

		assert!(registry.maybe_spawn(&mut rng, Mode::Cyber, &vp, 1.0));
		assert_eq!(registry.fireworks()[0].mode, Mode::Cyber);
	}
}
