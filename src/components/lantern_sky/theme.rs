//! Visual theming for the lantern sky.
//!
//! Every mode-dependent constant (speeds, sizes, palettes, shapes) lives in a
//! [`ModeStyle`] table so the simulation never branches on the mode directly.

use std::ops::Range;

use rand::Rng;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	/// Fully transparent black, used to clear glow.
	pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0.0);

	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Build an opaque color from hue (degrees), saturation and lightness (0..=1).
	pub fn hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
		let h = hue.rem_euclid(360.0) / 60.0;
		let s = saturation.clamp(0.0, 1.0);
		let l = lightness.clamp(0.0, 1.0);

		let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
		let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
		let (r1, g1, b1) = match h as u32 {
			0 => (chroma, x, 0.0),
			1 => (x, chroma, 0.0),
			2 => (0.0, chroma, x),
			3 => (0.0, x, chroma),
			4 => (x, 0.0, chroma),
			_ => (chroma, 0.0, x),
		};
		let m = l - chroma / 2.0;
		let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;

		Self::rgb(channel(r1), channel(g1), channel(b1))
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Neon cyan used by cyber mode.
pub const NEON_CYAN: Color = Color::rgb(0x00, 0xf3, 0xff);
/// Neon magenta used by cyber mode.
pub const NEON_MAGENTA: Color = Color::rgb(0xff, 0x00, 0xff);

const NEON: [Color; 2] = [NEON_CYAN, NEON_MAGENTA];

/// Where a spawned entity takes its color from.
#[derive(Clone, Debug)]
pub enum Palette {
	/// Pick uniformly among a fixed set of colors.
	Fixed(&'static [Color]),
	/// Sample a hue from a band at fixed saturation and lightness.
	HueBand {
		hue: Range<f64>,
		saturation: f64,
		lightness: f64,
	},
}

impl Palette {
	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
		match self {
			Palette::Fixed(colors) => colors[rng.gen_range(0..colors.len())],
			Palette::HueBand {
				hue,
				saturation,
				lightness,
			} => Color::hsl(rng.gen_range(hue.clone()), *saturation, *lightness),
		}
	}

	/// Whether `color` could have been produced by [`Palette::sample`].
	pub fn contains(&self, color: Color) -> bool {
		match self {
			Palette::Fixed(colors) => colors.contains(&color),
			Palette::HueBand {
				hue,
				saturation,
				lightness,
			} => {
				// Compare against the band edges after rgb quantisation.
				let lo = Color::hsl(hue.start, *saturation, *lightness);
				let hi = Color::hsl(hue.end, *saturation, *lightness);
				let within = |v: u8, a: u8, b: u8| v >= a.min(b) && v <= a.max(b);
				within(color.r, lo.r, hi.r)
					&& within(color.g, lo.g, hi.g)
					&& within(color.b, lo.b, hi.b)
			}
		}
	}
}

/// How a sprite is shaped when drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sprite {
	/// Axis-aligned square anchored at its top-left corner.
	Square,
	/// Filled circle centered on the position.
	Circle,
}

/// The two visual themes of the effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
	/// Warm, slow, round lanterns.
	#[default]
	Ambient,
	/// Neon, fast, square pixels.
	Cyber,
}

impl Mode {
	pub fn toggled(self) -> Self {
		match self {
			Mode::Ambient => Mode::Cyber,
			Mode::Cyber => Mode::Ambient,
		}
	}

	pub fn style(self) -> &'static ModeStyle {
		match self {
			Mode::Ambient => &AMBIENT,
			Mode::Cyber => &CYBER,
		}
	}

	/// Icon glyph shown on the toggle control.
	pub fn icon(self) -> &'static str {
		self.style().icon
	}
}

/// Class set on `<body>` while cyber mode is active.
pub const CYBER_BODY_CLASS: &str = "cyberpunk";

/// Mode-dependent spawn and draw parameters.
#[derive(Clone, Debug)]
pub struct ModeStyle {
	/// Upward speed magnitude of a lantern particle (pixels per tick).
	pub particle_rise: Range<f64>,
	/// Lantern particle size (side length or radius).
	pub particle_size: Range<f64>,
	pub particle_palette: Palette,
	pub particle_sprite: Sprite,
	/// Glow radius around particles; 0 disables glow.
	pub particle_glow: f64,
	pub firework_palette: Palette,
	pub fragment_sprite: Sprite,
	pub fragment_size: f64,
	pub icon: &'static str,
}

static AMBIENT: ModeStyle = ModeStyle {
	particle_rise: 2.0..5.0,
	particle_size: 2.0..6.0,
	particle_palette: Palette::HueBand {
		hue: 10.0..50.0,
		saturation: 1.0,
		lightness: 0.7,
	},
	particle_sprite: Sprite::Circle,
	particle_glow: 10.0,
	firework_palette: Palette::HueBand {
		hue: 0.0..360.0,
		saturation: 1.0,
		lightness: 0.5,
	},
	fragment_sprite: Sprite::Circle,
	fragment_size: 2.0,
	icon: "\u{1f3ee}",
};

static CYBER: ModeStyle = ModeStyle {
	particle_rise: 4.0..9.0,
	particle_size: 1.0..4.0,
	particle_palette: Palette::Fixed(&NEON),
	particle_sprite: Sprite::Square,
	particle_glow: 0.0,
	firework_palette: Palette::Fixed(&NEON),
	fragment_sprite: Sprite::Square,
	fragment_size: 3.0,
	icon: "\u{1f47e}",
};
