//! Tuning parameters for the simulation.
//!
//! Defaults reproduce the stock look. A page can override any subset through a
//! JSON document; values are range-checked before the sky starts.

use serde::Deserialize;

use super::error::SkyError;

/// Number of lantern particles in the pool.
pub const PARTICLE_COUNT: usize = 100;
/// Number of fragments produced by one explosion.
pub const FRAGMENT_COUNT: usize = 50;

/// Probability-driven and decay constants of the effect.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SkyConfig {
	/// Chance per tick that a new firework is launched.
	pub firework_chance: f64,
	/// Chance per tick that a cyber particle jumps sideways.
	pub glitch_chance: f64,
	/// Maximum sideways jump of a glitching particle, in pixels.
	pub glitch_amplitude: f64,
	/// Downward acceleration applied to fragments each tick.
	pub gravity: f64,
	/// Alpha lost by a fragment each tick.
	pub fragment_fade: f64,
}

impl Default for SkyConfig {
	fn default() -> Self {
		Self {
			firework_chance: 0.02,
			glitch_chance: 0.05,
			glitch_amplitude: 10.0,
			gravity: 0.05,
			fragment_fade: 0.02,
		}
	}
}

impl SkyConfig {
	/// Parse and validate a JSON configuration document.
	pub fn from_json(json: &str) -> Result<Self, SkyError> {
		serde_json::from_str::<SkyConfig>(json)?.validated()
	}

	/// Check every parameter is in range.
	pub fn validated(self) -> Result<Self, SkyError> {
		let probability = |name: &str, v: f64| {
			if (0.0..=1.0).contains(&v) {
				Ok(())
			} else {
				Err(SkyError::InvalidConfig(format!(
					"{name} must be within [0, 1], got {v}"
				)))
			}
		};
		let non_negative = |name: &str, v: f64| {
			if v.is_finite() && v >= 0.0 {
				Ok(())
			} else {
				Err(SkyError::InvalidConfig(format!(
					"{name} must be finite and non-negative, got {v}"
				)))
			}
		};

		probability("firework_chance", self.firework_chance)?;
		probability("glitch_chance", self.glitch_chance)?;
		non_negative("glitch_amplitude", self.glitch_amplitude)?;
		non_negative("gravity", self.gravity)?;
		if !(self.fragment_fade > 0.0 && self.fragment_fade <= 1.0) {
			return Err(SkyError::InvalidConfig(format!(
				"fragment_fade must be within (0, 1], got {}",
				self.fragment_fade
			)));
		}
		Ok(self)
	}
}
