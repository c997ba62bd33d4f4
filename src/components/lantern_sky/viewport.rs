//! Cached drawing-surface dimensions and the random placement helpers built on them.

use rand::Rng;

/// Pixel size of the drawing surface, updated on resize.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// A viewport with no area cannot be drawn to or sampled from.
	pub fn is_drawable(&self) -> bool {
		self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
	}

	/// Uniform x in `[0, width)`.
	pub fn random_x<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
		span(rng, self.width)
	}

	/// Uniform y in `[0, height)`.
	pub fn random_y<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
		span(rng, self.height)
	}

	/// Uniform y in the upper half, `[0, height / 2)`.
	pub fn random_upper_y<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
		span(rng, self.height / 2.0)
	}
}

// Degenerate extents collapse to the origin instead of sampling an empty range.
fn span<R: Rng + ?Sized>(rng: &mut R, extent: f64) -> f64 {
	if extent.is_finite() && extent > 0.0 {
		rng.gen_range(0.0..extent)
	} else {
		0.0
	}
}
