//! Drawing primitives used by the simulation.
//!
//! The simulation only ever talks to a [`Renderer`]; the canvas implementation
//! lives here so the rest of the crate stays independent of `web_sys`.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::theme::{Color, Sprite};

/// Geometry of a single filled shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
	/// Rectangle anchored at its top-left corner.
	Rect { width: f64, height: f64 },
	/// Circle centered on the position.
	Circle { radius: f64 },
}

impl Shape {
	/// Shape for a sprite of the given size (side length or radius).
	pub fn sprite(sprite: Sprite, size: f64) -> Self {
		match sprite {
			Sprite::Square => Shape::Rect {
				width: size,
				height: size,
			},
			Sprite::Circle => Shape::Circle { radius: size },
		}
	}
}

/// A drawing surface. All calls are fire-and-forget.
pub trait Renderer {
	/// Erase the whole surface.
	fn clear(&mut self, width: f64, height: f64);

	/// Fill `shape` at `(x, y)` with `color` at the given opacity.
	fn fill_shape(&mut self, shape: Shape, x: f64, y: f64, color: Color, alpha: f64);

	/// Glow applied to subsequent fills. A radius of 0 turns glow off.
	fn set_glow(&mut self, _color: Color, _radius: f64) {}
}

impl Renderer for CanvasRenderingContext2d {
	fn clear(&mut self, width: f64, height: f64) {
		self.clear_rect(0.0, 0.0, width, height);
	}

	fn fill_shape(&mut self, shape: Shape, x: f64, y: f64, color: Color, alpha: f64) {
		self.set_global_alpha(alpha.clamp(0.0, 1.0));
		self.set_fill_style_str(&color.to_css());

		match shape {
			Shape::Rect { width, height } => self.fill_rect(x, y, width, height),
			Shape::Circle { radius } => {
				self.begin_path();
				let _ = self.arc(x, y, radius, 0.0, PI * 2.0);
				self.fill();
			}
		}

		self.set_global_alpha(1.0);
	}

	fn set_glow(&mut self, color: Color, radius: f64) {
		self.set_shadow_blur(radius);
		self.set_shadow_color(&color.to_css());
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sprite_shapes() {
		assert_eq!(
			Shape::sprite(Sprite::Square, 3.0),
			Shape::Rect {
				width: 3.0,
				height: 3.0
			}
		);
		assert_eq!(
			Shape::sprite(Sprite::Circle, 2.0),
			Shape::Circle { radius: 2.0 }
		);
	}
}
