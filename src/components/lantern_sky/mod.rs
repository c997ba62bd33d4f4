//! Ambient lantern-and-fireworks background effect.
//!
//! Renders on a full-window HTML canvas:
//! - A fixed pool of drifting lantern particles that recycle themselves
//! - Fireworks launched at random that rise, burst and fade under gravity
//! - Two themes (ambient lanterns, neon cyber) switchable in place
//!
//! The simulation ([`SkyState`]) draws through the [`Renderer`] trait and is
//! driven by a [`FrameScheduler`], so it runs the same against a browser
//! canvas or a recording renderer in tests.
//!
//! # Example
//!
//! ```ignore
//! let mode = RwSignal::new(Mode::Ambient);
//!
//! view! {
//!     <LanternSky mode=mode />
//!     <ThemeToggle mode=mode />
//! }
//! ```

mod component;
pub mod config;
mod error;
pub mod fireworks;
pub mod particles;
pub mod render;
pub mod scheduler;
mod state;
pub mod theme;
mod viewport;

pub use component::{LanternSky, ThemeToggle, WindowFrameHost};
pub use config::SkyConfig;
pub use error::SkyError;
pub use render::{Renderer, Shape};
pub use scheduler::{FrameHost, FrameScheduler};
pub use state::{SkyState, TickOutcome};
pub use theme::{Color, Mode};
pub use viewport::Viewport;
