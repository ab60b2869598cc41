//! Gameplay module
//!
//! Everything derived from the physics state each frame lives here: the
//! proximity test, particle and popup subsystems, the pulse animation, and
//! the frame driver that sequences them. No rendering dependencies.

pub mod animation;
pub mod particles;
pub mod popups;
pub mod proximity;
pub mod state;
pub mod tick;

pub use animation::PulseAnimation;
pub use particles::{Particle, ParticleSystem};
pub use popups::{FloatingText, PopupSystem};
pub use proximity::Aabb;
pub use state::GameState;
pub use tick::{FrameInput, tick};
