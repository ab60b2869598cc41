//! bumpbox - a tiny 2D rigid-body playground
//!
//! Core modules:
//! - `game`: Frame driver and gameplay state (proximity, score, particles, popups)
//! - `physics`: Rigid-body world facade over rapier2d
//! - `renderer`: WebGPU rendering pipeline, textures and glyph atlas
//! - `input`: Key-state snapshots with edge detection
//! - `config`: Data-driven tuning loaded from an optional JSON file

pub mod config;
pub mod entity;
pub mod game;
pub mod input;
pub mod physics;
pub mod renderer;

pub use config::Config;
pub use game::{FrameInput, GameState, tick};

use glam::Vec2;

/// Game tuning constants
pub mod consts {
    /// Fixed physics timestep (60 Hz), decoupled from wall-clock frame time
    pub const FIXED_DT: f32 = 1.0 / 60.0;
    /// Solver iterations per physics step
    pub const SOLVER_ITERATIONS: usize = 8;
    /// World gravity (m/s^2)
    pub const GRAVITY_Y: f32 = -10.0;

    /// Continuous horizontal movement force (N)
    pub const MOVE_FORCE: f32 = 20.0;
    /// Jump impulse (N*s)
    pub const JUMP_IMPULSE: f32 = 6.0;
    /// Vertical-speed threshold below which the player counts as grounded
    pub const GROUNDED_EPSILON: f32 = 0.01;
    /// Player respawn position
    pub const SPAWN_X: f32 = 0.0;
    pub const SPAWN_Y: f32 = 10.0;
    /// Falling past this height forces a respawn
    pub const FALL_RESET_Y: f32 = -20.0;

    /// Wall-clock delta clamp for particle/popup advance after a stall
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Particle active-set capacity; spawns past this are dropped
    pub const MAX_PARTICLES: usize = 256;
    /// Downward acceleration on particles (independent of the physics world)
    pub const PARTICLE_GRAVITY: f32 = 9.8;

    /// World-space lift above the crate where a score popup spawns
    pub const POPUP_WORLD_LIFT: f32 = 1.0;
    /// Popup lifetime (s)
    pub const POPUP_DURATION: f32 = 1.2;
    /// Popup rise rate (px/s, screen space)
    pub const POPUP_RISE_RATE: f32 = 40.0;

    /// Pulse animation on the highlighted crate
    pub const PULSE_AMPLITUDE: f32 = 0.08;
    pub const PULSE_RATE: f32 = 8.0;
}

/// Convert a simulation-space position to screen pixels.
///
/// The origin maps to the window center; one simulation unit covers
/// `pixels_per_meter` pixels. Screen space is y-up to match the
/// orthographic projection the renderer uses.
#[inline]
pub fn world_to_screen(world: Vec2, viewport: Vec2, pixels_per_meter: f32) -> Vec2 {
    viewport * 0.5 + world * pixels_per_meter
}
