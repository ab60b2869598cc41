//! Game state
//!
//! One struct owns everything the frame driver mutates: the physics world,
//! the entity table, score, the previous proximity flag for edge detection,
//! and the time-driven subsystems. No process-wide state.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::Config;
use crate::consts::{PULSE_AMPLITUDE, PULSE_RATE};
use crate::entity::Entities;
use crate::game::animation::PulseAnimation;
use crate::game::particles::ParticleSystem;
use crate::game::popups::PopupSystem;
use crate::physics::PhysicsWorld;

pub struct GameState {
    pub config: Config,
    pub physics: PhysicsWorld,
    pub entities: Entities,
    pub score: u64,
    /// Previous frame's proximity predicate, for rising-edge detection
    pub was_near: bool,
    pub particles: ParticleSystem,
    pub popups: PopupSystem,
    pub pulse: PulseAnimation,
    pub rng: Pcg32,
}

impl GameState {
    /// Build the initial world from `config` with a seeded RNG.
    pub fn new(config: Config, seed: u64) -> Self {
        let mut physics = PhysicsWorld::new();
        let entities = Entities::spawn(&mut physics);

        Self {
            config,
            physics,
            entities,
            score: 0,
            was_near: false,
            particles: ParticleSystem::new(),
            popups: PopupSystem::new(),
            pulse: PulseAnimation::new(PULSE_AMPLITUDE, PULSE_RATE),
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}
