//! Explosion particles
//!
//! Short-lived billboards spawned in randomized bursts and advanced by
//! wall-clock time. The active set is capped; spawns past the cap are
//! dropped without error.

use glam::Vec2;
use rand::Rng;

use crate::consts::{MAX_PARTICLES, PARTICLE_GRAVITY};

const BURST_MIN: usize = 12;
const BURST_MAX: usize = 24;
const SPEED_MIN: f32 = 2.0;
const SPEED_MAX: f32 = 5.0;
const LIFE_MIN: f32 = 0.4;
const LIFE_MAX: f32 = 1.1;
const BASE_SIZE: f32 = 0.15;
const MAX_SPIN: f32 = 6.0;

/// Tint applied to every particle quad; alpha comes from the life fraction.
pub const PARTICLE_TINT: [f32; 3] = [1.0, 0.6, 0.2];

#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub initial_life: f32,
    pub size: f32,
    pub initial_size: f32,
    pub rotation: f32,
    pub spin: f32,
}

impl Particle {
    /// Remaining life as a 0..1 fraction; drives size shrink and fade.
    pub fn life_fraction(&self) -> f32 {
        (self.life / self.initial_life).clamp(0.0, 1.0)
    }
}

pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self {
            particles: Vec::with_capacity(MAX_PARTICLES),
        }
    }

    /// Spawn a randomized burst at `origin`. Direction, speed, lifetime,
    /// size and spin are drawn independently per particle.
    pub fn spawn_burst(&mut self, rng: &mut impl Rng, origin: Vec2) {
        let count = rng.random_range(BURST_MIN..=BURST_MAX);
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                break;
            }
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(SPEED_MIN..SPEED_MAX);
            let life = rng.random_range(LIFE_MIN..LIFE_MAX);
            let size = BASE_SIZE * rng.random_range(0.6..1.4);
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::from_angle(angle) * speed,
                life,
                initial_life: life,
                size,
                initial_size: size,
                rotation: rng.random_range(0.0..std::f32::consts::TAU),
                spin: rng.random_range(-MAX_SPIN..MAX_SPIN),
            });
        }
    }

    /// Advance every live particle by `dt`, then drop the expired ones.
    pub fn advance(&mut self, dt: f32) {
        for p in self.particles.iter_mut() {
            p.pos += p.vel * dt;
            p.vel.y -= PARTICLE_GRAVITY * dt;
            p.life -= dt;
            p.size = p.initial_size * p.life_fraction();
            p.rotation += p.spin * dt;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_burst_count_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut system = ParticleSystem::new();
        system.spawn_burst(&mut rng, Vec2::ZERO);
        assert!(system.len() >= BURST_MIN && system.len() <= BURST_MAX);
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut system = ParticleSystem::new();
        for _ in 0..100 {
            system.spawn_burst(&mut rng, Vec2::ZERO);
            assert!(system.len() <= MAX_PARTICLES);
        }
        assert_eq!(system.len(), MAX_PARTICLES);
    }

    #[test]
    fn test_advance_expires_particles() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut system = ParticleSystem::new();
        system.spawn_burst(&mut rng, Vec2::ZERO);

        // dt at least as large as any remaining life kills the whole set.
        system.advance(LIFE_MAX + 0.1);
        assert!(system.is_empty());
    }

    #[test]
    fn test_advance_visits_every_live_particle() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut system = ParticleSystem::new();
        system.spawn_burst(&mut rng, Vec2::ZERO);

        let before: Vec<f32> = system.iter().map(|p| p.life).collect();
        system.advance(0.1);
        // No particle expires at dt = 0.1 (minimum life is 0.4), and every
        // survivor aged by exactly dt.
        assert_eq!(system.len(), before.len());
        for (p, old_life) in system.iter().zip(before) {
            assert!((p.life - (old_life - 0.1)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_size_shrinks_with_life() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut system = ParticleSystem::new();
        system.spawn_burst(&mut rng, Vec2::ZERO);

        system.advance(0.2);
        for p in system.iter() {
            assert!(p.size < p.initial_size);
            assert!((p.size - p.initial_size * p.life_fraction()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_gravity_pulls_velocity_down() {
        let mut rng = Pcg32::seed_from_u64(13);
        let mut system = ParticleSystem::new();
        system.spawn_burst(&mut rng, Vec2::ZERO);

        let before: Vec<f32> = system.iter().map(|p| p.vel.y).collect();
        system.advance(0.1);
        for (p, old_vy) in system.iter().zip(before) {
            assert!(p.vel.y < old_vy);
        }
    }
}
