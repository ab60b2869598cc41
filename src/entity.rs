//! World entities and their render attributes
//!
//! The three bodies in the scene are tracked in a value-owned table rather
//! than through physics-engine user data; everything here drops with the
//! game state.

use glam::Vec2;

use crate::consts::{SPAWN_X, SPAWN_Y};
use crate::physics::{BodyHandle, PhysicsWorld};

pub const PLAYER_TINT: [f32; 3] = [0.9, 0.3, 0.25];
pub const CRATE_TINT: [f32; 3] = [0.2, 0.5, 0.8];
pub const GROUND_TINT: [f32; 3] = [0.4, 0.6, 0.3];
/// Crate tint while the player is near
pub const HIGHLIGHT_TINT: [f32; 3] = [1.0, 1.0, 0.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Crate,
    Ground,
}

/// Per-entity render attributes, rewritten once per frame by the frame
/// driver and read by the render pass.
#[derive(Debug, Clone)]
pub struct EntityVisual {
    pub base_tint: [f32; 3],
    pub tint: [f32; 3],
    pub textured: bool,
    pub anim_scale: f32,
}

impl EntityVisual {
    pub fn new(base_tint: [f32; 3], textured: bool) -> Self {
        Self {
            base_tint,
            tint: base_tint,
            textured,
            anim_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub body: BodyHandle,
    pub kind: EntityKind,
    pub half_extents: Vec2,
    pub visual: EntityVisual,
}

/// The scene's entity table.
pub struct Entities {
    pub ground: Entity,
    pub player: Entity,
    pub target: Entity,
}

impl Entities {
    /// Build the world layout: a wide static ground, the player box, and the
    /// dynamic crate the player scores against.
    pub fn spawn(physics: &mut PhysicsWorld) -> Self {
        let ground_half = Vec2::new(50.0, 0.1);
        let ground_body = physics.create_static_box(Vec2::new(0.0, -5.0), ground_half);
        let ground = Entity {
            body: ground_body,
            kind: EntityKind::Ground,
            half_extents: ground_half,
            visual: EntityVisual::new(GROUND_TINT, true),
        };

        let player_half = Vec2::splat(1.0);
        let player_body =
            physics.create_dynamic_box(Vec2::new(SPAWN_X, SPAWN_Y), player_half, 1.0, 0.3);
        let player = Entity {
            body: player_body,
            kind: EntityKind::Player,
            half_extents: player_half,
            visual: EntityVisual::new(PLAYER_TINT, false),
        };

        let target_half = Vec2::splat(0.5);
        let target_body = physics.create_dynamic_box(Vec2::new(2.0, 6.0), target_half, 1.0, 0.3);
        let target = Entity {
            body: target_body,
            kind: EntityKind::Crate,
            half_extents: target_half,
            visual: EntityVisual::new(CRATE_TINT, true),
        };

        Self {
            ground,
            player,
            target,
        }
    }
}
