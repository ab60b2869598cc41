//! Floating score popups
//!
//! A popup is pinned to screen space at spawn time and rises independently
//! of the entity that produced it. Alpha fades linearly with remaining life.

use glam::Vec2;

use crate::consts::{POPUP_DURATION, POPUP_RISE_RATE};

const TEXT_COLOR: [f32; 3] = [1.0, 0.85, 0.25];
const SHADOW_COLOR: [f32; 3] = [0.05, 0.05, 0.05];
const SHADOW_OFFSET: Vec2 = Vec2::new(2.0, -2.0);
const TEXT_SCALE: f32 = 0.8;

#[derive(Debug, Clone)]
pub struct FloatingText {
    pub text: String,
    /// Screen-space position of the text baseline
    pub pos: Vec2,
    pub life: f32,
    pub duration: f32,
    pub scale: f32,
    pub color: [f32; 3],
    pub shadow_color: [f32; 3],
    pub shadow_offset: Vec2,
}

impl FloatingText {
    /// Linear fade: fully opaque at spawn, transparent exactly at expiry.
    pub fn alpha(&self) -> f32 {
        (self.life / self.duration).clamp(0.0, 1.0)
    }
}

pub struct PopupSystem {
    popups: Vec<FloatingText>,
}

impl PopupSystem {
    pub fn new() -> Self {
        Self { popups: Vec::new() }
    }

    /// Spawn a `+N` popup at an already screen-converted position.
    pub fn spawn(&mut self, points: u64, screen_pos: Vec2) {
        self.popups.push(FloatingText {
            text: format!("+{points}"),
            pos: screen_pos,
            life: POPUP_DURATION,
            duration: POPUP_DURATION,
            scale: TEXT_SCALE,
            color: TEXT_COLOR,
            shadow_color: SHADOW_COLOR,
            shadow_offset: SHADOW_OFFSET,
        });
    }

    /// Age and raise every popup; expired ones are removed.
    pub fn advance(&mut self, dt: f32) {
        for popup in self.popups.iter_mut() {
            popup.life -= dt;
            popup.pos.y += POPUP_RISE_RATE * dt;
        }
        self.popups.retain(|p| p.life > 0.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &FloatingText> {
        self.popups.iter()
    }

    pub fn len(&self) -> usize {
        self.popups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.popups.is_empty()
    }
}

impl Default for PopupSystem {
    fn default() -> Self {
        Self::new()
    }
}
