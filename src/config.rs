//! Runtime configuration
//!
//! Loaded from an optional `bumpbox.json` next to the executable; missing or
//! malformed files fall back to defaults so the game always starts.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Window size in logical pixels
    pub window_width: u32,
    pub window_height: u32,
    /// Simulation-to-screen scale
    pub pixels_per_meter: f32,
    /// AABB inflation (simulation units) around the player for the "near"
    /// test. The crate itself is tested at its exact extents.
    pub proximity_margin: f32,
    /// Points awarded per proximity rising edge
    pub score_award: u64,
    /// RNG seed override; unset seeds from wall-clock time
    pub seed: Option<u64>,
    /// Asset paths; missing files fall back to procedural substitutes
    pub player_texture: String,
    pub crate_texture: String,
    pub ground_texture: String,
    pub font: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 600,
            pixels_per_meter: 50.0,
            proximity_margin: 1.0,
            score_award: 10,
            seed: None,
            player_texture: "assets/player.png".into(),
            crate_texture: "assets/crate.png".into(),
            ground_texture: "assets/ground.png".into(),
            font: "assets/font.ttf".into(),
        }
    }
}

impl Config {
    const FILE: &'static str = "bumpbox.json";

    /// Load configuration from disk, falling back to defaults.
    pub fn load() -> Self {
        match std::fs::read_to_string(Self::FILE) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", Self::FILE);
                    config
                }
                Err(err) => {
                    log::warn!("Ignoring malformed {}: {}", Self::FILE, err);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default config");
                Self::default()
            }
        }
    }

    /// Window size as a vector, for screen-space math.
    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.window_width as f32, self.window_height as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roundtrip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.window_width, config.window_width);
        assert_eq!(back.proximity_margin, config.proximity_margin);
        assert_eq!(back.score_award, config.score_award);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"proximity_margin": 0.5}"#).unwrap();
        assert_eq!(config.proximity_margin, 0.5);
        assert_eq!(config.window_width, 800);
        assert_eq!(config.pixels_per_meter, 50.0);
    }
}
