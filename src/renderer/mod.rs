//! WebGPU rendering module
//!
//! A single textured-quad pipeline draws everything: world bodies, particle
//! billboards, and glyph quads for popups and the score readout.

pub mod pipeline;
pub mod text;
pub mod texture;

pub use pipeline::RenderState;
