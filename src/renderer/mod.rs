//! Rendering module
//!
//! `scene` and `parallax` are plain data and run everywhere; `sdf_pipeline`
//! draws them with WebGPU using signed distance fields in the fragment shader.

pub mod parallax;
pub mod scene;
pub mod sdf_pipeline;

pub use parallax::{Backdrop, LayerKind, ParallaxLayer};
pub use scene::{Scene, Sprite, SpriteKind};
pub use sdf_pipeline::SdfRenderState;
