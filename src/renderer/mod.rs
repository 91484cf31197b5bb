//! Rendering module
//!
//! `scene` composes procedural shapes into a triangle list; `pipeline`
//! uploads that list to WebGPU.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{Layer, Scene, build_scene};
pub use vertex::Vertex;
