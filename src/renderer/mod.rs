//! WebGPU rendering module
//!
//! Uses SDF (Signed Distance Fields) for all rendering in the fragment shader.

pub mod scene;
pub mod sdf_pipeline;

pub use scene::{Rect, Scene, SceneHole};
pub use sdf_pipeline::{MAX_HOLES, SdfRenderState};
