//! Deform scene meshes for a given time.
//!
//! Starting from the bind shape of a mesh, this library applies blend
//! shapes, then skins the result with linear, dual quaternion or blended
//! skinning, using joint positions produced by the transform hierarchy.
//! Every evaluation is a pure function of its inputs: the bind shape is
//! never modified and the time is always passed explicitly.
//!
//! Malformed input met while deforming (dangling links, indices beyond the
//! point count, shapes with the wrong size) is skipped with a log message.
//! Only binding and hierarchy building can fail, see [`DeformError`].
//!
pub mod animation;
pub mod blend_shape;
pub mod cluster;
pub mod dual_quat;
mod error;
pub mod hierarchy;
pub mod influence;
pub mod math;
pub mod mesh;
mod params;
pub mod pose;
pub mod rig;
pub mod skinning;
pub mod vertex_cache;

pub use deformer_asset as asset;
pub use error::DeformError;
pub use params::{BlendFallback, EvaluationParams};

pub type Result<T> = std::result::Result<T, DeformError>;
