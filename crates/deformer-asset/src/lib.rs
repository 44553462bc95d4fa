//! Provide the scene data consumed by the deformer.
//!
//! This library describes nodes with their transform properties, skins
//! made of clusters, blend-shape channels, poses, animation curves and
//! meshes. It holds data only: evaluation lives in the `deformer` crate.
//! With the `serde` feature every asset can be read from or written to a
//! scene document.
//!
pub mod animation;
pub mod blend_shape;
pub mod document;
pub mod index;
pub mod mesh;
pub mod node;
pub mod pose;
pub mod skin;
