//! Compiled scene graph
//!
//! Output of the scene compiler: a tree of [`Group`]s whose leaves are meshes,
//! lights, light helpers and level-of-detail switches. A host renderer walks
//! this tree; nothing here draws.

mod scene_graph;

pub use scene_graph::{Group, Lod, LodLevel, MeshObject, SceneObject, AABB};
