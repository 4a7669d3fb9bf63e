//! Core primitive types for rendering
//!
//! Meshes, vertices and cameras shared by the geometry generators and the
//! compiled scene graph.

pub mod mesh;
pub mod camera;

pub use mesh::{Mesh, Vertex};
pub use camera::{Camera, Projection};
