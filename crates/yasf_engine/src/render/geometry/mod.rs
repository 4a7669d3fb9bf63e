//! Parametric geometry generators
//!
//! Each generator is a plain parameter struct with a `build` method returning
//! a [`Mesh`](crate::render::primitives::Mesh) centered on its local origin.
//! Parameters are assumed valid; the primitive factory checks them first.

pub mod plane;
pub mod cuboid;
pub mod triangle;
pub mod cylinder;
pub mod sphere;
pub mod nurbs;
pub mod polygon;

pub use plane::PlaneGeometry;
pub use cuboid::BoxGeometry;
pub use triangle::TriangleGeometry;
pub use cylinder::CylinderGeometry;
pub use sphere::SphereGeometry;
pub use nurbs::NurbsSurface;
pub use polygon::PolygonGeometry;
