//! # Render Data
//!
//! Backend-agnostic render resources produced by the scene compiler. Nothing
//! here talks to a graphics API; a host renderer consumes these types.
//!
//! - **Geometry**: parametric generators producing [`Mesh`] data
//! - **Materials and textures**: shared [`Material`] records and [`TextureHandle`]s
//! - **Lighting**: point, spot and directional [`Light`]s with their helpers
//! - **Environment**: fog and skybox

pub mod color;
pub mod texture;
pub mod material;
pub mod lighting;
pub mod environment;
pub mod geometry;
pub mod primitives;

pub use color::Color;
pub use texture::{TextureHandle, TextureData, TextureSource, TextureSlot, LoadStatus, VideoSource};
pub use material::{Material, Side};
pub use lighting::{Light, LightType, LightHelper, AmbientLight, ShadowSettings, ShadowFrustum};
pub use environment::{Fog, Skybox, SkyboxFaces};
pub use primitives::{Mesh, Vertex, Camera, Projection};
