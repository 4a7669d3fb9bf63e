//! Scene-wide environment: fog and the skybox

use std::path::PathBuf;

use crate::foundation::math::Vec3;
use crate::render::color::Color;
use crate::render::geometry::BoxGeometry;
use crate::render::primitives::Mesh;

/// Linear distance fog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    /// Fog color
    pub color: Color,
    /// Distance where fog starts
    pub near: f32,
    /// Distance of full fog
    pub far: f32,
}

impl Fog {
    /// Fog factor at a view distance, 0 before `near` and 1 past `far`
    pub fn factor(&self, distance: f32) -> f32 {
        if self.far <= self.near {
            return if distance >= self.far { 1.0 } else { 0.0 };
        }
        ((distance - self.near) / (self.far - self.near)).clamp(0.0, 1.0)
    }
}

/// Image paths of the six skybox faces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkyboxFaces {
    /// +Z face
    pub front: PathBuf,
    /// -Z face
    pub back: PathBuf,
    /// +Y face
    pub up: PathBuf,
    /// -Y face
    pub down: PathBuf,
    /// -X face
    pub left: PathBuf,
    /// +X face
    pub right: PathBuf,
}

impl SkyboxFaces {
    /// Faces in box face order: +X, -X, +Y, -Y, +Z, -Z
    pub fn in_box_order(&self) -> [&PathBuf; 6] {
        [&self.right, &self.left, &self.up, &self.down, &self.front, &self.back]
    }
}

/// Textured box surrounding the scene, seen from inside
#[derive(Debug, Clone, PartialEq)]
pub struct Skybox {
    /// Extent along each axis
    pub size: Vec3,
    /// Center in world space
    pub center: Vec3,
    /// Emissive tint
    pub emissive: Color,
    /// Emissive intensity
    pub intensity: f32,
    /// Face images
    pub faces: SkyboxFaces,
}

impl Skybox {
    /// Inward-facing box mesh, centered on the local origin
    pub fn mesh(&self) -> Mesh {
        let mut mesh = BoxGeometry::new(self.size.x, self.size.y, self.size.z).build();
        mesh.flip_faces();
        mesh
    }
}
