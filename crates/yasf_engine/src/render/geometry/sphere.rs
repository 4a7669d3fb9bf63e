//! UV sphere with optional partial sweeps

use std::f32::consts::{PI, TAU};

use crate::foundation::math::Vec3;
use crate::render::primitives::{Mesh, Vertex};

/// Sphere centered on the origin
///
/// `phi` sweeps around the Y axis, `theta` sweeps from the north pole (+Y)
/// down to the south pole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereGeometry {
    /// Radius
    pub radius: f32,
    /// Segments around the Y axis
    pub width_segments: u32,
    /// Segments from pole to pole
    pub height_segments: u32,
    /// Horizontal start angle, radians
    pub phi_start: f32,
    /// Horizontal sweep, radians
    pub phi_length: f32,
    /// Vertical start angle, radians
    pub theta_start: f32,
    /// Vertical sweep, radians
    pub theta_length: f32,
}

impl SphereGeometry {
    /// Full sphere
    pub const fn new(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self {
            radius,
            width_segments,
            height_segments,
            phi_start: 0.0,
            phi_length: TAU,
            theta_start: 0.0,
            theta_length: PI,
        }
    }

    /// Build the mesh
    pub fn build(&self) -> Mesh {
        let columns = self.width_segments.max(3);
        let rows = self.height_segments.max(2);
        let theta_end = (self.theta_start + self.theta_length).min(PI);
        let row_len = columns + 1;

        let mut vertices = Vec::with_capacity((row_len * (rows + 1)) as usize);
        for iy in 0..=rows {
            let v = iy as f32 / rows as f32;

            // Shift pole UVs half a segment so the pole triangles sample their own column.
            let u_offset = if iy == 0 && self.theta_start == 0.0 {
                0.5 / columns as f32
            } else if iy == rows && theta_end == PI {
                -0.5 / columns as f32
            } else {
                0.0
            };

            let theta = v.mul_add(self.theta_length, self.theta_start);
            for ix in 0..=columns {
                let u = ix as f32 / columns as f32;
                let phi = u.mul_add(self.phi_length, self.phi_start);

                let position = Vec3::new(
                    -self.radius * phi.cos() * theta.sin(),
                    self.radius * theta.cos(),
                    self.radius * phi.sin() * theta.sin(),
                );
                let normal = position.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::y);
                vertices.push(Vertex::new(position.into(), normal.into(), [u + u_offset, 1.0 - v]));
            }
        }

        let mut indices = Vec::new();
        for iy in 0..rows {
            for ix in 0..columns {
                let a = iy * row_len + ix + 1;
                let b = iy * row_len + ix;
                let c = (iy + 1) * row_len + ix;
                let d = (iy + 1) * row_len + ix + 1;

                if iy != 0 || self.theta_start > 0.0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != rows - 1 || theta_end < PI {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Mesh::new(vertices, indices)
    }
}
