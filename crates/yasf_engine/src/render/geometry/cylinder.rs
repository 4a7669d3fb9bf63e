//! Cylinder / truncated cone around the Y axis

use std::f32::consts::TAU;

use crate::foundation::math::Vec3;
use crate::render::primitives::{Mesh, Vertex};

/// Cylinder centered on the origin, height along Y
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderGeometry {
    /// Radius of the top (+Y) ring
    pub radius_top: f32,
    /// Radius of the bottom (-Y) ring
    pub radius_bottom: f32,
    /// Height
    pub height: f32,
    /// Subdivisions around the axis
    pub radial_segments: u32,
    /// Subdivisions along the axis
    pub height_segments: u32,
    /// Skip the end caps
    pub open_ended: bool,
    /// Start angle of the sweep, radians
    pub theta_start: f32,
    /// Sweep angle, radians
    pub theta_length: f32,
}

impl CylinderGeometry {
    /// Closed cylinder with a full sweep
    pub const fn new(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32, height_segments: u32) -> Self {
        Self {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
            height_segments,
            open_ended: false,
            theta_start: 0.0,
            theta_length: TAU,
        }
    }

    /// Build the mesh
    pub fn build(&self) -> Mesh {
        let mut mesh = Mesh::default();
        self.push_torso(&mut mesh);

        if !self.open_ended {
            if self.radius_top > 0.0 {
                self.push_cap(&mut mesh, true);
            }
            if self.radius_bottom > 0.0 {
                self.push_cap(&mut mesh, false);
            }
        }

        mesh
    }

    fn push_torso(&self, mesh: &mut Mesh) {
        let radial = self.radial_segments.max(1);
        let rows = self.height_segments.max(1);
        let half_height = self.height / 2.0;
        let slope = (self.radius_bottom - self.radius_top) / self.height;
        let row_len = radial + 1;

        for y in 0..=rows {
            let v = y as f32 / rows as f32;
            let radius = v.mul_add(self.radius_bottom - self.radius_top, self.radius_top);

            for x in 0..=radial {
                let u = x as f32 / radial as f32;
                let theta = u.mul_add(self.theta_length, self.theta_start);
                let (sin_theta, cos_theta) = theta.sin_cos();

                let normal = Vec3::new(sin_theta, slope, cos_theta).normalize();
                mesh.vertices.push(Vertex::new(
                    [radius * sin_theta, (-v).mul_add(self.height, half_height), radius * cos_theta],
                    normal.into(),
                    [u, 1.0 - v],
                ));
            }
        }

        for y in 0..rows {
            for x in 0..radial {
                let a = y * row_len + x;
                let b = (y + 1) * row_len + x;
                let c = (y + 1) * row_len + x + 1;
                let d = y * row_len + x + 1;
                mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
    }

    fn push_cap(&self, mesh: &mut Mesh, top: bool) {
        let radial = self.radial_segments.max(1);
        let (radius, sign) = if top { (self.radius_top, 1.0) } else { (self.radius_bottom, -1.0) };
        let y = self.height / 2.0 * sign;
        let normal = [0.0, sign, 0.0];

        // one center vertex per segment so each wedge gets its own UV center
        let center_start = mesh.vertices.len() as u32;
        for _ in 0..radial {
            mesh.vertices.push(Vertex::new([0.0, y, 0.0], normal, [0.5, 0.5]));
        }

        let ring_start = mesh.vertices.len() as u32;
        for x in 0..=radial {
            let u = x as f32 / radial as f32;
            let theta = u.mul_add(self.theta_length, self.theta_start);
            let (sin_theta, cos_theta) = theta.sin_cos();
            mesh.vertices.push(Vertex::new(
                [radius * sin_theta, y, radius * cos_theta],
                normal,
                [cos_theta.mul_add(0.5, 0.5), (sin_theta * 0.5).mul_add(sign, 0.5)],
            ));
        }

        for x in 0..radial {
            let center = center_start + x;
            let i = ring_start + x;
            if top {
                mesh.indices.extend_from_slice(&[i, i + 1, center]);
            } else {
                mesh.indices.extend_from_slice(&[i + 1, i, center]);
            }
        }
    }
}
