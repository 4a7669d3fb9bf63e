//! Filled disc with a radial color gradient

use std::f32::consts::TAU;

use crate::render::color::Color;
use crate::render::primitives::{Mesh, Vertex};

/// Disc in the XY plane made of `stacks` concentric rings of `slices` points
/// around a center vertex. Vertex colors blend from `center_color` at the
/// center to `perimeter_color` on the outer ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonGeometry {
    /// Outer radius
    pub radius: f32,
    /// Number of rings
    pub stacks: u32,
    /// Points per ring
    pub slices: u32,
    /// Color at the center
    pub center_color: Color,
    /// Color on the outer ring
    pub perimeter_color: Color,
}

impl PolygonGeometry {
    /// Index of point `slice` on ring `stack` (1-based ring numbering)
    fn ring_index(&self, stack: u32, slice: u32) -> u32 {
        1 + (stack - 1) * self.slices + slice % self.slices
    }

    /// Build the mesh, with vertex colors
    pub fn build(&self) -> Mesh {
        let normal = [0.0, 0.0, 1.0];
        let diameter = 2.0 * self.radius;

        let mut vertices = vec![Vertex::new([0.0, 0.0, 0.0], normal, [0.5, 0.5])];
        let mut colors = vec![self.center_color.to_array()];

        for stack in 1..=self.stacks {
            let fraction = stack as f32 / self.stacks as f32;
            let ring_radius = self.radius * fraction;
            let color = self.center_color.lerp(self.perimeter_color, fraction).to_array();

            for slice in 0..self.slices {
                let angle = TAU * slice as f32 / self.slices as f32;
                let (sin, cos) = angle.sin_cos();
                let (x, y) = (ring_radius * cos, ring_radius * sin);

                vertices.push(Vertex::new([x, y, 0.0], normal, [0.5 + x / diameter, 0.5 - y / diameter]));
                colors.push(color);
            }
        }

        let mut indices = Vec::with_capacity((self.slices * (1 + 2 * (self.stacks - 1)) * 3) as usize);
        for slice in 0..self.slices {
            indices.extend_from_slice(&[0, self.ring_index(1, slice), self.ring_index(1, slice + 1)]);
        }
        for stack in 1..self.stacks {
            for slice in 0..self.slices {
                let a = self.ring_index(stack, slice);
                let b = self.ring_index(stack + 1, slice);
                let c = self.ring_index(stack + 1, slice + 1);
                let d = self.ring_index(stack, slice + 1);
                indices.extend_from_slice(&[a, b, c, a, c, d]);
            }
        }

        Mesh::new(vertices, indices).with_colors(colors)
    }
}
