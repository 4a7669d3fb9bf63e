//! Axis-aligned box built from six subdivided faces

use crate::render::primitives::{Mesh, Vertex};

/// Box of `width` × `height` × `depth` centered on the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    /// Extent along X
    pub width: f32,
    /// Extent along Y
    pub height: f32,
    /// Extent along Z
    pub depth: f32,
    /// Subdivisions along X
    pub width_segments: u32,
    /// Subdivisions along Y
    pub height_segments: u32,
    /// Subdivisions along Z
    pub depth_segments: u32,
}

/// One face: which axes the grid spans, their directions, and the face offset
struct Face {
    u: usize,
    v: usize,
    w: usize,
    u_dir: f32,
    v_dir: f32,
    width: f32,
    height: f32,
    depth: f32,
    grid_x: u32,
    grid_y: u32,
}

impl BoxGeometry {
    /// Box with one segment per axis
    pub const fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
            width_segments: 1,
            height_segments: 1,
            depth_segments: 1,
        }
    }

    /// Build the mesh
    pub fn build(&self) -> Mesh {
        let (w, h, d) = (self.width, self.height, self.depth);
        let (ws, hs, ds) = (
            self.width_segments.max(1),
            self.height_segments.max(1),
            self.depth_segments.max(1),
        );

        // px, nx, py, ny, pz, nz
        let faces = [
            Face { u: 2, v: 1, w: 0, u_dir: -1.0, v_dir: -1.0, width: d, height: h, depth: w, grid_x: ds, grid_y: hs },
            Face { u: 2, v: 1, w: 0, u_dir: 1.0, v_dir: -1.0, width: d, height: h, depth: -w, grid_x: ds, grid_y: hs },
            Face { u: 0, v: 2, w: 1, u_dir: 1.0, v_dir: 1.0, width: w, height: d, depth: h, grid_x: ws, grid_y: ds },
            Face { u: 0, v: 2, w: 1, u_dir: 1.0, v_dir: -1.0, width: w, height: d, depth: -h, grid_x: ws, grid_y: ds },
            Face { u: 0, v: 1, w: 2, u_dir: 1.0, v_dir: -1.0, width: w, height: h, depth: d, grid_x: ws, grid_y: hs },
            Face { u: 0, v: 1, w: 2, u_dir: -1.0, v_dir: -1.0, width: w, height: h, depth: -d, grid_x: ws, grid_y: hs },
        ];

        let mut mesh = Mesh::default();
        for face in &faces {
            push_face(&mut mesh, face);
        }
        mesh
    }
}

fn push_face(mesh: &mut Mesh, face: &Face) {
    let base = mesh.vertices.len() as u32;
    let segment_width = face.width / face.grid_x as f32;
    let segment_height = face.height / face.grid_y as f32;
    let half_width = face.width / 2.0;
    let half_height = face.height / 2.0;
    let half_depth = face.depth / 2.0;
    let grid_x1 = face.grid_x + 1;

    for iy in 0..=face.grid_y {
        let y = (iy as f32).mul_add(segment_height, -half_height);
        for ix in 0..=face.grid_x {
            let x = (ix as f32).mul_add(segment_width, -half_width);

            let mut position = [0.0; 3];
            position[face.u] = x * face.u_dir;
            position[face.v] = y * face.v_dir;
            position[face.w] = half_depth;

            let mut normal = [0.0; 3];
            normal[face.w] = if face.depth > 0.0 { 1.0 } else { -1.0 };

            let uv = [ix as f32 / face.grid_x as f32, 1.0 - iy as f32 / face.grid_y as f32];
            mesh.vertices.push(Vertex::new(position, normal, uv));
        }
    }

    for iy in 0..face.grid_y {
        for ix in 0..face.grid_x {
            let a = base + ix + grid_x1 * iy;
            let b = base + ix + grid_x1 * (iy + 1);
            let c = base + (ix + 1) + grid_x1 * (iy + 1);
            let d = base + (ix + 1) + grid_x1 * iy;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
}
