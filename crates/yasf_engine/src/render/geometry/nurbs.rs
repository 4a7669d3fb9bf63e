//! Rational B-spline surfaces over clamped uniform knot vectors

use crate::foundation::math::{Vec3, Vec4};
use crate::render::primitives::{Mesh, Vertex};

/// NURBS surface patch
///
/// Control points are homogeneous `(x, y, z, w)` laid out row-major as
/// `(degree_u + 1)` rows of `(degree_v + 1)` points. Both knot vectors are
/// clamped: `degree + 1` zeros followed by `degree + 1` ones.
#[derive(Debug, Clone, PartialEq)]
pub struct NurbsSurface {
    degree_u: usize,
    degree_v: usize,
    knots_u: Vec<f32>,
    knots_v: Vec<f32>,
    control_points: Vec<Vec<Vec4>>,
}

impl NurbsSurface {
    /// Build a surface from a flat control point list
    ///
    /// Returns `None` when the point count does not match the degrees.
    pub fn new(degree_u: usize, degree_v: usize, points: &[Vec4]) -> Option<Self> {
        // each direction needs degree + 1 points
        if degree_u >= points.len() || degree_v >= points.len() {
            return None;
        }
        let columns = degree_v.checked_add(1)?;
        if Some(points.len()) != degree_u.checked_add(1)?.checked_mul(columns) {
            return None;
        }

        let control_points = points.chunks_exact(columns).map(<[Vec4]>::to_vec).collect();
        Some(Self {
            degree_u,
            degree_v,
            knots_u: clamped_knots(degree_u),
            knots_v: clamped_knots(degree_v),
            control_points,
        })
    }

    /// Evaluate the surface at `(u, v)` in `[0, 1]²`
    pub fn point(&self, u: f32, v: f32) -> Vec3 {
        let span_u = find_span(self.degree_u, u, &self.knots_u);
        let span_v = find_span(self.degree_v, v, &self.knots_v);
        let basis_u = basis_functions(span_u, u, self.degree_u, &self.knots_u);
        let basis_v = basis_functions(span_v, v, self.degree_v, &self.knots_v);

        let mut weighted = Vec4::zeros();
        for (l, bv) in basis_v.iter().enumerate() {
            let mut row = Vec4::zeros();
            for (k, bu) in basis_u.iter().enumerate() {
                let p = self.control_points[span_u - self.degree_u + k][span_v - self.degree_v + l];
                // homogeneous form: (x*w, y*w, z*w, w)
                row += Vec4::new(p.x * p.w, p.y * p.w, p.z * p.w, p.w) * *bu;
            }
            weighted += row * *bv;
        }

        if weighted.w.abs() <= f32::EPSILON {
            return weighted.xyz();
        }
        weighted.xyz() / weighted.w
    }

    /// Tessellate into a `(parts_u + 1) × (parts_v + 1)` vertex grid
    pub fn tessellate(&self, parts_u: u32, parts_v: u32) -> Mesh {
        let (stacks, slices) = (parts_u.max(1), parts_v.max(1));
        let row_len = slices + 1;

        let mut vertices = Vec::with_capacity(((stacks + 1) * row_len) as usize);
        for i in 0..=stacks {
            let u = i as f32 / stacks as f32;
            for j in 0..=slices {
                let v = j as f32 / slices as f32;
                vertices.push(Vertex::new(self.point(u, v).into(), [0.0; 3], [u, v]));
            }
        }

        let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);
        for i in 0..stacks {
            for j in 0..slices {
                let a = i * row_len + j;
                let b = i * row_len + j + 1;
                let c = (i + 1) * row_len + j + 1;
                let d = (i + 1) * row_len + j;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        let mut mesh = Mesh::new(vertices, indices);
        mesh.compute_vertex_normals();
        mesh
    }
}

fn clamped_knots(degree: usize) -> Vec<f32> {
    let mut knots = vec![0.0; degree + 1];
    knots.extend(std::iter::repeat(1.0).take(degree + 1));
    knots
}

/// Index of the knot span containing `u`
fn find_span(degree: usize, u: f32, knots: &[f32]) -> usize {
    let n = knots.len() - degree - 1;

    if u >= knots[n] {
        return n - 1;
    }
    if u <= knots[degree] {
        return degree;
    }

    let (mut low, mut high) = (degree, n);
    let mut mid = (low + high) / 2;
    while u < knots[mid] || u >= knots[mid + 1] {
        if u < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }
    mid
}

/// Non-vanishing B-spline basis functions at `u` (Cox-de Boor)
fn basis_functions(span: usize, u: f32, degree: usize, knots: &[f32]) -> Vec<f32> {
    let mut basis = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];
    basis[0] = 1.0;

    for j in 1..=degree {
        left[j] = u - knots[span + 1 - j];
        right[j] = knots[span + j] - u;

        let mut saved = 0.0;
        for r in 0..j {
            let rv = right[r + 1];
            let lv = left[j - r];
            let temp = basis[r] / (rv + lv);
            basis[r] = rv.mul_add(temp, saved);
            saved = lv * temp;
        }
        basis[j] = saved;
    }

    basis
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_patch() -> NurbsSurface {
        let points = [
            Vec4::new(-1.0, -1.0, 0.0, 1.0),
            Vec4::new(-1.0, 1.0, 0.0, 1.0),
            Vec4::new(1.0, -1.0, 0.0, 1.0),
            Vec4::new(1.0, 1.0, 0.0, 1.0),
        ];
        NurbsSurface::new(1, 1, &points).unwrap()
    }

    #[test]
    fn test_corners_interpolate_control_points() {
        let surface = flat_patch();
        assert_relative_eq!(surface.point(0.0, 0.0), Vec3::new(-1.0, -1.0, 0.0));
        assert_relative_eq!(surface.point(1.0, 1.0), Vec3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(surface.point(0.5, 0.5), Vec3::zeros());
    }

    #[test]
    fn test_point_count_must_match_degrees() {
        let points = [Vec4::new(0.0, 0.0, 0.0, 1.0); 5];
        assert!(NurbsSurface::new(1, 1, &points).is_none());
        assert!(NurbsSurface::new(1, 2, &[Vec4::new(0.0, 0.0, 0.0, 1.0); 6]).is_some());
    }

    #[test]
    fn test_degree_beyond_point_count() {
        let points = [Vec4::new(0.0, 0.0, 0.0, 1.0); 4];
        assert!(NurbsSurface::new(usize::MAX, 1, &points).is_none());
        assert!(NurbsSurface::new(1, usize::MAX, &points).is_none());
        assert!(NurbsSurface::new(4, 0, &points).is_none());
        assert!(NurbsSurface::new(3, 0, &points).is_some());
    }

    #[test]
    fn test_quadratic_curve_with_weights() {
        // quarter circle of radius 1 in the XZ plane, extruded along Y
        let w = std::f32::consts::FRAC_1_SQRT_2;
        let points = [
            Vec4::new(1.0, 0.0, 0.0, 1.0),
            Vec4::new(1.0, 1.0, 0.0, 1.0),
            Vec4::new(1.0, 0.0, 1.0, w),
            Vec4::new(1.0, 1.0, 1.0, w),
            Vec4::new(0.0, 0.0, 1.0, 1.0),
            Vec4::new(0.0, 1.0, 1.0, 1.0),
        ];
        let surface = NurbsSurface::new(2, 1, &points).unwrap();
        for step in 0..=8 {
            let p = surface.point(step as f32 / 8.0, 0.0);
            assert_relative_eq!((p.x * p.x + p.z * p.z).sqrt(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_tessellation_grid() {
        let mesh = flat_patch().tessellate(4, 3);
        assert_eq!(mesh.vertices.len(), 5 * 4);
        assert_eq!(mesh.triangle_count(), 4 * 3 * 2);
        assert_eq!(mesh.vertices.last().unwrap().tex_coord, [1.0, 1.0]);
    }
}
