//! # 3D Camera System
//!
//! Cameras declared by a scene document. A camera is a position, a look-at
//! target and either a perspective or an orthographic projection.
//!
//! ## Coordinate System
//! Standard right-handed Y-up view space; the camera looks down its local -Z.

use crate::foundation::math::{Vec3, Mat4, Mat4Ext, utils};

/// Projection parameters of a camera
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Perspective projection
    Perspective {
        /// Vertical field of view in radians
        fov: f32,
        /// Aspect ratio (width / height)
        aspect: f32,
        /// Distance to near clipping plane
        near: f32,
        /// Distance to far clipping plane
        far: f32,
    },
    /// Orthographic projection
    Orthographic {
        /// Left plane
        left: f32,
        /// Right plane
        right: f32,
        /// Top plane
        top: f32,
        /// Bottom plane
        bottom: f32,
        /// Distance to near clipping plane
        near: f32,
        /// Distance to far clipping plane
        far: f32,
    },
}

/// 3D Camera for perspective and orthographic projections
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera id from the document
    pub name: String,

    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Projection parameters
    pub projection: Projection,
}

impl Camera {
    /// Create a perspective camera
    ///
    /// # Arguments
    /// * `fov_degrees` - Vertical field of view in degrees (converted to radians internally)
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    ///
    /// The target defaults to the origin and up to +Y.
    pub fn perspective(name: impl Into<String>, position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            name: name.into(),
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            projection: Projection::Perspective {
                fov: utils::deg_to_rad(fov_degrees),
                aspect,
                near,
                far,
            },
        }
    }

    /// Create an orthographic camera from its frustum planes
    pub fn orthographic(
        name: impl Into<String>,
        position: Vec3,
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            projection: Projection::Orthographic { left, right, top, bottom, near, far },
        }
    }

    /// Aim the camera at a point in world space
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
        log::trace!("Camera '{}' looking at {:?}", self.name, target);
    }

    /// Update the aspect ratio of a perspective camera
    pub fn set_aspect_ratio(&mut self, new_aspect: f32) {
        if let Projection::Perspective { aspect, .. } = &mut self.projection {
            *aspect = new_aspect;
        }
    }

    /// Generate view matrix for world-to-camera space transformation
    pub fn get_view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Generate the projection matrix
    pub fn get_projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective { fov, aspect, near, far } => Mat4::perspective(fov, aspect, near, far),
            Projection::Orthographic { left, right, top, bottom, near, far } => {
                Mat4::orthographic(left, right, bottom, top, near, far)
            }
        }
    }

    /// Generate combined view-projection matrix (P × V)
    pub fn get_view_projection_matrix(&self) -> Mat4 {
        self.get_projection_matrix() * self.get_view_matrix()
    }

    /// True for orthographic cameras
    pub const fn is_orthographic(&self) -> bool {
        matches!(self.projection, Projection::Orthographic { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec4;
    use approx::assert_relative_eq;

    #[test]
    fn test_perspective_fov_is_radians() {
        let camera = Camera::perspective("main", Vec3::new(0.0, 0.0, 5.0), 90.0, 1.0, 0.1, 100.0);
        match camera.projection {
            Projection::Perspective { fov, .. } => {
                assert_relative_eq!(fov, std::f32::consts::FRAC_PI_2);
            }
            Projection::Orthographic { .. } => panic!("expected perspective"),
        }
    }

    #[test]
    fn test_view_matrix_moves_target_onto_negative_z() {
        let mut camera = Camera::perspective("main", Vec3::new(0.0, 0.0, 5.0), 60.0, 1.0, 0.1, 100.0);
        camera.look_at(Vec3::zeros());

        let target_in_view = camera.get_view_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(target_in_view.z, -5.0, epsilon = 1e-5);
        assert_relative_eq!(target_in_view.x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_orthographic_maps_planes_to_ndc() {
        let camera = Camera::orthographic("top", Vec3::zeros(), -2.0, 2.0, 1.0, -1.0, 0.1, 10.0);
        assert!(camera.is_orthographic());

        let projected = camera.get_projection_matrix() * Vec4::new(2.0, 1.0, -0.1, 1.0);
        assert_relative_eq!(projected.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(projected.y, 1.0, epsilon = 1e-5);
    }
}
