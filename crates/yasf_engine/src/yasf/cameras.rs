//! Cameras section

use std::collections::HashMap;

use serde_json::Value;

use super::document::{CameraDef, Section};
use super::error::CompileError;
use crate::render::primitives::Camera;

/// Aspect ratio cameras start with; hosts update it to match their viewport
pub const DEFAULT_ASPECT: f32 = 1.0;

/// Named cameras plus the one shown first
#[derive(Debug, Clone)]
pub struct CameraSet {
    /// Cameras by id
    pub cameras: HashMap<String, Camera>,
    /// Id of the initial camera, always a key of `cameras`
    pub initial: String,
}

/// Build a camera from its definition
pub fn build_camera(id: &str, def: &CameraDef) -> Camera {
    let (mut camera, target) = match *def {
        CameraDef::Perspective { angle, near, far, location, target } => (
            Camera::perspective(id, location.into(), angle, DEFAULT_ASPECT, near, far),
            target,
        ),
        CameraDef::Orthogonal { left, right, top, bottom, near, far, location, target } => (
            Camera::orthographic(id, location.into(), left, right, top, bottom, near, far),
            target,
        ),
    };
    camera.look_at(target.into());
    camera
}

/// Read the cameras section from the scene object
pub fn parse_cameras(root: &Value) -> Result<CameraSet, CompileError> {
    let section = Section::new("yasf", root).child("cameras")?;
    let initial = section.string("initial")?.to_owned();

    let defs = section.entries::<CameraDef>(&["initial"])?;
    let cameras: HashMap<_, _> = defs.iter().map(|(id, def)| (id.clone(), build_camera(id, def))).collect();

    if !cameras.contains_key(&initial) {
        return Err(CompileError::UnknownCamera(initial));
    }

    log::debug!("Parsed {} cameras, initial '{}'", cameras.len(), initial);
    Ok(CameraSet { cameras, initial })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::primitives::Projection;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn cameras(initial: &str) -> Value {
        json!({
            "cameras": {
                "initial": initial,
                "main": {
                    "type": "perspective", "angle": 60, "near": 0.1, "far": 1000,
                    "location": {"x": 0, "y": 5, "z": 10}, "target": {"x": 0, "y": 0, "z": 0}
                },
                "top": {
                    "type": "orthogonal", "left": -10, "right": 10, "top": 10, "bottom": -10,
                    "near": 0.1, "far": 100,
                    "location": {"x": 0, "y": 20, "z": 0}, "target": {"x": 0, "y": 0, "z": 0}
                }
            }
        })
    }

    #[test]
    fn test_parse_both_projections() {
        let set = parse_cameras(&cameras("main")).unwrap();
        assert_eq!(set.initial, "main");
        assert_eq!(set.cameras.len(), 2);

        let main = &set.cameras["main"];
        assert_eq!(main.position, Vec3::new(0.0, 5.0, 10.0));
        assert_eq!(main.target, Vec3::zeros());
        match main.projection {
            Projection::Perspective { fov, .. } => assert_relative_eq!(fov, std::f32::consts::FRAC_PI_3),
            Projection::Orthographic { .. } => panic!("expected perspective"),
        }
        assert!(set.cameras["top"].is_orthographic());
    }

    #[test]
    fn test_unknown_initial_camera() {
        assert!(matches!(
            parse_cameras(&cameras("missing")),
            Err(CompileError::UnknownCamera(id)) if id == "missing"
        ));
    }
}
