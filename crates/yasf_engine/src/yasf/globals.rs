//! Globals section: background, ambient light, fog and skybox
//!
//! Every field here is required. Fog and skybox may sit inside `globals` or
//! next to it at the top level of the document.

use serde_json::Value;

use super::document::Section;
use super::error::CompileError;
use crate::render::color::Color;
use crate::render::environment::{Fog, Skybox, SkyboxFaces};
use crate::render::lighting::AmbientLight;

/// Scene-wide settings
#[derive(Debug, Clone, PartialEq)]
pub struct Globals {
    /// Clear color
    pub background: Color,
    /// Ambient term
    pub ambient: AmbientLight,
    /// Distance fog
    pub fog: Fog,
    /// Surrounding skybox
    pub skybox: Skybox,
}

/// Read the globals from the scene object
pub fn parse_globals(root: &Value) -> Result<Globals, CompileError> {
    let document = Section::new("yasf", root);
    let globals = document.child("globals")?;

    let ambient = globals.child("ambient")?;
    let ambient = AmbientLight {
        color: ambient.as_color()?,
        intensity: ambient.number("intensity")?,
    };

    let fog = nested_or_sibling(&globals, &document, "fog")?;
    let fog = Fog {
        color: fog.color("color")?,
        near: fog.number("near")?,
        far: fog.number("far")?,
    };

    let skybox = nested_or_sibling(&globals, &document, "skybox")?;
    let skybox = Skybox {
        size: skybox.vec3("size")?,
        center: skybox.vec3("center")?,
        emissive: skybox.color("emissive")?,
        intensity: skybox.number("intensity")?,
        faces: SkyboxFaces {
            front: skybox.string("front")?.into(),
            back: skybox.string("back")?.into(),
            up: skybox.string("up")?.into(),
            down: skybox.string("down")?.into(),
            left: skybox.string("left")?.into(),
            right: skybox.string("right")?.into(),
        },
    };

    log::debug!("Parsed globals: fog {}..{}, skybox {:?}", fog.near, fog.far, skybox.size);

    Ok(Globals {
        background: globals.color("background")?,
        ambient,
        fog,
        skybox,
    })
}

fn nested_or_sibling<'a>(globals: &Section<'a>, document: &Section<'a>, field: &str) -> Result<Section<'a>, CompileError> {
    if globals.get(field).is_some() {
        globals.child(field)
    } else if document.get(field).is_some() {
        document.child(field)
    } else {
        Err(CompileError::missing(globals.name(), field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use serde_json::json;

    fn skybox() -> Value {
        json!({
            "size": {"x": 100, "y": 100, "z": 100},
            "center": {"x": 0, "y": 0, "z": 0},
            "emissive": {"r": 1, "g": 1, "b": 1},
            "intensity": 0.5,
            "front": "f.png", "back": "b.png", "up": "u.png",
            "down": "d.png", "left": "l.png", "right": "r.png"
        })
    }

    #[test]
    fn test_sibling_fog_and_skybox() {
        let root = json!({
            "globals": {
                "background": {"r": 0.1, "g": 0.2, "b": 0.3},
                "ambient": {"r": 1, "g": 1, "b": 1, "intensity": 0.4}
            },
            "fog": {"color": {"r": 0.5, "g": 0.5, "b": 0.5}, "near": 10, "far": 200},
            "skybox": skybox()
        });

        let globals = parse_globals(&root).unwrap();
        assert_eq!(globals.background, Color::new(0.1, 0.2, 0.3));
        assert_eq!(globals.ambient.intensity, 0.4);
        assert_eq!(globals.fog.far, 200.0);
        assert_eq!(globals.skybox.size, Vec3::new(100.0, 100.0, 100.0));
        assert_eq!(globals.skybox.faces.left.to_str(), Some("l.png"));
    }

    #[test]
    fn test_missing_field_is_fatal() {
        let root = json!({
            "globals": {
                "background": {"r": 0.1, "g": 0.2, "b": 0.3},
                "ambient": {"r": 1, "g": 1, "b": 1},
                "fog": {"color": {"r": 0.5, "g": 0.5, "b": 0.5}, "near": 10, "far": 200},
                "skybox": skybox()
            }
        });

        match parse_globals(&root) {
            Err(CompileError::MissingField { section, field }) => {
                assert_eq!(section, "yasf.globals.ambient");
                assert_eq!(field, "intensity");
            }
            other => panic!("expected a missing field, got {other:?}"),
        }
    }
}
