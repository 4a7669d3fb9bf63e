use std::f32::consts::PI;
use std::sync::Arc;

use approx::assert_relative_eq;
use serde_json::json;

use super::{compile, deferred_compiler, document};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::render::color::Color;
use crate::render::lighting::LightType;
use crate::render::material::Side;
use crate::scene::{Group, MeshObject, SceneObject};
use crate::yasf::CompileError;

fn mesh<'a>(group: &'a Group, name: &str) -> &'a MeshObject {
    match group.child(name) {
        Some(SceneObject::Mesh(mesh)) => mesh,
        other => panic!("expected mesh '{name}', found {other:?}"),
    }
}

fn unit_box() -> serde_json::Value {
    json!({"type": "box", "xyz1": {"x": 0, "y": 0, "z": 0}, "xyz2": {"x": 1, "y": 1, "z": 1}})
}

#[test]
fn test_translate_then_rotate_order() {
    let compiled = compile(&document(json!({
        "rootid": "root",
        "root": {
            "type": "node",
            "transforms": [
                {"type": "translate", "amount": {"x": 1, "y": 0, "z": 0}},
                {"type": "rotate", "amount": {"x": 0, "y": 90, "z": 0}}
            ]
        }
    })));

    let expected = Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0)) * Mat4::rotation_y(PI / 2.0);
    let reversed = Mat4::rotation_y(PI / 2.0) * Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0));
    let actual = compiled.scene.local_matrix();

    assert_relative_eq!(actual, expected, epsilon = 1e-6);
    assert!((actual - reversed).norm() > 0.5);
}

#[test]
fn test_half_turn_is_pi() {
    let compiled = compile(&document(json!({
        "rootid": "root",
        "root": {"type": "node", "transforms": [{"type": "rotate", "amount": {"x": 180, "y": 0, "z": 0}}]}
    })));

    let (axis, angle) = compiled.scene.transform.rotation.axis_angle().unwrap();
    assert_relative_eq!(angle, PI, epsilon = 1e-6);
    assert_relative_eq!(axis.into_inner().x.abs(), 1.0, epsilon = 1e-6);
}

#[test]
fn test_reference_independence() {
    let compiled = compile(&document(json!({
        "rootid": "root",
        "root": {"type": "node", "children": {"nodesList": ["left", "right"]}},
        "left": {"type": "node", "materialref": {"materialId": "red"}, "children": {"nodesList": ["shared"]}},
        "right": {"type": "node", "materialref": {"materialId": "blue"}, "children": {"nodesList": ["shared"]}},
        "shared": {"type": "node", "children": {"piece": unit_box()}}
    })));
    assert!(compiled.is_clean());

    let mut scene = compiled.scene;
    let left = scene.child_group("left").unwrap().child_group("shared").unwrap();
    let right = scene.child_group("right").unwrap().child_group("shared").unwrap();
    assert_eq!(mesh(left, "piece").material.color, Color::new(1.0, 0.0, 0.0));
    assert_eq!(mesh(right, "piece").material.color, Color::new(0.0, 0.0, 1.0));

    scene
        .child_group_mut("left")
        .and_then(|group| group.child_group_mut("shared"))
        .unwrap()
        .transform
        .position = Vec3::new(5.0, 0.0, 0.0);

    let right = scene.child_group("right").unwrap().child_group("shared").unwrap();
    assert_eq!(right.transform.position, Vec3::zeros());
}

#[test]
fn test_primitive_materialref_beats_inherited() {
    let mut own = unit_box();
    own["materialref"] = json!({"materialId": "blue"});

    let compiled = compile(&document(json!({
        "rootid": "root",
        "root": {
            "type": "node",
            "materialref": {"materialId": "red"},
            "children": {"inherits": unit_box(), "overrides": own}
        }
    })));

    assert_eq!(mesh(&compiled.scene, "inherits").material.name, "red");
    assert_eq!(mesh(&compiled.scene, "overrides").material.name, "blue");
    assert!(Arc::ptr_eq(
        &mesh(&compiled.scene, "inherits").material,
        &compiled.materials["red"]
    ));
}

#[test]
fn test_default_material_fallback() {
    let compiled = compile(&document(json!({
        "rootid": "root",
        "root": {"type": "node", "children": {"plain": unit_box()}}
    })));

    let material = &mesh(&compiled.scene, "plain").material;
    assert!(material.flat_shading);
    assert_eq!(material.side, Side::Double);
    assert_eq!(material.color, Color::new(0.8, 0.8, 0.8));
    assert!(compiled.is_clean());
}

#[test]
fn test_box_and_rectangle_centering() {
    let compiled = compile(&document(json!({
        "rootid": "root",
        "root": {"type": "node", "children": {
            "crate": {"type": "box", "xyz1": {"x": 0, "y": 0, "z": 0}, "xyz2": {"x": 2, "y": 4, "z": 6}},
            "sign": {"type": "rectangle", "xy1": {"x": 0, "y": 0}, "xy2": {"x": 2, "y": 4}}
        }}
    })));

    let cuboid = mesh(&compiled.scene, "crate").parent_bounds().unwrap();
    assert_eq!(cuboid.center(), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(cuboid.size(), Vec3::new(2.0, 4.0, 6.0));

    let sign = mesh(&compiled.scene, "sign").parent_bounds().unwrap();
    assert_eq!(sign.center(), Vec3::new(1.0, 2.0, 0.0));
    assert_eq!(sign.size(), Vec3::new(2.0, 4.0, 0.0));
}

#[test]
fn test_polygon_ring_colors() {
    let compiled = compile(&document(json!({
        "rootid": "root",
        "root": {"type": "node", "children": {
            "disc": {
                "type": "polygon", "radius": 3, "stacks": 2, "slices": 10,
                "color_c": {"r": 0.9, "g": 0.3, "b": 0.1},
                "color_p": {"r": 0.2, "g": 0.6, "b": 0.7}
            }
        }}
    })));

    let disc = mesh(&compiled.scene, "disc");
    let center = Color::new(0.9, 0.3, 0.1).to_array();
    let perimeter = Color::new(0.2, 0.6, 0.7).to_array();
    assert_eq!(disc.mesh.colors[0], center);
    assert!(disc.mesh.colors[11..].iter().all(|color| *color == perimeter));
    assert!(disc.material.vertex_colors);
}

#[test]
fn test_lod_breakpoints_sorted() {
    let compiled = compile(&document(json!({
        "rootid": "root",
        "root": {"type": "node", "children": {"lodsList": ["tree"]}},
        "tree": {"type": "lod", "lodNodes": [
            {"nodeId": "low", "mindist": 80},
            {"nodeId": "high", "mindist": 0},
            {"nodeId": "mid", "minDist": 20}
        ]},
        "low": {"type": "node"},
        "mid": {"type": "node"},
        "high": {"type": "node"}
    })));

    let Some(SceneObject::Lod(lod)) = compiled.scene.child("tree") else {
        panic!("expected a LOD switch");
    };
    assert_eq!(lod.distances(), vec![0.0, 20.0, 80.0]);
    let names: Vec<_> = lod.levels.iter().map(|level| level.object.name()).collect();
    assert_eq!(names, vec!["high", "mid", "low"]);
}

#[test]
fn test_unresolvable_root() {
    let compiled = compile(&document(json!({"rootid": "nowhere", "root": {"type": "node"}})));

    assert!(compiled.scene.is_empty());
    assert!(matches!(
        &compiled.diagnostics[..],
        [CompileError::UnresolvedReference { reference, .. }] if reference == "nowhere"
    ));
}

#[test]
fn test_bad_subtrees_do_not_stop_siblings() {
    let compiled = compile(&document(json!({
        "rootid": "root",
        "root": {"type": "node", "children": {
            "teapot": {"type": "teapot"},
            "good": unit_box(),
            "nodesList": ["missing", "fine"]
        }},
        "fine": {"type": "node"}
    })));

    assert!(compiled.scene.child("good").is_some());
    assert!(compiled.scene.child("fine").is_some());
    assert_eq!(compiled.scene.children.len(), 2);
    assert_eq!(compiled.diagnostics.len(), 2);
    assert!(compiled.diagnostics.iter().any(|e| matches!(e, CompileError::UnknownPrimitive { .. })));
    assert!(compiled.diagnostics.iter().any(|e| matches!(e, CompileError::UnresolvedReference { .. })));
}

#[test]
fn test_cycle_through_noderef() {
    let compiled = compile(&document(json!({
        "rootid": "a",
        "a": {"type": "node", "children": {"back": {"type": "noderef", "nodeId": "b"}}},
        "b": {"type": "node", "children": {"nodesList": ["a"]}}
    })));

    let b = compiled.scene.child_group("b").unwrap();
    assert!(b.is_empty());
    assert!(matches!(
        &compiled.diagnostics[..],
        [CompileError::CyclicReference { node_id, reference }] if node_id == "b" && reference == "a"
    ));
}

#[test]
fn test_explicit_castshadows_false_overrides_ancestor() {
    let compiled = compile(&document(json!({
        "rootid": "root",
        "root": {"type": "node", "castshadows": true, "receiveshadows": true, "children": {
            "lit": unit_box(),
            "nodesList": ["shade"]
        }},
        "shade": {"type": "node", "castshadows": false, "children": {"dark": unit_box()}}
    })));

    let lit = mesh(&compiled.scene, "lit");
    assert!(lit.cast_shadow && lit.receive_shadow);

    let dark = mesh(compiled.scene.child_group("shade").unwrap(), "dark");
    assert!(!dark.cast_shadow);
    assert!(dark.receive_shadow);
}

#[test]
fn test_shadows_default_off() {
    let compiled = compile(&document(json!({
        "rootid": "root",
        "root": {"type": "node", "children": {"plain": unit_box()}}
    })));
    let plain = mesh(&compiled.scene, "plain");
    assert!(!plain.cast_shadow && !plain.receive_shadow);
}

#[test]
fn test_light_and_helper_attached_together() {
    let compiled = compile(&document(json!({
        "rootid": "root",
        "root": {"type": "node", "children": {
            "bulb": {"type": "pointlight", "color": {"r": 1, "g": 1, "b": 0.8}, "position": {"x": 0, "y": 3, "z": 0}, "castshadow": true}
        }}
    })));

    assert_eq!(compiled.scene.children.len(), 2);
    let lights = compiled.scene.lights();
    assert_eq!(lights.len(), 1);
    assert!(lights[0].shadow.cast);
    assert!(matches!(lights[0].light_type, LightType::Point { .. }));
    assert!(matches!(
        &compiled.scene.children[1],
        SceneObject::LightHelper(helper) if helper.light_name == "bulb"
    ));
}

#[test]
fn test_document_level_errors_fail_compile() {
    let mut doc = document(json!({"rootid": "root", "root": {"type": "node"}}));
    doc["yasf"]["globals"]["fog"]
        .as_object_mut()
        .unwrap()
        .remove("near");
    assert!(matches!(
        deferred_compiler().compile(&doc),
        Err(CompileError::MissingField { field, .. }) if field == "near"
    ));

    let mut doc = document(json!({"rootid": "root", "root": {"type": "node"}}));
    doc["yasf"]["cameras"]["initial"] = json!("ghost");
    assert!(matches!(deferred_compiler().compile(&doc), Err(CompileError::UnknownCamera(_))));

    assert!(matches!(deferred_compiler().compile_str("{ not json"), Err(CompileError::Json(_))));
}

#[test]
fn test_bad_definitions_only_cost_their_entry() {
    let doc = super::document_with(
        json!({
            "rootid": "root",
            "root": {"type": "node", "materialref": {"materialId": "broken"}, "children": {"plain": unit_box()}}
        }),
        json!({"oak": {"filepath": "oak.png"}, "ghost": {"isVideo": false}}),
        json!({"red": {"color": {"r": 1, "g": 0, "b": 0}}, "broken": {"shininess": 10}}),
    );

    let compiled = compile(&doc);
    assert!(compiled.textures.contains_key("oak"));
    assert!(!compiled.textures.contains_key("ghost"));
    assert!(compiled.materials.contains_key("red"));
    assert!(!compiled.materials.contains_key("broken"));
    assert_eq!(mesh(&compiled.scene, "plain").material.name, "default");

    let fields: Vec<_> = compiled
        .diagnostics
        .iter()
        .filter_map(|e| match e {
            CompileError::InvalidField { section, field, .. } => Some((section.as_str(), field.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(fields, vec![("textures", "ghost"), ("materials", "broken")]);
    assert_eq!(compiled.diagnostics.len(), 2);
}

#[test]
fn test_nurbs_with_absurd_degree_spares_siblings() {
    let compiled = compile(&document(json!({
        "rootid": "root",
        "root": {"type": "node", "children": {
            "sheet": {
                "type": "nurbs", "degree_u": 18_446_744_073_709_551_615_u64, "degree_v": 1,
                "parts_u": 4, "parts_v": 4,
                "controlpoints": [
                    {"x": 0, "y": 0, "z": 0}, {"x": 0, "y": 1, "z": 0},
                    {"x": 1, "y": 0, "z": 0}, {"x": 1, "y": 1, "z": 0}
                ]
            },
            "good": unit_box()
        }}
    })));

    assert!(compiled.scene.child("good").is_some());
    assert!(compiled.scene.child("sheet").is_none());
    assert!(matches!(
        &compiled.diagnostics[..],
        [CompileError::InvalidPrimitive { node_id, .. }] if node_id == "sheet"
    ));
}

#[test]
fn test_unwrapped_document_and_outputs() {
    let doc = document(json!({"rootId": "root", "root": {"type": "node"}}));
    let compiled = compile(&doc["yasf"]);

    assert_eq!(compiled.scene.name, "root");
    assert_eq!(compiled.initial_camera, "cam");
    assert!(compiled.camera().is_some());
    assert_eq!(compiled.fog.near, 50.0);
    assert_eq!(compiled.skybox.mesh().triangle_count(), 12);
    assert_eq!(compiled.ambient.color, Color::new(0.2, 0.2, 0.2));
}
