//! End-to-end compiler tests over small inline documents

mod graph_semantics;

use serde_json::{json, Value};

use crate::core::{CompilerConfig, TextureLoading};
use crate::yasf::{CompiledScene, SceneCompiler};

/// Complete document around the given graph and extra sections
fn document_with(graph: Value, textures: Value, materials: Value) -> Value {
    json!({
        "yasf": {
            "globals": {
                "background": {"r": 0.0, "g": 0.0, "b": 0.0},
                "ambient": {"r": 0.2, "g": 0.2, "b": 0.2, "intensity": 1.0},
                "fog": {"color": {"r": 1, "g": 1, "b": 1}, "near": 50, "far": 500},
                "skybox": {
                    "size": {"x": 400, "y": 400, "z": 400},
                    "center": {"x": 0, "y": 0, "z": 0},
                    "emissive": {"r": 1, "g": 1, "b": 1},
                    "intensity": 1.0,
                    "front": "sky/front.png", "back": "sky/back.png",
                    "up": "sky/up.png", "down": "sky/down.png",
                    "left": "sky/left.png", "right": "sky/right.png"
                }
            },
            "cameras": {
                "initial": "cam",
                "cam": {
                    "type": "perspective", "angle": 75, "near": 0.1, "far": 1000,
                    "location": {"x": 0, "y": 10, "z": 20}, "target": {"x": 0, "y": 0, "z": 0}
                }
            },
            "textures": textures,
            "materials": materials,
            "graph": graph
        }
    })
}

fn document(graph: Value) -> Value {
    document_with(
        graph,
        json!({}),
        json!({
            "red": {"color": {"r": 1, "g": 0, "b": 0}},
            "blue": {"color": {"r": 0, "g": 0, "b": 1}}
        }),
    )
}

fn deferred_compiler() -> SceneCompiler {
    SceneCompiler::new(CompilerConfig::new().with_texture_loading(TextureLoading::Deferred))
}

fn compile(document: &Value) -> CompiledScene {
    deferred_compiler().compile(document).unwrap()
}
