//! # YASF Engine
//!
//! Compiles YASF JSON scene documents into an in-memory render graph.
//!
//! ## Features
//!
//! - **Scene Graph**: Groups, meshes, lights and LOD switches with local transforms
//! - **Inheritance**: Materials and shadow flags flow from a node to its descendants
//! - **Primitives**: Rectangles, triangles, boxes, cylinders, spheres, NURBS patches,
//!   polygons and the three light kinds
//! - **Asynchronous Textures**: Images and mipmaps attach to materials as they finish loading
//! - **Recoverable Errors**: A broken subtree is reported and skipped, its siblings still compile
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use yasf_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let compiler = SceneCompiler::new(CompilerConfig::new().with_assets_dir("scenes"));
//!     let compiled = compiler.compile_file("scenes/demo.json")?;
//!
//!     for problem in &compiled.diagnostics {
//!         eprintln!("{problem}");
//!     }
//!     println!("{} objects under '{}'", compiled.scene.descendant_count(), compiled.scene.name);
//!
//!     compiler.shutdown();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;

pub mod foundation;
pub mod assets;
pub mod render;
pub mod scene;
pub mod yasf;

pub use yasf::{CompileError, CompiledScene, SceneCompiler};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        CompileError, CompiledScene, SceneCompiler,
        foundation::math::{Vec3, Mat4, Transform},
        assets::{DeferredLoader, TextureLoader},
        render::{Camera, Color, Light, Material, Mesh},
        scene::{Group, Lod, MeshObject, SceneObject},
        core::config::{CompilerConfig, TextureLoading},
    };
}
