//! # YASF Scene Compiler
//!
//! Compiles a YASF JSON document into a [`crate::scene::Group`] tree plus the
//! scene-wide state a host renderer needs.
//!
//! ## Pipeline
//!
//! ```text
//! document ─┬─ globals   → background, ambient, fog, skybox
//!           ├─ cameras   → Camera map + initial id
//!           ├─ textures  → TextureHandle (loads issued)
//!           ├─ materials → Arc<Material>
//!           └─ graph     → NodeBuilder → PrimitiveFactory
//! ```
//!
//! Errors inside the graph never abort a compile: the offending subtree is
//! dropped, logged, and reported in [`CompiledScene::diagnostics`].

pub mod error;
pub mod document;
pub mod globals;
pub mod cameras;
pub mod resolver;
pub mod primitive_factory;
pub mod node_builder;
pub mod compiler;

#[cfg(test)]
mod tests;

pub use error::CompileError;
pub use globals::Globals;
pub use cameras::CameraSet;
pub use resolver::{resolve_materials, resolve_textures};
pub use primitive_factory::{Primitive, PrimitiveDef, PrimitiveFactory, PrimitiveKind};
pub use node_builder::{BuildContext, NodeBuilder};
pub use compiler::{CompiledScene, SceneCompiler};
