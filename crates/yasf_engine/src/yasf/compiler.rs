//! Scene compiler entry point

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use super::cameras::{parse_cameras, CameraSet};
use super::document::{self, GraphSection};
use super::error::CompileError;
use super::globals::parse_globals;
use super::node_builder::NodeBuilder;
use super::resolver::{resolve_materials, resolve_textures};
use crate::assets::{DeferredLoader, ImageLoader, TextureLoader};
use crate::core::{CompilerConfig, TextureLoading};
use crate::render::color::Color;
use crate::render::environment::{Fog, Skybox};
use crate::render::lighting::AmbientLight;
use crate::render::material::Material;
use crate::render::primitives::Camera;
use crate::render::texture::TextureHandle;
use crate::scene::Group;

/// Everything a host needs to render a compiled document
#[derive(Debug)]
pub struct CompiledScene {
    /// Root group of the graph
    pub scene: Group,
    /// Clear color
    pub background: Color,
    /// Ambient term
    pub ambient: AmbientLight,
    /// Distance fog
    pub fog: Fog,
    /// Surrounding skybox
    pub skybox: Skybox,
    /// Cameras by id
    pub cameras: HashMap<String, Camera>,
    /// Id of the camera to start with
    pub initial_camera: String,
    /// Texture handles by id; their images may still be loading
    pub textures: HashMap<String, TextureHandle>,
    /// Materials by id
    pub materials: HashMap<String, Arc<Material>>,
    /// Errors recovered while decoding definitions and building the graph
    pub diagnostics: Vec<CompileError>,
}

impl CompiledScene {
    /// The initial camera
    pub fn camera(&self) -> Option<&Camera> {
        self.cameras.get(&self.initial_camera)
    }

    /// True if every subtree compiled cleanly
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

enum Loader {
    Pool(ImageLoader),
    Deferred(Arc<DeferredLoader>),
    Custom(Arc<dyn TextureLoader>),
}

impl Loader {
    fn as_dyn(&self) -> &dyn TextureLoader {
        match self {
            Self::Pool(loader) => loader,
            Self::Deferred(loader) => loader.as_ref(),
            Self::Custom(loader) => loader.as_ref(),
        }
    }
}

/// Compiles YASF documents into scene graphs
///
/// The compiler owns the texture loader, so texture loads issued by one
/// compile keep running after `compile` returns.
pub struct SceneCompiler {
    config: CompilerConfig,
    loader: Loader,
}

impl SceneCompiler {
    /// Compiler with a loader chosen by `config.texture_loading`
    pub fn new(config: CompilerConfig) -> Self {
        let loader = match config.texture_loading {
            TextureLoading::Async => Loader::Pool(ImageLoader::new(config.loader_threads)),
            TextureLoading::Blocking => Loader::Pool(ImageLoader::blocking()),
            TextureLoading::Deferred => Loader::Deferred(Arc::new(DeferredLoader::new())),
        };
        Self { config, loader }
    }

    /// Compiler that routes texture loads through a host-provided loader
    pub fn with_loader(config: CompilerConfig, loader: Arc<dyn TextureLoader>) -> Self {
        Self {
            config,
            loader: Loader::Custom(loader),
        }
    }

    /// Active configuration
    pub const fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// The request queue, when running with [`TextureLoading::Deferred`]
    pub fn deferred_loader(&self) -> Option<&Arc<DeferredLoader>> {
        match &self.loader {
            Loader::Deferred(loader) => Some(loader),
            Loader::Pool(_) | Loader::Custom(_) => None,
        }
    }

    /// Compile a parsed document
    ///
    /// Only document-level problems (missing globals, unknown initial camera,
    /// no graph section) fail the call. Bad texture or material entries and
    /// problems inside the graph are logged and returned as
    /// [`CompiledScene::diagnostics`].
    pub fn compile(&self, document: &Value) -> Result<CompiledScene, CompileError> {
        let root = document::unwrap_root(document);

        let globals = parse_globals(root)?;
        let CameraSet { cameras, initial } = parse_cameras(root)?;
        let (texture_defs, texture_errors) = document::texture_defs(root);
        let (material_defs, material_errors) = document::material_defs(root);
        let graph = GraphSection::from_root(root)?;

        // Bad texture or material entries are skipped; references to them fall back later
        let mut diagnostics: Vec<CompileError> = texture_errors.into_iter().chain(material_errors).collect();
        for error in &diagnostics {
            log::error!("{}", error);
        }

        let textures = resolve_textures(&texture_defs, self.loader.as_dyn(), &self.config.assets_dir);
        let materials = resolve_materials(&material_defs, &textures);
        log::debug!("Resolved {} textures and {} materials", textures.len(), materials.len());

        let (scene, graph_errors) = NodeBuilder::new(&graph, &materials, self.config.max_depth).build_root();
        diagnostics.extend(graph_errors);
        log::info!(
            "Compiled scene '{}': {} objects, {} diagnostics",
            scene.name,
            scene.descendant_count(),
            diagnostics.len()
        );

        Ok(CompiledScene {
            scene,
            background: globals.background,
            ambient: globals.ambient,
            fog: globals.fog,
            skybox: globals.skybox,
            cameras,
            initial_camera: initial,
            textures,
            materials,
            diagnostics,
        })
    }

    /// Parse and compile JSON text
    pub fn compile_str(&self, source: &str) -> Result<CompiledScene, CompileError> {
        let document: Value = serde_json::from_str(source)?;
        self.compile(&document)
    }

    /// Read, parse and compile a scene file
    pub fn compile_file<P: AsRef<Path>>(&self, path: P) -> Result<CompiledScene, CompileError> {
        let path = path.as_ref();
        log::info!("Compiling {}", path.display());
        let source = fs::read_to_string(path)?;
        self.compile_str(&source)
    }

    /// Wait for queued texture loads, then stop the loader
    pub fn shutdown(self) {
        if let Loader::Pool(loader) = self.loader {
            loader.shutdown();
        }
    }
}
