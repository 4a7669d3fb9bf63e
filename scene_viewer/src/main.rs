//! Scene viewer
//!
//! Compiles a YASF document and prints the resulting graph, the cameras and
//! every recovered error. Usage:
//!
//! ```text
//! scene_viewer <scene.json> [config.toml|config.ron]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use yasf_engine::config::{Config, ConfigError};
use yasf_engine::foundation::logging;
use yasf_engine::prelude::*;

#[derive(Debug, Error)]
enum ViewerError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Compile a YASF scene and print what it contains
#[derive(Debug, Parser)]
#[command(name = "scene_viewer", version)]
struct Args {
    /// Scene document (JSON)
    scene: PathBuf,

    /// Compiler settings (TOML or RON)
    config: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<CompilerConfig, ViewerError> {
    let config = match &args.config {
        Some(path) => CompilerConfig::load_from_file(path)?,
        None => {
            // Textures resolve next to the scene unless a config says otherwise
            let assets_dir = args.scene.parent().map(PathBuf::from).unwrap_or_default();
            CompilerConfig::new().with_assets_dir(assets_dir)
        }
    };
    config.validate()?;
    Ok(config)
}

fn print_tree(scene: &Group) {
    scene.walk(&mut |object, depth| {
        let indent = "  ".repeat(depth);
        match object {
            SceneObject::Mesh(mesh) => {
                println!(
                    "{indent}{} [mesh, {} triangles, material '{}']",
                    mesh.name,
                    mesh.mesh.triangle_count(),
                    mesh.material.name
                );
                if let Some(bounds) = mesh.parent_bounds() {
                    let (center, size) = (bounds.center(), bounds.size());
                    println!(
                        "{indent}  bounds center ({:.2}, {:.2}, {:.2}) size ({:.2}, {:.2}, {:.2})",
                        center.x, center.y, center.z, size.x, size.y, size.z
                    );
                }
            }
            SceneObject::Lod(lod) => println!("{indent}{} [lod at {:?}]", lod.name, lod.distances()),
            other => println!("{indent}{} [{}]", other.name(), other.kind()),
        }
    });
}

fn run() -> Result<bool, ViewerError> {
    let args = Args::parse();
    let config = load_config(&args)?;
    logging::init_with_level(&config.log_level);

    log::info!("Compiling {}", args.scene.display());
    let compiler = SceneCompiler::new(config);
    let compiled = compiler.compile_file(&args.scene)?;

    println!("scene '{}' ({} objects)", compiled.scene.name, compiled.scene.descendant_count());
    print_tree(&compiled.scene);

    let mut camera_ids: Vec<_> = compiled.cameras.keys().collect();
    camera_ids.sort();
    println!("cameras: {camera_ids:?} (initial '{}')", compiled.initial_camera);
    println!("textures: {}, materials: {}", compiled.textures.len(), compiled.materials.len());

    for diagnostic in &compiled.diagnostics {
        log::warn!("{}", diagnostic);
    }
    let clean = compiled.is_clean();

    // Let queued texture loads finish before exiting
    compiler.shutdown();
    Ok(clean)
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            eprintln!("scene compiled with errors");
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
