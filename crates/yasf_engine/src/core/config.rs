//! # Compiler Configuration
//!
//! Settings that control how a scene document is compiled: where texture
//! paths are resolved from, how texture loads are scheduled, and how deep the
//! node graph may nest before the compiler gives up on a subtree.
//!
//! The configuration is serializable so the viewer (or any host) can keep it
//! in a TOML or RON file next to its scenes.

use serde::{Serialize, Deserialize};
use std::path::PathBuf;

use crate::config::{Config, ConfigError};

/// How texture and mipmap loads are carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureLoading {
    /// Decode images on the loader's worker threads
    Async,
    /// Decode images inline while resolving textures
    Blocking,
    /// Only record requests; the host completes them itself
    Deferred,
}

/// # Compiler Configuration
///
/// Top-level settings for [`crate::yasf::SceneCompiler`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Default log filter used by [`crate::foundation::logging::init_with_level`]
    pub log_level: String,
    /// Directory texture `filepath` entries are resolved against
    pub assets_dir: PathBuf,
    /// Maximum nesting of node references before a subtree is rejected
    pub max_depth: usize,
    /// Texture load scheduling
    pub texture_loading: TextureLoading,
    /// Worker threads used for [`TextureLoading::Async`]
    pub loader_threads: usize,
}

impl CompilerConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            assets_dir: PathBuf::from("."),
            max_depth: 64,
            texture_loading: TextureLoading::Async,
            loader_threads: 2,
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the assets directory
    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = dir.into();
        self
    }

    /// Set the maximum reference depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the texture loading mode
    pub fn with_texture_loading(mut self, mode: TextureLoading) -> Self {
        self.texture_loading = mode;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".to_string()));
        }

        if self.texture_loading == TextureLoading::Async && self.loader_threads == 0 {
            return Err(ConfigError::Invalid(
                "async texture loading needs at least one loader thread".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for CompilerConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    #[test]
    fn test_defaults_are_valid() {
        assert!(CompilerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_depth_rejected() {
        let config = CompilerConfig::new().with_max_depth(0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CompilerConfig::from_str_with_format(
            "assets_dir = \"scenes\"\ntexture_loading = \"deferred\"\n",
            ConfigFormat::Toml,
        )
        .unwrap();

        assert_eq!(config.assets_dir, PathBuf::from("scenes"));
        assert_eq!(config.texture_loading, TextureLoading::Deferred);
        assert_eq!(config.max_depth, 64);
    }

    #[test]
    fn test_ron_roundtrip_fields() {
        let config = CompilerConfig::from_str_with_format(
            "(log_level: \"debug\", max_depth: 8)",
            ConfigFormat::Ron,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.max_depth, 8);
    }
}
