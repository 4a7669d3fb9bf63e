//! # Core Module
//!
//! Shared configuration types used by the compiler and its hosts.

pub mod config;

pub use config::{CompilerConfig, TextureLoading};
pub use crate::config::{Config, ConfigError, ConfigFormat};
