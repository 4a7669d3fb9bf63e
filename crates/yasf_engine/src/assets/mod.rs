//! Asset loading
//!
//! The compiler only decides *what* to load and *where* the result goes. The
//! transport behind that is a [`TextureLoader`]: files decoded with the
//! `image` crate on worker threads, inline, or deferred to the host.

pub mod image_loader;

pub use image_loader::{
    DeferredLoader, ImageData, ImageLoader, LoadRequest, TextureLoader,
};

use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Failed to load asset
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// IO error during asset loading
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
