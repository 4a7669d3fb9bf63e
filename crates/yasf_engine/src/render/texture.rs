//! Texture records shared between materials
//!
//! A [`TextureHandle`] is valid as soon as it is created. Its pixel data and
//! mipmap levels arrive later from a [`crate::assets::TextureLoader`]; every
//! material holding a clone of the handle sees them without recompiling.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use crate::assets::ImageData;

/// Number of explicit mipmap slots a texture can declare
pub const MAX_MIPMAP_LEVELS: usize = 8;

/// Media backing a video texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSource {
    /// Path of the video file
    pub path: PathBuf,
    /// Restart when the end is reached
    pub looping: bool,
    /// Start playing as soon as the host opens it
    pub autoplay: bool,
    /// Muted, so autoplay is permitted
    pub muted: bool,
}

impl VideoSource {
    /// A looping, auto-playing, muted video
    pub fn live(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            looping: true,
            autoplay: true,
            muted: true,
        }
    }
}

/// Where a texture's base image comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureSource {
    /// Static image file
    Image(PathBuf),
    /// Live video element
    Video(VideoSource),
}

/// Progress of the base image load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Load issued, no result yet
    Pending,
    /// Base image present (video textures are always considered loaded)
    Loaded,
    /// Base image could not be loaded
    Failed,
}

/// Slot a load result is written into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    /// The full-resolution image
    Base,
    /// An explicit mipmap level, `0..MAX_MIPMAP_LEVELS`
    Mipmap(usize),
}

/// Contents of a texture record
#[derive(Debug, Clone)]
pub struct TextureData {
    /// Texture id from the document
    pub name: String,
    /// Image or video source
    pub source: TextureSource,
    /// Decoded base image, once loaded
    pub image: Option<ImageData>,
    /// Explicit mipmap levels, each set once its load completes
    pub mipmaps: [Option<ImageData>; MAX_MIPMAP_LEVELS],
    /// Whether the renderer should build its own mip chain
    pub generate_mipmaps: bool,
    /// Base image load progress
    pub status: LoadStatus,
}

/// Shared, lazily populated texture record
#[derive(Debug, Clone)]
pub struct TextureHandle(Arc<RwLock<TextureData>>);

/// Non-owning reference held by in-flight loads
#[derive(Debug, Clone)]
pub struct WeakTextureHandle(Weak<RwLock<TextureData>>);

impl TextureHandle {
    /// Create a texture backed by a static image
    pub fn image(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::from_source(name.into(), TextureSource::Image(path.into()), LoadStatus::Pending)
    }

    /// Create a texture bound to a live video
    pub fn video(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::from_source(name.into(), TextureSource::Video(VideoSource::live(path)), LoadStatus::Loaded)
    }

    fn from_source(name: String, source: TextureSource, status: LoadStatus) -> Self {
        Self(Arc::new(RwLock::new(TextureData {
            name,
            source,
            image: None,
            mipmaps: Default::default(),
            generate_mipmaps: true,
            status,
        })))
    }

    /// Read access to the record
    pub fn read(&self) -> RwLockReadGuard<'_, TextureData> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TextureData> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Texture id
    pub fn name(&self) -> String {
        self.read().name.clone()
    }

    /// True once the base image is available
    pub fn is_ready(&self) -> bool {
        self.read().status == LoadStatus::Loaded
    }

    /// True if the given mipmap level has been attached
    pub fn has_mipmap(&self, level: usize) -> bool {
        self.read().mipmaps.get(level).is_some_and(Option::is_some)
    }

    /// Turn automatic mip generation on or off
    pub fn set_generate_mipmaps(&self, enabled: bool) {
        self.write().generate_mipmaps = enabled;
    }

    /// Store a finished load in its slot
    pub fn attach(&self, slot: TextureSlot, image: ImageData) {
        let mut data = self.write();
        match slot {
            TextureSlot::Base => {
                data.image = Some(image);
                data.status = LoadStatus::Loaded;
            }
            TextureSlot::Mipmap(level) => match data.mipmaps.get_mut(level) {
                Some(entry) => *entry = Some(image),
                None => log::warn!("Texture '{}': mipmap level {} out of range", data.name, level),
            },
        }
    }

    /// Record that a load for the given slot failed
    pub fn mark_failed(&self, slot: TextureSlot) {
        if slot == TextureSlot::Base {
            self.write().status = LoadStatus::Failed;
        }
    }

    /// Path of the static image, if any
    pub fn image_path(&self) -> Option<PathBuf> {
        match &self.read().source {
            TextureSource::Image(path) => Some(path.clone()),
            TextureSource::Video(_) => None,
        }
    }

    /// Non-owning reference for loaders
    pub fn downgrade(&self) -> WeakTextureHandle {
        WeakTextureHandle(Arc::downgrade(&self.0))
    }

    /// True if both handles refer to the same record
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl WeakTextureHandle {
    /// Recover the handle if any material or scene still holds it
    pub fn upgrade(&self) -> Option<TextureHandle> {
        self.0.upgrade().map(TextureHandle)
    }
}

/// Resolve `path` against `base` unless it is already absolute
pub fn resolve_path(base: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_texture_starts_pending() {
        let texture = TextureHandle::image("wood", "textures/wood.png");
        assert!(!texture.is_ready());
        assert_eq!(texture.image_path(), Some(PathBuf::from("textures/wood.png")));
    }

    #[test]
    fn test_video_texture_is_live() {
        let texture = TextureHandle::video("tv", "videos/loop.mp4");
        assert!(texture.is_ready());
        let data = texture.read();
        match &data.source {
            TextureSource::Video(video) => {
                assert!(video.looping && video.autoplay && video.muted);
            }
            TextureSource::Image(_) => panic!("expected a video source"),
        }
    }

    #[test]
    fn test_attach_is_visible_through_clones() {
        let texture = TextureHandle::image("wood", "wood.png");
        let shared = texture.clone();

        texture.attach(TextureSlot::Mipmap(2), ImageData::solid_color(4, 4, [0, 0, 0, 255]));
        texture.attach(TextureSlot::Base, ImageData::solid_color(16, 16, [0, 0, 0, 255]));

        assert!(shared.is_ready());
        assert!(shared.has_mipmap(2));
        assert!(!shared.has_mipmap(3));
    }

    #[test]
    fn test_weak_handle_expires_with_last_owner() {
        let texture = TextureHandle::image("wood", "wood.png");
        let weak = texture.downgrade();
        assert!(weak.upgrade().is_some());
        drop(texture);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_resolve_relative_path() {
        let path = resolve_path(Path::new("scenes"), "textures/a.png");
        assert_eq!(path, PathBuf::from("scenes/textures/a.png"));
    }
}
