//! Image loading for texture records
//!
//! Decodes PNG/JPEG files with the `image` crate and writes the result into
//! the slot of a [`TextureHandle`] that requested it. Loads hold only a weak
//! reference to their target, so a result that arrives after the texture was
//! dropped (for example because the document was recompiled) is discarded.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::thread;

use crossbeam::channel::{unbounded, Sender};

use crate::assets::AssetError;
use crate::render::texture::{TextureHandle, TextureSlot, WeakTextureHandle};

/// Decoded RGBA image, the pixel store a texture or mipmap level draws from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageData {
    /// Load an image from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path_ref = path.as_ref();

        log::debug!("Loading image from: {:?}", path_ref);

        if !path_ref.exists() {
            return Err(AssetError::NotFound(path_ref.display().to_string()));
        }

        let img = image::open(path_ref)
            .map_err(|e| AssetError::LoadFailed(format!("{}: {}", path_ref.display(), e)))?;

        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        log::debug!("Loaded image {}x{} from {:?}", width, height, path_ref);

        Ok(Self {
            data: rgba_img.into_raw(),
            width,
            height,
        })
    }

    /// Create a solid color image
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = (width * height) as usize;
        let mut data = Vec::with_capacity(pixel_count * 4);

        for _ in 0..pixel_count {
            data.extend_from_slice(&color);
        }

        Self { data, width, height }
    }

    /// Get the size of the image data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// One pending image load
#[derive(Debug, Clone)]
pub struct LoadRequest {
    /// File to decode
    pub path: PathBuf,
    /// Texture the result belongs to
    pub target: WeakTextureHandle,
    /// Slot inside the texture
    pub slot: TextureSlot,
}

impl LoadRequest {
    /// Create a request targeting `texture`
    pub fn new(path: impl Into<PathBuf>, texture: &TextureHandle, slot: TextureSlot) -> Self {
        Self {
            path: path.into(),
            target: texture.downgrade(),
            slot,
        }
    }

    /// Deliver a load result to the target texture
    pub fn complete(self, result: Result<ImageData, AssetError>) {
        let Some(texture) = self.target.upgrade() else {
            log::debug!("Discarding load of {:?}: texture no longer referenced", self.path);
            return;
        };

        match result {
            Ok(image) => texture.attach(self.slot, image),
            Err(err) => {
                log::error!("Texture '{}' ({:?}): {}", texture.name(), self.slot, err);
                texture.mark_failed(self.slot);
            }
        }
    }
}

/// Transport for texture and mipmap loads
pub trait TextureLoader: Send + Sync {
    /// Issue a load; the result is written to the request's target whenever it is ready
    fn request(&self, request: LoadRequest);
}

type Job = Box<dyn FnOnce() + Send + 'static>;

/// File-backed loader that decodes with the `image` crate
pub struct ImageLoader {
    sender: Option<Sender<Job>>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl ImageLoader {
    /// Loader that decodes on `threads` background workers
    pub fn new(threads: usize) -> Self {
        let (sender, receiver) = unbounded::<Job>();

        let workers = (0..threads.max(1))
            .map(|id| {
                let receiver = receiver.clone();
                thread::spawn(move || {
                    for job in receiver.iter() {
                        job();
                    }
                    log::trace!("Image loader worker {} stopped", id);
                })
            })
            .collect();

        Self {
            sender: Some(sender),
            workers,
        }
    }

    /// Loader that decodes inline on the calling thread
    pub fn blocking() -> Self {
        Self {
            sender: None,
            workers: Vec::new(),
        }
    }

    /// Finish every queued load, then stop the workers
    pub fn shutdown(mut self) {
        self.sender.take();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                log::error!("Image loader worker panicked");
            }
        }
    }
}

impl TextureLoader for ImageLoader {
    fn request(&self, request: LoadRequest) {
        let job = move || {
            let result = ImageData::from_file(&request.path);
            request.complete(result);
        };

        match &self.sender {
            Some(sender) => {
                if let Err(err) = sender.send(Box::new(job)) {
                    log::error!("Image loader queue closed");
                    (err.into_inner())();
                }
            }
            None => job(),
        }
    }
}

impl Drop for ImageLoader {
    fn drop(&mut self) {
        // Closing the channel lets workers drain the queue and exit on their own.
        self.sender.take();
    }
}

/// Loader that only records requests so a host (or a test) can complete them later
#[derive(Debug, Default)]
pub struct DeferredLoader {
    pending: Mutex<Vec<LoadRequest>>,
}

impl DeferredLoader {
    /// Create an empty deferred loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests not yet taken
    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Remove and return all recorded requests
    pub fn take_requests(&self) -> Vec<LoadRequest> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Complete every recorded request with the given resolver
    pub fn complete_all<F>(&self, mut resolve: F)
    where
        F: FnMut(&Path) -> Result<ImageData, AssetError>,
    {
        for request in self.take_requests() {
            let result = resolve(&request.path);
            request.complete(result);
        }
    }
}

impl TextureLoader for DeferredLoader {
    fn request(&self, request: LoadRequest) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }
}
