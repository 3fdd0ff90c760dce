// Holds the decoded background image and the two buffers derived from it:
// the copy scaled to the current output size, and the reference frame the
// compositor pulls replacement pixels from.

use std::path::Path;

use image::RgbaImage;
use image::imageops::FilterType;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::PixelBuffer;

pub struct BackgroundStore {
    image: RgbaImage,
    scaled: PixelBuffer,
    scaled_valid: bool,
    reference: PixelBuffer,
    captured: bool,
}

impl BackgroundStore {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image,
            scaled: PixelBuffer::default(),
            scaled_valid: false,
            reference: PixelBuffer::default(),
            captured: false,
        }
    }

    /// Decode a background from disk. Finishing this is the readiness signal
    /// the scheduler waits on; if it fails the render loop never starts.
    pub fn load(path: &Path) -> Result<Self> {
        let img = image::open(path)
            .map_err(|e| Error::BackgroundLoad(format!("{}: {e}", path.display())))?
            .into_rgba8();
        info!(path = %path.display(), width = img.width(), height = img.height(), "background decoded");
        Ok(Self::new(img))
    }

    /// Size of the decoded image before any scaling.
    pub fn source_dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// The background scaled to (width, height).
    /// Rescaled only when the requested dimensions change.
    pub fn prepare(&mut self, width: u32, height: u32) -> &PixelBuffer {
        if !self.scaled_valid || self.scaled.dimensions() != (width, height) {
            debug!(width, height, "rescaling background");
            self.scaled.reset(width, height);
            self.scaled.draw_scaled(&self.image, FilterType::Triangle);
            self.scaled_valid = true;
        }
        &self.scaled
    }

    /// Store `snapshot` as the reference frame unless one is already held.
    /// Returns true when this call did the capture.
    pub fn capture_reference(&mut self, snapshot: &PixelBuffer) -> bool {
        if self.captured {
            return false;
        }
        self.reference.copy_from(snapshot);
        self.captured = true;
        info!(
            width = snapshot.width(),
            height = snapshot.height(),
            "reference background captured"
        );
        true
    }

    pub fn has_reference(&self) -> bool {
        self.captured
    }

    /// The captured reference frame, if any.
    pub fn reference(&self) -> Option<&PixelBuffer> {
        self.captured.then_some(&self.reference)
    }

    /// True when a reference is held and its geometry matches (width, height).
    pub fn reference_matches(&self, width: u32, height: u32) -> bool {
        self.captured && self.reference.dimensions() == (width, height)
    }

    /// Drop the reference; the next playing tick recaptures it.
    pub fn invalidate_reference(&mut self) {
        if self.captured {
            debug!("reference background invalidated");
        }
        self.captured = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> RgbaImage {
        RgbaImage::from_fn(2, 2, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 0, 255, 255])
            }
        })
    }

    #[test]
    fn prepare_at_native_size_keeps_pixels() {
        let mut store = BackgroundStore::new(checker());
        let buf = store.prepare(2, 2);
        assert_eq!(buf.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(buf.pixel(1, 0), Some([0, 0, 255, 255]));
    }

    #[test]
    fn prepare_follows_requested_dimensions() {
        let mut store = BackgroundStore::new(checker());
        assert_eq!(store.prepare(8, 4).dimensions(), (8, 4));
        assert_eq!(store.prepare(3, 3).dimensions(), (3, 3));
        assert_eq!(store.source_dimensions(), (2, 2));
    }

    #[test]
    fn prepare_with_zero_size_is_empty() {
        let mut store = BackgroundStore::new(checker());
        assert!(store.prepare(0, 10).is_empty());
    }

    #[test]
    fn reference_is_captured_once() {
        let mut store = BackgroundStore::new(checker());
        let first = PixelBuffer::filled(1, 1, [1, 2, 3, 255]);
        let second = PixelBuffer::filled(1, 1, [9, 9, 9, 255]);

        assert!(store.reference().is_none());
        assert!(store.capture_reference(&first));
        assert!(!store.capture_reference(&second));
        assert_eq!(store.reference(), Some(&first));
    }

    #[test]
    fn invalidation_allows_recapture() {
        let mut store = BackgroundStore::new(checker());
        store.capture_reference(&PixelBuffer::filled(1, 1, [1, 1, 1, 255]));
        assert!(store.reference_matches(1, 1));
        assert!(!store.reference_matches(2, 1));

        store.invalidate_reference();
        assert!(!store.has_reference());

        let resized = PixelBuffer::filled(2, 1, [5, 5, 5, 255]);
        assert!(store.capture_reference(&resized));
        assert!(store.reference_matches(2, 1));
    }
}
