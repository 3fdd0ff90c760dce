// Live webcam as the video source.
// Frames come out of the camera as RGB and are scaled to whatever size the
// compositor asks for.

use image::imageops::FilterType;
use image::RgbaImage;
use tracing::info;

use crate::compositor::FrameSource;
use crate::error::{Error, Result};
use crate::types::PixelBuffer;

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

// A small wrapper around nokhwa::Camera so the compositor only sees a FrameSource.
pub struct CameraSource {
    cam: Camera,
    rendered: (u32, u32),
}

impl CameraSource {
    /// Open camera `index` near the requested resolution (falls back if not exact).
    /// The stream is open but nothing is drawn until playback starts.
    pub fn open(index: u32, width: u32, height: u32) -> Result<Self> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,
        );
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The stream might choose a slightly different resolution.
        let actual = cam.resolution();
        info!(
            index,
            width = actual.width(),
            height = actual.height(),
            "camera stream open"
        );

        Ok(Self {
            cam,
            rendered: (actual.width(), actual.height()),
        })
    }

    pub fn set_rendered_size(&mut self, width: u32, height: u32) {
        self.rendered = (width, height);
    }

    /// Grab one frame (blocks until the camera delivers it) as RGBA.
    fn grab(&mut self) -> Result<RgbaImage> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        let rgb = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        let (w, h) = rgb.dimensions();
        let raw = rgb.into_raw();
        let mut rgba = Vec::with_capacity(w as usize * h as usize * 4);
        for px in raw.chunks_exact(3) {
            rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        RgbaImage::from_raw(w, h, rgba)
            .ok_or_else(|| Error::CameraFrame(format!("short frame buffer for {w}x{h}")))
    }
}

impl FrameSource for CameraSource {
    fn rendered_size(&self) -> (u32, u32) {
        self.rendered
    }

    fn play(&mut self) -> Result<()> {
        info!("camera playback started");
        Ok(())
    }

    fn draw_into(&mut self, target: &mut PixelBuffer) -> Result<()> {
        let frame = self.grab()?;
        target.draw_scaled(&frame, FilterType::Nearest);
        Ok(())
    }
}
