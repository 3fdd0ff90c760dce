// Core pixel types shared by the compositor and its collaborators.

/// Bytes per pixel: R, G, B, A.
pub const CHANNELS: usize = 4;

/// Row-major RGBA8 grid. `data.len() == width * height * 4` always holds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Fully transparent buffer of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; byte_len(width, height)],
        }
    }

    /// Wrap existing RGBA bytes. Returns `None` if the length does not match.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == byte_len(width, height)).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Buffer where every pixel is `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            data: rgba.repeat(count),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// RGBA of the pixel at (x, y), or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        self.data[i..i + CHANNELS].copy_from_slice(&rgba);
    }

    /// Resize to (width, height) and clear to transparent.
    /// This is a hard reset, not a scale: old contents are gone.
    pub fn reset(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(byte_len(width, height), 0);
    }

    /// Overwrite this buffer with `src`, taking its dimensions.
    pub fn copy_from(&mut self, src: &PixelBuffer) {
        self.width = src.width;
        self.height = src.height;
        self.data.clear();
        self.data.extend_from_slice(&src.data);
    }

    /// Pack into the window format, one u32 per pixel as 0x00RRGGBB.
    /// Alpha is dropped; the window has no layer below it.
    pub fn write_xrgb(&self, out: &mut Vec<u32>) {
        out.clear();
        out.extend(self.data.chunks_exact(CHANNELS).map(|px| {
            let r = px[0] as u32;
            let g = px[1] as u32;
            let b = px[2] as u32;
            (r << 16) | (g << 8) | b
        }));
    }
}

impl PixelBuffer {
    /// Draw a decoded image scaled to this buffer's current dimensions.
    /// Same-size images are copied straight in; zero-sized buffers stay empty.
    pub fn draw_scaled(&mut self, img: &image::RgbaImage, filter: image::imageops::FilterType) {
        if self.is_empty() {
            return;
        }
        if img.dimensions() == self.dimensions() {
            self.data.copy_from_slice(img.as_raw());
            return;
        }
        let scaled = image::imageops::resize(img, self.width, self.height, filter);
        self.data.copy_from_slice(scaled.as_raw());
    }
}

impl From<image::RgbaImage> for PixelBuffer {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}

/// The color being keyed out, plus how far each channel may stray from it.
/// Fixed for the lifetime of a compositor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub tolerance: u16,
}

impl KeyColor {
    pub const fn new(r: u8, g: u8, b: u8, tolerance: u16) -> Self {
        Self { r, g, b, tolerance }
    }
}
