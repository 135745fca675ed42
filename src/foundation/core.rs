use crate::foundation::error::{LedStripError, LedStripResult};

/// Straight (non-premultiplied) RGBA8 sample.
///
/// `a = 0` contributes nothing when composited; `a = 255` replaces whatever is
/// below it.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Build a sample from its four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque sample.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from(v: [u8; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

/// Logical grid size of a strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    /// LEDs in horizontal direction.
    pub width: u32,
    /// LEDs in vertical direction.
    pub height: u32,
}

impl Dimensions {
    /// Build a dimension pair.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `width * height`.
    pub fn number_of_leds(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Three output bytes per LED.
    pub fn number_of_outputs(self) -> usize {
        self.number_of_leds() * 3
    }

    pub(crate) fn pixel_index(self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }
}

/// Dense `width x height` grid of RGBA samples forming one layer.
///
/// Pixels are stored row-major. A grid is immutable once handed to a device;
/// layers are replaced as a whole, never edited in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerGrid {
    dims: Dimensions,
    pixels: Vec<Rgba8>,
}

impl LayerGrid {
    /// Fully transparent grid.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba8::TRANSPARENT)
    }

    /// Grid with every pixel set to `px`.
    pub fn filled(width: u32, height: u32, px: Rgba8) -> Self {
        let dims = Dimensions::new(width, height);
        Self {
            dims,
            pixels: vec![px; dims.number_of_leds()],
        }
    }

    /// Grid computed per pixel from `(x, y)`.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgba8) -> Self {
        let dims = Dimensions::new(width, height);
        let mut pixels = Vec::with_capacity(dims.number_of_leds());
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self { dims, pixels }
    }

    /// Grid from row-major straight RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> LedStripResult<Self> {
        let dims = Dimensions::new(width, height);
        let expected = dims
            .number_of_leds()
            .checked_mul(4)
            .ok_or_else(|| LedStripError::validation("layer size overflow"))?;
        if bytes.len() != expected {
            return Err(LedStripError::validation(format!(
                "layer expects {expected} rgba8 bytes for {width}x{height}, got {}",
                bytes.len()
            )));
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Rgba8::new(p[0], p[1], p[2], p[3]))
            .collect();
        Ok(Self { dims, pixels })
    }

    /// Grid from a decoded RGBA image; image pixels keep their `(x, y)` position.
    pub fn from_image(img: &image::RgbaImage) -> Self {
        Self::from_fn(img.width(), img.height(), |x, y| {
            Rgba8::from(img.get_pixel(x, y).0)
        })
    }

    /// Grid size.
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Grid width.
    pub fn width(&self) -> u32 {
        self.dims.width
    }

    /// Grid height.
    pub fn height(&self) -> u32 {
        self.dims.height
    }

    /// Sample at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.dims.width || y >= self.dims.height {
            return None;
        }
        self.pixels.get(self.dims.pixel_index(x, y)).copied()
    }

    /// Set the sample at `(x, y)`. Out-of-range coordinates are ignored.
    pub fn set(&mut self, x: u32, y: u32, px: Rgba8) {
        if x >= self.dims.width || y >= self.dims.height {
            return;
        }
        let idx = self.dims.pixel_index(x, y);
        self.pixels[idx] = px;
    }

    /// All samples in row-major order.
    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
