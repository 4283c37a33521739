use serde::{Deserialize, Serialize};

use crate::error::RasterError;

/// A decoded 8-bit image, row-major with interleaved channels.
/// Three-channel rasters are in R, G, B order.
///
/// Fields are private so every raster, including deserialised ones, has
/// passed the length check in [`Raster::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RasterParts")]
pub struct Raster {
    /// `width * height * channels` samples.
    data: Vec<u8>,
    width: usize,
    height: usize,
    channels: usize,
}

/// Unchecked wire form of a [`Raster`].
#[derive(Deserialize)]
struct RasterParts {
    data: Vec<u8>,
    width: usize,
    height: usize,
    channels: usize,
}

impl TryFrom<RasterParts> for Raster {
    type Error = RasterError;

    fn try_from(p: RasterParts) -> Result<Self, Self::Error> {
        Self::new(p.data, p.width, p.height, p.channels)
    }
}

impl Raster {
    /// Wrap a pixel buffer, checking its length against the dimensions.
    ///
    /// Zero width or height is accepted; callers that need pixels check
    /// [`Raster::is_empty`].
    pub fn new(data: Vec<u8>, width: usize, height: usize, channels: usize) -> Result<Self, RasterError> {
        if channels == 0 {
            return Err(RasterError::NoChannels);
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(RasterError::TooLarge { width, height, channels })?;
        if data.len() != expected {
            return Err(RasterError::BufferSize { expected, actual: data.len() });
        }
        Ok(Self { data, width, height, channels })
    }

    /// Build an RGB raster from row-major pixel triples.
    pub fn from_rgb(width: usize, height: usize, pixels: &[[u8; 3]]) -> Result<Self, RasterError> {
        let data: Vec<u8> = pixels.iter().flatten().copied().collect();
        Self::new(data, width, height, 3)
    }

    /// An RGB raster where every pixel has the same colour.
    /// Panics if `width * height` pixels cannot be allocated.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        Self {
            data: rgb.repeat(width * height),
            width,
            height,
            channels: 3,
        }
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    /// Samples of the pixel at `(row, col)`. Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, row: usize, col: usize) -> &[u8] {
        let start = (row * self.width + col) * self.channels;
        &self.data[start..start + self.channels]
    }

    /// Samples of one full row.
    #[inline]
    pub fn row(&self, row: usize) -> &[u8] {
        let stride = self.width * self.channels;
        &self.data[row * stride..(row + 1) * stride]
    }

    /// The first three samples of every pixel. Only meaningful for rasters
    /// with at least three channels; yields nothing otherwise.
    pub fn rgb_pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        let data: &[u8] = if self.channels >= 3 { &self.data } else { &[] };
        data.chunks_exact(self.channels.max(3)).map(|p| [p[0], p[1], p[2]])
    }
}
