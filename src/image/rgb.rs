//! Owned interleaved 3-channel 8-bit image.

use super::GrayImageU8;

const CHANNELS: usize = 3;

/// Owned RGB buffer, row-major, channels interleaved per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbImageU8 {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbImageU8 {
    /// Construct a black buffer of size `width × height`.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * CHANNELS],
        }
    }

    /// Wrap raw interleaved bytes; `data.len()` must equal `width * height * 3`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == width * height * CHANNELS).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = (y * self.width + x) * CHANNELS;
        self.data[i..i + CHANNELS].copy_from_slice(&rgb);
    }

    /// Interleaved row of `width * 3` bytes.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width * CHANNELS;
        &self.data[start..start + self.width * CHANNELS]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Convert to a single-channel intensity image using BT.601 weights
    /// (0.299 R + 0.587 G + 0.114 B), rounded to nearest.
    pub fn to_luma(&self) -> GrayImageU8 {
        let mut out = Vec::with_capacity(self.width * self.height);
        for px in self.data.chunks_exact(CHANNELS) {
            let v = 299 * px[0] as u32 + 587 * px[1] as u32 + 114 * px[2] as u32;
            out.push(((v + 500) / 1000) as u8);
        }
        GrayImageU8::from_raw(self.width, self.height, out).unwrap_or_else(|| {
            // chunks_exact over width*height*3 bytes always yields width*height values
            unreachable!("luma buffer size mismatch")
        })
    }
}
