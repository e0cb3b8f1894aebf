//! Dense float containers exchanged with the segmentation model.

/// Planar CHW float tensor, the model's input layout.
#[derive(Clone, Debug)]
pub struct TensorF32 {
    channels: usize,
    height: usize,
    width: usize,
    data: Vec<f32>,
}

impl TensorF32 {
    /// Construct a zero-initialized tensor of shape `[channels, height, width]`.
    pub fn new(channels: usize, height: usize, width: usize) -> Self {
        Self {
            channels,
            height,
            width,
            data: vec![0.0; channels * height * width],
        }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn idx(&self, c: usize, y: usize, x: usize) -> usize {
        (c * self.height + y) * self.width + x
    }

    #[inline]
    pub fn get(&self, c: usize, y: usize, x: usize) -> f32 {
        self.data[self.idx(c, y, x)]
    }

    #[inline]
    pub fn set(&mut self, c: usize, y: usize, x: usize, v: f32) {
        let i = self.idx(c, y, x);
        self.data[i] = v;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Per-pixel class scores in row-major HWC layout.
///
/// The per-pixel score vector is contiguous, so argmax and bilinear
/// channel sampling walk a single slice.
///
/// Created per inference call and consumed immediately by the remapper.
#[derive(Clone, Debug)]
pub struct LogitVolume {
    height: usize,
    width: usize,
    channels: usize,
    data: Vec<f32>,
}

impl LogitVolume {
    /// Construct a zero-initialized volume of shape `[height, width, channels]`.
    pub fn new(height: usize, width: usize, channels: usize) -> Self {
        Self {
            height,
            width,
            channels,
            data: vec![0.0; height * width * channels],
        }
    }

    /// Wrap raw scores; `data.len()` must equal `height * width * channels`.
    pub fn from_raw(height: usize, width: usize, channels: usize, data: Vec<f32>) -> Option<Self> {
        (data.len() == height * width * channels).then_some(Self {
            height,
            width,
            channels,
            data,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Shape as `[height, width, channels]`.
    pub fn shape(&self) -> [usize; 3] {
        [self.height, self.width, self.channels]
    }

    #[inline]
    pub fn get(&self, y: usize, x: usize, c: usize) -> f32 {
        self.data[(y * self.width + x) * self.channels + c]
    }

    #[inline]
    pub fn set(&mut self, y: usize, x: usize, c: usize, v: f32) {
        let i = (y * self.width + x) * self.channels + c;
        self.data[i] = v;
    }

    /// Contiguous score vector for pixel (x, y).
    #[inline]
    pub fn scores_at(&self, y: usize, x: usize) -> &[f32] {
        let start = (y * self.width + x) * self.channels;
        &self.data[start..start + self.channels]
    }

    #[inline]
    pub fn scores_at_mut(&mut self, y: usize, x: usize) -> &mut [f32] {
        let start = (y * self.width + x) * self.channels;
        &mut self.data[start..start + self.channels]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }
}
