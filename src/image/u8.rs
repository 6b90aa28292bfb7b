//! Owned 8-bit single-channel buffer.
//!
//! Masks produced by the pipeline use the convention 0 = background,
//! non-zero = ink. Buffers are row-major with `stride == w`.

/// Owned 8-bit grayscale buffer.
#[derive(Clone, Debug)]
pub struct GrayImageU8 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Number of bytes between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<u8>,
}

impl GrayImageU8 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![0; w * h],
        }
    }

    /// Wrap raw bytes; `data.len()` must equal `w * h`.
    pub fn from_raw(w: usize, h: usize, data: Vec<u8>) -> Self {
        assert_eq!(data.len(), w * h, "gray buffer length mismatch");
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// True when the pixel at (x, y) carries ink.
    #[inline]
    pub fn is_ink(&self, x: usize, y: usize) -> bool {
        self.get(x, y) > 0
    }

    /// Number of ink (non-zero) pixels.
    pub fn ink_count(&self) -> usize {
        self.data.iter().filter(|&&v| v > 0).count()
    }
}
