//! Owned single-channel f32 image in row-major layout (stride == width).
//!
//! Used for the numeric stages of the pipeline (sharpening, blurring,
//! distance values). Value range depends on the stage; the preprocessing
//! stages keep the 0..255 scale of the 8-bit inputs.
#[derive(Clone, Debug)]
pub struct ImageF32 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Number of f32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![0.0; w * h],
        }
    }

    /// Convert an 8-bit buffer keeping the 0..255 scale.
    pub fn from_gray(gray: &crate::image::GrayImageU8) -> Self {
        let mut out = Self::new(gray.w, gray.h);
        for (dst, &src) in out.data.iter_mut().zip(gray.data.iter()) {
            *dst = src as f32;
        }
        out
    }

    /// Clamp to [0, 255] and round into an 8-bit buffer.
    pub fn to_gray_u8(&self) -> crate::image::GrayImageU8 {
        let data = self
            .data
            .iter()
            .map(|&v| v.clamp(0.0, 255.0).round() as u8)
            .collect();
        crate::image::GrayImageU8::from_raw(self.w, self.h, data)
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    /// Get the pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    /// Set the pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }
}
