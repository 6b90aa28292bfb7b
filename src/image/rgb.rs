//! Owned interleaved RGB8 buffer (the decoded input representation).

/// Decoded RGB image, 8 bits per channel, row-major, tightly packed.
/// Immutable once decoded; the pipeline only reads from it.
#[derive(Clone, Debug)]
pub struct RgbImageU8 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Interleaved RGB bytes, `3 * w * h` long
    pub data: Vec<u8>,
}

impl RgbImageU8 {
    /// Wrap raw interleaved bytes; `data.len()` must equal `3 * w * h`.
    pub fn from_raw(w: usize, h: usize, data: Vec<u8>) -> Self {
        assert_eq!(data.len(), 3 * w * h, "rgb buffer length mismatch");
        Self { w, h, data }
    }

    /// Construct a buffer filled with one color.
    pub fn filled(w: usize, h: usize, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(3 * w * h);
        for _ in 0..w * h {
            data.extend_from_slice(&rgb);
        }
        Self { w, h, data }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [u8; 3] {
        let i = 3 * (y * self.w + x);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = 3 * (y * self.w + x);
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    /// Luma-weighted grayscale conversion (ITU-R BT.601 weights).
    pub fn to_gray(&self) -> crate::image::GrayImageU8 {
        let mut out = crate::image::GrayImageU8::new(self.w, self.h);
        for y in 0..self.h {
            for x in 0..self.w {
                let [r, g, b] = self.get(x, y);
                let v = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
                out.set(x, y, v.round().clamp(0.0, 255.0) as u8);
            }
        }
        out
    }
}
