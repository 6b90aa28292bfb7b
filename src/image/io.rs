//! I/O helpers: decoding inputs, encoding result renderings, JSON output.
//!
//! - `decode_rgb` / `load_rgb_image`: bytes or file → owned RGB buffer.
//! - `gray_png_base64` / `rgb_png_base64`: renderings for display collaborators.
//! - `thumbnail_base64`: small preview the history store keeps.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{GrayImageU8, RgbImageU8};
use crate::error::CompareError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, Rgb};
use serde::Serialize;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Longest side of history thumbnails, in pixels.
pub const THUMBNAIL_MAX_SIZE: usize = 150;

/// Decode image bytes (PNG/JPEG/...) into an owned RGB buffer.
///
/// Fails fast on malformed data; nothing downstream runs on an input that
/// did not decode.
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImageU8, CompareError> {
    let img = image::load_from_memory(bytes)?.into_rgb8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    if w == 0 || h == 0 {
        return Err(CompareError::EmptyImage);
    }
    Ok(RgbImageU8::from_raw(w, h, img.into_raw()))
}

/// Load an image from disk and decode to RGB.
pub fn load_rgb_image(path: &Path) -> Result<RgbImageU8, CompareError> {
    let bytes = fs::read(path).map_err(|source| CompareError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode_rgb(&bytes)
}

/// Encode an 8-bit grayscale buffer as PNG bytes.
pub fn gray_png_bytes(img: &GrayImageU8) -> Result<Vec<u8>, CompareError> {
    let buffer: ImageBuffer<Luma<u8>, Vec<u8>> =
        ImageBuffer::from_raw(img.w as u32, img.h as u32, img.data.clone())
            .expect("gray buffer dimensions are consistent");
    encode_png(DynamicImage::ImageLuma8(buffer), "grayscale rendering")
}

/// Encode an RGB buffer as PNG bytes.
pub fn rgb_png_bytes(img: &RgbImageU8) -> Result<Vec<u8>, CompareError> {
    let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_raw(img.w as u32, img.h as u32, img.data.clone())
            .expect("rgb buffer dimensions are consistent");
    encode_png(DynamicImage::ImageRgb8(buffer), "rgb rendering")
}

/// Base64-encoded PNG of a grayscale buffer.
pub fn gray_png_base64(img: &GrayImageU8) -> Result<String, CompareError> {
    Ok(BASE64.encode(gray_png_bytes(img)?))
}

/// Base64-encoded PNG of an RGB buffer.
pub fn rgb_png_base64(img: &RgbImageU8) -> Result<String, CompareError> {
    Ok(BASE64.encode(rgb_png_bytes(img)?))
}

/// Base64-encoded PNG thumbnail with the longest side capped at
/// [`THUMBNAIL_MAX_SIZE`].
pub fn thumbnail_base64(img: &RgbImageU8) -> Result<String, CompareError> {
    let longest = img.w.max(img.h).max(1);
    if longest <= THUMBNAIL_MAX_SIZE {
        return rgb_png_base64(img);
    }
    let scale = THUMBNAIL_MAX_SIZE as f32 / longest as f32;
    let tw = ((img.w as f32 * scale) as usize).max(1);
    let th = ((img.h as f32 * scale) as usize).max(1);
    let small = crate::preprocess::resize::resize_rgb_area(img, tw, th);
    rgb_png_base64(&small)
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), CompareError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| CompareError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|source| CompareError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn encode_png(img: DynamicImage, what: &'static str) -> Result<Vec<u8>, CompareError> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|source| CompareError::Encode { what, source })?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_rgb(&[0u8; 16]).is_err());
    }

    #[test]
    fn png_round_trip_preserves_pixels() {
        let mut img = RgbImageU8::filled(3, 2, [255, 255, 255]);
        img.set(1, 1, [10, 20, 30]);
        let bytes = rgb_png_bytes(&img).expect("encode");
        let back = decode_rgb(&bytes).expect("decode");
        assert_eq!(back.w, 3);
        assert_eq!(back.h, 2);
        assert_eq!(back.get(1, 1), [10, 20, 30]);
    }

    #[test]
    fn thumbnail_caps_longest_side() {
        let img = RgbImageU8::filled(600, 300, [128, 128, 128]);
        let b64 = thumbnail_base64(&img).expect("thumbnail");
        let bytes = BASE64.decode(b64).expect("valid base64");
        let back = decode_rgb(&bytes).expect("decode");
        assert_eq!(back.w, THUMBNAIL_MAX_SIZE);
        assert_eq!(back.h, THUMBNAIL_MAX_SIZE / 2);
    }
}
