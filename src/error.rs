//! Error taxonomy for the comparison engine.
//!
//! Only I/O and serialization can fail: a sample that decodes always
//! compares. Degenerate measurements (blank pages, too little ink) report
//! documented neutral values instead of errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompareError {
    /// The input bytes did not decode as an image.
    #[error("could not decode input image: {0}")]
    Decode(#[from] image::ImageError),

    /// The input decoded to a zero-sized image.
    #[error("input image has no pixels")]
    EmptyImage,

    /// A result rendering could not be PNG-encoded.
    #[error("could not encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: image::ImageError,
    },

    /// An input file could not be read.
    #[error("could not read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A report file could not be written.
    #[error("could not write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A result failed to serialize.
    #[error("could not serialize result: {0}")]
    Json(#[from] serde_json::Error),
}
