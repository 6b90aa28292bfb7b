#![doc = include_str!("../README.md")]

pub mod ai;
pub mod comparator;
pub mod error;
pub mod features;
pub mod geometry;
pub mod heatmap;
pub mod image;
pub mod preprocess;
pub mod score;
pub mod similarity;
pub mod types;

pub use comparator::{CompareParams, Comparator};
pub use error::CompareError;
pub use score::Verdict;
pub use types::{ComparisonResult, Renderings, SubScore};

/// Everything most callers need.
pub mod prelude {
    pub use crate::ai::{SimilarityAssessor, VisionAssessor};
    pub use crate::comparator::{CompareParams, Comparator};
    pub use crate::error::CompareError;
    pub use crate::image::io::load_rgb_image;
    pub use crate::score::Verdict;
    pub use crate::types::{ComparisonResult, SubScore};
}
