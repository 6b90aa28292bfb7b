//! Top-level comparison parameters.

use crate::features::FeatureParams;
use crate::preprocess::PreprocessParams;

/// All tuning for one [`crate::comparator::Comparator`]. The defaults are
/// the documented pipeline constants; most callers never touch them.
#[derive(Clone, Debug, Default)]
pub struct CompareParams {
    pub preprocess: PreprocessParams,
    pub features: FeatureParams,
}
