use tracing::debug;

use crate::indexing::LabelIndex;
use crate::pairs::{Pair, PairsByLabel, relative_path};
use crate::types::FileName;

/// Every ordered pair of files within one label, self-pairs included.
///
/// Yields `files.len()²` pairs in row-major order. The count is the
/// different-pair target for the label, so self-pairs must stay.
pub fn similar_pairs(label: &str, files: &[FileName]) -> Vec<Pair> {
    let paths: Vec<String> = files.iter().map(|file| relative_path(label, file)).collect();
    let mut pairs = Vec::with_capacity(paths.len() * paths.len());
    for left in &paths {
        for right in &paths {
            pairs.push(Pair::similar(left.clone(), right.clone()));
        }
    }
    pairs
}

/// Similar pairs for every label in `index`, in index order.
pub fn similar_pairs_by_label(index: &LabelIndex) -> PairsByLabel {
    let mut by_label = PairsByLabel::with_capacity(index.label_count());
    for group in index.groups() {
        let pairs = similar_pairs(group.label, group.files);
        debug!(
            label = group.label,
            files = group.files.len(),
            similar = pairs.len(),
            "generated similar pairs"
        );
        by_label.insert(group.label.to_string(), pairs);
    }
    by_label
}
