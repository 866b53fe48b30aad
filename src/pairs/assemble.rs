use rand::Rng;
use tracing::{debug, info};

use crate::indexing::LabelIndex;
use crate::metrics::LabelBalance;
use crate::pairs::different::different_pairs_by_label;
use crate::pairs::similar::similar_pairs_by_label;
use crate::pairs::{PairIndex, PairsByLabel};

/// Interleave each label's similar and different pairs into one flat index.
///
/// For each label (index order) and position `i` below
/// `min(similar, different)`, emits `similar[i]` then `different[i]`, both
/// resolved against the index root. Positions past the shorter list are
/// dropped.
pub fn assemble(index: &LabelIndex, similar: &PairsByLabel, different: &PairsByLabel) -> PairIndex {
    let root = index.root();
    let mut pairs = Vec::new();
    let mut balance = Vec::with_capacity(index.label_count());
    for label in index.labels() {
        let similar_pairs = similar.get(label).map(Vec::as_slice).unwrap_or_default();
        let different_pairs = different.get(label).map(Vec::as_slice).unwrap_or_default();
        let emitted = similar_pairs.len().min(different_pairs.len());
        for (left, right) in similar_pairs.iter().zip(different_pairs) {
            pairs.push(left.resolved_against(root));
            pairs.push(right.resolved_against(root));
        }
        if emitted < similar_pairs.len() {
            debug!(
                label,
                similar = similar_pairs.len(),
                different = different_pairs.len(),
                "different pairs fell short of similar pairs"
            );
        }
        balance.push(LabelBalance {
            label: label.to_string(),
            similar: similar_pairs.len(),
            different: different_pairs.len(),
            emitted,
        });
    }
    info!(
        root = %root.display(),
        labels = balance.len(),
        pairs = pairs.len(),
        "assembled pair index"
    );
    PairIndex::from_parts(root.to_string_lossy().into_owned(), pairs, balance)
}

/// Run the full pipeline (similar, balanced different, interleave) over `index`.
///
/// All random draws come from `rng`.
pub fn build_pair_index<R>(index: &LabelIndex, rng: &mut R) -> PairIndex
where
    R: Rng + ?Sized,
{
    let similar = similar_pairs_by_label(index);
    let different = different_pairs_by_label(index, &similar, rng);
    assemble(index, &similar, &different)
}
