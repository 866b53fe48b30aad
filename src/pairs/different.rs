//! Cross-label pair generation with two-stage balancing.
//!
//! Enumerating every cross-label pair grows with `n · total_other_files`, so
//! candidates are bounded in two stages:
//!
//! 1. For each file in a label and each other label, the candidate group is
//!    cut to [`per_group_sample_size`] pairs.
//! 2. All surviving candidates for the label are cut to the label's
//!    similar-pair count.
//!
//! A label may end up with fewer different pairs than similar pairs when too
//! few candidates survive stage 1. That shortfall is accepted; the guarantee
//! is only `different <= similar` per label.

use rand::Rng;
use rand::seq::index::sample as sample_indices;
use tracing::debug;

use crate::constants::pairs::{SUBSAMPLE_DIVISOR, SUBSAMPLE_MIN_GROUP};
use crate::indexing::{LabelGroup, LabelIndex};
use crate::pairs::{Pair, PairsByLabel, relative_path};

/// Per-(file, other label) candidate cap for a label with `group_len` files.
pub fn per_group_sample_size(group_len: usize) -> usize {
    if group_len >= SUBSAMPLE_MIN_GROUP {
        group_len / SUBSAMPLE_DIVISOR
    } else {
        group_len
    }
}

/// Balanced different pairs for a single label.
///
/// `target` is the label's similar-pair count. Draws come from `rng` in a
/// fixed order (files of `group`, then other labels in index order), so a
/// seeded RNG reproduces the exact selection.
pub fn different_pairs_for_label<R>(
    index: &LabelIndex,
    group: LabelGroup<'_>,
    target: usize,
    rng: &mut R,
) -> Vec<Pair>
where
    R: Rng + ?Sized,
{
    let sample_size = per_group_sample_size(group.files.len());
    let mut candidates = Vec::new();
    for file in group.files {
        let primary = relative_path(group.label, file);
        for other in index.groups().filter(|other| other.label != group.label) {
            let pairs: Vec<Pair> = other
                .files
                .iter()
                .map(|other_file| {
                    Pair::different(primary.clone(), relative_path(other.label, other_file))
                })
                .collect();
            candidates.extend(sample_without_replacement(pairs, sample_size, rng));
        }
    }
    let candidate_count = candidates.len();
    let kept = sample_without_replacement(candidates, target, rng);
    debug!(
        label = group.label,
        candidates = candidate_count,
        target,
        kept = kept.len(),
        "balanced different pairs"
    );
    kept
}

/// Balanced different pairs for every label in `index`, in index order.
///
/// Targets are read from `similar`; a label missing there gets no pairs.
pub fn different_pairs_by_label<R>(
    index: &LabelIndex,
    similar: &PairsByLabel,
    rng: &mut R,
) -> PairsByLabel
where
    R: Rng + ?Sized,
{
    let mut by_label = PairsByLabel::with_capacity(index.label_count());
    for group in index.groups() {
        let target = similar.get(group.label).map_or(0, Vec::len);
        let pairs = different_pairs_for_label(index, group, target, rng);
        by_label.insert(group.label.to_string(), pairs);
    }
    by_label
}

/// Uniformly draw `amount` items without replacement, keeping all when there
/// are not more than `amount`.
fn sample_without_replacement<T, R>(items: Vec<T>, amount: usize, rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    if items.len() <= amount {
        return items;
    }
    let picked = sample_indices(rng, items.len(), amount).into_vec();
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    picked
        .into_iter()
        .filter_map(|idx| slots[idx].take())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairs::PairKind;
    use crate::pairs::similar::similar_pairs_by_label;
    use crate::rng::DeterministicRng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn label_of(path: &str) -> &str {
        std::path::Path::new(path)
            .parent()
            .and_then(|parent| parent.to_str())
            .unwrap()
    }

    fn skewed_index() -> LabelIndex {
        let big: Vec<String> = (0..12).map(|i| format!("big{i:02}")).collect();
        let mid: Vec<String> = (0..5).map(|i| format!("mid{i}")).collect();
        LabelIndex::from_groups(
            "/data",
            vec![
                ("big".to_string(), big),
                ("mid".to_string(), mid),
                ("tiny".to_string(), vec!["t0".to_string()]),
            ],
        )
    }

    #[test]
    fn per_group_sample_size_quarters_large_groups() {
        assert_eq!(per_group_sample_size(0), 0);
        assert_eq!(per_group_sample_size(1), 1);
        assert_eq!(per_group_sample_size(3), 3);
        assert_eq!(per_group_sample_size(4), 1);
        assert_eq!(per_group_sample_size(9), 2);
        assert_eq!(per_group_sample_size(12), 3);
    }

    #[test]
    fn sampling_keeps_everything_when_under_amount() {
        let mut rng = StdRng::seed_from_u64(1);
        let items = vec![1, 2, 3];
        assert_eq!(sample_without_replacement(items, 5, &mut rng), vec![1, 2, 3]);
    }

    #[test]
    fn sampling_draws_distinct_items() {
        let mut rng = StdRng::seed_from_u64(2);
        let items: Vec<u32> = (0..50).collect();
        let picked = sample_without_replacement(items, 10, &mut rng);
        let unique: HashSet<u32> = picked.iter().copied().collect();
        assert_eq!(picked.len(), 10);
        assert_eq!(unique.len(), 10);
    }

    #[test]
    fn different_pairs_never_exceed_similar_count() {
        let index = skewed_index();
        let similar = similar_pairs_by_label(&index);
        let mut rng = StdRng::seed_from_u64(7);
        let different = different_pairs_by_label(&index, &similar, &mut rng);
        for (label, pairs) in &different {
            assert!(pairs.len() <= similar[label].len(), "label {label}");
            for pair in pairs {
                assert_eq!(pair.kind, PairKind::Different);
                assert_eq!(label_of(&pair.path_a), label.as_str());
                assert_ne!(label_of(&pair.path_b), label.as_str());
            }
        }
    }

    #[test]
    fn stage_one_caps_each_file_and_other_label_group() {
        let index = skewed_index();
        let group = index.groups().find(|group| group.label == "big").unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        // Target larger than any candidate pool isolates stage one.
        let pairs = different_pairs_for_label(&index, group, usize::MAX, &mut rng);
        // 12 files, cap 3 against "mid" (5 files) and 1 against "tiny" (1 file).
        assert_eq!(pairs.len(), 12 * (3 + 1));
    }

    #[test]
    fn small_label_against_large_labels_reaches_target() {
        let index = skewed_index();
        let similar = similar_pairs_by_label(&index);
        let mut rng = StdRng::seed_from_u64(11);
        let different = different_pairs_by_label(&index, &similar, &mut rng);
        // "tiny": 1 file, cap 1 per other label, 2 candidates, target 1.
        assert_eq!(different["tiny"].len(), 1);
        // "mid": 5 files, cap 1 per other label, 10 candidates, target 25.
        assert_eq!(different["mid"].len(), 10);
    }

    #[test]
    fn two_label_scenario_respects_targets() {
        let index = LabelIndex::from_groups(
            "/data",
            vec![("A", vec!["a1", "a2"]), ("B", vec!["b1"])],
        );
        let similar = similar_pairs_by_label(&index);
        assert_eq!(similar["A"].len(), 4);
        assert_eq!(similar["B"].len(), 1);
        let mut rng = StdRng::seed_from_u64(5);
        let different = different_pairs_by_label(&index, &similar, &mut rng);
        assert_eq!(different["A"].len(), 2);
        assert_eq!(different["B"].len(), 1);
        assert!(different["A"].len() <= 4);
    }

    #[test]
    fn seeded_rng_reproduces_selection() {
        let index = skewed_index();
        let similar = similar_pairs_by_label(&index);
        let first = different_pairs_by_label(&index, &similar, &mut DeterministicRng::new(99));
        let second = different_pairs_by_label(&index, &similar, &mut DeterministicRng::new(99));
        assert_eq!(first, second);
    }

    #[test]
    fn shared_rng_advances_between_constructions() {
        let index = skewed_index();
        let similar = similar_pairs_by_label(&index);
        let mut rng = DeterministicRng::new(99);
        let first = different_pairs_by_label(&index, &similar, &mut rng);
        let second = different_pairs_by_label(&index, &similar, &mut rng);
        assert_ne!(first["big"], second["big"]);
    }
}
