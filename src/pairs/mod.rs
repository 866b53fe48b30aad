//! Similar/different pair generation, balancing, and assembly.
//!
//! Pipeline: [`similar::similar_pairs_by_label`] produces every ordered
//! same-label pair, [`different::different_pairs_by_label`] draws a balanced
//! set of cross-label pairs per label, and [`assemble::assemble`] interleaves
//! both into a flat [`PairIndex`].

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::pairs::{DIFFERENT_LABEL, SIMILAR_LABEL};
use crate::types::{Label, NumericLabel, PathString};

/// Pair interleaving and full pair-index construction.
pub mod assemble;
/// Cross-label candidate generation and balancing.
pub mod different;
/// Immutable, random-access pair index.
pub mod index;
/// Same-label pair generation.
pub mod similar;

pub use assemble::{assemble, build_pair_index};
pub use different::{different_pairs_by_label, different_pairs_for_label, per_group_sample_size};
pub use index::PairIndex;
pub use similar::{similar_pairs, similar_pairs_by_label};

/// Per-label pair lists, ordered like the originating `LabelIndex`.
pub type PairsByLabel = IndexMap<Label, Vec<Pair>>;

/// Whether both members of a pair share a label.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    bitcode::Encode,
    bitcode::Decode,
)]
pub enum PairKind {
    /// Both files carry the same label.
    Similar,
    /// The files carry different labels.
    Different,
}

impl PairKind {
    /// Numeric label handed to consumers (`0` similar, `1` different).
    pub fn label(self) -> NumericLabel {
        match self {
            PairKind::Similar => SIMILAR_LABEL,
            PairKind::Different => DIFFERENT_LABEL,
        }
    }
}

/// Two file paths plus their pair kind.
///
/// Paths are `label/file` relative to the dataset root until assembly
/// resolves them against the root.
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, bitcode::Encode, bitcode::Decode,
)]
pub struct Pair {
    /// First member's path.
    pub path_a: PathString,
    /// Second member's path.
    pub path_b: PathString,
    /// Whether the members share a label.
    pub kind: PairKind,
}

impl Pair {
    /// Same-label pair of `path_a` and `path_b`.
    pub fn similar(path_a: impl Into<PathString>, path_b: impl Into<PathString>) -> Self {
        Self {
            path_a: path_a.into(),
            path_b: path_b.into(),
            kind: PairKind::Similar,
        }
    }

    /// Cross-label pair of `path_a` and `path_b`.
    pub fn different(path_a: impl Into<PathString>, path_b: impl Into<PathString>) -> Self {
        Self {
            path_a: path_a.into(),
            path_b: path_b.into(),
            kind: PairKind::Different,
        }
    }

    /// Numeric label of this pair.
    pub fn label(&self) -> NumericLabel {
        self.kind.label()
    }

    /// Copy of this pair with both paths joined onto `root`.
    pub fn resolved_against(&self, root: &Path) -> Self {
        Self {
            path_a: join_root(root, &self.path_a),
            path_b: join_root(root, &self.path_b),
            kind: self.kind,
        }
    }
}

/// Root-relative path of `file` inside the `label` directory.
pub fn relative_path(label: &str, file: &str) -> PathString {
    Path::new(label).join(file).to_string_lossy().into_owned()
}

fn join_root(root: &Path, relative: &str) -> PathString {
    root.join(relative).to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_numeric_labels() {
        assert_eq!(PairKind::Similar.label(), 0);
        assert_eq!(PairKind::Different.label(), 1);
        assert_eq!(Pair::different("a/1", "b/1").label(), 1);
    }

    #[test]
    fn resolving_joins_both_paths_onto_root() {
        let pair = Pair::similar(relative_path("cats", "a.jpg"), relative_path("cats", "b.jpg"));
        let resolved = pair.resolved_against(Path::new("/data"));
        assert_eq!(
            Path::new(&resolved.path_a),
            Path::new("/data").join("cats").join("a.jpg")
        );
        assert_eq!(
            Path::new(&resolved.path_b),
            Path::new("/data").join("cats").join("b.jpg")
        );
        assert_eq!(resolved.kind, PairKind::Similar);
    }
}
