use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::DatasetError;
use crate::metrics::{BalanceSummary, LabelBalance};
use crate::pairs::Pair;
use crate::types::PathString;

/// Immutable, random-access sequence of resolved pairs.
///
/// Built once by [`crate::pairs::assemble`]; readers only index into it, so a
/// shared reference is safe to use from any number of loader threads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairIndex {
    root: PathString,
    pairs: Vec<Pair>,
    balance: Vec<LabelBalance>,
}

impl PairIndex {
    pub(crate) fn from_parts(root: PathString, pairs: Vec<Pair>, balance: Vec<LabelBalance>) -> Self {
        Self {
            root,
            pairs,
            balance,
        }
    }

    /// Dataset root the pair paths were resolved against.
    pub fn root(&self) -> &Path {
        Path::new(&self.root)
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when the index holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pair at `idx`, if in range.
    pub fn get(&self, idx: usize) -> Option<&Pair> {
        self.pairs.get(idx)
    }

    /// Pair at `idx`, or `IndexOutOfRange`.
    pub fn pair_at(&self, idx: usize) -> Result<&Pair, DatasetError> {
        self.pairs.get(idx).ok_or(DatasetError::IndexOutOfRange {
            index: idx,
            len: self.pairs.len(),
        })
    }

    /// All pairs in index order.
    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// Iterate pairs in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Pair> {
        self.pairs.iter()
    }

    /// Per-label counts recorded at assembly time, in label order.
    pub fn balance(&self) -> &[LabelBalance] {
        &self.balance
    }

    /// Aggregate view over [`PairIndex::balance`].
    pub fn balance_summary(&self) -> Option<BalanceSummary> {
        BalanceSummary::from_balance(&self.balance)
    }

    /// Pretty-printed JSON manifest of the index (root, pairs, balance).
    pub fn to_json_manifest(&self) -> Result<String, DatasetError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| DatasetError::Persistence(format!("manifest encode failed: {err}")))
    }
}

impl<'a> IntoIterator for &'a PairIndex {
    type Item = &'a Pair;
    type IntoIter = std::slice::Iter<'a, Pair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
