use serde::{Deserialize, Serialize};

use crate::types::Label;

/// Per-label similar/different counts recorded while assembling a pair index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelBalance {
    /// Label name.
    pub label: Label,
    /// Similar pairs generated for the label (`n²`).
    pub similar: usize,
    /// Different pairs kept after balancing.
    pub different: usize,
    /// Interleaved positions emitted (each contributes one pair of each kind).
    pub emitted: usize,
}

impl LabelBalance {
    /// Similar pairs left without a different-pair partner.
    pub fn shortfall(&self) -> usize {
        self.similar.saturating_sub(self.different)
    }
}

/// Aggregate balance metrics across labels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    /// Labels in the index.
    pub labels: usize,
    /// Similar pairs generated across labels.
    pub similar_total: usize,
    /// Different pairs kept across labels.
    pub different_total: usize,
    /// Pairs in the assembled index (`2 * Σ emitted`).
    pub indexed_pairs: usize,
    /// `different_total / similar_total` (0 when there are no similar pairs).
    pub ratio: f64,
    /// Labels whose different pairs fell short of their similar pairs.
    pub shortfall_labels: Vec<Label>,
}

impl BalanceSummary {
    /// Summarize per-label balance; `None` for an empty slice.
    pub fn from_balance(balance: &[LabelBalance]) -> Option<Self> {
        if balance.is_empty() {
            return None;
        }
        let similar_total: usize = balance.iter().map(|entry| entry.similar).sum();
        let different_total: usize = balance.iter().map(|entry| entry.different).sum();
        let emitted: usize = balance.iter().map(|entry| entry.emitted).sum();
        let ratio = if similar_total == 0 {
            0.0
        } else {
            different_total as f64 / similar_total as f64
        };
        let shortfall_labels = balance
            .iter()
            .filter(|entry| entry.shortfall() > 0)
            .map(|entry| entry.label.clone())
            .collect();
        Some(Self {
            labels: balance.len(),
            similar_total,
            different_total,
            indexed_pairs: emitted * 2,
            ratio,
            shortfall_labels,
        })
    }
}
