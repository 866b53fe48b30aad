#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Dataset configuration types.
pub mod config;
/// Centralized constants used across indexing, pairing, splits, and snapshots.
pub mod constants;
/// Index-addressable datasets and their loader/transform collaborators.
pub mod dataset;
mod hash;
/// Label directory indexing.
pub mod indexing;
/// Pair balance metrics.
pub mod metrics;
/// Pair generation, balancing, and assembly.
pub mod pairs;
/// Deterministic RNG used for seeded construction.
pub mod rng;
/// Pair index snapshot persistence.
pub mod snapshot;
/// Size limits and train/validation splits.
pub mod splits;
/// Shared type aliases.
pub mod types;

mod errors;

pub use config::{FolderDatasetConfig, PairDatasetConfig, SplitDatasetConfig};
pub use dataset::{
    FeatureTargetTransforms, ItemLoader, ItemSource, ItemTransform, LabelTransform,
    LabeledFolderDataset, PairTransform, PairedFileDataset, SiamesePairDataset, Transforms,
    read_bytes_loader,
};
pub use errors::DatasetError;
pub use indexing::{FileIndexer, LabelGroup, LabelIndex};
pub use metrics::{BalanceSummary, LabelBalance};
pub use pairs::{Pair, PairIndex, PairKind, build_pair_index};
pub use rng::DeterministicRng;
pub use splits::{
    DatasetSplitter, FileList, SizeLimit, SplitAssignment, SplitFiles, SplitMode, split_indices,
};
pub use types::{ClassIndex, FileName, Label, NumericLabel, PathString};
