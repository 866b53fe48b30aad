//! Index-addressable datasets built on the pair index and file splits.
//!
//! Every dataset finishes all indexing, sampling, and splitting in its
//! constructor. Access afterwards is a lookup plus the injected loader, so a
//! shared reference can serve any number of loader threads.

use crate::errors::DatasetError;

/// Labeled-folder dataset with class lookup and sampling.
pub mod folder;
/// Item loader and transform collaborators.
pub mod loader;
/// Feature/target dataset with size limiting and train/validation splits.
pub mod paired_files;
/// Similar/different pair dataset.
pub mod siamese;

pub use folder::LabeledFolderDataset;
pub use loader::{
    FeatureTargetTransforms, ItemLoader, ItemTransform, LabelTransform, PairTransform, Transforms,
    read_bytes_loader,
};
pub use paired_files::PairedFileDataset;
pub use siamese::SiamesePairDataset;

/// Index-addressable item source consumed by data-loading layers.
///
/// `len` is fixed after construction and `get` must return the item for the
/// same index on every call (modulo loader/transform randomness).
pub trait ItemSource: Send + Sync {
    /// Item produced for one index.
    type Item;
    /// Number of addressable items.
    fn len(&self) -> usize;
    /// True when there are no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Load the item at `idx`.
    ///
    /// Returns `IndexOutOfRange` past the end and propagates loader failures
    /// unchanged; nothing is skipped or retried.
    fn get(&self, idx: usize) -> Result<Self::Item, DatasetError>;
}
