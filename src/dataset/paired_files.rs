use tracing::debug;

use crate::config::SplitDatasetConfig;
use crate::dataset::ItemSource;
use crate::dataset::loader::{FeatureTargetTransforms, ItemLoader};
use crate::errors::DatasetError;
use crate::splits::{DatasetSplitter, FileList, SplitFiles, SplitMode};

/// Dataset of `(feature, target)` items over parallel feature/target directories.
///
/// Construction lists both directories, applies the size limit, and (when
/// enabled) splits with the fixed split seed. The active list is the split
/// selected by the config's mode, or the whole truncated list when splitting
/// is off.
pub struct PairedFileDataset<T> {
    files: FileList,
    split: Option<SplitFiles>,
    mode: SplitMode,
    loader: ItemLoader<T>,
    transforms: FeatureTargetTransforms<T>,
}

impl<T> PairedFileDataset<T> {
    /// Scan, limit and optionally split the configured directories.
    pub fn new(config: &SplitDatasetConfig, loader: ItemLoader<T>) -> Result<Self, DatasetError> {
        config.validate()?;
        let files = FileList::scan(&config.root, &config.feature_dir, &config.target_dir)?
            .truncate(config.limit)?;
        let (files, split) = if config.split_dataset {
            let split = DatasetSplitter::new(config.valid_size)?.split_files(&files)?;
            (split.active(config.mode).clone(), Some(split))
        } else {
            (files, None)
        };
        debug!(
            root = %config.root.display(),
            active = files.len(),
            split = config.split_dataset,
            mode = ?config.mode,
            "built feature/target dataset"
        );
        Ok(Self {
            files,
            split,
            mode: config.mode,
            loader,
            transforms: FeatureTargetTransforms::default(),
        })
    }

    /// Replace the feature/target transforms.
    pub fn with_transforms(mut self, transforms: FeatureTargetTransforms<T>) -> Self {
        self.transforms = transforms;
        self
    }

    /// Active feature/target lists.
    pub fn files(&self) -> &FileList {
        &self.files
    }

    /// Both splits, when splitting is enabled.
    pub fn split(&self) -> Option<&SplitFiles> {
        self.split.as_ref()
    }

    /// Active split mode.
    pub fn mode(&self) -> SplitMode {
        self.mode
    }
}

impl<T> ItemSource for PairedFileDataset<T> {
    type Item = (T, T);

    fn len(&self) -> usize {
        self.files.len()
    }

    fn get(&self, idx: usize) -> Result<Self::Item, DatasetError> {
        let (feature_path, target_path) =
            self.files
                .get(idx)
                .ok_or(DatasetError::IndexOutOfRange {
                    index: idx,
                    len: self.files.len(),
                })?;
        let feature = (self.loader)(feature_path)?;
        let target = (self.loader)(target_path)?;
        Ok(self.transforms.apply(feature, target))
    }
}
