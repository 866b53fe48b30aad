use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::FolderDatasetConfig;
use crate::constants::indexing::ANY_EXTENSION;
use crate::dataset::ItemSource;
use crate::dataset::loader::{ItemLoader, ItemTransform};
use crate::errors::DatasetError;
use crate::indexing::FileIndexer;
use crate::types::{ClassIndex, Label};

/// Dataset of `(item, class_index)` over a label directory tree.
///
/// Classes are the sorted label names; samples are ordered by class and then
/// by file name.
pub struct LabeledFolderDataset<T> {
    classes: Vec<Label>,
    samples: Vec<(PathBuf, ClassIndex)>,
    loader: ItemLoader<T>,
    transform: Option<ItemTransform<T>>,
}

impl<T> LabeledFolderDataset<T> {
    /// Index `config.root`, assigning class indices in sorted label order.
    pub fn new(config: &FolderDatasetConfig, loader: ItemLoader<T>) -> Result<Self, DatasetError> {
        let extension = config.extension.as_deref().unwrap_or(ANY_EXTENSION);
        let index = FileIndexer::new(&config.root)
            .with_extension(extension)
            .with_follow_links(config.follow_links)
            .index()?;
        let mut classes = Vec::with_capacity(index.label_count());
        let mut samples = Vec::with_capacity(index.file_count());
        for (class_idx, group) in index.groups().enumerate() {
            classes.push(group.label.to_string());
            samples.extend(
                group
                    .files
                    .iter()
                    .map(|file| (index.root().join(group.label).join(file), class_idx)),
            );
        }
        Ok(Self {
            classes,
            samples,
            loader,
            transform: None,
        })
    }

    /// Apply `transform` to every loaded item.
    pub fn with_transform(mut self, transform: ItemTransform<T>) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Sorted class names; position is the class index.
    pub fn classes(&self) -> &[Label] {
        &self.classes
    }

    /// Label name for a class index.
    pub fn class_name(&self, class_idx: ClassIndex) -> Option<&str> {
        self.classes.get(class_idx).map(String::as_str)
    }

    /// Class index for a label name.
    pub fn class_index(&self, label: &str) -> Option<ClassIndex> {
        self.classes.iter().position(|class| class == label)
    }

    /// `(path, class_index)` for every sample in dataset order.
    pub fn samples(&self) -> &[(PathBuf, ClassIndex)] {
        &self.samples
    }

    /// Load up to `num` samples, either the first ones or a shuffled selection.
    ///
    /// Shuffling draws from `rng` and leaves the dataset order untouched.
    pub fn sample<R>(
        &self,
        num: usize,
        shuffle: bool,
        rng: &mut R,
    ) -> Result<(Vec<T>, Vec<ClassIndex>), DatasetError>
    where
        R: Rng + ?Sized,
    {
        let mut order: Vec<usize> = (0..self.samples.len()).collect();
        if shuffle {
            order.shuffle(rng);
        }
        order.truncate(num);
        let mut items = Vec::with_capacity(order.len());
        let mut targets = Vec::with_capacity(order.len());
        for idx in order {
            let (path, class_idx) = &self.samples[idx];
            items.push(self.load(path)?);
            targets.push(*class_idx);
        }
        Ok((items, targets))
    }

    /// Like [`LabeledFolderDataset::sample`] with targets mapped to class names.
    pub fn sample_named<R>(
        &self,
        num: usize,
        shuffle: bool,
        rng: &mut R,
    ) -> Result<(Vec<T>, Vec<&str>), DatasetError>
    where
        R: Rng + ?Sized,
    {
        let (items, targets) = self.sample(num, shuffle, rng)?;
        let names = targets
            .into_iter()
            .filter_map(|class_idx| self.class_name(class_idx))
            .collect();
        Ok((items, names))
    }

    fn load(&self, path: &Path) -> Result<T, DatasetError> {
        let item = (self.loader)(path)?;
        Ok(match &self.transform {
            Some(transform) => transform(item),
            None => item,
        })
    }
}

impl<T> ItemSource for LabeledFolderDataset<T> {
    type Item = (T, ClassIndex);

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn get(&self, idx: usize) -> Result<Self::Item, DatasetError> {
        let (path, class_idx) = self
            .samples
            .get(idx)
            .ok_or(DatasetError::IndexOutOfRange {
                index: idx,
                len: self.samples.len(),
            })?;
        Ok((self.load(path)?, *class_idx))
    }
}
