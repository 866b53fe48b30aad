use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::PairDatasetConfig;
use crate::dataset::ItemSource;
use crate::dataset::loader::{ItemLoader, Transforms};
use crate::errors::DatasetError;
use crate::indexing::{FileIndexer, LabelIndex};
use crate::pairs::{PairIndex, build_pair_index};
use crate::rng::DeterministicRng;
use crate::snapshot;
use crate::types::NumericLabel;

/// Dataset of `(item_a, item_b, label)` pairs over a label directory tree.
///
/// Label `0` marks a similar pair, `1` a different pair (before the optional
/// label transform).
pub struct SiamesePairDataset<T> {
    index: PairIndex,
    loader: ItemLoader<T>,
    transforms: Transforms<T>,
}

impl<T> SiamesePairDataset<T> {
    /// Index `config.root` and build the pair index.
    ///
    /// Different-pair draws use `config.seed` when set, otherwise a freshly
    /// OS-seeded RNG.
    pub fn new(config: &PairDatasetConfig, loader: ItemLoader<T>) -> Result<Self, DatasetError> {
        let index = build_seeded_index(config)?;
        Ok(Self::from_pair_index(index, loader))
    }

    /// Index `config.root` and build the pair index drawing from `rng`.
    pub fn with_rng<R>(
        config: &PairDatasetConfig,
        loader: ItemLoader<T>,
        rng: &mut R,
    ) -> Result<Self, DatasetError>
    where
        R: Rng + ?Sized,
    {
        let index = build_index(config, rng)?;
        Ok(Self::from_pair_index(index, loader))
    }

    /// Reuse the pair index stored at `snapshot_path`, or build and store one.
    ///
    /// Every process opening the same snapshot sees the same pairs, even when
    /// `config.seed` is unset. The root is always re-indexed; a snapshot built
    /// with other options or over a different file set is replaced.
    pub fn with_snapshot(
        config: &PairDatasetConfig,
        loader: ItemLoader<T>,
        snapshot_path: &Path,
    ) -> Result<Self, DatasetError> {
        let labels = index_labels(config)?;
        let fingerprint = snapshot::source_fingerprint(config, &labels);
        let index = snapshot::load_or_build(snapshot_path, &config.root, fingerprint, || {
            Ok(seeded_pairs(config, &labels))
        })?;
        Ok(Self::from_pair_index(index, loader))
    }

    /// Wrap an existing pair index (for example one loaded from a snapshot).
    pub fn from_pair_index(index: PairIndex, loader: ItemLoader<T>) -> Self {
        Self {
            index,
            loader,
            transforms: Transforms::default(),
        }
    }

    /// Replace the item/pair/label transforms.
    pub fn with_transforms(mut self, transforms: Transforms<T>) -> Self {
        self.transforms = transforms;
        self
    }

    /// Underlying pair index.
    pub fn pair_index(&self) -> &PairIndex {
        &self.index
    }

    /// Dataset root the pairs resolve against.
    pub fn root(&self) -> &Path {
        self.index.root()
    }
}

fn build_seeded_index(config: &PairDatasetConfig) -> Result<PairIndex, DatasetError> {
    let labels = index_labels(config)?;
    Ok(seeded_pairs(config, &labels))
}

fn seeded_pairs(config: &PairDatasetConfig, labels: &LabelIndex) -> PairIndex {
    match config.seed {
        Some(seed) => build_pair_index(labels, &mut DeterministicRng::new(seed)),
        None => build_pair_index(labels, &mut StdRng::from_os_rng()),
    }
}

fn build_index<R>(config: &PairDatasetConfig, rng: &mut R) -> Result<PairIndex, DatasetError>
where
    R: Rng + ?Sized,
{
    let labels = index_labels(config)?;
    Ok(build_pair_index(&labels, rng))
}

fn index_labels(config: &PairDatasetConfig) -> Result<LabelIndex, DatasetError> {
    config.validate()?;
    FileIndexer::new(&config.root)
        .with_extension(config.extension.clone())
        .with_follow_links(config.follow_links)
        .index()
}

impl<T> ItemSource for SiamesePairDataset<T> {
    type Item = (T, T, NumericLabel);

    fn len(&self) -> usize {
        self.index.len()
    }

    fn get(&self, idx: usize) -> Result<Self::Item, DatasetError> {
        let pair = self.index.pair_at(idx)?;
        let left = (self.loader)(Path::new(&pair.path_a))?;
        let right = (self.loader)(Path::new(&pair.path_b))?;
        let (left, right) = self.transforms.apply_items(left, right);
        let label = self.transforms.apply_label(pair.label());
        Ok((left, right, label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::loader::read_bytes_loader;
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn write_tree(root: &Path) {
        for (label, files) in [("A", vec!["a1", "a2"]), ("B", vec!["b1"])] {
            fs::create_dir_all(root.join(label)).unwrap();
            for file in files {
                fs::write(root.join(label).join(format!("{file}.jpg")), file.as_bytes()).unwrap();
            }
        }
    }

    #[test]
    fn get_returns_loaded_items_and_numeric_label() {
        let temp = tempdir().unwrap();
        write_tree(temp.path());
        let config = PairDatasetConfig::new(temp.path()).with_seed(3);
        let dataset = SiamesePairDataset::new(&config, read_bytes_loader()).unwrap();
        assert_eq!(dataset.len(), 6);

        let (left, right, label) = dataset.get(0).unwrap();
        assert_eq!(left, b"a1".to_vec());
        assert_eq!(right, b"a1".to_vec());
        assert_eq!(label, 0);

        let (left, right, label) = dataset.get(1).unwrap();
        assert_eq!(left, b"a1".to_vec());
        assert_eq!(right, b"b1".to_vec());
        assert_eq!(label, 1);
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let temp = tempdir().unwrap();
        write_tree(temp.path());
        let config = PairDatasetConfig::new(temp.path()).with_seed(3);
        let dataset = SiamesePairDataset::new(&config, read_bytes_loader()).unwrap();
        let err = dataset.get(dataset.len()).unwrap_err();
        assert!(matches!(err, DatasetError::IndexOutOfRange { .. }));
    }

    #[test]
    fn transforms_are_applied_in_order() {
        let temp = tempdir().unwrap();
        write_tree(temp.path());
        let config = PairDatasetConfig::new(temp.path()).with_seed(3);
        let transforms: Transforms<Vec<u8>> = Transforms::default()
            .with_item_transform(Arc::new(|mut bytes: Vec<u8>| {
                bytes.push(b'!');
                bytes
            }))
            .with_pair_transform(Arc::new(|left: Vec<u8>, right: Vec<u8>| (right, left)))
            .with_label_transform(Arc::new(|label: u8| label + 10));
        let dataset = SiamesePairDataset::new(&config, read_bytes_loader())
            .unwrap()
            .with_transforms(transforms);
        let (left, right, label) = dataset.get(1).unwrap();
        assert_eq!(left, b"b1!".to_vec());
        assert_eq!(right, b"a1!".to_vec());
        assert_eq!(label, 11);
    }

    #[test]
    fn snapshot_freezes_unseeded_selection() {
        let temp = tempdir().unwrap();
        let data = temp.path().join("data");
        write_tree(&data);
        let snapshot_path = temp.path().join("pairs.bin");
        let config = PairDatasetConfig::new(&data);
        let first = SiamesePairDataset::with_snapshot(&config, read_bytes_loader(), &snapshot_path)
            .unwrap();
        let second =
            SiamesePairDataset::with_snapshot(&config, read_bytes_loader(), &snapshot_path)
                .unwrap();
        assert!(snapshot_path.exists());
        assert_eq!(first.pair_index(), second.pair_index());
    }

    #[test]
    fn snapshot_is_rebuilt_when_extension_changes() {
        let temp = tempdir().unwrap();
        let data = temp.path().join("data");
        write_tree(&data);
        for (label, file) in [("A", "a1"), ("B", "b1"), ("B", "b2")] {
            fs::write(data.join(label).join(format!("{file}.png")), file.as_bytes()).unwrap();
        }
        let snapshot_path = temp.path().join("pairs.bin");

        let jpg = PairDatasetConfig::new(&data);
        SiamesePairDataset::with_snapshot(&jpg, read_bytes_loader(), &snapshot_path).unwrap();

        let png = PairDatasetConfig::new(&data).with_extension("png");
        let dataset =
            SiamesePairDataset::with_snapshot(&png, read_bytes_loader(), &snapshot_path).unwrap();
        assert!(!dataset.is_empty());
        for pair in dataset.pair_index() {
            assert!(pair.path_a.ends_with(".png"), "{}", pair.path_a);
            assert!(pair.path_b.ends_with(".png"), "{}", pair.path_b);
        }
    }

    #[test]
    fn snapshot_is_rebuilt_when_a_file_disappears() {
        let temp = tempdir().unwrap();
        let data = temp.path().join("data");
        write_tree(&data);
        fs::write(data.join("B").join("b2.jpg"), b"b2").unwrap();
        let snapshot_path = temp.path().join("pairs.bin");
        let config = PairDatasetConfig::new(&data);
        SiamesePairDataset::with_snapshot(&config, read_bytes_loader(), &snapshot_path).unwrap();

        fs::remove_file(data.join("B").join("b1.jpg")).unwrap();
        let dataset =
            SiamesePairDataset::with_snapshot(&config, read_bytes_loader(), &snapshot_path)
                .unwrap();
        for pair in dataset.pair_index() {
            assert!(Path::new(&pair.path_a).exists(), "{}", pair.path_a);
            assert!(Path::new(&pair.path_b).exists(), "{}", pair.path_b);
        }
        for idx in 0..dataset.len() {
            dataset.get(idx).unwrap();
        }
    }

    #[test]
    fn loader_failures_surface_at_the_accessed_index() {
        let temp = tempdir().unwrap();
        write_tree(temp.path());
        let config = PairDatasetConfig::new(temp.path()).with_seed(3);
        let dataset = SiamesePairDataset::new(&config, read_bytes_loader()).unwrap();
        fs::remove_file(temp.path().join("B").join("b1.jpg")).unwrap();
        assert!(dataset.get(0).is_ok());
        let err = dataset.get(1).unwrap_err();
        assert!(matches!(err, DatasetError::ItemLoad { .. }));
    }
}
