//! Size limiting and deterministic train/validation splits for parallel
//! feature/target file lists.

use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

use crate::constants::splits::SPLIT_SEED;
use crate::errors::DatasetError;
use crate::indexing::walk_error;
use crate::rng::{DeterministicRng, floyd_sample};

/// Dataset partition selected by a split dataset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitMode {
    /// Training split.
    #[default]
    Train,
    /// Validation split.
    Validation,
}

impl SplitMode {
    /// `"train"` selects [`SplitMode::Train`]; any other value selects validation.
    pub fn from_mode_str(mode: &str) -> Self {
        if mode == "train" {
            SplitMode::Train
        } else {
            SplitMode::Validation
        }
    }
}

/// Prefix truncation applied to file lists before splitting.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SizeLimit {
    /// Keep the first `n` files; `0` keeps everything.
    Count(usize),
    /// Keep the first `floor(fraction * total)` files; must lie in `[0, 1]`.
    Fraction(f64),
}

impl Default for SizeLimit {
    fn default() -> Self {
        SizeLimit::Count(0)
    }
}

impl SizeLimit {
    /// Reject fractions outside `[0, 1]`.
    pub fn validate(self) -> Result<Self, DatasetError> {
        if let SizeLimit::Fraction(fraction) = self
            && !(fraction.is_finite() && (0.0..=1.0).contains(&fraction))
        {
            return Err(DatasetError::Configuration(format!(
                "size limit fraction must lie in [0, 1], got {fraction}"
            )));
        }
        Ok(self)
    }

    /// Number of files kept out of `total`.
    pub fn resolve(self, total: usize) -> Result<usize, DatasetError> {
        let kept = match self.validate()? {
            SizeLimit::Count(0) => total,
            SizeLimit::Count(count) => count.min(total),
            SizeLimit::Fraction(fraction) => (total as f64 * fraction).floor() as usize,
        };
        Ok(kept.min(total))
    }
}

/// Parallel feature/target file lists of equal length.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileList {
    feature_files: Vec<PathBuf>,
    target_files: Vec<PathBuf>,
}

impl FileList {
    /// Pair up feature and target files; lengths must match.
    pub fn new(feature_files: Vec<PathBuf>, target_files: Vec<PathBuf>) -> Result<Self, DatasetError> {
        if feature_files.len() != target_files.len() {
            return Err(DatasetError::Configuration(format!(
                "feature and target file counts differ ({} != {})",
                feature_files.len(),
                target_files.len()
            )));
        }
        Ok(Self {
            feature_files,
            target_files,
        })
    }

    /// List the files directly inside `root/feature_dir` and `root/target_dir`, sorted.
    pub fn scan(root: &Path, feature_dir: &str, target_dir: &str) -> Result<Self, DatasetError> {
        let feature_files = list_files(&root.join(feature_dir))?;
        let target_files = list_files(&root.join(target_dir))?;
        Self::new(feature_files, target_files)
    }

    /// Number of aligned feature/target entries.
    pub fn len(&self) -> usize {
        self.feature_files.len()
    }

    /// True when no files are listed.
    pub fn is_empty(&self) -> bool {
        self.feature_files.is_empty()
    }

    /// Feature paths in aligned order.
    pub fn feature_files(&self) -> &[PathBuf] {
        &self.feature_files
    }

    /// Target paths in aligned order.
    pub fn target_files(&self) -> &[PathBuf] {
        &self.target_files
    }

    /// Feature/target paths at `idx`.
    pub fn get(&self, idx: usize) -> Option<(&Path, &Path)> {
        let feature = self.feature_files.get(idx)?;
        let target = self.target_files.get(idx)?;
        Some((feature.as_path(), target.as_path()))
    }

    /// Keep only the prefix selected by `limit`.
    pub fn truncate(mut self, limit: SizeLimit) -> Result<Self, DatasetError> {
        let kept = limit.resolve(self.len())?;
        self.feature_files.truncate(kept);
        self.target_files.truncate(kept);
        Ok(self)
    }

    /// Entries at `indices`, in the given order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            feature_files: indices
                .iter()
                .filter_map(|idx| self.feature_files.get(*idx).cloned())
                .collect(),
            target_files: indices
                .iter()
                .filter_map(|idx| self.target_files.get(*idx).cloned())
                .collect(),
        }
    }
}

/// Disjoint, sorted train/validation index sets covering `0..total`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitAssignment {
    /// Positions assigned to training, ascending.
    pub train_indices: Vec<usize>,
    /// Positions assigned to validation, ascending.
    pub valid_indices: Vec<usize>,
}

impl SplitAssignment {
    /// Number of positions across both splits.
    pub fn total(&self) -> usize {
        self.train_indices.len() + self.valid_indices.len()
    }

    /// Indices belonging to `mode`.
    pub fn indices(&self, mode: SplitMode) -> &[usize] {
        match mode {
            SplitMode::Train => &self.train_indices,
            SplitMode::Validation => &self.valid_indices,
        }
    }
}

/// Draw `floor(valid_size * total)` validation indices from `rng`; the rest are train.
pub fn split_indices<R>(
    total: usize,
    valid_size: f64,
    rng: &mut R,
) -> Result<SplitAssignment, DatasetError>
where
    R: Rng + ?Sized,
{
    validate_valid_size(valid_size)?;
    let valid_count = (valid_size * total as f64).floor() as usize;
    let mut valid_indices = floyd_sample(rng, total, valid_count);
    valid_indices.sort_unstable();
    let mut is_valid = vec![false; total];
    for idx in &valid_indices {
        is_valid[*idx] = true;
    }
    let train_indices = (0..total).filter(|idx| !is_valid[*idx]).collect();
    Ok(SplitAssignment {
        train_indices,
        valid_indices,
    })
}

fn validate_valid_size(valid_size: f64) -> Result<(), DatasetError> {
    if !(valid_size.is_finite() && (0.0..1.0).contains(&valid_size)) {
        return Err(DatasetError::Configuration(format!(
            "valid_size must lie in [0, 1), got {valid_size}"
        )));
    }
    Ok(())
}

/// Both splits of a file list plus the assignment that produced them.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitFiles {
    /// Index assignment that produced the two lists.
    pub assignment: SplitAssignment,
    train: FileList,
    valid: FileList,
}

impl SplitFiles {
    /// Training feature paths.
    pub fn train_feature_files(&self) -> &[PathBuf] {
        self.train.feature_files()
    }

    /// Training target paths.
    pub fn train_target_files(&self) -> &[PathBuf] {
        self.train.target_files()
    }

    /// Validation feature paths.
    pub fn valid_feature_files(&self) -> &[PathBuf] {
        self.valid.feature_files()
    }

    /// Validation target paths.
    pub fn valid_target_files(&self) -> &[PathBuf] {
        self.valid.target_files()
    }

    /// File list for `mode`.
    pub fn active(&self, mode: SplitMode) -> &FileList {
        match mode {
            SplitMode::Train => &self.train,
            SplitMode::Validation => &self.valid,
        }
    }

    /// Consume the split, keeping only `mode`'s files.
    pub fn into_active(self, mode: SplitMode) -> FileList {
        match mode {
            SplitMode::Train => self.train,
            SplitMode::Validation => self.valid,
        }
    }
}

/// Deterministic splitter seeded with a fixed constant.
///
/// Every call re-seeds from the same value, so identical `(total, valid_size)`
/// inputs always yield identical assignments in any process.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DatasetSplitter {
    valid_size: f64,
    seed: u64,
}

impl DatasetSplitter {
    /// Splitter using the fixed split seed.
    pub fn new(valid_size: f64) -> Result<Self, DatasetError> {
        validate_valid_size(valid_size)?;
        Ok(Self {
            valid_size,
            seed: SPLIT_SEED,
        })
    }

    /// Override the split seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fraction of items assigned to validation.
    pub fn valid_size(&self) -> f64 {
        self.valid_size
    }

    /// Assignment for a collection of `total` items.
    pub fn split(&self, total: usize) -> Result<SplitAssignment, DatasetError> {
        let mut rng = DeterministicRng::new(self.seed);
        split_indices(total, self.valid_size, &mut rng)
    }

    /// Split `files` into train and validation lists.
    pub fn split_files(&self, files: &FileList) -> Result<SplitFiles, DatasetError> {
        let assignment = self.split(files.len())?;
        let train = files.select(&assignment.train_indices);
        let valid = files.select(&assignment.valid_indices);
        debug!(
            total = files.len(),
            train = train.len(),
            valid = valid.len(),
            seed = self.seed,
            "split file lists"
        );
        Ok(SplitFiles {
            assignment,
            train,
            valid,
        })
    }
}

fn list_files(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    if !dir.is_dir() {
        return Err(DatasetError::Configuration(format!(
            "directory '{}' does not exist",
            dir.display()
        )));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(walk_error)?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
