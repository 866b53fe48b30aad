use std::path::PathBuf;

use crate::constants::indexing::DEFAULT_EXTENSION;
use crate::constants::splits::{DEFAULT_FEATURE_DIR, DEFAULT_TARGET_DIR, DEFAULT_VALID_SIZE};
use crate::errors::DatasetError;
use crate::splits::{SizeLimit, SplitMode};

/// Configuration for a similar/different pairing dataset.
#[derive(Clone, Debug)]
pub struct PairDatasetConfig {
    /// Root directory with one subdirectory per label.
    pub root: PathBuf,
    /// Member file extension (`"*"` matches every file).
    pub extension: String,
    /// Whether symlinks are followed while indexing.
    pub follow_links: bool,
    /// Seed for different-pair subsampling.
    ///
    /// `None` draws from an OS-seeded RNG, so every construction picks a new
    /// selection. `Some(seed)` reproduces the same selection on every run.
    pub seed: Option<u64>,
}

impl PairDatasetConfig {
    /// Config rooted at `root` with defaults for everything else.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            follow_links: false,
            seed: None,
        }
    }

    /// Only index files with this extension (`"*"` matches every file).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Follow symlinked label directories and files.
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Fix the different-pair draw to `seed`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject an empty extension.
    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(DatasetError::Configuration(
                "pair dataset extension must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for a feature/target split dataset.
#[derive(Clone, Debug)]
pub struct SplitDatasetConfig {
    /// Dataset root holding the feature and target directories.
    pub root: PathBuf,
    /// Feature directory name under `root`.
    pub feature_dir: String,
    /// Target directory name under `root`.
    pub target_dir: String,
    /// Prefix truncation applied before splitting.
    pub limit: SizeLimit,
    /// Whether to split into train/validation at all.
    pub split_dataset: bool,
    /// Split exposed by the dataset when `split_dataset` is set.
    pub mode: SplitMode,
    /// Fraction of files assigned to validation, in `[0, 1)`.
    pub valid_size: f64,
}

impl SplitDatasetConfig {
    /// Config rooted at `root` with defaults for everything else.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            feature_dir: DEFAULT_FEATURE_DIR.to_string(),
            target_dir: DEFAULT_TARGET_DIR.to_string(),
            limit: SizeLimit::default(),
            split_dataset: false,
            mode: SplitMode::Train,
            valid_size: DEFAULT_VALID_SIZE,
        }
    }

    /// Subdirectory holding feature files.
    pub fn with_feature_dir(mut self, feature_dir: impl Into<String>) -> Self {
        self.feature_dir = feature_dir.into();
        self
    }

    /// Subdirectory holding target files.
    pub fn with_target_dir(mut self, target_dir: impl Into<String>) -> Self {
        self.target_dir = target_dir.into();
        self
    }

    /// Cap the number of aligned files kept before splitting.
    pub fn with_limit(mut self, limit: SizeLimit) -> Self {
        self.limit = limit;
        self
    }

    /// Enable splitting and select which split the dataset exposes.
    pub fn with_split(mut self, mode: SplitMode, valid_size: f64) -> Self {
        self.split_dataset = true;
        self.mode = mode;
        self.valid_size = valid_size;
        self
    }

    /// Check the size limit and validation fraction.
    pub fn validate(&self) -> Result<(), DatasetError> {
        self.limit.validate()?;
        if !(self.valid_size.is_finite() && (0.0..1.0).contains(&self.valid_size)) {
            return Err(DatasetError::Configuration(format!(
                "valid_size must lie in [0, 1), got {}",
                self.valid_size
            )));
        }
        if self.feature_dir.is_empty() || self.target_dir.is_empty() {
            return Err(DatasetError::Configuration(
                "feature and target directory names must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for a plain labeled-folder dataset.
#[derive(Clone, Debug)]
pub struct FolderDatasetConfig {
    /// Root directory with one subdirectory per class.
    pub root: PathBuf,
    /// Member file extension; `None` accepts every file.
    pub extension: Option<String>,
    /// Whether symlinks are followed while indexing.
    pub follow_links: bool,
}

impl FolderDatasetConfig {
    /// Config rooted at `root` accepting every file.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: None,
            follow_links: false,
        }
    }

    /// Only index files with this extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Follow symlinked class directories and files.
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }
}
