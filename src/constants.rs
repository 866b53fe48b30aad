/// Constants used by label directory indexing.
pub mod indexing {
    /// Default file extension used by pairing datasets.
    pub const DEFAULT_EXTENSION: &str = "jpg";
    /// Extension value that matches every file.
    pub const ANY_EXTENSION: &str = "*";
    /// Walk depth of member files (`<root>/<label>/<file>`).
    pub const LABEL_FILE_DEPTH: usize = 2;
}

/// Constants used by pair generation and balancing.
pub mod pairs {
    /// Label groups at least this large subsample cross-label candidates.
    pub const SUBSAMPLE_MIN_GROUP: usize = 4;
    /// Divisor applied to the group size to derive the per-group sample size.
    pub const SUBSAMPLE_DIVISOR: usize = 4;
    /// Numeric label emitted for similar pairs.
    pub const SIMILAR_LABEL: u8 = 0;
    /// Numeric label emitted for different pairs.
    pub const DIFFERENT_LABEL: u8 = 1;
}

/// Constants used by feature/target splitting.
pub mod splits {
    /// Fixed seed for train/validation splits, stable across runs and processes.
    pub const SPLIT_SEED: u64 = 1261;
    /// Default fraction of files assigned to validation.
    pub const DEFAULT_VALID_SIZE: f64 = 0.2;
    /// Default feature directory name under the dataset root.
    pub const DEFAULT_FEATURE_DIR: &str = "feature";
    /// Default target directory name under the dataset root.
    pub const DEFAULT_TARGET_DIR: &str = "target";
}

/// Constants used by pair index snapshot persistence.
pub mod snapshot {
    /// Version tag for persisted pair index records.
    pub const PAIR_INDEX_RECORD_VERSION: u8 = 2;
    /// Prefix marker for bitcode-encoded payloads.
    pub const BITCODE_PREFIX: u8 = b'B';
    /// Seed mixed into the pair index checksum.
    pub const CHECKSUM_SEED: u64 = 0x9A1E_5EED;
    /// Seed mixed into the source fingerprint (indexing options, seed, file set).
    pub const FINGERPRINT_SEED: u64 = 0xF1A6_E5EED;
    /// Default filename for persisted pair index snapshots.
    pub const DEFAULT_SNAPSHOT_FILENAME: &str = "pair_index.bin";
}

/// Constants used by stable hashing.
pub mod hashing {
    /// FNV-1a 64-bit offset basis.
    pub const FNV1A64_OFFSET: u64 = 0xcbf29ce484222325;
    /// FNV-1a 64-bit prime.
    pub const FNV1A64_PRIME: u64 = 0x100000001b3;
}
