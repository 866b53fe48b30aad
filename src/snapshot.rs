//! On-disk pair index snapshots.
//!
//! A snapshot freezes one concrete different-pair selection so that later
//! runs, or separate loader processes, can reuse it instead of drawing a new
//! one. Records are `version byte | bitcode prefix | bitcode payload` and carry
//! a source fingerprint plus a checksum over the root, the fingerprint and
//! every pair. Both hashes are portable FNV-1a values.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::PairDatasetConfig;
use crate::constants::snapshot::{
    BITCODE_PREFIX, CHECKSUM_SEED, DEFAULT_SNAPSHOT_FILENAME, FINGERPRINT_SEED,
    PAIR_INDEX_RECORD_VERSION,
};
use crate::errors::DatasetError;
use crate::hash::stable_hash_with;
use crate::indexing::LabelIndex;
use crate::metrics::LabelBalance;
use crate::pairs::{Pair, PairIndex};

#[derive(bitcode::Encode, bitcode::Decode)]
/// Persisted per-label balance entry.
struct PersistedBalance {
    label: String,
    similar: u64,
    different: u64,
    emitted: u64,
}

#[derive(bitcode::Encode, bitcode::Decode)]
/// Persisted pair index payload.
struct PersistedPairIndex {
    root: String,
    fingerprint: u64,
    checksum: u64,
    pairs: Vec<Pair>,
    balance: Vec<PersistedBalance>,
}

/// Snapshot file path inside `dir`.
pub fn default_path_in_dir<P: AsRef<Path>>(dir: P) -> PathBuf {
    dir.as_ref().join(DEFAULT_SNAPSHOT_FILENAME)
}

/// Fingerprint of everything a pair index is derived from: the indexing
/// options, the seed, and the indexed label/file set.
///
/// A snapshot is only reused while this value is unchanged.
pub fn source_fingerprint(config: &PairDatasetConfig, labels: &LabelIndex) -> u64 {
    stable_hash_with(|hasher| {
        hasher.write_u64(FINGERPRINT_SEED);
        hasher.write_str(&config.extension.trim_start_matches('.').to_ascii_lowercase());
        hasher.write_u64(u64::from(config.follow_links));
        match config.seed {
            Some(seed) => {
                hasher.write_u64(1);
                hasher.write_u64(seed);
            }
            None => hasher.write_u64(0),
        }
        hasher.write_u64(labels.label_count() as u64);
        for group in labels.groups() {
            hasher.write_str(group.label);
            hasher.write_u64(group.files.len() as u64);
            for file in group.files {
                hasher.write_str(file);
            }
        }
    })
}

/// Checksum over the root, the source fingerprint and the ordered pair list.
pub fn pair_index_checksum(root: &str, fingerprint: u64, pairs: &[Pair]) -> u64 {
    stable_hash_with(|hasher| {
        hasher.write_u64(CHECKSUM_SEED);
        hasher.write_str(root);
        hasher.write_u64(fingerprint);
        hasher.write_u64(pairs.len() as u64);
        for pair in pairs {
            hasher.write_str(&pair.path_a);
            hasher.write_str(&pair.path_b);
            hasher.write_u64(u64::from(pair.label()));
        }
    })
}

/// Write `index`, built from a source with `fingerprint`, to `path`, creating
/// parent directories as needed.
pub fn save(index: &PairIndex, fingerprint: u64, path: &Path) -> Result<(), DatasetError> {
    ensure_parent_dir(path)?;
    let root = index.root().to_string_lossy().into_owned();
    let record = PersistedPairIndex {
        checksum: pair_index_checksum(&root, fingerprint, index.pairs()),
        root,
        fingerprint,
        pairs: index.pairs().to_vec(),
        balance: index
            .balance()
            .iter()
            .map(|entry| PersistedBalance {
                label: entry.label.clone(),
                similar: entry.similar as u64,
                different: entry.different as u64,
                emitted: entry.emitted as u64,
            })
            .collect(),
    };
    let payload = encode_record(&record);
    fs::write(path, &payload)?;
    debug!(
        path = %path.display(),
        pairs = index.len(),
        bytes = payload.len(),
        "saved pair index snapshot"
    );
    Ok(())
}

/// Read a snapshot written by [`save`].
pub fn load(path: &Path) -> Result<PairIndex, DatasetError> {
    load_with_fingerprint(path).map(|(index, _)| index)
}

/// Read a snapshot and the source fingerprint it was saved with.
pub fn load_with_fingerprint(path: &Path) -> Result<(PairIndex, u64), DatasetError> {
    let bytes = fs::read(path)?;
    let record = decode_record(&bytes)?;
    let checksum = pair_index_checksum(&record.root, record.fingerprint, &record.pairs);
    if checksum != record.checksum {
        return Err(DatasetError::Persistence(format!(
            "pair index checksum mismatch (expected {:x}, found {:x})",
            record.checksum, checksum
        )));
    }
    let balance = record
        .balance
        .into_iter()
        .map(|entry| LabelBalance {
            label: entry.label,
            similar: entry.similar as usize,
            different: entry.different as usize,
            emitted: entry.emitted as usize,
        })
        .collect();
    let index = PairIndex::from_parts(record.root, record.pairs, balance);
    debug!(path = %path.display(), pairs = index.len(), "loaded pair index snapshot");
    Ok((index, record.fingerprint))
}

/// Reuse the snapshot at `path` when it was built for `root` from a source
/// with the same `fingerprint`; otherwise run `build` and save its result.
///
/// Unreadable, foreign, or stale snapshots are logged and replaced, never reused.
pub fn load_or_build<F>(
    path: &Path,
    root: &Path,
    fingerprint: u64,
    build: F,
) -> Result<PairIndex, DatasetError>
where
    F: FnOnce() -> Result<PairIndex, DatasetError>,
{
    if path.exists() {
        match load_with_fingerprint(path) {
            Ok((index, stored)) if index.root() == root && stored == fingerprint => {
                return Ok(index);
            }
            Ok((index, _)) if index.root() != root => {
                warn!(
                    path = %path.display(),
                    expected_root = %root.display(),
                    found_root = %index.root().display(),
                    "pair index snapshot belongs to another root; rebuilding"
                );
            }
            Ok((_, stored)) => {
                warn!(
                    path = %path.display(),
                    expected = %format!("{fingerprint:x}"),
                    found = %format!("{stored:x}"),
                    "pair index snapshot is stale for the current files or options; rebuilding"
                );
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "pair index snapshot rejected; rebuilding"
                );
            }
        }
    }
    let index = build()?;
    save(&index, fingerprint, path)?;
    Ok(index)
}

fn encode_record(record: &PersistedPairIndex) -> Vec<u8> {
    let raw = bitcode::encode(record);
    let mut buf = Vec::with_capacity(2 + raw.len());
    buf.push(PAIR_INDEX_RECORD_VERSION);
    buf.push(BITCODE_PREFIX);
    buf.extend_from_slice(&raw);
    buf
}

fn decode_record(bytes: &[u8]) -> Result<PersistedPairIndex, DatasetError> {
    match bytes.first() {
        Some(version) if *version == PAIR_INDEX_RECORD_VERSION => {}
        Some(version) => {
            return Err(DatasetError::Persistence(format!(
                "pair index record version mismatch (expected {PAIR_INDEX_RECORD_VERSION}, found {version})"
            )));
        }
        None => {
            return Err(DatasetError::Persistence(
                "pair index record is empty".into(),
            ));
        }
    }
    if bytes.get(1).copied() != Some(BITCODE_PREFIX) {
        return Err(DatasetError::Persistence(
            "bitcode payload missing expected prefix".into(),
        ));
    }
    bitcode::decode(&bytes[2..])
        .map_err(|err| DatasetError::Persistence(format!("corrupt pair index record: {err}")))
}

fn ensure_parent_dir(path: &Path) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
