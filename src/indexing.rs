//! Label directory indexing.
//!
//! A dataset root holds one subdirectory per label with member files directly
//! beneath it (`<root>/<label>/<file>`). The index is sorted by label and by
//! file name so that everything built on top of it is independent of the
//! filesystem's enumeration order.

use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::constants::indexing::{ANY_EXTENSION, DEFAULT_EXTENSION, LABEL_FILE_DEPTH};
use crate::errors::DatasetError;
use crate::types::{FileName, Label};

/// Borrowed view of one label and its sorted member files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelGroup<'a> {
    /// Label (subdirectory name).
    pub label: &'a str,
    /// Member file names, sorted lexicographically.
    pub files: &'a [FileName],
}

/// Immutable label → sorted file list mapping, ordered by label.
#[derive(Clone, Debug)]
pub struct LabelIndex {
    root: PathBuf,
    groups: IndexMap<Label, Vec<FileName>>,
}

impl LabelIndex {
    /// Build an index from explicit groups, applying the same ordering rules as a scan.
    ///
    /// Empty groups are dropped.
    pub fn from_groups<I, L, F>(root: impl Into<PathBuf>, groups: I) -> Self
    where
        I: IntoIterator<Item = (L, Vec<F>)>,
        L: Into<Label>,
        F: Into<FileName>,
    {
        let mut map: IndexMap<Label, Vec<FileName>> = IndexMap::new();
        for (label, files) in groups {
            let entry = map.entry(label.into()).or_default();
            entry.extend(files.into_iter().map(Into::into));
        }
        map.retain(|_, files| !files.is_empty());
        for files in map.values_mut() {
            files.sort();
        }
        map.sort_keys();
        Self {
            root: root.into(),
            groups: map,
        }
    }

    /// Root directory the index was built from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Labels in index order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Sorted files for `label`.
    pub fn files(&self, label: &str) -> Option<&[FileName]> {
        self.groups.get(label).map(Vec::as_slice)
    }

    /// Label groups in index order.
    pub fn groups(&self) -> impl Iterator<Item = LabelGroup<'_>> {
        self.groups.iter().map(|(label, files)| LabelGroup {
            label: label.as_str(),
            files: files.as_slice(),
        })
    }

    /// Number of labels.
    pub fn label_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of indexed files across all labels.
    pub fn file_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// True when no label holds a matching file.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Scans a dataset root for label directories.
#[derive(Clone, Debug)]
pub struct FileIndexer {
    root: PathBuf,
    extension: String,
    follow_links: bool,
}

impl FileIndexer {
    /// Create an indexer for `root` using the default extension.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            follow_links: false,
        }
    }

    /// Only index files with this extension (`"*"` matches every file).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Control whether symlinks are followed while walking the root.
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Walk the root and group matching files by their parent directory name.
    pub fn index(&self) -> Result<LabelIndex, DatasetError> {
        if !self.root.is_dir() {
            return Err(DatasetError::Configuration(format!(
                "dataset root '{}' does not exist or is not a directory",
                self.root.display()
            )));
        }

        let mut groups: IndexMap<Label, Vec<FileName>> = IndexMap::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(LABEL_FILE_DEPTH)
            .max_depth(LABEL_FILE_DEPTH)
            .follow_links(self.follow_links);
        for entry in walker {
            let entry = entry.map_err(walk_error)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !matches_extension(path, &self.extension) {
                continue;
            }
            let Some((label, file)) = label_and_file(path) else {
                warn!(
                    path = %path.display(),
                    "skipping file with non UTF-8 label or name"
                );
                continue;
            };
            groups.entry(label).or_default().push(file);
        }

        let index = LabelIndex::from_groups(self.root.clone(), groups);
        if index.is_empty() {
            return Err(DatasetError::Configuration(format!(
                "no files matching '*/*.{}' under '{}'",
                self.extension,
                self.root.display()
            )));
        }
        debug!(
            root = %self.root.display(),
            labels = index.label_count(),
            files = index.file_count(),
            "indexed label directories"
        );
        Ok(index)
    }
}

/// True if `path` carries `extension` (ASCII case-insensitive, `"*"` matches all).
pub fn matches_extension(path: &Path, extension: &str) -> bool {
    if extension == ANY_EXTENSION {
        return true;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Unreadable directories and symlink loops abort the scan instead of
/// silently shrinking the index.
pub(crate) fn walk_error(err: walkdir::Error) -> DatasetError {
    DatasetError::Io(io::Error::from(err))
}

fn label_and_file(path: &Path) -> Option<(Label, FileName)> {
    let file = path.file_name()?.to_str()?.to_string();
    let label = path.parent()?.file_name()?.to_str()?.to_string();
    Some((label, file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel.as_bytes()).unwrap();
    }

    #[test]
    fn groups_files_by_parent_directory_sorted() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        touch(root, "zeta/b.jpg");
        touch(root, "zeta/a.jpg");
        touch(root, "alpha/c.jpg");

        let index = FileIndexer::new(root).index().unwrap();
        let labels: Vec<&str> = index.labels().collect();
        assert_eq!(labels, vec!["alpha", "zeta"]);
        assert_eq!(index.files("zeta").unwrap(), ["a.jpg", "b.jpg"]);
        assert_eq!(index.file_count(), 3);
    }

    #[test]
    fn ignores_other_extensions_and_other_depths() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        touch(root, "top.jpg");
        touch(root, "cats/one.jpg");
        touch(root, "cats/notes.txt");
        touch(root, "cats/nested/deep.jpg");

        let index = FileIndexer::new(root).index().unwrap();
        assert_eq!(index.label_count(), 1);
        assert_eq!(index.files("cats").unwrap(), ["one.jpg"]);
    }

    #[test]
    fn extension_match_is_case_insensitive_and_accepts_leading_dot() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        touch(root, "faces/a.PGM");
        touch(root, "faces/b.pgm");

        let index = FileIndexer::new(root).with_extension(".pgm").index().unwrap();
        assert_eq!(index.files("faces").unwrap(), ["a.PGM", "b.pgm"]);
    }

    #[test]
    fn wildcard_extension_matches_everything() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        touch(root, "mixed/a.png");
        touch(root, "mixed/b.bin");
        touch(root, "mixed/README");

        let index = FileIndexer::new(root).with_extension("*").index().unwrap();
        assert_eq!(index.files("mixed").unwrap().len(), 3);
    }

    #[test]
    fn missing_root_is_configuration_error() {
        let temp = tempdir().unwrap();
        let err = FileIndexer::new(temp.path().join("missing"))
            .index()
            .unwrap_err();
        assert!(matches!(err, DatasetError::Configuration(_)));
    }

    #[test]
    fn root_without_matches_is_configuration_error() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "cats/one.png");
        let err = FileIndexer::new(temp.path()).index().unwrap_err();
        assert!(matches!(err, DatasetError::Configuration(_)));
    }

    #[test]
    fn from_groups_sorts_and_drops_empty_groups() {
        let index = LabelIndex::from_groups(
            "/data",
            vec![
                ("b", vec!["2", "1"]),
                ("empty", Vec::new()),
                ("a", vec!["9"]),
            ],
        );
        let groups: Vec<LabelGroup<'_>> = index.groups().collect();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "a");
        assert_eq!(groups[1].files, ["1".to_string(), "2".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn follow_links_indexes_symlinked_label_directories() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("root");
        touch(&root, "cats/a.jpg");
        touch(temp.path(), "elsewhere/dogs/b.jpg");
        std::os::unix::fs::symlink(temp.path().join("elsewhere/dogs"), root.join("dogs")).unwrap();

        let plain = FileIndexer::new(&root).index().unwrap();
        assert_eq!(plain.labels().collect::<Vec<_>>(), vec!["cats"]);

        let followed = FileIndexer::new(&root)
            .with_follow_links(true)
            .index()
            .unwrap();
        assert_eq!(followed.labels().collect::<Vec<_>>(), vec!["cats", "dogs"]);
        assert_eq!(followed.files("dogs").unwrap(), ["b.jpg"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loop_fails_the_scan_when_following_links() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        touch(root, "cats/a.jpg");
        std::os::unix::fs::symlink(root.join("cats"), root.join("cats/loop")).unwrap();

        assert_eq!(FileIndexer::new(root).index().unwrap().file_count(), 1);
        let err = FileIndexer::new(root)
            .with_follow_links(true)
            .index()
            .unwrap_err();
        assert!(matches!(err, DatasetError::Io(_)));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_labels_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = tempdir().unwrap();
        let root = temp.path();
        touch(root, "good/a.jpg");
        let bad = root.join(OsStr::from_bytes(b"bad\xff"));
        fs::create_dir_all(&bad).unwrap();
        fs::write(bad.join("b.jpg"), b"b").unwrap();

        let index = FileIndexer::new(root).index().unwrap();
        assert_eq!(index.labels().collect::<Vec<_>>(), vec!["good"]);
        assert_eq!(index.file_count(), 1);
    }
}
