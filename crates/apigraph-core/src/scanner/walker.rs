//! File discovery for declaration trees

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use sha2::{Digest, Sha256};

use super::dialect::Dialect;

/// File stems skipped unless overridden
pub const DEFAULT_EXCLUDED_STEMS: &[&str] = &["permission"];

/// A declaration file found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub dialect: Dialect,
}

impl DiscoveredFile {
    /// SHA-256 of the file's bytes, as lowercase hex
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn compute_hash(&self) -> std::io::Result<String> {
        let bytes = std::fs::read(&self.path)?;
        Ok(content_hash(&bytes))
    }

    /// File name up to its first dot
    #[must_use]
    pub fn stem(&self) -> &str {
        file_stem(&self.path)
    }
}

/// SHA-256 of `bytes`, as lowercase hex
#[must_use]
pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

fn file_stem(path: &Path) -> &str {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .unwrap_or_default()
}

/// Walks a directory for declaration files, honouring ignore files
#[derive(Debug, Clone)]
pub struct Scanner {
    root: PathBuf,
    dialects: Option<Vec<Dialect>>,
    excluded_stems: Vec<String>,
}

impl Scanner {
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            dialects: None,
            excluded_stems: DEFAULT_EXCLUDED_STEMS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// Only yield files of these dialects
    #[must_use]
    pub fn with_dialects(mut self, dialects: Vec<Dialect>) -> Self {
        self.dialects = Some(dialects);
        self
    }

    /// Replace the excluded file stems
    #[must_use]
    pub fn with_excluded_stems(mut self, stems: Vec<String>) -> Self {
        self.excluded_stems = stems;
        self
    }

    /// Declaration files under the root, sorted by path
    pub fn scan(&self) -> impl Iterator<Item = DiscoveredFile> {
        let mut files: Vec<DiscoveredFile> = WalkBuilder::new(&self.root)
            .build()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .filter_map(|entry| {
                let path = entry.into_path();
                let dialect = Dialect::from_path(&path)?;
                Some(DiscoveredFile { path, dialect })
            })
            .filter(|file| self.accepts(file))
            .collect();

        files.sort_by(|a, b| a.path.cmp(&b.path));
        files.into_iter()
    }

    fn accepts(&self, file: &DiscoveredFile) -> bool {
        let stem = file.stem();
        self.dialects
            .as_ref()
            .map_or(true, |dialects| dialects.contains(&file.dialect))
            && !self.excluded_stems.iter().any(|excluded| excluded == stem)
    }
}
