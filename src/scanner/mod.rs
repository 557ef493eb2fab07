//! Corpus walking.
//!
//! `CorpusScanner` walks a directory tree and yields one `FileObservation`
//! per usable file. It is a lazy, one-shot iterator: per-file problems are
//! logged, recorded as warnings and never stop the walk.

mod types;

pub use types::{FileObservation, ScanStats, ScanWarning, WarningKind};

use crate::inventory::VariableInventory;
use crate::naming::target_variable_of;
use crate::utils::file_name_str;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Cannot access corpus root {}: {source}", .path.display())]
    RootInaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corpus root {} is not a directory", .0.display())]
    NotADirectory(PathBuf),
}

pub struct CorpusScanner<I> {
    root: PathBuf,
    extension: String,
    inventory: I,
    walker: walkdir::IntoIter,
    warnings: Vec<ScanWarning>,
    stats: ScanStats,
}

impl<I: VariableInventory> CorpusScanner<I> {
    /// Prepare a scan of `root`.
    ///
    /// `extension` may be given with or without its leading dot. Fails only
    /// when the root itself cannot be accessed.
    pub fn new(root: impl Into<PathBuf>, extension: &str, inventory: I) -> Result<Self, ScanError> {
        let root = root.into();

        let metadata = std::fs::metadata(&root).map_err(|source| ScanError::RootInaccessible {
            path: root.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(root));
        }

        let walker = WalkDir::new(&root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();

        Ok(Self {
            extension: extension.trim_start_matches('.').to_string(),
            root,
            inventory,
            walker,
            warnings: Vec::new(),
            stats: ScanStats::default(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Warnings recorded so far
    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some(self.extension.as_str())
    }

    fn record(&mut self, path: &Path, kind: WarningKind) {
        self.warnings.push(ScanWarning {
            path: path.to_path_buf(),
            kind,
        });
    }

    fn observe_file(&mut self, path: &Path) -> Option<FileObservation> {
        self.stats.files_seen += 1;

        let target = match file_name_str(path).map(target_variable_of) {
            Some(Ok(target)) => target,
            Some(Err(e)) => {
                warn!("Skipping {}: {}", path.display(), e);
                self.stats.skipped += 1;
                self.record(path, WarningKind::MalformedName(e.to_string()));
                return None;
            }
            None => {
                warn!("Skipping {}: file name is not valid UTF-8", path.display());
                self.stats.skipped += 1;
                self.record(
                    path,
                    WarningKind::MalformedName("file name is not valid UTF-8".to_string()),
                );
                return None;
            }
        };

        if !self.matches_extension(path) {
            debug!("{}: not a .{} file, registering '{}' only", path.display(), self.extension, target);
            self.stats.ineligible += 1;
            return Some(FileObservation::ineligible(path, target));
        }

        match self.inventory.list_variables(path) {
            Ok(variables) => {
                self.stats.inventoried += 1;
                Some(FileObservation::inventoried(path, target, variables))
            }
            Err(e) => {
                warn!("Cannot read {}: {}", path.display(), e);
                self.stats.unreadable += 1;
                self.record(path, WarningKind::Unreadable(e.to_string()));
                Some(FileObservation::inventoried(path, target, BTreeSet::new()))
            }
        }
    }
}

impl<I: VariableInventory> Iterator for CorpusScanner<I> {
    type Item = FileObservation;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    warn!("Cannot visit {}: {}", path.display(), e);
                    self.stats.skipped += 1;
                    self.record(&path, WarningKind::Traversal(e.to_string()));
                    continue;
                }
            };

            // Linked files count as files, linked directories are not entered
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }

            if let Some(observation) = self.observe_file(entry.path()) {
                return Some(observation);
            }
        }
    }
}
