use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// One file seen during a corpus walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileObservation {
    pub path: PathBuf,
    /// Variable the file is named for
    pub target_variable: String,
    /// Variables listed from the file, `None` for files of another format
    pub discovered_variables: Option<BTreeSet<String>>,
}

impl FileObservation {
    /// Observation of a file that is never opened, only registered by name
    pub fn ineligible(path: impl Into<PathBuf>, target_variable: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            target_variable: target_variable.into(),
            discovered_variables: None,
        }
    }

    pub fn inventoried(
        path: impl Into<PathBuf>,
        target_variable: impl Into<String>,
        discovered_variables: BTreeSet<String>,
    ) -> Self {
        Self {
            path: path.into(),
            target_variable: target_variable.into(),
            discovered_variables: Some(discovered_variables),
        }
    }
}

/// Why a file was skipped or only partially used
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "detail")]
pub enum WarningKind {
    /// The file could not be opened or its header read
    Unreadable(String),
    /// No target variable could be derived from the file name
    MalformedName(String),
    /// A directory entry could not be visited
    Traversal(String),
}

/// A recoverable problem met while scanning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanWarning {
    pub path: PathBuf,
    pub kind: WarningKind,
}

/// Counters for one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    /// Regular files visited
    pub files_seen: u64,
    /// Files whose variables were listed
    pub inventoried: u64,
    /// Files registered only by name (other extension)
    pub ineligible: u64,
    /// Files of the right extension that could not be read
    pub unreadable: u64,
    /// Files or entries dropped entirely
    pub skipped: u64,
}

impl ScanStats {
    pub fn merge(&mut self, other: &ScanStats) {
        self.files_seen += other.files_seen;
        self.inventoried += other.inventoried;
        self.ineligible += other.ineligible;
        self.unreadable += other.unreadable;
        self.skipped += other.skipped;
    }
}
