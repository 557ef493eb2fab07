use super::plan::{ConfigUpdate, UpdatePlan};
use super::reconciler::{ExcludeReconciler, ReconciliationOutcome};
use crate::config::{backup_config, read_config, write_config, ConfigError};
use crate::inventory::VariableInventory;
use crate::scanner::{CorpusScanner, ScanError, ScanStats, ScanWarning};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum ExecuteError {
    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),
}

/// Reconciliation of a whole corpus with its scan bookkeeping
#[derive(Debug, Clone, Default)]
pub struct CorpusReconciliation {
    pub outcome: ReconciliationOutcome,
    pub stats: ScanStats,
    pub warnings: Vec<ScanWarning>,
}

/// Scan every root and reconcile the initial exclusion list against it.
///
/// All roots are checked before anything is read, so an inaccessible root
/// aborts the run without partial results.
pub fn reconcile_corpus<I, E, S>(
    roots: &[PathBuf],
    extension: &str,
    inventory: &I,
    initial_excludes: E,
) -> Result<CorpusReconciliation, ScanError>
where
    I: VariableInventory,
    E: IntoIterator<Item = S>,
    S: Into<String>,
{
    let scanners = roots
        .iter()
        .map(|root| CorpusScanner::new(root, extension, inventory))
        .collect::<Result<Vec<_>, _>>()?;

    let mut reconciler = ExcludeReconciler::new(initial_excludes);
    let mut stats = ScanStats::default();
    let mut warnings = Vec::new();

    for mut scanner in scanners {
        info!("Scanning {}", scanner.root().display());
        for observation in scanner.by_ref() {
            reconciler.observe(&observation);
        }
        stats.merge(&scanner.stats());
        warnings.extend_from_slice(scanner.warnings());
    }

    info!(
        "Scanned {} files ({} inventoried, {} other format, {} unreadable, {} skipped)",
        stats.files_seen, stats.inventoried, stats.ineligible, stats.unreadable, stats.skipped
    );

    Ok(CorpusReconciliation {
        outcome: reconciler.finish(),
        stats,
        warnings,
    })
}

/// What happened to the configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyStatus {
    /// No update was needed
    AlreadyConsistent,
    /// The update was written, after backing up the previous file if any
    Written { backup: Option<PathBuf> },
    /// The update was only computed, for display
    DisplayOnly { reason: String },
}

/// Apply an update plan to the configuration file.
///
/// A failure to back up or write never fails the run: it is logged and
/// reported as `DisplayOnly` so the caller can still show the update.
pub async fn apply_update(config_path: &Path, plan: &UpdatePlan, persist: bool) -> ApplyStatus {
    let update = match plan {
        UpdatePlan::AlreadyConsistent => return ApplyStatus::AlreadyConsistent,
        UpdatePlan::Update(update) => update,
    };

    if !persist {
        return ApplyStatus::DisplayOnly {
            reason: "dry run".to_string(),
        };
    }

    match persist_update(config_path, update).await {
        Ok(backup) => {
            info!("Updated project '{}' in {}", update.project, config_path.display());
            ApplyStatus::Written { backup }
        }
        Err(e) => {
            error!("Cannot write {}: {}", config_path.display(), e);
            ApplyStatus::DisplayOnly {
                reason: e.to_string(),
            }
        }
    }
}

async fn persist_update(
    config_path: &Path,
    update: &ConfigUpdate,
) -> Result<Option<PathBuf>, ExecuteError> {
    let mut config = read_config(config_path).await?.unwrap_or_default();

    let backup = backup_config(config_path).await?;
    if let Some(backup) = &backup {
        info!("Backed up {} to {}", config_path.display(), backup.display());
    }

    config.apply(update);
    write_config(config_path, &config).await?;

    Ok(backup)
}
