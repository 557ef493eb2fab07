use crate::reconciliation::{ApplyStatus, CorpusReconciliation, UpdatePlan};
use crate::scanner::{ScanStats, ScanWarning};
use serde::Serialize;

/// Context for the change summary template
/// Placeholders: {{project}}, {{status}}, {{reason}}, {{backup}}, {{stats}}, {{warning_count}}, {{warnings}},
/// {{newly_excluded}}, {{relocated}}, {{appended_locate_entries}}, {{has_update}},
/// {{exclude_value}}, {{locate_value}}
#[derive(Debug, Clone, Serialize)]
pub struct SummaryContext {
    pub project: String,
    pub status: String,
    pub reason: Option<String>,
    pub backup: Option<String>,
    pub stats: ScanStats,
    pub warning_count: usize,
    pub warnings: Vec<ScanWarning>,
    pub newly_excluded: Vec<String>,
    pub relocated: Vec<String>,
    pub appended_locate_entries: Vec<String>,
    pub has_update: bool,
    pub exclude_value: String,
    pub locate_value: String,
}

impl SummaryContext {
    pub fn new(
        project: &str,
        reconciliation: &CorpusReconciliation,
        plan: &UpdatePlan,
        status: &ApplyStatus,
    ) -> Self {
        let (status_label, reason, backup) = match status {
            ApplyStatus::AlreadyConsistent => ("already consistent", None, None),
            ApplyStatus::Written { backup } => (
                "updated",
                None,
                backup.as_ref().map(|p| p.display().to_string()),
            ),
            ApplyStatus::DisplayOnly { reason } => ("not written", Some(reason.clone()), None),
        };

        let outcome = &reconciliation.outcome;
        let (exclude_value, locate_value, appended) = match plan.update() {
            Some(update) => (
                update.exclude_value.clone(),
                update.locate_value.clone(),
                update.appended_locate_entries.clone(),
            ),
            None => (String::new(), String::new(), Vec::new()),
        };

        Self {
            project: project.to_string(),
            status: status_label.to_string(),
            reason,
            backup,
            stats: reconciliation.stats,
            warning_count: reconciliation.warnings.len(),
            warnings: reconciliation.warnings.clone(),
            newly_excluded: outcome.newly_excluded.iter().cloned().collect(),
            relocated: outcome.relocate.iter().cloned().collect(),
            appended_locate_entries: appended,
            has_update: plan.is_update(),
            exclude_value,
            locate_value,
        }
    }
}
