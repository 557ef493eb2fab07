mod execute;
mod plan;
mod reconciler;

pub use execute::{apply_update, reconcile_corpus, ApplyStatus, CorpusReconciliation, ExecuteError};
pub use plan::{build_update_plan, locate_entry, render_locate_value, ConfigUpdate, UpdatePlan};
pub use reconciler::{reconcile, ExcludeReconciler, ReconciliationOutcome};
