pub mod config;
pub mod inventory;
pub mod naming;
pub mod reconciliation;
pub mod report;
pub mod scanner;
pub mod utils;

// Re-export commonly used types
pub use config::{
    backup_config, read_config, write_config, ConfigError, ProjectSection, PublisherConfig,
};
pub use inventory::{InventoryError, NetcdfInventory, VariableInventory};
pub use naming::{target_variable_of, NameError};
pub use reconciliation::{
    apply_update, build_update_plan, reconcile, reconcile_corpus, ApplyStatus, ConfigUpdate,
    CorpusReconciliation, ExcludeReconciler, ReconciliationOutcome, UpdatePlan,
};
pub use report::{render_summary, ReportError, SummaryContext, SummaryRenderer};
pub use scanner::{
    CorpusScanner, FileObservation, ScanError, ScanStats, ScanWarning, WarningKind,
};
