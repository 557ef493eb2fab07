//! Human readable change summary.

mod types;

pub use types::SummaryContext;

use handlebars::{no_escape, Handlebars};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Template error: {0}")]
    TemplateError(#[from] handlebars::TemplateError),

    #[error("Render error: {0}")]
    RenderError(#[from] handlebars::RenderError),
}

const SUMMARY_TEMPLATE_NAME: &str = "summary";

const SUMMARY_TEMPLATE: &str = r#"Project: {{project}}
Status: {{status}}{{#if reason}} ({{reason}}){{/if}}
{{#if backup}}Backup: {{backup}}
{{/if}}Files: {{stats.filesSeen}} seen, {{stats.inventoried}} inventoried, {{stats.ineligible}} other format, {{stats.unreadable}} unreadable, {{stats.skipped}} skipped
{{#if warning_count}}Warnings: {{warning_count}}
{{#each warnings}}  ! {{path}} ({{kind.type}}): {{kind.detail}}
{{/each}}{{/if}}{{#if newly_excluded}}Newly excluded:
{{#each newly_excluded}}  + {{this}}
{{/each}}{{/if}}{{#if relocated}}Relocate (target variables found in the exclusion list):
{{#each relocated}}  > {{this}}
{{/each}}{{/if}}{{#if has_update}}thredds_exclude_variables = {{exclude_value}}
variable_locate = {{locate_value}}
{{/if}}"#;

pub struct SummaryRenderer {
    handlebars: Handlebars<'static>,
}

impl SummaryRenderer {
    pub fn new() -> Result<Self, ReportError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(no_escape);
        handlebars.register_template_string(SUMMARY_TEMPLATE_NAME, SUMMARY_TEMPLATE)?;
        Ok(Self { handlebars })
    }

    pub fn render(&self, context: &SummaryContext) -> Result<String, ReportError> {
        self.handlebars
            .render(SUMMARY_TEMPLATE_NAME, context)
            .map_err(ReportError::from)
    }
}

/// Render the change summary with the built-in template
pub fn render_summary(context: &SummaryContext) -> Result<String, ReportError> {
    SummaryRenderer::new()?.render(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciliation::{
        build_update_plan, reconcile, ApplyStatus, CorpusReconciliation, UpdatePlan,
    };
    use crate::scanner::{FileObservation, ScanStats, ScanWarning, WarningKind};
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn corpus() -> Vec<FileObservation> {
        let vars = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>();
        vec![
            FileObservation::inventoried("pr_model1_1.nc", "pr", vars(&["pr", "time"])),
            FileObservation::inventoried("ta_model1_1.nc", "ta", vars(&["ta", "lat", "lon"])),
        ]
    }

    fn reconciliation(initial: &[&str]) -> CorpusReconciliation {
        CorpusReconciliation {
            outcome: reconcile(initial.iter().copied(), &corpus()),
            stats: ScanStats {
                files_seen: 2,
                inventoried: 2,
                ..Default::default()
            },
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_render_update_summary() {
        let reconciliation = reconciliation(&["pr"]);
        let plan = build_update_plan("cmip5", &reconciliation.outcome, "ps,ps_");
        let status = ApplyStatus::Written {
            backup: Some(PathBuf::from("/tmp/config.json.bak")),
        };

        let context = SummaryContext::new("cmip5", &reconciliation, &plan, &status);
        let text = render_summary(&context).unwrap();

        assert!(text.contains("Project: cmip5"));
        assert!(text.contains("Status: updated"));
        assert!(text.contains("Backup: /tmp/config.json.bak"));
        assert!(text.contains("2 seen, 2 inventoried"));
        assert!(text.contains("  + lat"));
        assert!(text.contains("  + time"));
        assert!(text.contains("  > pr"));
        assert!(text.contains("thredds_exclude_variables = lat, lon, time"));
        assert!(text.contains("variable_locate = ps,ps_ | pr,_pr"));
    }

    #[test]
    fn test_render_consistent_summary() {
        let reconciliation = reconciliation(&["lat", "lon", "time"]);
        let plan = build_update_plan("cmip5", &reconciliation.outcome, "");
        assert_eq!(plan, UpdatePlan::AlreadyConsistent);

        let context =
            SummaryContext::new("cmip5", &reconciliation, &plan, &ApplyStatus::AlreadyConsistent);
        let text = render_summary(&context).unwrap();

        assert!(text.contains("Status: already consistent"));
        assert!(!text.contains("Newly excluded"));
        assert!(!text.contains("thredds_exclude_variables"));
    }

    #[test]
    fn test_render_display_only_reason() {
        let reconciliation = reconciliation(&[]);
        let plan = build_update_plan("cmip5", &reconciliation.outcome, "");
        let status = ApplyStatus::DisplayOnly {
            reason: "dry run".to_string(),
        };

        let context = SummaryContext::new("cmip5", &reconciliation, &plan, &status);
        let text = render_summary(&context).unwrap();

        assert!(text.contains("Status: not written (dry run)"));
        assert!(text.contains("thredds_exclude_variables = lat, lon, time"));
    }

    #[test]
    fn test_render_lists_scan_warnings() {
        let mut reconciliation = reconciliation(&["lat", "lon", "time"]);
        reconciliation.warnings = vec![
            ScanWarning {
                path: PathBuf::from("/data/ua_model1_1.nc"),
                kind: WarningKind::Unreadable("Malformed header: truncated header".to_string()),
            },
            ScanWarning {
                path: PathBuf::from("/data/README"),
                kind: WarningKind::MalformedName("no delimiter".to_string()),
            },
        ];
        let plan = build_update_plan("cmip5", &reconciliation.outcome, "");

        let context =
            SummaryContext::new("cmip5", &reconciliation, &plan, &ApplyStatus::AlreadyConsistent);
        let text = render_summary(&context).unwrap();

        assert!(text.contains("Warnings: 2"));
        assert!(text.contains(
            "  ! /data/ua_model1_1.nc (unreadable): Malformed header: truncated header"
        ));
        assert!(text.contains("  ! /data/README (malformedName): no delimiter"));
    }

    #[test]
    fn test_render_without_warnings_omits_section() {
        let reconciliation = reconciliation(&[]);
        let plan = build_update_plan("cmip5", &reconciliation.outcome, "");
        let context =
            SummaryContext::new("cmip5", &reconciliation, &plan, &ApplyStatus::AlreadyConsistent);
        let text = render_summary(&context).unwrap();
        assert!(!text.contains("Warnings:"));
    }
}
