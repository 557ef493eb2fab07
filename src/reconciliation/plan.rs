use super::reconciler::ReconciliationOutcome;
use crate::utils::{join_variable_list, LOCATE_SEPARATOR};

/// New configuration values for one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub project: String,
    /// Rendered exclusion list (`"a, b, c"`)
    pub exclude_value: String,
    /// Rendered variable locate mapping (`"v,_v | w,_w"`)
    pub locate_value: String,
    /// Entries appended to the locate mapping by this update
    pub appended_locate_entries: Vec<String>,
}

/// What should happen to the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdatePlan {
    /// Nothing changed, the configuration already matches the corpus
    AlreadyConsistent,
    Update(ConfigUpdate),
}

impl UpdatePlan {
    pub fn is_update(&self) -> bool {
        matches!(self, UpdatePlan::Update(_))
    }

    pub fn update(&self) -> Option<&ConfigUpdate> {
        match self {
            UpdatePlan::Update(update) => Some(update),
            UpdatePlan::AlreadyConsistent => None,
        }
    }
}

/// Locate entry for a variable moved out of the exclusion list
pub fn locate_entry(variable: &str) -> String {
    format!("{},_{}", variable, variable)
}

/// Render the locate mapping after adding the relocated variables.
///
/// A variable is considered present when the existing mapping contains it
/// as a substring anywhere, so `pr` is not re-added next to `prc,_prc`.
/// Returns the rendered value and the entries that were appended.
pub fn render_locate_value<'a, I>(existing: &str, relocate: I) -> (String, Vec<String>)
where
    I: IntoIterator<Item = &'a String>,
{
    let appended: Vec<String> = relocate
        .into_iter()
        .filter(|variable| !existing.contains(variable.as_str()))
        .map(|variable| locate_entry(variable))
        .collect();

    let existing = existing.trim();
    let mut entries: Vec<&str> = Vec::with_capacity(appended.len() + 1);
    if !existing.is_empty() {
        entries.push(existing);
    }
    entries.extend(appended.iter().map(String::as_str));

    (entries.join(LOCATE_SEPARATOR), appended)
}

/// Turn a reconciliation outcome into configuration values.
///
/// Performs no I/O. `existing_locate` is the project's current locate
/// mapping.
pub fn build_update_plan(
    project: &str,
    outcome: &ReconciliationOutcome,
    existing_locate: &str,
) -> UpdatePlan {
    if !outcome.changed {
        return UpdatePlan::AlreadyConsistent;
    }

    let (locate_value, appended_locate_entries) =
        render_locate_value(existing_locate, &outcome.relocate);

    UpdatePlan::Update(ConfigUpdate {
        project: project.to_string(),
        exclude_value: join_variable_list(&outcome.exclude_list),
        locate_value,
        appended_locate_entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn set(vars: &[&str]) -> BTreeSet<String> {
        vars.iter().map(|s| s.to_string()).collect()
    }

    fn outcome(exclude: &[&str], relocate: &[&str], changed: bool) -> ReconciliationOutcome {
        ReconciliationOutcome {
            exclude_list: exclude.iter().map(|s| s.to_string()).collect(),
            relocate: set(relocate),
            changed,
            ..Default::default()
        }
    }

    #[test]
    fn test_unchanged_outcome_is_already_consistent() {
        let plan = build_update_plan("cmip5", &outcome(&["lat", "lon"], &[], false), "");
        assert_eq!(plan, UpdatePlan::AlreadyConsistent);
        assert!(!plan.is_update());
        assert!(plan.update().is_none());
    }

    #[test]
    fn test_exclude_value_is_comma_space_joined() {
        let plan = build_update_plan("cmip5", &outcome(&["lat", "lon", "time_bnds"], &[], true), "");
        let update = plan.update().unwrap();
        assert_eq!(update.project, "cmip5");
        assert_eq!(update.exclude_value, "lat, lon, time_bnds");
        assert_eq!(update.locate_value, "");
        assert!(update.appended_locate_entries.is_empty());
    }

    #[test]
    fn test_locate_existing_entry_is_not_duplicated() {
        let (value, appended) = render_locate_value("pr,_pr", &set(&["pr"]));
        assert_eq!(value, "pr,_pr");
        assert!(appended.is_empty());
    }

    #[test]
    fn test_locate_substring_adjacent_name_is_appended() {
        let (value, appended) = render_locate_value("pr,_pr", &set(&["prc"]));
        assert_eq!(value, "pr,_pr | prc,_prc");
        assert_eq!(appended, vec!["prc,_prc".to_string()]);
    }

    #[test]
    fn test_locate_check_is_substring_based() {
        // `pr` is inside `prc,_prc`, so it counts as present
        let (value, appended) = render_locate_value("prc,_prc", &set(&["pr"]));
        assert_eq!(value, "prc,_prc");
        assert!(appended.is_empty());
    }

    #[test]
    fn test_locate_entries_joined_with_pipe() {
        let (value, appended) = render_locate_value("", &set(&["ua", "pr"]));
        assert_eq!(value, "pr,_pr | ua,_ua");
        assert_eq!(appended.len(), 2);
    }

    #[test]
    fn test_build_plan_with_relocation() {
        let plan = build_update_plan("cmip5", &outcome(&["time"], &["pr"], true), "ps,ps_");
        let update = plan.update().unwrap();
        assert_eq!(update.exclude_value, "time");
        assert_eq!(update.locate_value, "ps,ps_ | pr,_pr");
        assert_eq!(update.appended_locate_entries, vec!["pr,_pr".to_string()]);
    }
}
