//! Exclusion list reconciliation.
//!
//! The configured exclusion list drifts away from the corpus over time:
//! auxiliary variables appear that are not hidden yet, and variables end up
//! hidden although some files are named after them. The reconciler folds
//! every `FileObservation` of a corpus into four sets and derives the new
//! exclusion list from them in two passes:
//!
//! 1. While observing: a target variable found in the current exclusion set
//!    is removed from it right away and marked for relocation.
//! 2. When finishing: auxiliary variables that are nobody's target are added,
//!    and any target variable left in the resulting list is marked for
//!    relocation as well.
//!
//! Sets are ordered, so the output does not depend on visit order.

use crate::scanner::FileObservation;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Result of one reconciliation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationOutcome {
    /// New exclusion list, sorted and duplicate free
    pub exclude_list: Vec<String>,
    /// Target variables that were (or would have been) excluded
    pub relocate: BTreeSet<String>,
    /// Auxiliary variables added to the exclusion list by this run
    pub newly_excluded: BTreeSet<String>,
    pub all_targets: BTreeSet<String>,
    pub auxiliary: BTreeSet<String>,
    /// A configured exclusion turned out to be a target variable
    pub misclassification_found: bool,
    /// The exclusion or relocate values need rewriting
    pub changed: bool,
}

/// State of one reconciliation run.
///
/// Created from the configured exclusion list, fed with observations in
/// scan order, then consumed by [`ExcludeReconciler::finish`]. Stopping
/// early leaves a consistent state that can simply be dropped.
#[derive(Debug, Clone, Default)]
pub struct ExcludeReconciler {
    current_excludes: BTreeSet<String>,
    all_targets: BTreeSet<String>,
    relocate: BTreeSet<String>,
    auxiliary: BTreeSet<String>,
    misclassification_found: bool,
}

impl ExcludeReconciler {
    pub fn new<I, S>(initial_excludes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            current_excludes: initial_excludes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn current_excludes(&self) -> &BTreeSet<String> {
        &self.current_excludes
    }

    pub fn all_targets(&self) -> &BTreeSet<String> {
        &self.all_targets
    }

    pub fn relocate(&self) -> &BTreeSet<String> {
        &self.relocate
    }

    pub fn auxiliary(&self) -> &BTreeSet<String> {
        &self.auxiliary
    }

    pub fn misclassification_found(&self) -> bool {
        self.misclassification_found
    }

    /// Fold one file into the state
    pub fn observe(&mut self, observation: &FileObservation) {
        let target = &observation.target_variable;

        if self.current_excludes.remove(target) {
            debug!(
                "'{}' is excluded but owns {}, moving it to relocate",
                target,
                observation.path.display()
            );
            self.relocate.insert(target.clone());
            self.misclassification_found = true;
        }

        if !self.all_targets.contains(target) {
            self.all_targets.insert(target.clone());
        }

        if let Some(discovered) = &observation.discovered_variables {
            for variable in discovered.iter().filter(|v| *v != target) {
                if !self.auxiliary.contains(variable) {
                    self.auxiliary.insert(variable.clone());
                }
            }
        }
    }

    /// Fold a whole observation sequence, returning how many were consumed
    pub fn observe_all<'a, I>(&mut self, observations: I) -> usize
    where
        I: IntoIterator<Item = &'a FileObservation>,
    {
        let mut count = 0;
        for observation in observations {
            self.observe(observation);
            count += 1;
        }
        count
    }

    /// Run the final pass and produce the new exclusion and relocate sets
    pub fn finish(self) -> ReconciliationOutcome {
        let Self {
            current_excludes,
            all_targets,
            mut relocate,
            auxiliary,
            misclassification_found,
        } = self;

        let newly_excluded: BTreeSet<String> = auxiliary
            .iter()
            .filter(|v| !all_targets.contains(*v) && !current_excludes.contains(*v))
            .cloned()
            .collect();

        let exclude_list: Vec<String> = current_excludes
            .union(&newly_excluded)
            .cloned()
            .collect();

        // Catch-up pass for targets that reached the list without being
        // seen in the current exclusion set while observing.
        relocate.extend(
            exclude_list
                .iter()
                .filter(|v| all_targets.contains(*v))
                .cloned(),
        );

        let changed = !relocate.is_empty() || !newly_excluded.is_empty() || misclassification_found;

        info!(
            "Reconciled {} targets: {} excluded ({} new), {} to relocate",
            all_targets.len(),
            exclude_list.len(),
            newly_excluded.len(),
            relocate.len()
        );

        ReconciliationOutcome {
            exclude_list,
            relocate,
            newly_excluded,
            all_targets,
            auxiliary,
            misclassification_found,
            changed,
        }
    }
}

/// Reconcile an initial exclusion list against a sequence of observations
pub fn reconcile<'a, E, S, O>(initial_excludes: E, observations: O) -> ReconciliationOutcome
where
    E: IntoIterator<Item = S>,
    S: Into<String>,
    O: IntoIterator<Item = &'a FileObservation>,
{
    let mut reconciler = ExcludeReconciler::new(initial_excludes);
    reconciler.observe_all(observations);
    reconciler.finish()
}
