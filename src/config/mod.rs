use crate::reconciliation::ConfigUpdate;
use crate::utils::{file_name_str, now_compact, parse_variable_list};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Settings of one project section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSection {
    /// Comma separated variables hidden from the catalog
    #[serde(default)]
    pub thredds_exclude_variables: String,
    /// `|` separated `variable,prefix` entries
    #[serde(default)]
    pub variable_locate: String,
    /// Other settings, kept untouched on rewrite
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectSection {
    pub fn excluded_variables(&self) -> BTreeSet<String> {
        parse_variable_list(&self.thredds_exclude_variables)
    }
}

/// Publisher configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublisherConfig {
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectSection>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PublisherConfig {
    /// Get a project section, empty if the project is not configured
    pub fn project(&self, project: &str) -> ProjectSection {
        self.projects.get(project).cloned().unwrap_or_default()
    }

    /// Store the values of an update in the matching project section
    pub fn apply(&mut self, update: &ConfigUpdate) {
        let section = self.projects.entry(update.project.clone()).or_default();
        section.thredds_exclude_variables = update.exclude_value.clone();
        section.variable_locate = update.locate_value.clone();
    }
}

/// Read the configuration file
pub async fn read_config(config_path: &Path) -> Result<Option<PublisherConfig>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(config_path).await?;
    let config: PublisherConfig = serde_json::from_str(&content)?;
    Ok(Some(config))
}

/// Write the configuration file using temp file + rename
pub async fn write_config(config_path: &Path, config: &PublisherConfig) -> Result<(), ConfigError> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = config_path.with_extension("json.tmp");
    let content = serde_json::to_string_pretty(config)?;
    fs::write(&temp_path, &content).await?;
    fs::rename(&temp_path, config_path).await?;

    Ok(())
}

/// Copy the configuration file next to itself with a timestamp suffix.
///
/// Returns `None` when there is no file to back up.
pub async fn backup_config(config_path: &Path) -> Result<Option<PathBuf>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }

    let name = file_name_str(config_path).unwrap_or("config.json");
    let backup_path = config_path.with_file_name(format!("{}.{}.bak", name, now_compact()));
    fs::copy(config_path, &backup_path).await?;

    Ok(Some(backup_path))
}
