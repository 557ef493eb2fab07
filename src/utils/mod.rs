use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Name of the per-user configuration folder
pub const CONFIG_FOLDER: &str = ".catalog-exclude";

/// Name of the configuration file inside the config folder
pub const CONFIG_FILE: &str = "config.json";

/// Default extension of the data files whose variables get listed
pub const DEFAULT_EXTENSION: &str = "nc";

/// Separator between the target variable and the rest of a file name
pub const NAME_DELIMITER: char = '_';

/// Separator used when rendering the exclusion list
pub const EXCLUDE_SEPARATOR: &str = ", ";

/// Separator between entries of the variable locate mapping
pub const LOCATE_SEPARATOR: &str = " | ";

/// Parse a comma separated variable list into a set.
///
/// Entries are trimmed and blank entries are dropped, so `"lat, lon,,"`
/// yields `{lat, lon}`.
pub fn parse_variable_list(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Render variables as the comma-and-space separated configuration value
pub fn join_variable_list<'a, I>(variables: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    variables
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(EXCLUDE_SEPARATOR)
}

/// Get the default configuration path (~/.catalog-exclude/config.json)
pub fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()?;

    Some(PathBuf::from(home).join(CONFIG_FOLDER).join(CONFIG_FILE))
}

/// Get the file name of a path as UTF-8, if it has one
pub fn file_name_str(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// Get current timestamp in a form that is safe inside file names
pub fn now_compact() -> String {
    chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string()
}
