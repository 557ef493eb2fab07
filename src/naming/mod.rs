//! Target variable extraction from data file names.
//!
//! Data files are named after the variable they carry, e.g.
//! `ta_Amon_model1_historical_r1i1p1_185001-200512.nc` owns `ta`. The
//! target variable is the token before the first `_`.

use crate::utils::NAME_DELIMITER;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("File name '{0}' has no '_' delimiter")]
    NoDelimiter(String),

    #[error("File name '{0}' starts with an empty variable token")]
    EmptyToken(String),
}

/// Derive the target variable a file is named for.
///
/// Only the file name is inspected, never the directory part.
pub fn target_variable_of(file_name: &str) -> Result<String, NameError> {
    let (token, _) = file_name
        .split_once(NAME_DELIMITER)
        .ok_or_else(|| NameError::NoDelimiter(file_name.to_string()))?;

    let token = token.trim();
    if token.is_empty() {
        return Err(NameError::EmptyToken(file_name.to_string()));
    }

    Ok(token.to_string())
}
