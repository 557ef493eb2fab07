//! Listing the variables stored inside a data file.
//!
//! The scanner only needs variable names, so the inventory is a narrow
//! trait. Failures are per file and never abort a scan.

mod netcdf;

pub use netcdf::NetcdfInventory;

use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unsupported file layout: {0}")]
    UnsupportedFormat(String),

    #[error("Malformed header: {0}")]
    Malformed(String),
}

/// Something that can open a data file and list its variable names.
///
/// Implementations must release the file before returning, on success and
/// on every error path.
pub trait VariableInventory {
    fn list_variables(&self, path: &Path) -> Result<BTreeSet<String>, InventoryError>;
}

impl<T: VariableInventory + ?Sized> VariableInventory for &T {
    fn list_variables(&self, path: &Path) -> Result<BTreeSet<String>, InventoryError> {
        (**self).list_variables(path)
    }
}
