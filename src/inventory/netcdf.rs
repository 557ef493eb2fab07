//! netCDF classic header reader.
//!
//! Reads just enough of the header to list variable names. Supports the
//! classic (CDF-1), 64-bit offset (CDF-2) and 64-bit data (CDF-5) layouts.
//! netCDF-4 files are HDF5 containers and are reported as unsupported.
//!
//! # Layout
//! Big endian, every item padded to a 4 byte boundary:
//! ```text
//! header   = magic numrecs dim_list gatt_list var_list
//! dim_list = ABSENT | NC_DIMENSION nelems [dim ...]
//! att_list = ABSENT | NC_ATTRIBUTE nelems [attr ...]
//! var_list = ABSENT | NC_VARIABLE nelems [var ...]
//! var      = name nelems [dimid ...] vatt_list nc_type vsize begin
//! ```

use super::{InventoryError, VariableInventory};
use byteorder::{BigEndian, ReadBytesExt};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tracing::debug;

const NC_DIMENSION: u32 = 0x0A;
const NC_VARIABLE: u32 = 0x0B;
const NC_ATTRIBUTE: u32 = 0x0C;

const HDF5_SIGNATURE: &[u8; 4] = b"\x89HDF";

/// Upper bound on a single name, keeps a corrupt length from allocating
const MAX_NAME_LEN: u64 = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Classic,
    Offset64,
    Data64,
}

/// Lists variables of netCDF classic-format files.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetcdfInventory;

impl NetcdfInventory {
    pub fn new() -> Self {
        Self
    }
}

impl VariableInventory for NetcdfInventory {
    fn list_variables(&self, path: &Path) -> Result<BTreeSet<String>, InventoryError> {
        let file = File::open(path)?;
        let variables = read_variable_names(BufReader::new(file)).map_err(|err| match err {
            InventoryError::IoError(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                InventoryError::Malformed("truncated header".to_string())
            }
            other => other,
        })?;

        debug!("{}: {} variables", path.display(), variables.len());
        Ok(variables)
    }
}

/// Parse a header from any reader and return its variable names
pub(crate) fn read_variable_names<R: Read>(mut reader: R) -> Result<BTreeSet<String>, InventoryError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;

    if &magic == HDF5_SIGNATURE {
        return Err(InventoryError::UnsupportedFormat(
            "netCDF-4/HDF5 container".to_string(),
        ));
    }
    if &magic[..3] != b"CDF" {
        return Err(InventoryError::Malformed("not a netCDF file".to_string()));
    }

    let format = match magic[3] {
        1 => Format::Classic,
        2 => Format::Offset64,
        5 => Format::Data64,
        other => {
            return Err(InventoryError::UnsupportedFormat(format!(
                "netCDF classic version {}",
                other
            )))
        }
    };

    let mut header = HeaderReader { reader, format };

    // numrecs (or STREAMING)
    header.read_non_neg()?;

    header.skip_dimensions()?;
    header.skip_attributes()?;
    header.read_variables()
}

struct HeaderReader<R> {
    reader: R,
    format: Format,
}

impl<R: Read> HeaderReader<R> {
    fn read_tag(&mut self) -> Result<u32, InventoryError> {
        Ok(self.reader.read_u32::<BigEndian>()?)
    }

    fn read_non_neg(&mut self) -> Result<u64, InventoryError> {
        match self.format {
            Format::Data64 => Ok(self.reader.read_u64::<BigEndian>()?),
            Format::Classic | Format::Offset64 => Ok(u64::from(self.reader.read_u32::<BigEndian>()?)),
        }
    }

    fn read_offset(&mut self) -> Result<u64, InventoryError> {
        match self.format {
            Format::Classic => Ok(u64::from(self.reader.read_u32::<BigEndian>()?)),
            Format::Offset64 | Format::Data64 => Ok(self.reader.read_u64::<BigEndian>()?),
        }
    }

    fn skip(&mut self, count: u64) -> Result<(), InventoryError> {
        let copied = io::copy(&mut (&mut self.reader).take(count), &mut io::sink())?;
        if copied != count {
            return Err(InventoryError::Malformed("truncated header".to_string()));
        }
        Ok(())
    }

    fn skip_padding(&mut self, len: u64) -> Result<(), InventoryError> {
        self.skip((4 - len % 4) % 4)
    }

    fn read_name(&mut self) -> Result<String, InventoryError> {
        let len = self.read_non_neg()?;
        if len > MAX_NAME_LEN {
            return Err(InventoryError::Malformed(format!("name length {}", len)));
        }

        let mut bytes = vec![0u8; len as usize];
        self.reader.read_exact(&mut bytes)?;
        self.skip_padding(len)?;

        String::from_utf8(bytes)
            .map_err(|_| InventoryError::Malformed("name is not valid UTF-8".to_string()))
    }

    /// Read a list header, returning its element count (0 for ABSENT)
    fn read_list_header(&mut self, expected_tag: u32, what: &str) -> Result<u64, InventoryError> {
        let tag = self.read_tag()?;
        let count = self.read_non_neg()?;

        if tag == 0 {
            if count != 0 {
                return Err(InventoryError::Malformed(format!("absent {} list with elements", what)));
            }
            return Ok(0);
        }
        if tag != expected_tag {
            return Err(InventoryError::Malformed(format!(
                "expected {} list tag {:#x}, found {:#x}",
                what, expected_tag, tag
            )));
        }
        Ok(count)
    }

    fn skip_dimensions(&mut self) -> Result<(), InventoryError> {
        let count = self.read_list_header(NC_DIMENSION, "dimension")?;
        for _ in 0..count {
            self.read_name()?;
            self.read_non_neg()?;
        }
        Ok(())
    }

    fn skip_attributes(&mut self) -> Result<(), InventoryError> {
        let count = self.read_list_header(NC_ATTRIBUTE, "attribute")?;
        for _ in 0..count {
            self.read_name()?;
            let nc_type = self.read_tag()?;
            let nelems = self.read_non_neg()?;
            let len = nelems
                .checked_mul(type_size(nc_type)?)
                .ok_or_else(|| InventoryError::Malformed("attribute too large".to_string()))?;
            self.skip(len)?;
            self.skip_padding(len)?;
        }
        Ok(())
    }

    fn read_variables(&mut self) -> Result<BTreeSet<String>, InventoryError> {
        let count = self.read_list_header(NC_VARIABLE, "variable")?;
        let mut names = BTreeSet::new();

        for _ in 0..count {
            let name = self.read_name()?;

            let rank = self.read_non_neg()?;
            for _ in 0..rank {
                self.read_non_neg()?;
            }
            self.skip_attributes()?;

            let nc_type = self.read_tag()?;
            type_size(nc_type)?;

            // vsize
            self.read_non_neg()?;
            // begin
            self.read_offset()?;

            names.insert(name);
        }

        Ok(names)
    }
}

fn type_size(nc_type: u32) -> Result<u64, InventoryError> {
    match nc_type {
        1 | 2 | 7 => Ok(1),
        3 | 8 => Ok(2),
        4 | 5 | 9 => Ok(4),
        6 | 10 | 11 => Ok(8),
        other => Err(InventoryError::Malformed(format!("unknown nc_type {}", other))),
    }
}
