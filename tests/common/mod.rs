#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

const NC_DIMENSION: u32 = 0x0A;
const NC_VARIABLE: u32 = 0x0B;
const NC_ATTRIBUTE: u32 = 0x0C;
const NC_FLOAT: u32 = 5;

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

fn push_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push_name(buf: &mut Vec<u8>, name: &str) {
    push_u32(buf, name.len() as u32);
    buf.extend_from_slice(name.as_bytes());
    buf.resize(buf.len() + (4 - name.len() % 4) % 4, 0);
}

/// Encode a netCDF classic header declaring `variables` over one dimension
pub fn netcdf_classic_header(variables: &[&str]) -> Vec<u8> {
    let mut buf = b"CDF\x01".to_vec();
    push_u32(&mut buf, 0);

    push_u32(&mut buf, NC_DIMENSION);
    push_u32(&mut buf, 1);
    push_name(&mut buf, "time");
    push_u32(&mut buf, 0);

    // no global attributes
    push_u32(&mut buf, 0);
    push_u32(&mut buf, 0);

    if variables.is_empty() {
        push_u32(&mut buf, 0);
        push_u32(&mut buf, 0);
        return buf;
    }

    push_u32(&mut buf, NC_VARIABLE);
    push_u32(&mut buf, variables.len() as u32);
    for name in variables {
        push_name(&mut buf, name);
        push_u32(&mut buf, 1);
        push_u32(&mut buf, 0);

        push_u32(&mut buf, NC_ATTRIBUTE);
        push_u32(&mut buf, 1);
        push_name(&mut buf, "long_name");
        push_u32(&mut buf, 2);
        push_name(&mut buf, name);

        push_u32(&mut buf, NC_FLOAT);
        push_u32(&mut buf, 4);
        push_u32(&mut buf, 0);
    }

    buf
}

/// Write a netCDF file holding `variables` at `root/relative`
pub fn write_netcdf(root: &Path, relative: &str, variables: &[&str]) {
    write_bytes(root, relative, &netcdf_classic_header(variables));
}

/// Write arbitrary bytes at `root/relative`, creating parent directories
pub fn write_bytes(root: &Path, relative: &str, bytes: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    fs::write(path, bytes).expect("Failed to write file");
}
