//! Utility functions for error handling
//!
//! This module provides utility functions to make error handling more convenient.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{RafError, Result};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
///
/// # Returns
/// * `Result<fs::File>` - The opened file or a detailed error
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(RafError::io(
            path,
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found, needed for: {purpose}"),
            ),
        ));
    }

    if !path.is_file() {
        return Err(RafError::io(
            path,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("path is not a file, expected a file for: {purpose}"),
            ),
        ));
    }

    fs::File::open(path).map_err(|e| {
        let message = match e.kind() {
            io::ErrorKind::PermissionDenied => {
                "permission denied - check file permissions".to_string()
            }
            _ => format!("failed to open file for: {purpose}"),
        };
        RafError::io(path, io::Error::new(e.kind(), message))
    })
}

/// Parse a finite numeric field, naming the field in the validation error
pub fn parse_f64_field(field: &str, value: &str) -> Result<f64> {
    let parsed = value
        .trim()
        .parse::<f64>()
        .map_err(|_| RafError::validation(field, format!("'{value}' is not a number")))?;
    if !parsed.is_finite() {
        return Err(RafError::validation(
            field,
            format!("'{value}' is not a finite number"),
        ));
    }
    Ok(parsed)
}
