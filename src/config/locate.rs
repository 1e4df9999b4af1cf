use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{FilterError, Result};

/// Resolve the location of an artifacts filter file or directory.
///
/// The path is used as given when it exists. Otherwise its base name is
/// looked up inside `data_location`, the directory holding bundled
/// definitions.
///
/// # Returns
///
/// * `Ok(PathBuf)` - The existing file or directory
/// * `Err` - A configuration error naming the missing filter file
pub fn locate_filter_file(path: &Path, data_location: Option<&Path>) -> Result<PathBuf> {
    if path.exists() {
        return Ok(path.to_path_buf());
    }

    if let (Some(data_location), Some(basename)) = (data_location, path.file_name()) {
        let candidate = data_location.join(basename);
        if candidate.exists() {
            debug!("Using filter file from data location: {}", candidate.display());
            return Ok(candidate);
        }
    }

    Err(FilterError::configuration(format!(
        "No such artifacts filter file: {}.",
        path.display()
    )))
}
