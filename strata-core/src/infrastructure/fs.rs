// strata-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Replace `path` with `content` in one rename.
///
/// The content goes to a temporary file in the same directory first, so a
/// crash leaves either the old file or the new one, never half of each.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    let parent = path.parent().unwrap_or_else(|| Path::new("."));

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Append one line (newline added) to `path`, creating it if needed.
pub fn append_line<P: AsRef<Path>>(path: P, line: &str) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    // Single write so concurrent appenders never interleave within a line.
    file.write_all(format!("{}\n", line).as_bytes())?;
    Ok(())
}

pub fn ensure_parent_dir(path: &Path) -> Result<(), InfrastructureError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
