//! Capability-scoped file access for configuration and batch files.
//!
//! Each operation opens the parent directory with ambient authority and
//! then works relative to it, so paths are confined to that directory.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;

fn open_parent_dir(path: &Utf8Path) -> io::Result<(Dir, &str)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("path '{path}' must include a file name")))?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Reads a UTF-8 file.
///
/// # Errors
///
/// Returns the underlying I/O error when the file or its directory cannot
/// be opened or read.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let (dir, file_name) = open_parent_dir(path)?;
    dir.read_to_string(file_name)
}

/// Writes `contents` to a file, replacing it if present.
///
/// # Errors
///
/// Returns the underlying I/O error when the directory cannot be opened or
/// the file cannot be written.
pub fn write_string(path: &Utf8Path, contents: &str) -> io::Result<()> {
    let (dir, file_name) = open_parent_dir(path)?;
    dir.write(file_name, contents)
}

/// Returns `true` when `path` names an existing regular file.
#[must_use]
pub fn is_file(path: &Utf8Path) -> bool {
    open_parent_dir(path).is_ok_and(|(dir, file_name)| dir.is_file(file_name))
}
