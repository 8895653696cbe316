//! Path utilities for ezio-gen

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::GenError;

/// Marker file identifying the top of the ezio source tree
pub const PROJECT_MARKER: &str = "CMakeLists.txt";

/// Locate the project root from the running executable
///
/// The driver ships next to the source tree, so the root is the nearest
/// ancestor of the executable's directory containing `CMakeLists.txt`. When
/// no ancestor has one, the executable's own directory is used.
pub fn locate_project_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    let exe_dir = exe
        .parent()
        .context("Executable path has no parent directory")?;
    Ok(find_project_root_from(exe_dir).unwrap_or_else(|| exe_dir.to_path_buf()))
}

/// Find the project root starting from a specific directory
pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_MARKER).is_file())
        .map(Path::to_path_buf)
}

/// Make a user-supplied path absolute against the current directory
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Ok(cwd.join(path))
}

/// Get the directory holding all per-build-type output directories
pub fn get_build_root(project_root: &Path) -> PathBuf {
    project_root.join("build")
}

/// Ensure a directory exists, creating missing parents
pub fn ensure_dir(path: &Path) -> Result<(), GenError> {
    if !path.is_dir() {
        std::fs::create_dir_all(path).map_err(|e| GenError::filesystem(path, e))?;
    }
    Ok(())
}
