use crate::error::CortexError;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// How many entries `/list` prints before summarising the rest.
pub const LIST_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectFile {
    /// Relative to the listed directory.
    pub path: PathBuf,
    pub size: u64,
}

/// Writes `content` to `path`, creating missing parent directories.
pub fn write_file(path: &Path, content: &str) -> Result<(), CortexError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

// Hidden entries and bytecode caches are noise in a project listing
fn is_skipped(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || (entry.file_type().is_dir() && name == "__pycache__")
}

/// Every regular file under `dir`, sorted by path.
pub fn list_project_files(dir: &Path) -> Result<Vec<ProjectFile>, CortexError> {
    if !dir.is_dir() {
        return Err(CortexError::IoError(io::Error::new(
            io::ErrorKind::NotFound,
            format!("not a directory: {}", dir.display()),
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        let path = entry
            .path()
            .strip_prefix(dir)
            .unwrap_or(entry.path())
            .to_path_buf();
        files.push(ProjectFile { path, size });
    }

    Ok(files)
}
