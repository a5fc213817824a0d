//! Recursive discovery of convertible files.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::error::ConvertError;
use super::formats::has_extension_in;

/// File-system operations the batch controller relies on.
pub trait FileSystem {
    /// List every regular file below `root`, recursively, in visit order.
    fn list_files(&self, root: &Path) -> io::Result<Vec<PathBuf>>;

    /// Whether something already exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// The real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn list_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() {
                        files.push(entry.into_path());
                    }
                }
                Err(e) if e.depth() == 0 => {
                    return Err(e
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "unreadable folder")));
                }
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {}", e);
                }
            }
        }

        Ok(files)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// Find all files below `root` whose extension is in `extensions`.
///
/// An empty result is not an error here; the caller reports it as
/// "nothing to convert".
pub fn scan_folder<F: FileSystem + ?Sized>(
    fs: &F,
    root: &Path,
    extensions: &[String],
) -> Result<Vec<PathBuf>, ConvertError> {
    let files = fs.list_files(root).map_err(|source| ConvertError::ScanFailed {
        path: root.to_path_buf(),
        source,
    })?;

    let videos: Vec<PathBuf> = files
        .into_iter()
        .filter(|p| has_extension_in(p, extensions))
        .map(|p| if p.is_absolute() { p } else { absolute(&p) })
        .collect();

    log::info!("Found {} convertible file(s) in {:?}", videos.len(), root);
    Ok(videos)
}

fn absolute(path: &Path) -> PathBuf {
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
