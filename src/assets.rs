//! Mirrors the source images directory into the public images directory.
//! Articles reference their images by public path (see [`crate::article`]),
//! so the pipeline copies the files themselves alongside the generated
//! modules.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

/// Copies every regular file under `source` to the same relative location
/// under `destination`, creating directories as needed. A missing `source`
/// directory is a no-op, not an error -- content without images is valid.
/// Returns the number of files copied. The first failed copy aborts the
/// run; a copy failure indicates an environment problem, not a data
/// problem, so there is no partial-success bookkeeping.
pub fn sync_images(source: &Path, destination: &Path) -> io::Result<usize> {
    if !source.is_dir() {
        return Ok(0);
    }
    fs::create_dir_all(destination)?;

    let mut copied = 0;
    for result in WalkDir::new(source).min_depth(1) {
        let entry = result.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        // strip_prefix shouldn't fail since `source` is always an ancestor
        // of the entry path
        let relative = entry.path().strip_prefix(source).unwrap();
        let target = destination.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &target)?;
        copied += 1;
    }
    Ok(copied)
}
