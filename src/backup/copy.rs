//! Tree copy helpers for config items.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Recursively copy `src` into `dst`, following symlinks.
///
/// Returns the number of files copied.
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<usize> {
    fs::create_dir_all(dst)
        .with_context(|| format!("Cannot create directory: {}", dst.display()))?;

    let mut count = 0;
    for entry in fs::read_dir(src).with_context(|| format!("Cannot read {}", src.display()))? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        // fs::metadata follows symlinks, so linked folders are copied as folders
        let meta = fs::metadata(&src_path)
            .with_context(|| format!("Cannot stat {}", src_path.display()))?;

        if meta.is_dir() {
            count += copy_dir_all(&src_path, &dst_path)?;
        } else {
            copy_file(&src_path, &dst_path, &meta)?;
            count += 1;
        }
    }
    Ok(count)
}

/// Copy one regular file.
///
/// FIFOs, sockets and device nodes are rejected: opening a FIFO for reading
/// blocks until a writer shows up.
fn copy_file(src: &Path, dst: &Path, meta: &fs::Metadata) -> Result<()> {
    if !meta.is_file() {
        bail!("Cannot copy special file {}", src.display());
    }

    fs::copy(src, dst)
        .with_context(|| format!("Cannot copy {} to {}", src.display(), dst.display()))?;
    Ok(())
}

/// Make `dst` an exact copy of `src`, discarding whatever was there before.
///
/// `src` may be a folder or a single file.
pub fn replace_with_copy(src: &Path, dst: &Path) -> Result<usize> {
    remove_existing(dst)?;

    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory: {}", parent.display()))?;
    }

    let meta = fs::metadata(src).with_context(|| format!("Cannot stat {}", src.display()))?;
    if meta.is_dir() {
        copy_dir_all(src, dst)
    } else {
        copy_file(src, dst, &meta)?;
        Ok(1)
    }
}

fn remove_existing(path: &Path) -> Result<()> {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return Ok(());
    };

    let removed = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.with_context(|| format!("Cannot remove {}", path.display()))
}
