//! Ship the bitmap sources next to the built fonts

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::Error;

fn is_bdf(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("bdf"))
}

/// The `.bdf` files directly inside `source_dir`, sorted
pub fn bdf_files(source_dir: &Path) -> Result<Vec<PathBuf>, Error> {
    if !source_dir.is_dir() {
        return Err(Error::NoSources(source_dir.to_path_buf()));
    }
    let entries = fs::read_dir(source_dir).map_err(|e| Error::io(source_dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(source_dir, e))?.path();
        if is_bdf(&path) {
            files.push(path);
        }
    }
    if files.is_empty() {
        return Err(Error::NoSources(source_dir.to_path_buf()));
    }
    files.sort();
    Ok(files)
}

/// Copy every `.bdf` in `source_dir` into `publish_dir`, returning the copies.
///
/// Existing copies are overwritten.
pub fn publish(source_dir: &Path, publish_dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let files = bdf_files(source_dir)?;
    if publish_dir.exists() && !publish_dir.is_dir() {
        return Err(Error::ExpectedDirectory(publish_dir.to_path_buf()));
    }
    fs::create_dir_all(publish_dir).map_err(|e| Error::io(publish_dir, e))?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        // bdf_files only returns paths with a file name
        let Some(name) = file.file_name() else {
            continue;
        };
        let dest = publish_dir.join(name);
        debug!("cp {} {}", file.display(), dest.display());
        fs::copy(&file, &dest).map_err(|e| Error::io(&dest, e))?;
        written.push(dest);
    }
    info!(
        "Copied {} bitmap fonts to {}",
        written.len(),
        publish_dir.display()
    );
    Ok(written)
}
