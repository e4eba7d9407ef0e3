//! One-time index construction.
//!
//! ```text
//! check_root ──► collect_files (jwalk, sorted) ──► fingerprint_files (rayon) ──► from_entries
//! ```
//!
//! Nothing is published until every step succeeded, so a failed build never
//! leaves a half-filled index behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use rayon::prelude::*;

use super::{
    FingerprintIndex, IndexError, IndexOptions, ReadErrorPolicy, busted_name, fingerprint,
};
use crate::utils::path::to_slash_path;
use crate::{debug, log};

impl FingerprintIndex {
    /// Walk `root` and fingerprint every eligible file.
    pub fn build(root: &Path, options: &IndexOptions) -> Result<Self, IndexError> {
        check_root(root)?;

        debug!("index"; "computing fingerprints for {}", root.display());
        let files = collect_files(root, options)?;
        let entries = fingerprint_files(root, &files, options)?;
        let index = Self::from_entries(entries);
        debug!("index"; "fingerprinted {} of {} eligible files", index.len(), files.len());

        Ok(index)
    }
}

/// The root must exist, be a directory and be listable.
fn check_root(root: &Path) -> Result<(), IndexError> {
    let metadata = fs::metadata(root).map_err(|err| match err.kind() {
        ErrorKind::NotFound => IndexError::MissingRoot(root.to_path_buf()),
        _ => IndexError::UnreadableRoot(root.to_path_buf(), err),
    })?;

    if !metadata.is_dir() {
        return Err(IndexError::NotADirectory(root.to_path_buf()));
    }

    fs::read_dir(root).map_err(|err| IndexError::UnreadableRoot(root.to_path_buf(), err))?;
    Ok(())
}

/// Eligible regular files under `root`, in sorted walk order.
///
/// Hidden files are included. Symlinks count when they resolve to a file
/// inside the root; links that leave it are never served, so they are left
/// out.
fn collect_files(root: &Path, options: &IndexOptions) -> Result<Vec<PathBuf>, IndexError> {
    let root_canonical = root
        .canonicalize()
        .map_err(|err| IndexError::UnreadableRoot(root.to_path_buf(), err))?;
    let mut files = Vec::new();
    let mut skipped = 0usize;

    if options.filter.is_empty() {
        debug!("index"; "no extension filter, every file is eligible");
    }

    for entry in WalkDir::new(root).sort(true).skip_hidden(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let err = IndexError::from(err);
                if options.on_read_error == ReadErrorPolicy::Abort {
                    return Err(err);
                }
                warn_skipped(&err);
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if entry.file_type().is_symlink() && !resolves_inside(&path, &root_canonical) {
            debug!("index"; "skipping {}, link target is outside the root", path.display());
            continue;
        }

        if options.filter.allows(&path) {
            files.push(path);
        } else {
            skipped += 1;
        }
    }

    debug!("index"; "{} eligible, {} filtered out", files.len(), skipped);
    Ok(files)
}

fn resolves_inside(path: &Path, root_canonical: &Path) -> bool {
    path.canonicalize()
        .is_ok_and(|target| target.starts_with(root_canonical))
}

/// Hash every file in parallel and apply the read error policy.
fn fingerprint_files(
    root: &Path,
    files: &[PathBuf],
    options: &IndexOptions,
) -> Result<Vec<(String, String)>, IndexError> {
    let results: Vec<_> = files
        .par_iter()
        .map(|path| fingerprint_file(root, path, options))
        .collect();

    let mut entries = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => {}
            Err(err) if options.on_read_error == ReadErrorPolicy::Skip => warn_skipped(&err),
            Err(err) => return Err(err),
        }
    }
    Ok(entries)
}

/// `(logical, busted)` for one file, or `None` if it has no URL form.
fn fingerprint_file(
    root: &Path,
    path: &Path,
    options: &IndexOptions,
) -> Result<Option<(String, String)>, IndexError> {
    let Some(logical) = path.strip_prefix(root).ok().and_then(to_slash_path) else {
        log!("warning"; "skipping `{}`: path is not valid UTF-8", path.display());
        return Ok(None);
    };

    let content = fs::read(path).map_err(|err| IndexError::Read(path.to_path_buf(), err))?;
    let busted = busted_name(
        &logical,
        &fingerprint(&content, options.hash_size),
        options.placement,
    );

    debug!("index"; "{} -> {}", logical, busted);
    Ok(Some((logical, busted)))
}

fn warn_skipped(err: &IndexError) {
    match std::error::Error::source(err) {
        Some(source) => log!("warning"; "{}: {}, skipping", err, source),
        None => log!("warning"; "{}, skipping", err),
    }
}
