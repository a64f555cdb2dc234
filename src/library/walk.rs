use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::config::{LibrarySettings, SortMode};
use crate::error::{Error, Result};

use super::model::{DirListing, EntryKind, SourceEntry, SourceTree};

fn normalize_ext(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Extensions that count as audio under `settings`. A `file_type` narrows
/// the set to that single extension.
pub fn audio_extensions(settings: &LibrarySettings) -> Vec<String> {
    match settings.file_type.as_deref().map(normalize_ext) {
        Some(ft) if !ft.is_empty() => vec![ft],
        _ => settings
            .extensions
            .iter()
            .map(|e| normalize_ext(e))
            .filter(|e| !e.is_empty())
            .collect(),
    }
}

pub fn is_audio_file(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Enumerates a source root into per-directory listings.
pub struct TreeWalker {
    exts: Vec<String>,
    include_hidden: bool,
    sort: SortMode,
}

impl TreeWalker {
    pub fn new(settings: &LibrarySettings, sort: SortMode) -> Self {
        Self {
            exts: audio_extensions(settings),
            include_hidden: settings.include_hidden,
            sort,
        }
    }

    pub fn walk(&self, root: &Path) -> Result<SourceTree> {
        let meta = fs::metadata(root).map_err(|e| Error::io("read source", root, e))?;
        if meta.is_file() {
            return Ok(if is_audio_file(root, &self.exts) {
                SourceTree::single_file(root)
            } else {
                debug!(path = %root.display(), "source file is not audio");
                SourceTree::empty(root)
            });
        }

        let mut listings: HashMap<PathBuf, DirListing> = HashMap::new();
        listings.insert(root.to_path_buf(), DirListing::default());

        let include_hidden = self.include_hidden;
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| include_hidden || e.depth() == 0 || !is_hidden(e.path()));

        for entry in walker {
            let entry = entry.map_err(|e| Error::walk(e, root))?;
            if entry.depth() == 0 {
                continue;
            }
            let path = entry.path();
            let Some(parent) = path.parent() else {
                continue;
            };

            let kind = if entry.file_type().is_dir() {
                EntryKind::Directory
            } else if entry.file_type().is_symlink() {
                // Linked files count; linked directories are never entered.
                match fs::metadata(path) {
                    Ok(target) if target.is_file() && is_audio_file(path, &self.exts) => {
                        EntryKind::Audio
                    }
                    Ok(_) => {
                        debug!(path = %path.display(), "skipping symlink");
                        continue;
                    }
                    Err(e) => {
                        debug!(path = %path.display(), error = %e, "skipping dangling symlink");
                        continue;
                    }
                }
            } else if is_audio_file(path, &self.exts) {
                EntryKind::Audio
            } else {
                continue;
            };

            let source = SourceEntry {
                path: path.to_path_buf(),
                kind,
                depth: entry.depth(),
            };
            let listing = listings.entry(parent.to_path_buf()).or_default();
            match kind {
                EntryKind::Audio => listing.files.push(source),
                EntryKind::Directory => {
                    let depth = source.depth;
                    listing.dirs.push(source);
                    listings.entry(path.to_path_buf()).or_default().depth = depth;
                }
            }
        }

        for (dir, listing) in listings.iter_mut() {
            listing
                .files
                .sort_by(|a, b| self.sort.compare_files(&a.path, &b.path));
            listing
                .dirs
                .sort_by(|a, b| self.sort.compare_dirs(&a.path, &b.path));
            debug!(
                dir = %dir.display(),
                files = listing.files.len(),
                dirs = listing.dirs.len(),
                "listed directory"
            );
        }

        Ok(SourceTree::new(root.to_path_buf(), listings))
    }
}
