use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Audio,
    Directory,
}

/// One filesystem object discovered under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
    /// Distance from the source root; the root itself is at depth 0.
    pub depth: usize,
}

impl SourceEntry {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Immediate children of one directory, each list already sorted.
#[derive(Debug, Clone, Default)]
pub struct DirListing {
    pub depth: usize,
    pub files: Vec<SourceEntry>,
    pub dirs: Vec<SourceEntry>,
}

/// Snapshot of the source taken by the walker: a listing for every
/// reachable directory, keyed by its path.
#[derive(Debug, Clone)]
pub struct SourceTree {
    root: PathBuf,
    listings: HashMap<PathBuf, DirListing>,
}

impl SourceTree {
    pub(crate) fn new(root: PathBuf, listings: HashMap<PathBuf, DirListing>) -> Self {
        Self { root, listings }
    }

    /// A tree holding a single audio file, for sources that are a file.
    pub fn single_file(file: &Path) -> Self {
        let root = file.parent().map(Path::to_path_buf).unwrap_or_default();
        let listing = DirListing {
            depth: 0,
            files: vec![SourceEntry {
                path: file.to_path_buf(),
                kind: EntryKind::Audio,
                depth: 1,
            }],
            dirs: Vec::new(),
        };
        Self::new(root.clone(), HashMap::from([(root, listing)]))
    }

    pub fn empty(root: &Path) -> Self {
        Self::new(
            root.to_path_buf(),
            HashMap::from([(root.to_path_buf(), DirListing::default())]),
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn listing(&self, dir: &Path) -> Option<&DirListing> {
        self.listings.get(dir)
    }

    pub fn listings(&self) -> impl Iterator<Item = (&Path, &DirListing)> {
        self.listings.iter().map(|(p, l)| (p.as_path(), l))
    }

    /// Total number of audio files anywhere in the tree.
    pub fn audio_count(&self) -> usize {
        self.listings.values().map(|l| l.files.len()).sum()
    }
}

/// One directory on the way from the source root down to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirStep {
    /// The source directory's own name.
    pub name: String,
    /// One-based position among the non-empty siblings.
    pub position: usize,
    /// Number of non-empty siblings, this directory included.
    pub siblings: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayEntry {
    pub entry: SourceEntry,
    /// Directories between the source root and the file, outermost first.
    pub lineage: Vec<DirStep>,
}

/// Audio files in intended playback order.
#[derive(Debug, Clone, Default)]
pub struct PlayList {
    entries: Vec<PlayEntry>,
}

impl PlayList {
    pub fn new(entries: Vec<PlayEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlayEntry> {
        self.entries.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|e| e.entry.path.as_path())
    }
}

impl<'a> IntoIterator for &'a PlayList {
    type Item = &'a PlayEntry;
    type IntoIter = std::slice::Iter<'a, PlayEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
