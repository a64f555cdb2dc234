use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{Layout, TagSettings, TitleSource};
use crate::error::{Error, Result};
use crate::library::PlayList;
use crate::naming::{NameDeriver, NumberingScheme, Ordinal, initials};

use super::tags::{TagCodec, TagUpdate};

/// Where one source file goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationSpec {
    pub dir: PathBuf,
    pub file_name: String,
}

impl DestinationSpec {
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

#[derive(Debug, Clone)]
pub struct CopyJob {
    pub source: PathBuf,
    pub destination: DestinationSpec,
    pub ordinal: Ordinal,
    pub tags: TagUpdate,
    pub bytes: u64,
}

/// Every destination of a run, resolved before the first byte is copied.
#[derive(Debug, Clone)]
pub struct CopyPlan {
    jobs: Vec<CopyJob>,
}

impl CopyPlan {
    pub fn jobs(&self) -> &[CopyJob] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn total_bytes(&self) -> u64 {
        self.jobs.iter().map(|j| j.bytes).sum()
    }
}

/// Case-insensitive key: two names differing only by case collide on
/// FAT32, exFAT, NTFS and APFS.
fn collision_key(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

/// Resolves destination names and tag values for a [`PlayList`].
pub struct Planner<'a> {
    deriver: &'a NameDeriver,
    codec: &'a dyn TagCodec,
    tags: &'a TagSettings,
    layout: Layout,
    title_source: TitleSource,
    prepend_subdir_name: bool,
    album_tag: Option<String>,
    check_existing: bool,
}

impl<'a> Planner<'a> {
    pub fn new(deriver: &'a NameDeriver, codec: &'a dyn TagCodec, tags: &'a TagSettings) -> Self {
        Self {
            deriver,
            codec,
            tags,
            layout: Layout::Flat,
            title_source: TitleSource::Tag,
            prepend_subdir_name: false,
            album_tag: tags.album.clone(),
            check_existing: true,
        }
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn title_source(mut self, source: TitleSource) -> Self {
        self.title_source = source;
        self
    }

    /// Flat layout only: record source directories in file names.
    pub fn prepend_subdir_name(mut self, on: bool) -> Self {
        self.prepend_subdir_name = on;
        self
    }

    /// Album tag used when none is configured explicitly.
    pub fn fallback_album_tag(mut self, album: Option<String>) -> Self {
        if self.album_tag.is_none() {
            self.album_tag = album;
        }
        self
    }

    /// Whether an already present destination file fails the plan.
    pub fn check_existing(mut self, on: bool) -> Self {
        self.check_existing = on;
        self
    }

    fn title_tag(&self, ordinal: &Ordinal, stem: &str, body: &str) -> Option<String> {
        let n = ordinal.value;
        if self.tags.file_title_num {
            return Some(format!("{n}>{stem}"));
        }
        if self.tags.file_title {
            return Some(stem.to_string());
        }
        let artist = self.tags.artist.as_deref().filter(|a| !a.trim().is_empty());
        match (artist, self.album_tag.as_deref()) {
            (Some(artist), Some(album)) => Some(format!("{n} {} - {album}", initials(artist))),
            (Some(artist), None) => Some(format!("{n} {artist}")),
            (None, Some(album)) => Some(format!("{n} {album}")),
            (None, None) if self.layout == Layout::Flat && self.tags.rewrite_title => {
                Some(body.to_string())
            }
            (None, None) => None,
        }
    }

    pub fn plan(&self, list: &PlayList, dest_root: &Path) -> Result<CopyPlan> {
        let scheme = NumberingScheme::new(list.len());
        let mut files: HashMap<String, PathBuf> = HashMap::with_capacity(list.len());
        let mut dirs: HashMap<String, PathBuf> = HashMap::new();
        let mut jobs = Vec::with_capacity(list.len());

        for (ordinal, item) in scheme.ordinals().zip(list.iter()) {
            let source = &item.entry.path;
            let stem = item.entry.stem();
            let title = match self.title_source {
                TitleSource::Tag => self
                    .codec
                    .read_title(source)
                    .unwrap_or_else(|| self.deriver.title_from_stem(&stem)),
                TitleSource::FileName => self.deriver.title_from_stem(&stem),
            };
            let ext = source
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default();

            let flat = self.layout == Layout::Flat;
            let subdirs = if flat && self.prepend_subdir_name {
                item.lineage.as_slice()
            } else {
                &[]
            };
            let dir = if flat {
                dest_root.to_path_buf()
            } else {
                let dir = item
                    .lineage
                    .iter()
                    .fold(dest_root.to_path_buf(), |d, step| d.join(self.deriver.dir_name(step)));
                let source_dir = source.parent().map(Path::to_path_buf).unwrap_or_default();
                match dirs.entry(collision_key(&dir)) {
                    Entry::Occupied(seen) if *seen.get() != source_dir => {
                        return Err(Error::NameConflict {
                            destination: dir,
                            first: seen.get().clone(),
                            second: source_dir,
                        });
                    }
                    Entry::Occupied(_) => {}
                    Entry::Vacant(slot) => {
                        slot.insert(source_dir);
                    }
                }
                dir
            };

            let destination = DestinationSpec {
                dir,
                file_name: self.deriver.file_name(&ordinal, &title, &ext, subdirs),
            };
            let path = destination.path();
            match files.entry(collision_key(&path)) {
                Entry::Occupied(seen) => {
                    return Err(Error::NameConflict {
                        destination: path,
                        first: seen.get().clone(),
                        second: source.clone(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(source.clone());
                }
            }
            if self.check_existing && fs::symlink_metadata(&path).is_ok() {
                return Err(Error::DestinationExists(path));
            }

            let bytes = fs::metadata(source)
                .map_err(|e| Error::io("read metadata", source, e))?
                .len();
            let tags = TagUpdate {
                track: self.tags.track_number.then_some(ordinal),
                title: self.title_tag(&ordinal, &stem, &self.deriver.body(&title)),
                artist: self.tags.artist.clone().filter(|a| !a.trim().is_empty()),
                album: self.album_tag.clone(),
            };

            jobs.push(CopyJob {
                source: source.clone(),
                destination,
                ordinal,
                tags,
                bytes,
            });
        }

        let plan = CopyPlan { jobs };
        info!(
            files = scheme.total(),
            width = scheme.width(),
            bytes = plan.total_bytes(),
            layout = ?self.layout,
            "planned copy"
        );
        Ok(plan)
    }
}
