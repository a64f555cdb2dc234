use std::path::Path;

use lofty::config::WriteOptions;
use lofty::prelude::*;
use lofty::tag::Tag;
use tracing::debug;

use crate::error::{Error, Result};
use crate::naming::Ordinal;

/// Tag fields written to one copied file. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagUpdate {
    pub track: Option<Ordinal>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

impl TagUpdate {
    pub fn is_empty(&self) -> bool {
        self.track.is_none() && self.title.is_none() && self.artist.is_none() && self.album.is_none()
    }
}

/// Reads and writes the handful of tag fields the copier cares about.
///
/// Track number and title are written together with artist and album in a
/// single [`TagCodec::apply`], so every copy is tagged with one save.
pub trait TagCodec {
    /// Title tag of `path`, if the file has a non-blank one.
    fn read_title(&self, path: &Path) -> Option<String>;

    /// Write every field set in `update` to `path`.
    fn apply(&self, path: &Path, update: &TagUpdate) -> Result<()>;
}

/// [`TagCodec`] backed by lofty. One `apply` is one read and one save.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyCodec;

fn track_value(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

impl TagCodec for LoftyCodec {
    fn read_title(&self, path: &Path) -> Option<String> {
        let tagged = match lofty::read_from_path(path) {
            Ok(t) => t,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no readable tags");
                return None;
            }
        };
        let tag = tagged.primary_tag().or_else(|| tagged.first_tag())?;
        let title = tag.title()?;
        let title = title.trim();
        (!title.is_empty()).then(|| title.to_string())
    }

    fn apply(&self, path: &Path, update: &TagUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }

        let mut tagged = lofty::read_from_path(path).map_err(|e| Error::tag_write(path, e))?;
        if tagged.primary_tag().is_none() {
            let tag_type = tagged.primary_tag_type();
            tagged.insert_tag(Tag::new(tag_type));
        }
        let Some(tag) = tagged.primary_tag_mut() else {
            return Err(Error::tag_write(path, "file format cannot hold tags"));
        };

        if let Some(ordinal) = &update.track {
            tag.set_track(track_value(ordinal.value));
            tag.set_track_total(track_value(ordinal.total));
        }
        if let Some(title) = &update.title {
            tag.set_title(title.clone());
        }
        if let Some(artist) = &update.artist {
            tag.set_artist(artist.clone());
        }
        if let Some(album) = &update.album {
            tag.set_album(album.clone());
        }

        tag.save_to_path(path, WriteOptions::default())
            .map_err(|e| Error::tag_write(path, e))
    }
}
