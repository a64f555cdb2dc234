use regex::Regex;

use crate::config::{Layout, NamingSettings};
use crate::error::{Error, Result};
use crate::library::DirStep;

use super::numbering::{Ordinal, digits};
use super::sanitize::{sanitize, truncate};

/// Mirrored directories are padded to at least this many digits.
const DIR_ORDINAL_WIDTH: usize = 3;

/// Builds destination names for files, mirrored directories and the album
/// directory from one run's naming settings.
#[derive(Debug, Clone)]
pub struct NameDeriver {
    separator: String,
    replacement: String,
    max_len: usize,
    number_dirs: bool,
    decorate: bool,
    strip_existing: bool,
    /// Sanitized `<unified>[ - <artist>]`, replacing every file title.
    unified_body: Option<String>,
    /// Sanitized `[<artist> - ]<unified>`.
    unified_album: Option<String>,
    album_num: Option<u8>,
    existing_ordinal: Regex,
}

impl NameDeriver {
    /// Decorations are only ever stripped in the tree layout; flat copies
    /// rely on the ordinal prefix for both order and uniqueness.
    pub fn new(naming: &NamingSettings, layout: Layout, artist: Option<&str>) -> Result<Self> {
        let strip_decorations = naming.strip_decorations && layout == Layout::Tree;
        let pattern = format!(r"^\d+{}", regex::escape(&naming.separator));
        let existing_ordinal =
            Regex::new(&pattern).map_err(|e| Error::InvalidSettings(e.to_string()))?;

        let artist = artist.map(str::trim).filter(|a| !a.is_empty());
        let unified = naming
            .unified_name
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());
        let unified_body = unified.map(|u| {
            let body = match artist {
                Some(a) => format!("{u} - {a}"),
                None => u.to_string(),
            };
            sanitize(&body, &naming.replacement)
        });
        let unified_album = unified.map(|u| {
            let name = match artist {
                Some(a) => format!("{a} - {u}"),
                None => u.to_string(),
            };
            sanitize(&name, &naming.replacement)
        });

        Ok(Self {
            separator: naming.separator.clone(),
            replacement: naming.replacement.clone(),
            max_len: naming.max_name_len,
            number_dirs: naming.number_dirs,
            decorate: !strip_decorations,
            strip_existing: naming.strip_existing_ordinal && !strip_decorations,
            unified_body,
            unified_album,
            album_num: naming.album_num,
            existing_ordinal,
        })
    }

    fn strip_ordinal<'a>(&self, name: &'a str) -> &'a str {
        if !self.strip_existing {
            return name;
        }
        match self.existing_ordinal.find(name) {
            Some(m) => &name[m.end()..],
            None => name,
        }
    }

    /// Title for a file that has no usable title tag. A previously applied
    /// ordinal is dropped so renaming an already renamed tree is stable.
    pub fn title_from_stem(&self, stem: &str) -> String {
        if self.strip_existing && !stem.is_empty() && stem.chars().all(|c| c.is_ascii_digit()) {
            return String::new();
        }
        self.strip_ordinal(stem).to_string()
    }

    /// The part of a file name that follows the ordinal, before truncation.
    pub fn body(&self, title: &str) -> String {
        match &self.unified_body {
            Some(unified) => unified.clone(),
            None => sanitize(title, &self.replacement),
        }
    }

    /// Destination file name: `<ordinal><sep>[<dirs><sep>]<title>.<ext>`.
    ///
    /// `subdirs` is non-empty only when the flat layout records the source
    /// directories in the name. Only the title is ever shortened.
    pub fn file_name(&self, ordinal: &Ordinal, title: &str, ext: &str, subdirs: &[DirStep]) -> String {
        let ext = if ext.is_empty() {
            String::new()
        } else {
            format!(".{ext}")
        };

        let mut prefix = String::new();
        if self.decorate {
            prefix.push_str(&ordinal.to_string());
            if !subdirs.is_empty() {
                let names: Vec<String> = subdirs
                    .iter()
                    .map(|d| sanitize(&d.name, &self.replacement))
                    .collect();
                prefix.push_str(&self.separator);
                prefix.push('[');
                prefix.push_str(&names.join("]["));
                prefix.push(']');
            }
        }

        let body = self.body(title);
        let joiner = if prefix.is_empty() || body.is_empty() {
            ""
        } else {
            self.separator.as_str()
        };
        let budget = self
            .max_len
            .saturating_sub(prefix.len() + joiner.len() + ext.len());
        let body = truncate(&body, budget);
        let joiner = if body.is_empty() { "" } else { joiner };

        format!("{prefix}{joiner}{body}{ext}")
    }

    /// Destination name of a mirrored source directory.
    pub fn dir_name(&self, step: &DirStep) -> String {
        let numbered = self.decorate && self.number_dirs;
        let name = sanitize(&step.name, &self.replacement);
        let name = if numbered {
            self.strip_ordinal(&name).trim().to_string()
        } else {
            name
        };

        let width = digits(step.siblings).max(DIR_ORDINAL_WIDTH);
        let position = format!("{:0width$}", step.position);
        if !numbered {
            return if name.is_empty() {
                position
            } else {
                truncate(&name, self.max_len).to_string()
            };
        }
        if name.is_empty() {
            return position;
        }
        let budget = self
            .max_len
            .saturating_sub(position.len() + self.separator.len());
        let name = truncate(&name, budget);
        if name.is_empty() {
            position
        } else {
            format!("{position}{}{name}", self.separator)
        }
    }

    /// Name of the directory created under the destination for the whole
    /// album: `[NN<sep>]` followed by the unified name or `source_name`.
    pub fn album_dir_name(&self, source_name: &str) -> String {
        let base = match &self.unified_album {
            Some(unified) => unified.clone(),
            None => sanitize(source_name, &self.replacement),
        };
        let prefix = self
            .album_num
            .map(|n| format!("{n:02}{}", self.separator))
            .unwrap_or_default();
        let budget = self.max_len.saturating_sub(prefix.len());
        format!("{prefix}{}", truncate(&base, budget))
    }
}
