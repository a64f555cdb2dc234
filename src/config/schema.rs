use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/pcp/config.toml` or `~/.config/pcp/config.toml`
///
/// Precedence (highest wins):
/// 1) Command-line flags (applied by the caller after loading)
/// 2) Environment variables (prefix `PCP__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub order: OrderSettings,
    pub naming: NamingSettings,
    pub tags: TagSettings,
    pub copy: CopySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// When set, only files of this one extension are picked up.
    pub file_type: Option<String>,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: ["mp3", "m4a", "m4b", "ogg", "opus", "flac", "ape", "wma", "wav"]
                .into_iter()
                .map(String::from)
                .collect(),
            file_type: None,
            include_hidden: true,
        }
    }
}

/// Where a directory's own files go relative to its subdirectories.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirOrder {
    /// Descend into every subdirectory, then append the directory's files.
    #[default]
    #[serde(alias = "dirs_first")]
    DirsFirst,
    /// Append the directory's files, then descend into subdirectories.
    #[serde(alias = "files_first")]
    FilesFirst,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Digit runs compare by numeric value, case-insensitive otherwise.
    #[default]
    Natural,
    /// Plain code-point order.
    #[serde(alias = "lex")]
    Lexicographic,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrderSettings {
    pub dir_order: DirOrder,
    pub sort: SortMode,
    /// Write the last file first. Ordinals are unaffected.
    pub reverse: bool,
}

/// Where a file's title comes from when deriving its destination name.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TitleSource {
    /// The title tag, falling back to the file stem.
    #[default]
    Tag,
    #[serde(alias = "file_name", alias = "filename")]
    FileName,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NamingSettings {
    /// Placed between an ordinal and the rest of a name.
    pub separator: String,
    /// Upper bound for a single file or directory name, in bytes.
    pub max_name_len: usize,
    /// Substituted for characters illegal on common destination filesystems.
    pub replacement: String,
    /// Prefix mirrored directories with their position among siblings.
    pub number_dirs: bool,
    /// Keep source names as they are, without ordinals.
    pub strip_decorations: bool,
    /// Drop a leading `<digits><separator>` before applying a new ordinal.
    pub strip_existing_ordinal: bool,
    /// Flat layout only: put `[dir][subdir]` after the ordinal.
    pub prepend_subdir_name: bool,
    pub title_source: TitleSource,
    /// Replaces every file title and the album directory name.
    pub unified_name: Option<String>,
    /// 0..=99, prepended to the album directory name.
    pub album_num: Option<u8>,
}

impl Default for NamingSettings {
    fn default() -> Self {
        Self {
            separator: "-".to_string(),
            max_name_len: 255,
            replacement: "_".to_string(),
            number_dirs: false,
            strip_decorations: false,
            strip_existing_ordinal: true,
            prepend_subdir_name: false,
            title_source: TitleSource::Tag,
            unified_name: None,
            album_num: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TagSettings {
    /// Write `ordinal/total` into the track number field.
    pub track_number: bool,
    /// Flat layout only: write the derived title back into the title tag.
    pub rewrite_title: bool,
    /// Title tag becomes the source file stem.
    pub file_title: bool,
    /// Title tag becomes `<n>><source file stem>`.
    pub file_title_num: bool,
    pub artist: Option<String>,
    pub album: Option<String>,
}

impl Default for TagSettings {
    fn default() -> Self {
        Self {
            track_number: true,
            rewrite_title: false,
            file_title: false,
            file_title_num: false,
            artist: None,
            album: None,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// Every file directly under the destination root.
    #[default]
    Flat,
    /// Mirror the pruned source tree.
    Tree,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CopySettings {
    pub layout: Layout,
    /// Create `<destination>/<album dir>` instead of copying straight into
    /// the destination.
    pub create_album_dir: bool,
    /// Carry the source modification time over to the copy.
    pub preserve_mtime: bool,
}

impl Default for CopySettings {
    fn default() -> Self {
        Self {
            layout: Layout::Flat,
            create_album_dir: true,
            preserve_mtime: true,
        }
    }
}
