//! Command-line interface.
//!
//! Flags only ever switch behavior on; what they do not mention keeps the
//! value from the config file, the environment or the defaults.

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

use crate::config::{DirOrder, Layout, Settings, SortMode};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// One invocation's arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub verbose: bool,
    pub drop_dst: bool,
    pub overwrite: bool,
    pub dry_run: bool,
    pub count: bool,

    pub tree_dst: bool,
    pub drop_tracknumber: bool,
    pub strip_decorations: bool,
    pub file_title: bool,
    pub file_title_num: bool,
    pub sort_lex: bool,
    pub reverse: bool,
    pub prepend_subdir_name: bool,
    pub files_first: bool,
    pub number_dirs: bool,
    pub file_type: Option<String>,
    pub unified_name: Option<String>,
    pub album_num: Option<u8>,
    pub artist_tag: Option<String>,
    pub album_tag: Option<String>,
}

fn flag(id: &'static str, short: char, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .short(short)
        .help(help)
        .action(ArgAction::SetTrue)
}

fn value(id: &'static str, short: char, name: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).short(short).value_name(name).help(help)
}

pub fn command() -> Command {
    Command::new("pcp")
        .version(VERSION)
        .about(DESCRIPTION)
        .arg(
            Arg::new("SOURCE")
                .help("Source directory or single audio file")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("DESTINATION")
                .help("Destination directory")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .index(2),
        )
        .arg(flag("verbose", 'v', "Print one line per copied file"))
        .arg(flag(
            "drop-tracknumber",
            'd',
            "Do not write track numbers into tags",
        ))
        .arg(flag(
            "strip-decorations",
            's',
            "Keep source names without ordinal prefixes",
        ))
        .arg(flag("file-title", 'f', "Use the source file stem as title tag"))
        .arg(flag(
            "file-title-num",
            'F',
            "Use the track number and source file stem as title tag",
        ))
        .arg(flag(
            "sort-lex",
            'x',
            "Sort names by code point instead of natural order",
        ))
        .arg(flag(
            "tree-dst",
            't',
            "Mirror the source tree instead of copying flat",
        ))
        .arg(flag(
            "drop-dst",
            'p',
            "Copy straight into DESTINATION without an album directory",
        ))
        .arg(flag("reverse", 'r', "Copy the last file first"))
        .arg(flag(
            "overwrite",
            'w',
            "Replace an existing album directory",
        ))
        .arg(flag("dry-run", 'y', "Walk and plan without writing anything"))
        .arg(flag(
            "count",
            'c',
            "Count audio files and their volume, copy nothing",
        ))
        .arg(flag(
            "prepend-subdir-name",
            'i',
            "Flat layout: record source directories in file names",
        ))
        .arg(
            Arg::new("files-first")
                .long("files-first")
                .help("Play a directory's own files before its subdirectories")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("number-dirs")
                .long("number-dirs")
                .help("Tree layout: prefix mirrored directories with their position")
                .action(ArgAction::SetTrue),
        )
        .arg(value(
            "file-type",
            'e',
            "EXT",
            "Only copy files with this extension",
        ))
        .arg(value(
            "unified-name",
            'u',
            "NAME",
            "Name every file and the album directory NAME",
        ))
        .arg(
            value("album-num", 'b', "0..99", "Prefix the album directory with a number")
                .value_parser(value_parser!(u8).range(0..=99)),
        )
        .arg(value("artist-tag", 'a', "ARTIST", "Artist tag and name part"))
        .arg(value("album-tag", 'g', "ALBUM", "Album tag"))
}

impl CliArgs {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let string = |id: &str| matches.get_one::<String>(id).cloned();
        Self {
            source: matches.get_one::<PathBuf>("SOURCE").cloned().unwrap_or_default(),
            destination: matches
                .get_one::<PathBuf>("DESTINATION")
                .cloned()
                .unwrap_or_default(),
            verbose: matches.get_flag("verbose"),
            drop_dst: matches.get_flag("drop-dst"),
            overwrite: matches.get_flag("overwrite"),
            dry_run: matches.get_flag("dry-run"),
            count: matches.get_flag("count"),
            tree_dst: matches.get_flag("tree-dst"),
            drop_tracknumber: matches.get_flag("drop-tracknumber"),
            strip_decorations: matches.get_flag("strip-decorations"),
            file_title: matches.get_flag("file-title"),
            file_title_num: matches.get_flag("file-title-num"),
            sort_lex: matches.get_flag("sort-lex"),
            reverse: matches.get_flag("reverse"),
            prepend_subdir_name: matches.get_flag("prepend-subdir-name"),
            files_first: matches.get_flag("files-first"),
            number_dirs: matches.get_flag("number-dirs"),
            file_type: string("file-type"),
            unified_name: string("unified-name"),
            album_num: matches.get_one::<u8>("album-num").copied(),
            artist_tag: string("artist-tag"),
            album_tag: string("album-tag"),
        }
    }

    /// Layer these arguments over loaded settings.
    pub fn apply_to(&self, settings: &mut Settings) {
        if self.tree_dst {
            settings.copy.layout = Layout::Tree;
        }
        if self.drop_dst {
            settings.copy.create_album_dir = false;
        }
        if self.drop_tracknumber {
            settings.tags.track_number = false;
        }
        if self.strip_decorations {
            settings.naming.strip_decorations = true;
        }
        if self.file_title {
            settings.tags.file_title = true;
        }
        if self.file_title_num {
            settings.tags.file_title_num = true;
        }
        if self.sort_lex {
            settings.order.sort = SortMode::Lexicographic;
        }
        if self.reverse {
            settings.order.reverse = true;
        }
        if self.prepend_subdir_name {
            settings.naming.prepend_subdir_name = true;
        }
        if self.files_first {
            settings.order.dir_order = DirOrder::FilesFirst;
        }
        if self.number_dirs {
            settings.naming.number_dirs = true;
        }
        if let Some(ext) = &self.file_type {
            settings.library.file_type = Some(ext.clone());
        }
        if let Some(name) = &self.unified_name {
            settings.naming.unified_name = Some(name.clone());
        }
        if let Some(n) = self.album_num {
            settings.naming.album_num = Some(n);
        }
        if let Some(artist) = &self.artist_tag {
            settings.tags.artist = Some(artist.clone());
        }
        if let Some(album) = &self.album_tag {
            settings.tags.album = Some(album.clone());
        }
    }
}

/// Parse the process arguments; exits on `--help`, `--version` and usage
/// errors.
pub fn parse_args() -> CliArgs {
    CliArgs::from_matches(&command().get_matches())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        command()
            .try_get_matches_from(std::iter::once("pcp").chain(args.iter().copied()))
            .map(|m| CliArgs::from_matches(&m))
    }

    #[test]
    fn positional_paths_are_required() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["/src"]).is_err());

        let args = parse(&["/src", "/dst"]).unwrap();
        assert_eq!(args.source, PathBuf::from("/src"));
        assert_eq!(args.destination, PathBuf::from("/dst"));
        assert!(!args.tree_dst);
        assert!(!args.dry_run);
    }

    #[test]
    fn short_flags_match_long_ones() {
        let short = parse(&["-tvdsfFxprwyci", "/s", "/d"]).unwrap();
        let long = parse(&[
            "--tree-dst",
            "--verbose",
            "--drop-tracknumber",
            "--strip-decorations",
            "--file-title",
            "--file-title-num",
            "--sort-lex",
            "--drop-dst",
            "--reverse",
            "--overwrite",
            "--dry-run",
            "--count",
            "--prepend-subdir-name",
            "/s",
            "/d",
        ])
        .unwrap();
        assert_eq!(short, long);
        assert!(short.tree_dst && short.count && short.prepend_subdir_name);
    }

    #[test]
    fn album_num_is_bounded() {
        assert_eq!(parse(&["-b", "7", "/s", "/d"]).unwrap().album_num, Some(7));
        assert!(parse(&["-b", "100", "/s", "/d"]).is_err());
        assert!(parse(&["-b", "x", "/s", "/d"]).is_err());
    }

    #[test]
    fn help_and_version_are_not_failures() {
        let help = parse(&["--help"]).unwrap_err();
        assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
        assert_eq!(help.exit_code(), 0);
        let version = parse(&["-V"]).unwrap_err();
        assert_eq!(version.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn arguments_override_settings() {
        let args = parse(&[
            "-t",
            "-x",
            "-d",
            "--files-first",
            "--number-dirs",
            "-e",
            "ogg",
            "-u",
            "Wine",
            "-a",
            "Ray",
            "-g",
            "Album",
            "-p",
            "/s",
            "/d",
        ])
        .unwrap();
        let mut settings = Settings::default();
        args.apply_to(&mut settings);

        assert_eq!(settings.copy.layout, Layout::Tree);
        assert_eq!(settings.order.sort, SortMode::Lexicographic);
        assert_eq!(settings.order.dir_order, DirOrder::FilesFirst);
        assert!(settings.naming.number_dirs);
        assert!(!settings.tags.track_number);
        assert!(!settings.copy.create_album_dir);
        assert_eq!(settings.library.file_type.as_deref(), Some("ogg"));
        assert_eq!(settings.naming.unified_name.as_deref(), Some("Wine"));
        assert_eq!(settings.tags.artist.as_deref(), Some("Ray"));
        assert_eq!(settings.tags.album.as_deref(), Some("Album"));
    }

    #[test]
    fn absent_flags_keep_configured_values() {
        let args = parse(&["/s", "/d"]).unwrap();
        let mut settings = Settings::default();
        settings.copy.layout = Layout::Tree;
        settings.tags.track_number = false;
        args.apply_to(&mut settings);

        assert_eq!(settings.copy.layout, Layout::Tree);
        assert!(!settings.tags.track_number);
    }

    #[test]
    fn command_definition_is_consistent() {
        command().debug_assert();
    }
}
