use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use super::model::EntryKind;
use super::natural::compare as natural_compare;
use super::walk::{audio_extensions, is_audio_file};
use super::*;
use crate::config::{DirOrder, LibrarySettings, SortMode};
use crate::error::Error;

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"not really audio").unwrap();
}

fn play_order(root: &Path, settings: &LibrarySettings, dir_order: DirOrder) -> Vec<PathBuf> {
    let tree = TreeWalker::new(settings, SortMode::Natural)
        .walk(root)
        .unwrap();
    PlayOrderBuilder::new(dir_order)
        .build(&tree)
        .paths()
        .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
        .collect()
}

fn rel(parts: &[&str]) -> Vec<PathBuf> {
    parts.iter().map(PathBuf::from).collect()
}

#[test]
fn natural_order_compares_digit_runs_by_value() {
    let mut names = vec!["track2.mp3", "track10.mp3", "track1.mp3"];
    names.sort_by(|a, b| natural_compare(a, b));
    assert_eq!(names, vec!["track1.mp3", "track2.mp3", "track10.mp3"]);

    assert_eq!(natural_compare("chapter 9", "chapter 10"), Ordering::Less);
    assert_eq!(
        natural_compare("part 99999999999999999999999", "part 100000000000000000000000"),
        Ordering::Less
    );
}

#[test]
fn natural_order_puts_padded_numbers_first_among_equal_values() {
    assert_eq!(natural_compare("02", "2"), Ordering::Less);
    assert_eq!(natural_compare("2", "02"), Ordering::Greater);
    assert_eq!(natural_compare("a02b", "a2b"), Ordering::Less);
    // Value still wins over padding.
    assert_eq!(natural_compare("03", "2"), Ordering::Greater);
}

#[test]
fn natural_order_is_case_insensitive_then_exact() {
    assert_eq!(natural_compare("ABC", "abd"), Ordering::Less);
    assert_eq!(natural_compare("Intro", "intro"), Ordering::Less);
    assert_eq!(natural_compare("intro", "intro"), Ordering::Equal);
}

#[test]
fn natural_order_sorts_empty_first() {
    assert_eq!(natural_compare("", "a"), Ordering::Less);
    assert_eq!(natural_compare("", "0"), Ordering::Less);
    assert_eq!(natural_compare("", ""), Ordering::Equal);
}

#[test]
fn natural_order_is_a_total_order_over_a_mixed_sample() {
    let sample = [
        "", "a", "A", "a1", "a01", "a2", "a10", "a010", "b", "B1", "1", "01", "001", "2", "10",
        "x_1", "x-1", "x 1", "x1y", "x1Y", "é", "É", "track10.mp3", "track2.mp3", "Track2.mp3",
        "1 - ch1", "02 - intro", "10 - ch2",
    ];

    for a in sample {
        assert_eq!(natural_compare(a, a), Ordering::Equal, "{a:?}");
        for b in sample {
            let ab = natural_compare(a, b);
            assert_eq!(ab, natural_compare(b, a).reverse(), "{a:?} vs {b:?}");
            if a != b {
                assert_ne!(ab, Ordering::Equal, "{a:?} vs {b:?}");
            }
            for c in sample {
                if ab == Ordering::Less && natural_compare(b, c) == Ordering::Less {
                    assert_eq!(
                        natural_compare(a, c),
                        Ordering::Less,
                        "{a:?} < {b:?} < {c:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn lexicographic_mode_uses_code_points() {
    assert_eq!(
        SortMode::Lexicographic.compare("track10", "track2"),
        Ordering::Less
    );
    assert_eq!(SortMode::Natural.compare("track10", "track2"), Ordering::Greater);
}

#[test]
fn files_compare_by_stem_before_extension() {
    let mode = SortMode::Natural;
    assert_eq!(
        mode.compare_files(Path::new("/a/2.mp3"), Path::new("/a/10.flac")),
        Ordering::Less
    );
    assert_eq!(
        mode.compare_files(Path::new("/a/intro.mp3"), Path::new("/a/intro.ogg")),
        Ordering::Less
    );
}

#[test]
fn audio_extensions_honor_file_type_filter() {
    let mut settings = LibrarySettings::default();
    assert!(is_audio_file(Path::new("/x/a.MP3"), &audio_extensions(&settings)));
    assert!(is_audio_file(Path::new("/x/a.m4b"), &audio_extensions(&settings)));
    assert!(!is_audio_file(Path::new("/x/a.txt"), &audio_extensions(&settings)));
    assert!(!is_audio_file(Path::new("/x/a"), &audio_extensions(&settings)));

    settings.file_type = Some(".Ogg".to_string());
    let exts = audio_extensions(&settings);
    assert_eq!(exts, vec!["ogg".to_string()]);
    assert!(!is_audio_file(Path::new("/x/a.mp3"), &exts));
    assert!(is_audio_file(Path::new("/x/a.ogg"), &exts));
}

#[test]
fn walk_lists_sorted_audio_files_and_ignores_the_rest() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("track10.mp3"));
    touch(&root.join("track2.mp3"));
    touch(&root.join("cover.jpg"));
    touch(&root.join("notes.txt"));
    touch(&root.join("Disc 10").join("a.mp3"));
    touch(&root.join("Disc 9").join("a.mp3"));

    let tree = TreeWalker::new(&LibrarySettings::default(), SortMode::Natural)
        .walk(root)
        .unwrap();
    let listing = tree.listing(root).unwrap();

    let files: Vec<String> = listing.files.iter().map(|f| f.name()).collect();
    assert_eq!(files, vec!["track2.mp3", "track10.mp3"]);
    let dirs: Vec<String> = listing.dirs.iter().map(|d| d.name()).collect();
    assert_eq!(dirs, vec!["Disc 9", "Disc 10"]);
    assert!(listing.files.iter().all(|f| f.kind == EntryKind::Audio));
    assert!(listing.dirs.iter().all(|d| d.kind == EntryKind::Directory));
    assert_eq!(tree.audio_count(), 4);
}

#[test]
fn walk_of_a_missing_root_is_not_found() {
    let dir = tempdir().unwrap();
    let err = TreeWalker::new(&LibrarySettings::default(), SortMode::Natural)
        .walk(&dir.path().join("nope"))
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }), "{err}");
}

#[test]
fn walk_of_a_single_audio_file_yields_one_entry() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("lecture.mp3");
    touch(&file);

    let tree = TreeWalker::new(&LibrarySettings::default(), SortMode::Natural)
        .walk(&file)
        .unwrap();
    assert_eq!(tree.root(), dir.path());
    let list = PlayOrderBuilder::new(DirOrder::DirsFirst).build(&tree);
    assert_eq!(list.paths().collect::<Vec<_>>(), vec![file.as_path()]);
    assert!(list.iter().all(|e| e.lineage.is_empty()));
}

#[test]
fn walk_of_a_non_audio_file_is_empty() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("readme.txt");
    touch(&file);

    let tree = TreeWalker::new(&LibrarySettings::default(), SortMode::Natural)
        .walk(&file)
        .unwrap();
    assert_eq!(tree.audio_count(), 0);
    assert!(PlayOrderBuilder::new(DirOrder::DirsFirst).build(&tree).is_empty());
}

#[test]
fn walk_skips_hidden_entries_when_configured() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("a.mp3"));
    touch(&root.join(".b.mp3"));
    touch(&root.join(".trash").join("c.mp3"));

    let mut settings = LibrarySettings::default();
    assert_eq!(play_order(root, &settings, DirOrder::DirsFirst).len(), 3);

    settings.include_hidden = false;
    assert_eq!(
        play_order(root, &settings, DirOrder::DirsFirst),
        rel(&["a.mp3"])
    );
}

#[cfg(unix)]
#[test]
fn walk_does_not_enter_linked_directories_but_keeps_linked_files() {
    use std::os::unix::fs::symlink;

    let dir = tempdir().unwrap();
    let outside = tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("cd1").join("01.mp3"));
    touch(&outside.path().join("bonus.mp3"));
    symlink(root.join("cd1"), root.join("loop")).unwrap();
    symlink(outside.path().join("bonus.mp3"), root.join("bonus.mp3")).unwrap();

    assert_eq!(
        play_order(root, &LibrarySettings::default(), DirOrder::DirsFirst),
        rel(&["cd1/01.mp3", "bonus.mp3"])
    );
}

#[cfg(unix)]
#[test]
fn walk_reports_unreadable_subdirectories_as_access_denied() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("cd1").join("01.mp3"));
    let locked = root.join("locked");
    touch(&locked.join("02.mp3"));
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits do not bind a privileged user.
    let readable = fs::read_dir(&locked).is_ok();
    let result = if readable {
        None
    } else {
        Some(TreeWalker::new(&LibrarySettings::default(), SortMode::Natural).walk(root))
    };
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let Some(result) = result else {
        return;
    };
    match result {
        Err(Error::AccessDenied { path, .. }) => assert_eq!(path, locked),
        Err(other) => panic!("unexpected {other}"),
        Ok(_) => panic!("walk of an unreadable directory succeeded"),
    }
}

fn album_fixture(root: &Path) {
    touch(&root.join("intro.mp3"));
    touch(&root.join("cd1").join("02.mp3"));
    touch(&root.join("cd1").join("01.mp3"));
    touch(&root.join("cd2").join("a.mp3"));
    touch(&root.join("artwork").join("front.jpg"));
    fs::create_dir_all(root.join("empty").join("deeper")).unwrap();
}

#[test]
fn play_order_descends_before_own_files_by_default() {
    let dir = tempdir().unwrap();
    album_fixture(dir.path());

    assert_eq!(
        play_order(dir.path(), &LibrarySettings::default(), DirOrder::DirsFirst),
        rel(&["cd1/01.mp3", "cd1/02.mp3", "cd2/a.mp3", "intro.mp3"])
    );
}

#[test]
fn play_order_can_put_own_files_first() {
    let dir = tempdir().unwrap();
    album_fixture(dir.path());

    assert_eq!(
        play_order(dir.path(), &LibrarySettings::default(), DirOrder::FilesFirst),
        rel(&["intro.mp3", "cd1/01.mp3", "cd1/02.mp3", "cd2/a.mp3"])
    );
}

#[test]
fn play_order_prunes_directories_without_audio() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    album_fixture(root);

    let tree = TreeWalker::new(&LibrarySettings::default(), SortMode::Natural)
        .walk(root)
        .unwrap();
    let list = PlayOrderBuilder::new(DirOrder::DirsFirst).build(&tree);

    assert_eq!(list.len(), 4);
    let cd2 = list
        .iter()
        .find(|e| e.entry.name() == "a.mp3")
        .unwrap();
    // "artwork" and "empty" do not take sibling positions.
    assert_eq!(
        cd2.lineage,
        vec![DirStep {
            name: "cd2".to_string(),
            position: 2,
            siblings: 2,
        }]
    );
    let intro = list.iter().find(|e| e.entry.name() == "intro.mp3").unwrap();
    assert!(intro.lineage.is_empty());
}

#[test]
fn play_order_records_nested_lineage() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("Book").join("Part 2").join("x.mp3"));
    touch(&root.join("Book").join("Part 10").join("y.mp3"));

    let tree = TreeWalker::new(&LibrarySettings::default(), SortMode::Natural)
        .walk(root)
        .unwrap();
    let list = PlayOrderBuilder::new(DirOrder::DirsFirst).build(&tree);
    let y = list.iter().last().unwrap();

    assert_eq!(y.entry.name(), "y.mp3");
    assert_eq!(y.entry.depth, 3);
    assert_eq!(
        y.lineage,
        vec![
            DirStep {
                name: "Book".to_string(),
                position: 1,
                siblings: 1,
            },
            DirStep {
                name: "Part 10".to_string(),
                position: 2,
                siblings: 2,
            },
        ]
    );
}

#[test]
fn play_order_of_an_empty_tree_is_empty() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("a").join("b")).unwrap();
    assert!(play_order(dir.path(), &LibrarySettings::default(), DirOrder::DirsFirst).is_empty());
}
