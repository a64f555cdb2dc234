use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::info;

use crate::cli::CliArgs;
use crate::config::Settings;
use crate::copy::{
    ByteCopier, ConsoleProgress, FsCopier, LoftyCodec, Orchestrator, Planner, Progress, Summary,
    TagCodec, count_report,
};
use crate::error::{Error, Result};
use crate::library::{PlayOrderBuilder, TreeWalker};
use crate::naming::NameDeriver;

mod settings;


/// Fallback album directory name when the source has no usable name.
const DEFAULT_ALBUM_NAME: &str = "album";

/// Run one invocation with the real tag codec, filesystem and console.
pub fn run(args: &CliArgs) -> Result<Summary> {
    let mut settings = settings::load_settings();
    args.apply_to(&mut settings);
    settings.validate().map_err(Error::InvalidSettings)?;

    let copier = FsCopier::new(settings.copy.preserve_mtime);
    let mut progress = ConsoleProgress::new(args.verbose);
    execute(args, &settings, &LoftyCodec, &copier, &mut progress)
}

/// Walk, order, plan and copy, in that order. Nothing is written before
/// the whole plan has been checked.
pub fn execute(
    args: &CliArgs,
    settings: &Settings,
    codec: &dyn TagCodec,
    copier: &dyn ByteCopier,
    progress: &mut dyn Progress,
) -> Result<Summary> {
    let started = Instant::now();
    let source =
        fs::canonicalize(&args.source).map_err(|e| Error::io("read source", &args.source, e))?;

    let tree = TreeWalker::new(&settings.library, settings.order.sort).walk(&source)?;
    let list = PlayOrderBuilder::new(settings.order.dir_order).build(&tree);
    info!(source = %source.display(), files = tree.audio_count(), "walked source");

    if args.count {
        let bytes = list
            .paths()
            .map(|p| {
                fs::metadata(p)
                    .map(|m| m.len())
                    .map_err(|e| Error::io("read metadata", p, e))
            })
            .sum::<Result<u64>>()?;
        let elapsed = started.elapsed();
        println!("{}", count_report(list.len(), bytes, elapsed));
        return Ok(Summary {
            files: list.len(),
            bytes,
            elapsed,
            dry_run: true,
        });
    }

    if list.is_empty() {
        info!(source = %source.display(), "no audio files found");
        return Ok(Summary {
            dry_run: args.dry_run,
            ..Summary::default()
        });
    }

    let deriver = NameDeriver::new(
        &settings.naming,
        settings.copy.layout,
        settings.tags.artist.as_deref(),
    )?;
    let dest_root = prepare_destination(args, settings, &source, &deriver)?;
    let plan = Planner::new(&deriver, codec, &settings.tags)
        .layout(settings.copy.layout)
        .title_source(settings.naming.title_source)
        .prepend_subdir_name(settings.naming.prepend_subdir_name)
        .fallback_album_tag(settings.naming.unified_name.clone())
        .check_existing(!args.dry_run)
        .plan(&list, &dest_root)?;

    Orchestrator::new(copier, codec, progress)
        .dry_run(args.dry_run)
        .reverse(settings.order.reverse)
        .execute(&plan)
}

fn album_source_name(source: &Path) -> String {
    let name = if source.is_file() {
        source.file_stem()
    } else {
        source.file_name()
    };
    name.map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ALBUM_NAME.to_string())
}

/// Resolve the directory files are copied into and make sure it may be
/// used: never inside the source, never an album directory holding the
/// source, never an existing album directory unless overwriting was asked
/// for.
fn prepare_destination(
    args: &CliArgs,
    settings: &Settings,
    source: &Path,
    deriver: &NameDeriver,
) -> Result<PathBuf> {
    let destination = fs::canonicalize(&args.destination)
        .map_err(|e| Error::io("open destination", &args.destination, e))?;
    if !destination.is_dir() {
        return Err(Error::io(
            "open destination",
            destination,
            std::io::Error::other("not a directory"),
        ));
    }

    let root = if settings.copy.create_album_dir {
        let name = deriver.album_dir_name(&album_source_name(source));
        if name.is_empty() {
            destination.join(DEFAULT_ALBUM_NAME)
        } else {
            destination.join(name)
        }
    } else {
        destination
    };

    if source.is_dir() && root.starts_with(source) {
        return Err(Error::DestinationInsideSource {
            destination: root,
            source_root: source.to_path_buf(),
        });
    }
    // The album directory may be replaced, so it must never hold the source.
    if settings.copy.create_album_dir && source.starts_with(&root) {
        return Err(Error::DestinationContainsSource {
            destination: root,
            source_root: source.to_path_buf(),
        });
    }

    if settings.copy.create_album_dir && fs::symlink_metadata(&root).is_ok() {
        if !args.overwrite {
            return Err(Error::DestinationExists(root));
        }
        if !args.dry_run {
            info!(dir = %root.display(), "removing existing album directory");
            fs::remove_dir_all(&root).map_err(|e| Error::io("remove", &root, e))?;
        }
    }

    Ok(root)
}
