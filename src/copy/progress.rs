use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use crossterm::style::Stylize;

/// Outcome of one run, handed to [`Progress::finished`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    pub bytes: u64,
    pub elapsed: Duration,
    pub dry_run: bool,
}

/// Observer of the copy loop. It cannot influence the run.
pub trait Progress {
    fn about_to_copy(&mut self, position: usize, total: usize, src: &Path, dst: &Path);
    fn finished(&mut self, summary: &Summary);
}

/// Progress on stdout: one line per file when verbose, a row of dots
/// otherwise.
pub struct ConsoleProgress {
    verbose: bool,
    started: bool,
}

impl ConsoleProgress {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            started: false,
        }
    }
}

/// One verbose progress line: `  12/120 ✔ <src> -> <dst>`.
pub(crate) fn copy_line(position: usize, total: usize, src: &Path, dst: &Path) -> String {
    format!(
        "{position:>4}/{total} {} {} -> {}",
        "✔".green(),
        src.display(),
        dst.display()
    )
}

impl Progress for ConsoleProgress {
    fn about_to_copy(&mut self, position: usize, total: usize, src: &Path, dst: &Path) {
        let mut out = io::stdout().lock();
        // Progress output is best effort; a closed stdout must not stop a copy.
        if self.verbose {
            let _ = writeln!(out, "{}", copy_line(position, total, src, dst));
        } else {
            if !self.started {
                let _ = write!(out, "Starting ");
            }
            let _ = write!(out, ".");
            let _ = out.flush();
        }
        self.started = true;
    }

    fn finished(&mut self, summary: &Summary) {
        let done = format!(
            "Done ({}, {}; {:.1}s){}.",
            summary.files,
            human_bytes(summary.bytes),
            summary.elapsed.as_secs_f64(),
            if summary.dry_run { ", dry run" } else { "" }
        );
        let lead = if self.started && !self.verbose { " " } else { "" };
        println!("{lead}{}", done.bold());
    }
}

/// Human readable byte count: `1800` is `2kB`, `123456789` is `117.7MB`.
pub fn human_bytes(bytes: u64) -> String {
    const UNITS: [(&str, usize); 6] = [
        ("", 0),
        ("kB", 0),
        ("MB", 1),
        ("GB", 2),
        ("TB", 2),
        ("PB", 2),
    ];
    if bytes <= 1 {
        return bytes.to_string();
    }
    let mut exponent = 0;
    while exponent + 1 < UNITS.len() && bytes >= 1u64 << (10 * (exponent + 1)) {
        exponent += 1;
    }
    let (unit, decimals) = UNITS[exponent];
    let quotient = bytes as f64 / (1u64 << (10 * exponent)) as f64;
    format!("{quotient:.decimals$}{unit}")
}

/// Line printed by count mode instead of copying.
pub fn count_report(files: usize, bytes: u64, elapsed: Duration) -> String {
    let average = if files == 0 { 0 } else { bytes / files as u64 };
    format!(
        "Valid: {files} file(s); Volume: {}; Average: {}; Time: {:.1}s",
        human_bytes(bytes),
        human_bytes(average),
        elapsed.as_secs_f64()
    )
}
