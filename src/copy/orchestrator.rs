use std::fs;
use std::time::Instant;

use tracing::{debug, error};

use crate::error::{Error, Result};

use super::plan::{CopyJob, CopyPlan};
use super::primitive::ByteCopier;
use super::progress::{Progress, Summary};
use super::tags::TagCodec;

/// Runs a [`CopyPlan`] one job at a time and stops at the first failure.
///
/// A failing job never leaves a half written file behind, so the
/// destination only ever holds complete copies numbered without gaps.
pub struct Orchestrator<'a> {
    copier: &'a dyn ByteCopier,
    codec: &'a dyn TagCodec,
    progress: &'a mut dyn Progress,
    dry_run: bool,
    reverse: bool,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        copier: &'a dyn ByteCopier,
        codec: &'a dyn TagCodec,
        progress: &'a mut dyn Progress,
    ) -> Self {
        Self {
            copier,
            codec,
            progress,
            dry_run: false,
            reverse: false,
        }
    }

    pub fn dry_run(mut self, on: bool) -> Self {
        self.dry_run = on;
        self
    }

    /// Write the last file first. Ordinals stay as planned.
    pub fn reverse(mut self, on: bool) -> Self {
        self.reverse = on;
        self
    }

    fn run_job(&self, job: &CopyJob) -> Result<u64> {
        let dst = job.destination.path();
        fs::create_dir_all(&job.destination.dir)
            .map_err(|e| Error::io("create directory", &job.destination.dir, e))?;

        let bytes = match self.copier.copy(&job.source, &dst) {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = fs::remove_file(&dst);
                return Err(e);
            }
        };
        if !job.tags.is_empty() {
            if let Err(e) = self.codec.apply(&dst, &job.tags) {
                let _ = fs::remove_file(&dst);
                return Err(e);
            }
        }
        Ok(bytes)
    }

    pub fn execute(&mut self, plan: &CopyPlan) -> Result<Summary> {
        let started = Instant::now();
        let total = plan.len();
        let mut summary = Summary {
            dry_run: self.dry_run,
            ..Summary::default()
        };

        let jobs: Box<dyn Iterator<Item = &CopyJob>> = if self.reverse {
            Box::new(plan.jobs().iter().rev())
        } else {
            Box::new(plan.jobs().iter())
        };

        for job in jobs {
            let dst = job.destination.path();
            self.progress
                .about_to_copy(job.ordinal.value, total, &job.source, &dst);

            let bytes = if self.dry_run {
                job.bytes
            } else {
                self.run_job(job).inspect_err(|e| {
                    error!(
                        ordinal = job.ordinal.value,
                        src = %job.source.display(),
                        dst = %dst.display(),
                        error = %e,
                        "copy aborted"
                    );
                })?
            };
            debug!(dst = %dst.display(), bytes, "copied");
            summary.files += 1;
            summary.bytes += bytes;
        }

        summary.elapsed = started.elapsed();
        self.progress.finished(&summary);
        Ok(summary)
    }
}
