//! # Repository Synchronization
//!
//! The [`Synchronizer`] drives one run end to end:
//!
//! 1. **Filter**: narrow the provider's candidates with the
//!    [`FilterPipeline`]. An empty result aborts the run.
//! 2. **Dry run**: when enabled, report what would be cloned and stop
//!    without touching disk or invoking git.
//! 3. **Prepare**: create the parent destination directory.
//! 4. **Execute**: hand every descriptor to the [`BoundedExecutor`]. Each
//!    worker resolves the descriptor's local destination, picks a
//!    [`SyncStrategy`], runs its steps through [`GitOperations`] and records
//!    the outcome.
//!
//! Per-repository failures never abort the run. They end up in the
//! [`Summary`] as informational notices or issues.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use log::{debug, error, info, warn};

use crate::config::SyncConfig;
use crate::error::{Error, Result};
use crate::executor::BoundedExecutor;
use crate::filter::FilterPipeline;
use crate::outcome::{Outcomes, Summary};
use crate::output::{OutputConfig, Tone};
use crate::repo::RepoDescriptor;
use crate::report::DryRunReport;
use crate::repository::GitOperations;
use crate::strategy::{classify_failure, SyncMode, SyncStrategy};

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing was executed.
    DryRun(DryRunReport),
    /// Every descriptor was processed.
    Completed(Summary),
}

/// Orchestrates the synchronization of a repository list.
pub struct Synchronizer<'a> {
    config: &'a SyncConfig,
    git: &'a dyn GitOperations,
    progress: Option<&'a OutputConfig>,
}

impl<'a> Synchronizer<'a> {
    pub fn new(config: &'a SyncConfig, git: &'a dyn GitOperations) -> Self {
        Self {
            config,
            git,
            progress: None,
        }
    }

    /// Print a success line to stdout for every repository as it finishes.
    pub fn with_progress(mut self, style: &'a OutputConfig) -> Self {
        self.progress = Some(style);
        self
    }

    fn mode(&self) -> SyncMode {
        SyncMode {
            backup: self.config.backup,
            no_clean: self.config.no_clean,
            fetch_all: self.config.fetch_all,
            branch_override: self.config.branch.is_some(),
        }
    }

    /// Filters `candidates` down to the repositories this run will touch.
    pub fn prepare(&self, candidates: Vec<RepoDescriptor>) -> Result<Vec<RepoDescriptor>> {
        let pipeline = FilterPipeline::from_config(self.config)?;
        let repos = pipeline.apply(candidates);

        if repos.is_empty() {
            return Err(Error::NoRepositories {
                target: self.config.target.clone(),
            });
        }

        Ok(repos)
    }

    /// Synchronizes already filtered repositories, or describes them in a
    /// dry run.
    pub fn execute(&self, repos: Vec<RepoDescriptor>) -> Result<RunOutcome> {
        let destination = self.config.destination();

        if self.config.dry_run {
            return Ok(RunOutcome::DryRun(DryRunReport {
                urls: repos.into_iter().map(|r| r.url).collect(),
                destination,
            }));
        }

        fs::create_dir_all(&destination)?;
        let summary = self.synchronize(repos, self.config.concurrency)?;
        Ok(RunOutcome::Completed(summary))
    }

    /// Runs the whole control flow over the provider's candidates.
    pub fn run(&self, candidates: Vec<RepoDescriptor>) -> Result<RunOutcome> {
        let repos = self.prepare(candidates)?;
        self.execute(repos)
    }

    /// Synchronizes every descriptor with at most `concurrency` in flight.
    ///
    /// Returns once all of them have finished.
    pub fn synchronize(&self, repos: Vec<RepoDescriptor>, concurrency: usize) -> Result<Summary> {
        let executor = BoundedExecutor::new(concurrency)?;
        let outcomes = Outcomes::new();
        let mode = self.mode();

        info!(
            "Synchronizing {} repos with concurrency {}",
            repos.len(),
            executor.limit()
        );

        executor.run(repos, |repo| {
            let url = repo.url.clone();
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                self.sync_one(repo, &mode, &outcomes)
            }));
            if result.is_err() {
                error!("Sync worker for {} panicked", url);
                outcomes.error(format!(
                    "A sync worker stopped unexpectedly while syncing {}, repository state unknown",
                    url
                ));
            }
        });

        let summary = outcomes.into_summary();
        if summary.has_issues() {
            warn!("{} repositories reported issues", summary.errors.len());
        }
        Ok(summary)
    }

    /// The local destination of `repo` for this run, or `None` when no
    /// directory name can be derived from it.
    pub fn host_path_for(&self, repo: &RepoDescriptor) -> Option<PathBuf> {
        let preserved = repo.path.trim_matches('/');
        let name = if self.config.preserve_dir && !preserved.is_empty() {
            preserved
        } else {
            repo.app_name()
        };
        if name.is_empty() {
            return None;
        }

        let destination = self.config.destination();
        if repo.is_wiki && !name.ends_with(".wiki") {
            Some(destination.join(format!("{}.wiki", name)))
        } else {
            Some(destination.join(name))
        }
    }

    fn sync_one(&self, mut repo: RepoDescriptor, mode: &SyncMode, outcomes: &Outcomes) {
        // Git must never run in the parent folder itself.
        let Some(host_path) = self.host_path_for(&repo) else {
            outcomes.error(format!(
                "Could not derive a local directory for {}, skipping",
                repo.url
            ));
            return;
        };
        let exists = host_path.exists();
        repo.assign_host_path(host_path);

        let strategy = SyncStrategy::select(exists, mode);
        debug!("{} {} ({:?})", strategy.label(), repo.url, strategy);

        for step in strategy.steps(mode) {
            if let Err(err) = self.git.run_step(step, &repo) {
                debug!("{} failed for {}: {}", step, repo.url, err);
                outcomes.notice(classify_failure(step, &repo, &err));
                return;
            }
        }

        if strategy.is_clone() {
            outcomes.record_cloned();
        } else {
            outcomes.record_pulled();
        }

        let line = success_line(strategy, &repo);
        match self.progress {
            Some(style) => println!("{}", style.paint(Tone::Success, &line)),
            None => info!("{}", line),
        }
    }
}

fn success_line(strategy: SyncStrategy, repo: &RepoDescriptor) -> String {
    format!(
        "Success {} repo: {} -> branch: {}",
        strategy.label(),
        repo.url,
        repo.target_branch().unwrap_or("default branch")
    )
}
