//! # Action Resolution
//!
//! Decides what a sync worker does with a repository. The decision is a
//! pure function of whether the destination already exists and of the
//! `backup` and `no_clean` modes:
//!
//! | exists | backup | no_clean | strategy       |
//! |--------|--------|----------|----------------|
//! | no     | any    | any      | `Clone`        |
//! | yes    | yes    | any      | `BackupUpdate` |
//! | yes    | no     | yes      | `FetchOnly`    |
//! | yes    | no     | no       | `CleanPull`    |
//!
//! Each strategy expands into an ordered list of [`GitStep`]s. When a step
//! fails, [`classify_failure`] decides whether the failure is reported as an
//! informational notice or as an issue. Either way the remaining steps for
//! that repository are skipped.

use std::fmt;

use crate::repo::RepoDescriptor;

/// How a single repository is brought up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// Destination is absent: clone it.
    Clone,
    /// Backup mirror exists: refresh its remotes.
    BackupUpdate,
    /// Working tree exists and must not be touched: fetch only.
    FetchOnly,
    /// Working tree exists and is disposable: reset it and pull.
    CleanPull,
}

/// Mode switches that shape the step list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncMode {
    pub backup: bool,
    pub no_clean: bool,
    pub fetch_all: bool,
    /// A branch override is configured, so fresh clones check it out.
    pub branch_override: bool,
}

/// One version-control operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GitStep {
    Clone,
    Checkout,
    SetOrigin,
    FetchAll,
    UpdateRemote,
    Clean,
    Reset,
    Pull,
}

impl fmt::Display for GitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GitStep::Clone => "clone",
            GitStep::Checkout => "checkout",
            GitStep::SetOrigin => "set-origin",
            GitStep::FetchAll => "fetch-all",
            GitStep::UpdateRemote => "update-remote",
            GitStep::Clean => "clean",
            GitStep::Reset => "reset",
            GitStep::Pull => "pull",
        })
    }
}

impl SyncStrategy {
    /// Selects the strategy for a repository.
    pub fn select(exists_locally: bool, mode: &SyncMode) -> Self {
        match (exists_locally, mode.backup, mode.no_clean) {
            (false, _, _) => SyncStrategy::Clone,
            (true, true, _) => SyncStrategy::BackupUpdate,
            (true, false, true) => SyncStrategy::FetchOnly,
            (true, false, false) => SyncStrategy::CleanPull,
        }
    }

    /// The ordered operations this strategy runs.
    pub fn steps(self, mode: &SyncMode) -> Vec<GitStep> {
        let mut steps = match self {
            SyncStrategy::Clone => {
                let mut steps = vec![GitStep::Clone];
                if mode.branch_override {
                    steps.push(GitStep::Checkout);
                }
                steps.push(GitStep::SetOrigin);
                steps
            }
            SyncStrategy::BackupUpdate => return vec![GitStep::UpdateRemote],
            SyncStrategy::FetchOnly => return vec![GitStep::FetchAll],
            SyncStrategy::CleanPull => vec![
                GitStep::Checkout,
                GitStep::Clean,
                GitStep::Reset,
                GitStep::Pull,
            ],
        };
        if mode.fetch_all {
            steps.push(GitStep::FetchAll);
        }
        steps
    }

    /// The verb shown in the per-repository success line.
    pub fn label(self) -> &'static str {
        match self {
            SyncStrategy::Clone => "cloning",
            SyncStrategy::BackupUpdate => "updating remotes of",
            SyncStrategy::FetchOnly => "fetching",
            SyncStrategy::CleanPull => "pulling",
        }
    }

    /// Whether a successful run counts as a new clone rather than an update.
    pub fn is_clone(self) -> bool {
        self == SyncStrategy::Clone
    }
}

/// How a failed step is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Expected, non-fatal condition.
    Info(String),
    /// Something is wrong with this repository.
    Issue(String),
}

/// Classifies a failed `step` on `repo` and renders its message.
///
/// Wiki failures are informational because a provider cannot say whether a
/// wiki actually has content. Checkout failures are informational because
/// the branch may simply not exist yet.
pub fn classify_failure(step: GitStep, repo: &RepoDescriptor, err: &dyn fmt::Display) -> Notice {
    let url = &repo.url;
    let branch = &repo.clone_branch;

    if repo.is_wiki {
        return Notice::Info(format!(
            "Wiki may be enabled but there was no content to clone on Repo: {} Error: {}",
            url, err
        ));
    }

    match step {
        GitStep::Checkout => Notice::Info(format!(
            "Could not checkout out {}, branch may not exist, no changes made Repo: {} Error: {}",
            branch, url, err
        )),
        GitStep::Clone => Notice::Issue(format!(
            "Problem trying to clone Repo: {} Error: {}",
            url, err
        )),
        GitStep::SetOrigin => Notice::Issue(format!(
            "Problem trying to set remote on Repo: {} Error: {}",
            url, err
        )),
        GitStep::FetchAll => Notice::Issue(format!(
            "Could not fetch remotes in Repo: {} Error: {}",
            url, err
        )),
        GitStep::UpdateRemote => Notice::Issue(format!(
            "Could not update remotes in Repo: {} Error: {}",
            url, err
        )),
        GitStep::Clean => Notice::Issue(format!(
            "Problem running git clean: {} Error: {}",
            url, err
        )),
        GitStep::Reset => Notice::Issue(format!(
            "Problem resetting {} Repo: {} Error: {}",
            branch, url, err
        )),
        GitStep::Pull => Notice::Issue(format!(
            "Problem trying to pull {} Repo: {} Error: {}",
            branch, url, err
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode(backup: bool, no_clean: bool) -> SyncMode {
        SyncMode {
            backup,
            no_clean,
            ..SyncMode::default()
        }
    }

    #[test]
    fn test_select_missing_destination_always_clones() {
        for backup in [false, true] {
            for no_clean in [false, true] {
                assert_eq!(
                    SyncStrategy::select(false, &mode(backup, no_clean)),
                    SyncStrategy::Clone
                );
            }
        }
    }

    #[test]
    fn test_select_existing_destination() {
        assert_eq!(
            SyncStrategy::select(true, &mode(true, false)),
            SyncStrategy::BackupUpdate
        );
        assert_eq!(
            SyncStrategy::select(true, &mode(true, true)),
            SyncStrategy::BackupUpdate
        );
        assert_eq!(
            SyncStrategy::select(true, &mode(false, true)),
            SyncStrategy::FetchOnly
        );
        assert_eq!(
            SyncStrategy::select(true, &mode(false, false)),
            SyncStrategy::CleanPull
        );
    }

    #[test]
    fn test_clone_steps_without_branch_override() {
        let steps = SyncStrategy::Clone.steps(&SyncMode::default());
        assert_eq!(steps, vec![GitStep::Clone, GitStep::SetOrigin]);
    }

    #[test]
    fn test_clone_steps_with_branch_override_and_fetch_all() {
        let mode = SyncMode {
            branch_override: true,
            fetch_all: true,
            ..SyncMode::default()
        };
        assert_eq!(
            SyncStrategy::Clone.steps(&mode),
            vec![
                GitStep::Clone,
                GitStep::Checkout,
                GitStep::SetOrigin,
                GitStep::FetchAll
            ]
        );
    }

    #[test]
    fn test_clean_pull_steps_order() {
        assert_eq!(
            SyncStrategy::CleanPull.steps(&SyncMode::default()),
            vec![
                GitStep::Checkout,
                GitStep::Clean,
                GitStep::Reset,
                GitStep::Pull
            ]
        );

        let mode = SyncMode {
            fetch_all: true,
            ..SyncMode::default()
        };
        assert_eq!(
            SyncStrategy::CleanPull.steps(&mode).last(),
            Some(&GitStep::FetchAll)
        );
    }

    #[test]
    fn test_update_strategies_ignore_fetch_all() {
        let mode = SyncMode {
            fetch_all: true,
            branch_override: true,
            ..SyncMode::default()
        };
        assert_eq!(
            SyncStrategy::BackupUpdate.steps(&mode),
            vec![GitStep::UpdateRemote]
        );
        assert_eq!(SyncStrategy::FetchOnly.steps(&mode), vec![GitStep::FetchAll]);
    }

    #[test]
    fn test_labels() {
        assert_eq!(SyncStrategy::CleanPull.label(), "pulling");
        assert_eq!(SyncStrategy::FetchOnly.label(), "fetching");
        assert_eq!(SyncStrategy::Clone.label(), "cloning");
        assert!(SyncStrategy::Clone.is_clone());
        assert!(!SyncStrategy::FetchOnly.is_clone());
    }

    #[test]
    fn test_wiki_failures_are_informational() {
        let repo = RepoDescriptor::new("https://host/org/app.wiki.git").wiki();
        for step in [GitStep::Clone, GitStep::Pull, GitStep::SetOrigin, GitStep::FetchAll] {
            match classify_failure(step, &repo, &"boom") {
                Notice::Info(msg) => assert!(msg.starts_with("Wiki may be enabled")),
                other => panic!("expected info for {}, got {:?}", step, other),
            }
        }
    }

    #[test]
    fn test_checkout_failure_is_informational() {
        let repo = RepoDescriptor::new("https://host/org/app.git").with_branch("feature");
        let notice = classify_failure(GitStep::Checkout, &repo, &"no such branch");
        assert_eq!(
            notice,
            Notice::Info(
                "Could not checkout out feature, branch may not exist, no changes made Repo: https://host/org/app.git Error: no such branch".to_string()
            )
        );
    }

    #[test]
    fn test_other_failures_are_issues() {
        let repo = RepoDescriptor::new("https://host/org/app.git").with_branch("main");
        for step in [
            GitStep::Clone,
            GitStep::SetOrigin,
            GitStep::FetchAll,
            GitStep::UpdateRemote,
            GitStep::Clean,
            GitStep::Reset,
            GitStep::Pull,
        ] {
            match classify_failure(step, &repo, &"boom") {
                Notice::Issue(msg) => {
                    assert!(msg.contains("https://host/org/app.git"));
                    assert!(msg.ends_with("Error: boom"));
                }
                other => panic!("expected issue for {}, got {:?}", step, other),
            }
        }
    }
}
