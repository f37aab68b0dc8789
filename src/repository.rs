//! # Version-Control Operations
//!
//! The orchestrator never shells out directly. Every operation goes through
//! the [`GitOperations`] trait, one method per step a sync strategy can run.
//! Each method receives the descriptor being synchronized, which carries the
//! URL, the target branch and the resolved destination.
//!
//! [`SystemGit`] is the production implementation and wraps the system `git`
//! command from [`crate::git`]. Tests substitute recording mocks to exercise
//! the orchestrator without touching the network.

use crate::error::Result;
use crate::git;
use crate::repo::RepoDescriptor;
use crate::strategy::GitStep;

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Clones the repository into its destination.
    fn clone_repo(&self, repo: &RepoDescriptor) -> Result<()>;

    /// Checks out the repository's target branch.
    fn checkout(&self, repo: &RepoDescriptor) -> Result<()>;

    /// Removes untracked files from the working tree.
    fn clean(&self, repo: &RepoDescriptor) -> Result<()>;

    /// Hard-resets the working tree to the remote target branch.
    fn reset(&self, repo: &RepoDescriptor) -> Result<()>;

    /// Pulls the target branch.
    fn pull(&self, repo: &RepoDescriptor) -> Result<()>;

    /// Fetches all remotes.
    fn fetch_all(&self, repo: &RepoDescriptor) -> Result<()>;

    /// Points `origin` at the repository URL.
    fn set_origin(&self, repo: &RepoDescriptor) -> Result<()>;

    /// Refreshes the remotes of a backup mirror.
    fn update_remote(&self, repo: &RepoDescriptor) -> Result<()>;

    /// Dispatches a single step to the matching operation.
    fn run_step(&self, step: GitStep, repo: &RepoDescriptor) -> Result<()> {
        match step {
            GitStep::Clone => self.clone_repo(repo),
            GitStep::Checkout => self.checkout(repo),
            GitStep::SetOrigin => self.set_origin(repo),
            GitStep::FetchAll => self.fetch_all(repo),
            GitStep::UpdateRemote => self.update_remote(repo),
            GitStep::Clean => self.clean(repo),
            GitStep::Reset => self.reset(repo),
            GitStep::Pull => self.pull(repo),
        }
    }
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command to perform real Git operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGit {
    mirror: bool,
}

impl SystemGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone bare mirrors instead of working trees, for backup runs.
    pub fn mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// The configured branch, or the remote's default branch when empty.
    fn branch(&self, repo: &RepoDescriptor) -> Result<String> {
        match repo.target_branch() {
            Some(branch) => Ok(branch.to_string()),
            None => git::default_branch(repo.destination()?, &repo.url),
        }
    }
}

impl GitOperations for SystemGit {
    fn clone_repo(&self, repo: &RepoDescriptor) -> Result<()> {
        git::clone(&repo.url, repo.destination()?, self.mirror)
    }

    fn checkout(&self, repo: &RepoDescriptor) -> Result<()> {
        let branch = self.branch(repo)?;
        git::checkout(repo.destination()?, &repo.url, &branch)
    }

    fn clean(&self, repo: &RepoDescriptor) -> Result<()> {
        git::clean(repo.destination()?, &repo.url)
    }

    fn reset(&self, repo: &RepoDescriptor) -> Result<()> {
        let branch = self.branch(repo)?;
        git::reset_hard(repo.destination()?, &repo.url, &branch)
    }

    fn pull(&self, repo: &RepoDescriptor) -> Result<()> {
        let branch = self.branch(repo)?;
        git::pull(repo.destination()?, &repo.url, &branch)
    }

    fn fetch_all(&self, repo: &RepoDescriptor) -> Result<()> {
        git::fetch_all(repo.destination()?, &repo.url)
    }

    fn set_origin(&self, repo: &RepoDescriptor) -> Result<()> {
        git::set_origin(repo.destination()?, &repo.url)
    }

    fn update_remote(&self, repo: &RepoDescriptor) -> Result<()> {
        git::update_remote(repo.destination()?, &repo.url)
    }
}
