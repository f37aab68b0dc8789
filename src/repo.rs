//! # Repository Descriptors
//!
//! A [`RepoDescriptor`] describes one remote repository as reported by a
//! provider, together with the local destination it resolves to for the
//! current run.
//!
//! Descriptors are produced once per run, narrowed by the filter pipeline
//! and consumed exactly once by a sync worker. The only field that changes
//! after a provider hands a descriptor over is `host_path`, which is
//! assigned a single time right before the worker touches disk.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

/// One remote repository and its resolved local destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoDescriptor {
    /// Canonical clone URL.
    pub url: String,
    /// Whether this is the wiki companion of a code repository.
    pub is_wiki: bool,
    /// Branch to sync. Empty means the provider's default branch.
    pub clone_branch: String,
    /// Provider-reported path, used when directory structure is preserved.
    pub path: String,
    /// Whether the provider reports the repository as a fork.
    pub is_fork: bool,
    /// Whether the provider reports the repository as archived.
    pub is_archived: bool,
    host_path: Option<PathBuf>,
}

impl RepoDescriptor {
    /// Creates a descriptor for a code repository with the given clone URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Sets the branch to sync.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.clone_branch = branch.into();
        self
    }

    /// Sets the provider-reported path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Marks the descriptor as a wiki companion.
    pub fn wiki(mut self) -> Self {
        self.is_wiki = true;
        self
    }

    /// Marks the descriptor as a fork.
    pub fn fork(mut self) -> Self {
        self.is_fork = true;
        self
    }

    /// Marks the descriptor as archived.
    pub fn archived(mut self) -> Self {
        self.is_archived = true;
        self
    }

    /// The stable directory name derived from the clone URL.
    pub fn app_name(&self) -> &str {
        app_name_from_url(&self.url)
    }

    /// The branch to sync, or `None` for the provider default.
    pub fn target_branch(&self) -> Option<&str> {
        if self.clone_branch.is_empty() {
            None
        } else {
            Some(&self.clone_branch)
        }
    }

    /// Assigns the local destination.
    ///
    /// Only the first assignment takes effect. Returns `false` when a
    /// destination had already been assigned.
    pub fn assign_host_path(&mut self, path: PathBuf) -> bool {
        if self.host_path.is_some() {
            return false;
        }
        self.host_path = Some(path);
        true
    }

    /// The resolved local destination, if assigned.
    pub fn host_path(&self) -> Option<&Path> {
        self.host_path.as_deref()
    }

    /// The resolved local destination, or an error if none was assigned.
    pub fn destination(&self) -> Result<&Path> {
        self.host_path().ok_or_else(|| Error::UnresolvedPath {
            url: self.url.clone(),
        })
    }
}

/// Derives a repository's directory name from its clone URL.
///
/// Takes the last `/`-separated segment and strips its final extension, so
/// `https://github.com/org/app.git` becomes `app` and
/// `git@github.com:org/app.wiki.git` becomes `app.wiki`. A segment without
/// an extension is returned unchanged. Trailing slashes are ignored. The
/// result is empty when nothing but slashes is left.
pub fn app_name_from_url(url: &str) -> &str {
    let trimmed = url.trim_end_matches('/');
    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
    match segment.rfind('.') {
        Some(idx) if idx > 0 => &segment[..idx],
        _ => segment,
    }
}

/// Counts descriptors that are not wikis.
pub fn repo_count(repos: &[RepoDescriptor]) -> usize {
    repos.iter().filter(|r| !r.is_wiki).count()
}
