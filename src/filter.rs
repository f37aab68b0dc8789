//! # Filter Pipeline
//!
//! Narrows the provider's candidate list down to the repositories that will
//! actually be synchronized. Stages run in a fixed order, each only when
//! configured:
//!
//! 1. **Policy**: wikis are dropped unless wiki cloning is enabled, forks
//!    and archived repositories are dropped when asked to skip them.
//! 2. **Regex**: keeps repositories whose app name contains a match.
//! 3. **Prefix**: keeps repositories whose app name starts with one of the
//!    configured prefixes.
//! 4. **Ignore list**: drops repositories whose URL contains any line of the
//!    ignore file as a literal substring.
//!
//! No stage reorders the surviving descriptors.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, info};
use regex::Regex;

use crate::config::SyncConfig;
use crate::error::{Error, Result};
use crate::repo::RepoDescriptor;

/// Keeps descriptors whose app name matches `pattern` anywhere.
pub fn filter_by_regex(repos: Vec<RepoDescriptor>, pattern: &Regex) -> Vec<RepoDescriptor> {
    repos
        .into_iter()
        .filter(|r| pattern.is_match(r.app_name()))
        .collect()
}

/// Keeps descriptors whose app name starts with any of `prefixes`.
pub fn filter_by_prefix(repos: Vec<RepoDescriptor>, prefixes: &[String]) -> Vec<RepoDescriptor> {
    repos
        .into_iter()
        .filter(|r| prefixes.iter().any(|p| r.app_name().starts_with(p.as_str())))
        .collect()
}

/// Drops descriptors whose URL contains any of `ignored` literally.
pub fn filter_by_ignore_list(repos: Vec<RepoDescriptor>, ignored: &[String]) -> Vec<RepoDescriptor> {
    repos
        .into_iter()
        .filter(|r| !ignored.iter().any(|i| r.url.contains(i.as_str())))
        .collect()
}

/// Parses ignore-file content into its non-blank lines.
pub fn parse_ignore_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads the ignore file.
///
/// Returns `Ok(None)` when the file does not exist. Any other read failure
/// is fatal.
pub fn read_ignore_file(path: &Path) -> Result<Option<Vec<String>>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(parse_ignore_list(&content))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(Error::IgnoreFile {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// The configured filter stages of one run.
#[derive(Debug, Clone, Default)]
pub struct FilterPipeline {
    pub include_wikis: bool,
    pub skip_forks: bool,
    pub skip_archived: bool,
    pub regex: Option<Regex>,
    pub prefixes: Vec<String>,
    pub ignored: Option<Vec<String>>,
}

impl FilterPipeline {
    /// Builds the pipeline from the run configuration.
    ///
    /// Compiles the regex and reads the ignore file, so both an invalid
    /// pattern and an unreadable ignore file surface here.
    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        let regex = config.match_regex.as_deref().map(Regex::new).transpose()?;
        let ignored = read_ignore_file(&config.ignore_file)?;
        if ignored.is_some() {
            debug!("Using ignore file {}", config.ignore_file.display());
        }

        Ok(Self {
            include_wikis: config.clone_wiki,
            skip_forks: config.skip_forks,
            skip_archived: config.skip_archived,
            regex,
            prefixes: config.match_prefixes.clone(),
            ignored,
        })
    }

    fn keep_by_policy(&self, repo: &RepoDescriptor) -> bool {
        (self.include_wikis || !repo.is_wiki)
            && !(self.skip_forks && repo.is_fork)
            && !(self.skip_archived && repo.is_archived)
    }

    /// Runs every configured stage over `repos`.
    pub fn apply(&self, repos: Vec<RepoDescriptor>) -> Vec<RepoDescriptor> {
        let mut repos: Vec<RepoDescriptor> =
            repos.into_iter().filter(|r| self.keep_by_policy(r)).collect();

        if let Some(regex) = &self.regex {
            info!("Filtering repos down by regex that match the provided...");
            repos = filter_by_regex(repos, regex);
        }

        if !self.prefixes.is_empty() {
            info!("Filtering repos down by prefix that match the provided...");
            repos = filter_by_prefix(repos, &self.prefixes);
        }

        if let Some(ignored) = &self.ignored {
            info!("Using ignore file, filtering repos down...");
            repos = filter_by_ignore_list(repos, ignored);
        }

        repos
    }
}
