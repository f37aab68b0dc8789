//! # Repository Providers
//!
//! A provider turns an org or user name into the candidate list of
//! [`RepoDescriptor`]s for a run. Talking to a hosting service's API is out
//! of scope for this crate, so the shipped implementation reads a manifest
//! file that lists repositories per org and per user:
//!
//! ```yaml
//! orgs:
//!   acme:
//!     - name: api
//!       clone_url: https://git.example.com/acme/api.git
//!       ssh_url: git@git.example.com:acme/api.git
//!       default_branch: main
//!       has_wiki: true
//! users:
//!   jdoe:
//!     - name: dotfiles
//!       clone_url: https://git.example.com/jdoe/dotfiles.git
//!       fork: true
//! ```
//!
//! Manifests ending in `.json` are parsed as JSON, anything else as YAML.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::config::{CloneType, Protocol, SyncConfig};
use crate::error::{Error, Result};
use crate::repo::RepoDescriptor;

/// Source of candidate repositories.
pub trait RepoProvider {
    /// Lists every repository belonging to an organization.
    fn list_org_repos(&self, org: &str) -> Result<Vec<RepoDescriptor>>;

    /// Lists every repository belonging to a user.
    fn list_user_repos(&self, user: &str) -> Result<Vec<RepoDescriptor>>;

    /// Lists the repositories for the configured target.
    fn list_for(&self, config: &SyncConfig) -> Result<Vec<RepoDescriptor>> {
        match config.clone_type {
            CloneType::Org => self.list_org_repos(&config.target),
            CloneType::User => self.list_user_repos(&config.target),
        }
    }
}

/// Per-run settings that shape the descriptors a provider emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOptions {
    pub protocol: Protocol,
    /// Branch override applied to every descriptor.
    pub branch: Option<String>,
    /// Emit wiki companions for repositories that have a wiki.
    pub clone_wiki: bool,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            protocol: Protocol::Https,
            branch: None,
            clone_wiki: false,
        }
    }
}

impl From<&SyncConfig> for ProviderOptions {
    fn from(config: &SyncConfig) -> Self {
        Self {
            protocol: config.protocol,
            branch: config.branch.clone(),
            clone_wiki: config.clone_wiki,
        }
    }
}

/// One repository entry of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
    pub name: String,
    pub clone_url: String,
    #[serde(default)]
    pub ssh_url: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub has_wiki: bool,
}

/// Repositories listed per org and per user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    pub orgs: BTreeMap<String, Vec<ManifestEntry>>,
    pub users: BTreeMap<String, Vec<ManifestEntry>>,
}

impl Manifest {
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }
}

/// Wiki clone URL for a repository clone URL.
fn wiki_url(url: &str) -> String {
    match url.strip_suffix(".git") {
        Some(base) => format!("{}.wiki.git", base),
        None => format!("{}.wiki", url),
    }
}

/// A [`RepoProvider`] backed by a [`Manifest`].
#[derive(Debug, Clone)]
pub struct ManifestProvider {
    manifest: Manifest,
    options: ProviderOptions,
}

impl ManifestProvider {
    pub fn new(manifest: Manifest, options: ProviderOptions) -> Self {
        Self { manifest, options }
    }

    pub fn from_file<P: AsRef<Path>>(path: P, options: ProviderOptions) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading manifest {}", path.display());
        Ok(Self::new(Manifest::from_file(path)?, options))
    }

    fn descriptors(&self, entries: Option<&Vec<ManifestEntry>>) -> Result<Vec<RepoDescriptor>> {
        let Some(entries) = entries else {
            return Ok(Vec::new());
        };

        let mut repos = Vec::with_capacity(entries.len());
        for entry in entries {
            let url = match self.options.protocol {
                Protocol::Https => entry.clone_url.clone(),
                Protocol::Ssh => entry.ssh_url.clone().ok_or_else(|| Error::Provider {
                    message: format!("repository {} has no ssh_url", entry.name),
                })?,
            };
            let branch = self
                .options
                .branch
                .clone()
                .or_else(|| entry.default_branch.clone())
                .unwrap_or_default();

            let mut repo = RepoDescriptor::new(url.as_str())
                .with_branch(branch.as_str())
                .with_path(entry.path.clone().unwrap_or_else(|| entry.name.clone()));
            repo.is_fork = entry.fork;
            repo.is_archived = entry.archived;

            if self.options.clone_wiki && entry.has_wiki {
                let mut wiki = RepoDescriptor::new(wiki_url(&url))
                    .with_branch(branch.as_str())
                    .with_path(repo.path.as_str())
                    .wiki();
                wiki.is_fork = entry.fork;
                wiki.is_archived = entry.archived;
                repos.push(repo);
                repos.push(wiki);
            } else {
                repos.push(repo);
            }
        }

        Ok(repos)
    }
}

impl RepoProvider for ManifestProvider {
    fn list_org_repos(&self, org: &str) -> Result<Vec<RepoDescriptor>> {
        self.descriptors(self.manifest.orgs.get(org))
    }

    fn list_user_repos(&self, user: &str) -> Result<Vec<RepoDescriptor>> {
        self.descriptors(self.manifest.users.get(user))
    }
}
