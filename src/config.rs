//! # Configuration
//!
//! Configuration is assembled from four layers, lowest precedence first:
//!
//! 1. Built-in defaults ([`RawConfig::defaults`]).
//! 2. A config file, YAML by default or TOML when the name ends in `.toml`.
//! 3. Environment variables prefixed with `BULK_CLONE_`.
//! 4. Command-line flags.
//!
//! Every layer is a [`RawConfig`] whose fields are all optional. Layers are
//! merged field by field and the result is validated once into a
//! [`SyncConfig`], which is immutable for the rest of the run and passed by
//! reference to every component.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::defaults;
use crate::error::{Error, Result};

/// Source-control provider the repositories come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScmType {
    GitHub,
    GitLab,
    Gitea,
    Bitbucket,
}

/// Whether the target names an organization or a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneType {
    Org,
    User,
}

/// Protocol used for clone URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Https,
    Ssh,
}

fn unknown_value(kind: &str, value: &str, expected: &str) -> Error {
    Error::ConfigParse {
        message: format!("unknown {} {:?}", kind, value),
        hint: Some(format!("expected one of: {}", expected)),
    }
}

impl FromStr for ScmType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "github" => Ok(ScmType::GitHub),
            "gitlab" => Ok(ScmType::GitLab),
            "gitea" => Ok(ScmType::Gitea),
            "bitbucket" => Ok(ScmType::Bitbucket),
            _ => Err(unknown_value(
                "scm type",
                s,
                "github, gitlab, gitea, bitbucket",
            )),
        }
    }
}

impl fmt::Display for ScmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScmType::GitHub => "github",
            ScmType::GitLab => "gitlab",
            ScmType::Gitea => "gitea",
            ScmType::Bitbucket => "bitbucket",
        })
    }
}

impl FromStr for CloneType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "org" => Ok(CloneType::Org),
            "user" => Ok(CloneType::User),
            _ => Err(unknown_value("clone type", s, "org, user")),
        }
    }
}

impl fmt::Display for CloneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CloneType::Org => "org",
            CloneType::User => "user",
        })
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "https" => Ok(Protocol::Https),
            "ssh" => Ok(Protocol::Ssh),
            _ => Err(unknown_value("protocol", s, "https, ssh")),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Protocol::Https => "https",
            Protocol::Ssh => "ssh",
        })
    }
}

/// A scalar that may be written as a number or a string in config files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// One unvalidated configuration layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    pub scm_type: Option<String>,
    pub clone_type: Option<String>,
    pub protocol: Option<String>,
    pub path: Option<PathBuf>,
    pub output_dir: Option<String>,
    pub base_url: Option<String>,
    pub concurrency: Option<Scalar>,
    pub branch: Option<String>,
    pub match_regex: Option<String>,
    pub match_prefix: Option<String>,
    pub ignore_file: Option<PathBuf>,
    pub backup: Option<bool>,
    pub no_clean: Option<bool>,
    pub fetch_all: Option<bool>,
    pub dry_run: Option<bool>,
    pub clone_wiki: Option<bool>,
    pub preserve_dir: Option<bool>,
    pub skip_archived: Option<bool>,
    pub skip_forks: Option<bool>,
}

macro_rules! overlay {
    ($base:expr, $over:expr; $($field:ident),* $(,)?) => {
        RawConfig { $($field: $over.$field.or($base.$field)),* }
    };
}

impl RawConfig {
    /// The built-in defaults layer.
    pub fn defaults() -> Self {
        Self {
            scm_type: Some("github".to_string()),
            clone_type: Some("org".to_string()),
            protocol: Some("https".to_string()),
            path: Some(defaults::default_clone_root()),
            concurrency: Some(Scalar::Int(defaults::DEFAULT_CONCURRENCY as i64)),
            ignore_file: Some(defaults::default_ignore_file()),
            ..Self::default()
        }
    }

    /// Overlays `over` on top of `self`; values set in `over` win.
    pub fn merge(self, over: RawConfig) -> RawConfig {
        overlay!(self, over;
            scm_type, clone_type, protocol, path, output_dir, base_url,
            concurrency, branch, match_regex, match_prefix, ignore_file,
            backup, no_clean, fetch_all, dry_run, clone_wiki, preserve_dir,
            skip_archived, skip_forks,
        )
    }

    /// Parses a YAML config layer.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parses a TOML config layer.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reads a config layer from disk, choosing the format by extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// Reads the environment layer from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_env_vars(std::env::vars())
    }

    /// Builds the environment layer from `BULK_CLONE_*` variables.
    ///
    /// Empty values are treated as unset. Variables with the prefix that do
    /// not name a config option are ignored.
    pub fn from_env_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut raw = Self::default();
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(defaults::ENV_PREFIX) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            match name {
                "SCM_TYPE" => raw.scm_type = Some(value),
                "CLONE_TYPE" => raw.clone_type = Some(value),
                "PROTOCOL" => raw.protocol = Some(value),
                "PATH" => raw.path = Some(PathBuf::from(value)),
                "OUTPUT_DIR" => raw.output_dir = Some(value),
                "BASE_URL" => raw.base_url = Some(value),
                "CONCURRENCY" => raw.concurrency = Some(Scalar::Text(value)),
                "BRANCH" => raw.branch = Some(value),
                "MATCH_REGEX" => raw.match_regex = Some(value),
                "MATCH_PREFIX" => raw.match_prefix = Some(value),
                "IGNORE_FILE" => raw.ignore_file = Some(PathBuf::from(value)),
                "BACKUP" => raw.backup = Some(parse_bool(&key, &value)?),
                "NO_CLEAN" => raw.no_clean = Some(parse_bool(&key, &value)?),
                "FETCH_ALL" => raw.fetch_all = Some(parse_bool(&key, &value)?),
                "DRY_RUN" => raw.dry_run = Some(parse_bool(&key, &value)?),
                "CLONE_WIKI" => raw.clone_wiki = Some(parse_bool(&key, &value)?),
                "PRESERVE_DIR" => raw.preserve_dir = Some(parse_bool(&key, &value)?),
                "SKIP_ARCHIVED" => raw.skip_archived = Some(parse_bool(&key, &value)?),
                "SKIP_FORKS" => raw.skip_forks = Some(parse_bool(&key, &value)?),
                _ => debug!("Ignoring unrecognized environment variable {}", key),
            }
        }
        Ok(raw)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(Error::ConfigParse {
            message: format!("{} must be a boolean, got {:?}", key, value),
            hint: Some("use true or false".to_string()),
        }),
    }
}

/// Parses a concurrency limit, which must be a positive integer.
pub fn parse_concurrency(value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::InvalidConcurrency {
            value: value.to_string(),
        }),
    }
}

/// Computes the folder, under the clone root, that a target syncs into.
///
/// An explicit output directory wins. Otherwise the lowercased target is
/// used, except for `all-groups` with a base URL, which uses the base URL's
/// host without a leading `www.` or trailing `.com`.
pub fn parent_folder(target: &str, output_dir: Option<&str>, base_url: Option<&str>) -> String {
    if let Some(dir) = output_dir.filter(|d| !d.is_empty()) {
        return dir.to_string();
    }

    if target == "all-groups" {
        if let Some(host) = base_url
            .and_then(|b| url::Url::parse(b).ok())
            .and_then(|u| u.host_str().map(str::to_string))
        {
            let host = host.strip_prefix("www.").unwrap_or(&host);
            return host.strip_suffix(".com").unwrap_or(host).to_string();
        }
    }

    target.to_lowercase()
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// The validated, immutable configuration of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub scm: ScmType,
    pub clone_type: CloneType,
    pub protocol: Protocol,
    /// The org or user being synchronized.
    pub target: String,
    /// Absolute directory every parent folder is created under.
    pub root: PathBuf,
    pub parent_folder: String,
    pub base_url: Option<String>,
    pub concurrency: usize,
    /// Branch override applied to every repository.
    pub branch: Option<String>,
    pub match_regex: Option<String>,
    pub match_prefixes: Vec<String>,
    pub ignore_file: PathBuf,
    pub backup: bool,
    pub no_clean: bool,
    pub fetch_all: bool,
    pub dry_run: bool,
    pub clone_wiki: bool,
    pub preserve_dir: bool,
    pub skip_archived: bool,
    pub skip_forks: bool,
    /// The config file that contributed a layer, if any.
    pub config_file: Option<PathBuf>,
}

impl SyncConfig {
    /// Validates a fully merged layer stack for `target`.
    pub fn resolve(raw: RawConfig, target: &str) -> Result<Self> {
        let scm = raw.scm_type.as_deref().unwrap_or("github").parse()?;
        let clone_type = raw.clone_type.as_deref().unwrap_or("org").parse()?;
        let protocol = raw.protocol.as_deref().unwrap_or("https").parse()?;

        let concurrency = match &raw.concurrency {
            Some(value) => parse_concurrency(&value.to_string())?,
            None => defaults::DEFAULT_CONCURRENCY,
        };

        let match_regex = raw.match_regex.filter(|r| !r.is_empty());
        if let Some(pattern) = &match_regex {
            Regex::new(pattern)?;
        }

        let match_prefixes = raw
            .match_prefix
            .as_deref()
            .map(|p| {
                p.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let root = expand_home(&raw.path.unwrap_or_else(defaults::default_clone_root));
        let root = std::path::absolute(&root)?;

        let base_url = raw.base_url.filter(|b| !b.is_empty());
        if let Some(base) = &base_url {
            url::Url::parse(base)?;
        }
        let parent_folder = parent_folder(target, raw.output_dir.as_deref(), base_url.as_deref());

        Ok(Self {
            scm,
            clone_type,
            protocol,
            target: target.to_string(),
            root,
            parent_folder,
            base_url,
            concurrency,
            branch: raw.branch.filter(|b| !b.is_empty()),
            match_regex,
            match_prefixes,
            ignore_file: raw
                .ignore_file
                .map(|p| expand_home(&p))
                .unwrap_or_else(defaults::default_ignore_file),
            backup: raw.backup.unwrap_or(false),
            no_clean: raw.no_clean.unwrap_or(false),
            fetch_all: raw.fetch_all.unwrap_or(false),
            dry_run: raw.dry_run.unwrap_or(false),
            clone_wiki: raw.clone_wiki.unwrap_or(false),
            preserve_dir: raw.preserve_dir.unwrap_or(false),
            skip_archived: raw.skip_archived.unwrap_or(false),
            skip_forks: raw.skip_forks.unwrap_or(false),
            config_file: None,
        })
    }

    /// Directory the parent folder resolves to for this run.
    ///
    /// Backup runs write to a sibling folder suffixed with `_backup`.
    pub fn destination(&self) -> PathBuf {
        if self.backup {
            self.root.join(format!("{}_backup", self.parent_folder))
        } else {
            self.root.join(&self.parent_folder)
        }
    }
}

/// Loads the layered configuration for `target`.
///
/// `explicit` names a config file that must exist. Without it the default
/// config file is used when present.
pub fn load(explicit: Option<&Path>, cli: RawConfig, target: &str) -> Result<SyncConfig> {
    load_with_env(explicit, RawConfig::from_env()?, cli, target)
}

/// Same as [`load`] with an explicit environment layer.
pub fn load_with_env(
    explicit: Option<&Path>,
    env: RawConfig,
    cli: RawConfig,
    target: &str,
) -> Result<SyncConfig> {
    let file = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Some(defaults::default_config_file()).filter(|p| p.is_file()),
    };

    let mut raw = RawConfig::defaults();
    if let Some(path) = &file {
        debug!("Reading config file {}", path.display());
        raw = raw.merge(RawConfig::from_file(path)?);
    }
    let raw = raw.merge(env).merge(cli);

    let mut config = SyncConfig::resolve(raw, target)?;
    config.config_file = file;
    Ok(config)
}
