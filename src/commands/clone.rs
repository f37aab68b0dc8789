//! Clone command implementation
//!
//! The clone command runs one synchronization:
//! 1. Load the layered configuration for the target
//! 2. List candidate repositories from the manifest
//! 3. Filter them and report how many were found
//! 4. Clone or update each one with bounded concurrency
//! 5. Print the summary (or the dry-run listing)

use anyhow::{Context, Result};
use clap::Args;
use std::io::{self, Write};
use std::path::PathBuf;

use bulk_clone::config::{self, RawConfig, Scalar};
use bulk_clone::output::OutputConfig;
use bulk_clone::provider::{ManifestProvider, ProviderOptions, RepoProvider};
use bulk_clone::repo::repo_count;
use bulk_clone::report;
use bulk_clone::repository::SystemGit;
use bulk_clone::sync::{RunOutcome, Synchronizer};

/// Arguments for the clone command
#[derive(Args, Debug, Default)]
pub struct CloneArgs {
    /// Org or user whose repositories are synchronized
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Manifest listing the repositories of each org and user
    #[arg(short, long, value_name = "PATH", env = "BULK_CLONE_MANIFEST")]
    pub manifest: PathBuf,

    /// Path to config file
    #[arg(short, long, value_name = "PATH", env = "BULK_CLONE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Absolute path to the directory repos are cloned under
    #[arg(short, long, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Protocol to clone with (https, ssh)
    #[arg(long, value_name = "PROTOCOL")]
    pub protocol: Option<String>,

    /// Branch left checked out for each repo
    #[arg(short, long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Whether the target is an org or a user (org, user)
    #[arg(long, value_name = "TYPE")]
    pub clone_type: Option<String>,

    /// Type of SCM the target lives on (github, gitlab, gitea, bitbucket)
    #[arg(short, long, value_name = "SCM")]
    pub scm: Option<String>,

    /// Base URL of a self-hosted SCM
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Maximum number of repos synchronized at once
    #[arg(long, value_name = "N")]
    pub concurrency: Option<String>,

    /// Only sync repos whose name matches this regex
    #[arg(long, value_name = "REGEX")]
    pub match_regex: Option<String>,

    /// Only sync repos whose name starts with one of these comma-separated prefixes
    #[arg(long, value_name = "PREFIXES")]
    pub match_prefix: Option<String>,

    /// File of URL substrings to skip, one per line
    #[arg(long, value_name = "PATH")]
    pub ignore_file: Option<PathBuf>,

    /// Name of the directory repos are cloned into, under the clone path
    #[arg(long, value_name = "NAME")]
    pub output_dir: Option<String>,

    /// Mirror repos into a separate backup folder
    #[arg(long)]
    pub backup: bool,

    /// Only fetch existing repos, never clean or reset them
    #[arg(long)]
    pub no_clean: bool,

    /// Fetch all remote branches of each repo
    #[arg(long)]
    pub fetch_all: bool,

    /// List the repos that would be cloned without touching anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Also clone wikis
    #[arg(long)]
    pub clone_wiki: bool,

    /// Keep the provider's directory structure below the output directory
    #[arg(long)]
    pub preserve_dir: bool,

    /// Skip archived repos
    #[arg(long)]
    pub skip_archived: bool,

    /// Skip forked repos
    #[arg(long)]
    pub skip_forks: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

fn flag(set: bool) -> Option<bool> {
    set.then_some(true)
}

impl CloneArgs {
    /// The command-line configuration layer. Unset flags leave lower layers
    /// in effect.
    fn to_raw(&self) -> RawConfig {
        RawConfig {
            scm_type: self.scm.clone(),
            clone_type: self.clone_type.clone(),
            protocol: self.protocol.clone(),
            path: self.path.clone(),
            output_dir: self.output_dir.clone(),
            base_url: self.base_url.clone(),
            concurrency: self.concurrency.clone().map(Scalar::Text),
            branch: self.branch.clone(),
            match_regex: self.match_regex.clone(),
            match_prefix: self.match_prefix.clone(),
            ignore_file: self.ignore_file.clone(),
            backup: flag(self.backup),
            no_clean: flag(self.no_clean),
            fetch_all: flag(self.fetch_all),
            dry_run: flag(self.dry_run),
            clone_wiki: flag(self.clone_wiki),
            preserve_dir: flag(self.preserve_dir),
            skip_archived: flag(self.skip_archived),
            skip_forks: flag(self.skip_forks),
        }
    }
}

/// Execute the clone command
pub fn execute(args: CloneArgs, output: &OutputConfig) -> Result<()> {
    let config = config::load(args.config.as_deref(), args.to_raw(), &args.target)?;
    let mut stdout = io::stdout().lock();

    if !args.json {
        report::render_banner(&config, &mut stdout, output)?;
    }

    let provider = ManifestProvider::from_file(&args.manifest, ProviderOptions::from(&config))
        .with_context(|| format!("Could not load manifest {}", args.manifest.display()))?;
    let candidates = provider.list_for(&config)?;

    let git = SystemGit::new().mirror(config.backup);
    let mut sync = Synchronizer::new(&config, &git);
    if !args.json {
        sync = sync.with_progress(output);
    }

    let repos = sync.prepare(candidates)?;
    if !args.json {
        report::render_found(repo_count(&repos), repos.len(), &config, &mut stdout, output)?;
    }

    // Workers print progress lines while running, so the lock is released.
    drop(stdout);
    let outcome = sync.execute(repos)?;
    let mut stdout = io::stdout().lock();

    match outcome {
        RunOutcome::DryRun(dry_run) if args.json => {
            serde_json::to_writer_pretty(&mut stdout, &dry_run)?;
            writeln!(stdout)?;
        }
        RunOutcome::DryRun(dry_run) => dry_run.render(&mut stdout, output)?,
        RunOutcome::Completed(summary) if args.json => {
            serde_json::to_writer_pretty(&mut stdout, &summary)?;
            writeln!(stdout)?;
        }
        RunOutcome::Completed(summary) => {
            report::render_summary(&summary, &config.destination(), &mut stdout, output)?;
        }
    }

    Ok(())
}
