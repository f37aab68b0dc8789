//! Thin wrappers around the system `git` command.
//!
//! Using the `git` binary rather than a library means clones pick up
//! whatever the user already has configured: SSH keys and agents, credential
//! helpers, personal access tokens and anything else in `~/.gitconfig`.

use std::path::Path;
use std::process::Command;

use log::{debug, trace};

use crate::error::{Error, Result};

/// Runs `git` with `args`, optionally inside `dir`, and returns its stdout.
///
/// `url` only labels the error if the command fails.
pub fn run_git(args: &[&str], dir: Option<&Path>, url: &str) -> Result<String> {
    let command = args.first().copied().unwrap_or_default().to_string();
    debug!("({}) Running git {}", url, args.join(" "));

    let mut cmd = Command::new("git");
    cmd.args(args);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    let output = cmd.output().map_err(|e| Error::GitCommand {
        command: command.clone(),
        url: url.to_string(),
        stderr: e.to_string(),
    })?;

    trace!("({}) Exit status: {}", url, output.status);
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if !stdout.is_empty() {
        trace!("({}) Stdout: {:?}", url, stdout);
    }

    if output.status.success() {
        Ok(stdout)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        debug!("({}) stderr for failed command: {:?}", url, stderr);
        Err(Error::GitCommand {
            command,
            url: url.to_string(),
            stderr,
        })
    }
}

/// Clones `url` into `dest`, as a bare mirror when `mirror` is set.
pub fn clone(url: &str, dest: &Path, mirror: bool) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let dest = dest.to_string_lossy();
    let mut args = vec!["clone"];
    if mirror {
        args.push("--mirror");
    }
    args.extend([url, &*dest]);
    run_git(&args, None, url).map(drop)
}

/// Resolves the branch `origin/HEAD` points to in the clone at `dir`.
pub fn default_branch(dir: &Path, url: &str) -> Result<String> {
    let head = run_git(
        &["symbolic-ref", "--short", "refs/remotes/origin/HEAD"],
        Some(dir),
        url,
    )?;
    let head = head.trim();
    Ok(head.strip_prefix("origin/").unwrap_or(head).to_string())
}

/// Checks out `branch`.
pub fn checkout(dir: &Path, url: &str, branch: &str) -> Result<()> {
    run_git(&["checkout", branch], Some(dir), url).map(drop)
}

/// Removes untracked files and directories.
pub fn clean(dir: &Path, url: &str) -> Result<()> {
    run_git(&["clean", "-f", "-d"], Some(dir), url).map(drop)
}

/// Hard-resets the working tree to `origin/<branch>`.
pub fn reset_hard(dir: &Path, url: &str, branch: &str) -> Result<()> {
    let target = format!("origin/{}", branch);
    run_git(&["reset", "--hard", &target], Some(dir), url).map(drop)
}

/// Fast-forwards `branch` from origin.
pub fn pull(dir: &Path, url: &str, branch: &str) -> Result<()> {
    run_git(&["pull", "--ff-only", "origin", branch], Some(dir), url).map(drop)
}

/// Fetches every remote.
pub fn fetch_all(dir: &Path, url: &str) -> Result<()> {
    run_git(&["fetch", "--all"], Some(dir), url).map(drop)
}

/// Points `origin` at `url`.
pub fn set_origin(dir: &Path, url: &str) -> Result<()> {
    run_git(&["remote", "set-url", "origin", url], Some(dir), url).map(drop)
}

/// Refreshes every remote of a mirror.
pub fn update_remote(dir: &Path, url: &str) -> Result<()> {
    run_git(&["remote", "update"], Some(dir), url).map(drop)
}
