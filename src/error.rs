//! # Error Handling
//!
//! This module defines the centralized error type for `bulk-clone`. It uses
//! `thiserror` to describe every failure mode the library can surface to its
//! caller.
//!
//! Errors fall into two groups:
//!
//! - **Pre-flight errors** such as [`Error::InvalidConcurrency`],
//!   [`Error::Regex`], [`Error::IgnoreFile`] or [`Error::NoRepositories`].
//!   These abort a run before anything on disk is touched.
//! - **Per-repository errors**, almost always [`Error::GitCommand`]. These are
//!   never propagated past a sync worker. The orchestrator turns them into
//!   informational notices or issues in the final summary instead.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for bulk-clone operations
#[derive(Error, Debug)]
pub enum Error {
    /// The layered configuration could not be parsed or is inconsistent.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The concurrency limit is not a positive integer.
    #[error("Invalid concurrency value {value:?}: expected a positive integer")]
    InvalidConcurrency { value: String },

    /// The ignore file exists but could not be read.
    #[error("Could not read ignore file {}: {source}", path.display())]
    IgnoreFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Nothing is left to synchronize for the requested org or user.
    #[error("No repos found for {target}, please verify you have sufficient permissions to clone target repos, double check spelling and try again")]
    NoRepositories { target: String },

    /// The provider could not produce a repository list.
    #[error("Provider error: {message}")]
    Provider { message: String },

    /// A git subprocess exited unsuccessfully or could not be spawned.
    #[error("git {command} failed for {url}: {stderr}")]
    GitCommand {
        command: String,
        url: String,
        stderr: String,
    },

    /// A git operation was requested before the destination was resolved.
    #[error("No local destination has been resolved for {url}")]
    UnresolvedPath { url: String },

    /// The worker pool could not be created.
    #[error("Could not start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A TOML parsing error, wrapped from `toml::de::Error`.
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
