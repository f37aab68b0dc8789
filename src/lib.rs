//! # Bulk Clone Library
//!
//! This library clones or updates every repository belonging to an
//! organization or user. It is designed to be used by the `bulk-clone`
//! command-line tool but can also be embedded by other applications that
//! need to mirror many repositories at once.
//!
//! ## Quick Example
//!
//! ```
//! use bulk_clone::filter::FilterPipeline;
//! use bulk_clone::repo::RepoDescriptor;
//!
//! let candidates = vec![
//!     RepoDescriptor::new("https://git.example.com/acme/api.git"),
//!     RepoDescriptor::new("https://git.example.com/acme/api.wiki.git").wiki(),
//!     RepoDescriptor::new("https://git.example.com/acme/old.git").archived(),
//! ];
//!
//! let pipeline = FilterPipeline {
//!     skip_archived: true,
//!     ..FilterPipeline::default()
//! };
//! let kept = pipeline.apply(candidates);
//!
//! assert_eq!(kept.len(), 1);
//! assert_eq!(kept[0].app_name(), "api");
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: Layered settings (defaults, config file,
//!   `BULK_CLONE_*` environment variables, CLI flags) resolved into one
//!   immutable `SyncConfig` per run.
//! - **Providers (`provider`)**: Turn an org or user name into candidate
//!   `RepoDescriptor`s.
//! - **Filtering (`filter`)**: Narrow candidates by wiki/fork/archived policy,
//!   regex, prefix and ignore file.
//! - **Strategies (`strategy`)**: Decide whether a repository is cloned,
//!   pulled, fetched or mirrored, and classify step failures.
//! - **Execution (`executor`, `sync`)**: Run every repository through its
//!   strategy with bounded concurrency.
//! - **Git (`repository`, `git`)**: The mockable `GitOperations` trait and its
//!   implementation over the system `git` command.
//! - **Reporting (`outcome`, `report`, `output`)**: Collect results from all
//!   workers and render the final summary.
//!
//! ## Execution Flow
//!
//! 1.  **Listing**: The provider resolves the target into descriptors.
//! 2.  **Filtering**: The filter pipeline drops everything not wanted. An
//!     empty result aborts the run.
//! 3.  **Dry run**: Optionally list what would be cloned and stop.
//! 4.  **Synchronization**: Each descriptor is resolved to a local path and
//!     cloned or updated on a bounded worker pool.
//! 5.  **Summary**: Counts, informational notices and issues are reported.

pub mod config;
pub mod defaults;
pub mod error;
pub mod executor;
pub mod filter;
pub mod git;
pub mod outcome;
pub mod output;
pub mod provider;
pub mod repo;
pub mod report;
pub mod repository;
pub mod strategy;
pub mod sync;

#[cfg(test)]
mod filter_proptest;
