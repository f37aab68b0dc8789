//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures, helper functions, and macros
//! to reduce duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_manifest(manifests::ACME);
//!     fixture.clone_command("acme").arg("--dry-run").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::git_available;
    #[allow(unused_imports)]
    pub use super::manifests;
    pub use super::TestFixture;
}

/// Manifest snippets for testing.
#[allow(dead_code)]
pub mod manifests {
    /// Two code repositories, one archived, one with a wiki.
    pub const ACME: &str = r#"
orgs:
  acme:
    - name: api-server
      clone_url: https://git.example.com/acme/api-server.git
      has_wiki: true
    - name: web-client
      clone_url: https://git.example.com/acme/web-client.git
    - name: archived-repo
      clone_url: https://git.example.com/acme/archived-repo.git
      archived: true
users:
  jdoe:
    - name: dotfiles
      clone_url: https://git.example.com/jdoe/dotfiles.git
      fork: true
"#;

    /// A manifest with no repositories at all.
    pub const EMPTY: &str = "orgs: {}\n";
}

/// Whether a `git` executable can be spawned.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// A test fixture that provides a temporary directory holding a manifest,
/// an empty config file and a clone root.
///
/// Commands built from the fixture point `HOME` and `XDG_CONFIG_HOME` into
/// the temporary directory so no user configuration leaks into a test.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_manifest(manifests::ACME)
///     .with_ignore_file("archived-repo\n");
///
/// fixture.clone_command("acme")
///     .arg("--dry-run")
///     .assert()
///     .success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty config file.
    pub fn new() -> Self {
        let fixture = Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        };
        fixture
            .temp_dir
            .child("conf.yaml")
            .write_str("")
            .expect("Failed to write config file");
        fixture
    }

    /// Write the manifest with the given content.
    pub fn with_manifest(self, content: &str) -> Self {
        self.temp_dir
            .child("manifest.yaml")
            .write_str(content)
            .expect("Failed to write manifest");
        self
    }

    /// Replace the config file with the given YAML content.
    #[allow(dead_code)]
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child("conf.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Write the ignore file with the given content.
    #[allow(dead_code)]
    pub fn with_ignore_file(self, content: &str) -> Self {
        self.temp_dir
            .child("ignore")
            .write_str(content)
            .expect("Failed to write ignore file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The directory repositories are cloned under.
    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join("root")
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bulk-clone");
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg"))
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("BULK_CLONE_MANIFEST")
            .env_remove("BULK_CLONE_CONFIG");
        cmd
    }

    /// Create a `clone <target>` command wired to the fixture's files.
    pub fn clone_command(&self, target: &str) -> assert_cmd::Command {
        let mut cmd = self.command();
        cmd.arg("clone")
            .arg(target)
            .arg("--manifest")
            .arg(self.path().join("manifest.yaml"))
            .arg("--config")
            .arg(self.path().join("conf.yaml"))
            .arg("--path")
            .arg(self.root())
            .arg("--ignore-file")
            .arg(self.path().join("ignore"));
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_config_file() {
        let fixture = TestFixture::new();
        assert!(fixture.path().join("conf.yaml").exists());
    }

    #[test]
    fn test_manifests_are_valid_yaml() {
        for manifest in [manifests::ACME, manifests::EMPTY] {
            let result: Result<serde_yaml::Value, _> = serde_yaml::from_str(manifest);
            assert!(result.is_ok(), "Manifest should be valid YAML: {}", manifest);
        }
    }
}
