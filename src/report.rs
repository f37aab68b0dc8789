//! Human-readable run reports.
//!
//! Three things are printed over a run: the configuration banner before any
//! work starts, the dry-run listing when nothing is executed, and the final
//! summary with its "Info" and "Issues" sections.

use std::io::{self, Write};
use std::path::PathBuf;

use serde::Serialize;

use crate::config::SyncConfig;
use crate::outcome::Summary;
use crate::output::{OutputConfig, Tone};

/// What a dry run would have done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DryRunReport {
    pub urls: Vec<String>,
    pub destination: PathBuf,
}

impl DryRunReport {
    pub fn render(&self, out: &mut dyn Write, style: &OutputConfig) -> io::Result<()> {
        for url in &self.urls {
            writeln!(out, "{}", style.paint(Tone::Subtle, url))?;
        }
        writeln!(out)?;
        let line = format!(
            "{} repos to be cloned into: {}",
            self.urls.len(),
            self.destination.display()
        );
        writeln!(out, "{}", style.paint(Tone::Success, &line))
    }
}

fn section(
    out: &mut dyn Write,
    style: &OutputConfig,
    tone: Tone,
    title: &str,
    lines: &[String],
) -> io::Result<()> {
    if lines.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "{}", style.paint(tone, &format!("============ {} ============", title)))?;
    writeln!(out)?;
    for line in lines {
        writeln!(out, "{}", style.paint(tone, line))?;
    }
    writeln!(out)
}

/// Renders the end-of-run report.
pub fn render_summary(
    summary: &Summary,
    destination: &std::path::Path,
    out: &mut dyn Write,
    style: &OutputConfig,
) -> io::Result<()> {
    section(out, style, Tone::Info, "Info", &summary.infos)?;
    section(out, style, Tone::Error, "Issues", &summary.errors)?;

    let counts = format!(
        "New repos cloned: {}, existing repos pulled: {}",
        summary.cloned_count, summary.pulled_count
    );
    writeln!(out, "{}", style.paint(Tone::Success, &counts))?;
    writeln!(out)?;
    let finished = format!("Finished! {}", destination.display());
    writeln!(out, "{}", style.paint(Tone::Success, &finished))
}

/// Renders the "N repos found" line.
pub fn render_found(
    repo_count: usize,
    total: usize,
    config: &SyncConfig,
    out: &mut dyn Write,
    style: &OutputConfig,
) -> io::Result<()> {
    let line = if config.clone_wiki {
        format!(
            "{} repos found in {}, including {} enabled wikis",
            repo_count,
            config.target,
            total - repo_count
        )
    } else {
        format!("{} repos found in {}", repo_count, config.target)
    };
    writeln!(out, "{}", style.paint(Tone::Info, &line))?;
    writeln!(out)
}

/// Renders the configuration banner shown before a run.
pub fn render_banner(config: &SyncConfig, out: &mut dyn Write, style: &OutputConfig) -> io::Result<()> {
    let mut rows: Vec<(&str, String)> = vec![
        ("SCM", config.scm.to_string()),
        ("Type", config.clone_type.to_string()),
        ("Protocol", config.protocol.to_string()),
        ("Location", config.root.display().to_string()),
        ("Concurrency", config.concurrency.to_string()),
    ];

    if let Some(branch) = &config.branch {
        rows.push(("Branch", branch.clone()));
    }
    if let Some(base_url) = &config.base_url {
        rows.push(("Base URL", base_url.clone()));
    }
    let flags = [
        ("Skip Archived", config.skip_archived),
        ("Skip Forks", config.skip_forks),
        ("Backup", config.backup),
        ("Wikis", config.clone_wiki),
        ("Preserve Dir", config.preserve_dir),
        ("No Clean", config.no_clean),
        ("Fetch All", config.fetch_all),
        ("Dry Run", config.dry_run),
    ];
    for (name, enabled) in flags {
        if enabled {
            rows.push((name, "true".to_string()));
        }
    }
    if config.ignore_file.is_file() {
        rows.push(("Ignore File", config.ignore_file.display().to_string()));
    }
    if let Some(regex) = &config.match_regex {
        rows.push(("Regex Match", regex.clone()));
    }
    if !config.match_prefixes.is_empty() {
        rows.push(("Prefix Match", config.match_prefixes.join(",")));
    }
    rows.push(("Output Dir", config.parent_folder.clone()));
    rows.push((
        "Config Used",
        config
            .config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "none".to_string()),
    ));

    let border = "*************************************";
    writeln!(out, "{}", style.paint(Tone::Info, border))?;
    for (name, value) in rows {
        let row = format!("* {:<14}: {}", name, value);
        writeln!(out, "{}", style.paint(Tone::Info, &row))?;
    }
    writeln!(out, "{}", style.paint(Tone::Info, border))?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawConfig;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn config(raw: RawConfig) -> SyncConfig {
        SyncConfig::resolve(RawConfig::defaults().merge(raw), "Acme").unwrap()
    }

    #[test]
    fn test_summary_without_notices() {
        let summary = Summary {
            cloned_count: 3,
            pulled_count: 1,
            ..Summary::default()
        };
        let text = render(|out| {
            render_summary(
                &summary,
                std::path::Path::new("/srv/acme"),
                out,
                &OutputConfig::without_color(),
            )
        });

        assert!(!text.contains("Info"));
        assert!(!text.contains("Issues"));
        assert!(text.contains("New repos cloned: 3, existing repos pulled: 1"));
        assert!(text.ends_with("Finished! /srv/acme\n"));
    }

    #[test]
    fn test_summary_prints_info_before_issues() {
        let summary = Summary {
            cloned_count: 0,
            pulled_count: 0,
            infos: vec!["wiki empty".to_string()],
            errors: vec!["pull failed".to_string()],
        };
        let text = render(|out| {
            render_summary(
                &summary,
                std::path::Path::new("/srv/acme"),
                out,
                &OutputConfig::without_color(),
            )
        });

        let info = text.find("============ Info ============").unwrap();
        let issues = text.find("============ Issues ============").unwrap();
        assert!(info < issues);
        assert!(text.find("wiki empty").unwrap() < issues);
        assert!(text.find("pull failed").unwrap() > issues);
    }

    #[test]
    fn test_dry_run_listing() {
        let report = DryRunReport {
            urls: vec![
                "https://host/acme/a.git".to_string(),
                "https://host/acme/b.git".to_string(),
            ],
            destination: PathBuf::from("/srv/acme"),
        };
        let text = render(|out| report.render(out, &OutputConfig::without_color()));

        assert_eq!(
            text,
            "https://host/acme/a.git\nhttps://host/acme/b.git\n\n2 repos to be cloned into: /srv/acme\n"
        );
    }

    #[test]
    fn test_found_line_mentions_wikis_only_when_enabled() {
        let plain = config(RawConfig::default());
        let text = render(|out| render_found(2, 2, &plain, out, &OutputConfig::without_color()));
        assert_eq!(text, "2 repos found in Acme\n\n");

        let wikis = config(RawConfig {
            clone_wiki: Some(true),
            ..RawConfig::default()
        });
        let text = render(|out| render_found(2, 3, &wikis, out, &OutputConfig::without_color()));
        assert!(text.contains("including 1 enabled wikis"));
    }

    #[test]
    fn test_banner_lists_enabled_options_only() {
        let cfg = config(RawConfig {
            backup: Some(true),
            branch: Some("develop".to_string()),
            ..RawConfig::default()
        });
        let text = render(|out| render_banner(&cfg, out, &OutputConfig::without_color()));

        assert!(text.contains("* SCM           : github"));
        assert!(text.contains("* Branch        : develop"));
        assert!(text.contains("* Backup        : true"));
        assert!(!text.contains("Dry Run"));
        assert!(text.contains("* Output Dir    : acme"));
    }
}
