//! Console styling for run reports.
//!
//! Whether report lines are colored is decided once per run from the
//! `--color` flag and the environment:
//!
//! - `--color=always|never` wins outright.
//! - `NO_COLOR` (any value) or `CLICOLOR=0` turn colors off.
//! - `CLICOLOR_FORCE` with a non-zero value turns them on even without a TTY.
//! - `TERM=dumb` turns them off.
//! - Otherwise colors follow whether stdout is a color-capable terminal.

use console::style;

/// The `--color` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    Always,
    Never,
    Auto,
}

impl ColorChoice {
    /// Parses the flag value. Anything unrecognized means `Auto`.
    pub fn from_flag(flag: &str) -> Self {
        match flag.trim().to_lowercase().as_str() {
            "always" => ColorChoice::Always,
            "never" => ColorChoice::Never,
            _ => ColorChoice::Auto,
        }
    }
}

/// The role a report line plays, which decides its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Subtle,
    Success,
    Error,
}

/// Output configuration for one run.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Resolves the color policy from the `--color` flag and the process
    /// environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        Self::resolve(ColorChoice::from_flag(color_flag), |key| {
            std::env::var_os(key).map(|v| v.to_string_lossy().into_owned())
        })
    }

    /// Resolves the color policy with an explicit environment lookup.
    pub fn resolve<F>(choice: ColorChoice, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let use_color = match choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => env_allows_color(&env)
                .unwrap_or_else(|| console::Term::stdout().features().colors_supported()),
        };
        Self { use_color }
    }

    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// Renders `text` in the color for `tone`, or unchanged without colors.
    pub fn paint(&self, tone: Tone, text: &str) -> String {
        if !self.use_color {
            return text.to_string();
        }

        let styled = match tone {
            Tone::Info => style(text).yellow(),
            Tone::Subtle => style(text).cyan(),
            Tone::Success => style(text).green(),
            Tone::Error => style(text).red(),
        };
        styled.force_styling(true).to_string()
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// The environment's verdict on colors, or `None` to ask the terminal.
fn env_allows_color<F>(env: &F) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    if env("NO_COLOR").is_some() {
        return Some(false);
    }
    if env("CLICOLOR").is_some_and(|v| v == "0") {
        return Some(false);
    }
    if env("CLICOLOR_FORCE").is_some_and(|v| !v.is_empty() && v != "0") {
        return Some(true);
    }
    if env("TERM").is_some_and(|v| v == "dumb") {
        return Some(false);
    }
    None
}
