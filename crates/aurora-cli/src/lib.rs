//! `aurora-css`: renders Aurora UI stylesheets ahead of time.
//!
//! Applications that cannot inject styles at runtime (static sites, strict
//! CSP) ship the same CSS the theme provider would inject, generated by this
//! command:
//!
//! ```text
//! aurora-css --prefix app --responsive --global -o public/aurora.css
//! aurora-css --config utilities.yaml --format classes
//! aurora-css --no-backgrounds --no-text-colors --no-borders --spacing sm=0.25rem
//! ```
//!
//! Flags override values loaded with `--config`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use aurora_css::{generate, global_styles, UtilityConfig, UtilityOutput};
use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Generate Aurora UI utility stylesheets
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "aurora-css", version, about)]
pub struct Cli {
    /// Class name prefix
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Utility config file (.yaml, .yml or .json)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip background color utilities
    #[arg(long)]
    pub no_backgrounds: bool,

    /// Skip text color utilities
    #[arg(long)]
    pub no_text_colors: bool,

    /// Skip border color utilities
    #[arg(long)]
    pub no_borders: bool,

    /// Skip spacing utilities
    #[arg(long)]
    pub no_spacing: bool,

    /// Add breakpoint variants of every utility
    #[arg(long)]
    pub responsive: bool,

    /// Custom spacing step; repeat to build a scale
    #[arg(long = "spacing", value_name = "KEY=VALUE", value_parser = parse_spacing_entry)]
    pub spacing: Vec<(String, String)>,

    /// Prepend the global stylesheet (css format only)
    #[arg(long)]
    pub global: bool,

    /// What to print
    #[arg(short, long, value_enum, default_value_t = Format::Css)]
    pub format: Format,

    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// The stylesheet
    Css,
    /// One class name per line
    Classes,
    /// Per-category counts as JSON
    Stats,
}

fn parse_spacing_entry(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        return Err(format!("expected KEY=VALUE, got '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

impl Cli {
    /// The generator config: file (if any), then flag overrides.
    pub fn utility_config(&self) -> Result<UtilityConfig> {
        let mut config = match &self.config {
            Some(path) => UtilityConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => UtilityConfig::default(),
        };

        if let Some(prefix) = &self.prefix {
            config.prefix = prefix.clone();
        }
        if self.no_backgrounds {
            config.generate_backgrounds = false;
        }
        if self.no_text_colors {
            config.generate_text_colors = false;
        }
        if self.no_borders {
            config.generate_border_colors = false;
        }
        if self.no_spacing {
            config.generate_spacing = false;
        }
        if self.responsive {
            config.include_responsive = true;
        }
        if !self.spacing.is_empty() {
            config = config.custom_spacing(self.spacing.iter().cloned());
        }

        config.validate()?;
        Ok(config)
    }
}

/// Renders the requested output as text.
pub fn render(cli: &Cli) -> Result<String> {
    let config = cli.utility_config()?;
    let output = generate(&config);
    tracing::info!(
        prefix = %config.prefix,
        classes = output.stats.total,
        "generated utilities"
    );
    if output.is_empty() {
        tracing::warn!("every utility category is disabled");
    }

    Ok(match cli.format {
        Format::Css => render_css(&config, &output, cli.global),
        Format::Classes => {
            let mut text = output.class_names.join("\n");
            text.push('\n');
            text
        }
        Format::Stats => {
            let mut text = serde_json::to_string_pretty(&output.stats)?;
            text.push('\n');
            text
        }
    })
}

fn render_css(config: &UtilityConfig, output: &UtilityOutput, global: bool) -> String {
    let mut css = String::new();
    if global {
        css.push_str(&global_styles(&config.prefix));
        if !output.css.is_empty() {
            css.push_str("\n\n");
        }
    }
    css.push_str(&output.css);
    if !css.ends_with('\n') {
        css.push('\n');
    }
    css
}

/// Renders and writes to `--output` or stdout.
pub fn run(cli: &Cli) -> Result<()> {
    let text = render(cli)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, &text).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = text.len(), "wrote stylesheet");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes()).context("writing to stdout")?;
        }
    }
    Ok(())
}

/// Installs a stderr subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("aurora-css").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn spacing_entry_parsing() {
        assert_eq!(
            parse_spacing_entry("sm=0.25rem"),
            Ok(("sm".to_string(), "0.25rem".to_string()))
        );
        assert!(parse_spacing_entry("sm").is_err());
        assert!(parse_spacing_entry("=1px").is_err());
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.format, Format::Css);
        assert_eq!(cli.utility_config().unwrap(), UtilityConfig::default());
    }

    #[test]
    fn flags_override_categories() {
        let cli = parse(&["--prefix", "x", "--no-spacing", "--no-borders", "--responsive"]);
        let config = cli.utility_config().unwrap();
        assert_eq!(config.prefix, "x");
        assert!(!config.generate_spacing);
        assert!(!config.generate_border_colors);
        assert!(config.generate_backgrounds);
        assert!(config.include_responsive);
    }

    #[test]
    fn repeated_spacing_keeps_order() {
        let cli = parse(&["--spacing", "lg=1rem", "--spacing", "sm=0.25rem"]);
        let scale = cli.utility_config().unwrap().custom_spacing.unwrap();
        assert_eq!(scale.keys().collect::<Vec<_>>(), vec!["lg", "sm"]);
    }

    #[test]
    fn invalid_prefix_is_error() {
        let cli = parse(&["--prefix", "1x"]);
        assert!(cli.utility_config().is_err());
    }

    #[test]
    fn bad_spacing_rejected_by_parser() {
        let result = Cli::try_parse_from(["aurora-css", "--spacing", "oops"]);
        assert!(result.is_err());
    }
}
