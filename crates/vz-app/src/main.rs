//! Interactive data visualization from the terminal

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use vz_views::PlottersRenderer;

mod cli;
mod preview;
mod prompt;
mod settings;
mod workflow;

use cli::Cli;
use prompt::TerminalPrompter;
use settings::Settings;

#[derive(Parser, Debug)]
#[command(author, version, about = "Turn CSV, Excel, JSON and text tables into charts")]
struct Args {
    /// Files to visualize; the file menu is skipped when given
    files: Vec<PathBuf>,

    /// Directory listed in the file menu
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Include files in nested directories
    #[arg(short, long)]
    recursive: bool,

    /// Maximum number of files listed
    #[arg(long)]
    max_files: Option<usize>,

    /// Where chart files are written
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Histogram bin count
    #[arg(long)]
    bins: Option<usize>,

    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extra cell text read as missing; may be repeated
    #[arg(long = "null-token", value_name = "TOKEN")]
    null_tokens: Vec<String>,
}

impl Args {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };

        if let Some(dir) = &self.data_dir {
            settings.data_dir = dir.clone();
        }
        if self.recursive {
            settings.recursive = true;
        }
        if let Some(max_files) = self.max_files {
            settings.max_files = max_files;
        }
        if let Some(dir) = &self.output_dir {
            settings.export.output_dir = dir.clone();
        }
        if let Some(bins) = self.bins {
            settings.export.histogram_bins = bins.max(1);
        }
        for token in &self.null_tokens {
            settings.load.null_config.add_pattern(token.as_str());
        }
        Ok(settings)
    }
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let settings = args.settings()?;
    info!("Output directory: {}", settings.export.output_dir.display());

    let mut renderer = PlottersRenderer::new(settings.export.clone());
    let stdin = io::stdin();
    let mut prompter = TerminalPrompter::new(stdin.lock(), io::stdout());

    Cli::new(settings).run(&mut prompter, &mut renderer, &args.files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("settings.json");
        fs::write(&config, r#"{"max_files": 7, "export": {"histogram_bins": 12}}"#).unwrap();

        let args = Args::parse_from([
            "visualize",
            "--config",
            config.to_str().unwrap(),
            "--bins",
            "20",
            "-o",
            "charts",
            "sales.csv",
        ]);
        let settings = args.settings().unwrap();
        assert_eq!(settings.max_files, 7);
        assert_eq!(settings.export.histogram_bins, 20);
        assert_eq!(settings.export.output_dir, PathBuf::from("charts"));
        assert_eq!(args.files, vec![PathBuf::from("sales.csv")]);
    }

    #[test]
    fn test_null_tokens_extend_defaults() {
        let args = Args::parse_from(["visualize", "--null-token", "missing", "--null-token", "?"]);
        let settings = args.settings().unwrap();
        let nulls = &settings.load.null_config;
        assert!(nulls.is_null("missing"));
        assert!(nulls.is_null("?"));
        assert!(nulls.is_null("NA"));
        assert!(!nulls.is_null("North"));
    }

    #[test]
    fn test_defaults_without_flags() {
        let args = Args::parse_from(["visualize"]);
        assert_eq!(args.settings().unwrap(), Settings::default());
    }
}
