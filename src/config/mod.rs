//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::domain::reading::DEFAULT_WORDS_PER_MINUTE;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "sentiero";
const DEFAULT_CONTENT_DIR: &str = "posts";
const DEFAULT_EXPORT_DIR: &str = "public/data";

/// Command-line arguments for the Sentiero binary.
#[derive(Debug, Parser)]
#[command(name = "sentiero", version, about = "Sentiero content pipeline")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "SENTIERO_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Load the content store, aggregate it, and export static JSON data.
    Build(BuildArgs),
    /// Print catalog statistics as JSON.
    Stats(StatsArgs),
    /// Report skipped units and series inconsistencies without exporting.
    Validate(ValidateArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub overrides: Overrides,

    /// Override the export output directory.
    #[arg(long = "out-dir", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub overrides: Overrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub overrides: Overrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct Overrides {
    /// Override the content store root directory.
    #[arg(long = "content-dir", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub content_dir: Option<PathBuf>,

    /// Override the reading-speed heuristic in words per minute.
    #[arg(long = "words-per-minute", value_name = "COUNT")]
    pub words_per_minute: Option<u32>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub content: ContentSettings,
    pub export: ExportSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ContentSettings {
    pub directory: PathBuf,
    pub words_per_minute: u32,
}

#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub directory: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("SENTIERO").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Build(args)) => {
            raw.apply_overrides(&args.overrides);
            if let Some(dir) = args.out_dir.as_ref() {
                raw.export.directory = Some(dir.clone());
            }
        }
        Some(Command::Stats(args)) => raw.apply_overrides(&args.overrides),
        Some(Command::Validate(args)) => raw.apply_overrides(&args.overrides),
        None => raw.apply_overrides(&Overrides::default()),
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    content: RawContentSettings,
    export: RawExportSettings,
    logging: RawLoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawContentSettings {
    directory: Option<PathBuf>,
    words_per_minute: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawExportSettings {
    directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(dir) = overrides.content_dir.as_ref() {
            self.content.directory = Some(dir.clone());
        }
        if let Some(rate) = overrides.words_per_minute {
            self.content.words_per_minute = Some(rate);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            content,
            export,
            logging,
        } = raw;

        Ok(Self {
            content: build_content_settings(content)?,
            export: build_export_settings(export)?,
            logging: build_logging_settings(logging)?,
        })
    }
}

fn build_content_settings(content: RawContentSettings) -> Result<ContentSettings, LoadError> {
    let directory = content
        .directory
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENT_DIR));
    if directory.as_os_str().is_empty() {
        return Err(LoadError::invalid(
            "content.directory",
            "path must not be empty",
        ));
    }

    let words_per_minute = content.words_per_minute.unwrap_or(DEFAULT_WORDS_PER_MINUTE);
    if words_per_minute == 0 {
        return Err(LoadError::invalid(
            "content.words_per_minute",
            "must be greater than zero",
        ));
    }

    Ok(ContentSettings {
        directory,
        words_per_minute,
    })
}

fn build_export_settings(export: RawExportSettings) -> Result<ExportSettings, LoadError> {
    let directory = export
        .directory
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR));
    if directory.as_os_str().is_empty() {
        return Err(LoadError::invalid(
            "export.directory",
            "path must not be empty",
        ));
    }

    Ok(ExportSettings { directory })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}
