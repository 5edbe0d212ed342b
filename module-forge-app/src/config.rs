use crate::error::AppError;
use clap::{Parser, ValueEnum};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use wfc_core::SelectionStrategy;

/// Prefix of environment variables read into [`Settings`].
pub const ENV_PREFIX: &str = "MODULE_FORGE_";

/// Represents the different visualization modes available.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisualizationMode {
    #[default]
    None,
    /// Colored arrows in the terminal, redrawn as slots collapse.
    Terminal,
}

/// File format of the collapsed grid.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// One row of `name@Rotation` labels per grid row, top row first.
    #[default]
    Text,
    /// One `x,y,module,rotation` record per slot.
    Csv,
}

/// What lies beyond the grid edge.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryArg {
    /// A collapsed void module surrounds the grid.
    #[default]
    Void,
    /// Edges are unconstrained.
    Open,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GlobalLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
}

/// Command line of the Module Forge application.
///
/// Every option is optional here; unset options fall back to the config
/// file, then the environment, then the defaults in [`Settings`].
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// Module catalog (RON or JSON) with per-module boundary point sets.
    #[arg(short, long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// TOML file with default settings.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Width of the output grid.
    #[arg(long)]
    pub width: Option<usize>,

    /// Height of the output grid.
    #[arg(long)]
    pub height: Option<usize>,

    /// Optional seed for the random number generator.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Path to save the generated grid; printed to stdout when absent.
    #[arg(short, long, value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Tie-break between slots of equal entropy.
    #[arg(long, value_enum)]
    pub selection: Option<SelectionStrategy>,

    #[arg(long, value_enum)]
    pub boundary: Option<BoundaryArg>,

    /// Name of the catalog module surrounding the grid in `void` boundary mode.
    #[arg(long, value_name = "NAME")]
    pub void_module: Option<String>,

    /// Retry with `seed + attempt` after a contradiction, up to this many runs.
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Report progress updates every specified interval (e.g., "1s", "500ms").
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub report_progress_interval: Option<Duration>,

    /// Choose the visualization mode.
    #[arg(long, value_enum)]
    pub visualization_mode: Option<VisualizationMode>,

    #[arg(long, value_enum)]
    pub global_log_level: Option<GlobalLogLevel>,

    /// Log level of progress reports.
    #[arg(long, value_enum)]
    pub progress_log_level: Option<ProgressLogLevel>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
    pub width: usize,
    pub height: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    pub output_format: OutputFormat,
    pub selection: SelectionStrategy,
    pub boundary: BoundaryArg,
    pub void_module: String,
    pub max_attempts: u32,
    /// Humantime duration, e.g. "250ms".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_progress_interval: Option<String>,
    pub visualization_mode: VisualizationMode,
    pub global_log_level: GlobalLogLevel,
    pub progress_log_level: ProgressLogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog: None,
            width: 16,
            height: 16,
            seed: None,
            output_path: None,
            output_format: OutputFormat::default(),
            selection: SelectionStrategy::default(),
            boundary: BoundaryArg::default(),
            void_module: wfc_rules::VOID_MODULE_NAME.to_string(),
            max_attempts: 1,
            report_progress_interval: None,
            visualization_mode: VisualizationMode::default(),
            global_log_level: GlobalLogLevel::default(),
            progress_log_level: ProgressLogLevel::default(),
        }
    }
}

impl Settings {
    /// Layers defaults, the `--config` TOML file, `MODULE_FORGE_*`
    /// variables and finally explicit flags.
    pub fn load(cli: &AppConfig) -> Result<Self, AppError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = &cli.config {
            if !path.is_file() {
                return Err(AppError::Config(format!(
                    "Config file {} does not exist",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        let mut settings: Self = figment
            .extract()
            .map_err(|e| AppError::Config(e.to_string()))?;
        settings.apply_cli(cli);
        settings.validate()?;
        Ok(settings)
    }

    fn apply_cli(&mut self, cli: &AppConfig) {
        if let Some(catalog) = &cli.catalog {
            self.catalog = Some(catalog.clone());
        }
        if let Some(width) = cli.width {
            self.width = width;
        }
        if let Some(height) = cli.height {
            self.height = height;
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
        if let Some(path) = &cli.output_path {
            self.output_path = Some(path.clone());
        }
        if let Some(format) = cli.output_format {
            self.output_format = format;
        }
        if let Some(selection) = cli.selection {
            self.selection = selection;
        }
        if let Some(boundary) = cli.boundary {
            self.boundary = boundary;
        }
        if let Some(name) = &cli.void_module {
            self.void_module.clone_from(name);
        }
        if let Some(attempts) = cli.max_attempts {
            self.max_attempts = attempts;
        }
        if let Some(interval) = cli.report_progress_interval {
            self.report_progress_interval = Some(humantime::format_duration(interval).to_string());
        }
        if let Some(mode) = cli.visualization_mode {
            self.visualization_mode = mode;
        }
        if let Some(level) = cli.global_log_level {
            self.global_log_level = level;
        }
        if let Some(level) = cli.progress_log_level {
            self.progress_log_level = level;
        }
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.catalog.is_none() {
            return Err(AppError::Config(
                "No module catalog given (use --catalog or MODULE_FORGE_CATALOG)".to_string(),
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(AppError::Config(format!(
                "Grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.max_attempts == 0 {
            return Err(AppError::Config("max_attempts must be at least 1".to_string()));
        }
        self.report_interval().map(|_| ())
    }

    /// The parsed progress interval.
    pub fn report_interval(&self) -> Result<Option<Duration>, AppError> {
        self.report_progress_interval
            .as_deref()
            .map(|text| {
                humantime::parse_duration(text).map_err(|e| {
                    AppError::Config(format!("Invalid progress interval '{text}': {e}"))
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn parse(args: &[&str]) -> AppConfig {
        AppConfig::try_parse_from(std::iter::once("module-forge").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_basic_args() {
        let config = parse(&["--catalog", "tiles.ron", "--width", "20", "-o", "out.txt"]);
        assert_eq!(config.catalog, Some(PathBuf::from("tiles.ron")));
        assert_eq!(config.width, Some(20));
        assert_eq!(config.height, None);
        assert_eq!(config.output_path, Some(PathBuf::from("out.txt")));
        assert_eq!(config.report_progress_interval, None);
    }

    #[test]
    fn test_progress_interval() {
        let config = parse(&["--report-progress-interval", "2s"]);
        assert_eq!(
            config.report_progress_interval,
            Some(Duration::from_secs(2))
        );
    }

    #[test]
    fn test_value_enums() {
        let config = parse(&[
            "--visualization-mode",
            "terminal",
            "--selection",
            "random-lowest",
            "--boundary",
            "open",
            "--output-format",
            "csv",
        ]);
        assert_eq!(config.visualization_mode, Some(VisualizationMode::Terminal));
        assert_eq!(config.selection, Some(SelectionStrategy::RandomLowest));
        assert_eq!(config.boundary, Some(BoundaryArg::Open));
        assert_eq!(config.output_format, Some(OutputFormat::Csv));

        let invalid = ["module-forge", "--visualization-mode", "invalid-mode"];
        assert!(AppConfig::try_parse_from(invalid).is_err());
    }

    #[test]
    fn test_settings_defaults_need_a_catalog() {
        Jail::expect_with(|_jail| {
            let err = Settings::load(&AppConfig::default()).unwrap_err();
            assert!(matches!(err, AppError::Config(_)));
            Ok(())
        });
    }

    #[test]
    fn test_settings_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "forge.toml",
                r#"
                    catalog = "from-file.ron"
                    width = 5
                    height = 6
                    output_format = "csv"
                "#,
            )?;
            jail.set_env("MODULE_FORGE_HEIGHT", "7");
            jail.set_env("MODULE_FORGE_SEED", "99");

            let cli = AppConfig {
                config: Some(PathBuf::from("forge.toml")),
                width: Some(9),
                ..AppConfig::default()
            };
            let settings = Settings::load(&cli).map_err(|e| e.to_string())?;

            assert_eq!(settings.catalog, Some(PathBuf::from("from-file.ron")));
            assert_eq!(settings.width, 9, "flags beat the file");
            assert_eq!(settings.height, 7, "environment beats the file");
            assert_eq!(settings.seed, Some(99));
            assert_eq!(settings.output_format, OutputFormat::Csv);
            assert_eq!(settings.void_module, "void");
            assert_eq!(settings.max_attempts, 1);
            Ok(())
        });
    }

    #[test]
    fn test_settings_rejects_bad_values() {
        Jail::expect_with(|_jail| {
            let zero_width = AppConfig {
                catalog: Some(PathBuf::from("c.ron")),
                width: Some(0),
                ..AppConfig::default()
            };
            assert!(Settings::load(&zero_width).is_err());

            let missing_file = AppConfig {
                catalog: Some(PathBuf::from("c.ron")),
                config: Some(PathBuf::from("absent.toml")),
                ..AppConfig::default()
            };
            assert!(Settings::load(&missing_file).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_interval_round_trips_through_settings() {
        Jail::expect_with(|_jail| {
            let cli = AppConfig {
                catalog: Some(PathBuf::from("c.ron")),
                report_progress_interval: Some(Duration::from_millis(1500)),
                ..AppConfig::default()
            };
            let settings = Settings::load(&cli).map_err(|e| e.to_string())?;
            assert_eq!(
                settings.report_interval().map_err(|e| e.to_string())?,
                Some(Duration::from_millis(1500))
            );
            Ok(())
        });
    }
}
