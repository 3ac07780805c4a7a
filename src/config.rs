use crate::render::Color;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

const DEFAULT_PALETTE: [Color; 5] = [
    Color::new(0x3f, 0x51, 0xb5),
    Color::new(0x4c, 0xaf, 0x50),
    Color::new(0xf4, 0x43, 0x36),
    Color::new(0x0d, 0x47, 0xa1),
    Color::new(0xe6, 0x51, 0x00),
];

/// Everything that shapes the animation and how it is drawn.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// How much a bar's scale moves per tick.
    pub(crate) step: f64,

    /// The nominal time between ticks, in milliseconds.
    pub(crate) tick_period_ms: u64,

    /// One bar per entry, walked forward then backward.
    #[cfg_attr(feature = "json-schema", schemars(with = "Vec<String>"))]
    pub(crate) palette: Vec<Color>,

    #[cfg_attr(feature = "json-schema", schemars(with = "String"))]
    pub(crate) background_color: Color,

    #[cfg_attr(feature = "json-schema", schemars(with = "String"))]
    pub(crate) container_color: Color,

    /// The container outline is `min(width, height) / stroke_factor` wide.
    pub(crate) stroke_factor: f64,

    /// The container's side is `min(width, height) / container_size_factor`.
    pub(crate) container_size_factor: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            step: 0.02,
            tick_period_ms: 30,
            palette: DEFAULT_PALETTE.to_vec(),
            background_color: Color::new(0xbd, 0xbd, 0xbd),
            container_color: Color::new(0x21, 0x21, 0x21),
            stroke_factor: 90.0,
            container_size_factor: 2.9,
        }
    }
}

/// Values given on the command line, which take precedence over the config file.
#[derive(Clone, Debug, Default)]
pub(crate) struct ConfigOverrides {
    pub(crate) step: Option<f64>,
    pub(crate) tick_period_ms: Option<u64>,
    pub(crate) palette: Option<Vec<Color>>,
}

impl Config {
    /// Load a config file. Missing fields take their default value.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigLoadError::Io(path.to_path_buf(), e))?;
        Self::from_yaml(&contents)
    }

    pub(crate) fn from_yaml(contents: &str) -> Result<Self, ConfigLoadError> {
        // An empty document deserializes to unit rather than a map.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// The config file used when none is given explicitly.
    pub(crate) fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "barcycle").map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    pub(crate) fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(step) = overrides.step {
            self.step = step;
        }
        if let Some(period) = overrides.tick_period_ms {
            self.tick_period_ms = period;
        }
        if let Some(palette) = overrides.palette {
            self.palette = palette;
        }
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(self.step > 0.0 && self.step <= 1.0) {
            return Err(ConfigError::Step(self.step));
        }
        if self.tick_period_ms == 0 {
            return Err(ConfigError::TickPeriod);
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        for (name, value) in
            [("stroke_factor", self.stroke_factor), ("container_size_factor", self.container_size_factor)]
        {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Factor(name, value));
            }
        }
        Ok(())
    }

    pub(crate) fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigLoadError {
    #[error("failed to read config file {0:?}: {1}")]
    Io(PathBuf, io::Error),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] serde_yaml::Error),
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("step must be in (0, 1], got {0}")]
    Step(f64),

    #[error("tick period must be at least 1ms")]
    TickPeriod,

    #[error("palette needs at least one color")]
    EmptyPalette,

    #[error("{0} must be a positive number, got {1}")]
    Factor(&'static str, f64),
}
