//! Viewer configuration
//!
//! Settings are read from JSON. Lookup order:
//! 1. `--config <file>` on the command line
//! 2. `voyager.json` in the platform config directory
//!    - macOS: ~/Library/Application Support/voyager-viewer/
//!    - Linux: ~/.config/voyager-viewer/
//!    - Windows: %APPDATA%\voyager-viewer\config\
//! 3. Built-in defaults
//!
//! A missing file is not an error: the viewer logs it and keeps the defaults.

use anyhow::Context;
use bevy::prelude::*;
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::trajectory::{DEFAULT_EVENT_THRESHOLD_KM, DataSource, RenderMode, TrajectoryError};

const CONFIG_FILE_NAME: &str = "voyager.json";

/// Command line arguments
#[derive(Parser, Debug, Default)]
#[command(name = "voyager-viewer", about = "Voyager 1 interactive path viewer")]
pub struct CliArgs {
    /// Settings file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Horizons-style ephemeris table to animate instead of the built-in path
    #[arg(long)]
    pub ephemeris: Option<PathBuf>,
    /// Save the effective settings to the config file so they can be edited
    #[arg(long)]
    pub write_config: bool,
}

/// sRGB colors used by the viewer, each channel in 0..=1
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerTheme {
    pub background: [f32; 3],
    pub path: [f32; 3],
    pub milestone: [f32; 3],
    pub craft: [f32; 3],
    pub text: [f32; 3],
    pub highlight: [f32; 3],
    pub warning: [f32; 3],
}

impl Default for ViewerTheme {
    fn default() -> Self {
        Self {
            background: [0.02, 0.02, 0.05],
            path: [0.9, 0.2, 0.2],
            milestone: [0.25, 0.45, 1.0],
            craft: [1.0, 0.84, 0.0],
            text: [0.85, 0.88, 0.92],
            highlight: [0.24, 0.51, 0.96],
            warning: [1.0, 0.6, 0.2],
        }
    }
}

impl ViewerTheme {
    pub fn color(rgb: [f32; 3]) -> Color {
        Color::srgb(rgb[0], rgb[1], rgb[2])
    }
}

/// Viewer settings resource
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Animation timer period
    pub tick_interval_ms: u64,
    /// Samples between the first and last milestone
    pub path_steps: usize,
    /// Distance under which a milestone is reported as reached
    pub event_threshold_km: f64,
    pub start_mode: RenderMode,
    /// Optional ephemeris table; overridden by `--ephemeris`
    pub ephemeris_path: Option<PathBuf>,
    pub theme: ViewerTheme,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 200,
            path_steps: 500,
            event_threshold_km: DEFAULT_EVENT_THRESHOLD_KM,
            start_mode: RenderMode::ThreeD,
            ephemeris_path: None,
            theme: ViewerTheme::default(),
        }
    }
}

impl ViewerConfig {
    /// Default settings file location for this platform
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "voyager-viewer")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Read settings from `path`.
    ///
    /// Returns `TrajectoryError::MissingAsset` (wrapped) when the file does
    /// not exist, and a parse error when it is not valid JSON.
    pub fn read(path: &Path) -> Result<Self, anyhow::Error> {
        if !path.exists() {
            return Err(TrajectoryError::MissingAsset(path.to_path_buf()).into());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Write settings as pretty JSON, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<(), anyhow::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Read settings, falling back to defaults on any failure
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            warn!("No config directory available. Using default settings.");
            return Self::default();
        };
        match Self::read(&path) {
            Ok(config) => {
                info!("Loaded settings from {}", path.display());
                config
            }
            Err(err) => {
                match err.downcast_ref::<TrajectoryError>() {
                    Some(TrajectoryError::MissingAsset(_)) => {
                        info!("{} not found. Using default settings.", path.display());
                    }
                    _ => warn!("{:#}. Using default settings.", err),
                }
                Self::default()
            }
        }
    }

    /// Combine file settings with command line overrides
    pub fn from_args(args: &CliArgs) -> Self {
        let mut config = Self::load_or_default(args.config.as_deref());
        if let Some(ephemeris) = &args.ephemeris {
            config.ephemeris_path = Some(ephemeris.clone());
        }
        config
    }

    /// Save the settings where [`Self::from_args`] would look for them
    pub fn save_for(&self, args: &CliArgs) {
        let Some(path) = args.config.clone().or_else(Self::default_path) else {
            warn!("No config directory available. Settings not saved.");
            return;
        };
        match self.write(&path) {
            Ok(()) => info!("Saved settings to {}", path.display()),
            Err(err) => warn!("Cannot save settings to {}: {:#}", path.display(), err),
        }
    }

    pub fn data_source(&self) -> DataSource {
        match &self.ephemeris_path {
            Some(path) => DataSource::CsvEphemeris(path.clone()),
            None => DataSource::StaticCatalog,
        }
    }
}
