use std::{collections::BTreeMap, env, path::PathBuf};

use config::{Environment, File};
use directories::ProjectDirs;
use lazy_static::lazy_static;
use serde::Deserialize;

use crate::{popover::PopoverOptions, theme::Palette};

const DEFAULT_CONFIG: &str = include_str!("../.config/config.json5");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListConfig {
    /// Rows rendered above and below the viewport.
    pub overscan: usize,
    /// How many rows the list is sized for.
    pub visible_rows: usize,
    pub placeholder: String,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            overscan: 10,
            visible_rows: 5,
            placeholder: "No options".into(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub themes: BTreeMap<String, Palette>,
    #[serde(default)]
    pub default_theme: String,
    #[serde(default)]
    pub list: ListConfig,
    #[serde(default)]
    pub popover: PopoverOptions,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref LOG_ENV: String = format!("{}_LOGLEVEL", PROJECT_NAME.clone());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

impl Config {
    pub fn new() -> Result<Self, config::ConfigError> {
        let data_dir = get_data_dir();
        let config_dir = get_config_dir();

        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?
            .add_source(File::from_str(DEFAULT_CONFIG, config::FileFormat::Json5));

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.json", config::FileFormat::Json),
            ("config.yaml", config::FileFormat::Yaml),
            ("config.toml", config::FileFormat::Toml),
        ];
        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
        }

        builder
            .add_source(Environment::with_prefix(&PROJECT_NAME))
            .build()?
            .try_deserialize()
    }

    /// Only the embedded defaults, without any user files or environment.
    pub fn embedded() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, config::FileFormat::Json5))
            .build()?
            .try_deserialize()
    }
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("plus.lit", "", env!("CARGO_PKG_NAME"))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::popover::Placement;

    #[test]
    fn test_embedded_defaults_parse() {
        let config = Config::embedded().unwrap();

        assert_eq!(config.default_theme, "slate");
        assert!(config.themes.contains_key(&config.default_theme));
        assert_eq!(config.themes.len(), 3);
        assert_eq!(config.list.overscan, 10);
        assert_eq!(config.list.visible_rows, 5);
    }

    #[test]
    fn test_embedded_popover_defaults() {
        let popover = Config::embedded().unwrap().popover;

        assert_eq!(popover.placement, Placement::BottomStart);
        assert_eq!(popover.transition_timeout, Duration::from_millis(150));
        assert_eq!(popover.offset, (0, 0));
        assert!(popover.use_anchor_width);
        assert!(popover.with_transition);
        assert_eq!(popover.fallback_placements, None);
    }
}
