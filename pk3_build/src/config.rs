use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::BuildError;

pub const ENV_MAP_NAME: &str = "PK3_MAP_NAME";
pub const ENV_BASE_PATH: &str = "PK3_BASE_PATH";
pub const ENV_OUT_DIR: &str = "PK3_OUT_DIR";
pub const ENV_CONFIG: &str = "PK3_CONFIG";

const PACK_CONFIG_VERSION: u32 = 1;

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    #[default]
    Deflate,
    Stored,
}

/// Optional TOML settings for the archive step.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct PackConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub compression: Compression,
    /// Relative paths packed even when the map never references them.
    #[serde(default)]
    pub extra_resources: Vec<String>,
    #[serde(default)]
    pub out_dir: Option<PathBuf>,
}

fn default_version() -> u32 {
    PACK_CONFIG_VERSION
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            version: PACK_CONFIG_VERSION,
            compression: Compression::default(),
            extra_resources: Vec::new(),
            out_dir: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PackConfigValidation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl PackConfigValidation {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl PackConfig {
    pub fn parse_toml(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|err| err.to_string())
    }

    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let text = fs::read_to_string(path).map_err(|err| BuildError::io(path, err))?;
        let config = Self::parse_toml(&text)
            .map_err(|err| BuildError::Config(format!("{}: {}", path.display(), err)))?;
        let validation = config.validate();
        if !validation.is_ok() {
            return Err(BuildError::Config(format!(
                "{}: {}",
                path.display(),
                validation.errors.join("; ")
            )));
        }
        for warning in &validation.warnings {
            crate::logging::warn(format!("{}: {}", path.display(), warning));
        }
        Ok(config)
    }

    pub fn validate(&self) -> PackConfigValidation {
        let mut validation = PackConfigValidation::default();
        if self.version != PACK_CONFIG_VERSION {
            validation
                .errors
                .push(format!("unsupported pack config version {}", self.version));
        }
        let mut seen = HashSet::new();
        for resource in &self.extra_resources {
            let trimmed = resource.trim();
            if trimmed.is_empty() {
                validation
                    .errors
                    .push("extra resource must not be empty".to_string());
                continue;
            }
            if trimmed.starts_with('/') || trimmed.split('/').any(|part| part == "..") {
                validation
                    .errors
                    .push(format!("extra resource must be relative: {}", trimmed));
            }
            if !seen.insert(trimmed.to_string()) {
                validation
                    .warnings
                    .push(format!("extra resource listed twice: {}", trimmed));
            }
        }
        validation
    }
}

/// Values given on the command line; `None` falls back to the environment.
#[derive(Clone, Debug, Default)]
pub struct SettingsOverrides {
    pub map_name: Option<String>,
    pub base_path: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct BuildSettings {
    pub map_name: String,
    pub base_path: PathBuf,
    pub out_dir: PathBuf,
    pub pack: PackConfig,
}

impl BuildSettings {
    pub fn new(map_name: impl Into<String>, base_path: impl Into<PathBuf>) -> Self {
        Self {
            map_name: normalize_map_name(&map_name.into()),
            base_path: base_path.into(),
            out_dir: PathBuf::from("."),
            pack: PackConfig::default(),
        }
    }

    /// Resolves settings from overrides and the process environment.
    /// Returns `Ok(None)` when the map name or base path is missing.
    pub fn resolve(overrides: SettingsOverrides) -> Result<Option<Self>, BuildError> {
        Self::resolve_with(overrides, |key| env::var(key).ok())
    }

    pub fn resolve_with(
        overrides: SettingsOverrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, BuildError> {
        let env_value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let map_name = overrides
            .map_name
            .filter(|value| !value.trim().is_empty())
            .or_else(|| env_value(ENV_MAP_NAME));
        let base_path = overrides
            .base_path
            .or_else(|| env_value(ENV_BASE_PATH).map(PathBuf::from));
        let (Some(map_name), Some(base_path)) = (map_name, base_path) else {
            return Ok(None);
        };

        let config_path = overrides
            .config
            .or_else(|| env_value(ENV_CONFIG).map(PathBuf::from));
        let pack = match config_path {
            Some(path) => PackConfig::load(&path)?,
            None => PackConfig::default(),
        };
        let out_dir = overrides
            .out_dir
            .or_else(|| env_value(ENV_OUT_DIR).map(PathBuf::from))
            .or_else(|| pack.out_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Some(Self {
            map_name: normalize_map_name(&map_name),
            base_path,
            out_dir,
            pack,
        }))
    }

    pub fn archive_name(&self) -> String {
        format!("{}.pk3", self.map_name)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.out_dir.join(self.archive_name())
    }
}

fn normalize_map_name(name: &str) -> String {
    let trimmed = name.trim();
    trimmed
        .strip_suffix(".map")
        .unwrap_or(trimmed)
        .to_string()
}
