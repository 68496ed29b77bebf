use std::ffi::OsString;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ForestConfig {
    pub forest: ForestLayout,
    pub stage: StageConfig,
}

impl ForestConfig {
    /// Read `path`, falling back to defaults when it is missing or unusable.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::info!("no {} found, using defaults", path.display());
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("loaded {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("failed to parse {}: {e}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("failed to read {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let f = &self.forest;
        if !(f.floor_radius.is_finite() && f.floor_radius > 0.0) {
            bail!("floor_radius must be positive, got {}", f.floor_radius);
        }
        if !(f.inner_margin >= 0.0 && f.inner_margin < f.floor_radius) {
            bail!(
                "inner_margin must lie in [0, {}), got {}",
                f.floor_radius,
                f.inner_margin
            );
        }
        if self.stage.viewport_width == 0 || self.stage.viewport_height == 0 {
            bail!(
                "viewport must be non-empty, got {}x{}",
                self.stage.viewport_width,
                self.stage.viewport_height
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestLayout {
    pub seed: Option<u64>,
    pub tree_count: usize,
    pub floor_radius: f32,
    pub inner_margin: f32,
}

impl Default for ForestLayout {
    fn default() -> Self {
        Self {
            seed: None,
            tree_count: 50,
            floor_radius: 100.0,
            inner_margin: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub background: u32,
    pub floor_color: u32,
    pub foliage_color: u32,
    pub bark_color: u32,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            background: 0x87ceeb,
            floor_color: 0x228833,
            foliage_color: 0x33aa33,
            bark_color: 0x886633,
            viewport_width: 1600,
            viewport_height: 900,
        }
    }
}

/// Command-line overrides layered on top of the JSON config.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub config_path: Option<String>,
    pub seed: Option<u64>,
    pub tree_count: Option<usize>,
    pub floor_radius: Option<f32>,
    pub inner_margin: Option<f32>,
}

impl CliOverrides {
    pub fn from_env_args() -> Result<Self> {
        Self::from_iter(
            std::env::args_os().skip(1),
            std::env::var_os("FOREST_GEN_SEED"),
        )
    }

    fn from_iter<I>(args: I, env_seed: Option<OsString>) -> Result<Self>
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut overrides = Self::default();

        if let Some(raw) = env_seed {
            let raw = raw.to_string_lossy();
            let raw = raw.trim();
            if !raw.is_empty() {
                overrides.seed = Some(
                    raw.parse()
                        .with_context(|| format!("FOREST_GEN_SEED is not a u64: {raw}"))?,
                );
            }
        }

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            let arg_str = arg.to_string_lossy().to_string();
            match arg_str.as_str() {
                "--config" => overrides.config_path = Some(value_for(&arg_str, iter.next())?),
                "--seed" => overrides.seed = Some(parse_value(&arg_str, iter.next())?),
                "--count" => overrides.tree_count = Some(parse_value(&arg_str, iter.next())?),
                "--radius" => overrides.floor_radius = Some(parse_value(&arg_str, iter.next())?),
                "--inner-margin" => {
                    overrides.inner_margin = Some(parse_value(&arg_str, iter.next())?)
                }
                other => log::warn!("ignoring unknown argument {other}"),
            }
        }

        Ok(overrides)
    }

    pub fn config_path(&self) -> &Path {
        Path::new(self.config_path.as_deref().unwrap_or(DEFAULT_CONFIG_PATH))
    }

    pub fn apply(&self, config: &mut ForestConfig) {
        let f = &mut config.forest;
        if let Some(seed) = self.seed {
            f.seed = Some(seed);
        }
        if let Some(count) = self.tree_count {
            f.tree_count = count;
        }
        if let Some(radius) = self.floor_radius {
            f.floor_radius = radius;
        }
        if let Some(margin) = self.inner_margin {
            f.inner_margin = margin;
        }
    }
}

fn value_for(flag: &str, value: Option<OsString>) -> Result<String> {
    let Some(value) = value else {
        return Err(anyhow!("{flag} requires a value"));
    };
    Ok(value.to_string_lossy().to_string())
}

fn parse_value<T>(flag: &str, value: Option<OsString>) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = value_for(flag, value)?;
    raw.parse()
        .with_context(|| format!("invalid value for {flag}: {raw}"))
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use super::{CliOverrides, ForestConfig};

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn defaults_match_reference_scene() {
        let config = ForestConfig::default();
        assert_eq!(config.forest.tree_count, 50);
        assert_eq!(config.forest.floor_radius, 100.0);
        assert_eq!(config.forest.inner_margin, 10.0);
        assert_eq!(config.forest.seed, None);
        assert_eq!(config.stage.background, 0x87ceeb);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ForestConfig =
            serde_json::from_str(r#"{ "forest": { "tree_count": 12, "seed": 9 } }"#).unwrap();
        assert_eq!(config.forest.tree_count, 12);
        assert_eq!(config.forest.seed, Some(9));
        assert_eq!(config.forest.floor_radius, 100.0);
        assert_eq!(config.stage.bark_color, 0x886633);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ForestConfig::load(std::path::Path::new("does/not/exist.json"));
        assert_eq!(config.forest.tree_count, 50);
    }

    #[test]
    fn validate_rejects_margin_outside_radius() {
        let mut config = ForestConfig::default();
        config.forest.inner_margin = 100.0;
        assert!(config.validate().is_err());
        config.forest.inner_margin = -1.0;
        assert!(config.validate().is_err());
        config.forest.inner_margin = 0.0;
        config.forest.floor_radius = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn cli_flags_override_config() {
        let overrides = CliOverrides::from_iter(
            args(&["--seed", "7", "--count", "3", "--radius", "40", "--inner-margin", "2"]),
            None,
        )
        .unwrap();
        let mut config = ForestConfig::default();
        overrides.apply(&mut config);
        assert_eq!(config.forest.seed, Some(7));
        assert_eq!(config.forest.tree_count, 3);
        assert_eq!(config.forest.floor_radius, 40.0);
        assert_eq!(config.forest.inner_margin, 2.0);
    }

    #[test]
    fn env_seed_is_used_unless_flag_given() {
        let from_env =
            CliOverrides::from_iter(Vec::<OsString>::new(), Some(OsString::from("11"))).unwrap();
        assert_eq!(from_env.seed, Some(11));

        let from_flag =
            CliOverrides::from_iter(args(&["--seed", "5"]), Some(OsString::from("11"))).unwrap();
        assert_eq!(from_flag.seed, Some(5));
    }

    #[test]
    fn missing_or_bad_values_are_errors() {
        assert!(CliOverrides::from_iter(args(&["--count"]), None).is_err());
        assert!(CliOverrides::from_iter(args(&["--count", "many"]), None).is_err());
        assert!(
            CliOverrides::from_iter(Vec::<OsString>::new(), Some(OsString::from("x"))).is_err()
        );
    }

    #[test]
    fn config_path_defaults_to_config_json() {
        let overrides = CliOverrides::default();
        assert_eq!(overrides.config_path(), std::path::Path::new("config.json"));
        let custom = CliOverrides::from_iter(args(&["--config", "forest.json"]), None).unwrap();
        assert_eq!(custom.config_path(), std::path::Path::new("forest.json"));
    }
}
