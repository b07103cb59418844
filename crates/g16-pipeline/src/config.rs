// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Pipeline configuration.
//!
//! Stored as JSON at `~/.g16/config.json`. `G16_CURVE` and `G16_SEED` in the
//! environment override whatever the file says.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use g16_circuit::{square_assignment, Assignment};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::lifecycle::Stage;

pub const CURVE_ENV: &str = "G16_CURVE";
pub const SEED_ENV: &str = "G16_SEED";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot determine home directory")]
    NoHome,

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown curve `{0}` (expected bn254 or bls12-381)")]
    UnknownCurve(String),

    #[error("invalid seed `{0}`")]
    InvalidSeed(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curve {
    #[default]
    #[serde(rename = "bn254")]
    Bn254,
    #[serde(rename = "bls12-381")]
    Bls12_381,
}

impl Curve {
    pub fn as_str(self) -> &'static str {
        match self {
            Curve::Bn254 => "bn254",
            Curve::Bls12_381 => "bls12-381",
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Curve {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bn254" | "bn128" | "bn" => Ok(Curve::Bn254),
            "bls12-381" | "bls12_381" | "bls" => Ok(Curve::Bls12_381),
            _ => Err(ConfigError::UnknownCurve(s.to_string())),
        }
    }
}

/// Where a stage's randomness comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entropy {
    Os,
    /// Reproducible runs; never use for real keys
    Seeded(u64),
}

impl Entropy {
    /// Fresh generator for one stage. Callers drop it when the stage returns.
    pub fn rng(self, stage: Stage) -> StdRng {
        match self {
            Entropy::Os => StdRng::from_entropy(),
            Entropy::Seeded(seed) => StdRng::seed_from_u64(seed.wrapping_add(stage as u64)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub curve: Curve,
    pub seed: Option<u64>,
    pub assignment: Assignment,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            curve: Curve::default(),
            seed: None,
            assignment: square_assignment(3, 9),
        }
    }
}

impl PipelineConfig {
    pub fn entropy(&self) -> Entropy {
        self.seed.map_or(Entropy::Os, Entropy::Seeded)
    }

    /// Load `~/.g16/config.json` (defaults if absent) and apply env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(io_err)
    }

    /// Apply `G16_CURVE` / `G16_SEED` as returned by `lookup`.
    pub fn apply_overrides<L>(&mut self, lookup: L) -> Result<(), ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        if let Some(curve) = lookup(CURVE_ENV) {
            self.curve = curve.parse()?;
        }
        if let Some(seed) = lookup(SEED_ENV) {
            self.seed = Some(parse_seed(&seed)?);
        }
        Ok(())
    }
}

pub fn parse_seed(raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidSeed(raw.to_string()))
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHome)?;
    Ok(home.join(".g16").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn default_is_bn254_three_nine() {
        let config = PipelineConfig::default();
        assert_eq!(config.curve, Curve::Bn254);
        assert_eq!(config.seed, None);
        assert_eq!(config.entropy(), Entropy::Os);
        assert_eq!(config.assignment.get("X"), Some("3"));
        assert_eq!(config.assignment.get("Y"), Some("9"));
    }

    #[test]
    fn curve_aliases() {
        assert_eq!("BN254".parse::<Curve>().unwrap(), Curve::Bn254);
        assert_eq!("bn128".parse::<Curve>().unwrap(), Curve::Bn254);
        assert_eq!("bls".parse::<Curve>().unwrap(), Curve::Bls12_381);
        assert!(matches!(
            "secp256k1".parse::<Curve>(),
            Err(ConfigError::UnknownCurve(_))
        ));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = PipelineConfig::default();
        config
            .apply_overrides(|key| match key {
                CURVE_ENV => Some("bls12-381".into()),
                SEED_ENV => Some("7".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.curve, Curve::Bls12_381);
        assert_eq!(config.entropy(), Entropy::Seeded(7));
    }

    #[test]
    fn bad_seed_override_rejected() {
        let mut config = PipelineConfig::default();
        let err = config
            .apply_overrides(|key| (key == SEED_ENV).then(|| "-1".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSeed(_)));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = PipelineConfig {
            curve: Curve::Bls12_381,
            seed: Some(42),
            assignment: square_assignment(4, 16),
        };
        config.save_to(&path).unwrap();
        assert_eq!(PipelineConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "curve": "bls12-381" }"#).unwrap();
        let config = PipelineConfig::load_from(&path).unwrap();
        assert_eq!(config.curve, Curve::Bls12_381);
        assert_eq!(config.assignment, square_assignment(3, 9));
    }

    #[test]
    fn seeded_stages_get_distinct_streams() {
        let entropy = Entropy::Seeded(42);
        let a = entropy.rng(Stage::Setup).next_u64();
        let b = entropy.rng(Stage::Prove).next_u64();
        assert_ne!(a, b);
        assert_eq!(a, entropy.rng(Stage::Setup).next_u64());
    }
}
