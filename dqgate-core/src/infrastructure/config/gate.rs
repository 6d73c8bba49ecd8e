// dqgate-core/src/infrastructure/config/gate.rs

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::quality::{RangeRule, ThresholdConfig};
use crate::infrastructure::error::InfrastructureError;

pub const CONFIG_CANDIDATES: [&str; 2] = ["dqgate.yaml", "dqgate_config.yaml"];
pub const ENV_OUTPUT_DIR: &str = "DQGATE_OUTPUT_DIR";
pub const ENV_SCHEMAS_DIR: &str = "DQGATE_SCHEMAS_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GateConfig {
    /// Root of the local artifact store.
    pub output_dir: PathBuf,

    /// Schema YAML directory. Built-in schemas are used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemas_dir: Option<PathBuf>,

    #[validate(nested)]
    pub thresholds: ThresholdConfig,

    /// Entities evaluated at the same time by `evaluate_all`.
    #[validate(range(min = 1, max = 64))]
    pub concurrency: usize,

    pub entities: BTreeMap<String, EntityRules>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dq_output"),
            schemas_dir: None,
            thresholds: ThresholdConfig::default(),
            concurrency: 4,
            entities: BTreeMap::new(),
        }
    }
}

impl GateConfig {
    pub fn rules_for(&self, entity: &str) -> Option<&EntityRules> {
        self.entities.get(entity)
    }
}

/// Checks to run for one entity. Empty lists skip the matching check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityRules {
    pub required_columns: Vec<String>,
    pub key_columns: Vec<String>,
    pub ranges: BTreeMap<String, RangeRule>,
    pub timestamp_column: Option<String>,
    pub expected_min_rows: Option<u64>,
    pub expected_max_rows: Option<u64>,
    pub variance_threshold_pct: Option<f64>,
    /// Column -> name of a reference set supplied with the batch.
    pub references: BTreeMap<String, String>,
    pub quarantine_invalid: bool,
}

impl Default for EntityRules {
    fn default() -> Self {
        Self {
            required_columns: Vec::new(),
            key_columns: Vec::new(),
            ranges: BTreeMap::new(),
            timestamp_column: None,
            expected_min_rows: None,
            expected_max_rows: None,
            variance_threshold_pct: None,
            references: BTreeMap::new(),
            quarantine_invalid: true,
        }
    }
}

#[instrument(skip(config_dir))]
pub fn load_gate_config(config_dir: &Path) -> Result<GateConfig, InfrastructureError> {
    let config_path = find_config(config_dir)?;
    info!(path = ?config_path, "Loading gate configuration");

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read gate config at {:?}", config_path))?;
    let mut config: GateConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse gate config YAML at {:?}", config_path))?;

    // Paths in the file are relative to the file.
    if config.output_dir.is_relative() {
        config.output_dir = config_dir.join(&config.output_dir);
    }
    if let Some(dir) = config.schemas_dir.as_mut()
        && dir.is_relative()
    {
        *dir = config_dir.join(&*dir);
    }

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    config.thresholds.ensure_valid().map_err(|e| {
        InfrastructureError::ConfigError(format!("{:?}: {}", config_path, e))
    })?;
    config.validate().map_err(|e| {
        InfrastructureError::ConfigError(format!("{:?}: {}", config_path, e))
    })?;

    Ok(config)
}

fn find_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CONFIG_CANDIDATES
    )))
}

fn apply_env_overrides<F>(config: &mut GateConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(ENV_OUTPUT_DIR) {
        info!(old = ?config.output_dir, new = ?val, "Overriding output dir via ENV");
        config.output_dir = PathBuf::from(val);
    }
    if let Some(val) = lookup(ENV_SCHEMAS_DIR) {
        info!(old = ?config.schemas_dir, new = ?val, "Overriding schemas dir via ENV");
        config.schemas_dir = Some(PathBuf::from(val));
    }
}
