use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use jsonschema::{JSONSchema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    market::{Capacity, MarketConfig, Scenario},
    sweep::{Algorithm, ResourceIsolation},
};

const SCHEMA_FILE_NAME: &str = "dat-market.schema.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub market: MarketSettings,
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_base_price() -> f64 {
    0.1
}

fn default_discount_rate() -> f64 {
    0.3
}

fn default_max_capacity() -> Capacity {
    10
}

fn default_beta() -> f64 {
    0.5
}

fn default_user_count() -> usize {
    100
}

fn default_resource_count() -> usize {
    50
}

fn default_beta_values() -> Vec<f64> {
    (1..=10).map(|step| f64::from(step) / 10.0).collect()
}

fn default_scenarios() -> Vec<Scenario> {
    Scenario::ALL.to_vec()
}

fn default_algorithms() -> Vec<Algorithm> {
    Algorithm::ALL.to_vec()
}

fn default_seed() -> u64 {
    2024
}

fn default_logging_dir() -> PathBuf {
    PathBuf::from("./logs/sweep")
}

fn default_logging_filter() -> String {
    "info".to_string()
}

fn default_logging_rotation() -> LoggingRotation {
    LoggingRotation::Daily
}

fn default_logging_retention_days() -> usize {
    14
}

fn default_enabled_true() -> bool {
    true
}

/// Raw market parameters as written in the config file. Turned into a
/// validated [`MarketConfig`] with [`MarketSettings::to_market_config`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSettings {
    #[serde(default = "default_base_price")]
    pub base_price: f64,
    #[serde(default = "default_discount_rate")]
    pub discount_rate: f64,
    #[serde(default = "default_max_capacity")]
    pub max_capacity: Capacity,
    #[serde(default = "default_beta")]
    pub beta: f64,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            base_price: default_base_price(),
            discount_rate: default_discount_rate(),
            max_capacity: default_max_capacity(),
            beta: default_beta(),
        }
    }
}

impl MarketSettings {
    pub fn to_market_config(&self) -> Result<MarketConfig> {
        MarketConfig::new(
            self.base_price,
            self.discount_rate,
            self.max_capacity,
            self.beta,
        )
        .context("invalid market configuration")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(default = "default_user_count")]
    pub user_count: usize,
    #[serde(default = "default_resource_count")]
    pub resource_count: usize,
    #[serde(default = "default_beta_values")]
    pub beta_values: Vec<f64>,
    #[serde(default = "default_scenarios")]
    pub scenarios: Vec<Scenario>,
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<Algorithm>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub isolation: ResourceIsolation,
    #[serde(default)]
    pub calibrate: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            user_count: default_user_count(),
            resource_count: default_resource_count(),
            beta_values: default_beta_values(),
            scenarios: default_scenarios(),
            algorithms: default_algorithms(),
            seed: default_seed(),
            isolation: ResourceIsolation::default(),
            calibrate: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LoggingRotation {
    Daily,
    Hourly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_logging_filter")]
    pub filter: String,
    #[serde(default = "default_logging_rotation")]
    pub rotation: LoggingRotation,
    #[serde(default = "default_logging_retention_days")]
    pub retention_days: usize,
    #[serde(default = "default_enabled_true")]
    pub stderr_warn_enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_logging_dir(),
            filter: default_logging_filter(),
            rotation: default_logging_rotation(),
            retention_days: default_logging_retention_days(),
            stderr_warn_enabled: true,
        }
    }
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config_value: Value = json5::from_str(&config_content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        let config_base = config_path.parent().unwrap_or_else(|| Path::new("."));
        let schema_path = resolve_schema_path(config_base, &config_value)?;
        validate_against_schema(&config_value, &schema_path)?;

        let mut config: Config =
            serde_json::from_value(config_value).context("failed to deserialize config")?;

        config.market.to_market_config()?;
        for beta in &config.sweep.beta_values {
            if !beta.is_finite() || !(0.0..=1.0).contains(beta) {
                return Err(anyhow!("sweep.beta_values entry {beta} is outside [0, 1]"));
            }
        }

        if !config.logging.dir.is_absolute() {
            config.logging.dir = config_base.join(&config.logging.dir);
        }

        Ok(config)
    }
}

fn resolve_schema_path(config_base: &Path, config_value: &Value) -> Result<PathBuf> {
    if let Some(path_text) = config_value.get("$schema").and_then(|value| value.as_str()) {
        let configured = PathBuf::from(path_text);
        if configured.is_absolute() {
            return Ok(configured);
        }
        return Ok(config_base.join(&configured));
    }

    let local_default = config_base.join(SCHEMA_FILE_NAME);
    if local_default.exists() {
        return Ok(local_default);
    }

    Err(anyhow!(
        "unable to resolve schema path: expected $schema in config or {SCHEMA_FILE_NAME} next to it"
    ))
}

fn validate_against_schema(config_value: &Value, schema_path: &Path) -> Result<()> {
    let schema_content = fs::read_to_string(schema_path)
        .with_context(|| format!("failed to read schema {}", schema_path.display()))?;
    let schema: Value = serde_json::from_str(&schema_content)
        .with_context(|| format!("failed to parse schema {}", schema_path.display()))?;

    let compiled =
        JSONSchema::compile(&schema).map_err(|e| anyhow!("failed to compile schema: {e}"))?;

    match compiled.validate(config_value) {
        Ok(()) => Ok(()),
        Err(errors_iter) => {
            let validation_errors: Vec<ValidationError> = errors_iter.collect();
            let messages: Vec<String> = validation_errors
                .into_iter()
                .map(|error| error.to_string())
                .collect();
            Err(anyhow!("config validation failed: {}", messages.join("; ")))
        }
    }
}
