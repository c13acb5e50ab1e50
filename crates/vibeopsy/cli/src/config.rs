//! Kiosk configuration.
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! file, then `VIBEOPSY_`-prefixed environment variables using `__` between
//! sections (for example `VIBEOPSY_CLASSIFIER__STRATEGY=deterministic-hash`).

use std::path::Path;

use serde::{Deserialize, Serialize};
use vibeopsy_engine::SynthesisConfig;
use vibeopsy_inference::InferenceConfig;
use vibeopsy_taxonomy::TaxonomyRegistry;
use vibeopsy_types::{Category, ScanResult, Strategy};

const ENV_PREFIX: &str = "VIBEOPSY";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Synthesis bands and hash confidence
    #[serde(default)]
    pub engine: SynthesisConfig,

    /// Local classifier settings
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Remote inference endpoint
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Replacement taxonomy; the skin-lesion categories when absent
    #[serde(default)]
    pub taxonomy: Option<Vec<Category>>,
}

/// Synthetic classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Synthesis strategy
    #[serde(default)]
    pub strategy: Strategy,

    /// Fixed RNG seed for reproducible tiered-random scans
    #[serde(default)]
    pub seed: Option<u64>,

    /// Simulated scan latency in milliseconds
    #[serde(default = "default_scan_delay_ms")]
    pub scan_delay_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            seed: None,
            scan_delay_ms: default_scan_delay_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers

fn default_scan_delay_ms() -> u64 {
    2400
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl ScanConfig {
    /// Load configuration from defaults, an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&ScanConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> ScanResult<()> {
        self.engine.validate()
    }

    /// Registry the kiosk scores against.
    pub fn registry(&self) -> ScanResult<TaxonomyRegistry> {
        match &self.taxonomy {
            Some(categories) => TaxonomyRegistry::new(categories.clone()),
            None => Ok(TaxonomyRegistry::skin_lesions()),
        }
    }
}
