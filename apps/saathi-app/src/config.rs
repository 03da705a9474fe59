//! # Application Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SAATHI_WASTE_RATE_PAISE=500                                        │
//! │     SAATHI_BACKEND_LATENCY_MS=300                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/saathi-circle/saathi.toml (Linux)                        │
//! │     ~/Library/Application Support/in.saathi.circle/saathi.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [app]
//! name = "Saathi Circle"
//!
//! [credits]
//! waste_rate_paise_per_kg = 500
//!
//! [simulation]
//! backend_latency_ms = 0
//! vendor_notification_delay_ms = 2000
//! demo_login_delay_ms = 500
//! otp_length = 6
//!
//! [demo]
//! seed_data = true
//! ```

use std::path::PathBuf;
use std::time::Duration;

use saathi_core::{Money, OTP_LENGTH, WASTE_CREDIT_RATE_PER_KG};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

// =============================================================================
// Config Error
// =============================================================================

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Sections
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
}

fn default_app_name() -> String {
    "Saathi Circle".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            name: default_app_name(),
        }
    }
}

/// Credit policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditSettings {
    /// Waste credit paid per kilogram, in paise.
    #[serde(default = "default_waste_rate")]
    pub waste_rate_paise_per_kg: i64,
}

fn default_waste_rate() -> i64 {
    WASTE_CREDIT_RATE_PER_KG.paise()
}

impl Default for CreditSettings {
    fn default() -> Self {
        CreditSettings {
            waste_rate_paise_per_kg: default_waste_rate(),
        }
    }
}

/// Timings of the simulated backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Delay applied to every backend command.
    #[serde(default)]
    pub backend_latency_ms: u64,

    /// Delay before the "vendor notified" message after a waste pickup.
    #[serde(default = "default_vendor_notification_delay")]
    pub vendor_notification_delay_ms: u64,

    /// Delay before a demo login completes.
    #[serde(default = "default_demo_login_delay")]
    pub demo_login_delay_ms: u64,

    #[serde(default = "default_otp_length")]
    pub otp_length: usize,
}

fn default_vendor_notification_delay() -> u64 {
    2000
}

fn default_demo_login_delay() -> u64 {
    500
}

fn default_otp_length() -> usize {
    OTP_LENGTH
}

impl Default for SimulationSettings {
    fn default() -> Self {
        SimulationSettings {
            backend_latency_ms: 0,
            vendor_notification_delay_ms: default_vendor_notification_delay(),
            demo_login_delay_ms: default_demo_login_delay(),
            otp_length: default_otp_length(),
        }
    }
}

/// Demo data switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoSettings {
    /// Seed vendors, staff and two open orders at startup.
    #[serde(default = "default_true")]
    pub seed_data: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DemoSettings {
    fn default() -> Self {
        DemoSettings { seed_data: true }
    }
}

// =============================================================================
// App Config
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,

    #[serde(default)]
    pub credits: CreditSettings,

    #[serde(default)]
    pub simulation: SimulationSettings,

    #[serde(default)]
    pub demo: DemoSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (saathi.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document; missing keys take their defaults.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.credits.waste_rate_paise_per_kg <= 0 {
            return Err(ConfigError::Invalid(
                "waste_rate_paise_per_kg must be greater than 0".into(),
            ));
        }

        if self.simulation.otp_length == 0 {
            return Err(ConfigError::Invalid(
                "otp_length must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `SAATHI_*` overrides from `lookup`. Unparseable values are
    /// logged and ignored.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("SAATHI_APP_NAME") {
            self.app.name = name;
        }

        if let Some(rate) = lookup("SAATHI_WASTE_RATE_PAISE") {
            match rate.parse::<i64>() {
                Ok(r) => {
                    debug!(rate = r, "Overriding waste credit rate from environment");
                    self.credits.waste_rate_paise_per_kg = r;
                }
                Err(_) => warn!(value = %rate, "Ignoring invalid SAATHI_WASTE_RATE_PAISE"),
            }
        }

        if let Some(latency) = lookup("SAATHI_BACKEND_LATENCY_MS") {
            match latency.parse::<u64>() {
                Ok(ms) => self.simulation.backend_latency_ms = ms,
                Err(_) => warn!(value = %latency, "Ignoring invalid SAATHI_BACKEND_LATENCY_MS"),
            }
        }

        if let Some(delay) = lookup("SAATHI_NOTIFICATION_DELAY_MS") {
            match delay.parse::<u64>() {
                Ok(ms) => self.simulation.vendor_notification_delay_ms = ms,
                Err(_) => warn!(value = %delay, "Ignoring invalid SAATHI_NOTIFICATION_DELAY_MS"),
            }
        }

        if let Some(seed) = lookup("SAATHI_SEED_DATA") {
            match seed.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.demo.seed_data = true,
                "0" | "false" | "no" => self.demo.seed_data = false,
                _ => warn!(value = %seed, "Unknown SAATHI_SEED_DATA value"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("in", "saathi", "circle")
            .map(|dirs| dirs.config_dir().join("saathi.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn waste_rate(&self) -> Money {
        Money::from_paise(self.credits.waste_rate_paise_per_kg)
    }

    pub fn backend_latency(&self) -> Duration {
        Duration::from_millis(self.simulation.backend_latency_ms)
    }

    pub fn vendor_notification_delay(&self) -> Duration {
        Duration::from_millis(self.simulation.vendor_notification_delay_ms)
    }

    pub fn demo_login_delay(&self) -> Duration {
        Duration::from_millis(self.simulation.demo_login_delay_ms)
    }

    /// Config tuned for tests: no delays, demo data seeded.
    pub fn for_tests() -> Self {
        let mut config = Self::default();
        config.simulation.vendor_notification_delay_ms = 0;
        config.simulation.demo_login_delay_ms = 0;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.waste_rate(), Money::from_paise(500));
        assert_eq!(config.simulation.otp_length, 6);
        assert_eq!(config.vendor_notification_delay(), Duration::from_secs(2));
        assert!(config.demo.seed_data);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [credits]
            waste_rate_paise_per_kg = 700

            [simulation]
            backend_latency_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.waste_rate(), Money::from_paise(700));
        assert_eq!(config.backend_latency(), Duration::from_millis(250));
        assert_eq!(config.simulation.demo_login_delay_ms, 500);
        assert_eq!(config.app.name, "Saathi Circle");
    }

    #[test]
    fn test_unknown_app_keys_are_ignored() {
        let config = AppConfig::from_toml(
            r#"
            [app]
            name = "Saathi Pune"
            currency_symbol = "Rs."
            "#,
        )
        .unwrap();

        assert_eq!(config.app.name, "Saathi Pune");
        assert_eq!(config.waste_rate().to_string(), "₹5.00");
    }

    #[test]
    fn test_invalid_toml() {
        let result = AppConfig::from_toml("[credits]\nwaste_rate_paise_per_kg = \"five\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validate_rejects_zero_rate() {
        let mut config = AppConfig::default();
        config.credits.waste_rate_paise_per_kg = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SAATHI_WASTE_RATE_PAISE", "600"),
            ("SAATHI_BACKEND_LATENCY_MS", "not-a-number"),
            ("SAATHI_SEED_DATA", "false"),
        ]);

        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.credits.waste_rate_paise_per_kg, 600);
        assert_eq!(config.simulation.backend_latency_ms, 0);
        assert!(!config.demo.seed_data);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("saathi-config-that-does-not-exist.toml");
        let config = AppConfig::load(Some(path)).unwrap();
        assert_eq!(config.app.name, "Saathi Circle");
    }
}
