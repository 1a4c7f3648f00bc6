use crate::{env_or_default, ConfigError, FromEnv};
use std::env;
use std::path::PathBuf;

/// Inputs for a cost estimate
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EstimationConfig {
    /// JSON usage file with per-resource usage estimates
    pub usage_file: Option<PathBuf>,
    /// JSON array of prices resolved against cost components
    pub price_catalog_file: Option<PathBuf>,
    /// Region for resources that do not declare one, in Azure CLI form (`eastus`)
    pub default_region: String,
    pub currency: String,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            usage_file: None,
            price_catalog_file: None,
            default_region: "eastus".to_string(),
            currency: "USD".to_string(),
        }
    }
}

impl FromEnv for EstimationConfig {
    /// Reads from environment variables:
    /// - USAGE_FILE: optional
    /// - PRICE_CATALOG_FILE: optional
    /// - AZURE_DEFAULT_REGION: defaults to eastus
    /// - CURRENCY: defaults to USD
    fn from_env() -> Result<Self, ConfigError> {
        let default_region: String = env_or_default("AZURE_DEFAULT_REGION", "eastus")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        if default_region.is_empty() {
            return Err(ConfigError::ParseError {
                key: "AZURE_DEFAULT_REGION".to_string(),
                details: "region must not be empty".to_string(),
            });
        }

        let currency = env_or_default("CURRENCY", "USD").to_uppercase();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::ParseError {
                key: "CURRENCY".to_string(),
                details: format!("'{}' is not a three letter currency code", currency),
            });
        }

        Ok(Self {
            usage_file: optional_path("USAGE_FILE"),
            price_catalog_file: optional_path("PRICE_CATALOG_FILE"),
            default_region,
            currency,
        })
    }
}

fn optional_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 4] = [
        "USAGE_FILE",
        "PRICE_CATALOG_FILE",
        "AZURE_DEFAULT_REGION",
        "CURRENCY",
    ];

    #[test]
    fn test_estimation_config_defaults() {
        temp_env::with_vars(KEYS.map(|k| (k, None::<&str>)), || {
            let config = EstimationConfig::from_env().unwrap();
            assert_eq!(config, EstimationConfig::default());
        });
    }

    #[test]
    fn test_estimation_config_custom_values() {
        temp_env::with_vars(
            [
                ("USAGE_FILE", Some("cost-usage.json")),
                ("PRICE_CATALOG_FILE", Some("/tmp/prices.json")),
                ("AZURE_DEFAULT_REGION", Some("West Europe")),
                ("CURRENCY", Some("eur")),
            ],
            || {
                let config = EstimationConfig::from_env().unwrap();
                assert_eq!(config.usage_file, Some(PathBuf::from("cost-usage.json")));
                assert_eq!(config.price_catalog_file, Some(PathBuf::from("/tmp/prices.json")));
                assert_eq!(config.default_region, "westeurope");
                assert_eq!(config.currency, "EUR");
            },
        );
    }

    #[test]
    fn test_estimation_config_blank_paths_are_ignored() {
        temp_env::with_vars(
            [("USAGE_FILE", Some("  ")), ("PRICE_CATALOG_FILE", None)],
            || {
                let config = EstimationConfig::from_env().unwrap();
                assert!(config.usage_file.is_none());
                assert!(config.price_catalog_file.is_none());
            },
        );
    }

    #[test]
    fn test_estimation_config_invalid_currency() {
        temp_env::with_var("CURRENCY", Some("dollars"), || {
            let err = EstimationConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("CURRENCY"));
        });
    }

    #[test]
    fn test_estimation_config_empty_region() {
        temp_env::with_var("AZURE_DEFAULT_REGION", Some(" "), || {
            let err = EstimationConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("AZURE_DEFAULT_REGION"));
        });
    }
}
