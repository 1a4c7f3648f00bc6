use rust_decimal::Decimal;
use tracing::warn;

use super::util::{price_filter_consumption, price_filter_tier, product_filter, regex_filter};
use crate::schema::{AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem};

const LOG_ANALYTICS_SERVICE: &str = "Log Analytics";
const AZURE_MONITOR_SERVICE: &str = "Azure Monitor";
const PRODUCT_FAMILY: &str = "Management and Governance";
const PAY_AS_YOU_GO: &str = "Pay-as-you-go";

/// Days of retention included at no cost
const FREE_RETENTION_DAYS: i64 = 30;
/// Daily capacity reservation levels, in GB
const COMMITMENT_TIERS: &[i64] = &[100, 200, 300, 400, 500, 1000, 2000, 5000];
const LEGACY_SKUS: &[&str] = &["unlimited", "standard", "premium", "pernode"];

#[derive(Debug, Clone, Default)]
pub struct LogAnalyticsWorkspace {
    pub address: String,
    pub region: String,
    /// `PerGB2018`, `CapacityReservation`, `Free` or a legacy SKU
    pub sku: String,
    pub reservation_capacity_in_gb_per_day: i64,
    pub retention_in_days: i64,
    pub sentinel_enabled: bool,

    pub monthly_log_data_ingestion_gb: Option<Decimal>,
    pub monthly_additional_log_data_retention_gb: Option<Decimal>,
    pub monthly_log_data_export_gb: Option<Decimal>,
    pub monthly_sentinel_data_ingestion_gb: Option<Decimal>,
}

/// Largest commitment tier not above the reserved capacity. Capacities below
/// the smallest tier use the smallest.
fn commitment_tier(capacity: i64) -> i64 {
    COMMITMENT_TIERS
        .iter()
        .rev()
        .copied()
        .find(|tier| *tier <= capacity)
        .unwrap_or(COMMITMENT_TIERS[0])
}

impl LogAnalyticsWorkspace {
    fn ingestion_cost_component(&self, name: &str, gb: Option<Decimal>) -> CostComponent {
        CostComponent {
            name: name.to_string(),
            unit: "GB".to_string(),
            monthly_quantity: gb,
            product_filter: product_filter(
                &self.region,
                LOG_ANALYTICS_SERVICE,
                PRODUCT_FAMILY,
                vec![
                    AttributeFilter::exact("skuName", PAY_AS_YOU_GO),
                    AttributeFilter::regex("meterName", regex_filter("Data Ingestion$")),
                ],
            ),
            price_filter: price_filter_tier("5"),
            ..Default::default()
        }
    }

    fn reservation_cost_component(&self, name: &str) -> CostComponent {
        let tier = commitment_tier(self.reservation_capacity_in_gb_per_day);

        CostComponent {
            name: name.to_string(),
            unit: format!("{tier} GB (per day)"),
            monthly_quantity: Some(Decimal::from(30)),
            product_filter: product_filter(
                &self.region,
                AZURE_MONITOR_SERVICE,
                PRODUCT_FAMILY,
                vec![
                    AttributeFilter::exact("skuName", format!("{tier} GB Commitment Tier")),
                    AttributeFilter::regex("meterName", format!("^{tier} GB Commitment Tier")),
                ],
            ),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }

    fn retention_cost_component(&self) -> CostComponent {
        CostComponent {
            name: "Log data retention".to_string(),
            unit: "GB".to_string(),
            monthly_quantity: self.monthly_additional_log_data_retention_gb,
            product_filter: product_filter(
                &self.region,
                LOG_ANALYTICS_SERVICE,
                PRODUCT_FAMILY,
                vec![
                    AttributeFilter::exact("skuName", PAY_AS_YOU_GO),
                    AttributeFilter::regex("meterName", regex_filter("Data Retention$")),
                ],
            ),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }

    fn export_cost_component(&self) -> CostComponent {
        CostComponent {
            name: "Log data export".to_string(),
            unit: "GB".to_string(),
            monthly_quantity: self.monthly_log_data_export_gb,
            product_filter: product_filter(
                &self.region,
                AZURE_MONITOR_SERVICE,
                PRODUCT_FAMILY,
                vec![
                    AttributeFilter::exact("skuName", "Log Analytics data export"),
                    AttributeFilter::regex("meterName", regex_filter("Data Exported$")),
                ],
            ),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }
}

impl CoreResource for LogAnalyticsWorkspace {
    fn core_type(&self) -> &'static str {
        "LogAnalyticsWorkspace"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::float("monthly_log_data_ingestion_gb"),
            UsageItem::float("monthly_additional_log_data_retention_gb"),
            UsageItem::float("monthly_log_data_export_gb"),
            UsageItem::float("monthly_sentinel_data_ingestion_gb"),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_log_data_ingestion_gb = usage.get_decimal("monthly_log_data_ingestion_gb");
        self.monthly_additional_log_data_retention_gb =
            usage.get_decimal("monthly_additional_log_data_retention_gb");
        self.monthly_log_data_export_gb = usage.get_decimal("monthly_log_data_export_gb");
        self.monthly_sentinel_data_ingestion_gb =
            usage.get_decimal("monthly_sentinel_data_ingestion_gb");
    }

    fn build_resource(&self) -> Option<Resource> {
        if self.sku == "Free" {
            return Some(Resource {
                name: self.address.clone(),
                is_skipped: true,
                no_price: true,
                usage_schema: self.usage_schema(),
                ..Default::default()
            });
        }

        if LEGACY_SKUS.contains(&self.sku.to_lowercase().as_str()) {
            warn!(
                address = %self.address,
                sku = %self.sku,
                "Skipping workspace with legacy pricing"
            );
            return Some(Resource {
                name: self.address.clone(),
                is_skipped: true,
                skip_message: Some("Legacy pricing options are not supported".to_string()),
                usage_schema: self.usage_schema(),
                ..Default::default()
            });
        }

        let mut cost_components = Vec::new();

        if self.sku == "PerGB2018" {
            cost_components.push(self.ingestion_cost_component(
                "Log data ingestion",
                self.monthly_log_data_ingestion_gb,
            ));
            if self.sentinel_enabled {
                cost_components.push(self.ingestion_cost_component(
                    "Sentinel data ingestion",
                    self.monthly_sentinel_data_ingestion_gb,
                ));
            }
        }

        if self.sku == "CapacityReservation" && self.reservation_capacity_in_gb_per_day > 0 {
            cost_components.push(self.reservation_cost_component("Log data ingestion"));
            if self.sentinel_enabled {
                cost_components.push(self.reservation_cost_component("Sentinel data ingestion"));
            }
        }

        if self.retention_in_days > FREE_RETENTION_DAYS {
            cost_components.push(self.retention_cost_component());
        }
        cost_components.push(self.export_cost_component());

        Some(Resource {
            name: self.address.clone(),
            cost_components,
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn workspace(sku: &str) -> LogAnalyticsWorkspace {
        LogAnalyticsWorkspace {
            address: "azurerm_log_analytics_workspace.logs".to_string(),
            region: "eastus".to_string(),
            sku: sku.to_string(),
            retention_in_days: 30,
            ..Default::default()
        }
    }

    #[rstest]
    #[case(100, 100)]
    #[case(250, 200)]
    #[case(1000, 1000)]
    #[case(4999, 2000)]
    #[case(9000, 5000)]
    #[case(50, 100)]
    fn test_commitment_tier(#[case] capacity: i64, #[case] expected: i64) {
        assert_eq!(commitment_tier(capacity), expected);
    }

    #[test]
    fn test_per_gb_with_sentinel_and_retention() {
        let workspace = LogAnalyticsWorkspace {
            sentinel_enabled: true,
            retention_in_days: 90,
            monthly_log_data_ingestion_gb: Some(dec!(500)),
            ..workspace("PerGB2018")
        };
        let resource = workspace.build_resource().unwrap();

        let names: Vec<&str> = resource.cost_components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Log data ingestion",
                "Sentinel data ingestion",
                "Log data retention",
                "Log data export"
            ]
        );
        assert_eq!(resource.cost_components[0].monthly_quantity, Some(dec!(500)));
        let price_filter = resource.cost_components[0].price_filter.as_ref().unwrap();
        assert_eq!(price_filter.start_usage_amount.as_deref(), Some("5"));
    }

    #[test]
    fn test_capacity_reservation() {
        let workspace = LogAnalyticsWorkspace {
            reservation_capacity_in_gb_per_day: 350,
            ..workspace("CapacityReservation")
        };
        let resource = workspace.build_resource().unwrap();

        let ingestion = &resource.cost_components[0];
        assert_eq!(ingestion.unit, "300 GB (per day)");
        assert_eq!(ingestion.monthly_quantity, Some(dec!(30)));
        assert_eq!(
            ingestion.product_filter.as_ref().unwrap().attribute_filters[0],
            AttributeFilter::exact("skuName", "300 GB Commitment Tier")
        );
        assert_eq!(resource.cost_components.len(), 2);
    }

    #[test]
    fn test_free_and_legacy_skus_are_skipped() {
        let free = workspace("Free").build_resource().unwrap();
        assert!(free.is_skipped && free.no_price);

        let legacy = workspace("PerNode").build_resource().unwrap();
        assert!(legacy.is_skipped);
        assert!(!legacy.no_price);
        assert!(legacy.cost_components.is_empty());
    }
}
