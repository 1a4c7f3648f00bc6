use rust_decimal::Decimal;
use tracing::warn;

use super::flexible_server::{FlexibleServerSku, FlexibleServerTier};
use super::util::{price_filter_consumption, product_filter, regex_filter};
use crate::schema::{AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem};

const SERVICE: &str = "Azure Database for MySQL";
const STORAGE_PRODUCT: &str = "Azure Database for MySQL Flexible Server Storage";
const MIN_STORAGE_GB: i64 = 20;
const FREE_IOPS: i64 = 360;

#[derive(Debug, Clone, Default)]
pub struct MySqlFlexibleServer {
    pub address: String,
    pub region: String,
    /// e.g. `GP_Standard_D2ds_v4`
    pub sku_name: String,
    pub storage_gb: i64,
    pub iops: i64,

    pub additional_backup_storage_gb: Option<Decimal>,
}

impl MySqlFlexibleServer {
    /// Memory optimized servers are sold as Business Critical
    fn compute_cost_component(&self, sku: &FlexibleServerSku) -> CostComponent {
        let tier_name = match sku.tier {
            FlexibleServerTier::MemoryOptimized => "Business Critical",
            tier => tier.display_name(),
        };

        let series_suffix = match (sku.tier, sku.series.as_str()) {
            (FlexibleServerTier::MemoryOptimized, "Edsv4") => " Compute".to_string(),
            (FlexibleServerTier::GeneralPurpose, "Dadsv5") => String::new(),
            (_, series) => format!(r"\s+{series} Series"),
        };

        CostComponent {
            name: format!("Compute ({})", self.sku_name),
            unit: "hours".to_string(),
            hourly_quantity: Some(Decimal::ONE),
            product_filter: product_filter(
                &self.region,
                SERVICE,
                "Databases",
                vec![
                    AttributeFilter::regex(
                        "productName",
                        regex_filter(&format!(
                            "^Azure Database for MySQL Flexible Server {tier_name}{series_suffix}"
                        )),
                    ),
                    AttributeFilter::regex("skuName", regex_filter(&format!("^{}$", sku.sku_name))),
                    AttributeFilter::regex(
                        "meterName",
                        regex_filter(&format!("^{}$", sku.meter_name)),
                    ),
                ],
            ),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }

    fn storage_cost_component(&self) -> CostComponent {
        let storage = if self.storage_gb == 0 { MIN_STORAGE_GB } else { self.storage_gb };
        CostComponent {
            name: "Storage".to_string(),
            unit: "GB".to_string(),
            monthly_quantity: Some(Decimal::from(storage)),
            product_filter: product_filter(
                &self.region,
                SERVICE,
                "Databases",
                vec![
                    AttributeFilter::exact("productName", STORAGE_PRODUCT),
                    AttributeFilter::exact("meterName", "Storage Data Stored"),
                ],
            ),
            ..Default::default()
        }
    }

    /// IOPS above the free allowance, if any
    fn iops_cost_component(&self) -> Option<CostComponent> {
        let iops = if self.iops == 0 { FREE_IOPS } else { self.iops };
        let additional = iops - FREE_IOPS;
        if additional <= 0 {
            return None;
        }

        Some(CostComponent {
            name: "Additional IOPS".to_string(),
            unit: "IOPS".to_string(),
            monthly_quantity: Some(Decimal::from(additional)),
            product_filter: product_filter(
                &self.region,
                SERVICE,
                "Databases",
                vec![
                    AttributeFilter::exact("productName", STORAGE_PRODUCT),
                    AttributeFilter::exact("skuName", "Additional IOPS"),
                ],
            ),
            ..Default::default()
        })
    }

    fn backup_cost_component(&self) -> CostComponent {
        CostComponent {
            name: "Additional backup storage".to_string(),
            unit: "GB".to_string(),
            monthly_quantity: self.additional_backup_storage_gb,
            product_filter: product_filter(
                &self.region,
                SERVICE,
                "Databases",
                vec![
                    AttributeFilter::exact(
                        "productName",
                        "Azure Database for MySQL Flexible Server Backup Storage",
                    ),
                    AttributeFilter::exact("meterName", "Backup Storage LRS Data Stored"),
                ],
            ),
            usage_based: true,
            ..Default::default()
        }
    }
}

impl CoreResource for MySqlFlexibleServer {
    fn core_type(&self) -> &'static str {
        "MySQLFlexibleServer"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![UsageItem::float("additional_backup_storage_gb")]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.additional_backup_storage_gb = usage.get_decimal("additional_backup_storage_gb");
    }

    fn build_resource(&self) -> Option<Resource> {
        let Some(sku) = FlexibleServerSku::parse(&self.sku_name) else {
            warn!(
                resource = %self.address,
                sku = %self.sku_name,
                "Unrecognised MySQL flexible server SKU"
            );
            return None;
        };

        let mut cost_components =
            vec![self.compute_cost_component(&sku), self.storage_cost_component()];
        cost_components.extend(self.iops_cost_component());
        cost_components.push(self.backup_cost_component());

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
    use rust_decimal_macros::dec;

    fn server(sku: &str) -> MySqlFlexibleServer {
        MySqlFlexibleServer {
            address: "azurerm_mysql_flexible_server.db".to_string(),
            region: "eastus".to_string(),
            sku_name: sku.to_string(),
            ..Default::default()
        }
    }

    fn product_regex(component: &CostComponent) -> String {
        component.product_filter.as_ref().unwrap().attribute_filters[0]
            .value_regex
            .clone()
            .unwrap()
    }

    #[test]
    fn test_defaults_storage_and_free_iops() {
        let resource = server("B_Standard_B1s").build_resource().unwrap();
        let names: Vec<&str> = resource.cost_components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Compute (B_Standard_B1s)", "Storage", "Additional backup storage"]
        );
        assert_eq!(resource.cost_components[1].monthly_quantity, Some(dec!(20)));
        assert_eq!(
            product_regex(&resource.cost_components[0]),
            r"/^Azure Database for MySQL Flexible Server Burstable\s+BS Series/i"
        );
    }

    #[test]
    fn test_additional_iops() {
        let resource = MySqlFlexibleServer {
            storage_gb: 100,
            iops: 1000,
            ..server("GP_Standard_D2ds_v4")
        }
        .build_resource()
        .unwrap();
        assert_eq!(resource.cost_components[1].monthly_quantity, Some(dec!(100)));
        assert_eq!(resource.cost_components[2].name, "Additional IOPS");
        assert_eq!(resource.cost_components[2].monthly_quantity, Some(dec!(640)));
    }

    #[test]
    fn test_series_suffix_exceptions() {
        let business_critical = server("MO_Standard_E4ds_v4").build_resource().unwrap();
        assert_eq!(
            product_regex(&business_critical.cost_components[0]),
            "/^Azure Database for MySQL Flexible Server Business Critical Compute/i"
        );

        let dadsv5 = server("GP_Standard_D2ads_v5").build_resource().unwrap();
        assert_eq!(
            product_regex(&dadsv5.cost_components[0]),
            "/^Azure Database for MySQL Flexible Server General Purpose/i"
        );
    }
}
