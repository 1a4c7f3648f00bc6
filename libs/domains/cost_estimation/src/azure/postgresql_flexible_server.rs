use rust_decimal::Decimal;
use tracing::warn;

use super::flexible_server::FlexibleServerSku;
use super::util::{price_filter_consumption, product_filter, regex_filter};
use crate::schema::{AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem};

const SERVICE: &str = "Azure Database for PostgreSQL";
const MB_PER_GB: i64 = 1024;

#[derive(Debug, Clone, Default)]
pub struct PostgreSqlFlexibleServer {
    pub address: String,
    pub region: String,
    /// e.g. `GP_Standard_D4s_v3`
    pub sku_name: String,
    pub storage_mb: i64,
    pub high_availability: bool,

    pub additional_backup_storage_gb: Option<Decimal>,
}

impl PostgreSqlFlexibleServer {
    /// A standby replica doubles compute
    fn compute_cost_component(&self, sku: &FlexibleServerSku) -> CostComponent {
        let product_name = if sku.series == "Esv3" {
            "Az DB for PGSQL Flexible Server"
        } else {
            "Azure Database for PostgreSQL Flexible Server"
        };
        let instances = if self.high_availability { 2 } else { 1 };

        CostComponent {
            name: format!("Compute ({})", self.sku_name),
            unit: "hours".to_string(),
            hourly_quantity: Some(Decimal::from(instances)),
            product_filter: product_filter(
                &self.region,
                SERVICE,
                "Databases",
                vec![
                    AttributeFilter::regex(
                        "productName",
                        regex_filter(&format!(
                            r"^{product_name} {} (?:-\s)?{}",
                            sku.tier.display_name(),
                            sku.series
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
        CostComponent {
            name: "Storage".to_string(),
            unit: "GB".to_string(),
            monthly_quantity: (self.storage_mb > 0)
                .then(|| Decimal::from(self.storage_mb / MB_PER_GB)),
            product_filter: product_filter(
                &self.region,
                SERVICE,
                "Databases",
                vec![
                    AttributeFilter::exact(
                        "productName",
                        "Az DB for PostgreSQL Flexible Server Storage",
                    ),
                    AttributeFilter::exact("meterName", "Storage Data Stored"),
                ],
            ),
            ..Default::default()
        }
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
                        "Azure Database for PostgreSQL Flexible Server Backup Storage",
                    ),
                    AttributeFilter::exact("meterName", "Backup Storage LRS Data Stored"),
                ],
            ),
            usage_based: true,
            ..Default::default()
        }
    }
}

impl CoreResource for PostgreSqlFlexibleServer {
    fn core_type(&self) -> &'static str {
        "PostgreSQLFlexibleServer"
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
                "Unrecognised PostgreSQL flexible server SKU"
            );
            return None;
        };

        Some(Resource {
            name: self.address.clone(),
            cost_components: vec![
                self.compute_cost_component(&sku),
                self.storage_cost_component(),
                self.backup_cost_component(),
            ],
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::compile_filter_regex;
    use rust_decimal_macros::dec;

    fn server(sku: &str) -> PostgreSqlFlexibleServer {
        PostgreSqlFlexibleServer {
            address: "azurerm_postgresql_flexible_server.db".to_string(),
            region: "eastus".to_string(),
            sku_name: sku.to_string(),
            storage_mb: 65536,
            ..Default::default()
        }
    }

    fn attribute_regex(component: &CostComponent, key: &str) -> String {
        component
            .product_filter
            .as_ref()
            .and_then(|f| f.attribute_filters.iter().find(|a| a.key == key))
            .and_then(|a| a.value_regex.clone())
            .unwrap()
    }

    #[test]
    fn test_general_purpose_server() {
        let resource = server("GP_Standard_D4s_v3").build_resource().unwrap();
        let compute = &resource.cost_components[0];

        assert_eq!(compute.name, "Compute (GP_Standard_D4s_v3)");
        assert_eq!(compute.hourly_quantity, Some(dec!(1)));

        let product = compile_filter_regex(&attribute_regex(compute, "productName")).unwrap();
        assert!(product.is_match(
            "Azure Database for PostgreSQL Flexible Server General Purpose - Dsv3 Series Compute"
        ));
        assert!(product.is_match(
            "Azure Database for PostgreSQL Flexible Server General Purpose Dsv3 Series Compute"
        ));

        assert_eq!(resource.cost_components[1].monthly_quantity, Some(dec!(64)));
        assert!(resource.cost_components[2].monthly_quantity.is_none());
    }

    #[test]
    fn test_high_availability_doubles_compute() {
        let ha = PostgreSqlFlexibleServer {
            high_availability: true,
            ..server("B_Standard_B1ms")
        };
        let resource = ha.build_resource().unwrap();
        assert_eq!(resource.cost_components[0].hourly_quantity, Some(dec!(2)));

        let pattern = attribute_regex(&resource.cost_components[0], "meterName");
        let meter = compile_filter_regex(&pattern).unwrap();
        assert!(meter.is_match("B1ms"));
        assert!(meter.is_match("B1MS vCore"));
    }

    #[test]
    fn test_esv3_uses_short_product_name() {
        let resource = server("MO_Standard_E4s_v3").build_resource().unwrap();
        assert!(attribute_regex(&resource.cost_components[0], "productName")
            .starts_with("/^Az DB for PGSQL Flexible Server Memory Optimized"));
    }

    #[test]
    fn test_unknown_sku_is_unsupported() {
        assert!(server("Standard_D4s_v3").build_resource().is_none());
    }

    #[test]
    fn test_zero_storage_has_no_quantity() {
        let resource = PostgreSqlFlexibleServer {
            storage_mb: 0,
            ..server("GP_Standard_D2s_v3")
        }
        .build_resource()
        .unwrap();
        assert!(resource.cost_components[1].monthly_quantity.is_none());
    }
}
