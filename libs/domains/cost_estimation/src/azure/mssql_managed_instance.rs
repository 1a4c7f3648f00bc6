use rust_decimal::Decimal;

use super::util::{price_filter_consumption, product_filter, regex_filter};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, ProductFilter, Resource, UsageData, UsageItem,
};

pub(crate) const SERVICE: &str = "SQL Managed Instance";
const PRODUCT_FAMILY: &str = "Databases";
/// Storage included with every instance, in GB
pub(crate) const INCLUDED_STORAGE_GB: i64 = 32;

pub(crate) fn managed_instance_product_filter(
    region: &str,
    attribute_filters: Vec<AttributeFilter>,
) -> Option<ProductFilter> {
    product_filter(region, SERVICE, PRODUCT_FAMILY, attribute_filters)
}

/// `GP_Gen5` -> `SQL Managed Instance General Purpose - Compute Gen5`
fn compute_product_name(sku: &str) -> String {
    let tier = if sku.contains("GP") {
        "SQL Managed Instance General Purpose"
    } else if sku.contains("BC") {
        "SQL Managed Instance Business Critical"
    } else {
        ""
    };

    if sku.contains("Gen5") {
        format!("{tier} - Compute Gen5")
    } else {
        tier.to_string()
    }
}

pub(crate) fn managed_instance_compute_cost_component(
    region: &str,
    sku: &str,
    cores: i64,
) -> CostComponent {
    CostComponent {
        name: format!("Compute ({} {cores} cores)", sku.to_uppercase()),
        unit: "hours".to_string(),
        hourly_quantity: Some(Decimal::ONE),
        product_filter: managed_instance_product_filter(
            region,
            vec![
                AttributeFilter::exact("productName", compute_product_name(sku)),
                AttributeFilter::exact("skuName", format!("{cores} vCore")),
            ],
        ),
        price_filter: price_filter_consumption(),
        ..Default::default()
    }
}

/// Licenses are priced globally
pub(crate) fn managed_instance_license_cost_component(cores: i64) -> CostComponent {
    CostComponent {
        name: "SQL license".to_string(),
        unit: "vCore-hours".to_string(),
        hourly_quantity: Some(Decimal::from(cores)),
        product_filter: managed_instance_product_filter(
            "Global",
            vec![
                AttributeFilter::exact(
                    "productName",
                    "SQL Managed Instance General Purpose - SQL License",
                ),
                AttributeFilter::exact("meterName", "vCore"),
            ],
        ),
        price_filter: price_filter_consumption(),
        ..Default::default()
    }
}

pub(crate) fn pitr_backup_cost_component(
    region: &str,
    name: String,
    storage_account_type: &str,
    storage_gb: Option<i64>,
) -> CostComponent {
    CostComponent {
        name,
        unit: "GB".to_string(),
        monthly_quantity: storage_gb.map(Decimal::from),
        product_filter: managed_instance_product_filter(
            region,
            vec![
                AttributeFilter::exact("productName", "SQL Managed Instance PITR Backup Storage"),
                AttributeFilter::exact("meterName", format!("{storage_account_type} Data Stored")),
            ],
        ),
        price_filter: price_filter_consumption(),
        usage_based: true,
        ..Default::default()
    }
}

/// Managed SQL instance. Storage beyond the first 32GB is billed separately.
#[derive(Debug, Clone, Default)]
pub struct MssqlManagedInstance {
    pub address: String,
    pub region: String,
    /// e.g. `GP_Gen5` or `BC_Gen5`
    pub sku: String,
    pub license_type: String,
    pub cores: i64,
    pub storage_size_in_gb: i64,
    /// Backup redundancy, e.g. `LRS`, `ZRS` or `RA-GRS`
    pub storage_account_type: String,

    pub long_term_retention_storage_gb: Option<i64>,
    pub backup_storage_gb: Option<i64>,
}

impl MssqlManagedInstance {
    fn additional_storage_cost_component(&self, extra_gb: i64) -> CostComponent {
        CostComponent {
            name: "Additional Storage".to_string(),
            unit: "GB".to_string(),
            monthly_quantity: Some(Decimal::from(extra_gb)),
            product_filter: managed_instance_product_filter(
                &self.region,
                vec![
                    AttributeFilter::exact(
                        "productName",
                        "SQL Managed Instance General Purpose - Storage",
                    ),
                    AttributeFilter::exact("skuName", "General Purpose"),
                    AttributeFilter::regex("meterName", regex_filter("Data Stored$")),
                ],
            ),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }

    fn long_term_retention_cost_component(&self) -> CostComponent {
        let account_type = &self.storage_account_type;
        CostComponent {
            name: format!("LTR backup storage ({account_type})"),
            unit: "GB".to_string(),
            monthly_quantity: self.long_term_retention_storage_gb.map(Decimal::from),
            product_filter: managed_instance_product_filter(
                &self.region,
                vec![
                    AttributeFilter::exact(
                        "productName",
                        "SQL Managed Instance - LTR Backup Storage",
                    ),
                    AttributeFilter::exact(
                        "meterName",
                        format!("LTR Backup {account_type} Data Stored"),
                    ),
                ],
            ),
            price_filter: price_filter_consumption(),
            usage_based: true,
            ..Default::default()
        }
    }
}

impl CoreResource for MssqlManagedInstance {
    fn core_type(&self) -> &'static str {
        "MSSQLManagedInstance"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::int("backup_storage_gb"),
            UsageItem::int("long_term_retention_storage_gb"),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.backup_storage_gb = usage.get_i64("backup_storage_gb");
        self.long_term_retention_storage_gb = usage.get_i64("long_term_retention_storage_gb");
    }

    fn build_resource(&self) -> Option<Resource> {
        let mut cost_components = vec![managed_instance_compute_cost_component(
            &self.region,
            &self.sku,
            self.cores,
        )];

        let extra_gb = self.storage_size_in_gb - INCLUDED_STORAGE_GB;
        if extra_gb > 0 {
            cost_components.push(self.additional_storage_cost_component(extra_gb));
            cost_components.push(pitr_backup_cost_component(
                &self.region,
                format!("PITR backup storage ({})", self.storage_account_type),
                &self.storage_account_type,
                self.backup_storage_gb,
            ));
        }

        if self.license_type == "LicenseIncluded" {
            cost_components.push(managed_instance_license_cost_component(self.cores));
        }
        cost_components.push(self.long_term_retention_cost_component());

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

    fn instance(storage_size_in_gb: i64) -> MssqlManagedInstance {
        MssqlManagedInstance {
            address: "azurerm_mssql_managed_instance.mi".to_string(),
            region: "eastus".to_string(),
            sku: "GP_Gen5".to_string(),
            license_type: "LicenseIncluded".to_string(),
            cores: 8,
            storage_size_in_gb,
            storage_account_type: "LRS".to_string(),
            backup_storage_gb: Some(100),
            ..Default::default()
        }
    }

    #[test]
    fn test_compute_product_name() {
        assert_eq!(
            compute_product_name("GP_Gen5"),
            "SQL Managed Instance General Purpose - Compute Gen5"
        );
        assert_eq!(compute_product_name("BC_Gen4"), "SQL Managed Instance Business Critical");
    }

    #[test]
    fn test_storage_above_included() {
        let resource = instance(64).build_resource().unwrap();
        let names: Vec<&str> = resource.cost_components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Compute (GP_GEN5 8 cores)",
                "Additional Storage",
                "PITR backup storage (LRS)",
                "SQL license",
                "LTR backup storage (LRS)"
            ]
        );
        assert_eq!(resource.cost_components[1].monthly_quantity, Some(dec!(32)));
        assert_eq!(resource.cost_components[2].monthly_quantity, Some(dec!(100)));
        assert_eq!(resource.cost_components[3].hourly_quantity, Some(dec!(8)));
        assert_eq!(
            resource.cost_components[3].product_filter.as_ref().unwrap().region.as_deref(),
            Some("Global")
        );
    }

    #[test]
    fn test_included_storage_only() {
        let resource = instance(32).build_resource().unwrap();
        assert_eq!(resource.cost_components.len(), 3);
        assert!(resource.cost_components[2].monthly_quantity.is_none());
    }
}
