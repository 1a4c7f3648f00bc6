use rust_decimal::Decimal;

use super::mssql_managed_instance::{
    INCLUDED_STORAGE_GB, managed_instance_compute_cost_component,
    managed_instance_license_cost_component, managed_instance_product_filter,
    pitr_backup_cost_component,
};
use super::util::price_filter_consumption;
use crate::schema::{AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem};

/// Managed SQL instance with long-term retention estimated from backup counts
#[derive(Debug, Clone, Default)]
pub struct SqlManagedInstance {
    pub address: String,
    pub region: String,
    pub sku: String,
    pub license_type: String,
    pub cores: i64,
    pub storage_size_in_gb: i64,
    pub storage_account_type: String,

    pub average_backup_size_gb: Option<i64>,
    pub weekly_backup: Option<i64>,
    pub monthly_backup: Option<i64>,
    pub yearly_backup: Option<i64>,
    pub backup_storage_gb: Option<i64>,
}

impl SqlManagedInstance {
    fn storage_cost_component(&self) -> CostComponent {
        CostComponent {
            name: format!(
                "Storage {} Gb (first {INCLUDED_STORAGE_GB} Gb include)",
                self.storage_size_in_gb
            ),
            unit: "Unit of 32Gb".to_string(),
            monthly_quantity: Some(Decimal::from(
                (self.storage_size_in_gb - INCLUDED_STORAGE_GB).max(0),
            )),
            product_filter: managed_instance_product_filter(
                &self.region,
                vec![
                    AttributeFilter::exact(
                        "productName",
                        "SQL Managed Instance General Purpose - Storage",
                    ),
                    AttributeFilter::exact("meterName", "Data Stored"),
                ],
            ),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }

    /// Retained backups of one period, each `average_backup_size_gb` large
    fn retention_cost_component(
        &self,
        period: &str,
        backups: i64,
        average_gb: i64,
    ) -> CostComponent {
        let account_type = &self.storage_account_type;
        CostComponent {
            name: format!("{period} Backup ({backups} Backups with {average_gb} Gb)"),
            unit: "Gb/Month".to_string(),
            monthly_quantity: Some(Decimal::from(average_gb * backups)),
            product_filter: managed_instance_product_filter(
                &self.region,
                vec![
                    AttributeFilter::exact(
                        "productName",
                        "SQL Managed Instance - LTR Backup Storage",
                    ),
                    AttributeFilter::exact(
                        "meterName",
                        format!("Backup {account_type} Data Stored"),
                    ),
                ],
            ),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }
}

impl CoreResource for SqlManagedInstance {
    fn core_type(&self) -> &'static str {
        "SQLManagedInstance"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::int("backup_storage_gb"),
            UsageItem::int("average_backup_size_gb"),
            UsageItem::int("weekly_backup"),
            UsageItem::int("monthly_backup"),
            UsageItem::int("yearly_backup"),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.backup_storage_gb = usage.get_i64("backup_storage_gb");
        self.average_backup_size_gb = usage.get_i64("average_backup_size_gb");
        self.weekly_backup = usage.get_i64("weekly_backup");
        self.monthly_backup = usage.get_i64("monthly_backup");
        self.yearly_backup = usage.get_i64("yearly_backup");
    }

    fn build_resource(&self) -> Option<Resource> {
        let mut cost_components = vec![managed_instance_compute_cost_component(
            &self.region,
            &self.sku,
            self.cores,
        )];

        if let Some(backup_gb) = self.backup_storage_gb {
            cost_components.push(self.storage_cost_component());
            cost_components.push(pitr_backup_cost_component(
                &self.region,
                format!("Backup Cost for {backup_gb} Gb {}", self.storage_account_type),
                &self.storage_account_type,
                Some(backup_gb),
            ));
        }

        if self.license_type == "LicenseIncluded" {
            cost_components.push(managed_instance_license_cost_component(self.cores));
        }

        if let Some(average_gb) = self.average_backup_size_gb {
            let periods = [
                ("Weekly", self.weekly_backup),
                ("Monthly", self.monthly_backup),
                ("Yearly", self.yearly_backup),
            ];
            for (period, backups) in periods {
                if let Some(backups) = backups.filter(|b| *b > 0) {
                    let retention = self.retention_cost_component(period, backups, average_gb);
                    cost_components.push(retention);
                }
            }
        }

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

    fn instance() -> SqlManagedInstance {
        SqlManagedInstance {
            address: "azurerm_sql_managed_instance.mi".to_string(),
            region: "westeurope".to_string(),
            sku: "GP_Gen5".to_string(),
            license_type: "BasePrice".to_string(),
            cores: 4,
            storage_size_in_gb: 96,
            storage_account_type: "GRS".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_backup_storage_adds_storage_and_pitr() {
        let resource = SqlManagedInstance {
            backup_storage_gb: Some(200),
            ..instance()
        }
        .build_resource()
        .unwrap();

        let names: Vec<&str> = resource.cost_components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Compute (GP_GEN5 4 cores)",
                "Storage 96 Gb (first 32 Gb include)",
                "Backup Cost for 200 Gb GRS"
            ]
        );
        assert_eq!(resource.cost_components[1].monthly_quantity, Some(dec!(64)));
        assert_eq!(resource.cost_components[2].monthly_quantity, Some(dec!(200)));
    }

    #[test]
    fn test_retention_per_period() {
        let resource = SqlManagedInstance {
            average_backup_size_gb: Some(50),
            weekly_backup: Some(4),
            monthly_backup: Some(0),
            yearly_backup: Some(2),
            ..instance()
        }
        .build_resource()
        .unwrap();

        let retention: Vec<(&str, Option<Decimal>)> = resource.cost_components[1..]
            .iter()
            .map(|c| (c.name.as_str(), c.monthly_quantity))
            .collect();
        assert_eq!(
            retention,
            vec![
                ("Weekly Backup (4 Backups with 50 Gb)", Some(dec!(200))),
                ("Yearly Backup (2 Backups with 50 Gb)", Some(dec!(100))),
            ]
        );
    }
}
