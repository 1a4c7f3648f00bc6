use rust_decimal::Decimal;

use super::sql_database::{
    GENERAL_PURPOSE_TIER, extra_data_storage_cost_component, sql_license_cost_component,
    sql_product_filter, vcore_storage_cost_component,
};
use super::util::price_filter_consumption;
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem,
    day_to_month_unit_multiplier, days_in_month,
};

const DTU_SKUS: &[&str] = &["basicpool", "standardpool", "premiumpool"];

/// Storage included with each premium eDTU size, in GB
const PREMIUM_INCLUDED_STORAGE_GB: &[(i64, i64)] = &[
    (125, 250),
    (250, 500),
    (500, 750),
    (1000, 1024),
    (1500, 1536),
    (2000, 2048),
    (2500, 2560),
    (3000, 3072),
    (3500, 3584),
    (4000, 4096),
];

/// SQL elastic pool, priced by eDTU for the `*Pool` SKUs and by vCore otherwise
#[derive(Debug, Clone, Default)]
pub struct MssqlElasticPool {
    pub address: String,
    pub region: String,
    pub sku: String,
    pub license_type: String,
    pub tier: String,
    pub family: String,
    pub cores: Option<i64>,
    pub dtu_capacity: Option<i64>,
    pub max_size_gb: Option<Decimal>,
    pub zone_redundant: bool,
}

impl MssqlElasticPool {
    fn is_dtu(&self) -> bool {
        DTU_SKUS.contains(&self.sku.to_lowercase().as_str())
    }

    /// Standard pools include one GB per eDTU, premium pools follow a fixed table
    fn included_storage_gb(&self, dtu_capacity: i64) -> Option<i64> {
        match self.tier.to_lowercase().as_str() {
            "standard" => Some(dtu_capacity),
            "premium" => PREMIUM_INCLUDED_STORAGE_GB
                .iter()
                .find(|(dtus, _)| *dtus == dtu_capacity)
                .map(|(_, included)| *included),
            _ => None,
        }
    }

    fn dtu_cost_components(&self) -> Vec<CostComponent> {
        let dtu_capacity = self.dtu_capacity.unwrap_or_default();

        let mut cost_components = vec![CostComponent {
            name: format!("Compute ({}, {dtu_capacity} DTUs)", self.tier),
            unit: "hours".to_string(),
            unit_multiplier: day_to_month_unit_multiplier(),
            monthly_quantity: Some(days_in_month()),
            product_filter: sql_product_filter(
                &self.region,
                vec![
                    AttributeFilter::exact(
                        "productName",
                        format!("SQL Database Elastic Pool - {}", self.tier),
                    ),
                    AttributeFilter::exact("skuName", format!("{dtu_capacity} DTU Pack")),
                    AttributeFilter::exact("meterName", "eDTUs"),
                ],
            ),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }];

        let extra_storage_gb = self
            .max_size_gb
            .zip(self.included_storage_gb(dtu_capacity))
            .map(|(max_size, included)| max_size - Decimal::from(included))
            .filter(|extra| *extra > Decimal::ZERO);
        if let Some(extra) = extra_storage_gb {
            cost_components.push(extra_data_storage_cost_component(
                &self.region,
                &self.tier,
                Some(extra),
            ));
        }

        cost_components
    }

    fn vcore_compute_cost_component(&self, name: String, sku_name: String) -> CostComponent {
        let product = format!("/{} - {}/", self.tier, self.family);
        CostComponent {
            name,
            unit: "hours".to_string(),
            hourly_quantity: Some(Decimal::ONE),
            product_filter: sql_product_filter(
                &self.region,
                vec![
                    AttributeFilter::regex("productName", product),
                    AttributeFilter::exact("skuName", sku_name),
                ],
            ),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }

    fn vcore_cost_components(&self) -> Vec<CostComponent> {
        let cores = self.cores.unwrap_or_default();

        let mut cost_components = vec![self.vcore_compute_cost_component(
            format!("Compute ({}, {cores} vCore)", self.sku),
            format!("{cores} vCore"),
        )];
        if self.tier.eq_ignore_ascii_case(GENERAL_PURPOSE_TIER) && self.zone_redundant {
            cost_components.push(self.vcore_compute_cost_component(
                format!("Zone redundancy ({}, {cores} vCore)", self.sku),
                format!("{cores} vCore Zone Redundancy"),
            ));
        }

        if self.license_type.eq_ignore_ascii_case("licenseincluded") {
            cost_components.push(sql_license_cost_component(&self.region, &self.tier, cores));
        }
        cost_components.push(vcore_storage_cost_component(
            &self.region,
            &self.tier,
            self.zone_redundant,
            self.max_size_gb,
        ));
        cost_components
    }
}

impl CoreResource for MssqlElasticPool {
    fn core_type(&self) -> &'static str {
        "MSSQLElasticPool"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        Vec::new()
    }

    fn populate_usage(&mut self, _usage: &UsageData) {}

    fn build_resource(&self) -> Option<Resource> {
        let cost_components = if self.is_dtu() {
            self.dtu_cost_components()
        } else {
            self.vcore_cost_components()
        };

        Some(Resource {
            name: self.address.clone(),
            cost_components,
            ..Default::default()
        })
    }
}
