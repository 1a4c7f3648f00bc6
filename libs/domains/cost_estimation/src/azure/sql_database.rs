use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::util::{VENDOR_NAME, is_us_gov, price_filter_consumption, regex_filter};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, ProductFilter, Resource, UsageData, UsageItem,
};

const SERVICE: &str = "SQL Database";
const PRODUCT_FAMILY: &str = "Databases";
const SERVERLESS_TIER: &str = "general purpose - serverless";
const HYPERSCALE_TIER: &str = "hyperscale";
pub(crate) const GENERAL_PURPOSE_TIER: &str = "general purpose";
const DEFAULT_VCORE_STORAGE_GB: Decimal = dec!(5);
const DTU_DAYS_PER_MONTH: Decimal = dec!(30);

pub(crate) fn sql_product_filter(
    region: &str,
    attribute_filters: Vec<AttributeFilter>,
) -> Option<ProductFilter> {
    Some(ProductFilter {
        vendor_name: Some(VENDOR_NAME.to_string()),
        region: Some(region.to_string()),
        service: Some(SERVICE.to_string()),
        product_family: Some(PRODUCT_FAMILY.to_string()),
        sku: None,
        attribute_filters,
    })
}

/// Storage above what a DTU tier includes. `tier` is `Standard` or `Premium`.
pub(crate) fn extra_data_storage_cost_component(
    region: &str,
    tier: &str,
    storage_gb: Option<Decimal>,
) -> CostComponent {
    CostComponent {
        name: "Extra data storage".to_string(),
        unit: "GB".to_string(),
        monthly_quantity: storage_gb,
        product_filter: sql_product_filter(
            region,
            vec![
                AttributeFilter::regex("productName", format!("/SQL Database {tier} - Storage/i")),
                AttributeFilter::regex("skuName", format!("/^{tier}$/i")),
                AttributeFilter::exact("meterName", "Data Stored"),
            ],
        ),
        price_filter: price_filter_consumption(),
        ..Default::default()
    }
}

/// Licenses are priced per billing area rather than per region
pub(crate) fn sql_license_cost_component(region: &str, tier: &str, cores: i64) -> CostComponent {
    let license_region = if is_us_gov(region) {
        "US Gov"
    } else if region.contains("china") {
        "China"
    } else if region.contains("germany") {
        "Germany"
    } else {
        "Global"
    };

    CostComponent {
        name: "SQL license".to_string(),
        unit: "vCore-hours".to_string(),
        hourly_quantity: Some(Decimal::from(cores)),
        product_filter: sql_product_filter(
            license_region,
            vec![AttributeFilter::regex("productName", format!("/{tier} - SQL License/"))],
        ),
        price_filter: price_filter_consumption(),
        ..Default::default()
    }
}

/// vCore data storage, 5GB when no maximum size is set
pub(crate) fn vcore_storage_cost_component(
    region: &str,
    tier: &str,
    zone_redundant: bool,
    max_size_gb: Option<Decimal>,
) -> CostComponent {
    let sku_name = if zone_redundant {
        format!("{tier} Zone Redundancy")
    } else {
        tier.to_string()
    };

    CostComponent {
        name: "Storage".to_string(),
        unit: "GB".to_string(),
        monthly_quantity: Some(max_size_gb.unwrap_or(DEFAULT_VCORE_STORAGE_GB)),
        product_filter: sql_product_filter(
            region,
            vec![
                AttributeFilter::regex("productName", format!("/{tier} - Storage/")),
                AttributeFilter::exact("skuName", sku_name),
                AttributeFilter::regex("meterName", regex_filter("Data Stored$")),
            ],
        ),
        ..Default::default()
    }
}

/// Single SQL database, priced by DTU when `cores` is unset and by vCore otherwise
#[derive(Debug, Clone, Default)]
pub struct SqlDatabase {
    pub address: String,
    pub region: String,
    pub sku: String,
    pub license_type: String,
    /// vCore tier, e.g. `General Purpose` or `Hyperscale`
    pub tier: String,
    /// Hardware family, e.g. `Gen5`
    pub family: String,
    pub cores: Option<i64>,
    pub max_size_gb: Option<Decimal>,
    pub read_replica_count: Option<i64>,
    pub zone_redundant: bool,

    pub extra_data_storage_gb: Option<i64>,
    pub monthly_vcore_hours: Option<i64>,
    pub long_term_retention_storage_gb: Option<i64>,
}

impl SqlDatabase {
    fn sql_product_filter(&self, attribute_filters: Vec<AttributeFilter>) -> Option<ProductFilter> {
        sql_product_filter(&self.region, attribute_filters)
    }

    fn tier_is(&self, tier: &str) -> bool {
        self.tier.eq_ignore_ascii_case(tier)
    }

    fn vcore_sku_name(&self, cores: i64) -> String {
        if self.zone_redundant {
            format!("{cores} vCore Zone Redundancy")
        } else {
            format!("{cores} vCore")
        }
    }

    fn tier_family_regex(&self) -> String {
        format!("/{} - {}/", self.tier, self.family)
    }

    fn dtu_cost_components(&self) -> Vec<CostComponent> {
        let sku = match self.sku.to_lowercase().as_str() {
            "basic" => "b".to_string(),
            other => other.to_string(),
        };

        let mut components = vec![CostComponent {
            name: format!("Compute ({})", self.sku.to_uppercase()),
            unit: "days".to_string(),
            monthly_quantity: Some(DTU_DAYS_PER_MONTH),
            product_filter: self.sql_product_filter(vec![
                AttributeFilter::regex("productName", regex_filter("^SQL Database Single")),
                AttributeFilter::regex("skuName", regex_filter(&format!("^{sku}$"))),
                AttributeFilter::regex("meterName", regex_filter("DTU(s)?$")),
            ]),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }];

        if sku != "b" {
            components.push(self.extra_data_storage_cost_component());
        }
        components.push(self.long_term_retention_cost_component());
        components
    }

    /// Storage above what the DTU tier includes: 500GB for premium, 250GB otherwise
    fn extra_data_storage_cost_component(&self) -> CostComponent {
        let tier_name = match self.sku.to_lowercase().chars().next() {
            Some('p') => "Premium",
            Some('s') => "Standard",
            _ => "",
        };
        let included = if tier_name == "Premium" { dec!(500) } else { dec!(250) };

        let storage_gb = self
            .extra_data_storage_gb
            .map(Decimal::from)
            .or_else(|| {
                self.max_size_gb
                    .map(|size| size - included)
                    .filter(|extra| !extra.is_sign_negative())
            });

        extra_data_storage_cost_component(&self.region, tier_name, storage_gb)
    }

    fn vcore_cost_components(&self, cores: i64) -> Vec<CostComponent> {
        let mut components = vec![if self.tier_is(SERVERLESS_TIER) {
            self.serverless_compute_cost_component()
        } else {
            self.provisioned_compute_cost_component(cores)
        }];

        if self.tier_is(HYPERSCALE_TIER) {
            components.push(self.read_replica_cost_component(cores));
        }
        let license_included = self.license_type.eq_ignore_ascii_case("licenseincluded");
        if !self.tier_is(SERVERLESS_TIER) && license_included {
            components.push(self.sql_license_cost_component(cores));
        }
        components.push(self.vcore_storage_cost_component());
        if !self.tier_is(HYPERSCALE_TIER) {
            components.push(self.long_term_retention_cost_component());
        }
        components
    }

    fn serverless_compute_cost_component(&self) -> CostComponent {
        CostComponent {
            name: format!("Compute (serverless, {})", self.sku),
            unit: "vCore-hours".to_string(),
            monthly_quantity: self.monthly_vcore_hours.map(Decimal::from),
            product_filter: self.sql_product_filter(vec![
                AttributeFilter::regex("productName", self.tier_family_regex()),
                AttributeFilter::exact("skuName", self.vcore_sku_name(1)),
            ]),
            price_filter: price_filter_consumption(),
            usage_based: true,
            ..Default::default()
        }
    }

    fn provisioned_compute_cost_component(&self, cores: i64) -> CostComponent {
        CostComponent {
            name: format!("Compute (provisioned, {})", self.sku),
            unit: "hours".to_string(),
            hourly_quantity: Some(Decimal::ONE),
            product_filter: self.sql_product_filter(vec![
                AttributeFilter::regex("productName", self.tier_family_regex()),
                AttributeFilter::exact("skuName", self.vcore_sku_name(cores)),
            ]),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }

    fn read_replica_cost_component(&self, cores: i64) -> CostComponent {
        CostComponent {
            name: "Read replicas".to_string(),
            unit: "hours".to_string(),
            hourly_quantity: self.read_replica_count.map(Decimal::from),
            product_filter: self.sql_product_filter(vec![
                AttributeFilter::regex("productName", self.tier_family_regex()),
                AttributeFilter::exact("skuName", self.vcore_sku_name(cores)),
            ]),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }

    fn sql_license_cost_component(&self, cores: i64) -> CostComponent {
        sql_license_cost_component(&self.region, &self.tier, cores)
    }

    /// Serverless storage is billed at General Purpose prices
    fn vcore_storage_cost_component(&self) -> CostComponent {
        let storage_tier = if self.tier_is(SERVERLESS_TIER) {
            "General Purpose"
        } else {
            self.tier.as_str()
        };
        vcore_storage_cost_component(
            &self.region,
            storage_tier,
            self.zone_redundant,
            self.max_size_gb,
        )
    }

    fn long_term_retention_cost_component(&self) -> CostComponent {
        CostComponent {
            name: "Long-term retention".to_string(),
            unit: "GB".to_string(),
            monthly_quantity: self.long_term_retention_storage_gb.map(Decimal::from),
            product_filter: self.sql_product_filter(vec![
                AttributeFilter::exact("productName", "SQL Database - LTR Backup Storage"),
                AttributeFilter::exact("skuName", "Backup RA-GRS"),
                AttributeFilter::regex("meterName", "/RA-GRS Data Stored/i"),
            ]),
            price_filter: price_filter_consumption(),
            usage_based: true,
            ..Default::default()
        }
    }
}

impl CoreResource for SqlDatabase {
    fn core_type(&self) -> &'static str {
        "SQLDatabase"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::int("extra_data_storage_gb"),
            UsageItem::int("monthly_vcore_hours"),
            UsageItem::int("long_term_retention_storage_gb"),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.extra_data_storage_gb = usage.get_i64("extra_data_storage_gb");
        self.monthly_vcore_hours = usage.get_i64("monthly_vcore_hours");
        self.long_term_retention_storage_gb = usage.get_i64("long_term_retention_storage_gb");
    }

    fn build_resource(&self) -> Option<Resource> {
        let cost_components = match self.cores {
            Some(cores) => self.vcore_cost_components(cores),
            None => self.dtu_cost_components(),
        };

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
    use serde_json::json;

    fn names(resource: &Resource) -> Vec<&str> {
        resource.cost_components.iter().map(|c| c.name.as_str()).collect()
    }

    fn dtu(sku: &str, max_size_gb: Option<Decimal>) -> SqlDatabase {
        SqlDatabase {
            address: "azurerm_mssql_database.app".to_string(),
            region: "eastus".to_string(),
            sku: sku.to_string(),
            max_size_gb,
            ..Default::default()
        }
    }

    fn vcore(tier: &str, sku: &str) -> SqlDatabase {
        SqlDatabase {
            address: "azurerm_mssql_database.app".to_string(),
            region: "eastus".to_string(),
            sku: sku.to_string(),
            tier: tier.to_string(),
            family: "Gen5".to_string(),
            cores: Some(4),
            license_type: "LicenseIncluded".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_basic_dtu_has_no_extra_storage() {
        let resource = dtu("Basic", None).build_resource().unwrap();
        assert_eq!(names(&resource), vec!["Compute (BASIC)", "Long-term retention"]);
        assert_eq!(resource.cost_components[0].monthly_quantity, Some(dec!(30)));
    }

    #[test]
    fn test_dtu_extra_storage_above_included() {
        let premium = dtu("P1", Some(dec!(750))).build_resource().unwrap();
        assert_eq!(premium.cost_components[1].name, "Extra data storage");
        assert_eq!(premium.cost_components[1].monthly_quantity, Some(dec!(250)));

        let standard = dtu("S0", Some(dec!(100))).build_resource().unwrap();
        assert!(standard.cost_components[1].monthly_quantity.is_none());
    }

    #[test]
    fn test_extra_storage_usage_wins() {
        let mut db = dtu("S2", Some(dec!(500)));
        let usage = json!({"extra_data_storage_gb": 40});
        let usage = UsageData::from_value("azurerm_mssql_database.app", &usage).unwrap();
        db.populate_usage(&usage);

        let resource = db.build_resource().unwrap();
        assert_eq!(resource.cost_components[1].monthly_quantity, Some(dec!(40)));
    }

    #[test]
    fn test_provisioned_vcore_with_license() {
        let resource = vcore("General Purpose", "GP_Gen5_4").build_resource().unwrap();
        assert_eq!(
            names(&resource),
            vec![
                "Compute (provisioned, GP_Gen5_4)",
                "SQL license",
                "Storage",
                "Long-term retention"
            ]
        );
        assert_eq!(resource.cost_components[1].hourly_quantity, Some(dec!(4)));
        assert_eq!(
            resource.cost_components[1].product_filter.as_ref().unwrap().region.as_deref(),
            Some("Global")
        );
        assert_eq!(resource.cost_components[2].monthly_quantity, Some(dec!(5)));
    }

    #[test]
    fn test_serverless_and_hyperscale() {
        let serverless =
            vcore("General Purpose - Serverless", "GP_S_Gen5_4").build_resource().unwrap();
        assert_eq!(
            names(&serverless),
            vec!["Compute (serverless, GP_S_Gen5_4)", "Storage", "Long-term retention"]
        );
        let storage_sku =
            &serverless.cost_components[1].product_filter.as_ref().unwrap().attribute_filters[1];
        assert_eq!(storage_sku.value.as_deref(), Some("General Purpose"));

        let hyperscale = SqlDatabase {
            read_replica_count: Some(2),
            zone_redundant: true,
            ..vcore("Hyperscale", "HS_Gen5_4")
        }
        .build_resource()
        .unwrap();
        assert_eq!(
            names(&hyperscale),
            vec!["Compute (provisioned, HS_Gen5_4)", "Read replicas", "SQL license", "Storage"]
        );
        assert_eq!(hyperscale.cost_components[1].hourly_quantity, Some(dec!(2)));
        let compute_sku =
            &hyperscale.cost_components[0].product_filter.as_ref().unwrap().attribute_filters[1];
        assert_eq!(compute_sku.value.as_deref(), Some("4 vCore Zone Redundancy"));
    }
}
