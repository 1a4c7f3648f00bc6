use rust_decimal::Decimal;

use super::traffic_manager_profile::traffic_manager_billing_region;
use super::util::product_filter;
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem,
    month_to_hour_unit_multiplier,
};

/// Health checks faster than this interval, in seconds, pay for the add-on
const FAST_INTERVAL_SECONDS: i64 = 30;

#[derive(Debug, Clone, Default)]
pub struct TrafficManagerEndpoint {
    pub address: String,
    pub region: String,
    pub profile_enabled: bool,
    pub external: bool,
    pub health_check_interval: i64,
}

impl TrafficManagerEndpoint {
    fn sku(&self) -> &'static str {
        if self.external { "Non-Azure Endpoint" } else { "Azure Endpoint" }
    }

    fn health_check_cost_component(&self, name: &str, meter_suffix: &str) -> CostComponent {
        let billing_region = traffic_manager_billing_region(&self.region);
        CostComponent {
            name: format!("{name} ({billing_region})"),
            unit: "hours".to_string(),
            unit_multiplier: month_to_hour_unit_multiplier(),
            unit_rounding: Some(0),
            monthly_quantity: Some(Decimal::ONE),
            product_filter: product_filter(
                billing_region,
                "Traffic Manager",
                "Networking",
                vec![
                    AttributeFilter::exact("skuName", self.sku()),
                    AttributeFilter::exact("meterName", format!("{} {meter_suffix}", self.sku())),
                ],
            ),
            ..Default::default()
        }
    }
}

impl CoreResource for TrafficManagerEndpoint {
    fn core_type(&self) -> &'static str {
        "TrafficManagerEndpoint"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        Vec::new()
    }

    fn populate_usage(&mut self, _usage: &UsageData) {}

    fn build_resource(&self) -> Option<Resource> {
        if !self.profile_enabled {
            return Some(Resource {
                name: self.address.clone(),
                ..Default::default()
            });
        }

        let mut cost_components =
            vec![self.health_check_cost_component("Basic health check", "Health Checks")];
        if self.health_check_interval < FAST_INTERVAL_SECONDS {
            cost_components.push(self.health_check_cost_component(
                "Fast interval health checks add-on",
                "Fast Interval Health Check Add-ons",
            ));
        }

        Some(Resource {
            name: self.address.clone(),
            cost_components,
            ..Default::default()
        })
    }
}
