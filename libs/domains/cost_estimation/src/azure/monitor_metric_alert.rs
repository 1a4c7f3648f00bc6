use rust_decimal::Decimal;

use super::util::{monitor_region, product_filter};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, PriceFilter, Resource, UsageData, UsageItem,
};

/// Metric alert rule, billed per monitored time series
#[derive(Debug, Clone, Default)]
pub struct MonitorMetricAlert {
    pub address: String,
    pub region: String,
    pub enabled: bool,
    pub scope_count: i64,
    pub criteria_dimensions_count: i64,
    pub dynamic_criteria_dimensions_count: i64,
}

impl MonitorMetricAlert {
    fn time_series_cost_component(
        &self,
        name: &str,
        meter: &str,
        start: &str,
        series: i64,
    ) -> CostComponent {
        CostComponent {
            name: name.to_string(),
            unit: "time-series".to_string(),
            monthly_quantity: Some(Decimal::from(series)),
            product_filter: product_filter(
                monitor_region(&self.region),
                "Azure Monitor",
                "Management and Governance",
                vec![AttributeFilter::exact("meterName", meter)],
            ),
            price_filter: Some(PriceFilter {
                start_usage_amount: Some(start.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

impl CoreResource for MonitorMetricAlert {
    fn core_type(&self) -> &'static str {
        "MonitorMetricAlert"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        Vec::new()
    }

    fn populate_usage(&mut self, _usage: &UsageData) {}

    fn build_resource(&self) -> Option<Resource> {
        let mut cost_components = Vec::new();

        if self.enabled {
            let total_series = self.scope_count
                * (self.criteria_dimensions_count + self.dynamic_criteria_dimensions_count);
            if total_series > 0 {
                cost_components.push(self.time_series_cost_component(
                    "Metrics monitoring",
                    "Alerts Metric Monitored",
                    "10",
                    total_series,
                ));
            }

            let dynamic_series = self.scope_count * self.dynamic_criteria_dimensions_count;
            if dynamic_series > 0 {
                cost_components.push(self.time_series_cost_component(
                    "Dynamic threshold monitoring",
                    "Alerts Dynamic Threshold",
                    "0",
                    dynamic_series,
                ));
            }
        }

        Some(Resource {
            name: self.address.clone(),
            cost_components,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn alert(enabled: bool) -> MonitorMetricAlert {
        MonitorMetricAlert {
            address: "azurerm_monitor_metric_alert.cpu".to_string(),
            region: "global".to_string(),
            enabled,
            scope_count: 2,
            criteria_dimensions_count: 3,
            dynamic_criteria_dimensions_count: 1,
        }
    }

    #[test]
    fn test_time_series_per_scope() {
        let resource = alert(true).build_resource().unwrap();

        let series: Vec<(&str, Option<Decimal>)> = resource
            .cost_components
            .iter()
            .map(|c| (c.name.as_str(), c.monthly_quantity))
            .collect();
        assert_eq!(
            series,
            vec![
                ("Metrics monitoring", Some(dec!(8))),
                ("Dynamic threshold monitoring", Some(dec!(2))),
            ]
        );
        let filter = resource.cost_components[0].product_filter.as_ref().unwrap();
        assert_eq!(filter.region.as_deref(), Some("Global"));
    }

    #[test]
    fn test_disabled_alert_is_free() {
        let resource = alert(false).build_resource().unwrap();
        assert!(resource.cost_components.is_empty());
    }
}
