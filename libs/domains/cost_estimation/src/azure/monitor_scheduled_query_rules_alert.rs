use rust_decimal::Decimal;

use super::util::{monitor_region, product_filter};
use crate::schema::{AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem};

/// Log search alert rule, billed by evaluation frequency
#[derive(Debug, Clone, Default)]
pub struct MonitorScheduledQueryRulesAlert {
    pub address: String,
    pub region: String,
    pub enabled: bool,
    pub time_series_count: i64,
    pub frequency_minutes: i64,
}

/// Frequencies are billed at 1, 5, 10 or 15 minute steps
fn billed_frequency(minutes: i64) -> i64 {
    match minutes {
        m if m >= 15 => 15,
        m if m >= 10 => 10,
        m if m >= 5 => 5,
        _ => 1,
    }
}

impl MonitorScheduledQueryRulesAlert {
    fn alert_cost_component(
        &self,
        name: String,
        unit: &str,
        quantity: i64,
        meter: String,
    ) -> CostComponent {
        CostComponent {
            name,
            unit: unit.to_string(),
            monthly_quantity: Some(Decimal::from(quantity)),
            product_filter: product_filter(
                monitor_region(&self.region),
                "Azure Monitor",
                "Management and Governance",
                vec![AttributeFilter::exact("meterName", meter)],
            ),
            ..Default::default()
        }
    }
}

impl CoreResource for MonitorScheduledQueryRulesAlert {
    fn core_type(&self) -> &'static str {
        "MonitorScheduledQueryRulesAlert"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        Vec::new()
    }

    fn populate_usage(&mut self, _usage: &UsageData) {}

    fn build_resource(&self) -> Option<Resource> {
        if !self.enabled {
            return Some(Resource {
                name: self.address.clone(),
                ..Default::default()
            });
        }

        let frequency = billed_frequency(self.frequency_minutes);
        let mut cost_components = vec![self.alert_cost_component(
            format!("Log alerts monitoring ({frequency} minute frequency)"),
            "rule",
            1,
            format!("Alerts System Log Monitored at {frequency} Minute Frequency"),
        )];

        // The first time series is included with the rule
        if self.time_series_count > 1 {
            cost_components.push(self.alert_cost_component(
                format!("Additional time-series monitoring ({frequency} minute frequency)"),
                "time-series",
                self.time_series_count - 1,
                format!("Alerts Resource Monitored at {frequency} Minute Frequency"),
            ));
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
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(1, 1)]
    #[case(4, 1)]
    #[case(5, 5)]
    #[case(12, 10)]
    #[case(60, 15)]
    fn test_billed_frequency(#[case] minutes: i64, #[case] expected: i64) {
        assert_eq!(billed_frequency(minutes), expected);
    }

    #[test]
    fn test_additional_time_series() {
        let alert = MonitorScheduledQueryRulesAlert {
            address: "azurerm_monitor_scheduled_query_rules_alert.errors".to_string(),
            region: "eastus".to_string(),
            enabled: true,
            time_series_count: 4,
            frequency_minutes: 5,
        };
        let resource = alert.build_resource().unwrap();

        assert_eq!(resource.cost_components.len(), 2);
        let additional = &resource.cost_components[1];
        assert_eq!(additional.name, "Additional time-series monitoring (5 minute frequency)");
        assert_eq!(additional.monthly_quantity, Some(dec!(3)));
        assert_eq!(
            additional.product_filter.as_ref().unwrap().attribute_filters[0],
            AttributeFilter::exact("meterName", "Alerts Resource Monitored at 5 Minute Frequency")
        );
    }

    #[test]
    fn test_disabled_rule_has_no_components() {
        let resource = MonitorScheduledQueryRulesAlert::default().build_resource().unwrap();
        assert!(resource.cost_components.is_empty());
    }
}
