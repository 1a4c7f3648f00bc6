use rust_decimal::Decimal;

use super::util::product_filter;
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, PriceFilter, Resource, UsageData, UsageItem,
};

/// Collected logs included at no cost, in GB
const FREE_LOGS_GB: i64 = 5;

/// NSG flow log with optional traffic analytics
#[derive(Debug, Clone, Default)]
pub struct NetworkWatcherFlowLog {
    pub address: String,
    pub region: String,
    pub traffic_analytics_enabled: bool,
    /// Processing every 10 minutes instead of every hour
    pub traffic_analytics_accelerated_processing: bool,

    pub monthly_logs_collected_gb: Option<Decimal>,
}

impl NetworkWatcherFlowLog {
    fn logs_collected_cost_component(&self) -> CostComponent {
        let free = Decimal::from(FREE_LOGS_GB);
        CostComponent {
            name: format!("Network logs collected (over {FREE_LOGS_GB}GB)"),
            unit: "GB".to_string(),
            monthly_quantity: self
                .monthly_logs_collected_gb
                .map(|gb| (gb - free).max(Decimal::ZERO)),
            product_filter: product_filter(
                &self.region,
                "Network Watcher",
                "Networking",
                vec![AttributeFilter::exact("meterName", "Standard Network Logs Collected")],
            ),
            price_filter: Some(PriceFilter {
                start_usage_amount: Some(FREE_LOGS_GB.to_string()),
                ..Default::default()
            }),
            usage_based: true,
            ..Default::default()
        }
    }

    fn traffic_analytics_cost_component(&self) -> CostComponent {
        let (meter, interval) = if self.traffic_analytics_accelerated_processing {
            ("Standard Traffic Analytics Processing at 10-Minute Interval", "10 min")
        } else {
            ("Standard Traffic Analytics Processing", "60 min")
        };

        CostComponent {
            name: format!("Traffic Analytics data processed ({interval} interval)"),
            unit: "GB".to_string(),
            monthly_quantity: self.monthly_logs_collected_gb,
            product_filter: product_filter(
                &self.region,
                "Network Watcher",
                "Networking",
                vec![AttributeFilter::exact("meterName", meter)],
            ),
            usage_based: true,
            ..Default::default()
        }
    }
}

impl CoreResource for NetworkWatcherFlowLog {
    fn core_type(&self) -> &'static str {
        "NetworkWatcherFlowLog"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![UsageItem::float("monthly_logs_collected_gb")]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_logs_collected_gb = usage.get_decimal("monthly_logs_collected_gb");
    }

    fn build_resource(&self) -> Option<Resource> {
        let mut cost_components = vec![self.logs_collected_cost_component()];
        if self.traffic_analytics_enabled {
            cost_components.push(self.traffic_analytics_cost_component());
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

    fn flow_log(gb: Decimal) -> NetworkWatcherFlowLog {
        NetworkWatcherFlowLog {
            address: "azurerm_network_watcher_flow_log.nsg".to_string(),
            region: "eastus".to_string(),
            monthly_logs_collected_gb: Some(gb),
            ..Default::default()
        }
    }

    #[test]
    fn test_free_logs_subtracted() {
        let resource = flow_log(dec!(12.5)).build_resource().unwrap();
        assert_eq!(resource.cost_components.len(), 1);
        assert_eq!(resource.cost_components[0].monthly_quantity, Some(dec!(7.5)));

        let small = flow_log(dec!(2)).build_resource().unwrap();
        assert_eq!(small.cost_components[0].monthly_quantity, Some(Decimal::ZERO));
    }

    #[test]
    fn test_accelerated_traffic_analytics() {
        let resource = NetworkWatcherFlowLog {
            traffic_analytics_enabled: true,
            traffic_analytics_accelerated_processing: true,
            ..flow_log(dec!(100))
        }
        .build_resource()
        .unwrap();

        let analytics = &resource.cost_components[1];
        assert_eq!(analytics.name, "Traffic Analytics data processed (10 min interval)");
        assert_eq!(analytics.monthly_quantity, Some(dec!(100)));
        assert_eq!(
            analytics.product_filter.as_ref().unwrap().attribute_filters[0],
            AttributeFilter::exact(
                "meterName",
                "Standard Traffic Analytics Processing at 10-Minute Interval"
            )
        );
    }
}
