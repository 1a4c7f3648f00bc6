use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::util::{price_filter_consumption, product_filter};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, HOUR_TO_MONTH_UNIT_MULTIPLIER, Resource,
    UsageData, UsageItem,
};

const UNKNOWN_SKU: &str = "unknown SKU";

/// Workflow Standard plan sizes: SKU, vCores, memory GB
const WORKFLOW_SKUS: &[(&str, Decimal, Decimal)] = &[
    ("WS1", dec!(1), dec!(3.5)),
    ("WS2", dec!(2), dec!(7)),
    ("WS3", dec!(4), dec!(14)),
];

/// Single-tenant Logic App. The plan SKU comes from usage since the app
/// only references its service plan.
#[derive(Debug, Clone, Default)]
pub struct LogicAppStandard {
    pub address: String,
    pub region: String,

    pub sku: Option<String>,
    pub monthly_standard_connector_calls: Option<i64>,
    pub monthly_enterprise_connector_calls: Option<i64>,
}

impl LogicAppStandard {
    fn workflow_sku(&self) -> Option<&'static (&'static str, Decimal, Decimal)> {
        let sku = self.sku.as_deref()?.to_uppercase();
        WORKFLOW_SKUS.iter().find(|(name, _, _)| *name == sku)
    }

    fn sku_name(&self) -> &'static str {
        self.workflow_sku().map_or(UNKNOWN_SKU, |(name, _, _)| name)
    }

    fn logic_apps_component(&self, name: String, unit: &str, meter: &str) -> CostComponent {
        CostComponent {
            name,
            unit: unit.to_string(),
            product_filter: product_filter(
                &self.region,
                "Logic Apps",
                "Integration",
                vec![AttributeFilter::exact("meterName", meter)],
            ),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }
}

impl CoreResource for LogicAppStandard {
    fn core_type(&self) -> &'static str {
        "LogicAppStandard"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::string("sku", ""),
            UsageItem::int("monthly_standard_connector_calls"),
            UsageItem::int("monthly_enterprise_connector_calls"),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.sku = usage.get_string("sku");
        self.monthly_standard_connector_calls = usage.get_i64("monthly_standard_connector_calls");
        self.monthly_enterprise_connector_calls =
            usage.get_i64("monthly_enterprise_connector_calls");
    }

    fn build_resource(&self) -> Option<Resource> {
        let sku = self.sku_name();
        let size = self.workflow_sku();

        let vcore = CostComponent {
            unit_multiplier: HOUR_TO_MONTH_UNIT_MULTIPLIER,
            hourly_quantity: size.map(|(_, vcores, _)| *vcores),
            ..self.logic_apps_component(
                format!("Workflow vCore ({sku})"),
                "vCore",
                "Standard vCPU Duration",
            )
        };
        let memory = CostComponent {
            unit_multiplier: HOUR_TO_MONTH_UNIT_MULTIPLIER,
            hourly_quantity: size.map(|(_, _, memory)| *memory),
            ..self.logic_apps_component(
                format!("Workflow memory ({sku})"),
                "GB",
                "Standard Memory Duration",
            )
        };
        let standard_connectors = CostComponent {
            monthly_quantity: self.monthly_standard_connector_calls.map(Decimal::from),
            usage_based: true,
            ..self.logic_apps_component(
                "Standard connectors".to_string(),
                "calls",
                "Consumption Standard Connector Actions",
            )
        };
        let enterprise_connectors = CostComponent {
            monthly_quantity: self.monthly_enterprise_connector_calls.map(Decimal::from),
            usage_based: true,
            ..self.logic_apps_component(
                "Enterprise connectors".to_string(),
                "calls",
                "Consumption Enterprise Connector Actions",
            )
        };

        Some(Resource {
            name: self.address.clone(),
            cost_components: vec![vcore, memory, standard_connectors, enterprise_connectors],
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn logic_app() -> LogicAppStandard {
        LogicAppStandard {
            address: "azurerm_logic_app_standard.orders".to_string(),
            region: "westeurope".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_unknown_sku_has_no_quantities() {
        let resource = logic_app().build_resource().unwrap();
        assert_eq!(resource.cost_components[0].name, "Workflow vCore (unknown SKU)");
        assert!(resource.cost_components[0].hourly_quantity.is_none());
        assert!(resource.cost_components[1].hourly_quantity.is_none());
    }

    #[test]
    fn test_sku_from_usage() {
        let mut app = logic_app();
        let usage = UsageData::from_value(
            "azurerm_logic_app_standard.orders",
            &json!({"sku": "ws2", "monthly_standard_connector_calls": 1000}),
        )
        .unwrap();
        app.populate_usage(&usage);

        let resource = app.build_resource().unwrap();
        assert_eq!(resource.cost_components[0].name, "Workflow vCore (WS2)");
        assert_eq!(resource.cost_components[0].hourly_quantity, Some(dec!(2)));
        assert_eq!(resource.cost_components[1].name, "Workflow memory (WS2)");
        assert_eq!(resource.cost_components[1].hourly_quantity, Some(dec!(7)));
        assert_eq!(resource.cost_components[2].monthly_quantity, Some(dec!(1000)));
        assert!(resource.cost_components[3].monthly_quantity.is_none());
    }
}
