use rust_decimal::Decimal;

use super::util::{price_filter_consumption, product_filter, regex_filter};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, ProductFilter, Resource, UsageData, UsageItem,
};

/// WAF policy attached to classic Front Door. `region` holds the billing zone,
/// as for [`Frontdoor`](super::Frontdoor).
#[derive(Debug, Clone, Default)]
pub struct FrontdoorFirewallPolicy {
    pub address: String,
    pub region: String,
    pub custom_rules: i64,
    pub managed_rulesets: i64,

    pub monthly_custom_rule_requests: Option<i64>,
    pub monthly_managed_ruleset_requests: Option<i64>,
}

impl FrontdoorFirewallPolicy {
    fn waf_product_filter(&self, meter: &str) -> Option<ProductFilter> {
        product_filter(
            &self.region,
            "Azure Front Door Service",
            "Networking",
            vec![
                AttributeFilter::exact("skuName", "Standard"),
                AttributeFilter::regex("meterName", regex_filter(&format!("{meter}$"))),
                AttributeFilter::exact("productName", "Azure Front Door Service"),
            ],
        )
    }

    fn waf_cost_component(
        &self,
        name: &str,
        unit: &str,
        quantity: Option<Decimal>,
        meter: &str,
    ) -> CostComponent {
        CostComponent {
            name: name.to_string(),
            unit: unit.to_string(),
            monthly_quantity: quantity,
            product_filter: self.waf_product_filter(meter),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }

    fn requests_cost_component(
        &self,
        name: &str,
        requests: Option<i64>,
        meter: &str,
    ) -> CostComponent {
        let quantity = requests.map(|r| Decimal::from(r) / Decimal::from(1_000_000));
        CostComponent {
            usage_based: true,
            ..self.waf_cost_component(name, "1M requests", quantity, meter)
        }
    }
}

impl CoreResource for FrontdoorFirewallPolicy {
    fn core_type(&self) -> &'static str {
        "FrontdoorFirewallPolicy"
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::int("monthly_custom_rule_requests"),
            UsageItem::int("monthly_managed_ruleset_requests"),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_custom_rule_requests = usage.get_i64("monthly_custom_rule_requests");
        self.monthly_managed_ruleset_requests = usage.get_i64("monthly_managed_ruleset_requests");
    }

    fn build_resource(&self) -> Option<Resource> {
        let cost_components = vec![
            self.waf_cost_component("Policy", "months", Some(Decimal::ONE), "Policy"),
            self.waf_cost_component(
                "Custom rules",
                "rules",
                Some(Decimal::from(self.custom_rules)),
                "Rule",
            ),
            self.requests_cost_component(
                "Custom rule requests",
                self.monthly_custom_rule_requests,
                "Requests",
            ),
            self.waf_cost_component(
                "Managed rulesets",
                "rulesets",
                Some(Decimal::from(self.managed_rulesets)),
                "Default Ruleset",
            ),
            self.requests_cost_component(
                "Managed ruleset requests",
                self.monthly_managed_ruleset_requests,
                "Default Request",
            ),
        ];

        Some(Resource {
            name: self.address.clone(),
            cost_components,
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}
