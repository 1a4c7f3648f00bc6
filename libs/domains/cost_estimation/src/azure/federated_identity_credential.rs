use rust_decimal::Decimal;

use super::util::product_filter;
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, PriceFilter, Resource, UsageData, UsageItem,
};

/// Monthly active users covered by the free tier
const FREE_ACTIVE_USERS: i64 = 50_000;

/// External identities billed per monthly active user over the free tier.
/// P1 usage takes precedence when both licences have usage.
#[derive(Debug, Clone, Default)]
pub struct FederatedIdentityCredential {
    pub address: String,
    pub region: String,

    pub monthly_active_p1_users: Option<i64>,
    pub monthly_active_p2_users: Option<i64>,
}

impl FederatedIdentityCredential {
    fn active_users_cost_component(&self, licence: &str, users: Option<i64>) -> CostComponent {
        CostComponent {
            name: format!("Active users ({licence})"),
            unit: "users".to_string(),
            monthly_quantity: users.map(|u| Decimal::from((u - FREE_ACTIVE_USERS).max(0))),
            product_filter: product_filter(
                &self.region,
                "Azure Active Directory for External Identities",
                "Security",
                vec![
                    AttributeFilter::exact("skuName", licence),
                    AttributeFilter::exact("meterName", format!("{licence} Monthly Active Users")),
                ],
            ),
            price_filter: Some(PriceFilter {
                start_usage_amount: Some(FREE_ACTIVE_USERS.to_string()),
                ..Default::default()
            }),
            usage_based: true,
            ..Default::default()
        }
    }
}

impl CoreResource for FederatedIdentityCredential {
    fn core_type(&self) -> &'static str {
        "FederatedIdentityCredential"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::int("monthly_active_p1_users"),
            UsageItem::int("monthly_active_p2_users"),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_active_p1_users = usage.get_i64("monthly_active_p1_users");
        self.monthly_active_p2_users = usage.get_i64("monthly_active_p2_users");
    }

    fn build_resource(&self) -> Option<Resource> {
        let cost_components = match (self.monthly_active_p1_users, self.monthly_active_p2_users) {
            (Some(users), _) => vec![self.active_users_cost_component("P1", Some(users))],
            (None, Some(users)) => vec![self.active_users_cost_component("P2", Some(users))],
            (None, None) => vec![
                self.active_users_cost_component("P1", None),
                self.active_users_cost_component("P2", None),
            ],
        };

        Some(Resource {
            name: self.address.clone(),
            cost_components,
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}
