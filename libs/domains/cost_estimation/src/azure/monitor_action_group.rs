use regex::Regex;
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::warn;

use super::util::{price_filter_tier, product_filter};
use crate::schema::{AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem};

static COUNTRY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^country_code_(\d+)$").unwrap());

const SERVICE: &str = "Azure Monitor";
const PRODUCT_FAMILY: &str = "Management and Governance";

/// Alert notification targets. Only channels with usage are billed.
#[derive(Debug, Clone, Default)]
pub struct MonitorActionGroup {
    pub address: String,
    pub region: String,

    pub monthly_emails: Option<i64>,
    pub monthly_itsm_events: Option<i64>,
    pub monthly_push_notifications: Option<i64>,
    pub monthly_secure_web_hooks: Option<i64>,
    pub monthly_web_hooks: Option<i64>,
    /// Keyed `country_code_<n>`
    pub monthly_sms_messages: BTreeMap<String, Decimal>,
    pub monthly_voice_calls: BTreeMap<String, Decimal>,
}

/// Country codes in ascending order with their quantities. Unknown keys are logged and skipped.
fn country_code_quantities(usage: &BTreeMap<String, Decimal>) -> Vec<(u32, Decimal)> {
    let mut codes: Vec<(u32, Decimal)> = usage
        .iter()
        .filter_map(|(key, quantity)| {
            let code = COUNTRY_CODE
                .captures(key)
                .and_then(|caps| caps[1].parse::<u32>().ok());
            if code.is_none() {
                warn!(key = %key, "Unrecognized country code key, must match country_code_(\\d+)");
            }
            code.map(|code| (code, *quantity))
        })
        .collect();

    codes.sort_by_key(|(code, _)| *code);
    codes
}

impl MonitorActionGroup {
    fn notification_component(
        &self,
        name: &str,
        unit: &str,
        quantity: i64,
        attribute_filters: Vec<AttributeFilter>,
        start_usage_amount: &str,
    ) -> CostComponent {
        CostComponent {
            name: name.to_string(),
            unit: unit.to_string(),
            monthly_quantity: Some(Decimal::from(quantity)),
            product_filter: product_filter(
                &self.region,
                SERVICE,
                PRODUCT_FAMILY,
                attribute_filters,
            ),
            price_filter: price_filter_tier(start_usage_amount),
            ..Default::default()
        }
    }

    fn notification_filters(meter: &str) -> Vec<AttributeFilter> {
        vec![
            AttributeFilter::exact("skuName", "Notifications"),
            AttributeFilter::exact("meterName", meter),
        ]
    }

    /// The first 100 US messages are free
    fn sms_component(&self, country_code: u32, quantity: Decimal) -> CostComponent {
        let start = if country_code == 1 { "100" } else { "0" };
        CostComponent {
            name: format!("Country code {country_code}"),
            unit: "messages".to_string(),
            monthly_quantity: Some(quantity),
            product_filter: product_filter(
                &self.region,
                SERVICE,
                PRODUCT_FAMILY,
                vec![AttributeFilter::exact("skuName", format!("SMS Country Code {country_code}"))],
            ),
            price_filter: price_filter_tier(start),
            ..Default::default()
        }
    }

    /// The first 10 US calls are free
    fn voice_call_component(&self, country_code: u32, quantity: Decimal) -> CostComponent {
        let (meter, start) = if country_code == 1 {
            ("Voice Calls".to_string(), "10")
        } else {
            (format!("Voice Calls Voice Call Country Code {country_code}"), "0")
        };
        CostComponent {
            name: format!("Country code {country_code}"),
            unit: "calls".to_string(),
            monthly_quantity: Some(quantity),
            product_filter: product_filter(
                &self.region,
                SERVICE,
                PRODUCT_FAMILY,
                vec![
                    AttributeFilter::exact("skuName", "Voice Calls"),
                    AttributeFilter::exact("meterName", meter),
                ],
            ),
            price_filter: price_filter_tier(start),
            ..Default::default()
        }
    }
}

impl CoreResource for MonitorActionGroup {
    fn core_type(&self) -> &'static str {
        "MonitorActionGroup"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::int("monthly_emails"),
            UsageItem::int("monthly_itsm_events"),
            UsageItem::int("monthly_push_notifications"),
            UsageItem::int("monthly_secure_web_hooks"),
            UsageItem::key_value_map("monthly_sms_messages", json!({"country_code_1": 0})),
            UsageItem::key_value_map("monthly_voice_calls", json!({"country_code_1": 0})),
            UsageItem::int("monthly_web_hooks"),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_emails = usage.get_i64("monthly_emails");
        self.monthly_itsm_events = usage.get_i64("monthly_itsm_events");
        self.monthly_push_notifications = usage.get_i64("monthly_push_notifications");
        self.monthly_secure_web_hooks = usage.get_i64("monthly_secure_web_hooks");
        self.monthly_web_hooks = usage.get_i64("monthly_web_hooks");
        self.monthly_sms_messages = usage.get_float_map("monthly_sms_messages").unwrap_or_default();
        self.monthly_voice_calls = usage.get_float_map("monthly_voice_calls").unwrap_or_default();
    }

    fn build_resource(&self) -> Option<Resource> {
        let mut cost_components = Vec::new();

        if let Some(emails) = self.monthly_emails {
            cost_components.push(self.notification_component(
                "Email notifications",
                "emails",
                emails,
                vec![AttributeFilter::exact("skuName", "Emails")],
                "1000",
            ));
        }

        let notification_channels = [
            (
                self.monthly_itsm_events,
                "ITSM connector events",
                "events",
                "Notifications ITSM Connector Create/Update Event",
                "1000",
            ),
            (
                self.monthly_push_notifications,
                "Push notifications",
                "notifications",
                "Notifications Push Notification",
                "1000",
            ),
            (
                self.monthly_secure_web_hooks,
                "Secure web hook notifications",
                "notifications",
                "Notifications Secure web hook",
                "100",
            ),
            (
                self.monthly_web_hooks,
                "Web hook notifications",
                "notifications",
                "Notifications Web hook",
                "10000",
            ),
        ];
        for (quantity, name, unit, meter, start) in notification_channels {
            if let Some(quantity) = quantity {
                let filters = Self::notification_filters(meter);
                let component = self.notification_component(name, unit, quantity, filters, start);
                cost_components.push(component);
            }
        }

        let mut sub_resources = Vec::new();

        let sms: Vec<CostComponent> = country_code_quantities(&self.monthly_sms_messages)
            .into_iter()
            .map(|(code, quantity)| self.sms_component(code, quantity))
            .collect();
        if !sms.is_empty() {
            sub_resources.push(Resource {
                name: "SMS messages".to_string(),
                cost_components: sms,
                ..Default::default()
            });
        }

        let voice: Vec<CostComponent> = country_code_quantities(&self.monthly_voice_calls)
            .into_iter()
            .map(|(code, quantity)| self.voice_call_component(code, quantity))
            .collect();
        if !voice.is_empty() {
            sub_resources.push(Resource {
                name: "Voice calls".to_string(),
                cost_components: voice,
                ..Default::default()
            });
        }

        Some(Resource {
            name: self.address.clone(),
            cost_components,
            sub_resources,
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn action_group() -> MonitorActionGroup {
        MonitorActionGroup {
            address: "azurerm_monitor_action_group.ops".to_string(),
            region: "eastus".to_string(),
            ..Default::default()
        }
    }

    fn start_amount(component: &CostComponent) -> Option<&str> {
        component
            .price_filter
            .as_ref()
            .and_then(|f| f.start_usage_amount.as_deref())
    }

    #[test]
    fn test_without_usage_nothing_is_billed() {
        let resource = action_group().build_resource().unwrap();
        assert!(resource.cost_components.is_empty());
        assert!(resource.sub_resources.is_empty());
    }

    #[test]
    fn test_notifications_from_usage() {
        let mut group = action_group();
        let usage = UsageData::from_value(
            "azurerm_monitor_action_group.ops",
            &json!({
                "monthly_emails": 5000,
                "monthly_secure_web_hooks": 300,
                "monthly_web_hooks": 20000
            }),
        )
        .unwrap();
        group.populate_usage(&usage);

        let resource = group.build_resource().unwrap();
        let names: Vec<&str> = resource.cost_components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Email notifications", "Secure web hook notifications", "Web hook notifications"]
        );
        assert_eq!(start_amount(&resource.cost_components[0]), Some("1000"));
        assert_eq!(start_amount(&resource.cost_components[1]), Some("100"));
        assert_eq!(resource.cost_components[2].monthly_quantity, Some(dec!(20000)));
    }

    #[test]
    fn test_country_codes_sorted_and_unknown_keys_skipped() {
        let mut group = action_group();
        let usage = UsageData::from_value(
            "azurerm_monitor_action_group.ops",
            &json!({
                "monthly_sms_messages": {"country_code_44": 50, "country_code_1": 200, "uk": 3},
                "monthly_voice_calls": {"country_code_1": 30, "country_code_33": 4}
            }),
        )
        .unwrap();
        group.populate_usage(&usage);

        let resource = group.build_resource().unwrap();
        let sms = &resource.sub_resources[0];
        assert_eq!(sms.name, "SMS messages");
        assert_eq!(sms.cost_components.len(), 2);
        assert_eq!(sms.cost_components[0].name, "Country code 1");
        assert_eq!(start_amount(&sms.cost_components[0]), Some("100"));
        assert_eq!(sms.cost_components[1].name, "Country code 44");
        assert_eq!(start_amount(&sms.cost_components[1]), Some("0"));

        let voice = &resource.sub_resources[1];
        assert_eq!(voice.name, "Voice calls");
        assert_eq!(start_amount(&voice.cost_components[0]), Some("10"));
        let meter = &voice.cost_components[1].product_filter.as_ref().unwrap().attribute_filters[1];
        assert_eq!(
            meter.value.as_deref(),
            Some("Voice Calls Voice Call Country Code 33")
        );
    }
}
