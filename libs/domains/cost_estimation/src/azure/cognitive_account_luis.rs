use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

use super::cognitive::{
    AccountSku, CommitmentSku, CommitmentTier, CommitmentUsage, account_sku, amount_to_description,
    cognitive_filter, free_resource, needs_pay_as_you_go, per,
};
use crate::schema::{AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem};

const PRODUCT_NAME: &str = "Language Understanding";
const TRANSACTIONS: &str = "1K transactions";
const VALID_COMMITMENTS: &[i64] = &[1_000_000, 5_000_000, 25_000_000];

/// Speech requests have no catalog meter and use the published per-1K price
const SPEECH_REQUEST_PRICE: Decimal = dec!(5.5);
const US_GOV_SPEECH_REQUEST_PRICE: Decimal = dec!(6.875);

/// Cognitive Services account of kind `LUIS`
#[derive(Debug, Clone, Default)]
pub struct CognitiveAccountLuis {
    pub address: String,
    pub region: String,
    pub sku: String,

    pub monthly_text_requests: Option<i64>,
    pub monthly_speech_requests: Option<i64>,
    pub commitment_text_requests: CommitmentUsage,
    pub connected_container_commitment_text_requests: CommitmentUsage,
}

impl CognitiveAccountLuis {
    fn commitment_cost_components(
        &self,
        tier: CommitmentTier,
        usage: &CommitmentUsage,
    ) -> Vec<CostComponent> {
        let Some(amount) = usage.committed else {
            return Vec::new();
        };
        if !VALID_COMMITMENTS.contains(&amount) {
            warn!(address = %self.address, amount, "Invalid commitment tier");
            return Vec::new();
        }

        // Both tiers are listed under the Azure commitment SKU
        let sku = CommitmentSku {
            region: &self.region,
            product_name: PRODUCT_NAME,
            sku_name: format!("Commitment Tier Azure {}", amount_to_description(amount)),
        };
        let label = tier.label();

        let mut components = vec![sku.commitment_cost_component(
            format!("Text requests ({label})"),
            "1M transactions",
            Decimal::from(amount) / Decimal::from(1_000_000),
        )];
        if let Some(overage) = usage.overage {
            components.push(sku.overage_cost_component(
                format!("Text requests ({label} overage)"),
                TRANSACTIONS,
                overage / Decimal::from(1_000),
            ));
        }
        components
    }

    fn speech_requests_cost_component(&self) -> CostComponent {
        let price = if self.region.starts_with("usgov") {
            US_GOV_SPEECH_REQUEST_PRICE
        } else {
            SPEECH_REQUEST_PRICE
        };
        CostComponent {
            name: "Speech requests".to_string(),
            unit: TRANSACTIONS.to_string(),
            monthly_quantity: per(self.monthly_speech_requests, 1_000),
            custom_price: Some(price),
            ..Default::default()
        }
    }
}

impl CoreResource for CognitiveAccountLuis {
    fn core_type(&self) -> &'static str {
        "CognitiveAccountLUIS"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::int("monthly_luis_text_requests"),
            UsageItem::int("monthly_luis_speech_requests"),
            UsageItem::int("monthly_commitment_luis_text_requests"),
            UsageItem::int("monthly_commitment_luis_text_overage_requests"),
            UsageItem::int("monthly_connected_container_commitment_luis_text_requests"),
            UsageItem::int("monthly_connected_container_commitment_luis_text_overage_requests"),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_text_requests = usage.get_i64("monthly_luis_text_requests");
        self.monthly_speech_requests = usage.get_i64("monthly_luis_speech_requests");
        self.commitment_text_requests = CommitmentUsage::from_usage(
            usage,
            "monthly_commitment_luis_text_requests",
            "monthly_commitment_luis_text_overage_requests",
        );
        self.connected_container_commitment_text_requests = CommitmentUsage::from_usage(
            usage,
            "monthly_connected_container_commitment_luis_text_requests",
            "monthly_connected_container_commitment_luis_text_overage_requests",
        );
    }

    fn build_resource(&self) -> Option<Resource> {
        if let AccountSku::Free = account_sku(&self.address, &self.sku)? {
            return Some(free_resource(&self.address));
        }

        let standard = &self.commitment_text_requests;
        let connected = &self.connected_container_commitment_text_requests;

        let mut cost_components =
            self.commitment_cost_components(CommitmentTier::Standard, standard);
        cost_components
            .extend(self.commitment_cost_components(CommitmentTier::ConnectedContainer, connected));
        if needs_pay_as_you_go(standard, connected, self.monthly_text_requests.is_some()) {
            cost_components.push(CostComponent {
                name: "Text requests".to_string(),
                unit: TRANSACTIONS.to_string(),
                monthly_quantity: per(self.monthly_text_requests, 1_000),
                product_filter: cognitive_filter(
                    &self.region,
                    PRODUCT_NAME,
                    "S1",
                    AttributeFilter::exact("meterName", "S1 Transactions"),
                ),
                ..Default::default()
            });
        }
        cost_components.push(self.speech_requests_cost_component());

        Some(Resource {
            name: self.address.clone(),
            cost_components,
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}
