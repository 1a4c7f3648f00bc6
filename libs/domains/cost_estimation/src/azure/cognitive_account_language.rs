use rust_decimal::Decimal;
use tracing::warn;

use super::cognitive::{
    AccountSku, CommitmentSku, CommitmentTier, CommitmentUsage, account_sku, amount_to_description,
    cognitive_filter, free_resource, needs_pay_as_you_go, per,
};
use super::util::price_filter_tier;
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem,
    calculate_tier_buckets,
};

const PRODUCT_NAME: &str = "Language";
const RECORDS: &str = "1K records";

const TEXT_ANALYTICS_COMMITMENTS: &[i64] = &[1_000_000, 3_000_000, 10_000_000];
const SUMMARIZATION_COMMITMENTS: &[i64] = &[3_000_000, 10_000_000];

/// Tier widths in 1K records, with each tier's name suffix and price start amount
struct RecordTiers {
    widths: &'static [i64],
    tiers: &'static [(&'static str, &'static str)],
    /// Number of leading tiers that are free and never shown
    free_tiers: usize,
}

const TEXT_ANALYTICS_TIERS: RecordTiers = RecordTiers {
    widths: &[500, 2_000, 7_500],
    tiers: &[
        (" (first 500K)", "0"),
        (" (500K-2.5M)", "500"),
        (" (2.5M-10M)", "2500"),
        (" (over 10M)", "10000"),
    ],
    free_tiers: 0,
};

const QUESTION_ANSWERING_TIERS: RecordTiers = RecordTiers {
    widths: &[2_500],
    tiers: &[(" (first 2.5M)", "0"), (" (over 2.5M)", "2500")],
    free_tiers: 0,
};

const HEALTH_TIERS: RecordTiers = RecordTiers {
    widths: &[5, 495, 2_000, 7_500],
    tiers: &[
        (" (first 5K)", "0"),
        (" (5K-500K)", "5"),
        (" (500K-2.5M)", "500"),
        (" (2.5M-10M)", "2500"),
        (" (over 10M)", "10000"),
    ],
    free_tiers: 1,
};

/// A language feature sold in commitment tiers
struct LanguageCommitment {
    valid_amounts: &'static [i64],
    sku_prefix: &'static str,
    name: &'static str,
    overage_name: &'static str,
}

const TEXT_ANALYTICS_COMMITMENT: LanguageCommitment = LanguageCommitment {
    valid_amounts: TEXT_ANALYTICS_COMMITMENTS,
    sku_prefix: "Commitment Tier",
    name: "Text analytics",
    overage_name: "Text requests",
};

const SUMMARIZATION_COMMITMENT: LanguageCommitment = LanguageCommitment {
    valid_amounts: SUMMARIZATION_COMMITMENTS,
    sku_prefix: "Commitment Tier Summarization",
    name: "Summarization",
    overage_name: "Summarization",
};

/// Cognitive Services account of kind `TextAnalytics` (Language service)
#[derive(Debug, Clone, Default)]
pub struct CognitiveAccountLanguage {
    pub address: String,
    pub region: String,
    pub sku: String,

    pub monthly_text_analytics_records: Option<i64>,
    pub monthly_summarization_records: Option<i64>,
    pub monthly_conversational_language_understanding_records: Option<i64>,
    pub monthly_conversational_language_understanding_advanced_training_hours: Option<Decimal>,
    pub monthly_customized_text_classification_records: Option<i64>,
    pub monthly_customized_summarization_records: Option<i64>,
    pub monthly_customized_question_answering_records: Option<i64>,
    pub monthly_customized_training_hours: Option<Decimal>,
    pub monthly_text_analytics_for_health_records: Option<i64>,

    pub commitment_text_analytics: CommitmentUsage,
    pub commitment_summarization: CommitmentUsage,
    pub connected_container_commitment_text_analytics: CommitmentUsage,
    pub connected_container_commitment_summarization: CommitmentUsage,
}

impl CognitiveAccountLanguage {
    fn standard_cost_component(
        &self,
        name: String,
        unit: &str,
        meter: &str,
        quantity: Option<Decimal>,
    ) -> CostComponent {
        CostComponent {
            name,
            unit: unit.to_string(),
            monthly_quantity: quantity,
            product_filter: cognitive_filter(
                &self.region,
                PRODUCT_NAME,
                "Standard",
                AttributeFilter::exact("meterName", meter),
            ),
            ..Default::default()
        }
    }

    /// One component per non-empty tier, or the first paid tier when there is no usage
    fn tiered_cost_components(
        &self,
        name: &str,
        meter: &str,
        records: Option<i64>,
        tiers: &RecordTiers,
    ) -> Vec<CostComponent> {
        let tier_component = |index: usize, quantity: Option<Decimal>| {
            let (suffix, start) = tiers.tiers[index];
            CostComponent {
                price_filter: price_filter_tier(start),
                ..self.standard_cost_component(format!("{name}{suffix}"), RECORDS, meter, quantity)
            }
        };

        let Some(quantity) = per(records, 1_000) else {
            return vec![tier_component(1, None)];
        };

        calculate_tier_buckets(quantity, tiers.widths)
            .into_iter()
            .enumerate()
            .skip(tiers.free_tiers)
            .filter(|(_, bucket)| *bucket > Decimal::ZERO)
            .map(|(index, bucket)| tier_component(index, Some(bucket)))
            .collect()
    }

    fn commitment_cost_components(
        &self,
        feature: &LanguageCommitment,
        tier: CommitmentTier,
        usage: &CommitmentUsage,
    ) -> Vec<CostComponent> {
        let Some(amount) = usage.committed else {
            return Vec::new();
        };
        if !feature.valid_amounts.contains(&amount) {
            warn!(address = %self.address, amount, "Invalid commitment tier");
            return Vec::new();
        }

        let sku = CommitmentSku {
            region: &self.region,
            product_name: PRODUCT_NAME,
            sku_name: format!(
                "{} {} {}",
                feature.sku_prefix,
                tier.sku_word(),
                amount_to_description(amount)
            ),
        };
        let label = tier.label();

        let mut components = vec![CostComponent {
            unit_rounding: Some(0),
            ..sku.commitment_cost_component(
                format!("{} ({label})", feature.name),
                RECORDS,
                Decimal::from(amount) / Decimal::from(1_000),
            )
        }];
        if let Some(overage) = usage.overage {
            components.push(sku.overage_cost_component(
                format!("{} ({label} overage)", feature.overage_name),
                RECORDS,
                overage / Decimal::from(1_000),
            ));
        }
        components
    }

    fn text_analytics_cost_components(&self) -> Vec<CostComponent> {
        let standard = &self.commitment_text_analytics;
        let connected = &self.connected_container_commitment_text_analytics;

        let mut components = self.commitment_cost_components(
            &TEXT_ANALYTICS_COMMITMENT,
            CommitmentTier::Standard,
            standard,
        );
        components.extend(self.commitment_cost_components(
            &TEXT_ANALYTICS_COMMITMENT,
            CommitmentTier::ConnectedContainer,
            connected,
        ));
        if needs_pay_as_you_go(standard, connected, self.monthly_text_analytics_records.is_some()) {
            components.extend(self.tiered_cost_components(
                "Text analytics",
                "Standard Text Records",
                self.monthly_text_analytics_records,
                &TEXT_ANALYTICS_TIERS,
            ));
        }
        components
    }

    fn summarization_cost_components(&self) -> Vec<CostComponent> {
        let standard = &self.commitment_summarization;
        let connected = &self.connected_container_commitment_summarization;

        let mut components = self.commitment_cost_components(
            &SUMMARIZATION_COMMITMENT,
            CommitmentTier::Standard,
            standard,
        );
        components.extend(self.commitment_cost_components(
            &SUMMARIZATION_COMMITMENT,
            CommitmentTier::ConnectedContainer,
            connected,
        ));
        if needs_pay_as_you_go(standard, connected, self.monthly_summarization_records.is_some()) {
            components.push(self.standard_cost_component(
                "Summarization".to_string(),
                RECORDS,
                "Standard Summarization Text Records",
                per(self.monthly_summarization_records, 1_000),
            ));
        }
        components
    }
}

impl CoreResource for CognitiveAccountLanguage {
    fn core_type(&self) -> &'static str {
        "CognitiveAccountLanguage"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::int("monthly_language_text_analytics_records"),
            UsageItem::int("monthly_language_summarization_records"),
            UsageItem::int("monthly_language_conversational_language_understanding_records"),
            UsageItem::float(
                "monthly_language_conversational_language_understanding_advanced_training_hours",
            ),
            UsageItem::int("monthly_language_customized_text_classification_records"),
            UsageItem::int("monthly_language_customized_summarization_records"),
            UsageItem::int("monthly_language_customized_question_answering_records"),
            UsageItem::float("monthly_language_customized_training_hours"),
            UsageItem::int("monthly_language_text_analytics_for_health_records"),
            UsageItem::int("monthly_commitment_language_text_analytics_records"),
            UsageItem::int("monthly_commitment_language_text_analytics_overage_records"),
            UsageItem::int("monthly_commitment_language_summarization_records"),
            UsageItem::int("monthly_commitment_language_summarization_overage_records"),
            UsageItem::int(
                "monthly_connected_container_commitment_language_text_analytics_records",
            ),
            UsageItem::int(
                "monthly_connected_container_commitment_language_text_analytics_overage_records",
            ),
            UsageItem::int("monthly_connected_container_commitment_language_summarization_records"),
            UsageItem::int(
                "monthly_connected_container_commitment_language_summarization_overage_records",
            ),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_text_analytics_records =
            usage.get_i64("monthly_language_text_analytics_records");
        self.monthly_summarization_records =
            usage.get_i64("monthly_language_summarization_records");
        self.monthly_conversational_language_understanding_records =
            usage.get_i64("monthly_language_conversational_language_understanding_records");
        self.monthly_conversational_language_understanding_advanced_training_hours = usage
            .get_decimal(
                "monthly_language_conversational_language_understanding_advanced_training_hours",
            );
        self.monthly_customized_text_classification_records =
            usage.get_i64("monthly_language_customized_text_classification_records");
        self.monthly_customized_summarization_records =
            usage.get_i64("monthly_language_customized_summarization_records");
        self.monthly_customized_question_answering_records =
            usage.get_i64("monthly_language_customized_question_answering_records");
        self.monthly_customized_training_hours =
            usage.get_decimal("monthly_language_customized_training_hours");
        self.monthly_text_analytics_for_health_records =
            usage.get_i64("monthly_language_text_analytics_for_health_records");

        self.commitment_text_analytics = CommitmentUsage::from_usage(
            usage,
            "monthly_commitment_language_text_analytics_records",
            "monthly_commitment_language_text_analytics_overage_records",
        );
        self.commitment_summarization = CommitmentUsage::from_usage(
            usage,
            "monthly_commitment_language_summarization_records",
            "monthly_commitment_language_summarization_overage_records",
        );
        self.connected_container_commitment_text_analytics = CommitmentUsage::from_usage(
            usage,
            "monthly_connected_container_commitment_language_text_analytics_records",
            "monthly_connected_container_commitment_language_text_analytics_overage_records",
        );
        self.connected_container_commitment_summarization = CommitmentUsage::from_usage(
            usage,
            "monthly_connected_container_commitment_language_summarization_records",
            "monthly_connected_container_commitment_language_summarization_overage_records",
        );
    }

    fn build_resource(&self) -> Option<Resource> {
        if let AccountSku::Free = account_sku(&self.address, &self.sku)? {
            return Some(free_resource(&self.address));
        }

        let mut cost_components = self.text_analytics_cost_components();
        cost_components.extend(self.summarization_cost_components());
        cost_components.extend([
            self.standard_cost_component(
                "Conversational language understanding".to_string(),
                RECORDS,
                "Standard CLU Text Records",
                per(self.monthly_conversational_language_understanding_records, 1_000),
            ),
            self.standard_cost_component(
                "Conversational language understanding advanced training".to_string(),
                "hour",
                "Standard CLU Advanced Training Unit",
                self.monthly_conversational_language_understanding_advanced_training_hours,
            ),
            self.standard_cost_component(
                "Customized text classification".to_string(),
                RECORDS,
                "Standard Custom Text Records",
                per(self.monthly_customized_text_classification_records, 1_000),
            ),
            self.standard_cost_component(
                "Customized summarization".to_string(),
                RECORDS,
                "Standard Custom Summarization Text Records",
                per(self.monthly_customized_summarization_records, 1_000),
            ),
        ]);
        cost_components.extend(self.tiered_cost_components(
            "Customized question answering",
            "Standard QA Text Records",
            self.monthly_customized_question_answering_records,
            &QUESTION_ANSWERING_TIERS,
        ));
        cost_components.push(self.standard_cost_component(
            "Customized training".to_string(),
            "hour",
            "Standard Custom Training Unit",
            self.monthly_customized_training_hours,
        ));
        cost_components.extend(self.tiered_cost_components(
            "Text analytics for health",
            "Standard Health Text Records",
            self.monthly_text_analytics_for_health_records,
            &HEALTH_TIERS,
        ));

        Some(Resource {
            name: self.address.clone(),
            cost_components,
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}
