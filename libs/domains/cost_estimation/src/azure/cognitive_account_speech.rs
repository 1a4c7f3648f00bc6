use rust_decimal::Decimal;
use tracing::warn;

use super::cognitive::{
    AccountSku, CommitmentSku, CommitmentTier, CommitmentUsage, account_sku, amount_to_description,
    cognitive_filter, free_resource, needs_pay_as_you_go, per,
};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, PriceFilter, Resource, UsageData, UsageItem,
};

const PRODUCT_NAME: &str = "Speech";
const HOURS: &str = "hours";
const CHARS: &str = "1M chars";

const VALID_HOUR_COMMITMENTS: &[i64] = &[2_000, 10_000, 50_000];
const VALID_CHAR_COMMITMENTS: &[i64] = &[80_000_000, 400_000_000, 2_000_000_000];

/// Meters billed per hour are listed as `1 Hour`; hosting meters as `1/Hour`
const HOUR_PRICE_UNIT: &str = "1 Hour";
const HOSTING_PRICE_UNIT: &str = "1/Hour";

/// A speech feature sold in commitment tiers
struct SpeechCommitment {
    name: &'static str,
    standard_sku: &'static str,
    connected_sku: &'static str,
    valid_amounts: &'static [i64],
    unit: &'static str,
    divisor: i64,
}

const SPEECH_TO_TEXT: SpeechCommitment = SpeechCommitment {
    name: "Speech to text",
    standard_sku: "Commitment Tier Speech to Text Azure",
    connected_sku: "Commitment Tier Speech to Text Connected",
    valid_amounts: VALID_HOUR_COMMITMENTS,
    unit: HOURS,
    divisor: 1,
};

const CUSTOM_MODEL: SpeechCommitment = SpeechCommitment {
    name: "Speech to text custom model",
    standard_sku: "Commitment Tier Custom Speech to Text Azure",
    connected_sku: "Commitment Tier Custom Speech to Text Connected",
    valid_amounts: VALID_HOUR_COMMITMENTS,
    unit: HOURS,
    divisor: 1,
};

const ENHANCED_ADD_ONS: SpeechCommitment = SpeechCommitment {
    name: "Speech to text enhanced add-ons",
    standard_sku: "Commitment Tier STT AddOn Azure",
    connected_sku: "Commitment Tier STT AddOn Connected",
    valid_amounts: VALID_HOUR_COMMITMENTS,
    unit: HOURS,
    divisor: 1,
};

const NEURAL_TEXT_TO_SPEECH: SpeechCommitment = SpeechCommitment {
    name: "Text to speech neural",
    standard_sku: "Commitment Tier Neural Text to Speech Azure",
    connected_sku: "Commit Tier Neural TTS Connected",
    valid_amounts: VALID_CHAR_COMMITMENTS,
    unit: CHARS,
    divisor: 1_000_000,
};

/// Commitment usage of one feature across both commitment tiers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeechCommitmentUsage {
    pub standard: CommitmentUsage,
    pub connected_container: CommitmentUsage,
}

impl SpeechCommitmentUsage {
    fn from_usage(usage: &UsageData, (committed_key, overage_key): (&str, &str)) -> Self {
        let tier = |prefix: &str| {
            CommitmentUsage::from_usage(
                usage,
                &format!("{prefix}_{committed_key}"),
                &format!("{prefix}_{overage_key}"),
            )
        };
        Self {
            standard: tier("monthly_commitment"),
            connected_container: tier("monthly_connected_container_commitment"),
        }
    }
}

/// Cognitive Services account of kind `SpeechServices`. Standard and
/// connected container commitment tiers are supported; disconnected
/// containers are not.
#[derive(Debug, Clone, Default)]
pub struct CognitiveAccountSpeech {
    pub address: String,
    pub region: String,
    pub sku: String,

    pub monthly_speech_to_text_standard_hrs: Option<Decimal>,
    pub monthly_speech_to_text_standard_batch_hrs: Option<Decimal>,
    pub monthly_speech_to_text_custom_hrs: Option<Decimal>,
    pub monthly_speech_to_text_custom_batch_hrs: Option<Decimal>,
    pub monthly_speech_to_text_custom_endpoint_hrs: Option<Decimal>,
    pub monthly_speech_to_text_conversation_transcription_multi_channel_audio_hrs: Option<Decimal>,
    pub monthly_speech_to_text_custom_training_hrs: Option<Decimal>,
    pub monthly_speech_to_text_enhanced_add_ons_hrs: Option<Decimal>,

    pub monthly_text_to_speech_neural_chars: Option<i64>,
    pub monthly_text_to_speech_custom_neural_training_hrs: Option<Decimal>,
    pub monthly_text_to_speech_custom_neural_chars: Option<i64>,
    pub monthly_text_to_speech_custom_neural_endpoint_hrs: Option<Decimal>,
    pub monthly_text_to_speech_long_audio_chars: Option<i64>,
    pub monthly_text_to_speech_personal_voice_profiles: Option<i64>,
    pub monthly_text_to_speech_personal_voice_chars: Option<i64>,

    pub monthly_speech_translation_hrs: Option<Decimal>,
    pub monthly_speaker_verification_transactions: Option<i64>,
    pub monthly_speaker_identification_transactions: Option<i64>,
    pub monthly_voice_profiles: Option<i64>,

    pub speech_to_text_commitment: SpeechCommitmentUsage,
    pub custom_model_commitment: SpeechCommitmentUsage,
    pub enhanced_add_ons_commitment: SpeechCommitmentUsage,
    pub neural_text_to_speech_commitment: SpeechCommitmentUsage,
}

const HOUR_USAGE_KEYS: &[&str] = &[
    "monthly_speech_to_text_standard_hrs",
    "monthly_speech_to_text_standard_batch_hrs",
    "monthly_speech_to_text_custom_hrs",
    "monthly_speech_to_text_custom_batch_hrs",
    "monthly_speech_to_text_custom_endpoint_hrs",
    "monthly_speech_to_text_conversation_transcription_multi_channel_audio_hrs",
    "monthly_speech_to_text_custom_training_hrs",
    "monthly_speech_to_text_enhanced_add_ons_hrs",
    "monthly_text_to_speech_custom_neural_training_hrs",
    "monthly_text_to_speech_custom_neural_endpoint_hrs",
    "monthly_speech_translation_hrs",
];

const COUNT_USAGE_KEYS: &[&str] = &[
    "monthly_text_to_speech_neural_chars",
    "monthly_text_to_speech_custom_neural_chars",
    "monthly_text_to_speech_long_audio_chars",
    "monthly_text_to_speech_personal_voice_profiles",
    "monthly_text_to_speech_personal_voice_chars",
    "monthly_speaker_verification_transactions",
    "monthly_speaker_identification_transactions",
    "monthly_voice_profiles",
];

/// Committed and overage key suffixes, prefixed per commitment tier
const SPEECH_TO_TEXT_KEYS: (&str, &str) =
    ("speech_to_text_standard_hrs", "speech_to_text_standard_overage_hrs");
const CUSTOM_MODEL_KEYS: (&str, &str) =
    ("speech_to_text_custom_hrs", "speech_to_text_custom_overage_hrs");
const ENHANCED_ADD_ONS_KEYS: (&str, &str) = (
    "speech_to_text_enhanced_add_ons_hrs",
    "speech_to_text_enhanced_add_ons_overage_hrs",
);
const NEURAL_CHARS_KEYS: (&str, &str) = (
    "text_to_speech_neural_commitment_chars",
    "text_to_speech_neural_overage_chars",
);
const COMMITMENT_USAGE_KEYS: &[(&str, &str)] =
    &[SPEECH_TO_TEXT_KEYS, CUSTOM_MODEL_KEYS, ENHANCED_ADD_ONS_KEYS, NEURAL_CHARS_KEYS];

impl CognitiveAccountSpeech {
    fn s1_cost_component(
        &self,
        name: &str,
        meter: &str,
        unit: &str,
        quantity: Option<Decimal>,
        price_unit: Option<&str>,
    ) -> CostComponent {
        CostComponent {
            name: name.to_string(),
            unit: unit.to_string(),
            monthly_quantity: quantity,
            product_filter: cognitive_filter(
                &self.region,
                PRODUCT_NAME,
                "S1",
                AttributeFilter::exact("meterName", meter),
            ),
            price_filter: price_unit.map(|unit| PriceFilter {
                unit: Some(unit.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn hourly_cost_component(
        &self,
        name: &str,
        meter: &str,
        hours: Option<Decimal>,
    ) -> CostComponent {
        self.s1_cost_component(name, meter, HOURS, hours, Some(HOUR_PRICE_UNIT))
    }

    fn commitment_cost_components(
        &self,
        feature: &SpeechCommitment,
        tier: CommitmentTier,
        usage: &CommitmentUsage,
    ) -> Vec<CostComponent> {
        let Some(amount) = usage.committed else {
            return Vec::new();
        };
        if !feature.valid_amounts.contains(&amount) {
            warn!(address = %self.address, amount, "Invalid commitment tier amount");
            return Vec::new();
        }

        let (sku_prefix, overage_label) = match tier {
            CommitmentTier::Standard => (feature.standard_sku, "overage"),
            CommitmentTier::ConnectedContainer => {
                (feature.connected_sku, "connected container overage")
            }
        };
        let sku = CommitmentSku {
            region: &self.region,
            product_name: PRODUCT_NAME,
            sku_name: format!("{sku_prefix} {}", amount_to_description(amount)),
        };
        let divisor = Decimal::from(feature.divisor);

        let mut components = vec![sku.commitment_cost_component(
            format!("{} ({})", feature.name, tier.label()),
            feature.unit,
            Decimal::from(amount) / divisor,
        )];
        if let Some(overage) = usage.overage.filter(|o| *o > Decimal::ZERO) {
            components.push(sku.overage_cost_component(
                format!("{} ({overage_label})", feature.name),
                feature.unit,
                overage / divisor,
            ));
        }
        components
    }

    /// Commitment tiers for a feature, then its pay-as-you-go component when needed
    fn committable_cost_components(
        &self,
        feature: &SpeechCommitment,
        usage: &SpeechCommitmentUsage,
        pay_as_you_go_usage: bool,
        pay_as_you_go: CostComponent,
    ) -> Vec<CostComponent> {
        let mut components =
            self.commitment_cost_components(feature, CommitmentTier::Standard, &usage.standard);
        components.extend(self.commitment_cost_components(
            feature,
            CommitmentTier::ConnectedContainer,
            &usage.connected_container,
        ));
        if needs_pay_as_you_go(&usage.standard, &usage.connected_container, pay_as_you_go_usage) {
            components.push(pay_as_you_go);
        }
        components
    }

    fn personal_voice_cost_components(&self) -> [CostComponent; 2] {
        let personal_voice = |name: &str, unit: &str, meter: &str, quantity| CostComponent {
            name: name.to_string(),
            unit: unit.to_string(),
            monthly_quantity: quantity,
            product_filter: cognitive_filter(
                &self.region,
                PRODUCT_NAME,
                "Text to Speech - Personal Voice",
                AttributeFilter::exact("meterName", meter),
            ),
            ..Default::default()
        };
        [
            personal_voice(
                "Text to speech personal voice profiles",
                "1K profiles",
                "Text to Speech - Personal Voice Voice Storage",
                per(self.monthly_text_to_speech_personal_voice_profiles, 1_000),
            ),
            personal_voice(
                "Text to speech personal voice characters",
                CHARS,
                "Text to Speech - Personal Voice Characters",
                per(self.monthly_text_to_speech_personal_voice_chars, 1_000_000),
            ),
        ]
    }

    fn cost_components(&self) -> Vec<CostComponent> {
        let mut components = self.committable_cost_components(
            &SPEECH_TO_TEXT,
            &self.speech_to_text_commitment,
            self.monthly_speech_to_text_standard_hrs.is_some(),
            self.hourly_cost_component(
                "Speech to text",
                "S1 Speech To Text",
                self.monthly_speech_to_text_standard_hrs,
            ),
        );
        components.push(self.hourly_cost_component(
            "Speech to text batch",
            "S1 Speech to Text Batch",
            self.monthly_speech_to_text_standard_batch_hrs,
        ));

        components.extend(self.committable_cost_components(
            &CUSTOM_MODEL,
            &self.custom_model_commitment,
            self.monthly_speech_to_text_custom_hrs.is_some(),
            self.hourly_cost_component(
                "Speech to text custom model",
                "S1 Custom Speech To Text",
                self.monthly_speech_to_text_custom_hrs,
            ),
        ));
        components.extend([
            self.hourly_cost_component(
                "Speech to text custom model batch",
                "S1 Custom Speech to Text Batch",
                self.monthly_speech_to_text_custom_batch_hrs,
            ),
            self.s1_cost_component(
                "Speech to text custom endpoint hosting",
                "S1 Custom Speech Model Hosting Unit",
                HOURS,
                self.monthly_speech_to_text_custom_endpoint_hrs,
                Some(HOSTING_PRICE_UNIT),
            ),
            self.hourly_cost_component(
                "Speech to text custom training",
                "S1 Custom Speech Training",
                self.monthly_speech_to_text_custom_training_hrs,
            ),
        ]);

        components.extend(self.committable_cost_components(
            &ENHANCED_ADD_ONS,
            &self.enhanced_add_ons_commitment,
            self.monthly_speech_to_text_enhanced_add_ons_hrs.is_some(),
            self.hourly_cost_component(
                "Speech to text enhanced add-ons",
                "S1 Speech to Text Enhanced Feature Audio",
                self.monthly_speech_to_text_enhanced_add_ons_hrs,
            ),
        ));
        components.push(self.hourly_cost_component(
            "Speech to text conversation transcription multi-channel audio",
            "S1 Conversation Transcription Multichannel Audio",
            self.monthly_speech_to_text_conversation_transcription_multi_channel_audio_hrs,
        ));

        components.extend(self.committable_cost_components(
            &NEURAL_TEXT_TO_SPEECH,
            &self.neural_text_to_speech_commitment,
            self.monthly_text_to_speech_neural_chars.is_some(),
            self.s1_cost_component(
                "Text to speech neural",
                "S1 Neural Text To Speech Characters",
                CHARS,
                per(self.monthly_text_to_speech_neural_chars, 1_000_000),
                None,
            ),
        ));
        components.extend([
            self.hourly_cost_component(
                "Text to speech custom neural training",
                "S1 Custom Neural Training",
                self.monthly_text_to_speech_custom_neural_training_hrs,
            ),
            self.s1_cost_component(
                "Text to speech custom neural",
                "S1 Custom Neural Realtime Characters",
                CHARS,
                per(self.monthly_text_to_speech_custom_neural_chars, 1_000_000),
                None,
            ),
            self.s1_cost_component(
                "Text to speech custom neural endpoint hosting",
                "S1 Custom Neural Voice Model Hosting Unit",
                HOURS,
                self.monthly_text_to_speech_custom_neural_endpoint_hrs,
                Some(HOSTING_PRICE_UNIT),
            ),
            self.s1_cost_component(
                "Text to speech long audio",
                "S1 Neural Long Audio Characters",
                CHARS,
                per(self.monthly_text_to_speech_long_audio_chars, 1_000_000),
                None,
            ),
        ]);
        components.extend(self.personal_voice_cost_components());

        components.extend([
            self.hourly_cost_component(
                "Speech translation",
                "S1 Speech Translation",
                self.monthly_speech_translation_hrs,
            ),
            self.s1_cost_component(
                "Speaker verification",
                "S1 Speaker Verification Transactions",
                "1K transactions",
                per(self.monthly_speaker_verification_transactions, 1_000),
                None,
            ),
            self.s1_cost_component(
                "Speaker identification",
                "S1 Speaker Identification Transactions",
                "1K transactions",
                per(self.monthly_speaker_identification_transactions, 1_000),
                None,
            ),
            self.s1_cost_component(
                "Voice profiles",
                "S1 Voice Storage",
                "1K profiles",
                per(self.monthly_voice_profiles, 1_000),
                None,
            ),
        ]);

        components
    }
}

impl CoreResource for CognitiveAccountSpeech {
    fn core_type(&self) -> &'static str {
        "CognitiveAccountSpeech"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        let mut items: Vec<UsageItem> =
            HOUR_USAGE_KEYS.iter().map(|key| UsageItem::float(key)).collect();
        items.extend(COUNT_USAGE_KEYS.iter().map(|key| UsageItem::int(key)));
        for prefix in ["monthly_commitment", "monthly_connected_container_commitment"] {
            for (committed_key, overage_key) in COMMITMENT_USAGE_KEYS {
                items.push(UsageItem::int(&format!("{prefix}_{committed_key}")));
                let overage_key = format!("{prefix}_{overage_key}");
                if overage_key.ends_with("_hrs") {
                    items.push(UsageItem::float(&overage_key));
                } else {
                    items.push(UsageItem::int(&overage_key));
                }
            }
        }
        items
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        let hours = |key: &str| usage.get_decimal(key);
        let count = |key: &str| usage.get_i64(key);

        self.monthly_speech_to_text_standard_hrs = hours("monthly_speech_to_text_standard_hrs");
        self.monthly_speech_to_text_standard_batch_hrs =
            hours("monthly_speech_to_text_standard_batch_hrs");
        self.monthly_speech_to_text_custom_hrs = hours("monthly_speech_to_text_custom_hrs");
        self.monthly_speech_to_text_custom_batch_hrs =
            hours("monthly_speech_to_text_custom_batch_hrs");
        self.monthly_speech_to_text_custom_endpoint_hrs =
            hours("monthly_speech_to_text_custom_endpoint_hrs");
        self.monthly_speech_to_text_conversation_transcription_multi_channel_audio_hrs =
            hours("monthly_speech_to_text_conversation_transcription_multi_channel_audio_hrs");
        self.monthly_speech_to_text_custom_training_hrs =
            hours("monthly_speech_to_text_custom_training_hrs");
        self.monthly_speech_to_text_enhanced_add_ons_hrs =
            hours("monthly_speech_to_text_enhanced_add_ons_hrs");

        self.monthly_text_to_speech_neural_chars = count("monthly_text_to_speech_neural_chars");
        self.monthly_text_to_speech_custom_neural_training_hrs =
            hours("monthly_text_to_speech_custom_neural_training_hrs");
        self.monthly_text_to_speech_custom_neural_chars =
            count("monthly_text_to_speech_custom_neural_chars");
        self.monthly_text_to_speech_custom_neural_endpoint_hrs =
            hours("monthly_text_to_speech_custom_neural_endpoint_hrs");
        self.monthly_text_to_speech_long_audio_chars =
            count("monthly_text_to_speech_long_audio_chars");
        self.monthly_text_to_speech_personal_voice_profiles =
            count("monthly_text_to_speech_personal_voice_profiles");
        self.monthly_text_to_speech_personal_voice_chars =
            count("monthly_text_to_speech_personal_voice_chars");

        self.monthly_speech_translation_hrs = hours("monthly_speech_translation_hrs");
        self.monthly_speaker_verification_transactions =
            count("monthly_speaker_verification_transactions");
        self.monthly_speaker_identification_transactions =
            count("monthly_speaker_identification_transactions");
        self.monthly_voice_profiles = count("monthly_voice_profiles");

        self.speech_to_text_commitment =
            SpeechCommitmentUsage::from_usage(usage, SPEECH_TO_TEXT_KEYS);
        self.custom_model_commitment = SpeechCommitmentUsage::from_usage(usage, CUSTOM_MODEL_KEYS);
        self.enhanced_add_ons_commitment =
            SpeechCommitmentUsage::from_usage(usage, ENHANCED_ADD_ONS_KEYS);
        self.neural_text_to_speech_commitment =
            SpeechCommitmentUsage::from_usage(usage, NEURAL_CHARS_KEYS);
    }

    fn build_resource(&self) -> Option<Resource> {
        if let AccountSku::Free = account_sku(&self.address, &self.sku)? {
            return Some(free_resource(&self.address));
        }

        Some(Resource {
            name: self.address.clone(),
            cost_components: self.cost_components(),
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const ADDRESS: &str = "azurerm_cognitive_account.speech";

    fn speech(usage: serde_json::Value) -> CognitiveAccountSpeech {
        let mut account = CognitiveAccountSpeech {
            address: ADDRESS.to_string(),
            region: "eastus".to_string(),
            sku: "S0".to_string(),
            ..Default::default()
        };
        account.populate_usage(&UsageData::from_value(ADDRESS, &usage).unwrap());
        account
    }

    fn component<'a>(resource: &'a Resource, name: &str) -> &'a CostComponent {
        resource.cost_components.iter().find(|c| c.name == name).unwrap()
    }

    #[test]
    fn test_pay_as_you_go_components() {
        let resource = speech(serde_json::json!({
            "monthly_speech_to_text_standard_hrs": 12.5,
            "monthly_text_to_speech_neural_chars": 3_000_000,
            "monthly_speaker_verification_transactions": 4_000,
        }))
        .build_resource()
        .unwrap();

        assert_eq!(resource.cost_components.len(), 19);
        let stt = component(&resource, "Speech to text");
        assert_eq!(stt.monthly_quantity, Some(dec!(12.5)));
        assert_eq!(stt.price_filter.as_ref().unwrap().unit.as_deref(), Some("1 Hour"));
        assert_eq!(component(&resource, "Text to speech neural").monthly_quantity, Some(dec!(3)));
        assert_eq!(component(&resource, "Speaker verification").monthly_quantity, Some(dec!(4)));

        let hosting = component(&resource, "Speech to text custom endpoint hosting");
        assert_eq!(hosting.price_filter.as_ref().unwrap().unit.as_deref(), Some("1/Hour"));
    }

    #[test]
    fn test_hour_commitment_with_overage() {
        let resource = speech(serde_json::json!({
            "monthly_commitment_speech_to_text_standard_hrs": 2_000,
            "monthly_commitment_speech_to_text_standard_overage_hrs": 150.5,
        }))
        .build_resource()
        .unwrap();

        let names: Vec<&str> = resource.cost_components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names[..3],
            ["Speech to text (commitment)", "Speech to text (overage)", "Speech to text batch"]
        );

        let commitment = &resource.cost_components[0];
        assert_eq!(commitment.unit_multiplier, dec!(0.0005));
        let filters = &commitment.product_filter.as_ref().unwrap().attribute_filters;
        assert_eq!(
            filters[1],
            AttributeFilter::exact("skuName", "Commitment Tier Speech to Text Azure 2K")
        );
        assert_eq!(resource.cost_components[1].monthly_quantity, Some(dec!(150.5)));
    }

    #[test]
    fn test_connected_container_char_commitment() {
        let resource = speech(serde_json::json!({
            "monthly_connected_container_commitment_text_to_speech_neural_commitment_chars":
                400_000_000,
            "monthly_connected_container_commitment_text_to_speech_neural_overage_chars": 0,
        }))
        .build_resource()
        .unwrap();

        let commitment =
            component(&resource, "Text to speech neural (connected container commitment)");
        assert_eq!(commitment.unit_multiplier, dec!(0.0025));
        let filters = &commitment.product_filter.as_ref().unwrap().attribute_filters;
        assert_eq!(
            filters[1],
            AttributeFilter::exact("skuName", "Commit Tier Neural TTS Connected 400M")
        );

        assert!(!resource.cost_components.iter().any(|c| c.name == "Text to speech neural"));
        assert!(!resource.cost_components.iter().any(|c| c.name.contains("overage")));
    }

    #[test]
    fn test_invalid_commitment_drops_feature() {
        let usage = serde_json::json!({"monthly_commitment_speech_to_text_custom_hrs": 3_000});
        let resource = speech(usage).build_resource().unwrap();
        let names: Vec<&str> = resource.cost_components.iter().map(|c| c.name.as_str()).collect();
        assert!(!names.iter().any(|name| name.starts_with("Speech to text custom model (")));
        assert!(!names.contains(&"Speech to text custom model"));
    }

    #[test]
    fn test_usage_schema_covers_commitment_keys() {
        let keys: Vec<String> =
            speech(serde_json::json!({})).usage_schema().into_iter().map(|i| i.key).collect();
        assert_eq!(keys.len(), 35);
        assert!(
            keys.contains(&"monthly_commitment_speech_to_text_standard_overage_hrs".to_string())
        );
        assert!(keys.contains(
            &"monthly_connected_container_commitment_text_to_speech_neural_overage_chars"
                .to_string()
        ));
    }
}
