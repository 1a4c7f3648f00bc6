use rust_decimal::Decimal;
use tracing::warn;

use super::cognitive::{PRODUCT_FAMILY, SERVICE, free_resource, per};
use super::util::product_filter;
use crate::schema::{AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem};

const PRODUCT_NAME: &str = "Azure OpenAI";
const TOKENS: &str = "1K tokens";

/// Catalog SKU names of one language model version, per deployment type.
/// Empty names are not offered for that deployment type.
#[derive(Debug, Clone, Copy)]
struct LanguageModel {
    model: &'static str,
    version: &'static str,
    is_default_version: bool,

    input_global: &'static str,
    output_global: &'static str,
    input_regional: &'static str,
    output_regional: &'static str,
    input_data_zone: &'static str,
    output_data_zone: &'static str,

    batch_input_global: &'static str,
    batch_output_global: &'static str,
    batch_input_data_zone: &'static str,
    batch_output_data_zone: &'static str,

    cached_input_global: &'static str,
    cached_input_regional: &'static str,
    cached_input_data_zone: &'static str,

    audio_input_global: &'static str,
    audio_output_global: &'static str,
    audio_input_regional: &'static str,
    audio_output_regional: &'static str,
    audio_input_data_zone: &'static str,
    audio_output_data_zone: &'static str,
}

/// SKU names used by one deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DeploymentSkus {
    input: &'static str,
    output: &'static str,
    cached_input: &'static str,
    audio_input: &'static str,
    audio_output: &'static str,
}

impl LanguageModel {
    const EMPTY: Self = Self {
        model: "",
        version: "",
        is_default_version: false,
        input_global: "",
        output_global: "",
        input_regional: "",
        output_regional: "",
        input_data_zone: "",
        output_data_zone: "",
        batch_input_global: "",
        batch_output_global: "",
        batch_input_data_zone: "",
        batch_output_data_zone: "",
        cached_input_global: "",
        cached_input_regional: "",
        cached_input_data_zone: "",
        audio_input_global: "",
        audio_output_global: "",
        audio_input_regional: "",
        audio_output_regional: "",
        audio_input_data_zone: "",
        audio_output_data_zone: "",
    };

    /// Deployment SKU names such as `Standard`, `GlobalStandard`,
    /// `DataZoneStandard`, `DataZoneBatch` or `GlobalBatch`; anything else is
    /// priced as global standard
    fn deployment_skus(&self, deployment_sku: &str) -> DeploymentSkus {
        let global = DeploymentSkus {
            input: self.input_global,
            output: self.output_global,
            cached_input: self.cached_input_global,
            audio_input: self.audio_input_global,
            audio_output: self.audio_output_global,
        };
        let data_zone = DeploymentSkus {
            input: self.input_data_zone,
            output: self.output_data_zone,
            cached_input: self.cached_input_data_zone,
            audio_input: self.audio_input_data_zone,
            audio_output: self.audio_output_data_zone,
        };

        match deployment_sku.replace('_', "").to_lowercase().as_str() {
            "standard" => DeploymentSkus {
                input: self.input_regional,
                output: self.output_regional,
                cached_input: self.cached_input_regional,
                audio_input: self.audio_input_regional,
                audio_output: self.audio_output_regional,
            },
            "datazonestandard" => data_zone,
            "datazonebatch" => DeploymentSkus {
                input: self.batch_input_data_zone,
                output: self.batch_output_data_zone,
                ..data_zone
            },
            "globalbatch" => DeploymentSkus {
                input: self.batch_input_global,
                output: self.batch_output_global,
                ..global
            },
            _ => global,
        }
    }
}

/// The requested version, or the model's default when none is given.
/// A model with a single version defaults to it.
fn language_model(model: &str, version: &str) -> Option<&'static LanguageModel> {
    let mut versions = LANGUAGE_MODELS.iter().filter(|m| m.model == model).peekable();
    versions.peek()?;

    if !version.is_empty() {
        return versions.find(|m| m.version == version);
    }

    let versions: Vec<_> = versions.collect();
    match versions.as_slice() {
        [only] => Some(*only),
        _ => versions.into_iter().find(|m| m.is_default_version),
    }
}

fn is_language_model(model: &str) -> bool {
    LANGUAGE_MODELS.iter().any(|m| m.model == model)
}

/// Models with audio token pricing in any version
fn is_audio_model(model: &str) -> bool {
    LANGUAGE_MODELS
        .iter()
        .any(|m| m.model == model && !m.audio_input_global.is_empty())
}

fn base_model_sku(model: &str) -> Option<&'static str> {
    match model {
        "babbage-002" => Some("Babbage"),
        "davinci-002" => Some("Davinci"),
        _ => None,
    }
}

fn fine_tuning_sku(model: &str) -> Option<&'static str> {
    match model {
        "babbage-002" => Some("Az-Babbage-002"),
        "davinci-002" => Some("Az-Davinci-002"),
        "gpt-35-turbo" => Some("Az-GPT35-Turbo-4K"),
        "gpt-35-turbo-16k" => Some("Az-GPT35-Turbo-16K"),
        _ => None,
    }
}

fn image_sku(model: &str) -> Option<&'static str> {
    match model {
        "dall-e-2" => Some("Az-Image-DALL-E"),
        "dall-e-3" => Some("Az-Image-Dall-E-3"),
        _ => None,
    }
}

fn embedding_sku(model: &str) -> Option<&'static str> {
    match model {
        "text-embedding-ada-002" => Some("Az-Embeddings-Ada"),
        "text-embedding-3-small" => Some("Az-Text-Embedding-3-Small"),
        "text-embedding-3-large" => Some("Az-Text-Embedding-3-Large"),
        _ => None,
    }
}

fn speech_sku(model: &str) -> Option<&'static str> {
    match model {
        "whisper" => Some("Az-Speech-Whisper"),
        "tts" => Some("Az-Speech-Text to Speech"),
        "tts-hd" => Some("Az-Speech-Text to Speech HD"),
        _ => None,
    }
}

/// Azure OpenAI model deployment. Components without a catalog price are
/// dropped, since not every model is offered in every deployment type.
#[derive(Debug, Clone, Default)]
pub struct CognitiveDeployment {
    pub address: String,
    pub region: String,
    pub model: String,
    /// Empty means the model's default version
    pub version: String,
    pub tier: String,
    /// Deployment SKU, e.g. `Standard`, `GlobalBatch` or `ProvisionedManaged`
    pub sku: String,
    pub capacity: i64,

    pub monthly_language_input_tokens: Option<i64>,
    pub monthly_language_output_tokens: Option<i64>,
    pub monthly_language_cached_input_tokens: Option<i64>,
    pub monthly_code_interpreter_sessions: Option<i64>,
    pub monthly_base_model_tokens: Option<i64>,
    pub monthly_fine_tuning_training_hours: Option<Decimal>,
    pub monthly_fine_tuning_hosting_hours: Option<Decimal>,
    pub monthly_fine_tuning_input_tokens: Option<i64>,
    pub monthly_fine_tuning_output_tokens: Option<i64>,
    pub monthly_standard_1024_1024_images: Option<i64>,
    pub monthly_standard_1024_1792_images: Option<i64>,
    pub monthly_hd_1024_1024_images: Option<i64>,
    pub monthly_hd_1024_1792_images: Option<i64>,
    pub monthly_text_embedding_tokens: Option<i64>,
    pub monthly_text_to_speech_characters: Option<i64>,
    pub monthly_text_to_speech_hours: Option<Decimal>,
    pub monthly_audio_input_tokens: Option<i64>,
    pub monthly_audio_output_tokens: Option<i64>,
    pub monthly_file_search_tool_calls: Option<i64>,
    pub monthly_file_search_storage_gb: Option<Decimal>,
}

impl CognitiveDeployment {
    fn openai_cost_component(
        &self,
        name: String,
        unit: &str,
        quantity: Option<Decimal>,
        sku_name: &str,
        meter: Option<String>,
    ) -> CostComponent {
        let mut attribute_filters = vec![
            AttributeFilter::exact("productName", PRODUCT_NAME),
            AttributeFilter::exact("skuName", sku_name),
        ];
        attribute_filters.extend(meter.map(|meter| AttributeFilter::exact("meterName", meter)));

        CostComponent {
            name,
            unit: unit.to_string(),
            monthly_quantity: quantity,
            product_filter: product_filter(
                &self.region,
                SERVICE,
                PRODUCT_FAMILY,
                attribute_filters,
            ),
            ignore_if_missing_price: true,
            ..Default::default()
        }
    }

    fn language_cost_components(&self) -> Vec<CostComponent> {
        let model = &self.model;

        if self.sku.to_lowercase().contains("provisioned") {
            let sku_name = if self.sku.eq_ignore_ascii_case("DataZoneProvisionedManaged") {
                "Provisioned Managed Data Zone"
            } else if self.sku.eq_ignore_ascii_case("ProvisionedManaged") {
                "Provisioned Managed Regional"
            } else {
                "Provisioned Managed Global"
            };
            return vec![CostComponent {
                hourly_quantity: Some(Decimal::from(self.capacity)),
                ..self.openai_cost_component(
                    format!("Provisioned throughput units ({model})"),
                    "hours",
                    None,
                    sku_name,
                    None,
                )
            }];
        }

        let Some(language_model) = language_model(model, &self.version) else {
            warn!(
                address = %self.address,
                model = %model,
                version = %self.version,
                "Unknown model version"
            );
            return Vec::new();
        };
        let skus = language_model.deployment_skus(&self.sku);

        vec![
            self.openai_cost_component(
                format!("Text input ({model})"),
                TOKENS,
                per(self.monthly_language_input_tokens, 1_000),
                skus.input,
                None,
            ),
            self.openai_cost_component(
                format!("Text output ({model})"),
                TOKENS,
                per(self.monthly_language_output_tokens, 1_000),
                skus.output,
                None,
            ),
            self.openai_cost_component(
                format!("Cached text input ({model})"),
                TOKENS,
                per(self.monthly_language_cached_input_tokens, 1_000),
                skus.cached_input,
                None,
            ),
        ]
    }

    fn audio_cost_components(&self) -> Vec<CostComponent> {
        let model = &self.model;
        let Some(language_model) = language_model(model, &self.version) else {
            return Vec::new();
        };
        let skus = language_model.deployment_skus(&self.sku);

        vec![
            self.openai_cost_component(
                format!("Audio input tokens ({model})"),
                "1k tokens",
                per(self.monthly_audio_input_tokens, 1_000),
                skus.audio_input,
                None,
            ),
            self.openai_cost_component(
                format!("Audio output tokens ({model})"),
                "1k tokens",
                per(self.monthly_audio_output_tokens, 1_000),
                skus.audio_output,
                None,
            ),
        ]
    }

    fn tool_cost_components(&self) -> Vec<CostComponent> {
        vec![
            self.openai_cost_component(
                "File search tool calls".to_string(),
                "1k calls",
                per(self.monthly_file_search_tool_calls, 1_000),
                "file-search-tool-calls-glbl",
                None,
            ),
            self.openai_cost_component(
                "File search vector storage".to_string(),
                "GB",
                self.monthly_file_search_storage_gb,
                "Assistants-File Search-glbl",
                None,
            ),
            self.openai_cost_component(
                "Code interpreter sessions".to_string(),
                "sessions",
                self.monthly_code_interpreter_sessions.map(Decimal::from),
                "Az-Assistants-Code-Interpreter",
                Some("Az-Assistants-Code-Interpreter Session".to_string()),
            ),
        ]
    }

    fn base_model_cost_component(&self, sku: &str) -> CostComponent {
        self.openai_cost_component(
            format!("Base model tokens ({})", self.model),
            TOKENS,
            per(self.monthly_base_model_tokens, 1_000),
            &format!("{sku} - Base"),
            Some(format!("Text-{sku} Unit")),
        )
    }

    fn fine_tuning_cost_components(&self, sku: &str) -> Vec<CostComponent> {
        let model = &self.model;
        let fine_tuned = format!("{sku}-FTuned");
        let input = format!("{sku}-Fine Tuned-Input");
        let output = format!("{sku}-Fine Tuned-Output");

        vec![
            self.openai_cost_component(
                format!("Fine tuning training ({model})"),
                "hours",
                self.monthly_fine_tuning_training_hours,
                &fine_tuned,
                Some(format!("{fine_tuned} Training Unit")),
            ),
            self.openai_cost_component(
                format!("Fine tuning hosting ({model})"),
                "hours",
                self.monthly_fine_tuning_hosting_hours,
                &fine_tuned,
                Some(format!("{fine_tuned} Deployment Hosting Unit")),
            ),
            self.openai_cost_component(
                format!("Fine tuning input ({model})"),
                TOKENS,
                per(self.monthly_fine_tuning_input_tokens, 1_000),
                &input,
                Some(format!("{input} Tokens")),
            ),
            self.openai_cost_component(
                format!("Fine tuning output ({model})"),
                TOKENS,
                per(self.monthly_fine_tuning_output_tokens, 1_000),
                &output,
                Some(format!("{output} Tokens")),
            ),
        ]
    }

    /// DALL-E 2 only offers standard square images
    fn image_cost_components(&self, sku: &str) -> Vec<CostComponent> {
        let model = &self.model;
        if model == "dall-e-2" {
            return vec![self.openai_cost_component(
                format!("Standard 1024x1024 images ({model})"),
                "100 images",
                per(self.monthly_standard_1024_1024_images, 100),
                sku,
                Some(format!("{sku} Images")),
            )];
        }

        [
            ("Standard 1024x1024", "Standard LowRes", self.monthly_standard_1024_1024_images),
            ("Standard 1024x1792", "Standard HighRes", self.monthly_standard_1024_1792_images),
            ("HD 1024x1024", "HD LowRes", self.monthly_hd_1024_1024_images),
            ("HD 1024x1792", "HD HighRes", self.monthly_hd_1024_1792_images),
        ]
        .into_iter()
        .map(|(size, quality, images)| {
            let sku_name = format!("{sku} {quality}");
            self.openai_cost_component(
                format!("{size} images ({model})"),
                "100 images",
                per(images, 100),
                &sku_name,
                Some(format!("{sku_name} Images")),
            )
        })
        .collect()
    }

    fn embedding_cost_component(&self, sku: &str) -> CostComponent {
        self.openai_cost_component(
            format!("Text embeddings ({})", self.model),
            TOKENS,
            per(self.monthly_text_embedding_tokens, 1_000),
            sku,
            Some(format!("{sku} Tokens")),
        )
    }

    /// Whisper is billed per audio hour, the TTS models per character
    fn speech_cost_component(&self, sku: &str) -> CostComponent {
        let name = format!("Text to speech ({})", self.model);
        if self.model == "whisper" {
            self.openai_cost_component(
                name,
                "hours",
                self.monthly_text_to_speech_hours,
                sku,
                Some(format!("{sku} Speech to Text Batch")),
            )
        } else {
            self.openai_cost_component(
                name,
                "1M characters",
                per(self.monthly_text_to_speech_characters, 1_000_000),
                sku,
                Some(format!("{sku} Characters")),
            )
        }
    }
}

impl CoreResource for CognitiveDeployment {
    fn core_type(&self) -> &'static str {
        "CognitiveDeployment"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::int("monthly_language_input_tokens"),
            UsageItem::int("monthly_language_output_tokens"),
            UsageItem::int("monthly_language_cached_input_tokens"),
            UsageItem::int("monthly_code_interpreter_sessions"),
            UsageItem::int("monthly_base_model_tokens"),
            UsageItem::float("monthly_fine_tuning_training_hours"),
            UsageItem::float("monthly_fine_tuning_hosting_hours"),
            UsageItem::int("monthly_fine_tuning_input_tokens"),
            UsageItem::int("monthly_fine_tuning_output_tokens"),
            UsageItem::int("monthly_standard_1024_1024_images"),
            UsageItem::int("monthly_standard_1024_1792_images"),
            UsageItem::int("monthly_hd_1024_1024_images"),
            UsageItem::int("monthly_hd_1024_1792_images"),
            UsageItem::int("monthly_text_embedding_tokens"),
            UsageItem::int("monthly_text_to_speech_characters"),
            UsageItem::float("monthly_text_to_speech_hours"),
            UsageItem::int("monthly_audio_input_tokens"),
            UsageItem::int("monthly_audio_output_tokens"),
            UsageItem::int("monthly_file_search_tool_calls"),
            UsageItem::float("monthly_file_search_storage_gb"),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_language_input_tokens = usage.get_i64("monthly_language_input_tokens");
        self.monthly_language_output_tokens = usage.get_i64("monthly_language_output_tokens");
        self.monthly_language_cached_input_tokens =
            usage.get_i64("monthly_language_cached_input_tokens");
        self.monthly_code_interpreter_sessions = usage.get_i64("monthly_code_interpreter_sessions");
        self.monthly_base_model_tokens = usage.get_i64("monthly_base_model_tokens");
        self.monthly_fine_tuning_training_hours =
            usage.get_decimal("monthly_fine_tuning_training_hours");
        self.monthly_fine_tuning_hosting_hours =
            usage.get_decimal("monthly_fine_tuning_hosting_hours");
        self.monthly_fine_tuning_input_tokens = usage.get_i64("monthly_fine_tuning_input_tokens");
        self.monthly_fine_tuning_output_tokens = usage.get_i64("monthly_fine_tuning_output_tokens");
        self.monthly_standard_1024_1024_images = usage.get_i64("monthly_standard_1024_1024_images");
        self.monthly_standard_1024_1792_images = usage.get_i64("monthly_standard_1024_1792_images");
        self.monthly_hd_1024_1024_images = usage.get_i64("monthly_hd_1024_1024_images");
        self.monthly_hd_1024_1792_images = usage.get_i64("monthly_hd_1024_1792_images");
        self.monthly_text_embedding_tokens = usage.get_i64("monthly_text_embedding_tokens");
        self.monthly_text_to_speech_characters = usage.get_i64("monthly_text_to_speech_characters");
        self.monthly_text_to_speech_hours = usage.get_decimal("monthly_text_to_speech_hours");
        self.monthly_audio_input_tokens = usage.get_i64("monthly_audio_input_tokens");
        self.monthly_audio_output_tokens = usage.get_i64("monthly_audio_output_tokens");
        self.monthly_file_search_tool_calls = usage.get_i64("monthly_file_search_tool_calls");
        self.monthly_file_search_storage_gb = usage.get_decimal("monthly_file_search_storage_gb");
    }

    fn build_resource(&self) -> Option<Resource> {
        if self.tier.eq_ignore_ascii_case("free") {
            return Some(free_resource(&self.address));
        }

        let model = self.model.as_str();
        let mut cost_components = Vec::new();

        if is_language_model(model) {
            cost_components.extend(self.language_cost_components());
            cost_components.extend(self.tool_cost_components());
        }
        if is_audio_model(model) {
            cost_components.extend(self.audio_cost_components());
        }
        if let Some(sku) = base_model_sku(model) {
            cost_components.push(self.base_model_cost_component(sku));
        }
        if let Some(sku) = fine_tuning_sku(model) {
            cost_components.extend(self.fine_tuning_cost_components(sku));
        }
        if let Some(sku) = image_sku(model) {
            cost_components.extend(self.image_cost_components(sku));
        }
        if let Some(sku) = embedding_sku(model) {
            cost_components.push(self.embedding_cost_component(sku));
        }
        if let Some(sku) = speech_sku(model) {
            cost_components.push(self.speech_cost_component(sku));
        }

        if cost_components.is_empty() {
            warn!(address = %self.address, model = %model, "Model is not supported");
            return None;
        }

        Some(Resource {
            name: self.address.clone(),
            cost_components,
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}

static LANGUAGE_MODELS: &[LanguageModel] = &[
    LanguageModel {
        model: "gpt-4.5-preview",
        version: "2025-02-27",
        is_default_version: true,
        input_data_zone: "gpt 4.5 0227 Inp DZone",
        output_data_zone: "gpt 4.5 0227 Outp DZone",
        batch_input_data_zone: "gpt 4.5 0227 Batch Inp DZone",
        batch_output_data_zone: "gpt 4.5 0227 Batch Outp DZone",
        input_global: "gpt 4.5 0227 Inp glbl",
        output_global: "gpt 4.5 0227 Outp glbl",
        batch_input_global: "gpt 4.5 0227 Batch Inp glbl",
        batch_output_global: "gpt 4.5 0227 Batch Outp glbl",
        input_regional: "gpt 4.5 0227 Inp regnl",
        output_regional: "gpt 4.5 0227 Outp regnl",
        cached_input_global: "gpt 4.5 0227 cached Inp glbl",
        cached_input_regional: "gpt 4.5 0227 cached Inp regnl",
        cached_input_data_zone: "gpt 4.5 0227 cached Inp DZone",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "gpt-35-turbo",
        version: "0301",
        input_global: "gpt-35-turbo4K-Inp-glbl",
        output_global: "gpt-35-turbo4K-Outp-glbl",
        input_regional: "gpt-35-turbo-4k-Input-regional",
        output_regional: "gpt-35-turbo-4k-Output-regional",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "gpt-35-turbo",
        version: "0613",
        input_global: "gpt-35-turbo4K-Inp-glbl",
        output_global: "gpt-35-turbo4K-Outp-glbl",
        input_regional: "gpt-35-turbo-4k-Input-regional",
        output_regional: "gpt-35-turbo-4k-Output-regional",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "gpt-35-turbo",
        version: "1106",
        input_global: "gpt-35-turbo4K-Inp-glbl",
        output_global: "gpt-35-turbo4K-Outp-glbl",
        input_regional: "gpt-35-turbo-4k-Input-regional",
        output_regional: "gpt-35-turbo-4k-Output-regional",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "gpt-35-turbo",
        version: "0125",
        is_default_version: true,
        input_global: "gpt-35-turbo4K-Inp-glbl",
        output_global: "gpt-35-turbo4K-Outp-glbl",
        input_regional: "gpt-35-turbo-4k-Input-regional",
        output_regional: "gpt-35-turbo-4k-Output-regional",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "gpt-35-turbo-16k",
        version: "0613",
        is_default_version: true,
        input_global: "gpt-35-turbo16K-Inp-glbl",
        output_global: "gpt-35-turbo16K-Outp-glbl",
        input_regional: "gpt-35-turbo-16k-Input-regional",
        output_regional: "gpt-35-turbo-16k-Output-regional",
        batch_input_global: "gpt-35-turbo16K-Batch-Inp-glbl",
        batch_output_global: "gpt-35-turbo16K-Batch-Outp-glbl",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "gpt-4",
        version: "0125-Preview",
        input_global: "gpt-4-8K-Inp-glbl",
        output_global: "gpt-4-8K-Outp-glbl",
        input_regional: "gpt-4-8K-Input-regional",
        output_regional: "gpt-4-8K-Output-regional",
        batch_input_global: "gpt-4-8K-Batch-Inp-glbl",
        batch_output_global: "gpt-4-8K-Batch-Outp-glbl",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "gpt-4",
        version: "1106-Preview",
        input_global: "gpt-4-8K-Inp-glbl",
        output_global: "gpt-4-8K-Outp-glbl",
        input_regional: "gpt-4-8K-Input-regional",
        output_regional: "gpt-4-8K-Output-regional",
        batch_input_global: "gpt-4-8K-Batch-Inp-glbl",
        batch_output_global: "gpt-4-8K-Batch-Outp-glbl",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "gpt-4",
        version: "0613",
        is_default_version: true,
        input_global: "gpt-4-8K-Inp-glbl",
        output_global: "gpt-4-8K-Outp-glbl",
        input_regional: "gpt-4-8K-Input-regional",
        output_regional: "gpt-4-8K-Output-regional",
        batch_input_global: "gpt-4-8K-Batch-Inp-glbl",
        batch_output_global: "gpt-4-8K-Batch-Outp-glbl",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "gpt-4",
        version: "turbo-2024-04-09",
        input_global: "gpt-4-turbo128K Inp-glbl",
        output_global: "gpt-4-turbo128K Outp-glbl",
        input_regional: "gpt-4-turbo-128K Input-regional",
        output_regional: "gpt-4-turbo-128K Output-regional",
        batch_input_global: "gpt-4-Turbo-Batch-128K Inp-glbl",
        batch_output_global: "gpt-4-Turbo-Batch-128K Outp-glbl",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "gpt-4-32k",
        version: "0613",
        is_default_version: true,
        input_global: "gpt-4-32K-Inp-glbl",
        output_global: "gpt-4-32K-Outp-glbl",
        input_regional: "gpt-4-32K-Input-regional",
        output_regional: "gpt-4-32K-Output-regional",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "gpt-4o",
        version: "2024-05-13",
        is_default_version: true,
        input_global: "gpt 4o 0513 Input global",
        output_global: "gpt 4o 0513 Output global",
        input_regional: "gpt 4o 0513 Input regional",
        output_regional: "gpt 4o 0513 Output regional",
        input_data_zone: "gpt 4o 0513 Input Data Zone",
        output_data_zone: "gpt 4o 0513 Output Data Zone",
        batch_input_global: "gpt 4o 0513 Batch Inp glbl",
        batch_output_global: "gpt 4o 0513 Batch Outp glbl",
        batch_input_data_zone: "gpt 4o 0513 Batch Inp Data Zone",
        batch_output_data_zone: "gpt 4o 0513 Batch Outp Data Zone",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "gpt-4o",
        version: "2024-08-06",
        input_global: "gpt-4o-0806-Inp-glbl",
        output_global: "gpt-4o-0806-Outp-glbl",
        cached_input_global: "gpt 4o 0806 cached Inp glbl",
        input_regional: "gpt-4o-0806-Inp-regnl",
        output_regional: "gpt-4o-0806-Outp-regnl",
        cached_input_regional: "gpt 4o 0806 cached Inp regnl",
        input_data_zone: "gpt 4o 0806 Inp Data Zone",
        output_data_zone: "gpt 4o 0806 Outp Data Zone",
        cached_input_data_zone: "gpt 4o 0806 cached Inp Data Zone",
        batch_input_global: "gpt-4o-0806-Batch-Inp-glbl",
        batch_output_global: "gpt-4o-0806-Batch-Outp-glbl",
        batch_input_data_zone: "gpt 4o 0806 Batch Inp Data Zone",
        batch_output_data_zone: "gpt 4o 0806 Batch Outp Data Zone",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "gpt-4o",
        version: "2024-11-20",
        input_global: "gpt 4o 1120 Inp glbl",
        output_global: "gpt 4o 1120 Outp glbl",
        cached_input_global: "gpt 4o 1120 cached Inp glbl",
        input_regional: "gpt 4o 1120 Inp regnl",
        output_regional: "gpt 4o 1120 Outp regnl",
        cached_input_regional: "gpt 4o 1120 cached Inp regnl",
        input_data_zone: "gpt 4o 1120 Inp Data Zone",
        output_data_zone: "gpt 4o 1120 Outp Data Zone",
        cached_input_data_zone: "gpt 4o 1120 cached Inp Data Zone",
        batch_input_global: "gpt 4o 1120 Batch Inp glbl",
        batch_output_global: "gpt 4o 1120 Batch Outp glbl",
        batch_input_data_zone: "gpt 4o 1120 Batch Inp Data Zone",
        batch_output_data_zone: "gpt 4o 1120 Batch Outp Data Zone",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "gpt-4o-mini",
        version: "2024-07-18",
        is_default_version: true,
        input_global: "gpt-4o-mini-0718-Inp-glbl",
        output_global: "gpt-4o-mini-0718-Outp-glbl",
        cached_input_global: "gpt 4o mini 0718 cached Inp glbl",
        input_regional: "gpt-4o-mini-0718-Inp-regnl",
        output_regional: "gpt-4o-mini-0718-Outp-regnl",
        cached_input_regional: "gpt 4o mini 0718 cached Inp regnl",
        input_data_zone: "gpt 4o mini 0718 Inp Data Zone",
        output_data_zone: "gpt 4o mini 0718 Outp Data Zone",
        cached_input_data_zone: "gpt 4o mini 0718 cached Inp Data Zone",
        batch_input_global: "gpt-4o-mini-0718-Batch-Inp-glbl",
        batch_output_global: "gpt-4o-mini-0718-Batch-Outp-glbl",
        batch_input_data_zone: "gpt 4o mini 0718 Batch Inp Data Zone",
        batch_output_data_zone: "gpt 4o mini0718 BatchOutp DataZone",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "gpt-4o-audio-preview",
        version: "2024-12-17",
        input_global: "gpt-4o-aud-1217-txt Inp glbl",
        output_global: "gpt-4o-aud-1217-txt Outp glbl",
        input_regional: "gpt-4o-aud-1217-txt Inp regnl",
        output_regional: "gpt-4o-aud-1217-txt Outp regnl",
        input_data_zone: "gpt-4o-aud-1217-txt Inp DZone",
        output_data_zone: "gpt-4o-aud-1217-txt Outp DZone",
        audio_input_global: "gpt-4o-aud-1217 Inp glbl",
        audio_output_global: "gpt-4o-aud-1217 Outp glbl",
        audio_input_regional: "gpt-4o-aud-1217 Inp regnl",
        audio_output_regional: "gpt-4o-aud-1217 Outp regnl",
        audio_input_data_zone: "gpt-4o-aud-1217 Inp DZone",
        audio_output_data_zone: "gpt-4o-aud-1217 Outp DZone",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "gpt-4o-mini-audio-preview",
        version: "2024-12-17",
        input_global: "gpt4omini-aud1217-txt Inp glbl",
        output_global: "gpt4omini-aud1217-txt Outp glbl",
        input_regional: "gpt4omini-aud1217-txt Inp regnl",
        output_regional: "gpt4omini-aud1217-txt Outp regnl",
        input_data_zone: "gpt4omini-aud1217-txt Inp DZone",
        output_data_zone: "gpt4omini-aud1217-txt Outp DZone",
        audio_input_global: "gpt4omini-aud1217 Inp glbl",
        audio_output_global: "gpt4omini-aud1217 Outp glbl",
        audio_input_regional: "gpt4omini-aud1217 Inp regnl",
        audio_output_regional: "gpt4omini-aud1217 Outp regnl",
        audio_input_data_zone: "gpt4omini-aud1217 Inp DZone",
        audio_output_data_zone: "gpt4omini-aud1217 Outp DZone",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "gpt-4o-realtime-preview",
        version: "2024-12-17",
        input_global: "gpt-4o-rt-txt-1217 Inp glbl",
        output_global: "gpt-4o-rt-txt-1217 Outp glbl",
        cached_input_global: "gpt-4o-rt-txt-1217 cchd Inp glbl",
        input_regional: "gpt-4o-rt-txt-1217 Inp regnl",
        output_regional: "gpt-4o-rt-txt-1217 Outp regnl",
        cached_input_regional: "gpt-4o-rt-txt-1217 cchd Inp rgnl",
        input_data_zone: "gpt-4o-rt-txt-1217 Inp DZone",
        output_data_zone: "gpt-4o-rt-txt-1217 Outp DZone",
        cached_input_data_zone: "gpt-4o-rt-txt-1217 cchd Inp DZn",
        audio_input_global: "gpt-4o-rt-aud-1217 Inp glbl",
        audio_output_global: "gpt-4o-rt-aud-1217 Outp glbl",
        audio_input_regional: "gpt-4o-rt-aud-1217 Inp regnl",
        audio_output_regional: "gpt-4o-rt-aud-1217 Outp regnl",
        audio_input_data_zone: "gpt-4o-rt-aud-1217 Inp DZone",
        audio_output_data_zone: "gpt-4o-rt-aud-1217 Outp DZone",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "gpt-4o-realtime-preview",
        version: "2024-10-01",
        input_global: "gpt4o realtime prvw text inp glbl",
        output_global: "gpt4o realtime prvw text outp glbl",
        cached_input_global: "gpt4o realtime cached text inp glbl",
        input_regional: "gpt4o realtime prvw text inp regn",
        output_regional: "gpt4o realtime prvw text outp regn",
        input_data_zone: "gpt4o realtimePrvwTxtInp DataZone",
        output_data_zone: "gpt4o realtimePrvwTxtOutp DataZone",
        audio_input_global: "gpt4o realtimePrvw audio inp glbl",
        audio_output_global: "gpt4o realtimePrvw audio outp glbl",
        audio_input_regional: "gpt4o realtimePrvw audio inp regn",
        audio_output_regional: "gpt4o realtimePrvw audio outp regn",
        audio_input_data_zone: "gpt4o realtimePrvwAudInp DataZone",
        audio_output_data_zone: "gpt4o realtimePrvwAudOutp DataZone",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "gpt-4o-mini-realtime-preview",
        version: "2024-12-17",
        input_global: "gpt4omini-rt-txt1217 Inp glbl",
        output_global: "gpt4omini-rt-txt1217 Outp glbl",
        cached_input_global: "gpt4omini-rt-txt1217 cchd Inp glbl",
        input_regional: "gpt4omini-rt-txt1217 Inp regnl",
        output_regional: "gpt4omini-rt-txt1217 Outp regnl",
        cached_input_regional: "gpt4omini-rt-txt1217 cchd Inp rgnl",
        input_data_zone: "gpt4omini-rt-txt1217 Inp DZone",
        output_data_zone: "gpt4omini-rt-txt1217 Outp DZone",
        cached_input_data_zone: "gpt4omini-rt-txt1217 cchd Inp DZn",
        audio_input_global: "gpt4omini-rt-aud1217 Inp glbl",
        audio_output_global: "gpt4omini-rt-aud1217 Outp glbl",
        audio_input_regional: "gpt4omini-rt-aud1217 Inp regnl",
        audio_output_regional: "gpt4omini-rt-aud1217 Outp regnl",
        audio_input_data_zone: "gpt4omini-rt-aud1217 Inp DZone",
        audio_output_data_zone: "gpt4omini-rt-aud1217 Outp DZone",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "computer-use-preview",
        version: "global",
        is_default_version: true,
        input_global: "computer-use-inpt-glbl",
        output_global: "computer-use-outp-glbl",
        input_regional: "computer-use-inpt-rgnl",
        output_regional: "computer-use-outp-rgnl",
        input_data_zone: "computer-use-inpt-datazone",
        output_data_zone: "computer-use-outp-datazone",
        batch_input_global: "computer-use-batch-inpt-glbl",
        batch_output_global: "computer-use-batch-outp-glbl",
        batch_input_data_zone: "computer-use-batch-inpt-datazone",
        batch_output_data_zone: "computer-use-batch-outp-datazone",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "o1-mini",
        version: "2024-09-12",
        input_global: "o1 mini input glbl",
        output_global: "o1 mini output glbl",
        input_regional: "o1 mini input regnl",
        output_regional: "o1 mini output regnl",
        cached_input_global: "o1 mini cached input glbl",
        cached_input_regional: "o1 mini cached input regnl",
        cached_input_data_zone: "o1 mini cached input Data Zone",
        input_data_zone: "o1 mini input Data Zone",
        output_data_zone: "o1 mini output Data Zone",
        batch_input_global: "o1 mini Batch Inp glbl",
        batch_output_global: "o1 mini Batch Outp glbl",
        batch_input_data_zone: "o1 mini Batch Inp Data Zone",
        batch_output_data_zone: "o1 mini Batch Outp Data Zone",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "o1",
        version: "2024-12-17",
        input_global: "o1 1217 Inp glbl",
        output_global: "o1 1217 Outp glbl",
        cached_input_global: "o1 1217 cached Inp glbl",
        input_regional: "o1 1217 Inp regnl",
        output_regional: "o1 1217 Outp regnl",
        cached_input_regional: "o1 1217 cached Inp regnl",
        input_data_zone: "o1 1217 Inp Data Zone",
        output_data_zone: "o1 1217 Outp Data Zone",
        cached_input_data_zone: "o1 1217 cached Inp Data Zone",
        batch_input_global: "o1 1217 Batch Inp glbl",
        batch_output_global: "o1 1217 Batch Outp glbl",
        batch_input_data_zone: "o1 1217 Batch Inp Data Zone",
        batch_output_data_zone: "o1 1217 Batch Outp Data Zone",
        ..LanguageModel::EMPTY
    },
    LanguageModel {
        model: "o3-mini",
        version: "2025-01-31",
        is_default_version: true,
        input_global: "o3 mini 0131 input glbl",
        output_global: "o3 mini 0131 output glbl",
        cached_input_global: "o3 mini 0131 cached input glbl",
        input_regional: "o3 mini 0131 input regnl",
        output_regional: "o3 mini 0131 output regnl",
        cached_input_regional: "o3 mini 0131 cached input regnl",
        input_data_zone: "o3 mini 0131 input Data Zone",
        output_data_zone: "o3 mini 0131 output Data Zone",
        cached_input_data_zone: "o3 mini 0131 cached input Data Zone",
        batch_input_global: "o3 mini 0131 Batch Inp glbl",
        batch_output_global: "o3 mini 0131 Batch Outp glbl",
        batch_input_data_zone: "o3 mini 0131 Batch Inp Data Zone",
        batch_output_data_zone: "o3 mini 0131 Batch Outp Data Zone",
        ..LanguageModel::EMPTY
    },
];
