use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use strum::{Display, EnumString};

/// Type of value a usage key accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UsageValueType {
    Int64,
    Float64,
    String,
    StringArray,
    KeyValueMap,
    /// Nested object whose keys are described by `UsageItem::items`
    SubResourceUsage,
}

/// A usage key a resource understands, with its default value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageItem {
    pub key: String,
    pub value_type: UsageValueType,
    pub default_value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<UsageItem>,
}

impl UsageItem {
    fn new(key: &str, value_type: UsageValueType, default_value: Value) -> Self {
        Self {
            key: key.to_string(),
            value_type,
            default_value,
            description: None,
            items: Vec::new(),
        }
    }

    pub fn int(key: &str) -> Self {
        Self::new(key, UsageValueType::Int64, json!(0))
    }

    pub fn float(key: &str) -> Self {
        Self::new(key, UsageValueType::Float64, json!(0.0))
    }

    pub fn string(key: &str, default: &str) -> Self {
        Self::new(key, UsageValueType::String, json!(default))
    }

    pub fn string_array(key: &str) -> Self {
        Self::new(key, UsageValueType::StringArray, json!([]))
    }

    pub fn key_value_map(key: &str, default: Value) -> Self {
        Self::new(key, UsageValueType::KeyValueMap, default)
    }

    pub fn sub_resource(key: &str, items: Vec<UsageItem>) -> Self {
        Self {
            items,
            ..Self::new(key, UsageValueType::SubResourceUsage, Value::Null)
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Build the usage-file object for a resource from its usage schema
pub fn usage_template(items: &[UsageItem]) -> Value {
    let mut object = Map::with_capacity(items.len());

    for item in items {
        let value = match item.value_type {
            UsageValueType::SubResourceUsage => usage_template(&item.items),
            _ => item.default_value.clone(),
        };
        object.insert(item.key.clone(), value);
    }

    Value::Object(object)
}
