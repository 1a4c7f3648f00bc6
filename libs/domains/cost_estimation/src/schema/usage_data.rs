use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{EstimationError, EstimationResult};

/// Usage estimates supplied for one resource address
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageData {
    pub address: String,
    pub attributes: BTreeMap<String, Value>,
}

impl UsageData {
    pub fn new(address: impl Into<String>, attributes: BTreeMap<String, Value>) -> Self {
        Self {
            address: address.into(),
            attributes,
        }
    }

    /// Build usage data from a JSON object; any other JSON shape is rejected
    pub fn from_value(address: impl Into<String>, value: &Value) -> EstimationResult<Self> {
        let address = address.into();
        match value {
            Value::Object(object) => Ok(Self {
                attributes: object.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                address,
            }),
            Value::Null => Ok(Self::new(address, BTreeMap::new())),
            other => Err(EstimationError::UsageParse(format!(
                "usage for '{}' must be an object, got {}",
                address,
                json_kind(other)
            ))),
        }
    }

    /// New usage data with every key of `self` plus the keys of `other` that `self` lacks
    pub fn merge(&self, other: Option<&UsageData>) -> UsageData {
        let mut merged = self.clone();

        if let Some(other) = other {
            for (key, value) in &other.attributes {
                merged
                    .attributes
                    .entry(key.clone())
                    .or_insert_with(|| value.clone());
            }
        }

        merged
    }

    /// Look up a key. Null counts as missing, and `name[idx]` falls back to `name[*]`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.attributes.get(key).filter(|v| !v.is_null()) {
            return Some(value);
        }

        let wildcard = convert_array_key_to_wildcard(key)?;
        self.attributes.get(&wildcard).filter(|v| !v.is_null())
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Integer value; floats are floored
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.floor() as i64)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f.floor() as i64))
            }
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Exact decimal value, read from the JSON text rather than through f64
    pub fn get_decimal(&self, key: &str) -> Option<Decimal> {
        let text = match self.get(key)? {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.trim().to_string(),
            _ => return None,
        };

        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .ok()
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn get_string_array(&self, key: &str) -> Option<Vec<String>> {
        match self.get(key)? {
            Value::Array(items) => Some(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Object of numbers, e.g. `{"country_code_1": 20}`. Non-numeric entries are dropped.
    pub fn get_float_map(&self, key: &str) -> Option<BTreeMap<String, Decimal>> {
        let Value::Object(object) = self.get(key)? else {
            return None;
        };

        Some(
            object
                .iter()
                .filter_map(|(k, v)| match v {
                    Value::Number(n) => Decimal::from_str(&n.to_string())
                        .or_else(|_| Decimal::from_scientific(&n.to_string()))
                        .ok()
                        .map(|d| (k.clone(), d)),
                    _ => None,
                })
                .collect(),
        )
    }

    /// Nested object as its own usage data, addressed `<address>.<key>`
    pub fn get_sub_usage(&self, key: &str) -> Option<UsageData> {
        let Value::Object(object) = self.get(key)? else {
            return None;
        };

        Some(UsageData {
            address: format!("{}.{}", self.address, key),
            attributes: object.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        })
    }

    /// True when the key is missing, null, an empty string, or an empty object/array
    pub fn is_empty(&self, key: &str) -> bool {
        match self.get(key) {
            None => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(Value::Array(a)) => a.is_empty(),
            Some(Value::Object(o)) => o.is_empty(),
            Some(_) => false,
        }
    }

    /// Key -> true when an actual estimate was given, false when it is a default
    pub fn calc_estimation_summary(&self) -> BTreeMap<String, bool> {
        self.attributes
            .iter()
            .map(|(key, value)| {
                let has_estimate = match value {
                    Value::Number(n) => n.as_f64().is_some_and(|f| f > 0.0),
                    Value::String(s) => !s.is_empty(),
                    _ => false,
                };
                (key.clone(), has_estimate)
            })
            .collect()
    }
}

/// Merge two optional usage sets; keys in `primary` win
pub fn merge_optional(primary: Option<&UsageData>, other: Option<&UsageData>) -> Option<UsageData> {
    match (primary, other) {
        (Some(primary), other) => Some(primary.merge(other)),
        (None, Some(other)) => Some(other.clone()),
        (None, None) => None,
    }
}

/// Replace the last index group with `[*]`: `a[0].b[1]` -> `a[0].b[*]`.
/// Brackets nested inside the group (quoted addresses) stay part of it.
fn convert_array_key_to_wildcard(key: &str) -> Option<String> {
    let close = key.rfind(']')?;

    let mut depth = 0usize;
    let mut open = None;
    for (index, c) in key[..=close].char_indices().rev() {
        match c {
            ']' => depth += 1,
            '[' => {
                depth -= 1;
                if depth == 0 {
                    open = Some(index);
                    break;
                }
            }
            _ => {}
        }
    }

    let open = open?;
    Some(format!("{}*{}", &key[..=open], &key[close..]))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
