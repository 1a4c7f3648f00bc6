use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{info, warn};

use super::usage_data::UsageData;
use crate::error::{EstimationError, EstimationResult};

static BRACKETED_INDEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[.*?\]").unwrap());

const RESOURCE_USAGE_KEY: &str = "resource_usage";
const RESOURCE_TYPE_DEFAULTS_KEY: &str = "resource_type_default_usage";

/// A usage key containing `*`, compiled for matching against addresses
#[derive(Debug, Clone)]
struct Wildcard {
    raw: String,
    regex: Regex,
    base: String,
    /// One entry per bracketed index: true when that index is `[*]`
    wildcard_positions: Vec<bool>,
}

impl Wildcard {
    fn new(raw: &str) -> EstimationResult<Self> {
        let pattern = raw
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");

        let regex = Regex::new(&format!("^{pattern}$")).map_err(|e| {
            EstimationError::InvalidFilter {
                filter: raw.to_string(),
                details: e.to_string(),
            }
        })?;

        Ok(Self {
            raw: raw.to_string(),
            regex,
            base: BRACKETED_INDEX.replace_all(raw, "").into_owned(),
            wildcard_positions: BRACKETED_INDEX
                .find_iter(raw)
                .map(|m| m.as_str() == "[*]")
                .collect(),
        })
    }

    /// Groups keys of the same resource, most specific first
    fn specificity_cmp(&self, other: &Self) -> Ordering {
        self.base
            .cmp(&other.base)
            .then_with(|| self.wildcard_positions.cmp(&other.wildcard_positions))
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

/// Usage data for every address in a usage file.
///
/// Lookups merge three levels, each overriding the previous one:
///
/// 1. resource type defaults, e.g. `azurerm_linux_virtual_machine`
/// 2. the most specific matching wildcard, e.g. `azurerm_linux_virtual_machine.web[*]`
/// 3. the exact address, e.g. `azurerm_linux_virtual_machine.web[0]`
#[derive(Debug, Clone, Default)]
pub struct UsageMap {
    data: HashMap<String, UsageData>,
    wildcards: Vec<Wildcard>,
}

impl UsageMap {
    pub fn new(data: HashMap<String, UsageData>) -> EstimationResult<Self> {
        let mut wildcards = data
            .keys()
            .filter(|key| key.contains('*'))
            .map(|key| Wildcard::new(key))
            .collect::<EstimationResult<Vec<_>>>()?;

        wildcards.sort_by(Wildcard::specificity_cmp);

        Ok(Self { data, wildcards })
    }

    /// Accepts either a usage file (`resource_usage` / `resource_type_default_usage`
    /// sections) or a plain object keyed by address
    pub fn from_json_value(value: &Value) -> EstimationResult<Self> {
        let Value::Object(root) = value else {
            return Err(EstimationError::UsageParse(
                "usage file must contain a JSON object".to_string(),
            ));
        };

        let is_usage_file =
            root.contains_key(RESOURCE_USAGE_KEY) || root.contains_key(RESOURCE_TYPE_DEFAULTS_KEY);

        let mut data = HashMap::new();
        if is_usage_file {
            for section in [RESOURCE_TYPE_DEFAULTS_KEY, RESOURCE_USAGE_KEY] {
                match root.get(section) {
                    Some(Value::Object(entries)) => collect_entries(entries, &mut data)?,
                    Some(Value::Null) | None => {}
                    Some(_) => {
                        return Err(EstimationError::UsageParse(format!(
                            "'{section}' must be an object"
                        )));
                    }
                }
            }
        } else {
            collect_entries(root, &mut data)?;
        }

        Self::new(data)
    }

    pub fn from_json_str(raw: &str) -> EstimationResult<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_json_value(&value)
    }

    pub fn load_from_file(path: &Path) -> EstimationResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| EstimationError::UsageFile {
            path: path.to_path_buf(),
            source,
        })?;

        let map = Self::from_json_str(&raw)?;
        info!(path = %path.display(), entries = map.len(), "Loaded usage file");
        Ok(map)
    }

    pub fn data(&self) -> &HashMap<String, UsageData> {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Merged usage for `address`, or `None` when no level matches
    pub fn get(&self, address: &str) -> Option<UsageData> {
        let mut merged: Option<UsageData> = resource_type_from_address(address)
            .and_then(|resource_type| self.data.get(resource_type))
            .cloned();

        let wildcard_usage = self
            .wildcards
            .iter()
            .find(|w| w.regex.is_match(address))
            .and_then(|w| self.data.get(&w.raw));
        if let Some(usage) = wildcard_usage {
            merge_into(&mut merged, usage);
        }

        if let Some(usage) = self.data.get(address) {
            merge_into(&mut merged, usage);
        }

        merged
    }
}

fn collect_entries(
    entries: &serde_json::Map<String, Value>,
    data: &mut HashMap<String, UsageData>,
) -> EstimationResult<()> {
    for (address, value) in entries {
        data.insert(address.clone(), UsageData::from_value(address.clone(), value)?);
    }
    Ok(())
}

fn merge_into(dst: &mut Option<UsageData>, src: &UsageData) {
    match dst {
        Some(existing) => merge_usage(existing, src),
        None => *dst = Some(src.clone()),
    }
}

/// Overlay `src` onto `dst`; nested objects are merged key by key
fn merge_usage(dst: &mut UsageData, src: &UsageData) {
    for (key, value) in &src.attributes {
        match dst.attributes.get_mut(key) {
            Some(existing) => deep_merge(existing, value),
            None => {
                dst.attributes.insert(key.clone(), value.clone());
            }
        }
    }

    dst.address = src.address.clone();
}

fn deep_merge(dst: &mut Value, src: &Value) {
    match (dst, src) {
        (Value::Object(dst_map), Value::Object(src_map)) => {
            for (key, value) in src_map {
                match dst_map.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        dst_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (dst @ Value::Object(_), other) => {
            warn!(replacement = %other, "Replacing nested usage object with a scalar value");
            *dst = other.clone();
        }
        (dst, other) => *dst = other.clone(),
    }
}

/// Resource type of an address such as `module.net["a"].azurerm_vpn_gateway.main[0]`
pub fn resource_type_from_address(address: &str) -> Option<&str> {
    let segments = split_outside_brackets(address);
    let mut index = 0;

    while segments.get(index) == Some(&"module") {
        index += 2;
    }
    if segments.get(index) == Some(&"data") {
        index += 1;
    }

    let resource_type = *segments.get(index)?;
    segments.get(index + 1)?;

    if resource_type.is_empty() || resource_type.contains('[') {
        return None;
    }

    Some(resource_type)
}

fn split_outside_brackets(address: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in address.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => {
                segments.push(&address[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&address[start..]);

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> UsageMap {
        UsageMap::from_json_value(&value).unwrap()
    }

    #[test]
    fn test_resource_type_from_address() {
        assert_eq!(
            resource_type_from_address("azurerm_linux_virtual_machine.web"),
            Some("azurerm_linux_virtual_machine")
        );
        assert_eq!(
            resource_type_from_address("module.app[\"a.b\"].azurerm_managed_disk.data[0]"),
            Some("azurerm_managed_disk")
        );
        assert_eq!(
            resource_type_from_address("data.azurerm_resource_group.rg"),
            Some("azurerm_resource_group")
        );
        assert_eq!(resource_type_from_address("azurerm_managed_disk"), None);
    }

    #[test]
    fn test_get_merges_levels_in_priority_order() {
        let usage = map(json!({
            "resource_type_default_usage": {
                "azurerm_linux_virtual_machine": {
                    "monthly_hrs": 730,
                    "os_disk": {"monthly_disk_operations": 1}
                }
            },
            "resource_usage": {
                "azurerm_linux_virtual_machine.web[*]": {"monthly_hrs": 500},
                "azurerm_linux_virtual_machine.web[1]": {"os_disk": {"monthly_disk_operations": 99}}
            }
        }));

        let first = usage.get("azurerm_linux_virtual_machine.web[0]").unwrap();
        assert_eq!(first.get_i64("monthly_hrs"), Some(500));
        let os_disk = first.get_sub_usage("os_disk").unwrap();
        assert_eq!(os_disk.get_i64("monthly_disk_operations"), Some(1));
        assert_eq!(first.address, "azurerm_linux_virtual_machine.web[*]");

        let second = usage.get("azurerm_linux_virtual_machine.web[1]").unwrap();
        assert_eq!(second.get_i64("monthly_hrs"), Some(500));
        assert_eq!(
            second.get_sub_usage("os_disk").unwrap().get_i64("monthly_disk_operations"),
            Some(99)
        );
        assert_eq!(second.address, "azurerm_linux_virtual_machine.web[1]");

        let other = usage.get("azurerm_linux_virtual_machine.api").unwrap();
        assert_eq!(other.get_i64("monthly_hrs"), Some(730));
    }

    #[test]
    fn test_get_returns_none_without_any_match() {
        let usage = map(json!({"azurerm_managed_disk.a": {"monthly_disk_operations": 5}}));
        assert!(usage.get("azurerm_managed_disk.b").is_none());
        assert!(usage.get("azurerm_managed_disk.a").is_some());
    }

    #[test]
    fn test_most_specific_wildcard_wins() {
        let usage = map(json!({
            "module.mod[*].azurerm_managed_disk.test[*]": {"monthly_disk_operations": 1},
            "module.mod[\"foo\"].azurerm_managed_disk.test[*]": {"monthly_disk_operations": 2},
        }));

        let foo = usage.get("module.mod[\"foo\"].azurerm_managed_disk.test[3]").unwrap();
        assert_eq!(foo.get_i64("monthly_disk_operations"), Some(2));

        let bar = usage.get("module.mod[\"bar\"].azurerm_managed_disk.test[3]").unwrap();
        assert_eq!(bar.get_i64("monthly_disk_operations"), Some(1));
    }

    #[test]
    fn test_wildcard_literals_are_escaped() {
        let usage = map(json!({"azurerm_managed_disk.a.b[*]": {"x": 1}}));
        assert!(usage.get("azurerm_managed_disk.aXb[0]").is_none());
        assert!(usage.get("azurerm_managed_disk.a.b[0]").is_some());
    }

    #[test]
    fn test_plain_address_map_is_accepted() {
        let usage = map(json!({"azurerm_storage_queue.q": {"monthly_storage_gb": 10}}));
        assert_eq!(usage.len(), 1);
        assert!(!usage.is_empty());
    }

    #[test]
    fn test_invalid_shapes_are_rejected() {
        assert!(UsageMap::from_json_value(&json!([])).is_err());
        assert!(UsageMap::from_json_value(&json!({"resource_usage": []})).is_err());
        assert!(UsageMap::from_json_value(&json!({"resource_usage": {"a.b": 5}})).is_err());
        assert!(UsageMap::from_json_str("{not json").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.json");
        std::fs::write(
            &path,
            r#"{
                "version": "0.1",
                "resource_usage": {"azurerm_storage_queue.q": {"monthly_storage_gb": 10}}
            }"#,
        )
        .unwrap();

        let usage = UsageMap::load_from_file(&path).unwrap();
        let queue = usage.get("azurerm_storage_queue.q").unwrap();
        assert_eq!(queue.get_i64("monthly_storage_gb"), Some(10));
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = UsageMap::load_from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
