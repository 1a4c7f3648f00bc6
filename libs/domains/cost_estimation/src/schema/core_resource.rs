use std::collections::BTreeMap;
use std::fmt::Debug;
use tracing::debug;

use super::resource::Resource;
use super::usage_data::{UsageData, merge_optional};
use super::usage_item::UsageItem;

pub const UNSUPPORTED_RESOURCE_MESSAGE: &str = "This resource is not currently supported";

/// A provider-agnostic resource that turns its configuration and usage into cost components
pub trait CoreResource: Debug + Send + Sync {
    /// Resource type name, e.g. `BackupProtectedVM`
    fn core_type(&self) -> &'static str;

    /// Usage keys this resource reads
    fn usage_schema(&self) -> Vec<UsageItem>;

    fn populate_usage(&mut self, usage: &UsageData);

    /// `None` when the configuration cannot be mapped to any price
    fn build_resource(&self) -> Option<Resource>;

    /// Location used for price lookups, for resources that have one. An empty
    /// location is filled in from the parent locations or the default region.
    fn region_mut(&mut self) -> Option<&mut String> {
        None
    }
}

/// Stand-in for resources that are known to be free or intentionally not priced
#[derive(Debug, Clone, Default)]
pub struct BlankCoreResource {
    pub name: String,
    pub resource_type: String,
}

impl CoreResource for BlankCoreResource {
    fn core_type(&self) -> &'static str {
        "BlankCoreResource"
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        Vec::new()
    }

    fn populate_usage(&mut self, _usage: &UsageData) {}

    fn build_resource(&self) -> Option<Resource> {
        Some(Resource {
            name: self.name.clone(),
            resource_type: self.resource_type.clone(),
            is_skipped: true,
            no_price: true,
            ..Default::default()
        })
    }
}

/// Everything known about a resource before it is built
#[derive(Debug)]
pub struct PartialResource {
    pub resource_type: String,
    pub address: String,
    pub tags: Option<BTreeMap<String, String>>,
    /// Locations of resources this one belongs to, nearest first
    pub parent_locations: Vec<String>,
    /// Usage attached to the resource directly; wins over fetched usage
    pub usage_data: Option<UsageData>,
    pub core_resource: Box<dyn CoreResource>,
}

impl PartialResource {
    pub fn new(
        resource_type: impl Into<String>,
        address: impl Into<String>,
        core_resource: Box<dyn CoreResource>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            address: address.into(),
            tags: None,
            parent_locations: Vec::new(),
            usage_data: None,
            core_resource,
        }
    }

    pub fn with_tags(mut self, tags: BTreeMap<String, String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_parent_locations(mut self, locations: Vec<String>) -> Self {
        self.parent_locations = locations;
        self
    }

    pub fn with_usage(mut self, usage: UsageData) -> Self {
        self.usage_data = Some(usage);
        self
    }
}

/// Populate usage and build the resource, falling back to a skipped resource
/// when the configuration is not supported
pub fn build_resource(
    partial: &mut PartialResource,
    fetched_usage: Option<&UsageData>,
) -> Resource {
    let usage = merge_optional(partial.usage_data.as_ref(), fetched_usage);

    if let Some(usage) = &usage {
        partial.core_resource.populate_usage(usage);
    }

    let Some(mut resource) = partial.core_resource.build_resource() else {
        debug!(
            address = %partial.address,
            resource_type = %partial.resource_type,
            "Resource configuration is not supported"
        );
        return Resource {
            name: partial.address.clone(),
            resource_type: partial.resource_type.clone(),
            is_skipped: true,
            skip_message: Some(UNSUPPORTED_RESOURCE_MESSAGE.to_string()),
            tags: partial.tags.clone(),
            ..Default::default()
        };
    };

    resource.resource_type = partial.resource_type.clone();
    resource.tags = partial.tags.clone();
    if resource.usage_schema.is_empty() {
        resource.usage_schema = partial.core_resource.usage_schema();
    }
    if let Some(usage) = &usage {
        resource.estimation_summary = usage.calc_estimation_summary();
    }

    resource
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::cost_component::CostComponent;
    use rust_decimal::Decimal;
    use serde_json::json;

    #[derive(Debug, Default)]
    struct FakeDisk {
        address: String,
        supported: bool,
        monthly_ops: Option<Decimal>,
    }

    impl CoreResource for FakeDisk {
        fn core_type(&self) -> &'static str {
            "FakeDisk"
        }

        fn usage_schema(&self) -> Vec<UsageItem> {
            vec![UsageItem::float("monthly_disk_operations")]
        }

        fn populate_usage(&mut self, usage: &UsageData) {
            self.monthly_ops = usage.get_decimal("monthly_disk_operations");
        }

        fn build_resource(&self) -> Option<Resource> {
            if !self.supported {
                return None;
            }
            Some(Resource {
                name: self.address.clone(),
                cost_components: vec![CostComponent {
                    name: "Disk operations".to_string(),
                    monthly_quantity: self.monthly_ops,
                    ..Default::default()
                }],
                ..Default::default()
            })
        }
    }

    fn partial(supported: bool) -> PartialResource {
        PartialResource::new(
            "azurerm_managed_disk",
            "azurerm_managed_disk.data",
            Box::new(FakeDisk {
                address: "azurerm_managed_disk.data".to_string(),
                supported,
                monthly_ops: None,
            }),
        )
    }

    #[test]
    fn test_own_usage_wins_over_fetched_usage() {
        let own = UsageData::from_value("d", &json!({"monthly_disk_operations": 10})).unwrap();
        let fetched =
            UsageData::from_value("d", &json!({"monthly_disk_operations": 99, "x": 1})).unwrap();
        let mut partial = partial(true).with_usage(own);

        let resource = build_resource(&mut partial, Some(&fetched));

        assert_eq!(
            resource.cost_components[0].monthly_quantity,
            Some(Decimal::from(10))
        );
        assert_eq!(resource.resource_type, "azurerm_managed_disk");
        assert_eq!(resource.estimation_summary.get("monthly_disk_operations"), Some(&true));
        assert_eq!(resource.estimation_summary.get("x"), Some(&true));
        assert_eq!(resource.usage_schema.len(), 1);
    }

    #[test]
    fn test_fetched_usage_alone_is_used() {
        let fetched = UsageData::from_value("d", &json!({"monthly_disk_operations": 7})).unwrap();
        let mut partial = partial(true);

        let resource = build_resource(&mut partial, Some(&fetched));

        assert_eq!(resource.cost_components[0].monthly_quantity, Some(Decimal::from(7)));
    }

    #[test]
    fn test_unsupported_configuration_is_skipped() {
        let mut tags = BTreeMap::new();
        tags.insert("env".to_string(), "prod".to_string());
        let mut partial = partial(false).with_tags(tags.clone());

        let resource = build_resource(&mut partial, None);

        assert!(resource.is_skipped);
        assert_eq!(resource.name, "azurerm_managed_disk.data");
        assert_eq!(resource.skip_message.as_deref(), Some(UNSUPPORTED_RESOURCE_MESSAGE));
        assert_eq!(resource.tags, Some(tags));
    }

    #[test]
    fn test_blank_core_resource_is_free() {
        let mut partial = PartialResource::new(
            "azurerm_resource_group",
            "azurerm_resource_group.rg",
            Box::new(BlankCoreResource {
                name: "azurerm_resource_group.rg".to_string(),
                resource_type: "azurerm_resource_group".to_string(),
            }),
        );

        let resource = build_resource(&mut partial, None);

        assert!(resource.is_skipped);
        assert!(resource.no_price);
        assert!(resource.skip_message.is_none());
        assert!(resource.cost_components.is_empty());
    }
}
