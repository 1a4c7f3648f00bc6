//! Provider-agnostic building blocks: cost components, resources, usage and projects.

pub mod core_resource;
pub mod cost_component;
pub mod project;
pub mod resource;
pub mod tiers;
pub mod units;
pub mod usage_data;
pub mod usage_item;
pub mod usage_map;

pub use core_resource::{BlankCoreResource, CoreResource, PartialResource, build_resource};
pub use cost_component::{AttributeFilter, CostComponent, PriceFilter, ProductFilter};
pub use project::Project;
pub use resource::{FlattenedResource, Resource, sort_resources};
pub use tiers::calculate_tier_buckets;
pub use units::{
    HOUR_TO_MONTH_UNIT_MULTIPLIER, day_to_month_unit_multiplier, days_in_month,
    month_to_hour_unit_multiplier,
};
pub use usage_data::{UsageData, merge_optional};
pub use usage_item::{UsageItem, UsageValueType, usage_template};
pub use usage_map::UsageMap;
