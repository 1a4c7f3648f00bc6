use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::cost_component::CostComponent;
use super::usage_item::UsageItem;

/// A priced resource, possibly owning nested sub-resources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub resource_type: String,
    pub cost_components: Vec<CostComponent>,
    pub sub_resources: Vec<Resource>,
    pub hourly_cost: Option<Decimal>,
    pub monthly_cost: Option<Decimal>,
    /// Portion of the monthly cost that comes from usage-based components
    pub monthly_usage_cost: Option<Decimal>,
    pub is_skipped: bool,
    pub no_price: bool,
    pub skip_message: Option<String>,
    pub usage_schema: Vec<UsageItem>,
    /// Usage key -> whether an actual estimate (rather than a default) was supplied
    pub estimation_summary: BTreeMap<String, bool>,
    pub tags: Option<BTreeMap<String, String>>,
}

/// A sub-resource together with the top-level resource it belongs to
#[derive(Debug, Clone, Copy)]
pub struct FlattenedResource<'a> {
    pub resource: &'a Resource,
    base: &'a Resource,
}

impl<'a> FlattenedResource<'a> {
    /// Resource type of the top-level resource in the hierarchy
    pub fn base_resource_type(&self) -> &'a str {
        &self.base.resource_type
    }

    /// Name of the top-level resource in the hierarchy
    pub fn base_resource_name(&self) -> &'a str {
        &self.base.name
    }
}

impl Resource {
    /// Price every component and sub-resource and roll the totals up.
    ///
    /// Costs stay `None` unless at least one component or sub-resource has a
    /// cost, so free resources can be told apart from zero-cost ones.
    pub fn calculate_costs(&mut self) {
        let mut hourly = Decimal::ZERO;
        let mut monthly = Decimal::ZERO;
        let mut monthly_usage: Option<Decimal> = None;
        let mut has_cost = false;

        for component in &mut self.cost_components {
            component.calculate_costs();

            if component.hourly_cost.is_some() || component.monthly_cost.is_some() {
                has_cost = true;
            }
            if let Some(cost) = component.hourly_cost {
                hourly += cost;
            }
            if let Some(cost) = component.monthly_cost {
                monthly += cost;
                if component.usage_based {
                    *monthly_usage.get_or_insert(Decimal::ZERO) += cost;
                }
            }
        }

        for sub_resource in &mut self.sub_resources {
            sub_resource.calculate_costs();

            if sub_resource.hourly_cost.is_some()
                || sub_resource.monthly_cost.is_some()
                || sub_resource.monthly_usage_cost.is_some()
            {
                has_cost = true;
            }
            if let Some(cost) = sub_resource.hourly_cost {
                hourly += cost;
            }
            if let Some(cost) = sub_resource.monthly_cost {
                monthly += cost;
            }
            if let Some(cost) = sub_resource.monthly_usage_cost {
                *monthly_usage.get_or_insert(Decimal::ZERO) += cost;
            }
        }

        if has_cost {
            self.hourly_cost = Some(hourly);
            self.monthly_cost = Some(monthly);
            self.monthly_usage_cost = monthly_usage;
        }

        if self.no_price {
            debug!(resource = %self.name, "Skipping free resource");
        }
    }

    /// Scale every quantity on this resource and its sub-resources
    pub fn multiply_quantities(&mut self, multiplier: Decimal) {
        for component in &mut self.cost_components {
            if let Some(quantity) = component.hourly_quantity.as_mut() {
                *quantity *= multiplier;
            }
            if let Some(quantity) = component.monthly_quantity.as_mut() {
                *quantity *= multiplier;
            }
        }

        for sub_resource in &mut self.sub_resources {
            sub_resource.multiply_quantities(multiplier);
        }
    }

    /// Depth-first list of all nested sub-resources
    pub fn flattened_sub_resources(&self) -> Vec<FlattenedResource<'_>> {
        let mut flattened = Vec::with_capacity(self.sub_resources.len());
        collect_sub_resources(self, self, &mut flattened);
        flattened
    }

    /// Remove the first cost component called `name`
    pub fn remove_cost_component(&mut self, name: &str) -> Option<CostComponent> {
        let index = self.cost_components.iter().position(|c| c.name == name)?;
        Some(self.cost_components.remove(index))
    }
}

fn collect_sub_resources<'a>(
    base: &'a Resource,
    parent: &'a Resource,
    out: &mut Vec<FlattenedResource<'a>>,
) {
    for sub_resource in &parent.sub_resources {
        out.push(FlattenedResource {
            resource: sub_resource,
            base,
        });

        if !sub_resource.sub_resources.is_empty() {
            collect_sub_resources(base, sub_resource, out);
        }
    }
}

/// Order resources by name
pub fn sort_resources(resources: &mut [Resource]) {
    resources.sort_by(|a, b| a.name.cmp(&b.name));
}
