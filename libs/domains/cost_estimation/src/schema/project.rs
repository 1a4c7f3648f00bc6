use rust_decimal::Decimal;
use tracing::{debug, info};

use super::core_resource::{PartialResource, build_resource};
use super::resource::{Resource, sort_resources};
use super::usage_map::UsageMap;

/// A set of resources estimated together
#[derive(Debug, Default)]
pub struct Project {
    pub name: String,
    pub partial_resources: Vec<PartialResource>,
    pub resources: Vec<Resource>,
}

impl Project {
    pub fn new(name: impl Into<String>, partial_resources: Vec<PartialResource>) -> Self {
        Self {
            name: name.into(),
            partial_resources,
            resources: Vec::new(),
        }
    }

    /// Build every partial resource with the usage found for its address
    pub fn build_resources(&mut self, usage_map: &UsageMap) {
        self.resources = self
            .partial_resources
            .iter_mut()
            .map(|partial| {
                let usage = usage_map.get(&partial.address);
                if usage.is_some() {
                    debug!(address = %partial.address, "Applying usage estimates");
                }
                build_resource(partial, usage.as_ref())
            })
            .collect();

        info!(
            project = %self.name,
            resources = self.resources.len(),
            skipped = self.resources.iter().filter(|r| r.is_skipped).count(),
            "Built project resources"
        );
    }

    pub fn calculate_costs(&mut self) {
        for resource in &mut self.resources {
            resource.calculate_costs();
        }
    }

    pub fn sort_resources(&mut self) {
        sort_resources(&mut self.resources);
    }

    /// Top-level resources followed by their flattened sub-resources
    pub fn all_resources(&self) -> Vec<&Resource> {
        let mut all = Vec::with_capacity(self.resources.len());
        for resource in &self.resources {
            all.push(resource);
            all.extend(resource.flattened_sub_resources().into_iter().map(|f| f.resource));
        }
        all
    }

    pub fn total_hourly_cost(&self) -> Option<Decimal> {
        sum_costs(self.resources.iter().map(|r| r.hourly_cost))
    }

    pub fn total_monthly_cost(&self) -> Option<Decimal> {
        sum_costs(self.resources.iter().map(|r| r.monthly_cost))
    }

    pub fn total_monthly_usage_cost(&self) -> Option<Decimal> {
        sum_costs(self.resources.iter().map(|r| r.monthly_usage_cost))
    }
}

/// `None` when no resource contributes a cost
fn sum_costs(costs: impl Iterator<Item = Option<Decimal>>) -> Option<Decimal> {
    costs.flatten().fold(None, |total, cost| {
        Some(total.unwrap_or(Decimal::ZERO) + cost)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::core_resource::BlankCoreResource;
    use crate::schema::cost_component::CostComponent;
    use rust_decimal_macros::dec;

    fn priced(name: &str, monthly: Decimal) -> Resource {
        let mut component = CostComponent {
            monthly_quantity: Some(monthly),
            ..Default::default()
        };
        component.set_price(Decimal::ONE);
        Resource {
            name: name.to_string(),
            cost_components: vec![component],
            sub_resources: vec![Resource {
                name: format!("{name}.child"),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_totals_and_all_resources() {
        let mut project = Project {
            name: "infra".to_string(),
            resources: vec![priced("b", dec!(20)), priced("a", dec!(10))],
            ..Default::default()
        };

        project.calculate_costs();
        project.sort_resources();

        assert_eq!(project.resources[0].name, "a");
        assert_eq!(project.total_monthly_cost(), Some(dec!(30)));
        assert!(project.total_monthly_usage_cost().is_none());

        let names: Vec<&str> = project.all_resources().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "a.child", "b", "b.child"]);
    }

    #[test]
    fn test_empty_project_has_no_totals() {
        let project = Project::default();
        assert!(project.total_monthly_cost().is_none());
        assert!(project.total_hourly_cost().is_none());
    }

    #[test]
    fn test_build_resources_looks_up_usage_by_address() {
        let usage =
            UsageMap::from_json_str(r#"{"azurerm_resource_group.rg": {"anything": 1}}"#).unwrap();
        let mut project = Project::new(
            "infra",
            vec![PartialResource::new(
                "azurerm_resource_group",
                "azurerm_resource_group.rg",
                Box::new(BlankCoreResource {
                    name: "azurerm_resource_group.rg".to_string(),
                    resource_type: "azurerm_resource_group".to_string(),
                }),
            )],
        );

        project.build_resources(&usage);

        assert_eq!(project.resources.len(), 1);
        assert_eq!(project.resources[0].estimation_summary.get("anything"), Some(&true));
    }
}
