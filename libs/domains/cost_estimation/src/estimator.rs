use core_config::estimation::EstimationConfig;
use tracing::{debug, info, instrument};

use crate::azure::util::lookup_region;
use crate::error::EstimationResult;
use crate::pricing::{InMemoryPriceCatalog, PriceCatalog, apply_prices};
use crate::schema::project::Project;
use crate::schema::usage_map::UsageMap;

/// Builds, prices and totals projects
pub struct Estimator {
    usage_map: UsageMap,
    catalog: Box<dyn PriceCatalog>,
    default_region: String,
    currency: String,
}

impl Estimator {
    pub fn new(usage_map: UsageMap, catalog: Box<dyn PriceCatalog>) -> Self {
        let defaults = EstimationConfig::default();
        Self {
            usage_map,
            catalog,
            default_region: defaults.default_region,
            currency: defaults.currency,
        }
    }

    /// Load the usage file and price catalog named by the config; unset paths are empty
    pub fn from_config(config: &EstimationConfig) -> EstimationResult<Self> {
        let usage_map = match &config.usage_file {
            Some(path) => UsageMap::load_from_file(path)?,
            None => UsageMap::default(),
        };

        let catalog = match &config.price_catalog_file {
            Some(path) => InMemoryPriceCatalog::load_from_file(path)?,
            None => InMemoryPriceCatalog::default(),
        };

        Ok(Self {
            usage_map,
            catalog: Box::new(catalog),
            default_region: config.default_region.clone(),
            currency: config.currency.clone(),
        })
    }

    pub fn usage_map(&self) -> &UsageMap {
        &self.usage_map
    }

    /// Region for resources that do not declare one
    pub fn default_region(&self) -> &str {
        &self.default_region
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    #[instrument(skip(self, project), fields(project = %project.name))]
    pub fn estimate(&self, project: &mut Project) -> EstimationResult<()> {
        self.resolve_regions(project);
        project.build_resources(&self.usage_map);
        apply_prices(project, self.catalog.as_ref())?;
        project.calculate_costs();
        project.sort_resources();

        info!(
            currency = %self.currency,
            monthly_cost = ?project.total_monthly_cost(),
            "Estimated project costs"
        );
        Ok(())
    }

    /// Fill in resources without a usable location from their parents, then the default region
    fn resolve_regions(&self, project: &mut Project) {
        for partial in &mut project.partial_resources {
            let parents: Vec<&str> = partial.parent_locations.iter().map(String::as_str).collect();
            let Some(region) = partial.core_resource.region_mut() else {
                continue;
            };

            if region.is_empty() || region.contains("mock") {
                *region = lookup_region(None, &parents, &self.default_region);
                debug!(address = %partial.address, region = %region, "Resolved resource region");
            }
        }
    }
}
