use fancy_regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::{EstimationError, EstimationResult};
use crate::schema::cost_component::{AttributeFilter, PriceFilter, ProductFilter};
use crate::schema::project::Project;
use crate::schema::resource::Resource;

/// One price point in a catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub vendor_name: String,
    #[serde(default)]
    pub region: Option<String>,
    pub service: String,
    pub product_family: String,
    #[serde(default)]
    pub sku: Option<String>,
    /// Product attributes such as `meterName`, `productName`, `skuName`
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub purchase_option: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub start_usage_amount: Option<String>,
    #[serde(default)]
    pub end_usage_amount: Option<String>,
    #[serde(default)]
    pub term_length: Option<String>,
    #[serde(default)]
    pub term_purchase_option: Option<String>,
    #[serde(default)]
    pub term_offering_class: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub unit_price: Decimal,
}

/// Source of prices for cost components
#[cfg_attr(test, mockall::automock)]
pub trait PriceCatalog: Send + Sync {
    /// Unit prices of every price point matching both filters
    fn find_prices(
        &self,
        product_filter: &ProductFilter,
        price_filter: &PriceFilter,
    ) -> EstimationResult<Vec<Decimal>>;
}

/// Price catalog held in memory, typically loaded from a JSON array of prices
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceCatalog {
    prices: Vec<Price>,
}

impl InMemoryPriceCatalog {
    pub fn new(prices: Vec<Price>) -> Self {
        Self { prices }
    }

    pub fn from_json_str(raw: &str) -> EstimationResult<Self> {
        let prices: Vec<Price> = serde_json::from_str(raw)?;
        Ok(Self::new(prices))
    }

    pub fn load_from_file(path: &Path) -> EstimationResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            EstimationError::PriceCatalog(format!("failed to read '{}': {}", path.display(), e))
        })?;

        let catalog = Self::from_json_str(&raw)?;
        info!(path = %path.display(), prices = catalog.len(), "Loaded price catalog");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    fn product_matches(price: &Price, filter: &ProductFilter, attrs: &[CompiledAttribute]) -> bool {
        matches_exact(Some(&price.vendor_name), filter.vendor_name.as_ref())
            && matches_exact(price.region.as_ref(), filter.region.as_ref())
            && matches_exact(Some(&price.service), filter.service.as_ref())
            && matches_exact(Some(&price.product_family), filter.product_family.as_ref())
            && matches_exact(price.sku.as_ref(), filter.sku.as_ref())
            && attrs.iter().all(|attr| attr.matches(&price.attributes))
    }

    fn price_matches(
        price: &Price,
        filter: &PriceFilter,
        description: Option<&FilterRegex>,
    ) -> bool {
        matches_exact(price.purchase_option.as_ref(), filter.purchase_option.as_ref())
            && matches_exact(price.unit.as_ref(), filter.unit.as_ref())
            && matches_exact(price.term_length.as_ref(), filter.term_length.as_ref())
            && matches_exact(
                price.term_purchase_option.as_ref(),
                filter.term_purchase_option.as_ref(),
            )
            && matches_exact(
                price.term_offering_class.as_ref(),
                filter.term_offering_class.as_ref(),
            )
            && matches_amount(
                price.start_usage_amount.as_deref(),
                filter.start_usage_amount.as_deref(),
            )
            && matches_amount(
                price.end_usage_amount.as_deref(),
                filter.end_usage_amount.as_deref(),
            )
            && description.is_none_or(|re| {
                price
                    .description
                    .as_deref()
                    .is_some_and(|d| re.is_match(d))
            })
    }
}

impl PriceCatalog for InMemoryPriceCatalog {
    fn find_prices(
        &self,
        product_filter: &ProductFilter,
        price_filter: &PriceFilter,
    ) -> EstimationResult<Vec<Decimal>> {
        let attrs = product_filter
            .attribute_filters
            .iter()
            .map(CompiledAttribute::compile)
            .collect::<EstimationResult<Vec<_>>>()?;

        let description = price_filter
            .description_regex
            .as_deref()
            .map(compile_filter_regex)
            .transpose()?;

        Ok(self
            .prices
            .iter()
            .filter(|p| Self::product_matches(p, product_filter, &attrs))
            .filter(|p| Self::price_matches(p, price_filter, description.as_ref()))
            .map(|p| p.unit_price)
            .collect())
    }
}

enum CompiledAttribute<'a> {
    Exact { key: &'a str, value: &'a str },
    Regex { key: &'a str, regex: FilterRegex },
    Present { key: &'a str },
}

impl<'a> CompiledAttribute<'a> {
    fn compile(filter: &'a AttributeFilter) -> EstimationResult<Self> {
        let key = filter.key.as_str();
        Ok(match (&filter.value, &filter.value_regex) {
            (Some(value), _) => Self::Exact { key, value },
            (None, Some(pattern)) => Self::Regex {
                key,
                regex: compile_filter_regex(pattern)?,
            },
            (None, None) => Self::Present { key },
        })
    }

    fn matches(&self, attributes: &BTreeMap<String, String>) -> bool {
        match self {
            Self::Exact { key, value } => attributes.get(*key).is_some_and(|v| v == value),
            Self::Regex { key, regex } => attributes.get(*key).is_some_and(|v| regex.is_match(v)),
            Self::Present { key } => attributes.contains_key(*key),
        }
    }
}

fn matches_exact(actual: Option<&String>, wanted: Option<&String>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => actual.is_some_and(|a| a == wanted),
    }
}

/// Usage amounts compare numerically so `"0"` matches `"0.0"`
fn matches_amount(actual: Option<&str>, wanted: Option<&str>) -> bool {
    let Some(wanted) = wanted else {
        return true;
    };
    let Some(actual) = actual else {
        return false;
    };

    match (Decimal::from_str(actual), Decimal::from_str(wanted)) {
        (Ok(a), Ok(w)) => a == w,
        _ => actual.eq_ignore_ascii_case(wanted),
    }
}

/// A compiled `/pattern/flags` filter. Look-around is supported.
#[derive(Debug, Clone)]
pub struct FilterRegex(Regex);

impl FilterRegex {
    /// Values the engine gives up on (backtrack limit) count as no match
    pub fn is_match(&self, value: &str) -> bool {
        self.0.is_match(value).unwrap_or_else(|e| {
            debug!(pattern = %self.0.as_str(), error = %e, "Filter evaluation failed");
            false
        })
    }
}

/// Compile a `/pattern/flags` filter; anything else is taken as a bare pattern.
///
/// Only the `i`, `m`, `s` and `x` flags are honoured.
pub fn compile_filter_regex(filter: &str) -> EstimationResult<FilterRegex> {
    let (pattern, flags) = match filter.strip_prefix('/').and_then(|rest| rest.rsplit_once('/')) {
        Some((pattern, flags)) => (pattern, flags),
        None => (filter, ""),
    };

    let flags: String = flags.chars().filter(|c| matches!(c, 'i' | 'm' | 's' | 'x')).collect();
    let pattern = if flags.is_empty() {
        pattern.to_string()
    } else {
        format!("(?{flags}){pattern}")
    };

    Regex::new(&pattern)
        .map(FilterRegex)
        .map_err(|e| EstimationError::InvalidFilter {
            filter: filter.to_string(),
            details: e.to_string(),
        })
}

/// Resolve a price for every cost component in the project.
///
/// Components with a custom price take it as is, and components without a
/// product filter are left alone. A component with no
/// matching price is flagged as not found, or dropped when it is marked
/// `ignore_if_missing_price`. Filters the catalog cannot evaluate are treated
/// as not found; other catalog errors abort.
pub fn apply_prices(project: &mut Project, catalog: &dyn PriceCatalog) -> EstimationResult<()> {
    for resource in &mut project.resources {
        apply_resource_prices(resource, catalog)?;
    }
    Ok(())
}

fn apply_resource_prices(
    resource: &mut Resource,
    catalog: &dyn PriceCatalog,
) -> EstimationResult<()> {
    if resource.is_skipped {
        return Ok(());
    }

    let default_price_filter = PriceFilter::default();
    let mut missing = Vec::new();

    for (index, component) in resource.cost_components.iter_mut().enumerate() {
        if let Some(price) = component.custom_price {
            debug!(
                resource = %resource.name,
                component = %component.name,
                price = %price,
                "Using custom price"
            );
            component.set_price(price);
            continue;
        }
        let Some(product_filter) = &component.product_filter else {
            continue;
        };
        let price_filter = component.price_filter.as_ref().unwrap_or(&default_price_filter);

        let prices = match catalog.find_prices(product_filter, price_filter) {
            Ok(prices) => prices,
            Err(EstimationError::InvalidFilter { filter, details }) => {
                warn!(
                    resource = %resource.name,
                    component = %component.name,
                    filter = %filter,
                    details = %details,
                    "Price filter cannot be evaluated"
                );
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        match prices.as_slice() {
            [] => {
                debug!(
                    resource = %resource.name,
                    component = %component.name,
                    "No price found"
                );
                if component.ignore_if_missing_price {
                    missing.push(index);
                } else {
                    component.set_price_not_found();
                }
            }
            [price] => component.set_price(*price),
            [first, ..] => {
                warn!(
                    resource = %resource.name,
                    component = %component.name,
                    count = prices.len(),
                    "Multiple prices found, using the first"
                );
                component.set_price(*first);
            }
        }
    }

    for index in missing.into_iter().rev() {
        resource.cost_components.remove(index);
    }

    for sub_resource in &mut resource.sub_resources {
        apply_resource_prices(sub_resource, catalog)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::cost_component::CostComponent;
    use mockall::predicate;
    use rust_decimal_macros::dec;

    const CATALOG: &str = r#"[
        {
            "vendor_name": "azure",
            "region": "eastus",
            "service": "Traffic Manager",
            "product_family": "Networking",
            "attributes": {"meterName": "Azure Endpoint", "skuName": "Azure"},
            "purchase_option": "Consumption",
            "start_usage_amount": "0",
            "unit_price": "0.54"
        },
        {
            "vendor_name": "azure",
            "region": "Zone 1",
            "service": "Traffic Manager",
            "product_family": "Networking",
            "attributes": {"meterName": "DNS Queries"},
            "purchase_option": "Consumption",
            "start_usage_amount": "0",
            "unit_price": 0.54
        },
        {
            "vendor_name": "azure",
            "region": "Zone 1",
            "service": "Traffic Manager",
            "product_family": "Networking",
            "attributes": {"meterName": "DNS Queries"},
            "purchase_option": "Consumption",
            "start_usage_amount": "1000",
            "unit_price": 0.375
        }
    ]"#;

    fn dns_filter() -> ProductFilter {
        ProductFilter {
            vendor_name: Some("azure".to_string()),
            region: Some("Zone 1".to_string()),
            service: Some("Traffic Manager".to_string()),
            product_family: Some("Networking".to_string()),
            attribute_filters: vec![AttributeFilter::regex("meterName", "/^dns queries$/i")],
            ..Default::default()
        }
    }

    fn start_at(amount: &str) -> PriceFilter {
        PriceFilter {
            purchase_option: Some("Consumption".to_string()),
            start_usage_amount: Some(amount.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_in_memory_catalog_matches_tiers_by_start_amount() {
        let catalog = InMemoryPriceCatalog::from_json_str(CATALOG).unwrap();
        assert_eq!(catalog.len(), 3);

        let first = catalog.find_prices(&dns_filter(), &start_at("0")).unwrap();
        assert_eq!(first, vec![dec!(0.54)]);

        let over = catalog.find_prices(&dns_filter(), &start_at("1000.0")).unwrap();
        assert_eq!(over, vec![dec!(0.375)]);

        let all = catalog.find_prices(&dns_filter(), &PriceFilter::default()).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_exact_attribute_and_missing_region() {
        let catalog = InMemoryPriceCatalog::from_json_str(CATALOG).unwrap();
        let filter = ProductFilter {
            region: Some("westeurope".to_string()),
            attribute_filters: vec![AttributeFilter::exact("meterName", "Azure Endpoint")],
            ..Default::default()
        };
        assert!(catalog.find_prices(&filter, &PriceFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn test_negative_lookahead_excludes_values() {
        let re = compile_filter_regex("/^(?!.*(Low Priority|Spot)$).*$/i").unwrap();
        assert!(re.is_match("D2s v3"));
        assert!(!re.is_match("D2s v3 Spot"));
        assert!(!re.is_match("D2s v3 low priority"));
        assert!(re.is_match("Spot D2s v3"));
    }

    #[test]
    fn test_lookbehind_filters_run_unmodified() {
        let re = compile_filter_regex("/^(?<!Batch )Write Operations$/i").unwrap();
        assert!(re.is_match("Write Operations"));

        let re = compile_filter_regex("/(?<!Batch )Write Operations$/i").unwrap();
        assert!(re.is_match("LRS Write Operations"));
        assert!(re.is_match("Hot Push Write Operations"));
        assert!(!re.is_match("Batch Write Operations"));

        let re = compile_filter_regex("/^(?<!Iterative )Read Operations$/").unwrap();
        assert!(re.is_match("Read Operations"));
        assert!(!re.is_match("read operations"));
    }

    #[test]
    fn test_malformed_regex_is_invalid_filter() {
        let catalog = InMemoryPriceCatalog::default();
        let filter = ProductFilter {
            attribute_filters: vec![AttributeFilter::regex("meterName", "/(Write/i")],
            ..Default::default()
        };
        let err = catalog.find_prices(&filter, &PriceFilter::default()).unwrap_err();
        assert!(matches!(err, EstimationError::InvalidFilter { .. }));
    }

    #[test]
    fn test_compile_filter_regex_flags() {
        let re = compile_filter_regex("/^standard$/i").unwrap();
        assert!(re.is_match("STANDARD"));
        let re = compile_filter_regex("^Standard$").unwrap();
        assert!(!re.is_match("standard"));
    }

    fn project_with(components: Vec<CostComponent>) -> Project {
        Project {
            resources: vec![Resource {
                name: "azurerm_traffic_manager_profile.p".to_string(),
                cost_components: components,
                sub_resources: vec![Resource {
                    name: "child".to_string(),
                    cost_components: vec![CostComponent {
                        name: "child component".to_string(),
                        product_filter: Some(ProductFilter::default()),
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_apply_prices_with_mock_catalog() {
        let mut catalog = MockPriceCatalog::new();
        catalog
            .expect_find_prices()
            .with(predicate::eq(dns_filter()), predicate::always())
            .returning(|_, _| Ok(vec![dec!(0.54), dec!(0.6)]));
        catalog
            .expect_find_prices()
            .with(predicate::eq(ProductFilter::default()), predicate::always())
            .returning(|_, _| Ok(vec![]));

        let mut project = project_with(vec![
            CostComponent {
                name: "DNS queries".to_string(),
                product_filter: Some(dns_filter()),
                ..Default::default()
            },
            CostComponent {
                name: "No filter".to_string(),
                ..Default::default()
            },
            CostComponent {
                name: "Optional".to_string(),
                product_filter: Some(ProductFilter::default()),
                ignore_if_missing_price: true,
                ..Default::default()
            },
        ]);

        apply_prices(&mut project, &catalog).unwrap();

        let resource = &project.resources[0];
        let names: Vec<&str> = resource.cost_components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["DNS queries", "No filter"]);
        assert_eq!(resource.cost_components[0].price(), dec!(0.54));
        assert!(!resource.cost_components[1].price_not_found());
        assert!(resource.sub_resources[0].cost_components[0].price_not_found());
    }

    #[test]
    fn test_apply_prices_propagates_catalog_errors() {
        let mut catalog = MockPriceCatalog::new();
        catalog
            .expect_find_prices()
            .returning(|_, _| Err(EstimationError::PriceCatalog("unavailable".to_string())));

        let mut project = project_with(vec![]);
        let err = apply_prices(&mut project, &catalog).unwrap_err();
        assert!(err.to_string().contains("unavailable"));
    }

    #[test]
    fn test_apply_prices_treats_invalid_filter_as_not_found() {
        let mut catalog = MockPriceCatalog::new();
        catalog.expect_find_prices().returning(|_, _| {
            Err(EstimationError::InvalidFilter {
                filter: "/(x/".to_string(),
                details: "unclosed group".to_string(),
            })
        });

        let mut project = project_with(vec![]);
        apply_prices(&mut project, &catalog).unwrap();
        assert!(project.resources[0].sub_resources[0].cost_components[0].price_not_found());
    }

    #[test]
    fn test_skipped_resources_are_not_priced() {
        let catalog = MockPriceCatalog::new();
        let mut project = project_with(vec![]);
        project.resources[0].is_skipped = true;

        apply_prices(&mut project, &catalog).unwrap();
        assert!(!project.resources[0].sub_resources[0].cost_components[0].price_not_found());
    }

    #[test]
    fn test_custom_price_skips_catalog() {
        let catalog = MockPriceCatalog::new();
        let mut project = project_with(vec![CostComponent {
            name: "Speech requests".to_string(),
            custom_price: Some(dec!(5.5)),
            monthly_quantity: Some(dec!(4)),
            ..Default::default()
        }]);
        project.resources[0].sub_resources.clear();

        apply_prices(&mut project, &catalog).unwrap();
        project.calculate_costs();

        let component = &project.resources[0].cost_components[0];
        assert_eq!(component.price(), dec!(5.5));
        assert_eq!(component.monthly_cost, Some(dec!(22)));
    }
}
