use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::util::{price_filter_consumption, price_filter_tier, product_filter, regex_filter};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, HOUR_TO_MONTH_UNIT_MULTIPLIER, ProductFilter,
    Resource, UsageData, UsageItem,
};

/// Elastic premium SKU -> (vCPU, memory GB)
fn premium_sku_size(sku_name: &str) -> Option<(i64, Decimal)> {
    match sku_name {
        "ep1" => Some((1, dec!(3.5))),
        "ep2" => Some((2, dec!(7))),
        "ep3" => Some((4, dec!(14))),
        _ => None,
    }
}

const MIN_MEMORY_MB: i64 = 128;
const MIN_DURATION_MS: i64 = 100;

/// Function app on a consumption or elastic premium plan
#[derive(Debug, Clone, Default)]
pub struct FunctionApp {
    pub address: String,
    pub region: String,
    /// Lower-cased plan SKU, e.g. `ep1` or `y1`
    pub sku_name: String,
    /// `premium` or `consumption`
    pub tier: String,
    pub os_type: String,

    pub monthly_executions: Option<i64>,
    pub execution_duration_ms: Option<i64>,
    pub memory_mb: Option<i64>,
    pub instances: Option<i64>,
}

impl FunctionApp {
    fn functions_filter(&self, attribute_filters: Vec<AttributeFilter>) -> Option<ProductFilter> {
        product_filter(&self.region, "Functions", "Compute", attribute_filters)
    }

    fn premium_cost_component(
        &self,
        name: String,
        unit: &str,
        meter: &str,
        per_instance: Decimal,
    ) -> CostComponent {
        let instances = Decimal::from(self.instances.unwrap_or(1));
        CostComponent {
            name,
            unit: unit.to_string(),
            unit_multiplier: HOUR_TO_MONTH_UNIT_MULTIPLIER,
            hourly_quantity: Some(instances * per_instance),
            product_filter: self.functions_filter(vec![AttributeFilter::regex(
                "meterName",
                regex_filter(&format!("{meter}$")),
            )]),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }

    /// Memory is rounded up to 128MB steps and duration is at least 100ms
    fn gb_seconds(&self) -> Option<Decimal> {
        let memory = self.memory_mb?.max(MIN_MEMORY_MB);
        let duration = Decimal::from(self.execution_duration_ms?.max(MIN_DURATION_MS));
        let executions = Decimal::from(self.monthly_executions?);

        let step = Decimal::from(MIN_MEMORY_MB);
        let rounded_memory = (Decimal::from(memory) / step).ceil() * step;
        let duration_seconds = executions * duration * dec!(0.001);
        Some(duration_seconds * rounded_memory / dec!(1024))
    }

    fn execution_time_cost_component(&self) -> CostComponent {
        CostComponent {
            name: "Execution time".to_string(),
            unit: "GB-seconds".to_string(),
            monthly_quantity: self.gb_seconds(),
            product_filter: self.functions_filter(vec![
                AttributeFilter::regex("meterName", regex_filter("Execution Time$")),
                AttributeFilter::exact("skuName", "Standard"),
            ]),
            price_filter: price_filter_tier("400000"),
            usage_based: true,
            ..Default::default()
        }
    }

    fn executions_cost_component(&self) -> CostComponent {
        CostComponent {
            name: "Executions".to_string(),
            unit: "1M requests".to_string(),
            unit_multiplier: dec!(100000),
            monthly_quantity: self
                .monthly_executions
                .map(|executions| Decimal::from(executions) / dec!(10)),
            product_filter: self.functions_filter(vec![
                AttributeFilter::regex("meterName", regex_filter("Total Executions$")),
                AttributeFilter::exact("skuName", "Standard"),
            ]),
            price_filter: price_filter_tier("100000"),
            usage_based: true,
            ..Default::default()
        }
    }
}

impl CoreResource for FunctionApp {
    fn core_type(&self) -> &'static str {
        "FunctionApp"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::int("monthly_executions"),
            UsageItem::int("execution_duration_ms"),
            UsageItem::int("memory_mb"),
            UsageItem::int("instances"),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_executions = usage.get_i64("monthly_executions");
        self.execution_duration_ms = usage.get_i64("execution_duration_ms");
        self.memory_mb = usage.get_i64("memory_mb");
        self.instances = usage.get_i64("instances");
    }

    fn build_resource(&self) -> Option<Resource> {
        let cost_components = if self.tier == "premium" {
            let sku = self.sku_name.to_uppercase();
            match premium_sku_size(&self.sku_name) {
                Some((vcpu, memory_gb)) => vec![
                    self.premium_cost_component(
                        format!("vCPU ({sku})"),
                        "vCPU",
                        "vCPU Duration",
                        Decimal::from(vcpu),
                    ),
                    self.premium_cost_component(
                        format!("Memory ({sku})"),
                        "GB",
                        "Memory Duration",
                        memory_gb,
                    ),
                ],
                None => Vec::new(),
            }
        } else {
            vec![self.execution_time_cost_component(), self.executions_cost_component()]
        };

        Some(Resource {
            name: self.address.clone(),
            cost_components,
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}
