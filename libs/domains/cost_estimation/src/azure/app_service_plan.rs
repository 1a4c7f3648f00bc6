use rust_decimal::Decimal;

use super::util::product_filter;
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, PriceFilter, Resource, UsageData, UsageItem,
};

/// App Service plan billed per instance hour. Elastic premium (`EP*`),
/// consumption (`Y1`) and workflow standard (`WS*`) plans are priced by the
/// function app or logic app running on them.
#[derive(Debug, Clone, Default)]
pub struct AppServicePlan {
    pub address: String,
    pub region: String,
    pub sku_size: String,
    pub sku_capacity: i64,
    /// `Windows`, `Linux`, `app` or empty
    pub kind: String,
    pub is_dev_test: bool,
}

/// SKU pattern, product name and extra attribute filters of a plan
struct PlanSku {
    sku: String,
    product_name: String,
    extra_filters: Vec<AttributeFilter>,
}

/// `P1v2` -> `P1 ?v2` in `Premium v2 Plan`; `I1` -> `I1 ?` in `Isolated Plan`.
/// Linux v3 plans are also matched on their ARM SKU name.
fn versioned_sku(sku_size: &str, os: &str) -> PlanSku {
    let tier = if sku_size[..1].eq_ignore_ascii_case("i") { "Isolated" } else { "Premium" };

    let mut version = sku_size[2..].to_lowercase();
    if version == "v1" {
        version.clear();
    }
    let sku = format!("{} ?{version}", &sku_size[..2]).trim().to_string();

    let product_version = version.strip_prefix('m').unwrap_or(&version);
    let product_name = format!("{tier} {product_version} Plan").replace("  ", " ");

    let extra_filters = if product_version == "v3" && os == "linux" {
        vec![AttributeFilter::regex("armSkuName", format!("/{}$/i", sku.replace(' ', "_")))]
    } else {
        Vec::new()
    };

    PlanSku {
        sku,
        product_name,
        extra_filters,
    }
}

impl AppServicePlan {
    fn os(&self) -> String {
        match self.kind.to_lowercase().as_str() {
            "" | "app" => "windows".to_string(),
            kind => kind.to_string(),
        }
    }

    fn plan_sku(&self, prefix: &str, os: &str) -> PlanSku {
        let rest = &self.sku_size[1..];
        let plain = |sku: String, product_name: &str| PlanSku {
            sku,
            product_name: product_name.to_string(),
            extra_filters: Vec::new(),
        };

        if prefix == "pc" {
            return plain(format!("PC{}", &self.sku_size[2..]), "Premium Windows Container Plan");
        }
        match &prefix[..1] {
            "s" => plain(format!("S{rest}"), "Standard Plan"),
            "b" => plain(format!("B{rest}"), "Basic Plan"),
            "p" | "i" => versioned_sku(&self.sku_size, os),
            _ => plain(String::new(), "Standard Plan"),
        }
    }
}

impl CoreResource for AppServicePlan {
    fn core_type(&self) -> &'static str {
        "AppServicePlan"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        Vec::new()
    }

    fn populate_usage(&mut self, _usage: &UsageData) {}

    fn build_resource(&self) -> Option<Resource> {
        let prefix = match self.sku_size.get(..2) {
            Some(prefix) if self.sku_size.is_ascii() => prefix.to_lowercase(),
            _ => String::new(),
        };
        if prefix.is_empty() || matches!(prefix.as_str(), "ep" | "y1" | "ws") {
            return Some(Resource {
                name: self.address.clone(),
                is_skipped: true,
                no_price: true,
                ..Default::default()
            });
        }

        let os = self.os();
        let PlanSku {
            sku,
            mut product_name,
            extra_filters,
        } = self.plan_sku(&prefix, &os);

        if os != "windows" && product_name != "Premium Plan" && product_name != "Isolated Plan" {
            product_name.push_str(" - Linux");
        }

        let dev_test = self.is_dev_test && os.contains("windows") && prefix != "pc";
        let (purchase_option, name) = if dev_test {
            ("DevTestConsumption", format!("Instance usage (dev/test, {})", self.sku_size))
        } else {
            ("Consumption", format!("Instance usage ({})", self.sku_size))
        };

        let mut attribute_filters = vec![
            AttributeFilter::exact("productName", format!("Azure App Service {product_name}")),
            AttributeFilter::regex("skuName", format!("/{sku}$/i")),
        ];
        attribute_filters.extend(extra_filters);

        let capacity = if self.sku_capacity > 0 { self.sku_capacity } else { 1 };
        let instance = CostComponent {
            name,
            unit: "hours".to_string(),
            hourly_quantity: Some(Decimal::from(capacity)),
            product_filter: product_filter(
                &self.region,
                "Azure App Service",
                "Compute",
                attribute_filters,
            ),
            price_filter: Some(PriceFilter {
                purchase_option: Some(purchase_option.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        Some(Resource {
            name: self.address.clone(),
            cost_components: vec![instance],
            ..Default::default()
        })
    }
}
