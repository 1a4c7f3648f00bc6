use rust_decimal::Decimal;

use super::util::{VENDOR_NAME, price_filter_consumption, product_filter, regex_filter};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, ProductFilter, Resource, UsageData, UsageItem,
};

/// Peering between two virtual networks. Traffic within a region is billed at
/// the global intra-region rate, otherwise at the billing zones' transfer rates.
#[derive(Debug, Clone, Default)]
pub struct VirtualNetworkPeering {
    pub address: String,
    pub source_region: String,
    pub destination_region: String,
    /// Billing zone of the source network, e.g. `Zone 1`
    pub source_zone: String,
    pub destination_zone: String,

    pub data_processed_gb: Option<Decimal>,
}

impl VirtualNetworkPeering {
    fn is_intra_region(&self) -> bool {
        self.source_region == self.destination_region
    }

    fn transfer_cost_component(&self, direction: &str, zone: &str) -> CostComponent {
        let (name, product_filter) = if self.is_intra_region() {
            (
                format!("{direction} data processed (Global)"),
                product_filter(
                    "Global",
                    "Virtual Network",
                    "Networking",
                    vec![AttributeFilter::exact("meterName", format!("Intra-Region {direction}"))],
                ),
            )
        } else {
            let filter = ProductFilter {
                vendor_name: Some(VENDOR_NAME.to_string()),
                region: Some(zone.to_string()),
                service: Some("VPN Gateway".to_string()),
                attribute_filters: vec![
                    AttributeFilter::regex("serviceFamily", regex_filter("Networking")),
                    AttributeFilter::regex("productName", regex_filter("VPN Gateway Bandwidth")),
                    AttributeFilter::regex(
                        "meterName",
                        regex_filter("Inter-Virtual Network Data Transfer Out"),
                    ),
                ],
                ..Default::default()
            };
            (format!("{direction} data processed ({zone})"), Some(filter))
        };

        CostComponent {
            name,
            unit: "GB".to_string(),
            monthly_quantity: self.data_processed_gb,
            product_filter,
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }
}

impl CoreResource for VirtualNetworkPeering {
    fn core_type(&self) -> &'static str {
        "VirtualNetworkPeering"
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![UsageItem::float("data_processed_gb")]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.data_processed_gb = usage.get_decimal("data_processed_gb");
    }

    fn build_resource(&self) -> Option<Resource> {
        Some(Resource {
            name: self.address.clone(),
            cost_components: vec![
                self.transfer_cost_component("Ingress", &self.destination_zone),
                self.transfer_cost_component("Egress", &self.source_zone),
            ],
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}
