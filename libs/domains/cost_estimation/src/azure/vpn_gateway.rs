use rust_decimal::Decimal;
use strum::{Display, EnumString};

use super::util::{price_filter_consumption, product_filter};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, HOUR_TO_MONTH_UNIT_MULTIPLIER, Resource,
    UsageData, UsageItem,
};

/// Site-to-site or point-to-site Virtual WAN gateway
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
pub enum VpnGatewayType {
    #[default]
    S2S,
    P2S,
}

#[derive(Debug, Clone, Default)]
pub struct VpnGateway {
    pub address: String,
    pub region: String,
    pub scale_units: i64,
    pub gateway_type: VpnGatewayType,

    /// Point-to-site connection hours per month
    pub monthly_p2s_connections_hrs: Option<Decimal>,
}

impl VpnGateway {
    fn wan_cost_component(&self, name: String, sku: &str) -> CostComponent {
        CostComponent {
            name,
            product_filter: product_filter(
                &self.region,
                "Virtual WAN",
                "Networking",
                vec![AttributeFilter::exact("skuName", format!("VPN {} {sku}", self.gateway_type))],
            ),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }
}

impl CoreResource for VpnGateway {
    fn core_type(&self) -> &'static str {
        "VPNGateway"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![UsageItem::float("monthly_p2s_connections_hrs")]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_p2s_connections_hrs = usage.get_decimal("monthly_p2s_connections_hrs");
    }

    fn build_resource(&self) -> Option<Resource> {
        let kind = self.gateway_type;
        let mut cost_components = vec![CostComponent {
            unit: "scale units".to_string(),
            unit_multiplier: HOUR_TO_MONTH_UNIT_MULTIPLIER,
            hourly_quantity: Some(Decimal::from(self.scale_units)),
            ..self.wan_cost_component(format!("{kind} scale units (500 Mbps)"), "Scale Unit")
        }];

        if kind == VpnGatewayType::S2S {
            return Some(Resource {
                name: self.address.clone(),
                cost_components,
                ..Default::default()
            });
        }

        cost_components.push(CostComponent {
            unit: "hours".to_string(),
            monthly_quantity: Some(self.monthly_p2s_connections_hrs.unwrap_or_default()),
            usage_based: true,
            ..self.wan_cost_component(format!("{kind} connections"), "Connection Unit")
        });

        Some(Resource {
            name: self.address.clone(),
            cost_components,
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn gateway(gateway_type: &str) -> VpnGateway {
        VpnGateway {
            address: "azurerm_vpn_gateway.gw".to_string(),
            region: "eastus".to_string(),
            scale_units: 2,
            gateway_type: gateway_type.parse().unwrap(),
            ..Default::default()
        }
    }

    #[test]
    fn test_site_to_site_bills_scale_units_only() {
        let resource = gateway("S2S").build_resource().unwrap();

        assert_eq!(resource.cost_components.len(), 1);
        let units = &resource.cost_components[0];
        assert_eq!(units.name, "S2S scale units (500 Mbps)");
        assert_eq!(units.hourly_quantity, Some(dec!(2)));
        let filters = &units.product_filter.as_ref().unwrap().attribute_filters;
        assert_eq!(filters[0], AttributeFilter::exact("skuName", "VPN S2S Scale Unit"));
        assert!(resource.usage_schema.is_empty());
    }

    #[test]
    fn test_point_to_site_bills_connection_hours() {
        let mut gateway = gateway("P2S");
        let resource = gateway.build_resource().unwrap();
        assert_eq!(resource.cost_components[1].monthly_quantity, Some(dec!(0)));

        gateway.monthly_p2s_connections_hrs = Some(dec!(1460));
        let resource = gateway.build_resource().unwrap();
        let connections = &resource.cost_components[1];
        assert_eq!(connections.name, "P2S connections");
        assert_eq!(connections.monthly_quantity, Some(dec!(1460)));
        let filters = &connections.product_filter.as_ref().unwrap().attribute_filters;
        assert_eq!(filters[0], AttributeFilter::exact("skuName", "VPN P2S Connection Unit"));
    }

    #[test]
    fn test_unknown_gateway_type_is_rejected() {
        assert!("ExpressRoute".parse::<VpnGatewayType>().is_err());
    }
}
