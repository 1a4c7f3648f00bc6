use rust_decimal::Decimal;

use super::managed_disk::ManagedDiskData;
use super::util::{convert_region, price_filter_consumption, price_filter_tier, product_filter};
use super::virtual_machine::{
    disk_sub_resource, linux_virtual_machine_cost_component, windows_virtual_machine_cost_component,
};
use crate::schema::{AttributeFilter, CoreResource, CostComponent, Resource, UsageData, UsageItem};

const DEFAULT_OS_DISK_SIZE_GB: i64 = 128;

/// Node pool settings shared by the cluster's default pool and standalone pools
#[derive(Debug, Clone, Default)]
pub struct NodePoolConfig {
    pub vm_size: String,
    /// `Linux` (default) or `Windows`
    pub os_type: Option<String>,
    /// `Managed` (default) or `Ephemeral`
    pub os_disk_type: Option<String>,
    pub os_disk_size_gb: Option<i64>,
    pub node_count: Option<i64>,
}

/// Premium storage when any size suffix contains `s`, e.g. `Standard_D2s_v3`
fn node_storage_type(vm_size: &str) -> &'static str {
    let premium = vm_size
        .split('_')
        .skip(1)
        .filter(|part| !part.eq_ignore_ascii_case("promo"))
        .any(|part| part.to_lowercase().contains('s'));

    if premium { "Premium_LRS" } else { "Standard_LRS" }
}

/// A node pool priced as one VM and OS disk, multiplied by the node count
pub fn node_pool_resource(
    name: &str,
    region: &str,
    pool: &NodePoolConfig,
    node_count: Decimal,
    monthly_hours: Option<Decimal>,
    is_dev_test: bool,
) -> Resource {
    let is_windows = pool
        .os_type
        .as_deref()
        .is_some_and(|os| os.eq_ignore_ascii_case("windows"));

    let compute = if is_windows {
        windows_virtual_machine_cost_component(
            region,
            &pool.vm_size,
            "",
            monthly_hours,
            is_dev_test,
        )
    } else {
        linux_virtual_machine_cost_component(region, &pool.vm_size, monthly_hours)
    };

    let managed_os_disk = pool
        .os_disk_type
        .as_deref()
        .is_none_or(|t| t.eq_ignore_ascii_case("Managed"));

    let sub_resources = if managed_os_disk {
        let disk = ManagedDiskData::new(
            node_storage_type(&pool.vm_size),
            Some(
                pool.os_disk_size_gb
                    .filter(|size| *size > 0)
                    .unwrap_or(DEFAULT_OS_DISK_SIZE_GB),
            ),
        );
        vec![disk_sub_resource("os_disk", region, &disk, None)]
    } else {
        Vec::new()
    };

    let mut resource = Resource {
        name: name.to_string(),
        cost_components: vec![compute],
        sub_resources,
        ..Default::default()
    };
    resource.multiply_quantities(node_count);
    resource
}

pub fn lb_data_processed_cost_component(
    region: &str,
    monthly_data_processed_gb: Option<Decimal>,
) -> CostComponent {
    CostComponent {
        name: "Data processed".to_string(),
        unit: "GB".to_string(),
        monthly_quantity: monthly_data_processed_gb,
        product_filter: product_filter(
            region,
            "Load Balancer",
            "Networking",
            vec![AttributeFilter::exact("meterName", "Standard Data Processed")],
        ),
        price_filter: price_filter_consumption(),
        usage_based: true,
        ..Default::default()
    }
}

pub fn hosted_public_zone_cost_component(region: &str) -> CostComponent {
    CostComponent {
        name: "Hosted zone".to_string(),
        unit: "months".to_string(),
        monthly_quantity: Some(Decimal::ONE),
        product_filter: product_filter(
            region,
            "Azure DNS",
            "Networking",
            vec![AttributeFilter::exact("meterName", "Public Zone")],
        ),
        price_filter: price_filter_tier("0"),
        ..Default::default()
    }
}

/// DNS zone billing region for a resource location
pub fn dns_zone_region(region: &str) -> &'static str {
    let region = region.to_lowercase();
    if region.starts_with("usgov") {
        "US Gov Zone 1"
    } else if region.starts_with("germany") {
        "DE Zone 1"
    } else if region.starts_with("china") {
        "Zone 1 (China)"
    } else {
        "Zone 1"
    }
}

/// Managed Kubernetes cluster.
///
/// The control plane is free unless the uptime SLA tier is selected. The
/// default node pool, the standard load balancer and the HTTP application
/// routing DNS zone are billed as sub-resources.
#[derive(Debug, Clone, Default)]
pub struct KubernetesCluster {
    pub address: String,
    pub region: String,
    /// `Free` (default), `Paid` or `Standard`
    pub sku_tier: Option<String>,
    pub load_balancer_sku: Option<String>,
    pub default_node_pool: NodePoolConfig,
    pub http_application_routing_enabled: bool,
    pub is_dev_test: bool,

    pub default_node_pool_nodes: Option<i64>,
    pub default_node_pool_monthly_hrs: Option<Decimal>,
    pub load_balancer_monthly_data_processed_gb: Option<i64>,
}

impl KubernetesCluster {
    fn has_uptime_sla(&self) -> bool {
        self.sku_tier
            .as_deref()
            .is_some_and(|tier| {
                tier.eq_ignore_ascii_case("paid") || tier.eq_ignore_ascii_case("standard")
            })
    }

    fn uptime_sla_cost_component(&self) -> CostComponent {
        CostComponent {
            name: "Uptime SLA".to_string(),
            unit: "hours".to_string(),
            hourly_quantity: Some(Decimal::ONE),
            product_filter: product_filter(
                &self.region,
                "Azure Kubernetes Service",
                "Compute",
                vec![AttributeFilter::exact("meterName", "Standard Uptime SLA")],
            ),
            price_filter: price_filter_consumption(),
            ..Default::default()
        }
    }

    /// Usage `nodes` wins over the configured count; monthly hours only apply with it
    fn node_count_and_hours(&self) -> (Decimal, Option<Decimal>) {
        match self.default_node_pool_nodes.filter(|n| *n > 0) {
            Some(nodes) => (Decimal::from(nodes), self.default_node_pool_monthly_hrs),
            None => {
                let configured = self.default_node_pool.node_count.filter(|n| *n > 0).unwrap_or(1);
                (Decimal::from(configured), None)
            }
        }
    }
}

impl CoreResource for KubernetesCluster {
    fn core_type(&self) -> &'static str {
        "KubernetesCluster"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::sub_resource(
                "load_balancer",
                vec![UsageItem::int("monthly_data_processed_gb")],
            ),
            UsageItem::sub_resource(
                "default_node_pool",
                vec![UsageItem::int("nodes"), UsageItem::float("monthly_hrs")],
            ),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        if let Some(lb) = usage.get_sub_usage("load_balancer") {
            self.load_balancer_monthly_data_processed_gb = lb.get_i64("monthly_data_processed_gb");
        }
        if let Some(pool) = usage.get_sub_usage("default_node_pool") {
            self.default_node_pool_nodes = pool.get_i64("nodes");
            self.default_node_pool_monthly_hrs = pool.get_decimal("monthly_hrs");
        }
    }

    fn build_resource(&self) -> Option<Resource> {
        let mut cost_components = Vec::new();
        if self.has_uptime_sla() {
            cost_components.push(self.uptime_sla_cost_component());
        }

        let (node_count, monthly_hours) = self.node_count_and_hours();
        let mut sub_resources = vec![node_pool_resource(
            "default_node_pool",
            &self.region,
            &self.default_node_pool,
            node_count,
            monthly_hours,
            self.is_dev_test,
        )];

        let standard_lb = self
            .load_balancer_sku
            .as_deref()
            .is_some_and(|sku| sku.eq_ignore_ascii_case("standard"));
        if standard_lb {
            sub_resources.push(Resource {
                name: "Load Balancer".to_string(),
                cost_components: vec![lb_data_processed_cost_component(
                    convert_region(&self.region),
                    self.load_balancer_monthly_data_processed_gb.map(Decimal::from),
                )],
                ..Default::default()
            });
        }

        if self.http_application_routing_enabled {
            let zone = dns_zone_region(&self.region);
            sub_resources.push(Resource {
                name: "DNS".to_string(),
                cost_components: vec![hosted_public_zone_cost_component(zone)],
                ..Default::default()
            });
        }

        Some(Resource {
            name: self.address.clone(),
            cost_components,
            sub_resources,
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn cluster() -> KubernetesCluster {
        KubernetesCluster {
            address: "azurerm_kubernetes_cluster.main".to_string(),
            region: "eastus".to_string(),
            default_node_pool: NodePoolConfig {
                vm_size: "Standard_D2_v2".to_string(),
                node_count: Some(3),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_node_storage_type() {
        assert_eq!(node_storage_type("Standard_D2s_v3"), "Premium_LRS");
        assert_eq!(node_storage_type("Standard_D2_v2"), "Standard_LRS");
        assert_eq!(node_storage_type("Standard_D2_v2_Promo"), "Standard_LRS");
    }

    #[test]
    fn test_free_cluster_bills_node_pool_only() {
        let resource = cluster().build_resource().unwrap();

        assert!(resource.cost_components.is_empty());
        assert_eq!(resource.sub_resources.len(), 1);

        let pool = &resource.sub_resources[0];
        assert_eq!(pool.name, "default_node_pool");
        assert_eq!(pool.cost_components[0].monthly_quantity, Some(dec!(2190)));
        assert_eq!(pool.sub_resources[0].cost_components[0].name, "Storage (S10)");
        assert_eq!(
            pool.sub_resources[0].cost_components[0].monthly_quantity,
            Some(dec!(3))
        );
    }

    #[test]
    fn test_paid_tier_lb_and_dns() {
        let aks = KubernetesCluster {
            sku_tier: Some("Standard".to_string()),
            load_balancer_sku: Some("standard".to_string()),
            http_application_routing_enabled: true,
            ..cluster()
        };
        let resource = aks.build_resource().unwrap();

        assert_eq!(resource.cost_components[0].name, "Uptime SLA");
        let names: Vec<&str> = resource.sub_resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["default_node_pool", "Load Balancer", "DNS"]);

        let lb = &resource.sub_resources[1].cost_components[0];
        assert_eq!(lb.product_filter.as_ref().unwrap().region.as_deref(), Some("Global"));
        assert!(lb.monthly_quantity.is_none());

        let dns = &resource.sub_resources[2].cost_components[0];
        assert_eq!(dns.product_filter.as_ref().unwrap().region.as_deref(), Some("Zone 1"));
    }

    #[test]
    fn test_node_usage_overrides_count_and_hours() {
        let mut aks = KubernetesCluster {
            load_balancer_sku: Some("Standard".to_string()),
            ..cluster()
        };
        let usage = UsageData::from_value(
            "azurerm_kubernetes_cluster.main",
            &json!({
                "default_node_pool": {"nodes": 2, "monthly_hrs": 100},
                "load_balancer": {"monthly_data_processed_gb": 50}
            }),
        )
        .unwrap();
        aks.populate_usage(&usage);

        let resource = aks.build_resource().unwrap();
        assert_eq!(
            resource.sub_resources[0].cost_components[0].monthly_quantity,
            Some(dec!(200))
        );
        assert_eq!(
            resource.sub_resources[1].cost_components[0].monthly_quantity,
            Some(dec!(50))
        );
    }

    #[test]
    fn test_ephemeral_os_disk_is_free() {
        let pool = NodePoolConfig {
            vm_size: "Standard_DS2_v2".to_string(),
            os_disk_type: Some("Ephemeral".to_string()),
            ..Default::default()
        };
        let resource = node_pool_resource("pool", "eastus", &pool, dec!(2), None, false);
        assert!(resource.sub_resources.is_empty());
    }

    #[test]
    fn test_dns_zone_region() {
        assert_eq!(dns_zone_region("usgovvirginia"), "US Gov Zone 1");
        assert_eq!(dns_zone_region("germanywestcentral"), "DE Zone 1");
        assert_eq!(dns_zone_region("chinaeast2"), "Zone 1 (China)");
        assert_eq!(dns_zone_region("uksouth"), "Zone 1");
    }
}
