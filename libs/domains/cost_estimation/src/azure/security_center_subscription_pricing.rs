use rust_decimal::Decimal;
use tracing::warn;

use super::util::{monitor_region, product_filter};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, HOUR_TO_MONTH_UNIT_MULTIPLIER, Resource,
    UsageData, UsageItem,
};

/// How a plan's usage value becomes a component quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Billing {
    /// Monthly count of billed items
    Monthly,
    /// Monthly count divided into price units
    MonthlyPer(i64),
    /// Average count billed per hour, shown per month
    Hourly,
    /// Average count divided into price units, billed per hour
    HourlyPer(i64),
    /// Average count billed per hour but quoted as a monthly quantity
    HourlyAsMonthly,
}

/// One Defender plan: what it bills and where its price lives
#[derive(Debug, Clone, Copy)]
struct DefenderPlan {
    name: &'static str,
    unit: &'static str,
    usage_key: &'static str,
    service: &'static str,
    product_name: &'static str,
    meter: &'static str,
    billing: Billing,
    /// Only priced in specific regions, so `Global` falls back to `westus2`
    regional_only: bool,
}

impl DefenderPlan {
    const fn new(
        name: &'static str,
        unit: &'static str,
        usage_key: &'static str,
        service: &'static str,
        product_name: &'static str,
        meter: &'static str,
        billing: Billing,
    ) -> Self {
        Self {
            name,
            unit,
            usage_key,
            service,
            product_name,
            meter,
            billing,
            regional_only: false,
        }
    }

    const fn regional_only(self) -> Self {
        Self {
            regional_only: true,
            ..self
        }
    }
}

const SECURITY_CENTER: &str = "Security Center";
const AZURE_DEFENDER: &str = "Azure Defender";
const ADVANCED_DATA_SECURITY: &str = "Advanced Data Security";
const THREAT_PROTECTION: &str = "Advanced Threat Protection";

const SERVERS_P1: DefenderPlan = DefenderPlan::new(
    "Defender for servers, plan 1",
    "server",
    "monthly_servers_plan_1_nodes",
    SECURITY_CENTER,
    "Microsoft Defender for Servers",
    "Standard P1 Node",
    Billing::HourlyAsMonthly,
);
const SERVERS_P2: DefenderPlan = DefenderPlan::new(
    "Defender for servers, plan 2",
    "server",
    "monthly_servers_plan_2_nodes",
    SECURITY_CENTER,
    "Microsoft Defender for Servers",
    "Standard P2 Node",
    Billing::HourlyAsMonthly,
);
const CONTAINERS: DefenderPlan = DefenderPlan::new(
    "Defender for containers",
    "vCore",
    "monthly_containers_vcores",
    AZURE_DEFENDER,
    "Microsoft Defender for Containers",
    "Standard vCore vCore Pack",
    Billing::HourlyAsMonthly,
);
const SQL_AZURE_CONNECTED: DefenderPlan = DefenderPlan::new(
    "Defender for SQL, Azure-connected",
    "instance",
    "monthly_sql_azure_connected_instances",
    ADVANCED_DATA_SECURITY,
    "Microsoft Defender for SQL",
    "Standard Node",
    Billing::Monthly,
);
const SQL_OUTSIDE_AZURE: DefenderPlan = DefenderPlan::new(
    "Defender for SQL, outside Azure",
    "vCore",
    "monthly_sql_outside_azure_vcores",
    ADVANCED_DATA_SECURITY,
    "Microsoft Defender for SQL",
    "Standard vCore",
    Billing::HourlyAsMonthly,
);
const MYSQL: DefenderPlan = DefenderPlan::new(
    "Defender for MySQL",
    "instance",
    "monthly_mysql_instances",
    THREAT_PROTECTION,
    "Microsoft Defender for MySQL",
    "Standard Node",
    Billing::Monthly,
);
const POSTGRESQL: DefenderPlan = DefenderPlan::new(
    "Defender for PostgreSQL",
    "instance",
    "monthly_postgresql_instances",
    THREAT_PROTECTION,
    "Microsoft Defender for PostgreSQL",
    "Standard Node",
    Billing::Monthly,
);
const MARIADB: DefenderPlan = DefenderPlan::new(
    "Defender for MariaDB",
    "instance",
    "monthly_mariadb_instances",
    AZURE_DEFENDER,
    "Microsoft Defender for MariaDB",
    "Standard Instance",
    Billing::Hourly,
)
.regional_only();
const COSMOS_DB: DefenderPlan = DefenderPlan::new(
    "Defender for Cosmos DB",
    "RU/s x 100",
    "cosmosdb_request_units",
    AZURE_DEFENDER,
    "Microsoft Defender for Azure Cosmos DB",
    "Standard 100 RU/s",
    Billing::HourlyPer(100),
);
const STORAGE: DefenderPlan = DefenderPlan::new(
    "Defender for storage",
    "storage account",
    "monthly_storage_accounts",
    THREAT_PROTECTION,
    "Microsoft Defender for Storage",
    "Standard Node",
    Billing::Hourly,
);
const APP_SERVICE: DefenderPlan = DefenderPlan::new(
    "Defender for app service",
    "node",
    "monthly_app_service_nodes",
    SECURITY_CENTER,
    "Microsoft Defender for App Service",
    "Standard Node",
    Billing::Hourly,
);
const KEY_VAULT: DefenderPlan = DefenderPlan::new(
    "Defender for Key Vault",
    "10K transactions",
    "monthly_key_vault_transactions",
    THREAT_PROTECTION,
    "Microsoft Defender for Key Vault",
    "Standard Transactions",
    Billing::MonthlyPer(10_000),
);
const ARM: DefenderPlan = DefenderPlan::new(
    "Defender for ARM",
    "1M API calls",
    "monthly_arm_api_calls",
    THREAT_PROTECTION,
    "Microsoft Defender for Resource Manager",
    "Standard Events",
    Billing::MonthlyPer(1_000_000),
)
.regional_only();
const DNS: DefenderPlan = DefenderPlan::new(
    "Defender for DNS",
    "1M queries",
    "monthly_dns_queries",
    THREAT_PROTECTION,
    "Microsoft Defender for DNS",
    "Standard Queries",
    Billing::MonthlyPer(1_000_000),
)
.regional_only();
const KUBERNETES: DefenderPlan = DefenderPlan::new(
    "Defender for kubernetes",
    "core",
    "monthly_kubernetes_cores",
    THREAT_PROTECTION,
    "Microsoft Defender for Kubernetes",
    "Standard Cores",
    Billing::Hourly,
);
const CONTAINER_REGISTRY: DefenderPlan = DefenderPlan::new(
    "Defender for container registries",
    "image",
    "monthly_container_registry_images",
    THREAT_PROTECTION,
    "Microsoft Defender for Container Registries",
    "Standard Images",
    Billing::Monthly,
);

const ALL_PLANS: &[DefenderPlan] = &[
    SERVERS_P1,
    SERVERS_P2,
    CONTAINERS,
    CONTAINER_REGISTRY,
    SQL_AZURE_CONNECTED,
    SQL_OUTSIDE_AZURE,
    MYSQL,
    POSTGRESQL,
    MARIADB,
    COSMOS_DB,
    STORAGE,
    APP_SERVICE,
    KEY_VAULT,
    ARM,
    DNS,
    KUBERNETES,
];

/// Plans billed for a `resource_type`, `None` for unknown types
fn plans_for(resource_type: &str) -> Option<&'static [DefenderPlan]> {
    let plans: &'static [DefenderPlan] = match resource_type.to_lowercase().as_str() {
        "appservices" => &[APP_SERVICE],
        "containerregistry" => &[CONTAINER_REGISTRY],
        "keyvaults" => &[KEY_VAULT],
        "kubernetesservice" => &[KUBERNETES],
        "sqlservers" => &[SQL_OUTSIDE_AZURE],
        "sqlservervirtualmachines" => &[SQL_AZURE_CONNECTED],
        "storageaccounts" => &[STORAGE],
        "virtualmachines" => &[SERVERS_P1, SERVERS_P2],
        "arm" => &[ARM],
        "dns" => &[DNS],
        "opensourcerelationaldatabases" => &[MYSQL, POSTGRESQL, MARIADB],
        "containers" => &[CONTAINERS],
        "cosmosdbs" => &[COSMOS_DB],
        _ => return None,
    };
    Some(plans)
}

/// Microsoft Defender for Cloud plan enabled on a subscription
#[derive(Debug, Clone, Default)]
pub struct SecurityCenterSubscriptionPricing {
    pub address: String,
    pub region: String,
    /// `Free` or `Standard`
    pub tier: String,
    /// Protected resource type, e.g. `VirtualMachines` or `StorageAccounts`
    pub resource_type: String,

    /// Usage for every plan, keyed by the plan's usage key
    pub usage: UsageData,
}

impl SecurityCenterSubscriptionPricing {
    fn plan_cost_component(&self, plan: &DefenderPlan) -> CostComponent {
        let mut region = monitor_region(&self.region);
        if plan.regional_only && region == "Global" {
            region = "westus2";
        }

        let value = self.usage.get_decimal(plan.usage_key);
        let per = |divisor: i64| value.map(|v| v / Decimal::from(divisor));
        let (unit_multiplier, hourly_quantity, monthly_quantity) = match plan.billing {
            Billing::Monthly => (Decimal::ONE, None, value),
            Billing::MonthlyPer(divisor) => (Decimal::ONE, None, per(divisor)),
            Billing::Hourly => (HOUR_TO_MONTH_UNIT_MULTIPLIER, value, None),
            Billing::HourlyPer(divisor) => (HOUR_TO_MONTH_UNIT_MULTIPLIER, per(divisor), None),
            Billing::HourlyAsMonthly => (
                HOUR_TO_MONTH_UNIT_MULTIPLIER,
                None,
                value.map(|v| v * HOUR_TO_MONTH_UNIT_MULTIPLIER),
            ),
        };

        CostComponent {
            name: plan.name.to_string(),
            unit: plan.unit.to_string(),
            unit_multiplier,
            hourly_quantity,
            monthly_quantity,
            product_filter: product_filter(
                region,
                plan.service,
                "Security",
                vec![
                    AttributeFilter::exact("productName", plan.product_name),
                    AttributeFilter::exact("meterName", plan.meter),
                ],
            ),
            ..Default::default()
        }
    }
}

impl CoreResource for SecurityCenterSubscriptionPricing {
    fn core_type(&self) -> &'static str {
        "SecurityCenterSubscriptionPricing"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        ALL_PLANS
            .iter()
            .map(|plan| match plan.billing {
                Billing::MonthlyPer(_) => UsageItem::int(plan.usage_key),
                _ => UsageItem::float(plan.usage_key),
            })
            .collect()
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.usage = usage.clone();
    }

    fn build_resource(&self) -> Option<Resource> {
        if self.tier.eq_ignore_ascii_case("free") {
            return Some(Resource {
                name: self.address.clone(),
                is_skipped: true,
                no_price: true,
                ..Default::default()
            });
        }

        let cost_components = match plans_for(&self.resource_type) {
            Some(plans) => plans.iter().map(|plan| self.plan_cost_component(plan)).collect(),
            None => {
                warn!(
                    address = %self.address,
                    resource_type = %self.resource_type,
                    "Unknown Defender resource type"
                );
                Vec::new()
            }
        };

        Some(Resource {
            name: self.address.clone(),
            cost_components,
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}
