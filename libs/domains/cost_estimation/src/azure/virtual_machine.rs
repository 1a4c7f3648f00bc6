use rust_decimal::Decimal;

use super::managed_disk::{ManagedDiskData, managed_disk_cost_components};
use super::util::{price_filter_consumption, product_filter, regex_filter};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, HOUR_TO_MONTH_UNIT_MULTIPLIER, PriceFilter,
    Resource, UsageData, UsageItem,
};

const NOT_SPOT_SKU: &str = "/^(?!.*(Low Priority|Spot)$).*$/i";
const NOT_EXPIRED_METER: &str = "/^(?!.*(Expired|Free)$).*$/i";

/// Usage schema of a nested disk, e.g. `os_disk`
pub(crate) fn disk_usage_schema(key: &str) -> UsageItem {
    UsageItem::sub_resource(key, vec![UsageItem::int("monthly_disk_operations")])
}

/// `monthly_disk_operations` of the nested disk usage under `key`
pub(crate) fn disk_operations(usage: &UsageData, key: &str) -> Option<i64> {
    usage
        .get_sub_usage(key)
        .and_then(|disk| disk.get_i64("monthly_disk_operations"))
}

fn compute_price_filter(purchase_option: &str) -> Option<PriceFilter> {
    Some(PriceFilter {
        purchase_option: Some(purchase_option.to_string()),
        unit: Some("1 Hour".to_string()),
        ..Default::default()
    })
}

/// Linux compute billed per hour, defaulting to a full month
pub fn linux_virtual_machine_cost_component(
    region: &str,
    instance_type: &str,
    monthly_hours: Option<Decimal>,
) -> CostComponent {
    let lower = instance_type.to_lowercase();
    let (instance_type, product_name) = if lower.starts_with("basic_") {
        (instance_type.to_string(), "/Series Basic$/")
    } else if lower.starts_with("standard_") {
        (instance_type.to_string(), "/Series( Linux)?$/i")
    } else {
        (format!("Standard_{instance_type}"), "/Series( Linux)?$/i")
    };

    CostComponent {
        name: format!("Instance usage (Linux, pay as you go, {instance_type})"),
        unit: "hours".to_string(),
        monthly_quantity: Some(monthly_hours.unwrap_or(HOUR_TO_MONTH_UNIT_MULTIPLIER)),
        product_filter: product_filter(
            region,
            "Virtual Machines",
            "Compute",
            vec![
                AttributeFilter::regex("meterName", NOT_EXPIRED_METER),
                AttributeFilter::regex("skuName", NOT_SPOT_SKU),
                AttributeFilter::regex("armSkuName", format!("/^{instance_type}$/i")),
                AttributeFilter::regex("productName", product_name),
            ],
        ),
        price_filter: compute_price_filter("Consumption"),
        ..Default::default()
    }
}

/// Windows compute; hybrid benefit and dev/test use dev/test pricing
pub fn windows_virtual_machine_cost_component(
    region: &str,
    instance_type: &str,
    license_type: &str,
    monthly_hours: Option<Decimal>,
    is_dev_test: bool,
) -> CostComponent {
    let (instance_type, product_name) = if instance_type.starts_with("Basic_") {
        (instance_type.to_string(), "/Basic Windows$/")
    } else if instance_type.starts_with("Standard_") {
        (instance_type.to_string(), "/(Series )?Windows$/i")
    } else {
        (format!("Standard_{instance_type}"), "/(Series )?Windows$/i")
    };

    let hybrid_benefit = matches!(
        license_type.to_lowercase().as_str(),
        "windows_client" | "windows_server"
    );
    let (purchase_option, label) = if is_dev_test {
        ("DevTestConsumption", "dev/test")
    } else if hybrid_benefit {
        ("DevTestConsumption", "hybrid benefit")
    } else {
        ("Consumption", "pay as you go")
    };

    CostComponent {
        name: format!("Instance usage (Windows, {label}, {instance_type})"),
        unit: "hours".to_string(),
        monthly_quantity: Some(monthly_hours.unwrap_or(HOUR_TO_MONTH_UNIT_MULTIPLIER)),
        product_filter: product_filter(
            region,
            "Virtual Machines",
            "Compute",
            vec![
                AttributeFilter::regex("skuName", NOT_SPOT_SKU),
                AttributeFilter::regex("armSkuName", format!("/^{instance_type}$/i")),
                AttributeFilter::regex("productName", product_name),
            ],
        ),
        price_filter: compute_price_filter(purchase_option),
        ..Default::default()
    }
}

/// Reservation charged per vCPU when ultra disks are enabled but none is attached
pub fn ultra_ssd_reservation_cost_component(region: &str) -> CostComponent {
    CostComponent {
        name: "Ultra disk reservation (if unattached)".to_string(),
        unit: "vCPU".to_string(),
        unit_multiplier: HOUR_TO_MONTH_UNIT_MULTIPLIER,
        hourly_quantity: None,
        product_filter: product_filter(
            region,
            "Storage",
            "Storage",
            vec![
                AttributeFilter::exact("productName", "Ultra Disks"),
                AttributeFilter::exact("skuName", "Ultra LRS"),
                AttributeFilter::regex(
                    "meterName",
                    regex_filter("Reservation per vCPU Provisioned$"),
                ),
            ],
        ),
        price_filter: price_filter_consumption(),
        ..Default::default()
    }
}

pub fn disk_sub_resource(
    name: &str,
    region: &str,
    data: &ManagedDiskData,
    monthly_disk_operations: Option<i64>,
) -> Resource {
    Resource {
        name: name.to_string(),
        cost_components: managed_disk_cost_components(
            region,
            data,
            monthly_disk_operations.map(Decimal::from),
        ),
        ..Default::default()
    }
}

/// Legacy `azurerm_virtual_machine`, whose OS is inferred from the image or OS disk
#[derive(Debug, Clone, Default)]
pub struct VirtualMachine {
    pub address: String,
    pub region: String,
    pub vm_size: String,
    pub storage_image_reference_offer: Option<String>,
    pub storage_os_disk_os_type: Option<String>,
    pub license_type: Option<String>,
    pub storage_os_disk: Option<ManagedDiskData>,
    pub storage_data_disks: Vec<ManagedDiskData>,
    pub is_dev_test: bool,

    pub monthly_hrs: Option<Decimal>,
    pub storage_os_disk_operations: Option<i64>,
    pub storage_data_disk_operations: Option<i64>,
}

impl VirtualMachine {
    fn is_windows(&self) -> bool {
        let image_is_windows = self
            .storage_image_reference_offer
            .as_deref()
            .is_some_and(|offer| offer.eq_ignore_ascii_case("WindowsServer"));
        let disk_is_windows = self
            .storage_os_disk_os_type
            .as_deref()
            .is_some_and(|os| os.eq_ignore_ascii_case("windows"));

        image_is_windows || disk_is_windows
    }
}

impl CoreResource for VirtualMachine {
    fn core_type(&self) -> &'static str {
        "VirtualMachine"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![
            UsageItem::float("monthly_hrs"),
            disk_usage_schema("storage_os_disk"),
            disk_usage_schema("storage_data_disk"),
        ]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_hrs = usage.get_decimal("monthly_hrs");
        self.storage_os_disk_operations = disk_operations(usage, "storage_os_disk");
        self.storage_data_disk_operations = disk_operations(usage, "storage_data_disk");
    }

    fn build_resource(&self) -> Option<Resource> {
        let compute = if self.is_windows() {
            windows_virtual_machine_cost_component(
                &self.region,
                &self.vm_size,
                self.license_type.as_deref().unwrap_or_default(),
                self.monthly_hrs,
                self.is_dev_test,
            )
        } else {
            linux_virtual_machine_cost_component(&self.region, &self.vm_size, self.monthly_hrs)
        };

        let mut sub_resources = Vec::new();
        if let Some(os_disk) = &self.storage_os_disk {
            sub_resources.push(disk_sub_resource(
                "storage_os_disk",
                &self.region,
                os_disk,
                self.storage_os_disk_operations,
            ));
        }
        sub_resources.extend(self.storage_data_disks.iter().map(|disk| {
            disk_sub_resource(
                "storage_data_disk",
                &self.region,
                disk,
                self.storage_data_disk_operations,
            )
        }));

        Some(Resource {
            name: self.address.clone(),
            cost_components: vec![compute, ultra_ssd_reservation_cost_component(&self.region)],
            sub_resources,
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}
