use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

use super::util::{price_filter_consumption, product_filter};
use crate::schema::{
    AttributeFilter, CoreResource, CostComponent, HOUR_TO_MONTH_UNIT_MULTIPLIER, Resource,
    UsageData, UsageItem,
};

const DEFAULT_DISK_SIZE_GB: i64 = 30;

const STANDARD_HDD_SIZES: &[(&str, i64)] = &[
    ("S4", 32),
    ("S6", 64),
    ("S10", 128),
    ("S15", 256),
    ("S20", 512),
    ("S30", 1024),
    ("S40", 2048),
    ("S50", 4096),
    ("S60", 8192),
    ("S70", 16384),
    ("S80", 32767),
];

const STANDARD_SSD_SIZES: &[(&str, i64)] = &[
    ("E1", 4),
    ("E2", 8),
    ("E3", 16),
    ("E4", 32),
    ("E6", 64),
    ("E10", 128),
    ("E15", 256),
    ("E20", 512),
    ("E30", 1024),
    ("E40", 2048),
    ("E50", 4096),
    ("E60", 8192),
    ("E70", 16384),
    ("E80", 32767),
];

const PREMIUM_SSD_SIZES: &[(&str, i64)] = &[
    ("P1", 4),
    ("P2", 8),
    ("P3", 16),
    ("P4", 32),
    ("P6", 64),
    ("P10", 128),
    ("P15", 256),
    ("P20", 512),
    ("P30", 1024),
    ("P40", 2048),
    ("P50", 4096),
    ("P60", 8192),
    ("P70", 16384),
    ("P80", 32767),
];

const ULTRA_DISK_SIZES: &[i64] = &[4, 8, 16, 32, 64, 128, 256, 512];
const ULTRA_DISK_SIZE_STEP: i64 = 1024;
const ULTRA_DISK_MAX_SIZE: i64 = 65536;

/// Disk settings shared by managed disks and VM OS/data disks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagedDiskData {
    /// `Standard_LRS`, `StandardSSD_LRS`, `Premium_LRS` or `UltraSSD_LRS`
    pub disk_type: String,
    pub disk_size_gb: Option<i64>,
    pub disk_iops_read_write: Option<i64>,
    pub disk_mbps_read_write: Option<i64>,
}

impl ManagedDiskData {
    pub fn new(disk_type: impl Into<String>, disk_size_gb: Option<i64>) -> Self {
        Self {
            disk_type: disk_type.into(),
            disk_size_gb,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ManagedDisk {
    pub address: String,
    pub region: String,
    pub data: ManagedDiskData,
    pub monthly_disk_operations: Option<i64>,
}

impl CoreResource for ManagedDisk {
    fn core_type(&self) -> &'static str {
        "ManagedDisk"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![UsageItem::int("monthly_disk_operations")]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        self.monthly_disk_operations = usage.get_i64("monthly_disk_operations");
    }

    fn build_resource(&self) -> Option<Resource> {
        Some(Resource {
            name: self.address.clone(),
            cost_components: managed_disk_cost_components(
                &self.region,
                &self.data,
                self.monthly_disk_operations.map(Decimal::from),
            ),
            usage_schema: self.usage_schema(),
            ..Default::default()
        })
    }
}

/// Components for any managed disk; empty when the type or size cannot be mapped
pub fn managed_disk_cost_components(
    region: &str,
    data: &ManagedDiskData,
    monthly_disk_operations: Option<Decimal>,
) -> Vec<CostComponent> {
    if data.disk_type.eq_ignore_ascii_case("UltraSSD_LRS") {
        return ultra_disk_cost_components(region, data);
    }

    standard_premium_disk_cost_components(region, data, monthly_disk_operations)
}

fn disk_sizes(disk_type: &str) -> Option<(&'static [(&'static str, i64)], &'static str)> {
    match disk_type {
        "Standard_LRS" => Some((STANDARD_HDD_SIZES, "Standard HDD Managed Disks")),
        "StandardSSD_LRS" => Some((STANDARD_SSD_SIZES, "Standard SSD Managed Disks")),
        "Premium_LRS" => Some((PREMIUM_SSD_SIZES, "Premium SSD Managed Disks")),
        _ => None,
    }
}

/// Smallest disk tier that fits `requested_size`
pub fn map_disk_name(disk_type: &str, requested_size: i64) -> Option<&'static str> {
    let (sizes, _) = disk_sizes(disk_type)?;
    sizes
        .iter()
        .find(|(_, size)| *size >= requested_size)
        .map(|(name, _)| *name)
}

/// Ultra disks come in fixed sizes up to 512 GiB, then 1 TiB steps up to 64 TiB
pub fn map_ultra_disk_size(requested_size: i64) -> i64 {
    if requested_size >= ULTRA_DISK_MAX_SIZE {
        return ULTRA_DISK_MAX_SIZE;
    }

    if let Some(size) = ULTRA_DISK_SIZES.iter().find(|size| **size >= requested_size) {
        return *size;
    }

    // ceiling division into whole steps
    (requested_size + ULTRA_DISK_SIZE_STEP - 1) / ULTRA_DISK_SIZE_STEP * ULTRA_DISK_SIZE_STEP
}

fn standard_premium_disk_cost_components(
    region: &str,
    data: &ManagedDiskData,
    monthly_disk_operations: Option<Decimal>,
) -> Vec<CostComponent> {
    let requested_size = data
        .disk_size_gb
        .filter(|size| *size > 0)
        .unwrap_or(DEFAULT_DISK_SIZE_GB);

    let Some((_, product_name)) = disk_sizes(&data.disk_type) else {
        warn!(disk_type = %data.disk_type, "Could not map disk type to product name");
        return Vec::new();
    };

    let Some(disk_name) = map_disk_name(&data.disk_type, requested_size) else {
        warn!(
            disk_type = %data.disk_type,
            disk_size_gb = requested_size,
            "Could not map disk type and size to disk name"
        );
        return Vec::new();
    };

    let mut components = vec![storage_cost_component(region, disk_name, product_name)];

    if matches!(data.disk_type.as_str(), "Standard_LRS" | "StandardSSD_LRS") {
        components.push(CostComponent {
            name: "Disk operations".to_string(),
            unit: "10k operations".to_string(),
            monthly_quantity: monthly_disk_operations.map(|ops| ops / dec!(10000)),
            product_filter: product_filter(
                region,
                "Storage",
                "Storage",
                vec![
                    AttributeFilter::exact("productName", product_name),
                    AttributeFilter::exact("skuName", format!("{disk_name} LRS")),
                    AttributeFilter::exact("meterName", "Disk Operations"),
                ],
            ),
            price_filter: price_filter_consumption(),
            usage_based: true,
            ..Default::default()
        });
    }

    components
}

fn storage_cost_component(region: &str, disk_name: &str, product_name: &str) -> CostComponent {
    CostComponent {
        name: format!("Storage ({disk_name})"),
        unit: "months".to_string(),
        monthly_quantity: Some(Decimal::ONE),
        product_filter: product_filter(
            region,
            "Storage",
            "Storage",
            vec![
                AttributeFilter::exact("productName", product_name),
                AttributeFilter::exact("skuName", format!("{disk_name} LRS")),
                AttributeFilter::exact("meterName", format!("{disk_name} Disks")),
            ],
        ),
        price_filter: price_filter_consumption(),
        ..Default::default()
    }
}

fn ultra_disk_component(
    region: &str,
    name: String,
    unit: &str,
    quantity: i64,
    meter: &str,
) -> CostComponent {
    CostComponent {
        name,
        unit: unit.to_string(),
        unit_multiplier: HOUR_TO_MONTH_UNIT_MULTIPLIER,
        hourly_quantity: Some(Decimal::from(quantity)),
        product_filter: product_filter(
            region,
            "Storage",
            "Storage",
            vec![
                AttributeFilter::exact("productName", "Ultra Disks"),
                AttributeFilter::exact("skuName", "Ultra LRS"),
                AttributeFilter::exact("meterName", meter),
            ],
        ),
        price_filter: price_filter_consumption(),
        ..Default::default()
    }
}

fn ultra_disk_cost_components(region: &str, data: &ManagedDiskData) -> Vec<CostComponent> {
    let requested_size = data.disk_size_gb.filter(|s| *s > 0).unwrap_or(1024);
    let iops = data.disk_iops_read_write.filter(|i| *i > 0).unwrap_or(2048);
    let throughput = data.disk_mbps_read_write.filter(|t| *t >= 0).unwrap_or(8);

    let disk_size = map_ultra_disk_size(requested_size);

    vec![
        ultra_disk_component(
            region,
            format!("Storage (ultra, {disk_size} GiB)"),
            "GiB",
            disk_size,
            "Provisioned Capacity",
        ),
        ultra_disk_component(
            region,
            "Provisioned IOPS".to_string(),
            "IOPS",
            iops,
            "Provisioned IOPS",
        ),
        ultra_disk_component(
            region,
            "Throughput".to_string(),
            "MB/s",
            throughput,
            "Provisioned Throughput (MBps)",
        ),
    ]
}
