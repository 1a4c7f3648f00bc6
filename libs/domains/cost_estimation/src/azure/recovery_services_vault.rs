use rust_decimal::Decimal;
use tracing::debug;

use super::backup_protected_vm::BackupProtectedVm;
use crate::schema::{CoreResource, Resource, UsageData, UsageItem};

const PROTECTED_VM_DEFAULTS_KEY: &str = "protected_vm[*]";

/// Recovery services vault and the VMs it backs up.
///
/// The vault itself is free; every protected VM is billed as a sub-resource.
/// Vault usage carries per-VM estimates:
///
/// ```json
/// {
///   "protected_vm[*]": { "disk_utilization_gb": 50 },
///   "protected_vm[\"azurerm_backup_protected_vm.db\"]": { "disk_utilization_gb": 900 }
/// }
/// ```
///
/// A VM gets its own entry merged over the `[*]` defaults.
#[derive(Debug, Clone, Default)]
pub struct RecoveryServicesVault {
    pub address: String,
    pub region: String,
    /// `GeoRedundant` (default), `LocallyRedundant` or `ZoneRedundant`
    pub storage_mode_type: Option<String>,
    pub protected_vms: Vec<BackupProtectedVm>,
}

impl RecoveryServicesVault {
    pub fn new(address: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            region: region.into(),
            ..Default::default()
        }
    }

    pub fn with_storage_mode_type(mut self, storage_mode_type: impl Into<String>) -> Self {
        self.storage_mode_type = Some(storage_mode_type.into());
        self
    }

    /// Register a VM protected by this vault
    pub fn add_protected_vm(&mut self, address: impl Into<String>, disk_size_gb: Decimal) {
        self.protected_vms.push(BackupProtectedVm {
            address: address.into(),
            region: self.region.clone(),
            storage_type: self.storage_type().to_string(),
            disk_size_gb,
            ..Default::default()
        });
    }

    /// Redundancy suffix used in backup meter names
    pub fn storage_type(&self) -> &'static str {
        match self.storage_mode_type.as_deref() {
            Some(mode) if mode.eq_ignore_ascii_case("LocallyRedundant") => "LRS",
            Some(mode) if mode.eq_ignore_ascii_case("ZoneRedundant") => "ZRS",
            _ => "GRS",
        }
    }

    fn protected_vm_key(address: &str) -> String {
        format!("protected_vm[\"{address}\"]")
    }
}

impl CoreResource for RecoveryServicesVault {
    fn core_type(&self) -> &'static str {
        "RecoveryServicesVault"
    }

    fn region_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.region)
    }

    fn usage_schema(&self) -> Vec<UsageItem> {
        vec![UsageItem::sub_resource(
            PROTECTED_VM_DEFAULTS_KEY,
            BackupProtectedVm::default().usage_schema(),
        )]
    }

    fn populate_usage(&mut self, usage: &UsageData) {
        let defaults = usage.get_sub_usage(PROTECTED_VM_DEFAULTS_KEY);

        for vm in &mut self.protected_vms {
            let vm_usage = match usage.get_sub_usage(&Self::protected_vm_key(&vm.address)) {
                Some(specific) => Some(specific.merge(defaults.as_ref())),
                None => defaults.clone(),
            };

            if let Some(vm_usage) = vm_usage {
                debug!(vault = %self.address, vm = %vm.address, "Applying protected VM usage");
                vm.populate_usage(&vm_usage);
            }
        }
    }

    fn build_resource(&self) -> Option<Resource> {
        let sub_resources = self
            .protected_vms
            .iter()
            .filter_map(|vm| {
                let mut vm = vm.clone();
                vm.region = self.region.clone();
                vm.storage_type = self.storage_type().to_string();
                vm.build_resource()
            })
            .collect();

        Some(Resource {
            name: self.address.clone(),
            usage_schema: self.usage_schema(),
            sub_resources,
            ..Default::default()
        })
    }
}
