use regex::Regex;
use std::sync::LazyLock;

static CORES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)").unwrap());

/// Compute tier of a flexible database server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlexibleServerTier {
    Burstable,
    GeneralPurpose,
    MemoryOptimized,
}

impl FlexibleServerTier {
    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix.to_lowercase().as_str() {
            "b" => Some(Self::Burstable),
            "gp" => Some(Self::GeneralPurpose),
            "mo" => Some(Self::MemoryOptimized),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Burstable => "Burstable",
            Self::GeneralPurpose => "General Purpose",
            Self::MemoryOptimized => "Memory Optimized",
        }
    }
}

/// Pricing attributes derived from a `<tier>_Standard_<size>[_<version>]` SKU
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlexibleServerSku {
    pub tier: FlexibleServerTier,
    pub sku_name: String,
    pub meter_name: String,
    pub series: String,
}

impl FlexibleServerSku {
    /// `GP_Standard_D4s_v3` -> 4 vCore of the `Dsv3` series.
    /// Returns `None` for an unknown tier or a size without a core count.
    pub fn parse(sku: &str) -> Option<Self> {
        let parts: Vec<&str> = sku.split('_').collect();
        if !(3..=4).contains(&parts.len()) {
            return None;
        }

        let tier = FlexibleServerTier::from_prefix(parts[0])?;
        let size = parts[2];
        let version = parts.get(3).copied().unwrap_or_default();

        if tier == FlexibleServerTier::Burstable {
            return Some(Self {
                tier,
                sku_name: size.to_string(),
                meter_name: format!("{size}[ vcore]*"),
                series: "BS".to_string(),
            });
        }

        let cores = CORES.captures(size)?.get(1)?.as_str().to_string();
        Some(Self {
            tier,
            sku_name: format!("{cores} vCore"),
            meter_name: "vCore".to_string(),
            series: format!("{}{version}", CORES.replace_all(size, "")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_general_purpose() {
        let sku = FlexibleServerSku::parse("GP_Standard_D4s_v3").unwrap();
        assert_eq!(sku.tier, FlexibleServerTier::GeneralPurpose);
        assert_eq!(sku.sku_name, "4 vCore");
        assert_eq!(sku.meter_name, "vCore");
        assert_eq!(sku.series, "Dsv3");
    }

    #[test]
    fn test_parse_burstable() {
        let sku = FlexibleServerSku::parse("B_Standard_B1ms").unwrap();
        assert_eq!(sku.tier, FlexibleServerTier::Burstable);
        assert_eq!(sku.sku_name, "B1ms");
        assert_eq!(sku.meter_name, "B1ms[ vcore]*");
        assert_eq!(sku.series, "BS");
    }

    #[test]
    fn test_parse_rejects_unknown_formats() {
        assert!(FlexibleServerSku::parse("GP_Gen5_4_x_y").is_none());
        assert!(FlexibleServerSku::parse("XX_Standard_D4s_v3").is_none());
        assert!(FlexibleServerSku::parse("MO_Standard_Ds").is_none());
        assert!(FlexibleServerSku::parse("B1ms").is_none());
    }
}
