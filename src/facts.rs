//! Hardware facts supplied to the rule engine
//!
//! [`HardwareFacts`] is an immutable snapshot of the machine the tuning is
//! generated for. It is created once per run, by detection or manual entry,
//! and passed by reference into every rule function. The rule engine never
//! probes the system itself.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, TunekitError};

/// Storage medium backing the primary disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiskMedium {
    /// Rotational disk
    Hdd,

    /// SATA solid-state disk
    Ssd,

    /// NVMe solid-state disk
    Nvme,
}

impl DiskMedium {
    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hdd" | "rotational" | "disk" => Some(Self::Hdd),
            "ssd" => Some(Self::Ssd),
            "nvme" => Some(Self::Nvme),
            _ => None,
        }
    }

    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hdd => "HDD",
            Self::Ssd => "SSD",
            Self::Nvme => "NVMe",
        }
    }

    /// Whether the medium is flash-backed
    pub fn is_solid_state(&self) -> bool {
        matches!(self, Self::Ssd | Self::Nvme)
    }
}

impl fmt::Display for DiskMedium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DiskMedium {
    type Err = TunekitError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| TunekitError::UnknownDiskMedium {
            name: s.to_string(),
        })
    }
}

/// Immutable snapshot of the hardware the tuning targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareFacts {
    /// Physical CPU cores
    pub cores: u32,

    /// Logical CPUs (hardware threads)
    pub threads: u32,

    /// Total system memory in whole gigabytes (at least 1)
    pub ram_gb: u64,

    /// Fastest NIC link speed in Mbps
    pub nic_mbps: u32,

    /// Storage medium of the primary disk
    pub disk: DiskMedium,

    /// Whether the system is a container environment
    pub container: bool,
}

impl HardwareFacts {
    /// Validate every fact against its constraint
    ///
    /// Called before the rule engine runs; a violated constraint is fatal to
    /// the run and names the offending field. The engine itself assumes
    /// well-formed facts.
    pub fn validate(&self) -> Result<()> {
        if self.cores == 0 {
            return Err(TunekitError::invalid_fact(
                "cores",
                "must be greater than zero (got 0)",
            ));
        }
        if self.threads == 0 {
            return Err(TunekitError::invalid_fact(
                "threads",
                "must be greater than zero (got 0)",
            ));
        }
        if self.threads < self.cores {
            return Err(TunekitError::invalid_fact(
                "threads",
                format!(
                    "must be at least the core count ({} threads < {} cores)",
                    self.threads, self.cores
                ),
            ));
        }
        if self.ram_gb == 0 {
            return Err(TunekitError::invalid_fact(
                "ram_gb",
                "must be at least 1 GB (got 0)",
            ));
        }
        if self.nic_mbps == 0 {
            return Err(TunekitError::invalid_fact(
                "nic_mbps",
                "must be greater than zero (got 0)",
            ));
        }
        Ok(())
    }

    /// One-line hardware summary for the artifact header
    pub fn summary(&self) -> String {
        format!(
            "{} cores / {} threads, {} GB RAM, {} Mbps NIC, {} storage",
            self.cores,
            self.threads,
            self.ram_gb,
            self.nic_mbps,
            self.disk.name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_facts() -> HardwareFacts {
        HardwareFacts {
            cores: 4,
            threads: 8,
            ram_gb: 16,
            nic_mbps: 1000,
            disk: DiskMedium::Ssd,
            container: false,
        }
    }

    #[test]
    fn test_disk_medium_parsing() {
        assert_eq!(DiskMedium::parse("hdd"), Some(DiskMedium::Hdd));
        assert_eq!(DiskMedium::parse("SSD"), Some(DiskMedium::Ssd));
        assert_eq!(DiskMedium::parse("NVMe"), Some(DiskMedium::Nvme));
        assert_eq!(DiskMedium::parse("floppy"), None);
    }

    #[test]
    fn test_solid_state_classification() {
        assert!(!DiskMedium::Hdd.is_solid_state());
        assert!(DiskMedium::Ssd.is_solid_state());
        assert!(DiskMedium::Nvme.is_solid_state());
    }

    #[test]
    fn test_valid_facts_pass() {
        assert!(sample_facts().validate().is_ok());
    }

    #[test]
    fn test_zero_cores_rejected() {
        let facts = HardwareFacts {
            cores: 0,
            ..sample_facts()
        };
        let err = facts.validate().unwrap_err();
        assert!(matches!(
            err,
            TunekitError::InvalidHardwareFact { field: "cores", .. }
        ));
    }

    #[test]
    fn test_zero_ram_rejected() {
        let facts = HardwareFacts {
            ram_gb: 0,
            ..sample_facts()
        };
        assert!(facts.validate().is_err());
    }

    #[test]
    fn test_fewer_threads_than_cores_rejected() {
        let facts = HardwareFacts {
            cores: 8,
            threads: 4,
            ..sample_facts()
        };
        assert!(facts.validate().is_err());
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(
            sample_facts().summary(),
            "4 cores / 8 threads, 16 GB RAM, 1000 Mbps NIC, SSD storage"
        );
    }
}
