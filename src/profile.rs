//! Workload profile definitions
//!
//! The profile selects which override rule set is layered on top of the
//! hardware baseline. The set is closed: selection outside it is rejected
//! at the parse boundary and never reaches the rule engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, TunekitError};

/// Workload archetype selected by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadProfile {
    /// Balanced defaults for a mixed-use server
    #[default]
    General,

    /// Hypervisor host running KVM or similar
    Virtualization,

    /// High-traffic web or reverse-proxy server
    Web,

    /// Relational database server (PostgreSQL, MySQL)
    Database,

    /// In-memory cache or key-value store (Redis, Memcached)
    Cache,

    /// CPU-bound compute or batch-processing node
    Compute,

    /// NFS or SMB file server
    Fileserver,

    /// Router, firewall, or other packet-forwarding appliance
    Network,

    /// Container host or Kubernetes node
    Container,

    /// Developer workstation
    Development,
}

impl WorkloadProfile {
    /// All profiles, in menu order
    pub fn all() -> &'static [WorkloadProfile] {
        &[
            Self::General,
            Self::Virtualization,
            Self::Web,
            Self::Database,
            Self::Cache,
            Self::Compute,
            Self::Fileserver,
            Self::Network,
            Self::Container,
            Self::Development,
        ]
    }

    /// Parse from string (case-insensitive, flexible formats)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "general" | "server" => Some(Self::General),
            "virtualization" | "virt" | "hypervisor" | "kvm" => Some(Self::Virtualization),
            "web" | "webserver" | "proxy" => Some(Self::Web),
            "database" | "db" | "postgres" | "mysql" => Some(Self::Database),
            "cache" | "redis" | "memcached" => Some(Self::Cache),
            "compute" | "hpc" | "batch" => Some(Self::Compute),
            "fileserver" | "nfs" | "smb" | "samba" => Some(Self::Fileserver),
            "network" | "router" | "firewall" => Some(Self::Network),
            "container" | "docker" | "kubernetes" | "k8s" => Some(Self::Container),
            "development" | "dev" | "workstation" => Some(Self::Development),
            _ => None,
        }
    }

    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "General Server",
            Self::Virtualization => "Virtualization Host",
            Self::Web => "Web Server",
            Self::Database => "Database Server",
            Self::Cache => "Cache Server",
            Self::Compute => "Compute Node",
            Self::Fileserver => "File Server",
            Self::Network => "Network Appliance",
            Self::Container => "Container Host",
            Self::Development => "Development Workstation",
        }
    }

    /// Canonical identifier used on the command line and in the artifact
    pub fn config_name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Virtualization => "virtualization",
            Self::Web => "web",
            Self::Database => "database",
            Self::Cache => "cache",
            Self::Compute => "compute",
            Self::Fileserver => "fileserver",
            Self::Network => "network",
            Self::Container => "container",
            Self::Development => "development",
        }
    }

    /// One-line description of the tuning focus
    pub fn description(&self) -> &'static str {
        match self {
            Self::General => "Balanced network, memory, and file-handle tuning for mixed use",
            Self::Virtualization => {
                "Overcommit-friendly memory and forwarding settings for a hypervisor host"
            }
            Self::Web => "Large accept queues and connection churn tuning for web traffic",
            Self::Database => {
                "Shared-memory sizing, strict writeback, and minimal swapping for databases"
            }
            Self::Cache => "Memory-overcommit and accept-queue ceilings for in-memory stores",
            Self::Compute => "NUMA locality and throughput-oriented writeback for batch work",
            Self::Fileserver => "Dirty-page and dentry-cache tuning for sustained file I/O",
            Self::Network => "Conntrack, backlog, and buffer scaling for packet forwarding",
            Self::Container => "Namespace, inotify, and PID limits for dense container hosts",
            Self::Development => "Inotify headroom and debugging conveniences for workstations",
        }
    }
}

impl fmt::Display for WorkloadProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for WorkloadProfile {
    type Err = TunekitError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| TunekitError::UnknownProfile {
            name: s.to_string(),
        })
    }
}
