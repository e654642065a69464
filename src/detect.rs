//! Hardware and container detection
//!
//! Reads `/proc`, `/sys`, and container marker files to assemble a
//! [`HardwareFacts`] snapshot. Detection supplies input facts only — it
//! performs no tuning decisions and never fails: every probe has a
//! conservative fallback so the caller always gets a usable snapshot to
//! confirm or override.

use crate::facts::{DiskMedium, HardwareFacts};

/// Detect a full hardware snapshot for the current system
pub fn detect() -> HardwareFacts {
    let (cores, threads) = detect_cpus();
    let facts = HardwareFacts {
        cores,
        threads,
        ram_gb: detect_ram_gb(),
        nic_mbps: detect_nic_mbps(),
        disk: detect_disk(),
        container: detect_container(),
    };
    tracing::debug!(?facts, "hardware detection complete");
    facts
}

// ============================================================================
// CPU topology
// ============================================================================

/// Detect (physical cores, logical threads)
#[cfg(target_os = "linux")]
fn detect_cpus() -> (u32, u32) {
    if let Ok(content) = std::fs::read_to_string("/proc/cpuinfo") {
        if let Some(counts) = parse_cpuinfo(&content) {
            return counts;
        }
    }
    tracing::debug!("falling back to available_parallelism for CPU count");
    fallback_cpus()
}

#[cfg(not(target_os = "linux"))]
fn detect_cpus() -> (u32, u32) {
    fallback_cpus()
}

fn fallback_cpus() -> (u32, u32) {
    let threads = std::thread::available_parallelism()
        .map(|p| p.get() as u32)
        .unwrap_or(4);
    (threads, threads)
}

/// Count unique (physical id, core id) pairs and processor entries
///
/// Returns `None` when the file lists no processors (some virtualized
/// environments truncate cpuinfo).
fn parse_cpuinfo(content: &str) -> Option<(u32, u32)> {
    let mut threads = 0u32;
    let mut physical_id = 0u32;
    let mut cores = std::collections::HashSet::new();

    for line in content.lines() {
        let (key, value) = match line.split_once(':') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => continue,
        };
        match key {
            "processor" => threads += 1,
            "physical id" => physical_id = value.parse().unwrap_or(0),
            "core id" => {
                let core_id: u32 = value.parse().unwrap_or(0);
                cores.insert((physical_id, core_id));
            }
            _ => {}
        }
    }

    if threads == 0 {
        return None;
    }
    // ARM and some VMs omit core ids entirely; treat each thread as a core.
    let cores = if cores.is_empty() {
        threads
    } else {
        cores.len() as u32
    };
    Some((cores, threads))
}

// ============================================================================
// Memory
// ============================================================================

/// Detect total memory in whole gigabytes (at least 1)
#[cfg(target_os = "linux")]
fn detect_ram_gb() -> u64 {
    if let Ok(content) = std::fs::read_to_string("/proc/meminfo") {
        if let Some(gb) = parse_meminfo_gb(&content) {
            return gb;
        }
    }
    tracing::debug!("meminfo unreadable, assuming 8 GB");
    8
}

#[cfg(not(target_os = "linux"))]
fn detect_ram_gb() -> u64 {
    8
}

/// Parse the MemTotal line, rounding down to GB with a 1 GB floor
fn parse_meminfo_gb(content: &str) -> Option<u64> {
    for line in content.lines() {
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            let kb: u64 = rest.trim().split_whitespace().next()?.parse().ok()?;
            return Some((kb / 1_048_576).max(1));
        }
    }
    None
}

// ============================================================================
// Network link speed
// ============================================================================

/// Detect the fastest NIC link speed in Mbps
///
/// Scans `/sys/class/net/*/speed`, skipping loopback and interfaces that
/// report no carrier (speed -1). Falls back to gigabit when nothing
/// reports a speed.
#[cfg(target_os = "linux")]
fn detect_nic_mbps() -> u32 {
    let mut best: Option<u32> = None;

    if let Ok(entries) = std::fs::read_dir("/sys/class/net") {
        for entry in entries.flatten() {
            let name = entry.file_name();
            if name.to_str() == Some("lo") {
                continue;
            }
            let speed_path = entry.path().join("speed");
            let Ok(raw) = std::fs::read_to_string(&speed_path) else {
                continue;
            };
            match raw.trim().parse::<i64>() {
                Ok(speed) if speed > 0 => {
                    best = Some(best.unwrap_or(0).max(speed as u32));
                }
                _ => {
                    tracing::debug!(nic = ?name, "interface reports no usable link speed");
                }
            }
        }
    }

    best.unwrap_or(1000)
}

#[cfg(not(target_os = "linux"))]
fn detect_nic_mbps() -> u32 {
    1000
}

// ============================================================================
// Storage medium
// ============================================================================

/// Detect the primary disk medium
///
/// NVMe devices are identified by name; for the rest the rotational flag
/// distinguishes HDD from SSD. Defaults to SSD when no block device is
/// readable.
#[cfg(target_os = "linux")]
fn detect_disk() -> DiskMedium {
    let Ok(entries) = std::fs::read_dir("/sys/block") else {
        return DiskMedium::Ssd;
    };

    let mut fallback = None;
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        // Skip loop/ram/zram pseudo-devices
        if !name.starts_with("sd") && !name.starts_with("vd") && !name.starts_with("nvme") {
            continue;
        }
        if name.starts_with("nvme") {
            return DiskMedium::Nvme;
        }
        if fallback.is_none() {
            let rotational_path = entry.path().join("queue/rotational");
            if let Ok(raw) = std::fs::read_to_string(rotational_path) {
                fallback = Some(classify_rotational(raw.trim()));
            }
        }
    }

    fallback.unwrap_or(DiskMedium::Ssd)
}

#[cfg(not(target_os = "linux"))]
fn detect_disk() -> DiskMedium {
    DiskMedium::Ssd
}

fn classify_rotational(flag: &str) -> DiskMedium {
    if flag == "1" {
        DiskMedium::Hdd
    } else {
        DiskMedium::Ssd
    }
}

// ============================================================================
// Container detection
// ============================================================================

/// Detect whether the process runs inside a container
#[cfg(target_os = "linux")]
fn detect_container() -> bool {
    use std::path::Path;

    if Path::new("/.dockerenv").exists() || Path::new("/run/.containerenv").exists() {
        return true;
    }
    if let Ok(cgroup) = std::fs::read_to_string("/proc/1/cgroup") {
        return cgroup_names_container(&cgroup);
    }
    false
}

#[cfg(not(target_os = "linux"))]
fn detect_container() -> bool {
    false
}

fn cgroup_names_container(cgroup: &str) -> bool {
    ["docker", "containerd", "lxc", "kubepods", "podman"]
        .iter()
        .any(|marker| cgroup.contains(marker))
}
