//! Per-profile override rules
//!
//! One rule function per workload profile, each a pure function
//! `(&HardwareFacts) -> OverrideMap` layered on top of the baseline by the
//! resolution engine. Rules never read another profile's output, and keys
//! within a profile are independent — with one exception: `database`
//! derives `kernel.shmall` from its own `kernel.shmmax`, so that pair is
//! computed in a fixed order.
//!
//! Scaling formulas follow two shapes throughout:
//!
//! - clamp-to-band: `clamp(fact * constant, low, high)` with inclusive
//!   band edges, never yielding zero at the 1 GB RAM floor;
//! - tiering: ordered threshold scan, highest first, `>=` on the boundary.

use crate::facts::{DiskMedium, HardwareFacts};
use crate::params::OverrideMap;

use super::{clamp, tiered};

/// Balanced defaults for a mixed-use server
pub fn general(facts: &HardwareFacts) -> OverrideMap {
    let mut map = OverrideMap::new();

    let buffer_max = tiered(
        facts.nic_mbps,
        &[(10_000, 33_554_432), (1000, 16_777_216)],
        8_388_608,
    );
    map.set_int("net.core.rmem_max", buffer_max);
    map.set_int("net.core.wmem_max", buffer_max);
    map.set_tuple("net.ipv4.tcp_rmem", &[4096, 131_072, buffer_max]);
    map.set_tuple("net.ipv4.tcp_wmem", &[4096, 65_536, buffer_max]);

    map.set_int(
        "net.core.somaxconn",
        clamp(facts.threads as i64 * 256, 4096, 65_535),
    );

    let swappiness = if facts.disk.is_solid_state() { 10 } else { 20 };
    map.set_int("vm.swappiness", swappiness);
    map.set_int("vm.dirty_ratio", 10);
    map.set_int("vm.dirty_background_ratio", 5);

    map.set_int(
        "fs.file-max",
        clamp(facts.ram_gb as i64 * 65_536, 1_048_576, 8_388_608),
    );

    map
}

/// Hypervisor host running KVM or similar
pub fn virtualization(facts: &HardwareFacts) -> OverrideMap {
    let mut map = OverrideMap::new();

    // Guests do their own caching; the host should hold pages loosely.
    map.set_int("vm.swappiness", 5);
    map.set_int("vm.overcommit_memory", 1);
    map.set_int("vm.max_map_count", 262_144);
    map.set_int("fs.aio-max-nr", 1_048_576);

    // vCPU threads migrate constantly; make migration cheap.
    map.set_int("kernel.sched_migration_cost_ns", 500_000);

    map.set_int("net.ipv4.ip_forward", 1);
    map.set_int("net.ipv4.conf.all.rp_filter", 2);
    map.set_int(
        "net.core.netdev_max_backlog",
        tiered(facts.nic_mbps, &[(10_000, 50_000), (1000, 10_000)], 2000),
    );
    map.set_int(
        "net.core.somaxconn",
        clamp(facts.threads as i64 * 512, 4096, 65_535),
    );

    map
}

/// High-traffic web or reverse-proxy server
pub fn web(facts: &HardwareFacts) -> OverrideMap {
    let mut map = OverrideMap::new();

    map.set_int(
        "net.core.somaxconn",
        clamp(facts.threads as i64 * 2048, 16_384, 131_072),
    );
    map.set_int(
        "net.ipv4.tcp_max_syn_backlog",
        clamp(facts.threads as i64 * 4096, 16_384, 262_144),
    );
    map.set_tuple("net.ipv4.ip_local_port_range", &[1024, 65_535]);
    map.set_int("net.ipv4.tcp_fin_timeout", 10);
    map.set_int("net.ipv4.tcp_tw_reuse", 1);

    map.set_int(
        "fs.file-max",
        clamp(facts.ram_gb as i64 * 131_072, 2_097_152, 16_777_216),
    );
    map.set_int(
        "net.netfilter.nf_conntrack_max",
        clamp(facts.ram_gb as i64 * 16_384, 262_144, 2_097_152),
    );

    map.set_int("vm.swappiness", 10);

    map
}

/// Relational database server (PostgreSQL, MySQL)
pub fn database(facts: &HardwareFacts) -> OverrideMap {
    let mut map = OverrideMap::new();

    map.set_int("vm.swappiness", 1);
    map.set_int("vm.dirty_ratio", 5);
    map.set_int("vm.dirty_background_ratio", 1);
    map.set_int("vm.dirty_expire_centisecs", 500);
    map.set_int("vm.overcommit_memory", 2);
    map.set_int("vm.overcommit_ratio", 90);
    map.set_int("vm.zone_reclaim_mode", 0);

    // shmall is derived from shmmax: keep this pair in order.
    let shmmax = facts.ram_gb as i64 * 1_073_741_824 / 2;
    map.set_int("kernel.shmmax", shmmax);
    map.set_int("kernel.shmall", shmmax / 4096);
    map.set_int("kernel.shmmni", 4096);
    map.set_tuple("kernel.sem", &[250, 32_000, 100, 128]);

    map.set_int("fs.aio-max-nr", 1_048_576);
    map.set_int(
        "vm.min_free_kbytes",
        clamp(facts.ram_gb as i64 * 8192, 65_536, 4_194_304),
    );
    map.set_int(
        "net.core.somaxconn",
        clamp(facts.threads as i64 * 1024, 8192, 65_535),
    );

    // Defragmentation stalls hurt query latency on smaller hosts; only
    // opt into huge pages where the page tables actually strain RAM.
    let hugepage_mode = if facts.ram_gb >= 64 { "madvise" } else { "never" };
    map.set_word("vm.transparent_hugepage", hugepage_mode);

    map
}

/// In-memory cache or key-value store (Redis, Memcached)
pub fn cache(facts: &HardwareFacts) -> OverrideMap {
    let mut map = OverrideMap::new();

    // Fork-based persistence needs optimistic overcommit.
    map.set_int("vm.overcommit_memory", 1);
    map.set_int("vm.swappiness", 1);

    map.set_int("net.core.somaxconn", 65_535);
    map.set_int("net.ipv4.tcp_max_syn_backlog", 65_535);
    map.set_tuple("net.ipv4.ip_local_port_range", &[1024, 65_535]);
    map.set_int("net.ipv4.tcp_tw_reuse", 1);

    map.set_word("vm.transparent_hugepage", "never");
    map.set_int(
        "vm.min_free_kbytes",
        clamp(facts.ram_gb as i64 * 2048, 32_768, 1_048_576),
    );

    map
}

/// CPU-bound compute or batch-processing node
pub fn compute(facts: &HardwareFacts) -> OverrideMap {
    let mut map = OverrideMap::new();

    // Local reclaim only pays off on large NUMA machines.
    let zone_reclaim = if facts.ram_gb >= 64 && facts.cores >= 16 { 1 } else { 0 };
    map.set_int("vm.zone_reclaim_mode", zone_reclaim);

    map.set_int("vm.swappiness", 1);
    map.set_int("vm.dirty_ratio", 40);
    map.set_int("vm.dirty_background_ratio", 10);

    let numa_balancing = if facts.cores >= 16 { 0 } else { 1 };
    map.set_int("kernel.numa_balancing", numa_balancing);

    let hugepage_mode = if facts.ram_gb >= 128 { "always" } else { "madvise" };
    map.set_word("vm.transparent_hugepage", hugepage_mode);

    map.set_int("kernel.sched_migration_cost_ns", 5_000_000);
    map.set_int(
        "vm.max_map_count",
        clamp(facts.ram_gb as i64 * 16_384, 262_144, 4_194_304),
    );
    map.set_int(
        "vm.min_free_kbytes",
        clamp(facts.ram_gb as i64 * 2048, 65_536, 1_048_576),
    );

    map
}

/// NFS or SMB file server
pub fn fileserver(facts: &HardwareFacts) -> OverrideMap {
    let mut map = OverrideMap::new();

    // Rotational media want bigger writeback windows to batch seeks.
    let (dirty, dirty_background) = if facts.disk == DiskMedium::Hdd {
        (20, 10)
    } else {
        (10, 5)
    };
    map.set_int("vm.dirty_ratio", dirty);
    map.set_int("vm.dirty_background_ratio", dirty_background);
    map.set_int("vm.dirty_expire_centisecs", 3000);
    map.set_int("vm.dirty_writeback_centisecs", 1500);

    // Dentry and inode caches are the working set here.
    map.set_int("vm.vfs_cache_pressure", 10);

    map.set_int(
        "vm.min_free_kbytes",
        clamp(facts.ram_gb as i64 * 8192, 65_536, 2_097_152),
    );
    map.set_int(
        "fs.file-max",
        clamp(facts.ram_gb as i64 * 262_144, 2_097_152, 33_554_432),
    );
    map.set_int(
        "net.core.somaxconn",
        clamp(facts.threads as i64 * 512, 4096, 65_535),
    );

    map
}

/// Router, firewall, or other packet-forwarding appliance
pub fn network(facts: &HardwareFacts) -> OverrideMap {
    let mut map = OverrideMap::new();

    map.set_int("net.ipv4.ip_forward", 1);
    // Asymmetric routing is normal for a forwarding box.
    map.set_int("net.ipv4.conf.all.rp_filter", 2);
    map.set_int("net.ipv4.conf.default.rp_filter", 2);

    map.set_int(
        "net.netfilter.nf_conntrack_max",
        clamp(facts.ram_gb as i64 * 32_768, 524_288, 4_194_304),
    );
    map.set_int("net.netfilter.nf_conntrack_tcp_timeout_established", 3600);

    map.set_int(
        "net.core.netdev_max_backlog",
        tiered(facts.nic_mbps, &[(10_000, 250_000), (1000, 30_000)], 10_000),
    );
    map.set_int("net.core.netdev_budget", 600);
    map.set_int("net.core.netdev_budget_usecs", 8000);

    let buffer_max = tiered(
        facts.nic_mbps,
        &[(10_000, 134_217_728), (1000, 33_554_432)],
        16_777_216,
    );
    map.set_int("net.core.rmem_max", buffer_max);
    map.set_int("net.core.wmem_max", buffer_max);
    map.set_tuple("net.ipv4.tcp_rmem", &[4096, 87_380, buffer_max]);
    map.set_tuple("net.ipv4.tcp_wmem", &[4096, 65_536, buffer_max]);

    map.set_int("net.ipv4.neigh.default.gc_thresh1", 4096);
    map.set_int("net.ipv4.neigh.default.gc_thresh2", 16_384);
    map.set_int("net.ipv4.neigh.default.gc_thresh3", 32_768);

    map
}

/// Container host or Kubernetes node
pub fn container(facts: &HardwareFacts) -> OverrideMap {
    let mut map = OverrideMap::new();

    map.set_int("vm.max_map_count", 262_144);
    map.set_int("fs.inotify.max_user_watches", 1_048_576);
    map.set_int("fs.inotify.max_user_instances", 8192);
    map.set_int("net.ipv4.ip_forward", 1);

    map.set_int(
        "kernel.pid_max",
        clamp(facts.threads as i64 * 32_768, 131_072, 4_194_304),
    );
    map.set_int(
        "kernel.threads-max",
        clamp(facts.ram_gb as i64 * 16_384, 131_072, 4_194_304),
    );
    map.set_int(
        "net.netfilter.nf_conntrack_max",
        clamp(facts.ram_gb as i64 * 16_384, 131_072, 1_048_576),
    );
    map.set_int(
        "fs.file-max",
        clamp(facts.ram_gb as i64 * 131_072, 2_097_152, 16_777_216),
    );
    map.set_int("user.max_user_namespaces", 15_000);

    map
}

/// Developer workstation
pub fn development(facts: &HardwareFacts) -> OverrideMap {
    let mut map = OverrideMap::new();

    let swappiness = if facts.disk.is_solid_state() { 10 } else { 20 };
    map.set_int("vm.swappiness", swappiness);
    map.set_int("vm.dirty_ratio", 20);
    map.set_int("vm.dirty_background_ratio", 10);

    // IDE file watchers and language servers chew through both of these.
    map.set_int("fs.inotify.max_user_watches", 1_048_576);
    map.set_int("vm.max_map_count", 1_048_576);

    map.set_int("kernel.sysrq", 1);
    map.set_int("kernel.perf_event_paranoid", 1);
    map.set_int("kernel.sched_autogroup_enabled", 1);

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;

    fn facts(cores: u32, threads: u32, ram_gb: u64, nic_mbps: u32, disk: DiskMedium) -> HardwareFacts {
        HardwareFacts {
            cores,
            threads,
            ram_gb,
            nic_mbps,
            disk,
            container: false,
        }
    }

    #[test]
    fn test_general_buffer_tier_boundary() {
        // Exactly 10000 Mbps lands in the >=10000 tier
        let map = general(&facts(8, 16, 32, 10_000, DiskMedium::Nvme));
        assert_eq!(
            map.get("net.core.rmem_max"),
            Some(&ParamValue::Int(33_554_432))
        );

        let map = general(&facts(8, 16, 32, 9999, DiskMedium::Nvme));
        assert_eq!(
            map.get("net.core.rmem_max"),
            Some(&ParamValue::Int(16_777_216))
        );
    }

    #[test]
    fn test_general_somaxconn_floor() {
        // 4 threads x 256 = 1024 raw, clamped up to the 4096 floor
        let map = general(&facts(4, 4, 8, 1000, DiskMedium::Hdd));
        assert_eq!(map.get("net.core.somaxconn"), Some(&ParamValue::Int(4096)));
    }

    #[test]
    fn test_general_swappiness_by_medium() {
        let hdd = general(&facts(4, 4, 8, 1000, DiskMedium::Hdd));
        assert_eq!(hdd.get("vm.swappiness"), Some(&ParamValue::Int(20)));

        let ssd = general(&facts(4, 4, 8, 1000, DiskMedium::Ssd));
        assert_eq!(ssd.get("vm.swappiness"), Some(&ParamValue::Int(10)));
    }

    #[test]
    fn test_general_leaves_min_free_kbytes_alone() {
        let map = general(&facts(4, 4, 8, 1000, DiskMedium::Hdd));
        assert!(map.get("vm.min_free_kbytes").is_none());
    }

    #[test]
    fn test_web_accept_queue_band() {
        // 2 threads x 2048 = 4096 raw, clamped up to 16384
        let small = web(&facts(2, 2, 4, 1000, DiskMedium::Ssd));
        assert_eq!(
            small.get("net.core.somaxconn"),
            Some(&ParamValue::Int(16_384))
        );

        // 128 threads x 2048 = 262144 raw, clamped down to 131072
        let large = web(&facts(64, 128, 256, 25_000, DiskMedium::Nvme));
        assert_eq!(
            large.get("net.core.somaxconn"),
            Some(&ParamValue::Int(131_072))
        );
    }

    #[test]
    fn test_web_port_range_tuple() {
        let map = web(&facts(4, 8, 16, 1000, DiskMedium::Ssd));
        assert_eq!(
            map.get("net.ipv4.ip_local_port_range"),
            Some(&ParamValue::tuple([1024, 65_535]))
        );
    }

    #[test]
    fn test_database_shmall_derived_from_shmmax() {
        let map = database(&facts(16, 32, 64, 10_000, DiskMedium::Nvme));

        // Half of 64 GB in bytes
        let shmmax = map.get("kernel.shmmax").and_then(|v| v.as_int()).unwrap();
        assert_eq!(shmmax, 34_359_738_368);

        let shmall = map.get("kernel.shmall").and_then(|v| v.as_int()).unwrap();
        assert_eq!(shmall, shmmax / 4096);
    }

    #[test]
    fn test_database_hugepage_mode_by_ram() {
        let small = database(&facts(4, 8, 32, 1000, DiskMedium::Ssd));
        assert_eq!(
            small.get("vm.transparent_hugepage"),
            Some(&ParamValue::word("never"))
        );

        // 64 GB sits exactly on the boundary and opts in
        let large = database(&facts(16, 32, 64, 10_000, DiskMedium::Nvme));
        assert_eq!(
            large.get("vm.transparent_hugepage"),
            Some(&ParamValue::word("madvise"))
        );
    }

    #[test]
    fn test_database_min_free_floor_at_one_gb() {
        // 1 GB x 8192 = 8192 raw, clamped up to 65536: never zero
        let map = database(&facts(1, 1, 1, 100, DiskMedium::Hdd));
        assert_eq!(
            map.get("vm.min_free_kbytes"),
            Some(&ParamValue::Int(65_536))
        );
    }

    #[test]
    fn test_database_sem_tuple() {
        let map = database(&facts(4, 8, 16, 1000, DiskMedium::Ssd));
        assert_eq!(
            map.get("kernel.sem"),
            Some(&ParamValue::tuple([250, 32_000, 100, 128]))
        );
    }

    #[test]
    fn test_cache_hugepages_always_off() {
        for ram_gb in [1, 64, 512] {
            let map = cache(&facts(4, 8, ram_gb, 1000, DiskMedium::Ssd));
            assert_eq!(
                map.get("vm.transparent_hugepage"),
                Some(&ParamValue::word("never"))
            );
        }
    }

    #[test]
    fn test_cache_fixed_accept_ceiling() {
        let map = cache(&facts(2, 2, 4, 100, DiskMedium::Hdd));
        assert_eq!(map.get("net.core.somaxconn"), Some(&ParamValue::Int(65_535)));
    }

    #[test]
    fn test_compute_zone_reclaim_clamp() {
        // Both conditions true
        let big = compute(&facts(64, 128, 200, 10_000, DiskMedium::Nvme));
        assert_eq!(big.get("vm.zone_reclaim_mode"), Some(&ParamValue::Int(1)));

        // Neither condition true
        let small = compute(&facts(2, 4, 8, 1000, DiskMedium::Ssd));
        assert_eq!(small.get("vm.zone_reclaim_mode"), Some(&ParamValue::Int(0)));

        // RAM alone is not enough
        let wide_ram = compute(&facts(8, 16, 128, 1000, DiskMedium::Ssd));
        assert_eq!(
            wide_ram.get("vm.zone_reclaim_mode"),
            Some(&ParamValue::Int(0))
        );
    }

    #[test]
    fn test_compute_hugepage_mode_by_ram() {
        let mid = compute(&facts(16, 32, 64, 10_000, DiskMedium::Nvme));
        assert_eq!(
            mid.get("vm.transparent_hugepage"),
            Some(&ParamValue::word("madvise"))
        );

        let big = compute(&facts(32, 64, 128, 10_000, DiskMedium::Nvme));
        assert_eq!(
            big.get("vm.transparent_hugepage"),
            Some(&ParamValue::word("always"))
        );
    }

    #[test]
    fn test_fileserver_writeback_by_medium() {
        let hdd = fileserver(&facts(4, 8, 32, 1000, DiskMedium::Hdd));
        assert_eq!(hdd.get("vm.dirty_ratio"), Some(&ParamValue::Int(20)));

        let nvme = fileserver(&facts(4, 8, 32, 1000, DiskMedium::Nvme));
        assert_eq!(nvme.get("vm.dirty_ratio"), Some(&ParamValue::Int(10)));
    }

    #[test]
    fn test_network_conntrack_band() {
        // 1 GB floor
        let small = network(&facts(2, 2, 1, 1000, DiskMedium::Hdd));
        assert_eq!(
            small.get("net.netfilter.nf_conntrack_max"),
            Some(&ParamValue::Int(524_288))
        );

        // 256 GB x 32768 = 8388608 raw, clamped down to 4194304
        let large = network(&facts(32, 64, 256, 25_000, DiskMedium::Nvme));
        assert_eq!(
            large.get("net.netfilter.nf_conntrack_max"),
            Some(&ParamValue::Int(4_194_304))
        );
    }

    #[test]
    fn test_network_backlog_tiers() {
        let fast = network(&facts(8, 16, 32, 10_000, DiskMedium::Nvme));
        assert_eq!(
            fast.get("net.core.netdev_max_backlog"),
            Some(&ParamValue::Int(250_000))
        );

        let slow = network(&facts(2, 2, 4, 100, DiskMedium::Hdd));
        assert_eq!(
            slow.get("net.core.netdev_max_backlog"),
            Some(&ParamValue::Int(10_000))
        );
    }

    #[test]
    fn test_container_pid_band() {
        // 2 threads x 32768 = 65536 raw, clamped up to 131072
        let small = container(&facts(2, 2, 4, 1000, DiskMedium::Ssd));
        assert_eq!(small.get("kernel.pid_max"), Some(&ParamValue::Int(131_072)));

        // 256 threads x 32768 = 8388608 raw, clamped down to 4194304
        let large = container(&facts(128, 256, 512, 25_000, DiskMedium::Nvme));
        assert_eq!(
            large.get("kernel.pid_max"),
            Some(&ParamValue::Int(4_194_304))
        );
    }

    #[test]
    fn test_development_inotify_headroom() {
        let map = development(&facts(8, 16, 32, 1000, DiskMedium::Nvme));
        assert_eq!(
            map.get("fs.inotify.max_user_watches"),
            Some(&ParamValue::Int(1_048_576))
        );
        assert_eq!(map.get("kernel.sysrq"), Some(&ParamValue::Int(1)));
    }
}
