//! Profile-independent baseline rules
//!
//! Parameters that apply regardless of workload, as pure functions of the
//! hardware facts: network buffer sizing from the NIC tier, memory-writeback
//! policy from RAM size and storage medium, and a block of hardware-agnostic
//! networking and filesystem constants.

use crate::facts::HardwareFacts;
use crate::params::SettingsMap;

use super::tiered;

/// Compute the baseline settings map
pub fn compute(facts: &HardwareFacts) -> SettingsMap {
    let mut map = SettingsMap::new();

    memory(&mut map, facts);
    network(&mut map, facts);
    filesystem(&mut map);
    scheduler(&mut map);

    map
}

fn memory(map: &mut SettingsMap, facts: &HardwareFacts) {
    // Flash media tolerate far less swap churn than rotational disks.
    let swappiness = if facts.disk.is_solid_state() { 5 } else { 10 };
    map.set_int("vm.swappiness", swappiness);

    // Large-RAM machines keep writeback windows small so flushes stay short.
    let (dirty, dirty_background) = if facts.ram_gb >= 16 { (5, 2) } else { (10, 5) };
    map.set_int("vm.dirty_ratio", dirty);
    map.set_int("vm.dirty_background_ratio", dirty_background);

    map.set_int("vm.min_free_kbytes", facts.ram_gb as i64 * 4096);
    map.set_int("vm.vfs_cache_pressure", 50);
}

fn network(map: &mut SettingsMap, facts: &HardwareFacts) {
    // Socket buffer ceilings track the link speed tier.
    let buffer_max = tiered(
        facts.nic_mbps,
        &[(10_000, 67_108_864), (1000, 16_777_216)],
        4_194_304,
    );
    map.set_int("net.core.rmem_max", buffer_max);
    map.set_int("net.core.wmem_max", buffer_max);
    map.set_tuple("net.ipv4.tcp_rmem", &[4096, 87_380, buffer_max]);
    map.set_tuple("net.ipv4.tcp_wmem", &[4096, 65_536, buffer_max]);

    let backlog = tiered(facts.nic_mbps, &[(10_000, 30_000), (1000, 5000)], 1000);
    map.set_int("net.core.netdev_max_backlog", backlog);

    // Unclamped at baseline; profiles impose their own bands.
    map.set_int("net.core.somaxconn", facts.threads as i64 * 1024);

    map.set_word("net.core.default_qdisc", "fq");
    map.set_word("net.ipv4.tcp_congestion_control", "bbr");
    map.set_int("net.ipv4.tcp_fastopen", 3);
    map.set_int("net.ipv4.tcp_max_syn_backlog", 8192);
    map.set_int("net.ipv4.tcp_tw_reuse", 1);
    map.set_int("net.ipv4.tcp_fin_timeout", 15);
    map.set_int("net.ipv4.tcp_keepalive_time", 300);
    map.set_int("net.ipv4.tcp_keepalive_probes", 5);
    map.set_int("net.ipv4.tcp_keepalive_intvl", 15);
    map.set_int("net.ipv4.tcp_mtu_probing", 1);
    map.set_int("net.ipv4.tcp_slow_start_after_idle", 0);
}

fn filesystem(map: &mut SettingsMap) {
    map.set_int("fs.file-max", 2_097_152);
    map.set_int("fs.nr_open", 1_048_576);
    map.set_int("fs.inotify.max_user_watches", 524_288);
}

fn scheduler(map: &mut SettingsMap) {
    map.set_int("kernel.sched_migration_cost_ns", 5_000_000);
    map.set_int("kernel.sched_autogroup_enabled", 0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::DiskMedium;
    use crate::params::ParamValue;

    fn facts(ram_gb: u64, nic_mbps: u32, disk: DiskMedium) -> HardwareFacts {
        HardwareFacts {
            cores: 4,
            threads: 8,
            ram_gb,
            nic_mbps,
            disk,
            container: false,
        }
    }

    #[test]
    fn test_swappiness_by_medium() {
        let ssd = compute(&facts(16, 1000, DiskMedium::Ssd));
        assert_eq!(ssd.get("vm.swappiness"), Some(&ParamValue::Int(5)));

        let nvme = compute(&facts(16, 1000, DiskMedium::Nvme));
        assert_eq!(nvme.get("vm.swappiness"), Some(&ParamValue::Int(5)));

        let hdd = compute(&facts(16, 1000, DiskMedium::Hdd));
        assert_eq!(hdd.get("vm.swappiness"), Some(&ParamValue::Int(10)));
    }

    #[test]
    fn test_dirty_ratios_by_ram() {
        let large = compute(&facts(16, 1000, DiskMedium::Ssd));
        assert_eq!(large.get("vm.dirty_ratio"), Some(&ParamValue::Int(5)));
        assert_eq!(
            large.get("vm.dirty_background_ratio"),
            Some(&ParamValue::Int(2))
        );

        let small = compute(&facts(8, 1000, DiskMedium::Ssd));
        assert_eq!(small.get("vm.dirty_ratio"), Some(&ParamValue::Int(10)));
        assert_eq!(
            small.get("vm.dirty_background_ratio"),
            Some(&ParamValue::Int(5))
        );
    }

    #[test]
    fn test_min_free_kbytes_scales_with_ram() {
        let map = compute(&facts(8, 1000, DiskMedium::Hdd));
        assert_eq!(map.get("vm.min_free_kbytes"), Some(&ParamValue::Int(32_768)));

        // 1 GB floor still yields a positive value
        let map = compute(&facts(1, 1000, DiskMedium::Hdd));
        assert_eq!(map.get("vm.min_free_kbytes"), Some(&ParamValue::Int(4096)));
    }

    #[test]
    fn test_nic_buffer_tiers() {
        let fast = compute(&facts(16, 25_000, DiskMedium::Nvme));
        assert_eq!(
            fast.get("net.core.rmem_max"),
            Some(&ParamValue::Int(67_108_864))
        );

        // Exactly on the 10 Gb boundary lands in the high tier
        let edge = compute(&facts(16, 10_000, DiskMedium::Nvme));
        assert_eq!(
            edge.get("net.core.rmem_max"),
            Some(&ParamValue::Int(67_108_864))
        );

        let gigabit = compute(&facts(16, 1000, DiskMedium::Ssd));
        assert_eq!(
            gigabit.get("net.core.rmem_max"),
            Some(&ParamValue::Int(16_777_216))
        );
        assert_eq!(
            gigabit.get("net.ipv4.tcp_rmem"),
            Some(&ParamValue::tuple([4096, 87_380, 16_777_216]))
        );

        let slow = compute(&facts(16, 100, DiskMedium::Hdd));
        assert_eq!(
            slow.get("net.core.rmem_max"),
            Some(&ParamValue::Int(4_194_304))
        );
    }

    #[test]
    fn test_somaxconn_scales_with_threads() {
        let map = compute(&facts(16, 1000, DiskMedium::Ssd));
        assert_eq!(map.get("net.core.somaxconn"), Some(&ParamValue::Int(8192)));
    }

    #[test]
    fn test_constant_block_present() {
        let map = compute(&facts(16, 1000, DiskMedium::Ssd));
        assert_eq!(
            map.get("net.core.default_qdisc"),
            Some(&ParamValue::word("fq"))
        );
        assert_eq!(map.get("net.ipv4.tcp_fastopen"), Some(&ParamValue::Int(3)));
        assert_eq!(map.get("fs.file-max"), Some(&ParamValue::Int(2_097_152)));
    }
}
