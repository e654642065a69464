//! IPv6 override rules
//!
//! Two mutually exclusive branches driven by a single toggle, with no
//! hardware dependence. Disabling yields exactly the three scope disable
//! keys; keeping IPv6 enabled yields those keys cleared plus a fixed
//! hardening and neighbor-table set.

use crate::params::OverrideMap;

const DISABLE_KEYS: [&str; 3] = [
    "net.ipv6.conf.all.disable_ipv6",
    "net.ipv6.conf.default.disable_ipv6",
    "net.ipv6.conf.lo.disable_ipv6",
];

/// Compute the IPv6 override map
pub fn compute(ipv6_disabled: bool) -> OverrideMap {
    let mut map = OverrideMap::new();

    if ipv6_disabled {
        for key in DISABLE_KEYS {
            map.set_int(key, 1);
        }
        return map;
    }

    for key in DISABLE_KEYS {
        map.set_int(key, 0);
    }

    map.set_int("net.ipv6.conf.all.accept_redirects", 0);
    map.set_int("net.ipv6.conf.default.accept_redirects", 0);
    map.set_int("net.ipv6.conf.all.accept_source_route", 0);
    map.set_int("net.ipv6.conf.default.accept_source_route", 0);

    map.set_int("net.ipv6.neigh.default.gc_thresh1", 1024);
    map.set_int("net.ipv6.neigh.default.gc_thresh2", 4096);
    map.set_int("net.ipv6.neigh.default.gc_thresh3", 8192);

    map
}
