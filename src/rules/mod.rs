//! Tuning rule sets
//!
//! Three layers of pure rules feed the resolution engine:
//!
//! - [`baseline`] computes the profile-independent base map from hardware
//!   facts.
//! - [`profiles`] holds one override rule function per workload profile,
//!   addressed through [`rule_for`]. No rule reads another profile's output.
//! - [`ipv6`] produces the disable or hardening override set from a single
//!   boolean.
//!
//! Every rule is a pure function of [`HardwareFacts`]: no probing, no
//! global state, no I/O. Shared numeric idioms live here — `clamp` for
//! band-limited scaling formulas and `tiered` for ordered threshold scans.

pub mod baseline;
pub mod ipv6;
pub mod profiles;

use crate::facts::HardwareFacts;
use crate::params::OverrideMap;
use crate::profile::WorkloadProfile;

/// A profile override rule: pure function of the hardware facts
pub type RuleFn = fn(&HardwareFacts) -> OverrideMap;

/// Look up the rule function for a workload profile
///
/// The profile set is closed, so the lookup is total.
pub fn rule_for(profile: WorkloadProfile) -> RuleFn {
    match profile {
        WorkloadProfile::General => profiles::general,
        WorkloadProfile::Virtualization => profiles::virtualization,
        WorkloadProfile::Web => profiles::web,
        WorkloadProfile::Database => profiles::database,
        WorkloadProfile::Cache => profiles::cache,
        WorkloadProfile::Compute => profiles::compute,
        WorkloadProfile::Fileserver => profiles::fileserver,
        WorkloadProfile::Network => profiles::network,
        WorkloadProfile::Container => profiles::container,
        WorkloadProfile::Development => profiles::development,
    }
}

/// Clamp a raw scaled quantity into `[low, high]`
pub(crate) fn clamp(raw: i64, low: i64, high: i64) -> i64 {
    raw.max(low).min(high)
}

/// Select a value from ordered threshold bands, highest threshold first
///
/// The `>=` comparison includes a value sitting exactly on a boundary in
/// the higher tier. Falls back to `default` when no tier matches.
pub(crate) fn tiered(value: u32, tiers: &[(u32, i64)], default: i64) -> i64 {
    for (threshold, tier_value) in tiers {
        if value >= *threshold {
            return *tier_value;
        }
    }
    default
}
