//! Parameter resolution engine
//!
//! Merges the three rule layers into one canonical settings map and renders
//! the text artifact. Precedence is a single explicit rule: baseline first,
//! then the selected profile's overrides, then the IPv6 overrides — the
//! last-applied layer wins for any shared key.
//!
//! Resolution is pure and total over validated inputs. The rendered header
//! carries a generation timestamp, but the timestamp string is supplied by
//! the caller, so both resolution and rendering stay deterministic: two
//! runs with identical inputs produce byte-identical output.

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::facts::HardwareFacts;
use crate::params::SettingsMap;
use crate::profile::WorkloadProfile;
use crate::rules::{baseline, ipv6, rule_for};

/// Command hint printed in the artifact header
pub const APPLY_COMMAND: &str = "sysctl --system";

/// Default install destination under sysctl.d
pub const DEFAULT_TARGET_PATH: &str = "/etc/sysctl.d/99-tunekit.conf";

/// The resolved parameter set for one (facts, profile, IPv6) input tuple
#[derive(Debug, Clone)]
pub struct Resolution {
    facts: HardwareFacts,
    profile: WorkloadProfile,
    ipv6_disabled: bool,
    settings: SettingsMap,
}

/// Resolve the final settings map for the given inputs
///
/// Fails fast on malformed hardware facts; an unknown profile cannot reach
/// this point because the profile set is a closed enum.
pub fn resolve(
    facts: &HardwareFacts,
    profile: WorkloadProfile,
    ipv6_disabled: bool,
) -> Result<Resolution> {
    facts.validate()?;

    if facts.container {
        warn!("container environment: most kernel parameters are managed by the host");
    }

    let mut settings = baseline::compute(facts);
    debug!(keys = settings.len(), "baseline layer computed");

    let profile_overrides = rule_for(profile)(facts);
    debug!(
        profile = profile.config_name(),
        keys = profile_overrides.len(),
        "profile override layer computed"
    );
    settings.apply(profile_overrides);

    // IPv6 is applied last and wins over the profile on shared keys.
    settings.apply(ipv6::compute(ipv6_disabled));

    info!(
        profile = profile.config_name(),
        keys = settings.len(),
        ipv6_disabled,
        "parameter set resolved"
    );

    Ok(Resolution {
        facts: *facts,
        profile,
        ipv6_disabled,
        settings,
    })
}

impl Resolution {
    /// The final ordered settings map
    pub fn settings(&self) -> &SettingsMap {
        &self.settings
    }

    /// The hardware facts the resolution was computed from
    pub fn facts(&self) -> &HardwareFacts {
        &self.facts
    }

    /// The selected workload profile
    pub fn profile(&self) -> WorkloadProfile {
        self.profile
    }

    /// Whether IPv6 was disabled for this resolution
    pub fn ipv6_disabled(&self) -> bool {
        self.ipv6_disabled
    }

    /// Render only the `key = value` lines, sorted by key
    ///
    /// This is the timestamp-free body used for drift comparison.
    pub fn render_body(&self) -> String {
        let mut body = String::new();
        for (key, value) in self.settings.iter() {
            body.push_str(&format!("{} = {}\n", key, value));
        }
        body
    }

    /// Render the complete artifact: comment header plus parameter body
    ///
    /// `target_path` is where the caller intends to install the file and
    /// `generated_at` is the preformatted timestamp for the header line.
    pub fn render(&self, target_path: &str, generated_at: &str) -> String {
        let mut output = String::new();

        output.push_str("# tunekit kernel parameter tuning\n");
        output.push_str("# ===============================\n");
        output.push_str("#\n");
        output.push_str(&format!(
            "# Profile: {} ({})\n",
            self.profile.name(),
            self.profile.config_name()
        ));
        output.push_str(&format!("#   {}\n", self.profile.description()));
        output.push_str(&format!("# Hardware: {}\n", self.facts.summary()));
        output.push_str(&format!("# Generated: {}\n", generated_at));
        if self.facts.container {
            output.push_str(
                "# NOTE: container environment detected; kernel parameters are\n\
                 # typically managed by the host and may not take effect here.\n",
            );
        }
        output.push_str("#\n");
        output.push_str(&format!("# Install to: {}\n", target_path));
        output.push_str(&format!("# Apply with: {}\n", APPLY_COMMAND));
        output.push_str("#\n\n");

        output.push_str(&self.render_body());
        output
    }
}
