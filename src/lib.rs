//! # Tunekit
//!
//! Hardware-aware kernel sysctl tuning generator.
//!
//! Tunekit turns a small set of hardware facts (CPU count, RAM size, NIC
//! link speed, storage medium, container status) and a selected workload
//! profile into a deterministic, sorted set of sysctl key/value pairs,
//! rendered as a `/etc/sysctl.d` drop-in file.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────────┐
//! │  detection / │──►│  HardwareFacts  │
//! │ manual entry │   └────────┬────────┘
//! └──────────────┘            │
//!          ┌──────────────────┼──────────────────┐
//!          ▼                  ▼                  ▼
//!   ┌────────────┐    ┌──────────────┐   ┌────────────┐
//!   │  baseline  │    │ profile rule │   │ IPv6 rule  │
//!   │  rule set  │    │   (1 of 10)  │   │    set     │
//!   └─────┬──────┘    └──────┬───────┘   └─────┬──────┘
//!         └───────────┬──────┴────────┬────────┘
//!                     ▼               │
//!            ┌──────────────────┐     │  baseline < profile < ipv6
//!            │ resolution engine│◄────┘
//!            └────────┬─────────┘
//!                     ▼
//!          sorted `key = value` artifact
//! ```
//!
//! ## Usage
//!
//! ```
//! use tunekit::{detect, resolve, WorkloadProfile};
//!
//! let facts = detect::detect();
//! let resolution = resolve(&facts, WorkloadProfile::Web, false)?;
//! let artifact = resolution.render("/etc/sysctl.d/99-tunekit.conf", "2026-08-06T12:00:00Z");
//! # Ok::<(), tunekit::TunekitError>(())
//! ```
//!
//! Resolution is pure: no probing, no global state, no I/O. Writing the
//! artifact, timestamps, and permissions are the caller's concern.

pub mod detect;
mod engine;
mod error;
mod facts;
mod params;
mod profile;
pub mod rules;

// Re-exports
pub use engine::{resolve, Resolution, APPLY_COMMAND, DEFAULT_TARGET_PATH};
pub use error::{Result, TunekitError};
pub use facts::{DiskMedium, HardwareFacts};
pub use params::{OverrideMap, ParamValue, SettingsMap};
pub use profile::WorkloadProfile;
