//! tunekit CLI - Hardware-aware kernel sysctl tuning generator
//!
//! Detects hardware facts (or accepts manual overrides), resolves the
//! tuning parameter set for a selected workload profile, and writes the
//! result as a sysctl.d drop-in file.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod artifact;
mod error;
mod output;
mod wizard;

use artifact::Artifact;
use error::{CliError, Result};
use tunekit::{detect, resolve, DiskMedium, HardwareFacts, WorkloadProfile, DEFAULT_TARGET_PATH};

/// tunekit - Kernel sysctl tuning generator
#[derive(Parser)]
#[command(name = "tunekit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Manual overrides for detected hardware facts
#[derive(Args)]
struct FactArgs {
    /// Physical core count (detected if omitted)
    #[arg(long)]
    cores: Option<u32>,

    /// Logical thread count (detected if omitted)
    #[arg(long)]
    threads: Option<u32>,

    /// Total RAM in GB (detected if omitted)
    #[arg(long)]
    ram_gb: Option<u64>,

    /// NIC link speed in Mbps (detected if omitted)
    #[arg(long)]
    nic_mbps: Option<u32>,

    /// Storage medium: hdd, ssd, nvme (detected if omitted)
    #[arg(long)]
    disk: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a sysctl tuning file for a workload profile
    Generate {
        /// Workload profile (see 'tunekit profiles')
        #[arg(short, long, default_value = "general")]
        profile: String,

        /// Destination file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable IPv6 entirely instead of hardening it
        #[arg(long)]
        disable_ipv6: bool,

        /// Print the file instead of writing it
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        facts: FactArgs,
    },

    /// Interactive detection, override, and generation flow
    Wizard,

    /// Show detected hardware facts
    Detect {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show information about a workload profile
    Profile {
        /// Profile name
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all workload profiles
    Profiles,

    /// Check whether the installed file matches what would be generated
    Drift {
        /// Workload profile the installed file was generated with
        #[arg(short, long, default_value = "general")]
        profile: String,

        /// Installed file to check
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// IPv6 was disabled at generation time
        #[arg(long)]
        disable_ipv6: bool,

        #[command(flatten)]
        facts: FactArgs,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            profile,
            output,
            disable_ipv6,
            dry_run,
            facts,
        } => cmd_generate(&profile, output, disable_ipv6, dry_run, &facts),

        Commands::Wizard => wizard::run(),

        Commands::Detect { json } => cmd_detect(json),

        Commands::Profile { name, json } => cmd_profile(&name, json),

        Commands::Profiles => {
            output::print_profile_list();
            Ok(())
        }

        Commands::Drift {
            profile,
            output,
            disable_ipv6,
            facts,
        } => cmd_drift(&profile, output, disable_ipv6, &facts),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

// =============================================================================
// Command Implementations
// =============================================================================

fn cmd_generate(
    profile: &str,
    output: Option<PathBuf>,
    disable_ipv6: bool,
    dry_run: bool,
    fact_args: &FactArgs,
) -> Result<()> {
    let profile = parse_profile(profile)?;
    let facts = gather_facts(fact_args)?;

    let resolution = resolve(&facts, profile, disable_ipv6)?;
    let path = output.unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET_PATH));
    let rendered = resolution.render(&path.display().to_string(), &utc_timestamp());

    if dry_run {
        print!("{}", rendered);
        return Ok(());
    }

    let artifact = Artifact::new(&path, rendered);
    if let Some(backup) = artifact.backup_existing()? {
        output::info(&format!("Existing file backed up to {}", backup.display()));
    }
    artifact.write()?;

    output::success(&format!(
        "Wrote {} parameters for {} to {}",
        resolution.settings().len(),
        profile.name(),
        path.display()
    ));
    if facts.container {
        output::warning("container detected: these parameters usually apply on the host only");
    }
    output::print_apply_instructions(&path);

    Ok(())
}

fn cmd_detect(json: bool) -> Result<()> {
    let facts = if json {
        detect::detect()
    } else {
        let spinner = output::Spinner::new("Detecting hardware...");
        let facts = detect::detect();
        spinner.finish_success("Hardware detection complete");
        facts
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&facts)?);
    } else {
        output::print_facts(&facts);
        println!();
    }
    Ok(())
}

fn cmd_profile(name: &str, json: bool) -> Result<()> {
    let profile = parse_profile(name)?;
    let facts = detect::detect();
    let overrides = tunekit::rules::rule_for(profile)(&facts);

    if json {
        let info = serde_json::json!({
            "name": profile.name(),
            "config_name": profile.config_name(),
            "description": profile.description(),
            "overrides": overrides
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<std::collections::BTreeMap<_, _>>(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        output::header(&format!("Profile: {}", profile.name()));
        println!("{}", profile.description());

        output::subheader("Overrides for this machine's hardware:");
        for (key, value) in overrides.iter() {
            println!("  {} = {}", key, value);
        }
        println!();
    }

    Ok(())
}

fn cmd_drift(
    profile: &str,
    output: Option<PathBuf>,
    disable_ipv6: bool,
    fact_args: &FactArgs,
) -> Result<()> {
    let profile = parse_profile(profile)?;
    let facts = gather_facts(fact_args)?;
    let path = output.unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET_PATH));

    if !path.exists() {
        return Err(CliError::DriftTargetMissing { path });
    }

    let resolution = resolve(&facts, profile, disable_ipv6)?;
    let rendered = resolution.render(&path.display().to_string(), &utc_timestamp());
    let artifact = Artifact::new(&path, rendered);

    if artifact.matches_disk() {
        output::success(&format!(
            "{} is in sync with the {} profile",
            path.display(),
            profile.config_name()
        ));
        Ok(())
    } else {
        output::warning(&format!(
            "{} differs from what tunekit would generate",
            path.display()
        ));
        output::info("Run 'tunekit generate' to regenerate");
        Err(CliError::DriftDetected)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_profile(name: &str) -> Result<WorkloadProfile> {
    Ok(name.parse::<WorkloadProfile>()?)
}

/// Detected facts with any manual overrides applied, validated
fn gather_facts(args: &FactArgs) -> Result<HardwareFacts> {
    let mut facts = detect::detect();

    if let Some(cores) = args.cores {
        facts.cores = cores;
        // Keep the snapshot coherent when only the core count is given.
        if args.threads.is_none() && facts.threads < cores {
            facts.threads = cores;
        }
    }
    if let Some(threads) = args.threads {
        facts.threads = threads;
    }
    if let Some(ram_gb) = args.ram_gb {
        facts.ram_gb = ram_gb;
    }
    if let Some(nic_mbps) = args.nic_mbps {
        facts.nic_mbps = nic_mbps;
    }
    if let Some(ref disk) = args.disk {
        facts.disk = disk.parse::<DiskMedium>()?;
    }

    facts.validate()?;
    Ok(facts)
}

fn utc_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_overrides() -> FactArgs {
        FactArgs {
            cores: None,
            threads: None,
            ram_gb: None,
            nic_mbps: None,
            disk: None,
        }
    }

    #[test]
    fn test_gather_facts_applies_overrides() {
        let args = FactArgs {
            cores: Some(8),
            threads: Some(16),
            ram_gb: Some(64),
            nic_mbps: Some(10_000),
            disk: Some("nvme".to_string()),
        };
        let facts = gather_facts(&args).unwrap();
        assert_eq!(facts.cores, 8);
        assert_eq!(facts.threads, 16);
        assert_eq!(facts.ram_gb, 64);
        assert_eq!(facts.nic_mbps, 10_000);
        assert_eq!(facts.disk, DiskMedium::Nvme);
    }

    #[test]
    fn test_gather_facts_keeps_threads_coherent() {
        let args = FactArgs {
            cores: Some(512),
            ..no_overrides()
        };
        let facts = gather_facts(&args).unwrap();
        assert!(facts.threads >= facts.cores);
    }

    #[test]
    fn test_gather_facts_rejects_bad_disk() {
        let args = FactArgs {
            disk: Some("floppy".to_string()),
            ..no_overrides()
        };
        assert!(gather_facts(&args).is_err());
    }

    #[test]
    fn test_gather_facts_rejects_zero_ram() {
        let args = FactArgs {
            ram_gb: Some(0),
            ..no_overrides()
        };
        assert!(gather_facts(&args).is_err());
    }

    #[test]
    fn test_parse_profile_rejects_unknown() {
        assert!(parse_profile("mainframe").is_err());
        assert!(parse_profile("database").is_ok());
    }
}
