//! Interactive tuning wizard
//!
//! Guides the operator through detection review, per-fact overrides, the
//! workload menu, and the IPv6 toggle, then writes the artifact. This
//! module is presentation only: detection, rule evaluation, and rendering
//! all live in the tunekit library.

use std::path::PathBuf;

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use tunekit::{detect, resolve, DiskMedium, HardwareFacts, WorkloadProfile, DEFAULT_TARGET_PATH};

use crate::artifact::Artifact;
use crate::error::Result;
use crate::output;

/// Run the interactive wizard
pub fn run() -> Result<()> {
    let theme = ColorfulTheme::default();

    println!();
    println!(
        "{}",
        style("╔══════════════════════════════════════════════════╗").cyan()
    );
    println!(
        "{}",
        style("║             tunekit Tuning Wizard                ║").cyan()
    );
    println!(
        "{}",
        style("╚══════════════════════════════════════════════════╝").cyan()
    );
    println!();

    // Step 1: Hardware
    println!("{}", style("Step 1: Hardware").bold().underlined());
    let spinner = output::Spinner::new("Detecting hardware...");
    let detected = detect::detect();
    spinner.finish_success("Hardware detection complete");
    output::print_facts(&detected);
    println!();

    let facts = step_confirm_facts(&theme, detected)?;
    facts.validate()?;

    // Step 2: Workload
    println!();
    println!("{}", style("Step 2: Workload").bold().underlined());
    println!();
    let profile = step_select_profile(&theme)?;

    // Step 3: IPv6
    println!();
    println!("{}", style("Step 3: IPv6").bold().underlined());
    println!();
    let ipv6_disabled = Confirm::with_theme(&theme)
        .with_prompt("Disable IPv6 entirely?")
        .default(false)
        .interact()?;

    // Step 4: Destination and confirmation
    println!();
    println!("{}", style("Step 4: Output").bold().underlined());
    println!();
    let path: String = Input::with_theme(&theme)
        .with_prompt("Destination file")
        .default(DEFAULT_TARGET_PATH.to_string())
        .interact_text()?;
    let path = PathBuf::from(path);

    let resolution = resolve(&facts, profile, ipv6_disabled)?;
    println!();
    output::info(&format!(
        "{} parameters resolved for {} ({})",
        resolution.settings().len(),
        profile.name(),
        facts.summary()
    ));

    let proceed = Confirm::with_theme(&theme)
        .with_prompt(format!("Write {}?", path.display()))
        .default(true)
        .interact()?;
    if !proceed {
        println!("Wizard cancelled; nothing written.");
        return Ok(());
    }

    let generated_at = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let rendered = resolution.render(&path.display().to_string(), &generated_at);
    let artifact = Artifact::new(&path, rendered);

    if let Some(backup) = artifact.backup_existing()? {
        output::info(&format!("Existing file backed up to {}", backup.display()));
    }
    artifact.write()?;

    println!();
    println!(
        "{}",
        style("╔══════════════════════════════════════════════════╗").green()
    );
    println!(
        "{}",
        style("║               Tuning file written                ║").green()
    );
    println!(
        "{}",
        style("╚══════════════════════════════════════════════════╝").green()
    );
    output::print_apply_instructions(&path);

    Ok(())
}

/// Confirm detected facts or collect manual overrides
fn step_confirm_facts(theme: &ColorfulTheme, detected: HardwareFacts) -> Result<HardwareFacts> {
    let use_detected = Confirm::with_theme(theme)
        .with_prompt("Use detected values?")
        .default(true)
        .interact()?;
    if use_detected {
        return Ok(detected);
    }

    let cores: u32 = Input::with_theme(theme)
        .with_prompt("Physical cores")
        .default(detected.cores)
        .interact_text()?;
    let threads: u32 = Input::with_theme(theme)
        .with_prompt("Logical threads")
        .default(detected.threads.max(cores))
        .interact_text()?;
    let ram_gb: u64 = Input::with_theme(theme)
        .with_prompt("RAM (GB)")
        .default(detected.ram_gb)
        .interact_text()?;
    let nic_mbps: u32 = Input::with_theme(theme)
        .with_prompt("NIC speed (Mbps)")
        .default(detected.nic_mbps)
        .interact_text()?;

    let media = [DiskMedium::Hdd, DiskMedium::Ssd, DiskMedium::Nvme];
    let default_medium = media.iter().position(|m| *m == detected.disk).unwrap_or(1);
    let medium_names: Vec<&str> = media.iter().map(|m| m.name()).collect();
    let selection = Select::with_theme(theme)
        .with_prompt("Storage medium")
        .items(&medium_names)
        .default(default_medium)
        .interact()?;

    Ok(HardwareFacts {
        cores,
        threads,
        ram_gb,
        nic_mbps,
        disk: media[selection],
        container: detected.container,
    })
}

/// Select a workload profile from the use-case menu
fn step_select_profile(theme: &ColorfulTheme) -> Result<WorkloadProfile> {
    let profiles = WorkloadProfile::all();
    let items: Vec<String> = profiles
        .iter()
        .map(|p| format!("{} — {}", p.name(), p.description()))
        .collect();

    let selection = Select::with_theme(theme)
        .with_prompt("What is this machine's primary workload?")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(profiles[selection])
}
