//! Output formatting and display utilities
//!
//! Provides colored, formatted output for the CLI

use colored::Colorize;

use tunekit::{HardwareFacts, WorkloadProfile};

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}

/// Print a header
pub fn header(msg: &str) {
    println!("\n{}", msg.bold().underline());
}

/// Print a subheader
pub fn subheader(msg: &str) {
    println!("\n{}", msg.bold());
}

/// Print the CLI banner
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!("{}", format!("tunekit v{}", version).bold());
    println!("{}", "Hardware-aware kernel sysctl tuning".dimmed());
}

/// Print a detected hardware summary
pub fn print_facts(facts: &HardwareFacts) {
    subheader("Detected hardware:");
    println!("  CPU:       {} cores / {} threads", facts.cores, facts.threads);
    println!("  Memory:    {} GB", facts.ram_gb);
    println!("  Network:   {} Mbps", facts.nic_mbps);
    println!("  Storage:   {}", facts.disk.name());
    println!(
        "  Container: {}",
        if facts.container { "yes" } else { "no" }
    );
    if facts.container {
        warning("container detected: kernel parameters are typically managed by the host");
    }
}

/// Print the profile list with descriptions
pub fn print_profile_list() {
    header("Workload profiles");
    for profile in WorkloadProfile::all() {
        println!(
            "  {:<16} {} — {}",
            profile.config_name().cyan(),
            profile.name().bold(),
            profile.description().dimmed()
        );
    }
    println!();
}

/// Print post-generation install instructions
pub fn print_apply_instructions(path: &std::path::Path) {
    subheader("Next steps:");
    println!("  1. Review the generated file: {}", path.display());
    println!(
        "  2. Apply with: {}",
        format!("sudo {}", tunekit::APPLY_COMMAND).bold()
    );
    println!("  3. Verify a key, e.g.: sysctl net.core.somaxconn");
    println!();
}

/// Progress spinner for long operations
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    pub fn new(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_style(
            indicatif::ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { pb }
    }

    pub fn finish_success(self, msg: &str) {
        self.pb.finish_and_clear();
        success(msg);
    }
}
