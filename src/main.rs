//! modpack-setup entry point.

use std::process::ExitCode;

use console::style;
use modpack_setup::config::load_config;
use modpack_setup::environment::ProcessEnvironment;
use modpack_setup::fetch::HttpDownloader;
use modpack_setup::provision::{ProvisionOutcome, Provisioner};
use modpack_setup::shell::SystemRunner;
use modpack_setup::SetupError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// `RUST_LOG` wins when set; otherwise INFO for this crate.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("modpack_setup=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn run() -> Result<(String, ProvisionOutcome), SetupError> {
    let env = ProcessEnvironment;
    let config = load_config(&env)?;
    let runner = SystemRunner;
    let downloader = HttpDownloader::new();

    let provisioner = Provisioner::new(&config, &runner, &env, &downloader)?;
    let outcome = provisioner.run()?;
    Ok((config.profile.name.clone(), outcome))
}

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok((profile, outcome)) => match outcome.profile_error {
            None => {
                println!(
                    "{} Select \"{}\" in the Minecraft launcher and press Play.",
                    style("✓").green().bold(),
                    profile
                );
                ExitCode::SUCCESS
            }
            Some(e) => {
                println!(
                    "{} Mods installed to {}",
                    style("✓").green().bold(),
                    outcome.mods_dir.display()
                );
                eprintln!("{} {}", style("Warning:").yellow().bold(), e);
                if let Some(hint) = e.hint() {
                    eprintln!("  {} {}", style("Hint:").yellow(), hint);
                }
                ExitCode::SUCCESS
            }
        },
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("  {} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::from(1)
        }
    }
}
