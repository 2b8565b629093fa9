//! hello-qmi command-line entry point.
//!
//! Verifies that this QMI can reach its quantum computing service:
//!
//! ```text
//!     hello-qmi [<device>]
//! ```
//!
//! With no argument the check runs against `9q-generic-qvm`. Any failure
//! past the advisory probe is fatal and exits non-zero.

use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use hello_qmi::{DEFAULT_DEVICE, DEFAULT_SHOTS, QcsConfig, hello_qmi};

/// Verify connectivity to a quantum computing service with a coin toss.
#[derive(Parser)]
#[command(name = "hello-qmi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Name of the quantum computer to greet.
    #[arg(default_value = DEFAULT_DEVICE)]
    device: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let config = QcsConfig::load();

    match hello_qmi(cli.device.trim(), DEFAULT_SHOTS, &config).await {
        Ok(greeting) => {
            println!("{greeting}");
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_argument_uses_default_device() {
        let cli = Cli::try_parse_from(["hello-qmi"]).unwrap();
        assert_eq!(cli.device, "9q-generic-qvm");
    }

    #[test]
    fn test_positional_device_argument() {
        let cli = Cli::try_parse_from(["hello-qmi", "Aspen-9-2Q-A"]).unwrap();
        assert_eq!(cli.device, "Aspen-9-2Q-A");
    }

    #[test]
    fn test_rejects_extra_arguments() {
        assert!(Cli::try_parse_from(["hello-qmi", "a", "b"]).is_err());
    }
}
