//! x8h7rst_cli - command line client for the x8h7rstd daemon.
//!
//! ```bash
//! x8h7rst_cli status
//! x8h7rst_cli reset            # hold the H7 in reset
//! x8h7rst_cli release          # let the H7 run
//! x8h7rst_cli write 1
//! x8h7rst_cli cycle --hold-ms 100
//! ```

mod proxies;
mod set;
mod status;

use crate::set::{HOLD_IN_RESET, RELEASE, cycle_handler, write_handler};
use crate::status::status_handler;
use clap::{Parser, Subcommand};
use log::{debug, error};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "x8h7rst_cli")]
#[command(bin_name = "x8h7rst_cli")]
struct Cli {
    #[arg(
        long = "attribute",
        default_value = "x8h7_reset",
        help = "attribute published by x8h7rstd to operate on"
    )]
    attribute: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the current state
    Status,
    /// Hold the device in reset
    Reset,
    /// Release the device from reset
    Release,
    /// Write a raw value to the attribute
    Write { value: String },
    /// Hold the device in reset, then release it
    Cycle {
        #[arg(long = "hold-ms", default_value_t = 50)]
        hold_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    debug!("parsed cli command with {cli:?}");
    let attribute = cli.attribute.as_str();
    let result = match cli.command {
        Commands::Status => status_handler(attribute).await,
        Commands::Reset => write_handler(attribute, HOLD_IN_RESET).await,
        Commands::Release => write_handler(attribute, RELEASE).await,
        Commands::Write { value } => write_handler(attribute, &value).await,
        Commands::Cycle { hold_ms } => {
            cycle_handler(attribute, Duration::from_millis(hold_ms)).await
        }
    };
    match result {
        Ok(msg) => {
            println!("{msg}");
            Ok(())
        }
        Err(e) => {
            error!("{e}");
            Err(e.into())
        }
    }
}
