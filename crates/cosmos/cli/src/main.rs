use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use ledger_cosmos::emulator::EmulatorConfig;
use ledger_cosmos::{CosmosApp, DeviceSelector, ExchangeConfig, HidConfig};
use tracing::{info, warn};

mod commands;
mod utils;

use commands::*;
use utils::display;

#[derive(Parser)]
#[command(version, about = "Talk to the Cosmos application on a Ledger device")]
struct Cli {
    /// Run against the software device instead of USB hardware
    #[arg(long)]
    emulator: bool,

    /// HID path of the device to use (first device if not specified)
    #[arg(short, long, conflicts_with = "emulator")]
    device: Option<String>,

    /// Seconds to wait for each device response
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,

    /// Debug level output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List attached Ledger devices
    List,

    /// Show the application version
    Version,

    /// Echo data through the device
    Echo {
        /// Data as a hex string
        #[arg(required = true)]
        data: String,
    },

    /// Hash data with SHA-256 on the device
    Hash {
        /// Data as a hex string
        #[arg(required = true)]
        data: String,
    },

    /// Show the secp256k1 public key
    PublicKey,

    /// Sign data and verify the signature locally
    Sign {
        /// Data to sign, as a hex string
        #[arg(required = true)]
        data: String,
    },

    /// Run the end-to-end checks against the device
    SelfTest,
}

fn main() -> ExitCode {
    // Parse command line arguments
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", display::failure(e.as_ref()));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Commands::List = cli.command {
        return list_command();
    }

    let exchange = ExchangeConfig::default().with_timeout(Duration::from_secs(cli.timeout));

    if cli.emulator {
        info!("Using software device");
        let emulator = ledger_cosmos::emulator::Emulator::new(EmulatorConfig::default())?;
        let mut app = CosmosApp::from_transport_with_config(emulator, exchange);
        return dispatch(&mut app, &cli.command);
    }

    let selector = cli
        .device
        .clone()
        .map_or(DeviceSelector::FirstAvailable, DeviceSelector::Path);
    let hid = HidConfig::default().with_selector(selector);
    let mut app = CosmosApp::find_with_config(hid, exchange)?;

    let result = dispatch(&mut app, &cli.command);
    close_after(&mut app, result)
}

/// Release the device, keeping the command's own error when both fail
fn close_after<E: ledger_apdu_core::Executor>(
    app: &mut CosmosApp<E>,
    result: Result<(), Box<dyn std::error::Error>>,
) -> Result<(), Box<dyn std::error::Error>> {
    match (result, app.close()) {
        (result, Ok(())) => result,
        (Ok(()), Err(close)) => Err(close.into()),
        (Err(e), Err(close)) => {
            warn!(error = %close, "Failed to close device");
            Err(e)
        }
    }
}

fn dispatch<E: ledger_apdu_core::Executor>(
    app: &mut CosmosApp<E>,
    command: &Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::List => list_command(),
        Commands::Version => version_command(app),
        Commands::Echo { data } => echo_command(app, data),
        Commands::Hash { data } => hash_command(app, data),
        Commands::PublicKey => public_key_command(app),
        Commands::Sign { data } => sign_command(app, data),
        Commands::SelfTest => self_test_command(app),
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .init();
}
