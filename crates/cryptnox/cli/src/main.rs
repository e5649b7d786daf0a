//! `cryptnox`: open a secure channel with a Cryptnox card from the terminal

use clap::{Parser, Subcommand};
#[cfg(feature = "pcsc")]
use cryptnox_wallet::{HandshakeConfig, PairingSlot};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

mod commands;
mod display;
#[cfg(feature = "pcsc")]
mod smartcard;
#[cfg_attr(not(feature = "pcsc"), allow(dead_code))]
mod reader;

#[derive(Parser)]
#[command(version, about = "Cryptnox CLI for opening secure channels with Cryptnox cards")]
struct Cli {
    /// Optional reader name to use (will auto-detect if not specified)
    #[cfg(feature = "pcsc")]
    #[arg(short, long, global = true)]
    reader: Option<String>,

    /// Sharing mode for the card connection
    #[cfg(feature = "pcsc")]
    #[arg(long, value_enum, default_value_t, global = true)]
    share_mode: smartcard::ShareMode,

    /// Debug level output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available readers
    #[cfg(feature = "pcsc")]
    List,

    /// Read a tag UID or open a secure channel with the card in the field
    ProcessCard {
        /// Application identifier to select, in hex
        #[arg(long)]
        aid: Option<String>,

        /// Pairing slot to open (defaults to the PUK fallback slot 0xFF)
        #[arg(long)]
        slot: Option<u8>,
    },

    /// Show the reader chip firmware
    #[cfg(feature = "pcsc")]
    Firmware,

    /// Derive the fallback pairing key from a PUK
    DerivePairingKey {
        /// PUK code (read from stdin when omitted)
        #[arg(long)]
        puk: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        #[cfg(feature = "pcsc")]
        Commands::List => commands::list_command()?,
        #[cfg(feature = "pcsc")]
        Commands::ProcessCard { aid, slot } => {
            let transport = pcsc_transport(&cli.reader, cli.share_mode)?;
            commands::process_card_command(transport, handshake_config(aid, slot)?)?
        }
        #[cfg(not(feature = "pcsc"))]
        Commands::ProcessCard { .. } => {
            anyhow::bail!("built without PC/SC support; rebuild with `--features pcsc`")
        }
        #[cfg(feature = "pcsc")]
        Commands::Firmware => {
            let transport = pcsc_transport(&cli.reader, cli.share_mode)?;
            commands::firmware_command(transport)?
        }
        Commands::DerivePairingKey { puk } => commands::derive_pairing_key_command(puk)?,
    }

    Ok(())
}

#[cfg(feature = "pcsc")]
fn pcsc_transport(
    reader: &Option<String>,
    share_mode: smartcard::ShareMode,
) -> anyhow::Result<smartcard::PcscTransport> {
    let config = smartcard::PcscConfig::default()
        .with_reader(reader.clone())
        .with_share_mode(share_mode);
    Ok(smartcard::PcscTransport::open(config)?)
}

#[cfg(feature = "pcsc")]
fn handshake_config(aid: Option<String>, slot: Option<u8>) -> anyhow::Result<HandshakeConfig> {
    let mut config = HandshakeConfig::default();
    if let Some(aid) = aid {
        config = config.with_aid(hex::decode(aid.trim())?);
    }
    if let Some(slot) = slot {
        config = config.with_pairing_slot(PairingSlot::from_p1(slot));
    }
    Ok(config)
}

/// Filter honouring `RUST_LOG` directives, defaulting to DEBUG when verbose and INFO otherwise
fn log_filter(verbose: bool, directives: &str) -> EnvFilter {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives)
}

fn setup_logging(verbose: bool) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, &directives))
        .with_ansi(true)
        .init();
}
