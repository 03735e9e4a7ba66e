//! flnet - FA-link frame tool
//!
//! Encodes frames to hex and decodes captured frames into their fields.
//! Sockets and token timing stay with whatever sends the bytes.

mod commands;
mod config;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flnet")]
#[command(about = "Encode and decode FA-link (FL-net) frames")]
#[command(version)]
struct Cli {
    /// Path to YAML config file
    #[arg(short, long, env = "FLNET_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a frame and print its fields
    Decode {
        /// Frame bytes as hex (whitespace and a 0x prefix are ignored)
        hex: Option<String>,

        /// Read raw frame bytes from a file instead
        #[arg(short, long, conflicts_with = "hex")]
        file: Option<PathBuf>,

        /// Print the decoded frame as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a frame and print it as hex
    Encode {
        #[command(subcommand)]
        frame: EncodeFrame,

        /// Write raw bytes to this file instead of printing hex
        #[arg(short, long, global = true)]
        out: Option<PathBuf>,
    },

    /// List transaction codes
    Codes,
}

#[derive(Subcommand)]
pub enum EncodeFrame {
    /// Token frame (header only)
    Token {
        #[command(flatten)]
        addr: Addressing,

        /// Set the token-holder-may-transmit flag
        #[arg(long)]
        token_holder: bool,

        /// Set the participation-in-progress flag
        #[arg(long)]
        participating: bool,
    },

    /// Trigger frame
    Trigger {
        #[command(flatten)]
        addr: Addressing,

        #[command(flatten)]
        identity: Identity,
    },

    /// Participation request frame
    ParticipationRequest {
        #[command(flatten)]
        addr: Addressing,

        #[command(flatten)]
        identity: Identity,
    },

    /// Cyclic data frame
    Cyclic {
        #[command(flatten)]
        addr: Addressing,

        /// Payload as hex
        #[arg(short, long, default_value = "")]
        data: String,

        /// Common area descriptors: addr1,size1,addr2,size2
        #[arg(long, value_delimiter = ',')]
        common_areas: Option<Vec<u16>>,
    },
}

/// Source and destination node numbers (config defaults apply when omitted).
#[derive(Args, Default)]
pub struct Addressing {
    /// Source node number (decimal or 0x hex)
    #[arg(short, long, value_parser = config::parse_node)]
    src: Option<u8>,

    /// Destination node number (decimal or 0x hex)
    #[arg(short = 'D', long, value_parser = config::parse_node)]
    dst: Option<u8>,
}

/// Identity strings (config defaults apply when omitted).
#[derive(Args, Default)]
pub struct Identity {
    /// Node name (10 bytes on the wire)
    #[arg(long)]
    node_name: Option<String>,

    /// Vendor name (10 bytes on the wire)
    #[arg(long)]
    vendor_name: Option<String>,

    /// Manufacturer name (10 bytes on the wire)
    #[arg(long)]
    manufacturer_name: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            return Err(e.into());
        }
    };
    for warning in config.warnings() {
        tracing::warn!("{}", warning);
    }

    match commands::execute(cli.command, &config) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            std::process::exit(1);
        }
    }
}
