//! Sealbox command line interface.
//!
//! The CLI is the transport layer over the core crates: it owns Base64
//! encoding of keys, hex rendering of ids, and turning core errors into
//! human-readable output. The core never sees an encoded parameter.
//!
//! # Usage
//!
//! ```bash
//! # Generate a key, seal a message, read it back once
//! KEY=$(sealbox keygen)
//! ID=$(sealbox seal --key "$KEY" --message "meet at noon" --max-views 1)
//! sealbox open --key "$KEY" --id "$ID"
//!
//! # Deactivate everything past its validity window
//! sealbox sweep
//! ```

#![allow(clippy::print_stdout, reason = "CLI results go to stdout")]

use std::{path::Path, time::Duration};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::{Parser, Subcommand};
use sealbox_crypto::{SymmetricKey, decrypt, encrypt, generate_key};
use sealbox_store::{MessageId, MessageStore, RedbStorage, SystemClock};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Sealbox: ephemeral self-destructing encrypted messages
#[derive(Parser, Debug)]
#[command(name = "sealbox")]
#[command(about = "Ephemeral self-destructing encrypted messages")]
#[command(version)]
struct Args {
    /// Path to the message database
    #[arg(long, default_value = "sealbox.redb")]
    db: std::path::PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a fresh 256-bit key (Base64)
    Keygen,

    /// Encrypt a message, store it, and print its id
    Seal {
        /// Base64 encryption key
        #[arg(short, long)]
        key: String,

        /// Plaintext message
        #[arg(short, long)]
        message: String,

        /// Validity window in seconds
        #[arg(long, env = "SEALBOX_EXPIRY", default_value = "60")]
        expiry: u64,

        /// Number of reads before self-destruction
        #[arg(long, default_value = "1")]
        max_views: u32,
    },

    /// Retrieve and decrypt a message by id, consuming one view
    Open {
        /// Base64 decryption key
        #[arg(short, long)]
        key: String,

        /// Message id (32 hex characters)
        #[arg(short, long)]
        id: String,
    },

    /// Deactivate all messages past their validity window
    Sweep,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::debug!(db = %args.db.display(), "sealbox starting");

    match args.command {
        Command::Keygen => {
            let key = generate_key()?;
            println!("{}", BASE64.encode(key.as_bytes()));
        },
        Command::Seal { key, message, expiry, max_views } => {
            let key = parse_key(&key)?;
            let envelope = encrypt(&message, &key)?;

            let store = open_store(&args.db)?;
            let id = store.create(&envelope, Duration::from_secs(expiry), max_views)?;

            println!("{id}");
        },
        Command::Open { key, id } => {
            let key = parse_key(&key)?;
            let id: MessageId = id.parse()?;

            let store = open_store(&args.db)?;
            let envelope = store.retrieve(id)?;

            println!("{}", decrypt(&envelope, &key)?);
        },
        Command::Sweep => {
            let store = open_store(&args.db)?;
            println!("{}", store.sweep_expired()?);
        },
    }

    Ok(())
}

/// Decode a Base64 key from the command line into key material.
fn parse_key(encoded: &str) -> Result<SymmetricKey, Box<dyn std::error::Error>> {
    let bytes = BASE64.decode(encoded)?;
    Ok(SymmetricKey::from_slice(&bytes)?)
}

/// Open the persistent store behind the CLI.
fn open_store(
    path: &Path,
) -> Result<MessageStore<RedbStorage, SystemClock>, Box<dyn std::error::Error>> {
    Ok(MessageStore::new(RedbStorage::open(path)?, SystemClock::new()))
}
