//! cmdpulse Binary
//!
//! Pushes CMD frames to a TCP server, periodically or in bursts.

use std::time::Duration;

use clap::{Parser, Subcommand};
use cmdpulse::protocol::{build_sequence, to_hex, Command, Frame};
use cmdpulse::{Config, PacketSender, Result, Shutdown};
use tracing_subscriber::{fmt, EnvFilter};

/// cmdpulse
#[derive(Parser, Debug)]
#[command(name = "cmdpulse")]
#[command(about = "Send CRC-16 framed CMD packets to a TCP server")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "33721")]
    port: u16,

    /// Text carried by command 1 in the default sequence
    #[arg(short, long)]
    text: Option<String>,

    /// Raw frame as ID:HEX (repeatable); replaces the default sequence
    #[arg(short, long = "frame", value_name = "ID:HEX")]
    frames: Vec<Command>,

    /// Connect timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    connect_timeout_ms: u64,

    /// Write timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    write_timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send the sequence over one connection at a fixed period
    Periodic {
        /// Seconds to wait between iterations
        #[arg(long, default_value = "1")]
        period_secs: u64,

        /// Stop after this many iterations
        #[arg(long)]
        iterations: Option<u64>,
    },

    /// Open a new connection per burst and send the sequence repeatedly
    Burst {
        /// Sequence repetitions per connection
        #[arg(short, long, default_value = "10")]
        size: usize,

        /// Stop after this many bursts
        #[arg(long)]
        bursts: Option<u64>,
    },

    /// Print the encoded sequence as hex without connecting
    Dump,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cmdpulse=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let sequence = build_sequence(args.frames.clone(), args.text.as_deref())?;

    let builder = Config::builder()
        .host(&args.host)
        .port(args.port)
        .sequence(sequence)
        .connect_timeout_ms(args.connect_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms);

    let config = match args.command {
        Commands::Periodic {
            period_secs,
            iterations,
        } => builder
            .periodic(Duration::from_secs(period_secs), iterations)
            .build(),
        Commands::Burst { size, bursts } => builder.burst(size, bursts).build(),
        Commands::Dump => {
            let config = builder.build();
            config.validate()?;
            for command in &config.sequence {
                let frame = Frame::try_from(command)?;
                println!("{:<28} {}", command.to_string(), to_hex(&frame.encode()));
            }
            return Ok(());
        }
    };

    tracing::info!("cmdpulse v{}", cmdpulse::VERSION);
    tracing::info!("Target: {}", config.addr());
    tracing::info!("Mode: {:?}", config.mode);

    let shutdown = Shutdown::new();
    let handle = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::info!("Received Ctrl+C, stopping...");
        handle.cancel();
    }) {
        tracing::warn!("Could not install Ctrl+C handler: {}", e);
    }

    let sender = PacketSender::new(config, shutdown)?;
    let stats = sender.run()?;

    tracing::info!(
        "Stopped after {} frames ({} bytes) over {} connections",
        stats.frames,
        stats.bytes,
        stats.connections
    );
    Ok(())
}
