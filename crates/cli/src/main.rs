//! Cache hierarchy simulator CLI.
//!
//! This binary provides a single entry point for driving a hierarchy. It performs:
//! 1. **Trace run:** Build a hierarchy from a JSON config, replay a request trace, and
//!    print every response, optional line events, final cache contents, and statistics.
//! 2. **Address decode:** Print the tag/set/offset split of an address for a geometry.
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (e.g. `RUST_LOG=debug`).

use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cachebus_core::cache::{CacheController, CacheGeometry, LineEvent};
use cachebus_core::common::DEFAULT_ADDRESS_WIDTH;
use cachebus_core::config::Config;
use cachebus_core::sim::trace;
use cachebus_core::soc::System;

#[derive(Parser, Debug)]
#[command(
    name = "cachebus",
    author,
    version,
    about = "Set-associative cache hierarchy simulator",
    long_about = "Replay request traces through a configurable cache hierarchy.\n\nExamples:\n  cachebus run --config hierarchy.json --trace scenario.trace --dump\n  cachebus decode 0x1a --offset-bits 1 --set-bits 2"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a hierarchy and replay a trace through it.
    Run {
        /// JSON hierarchy configuration (defaults to a single 4-set, 2-way L1).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Request trace, one request per line.
        #[arg(short, long)]
        trace: Option<PathBuf>,

        /// Print every line mutation as a JSON object.
        #[arg(long)]
        events: bool,

        /// Print the contents of every cache after the trace.
        #[arg(long)]
        dump: bool,
    },

    /// Print the tag/set/offset split of an address.
    Decode {
        /// Address (decimal, 0x hex, or 0b binary).
        #[arg(value_parser = trace::parse_number)]
        addr: u64,

        /// Line offset bits.
        #[arg(long)]
        offset_bits: u32,

        /// Set index bits.
        #[arg(long)]
        set_bits: u32,

        /// Address width in bits.
        #[arg(long, default_value_t = DEFAULT_ADDRESS_WIDTH)]
        address_width: u32,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            config,
            trace,
            events,
            dump,
        } => cmd_run(config, trace, events, dump),
        Commands::Decode {
            addr,
            offset_bits,
            set_bits,
            address_width,
        } => cmd_decode(addr, offset_bits, set_bits, address_width),
    };

    if let Err(e) = result {
        eprintln!("[!] FATAL: {e}");
        process::exit(1);
    }
}

/// Builds the hierarchy, replays the trace, and prints the results.
fn cmd_run(
    config_path: Option<PathBuf>,
    trace_path: Option<PathBuf>,
    events: bool,
    dump: bool,
) -> Result<(), Box<dyn Error>> {
    let config = match &config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let mut system = System::new(&config)?;

    println!(
        "Configuration: {}",
        config_path
            .as_ref()
            .map_or_else(|| "default".to_owned(), |p| p.display().to_string())
    );
    println!("  Address width: {} bits", config.address_width);
    for cache in system.caches() {
        let g = cache.geometry();
        println!(
            "  {}: {} sets x {} ways, {}-byte lines, {}",
            cache.name(),
            g.num_sets(),
            g.ways(),
            g.line_bytes(),
            cache.policy_name()
        );
    }
    println!();

    if events {
        for level in 0..config.caches.len() {
            if let Some(cache) = system.cache_mut(level) {
                cache.set_observer(Box::new(|event: &LineEvent| {
                    match serde_json::to_string(event) {
                        Ok(json) => println!("{json}"),
                        Err(e) => eprintln!("[!] event encoding failed: {e}"),
                    }
                }));
            }
        }
    }

    let requests = match &trace_path {
        Some(path) => trace::load_trace(path)?,
        None => Vec::new(),
    };
    info!(requests = requests.len(), "replaying trace");
    for request in requests {
        let response = system.transact(request)?;
        println!("{:<32} => {}", request.to_string(), response.label);
    }

    if dump {
        println!();
        for cache in system.caches() {
            dump_cache(cache);
        }
    }

    println!();
    for cache in system.caches() {
        println!("{}: {}", cache.name(), cache.stats());
    }
    Ok(())
}

/// Prints every way of every set.
fn dump_cache(cache: &CacheController) {
    println!("[{}]", cache.name());
    for (set, way, line) in cache.store().iter() {
        println!(
            "  set {set:>3} way {way:>2}: {}{} tag={:#x} data={:#018x} stamp={}",
            if line.valid { 'V' } else { '-' },
            if line.dirty { 'D' } else { '-' },
            line.tag,
            line.data,
            line.replace_state
        );
    }
}

/// Prints the tag/set/offset split of `addr`.
fn cmd_decode(
    addr: u64,
    offset_bits: u32,
    set_bits: u32,
    address_width: u32,
) -> Result<(), Box<dyn Error>> {
    let geometry = CacheGeometry::new(address_width, offset_bits, set_bits, 1)?;
    let parts = geometry.decode(addr);
    println!(
        "addr {:#x} (masked {:#x})",
        addr,
        addr & geometry.address_mask()
    );
    println!("  tag    {:#x} ({} bits)", parts.tag, geometry.tag_bits());
    println!("  set    {} ({} bits)", parts.set, geometry.set_bits());
    println!("  offset {} ({} bits)", parts.offset, geometry.offset_bits());
    println!(
        "  line   {:#x}",
        geometry.encode_base(parts.tag, parts.set)
    );
    Ok(())
}
