pub mod decode;
pub mod interfaces;
pub mod scan;
pub mod watch;

use std::path::PathBuf;

use anyhow::Context;
use apscan_common::config::{BufferLimits, Config, INITIAL_BUFFER_SIZE, MAXIMUM_BUFFER_SIZE};
use apscan_common::vendors::VendorRepository;
use apscan_core::directory::{AdapterRegistry, StaticRegistry};
use apscan_core::enumerator::Enumerator;
use apscan_core::platform::{self, SystemBackend};
use apscan_core::survey::SurveyService;
use apscan_core::vendors::MacOuiRepo;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "apscan")]
#[command(version)]
#[command(about = "Lists the Wi-Fi access points every wireless adapter can see.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Reduce output; repeat for less
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Show driver-level diagnostics; repeat for more
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Do not print the banner
    #[arg(long, global = true)]
    pub no_banner: bool,

    /// Skip the OUI vendor lookup
    #[arg(long, global = true)]
    pub no_vendor: bool,

    /// Query all interfaces at the same time
    #[arg(long, global = true)]
    pub parallel: bool,

    /// Only query this adapter service name; may be repeated
    #[arg(short, long = "interface", value_name = "NAME", global = true)]
    pub interfaces: Vec<String>,

    /// First buffer size offered to the driver, in bytes
    #[arg(long, value_name = "BYTES", default_value_t = INITIAL_BUFFER_SIZE, global = true)]
    pub initial_buffer: usize,

    /// Largest buffer the driver may ask for, in bytes
    #[arg(long, value_name = "BYTES", default_value_t = MAXIMUM_BUFFER_SIZE, global = true)]
    pub max_buffer: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one enumeration pass and list every access point
    #[command(alias = "s")]
    Scan,
    /// Repeat the scan on a fixed interval until stopped
    #[command(alias = "w")]
    Watch {
        /// Seconds between two passes
        #[arg(short = 'n', long, default_value_t = 10)]
        interval: u64,
        /// Stop after this many passes
        #[arg(short, long)]
        count: Option<u64>,
    },
    /// List the adapters that would be queried
    #[command(alias = "i")]
    Interfaces,
    /// Decode a raw BSSID list response saved to a file
    #[command(alias = "d")]
    Decode { file: PathBuf },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> anyhow::Result<Config> {
        let buffer: BufferLimits =
            BufferLimits::new(self.initial_buffer, self.max_buffer).context("invalid buffer limits")?;

        Ok(Config {
            no_banner: self.no_banner,
            quiet: self.quiet,
            no_vendor: self.no_vendor,
            parallel: self.parallel,
            buffer,
        })
    }
}

/// Builds an enumerator over the system backend.
///
/// Names given with `--interface` replace the adapter registry.
pub fn build_enumerator(cfg: &Config, interfaces: &[String]) -> anyhow::Result<Enumerator> {
    let SystemBackend { registry, namespace } =
        platform::system_backend().context("cannot talk to network drivers on this system")?;

    let registry: Box<dyn AdapterRegistry> = if interfaces.is_empty() {
        registry
    } else {
        Box::new(StaticRegistry::new(interfaces.iter().cloned()))
    };

    Ok(Enumerator::new(registry, namespace)
        .with_limits(cfg.buffer)
        .parallel(cfg.parallel))
}

pub fn build_survey(cfg: &Config, enumerator: Enumerator) -> SurveyService {
    let vendors: Option<Box<dyn VendorRepository>> = if cfg.no_vendor {
        None
    } else {
        Some(Box::new(MacOuiRepo))
    };
    SurveyService::new(vendors, enumerator)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
