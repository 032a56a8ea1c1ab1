mod commands;
mod terminal;

use apscan_common::config::Config;
use commands::{CommandLine, Commands, decode, interfaces, scan, watch};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands: CommandLine = CommandLine::parse_args();

    logging::init_logging(commands.verbose);
    let cfg: Config = commands.config()?;
    print::banner(cfg.no_banner, cfg.quiet);

    if cfg!(windows) && !is_root::is_root() {
        tracing::warn!("not running elevated, some adapters may refuse to be opened");
    }

    let result: anyhow::Result<()> = match &commands.command {
        Commands::Scan => {
            print::header("starting scan", cfg.quiet);
            scan::scan(&cfg, &commands.interfaces).await
        }
        Commands::Watch { interval, count } => {
            print::header("watching access points", cfg.quiet);
            watch::watch(&cfg, &commands.interfaces, *interval, *count).await
        }
        Commands::Interfaces => interfaces::interfaces(&cfg, &commands.interfaces),
        Commands::Decode { file } => decode::decode(file, &cfg),
    };

    if cfg.quiet == 0 {
        print::end_of_program();
    }
    result
}
