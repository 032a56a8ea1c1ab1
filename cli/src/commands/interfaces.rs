use apscan_common::config::Config;
use apscan_common::network::interface::InterfaceId;

use crate::commands;
use crate::terminal::print;

pub fn interfaces(cfg: &Config, names: &[String]) -> anyhow::Result<()> {
    let ids: Vec<InterfaceId> = commands::build_enumerator(cfg, names)?.interfaces();

    if ids.is_empty() {
        print::header("NO ADAPTERS", cfg.quiet);
        return Ok(());
    }

    print::header("Network Adapters", cfg.quiet);
    let key_width: usize = ids.len().to_string().len();
    for (idx, id) in ids.iter().enumerate() {
        print::aligned_line(&idx.to_string(), key_width, id.as_str());
        if cfg.quiet == 0 {
            print::print_status(format!("  opened as {}", id.open_path()));
        }
    }
    Ok(())
}
