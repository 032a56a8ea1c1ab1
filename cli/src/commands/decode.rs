use std::path::Path;

use anyhow::Context;
use apscan_common::config::Config;
use apscan_common::vendors::VendorRepository;
use apscan_core::vendors::MacOuiRepo;
use apscan_protocols::bssid::{self, BssidList};
use colored::*;
use tracing::warn;

use crate::success;
use crate::terminal::format::{self, Detail};
use crate::terminal::print;

/// Decodes a raw `OID_802_11_BSSID_LIST` response captured from a driver.
pub fn decode(path: &Path, cfg: &Config) -> anyhow::Result<()> {
    let raw: Vec<u8> = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let list: BssidList = bssid::decode_bssid_list(&raw, raw.len());

    if let Some(malformed) = &list.malformed {
        warn!(
            "decoded {} of {} declared records: {malformed}",
            list.records.len(),
            list.declared
        );
    }

    let vendors: Option<MacOuiRepo> = (!cfg.no_vendor).then_some(MacOuiRepo);

    print::header("Decoded BSSID List", cfg.quiet);
    for (idx, record) in list.records.iter().enumerate() {
        if cfg.quiet > 1 {
            break;
        }
        print::tree_head(idx, &format::display_name(record));
        let mut details: Vec<Detail> = vec![
            format::bssid_to_detail(record),
            format::signal_to_detail(record),
            format::ssid_to_detail(record),
        ];
        let vendor: Option<String> = vendors.as_ref().and_then(|repo| repo.get_vendor(record.mac()));
        if let Some(vendor_detail) = format::vendor_to_detail(&vendor) {
            details.push(vendor_detail);
        }
        print::as_tree_one_level(details);
    }

    let count: ColoredString = format!("{} records", list.records.len()).bold().green();
    success!("Decoded {count} from {} bytes", raw.len());

    if list.records.is_empty() && list.malformed.is_some() {
        anyhow::bail!("{} does not hold a BSSID list", path.display());
    }
    Ok(())
}
