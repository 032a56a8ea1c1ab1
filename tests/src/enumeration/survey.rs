use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use apscan_common::network::mac;
use apscan_common::vendors::VendorRepository;
use apscan_core::survey::{Survey, SurveyService};
use apscan_protocols::bssid::{self, BssidList};
use apscan_protocols::ndis;
use pnet::util::MacAddr;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::support::{Adapter, SimulatedStack, beacon, crowded, encode};

/// Knows a single manufacturer by its OUI.
struct OneVendor;

impl VendorRepository for OneVendor {
    fn get_vendor(&self, mac_addr: MacAddr) -> Option<String> {
        match mac::octets(mac_addr) {
            [0xa4, 0x2b, 0xb0, ..] => Some("TP-LINK TECHNOLOGIES CO.,LTD.".to_string()),
            _ => None,
        }
    }
}

#[tokio::test]
async fn survey_on_a_blocking_worker_attaches_vendors() -> anyhow::Result<()> {
    let stack = Arc::new(
        SimulatedStack::new()
            .adapter(
                "{WIFI}",
                Adapter::Wireless(vec![
                    beacon([0xa4, 0x2b, 0xb0, 0x10, 0x20, 0x30], -55, "upstairs"),
                    beacon([0x02, 0x00, 0x00, 0x00, 0x00, 0x01], -70, ""),
                ]),
            )
            .adapter("{LAN}", Adapter::Status(ndis::NDIS_STATUS_INVALID_OID)),
    );
    let service: SurveyService = SurveyService::new(Some(Box::new(OneVendor)), stack.enumerator());

    let survey: Survey = tokio::task::spawn_blocking(move || service.perform_survey()).await?;

    assert!(survey.success);
    assert_eq!(survey.report.len(), 2);
    assert_eq!(survey.access_points.len(), 2);
    assert_eq!(
        survey.access_points[0].vendor.as_deref(),
        Some("TP-LINK TECHNOLOGIES CO.,LTD.")
    );
    assert!(survey.access_points[1].vendor.is_none());
    assert!(survey.access_points[1].record.is_hidden());
    Ok(())
}

#[tokio::test]
async fn stop_signal_from_another_task_ends_the_pass_early() -> anyhow::Result<()> {
    let mut stack = SimulatedStack::new();
    for i in 0..8 {
        stack = stack.adapter(&format!("{{AP-{i}}}"), Adapter::Wireless(crowded(3)));
    }
    let stack = Arc::new(stack);
    let stop: Arc<AtomicBool> = Arc::new(AtomicBool::new(true));
    let service: SurveyService = SurveyService::new(None, stack.enumerator().with_stop_signal(stop.clone()));

    let survey: Survey = tokio::task::spawn_blocking(move || service.perform_survey()).await?;

    assert!(stop.load(Ordering::SeqCst));
    assert!(survey.access_points.is_empty());
    assert_eq!(survey.report.len(), 8);
    // Nothing was attempted, so nothing failed.
    assert!(survey.success);
    assert_eq!(stack.mapping_count(), 0);
    Ok(())
}

#[test]
fn captured_responses_decode_like_live_ones() {
    let captured: Vec<u8> = encode(&[
        beacon([0x00, 0x1a, 0x11, 0xaa, 0xbb, 0xcc], -48, "office"),
        beacon([0x00, 0x1a, 0x11, 0xaa, 0xbb, 0xcd], -61, "office-5g"),
    ]);

    let list: BssidList = bssid::decode_bssid_list(&captured, captured.len());

    assert!(list.is_complete());
    assert_eq!(list.records[0].mac_address(), "001a11aabbcc");
    assert_eq!(list.records[1].ssid(), b"office-5g");
}

#[test]
fn random_responses_never_yield_more_than_declared() {
    let mut rng: StdRng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..500 {
        let len: usize = rng.random_range(0..2048);
        let mut noise: Vec<u8> = vec![0u8; len];
        rng.fill(noise.as_mut_slice());
        let claimed: usize = rng.random_range(0..=len + 64);

        let list: BssidList = bssid::decode_bssid_list(&noise, claimed);

        assert!(list.records.len() <= list.declared as usize);
        assert!(list.records.iter().all(|r| r.ssid().len() <= 32));
    }
}
