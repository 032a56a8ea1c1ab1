use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use apscan_common::config::BufferLimits;
use apscan_core::enumerator::{EnumerationResult, InterfaceOutcome};
use apscan_core::error::QueryError;
use apscan_protocols::ndis;

use crate::support::{Adapter, SimulatedStack, beacon, crowded};

const WIFI: &str = "{6B1F0C4E-0001}";
const ETHERNET: &str = "{6B1F0C4E-0002}";
const DONGLE: &str = "{6B1F0C4E-0003}";

fn ssids(result: &EnumerationResult) -> Vec<String> {
    result
        .records
        .iter()
        .map(|r| r.ssid_lossy().into_owned())
        .collect()
}

#[test]
fn mixed_adapters_yield_every_wireless_record() {
    let stack = Arc::new(
        SimulatedStack::new()
            .adapter(
                WIFI,
                Adapter::Wireless(vec![
                    beacon([0x00, 0x1a, 0x11, 0x00, 0x00, 0x01], -41, "home"),
                    beacon([0x00, 0x1a, 0x11, 0x00, 0x00, 0x02], -67, "home-guest"),
                ]),
            )
            .adapter(ETHERNET, Adapter::Status(ndis::NDIS_STATUS_NOT_SUPPORTED))
            .adapter(
                DONGLE,
                Adapter::Wireless(vec![beacon([0xa4, 0x2b, 0xb0, 0x10, 0x20, 0x30], -80, "cafe")]),
            ),
    );

    let result: EnumerationResult = stack.enumerator().enumerate();

    assert!(result.success);
    assert_eq!(ssids(&result), vec!["home", "home-guest", "cafe"]);
    assert_eq!(result.records[1].signal_strength(), -67);
    assert_eq!(result.succeeded(), 3);
    assert!(matches!(result.report[1].outcome, InterfaceOutcome::NoData { .. }));
    assert_eq!(stack.mapping_count(), 0);
    assert_eq!(stack.open_handles(), 0);
    assert_eq!(stack.peak_handles(), 1);
}

#[test]
fn unopenable_and_empty_adapters_keep_the_pass_successful() {
    let stack = Arc::new(
        SimulatedStack::new()
            .adapter(
                WIFI,
                Adapter::Wireless(vec![
                    beacon([0x00, 0x1a, 0x11, 0x00, 0x00, 0x0a], -45, "a1"),
                    beacon([0x00, 0x1a, 0x11, 0x00, 0x00, 0x0b], -58, "a2"),
                ]),
            )
            .adapter(ETHERNET, Adapter::Missing)
            .adapter(DONGLE, Adapter::Wireless(Vec::new())),
    );

    let result: EnumerationResult = stack.enumerator().enumerate();

    assert!(result.success);
    assert_eq!(ssids(&result), vec!["a1", "a2"]);
    assert!(matches!(result.report[1].outcome, InterfaceOutcome::Skipped(_)));
    assert!(matches!(
        result.report[2].outcome,
        InterfaceOutcome::Scanned { records: 0, malformed: None }
    ));
    assert_eq!(result.succeeded(), 2);
    assert_eq!(result.skipped(), 1);
    assert_eq!(stack.mapping_count(), 0);
}

#[test]
fn a_lone_failing_adapter_fails_the_pass() {
    let stack = Arc::new(SimulatedStack::new().adapter(WIFI, Adapter::Status(ndis::ERROR_ACCESS_DENIED)));

    let result: EnumerationResult = stack.enumerator().enumerate();

    assert!(!result.success);
    assert!(result.records.is_empty());
    assert!(matches!(
        result.report[0].outcome,
        InterfaceOutcome::Failed(QueryError::DriverTerminal { status: ndis::ERROR_ACCESS_DENIED })
    ));
    assert_eq!(stack.offered(WIFI), vec![4096]);
}

#[test]
fn a_machine_without_adapters_succeeds_with_nothing() {
    let stack = Arc::new(SimulatedStack::new());

    let result: EnumerationResult = stack.enumerator().enumerate();

    assert!(result.success);
    assert!(result.records.is_empty());
    assert_eq!(result.attempted(), 0);
}

#[test]
fn one_good_adapter_outweighs_broken_ones() {
    let stack = Arc::new(
        SimulatedStack::new()
            .adapter(ETHERNET, Adapter::Missing)
            .adapter(DONGLE, Adapter::Greedy)
            .adapter(WIFI, Adapter::Wireless(vec![beacon([2, 0, 0, 0, 0, 1], -50, "lab")])),
    );

    let result: EnumerationResult = stack.enumerator().enumerate();

    assert!(result.success);
    assert_eq!(ssids(&result), vec!["lab"]);
    assert_eq!(result.skipped(), 1);
    assert_eq!(result.failed(), 1);
    assert_eq!(stack.mapping_count(), 0);
}

#[test]
fn large_lists_grow_the_buffer_to_the_reported_size() {
    let stack = Arc::new(SimulatedStack::new().adapter(WIFI, Adapter::Wireless(crowded(1000))));

    let result: EnumerationResult = stack.enumerator().enumerate();

    assert!(result.success);
    assert_eq!(result.records.len(), 1000);
    // 4 byte header plus 1000 records of 104 bytes each.
    assert_eq!(stack.offered(WIFI), vec![4096, 104_004]);
}

#[test]
fn a_greedy_driver_stops_at_the_ceiling() {
    let stack = Arc::new(SimulatedStack::new().adapter(DONGLE, Adapter::Greedy));

    let result: EnumerationResult = stack.enumerator().enumerate();

    assert!(!result.success);
    assert!(matches!(
        result.report[0].outcome,
        InterfaceOutcome::Failed(QueryError::BufferOverflow { requested: 4_194_304, max: 2_097_152 })
    ));
    let offered: Vec<usize> = stack.offered(DONGLE);
    assert_eq!(offered.len(), 10);
    assert_eq!(offered.last(), Some(&2_097_152));
    assert_eq!(stack.open_handles(), 0);
}

#[test]
fn custom_limits_are_honoured_per_interface() {
    let stack = Arc::new(
        SimulatedStack::new()
            .adapter(WIFI, Adapter::Wireless(crowded(20)))
            .adapter(DONGLE, Adapter::Wireless(crowded(1))),
    );
    let limits: BufferLimits = BufferLimits::new(512, 1 << 16).unwrap();

    let result: EnumerationResult = stack.enumerator().with_limits(limits).enumerate();

    assert!(result.success);
    assert_eq!(stack.offered(WIFI), vec![512, 2084]);
    assert_eq!(stack.offered(DONGLE), vec![512]);
}

#[test]
fn foreign_mappings_are_left_alone() {
    let stack = Arc::new(
        SimulatedStack::new()
            .adapter(WIFI, Adapter::Wireless(crowded(3)))
            .foreign_mapping(WIFI, r"\Device\SomethingElse"),
    );

    let result: EnumerationResult = stack.enumerator().enumerate();

    assert!(!result.success);
    assert!(matches!(result.report[0].outcome, InterfaceOutcome::Skipped(_)));
    assert_eq!(stack.mapping(WIFI).as_deref(), Some(r"\Device\SomethingElse"));
    assert!(stack.offered(WIFI).is_empty());
}

#[test]
fn parallel_pass_matches_sequential_pass() {
    let build = || {
        Arc::new(
            SimulatedStack::new()
                .adapter("{A}", Adapter::Wireless(crowded(50)))
                .adapter("{B}", Adapter::Status(ndis::ERROR_NOT_SUPPORTED))
                .adapter("{C}", Adapter::Wireless(vec![beacon([2, 0, 0, 0, 0xff, 0xff], -90, "far")]))
                .adapter("{D}", Adapter::Wireless(crowded(7))),
        )
    };

    let sequential: EnumerationResult = build().enumerator().enumerate();
    let parallel_stack = build();
    let parallel: EnumerationResult = parallel_stack.enumerator().parallel(true).enumerate();

    assert!(parallel.success);
    assert_eq!(sequential.records, parallel.records);
    let order: Vec<&str> = parallel.report.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(order, vec!["{A}", "{B}", "{C}", "{D}"]);
    assert_eq!(parallel_stack.mapping_count(), 0);
    assert_eq!(parallel_stack.open_handles(), 0);
}

#[test]
fn a_raised_stop_signal_skips_remaining_interfaces() {
    let stack = Arc::new(
        SimulatedStack::new()
            .adapter(WIFI, Adapter::Wireless(crowded(2)))
            .adapter(DONGLE, Adapter::Wireless(crowded(2))),
    );
    let stop: Arc<AtomicBool> = Arc::new(AtomicBool::new(false));
    let flag: Arc<AtomicBool> = stop.clone();

    let result: EnumerationResult = stack
        .enumerator()
        .with_stop_signal(stop)
        .on_interface_done(move |_| flag.store(true, Ordering::SeqCst))
        .enumerate();

    assert_eq!(result.records.len(), 2);
    assert_eq!(result.cancelled(), 1);
    assert!(matches!(result.report[1].outcome, InterfaceOutcome::NotStarted));
    assert!(stack.offered(DONGLE).is_empty());
    assert!(result.success);
}

#[test]
fn repeated_passes_do_not_leak() {
    let stack = Arc::new(
        SimulatedStack::new()
            .adapter(WIFI, Adapter::Wireless(crowded(60)))
            .adapter(ETHERNET, Adapter::Missing),
    );

    for _ in 0..5 {
        let result: EnumerationResult = stack.enumerator().enumerate();
        assert_eq!(result.records.len(), 60);
    }

    assert_eq!(stack.mapping_count(), 0);
    assert_eq!(stack.open_handles(), 0);
}
