//! # Access Point Survey Service
//!
//! Implements the "what is around me" use case on top of the [`Enumerator`].
//!
//! Orchestrates the survey by:
//! 1. delegating the driver conversation to the [`Enumerator`].
//! 2. enriching each BSSID with the vendor behind its OUI.

use apscan_common::network::access_point::AccessPointRecord;
use apscan_common::vendors::VendorRepository;

use crate::enumerator::{EnumerationResult, Enumerator, InterfaceReport};

/// An access point together with what we could learn about it locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedAccessPoint {
    pub record: AccessPointRecord,
    pub vendor: Option<String>,
}

#[derive(Debug)]
pub struct Survey {
    pub access_points: Vec<ObservedAccessPoint>,
    pub success: bool,
    pub report: Vec<InterfaceReport>,
}

pub struct SurveyService {
    vendor_repo: Option<Box<dyn VendorRepository>>,
    enumerator: Enumerator,
}

impl SurveyService {
    /// `vendor_repo` may be `None` to skip enrichment entirely.
    pub fn new(vendor_repo: Option<Box<dyn VendorRepository>>, enumerator: Enumerator) -> Self {
        Self {
            vendor_repo,
            enumerator,
        }
    }

    /// Runs one enumeration pass and attaches vendor names.
    ///
    /// Blocks for as long as the drivers take to answer.
    pub fn perform_survey(&self) -> Survey {
        let EnumerationResult {
            records,
            success,
            report,
        } = self.enumerator.enumerate();

        Survey {
            access_points: self.enrich_vendors(records),
            success,
            report,
        }
    }

    fn enrich_vendors(&self, records: Vec<AccessPointRecord>) -> Vec<ObservedAccessPoint> {
        records
            .into_iter()
            .map(|record| {
                let vendor: Option<String> = self
                    .vendor_repo
                    .as_ref()
                    .and_then(|repo| repo.get_vendor(record.mac()));
                ObservedAccessPoint { record, vendor }
            })
            .collect()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
