use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context;
use apscan_common::config::Config;
use apscan_core::enumerator::{Enumerator, InterfaceOutcome, InterfaceReport};
use apscan_core::survey::{ObservedAccessPoint, Survey, SurveyService};
use apscan_protocols::ndis::StatusCode;
use colored::*;

use crate::commands;
use crate::terminal::format::{self, Detail};
use crate::terminal::{colors, print, spinner};
use crate::{mprint, success};

pub async fn scan(cfg: &Config, interfaces: &[String]) -> anyhow::Result<()> {
    let done: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));
    let enumerator: Enumerator = commands::build_enumerator(cfg, interfaces)?.on_interface_done(move |report| {
        let count: usize = done.fetch_add(1, Ordering::Relaxed) + 1;
        spinner::report_interface_progress(count, report.id.as_str());
    });
    let service: SurveyService = commands::build_survey(cfg, enumerator);

    spinner::get_spinner().send_to_queue("Asking every adapter for its BSSID list...".to_string());
    let start_time: Instant = Instant::now();
    let survey: Survey = tokio::task::spawn_blocking(move || service.perform_survey())
        .await
        .context("enumeration worker panicked")?;
    spinner::finish();

    survey_ends(&survey, start_time.elapsed(), cfg);

    if !survey.success {
        anyhow::bail!("no interface could be queried successfully");
    }
    Ok(())
}

/// Prints the outcome of one pass.
pub fn survey_ends(survey: &Survey, total_time: Duration, cfg: &Config) {
    print_failures(&survey.report, cfg);

    if survey.access_points.is_empty() {
        no_access_points_found(cfg);
    } else {
        if cfg.quiet > 0 {
            mprint!();
        }
        print::header("Access Points", cfg.quiet);
        print_access_points(&survey.access_points, cfg);
    }
    print_summary(survey, total_time, cfg);
}

fn no_access_points_found(cfg: &Config) {
    print::header("ZERO ACCESS POINTS", cfg.quiet);
    if cfg.quiet == 0 {
        print::no_results();
    }
}

fn print_failures(report: &[InterfaceReport], cfg: &Config) {
    if cfg.quiet > 1 {
        return;
    }
    for entry in report {
        let reason: String = match &entry.outcome {
            InterfaceOutcome::Skipped(e) => format!("skipped, {e}"),
            InterfaceOutcome::Failed(e) => format!("failed, {e}"),
            InterfaceOutcome::NoData { status } if cfg.quiet == 0 => {
                format!("no wireless data, {}", StatusCode(*status))
            }
            _ => continue,
        };
        print::print_status(format!("{} {}", entry.id.as_str().color(colors::ACCENT), reason));
    }
}

fn print_access_points(access_points: &[ObservedAccessPoint], cfg: &Config) {
    for (idx, ap) in access_points.iter().enumerate() {
        match cfg.quiet {
            2.. => {}
            1 => print_access_point_line(ap),
            0 => {
                print_access_point_tree(ap, idx);
                if idx + 1 != access_points.len() {
                    mprint!();
                }
            }
        }
    }
}

fn print_access_point_line(ap: &ObservedAccessPoint) {
    let rssi: i32 = ap.record.signal_strength();
    print::print_status(format!(
        "{} {} {}",
        ap.record.mac_address().color(colors::MAC_ADDR),
        format!("{rssi:>4}").color(format::signal_color(rssi)),
        format::display_name(&ap.record)
    ));
}

fn print_access_point_tree(ap: &ObservedAccessPoint, idx: usize) {
    print::tree_head(idx, &format::display_name(&ap.record));
    let mut details: Vec<Detail> = vec![
        format::bssid_to_detail(&ap.record),
        format::signal_to_detail(&ap.record),
        format::ssid_to_detail(&ap.record),
    ];

    if let Some(vendor_detail) = format::vendor_to_detail(&ap.vendor) {
        details.push(vendor_detail);
    }

    print::as_tree_one_level(details);
}

fn print_summary(survey: &Survey, total_time: Duration, cfg: &Config) {
    let queried: usize = survey.report.iter().filter(|r| r.outcome.is_success()).count();
    let found: ColoredString = format!("{} access points", survey.access_points.len()).bold().green();
    let adapters: ColoredString = format!("{queried}/{} adapters", survey.report.len()).bold().cyan();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: &ColoredString =
        &format!("Scan Complete: {found} from {adapters} in {total_time}").color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(output);
        }
        _ => {
            mprint!();
            success!("{}", output);
        }
    }
}
