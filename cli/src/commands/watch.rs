use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context;
use apscan_common::config::Config;
use apscan_core::enumerator::Enumerator;
use apscan_core::survey::{Survey, SurveyService};
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::commands::{self, scan};
use crate::terminal::print;

/// What a Ctrl-C press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interrupt {
    /// Finish the interface being queried, then stop.
    Finish,
    /// A stop was already requested; the user wants out now.
    Abort,
}

struct StopRequest {
    stop: Arc<AtomicBool>,
    stopped: Arc<Notify>,
}

impl StopRequest {
    fn interrupt(&self) -> Interrupt {
        if self.stop.swap(true, Ordering::SeqCst) {
            return Interrupt::Abort;
        }
        self.stopped.notify_one();
        Interrupt::Finish
    }
}

/// Polls every adapter until `count` passes are done or Ctrl-C is pressed.
///
/// The first Ctrl-C never interrupts a driver call: the running pass finishes
/// the interface it is on and starts no other. A second one exits at once.
pub async fn watch(cfg: &Config, interfaces: &[String], interval: u64, count: Option<u64>) -> anyhow::Result<()> {
    if interval == 0 {
        anyhow::bail!("the interval must be at least one second");
    }

    let enumerator: Enumerator = commands::build_enumerator(cfg, interfaces)?;
    let stop: Arc<AtomicBool> = enumerator.stop_signal();
    let service: Arc<SurveyService> = Arc::new(commands::build_survey(cfg, enumerator));
    let stopped: Arc<Notify> = Arc::new(Notify::new());

    let interrupts: StopRequest = StopRequest {
        stop: Arc::clone(&stop),
        stopped: Arc::clone(&stopped),
    };
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            match interrupts.interrupt() {
                Interrupt::Finish => info!("stopping after the current interface, press Ctrl-C again to quit now"),
                Interrupt::Abort => {
                    warn!("quitting without waiting for the driver");
                    std::process::exit(130);
                }
            }
        }
    });

    let mut passes: u64 = 0;
    let mut failed_passes: u64 = 0;

    while !stop.load(Ordering::SeqCst) {
        passes += 1;
        print::header(&format!("pass {passes}"), cfg.quiet);

        let start_time: Instant = Instant::now();
        let worker: Arc<SurveyService> = Arc::clone(&service);
        let survey: Survey = tokio::task::spawn_blocking(move || worker.perform_survey())
            .await
            .context("enumeration worker panicked")?;
        scan::survey_ends(&survey, start_time.elapsed(), cfg);

        if !survey.success {
            failed_passes += 1;
            warn!("pass {passes} collected nothing from any adapter");
        }

        if count.is_some_and(|limit| passes >= limit) {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(interval)) => {}
            _ = stopped.notified() => break,
        }
    }

    if passes > 0 && failed_passes == passes {
        anyhow::bail!("all {passes} passes failed");
    }
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
