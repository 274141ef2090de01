use std::path::Path;

use tracing::{info, warn};

use super::traits::PrintSink;
use super::types::{DeliveryOutcome, DeviceOutcome, Document};
use crate::notify::NotifyHandle;

/// Print one staged document on every configured target.
///
/// The document is loaded once. Each target name is matched case-insensitively
/// against the sink's live device list; unmatched names are reported and
/// skipped. Devices are independent, so one failure never stops the rest.
pub async fn print_to_targets(
    sink: &dyn PrintSink,
    staged: &Path,
    targets: &[String],
    notify: &NotifyHandle,
) -> Vec<DeviceOutcome> {
    if targets.is_empty() {
        warn!("No printers configured, nothing to print for {}", staged.display());
        return Vec::new();
    }

    let document = match Document::load(staged).await {
        Ok(doc) => doc,
        Err(e) => {
            notify.notify(format!("Cannot print {}: {}", staged.display(), e));
            return skip_all(targets, e.to_string());
        }
    };

    let devices = match sink.list_devices().await {
        Ok(devices) => devices,
        Err(e) => {
            notify.notify(format!("Cannot print {}: {}", document.name, e));
            return targets
                .iter()
                .map(|target| DeviceOutcome {
                    target: target.clone(),
                    outcome: DeliveryOutcome::Failed {
                        reason: e.to_string(),
                    },
                })
                .collect();
        }
    };

    let mut outcomes = Vec::with_capacity(targets.len());
    for target in targets {
        let outcome = match resolve(&devices, target) {
            None => {
                notify.notify(format!("Printer not found: {}", target));
                DeliveryOutcome::NotFound
            }
            Some(device) => match sink.submit(&document, device).await {
                Ok(()) => {
                    info!("Printed {} on {}", document.name, device);
                    notify.notify(format!("Printed {} on {}", document.name, device));
                    DeliveryOutcome::Submitted {
                        device: device.to_string(),
                    }
                }
                Err(e) => {
                    notify.notify(format!("Printing {} on {} failed: {}", document.name, device, e));
                    DeliveryOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            },
        };
        outcomes.push(DeviceOutcome {
            target: target.clone(),
            outcome,
        });
    }
    outcomes
}

fn resolve<'a>(devices: &'a [String], target: &str) -> Option<&'a str> {
    let wanted = target.to_lowercase();
    devices
        .iter()
        .find(|device| device.to_lowercase() == wanted)
        .map(String::as_str)
}

fn skip_all(targets: &[String], reason: String) -> Vec<DeviceOutcome> {
    targets
        .iter()
        .map(|target| DeviceOutcome {
            target: target.clone(),
            outcome: DeliveryOutcome::Skipped {
                reason: reason.clone(),
            },
        })
        .collect()
}
