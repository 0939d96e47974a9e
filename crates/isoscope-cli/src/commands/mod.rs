pub mod catalog;
pub mod confidence;
pub mod gene;
pub mod predict;
pub mod protein;
pub mod search;

use crate::config::AppConfig;
use crate::error::Result;
use crate::services::{
    AlphaFoldClient, Cancellation, EsmFoldClient, HttpClient, Translator, UniProtClient,
};
use crate::ui::{CliProgressHandler, Progress};
use isoscope::core::models::confidence::{ConfidenceSummary, ConfidenceTier};
use std::fmt::Write as _;

/// Everything a command needs besides its own arguments.
pub struct Context {
    pub config: AppConfig,
    pub progress: CliProgressHandler,
    pub cancellation: Cancellation,
}

impl Context {
    pub fn services(&self) -> Result<Services> {
        Services::from_config(&self.config)
    }

    /// Wires a byte-count callback to a progress bar under the current phase.
    pub fn download_progress(&self) -> impl FnMut(u64, Option<u64>) + '_ {
        byte_progress(&self.progress)
    }
}

/// Turns `(received, total)` byte counts into task events.
///
/// Without a known total only a status line is updated; with one, the bar is started on the
/// first chunk and finished once every byte has arrived.
fn byte_progress(progress: &CliProgressHandler) -> impl FnMut(u64, Option<u64>) + '_ {
    let mut expected = None;
    let mut reported = 0;
    let mut finished = false;
    move |received, total| {
        if let (None, Some(total)) = (expected, total) {
            progress.report(Progress::TaskStart { total });
            expected = Some(total);
        }
        match expected {
            Some(total) => {
                progress.report(Progress::TaskIncrement {
                    amount: received.saturating_sub(reported),
                });
                if !finished && received >= total {
                    progress.report(Progress::TaskFinish);
                    finished = true;
                }
            }
            None => progress.report(Progress::StatusUpdate {
                text: format!("{} KiB", received / 1024),
            }),
        }
        reported = received;
    }
}

pub struct Services {
    pub uniprot: UniProtClient,
    pub alphafold: AlphaFoldClient,
    pub esmfold: EsmFoldClient,
    pub translator: Translator,
}

impl Services {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let http = HttpClient::new(&config.http)?;
        let endpoints = &config.services;
        Ok(Self {
            uniprot: UniProtClient::new(
                http.clone(),
                &endpoints.uniprot_url,
                config.search.organism_id,
            ),
            alphafold: AlphaFoldClient::new(http.clone(), &endpoints.alphafold_url),
            esmfold: EsmFoldClient::new(http.clone(), &endpoints.esmfold_url),
            translator: Translator::new(http, &endpoints.translate_url, config.translation.clone()),
        })
    }
}

pub(crate) fn format_mean(mean: Option<f64>) -> String {
    mean.map(|m| format!("{:.1}", m))
        .unwrap_or_else(|| "n/a".to_string())
}

/// Multi-line text report of a confidence summary, one row per tier.
pub(crate) fn format_summary(summary: &ConfidenceSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  Mean pLDDT: {}", format_mean(summary.mean));
    if summary.sample_count > 0 {
        let _ = writeln!(out, "  Atoms with pLDDT: {}", summary.sample_count);
    }
    for tier in ConfidenceTier::ALL {
        let _ = writeln!(
            out,
            "  {:<10} {:<18} {:>5.1}%",
            tier.label(),
            tier.range_label(),
            summary.fraction(tier) * 100.0
        );
    }
    out
}
