use serde::Serialize;
use std::fmt;

/// The four canonical pLDDT bands used by AlphaFold-family predictors.
///
/// Boundaries are fixed and non-overlapping: `VeryHigh` is strictly above 90, `Confident`
/// covers the closed range `[70, 90]`, `Low` covers `[50, 70)` and `VeryLow` everything
/// below 50. A value of exactly 90.0 is therefore `Confident`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfidenceTier {
    VeryHigh,
    Confident,
    Low,
    VeryLow,
}

impl ConfidenceTier {
    pub const ALL: [ConfidenceTier; 4] = [
        ConfidenceTier::VeryHigh,
        ConfidenceTier::Confident,
        ConfidenceTier::Low,
        ConfidenceTier::VeryLow,
    ];

    /// Classifies a pLDDT value already normalized to the 0-100 scale.
    pub fn classify(plddt: f64) -> Self {
        if plddt > 90.0 {
            ConfidenceTier::VeryHigh
        } else if plddt >= 70.0 {
            ConfidenceTier::Confident
        } else if plddt >= 50.0 {
            ConfidenceTier::Low
        } else {
            ConfidenceTier::VeryLow
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfidenceTier::VeryHigh => "Very high",
            ConfidenceTier::Confident => "Confident",
            ConfidenceTier::Low => "Low",
            ConfidenceTier::VeryLow => "Very low",
        }
    }

    pub fn range_label(self) -> &'static str {
        match self {
            ConfidenceTier::VeryHigh => "pLDDT > 90",
            ConfidenceTier::Confident => "70 <= pLDDT <= 90",
            ConfidenceTier::Low => "50 <= pLDDT < 70",
            ConfidenceTier::VeryLow => "pLDDT < 50",
        }
    }

    /// The colour the AlphaFold Database uses for this band.
    pub fn hex_color(self) -> &'static str {
        match self {
            ConfidenceTier::VeryHigh => "#0053D6",
            ConfidenceTier::Confident => "#65CBF3",
            ConfidenceTier::Low => "#FFDB13",
            ConfidenceTier::VeryLow => "#FF7D45",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregate pLDDT distribution of a structure.
///
/// The four fractions sum to 1 whenever at least one sample was seen. With no samples they
/// are all exactly zero and `mean` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ConfidenceSummary {
    pub very_high: f64,
    pub confident: f64,
    pub low: f64,
    pub very_low: f64,
    pub mean: Option<f64>,
    pub sample_count: usize,
}

impl ConfidenceSummary {
    pub fn fraction(&self, tier: ConfidenceTier) -> f64 {
        match tier {
            ConfidenceTier::VeryHigh => self.very_high,
            ConfidenceTier::Confident => self.confident,
            ConfidenceTier::Low => self.low,
            ConfidenceTier::VeryLow => self.very_low,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_none()
    }

    /// Builds a summary from the per-band fractions reported by the AlphaFold Database.
    ///
    /// These are residue-level statistics computed by the service, so `sample_count` is zero
    /// and missing fractions are taken as zero.
    pub fn from_alphafold_fractions(
        very_high: Option<f64>,
        confident: Option<f64>,
        low: Option<f64>,
        very_low: Option<f64>,
        global_metric: Option<f64>,
    ) -> Self {
        Self {
            very_high: very_high.unwrap_or(0.0),
            confident: confident.unwrap_or(0.0),
            low: low.unwrap_or(0.0),
            very_low: very_low.unwrap_or(0.0),
            mean: global_metric,
            sample_count: 0,
        }
    }
}

/// Running tallies for one pass over a structure.
#[derive(Debug, Default)]
pub(crate) struct TierCounter {
    counts: [usize; 4],
    sum: f64,
    total: usize,
}

impl TierCounter {
    pub(crate) fn record(&mut self, plddt: f64) {
        let slot = match ConfidenceTier::classify(plddt) {
            ConfidenceTier::VeryHigh => 0,
            ConfidenceTier::Confident => 1,
            ConfidenceTier::Low => 2,
            ConfidenceTier::VeryLow => 3,
        };
        self.counts[slot] += 1;
        self.sum += plddt;
        self.total += 1;
    }

    pub(crate) fn finish(self) -> ConfidenceSummary {
        if self.total == 0 {
            return ConfidenceSummary::default();
        }
        let n = self.total as f64;
        ConfidenceSummary {
            very_high: self.counts[0] as f64 / n,
            confident: self.counts[1] as f64 / n,
            low: self.counts[2] as f64 / n,
            very_low: self.counts[3] as f64 / n,
            mean: Some(self.sum / n),
            sample_count: self.total,
        }
    }
}
