use crate::core::models::confidence::{ConfidenceSummary, ConfidenceTier};
use serde::Serialize;

/// One row of a confidence legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub tier: ConfidenceTier,
    pub label: &'static str,
    pub range: &'static str,
    pub color: &'static str,
    pub percent: f64,
}

/// Legend rows from most to least confident.
pub fn legend(summary: &ConfidenceSummary) -> Vec<LegendEntry> {
    ConfidenceTier::ALL
        .iter()
        .map(|&tier| LegendEntry {
            tier,
            label: tier.label(),
            range: tier.range_label(),
            color: tier.hex_color(),
            percent: summary.fraction(tier) * 100.0,
        })
        .collect()
}

pub fn color_for(plddt: f64) -> &'static str {
    ConfidenceTier::classify(plddt).hex_color()
}

/// Renders a JavaScript colour function over an atom's `b` property, with the same band
/// boundaries as [`ConfidenceTier::classify`].
pub fn b_factor_color_function() -> String {
    format!(
        "function(atom) {{ const b = atom.b <= 1 ? atom.b * 100 : atom.b; \
         if (b > 90) return '{}'; if (b >= 70) return '{}'; \
         if (b >= 50) return '{}'; return '{}'; }}",
        ConfidenceTier::VeryHigh.hex_color(),
        ConfidenceTier::Confident.hex_color(),
        ConfidenceTier::Low.hex_color(),
        ConfidenceTier::VeryLow.hex_color(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legend_reports_percentages_per_tier() {
        let summary = ConfidenceSummary {
            very_high: 0.5,
            confident: 0.25,
            low: 0.125,
            very_low: 0.125,
            mean: Some(80.0),
            sample_count: 8,
        };
        let rows = legend(&summary);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].tier, ConfidenceTier::VeryHigh);
        assert_eq!(rows[0].percent, 50.0);
        assert_eq!(rows[3].color, "#FF7D45");
    }

    #[test]
    fn color_function_uses_alphafold_palette() {
        let js = b_factor_color_function();
        assert!(js.contains("b > 90"));
        assert!(js.contains("#0053D6"));
        assert!(js.contains("#FF7D45"));
        assert_eq!(color_for(90.0), "#65CBF3");
    }
}
