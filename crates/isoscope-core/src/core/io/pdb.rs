use crate::core::io::traits::{StructureFile, StructureFormat};
use crate::core::models::confidence::{ConfidenceSummary, ConfidenceTier, TierCounter};
use serde::Serialize;
use std::collections::HashMap;
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::debug;

const OCCUPANCY_COLUMNS: (usize, usize) = (54, 60);
const B_FACTOR_COLUMNS: (usize, usize) = (60, 66);
const RESIDUE_NAME_COLUMNS: (usize, usize) = (17, 20);
const CHAIN_ID_COLUMNS: (usize, usize) = (21, 22);
const RESIDUE_NUMBER_COLUMNS: (usize, usize) = (22, 26);
const INSERTION_CODE_COLUMNS: (usize, usize) = (26, 27);

#[derive(Debug, Error)]
pub enum StructureError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Structure payload is empty")]
    EmptyPayload,
}

/// A complete PDB document held as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdbDocument {
    text: String,
}

impl PdbDocument {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn confidence_summary(&self) -> ConfidenceSummary {
        compute_confidence_summary(&self.text)
    }

    pub fn residue_profile(&self) -> Vec<ResidueConfidence> {
        residue_confidence_profile(&self.text)
    }
}

pub struct PdbFile;

impl StructureFile for PdbFile {
    type Document = PdbDocument;
    type Error = StructureError;

    fn format() -> StructureFormat {
        StructureFormat::Pdb
    }

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Document, Self::Error> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        if text.trim().is_empty() {
            return Err(StructureError::EmptyPayload);
        }
        debug!("Read PDB payload of {} bytes", text.len());
        Ok(PdbDocument { text })
    }
}

/// Per-residue mean pLDDT, in file order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResidueConfidence {
    pub chain_id: String,
    pub residue_number: i32,
    pub insertion_code: String,
    pub residue_name: String,
    pub plddt: f64,
    pub tier: ConfidenceTier,
    pub atom_count: usize,
}

fn field(line: &str, (start, end): (usize, usize)) -> Option<&str> {
    line.get(start..end)
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn is_atom_record(line: &str) -> bool {
    let head = line.trim_start();
    head.starts_with("ATOM") || head.starts_with("HETATM")
}

fn normalize(value: f64) -> f64 {
    if value <= 1.0 { value * 100.0 } else { value }
}

/// Extracts the confidence sample carried by one PDB line.
///
/// Returns `None` for non-atom records and for atom records where neither the B-factor
/// (columns 61-66) nor the occupancy (columns 55-60) holds a number. Values at or below 1
/// are read as fractions and scaled to percent, whichever column they came from.
pub fn extract_confidence(line: &str) -> Option<f64> {
    if !is_atom_record(line) {
        return None;
    }
    parse_number(field(line, B_FACTOR_COLUMNS))
        .or_else(|| parse_number(field(line, OCCUPANCY_COLUMNS)))
        .map(normalize)
}

fn lines(pdb_text: &str) -> impl Iterator<Item = &str> {
    pdb_text.split(['\r', '\n'])
}

/// Computes the pLDDT tier distribution and mean over every atom record of a PDB payload.
///
/// Lines that are not `ATOM`/`HETATM` records, or that carry no usable value, are skipped
/// without error. An input with no usable samples produces all-zero fractions and no mean.
pub fn compute_confidence_summary(pdb_text: &str) -> ConfidenceSummary {
    let mut counter = TierCounter::default();
    for sample in lines(pdb_text).filter_map(extract_confidence) {
        counter.record(sample);
    }
    counter.finish()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResidueKey {
    chain_id: String,
    residue_number: i32,
    insertion_code: String,
}

/// Averages atom samples per residue.
///
/// Atoms whose residue number cannot be read are left out of the profile, though they
/// still count towards [`compute_confidence_summary`].
pub fn residue_confidence_profile(pdb_text: &str) -> Vec<ResidueConfidence> {
    let mut index: HashMap<ResidueKey, usize> = HashMap::new();
    let mut sums: Vec<(ResidueKey, String, f64, usize)> = Vec::new();

    for line in lines(pdb_text) {
        let Some(sample) = extract_confidence(line) else {
            continue;
        };
        let Some(residue_number) = field(line, RESIDUE_NUMBER_COLUMNS)
            .and_then(|s| s.trim().parse::<i32>().ok())
        else {
            continue;
        };
        let key = ResidueKey {
            chain_id: field(line, CHAIN_ID_COLUMNS).unwrap_or("").trim().to_string(),
            residue_number,
            insertion_code: field(line, INSERTION_CODE_COLUMNS)
                .unwrap_or("")
                .trim()
                .to_string(),
        };
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            let name = field(line, RESIDUE_NAME_COLUMNS).unwrap_or("").trim();
            sums.push((key, name.to_string(), 0.0, 0));
            sums.len() - 1
        });
        sums[slot].2 += sample;
        sums[slot].3 += 1;
    }

    sums.into_iter()
        .map(|(key, residue_name, sum, count)| {
            let plddt = sum / count as f64;
            ResidueConfidence {
                chain_id: key.chain_id,
                residue_number: key.residue_number,
                insertion_code: key.insertion_code,
                residue_name,
                plddt,
                tier: ConfidenceTier::classify(plddt),
                atom_count: count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn atom_line(serial: usize, res_seq: i32, occupancy: &str, b_factor: &str) -> String {
        format!(
            "ATOM  {:>5}  CA  ALA A{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6}{:>6}           C",
            serial, res_seq, 1.0, 2.0, 3.0, occupancy, b_factor
        )
    }

    fn summary_of(lines: &[String]) -> ConfidenceSummary {
        compute_confidence_summary(&lines.join("\n"))
    }

    #[test]
    fn atom_line_helper_places_fields_in_pdb_columns() {
        let line = atom_line(1, 1, "1.00", "87.50");
        assert_eq!(&line[54..60], "  1.00");
        assert_eq!(&line[60..66], " 87.50");
    }

    #[test]
    fn fractions_sum_to_one_and_mean_matches_samples() {
        let values = [95.0, 88.0, 72.5, 61.0, 30.0, 99.9];
        let lines: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(i, v)| atom_line(i + 1, i as i32 + 1, "1.00", &format!("{:.2}", v)))
            .collect();
        let s = summary_of(&lines);

        assert_eq!(s.sample_count, 6);
        let total = s.very_high + s.confident + s.low + s.very_low;
        assert!((total - 1.0).abs() < 1e-9);
        let expected_mean = values.iter().sum::<f64>() / values.len() as f64;
        assert!((s.mean.unwrap() - expected_mean).abs() < 1e-9);
        assert!((s.very_high - 2.0 / 6.0).abs() < 1e-12);
        assert!((s.confident - 2.0 / 6.0).abs() < 1e-12);
        assert!((s.low - 1.0 / 6.0).abs() < 1e-12);
        assert!((s.very_low - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn inputs_without_atom_records_produce_empty_summary() {
        assert_eq!(compute_confidence_summary(""), ConfidenceSummary::default());
        assert_eq!(compute_confidence_summary("  \n\r\n\t"), ConfidenceSummary::default());

        let header_only = "HEADER    PREDICTED STRUCTURE\nREMARK   1 ESMFOLD\nEND\n";
        let s = compute_confidence_summary(header_only);
        assert_eq!(s.very_high, 0.0);
        assert_eq!(s.confident, 0.0);
        assert_eq!(s.low, 0.0);
        assert_eq!(s.very_low, 0.0);
        assert!(s.mean.is_none());
    }

    #[test]
    fn boundary_values_land_in_documented_tiers() {
        let cases = [
            ("95.0", ConfidenceTier::VeryHigh),
            ("90.0", ConfidenceTier::Confident),
            ("70.0", ConfidenceTier::Confident),
            ("69.9", ConfidenceTier::Low),
            ("50.0", ConfidenceTier::Low),
            ("49.9", ConfidenceTier::VeryLow),
        ];
        for (b, tier) in cases {
            let s = summary_of(&[atom_line(1, 1, "1.00", b)]);
            assert_eq!(s.fraction(tier), 1.0, "B-factor {} should be {:?}", b, tier);
        }
    }

    #[test]
    fn blank_or_garbled_b_factor_falls_back_to_occupancy() {
        let blank = atom_line(1, 1, "0.85", "");
        let garbled = atom_line(2, 2, "0.85", "abc");
        for line in [blank, garbled] {
            assert!((extract_confidence(&line).unwrap() - 85.0).abs() < 1e-9);
            let s = summary_of(&[line]);
            assert_eq!(s.confident, 1.0);
            assert!((s.mean.unwrap() - 85.0).abs() < 1e-9);
        }
    }

    #[test]
    fn fractional_values_are_scaled_and_percentages_kept() {
        assert!((extract_confidence(&atom_line(1, 1, "1.00", "0.92")).unwrap() - 92.0).abs() < 1e-9);
        assert_eq!(extract_confidence(&atom_line(1, 1, "1.00", "92")), Some(92.0));
        assert_eq!(
            summary_of(&[atom_line(1, 1, "1.00", "0.92")]).very_high,
            1.0
        );
        assert_eq!(summary_of(&[atom_line(1, 1, "1.00", "92")]).very_high, 1.0);
    }

    #[test]
    fn short_and_non_atom_lines_are_ignored() {
        let short = "ATOM      1  CA  ALA A   1      11.104   6.134  -6.504";
        assert_eq!(extract_confidence(short), None);
        assert_eq!(extract_confidence("REMARK 250 pLDDT 95.00 in B-factor column"), None);
        assert_eq!(extract_confidence(&atom_line(1, 1, "", "")), None);
        assert_eq!(extract_confidence(&atom_line(1, 1, "n/a", "n/a")), None);

        let mixed = vec![
            "HEADER    TEST".to_string(),
            short.to_string(),
            atom_line(2, 1, "1.00", "80.00"),
        ];
        let s = summary_of(&mixed);
        assert_eq!(s.sample_count, 1);
        assert_eq!(s.mean, Some(80.0));
    }

    #[test]
    fn occupancy_only_line_reaching_column_sixty_is_accepted() {
        let line = atom_line(1, 1, "0.40", "");
        let truncated = line[..60].to_string();
        assert!((extract_confidence(&truncated).unwrap() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn partially_numeric_b_factor_is_not_read_leniently() {
        assert_eq!(extract_confidence(&atom_line(1, 1, "0.55", "12abc")), Some(55.0));
        assert_eq!(extract_confidence(&atom_line(1, 1, "", "85.0x")), None);
    }

    #[test]
    fn non_finite_values_are_treated_as_unparseable() {
        assert!((extract_confidence(&atom_line(1, 1, "0.70", "NaN")).unwrap() - 70.0).abs() < 1e-9);
        assert_eq!(extract_confidence(&atom_line(1, 1, "inf", "NaN")), None);
    }

    #[test]
    fn leading_whitespace_and_hetatm_records_are_accepted() {
        let het = atom_line(1, 1, "1.00", "55.00").replacen("ATOM  ", "HETATM", 1);
        assert_eq!(extract_confidence(&het), Some(55.0));

        let padded_tag = atom_line(1, 1, "1.00", "55.00").replacen("ATOM  ", "  ATOM", 1);
        assert_eq!(extract_confidence(&padded_tag), Some(55.0));

        // Columns come from the untrimmed line, so shifting the whole record misaligns them.
        let shifted = format!("  {}", atom_line(1, 1, "1.00", "55.00"));
        assert_eq!(extract_confidence(&shifted), None);
    }

    #[test]
    fn crlf_and_lone_cr_separators_are_supported() {
        let a = atom_line(1, 1, "1.00", "95.00");
        let b = atom_line(2, 2, "1.00", "40.00");
        let crlf = format!("{}\r\n{}\r\n", a, b);
        let cr = format!("{}\r{}", a, b);
        for text in [crlf, cr] {
            let s = compute_confidence_summary(&text);
            assert_eq!(s.sample_count, 2);
            assert_eq!(s.very_high, 0.5);
            assert_eq!(s.very_low, 0.5);
        }
    }

    #[test]
    fn repeated_computation_is_identical() {
        let text = [
            atom_line(1, 1, "1.00", "91.00"),
            atom_line(2, 1, "1.00", "67.00"),
        ]
        .join("\n");
        assert_eq!(
            compute_confidence_summary(&text),
            compute_confidence_summary(&text)
        );
    }

    #[test]
    fn residue_profile_averages_atoms_in_file_order() {
        let text = [
            atom_line(1, 2, "1.00", "90.00"),
            atom_line(2, 2, "1.00", "80.00"),
            atom_line(3, 1, "1.00", "40.00"),
            "TER".to_string(),
        ]
        .join("\n");
        let profile = residue_confidence_profile(&text);

        assert_eq!(profile.len(), 2);
        assert_eq!(profile[0].residue_number, 2);
        assert_eq!(profile[0].chain_id, "A");
        assert_eq!(profile[0].residue_name, "ALA");
        assert_eq!(profile[0].atom_count, 2);
        assert!((profile[0].plddt - 85.0).abs() < 1e-9);
        assert_eq!(profile[0].tier, ConfidenceTier::Confident);
        assert_eq!(profile[1].residue_number, 1);
        assert_eq!(profile[1].tier, ConfidenceTier::VeryLow);
    }

    #[test]
    fn pdb_file_rejects_empty_payload() {
        assert!(matches!(
            PdbFile::read_from_str("   \n"),
            Err(StructureError::EmptyPayload)
        ));
    }

    #[test]
    fn pdb_file_reads_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", atom_line(1, 1, "1.00", "75.00")).unwrap();

        let doc = PdbFile::read_from_path(file.path()).unwrap();
        assert_eq!(PdbFile::format(), StructureFormat::Pdb);
        assert_eq!(doc.confidence_summary().confident, 1.0);
        assert_eq!(doc.residue_profile().len(), 1);
    }
}
