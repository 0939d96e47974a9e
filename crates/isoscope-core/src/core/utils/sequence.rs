//! Amino-acid sequence cleaning, validation and mass computation.

use phf::{Map, phf_map};
use thiserror::Error;

pub const MIN_SEQUENCE_LENGTH: usize = 20;
pub const MAX_SEQUENCE_LENGTH: usize = 1200;

const WATER_MASS: f64 = 18.01528;

/// Average residue masses (amino acid minus water), in daltons. Ambiguity codes use the
/// mean of their candidates; `X` uses a typical residue mass.
static RESIDUE_MASSES: Map<char, f64> = phf_map! {
    'A' => 71.0788, 'R' => 156.1875, 'N' => 114.1038, 'D' => 115.0886,
    'C' => 103.1388, 'E' => 129.1155, 'Q' => 128.1307, 'G' => 57.0519,
    'H' => 137.1411, 'I' => 113.1594, 'L' => 113.1594, 'K' => 128.1741,
    'M' => 131.1926, 'F' => 147.1766, 'P' => 97.1167, 'S' => 87.0782,
    'T' => 101.1051, 'W' => 186.2132, 'Y' => 163.1760, 'V' => 99.1326,
    'U' => 150.0388, 'O' => 237.3018,
    'B' => 114.5962, 'Z' => 128.6231, 'X' => 110.0,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Sequence is empty")]
    Empty,
    #[error("Sequence too short ({length} residues, at least {} required)", MIN_SEQUENCE_LENGTH)]
    TooShort { length: usize },
    #[error("Sequence too long ({length} residues, at most {} supported)", MAX_SEQUENCE_LENGTH)]
    TooLong { length: usize },
    #[error("Invalid residue '{residue}' at position {position}")]
    InvalidResidue { residue: char, position: usize },
}

fn is_allowed_residue(c: char) -> bool {
    c == '-' || RESIDUE_MASSES.contains_key(&c)
}

/// Strips FASTA headers, whitespace, digits and stop markers, and upper-cases the rest.
pub fn clean_sequence(raw: &str) -> String {
    raw.lines()
        .filter(|line| !line.trim_start().starts_with('>'))
        .flat_map(|line| line.chars())
        .filter(|c| !c.is_whitespace() && !c.is_ascii_digit() && *c != '*')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Cleans `raw` and checks it is a foldable protein sequence.
///
/// # Errors
///
/// Returns a [`SequenceError`] describing the first problem found: emptiness, length
/// outside `MIN_SEQUENCE_LENGTH..=MAX_SEQUENCE_LENGTH`, or a character outside the
/// extended amino-acid alphabet. Positions are 1-based in the cleaned sequence.
pub fn validate_sequence(raw: &str) -> Result<String, SequenceError> {
    let seq = clean_sequence(raw);
    let length = seq.chars().count();
    if length == 0 {
        return Err(SequenceError::Empty);
    }
    if length < MIN_SEQUENCE_LENGTH {
        return Err(SequenceError::TooShort { length });
    }
    if length > MAX_SEQUENCE_LENGTH {
        return Err(SequenceError::TooLong { length });
    }
    if let Some((idx, residue)) = seq.chars().enumerate().find(|(_, c)| !is_allowed_residue(*c)) {
        return Err(SequenceError::InvalidResidue {
            residue,
            position: idx + 1,
        });
    }
    Ok(seq)
}

/// Average molecular weight of a protein sequence in daltons.
///
/// Gap characters are ignored. Returns `None` for an empty sequence or one containing a
/// character with no known mass.
pub fn molecular_weight(sequence: &str) -> Option<f64> {
    let mut total = 0.0;
    let mut residues = 0usize;
    for c in sequence.chars().filter(|c| !c.is_whitespace() && *c != '-') {
        total += RESIDUE_MASSES.get(&c.to_ascii_uppercase())?;
        residues += 1;
    }
    (residues > 0).then_some(total + WATER_MASS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const P53_N_TERM: &str = "MEEPQSDPSVEPPLSQETFSDLWKLLPENNVLSPLPSQAMDDLMLSPDDIEQWFTEDPGP";

    #[test]
    fn clean_sequence_strips_headers_digits_and_whitespace() {
        let fasta = ">sp|P04637|P53_HUMAN\n1 meepqsdpsv 10\nEPPLSQETF*\n";
        assert_eq!(clean_sequence(fasta), "MEEPQSDPSVEPPLSQETF");
    }

    #[test]
    fn validate_accepts_realistic_sequence() {
        assert_eq!(validate_sequence(P53_N_TERM).unwrap(), P53_N_TERM);
    }

    #[test]
    fn validate_rejects_length_violations() {
        assert_eq!(validate_sequence("  \n"), Err(SequenceError::Empty));
        assert_eq!(
            validate_sequence("MEEPQSDPSV"),
            Err(SequenceError::TooShort { length: 10 })
        );
        let long = "A".repeat(MAX_SEQUENCE_LENGTH + 1);
        assert_eq!(
            validate_sequence(&long),
            Err(SequenceError::TooLong {
                length: MAX_SEQUENCE_LENGTH + 1
            })
        );
        assert!(validate_sequence(&"A".repeat(MAX_SEQUENCE_LENGTH)).is_ok());
        assert!(validate_sequence(&"A".repeat(MIN_SEQUENCE_LENGTH)).is_ok());
    }

    #[test]
    fn validate_reports_first_invalid_residue() {
        let seq = format!("{}J{}", "A".repeat(12), "A".repeat(12));
        assert_eq!(
            validate_sequence(&seq),
            Err(SequenceError::InvalidResidue {
                residue: 'J',
                position: 13
            })
        );
    }

    #[test]
    fn validate_allows_ambiguity_codes_and_gaps() {
        assert!(validate_sequence("ACDEFGHIKLMNPQRSTVWY-BXZOU").is_ok());
    }

    #[test]
    fn molecular_weight_matches_known_values() {
        let gly = molecular_weight("G").unwrap();
        assert!((gly - 75.067).abs() < 1e-3);
        let dipeptide = molecular_weight("ga").unwrap();
        assert!((dipeptide - (57.0519 + 71.0788 + WATER_MASS)).abs() < 1e-9);
        assert_eq!(molecular_weight(""), None);
        assert_eq!(molecular_weight("A1"), None);
    }
}
