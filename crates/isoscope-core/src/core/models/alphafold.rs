//! AlphaFold Protein Structure Database prediction records.

use super::SchemaError;
use super::confidence::ConfidenceSummary;
use crate::core::io::traits::StructureFormat;
use serde::{Deserialize, Serialize};

pub const ALPHAFOLD_BASE_URL: &str = "https://alphafold.ebi.ac.uk";

/// One predicted model as returned by `/api/prediction/<accession>`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlphaFoldEntry {
    pub entry_id: String,
    pub model_entity_id: String,
    pub uniprot_accession: String,
    pub gene: Option<String>,
    pub uniprot_id: Option<String>,
    pub uniprot_description: Option<String>,
    pub tax_id: Option<u32>,
    pub organism_scientific_name: Option<String>,
    pub global_metric_value: Option<f64>,
    pub fraction_plddt_very_low: Option<f64>,
    pub fraction_plddt_low: Option<f64>,
    pub fraction_plddt_confident: Option<f64>,
    pub fraction_plddt_very_high: Option<f64>,
    pub sequence: Option<String>,
    pub sequence_start: Option<u32>,
    pub sequence_end: Option<u32>,
    pub pdb_url: Option<String>,
    pub cif_url: Option<String>,
    pub bcif_url: Option<String>,
}

impl AlphaFoldEntry {
    /// URL of the structure file to display, with its format.
    ///
    /// PDB is preferred because the pLDDT lives in its B-factor column; mmCIF is the next
    /// choice. Binary CIF is never chosen since text viewers cannot read it.
    pub fn structure_url(&self) -> (String, StructureFormat) {
        if let Some(url) = self.pdb_url.as_deref().filter(|u| !u.is_empty()) {
            return (url.to_string(), StructureFormat::Pdb);
        }
        if let Some(url) = self.cif_url.as_deref().filter(|u| !u.is_empty()) {
            return (url.to_string(), StructureFormat::Cif);
        }
        (default_pdb_url(&self.uniprot_accession), StructureFormat::Pdb)
    }

    pub fn sequence_length(&self) -> Option<usize> {
        self.sequence.as_ref().map(|s| s.len())
    }

    pub fn confidence_summary(&self) -> ConfidenceSummary {
        ConfidenceSummary::from_alphafold_fractions(
            self.fraction_plddt_very_high,
            self.fraction_plddt_confident,
            self.fraction_plddt_low,
            self.fraction_plddt_very_low,
            self.global_metric_value,
        )
    }

    pub fn viewer_url(&self) -> String {
        viewer_url(&self.uniprot_accession)
    }
}

/// Strips an isoform suffix: `P38398-2` becomes `P38398`.
pub fn base_accession(accession: &str) -> &str {
    accession.split('-').next().unwrap_or(accession)
}

pub fn prediction_path(accession: &str) -> String {
    format!("/api/prediction/{}", urlencoding::encode(accession.trim()))
}

pub fn default_pdb_url(accession: &str) -> String {
    format!("{}/files/AF-{}-F1-model_v4.pdb", ALPHAFOLD_BASE_URL, accession)
}

pub fn viewer_url(accession: &str) -> String {
    format!("{}/entry/{}", ALPHAFOLD_BASE_URL, accession)
}

/// Decodes a prediction response, which is normally an array but may be a single record.
pub fn parse_prediction_response(body: &str) -> Result<Vec<AlphaFoldEntry>, SchemaError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    match value {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::Array(_) => Ok(serde_json::from_value(value)?),
        serde_json::Value::Object(_) => Ok(vec![serde_json::from_value(value)?]),
        other => Err(SchemaError::UnexpectedShape(format!(
            "expected an object or array, found {}",
            other
        ))),
    }
}

/// Picks the model matching `accession` out of a prediction response.
///
/// An exact accession match wins, then a model whose entity id mentions the accession,
/// then the first model.
pub fn select_isoform<'a>(entries: &'a [AlphaFoldEntry], accession: &str) -> Option<&'a AlphaFoldEntry> {
    entries
        .iter()
        .find(|e| e.uniprot_accession == accession)
        .or_else(|| entries.iter().find(|e| e.model_entity_id.contains(accession)))
        .or_else(|| entries.first())
}
