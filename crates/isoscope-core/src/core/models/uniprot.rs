//! UniProtKB REST payloads.
//!
//! Only the subset of the entry schema the tool reads is modelled. Every nested object
//! UniProt may leave out is optional, and list-valued fields default to empty.

use super::SchemaError;
use crate::core::utils::sequence;
use serde::{Deserialize, Serialize};

const FUNCTION_COMMENT: &str = "FUNCTION";
const DISEASE_COMMENT: &str = "DISEASE";
const LOCATION_COMMENT: &str = "SUBCELLULAR LOCATION";

/// Accepts either a single object or an array of them.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item),
            OneOrMany::Many(items) => items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TextValue {
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProteinName {
    pub full_name: Option<TextValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProteinDescription {
    pub recommended_name: Option<ProteinName>,
    #[serde(default)]
    pub alternative_names: Vec<ProteinName>,
    #[serde(default)]
    pub submission_names: Vec<ProteinName>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneEntry {
    pub gene_name: Option<TextValue>,
    #[serde(default)]
    pub synonyms: Vec<TextValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionText {
    pub text: Option<TextValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Disease {
    pub disease_id: Option<String>,
    pub disease_name: Option<String>,
    pub acronym: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SubcellularLocation {
    pub location: Option<TextValue>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub comment_type: String,
    #[serde(default)]
    pub texts: Vec<TextValue>,
    pub function: Option<OneOrMany<FunctionText>>,
    pub disease: Option<OneOrMany<Disease>>,
    #[serde(default)]
    pub subcellular_locations: Vec<SubcellularLocation>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceInfo {
    pub value: String,
    pub length: Option<usize>,
    pub mol_weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organism {
    pub scientific_name: Option<String>,
    pub common_name: Option<String>,
    pub taxon_id: Option<u32>,
}

/// One UniProtKB entry.
///
/// `primary_accession` is optional at the wire level because search results are not
/// trusted to carry it; entries without one are discarded by the isoform ranking.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UniProtEntry {
    pub primary_accession: Option<String>,
    pub uni_protkb_id: Option<String>,
    #[serde(default, alias = "geneNames")]
    pub genes: Vec<GeneEntry>,
    pub protein_description: Option<ProteinDescription>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub sequence: Option<SequenceInfo>,
    pub organism: Option<Organism>,
    pub annotation_score: Option<f64>,
}

impl UniProtEntry {
    pub fn accession(&self) -> Option<&str> {
        self.primary_accession.as_deref().filter(|a| !a.is_empty())
    }

    fn comments_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Comment> + 'a {
        self.comments.iter().filter(move |c| c.comment_type == kind)
    }

    pub fn recommended_name(&self) -> Option<&str> {
        self.protein_description
            .as_ref()?
            .recommended_name
            .as_ref()?
            .full_name
            .as_ref()
            .map(|t| t.value.as_str())
    }

    pub fn alternative_names(&self) -> Vec<&str> {
        self.protein_description
            .iter()
            .flat_map(|d| d.alternative_names.iter())
            .filter_map(|n| n.full_name.as_ref().map(|t| t.value.as_str()))
            .collect()
    }

    fn submission_name(&self) -> Option<&str> {
        self.protein_description
            .as_ref()?
            .submission_names
            .first()?
            .full_name
            .as_ref()
            .map(|t| t.value.as_str())
    }

    /// Best available descriptive name: recommended, then first alternative, then first
    /// submitted name.
    pub fn description(&self) -> Option<&str> {
        self.recommended_name()
            .or_else(|| self.alternative_names().first().copied())
            .or_else(|| self.submission_name())
    }

    /// Display name, falling back to the UniProtKB identifier and then the accession.
    pub fn full_name(&self) -> String {
        self.recommended_name()
            .or_else(|| self.alternative_names().first().copied())
            .or(self.uni_protkb_id.as_deref())
            .or(self.accession())
            .unwrap_or_default()
            .to_string()
    }

    pub fn gene_name(&self) -> Option<&str> {
        self.genes
            .iter()
            .find_map(|g| g.gene_name.as_ref().map(|t| t.value.as_str()))
    }

    /// Text of the FUNCTION annotation, or an empty string when there is none.
    pub fn function_text(&self) -> String {
        let Some(comment) = self.comments_of(FUNCTION_COMMENT).next() else {
            return String::new();
        };

        let from_function: Vec<&str> = comment
            .function
            .iter()
            .flat_map(|f| f.as_slice())
            .filter_map(|f| f.text.as_ref().map(|t| t.value.as_str()))
            .filter(|t| !t.is_empty())
            .collect();
        if !from_function.is_empty() {
            return from_function.join(" ");
        }

        comment
            .texts
            .iter()
            .map(|t| t.value.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Disease names from DISEASE annotations, de-duplicated in first-seen order.
    ///
    /// Names come from the structured `disease` record and from `Disease: <name>` lines in
    /// the free-text part of the comment.
    pub fn diseases(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let mut push = |name: &str| {
            let name = name.trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        };

        for comment in self.comments_of(DISEASE_COMMENT) {
            for disease in comment.disease.iter().flat_map(|d| d.as_slice()) {
                if let Some(name) = disease.disease_name.as_deref().or(disease.disease_id.as_deref()) {
                    push(name);
                }
            }
            for text in &comment.texts {
                for line in text.value.lines() {
                    if let Some(name) = disease_from_text_line(line) {
                        push(name);
                    }
                }
            }
        }
        names
    }

    pub fn subcellular_locations(&self) -> Vec<String> {
        let mut locations: Vec<String> = Vec::new();
        for comment in self.comments_of(LOCATION_COMMENT) {
            for loc in comment.subcellular_locations.iter().filter_map(|l| l.location.as_ref()) {
                if !locations.contains(&loc.value) {
                    locations.push(loc.value.clone());
                }
            }
        }
        locations
    }

    pub fn sequence_length(&self) -> Option<usize> {
        let seq = self.sequence.as_ref()?;
        seq.length.or(Some(seq.value.len()))
    }

    /// Molecular weight in daltons, as reported by UniProt or computed from the sequence.
    pub fn molecular_weight(&self) -> Option<f64> {
        let seq = self.sequence.as_ref()?;
        seq.mol_weight
            .or_else(|| sequence::molecular_weight(&seq.value))
    }
}

fn disease_from_text_line(line: &str) -> Option<&str> {
    let idx = line.to_ascii_lowercase().find("disease:")?;
    let name = line[idx + "disease:".len()..].trim();
    (!name.is_empty()).then_some(name)
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct UniProtSearchResponse {
    #[serde(default)]
    pub results: Vec<UniProtEntry>,
}

/// Decodes a `uniprotkb/search` response.
///
/// The canonical shape is `{"results": [...]}`. A bare array of entries, or a single entry
/// object, is tolerated as well.
pub fn parse_search_response(body: &str) -> Result<UniProtSearchResponse, SchemaError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    match value {
        serde_json::Value::Null => Ok(UniProtSearchResponse::default()),
        serde_json::Value::Array(_) => Ok(UniProtSearchResponse {
            results: serde_json::from_value(value)?,
        }),
        serde_json::Value::Object(ref map) if map.contains_key("primaryAccession") => {
            Ok(UniProtSearchResponse {
                results: vec![serde_json::from_value(value)?],
            })
        }
        serde_json::Value::Object(_) => Ok(serde_json::from_value(value)?),
        other => Err(SchemaError::UnexpectedShape(format!(
            "expected an object or array, found {}",
            other
        ))),
    }
}

/// Decodes a single `uniprotkb/<accession>.json` entry.
pub fn parse_entry(body: &str) -> Result<UniProtEntry, SchemaError> {
    Ok(serde_json::from_str(body)?)
}
