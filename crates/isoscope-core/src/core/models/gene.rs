use super::alphafold::AlphaFoldEntry;
use super::uniprot::UniProtEntry;
use serde::Serialize;

pub const DESCRIPTION_UNAVAILABLE: &str = "Description not available";

/// One autocomplete suggestion for a gene symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneSearchResult {
    pub gene_name: String,
    pub description: String,
    pub uniprot_id: Option<String>,
}

/// Reviewed UniProt entries for a gene, best-annotated first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeneProteinInfo {
    pub gene_name: String,
    pub primary_isoform: Option<UniProtEntry>,
    pub isoforms: Vec<UniProtEntry>,
}

impl GeneProteinInfo {
    pub fn empty(gene_name: &str) -> Self {
        Self {
            gene_name: gene_name.to_string(),
            ..Self::default()
        }
    }

    pub fn primary_accession(&self) -> Option<&str> {
        self.primary_isoform.as_ref().and_then(|e| e.accession())
    }
}

/// An AlphaFold model listed for a gene, with its description in the display language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IsoformListing {
    pub entry: AlphaFoldEntry,
    pub description: Option<String>,
}
