use crate::core::models::alphafold::AlphaFoldEntry;
use crate::core::models::gene::{GeneProteinInfo, IsoformListing};
use crate::core::models::uniprot::UniProtEntry;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Orders the reviewed entries of a gene and picks the primary one.
///
/// Entries without an accession are dropped. The rest are sorted by annotation score,
/// highest first, with ties broken by accession so that the canonical (usually shortest)
/// accession leads.
pub fn rank_isoforms(gene_name: &str, entries: Vec<UniProtEntry>) -> GeneProteinInfo {
    let mut isoforms: Vec<UniProtEntry> = entries
        .into_iter()
        .filter(|e| e.accession().is_some())
        .collect();

    if isoforms.is_empty() {
        warn!("No UniProt entry with an accession found for gene {}", gene_name);
        return GeneProteinInfo::empty(gene_name);
    }

    isoforms.sort_by(|a, b| {
        let score_a = a.annotation_score.unwrap_or(0.0);
        let score_b = b.annotation_score.unwrap_or(0.0);
        score_b
            .partial_cmp(&score_a)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.accession().cmp(&b.accession()))
    });

    debug!(
        "Ranked {} entries for {}, primary {:?}",
        isoforms.len(),
        gene_name,
        isoforms[0].accession()
    );
    GeneProteinInfo {
        gene_name: gene_name.to_string(),
        primary_isoform: isoforms.first().cloned(),
        isoforms,
    }
}

/// Pairs AlphaFold models with descriptions in the display language.
///
/// `translated` maps an original `uniprot_description` to its translation; models whose
/// description has no translation keep the original text.
pub fn isoform_listings(
    entries: Vec<AlphaFoldEntry>,
    translated: &HashMap<String, String>,
) -> Vec<IsoformListing> {
    entries
        .into_iter()
        .map(|entry| {
            let description = entry
                .uniprot_description
                .as_ref()
                .map(|d| translated.get(d).cloned().unwrap_or_else(|| d.clone()));
            IsoformListing { entry, description }
        })
        .collect()
}
