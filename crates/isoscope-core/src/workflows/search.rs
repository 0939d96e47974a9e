use crate::core::models::gene::{DESCRIPTION_UNAVAILABLE, GeneSearchResult};
use crate::core::models::uniprot::{UniProtEntry, UniProtSearchResponse};
use tracing::debug;

pub const MIN_QUERY_LENGTH: usize = 2;
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;
pub const HUMAN_ORGANISM_ID: u32 = 9606;

/// UniProt query for gene symbols starting with `prefix`, restricted to reviewed entries.
pub fn gene_prefix_query(prefix: &str, organism_id: u32) -> String {
    format!(
        "gene:{}* AND reviewed:true AND organism_id:{}",
        prefix.trim(),
        organism_id
    )
}

/// UniProt query for the reviewed entries of exactly one gene.
pub fn gene_proteins_query(gene: &str, organism_id: u32) -> String {
    format!(
        "gene:{} AND reviewed:true AND organism_id:{}",
        gene.trim(),
        organism_id
    )
}

/// Path and query string for `uniprotkb/search`.
pub fn search_path(query: &str, size: usize, fields: Option<&str>) -> String {
    let mut path = format!(
        "/uniprotkb/search?query={}&format=json&size={}",
        urlencoding::encode(query),
        size
    );
    if let Some(fields) = fields {
        path.push_str("&fields=");
        path.push_str(&urlencoding::encode(fields));
    }
    path
}

pub fn entry_path(accession: &str) -> String {
    format!("/uniprotkb/{}.json", urlencoding::encode(accession.trim()))
}

/// Autocomplete suggestions for `query` from a UniProt search response.
///
/// Gene names and synonyms are upper-cased and kept when they start with the upper-cased
/// query; the first entry to mention a name wins. An exact match is moved to the front,
/// otherwise response order is kept. Queries shorter than [`MIN_QUERY_LENGTH`] yield
/// nothing.
pub fn gene_suggestions(
    query: &str,
    response: &UniProtSearchResponse,
    limit: usize,
) -> Vec<GeneSearchResult> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_LENGTH {
        return Vec::new();
    }
    let needle = query.to_uppercase();
    let mut results: Vec<GeneSearchResult> = Vec::new();

    let mut offer = |name: &str, entry: &UniProtEntry| {
        let name = name.to_uppercase();
        if name.starts_with(&needle) && !results.iter().any(|r| r.gene_name == name) {
            results.push(GeneSearchResult {
                gene_name: name,
                description: entry
                    .description()
                    .unwrap_or(DESCRIPTION_UNAVAILABLE)
                    .to_string(),
                uniprot_id: entry.accession().map(str::to_string),
            });
        }
    };

    for entry in &response.results {
        for gene in &entry.genes {
            if let Some(name) = &gene.gene_name {
                offer(&name.value, entry);
            }
            for synonym in &gene.synonyms {
                offer(&synonym.value, entry);
            }
        }
    }

    results.sort_by_key(|r| r.gene_name != needle);
    results.truncate(limit);
    debug!("{} suggestion(s) for '{}'", results.len(), query);
    results
}
