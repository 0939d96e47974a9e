//! Built-in catalog of showcase genes.
//!
//! These are the well-studied cancer genes offered as starting points before any search.
//! Common protein names (`HER2`, `PD-1`, `VEGFR`) resolve to the official gene symbol.

use phf::{Map, phf_map};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogGene {
    pub symbol: &'static str,
    pub uniprot_accession: &'static str,
    pub description: &'static str,
    pub diseases: &'static [&'static str],
}

static GENES: Map<&'static str, CatalogGene> = phf_map! {
    "BRCA1" => CatalogGene {
        symbol: "BRCA1",
        uniprot_accession: "P38398",
        description: "DNA repair protein that maintains genomic stability by repairing double-strand breaks; a key suppressor of breast and ovarian cancer.",
        diseases: &["Breast cancer", "Ovarian cancer", "Prostate cancer"],
    },
    "TP53" => CatalogGene {
        symbol: "TP53",
        uniprot_accession: "P04637",
        description: "Tumour suppressor known as the guardian of the genome; regulates the cell cycle and triggers apoptosis after DNA damage.",
        diseases: &["Lung cancer", "Leukemia", "Colorectal cancer", "Breast cancer"],
    },
    "EGFR" => CatalogGene {
        symbol: "EGFR",
        uniprot_accession: "P00533",
        description: "Epidermal growth factor receptor driving cell proliferation; frequently overexpressed in carcinomas.",
        diseases: &["Non-small cell lung cancer", "Colorectal cancer", "Head and neck cancer"],
    },
    "KDR" => CatalogGene {
        symbol: "KDR",
        uniprot_accession: "P35968",
        description: "Vascular endothelial growth factor receptor 2 (VEGFR2), central to angiogenesis and a major anti-cancer target.",
        diseases: &["Renal cancer", "Colorectal cancer", "Liver cancer"],
    },
    "ERBB2" => CatalogGene {
        symbol: "ERBB2",
        uniprot_accession: "P04626",
        description: "Receptor tyrosine kinase (HER2) whose overexpression marks aggressive breast cancers.",
        diseases: &["HER2-positive breast cancer", "Gastric cancer"],
    },
    "PDCD1" => CatalogGene {
        symbol: "PDCD1",
        uniprot_accession: "Q15116",
        description: "Programmed cell death protein 1 (PD-1), an immune checkpoint inhibited in cancer immunotherapy.",
        diseases: &["Melanoma", "Lung cancer", "Renal cancer", "Lymphoma"],
    },
};

static ALIASES: Map<&'static str, &'static str> = phf_map! {
    "VEGFR" => "KDR",
    "VEGFR2" => "KDR",
    "HER2" => "ERBB2",
    "PD-1" => "PDCD1",
    "PD1" => "PDCD1",
};

/// Showcase genes in display order.
pub const SHOWCASE_ORDER: [&str; 6] = ["BRCA1", "TP53", "EGFR", "KDR", "ERBB2", "PDCD1"];

/// Resolves a gene symbol or common alias, case-insensitively.
pub fn lookup(name: &str) -> Option<&'static CatalogGene> {
    let key = name.trim().to_ascii_uppercase();
    let symbol = ALIASES.get(key.as_str()).copied().unwrap_or(key.as_str());
    GENES.get(symbol)
}

pub fn showcase() -> impl Iterator<Item = &'static CatalogGene> {
    SHOWCASE_ORDER.iter().filter_map(|s| GENES.get(*s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_resolves_symbols_and_aliases() {
        assert_eq!(lookup("brca1").unwrap().uniprot_accession, "P38398");
        assert_eq!(lookup("HER2").unwrap().symbol, "ERBB2");
        assert_eq!(lookup(" pd-1 ").unwrap().uniprot_accession, "Q15116");
        assert_eq!(lookup("VEGFR").unwrap().uniprot_accession, "P35968");
        assert!(lookup("NOPE").is_none());
    }

    #[test]
    fn showcase_lists_every_gene_in_order() {
        let symbols: Vec<_> = showcase().map(|g| g.symbol).collect();
        assert_eq!(symbols, SHOWCASE_ORDER);
    }
}
