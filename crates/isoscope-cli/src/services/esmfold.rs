use super::{HttpClient, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::info;

const SERVICE: &str = "ESMFold";

/// Client for the ESM Metagenomic Atlas folding endpoint.
#[derive(Debug, Clone)]
pub struct EsmFoldClient {
    http: HttpClient,
    url: String,
}

impl EsmFoldClient {
    pub fn new(http: HttpClient, url: &str) -> Self {
        Self {
            http,
            url: url.to_string(),
        }
    }

    /// Folds an already validated sequence and returns the predicted structure as PDB text,
    /// with pLDDT in the B-factor column.
    pub async fn fold(&self, sequence: &str) -> Result<String> {
        info!("Submitting {} residues to ESMFold", sequence.len());
        let request = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "text/plain")
            .header(ACCEPT, "chemical/x-pdb")
            .body(sequence.to_string());
        self.http.fetch_text(SERVICE, request).await
    }
}
