use super::{HttpClient, Result, ServiceError};
use isoscope::core::models::alphafold::{self, AlphaFoldEntry};
use reqwest::header::ACCEPT;
use tracing::{debug, info};

const SERVICE: &str = "AlphaFold DB";

#[derive(Debug, Clone)]
pub struct AlphaFoldClient {
    http: HttpClient,
    base_url: String,
}

impl AlphaFoldClient {
    pub fn new(http: HttpClient, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// All models for an accession. An accession without a model yields an empty list.
    pub async fn predictions(&self, accession: &str) -> Result<Vec<AlphaFoldEntry>> {
        let url = format!("{}{}", self.base_url, alphafold::prediction_path(accession));
        let response = match self.http.send(SERVICE, self.http.get(&url)).await {
            Ok(r) => r,
            Err(e) if e.is_not_found() => {
                info!("No AlphaFold model for {}", accession);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };
        let body = response.text().await?;
        let entries = alphafold::parse_prediction_response(&body)
            .map_err(|source| ServiceError::Schema { service: SERVICE, source })?;
        debug!("{} AlphaFold model(s) for {}", entries.len(), accession);
        Ok(entries)
    }

    /// The model for one accession.
    ///
    /// Isoform accessions (`P38398-2`) are looked up under their base accession and the
    /// matching model is picked from the response.
    pub async fn prediction(&self, accession: &str) -> Result<Option<AlphaFoldEntry>> {
        let accession = accession.trim();
        let entries = self.predictions(alphafold::base_accession(accession)).await?;
        Ok(alphafold::select_isoform(&entries, accession).cloned())
    }

    /// Downloads a structure file, reporting `(received, total)` bytes.
    pub async fn download_structure(
        &self,
        url: &str,
        on_progress: impl FnMut(u64, Option<u64>),
    ) -> Result<String> {
        info!("Downloading structure from {}", url);
        let request = self.http.get(url).header(ACCEPT, "*/*");
        self.http
            .fetch_text_with_progress(SERVICE, request, on_progress)
            .await
    }
}
