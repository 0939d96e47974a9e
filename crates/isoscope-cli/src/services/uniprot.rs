use super::{HttpClient, Result, ServiceError};
use isoscope::core::models::gene::{GeneProteinInfo, GeneSearchResult};
use isoscope::core::models::uniprot::{self, UniProtEntry, UniProtSearchResponse};
use isoscope::workflows::isoforms::rank_isoforms;
use isoscope::workflows::search::{
    self, MIN_QUERY_LENGTH, gene_prefix_query, gene_proteins_query, gene_suggestions,
};
use tracing::{debug, info};

const SERVICE: &str = "UniProt";
const SUGGESTION_FIELDS: &str = "accession,id,gene_names,protein_name";
const GENE_ENTRY_LIMIT: usize = 100;

#[derive(Debug, Clone)]
pub struct UniProtClient {
    http: HttpClient,
    base_url: String,
    organism_id: u32,
}

impl UniProtClient {
    pub fn new(http: HttpClient, base_url: &str, organism_id: u32) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            organism_id,
        }
    }

    pub async fn search(
        &self,
        query: &str,
        size: usize,
        fields: Option<&str>,
    ) -> Result<UniProtSearchResponse> {
        let url = format!("{}{}", self.base_url, search::search_path(query, size, fields));
        let body = self.http.send(SERVICE, self.http.get(&url)).await?.text().await?;
        uniprot::parse_search_response(&body)
            .map_err(|source| ServiceError::Schema { service: SERVICE, source })
    }

    /// Gene symbols starting with `query`. Queries that are too short never reach the network.
    pub async fn suggest_genes(&self, query: &str, limit: usize) -> Result<Vec<GeneSearchResult>> {
        if query.trim().chars().count() < MIN_QUERY_LENGTH {
            debug!("Query '{}' is too short for suggestions", query);
            return Ok(Vec::new());
        }
        let response = self
            .search(
                &gene_prefix_query(query, self.organism_id),
                limit,
                Some(SUGGESTION_FIELDS),
            )
            .await?;
        Ok(gene_suggestions(query, &response, limit))
    }

    /// Reviewed entries of a gene, ranked with the primary isoform first.
    pub async fn gene_proteins(&self, gene: &str) -> Result<GeneProteinInfo> {
        let response = self
            .search(&gene_proteins_query(gene, self.organism_id), GENE_ENTRY_LIMIT, None)
            .await?;
        info!("UniProt returned {} entries for {}", response.results.len(), gene);
        Ok(rank_isoforms(gene, response.results))
    }

    /// Full entry for an accession, or `None` when UniProt does not know it.
    pub async fn entry(&self, accession: &str) -> Result<Option<UniProtEntry>> {
        let url = format!("{}{}", self.base_url, search::entry_path(accession));
        let response = match self.http.send(SERVICE, self.http.get(&url)).await {
            Ok(r) => r,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };
        let body = response.text().await?;
        uniprot::parse_entry(&body)
            .map(Some)
            .map_err(|source| ServiceError::Schema { service: SERVICE, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::services::test_server::{response, serve};

    fn client(base_url: &str) -> UniProtClient {
        let http = HttpClient::new(&AppConfig::default().http).unwrap();
        UniProtClient::new(http, base_url, 9606)
    }

    const SEARCH_BODY: &str = r#"{"results": [
        {"primaryAccession": "P38398", "annotationScore": 5.0,
         "genes": [{"geneName": {"value": "BRCA1"}, "synonyms": [{"value": "RNF53"}]}],
         "proteinDescription": {"recommendedName": {"fullName": {"value": "Breast cancer type 1 susceptibility protein"}}}},
        {"primaryAccession": "Q9XXX1", "annotationScore": 2.0,
         "genes": [{"geneName": {"value": "BRCA1P1"}}]}
    ]}"#;

    #[tokio::test]
    async fn suggest_genes_queries_reviewed_prefix() {
        let server = serve(vec![response("200 OK", &[], SEARCH_BODY)]).await;
        let suggestions = client(&server.base_url).suggest_genes("brca", 10).await.unwrap();

        let names: Vec<_> = suggestions.iter().map(|s| s.gene_name.as_str()).collect();
        assert_eq!(names, ["BRCA1", "BRCA1P1"]);
        assert_eq!(
            suggestions[0].description,
            "Breast cancer type 1 susceptibility protein"
        );

        let request = &server.requests()[0];
        assert!(request.starts_with("GET /uniprotkb/search?query=gene%3Abrca%2A"));
        assert!(request.contains("fields=accession%2Cid%2Cgene_names%2Cprotein_name"));
    }

    #[tokio::test]
    async fn short_query_makes_no_request() {
        let server = serve(vec![]).await;
        let suggestions = client(&server.base_url).suggest_genes("B", 10).await.unwrap();
        assert!(suggestions.is_empty());
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn gene_proteins_ranks_by_annotation_score() {
        let server = serve(vec![response("200 OK", &[], SEARCH_BODY)]).await;
        let info = client(&server.base_url).gene_proteins("BRCA1").await.unwrap();
        assert_eq!(info.primary_accession(), Some("P38398"));
        assert_eq!(info.isoforms.len(), 2);
        assert!(server.requests()[0].contains("size=100"));
    }

    #[tokio::test]
    async fn unknown_entry_is_none() {
        let server = serve(vec![response("404 Not Found", &[], "")]).await;
        assert!(client(&server.base_url).entry("XXXXXX").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_search_body_is_a_schema_error() {
        let server = serve(vec![response("200 OK", &[], "42")]).await;
        let err = client(&server.base_url)
            .search("gene:TP53", 10, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Schema { .. }));
    }
}
