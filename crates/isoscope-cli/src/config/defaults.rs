use isoscope::core::models::alphafold::ALPHAFOLD_BASE_URL;
use isoscope::workflows::search::{DEFAULT_SUGGESTION_LIMIT, HUMAN_ORGANISM_ID};

pub struct DefaultsConfig {
    pub uniprot_url: String,
    pub alphafold_url: String,
    pub esmfold_url: String,
    pub translate_url: String,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub user_agent: String,
    pub translation_enabled: bool,
    pub source_language: String,
    pub target_language: String,
    pub max_concurrent: usize,
    pub organism_id: u32,
    pub search_limit: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            uniprot_url: "https://rest.uniprot.org".to_string(),
            alphafold_url: ALPHAFOLD_BASE_URL.to_string(),
            esmfold_url: "https://api.esmatlas.com/foldSequence/v1/pdb/".to_string(),
            translate_url: "https://translate.googleapis.com/translate_a/single".to_string(),
            timeout_secs: 30,
            max_attempts: 3,
            user_agent: format!("isoscope/{}", env!("CARGO_PKG_VERSION")),
            translation_enabled: true,
            source_language: "en".to_string(),
            target_language: "fr".to_string(),
            max_concurrent: 4,
            organism_id: HUMAN_ORGANISM_ID,
            search_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }
}
