use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileServicesConfig {
    pub uniprot_url: Option<String>,
    pub alphafold_url: Option<String>,
    pub esmfold_url: Option<String>,
    pub translate_url: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileHttpConfig {
    pub timeout_secs: Option<u64>,
    pub max_attempts: Option<u32>,
    pub user_agent: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileTranslationConfig {
    pub enabled: Option<bool>,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    pub max_concurrent: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSearchConfig {
    pub organism_id: Option<u32>,
    pub limit: Option<usize>,
}

/// Partial configuration as written in `config.toml`; every field is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub services: Option<FileServicesConfig>,
    pub http: Option<FileHttpConfig>,
    pub translation: Option<FileTranslationConfig>,
    pub search: Option<FileSearchConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
