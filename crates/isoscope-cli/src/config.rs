mod defaults;
mod file;

pub use defaults::DefaultsConfig;
pub use file::FileConfig;

use crate::cli::Cli;
use crate::error::{CliError, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceEndpoints {
    pub uniprot_url: String,
    pub alphafold_url: String,
    pub esmfold_url: String,
    pub translate_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub max_attempts: u32,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationSettings {
    pub enabled: bool,
    pub source_language: String,
    pub target_language: String,
    pub max_concurrent: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    pub organism_id: u32,
    pub limit: usize,
}

/// Fully resolved settings: built-in defaults, then the config file, then `-S` overrides,
/// then dedicated flags.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub services: ServiceEndpoints,
    pub http: HttpSettings,
    pub translation: TranslationSettings,
    pub search: SearchSettings,
}

impl AppConfig {
    pub fn load(cli: &Cli) -> Result<Self> {
        let file_config = match Self::locate(cli.config.as_deref()) {
            Some(path) => {
                info!("Using configuration file {:?}", path);
                FileConfig::from_file(&path)?
            }
            None => FileConfig::default(),
        };
        let mut config = file_config.merge_with_cli(&cli.set_values)?;
        if cli.no_translate {
            config.translation.enabled = false;
        }
        debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }

    /// An explicit path is always used; otherwise the per-user file is used only if it exists.
    fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        let path = ProjectDirs::from("org", "isoscope", "isoscope")?
            .config_dir()
            .join("config.toml");
        path.is_file().then_some(path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        FileConfig::default().resolve()
    }
}

impl FileConfig {
    pub fn merge_with_cli(mut self, set_values: &[String]) -> Result<AppConfig> {
        self.apply_set_values(set_values)?;
        let config = self.resolve();

        if config.http.max_attempts == 0 {
            return Err(CliError::Config(
                "`http.max-attempts` must be at least 1.".to_string(),
            ));
        }
        if config.translation.max_concurrent == 0 {
            return Err(CliError::Config(
                "`translation.max-concurrent` must be at least 1.".to_string(),
            ));
        }
        if config.search.limit == 0 {
            return Err(CliError::Config("`search.limit` must be at least 1.".to_string()));
        }
        Ok(config)
    }

    fn resolve(self) -> AppConfig {
        let d = DefaultsConfig::default();
        let services = self.services.unwrap_or_default();
        let http = self.http.unwrap_or_default();
        let translation = self.translation.unwrap_or_default();
        let search = self.search.unwrap_or_default();

        AppConfig {
            services: ServiceEndpoints {
                uniprot_url: services.uniprot_url.unwrap_or(d.uniprot_url),
                alphafold_url: services.alphafold_url.unwrap_or(d.alphafold_url),
                esmfold_url: services.esmfold_url.unwrap_or(d.esmfold_url),
                translate_url: services.translate_url.unwrap_or(d.translate_url),
            },
            http: HttpSettings {
                timeout: Duration::from_secs(http.timeout_secs.unwrap_or(d.timeout_secs)),
                max_attempts: http.max_attempts.unwrap_or(d.max_attempts),
                user_agent: http.user_agent.unwrap_or(d.user_agent),
            },
            translation: TranslationSettings {
                enabled: translation.enabled.unwrap_or(d.translation_enabled),
                source_language: translation.source_language.unwrap_or(d.source_language),
                target_language: translation.target_language.unwrap_or(d.target_language),
                max_concurrent: translation.max_concurrent.unwrap_or(d.max_concurrent),
            },
            search: SearchSettings {
                organism_id: search.organism_id.unwrap_or(d.organism_id),
                limit: search.limit.unwrap_or(d.search_limit),
            },
        }
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;
            let key = key.trim();
            let value_str = value_str.trim();

            match key {
                "services.uniprot-url" => {
                    self.services.get_or_insert_with(Default::default).uniprot_url =
                        Some(value_str.to_string());
                }
                "services.alphafold-url" => {
                    self.services.get_or_insert_with(Default::default).alphafold_url =
                        Some(value_str.to_string());
                }
                "services.esmfold-url" => {
                    self.services.get_or_insert_with(Default::default).esmfold_url =
                        Some(value_str.to_string());
                }
                "services.translate-url" => {
                    self.services.get_or_insert_with(Default::default).translate_url =
                        Some(value_str.to_string());
                }
                "http.timeout-secs" => {
                    self.http.get_or_insert_with(Default::default).timeout_secs =
                        Some(parse_value(key, value_str)?);
                }
                "http.max-attempts" => {
                    self.http.get_or_insert_with(Default::default).max_attempts =
                        Some(parse_value(key, value_str)?);
                }
                "http.user-agent" => {
                    self.http.get_or_insert_with(Default::default).user_agent =
                        Some(value_str.to_string());
                }
                "translation.enabled" => {
                    self.translation.get_or_insert_with(Default::default).enabled =
                        Some(parse_value(key, value_str)?);
                }
                "translation.source-language" => {
                    self.translation
                        .get_or_insert_with(Default::default)
                        .source_language = Some(value_str.to_string());
                }
                "translation.target-language" => {
                    self.translation
                        .get_or_insert_with(Default::default)
                        .target_language = Some(value_str.to_string());
                }
                "translation.max-concurrent" => {
                    self.translation
                        .get_or_insert_with(Default::default)
                        .max_concurrent = Some(parse_value(key, value_str)?);
                }
                "search.organism-id" => {
                    self.search.get_or_insert_with(Default::default).organism_id =
                        Some(parse_value(key, value_str)?);
                }
                "search.limit" => {
                    self.search.get_or_insert_with(Default::default).limit =
                        Some(parse_value(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!("Invalid value for {}: {}", key, value_str))
    })
}
