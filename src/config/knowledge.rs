//! Knowledge source configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Where the curated FAQ corpus lives.
#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeConfig {
    /// YAML document with a top-level `faqs` list. Re-read on every lookup.
    #[serde(default = "default_faq_path")]
    pub faq_path: PathBuf,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            faq_path: default_faq_path(),
        }
    }
}

fn default_faq_path() -> PathBuf {
    PathBuf::from("config/faqs.yaml")
}
