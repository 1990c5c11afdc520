//! File-based FAQ corpus.
//!
//! The corpus is a YAML document maintained by the support team:
//!
//! ```yaml
//! faqs:
//!   - question: Is breakfast included?
//!     answer: Breakfast is not included, but there are cafés nearby.
//! ```
//!
//! The file is re-read on every lookup so edits apply without a restart.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::faq::FaqEntry;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::FaqCorpus;

#[derive(Debug, Default, Deserialize)]
struct FaqDocument {
    #[serde(default)]
    faqs: Vec<FaqEntry>,
}

#[derive(Debug, Clone)]
pub struct YamlFaqCorpus {
    path: PathBuf,
}

impl YamlFaqCorpus {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parses a corpus document. An empty document is an empty corpus.
fn parse(yaml: &str) -> Result<Vec<FaqEntry>, DomainError> {
    if yaml.trim().is_empty() {
        return Ok(Vec::new());
    }
    let document: FaqDocument = serde_yaml::from_str(yaml).map_err(|e| {
        DomainError::new(ErrorCode::InternalError, format!("Invalid FAQ corpus: {}", e))
    })?;
    Ok(document.faqs)
}

#[async_trait]
impl FaqCorpus for YamlFaqCorpus {
    async fn find_all(&self) -> Result<Vec<FaqEntry>, DomainError> {
        let yaml = match fs::read_to_string(&self.path).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "FAQ corpus file missing, using empty corpus");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(DomainError::new(
                    ErrorCode::InternalError,
                    format!("Failed to read FAQ corpus: {}", e),
                ))
            }
        };

        parse(&yaml)
    }
}
