//! FAQ corpus port - source of curated question/answer pairs.

use async_trait::async_trait;

use crate::domain::faq::FaqEntry;
use crate::domain::foundation::DomainError;

#[async_trait]
pub trait FaqCorpus: Send + Sync {
    /// All curated entries, in corpus order.
    async fn find_all(&self) -> Result<Vec<FaqEntry>, DomainError>;
}
