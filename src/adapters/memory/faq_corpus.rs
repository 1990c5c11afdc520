//! Fixed in-memory FAQ corpus.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::faq::FaqEntry;
use crate::domain::foundation::DomainError;
use crate::ports::FaqCorpus;

pub struct InMemoryFaqCorpus {
    entries: Vec<FaqEntry>,
    failing: AtomicBool,
}

impl InMemoryFaqCorpus {
    pub fn new(entries: Vec<FaqEntry>) -> Self {
        Self {
            entries,
            failing: AtomicBool::new(false),
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.failing.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl FaqCorpus for InMemoryFaqCorpus {
    async fn find_all(&self) -> Result<Vec<FaqEntry>, DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::database("simulated FAQ read failure"));
        }
        Ok(self.entries.clone())
    }
}
