//! Wiring of pipeline components from ports.

use std::sync::Arc;
use std::time::Duration;

use crate::application::knowledge::{
    AiFieldClassifier, FaqResolver, FriendlyRewriter, GenerativeFallbackResolver, ListingResolver,
};
use crate::application::{ConversationLog, EscalationNotifier, GuestLocks, OutboundDispatcher};
use crate::domain::foundation::Confidence;
use crate::ports::{
    AIProvider, ConversationRepository, FaqCorpus, ListingReader, MessagingGateway,
    NotificationChannel, SupportTicketRepository,
};

use super::PipelineComponents;

/// External capabilities the pipeline runs against.
pub struct PipelinePorts {
    pub ai: Arc<dyn AIProvider>,
    pub conversations: Arc<dyn ConversationRepository>,
    pub listings: Arc<dyn ListingReader>,
    pub faqs: Arc<dyn FaqCorpus>,
    pub gateway: Arc<dyn MessagingGateway>,
    pub tickets: Arc<dyn SupportTicketRepository>,
    pub notifications: Option<Arc<dyn NotificationChannel>>,
}

/// Per-component knobs used during assembly.
#[derive(Debug, Clone, Copy)]
pub struct PipelineTuning {
    pub ai_timeout: Duration,
    pub gateway_timeout: Duration,
    pub store_timeout: Duration,
    /// Prior messages shown to each prompt.
    pub history_window: usize,
    pub rewrite_confidence: Confidence,
    pub degraded_rewrite_confidence: Confidence,
    pub fallback_confidence: Confidence,
    pub serialize_guest_writes: bool,
}

impl Default for PipelineTuning {
    fn default() -> Self {
        Self {
            ai_timeout: Duration::from_secs(80),
            gateway_timeout: Duration::from_secs(30),
            store_timeout: Duration::from_secs(10),
            history_window: 3,
            rewrite_confidence: Confidence::new(0.9),
            degraded_rewrite_confidence: Confidence::new(0.6),
            fallback_confidence: Confidence::new(0.5),
            serialize_guest_writes: true,
        }
    }
}

impl PipelineComponents {
    pub fn assemble(ports: PipelinePorts, tuning: &PipelineTuning) -> Self {
        let PipelinePorts {
            ai,
            conversations,
            listings,
            faqs,
            gateway,
            tickets,
            notifications,
        } = ports;

        Self {
            log: ConversationLog::new(conversations, tuning.store_timeout),
            locks: tuning
                .serialize_guest_writes
                .then(|| Arc::new(GuestLocks::new())),
            listings,
            classifier: Arc::new(AiFieldClassifier::new(
                ai.clone(),
                tuning.ai_timeout,
                tuning.history_window,
            )),
            listing_resolver: ListingResolver,
            faq: FaqResolver::new(ai.clone(), faqs, tuning.ai_timeout, tuning.history_window),
            rewriter: FriendlyRewriter::new(
                ai.clone(),
                tuning.ai_timeout,
                tuning.history_window,
                tuning.rewrite_confidence,
                tuning.degraded_rewrite_confidence,
            ),
            fallback: GenerativeFallbackResolver::new(
                ai,
                tuning.ai_timeout,
                tuning.history_window,
                tuning.fallback_confidence,
            ),
            dispatcher: OutboundDispatcher::new(gateway, tuning.gateway_timeout),
            notifier: EscalationNotifier::new(tickets, notifications, tuning.store_timeout),
        }
    }
}
