//! Shared wiring for pipeline integration tests.
//!
//! Every collaborator is an in-memory adapter the test can inspect or switch
//! into a failing mode; the AI provider is a scripted mock.

#![allow(dead_code)]

use std::sync::Arc;

use guest_concierge::adapters::ai::MockAIProvider;
use guest_concierge::adapters::memory::{
    InMemoryConversationRepository, InMemoryFaqCorpus, InMemoryListingReader,
    InMemorySupportTicketRepository, RecordingMessagingGateway,
};
use guest_concierge::adapters::notifications::RecordingNotificationChannel;
use guest_concierge::application::{
    PipelineComponents, PipelinePorts, PipelineSettings, PipelineTuning, RespondToGuestCommand,
    RespondToGuestHandler,
};
use guest_concierge::domain::faq::FaqEntry;
use guest_concierge::domain::foundation::{GuestId, ListingId};
use guest_concierge::domain::listing::Listing;
use guest_concierge::ports::ListingReader;

pub const LISTING_ID: &str = "1001";
pub const RESERVATION_ID: &str = "r-42";

pub fn casa_azul() -> Listing {
    Listing {
        name: Some("Casa Azul".into()),
        city: Some("Valencia".into()),
        check_in_time: Some("15:00".into()),
        check_out_time: Some("11:00".into()),
        wifi_network: Some("CasaAzul".into()),
        wifi_password: Some("sol2024".into()),
        ..Default::default()
    }
}

pub fn faq(question: &str, answer: &str) -> FaqEntry {
    FaqEntry {
        question: question.into(),
        answer: answer.into(),
    }
}

pub struct Harness {
    pub ai: MockAIProvider,
    pub conversations: Arc<InMemoryConversationRepository>,
    pub listings: Arc<InMemoryListingReader>,
    pub faqs: Arc<InMemoryFaqCorpus>,
    pub gateway: Arc<RecordingMessagingGateway>,
    pub tickets: Arc<InMemorySupportTicketRepository>,
    pub notifications: Arc<RecordingNotificationChannel>,
}

impl Harness {
    pub fn new(ai: MockAIProvider) -> Self {
        Self::with_faqs(ai, Vec::new())
    }

    pub fn with_faqs(ai: MockAIProvider, entries: Vec<FaqEntry>) -> Self {
        Self {
            ai,
            conversations: Arc::new(InMemoryConversationRepository::new()),
            listings: Arc::new(
                InMemoryListingReader::new()
                    .with_listing(ListingId::new(LISTING_ID).unwrap(), casa_azul()),
            ),
            faqs: Arc::new(InMemoryFaqCorpus::new(entries)),
            gateway: Arc::new(RecordingMessagingGateway::new()),
            tickets: Arc::new(InMemorySupportTicketRepository::new()),
            notifications: Arc::new(RecordingNotificationChannel::new()),
        }
    }

    pub fn handler(&self) -> RespondToGuestHandler {
        self.handler_with(PipelineTuning::default())
    }

    pub fn handler_with(&self, tuning: PipelineTuning) -> RespondToGuestHandler {
        self.assemble(self.listings.clone(), tuning)
    }

    /// Handler that reads listings from `listings` instead of the seeded store.
    pub fn handler_reading(&self, listings: Arc<dyn ListingReader>) -> RespondToGuestHandler {
        self.assemble(listings, PipelineTuning::default())
    }

    fn assemble(
        &self,
        listings: Arc<dyn ListingReader>,
        tuning: PipelineTuning,
    ) -> RespondToGuestHandler {
        let components = PipelineComponents::assemble(
            PipelinePorts {
                ai: Arc::new(self.ai.clone()),
                conversations: self.conversations.clone(),
                listings,
                faqs: self.faqs.clone(),
                gateway: self.gateway.clone(),
                tickets: self.tickets.clone(),
                notifications: Some(self.notifications.clone()),
            },
            &tuning,
        );
        RespondToGuestHandler::new(components, PipelineSettings::default())
    }

    pub fn stored_messages(&self, guest: &str) -> usize {
        self.conversations
            .get(&GuestId::new(guest).unwrap())
            .map(|c| c.messages().len())
            .unwrap_or(0)
    }
}

/// A message from `guest` about the seeded listing.
pub fn ask(guest: &str, message: &str) -> RespondToGuestCommand {
    RespondToGuestCommand {
        guest_id: guest.into(),
        reservation_id: RESERVATION_ID.into(),
        conversation_id: Some("conv-7".into()),
        listing_map_id: Some(LISTING_ID.into()),
        message: message.into(),
    }
}

/// A message from `guest` with no listing attached.
pub fn ask_without_listing(guest: &str, message: &str) -> RespondToGuestCommand {
    RespondToGuestCommand {
        listing_map_id: None,
        ..ask(guest, message)
    }
}
