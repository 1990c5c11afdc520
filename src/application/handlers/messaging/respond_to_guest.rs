//! RespondToGuestHandler - the tiered answer-resolution pipeline.
//!
//! One run answers one inbound guest message:
//!
//! ```text
//! START → CLASSIFY → TRY_LISTING → TRY_FAQ → TRY_AI_FALLBACK → COMPOSE
//!       → DISPATCH → PERSIST → (ESCALATE?) → END
//! ```
//!
//! Knowledge-stage failures degrade to a miss. Dispatch and persistence
//! failures end the run in `ERROR_END` and escalate with the error text.
//! A panic in any stage ends the run with `source = error`: the canonical
//! copy is sent and a `PipelineError` ticket carries the panic text.
//! The caller always gets an outcome with a non-empty reply.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use serde_json::json;
use uuid::Uuid;

use crate::application::knowledge::{
    FallbackOutcome, FaqResolver, FieldClassifier, FriendlyRewriter, GenerativeFallbackResolver,
    ListingResolver, TurnContext,
};
use crate::application::{
    ConversationLog, DeliveryReport, EscalationNotifier, EscalationRequest, GuestLocks,
    OutboundDispatcher,
};
use crate::domain::conversation::{Conversation, Message, Role};
use crate::domain::foundation::{
    Confidence, DomainError, GuestId, ListingId, ReservationId, TicketId, ValidationError,
};
use crate::domain::listing::{Listing, TopicCategory};
use crate::domain::resolution::{
    AnswerSource, ConfidenceGate, EscalationReason, ResolutionResult,
    TECHNICAL_DIFFICULTIES_MESSAGE, UNKNOWN_FIELD,
};
use crate::ports::ListingReader;

/// Inbound guest message, already normalised by the transport layer.
#[derive(Debug, Clone)]
pub struct RespondToGuestCommand {
    pub guest_id: String,
    pub reservation_id: String,
    pub conversation_id: Option<String>,
    pub listing_map_id: Option<String>,
    pub message: String,
}

/// Tunables of the pipeline itself.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub gate: ConfidenceGate,
    /// Source confidence assigned to FAQ answers.
    pub faq_confidence: Confidence,
    /// How many stored messages are read as history.
    pub history_fetch: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            gate: ConfidenceGate::default(),
            faq_confidence: Confidence::new(0.85),
            history_fetch: 10,
        }
    }
}

/// Collaborators the pipeline sequences.
pub struct PipelineComponents {
    pub log: ConversationLog,
    /// `None` keeps the store's last-writer-wins behaviour.
    pub locks: Option<Arc<GuestLocks>>,
    pub listings: Arc<dyn ListingReader>,
    pub classifier: Arc<dyn FieldClassifier>,
    pub listing_resolver: ListingResolver,
    pub faq: FaqResolver,
    pub rewriter: FriendlyRewriter,
    pub fallback: GenerativeFallbackResolver,
    pub dispatcher: OutboundDispatcher,
    pub notifier: EscalationNotifier,
}

/// Resolution plus what happened to it downstream.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub resolution: ResolutionResult,
    pub sent: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
    pub ticket_id: Option<TicketId>,
    pub persisted: bool,
    pub processing_time_ms: u64,
}

/// Validated identifiers of one run.
struct Turn {
    guest_id: GuestId,
    reservation_id: ReservationId,
    listing_id: Option<ListingId>,
    conversation_id: Option<String>,
    question: String,
}

impl TryFrom<&RespondToGuestCommand> for Turn {
    type Error = ValidationError;

    fn try_from(cmd: &RespondToGuestCommand) -> Result<Self, Self::Error> {
        let question = cmd.message.trim();
        if question.is_empty() {
            return Err(ValidationError::empty_field("message"));
        }
        Ok(Self {
            guest_id: GuestId::new(cmd.guest_id.as_str())?,
            reservation_id: ReservationId::new(cmd.reservation_id.as_str())?,
            listing_id: cmd
                .listing_map_id
                .as_deref()
                .and_then(|id| ListingId::new(id).ok()),
            conversation_id: cmd
                .conversation_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            question: question.to_string(),
        })
    }
}

/// Answer chosen by the knowledge stages, with the failure behind a
/// technical fallback if there was one.
struct Resolved {
    result: ResolutionResult,
    failure: Option<String>,
}

pub struct RespondToGuestHandler {
    components: PipelineComponents,
    settings: PipelineSettings,
}

impl RespondToGuestHandler {
    pub fn new(components: PipelineComponents, settings: PipelineSettings) -> Self {
        Self {
            components,
            settings,
        }
    }

    #[tracing::instrument(
        skip(self, cmd),
        fields(guest_id = %cmd.guest_id, reservation_id = %cmd.reservation_id)
    )]
    pub async fn execute(&self, cmd: RespondToGuestCommand) -> PipelineOutcome {
        let started = Instant::now();

        let turn = match Turn::try_from(&cmd) {
            Ok(turn) => turn,
            Err(err) => {
                tracing::error!(error = %err, "rejected malformed guest message");
                return PipelineOutcome {
                    resolution: ResolutionResult::rejected(),
                    sent: false,
                    message_id: None,
                    error: Some(err.to_string()),
                    ticket_id: None,
                    persisted: false,
                    processing_time_ms: elapsed_ms(started),
                };
            }
        };

        match AssertUnwindSafe(self.run(&turn, started)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(payload) => self.recover(&turn, panic_message(&*payload), started).await,
        }
    }

    /// Every stage after validation. A panic in here is caught by `execute`.
    async fn run(&self, turn: &Turn, started: Instant) -> PipelineOutcome {
        let _guard = match &self.components.locks {
            Some(locks) => Some(locks.acquire(&turn.guest_id).await),
            None => None,
        };

        let (mut conversation, load_error) = match self.components.log.load(&turn.guest_id).await {
            Ok(conversation) => (conversation, None),
            Err(err) => {
                tracing::warn!(error = %err, "conversation load failed, answering without history");
                (Conversation::new(turn.guest_id.clone()), Some(err))
            }
        };
        let history: Vec<Message> = conversation.recent(self.settings.history_fetch).to_vec();

        let trace_id = Uuid::new_v4().to_string();
        let listing = self.load_listing(turn.listing_id.as_ref()).await;
        let context = TurnContext::new(turn.guest_id.clone(), trace_id)
            .with_listing_label(listing.as_ref().and_then(Listing::label));

        // CLASSIFY
        let candidates = TopicCategory::field_names();
        let detected_field = self
            .components
            .classifier
            .classify(&turn.question, &history, &candidates, &context)
            .await;
        tracing::debug!(detected_field = %detected_field, "question classified");

        // TRY_* and COMPOSE
        let Resolved { mut result, failure } = self
            .resolve(&turn.question, &history, listing.as_ref(), &detected_field, &context)
            .await;
        tracing::info!(
            source = %result.source(),
            confidence = result.confidence().value(),
            requires_escalation = result.requires_escalation(),
            "answer resolved"
        );

        // DISPATCH
        let delivery = self
            .components
            .dispatcher
            .dispatch(&turn.reservation_id, turn.conversation_id.as_deref(), result.response())
            .await;

        // PERSIST
        let processing_time_ms = elapsed_ms(started);
        let persist_error = if !delivery.sent {
            None
        } else if let Some(err) = load_error {
            // Saving over a log that could not be read would clobber it.
            Some(err.to_string())
        } else {
            self.persist(&mut conversation, turn, &result, &delivery, processing_time_ms)
                .await
                .err()
                .map(|err| err.to_string())
        };
        if let Some(err) = &persist_error {
            tracing::warn!(error = %err, "conversation not persisted for this turn");
        }
        let persisted = delivery.sent && persist_error.is_none();

        // ESCALATE
        let resolution_reason = result.escalation();
        let escalation = if let Some(err) = &delivery.error {
            Some((EscalationReason::DispatchFailed, Some(err.clone())))
        } else if let Some(err) = persist_error {
            Some((EscalationReason::PersistenceFailed, Some(err)))
        } else {
            resolution_reason.map(|reason| (reason, failure))
        };

        let ticket_id = match escalation {
            Some((reason, error)) => {
                result.escalate(reason);
                self.escalate(turn, &result, reason, error, resolution_reason).await
            }
            None => None,
        };

        PipelineOutcome {
            resolution: result,
            sent: delivery.sent,
            message_id: delivery.message_id,
            error: delivery.error,
            ticket_id,
            persisted,
            processing_time_ms: elapsed_ms(started),
        }
    }

    /// Sends the canonical copy and escalates after a run panicked.
    ///
    /// The conversation is left untouched. Panics from the recovery sends are
    /// caught too, so the caller still gets an outcome.
    async fn recover(&self, turn: &Turn, panic: String, started: Instant) -> PipelineOutcome {
        tracing::error!(panic = %panic, "pipeline run panicked");
        let result = ResolutionResult::pipeline_error(UNKNOWN_FIELD);

        let delivery = AssertUnwindSafe(self.components.dispatcher.dispatch(
            &turn.reservation_id,
            turn.conversation_id.as_deref(),
            result.response(),
        ))
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| DeliveryReport {
            sent: false,
            message_id: None,
            error: Some(panic_message(&*payload)),
        });

        let error = match &delivery.error {
            Some(send_error) => format!("{}; reply not delivered: {}", panic, send_error),
            None => panic,
        };
        let ticket_id = AssertUnwindSafe(self.escalate(
            turn,
            &result,
            EscalationReason::PipelineError,
            Some(error),
            None,
        ))
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| {
            tracing::error!(panic = %panic_message(&*payload), "escalation panicked");
            None
        });

        PipelineOutcome {
            resolution: result,
            sent: delivery.sent,
            message_id: delivery.message_id,
            error: delivery.error,
            ticket_id,
            persisted: false,
            processing_time_ms: elapsed_ms(started),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Stages
    // ─────────────────────────────────────────────────────────────────────────

    async fn load_listing(&self, listing_id: Option<&ListingId>) -> Option<Listing> {
        let listing_id = listing_id?;
        match self.components.listings.find_by_map_id(listing_id).await {
            Ok(Some(listing)) => Some(listing),
            Ok(None) => {
                tracing::debug!(listing_id = %listing_id, "listing not found");
                None
            }
            Err(err) => {
                tracing::warn!(listing_id = %listing_id, error = %err, "listing lookup failed");
                None
            }
        }
    }

    async fn resolve(
        &self,
        question: &str,
        history: &[Message],
        listing: Option<&Listing>,
        detected_field: &str,
        context: &TurnContext,
    ) -> Resolved {
        let gate = &self.settings.gate;
        let c = &self.components;

        // TRY_LISTING
        if let Some(found) =
            listing.and_then(|listing| c.listing_resolver.resolve(listing, detected_field, question))
        {
            tracing::debug!(source = %found.source, field = %found.field, "listing match");
            let rewrite = c.rewriter.rewrite(&found.answer, question, history, context).await;
            let confidence = gate.compose(found.confidence, rewrite.confidence);
            return Resolved {
                result: gate.finalize(rewrite.text, found.source, found.field, confidence),
                failure: None,
            };
        }

        // TRY_FAQ
        match c.faq.resolve(question, history, context).await {
            Ok(Some(answer)) => {
                tracing::debug!("FAQ match");
                let rewrite = c.rewriter.rewrite(&answer, question, history, context).await;
                let confidence = gate.compose(self.settings.faq_confidence, rewrite.confidence);
                return Resolved {
                    result: gate.finalize(rewrite.text, AnswerSource::Faq, detected_field, confidence),
                    failure: None,
                };
            }
            Ok(None) => tracing::debug!("FAQ miss"),
            Err(err) => tracing::warn!(error = %err, "FAQ lookup failed, treating as miss"),
        }

        // TRY_AI_FALLBACK
        let failure = match c.fallback.resolve(question, history, context).await {
            Ok(FallbackOutcome::Answered {
                response,
                confidence,
            }) => {
                return Resolved {
                    result: gate.finalize(response, AnswerSource::AiFallback, detected_field, confidence),
                    failure: None,
                };
            }
            Ok(FallbackOutcome::Invalid) => {
                return Resolved {
                    result: gate.finalize(
                        TECHNICAL_DIFFICULTIES_MESSAGE,
                        AnswerSource::TechnicalFallback,
                        detected_field,
                        Confidence::ZERO,
                    ),
                    failure: None,
                };
            }
            Err(err) => {
                tracing::warn!(error = %err, "generative fallback failed");
                err.to_string()
            }
        };

        // COMPOSE
        Resolved {
            result: gate.finalize(
                TECHNICAL_DIFFICULTIES_MESSAGE,
                AnswerSource::EmergencyFallback,
                detected_field,
                Confidence::ZERO,
            ),
            failure: Some(failure),
        }
    }

    async fn persist(
        &self,
        conversation: &mut Conversation,
        turn: &Turn,
        result: &ResolutionResult,
        delivery: &DeliveryReport,
        processing_time_ms: u64,
    ) -> Result<(), DomainError> {
        let log = &self.components.log;

        log.record(
            conversation,
            Role::Guest,
            &turn.question,
            &json!({
                "reservationId": turn.reservation_id.as_str(),
                "conversationId": turn.conversation_id,
            }),
        )?;
        log.record(
            conversation,
            Role::Agent,
            result.response(),
            &json!({
                "source": result.source(),
                "detectedField": result.detected_field(),
                "confidence": result.confidence(),
                "processingTimeMs": processing_time_ms,
                "reservationId": turn.reservation_id.as_str(),
                "conversationId": turn.conversation_id,
                "messageId": delivery.message_id,
            }),
        )?;
        if result.requires_escalation() {
            conversation.mark_needs_human_support();
        }

        log.save(conversation).await
    }

    async fn escalate(
        &self,
        turn: &Turn,
        result: &ResolutionResult,
        reason: EscalationReason,
        error: Option<String>,
        resolution_reason: Option<EscalationReason>,
    ) -> Option<TicketId> {
        let request = EscalationRequest {
            guest_id: turn.guest_id.clone(),
            reservation_id: turn.reservation_id.clone(),
            listing_id: turn.listing_id.clone(),
            question: turn.question.clone(),
            response: Some(result.response().to_string()),
            reason,
            error,
            source: Some(result.source()),
            confidence: Some(result.confidence()),
            resolution_reason: resolution_reason.filter(|r| *r != reason),
        };

        match self.components.notifier.notify(request).await {
            Ok(ticket) => Some(ticket.id()),
            Err(err) => {
                tracing::error!(error = %err, reason = ?reason, "escalation could not be recorded");
                None
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|msg| msg.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string payload".to_string());
    format!("panic: {}", detail)
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
