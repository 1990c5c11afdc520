//! Application router.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::handlers::{create_ticket, health, receive_guest_message, transition_ticket, AppState};

/// Builds the service router.
///
/// Every request gets an `x-request-id` (generated when the caller sent
/// none) that is echoed on the response and recorded by the trace layer.
pub fn app_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhooks/guest-messages", post(receive_guest_message))
        .route("/support-tickets", post(create_ticket))
        .route("/support-tickets/:id/transitions", post(transition_ticket))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::memory::{
        InMemoryConversationRepository, InMemoryFaqCorpus, InMemoryListingReader,
        InMemorySupportTicketRepository, RecordingMessagingGateway,
    };
    use crate::application::{
        CreateSupportTicketHandler, EscalationNotifier, PipelineComponents, PipelinePorts,
        PipelineSettings, PipelineTuning, RespondToGuestHandler, UpdateTicketStatusHandler,
    };
    use crate::domain::foundation::ListingId;
    use crate::domain::listing::Listing;
    use crate::ports::PromptPurpose;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    // ───────────────────────────────────────────────────────────────
    // Fixture
    // ───────────────────────────────────────────────────────────────

    struct Fixture {
        app: Router,
        gateway: Arc<RecordingMessagingGateway>,
        tickets: Arc<InMemorySupportTicketRepository>,
    }

    fn fixture(ai: MockAIProvider) -> Fixture {
        let listing = Listing {
            wifi_network: Some("CasaAzul".into()),
            wifi_password: Some("sol2024".into()),
            ..Default::default()
        };
        let gateway = Arc::new(RecordingMessagingGateway::new());
        let tickets = Arc::new(InMemorySupportTicketRepository::new());
        let tuning = PipelineTuning::default();

        let components = PipelineComponents::assemble(
            PipelinePorts {
                ai: Arc::new(ai),
                conversations: Arc::new(InMemoryConversationRepository::new()),
                listings: Arc::new(
                    InMemoryListingReader::new()
                        .with_listing(ListingId::new("1001").unwrap(), listing),
                ),
                faqs: Arc::new(InMemoryFaqCorpus::new(Vec::new())),
                gateway: gateway.clone(),
                tickets: tickets.clone(),
                notifications: None,
            },
            &tuning,
        );
        let notifier = Arc::new(EscalationNotifier::new(
            tickets.clone(),
            None,
            tuning.store_timeout,
        ));

        let state = AppState::new(
            Arc::new(RespondToGuestHandler::new(components, PipelineSettings::default())),
            Arc::new(CreateSupportTicketHandler::new(notifier)),
            Arc::new(UpdateTicketStatusHandler::new(tickets.clone())),
        );

        Fixture {
            app: app_router(state, Duration::from_secs(5)),
            gateway,
            tickets,
        }
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ───────────────────────────────────────────────────────────────
    // Tests
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn health_route_exists() {
        let fx = fixture(MockAIProvider::new());

        let response = fx
            .app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn webhook_answers_from_listing_and_replies() {
        let ai = MockAIProvider::new()
            .with_response_for(PromptPurpose::ClassifyField, "wifi")
            .with_response_for(
                PromptPurpose::FriendlyRewrite,
                "The WiFi is CasaAzul and the password is sol2024.",
            );
        let fx = fixture(ai);

        let response = fx
            .app
            .oneshot(post_json(
                "/webhooks/guest-messages",
                json!({
                    "guestId": "g-1",
                    "reservationId": "r-1",
                    "listingMapId": "1001",
                    "message": "What's the wifi password?"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["source"], "listing-direct");
        assert_eq!(body["detectedField"], "wifi");
        assert_eq!(body["requiresEscalation"], false);
        assert_eq!(body["sent"], true);
        assert_eq!(body["persisted"], true);
        assert!(body.get("ticketId").is_none());
        assert_eq!(fx.gateway.sent().len(), 1);
    }

    #[tokio::test]
    async fn webhook_with_missing_ids_reports_error_without_reply() {
        let fx = fixture(MockAIProvider::new());

        let response = fx
            .app
            .oneshot(post_json(
                "/webhooks/guest-messages",
                json!({ "guestId": " ", "reservationId": "r-1", "message": "hi" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["sent"], false);
        assert!(body["error"].is_string());
        assert_eq!(body["source"], "error");
        assert_eq!(body["requiresEscalation"], false);
        assert!(fx.gateway.sent().is_empty());
        assert_eq!(fx.tickets.count(), 0);
    }

    #[tokio::test]
    async fn webhook_rejects_malformed_json() {
        let fx = fixture(MockAIProvider::new());

        let response = fx
            .app
            .oneshot(post_json("/webhooks/guest-messages", json!({ "guestId": "g-1" })))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn create_ticket_returns_created() {
        let fx = fixture(MockAIProvider::new());

        let response = fx
            .app
            .oneshot(post_json(
                "/support-tickets",
                json!({
                    "guestId": "g-1",
                    "reservationId": "r-1",
                    "question": "Can I bring my dog?",
                    "reason": "pet policy exception",
                    "priority": "high"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert!(body["ticketId"].is_string());
        assert_eq!(fx.tickets.count(), 1);
    }

    #[tokio::test]
    async fn transition_with_invalid_id_is_bad_request() {
        let fx = fixture(MockAIProvider::new());

        let response = fx
            .app
            .oneshot(post_json(
                "/support-tickets/not-a-uuid/transitions",
                json!({ "action": "close" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn transition_of_unknown_ticket_is_not_found() {
        let fx = fixture(MockAIProvider::new());

        let response = fx
            .app
            .oneshot(post_json(
                "/support-tickets/550e8400-e29b-41d4-a716-446655440000/transitions",
                json!({ "action": "assign", "assignee": "ana" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
