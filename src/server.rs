//! Webhook transport: one POST route per call-flow entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::error::RingbackError;
use crate::flow::{CallFlowEngine, CallbackForm};
use crate::store::CallbackStore;
use crate::twiml::{self, EntryPoint};

impl IntoResponse for RingbackError {
    fn into_response(self) -> Response {
        error!(error = %self, "webhook failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Build the webhook router around `engine`.
pub fn router<S>(engine: CallFlowEngine<S>) -> Router
where
    S: CallbackStore + Send + Sync + 'static,
{
    let mut router = Router::new().route("/health", get(health));
    for entry in EntryPoint::ALL {
        router = router.route(
            entry.path(),
            post(
                move |State(engine): State<Arc<CallFlowEngine<S>>>, Form(form): Form<CallbackForm>| async move {
                    respond(&engine, entry, &form)
                },
            ),
        );
    }
    router.with_state(Arc::new(engine))
}

fn respond<S>(
    engine: &CallFlowEngine<S>,
    entry: EntryPoint,
    form: &CallbackForm,
) -> Result<Response, RingbackError>
where
    S: CallbackStore + Send + Sync + 'static,
{
    let response = engine.handle(entry, form);
    if !entry.is_caller_facing() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    let xml = twiml::render(&response)?;
    Ok(([(header::CONTENT_TYPE, "text/xml")], xml).into_response())
}

async fn health() -> &'static str {
    "ok"
}

/// Bind `bind_addr` and serve webhooks until Ctrl-C.
pub async fn serve<S>(engine: CallFlowEngine<S>, bind_addr: &str) -> Result<(), RingbackError>
where
    S: CallbackStore + Send + Sync + 'static,
{
    let addr: SocketAddr = bind_addr
        .parse()
        .map_err(|e| RingbackError::Config(format!("invalid bind address {bind_addr}: {e}")))?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening for voice webhooks");

    axum::serve(listener, router(engine))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{CallFlow, RecordingStore, StoreEffect};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> (Router, RecordingStore) {
        let store = RecordingStore::default();
        let engine = CallFlowEngine::new(CallFlow::default(), store.clone());
        (router(engine), store)
    }

    async fn post_form(app: Router, entry: EntryPoint, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(entry.path())
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn incoming_returns_dial_twiml() {
        let (app, _) = app();
        let (status, body) = post_form(app, EntryPoint::Incoming, "CallSid=CA1").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"<Dial action="/voice/dial-outcome">"#));
    }

    #[tokio::test]
    async fn dial_outcome_reads_form_field() {
        let (app, _) = app();
        let (_, body) = post_form(
            app,
            EntryPoint::DialOutcome,
            "CallSid=CA1&DialCallStatus=no-answer",
        )
        .await;
        assert!(body.contains(r#"<Gather numDigits="1" action="/voice/menu-choice">"#));
        assert!(body.contains("<Redirect>/voice/menu-choice</Redirect>"));
    }

    #[tokio::test]
    async fn completed_dial_returns_empty_response() {
        let (app, _) = app();
        let (status, body) = post_form(
            app,
            EntryPoint::DialOutcome,
            "CallSid=CA1&DialCallStatus=completed",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.ends_with("<Response></Response>"));
    }

    #[tokio::test]
    async fn phone_capture_writes_and_records() {
        let (app, store) = app();
        let (_, body) = post_form(
            app,
            EntryPoint::CapturePhoneNumber,
            "CallSid=CA1&Digits=5551234567",
        )
        .await;
        assert!(body.contains(r#"timeout="5" transcribe="true""#));
        assert_eq!(
            store.wait_for(1).await,
            vec![StoreEffect::CreateCallback {
                call_sid: "CA1".into(),
                phone_number: "5551234567".into(),
            }]
        );
    }

    #[tokio::test]
    async fn transcript_returns_no_content() {
        let (app, store) = app();
        let (status, body) = post_form(
            app,
            EntryPoint::CaptureTranscript,
            "CallSid=CA1&TranscriptionText=call+me+back+please",
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
        assert_eq!(
            store.wait_for(1).await,
            vec![StoreEffect::AddTranscript {
                call_sid: "CA1".into(),
                transcript: "call me back please".into(),
            }]
        );
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (app, _) = app();
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn bad_bind_address_is_config_error() {
        let engine = CallFlowEngine::new(CallFlow::default(), RecordingStore::default());
        let err = serve(engine, "not-an-address").await.unwrap_err();
        assert!(matches!(err, RingbackError::Config(_)));
    }
}
