//! End-to-end export tests.
//!
//! A stub PDF renderer runs as a real axum server on a random port; the
//! client and the submission flow talk to it over HTTP.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::post;
use construlink::prelude::*;
use construlink::ui::{self, UiState};

type Received = Arc<Mutex<Vec<serde_json::Value>>>;

async fn generate(
    State(received): State<Received>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    received.lock().unwrap().push(body);
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        b"%PDF-1.4\n% stub\n%%EOF".to_vec(),
    )
}

async fn fail() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "renderer down")
}

async fn empty() -> impl IntoResponse {
    StatusCode::OK
}

async fn slow() -> impl IntoResponse {
    tokio::time::sleep(Duration::from_secs(5)).await;
    StatusCode::OK
}

/// Helper: spawn the stub renderer on port 0 (random available port).
async fn spawn_stub() -> (String, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route("/pdfgenerator/generate", post(generate))
        .route("/fail", post(fail))
        .route("/empty", post(empty))
        .route("/slow", post(slow))
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}"), received)
}

fn filled_session(dir: &std::path::Path) -> FormSession {
    let mut session = FormSession::new(Arc::new(ArtifactStore::new(dir)));
    session.dispatch(FormAction::set_text(TextField::Company, "ACME"));
    session.dispatch(FormAction::AddItem(ListItem::Personnel(PersonnelEntry::new(
        "Ana", "Pedreiro", "8",
    ))));
    session
}

// ── Client ───────────────────────────────────────────────────────────

#[tokio::test]
async fn client_posts_html_content_and_returns_pdf() {
    let (base, received) = spawn_stub().await;
    let client = PdfGeneratorClient::new(format!("{base}/pdfgenerator/generate")).unwrap();

    let doc = client.generate("<p>RDO</p>").await.unwrap();
    assert!(doc.bytes().starts_with(b"%PDF"));

    let bodies = received.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0], serde_json::json!({"htmlContent": "<p>RDO</p>"}));
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let (base, _) = spawn_stub().await;
    let client = PdfGeneratorClient::new(format!("{base}/fail")).unwrap();

    match client.generate("<p/>").await {
        Err(ExportError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "renderer down");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_body_is_malformed() {
    let (base, _) = spawn_stub().await;
    let client = PdfGeneratorClient::new(format!("{base}/empty")).unwrap();
    assert!(matches!(
        client.generate("<p/>").await,
        Err(ExportError::Malformed(_))
    ));
}

#[tokio::test]
async fn slow_renderer_times_out() {
    let (base, _) = spawn_stub().await;
    let client =
        PdfGeneratorClient::with_timeout(format!("{base}/slow"), Some(Duration::from_millis(200)))
            .unwrap();
    assert!(matches!(
        client.generate("<p/>").await,
        Err(ExportError::Request(_))
    ));
}

#[tokio::test]
async fn unreachable_renderer_is_a_request_error() {
    // Bind and drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = PdfGeneratorClient::new(format!("http://{addr}/pdfgenerator/generate")).unwrap();
    assert!(matches!(
        client.generate("<p/>").await,
        Err(ExportError::Request(_))
    ));
}

// ── Submission flow ──────────────────────────────────────────────────

#[tokio::test]
async fn successful_submit_resets_draft_and_saves_pdf() {
    let (base, received) = spawn_stub().await;
    let client = PdfGeneratorClient::new(format!("{base}/pdfgenerator/generate")).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut session = filled_session(dir.path());

    let outcome = session.submit(&client).await.unwrap();

    assert_eq!(outcome.notice.text(), "PDF gerado com sucesso!");
    assert_eq!(session.store().state(), &ReportDraft::default());
    assert!(outcome.artifact.path.starts_with(std::fs::canonicalize(dir.path()).unwrap()));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

    let bodies = received.lock().unwrap();
    let html = bodies[0]["htmlContent"].as_str().unwrap();
    assert!(html.contains("Empresa: ACME"));
    assert!(html.contains("Ana, Cargo: Pedreiro, Horas Trabalhadas: 8"));
}

#[tokio::test]
async fn failed_submit_keeps_draft_and_saves_nothing() {
    let (base, _) = spawn_stub().await;
    let client = PdfGeneratorClient::new(format!("{base}/fail")).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut session = filled_session(dir.path());
    let before = session.store().state().clone();

    let err = session.submit(&client).await.unwrap_err();

    assert_eq!(err.notice().text(), "Erro ao gerar PDF.");
    assert_eq!(session.store().state(), &before);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn driver_serves_queued_submission_from_shared_state() {
    let (base, received) = spawn_stub().await;
    let client = PdfGeneratorClient::new(format!("{base}/pdfgenerator/generate")).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let state = Arc::new(Mutex::new(UiState::new(Arc::new(ArtifactStore::new(
        dir.path(),
    )))));
    ui::navigate(&state, Route::Form);
    ui::dispatch(&state, FormAction::set_text(TextField::Client, "Prefeitura"));
    assert!(ui::request_submit(&state));
    assert!(!ui::request_submit(&state));
    ui::dismiss_notice(&state);

    assert!(ui::export_pending(&state, &client).await);

    let s = state.lock().unwrap();
    assert_eq!(s.notice.as_ref().unwrap().text(), "PDF gerado com sucesso!");
    assert!(s.last_artifact_url.is_some());
    assert!(!s.is_exporting());
    assert_eq!(received.lock().unwrap().len(), 1);
}
