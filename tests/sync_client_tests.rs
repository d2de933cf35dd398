// Integration tests for the sync client
//
// These tests stand up a throwaway in-process HTTP backend and verify the
// wire contract: one multipart POST per upload with the exact field name,
// filename, and bytes, plus status/decoding/timeout error mapping.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio_util::sync::CancellationToken;
use voice_ledger::{AudioClip, AudioFrame, SlotConfig, SyncClient, SyncError};

#[derive(Debug, Clone)]
struct RecordedUpload {
    field_name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Clone, Default)]
struct StubState {
    uploads: Arc<Mutex<Vec<RecordedUpload>>>,
}

async fn record_upload(
    State(state): State<StubState>,
    mut multipart: Multipart,
) -> Json<serde_json::Value> {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.unwrap().to_vec();
        state.uploads.lock().unwrap().push(RecordedUpload {
            field_name,
            file_name,
            content_type,
            bytes,
        });
    }
    Json(serde_json::json!({
        "message": "Expense saved",
        "transcript": "120 rupees tea"
    }))
}

async fn spawn_stub(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr) -> SyncClient {
    SyncClient::new(
        format!("http://{}", addr),
        Duration::from_secs(5),
        CancellationToken::new(),
    )
    .unwrap()
}

fn test_clip() -> AudioClip {
    let frames = vec![
        AudioFrame {
            samples: vec![10, 20, 30],
            sample_rate: 16000,
            channels: 1,
            timestamp_ms: 0,
        },
        AudioFrame {
            samples: vec![40, 50],
            sample_rate: 16000,
            channels: 1,
            timestamp_ms: 100,
        },
    ];
    AudioClip::from_frames(&frames, 16000, 1).unwrap()
}

#[tokio::test]
async fn test_upload_posts_single_multipart_field() -> Result<()> {
    let state = StubState::default();
    let router = Router::new()
        .route("/upload-audio", post(record_upload))
        .with_state(state.clone());
    let addr = spawn_stub(router).await;

    let clip = test_clip();
    let sync = client(addr);
    sync.upload_clip(&clip, &SlotConfig::expense()).await?;

    let uploads = state.uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1, "exactly one field in exactly one POST");

    let upload = &uploads[0];
    assert_eq!(upload.field_name, "audio");
    assert_eq!(upload.file_name.as_deref(), Some("expense.webm"));
    assert_eq!(upload.content_type.as_deref(), Some("audio/wav"));
    assert_eq!(upload.bytes, clip.wav_bytes());

    Ok(())
}

#[tokio::test]
async fn test_goal_slot_uses_its_own_endpoint_and_filename() -> Result<()> {
    let state = StubState::default();
    let router = Router::new()
        .route("/api/voice_goal", post(record_upload))
        .with_state(state.clone());
    let addr = spawn_stub(router).await;

    let clip = test_clip();
    client(addr).upload_clip(&clip, &SlotConfig::goal()).await?;

    let uploads = state.uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].file_name.as_deref(), Some("goal.webm"));

    Ok(())
}

#[tokio::test]
async fn test_upload_ack_surfaces_known_fields() -> Result<()> {
    let router = Router::new().route(
        "/upload-audio",
        post(|mut multipart: Multipart| async move {
            while let Some(field) = multipart.next_field().await.unwrap() {
                let _ = field.bytes().await.unwrap();
            }
            Json(serde_json::json!({
                "message": "Goal updated",
                "transcript": "add 500 to my watch",
                "goal_completed": true,
                "exceeded": true,
                "over_by": 50.0
            }))
        }),
    );
    let addr = spawn_stub(router).await;

    let ack = client(addr)
        .upload_clip(&test_clip(), &SlotConfig::expense())
        .await?;

    assert_eq!(ack.message.as_deref(), Some("Goal updated"));
    assert_eq!(ack.transcript.as_deref(), Some("add 500 to my watch"));
    assert_eq!(ack.goal_completed, Some(true));
    assert_eq!(ack.over_by, Some(50.0));

    Ok(())
}

#[tokio::test]
async fn test_upload_failure_maps_status() {
    let router = Router::new().route(
        "/upload-audio",
        post(|mut multipart: Multipart| async move {
            while let Some(field) = multipart.next_field().await.unwrap() {
                let _ = field.bytes().await.unwrap();
            }
            (StatusCode::INTERNAL_SERVER_ERROR, "boom")
        }),
    );
    let addr = spawn_stub(router).await;

    let err = client(addr)
        .upload_clip(&test_clip(), &SlotConfig::expense())
        .await
        .expect_err("500 must fail the upload");

    match err {
        SyncError::UploadFailed(status) => assert_eq!(status.as_u16(), 500),
        other => panic!("expected UploadFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_expenses_decodes_records() -> Result<()> {
    let router = Router::new().route(
        "/api/expenses",
        get(|| async {
            Json(serde_json::json!([
                {
                    "amount": 120.0,
                    "category": "Food",
                    "payment_method": "UPI",
                    "timestamp": "2025-11-02T09:30:00Z"
                },
                {
                    "amount": 40.5,
                    "category": "Transport",
                    "payment_method": "Cash",
                    "timestamp": "2025-11-02T10:00:00Z"
                }
            ]))
        }),
    );
    let addr = spawn_stub(router).await;

    let expenses = client(addr).fetch_expenses().await?;

    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0].amount, 120.0);
    assert_eq!(expenses[0].category, "Food");
    assert_eq!(expenses[1].payment_method, "Cash");
    assert_eq!(
        expenses[0].timestamp.to_rfc3339(),
        "2025-11-02T09:30:00+00:00"
    );

    Ok(())
}

#[tokio::test]
async fn test_fetch_goals_decodes_records() -> Result<()> {
    let router = Router::new().route(
        "/api/goals",
        get(|| async {
            Json(serde_json::json!([
                { "name": "Laptop", "saved": 5000.0, "target": 60000.0 }
            ]))
        }),
    );
    let addr = spawn_stub(router).await;

    let goals = client(addr).fetch_goals().await?;

    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].name, "Laptop");
    assert_eq!(goals[0].target, 60000.0);

    Ok(())
}

#[tokio::test]
async fn test_fetch_failure_maps_status() {
    let router = Router::new(); // no routes: everything is 404
    let addr = spawn_stub(router).await;

    let err = client(addr)
        .fetch_expenses()
        .await
        .expect_err("missing endpoint must fail the fetch");

    match err {
        SyncError::FetchFailed(status) => assert_eq!(status.as_u16(), 404),
        other => panic!("expected FetchFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_body_is_a_decode_error() {
    let router = Router::new().route("/api/expenses", get(|| async { "definitely not json" }));
    let addr = spawn_stub(router).await;

    let err = client(addr)
        .fetch_expenses()
        .await
        .expect_err("non-JSON body must fail decoding");

    assert!(matches!(err, SyncError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_stalled_request_times_out() {
    let router = Router::new().route(
        "/api/expenses",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(serde_json::json!([]))
        }),
    );
    let addr = spawn_stub(router).await;

    let sync = SyncClient::new(
        format!("http://{}", addr),
        Duration::from_millis(200),
        CancellationToken::new(),
    )
    .unwrap();

    let err = sync
        .fetch_expenses()
        .await
        .expect_err("stalled backend must not hang the client");

    assert!(matches!(err, SyncError::Timeout), "got {:?}", err);
}

#[tokio::test]
async fn test_cancellation_aborts_in_flight_upload() {
    let router = Router::new().route(
        "/upload-audio",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(serde_json::json!({}))
        }),
    );
    let addr = spawn_stub(router).await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let sync = SyncClient::new(format!("http://{}", addr), Duration::from_secs(5), cancel).unwrap();

    let err = sync
        .upload_clip(&test_clip(), &SlotConfig::expense())
        .await
        .expect_err("cancelled client must abort");

    assert!(matches!(err, SyncError::Cancelled), "got {:?}", err);
}
