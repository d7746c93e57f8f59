//! End-to-end publication against a local listing server.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::put;
use axum::Router;
use image::{DynamicImage, ImageBuffer, Rgb};
use serde_json::json;

use tamtam_client::preferences::PreferencesHandle;
use tamtam_client::publish::{PublishDraft, PublishOutcome, PublishSettings, Publisher};
use tamtam_client::transport::{HttpTransport, TransportError};
use tamtam_shared::picture::decode_hex;
use tamtam_shared::{DeviceTag, LocationSession, Position};
use tamtam_store::{Database, Preferences};

#[derive(Debug, Clone)]
struct Received {
    user: String,
    id: String,
    content_type: Option<String>,
    body: serde_json::Value,
}

#[derive(Clone)]
struct ServerState {
    received: Arc<Mutex<Vec<Received>>>,
    status: StatusCode,
}

async fn put_thing(
    State(state): State<ServerState>,
    Path((user, id)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.received.lock().unwrap().push(Received {
        user,
        id,
        content_type,
        body,
    });
    state.status
}

async fn spawn_server(status: StatusCode) -> (SocketAddr, Arc<Mutex<Vec<Received>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        received: Arc::clone(&received),
        status,
    };
    let app = Router::new()
        .route("/users/:user/sellingThings/:id", put(put_thing))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, received)
}

fn preferences(addr: SocketAddr) -> Preferences {
    Preferences {
        server_host: "http://127.0.0.1".to_string(),
        server_port: addr.port(),
        device_tag: DeviceTag::new("TelephonePascal").unwrap(),
        ..Preferences::default()
    }
}

fn draft() -> PublishDraft {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_fn(32, 24, |x, y| Rgb([(x * 8) as u8, (y * 10) as u8, 90]));
    PublishDraft {
        picture: DynamicImage::ImageRgb8(img),
        description: "old bike".to_string(),
        price_text: "15.5".to_string(),
    }
}

#[tokio::test]
async fn publishes_the_exact_document() {
    let (addr, received) = spawn_server(StatusCode::OK).await;
    let transport = Arc::new(HttpTransport::new(Duration::from_secs(5)).unwrap());
    let publisher = Publisher::new(transport, PublishSettings::from(&preferences(addr)));

    let mut session = LocationSession::start(None);
    session.record_fix(Position::new(2.35, 48.85));

    let prepared = publisher.prepare(&draft(), &session).unwrap();
    let id = prepared.listing.id().to_string();

    let outcome = publisher.dispatch(prepared).await.unwrap();
    assert!(matches!(outcome, PublishOutcome::Accepted { status: 200, .. }));
    assert_eq!(outcome.id().as_str(), id);

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    let request = &received[0];
    assert_eq!(request.user, "idUser0");
    assert_eq!(request.id, id);
    assert_eq!(request.content_type.as_deref(), Some("application/json"));

    let pict = request.body["pict"].as_str().unwrap().to_string();
    let jpeg = decode_hex(&pict).unwrap();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

    assert_eq!(
        request.body,
        json!({
            "id": id,
            "pict": pict,
            "description": "old bike",
            "price": {"currency": 978, "price": 15.5},
            "position": {"lon": 2.35, "lat": 48.85},
            "stuck": false
        })
    );
}

#[tokio::test]
async fn server_errors_are_reported_not_retried() {
    let (addr, received) = spawn_server(StatusCode::INTERNAL_SERVER_ERROR).await;
    let transport = Arc::new(HttpTransport::new(Duration::from_secs(5)).unwrap());
    let publisher = Publisher::new(transport, PublishSettings::from(&preferences(addr)));

    let prepared = publisher
        .prepare(&draft(), &LocationSession::start(None))
        .unwrap();
    let outcome = publisher.dispatch(prepared).await.unwrap();

    assert!(matches!(
        outcome,
        PublishOutcome::Failed {
            error: TransportError::Status(500),
            ..
        }
    ));
    assert_eq!(received.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn transport_keeps_working_after_preference_change() {
    let (addr, received) = spawn_server(StatusCode::CREATED).await;
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(&dir.path().join("client.db")).unwrap();
    let handle = PreferencesHandle::new(preferences(addr));

    let transport = Arc::new(HttpTransport::new(Duration::from_secs(5)).unwrap());
    let _follower = transport.follow_preferences(handle.subscribe());

    handle.update(&db, |p| p.user_id.0 = "idUser1".to_string()).unwrap();
    for _ in 0..50 {
        if transport.generation() > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(transport.generation(), 1);

    let publisher = Publisher::new(Arc::clone(&transport), PublishSettings::from(&handle.current()));
    let prepared = publisher
        .prepare(&draft(), &LocationSession::start(Some(Position::new(2.30, 48.80))))
        .unwrap();
    let outcome = publisher.dispatch(prepared).await.unwrap();
    assert!(matches!(outcome, PublishOutcome::Accepted { status: 201, .. }));

    let received = received.lock().unwrap();
    assert_eq!(received[0].user, "idUser1");
    assert_eq!(received[0].body["position"], json!({"lon": 2.30, "lat": 48.80}));
}
