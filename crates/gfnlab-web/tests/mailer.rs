//! HttpMailer against a local stand-in relay.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Router,
};
use base64::Engine;
use secrecy::SecretString;

use gfnlab_web::notify::{HttpMailer, Notifier, ReportMessage, CHART_CID};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<(HeaderMap, Bytes)>>>);

async fn spawn_relay(status: StatusCode) -> (String, Captured) {
    let captured = Captured::default();
    let app = Router::new()
        .route(
            "/messages",
            post(move |State(c): State<Captured>, headers: HeaderMap, body: Bytes| async move {
                c.0.lock().unwrap().push((headers, body));
                (status, "relay says no")
            }),
        )
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/messages"), captured)
}

fn message() -> ReportMessage {
    ReportMessage {
        to: "lab@example.com".to_string(),
        subject: "Sieve Analysis Result – GFN".to_string(),
        text_body: "GFN = 45.3".to_string(),
        html_body: format!("<p>GFN = 45.3</p><img src=\"cid:{CHART_CID}\">"),
        chart_png: vec![0x89, b'P', b'N', b'G'],
        chart_cid: CHART_CID.to_string(),
    }
}

#[tokio::test]
async fn test_posts_multipart_with_inline_chart() {
    let (endpoint, captured) = spawn_relay(StatusCode::OK).await;
    let mailer = HttpMailer::new(
        endpoint,
        "GFN Lab <noreply@example.com>",
        Some(SecretString::from("key-123")),
        Duration::from_secs(5),
    )
    .unwrap();

    mailer.send(&message()).await.unwrap();

    let requests = captured.0.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (headers, body) = &requests[0];

    let expected_auth = format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode("api:key-123")
    );
    assert_eq!(headers[header::AUTHORIZATION], expected_auth.as_str());
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("multipart/form-data"));

    let body = String::from_utf8_lossy(body);
    assert!(body.contains(r#"name="to""#));
    assert!(body.contains("lab@example.com"));
    assert!(body.contains(r#"name="from""#));
    assert!(body.contains(r#"name="inline"; filename="graph.png""#));
    assert!(body.contains("image/png"));
}

#[tokio::test]
async fn test_relay_rejection_is_notification_error() {
    let (endpoint, _captured) = spawn_relay(StatusCode::INTERNAL_SERVER_ERROR).await;
    let mailer = HttpMailer::new(endpoint, "noreply@example.com", None, Duration::from_secs(5)).unwrap();

    let err = mailer.send(&message()).await.unwrap_err();
    assert!(err.is_notification());
    let text = err.to_string();
    assert!(text.contains("500"), "{text}");
    assert!(text.contains("relay says no"), "{text}");
}

#[tokio::test]
async fn test_unreachable_relay_is_notification_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mailer = HttpMailer::new(
        format!("http://{addr}/messages"),
        "noreply@example.com",
        None,
        Duration::from_secs(2),
    )
    .unwrap();

    let err = mailer.send(&message()).await.unwrap_err();
    assert!(err.to_string().contains("mail relay unreachable"));
}
