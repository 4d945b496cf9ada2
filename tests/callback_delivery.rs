// tests/callback_delivery.rs
//
// End-to-end callback behavior against a real local HTTP sink:
// - report body shape
// - at-most-once under concurrent duplicate requests
// - message-count threshold (third message) and no re-fire on the fourth
// - failures (non-2xx, timeout, refused) never affect the reply path

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::TcpListener;

use scam_honeypot::notify::{DeliveryOutcome, HttpCallbackNotifier, IntelligenceReport, Notifier};
use scam_honeypot::{Honeypot, Message, SessionStore};

#[derive(Clone, Default)]
struct Sink {
    bodies: Arc<Mutex<Vec<Value>>>,
}

/// Spawn a sink answering `status` after `delay`; returns its callback URL.
async fn spawn_sink(sink: Sink, status: StatusCode, delay: Duration) -> String {
    async fn handler(
        State((sink, status, delay)): State<(Sink, StatusCode, Duration)>,
        Json(body): Json<Value>,
    ) -> StatusCode {
        sink.bodies.lock().push(body);
        tokio::time::sleep(delay).await;
        status
    }

    let app = Router::new()
        .route("/cb", post(handler))
        .with_state((sink, status, delay));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind sink");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/cb")
}

fn report() -> IntelligenceReport {
    IntelligenceReport {
        session_id: "sess-1".into(),
        scam_detected: true,
        total_messages_exchanged: 3,
        extracted_intelligence: scam_honeypot::extract("pay john@upi"),
        agent_notes: "notes".into(),
    }
}

/// Wait until the sink saw `n` bodies (spawned deliveries are fire-and-forget).
async fn wait_for(sink: &Sink, n: usize) {
    for _ in 0..100 {
        if sink.bodies.lock().len() >= n {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn posts_report_as_camel_case_json() {
    let sink = Sink::default();
    let url = spawn_sink(sink.clone(), StatusCode::OK, Duration::ZERO).await;

    let out = HttpCallbackNotifier::new(url).deliver(&report()).await;
    assert_eq!(out, DeliveryOutcome::Delivered { status: 200 });

    let bodies = sink.bodies.lock();
    assert_eq!(bodies.len(), 1);
    let b = &bodies[0];
    assert_eq!(b["sessionId"], "sess-1");
    assert_eq!(b["scamDetected"], true);
    assert_eq!(b["totalMessagesExchanged"], 3);
    assert_eq!(b["extractedIntelligence"]["upiIds"][0], "john@upi");
    assert_eq!(b["agentNotes"], "notes");
}

#[tokio::test]
async fn non_2xx_is_a_failure() {
    let url = spawn_sink(Sink::default(), StatusCode::BAD_GATEWAY, Duration::ZERO).await;
    let out = HttpCallbackNotifier::new(url).deliver(&report()).await;
    assert!(matches!(out, DeliveryOutcome::Failed { .. }), "{out:?}");
}

#[tokio::test]
async fn slow_sink_times_out() {
    let url = spawn_sink(Sink::default(), StatusCode::OK, Duration::from_secs(3)).await;
    let out = HttpCallbackNotifier::new(url)
        .with_timeout(Duration::from_millis(200))
        .deliver(&report())
        .await;
    assert!(matches!(out, DeliveryOutcome::Failed { .. }), "{out:?}");
}

#[tokio::test]
async fn refused_connection_is_a_failure() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let out = HttpCallbackNotifier::new(format!("http://{addr}/cb"))
        .with_timeout(Duration::from_secs(1))
        .deliver(&report())
        .await;
    assert!(matches!(out, DeliveryOutcome::Failed { .. }), "{out:?}");
}

fn engine_with(url: String) -> Honeypot {
    let sink = HttpCallbackNotifier::new(url).with_timeout(Duration::from_secs(2));
    Honeypot::new(Arc::new(SessionStore::new()), Arc::new(sink), 3, Some(7))
}

#[tokio::test]
async fn third_flagged_message_fires_once() {
    let sink = Sink::default();
    let hp = engine_with(spawn_sink(sink.clone(), StatusCode::OK, Duration::ZERO).await);

    // Scam-flagged (urgency + money) but nothing extractable.
    let texts = [
        "URGENT: your bank account will be blocked",
        "Verify your account immediately",
        "Action required: deposit the refund fee asap",
        "Why are you not responding? Account suspended!",
    ];
    let fired: Vec<bool> = texts
        .iter()
        .map(|t| {
            let out = hp.handle("threshold", Message::from_scammer(*t));
            assert!(out.detection.scam_detected, "{t}");
            assert!(!out.extraction.has_intelligence(), "{t}");
            out.callback_dispatched
        })
        .collect();
    assert_eq!(fired, vec![false, false, true, false]);

    wait_for(&sink, 1).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    let bodies = sink.bodies.lock();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["sessionId"], "threshold");
    assert_eq!(bodies[0]["totalMessagesExchanged"], 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicates_dispatch_exactly_once() {
    let sink = Sink::default();
    let hp = Arc::new(engine_with(
        spawn_sink(sink.clone(), StatusCode::OK, Duration::ZERO).await,
    ));

    let tasks: Vec<_> = (0..32)
        .map(|_| {
            let hp = Arc::clone(&hp);
            tokio::spawn(async move {
                hp.handle(
                    "dupes",
                    Message::from_scammer("Send payment to 123456789012 now, account blocked"),
                )
                .callback_dispatched
            })
        })
        .collect();

    let mut winners = 0;
    for t in tasks {
        if t.await.unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);

    wait_for(&sink, 1).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(sink.bodies.lock().len(), 1);
    assert_eq!(hp.store().get_or_create("dupes").total_messages(), 32);
}

#[tokio::test]
async fn failing_sink_does_not_touch_the_reply() {
    let hp = engine_with(spawn_sink(Sink::default(), StatusCode::INTERNAL_SERVER_ERROR, Duration::ZERO).await);
    let out = hp.handle(
        "fails",
        Message::from_scammer("Your account is suspended, verify now at http://bit.ly/x"),
    );
    assert!(out.callback_dispatched);
    assert!(!out.reply.is_empty());

    // A later message in the same session never retries.
    let again = hp.handle("fails", Message::from_scammer("http://bit.ly/y pay now"));
    assert!(!again.callback_dispatched);
}
