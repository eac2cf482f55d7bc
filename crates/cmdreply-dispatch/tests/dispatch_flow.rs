#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use cmdreply_core::{AttachmentData, AttachmentOption, Embed, InteractionFailure, ReplyError};
use cmdreply_dispatch::config;
use cmdreply_dispatch::dispatch::ReplyDispatcher;
use cmdreply_dispatch::interaction::{HandleState, Interaction};
use cmdreply_dispatch::transport::{
    DryRunTransport, SubmitOptions, SubmitRequest, Transport, TransportError, TransportResponse,
};

/// Answers with a fixed outcome and remembers what it was asked.
struct ScriptedTransport {
    fail: bool,
    status: u16,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, SubmitOptions)>>,
}

impl ScriptedTransport {
    fn status(status: u16) -> Arc<Self> {
        Arc::new(Self { fail: false, status, calls: AtomicUsize::new(0), seen: Mutex::new(Vec::new()) })
    }

    fn broken() -> Arc<Self> {
        Arc::new(Self { fail: true, status: 0, calls: AtomicUsize::new(0), seen: Mutex::new(Vec::new()) })
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn submit(&self, request: SubmitRequest) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((request.route.path.clone(), request.options));
        if self.fail {
            Err(TransportError::Other("connection reset".into()))
        } else {
            Ok(TransportResponse::new(self.status))
        }
    }
}

fn doc(s: &str) -> Value {
    serde_json::from_str(s).unwrap()
}

#[tokio::test]
async fn empty_reply_sends_deferred_ack() {
    let transport = Arc::new(DryRunTransport::new());
    let dispatcher = ReplyDispatcher::new(transport.clone());

    let handle = dispatcher
        .reply(Interaction::new(7, "abc"))
        .ephemeral(true)
        .submit()
        .await
        .unwrap();
    assert_eq!(handle.state(), HandleState::Ready);

    let rec = transport.recorded();
    assert_eq!(rec.len(), 1);
    assert_eq!(rec[0].route.method, "POST");
    assert_eq!(rec[0].route.path, "interactions/7/abc/callback");
    assert_eq!(doc(&rec[0].document), json!({ "type": 5, "data": { "flags": 64 } }));
}

#[tokio::test]
async fn message_with_files_is_multipart() {
    let transport = Arc::new(DryRunTransport::new());
    let dispatcher = ReplyDispatcher::new(transport.clone());

    dispatcher
        .reply(Interaction::new(1, "t"))
        .content("results")
        .add_embeds(vec![Embed::new().title("summary")])
        .unwrap()
        .add_file(AttachmentData::from_reader(Cursor::new(b"a,b\n1,2\n".to_vec())), "data.csv", &[])
        .unwrap()
        .add_file(Bytes::from_static(b"\x89PNG"), "chart.png", &[AttachmentOption::Spoiler])
        .unwrap()
        .submit()
        .await
        .unwrap();

    let rec = transport.recorded().pop().unwrap();
    assert_eq!(rec.files.len(), 2);
    assert_eq!(rec.files[0].0, "file0");
    assert_eq!(rec.files[0].1, "data.csv");
    assert_eq!(rec.files[0].2, Bytes::from_static(b"a,b\n1,2\n"));
    assert_eq!(rec.files[1].0, "file1");
    assert_eq!(rec.files[1].1, "SPOILER_chart.png");

    let v = doc(&rec.document);
    assert_eq!(v["type"], 4);
    assert_eq!(v["data"]["content"], "results");
    assert_eq!(v["data"]["embeds"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn rejected_status_fails_handle_and_caller() {
    let transport = ScriptedTransport::status(400);
    let dispatcher = ReplyDispatcher::new(transport.clone());

    let action = dispatcher.reply(Interaction::new(9, "x")).content("hello");
    let handle = action.handle();
    let err = action.submit().await.expect_err("400 must fail");

    assert!(matches!(err, ReplyError::Http { status: 400 }));
    assert_eq!(handle.state(), HandleState::Failed(InteractionFailure));
    assert!(handle.wait().await.is_err());

    let m = dispatcher.metrics();
    assert_eq!(m.dispatch_outcomes.get(&[("outcome", "http_error")]), 1);
    assert_eq!(m.envelopes.get(&[("kind", "channel_message")]), 1);
    assert_eq!(m.in_flight.get(), 0);
}

#[tokio::test]
async fn transport_failure_reaches_both_channels() {
    let transport = ScriptedTransport::broken();
    let dispatcher = ReplyDispatcher::new(transport.clone());

    let action = dispatcher.reply(Interaction::new(9, "x"));
    let handle = action.handle();
    let err = action.submit().await.expect_err("transport error");

    assert_eq!(err.code().as_str(), "TRANSPORT");
    assert!(err.to_string().contains("connection reset"));
    assert!(matches!(handle.state(), HandleState::Failed(_)));
}

#[tokio::test]
async fn validation_error_never_reaches_transport() {
    let transport = ScriptedTransport::status(204);
    let cfg = config::load_from_str("version: 1\nlimits: { max_content_length: 4 }").unwrap();
    let dispatcher = ReplyDispatcher::from_config(&cfg, transport.clone());

    let action = dispatcher.reply(Interaction::new(3, "t")).content("too long");
    let handle = action.handle();
    let err = action.submit().await.expect_err("content limit");

    assert!(err.is_validation());
    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    assert_eq!(handle.state(), HandleState::Failed(InteractionFailure));
    assert_eq!(dispatcher.metrics().rejected.get(&[("code", "LIMIT_EXCEEDED")]), 1);
    assert_eq!(dispatcher.metrics().envelopes.get(&[("kind", "channel_message")]), 0);
}

#[tokio::test]
async fn waiter_is_released_when_validation_rejects() {
    let transport = ScriptedTransport::status(204);
    let cfg = config::load_from_str("version: 1\nlimits: { max_content_length: 4 }").unwrap();
    let dispatcher = ReplyDispatcher::from_config(&cfg, transport.clone());

    let action = dispatcher.reply(Interaction::new(3, "t")).content("too long");
    let handle = action.handle();
    let waiter = tokio::spawn({
        let handle = handle.clone();
        async move { handle.wait().await }
    });

    action.submit().await.expect_err("content limit");
    let waited = tokio::time::timeout(Duration::from_secs(2), waiter)
        .await
        .expect("wait() must not hang")
        .unwrap();
    assert_eq!(waited, Err(InteractionFailure));
}

#[tokio::test]
async fn failed_check_cancels_submission() {
    let transport = ScriptedTransport::status(204);
    let dispatcher = ReplyDispatcher::new(transport.clone());

    let action = dispatcher
        .reply(Interaction::new(3, "t"))
        .content("hi")
        .set_check(|| false);
    let handle = action.handle();
    let err = action.submit().await.expect_err("check");
    assert!(matches!(err, ReplyError::CheckFailed));
    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    assert_eq!(dispatcher.metrics().rejected.get(&[("code", "CHECK_FAILED")]), 1);
    let waited = tokio::time::timeout(Duration::from_secs(2), handle.wait())
        .await
        .expect("wait() must not hang");
    assert_eq!(waited, Err(InteractionFailure));

    dispatcher
        .reply(Interaction::new(3, "t"))
        .content("hi")
        .set_check(|| true)
        .submit()
        .await
        .unwrap();
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn dropping_unsent_action_fails_handle() {
    let transport = ScriptedTransport::status(204);
    let dispatcher = ReplyDispatcher::new(transport.clone());

    let action = dispatcher.reply(Interaction::new(4, "d")).content("never sent");
    let handle = action.handle();
    assert_eq!(handle.state(), HandleState::Pending);
    drop(action);

    assert_eq!(handle.state(), HandleState::Failed(InteractionFailure));
    assert!(handle.wait().await.is_err());
    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);

    // an abandoned submit future releases the handle as well
    let action = dispatcher.reply(Interaction::new(4, "d"));
    let handle = action.handle();
    drop(action.submit());
    assert!(matches!(handle.state(), HandleState::Failed(_)));

    // a delivered reply is left untouched when the action goes away
    let handle = dispatcher.reply(Interaction::new(4, "d")).submit().await.unwrap();
    assert_eq!(handle.state(), HandleState::Ready);
}

#[tokio::test]
async fn timeout_and_deadline_pass_through() {
    let transport = ScriptedTransport::status(204);
    let cfg = config::load_from_str("version: 1\ndispatch: { timeout_ms: 1500 }").unwrap();
    let dispatcher = ReplyDispatcher::from_config(&cfg, transport.clone());

    dispatcher.reply(Interaction::new(1, "a")).submit().await.unwrap();

    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    dispatcher
        .reply(Interaction::new(2, "b"))
        .timeout(Duration::from_millis(250))
        .deadline(deadline)
        .submit()
        .await
        .unwrap();

    let seen = transport.seen.lock().unwrap().clone();
    assert_eq!(seen[0].1.timeout, Some(Duration::from_millis(1500)));
    assert_eq!(seen[0].1.deadline, None);
    assert_eq!(seen[1].0, "interactions/2/b/callback");
    assert_eq!(seen[1].1.timeout, Some(Duration::from_millis(250)));
    assert_eq!(seen[1].1.deadline, Some(deadline));
}

#[tokio::test]
async fn queue_invokes_exactly_one_callback() {
    let dispatcher = ReplyDispatcher::new(ScriptedTransport::status(204));
    let (tx, rx) = oneshot::channel();
    let failed = Arc::new(AtomicUsize::new(0));

    let f = failed.clone();
    dispatcher
        .reply(Interaction::new(5, "q"))
        .content("queued")
        .queue(
            move |handle| {
                let _ = tx.send(handle);
            },
            move |_| {
                f.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await
        .unwrap();

    let handle = rx.await.unwrap();
    assert!(handle.is_ready());
    assert_eq!(failed.load(Ordering::SeqCst), 0);

    let dispatcher = ReplyDispatcher::new(ScriptedTransport::broken());
    let (tx, rx) = oneshot::channel();
    let succeeded = Arc::new(AtomicUsize::new(0));
    let s = succeeded.clone();
    dispatcher
        .reply(Interaction::new(6, "q"))
        .queue(
            move |_| {
                s.fetch_add(1, Ordering::SeqCst);
            },
            move |err| {
                let _ = tx.send(err);
            },
        )
        .await
        .unwrap();

    assert_eq!(rx.await.unwrap().code().as_str(), "TRANSPORT");
    assert_eq!(succeeded.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn metrics_render_after_dispatch() {
    let dispatcher = ReplyDispatcher::new(Arc::new(DryRunTransport::new()));
    dispatcher.reply(Interaction::new(1, "a")).submit().await.unwrap();

    let text = dispatcher.metrics().render();
    assert!(text.contains("cmdreply_envelopes_total{kind=\"deferred_ack\"} 1"));
    assert!(text.contains("cmdreply_dispatch_total{outcome=\"ok\"} 1"));
    assert!(text.contains("cmdreply_dispatch_duration_micros_count{kind=\"deferred_ack\"} 1"));
    assert!(text.contains("cmdreply_in_flight 0"));
}
