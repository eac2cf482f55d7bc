//! Transport that never leaves the process.
//!
//! Drains each request (attachment streams included) on the blocking pool,
//! logs it, records it, and answers with a fixed status. Used by the binary's `--dry-run` path and
//! by tests.

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use cmdreply_core::protocol::multipart::PartBody;
use cmdreply_core::RequestBody;

use super::contract::{Route, SubmitRequest, Transport, TransportError, TransportResponse};

/// A drained request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub route: Route,
    /// Serialized envelope.
    pub document: String,
    /// `(part name, filename, content)` per attachment, in part order.
    pub files: Vec<(String, String, Bytes)>,
}

pub struct DryRunTransport {
    status: u16,
    recorded: Mutex<Vec<RecordedRequest>>,
}

impl DryRunTransport {
    /// Interaction callbacks answer `204 No Content` on success.
    pub fn new() -> Self {
        Self::with_status(204)
    }

    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            recorded: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<RecordedRequest> {
        match self.recorded.lock() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Default for DryRunTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn drain(route: Route, body: RequestBody) -> Result<RecordedRequest, TransportError> {
    match body {
        RequestBody::Json(document) => Ok(RecordedRequest { route, document, files: Vec::new() }),
        RequestBody::Multipart(mp) => {
            let mut document = None;
            let mut files = Vec::new();
            for part in mp.into_parts() {
                match part.body {
                    PartBody::Text(s) => document = Some(s),
                    PartBody::File(data) => {
                        let bytes = data
                            .into_bytes()
                            .map_err(|e| TransportError::Other(e.to_string()))?;
                        files.push((part.name, part.filename.unwrap_or_default(), bytes));
                    }
                }
            }
            let document = document
                .ok_or_else(|| TransportError::Other("multipart body without payload_json".into()))?;
            Ok(RecordedRequest { route, document, files })
        }
    }
}

#[async_trait]
impl Transport for DryRunTransport {
    async fn submit(&self, request: SubmitRequest) -> Result<TransportResponse, TransportError> {
        let SubmitRequest { route, body, .. } = request;
        let rec = tokio::task::spawn_blocking(move || drain(route, body))
            .await
            .map_err(|e| TransportError::Other(e.to_string()))??;

        tracing::info!(
            method = rec.route.method,
            path = %rec.route.path,
            files = rec.files.len(),
            status = self.status,
            payload = %rec.document,
            "dry-run submit"
        );

        let mut recorded = match self.recorded.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        recorded.push(rec);
        Ok(TransportResponse::new(self.status))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]

    use std::io::Read;
    use std::sync::Arc;
    use std::thread::ThreadId;

    use cmdreply_core::protocol::multipart::{MultipartBody, PAYLOAD_JSON_PART};
    use cmdreply_core::AttachmentData;

    use super::*;

    /// Reader that remembers which thread pulled its bytes.
    struct ThreadTracking {
        inner: std::io::Cursor<Vec<u8>>,
        seen: Arc<Mutex<Option<ThreadId>>>,
    }

    impl Read for ThreadTracking {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            *self.seen.lock().unwrap() = Some(std::thread::current().id());
            self.inner.read(buf)
        }
    }

    fn request(path: &str) -> SubmitRequest {
        SubmitRequest {
            route: Route { method: "POST", path: path.to_string() },
            body: RequestBody::Json("{\"type\":5}".into()),
            options: Default::default(),
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn attachment_streams_drain_off_the_runtime_thread() {
        let seen = Arc::new(Mutex::new(None));
        let reader = ThreadTracking { inner: std::io::Cursor::new(b"payload".to_vec()), seen: seen.clone() };

        let mut body = MultipartBody::new();
        body.add_file_part("file0".into(), "a.bin".into(), AttachmentData::from_reader(reader));
        body.add_text_part(PAYLOAD_JSON_PART, "{}".into());

        let transport = DryRunTransport::new();
        let mut req = request("interactions/2/t/callback");
        req.body = RequestBody::Multipart(body);
        transport.submit(req).await.unwrap();

        let reader_thread = seen.lock().unwrap().expect("reader was polled");
        assert_ne!(reader_thread, std::thread::current().id());
        assert_eq!(&transport.recorded()[0].files[0].2[..], b"payload");
    }

    #[tokio::test]
    async fn poisoned_log_still_records() {
        let transport = Arc::new(DryRunTransport::new());
        let t = transport.clone();
        let _ = std::thread::spawn(move || {
            let _guard = t.recorded.lock().unwrap();
            panic!("poison the request log");
        })
        .join();
        assert!(transport.recorded.is_poisoned());

        let res = transport.submit(request("interactions/1/t/callback")).await.unwrap();
        assert!(res.is_ok());

        let rec = transport.recorded();
        assert_eq!(rec.len(), 1);
        assert_eq!(rec[0].route.path, "interactions/1/t/callback");
    }
}
