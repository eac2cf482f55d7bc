//! Request body framing: plain JSON document or multi-part form.
//!
//! Attachment streams are single-use. Ownership moves into the body when a
//! reply is finalized, so a stream can never be sent twice.

use std::fmt;
use std::io::Read;

use bytes::Bytes;

use crate::error::{ReplyError, Result};

/// Media type of attachment parts.
pub const MEDIA_TYPE_OCTET: &str = "application/octet-stream";
/// Form field carrying the envelope when files are attached.
pub const PAYLOAD_JSON_PART: &str = "payload_json";

/// Raw attachment content.
pub enum AttachmentData {
    /// Already in memory (zero-copy).
    Bytes(Bytes),
    /// Read lazily by whoever writes the request.
    Stream(Box<dyn Read + Send>),
}

impl AttachmentData {
    pub fn from_reader(r: impl Read + Send + 'static) -> Self {
        AttachmentData::Stream(Box::new(r))
    }

    /// Drain the attachment into memory.
    pub fn into_bytes(self) -> Result<Bytes> {
        match self {
            AttachmentData::Bytes(b) => Ok(b),
            AttachmentData::Stream(mut r) => {
                let mut buf = Vec::new();
                r.read_to_end(&mut buf)
                    .map_err(|e| ReplyError::BadPayload(format!("attachment read failed: {e}")))?;
                Ok(Bytes::from(buf))
            }
        }
    }
}

impl fmt::Debug for AttachmentData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentData::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            AttachmentData::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<Bytes> for AttachmentData {
    fn from(b: Bytes) -> Self {
        AttachmentData::Bytes(b)
    }
}

impl From<Vec<u8>> for AttachmentData {
    fn from(v: Vec<u8>) -> Self {
        AttachmentData::Bytes(Bytes::from(v))
    }
}

impl From<&'static [u8]> for AttachmentData {
    fn from(s: &'static [u8]) -> Self {
        AttachmentData::Bytes(Bytes::from_static(s))
    }
}

impl From<Box<dyn Read + Send>> for AttachmentData {
    fn from(r: Box<dyn Read + Send>) -> Self {
        AttachmentData::Stream(r)
    }
}

#[derive(Debug)]
pub enum PartBody {
    Text(String),
    File(AttachmentData),
}

/// One named form-data part.
#[derive(Debug)]
pub struct FormPart {
    pub name: String,
    pub filename: Option<String>,
    /// `None` for plain text fields, which carry no `Content-Type` header.
    pub content_type: Option<&'static str>,
    pub body: PartBody,
}

#[derive(Debug, Default)]
pub struct MultipartBody {
    parts: Vec<FormPart>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file_part(&mut self, name: String, filename: String, data: AttachmentData) {
        self.parts.push(FormPart {
            name,
            filename: Some(filename),
            content_type: Some(MEDIA_TYPE_OCTET),
            body: PartBody::File(data),
        });
    }

    pub fn add_text_part(&mut self, name: &str, text: String) {
        self.parts.push(FormPart {
            name: name.to_string(),
            filename: None,
            content_type: None,
            body: PartBody::Text(text),
        });
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<FormPart> {
        self.parts
    }

    pub fn part(&self, name: &str) -> Option<&FormPart> {
        self.parts.iter().find(|p| p.name == name)
    }
}

/// Finalized request body handed to the transport.
#[derive(Debug)]
pub enum RequestBody {
    Json(String),
    Multipart(MultipartBody),
}

impl RequestBody {
    pub fn is_multipart(&self) -> bool {
        matches!(self, RequestBody::Multipart(_))
    }

    /// The serialized envelope, wherever it sits in the body.
    pub fn document(&self) -> Option<&str> {
        match self {
            RequestBody::Json(s) => Some(s),
            RequestBody::Multipart(m) => match m.part(PAYLOAD_JSON_PART).map(|p| &p.body) {
                Some(PartBody::Text(s)) => Some(s),
                _ => None,
            },
        }
    }
}

/// Frame an envelope document with its attachments.
///
/// Files become `file0..fileN` in the given order, followed by the
/// `payload_json` part.
pub fn encode_body(document: String, files: Vec<(String, AttachmentData)>) -> RequestBody {
    if files.is_empty() {
        return RequestBody::Json(document);
    }

    let mut body = MultipartBody::new();
    for (i, (filename, data)) in files.into_iter().enumerate() {
        body.add_file_part(format!("file{i}"), filename, data);
    }
    body.add_text_part(PAYLOAD_JSON_PART, document);
    RequestBody::Multipart(body)
}
