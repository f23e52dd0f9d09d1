//! Materialized request message.
use bytes::Bytes;

use crate::bytestring::ByteStr;
use crate::form::Params;
use crate::headers::HeaderMap;

/// A fully materialized HTTP/1.x request.
///
/// Built field by field during ingestion; ownership transfers to the user
/// handler once the reader is done with it. [`is_valid`] reports whether
/// the whole request (headers and body) was ingested without error; an
/// invalid request is still delivered so the handler can decide the
/// response.
///
/// [`is_valid`]: Request::is_valid
#[derive(Default)]
pub struct Request {
    method: ByteStr,
    resource: Bytes,
    query_string: Bytes,
    version_major: u16,
    version_minor: u16,
    headers: HeaderMap,
    query_params: Params,
    content_length: usize,
    body: Option<Bytes>,
    is_valid: bool,
}

impl Request {
    /// Create a new empty `Request`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request method token, e.g. `GET`.
    pub fn method(&self) -> &ByteStr {
        &self.method
    }

    /// Path component of the request target.
    pub fn resource(&self) -> &[u8] {
        &self.resource
    }

    /// Raw query component without the leading `?`; empty when absent.
    pub fn query_string(&self) -> &[u8] {
        &self.query_string
    }

    /// Major protocol version.
    pub fn version_major(&self) -> u16 {
        self.version_major
    }

    /// Minor protocol version.
    pub fn version_minor(&self) -> u16 {
        self.version_minor
    }

    /// Request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Parameters decoded from the query string and, for url-encoded
    /// POST content, the body.
    pub fn query_params(&self) -> &Params {
        &self.query_params
    }

    /// Declared body length; `0` when the `Content-Length` header is absent.
    pub fn content_length(&self) -> usize {
        self.content_length
    }

    /// Request body of exactly [`content_length`] octets; `None` when empty.
    ///
    /// [`content_length`]: Request::content_length
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// `true` once headers and body were ingested without error.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }
}

// ===== Ingestion =====

impl Request {
    pub(crate) fn set_method(&mut self, method: ByteStr) {
        self.method = method;
    }

    pub(crate) fn set_resource(&mut self, resource: Bytes) {
        self.resource = resource;
    }

    pub(crate) fn set_query_string(&mut self, query_string: Bytes) {
        self.query_string = query_string;
    }

    pub(crate) fn set_version_major(&mut self, major: u16) {
        self.version_major = major;
    }

    pub(crate) fn set_version_minor(&mut self, minor: u16) {
        self.version_minor = minor;
    }

    pub(crate) fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub(crate) fn query_params_mut(&mut self) -> &mut Params {
        &mut self.query_params
    }

    pub(crate) fn set_content_length(&mut self, content_length: usize) {
        self.content_length = content_length;
    }

    pub(crate) fn set_body(&mut self, body: Bytes) {
        self.body = Some(body);
    }

    pub(crate) fn query_string_shared(&self) -> Bytes {
        self.query_string.clone()
    }

    pub(crate) fn body_shared(&self) -> Option<Bytes> {
        self.body.clone()
    }

    pub(crate) fn set_valid(&mut self, is_valid: bool) {
        self.is_valid = is_valid;
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("resource", &String::from_utf8_lossy(&self.resource))
            .field("version", &format_args!("HTTP/{}.{}", self.version_major, self.version_minor))
            .field("headers", &self.headers)
            .field("content_length", &self.content_length)
            .field("is_valid", &self.is_valid)
            .finish_non_exhaustive()
    }
}
