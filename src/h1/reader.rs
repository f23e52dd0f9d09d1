use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};

use bytes::{Buf, BytesMut};

use super::error::ParseError;
use super::parser::RequestParser;
use crate::common::ParseResult;
use crate::form;
use crate::headers::HeaderMap;
use crate::io::Io;
use crate::request::Request;
use log::{debug, info, warn};

/// Read buffer size for header ingestion.
pub const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Largest accepted request body.
pub const BODY_MAX: usize = 1024 * 1024;

const CONTENT_TYPE_URLENCODED: &[u8] = b"application/x-www-form-urlencoded";

/// User callback receiving the finished request.
///
/// Called exactly once per request, valid or not; [`Request::is_valid`]
/// distinguishes the outcomes. The handler owns both the request and the
/// connection from that point, so it decides the response and the fate of
/// the connection.
pub trait Handler<IO> {
    fn call(&self, request: Request, io: IO);
}

impl<IO, F> Handler<IO> for F
where
    F: Fn(Request, IO),
{
    fn call(&self, request: Request, io: IO) {
        self(request, io)
    }
}

/// Ingest one request from `io` and hand it to `handler`.
///
/// The returned future resolves once the request was delivered, or once
/// the connection was torn down after a transport error.
pub fn read_request<IO, H>(io: IO, handler: H) -> RequestReader<IO, H>
where
    IO: Io + Unpin,
    H: Handler<IO>,
{
    RequestReader::new(io, Arc::new(handler))
}

/// Future driving one request from socket reads to handler invocation.
///
/// The reader owns the transport, the read buffer and the in-flight
/// [`Request`]; everything is handed off or dropped when the future
/// resolves. Suspension happens only at reads: one read-some loop while
/// the head is incomplete, and one while the body falls short of the
/// declared `Content-Length`.
pub struct RequestReader<IO, H> {
    io: Option<IO>,
    handler: Arc<H>,
    parser: RequestParser,
    request: Option<Request>,
    read_buffer: BytesMut,
    phase: Phase,
}

enum Phase {
    Header,
    Body { body: BytesMut, target: usize },
    Done,
}

impl<IO, H> RequestReader<IO, H> {
    /// Create a reader over `io`; the handler is shared, so one `Arc<H>`
    /// serves any number of readers.
    pub fn new(io: IO, handler: Arc<H>) -> Self {
        Self {
            io: Some(io),
            handler,
            parser: RequestParser::new(),
            request: Some(Request::new()),
            read_buffer: BytesMut::with_capacity(READ_BUFFER_SIZE),
            phase: Phase::Header,
        }
    }
}

impl<IO, H> RequestReader<IO, H>
where
    IO: Io + Unpin,
    H: Handler<IO>,
{
    fn try_poll(&mut self, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        loop {
            match &mut self.phase {
                Phase::Header => {
                    if self.read_buffer.is_empty() {
                        let Some(io) = self.io.as_mut() else {
                            return Poll::Ready(Ok(()));
                        };
                        let read = ready!(io.poll_read_buf(&mut self.read_buffer, cx))?;
                        debug!("read {read} bytes from request");
                        if read == 0 {
                            // zero-length success is no progress
                            continue;
                        }
                    }

                    let Some(request) = self.request.as_mut() else {
                        return Poll::Ready(Ok(()));
                    };

                    match self.parser.feed(&self.read_buffer, request) {
                        ParseResult::Pending => self.read_buffer.clear(),
                        ParseResult::Err(err) => {
                            debug!("request rejected: {err}");
                            self.deliver();
                            return Poll::Ready(Ok(()));
                        }
                        ParseResult::Ok(consumed) => {
                            debug!("parsed {consumed} header bytes");
                            self.read_buffer.advance(consumed);

                            let content_length = content_length_of(request.headers());
                            if content_length > BODY_MAX {
                                debug!("request rejected: {}", ParseError::BodyTooLarge);
                                self.deliver();
                                return Poll::Ready(Ok(()));
                            }
                            request.set_content_length(content_length);

                            if content_length == 0 {
                                // no content to read; leftover octets past a
                                // `Content-Length: 0` head are dropped
                                self.complete();
                                return Poll::Ready(Ok(()));
                            }

                            let mut body = BytesMut::with_capacity(content_length);
                            let residual = self.read_buffer.len().min(content_length);
                            body.extend_from_slice(&self.read_buffer[..residual]);
                            // octets past the declared length are dropped,
                            // there is no pipelining
                            self.read_buffer.clear();

                            if body.len() == content_length {
                                debug!("read {residual} content bytes from residual (finished)");
                                request.set_body(body.freeze());
                                self.complete();
                                return Poll::Ready(Ok(()));
                            }

                            debug!("read {residual} content bytes from residual (partial)");
                            self.phase = Phase::Body { body, target: content_length };
                        }
                    }
                }

                Phase::Body { body, target } => {
                    // read-exact: loop read-some until the shortfall is zero
                    while body.len() < *target {
                        let Some(io) = self.io.as_mut() else {
                            return Poll::Ready(Ok(()));
                        };
                        let read = ready!(io.poll_read_buf(body, cx))?;
                        if read == 0 {
                            return Poll::Ready(Err(io::ErrorKind::UnexpectedEof.into()));
                        }
                        debug!("read {read} request content bytes");
                    }

                    // a read may overshoot the declared length when the
                    // allocator handed the buffer extra capacity; the
                    // surplus is dropped like any other residual
                    body.truncate(*target);

                    let body = body.split().freeze();
                    if let Some(request) = self.request.as_mut() {
                        request.set_body(body);
                    }
                    self.complete();
                    return Poll::Ready(Ok(()));
                }

                Phase::Done => return Poll::Ready(Ok(())),
            }
        }
    }

    /// Completion sequence: mark the request valid, decode url-encoded
    /// payloads, then deliver.
    fn complete(&mut self) {
        if let Some(request) = self.request.as_mut() {
            request.set_valid(true);

            if !request.query_string().is_empty() {
                let query_string = request.query_string_shared();
                if form::parse_urlencoded(request.query_params_mut(), &query_string).is_err() {
                    warn!("request query string parsing failed (uri)");
                }
            }

            if request.headers().get("Content-Type") == Some(CONTENT_TYPE_URLENCODED) {
                if let Some(body) = request.body_shared() {
                    if form::parse_urlencoded(request.query_params_mut(), &body).is_err() {
                        warn!("request query string parsing failed (content)");
                    }
                }
            }
        }

        self.deliver();
    }

    /// Hand the request and the connection to the handler, valid or not.
    fn deliver(&mut self) {
        self.phase = Phase::Done;
        if let (Some(request), Some(io)) = (self.request.take(), self.io.take()) {
            self.handler.call(request, io);
        }
    }
}

impl<IO, H> Future for RequestReader<IO, H>
where
    IO: Io + Unpin,
    H: Handler<IO>,
{
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let me = self.get_mut();

        if let Err(err) = ready!(me.try_poll(cx)) {
            if err.kind() == io::ErrorKind::ConnectionAborted {
                info!("request ingestion aborted (shutting down)");
            } else {
                info!("request ingestion aborted due to i/o error: {err}");
            }
            // tear the connection down; the request is neither delivered
            // nor retried
            me.io = None;
            me.request = None;
            me.phase = Phase::Done;
        }

        Poll::Ready(())
    }
}

impl<IO, H> std::fmt::Debug for RequestReader<IO, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestReader").finish_non_exhaustive()
    }
}

/// `Content-Length` per the original `strtoul` semantics: leading ASCII
/// whitespace is skipped, leading decimal digits are the value, anything
/// after them is ignored, and a missing or digitless header means zero.
fn content_length_of(headers: &HeaderMap) -> usize {
    let Some(value) = headers.get("Content-Length") else {
        return 0;
    };

    let mut length = 0usize;
    for &byte in value.trim_ascii_start() {
        if !byte.is_ascii_digit() {
            break;
        }
        length = length.saturating_mul(10).saturating_add((byte - b'0') as usize);
    }
    length
}
